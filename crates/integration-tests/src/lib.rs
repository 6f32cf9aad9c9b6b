//! Integration tests for Ops Desk.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p opsdesk-integration-tests
//! ```
//!
//! No external services are needed: every test starts a [`MockBackend`], an
//! in-process axum server bound to an ephemeral port that keeps its records
//! in memory and computes server-side fields (stock status, net pay,
//! category item counts) the way the real backend does.
//!
//! # Failure Injection
//!
//! [`MockBackend::fail_next`] and [`MockBackend::rate_limit_next`] make the
//! next request fail before it reaches a handler; [`MockBackend::require_token`]
//! turns on bearer-token checks.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::Utc;
use opsdesk_client::{ApiClient, ClientConfig};
use opsdesk_core::{
    Campaign, CampaignId, CampaignInput, Category, CategoryId, CategoryInput, Employee,
    EmployeeId, EmployeeInput, InventoryItem, InventoryStats, ItemId, ItemInput, PayrollEntry,
    PayrollEntryId, PayrollInput, StockStatus,
};
use rust_decimal::Decimal;
use serde_json::json;
use tokio::task::JoinHandle;
use url::Url;

type Shared = Arc<Mutex<BackendState>>;

/// Records and switches held by the mock backend.
#[derive(Debug, Default)]
pub struct BackendState {
    pub items: Vec<InventoryItem>,
    pub categories: Vec<Category>,
    pub campaigns: Vec<Campaign>,
    pub employees: Vec<Employee>,
    pub payroll: Vec<PayrollEntry>,
    /// `METHOD /path` of every request received, in order.
    pub requests: Vec<String>,
    token: Option<String>,
    failures: VecDeque<Failure>,
    next_id: i64,
}

impl BackendState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug)]
struct Failure {
    status: StatusCode,
    body: String,
    retry_after: Option<u64>,
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        if let Some(secs) = self.retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

fn lock(state: &Shared) -> MutexGuard<'_, BackendState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process backend serving the Ops Desk API.
pub struct MockBackend {
    state: Shared,
    addr: SocketAddr,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Bind an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let state = Shared::default();
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Failed to read local address");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            state,
            addr,
            server,
        }
    }

    /// Base URL of the API.
    ///
    /// # Panics
    ///
    /// Never in practice; the address always forms a valid URL.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}/api", self.addr)).expect("Invalid mock backend URL")
    }

    /// Client configuration pointing at this backend.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.url())
    }

    /// A backend client with default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config()).expect("Failed to build API client")
    }

    /// Direct access to the stored records.
    pub fn state(&self) -> MutexGuard<'_, BackendState> {
        lock(&self.state)
    }

    /// Make the next request fail with `status` and `body`.
    pub fn fail_next(&self, status: u16, body: &str) {
        lock(&self.state).failures.push_back(Failure {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body: body.to_owned(),
            retry_after: None,
        });
    }

    /// Make the next request fail with `429 Too Many Requests`.
    pub fn rate_limit_next(&self, retry_after: Option<u64>) {
        lock(&self.state).failures.push_back(Failure {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
            retry_after,
        });
    }

    /// Reject requests without `Authorization: Bearer {token}`.
    pub fn require_token(&self, token: &str) {
        lock(&self.state).token = Some(token.to_owned());
    }

    /// Store an item as if it had been created earlier.
    pub fn seed_item(&self, name: &str, category: &str, quantity: i64, unit_price: Decimal) -> InventoryItem {
        let mut state = lock(&self.state);
        let id = ItemId::new(state.next_id());
        let input = ItemInput {
            name: name.to_owned(),
            sku: format!("SKU-{id}"),
            category: category.to_owned(),
            unit: "pcs".to_owned(),
            quantity,
            unit_price,
            min_quantity: 5,
            max_quantity: 100,
            supplier: None,
            location: None,
            description: None,
        };
        let item = build_item(id, &input, None);
        state.items.push(item.clone());
        item
    }

    /// Store a category.
    pub fn seed_category(&self, name: &str) -> Category {
        let mut state = lock(&self.state);
        let category = Category {
            id: CategoryId::new(state.next_id()),
            name: name.to_owned(),
            description: None,
            item_count: 0,
        };
        state.categories.push(category.clone());
        category
    }

    /// Store a campaign.
    pub fn seed_campaign(&self, input: &CampaignInput) -> Campaign {
        let mut state = lock(&self.state);
        let campaign = build_campaign(CampaignId::new(state.next_id()), input);
        state.campaigns.push(campaign.clone());
        campaign
    }

    /// Store an employee.
    pub fn seed_employee(&self, input: &EmployeeInput) -> Employee {
        let mut state = lock(&self.state);
        let employee = build_employee(EmployeeId::new(state.next_id()), input);
        state.employees.push(employee.clone());
        employee
    }

    /// Store a payroll entry.
    pub fn seed_payroll(&self, input: &PayrollInput) -> PayrollEntry {
        let mut state = lock(&self.state);
        let entry = build_payroll(PayrollEntryId::new(state.next_id()), input);
        state.payroll.push(entry.clone());
        entry
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBackend")
            .field("addr", &self.addr)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Router
// =============================================================================

fn router(state: Shared) -> Router {
    let api = Router::new()
        .route("/inventory/items", get(list_items).post(create_item))
        .route("/inventory/items/{id}", put(update_item).delete(delete_item))
        .route("/inventory/stats", get(inventory_stats))
        .route("/inventory/categories", get(list_categories).post(create_category))
        .route("/inventory/categories/{id}", axum::routing::delete(delete_category))
        .route("/marketing/campaigns", get(list_campaigns).post(create_campaign))
        .route("/marketing/campaigns/{id}", put(update_campaign).delete(delete_campaign))
        .route("/hr/employees", get(list_employees).post(create_employee))
        .route("/hr/employees/{id}", put(update_employee).delete(delete_employee))
        .route("/hr/payroll", get(list_payroll).post(create_payroll))
        .route("/hr/payroll/{id}", put(update_payroll).delete(delete_payroll));

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(state.clone(), gate))
        .with_state(state)
}

/// Record the request, check the token and apply injected failures.
async fn gate(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let rejection = {
        let mut backend = lock(&state);
        backend
            .requests
            .push(format!("{} {}", request.method(), request.uri().path()));

        let authorized = backend.token.as_ref().is_none_or(|token| {
            request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                == Some(format!("Bearer {token}").as_str())
        });
        if authorized {
            backend.failures.pop_front().map(IntoResponse::into_response)
        } else {
            Some((StatusCode::UNAUTHORIZED, "missing or invalid token").into_response())
        }
    };

    match rejection {
        Some(response) => response,
        None => next.run(request).await,
    }
}

fn not_found(what: &str, id: i64) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("{what} {id} not found") })),
    )
        .into_response()
}

// =============================================================================
// Inventory
// =============================================================================

fn stock_status(quantity: i64, min_quantity: i64) -> StockStatus {
    if quantity <= 0 {
        StockStatus::OutOfStock
    } else if quantity <= min_quantity {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

fn build_item(id: ItemId, input: &ItemInput, existing: Option<&InventoryItem>) -> InventoryItem {
    let now = Utc::now();
    InventoryItem {
        id,
        name: input.name.clone(),
        sku: input.sku.clone(),
        category: input.category.clone(),
        unit: input.unit.clone(),
        quantity: input.quantity,
        unit_price: input.unit_price,
        min_quantity: input.min_quantity,
        max_quantity: input.max_quantity,
        status: stock_status(input.quantity, input.min_quantity),
        supplier: input.supplier.clone(),
        location: input.location.clone(),
        description: input.description.clone(),
        created_at: existing.map_or(now, |e| e.created_at),
        last_updated: now,
    }
}

async fn list_items(State(state): State<Shared>) -> Json<Vec<InventoryItem>> {
    Json(lock(&state).items.clone())
}

async fn create_item(State(state): State<Shared>, Json(input): Json<ItemInput>) -> Response {
    let mut backend = lock(&state);
    if backend.items.iter().any(|i| i.sku == input.sku) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": format!("SKU {} already exists", input.sku) })),
        )
            .into_response();
    }
    let item = build_item(ItemId::new(backend.next_id()), &input, None);
    backend.items.push(item.clone());
    (StatusCode::CREATED, Json(item)).into_response()
}

async fn update_item(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(input): Json<ItemInput>,
) -> Response {
    let mut backend = lock(&state);
    match backend.items.iter_mut().find(|i| i.id.as_i64() == id) {
        Some(slot) => {
            *slot = build_item(slot.id, &input, Some(&*slot));
            Json(slot.clone()).into_response()
        }
        None => not_found("item", id),
    }
}

async fn delete_item(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut backend = lock(&state);
    let before = backend.items.len();
    backend.items.retain(|i| i.id.as_i64() != id);
    if backend.items.len() == before {
        return not_found("item", id);
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn inventory_stats(State(state): State<Shared>) -> Json<InventoryStats> {
    let backend = lock(&state);
    let count = |status: StockStatus| {
        let n = backend.items.iter().filter(|i| i.status == status).count();
        i64::try_from(n).unwrap_or(i64::MAX)
    };
    Json(InventoryStats {
        total_items: i64::try_from(backend.items.len()).unwrap_or(i64::MAX),
        total_value: backend.items.iter().map(InventoryItem::stock_value).sum(),
        low_stock_count: count(StockStatus::LowStock),
        out_of_stock_count: count(StockStatus::OutOfStock),
        category_count: i64::try_from(backend.categories.len()).unwrap_or(i64::MAX),
    })
}

async fn list_categories(State(state): State<Shared>) -> Json<Vec<Category>> {
    let backend = lock(&state);
    let categories = backend
        .categories
        .iter()
        .map(|c| {
            let n = backend.items.iter().filter(|i| i.category == c.name).count();
            Category {
                item_count: i64::try_from(n).unwrap_or(i64::MAX),
                ..c.clone()
            }
        })
        .collect();
    Json(categories)
}

async fn create_category(State(state): State<Shared>, Json(input): Json<CategoryInput>) -> Response {
    let mut backend = lock(&state);
    if backend.categories.iter().any(|c| c.name == input.name) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "category already exists" })),
        )
            .into_response();
    }
    let category = Category {
        id: CategoryId::new(backend.next_id()),
        name: input.name,
        description: input.description,
        item_count: 0,
    };
    backend.categories.push(category.clone());
    (StatusCode::CREATED, Json(category)).into_response()
}

async fn delete_category(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut backend = lock(&state);
    let Some(name) = backend
        .categories
        .iter()
        .find(|c| c.id.as_i64() == id)
        .map(|c| c.name.clone())
    else {
        return not_found("category", id);
    };
    backend.categories.retain(|c| c.id.as_i64() != id);
    backend.items.retain(|i| i.category != name);
    StatusCode::NO_CONTENT.into_response()
}

// =============================================================================
// Marketing
// =============================================================================

fn build_campaign(id: CampaignId, input: &CampaignInput) -> Campaign {
    Campaign {
        id,
        name: input.name.clone(),
        channel: input.channel,
        status: input.status,
        budget: input.budget,
        spent: input.spent,
        reach: input.reach,
        conversions: input.conversions,
        start_date: input.start_date,
        end_date: input.end_date,
    }
}

async fn list_campaigns(State(state): State<Shared>) -> Json<Vec<Campaign>> {
    Json(lock(&state).campaigns.clone())
}

async fn create_campaign(State(state): State<Shared>, Json(input): Json<CampaignInput>) -> Response {
    let mut backend = lock(&state);
    let campaign = build_campaign(CampaignId::new(backend.next_id()), &input);
    backend.campaigns.push(campaign.clone());
    (StatusCode::CREATED, Json(campaign)).into_response()
}

async fn update_campaign(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(input): Json<CampaignInput>,
) -> Response {
    let mut backend = lock(&state);
    match backend.campaigns.iter_mut().find(|c| c.id.as_i64() == id) {
        Some(slot) => {
            *slot = build_campaign(slot.id, &input);
            Json(slot.clone()).into_response()
        }
        None => not_found("campaign", id),
    }
}

async fn delete_campaign(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut backend = lock(&state);
    let before = backend.campaigns.len();
    backend.campaigns.retain(|c| c.id.as_i64() != id);
    if backend.campaigns.len() == before {
        return not_found("campaign", id);
    }
    StatusCode::NO_CONTENT.into_response()
}

// =============================================================================
// HR
// =============================================================================

fn build_employee(id: EmployeeId, input: &EmployeeInput) -> Employee {
    Employee {
        id,
        name: input.name.clone(),
        email: input.email.clone(),
        department: input.department.clone(),
        position: input.position.clone(),
        status: input.status,
        hire_date: input.hire_date,
        salary: input.salary,
    }
}

fn build_payroll(id: PayrollEntryId, input: &PayrollInput) -> PayrollEntry {
    PayrollEntry {
        id,
        employee_name: input.employee_name.clone(),
        department: input.department.clone(),
        period: input.period.clone(),
        base_salary: input.base_salary,
        bonus: input.bonus,
        deductions: input.deductions,
        net_pay: input.base_salary + input.bonus - input.deductions,
        status: input.status,
    }
}

async fn list_employees(State(state): State<Shared>) -> Json<Vec<Employee>> {
    Json(lock(&state).employees.clone())
}

async fn create_employee(State(state): State<Shared>, Json(input): Json<EmployeeInput>) -> Response {
    let mut backend = lock(&state);
    if backend.employees.iter().any(|e| e.email == input.email) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "email already in use" })),
        )
            .into_response();
    }
    let employee = build_employee(EmployeeId::new(backend.next_id()), &input);
    backend.employees.push(employee.clone());
    (StatusCode::CREATED, Json(employee)).into_response()
}

async fn update_employee(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(input): Json<EmployeeInput>,
) -> Response {
    let mut backend = lock(&state);
    match backend.employees.iter_mut().find(|e| e.id.as_i64() == id) {
        Some(slot) => {
            *slot = build_employee(slot.id, &input);
            Json(slot.clone()).into_response()
        }
        None => not_found("employee", id),
    }
}

async fn delete_employee(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut backend = lock(&state);
    let before = backend.employees.len();
    backend.employees.retain(|e| e.id.as_i64() != id);
    if backend.employees.len() == before {
        return not_found("employee", id);
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_payroll(State(state): State<Shared>) -> Json<Vec<PayrollEntry>> {
    Json(lock(&state).payroll.clone())
}

async fn create_payroll(State(state): State<Shared>, Json(input): Json<PayrollInput>) -> Response {
    let mut backend = lock(&state);
    let entry = build_payroll(PayrollEntryId::new(backend.next_id()), &input);
    backend.payroll.push(entry.clone());
    (StatusCode::CREATED, Json(entry)).into_response()
}

async fn update_payroll(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(input): Json<PayrollInput>,
) -> Response {
    let mut backend = lock(&state);
    match backend.payroll.iter_mut().find(|p| p.id.as_i64() == id) {
        Some(slot) => {
            *slot = build_payroll(slot.id, &input);
            Json(slot.clone()).into_response()
        }
        None => not_found("payroll entry", id),
    }
}

async fn delete_payroll(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut backend = lock(&state);
    let before = backend.payroll.len();
    backend.payroll.retain(|p| p.id.as_i64() != id);
    if backend.payroll.len() == before {
        return not_found("payroll entry", id);
    }
    StatusCode::NO_CONTENT.into_response()
}
