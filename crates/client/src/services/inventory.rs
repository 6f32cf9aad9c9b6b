//! Inventory items, categories and stats.
//!
//! # Endpoints
//!
//! - `GET    /inventory/items`
//! - `POST   /inventory/items`
//! - `PUT    /inventory/items/{id}`
//! - `DELETE /inventory/items/{id}`
//! - `GET    /inventory/stats`
//! - `GET    /inventory/categories`
//! - `POST   /inventory/categories`
//! - `DELETE /inventory/categories/{id}`

use opsdesk_core::{
    Category, CategoryId, CategoryInput, InventoryItem, InventoryStats, ItemId, ItemInput,
};
use tracing::instrument;

use crate::error::ServiceError;
use crate::http::ApiClient;
use crate::service::{CategoryService, CollectionService};

/// Inventory backend.
#[derive(Debug, Clone)]
pub struct InventoryService {
    client: ApiClient,
}

impl InventoryService {
    /// Wrap a backend client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl CollectionService for InventoryService {
    type Input = ItemInput;
    type Record = InventoryItem;
    type Stats = InventoryStats;

    const ENTITY: &'static str = "inventory item";
    const PLURAL: &'static str = "inventory items";

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<InventoryItem>, ServiceError> {
        self.client.get("/inventory/items").await
    }

    #[instrument(skip_all)]
    async fn stats(&self, _records: &[InventoryItem]) -> Result<InventoryStats, ServiceError> {
        self.client.get("/inventory/stats").await
    }

    #[instrument(skip(self, input), fields(sku = %input.sku))]
    async fn create(&self, input: &ItemInput) -> Result<InventoryItem, ServiceError> {
        self.client.post("/inventory/items", input).await
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: ItemId, input: &ItemInput) -> Result<InventoryItem, ServiceError> {
        self.client.put(&format!("/inventory/items/{id}"), input).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ItemId) -> Result<(), ServiceError> {
        self.client.delete(&format!("/inventory/items/{id}")).await
    }
}

impl CategoryService for InventoryService {
    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        self.client.get("/inventory/categories").await
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create_category(&self, input: &CategoryInput) -> Result<Category, ServiceError> {
        self.client.post("/inventory/categories", input).await
    }

    #[instrument(skip(self))]
    async fn delete_category(&self, id: CategoryId) -> Result<(), ServiceError> {
        self.client.delete(&format!("/inventory/categories/{id}")).await
    }
}
