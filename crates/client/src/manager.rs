//! Generic manager for one remote collection.
//!
//! A [`CollectionManager`] owns everything one list screen needs: the local
//! [`Collection`], the filter, the open form, a pending delete, the latest
//! stats and a notification queue. The local cache changes only when the
//! backend confirms a write.
//!
//! Each operation comes in two shapes:
//! - an `async` method (`load`, `submit`, `confirm_delete`, `refresh_stats`)
//!   that issues the request and applies the response in one call;
//! - a `begin_*` / `finish_*` pair for callers that keep several requests in
//!   flight and apply responses in whatever order they arrive. Responses
//!   overtaken by a newer request are discarded with [`ActionError::Stale`].

use opsdesk_core::{
    Collection, Confirmation, Draft, Editable, Filter, KeyedSequencer, Notification,
    Notifications, NumericPolicy, Operation, Record, RequestSequencer, ScreenState, Ticket,
};
use tracing::instrument;

use crate::error::{ActionError, ServiceError};
use crate::service::{CollectionService, IdOf};

/// Whether the open form creates a record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode<Id> {
    Create,
    Edit(Id),
}

/// The add or edit form currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenForm<Id> {
    pub mode: FormMode<Id>,
    pub draft: Draft,
}

/// A delete waiting for the user's go-ahead; the action is the record id.
pub type PendingDelete<Id> = Confirmation<Id>;

/// A write that has been issued but not yet applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Write<Id> {
    pub ticket: Ticket,
    pub operation: Operation,
    /// Record written to; `None` for creates.
    pub target: Option<Id>,
}

/// Local mirror and edit state for one remote collection.
pub struct CollectionManager<S: CollectionService> {
    service: S,
    policy: NumericPolicy,
    state: ScreenState,
    records: Collection<S::Record>,
    stats: Option<S::Stats>,
    filter: Filter,
    form: Option<OpenForm<IdOf<S>>>,
    pending_delete: Option<PendingDelete<IdOf<S>>>,
    loads: RequestSequencer,
    stats_requests: RequestSequencer,
    writes: KeyedSequencer<IdOf<S>>,
    in_flight: usize,
    notifications: Notifications,
}

impl<S: CollectionService> std::fmt::Debug for CollectionManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionManager")
            .field("entity", &S::ENTITY)
            .field("state", &self.state)
            .field("records", &self.records.len())
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl<S: CollectionService> CollectionManager<S> {
    /// Create an idle manager with an empty collection.
    #[must_use]
    pub fn new(service: S, policy: NumericPolicy) -> Self {
        Self {
            service,
            policy,
            state: ScreenState::default(),
            records: Collection::new(),
            stats: None,
            filter: Filter::default(),
            form: None,
            pending_delete: None,
            loads: RequestSequencer::new(),
            stats_requests: RequestSequencer::new(),
            writes: KeyedSequencer::new(),
            in_flight: 0,
            notifications: Notifications::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The backend service.
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Where the screen is in its lifecycle.
    pub const fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Every cached record, in backend order followed by local creates.
    pub const fn records(&self) -> &Collection<S::Record> {
        &self.records
    }

    /// Latest summary figures, if any refresh has succeeded.
    pub const fn stats(&self) -> Option<&S::Stats> {
        self.stats.as_ref()
    }

    /// Current filter.
    pub const fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Replace the filter.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Records that match the current filter, in collection order.
    pub fn visible(&self) -> Vec<&S::Record> {
        self.records.filtered(&self.filter)
    }

    /// The open form, if any.
    pub const fn form(&self) -> Option<&OpenForm<IdOf<S>>> {
        self.form.as_ref()
    }

    /// The delete awaiting confirmation, if any.
    pub const fn pending_delete(&self) -> Option<&PendingDelete<IdOf<S>>> {
        self.pending_delete.as_ref()
    }

    /// Number of writes issued but not yet finished.
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Queued user feedback.
    pub const fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Take every queued notification, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    // =========================================================================
    // Load
    // =========================================================================

    /// Fetch the whole collection, replacing the cache, then refresh stats.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::RequestFailed`] if the fetch fails; the
    /// collection is then empty and the state is `LoadError`.
    #[instrument(skip(self), fields(entity = S::ENTITY))]
    pub async fn load(&mut self) -> Result<usize, ActionError> {
        let ticket = self.begin_load()?;
        let result = self.service.list().await;
        let count = self.finish_load(ticket, result)?;
        let _ = self.refresh_stats().await;
        Ok(count)
    }

    /// Start a load.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::InvalidState`] while a load or write is in flight.
    pub fn begin_load(&mut self) -> Result<Ticket, ActionError> {
        self.state.begin_load()?;
        Ok(self.loads.issue())
    }

    /// Apply the outcome of a load started with [`Self::begin_load`].
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Stale`] for a superseded response and
    /// [`ActionError::RequestFailed`] if the fetch failed.
    pub fn finish_load(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<S::Record>, ServiceError>,
    ) -> Result<usize, ActionError> {
        if !self.loads.accept(ticket) {
            tracing::debug!(%ticket, entity = S::ENTITY, "discarding stale load");
            return Err(ActionError::Stale(ticket));
        }

        match result {
            Ok(records) => {
                let dropped = self.records.load(records);
                if dropped > 0 {
                    tracing::warn!(dropped, entity = S::ENTITY, "backend returned duplicate ids");
                }
                self.writes.reset_keys();
                self.state.finish_load(Ok(()))?;
                tracing::info!(count = self.records.len(), entity = S::ENTITY, "loaded");
                Ok(self.records.len())
            }
            Err(err) => {
                tracing::error!(error = %err, entity = S::ENTITY, "failed to load");
                self.records.clear();
                let failure = ActionError::request_failed(Operation::Load, S::PLURAL, &err);
                self.notifications.error(failure.to_string());
                self.state.finish_load(Err(err.to_string()))?;
                Err(failure)
            }
        }
    }

    // =========================================================================
    // Stats
    // =========================================================================

    /// Recompute summary figures from the backend or the local collection.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::RequestFailed`] if the stats call fails. The
    /// failure is also queued as a warning; cached records are untouched.
    pub async fn refresh_stats(&mut self) -> Result<(), ActionError> {
        let ticket = self.stats_requests.issue();
        let result = self.service.stats(self.records.as_slice()).await;
        self.finish_stats(ticket, result)
    }

    /// Stamp a stats request for [`Self::finish_stats`].
    pub fn begin_stats(&mut self) -> Ticket {
        self.stats_requests.issue()
    }

    /// Apply the outcome of a stats request.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Stale`] for a superseded response and
    /// [`ActionError::RequestFailed`] if the call failed.
    pub fn finish_stats(
        &mut self,
        ticket: Ticket,
        result: Result<S::Stats, ServiceError>,
    ) -> Result<(), ActionError> {
        if !self.stats_requests.accept(ticket) {
            tracing::debug!(%ticket, entity = S::ENTITY, "discarding stale stats");
            return Err(ActionError::Stale(ticket));
        }
        match result {
            Ok(stats) => {
                self.stats = Some(stats);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, entity = S::ENTITY, "failed to refresh stats");
                let failure = ActionError::request_failed(Operation::RefreshStats, S::PLURAL, &err);
                self.notifications.warn(failure.to_string());
                Err(failure)
            }
        }
    }

    // =========================================================================
    // Forms
    // =========================================================================

    /// Open an empty add form, discarding any open form.
    pub fn open_create(&mut self) -> &mut Draft {
        let form = self.form.insert(OpenForm {
            mode: FormMode::Create,
            draft: Draft::for_input::<S::Input>(),
        });
        &mut form.draft
    }

    /// Open an edit form seeded from a cached record.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownRecord`] if `id` is not cached.
    pub fn open_edit(&mut self, id: IdOf<S>) -> Result<&mut Draft, ActionError> {
        let record = self.records.get(id).ok_or_else(|| unknown::<S>(id))?;
        let draft = record.to_draft();
        let form = self.form.insert(OpenForm {
            mode: FormMode::Edit(id),
            draft,
        });
        Ok(&mut form.draft)
    }

    /// Change one field of the open form.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NoOpenForm`] without a form and
    /// [`ActionError::ValidationFailed`] for a field outside the form.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), ActionError> {
        let form = self.form.as_mut().ok_or(ActionError::NoOpenForm)?;
        form.draft.set(name, value)?;
        Ok(())
    }

    /// Close the open form without submitting; its draft is discarded.
    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    // =========================================================================
    // Create / update
    // =========================================================================

    /// Validate and send the open form, then refresh stats.
    ///
    /// On success the record is applied to the cache and the form closes.
    /// On failure the form stays open with the user's input intact.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_submit`] and [`Self::finish_submit`].
    #[instrument(skip(self), fields(entity = S::ENTITY))]
    pub async fn submit(&mut self) -> Result<S::Record, ActionError> {
        let (write, input) = self.begin_submit()?;
        let result = match write.target {
            Some(id) => self.service.update(id, &input).await,
            None => self.service.create(&input).await,
        };
        let record = self.finish_submit(write, result)?;
        let _ = self.refresh_stats().await;
        Ok(record)
    }

    /// Convert the open form into a payload and mark the write in flight.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NoOpenForm`], [`ActionError::ValidationFailed`]
    /// (also queued as a notification) or [`ActionError::InvalidState`].
    pub fn begin_submit(&mut self) -> Result<(Write<IdOf<S>>, S::Input), ActionError> {
        let form = self.form.as_ref().ok_or(ActionError::NoOpenForm)?;
        let mode = form.mode;
        let input = match form.draft.to_input::<S::Input>(self.policy) {
            Ok(input) => input,
            Err(err) => {
                tracing::debug!(error = %err, entity = S::ENTITY, "form rejected");
                self.notifications.error(err.to_string());
                return Err(err.into());
            }
        };

        let (operation, target) = match mode {
            FormMode::Create => (Operation::Create, None),
            FormMode::Edit(id) => (Operation::Update, Some(id)),
        };
        self.state.begin_submit(operation)?;
        self.in_flight += 1;
        let ticket = self.writes.issue();
        Ok((
            Write {
                ticket,
                operation,
                target,
            },
            input,
        ))
    }

    /// Apply the outcome of a create or update.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Stale`] if a newer write to the same record was
    /// applied first and [`ActionError::RequestFailed`] if the call failed.
    pub fn finish_submit(
        &mut self,
        write: Write<IdOf<S>>,
        result: Result<S::Record, ServiceError>,
    ) -> Result<S::Record, ActionError> {
        self.finish_write()?;

        let record = match result {
            Ok(record) => record,
            Err(err) => return Err(self.write_failed(write.operation, &err)),
        };

        if !self.writes.accept(record.id(), write.ticket) {
            tracing::debug!(ticket = %write.ticket, id = %record.id(), "discarding stale write");
            return Err(ActionError::Stale(write.ticket));
        }

        match write.target {
            None => {
                if !self.records.apply_create(record.clone()) {
                    tracing::warn!(id = %record.id(), "create returned an id already cached");
                }
            }
            Some(_) => {
                if !self.records.apply_update(record.clone()) {
                    tracing::debug!(id = %record.id(), "updated record is no longer cached");
                }
            }
        }

        let mode = write.target.map_or(FormMode::Create, FormMode::Edit);
        if self.form.as_ref().is_some_and(|f| f.mode == mode) {
            self.form = None;
        }
        tracing::info!(id = %record.id(), operation = %write.operation, entity = S::ENTITY, "saved");
        Ok(record)
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Ask for confirmation before deleting a cached record.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownRecord`] if `id` is not cached.
    pub fn request_delete(&mut self, id: IdOf<S>) -> Result<&PendingDelete<IdOf<S>>, ActionError> {
        let record = self.records.get(id).ok_or_else(|| unknown::<S>(id))?;
        let message = format!(
            "Are you sure you want to delete {} \"{}\"?",
            S::ENTITY,
            record.label()
        );
        Ok(self.pending_delete.insert(Confirmation::new(message, id)))
    }

    /// Drop the pending delete without running it.
    pub fn dismiss_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Run the pending delete, then refresh stats.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NothingToConfirm`] without a pending delete,
    /// otherwise see [`Self::begin_delete`] and [`Self::finish_delete`]. If
    /// the delete cannot start, it stays pending.
    #[instrument(skip(self), fields(entity = S::ENTITY))]
    pub async fn confirm_delete(&mut self) -> Result<(), ActionError> {
        let id = self
            .pending_delete
            .as_ref()
            .map(|pending| pending.action)
            .ok_or(ActionError::NothingToConfirm)?;
        let write = self.begin_delete(id)?;
        self.pending_delete = None;
        let result = self.service.delete(id).await;
        self.finish_delete(write, result)?;
        let _ = self.refresh_stats().await;
        Ok(())
    }

    /// Mark a delete of `id` in flight.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::InvalidState`] before the first load finishes.
    pub fn begin_delete(&mut self, id: IdOf<S>) -> Result<Write<IdOf<S>>, ActionError> {
        self.state.begin_submit(Operation::Delete)?;
        self.in_flight += 1;
        Ok(Write {
            ticket: self.writes.issue(),
            operation: Operation::Delete,
            target: Some(id),
        })
    }

    /// Apply the outcome of a delete.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Stale`] if a newer write to the same record was
    /// applied first and [`ActionError::RequestFailed`] if the call failed.
    pub fn finish_delete(
        &mut self,
        write: Write<IdOf<S>>,
        result: Result<(), ServiceError>,
    ) -> Result<(), ActionError> {
        self.finish_write()?;

        if let Err(err) = result {
            return Err(self.write_failed(write.operation, &err));
        }
        let Some(id) = write.target else {
            return Ok(());
        };
        if !self.writes.accept(id, write.ticket) {
            tracing::debug!(ticket = %write.ticket, %id, "discarding stale delete");
            return Err(ActionError::Stale(write.ticket));
        }

        if self.records.apply_delete(id).is_none() {
            tracing::debug!(%id, "deleted record was not cached");
        }
        if self.form.as_ref().is_some_and(|f| f.mode == FormMode::Edit(id)) {
            self.form = None;
        }
        tracing::info!(%id, entity = S::ENTITY, "deleted");
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    pub(crate) fn finish_write(&mut self) -> Result<(), ActionError> {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.state.finish_submit()?;
        }
        Ok(())
    }

    fn write_failed(&mut self, operation: Operation, err: &ServiceError) -> ActionError {
        tracing::error!(error = %err, %operation, entity = S::ENTITY, "write failed");
        let failure = ActionError::request_failed(operation, S::ENTITY, err);
        self.notifications.error(failure.to_string());
        failure
    }

    /// Enter `Submitting` for a write this manager does not perform itself.
    pub(crate) fn begin_external_write(&mut self, operation: Operation) -> Result<(), ActionError> {
        self.state.begin_submit(operation)?;
        self.in_flight += 1;
        Ok(())
    }

    pub(crate) const fn records_mut(&mut self) -> &mut Collection<S::Record> {
        &mut self.records
    }

    pub(crate) const fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }
}

fn unknown<S: CollectionService>(id: IdOf<S>) -> ActionError {
    ActionError::UnknownRecord {
        entity: S::ENTITY,
        id: id.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use opsdesk_core::{
        Category, CategoryId, CategoryInput, InventoryItem, InventoryStats, ItemId, ItemInput,
        Level, StockStatus,
    };
    use rust_decimal::Decimal;

    use super::*;
    use crate::service::CategoryService;

    /// In-memory inventory backend.
    #[derive(Default)]
    pub(crate) struct FakeInventory {
        pub items: Mutex<Vec<InventoryItem>>,
        pub categories: Mutex<Vec<Category>>,
        pub next_id: Mutex<i64>,
        pub fail_with: Mutex<Option<String>>,
    }

    impl FakeInventory {
        pub fn with_items(items: Vec<InventoryItem>) -> Self {
            let next = items.iter().map(|i| i.id.as_i64()).max().unwrap_or(0);
            Self {
                items: Mutex::new(items),
                next_id: Mutex::new(next),
                ..Self::default()
            }
        }

        pub fn fail(&self, message: &str) {
            *self.fail_with.lock().unwrap() = Some(message.to_owned());
        }

        pub fn recover(&self) {
            *self.fail_with.lock().unwrap() = None;
        }

        fn check(&self) -> Result<(), ServiceError> {
            match self.fail_with.lock().unwrap().clone() {
                Some(message) => Err(ServiceError::Api {
                    status: 500,
                    message,
                }),
                None => Ok(()),
            }
        }

        fn next_id(&self) -> i64 {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        }
    }

    pub(crate) fn item(id: i64, name: &str, category: &str, quantity: i64) -> InventoryItem {
        let now = Utc::now();
        InventoryItem {
            id: ItemId::new(id),
            name: name.to_owned(),
            sku: format!("SKU-{id}"),
            category: category.to_owned(),
            unit: "pcs".to_owned(),
            quantity,
            unit_price: Decimal::ONE,
            min_quantity: 5,
            max_quantity: 100,
            status: stock_status(quantity, 5),
            supplier: None,
            location: None,
            description: None,
            created_at: now,
            last_updated: now,
        }
    }

    fn stock_status(quantity: i64, min: i64) -> StockStatus {
        if quantity <= 0 {
            StockStatus::OutOfStock
        } else if quantity < min {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    fn stored(id: i64, input: &ItemInput) -> InventoryItem {
        let now = Utc::now();
        InventoryItem {
            id: ItemId::new(id),
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
            created_at: now,
            last_updated: now,
        }
    }

    impl CollectionService for FakeInventory {
        type Input = ItemInput;
        type Record = InventoryItem;
        type Stats = InventoryStats;

        const ENTITY: &'static str = "inventory item";
        const PLURAL: &'static str = "inventory items";

        async fn list(&self) -> Result<Vec<InventoryItem>, ServiceError> {
            self.check()?;
            Ok(self.items.lock().unwrap().clone())
        }

        async fn stats(&self, _records: &[InventoryItem]) -> Result<InventoryStats, ServiceError> {
            self.check()?;
            let items = self.items.lock().unwrap();
            Ok(InventoryStats {
                total_items: i64::try_from(items.len()).unwrap(),
                total_value: items.iter().map(InventoryItem::stock_value).sum(),
                low_stock_count: 0,
                out_of_stock_count: 0,
                category_count: 0,
            })
        }

        async fn create(&self, input: &ItemInput) -> Result<InventoryItem, ServiceError> {
            self.check()?;
            let record = stored(self.next_id(), input);
            self.items.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn update(&self, id: ItemId, input: &ItemInput) -> Result<InventoryItem, ServiceError> {
            self.check()?;
            let mut items = self.items.lock().unwrap();
            let slot = items
                .iter_mut()
                .find(|i| i.id == id)
                .ok_or_else(|| ServiceError::NotFound(format!("/inventory/items/{id}")))?;
            *slot = stored(id.as_i64(), input);
            Ok(slot.clone())
        }

        async fn delete(&self, id: ItemId) -> Result<(), ServiceError> {
            self.check()?;
            self.items.lock().unwrap().retain(|i| i.id != id);
            Ok(())
        }
    }

    impl CategoryService for FakeInventory {
        async fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
            self.check()?;
            Ok(self.categories.lock().unwrap().clone())
        }

        async fn create_category(&self, input: &CategoryInput) -> Result<Category, ServiceError> {
            self.check()?;
            let category = Category {
                id: CategoryId::new(self.next_id()),
                name: input.name.clone(),
                description: input.description.clone(),
                item_count: 0,
            };
            self.categories.lock().unwrap().push(category.clone());
            Ok(category)
        }

        async fn delete_category(&self, id: CategoryId) -> Result<(), ServiceError> {
            self.check()?;
            let mut categories = self.categories.lock().unwrap();
            if let Some(category) = categories.iter().find(|c| c.id == id) {
                let name = category.name.clone();
                self.items.lock().unwrap().retain(|i| i.category != name);
            }
            categories.retain(|c| c.id != id);
            Ok(())
        }
    }

    async fn loaded(items: Vec<InventoryItem>) -> CollectionManager<FakeInventory> {
        let mut manager =
            CollectionManager::new(FakeInventory::with_items(items), NumericPolicy::ZeroOnInvalid);
        manager.load().await.unwrap();
        manager
    }

    fn fill_widget(manager: &mut CollectionManager<FakeInventory>) {
        let draft = manager.open_create();
        draft.set("name", "Widget").unwrap();
        draft.set("sku", "W1").unwrap();
        draft.set("category", "Tools").unwrap();
        draft.set("quantity", "10").unwrap();
        draft.set("unit_price", "2.50").unwrap();
    }

    #[tokio::test]
    async fn test_load_fills_collection_and_stats() {
        let manager = loaded(vec![item(1, "Bolt", "Hardware", 50), item(2, "Nut", "Hardware", 3)]).await;
        assert_eq!(manager.state(), &ScreenState::Loaded);
        assert_eq!(manager.records().len(), 2);
        assert_eq!(manager.stats().map(|s| s.total_items), Some(2));
        assert!(manager.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_failed_load_leaves_empty_usable_screen() {
        let service = FakeInventory::with_items(vec![item(1, "Bolt", "Hardware", 50)]);
        service.fail("database offline");
        let mut manager = CollectionManager::new(service, NumericPolicy::default());

        let err = manager.load().await.unwrap_err();
        assert!(matches!(err, ActionError::RequestFailed { operation: Operation::Load, .. }));
        assert!(manager.records().is_empty());
        assert!(matches!(manager.state(), ScreenState::LoadError(_)));
        let notes = manager.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes.first().map(|n| n.level), Some(Level::Error));

        manager.service().recover();
        assert_eq!(manager.load().await.unwrap(), 1);
        assert_eq!(manager.state(), &ScreenState::Loaded);
    }

    #[tokio::test]
    async fn test_add_item_scenario() {
        let mut manager = loaded(Vec::new()).await;
        fill_widget(&mut manager);

        let created = manager.submit().await.unwrap();
        assert_eq!(created.quantity, 10);
        assert_eq!(created.unit_price, Decimal::new(250, 2));
        assert_eq!(manager.records().len(), 1);
        assert_eq!(manager.records().as_slice().last().map(|i| i.id), Some(created.id));
        assert!(manager.form().is_none());
        assert_eq!(manager.state(), &ScreenState::Loaded);
        assert_eq!(manager.stats().map(|s| s.total_items), Some(1));
    }

    #[tokio::test]
    async fn test_create_appends_to_end() {
        let mut manager = loaded(vec![item(1, "Bolt", "Hardware", 50)]).await;
        fill_widget(&mut manager);
        let created = manager.submit().await.unwrap();
        let ids: Vec<_> = manager.records().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![ItemId::new(1), created.id]);
    }

    #[tokio::test]
    async fn test_create_with_cached_id_replaces_in_place() {
        let mut manager = loaded(vec![item(1, "Bolt", "Hardware", 50), item(2, "Nut", "Hardware", 30)]).await;
        *manager.service().next_id.lock().unwrap() = 0;
        fill_widget(&mut manager);

        let created = manager.submit().await.unwrap();
        assert_eq!(created.id, ItemId::new(1));
        let names: Vec<_> = manager.records().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Widget", "Nut"]);
        assert!(manager.form().is_none());
    }

    #[tokio::test]
    async fn test_invalid_quantity_becomes_zero() {
        let mut manager = loaded(Vec::new()).await;
        fill_widget(&mut manager);
        manager.set_field("quantity", "abc").unwrap();
        let created = manager.submit().await.unwrap();
        assert_eq!(created.quantity, 0);
        assert_eq!(created.status, StockStatus::OutOfStock);
    }

    #[tokio::test]
    async fn test_strict_policy_keeps_form_open() {
        let mut manager =
            CollectionManager::new(FakeInventory::default(), NumericPolicy::Strict);
        manager.load().await.unwrap();
        fill_widget(&mut manager);
        manager.set_field("quantity", "ten").unwrap();

        let err = manager.submit().await.unwrap_err();
        assert!(matches!(err, ActionError::ValidationFailed(_)));
        assert_eq!(manager.form().and_then(|f| f.draft.get("quantity")), Some("ten"));
        assert_eq!(manager.state(), &ScreenState::Loaded);
        assert_eq!(manager.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_missing_required_field_is_rejected_without_request() {
        let mut manager = loaded(Vec::new()).await;
        let draft = manager.open_create();
        draft.set("name", "Widget").unwrap();

        let err = manager.submit().await.unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all required fields");
        assert!(manager.service().items.lock().unwrap().is_empty());
        let notes = manager.drain_notifications();
        assert_eq!(
            notes.first().map(|n| n.message.as_str()),
            Some("Please fill in all required fields")
        );
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let mut manager = loaded(vec![
            item(1, "Bolt", "Hardware", 50),
            item(2, "Nut", "Hardware", 30),
            item(3, "Screw", "Hardware", 20),
        ])
        .await;

        let draft = manager.open_edit(ItemId::new(2)).unwrap();
        assert_eq!(draft.get("name"), Some("Nut"));
        draft.set("name", "Hex Nut").unwrap();
        manager.submit().await.unwrap();

        let names: Vec<_> = manager.records().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Bolt", "Hex Nut", "Screw"]);
        assert!(manager.form().is_none());
    }

    #[tokio::test]
    async fn test_failed_update_keeps_cache_and_draft() {
        let mut manager = loaded(vec![item(1, "Bolt", "Hardware", 50)]).await;
        manager.open_edit(ItemId::new(1)).unwrap().set("name", "Big Bolt").unwrap();
        manager.service().fail("conflict");

        let err = manager.submit().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Update inventory item failed: API error: 500 - conflict"
        );
        assert_eq!(manager.records().get(ItemId::new(1)).map(|i| i.name.as_str()), Some("Bolt"));
        assert_eq!(manager.form().and_then(|f| f.draft.get("name")), Some("Big Bolt"));
        assert_eq!(manager.state(), &ScreenState::Loaded);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let mut manager = loaded(vec![item(1, "Bolt", "Hardware", 50), item(2, "Nut", "Hardware", 30)]).await;

        let confirm = manager.request_delete(ItemId::new(1)).unwrap();
        assert_eq!(confirm.message, "Are you sure you want to delete inventory item \"Bolt\"?");
        manager.dismiss_delete();
        assert!(matches!(
            manager.confirm_delete().await,
            Err(ActionError::NothingToConfirm)
        ));
        assert_eq!(manager.records().len(), 2);

        manager.request_delete(ItemId::new(1)).unwrap();
        manager.confirm_delete().await.unwrap();
        assert!(!manager.records().contains(ItemId::new(1)));
        assert_eq!(manager.records().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_during_load_stays_pending() {
        let mut manager = loaded(vec![item(1, "Bolt", "Hardware", 50)]).await;
        manager.request_delete(ItemId::new(1)).unwrap();
        let ticket = manager.begin_load().unwrap();

        assert!(matches!(
            manager.confirm_delete().await,
            Err(ActionError::InvalidState(_))
        ));
        assert_eq!(manager.pending_delete().map(|p| p.action), Some(ItemId::new(1)));

        manager.finish_load(ticket, Ok(vec![item(1, "Bolt", "Hardware", 50)])).unwrap();
        manager.confirm_delete().await.unwrap();
        assert!(manager.records().is_empty());
        assert!(manager.pending_delete().is_none());
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_record() {
        let mut manager = loaded(vec![item(1, "Bolt", "Hardware", 50)]).await;
        manager.request_delete(ItemId::new(1)).unwrap();
        manager.service().fail("locked");

        assert!(manager.confirm_delete().await.is_err());
        assert!(manager.records().contains(ItemId::new(1)));
        assert_eq!(manager.drain_notifications().len(), 1);
    }

    #[tokio::test]
    async fn test_request_delete_of_unknown_record() {
        let mut manager = loaded(Vec::new()).await;
        assert!(matches!(
            manager.request_delete(ItemId::new(9)),
            Err(ActionError::UnknownRecord { .. })
        ));
    }

    #[tokio::test]
    async fn test_filter_by_status_scenario() {
        let mut manager = loaded(vec![
            item(1, "Bolt", "Hardware", 50),
            item(2, "Nut", "Hardware", 2),
            item(3, "Paint", "Finishes", 0),
        ])
        .await;
        manager.set_filter(Filter::new("", "low_stock", "all"));
        let visible: Vec<_> = manager.visible().iter().map(|i| i.id).collect();
        assert_eq!(visible, vec![ItemId::new(2)]);
    }

    #[tokio::test]
    async fn test_submit_before_load_is_invalid() {
        let mut manager = CollectionManager::new(FakeInventory::default(), NumericPolicy::default());
        fill_widget(&mut manager);
        assert!(matches!(
            manager.submit().await,
            Err(ActionError::InvalidState(_))
        ));
        assert!(manager.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_order_updates_to_same_record() {
        let mut manager = loaded(vec![item(1, "Bolt", "Hardware", 50)]).await;

        manager.open_edit(ItemId::new(1)).unwrap().set("name", "First").unwrap();
        let (first, _) = manager.begin_submit().unwrap();
        manager.open_edit(ItemId::new(1)).unwrap().set("name", "Second").unwrap();
        let (second, _) = manager.begin_submit().unwrap();
        assert_eq!(manager.in_flight(), 2);

        manager.finish_submit(second, Ok(item(1, "Second", "Hardware", 50))).unwrap();
        assert!(matches!(manager.state(), ScreenState::Submitting(_)));
        let stale = manager.finish_submit(first, Ok(item(1, "First", "Hardware", 50)));
        assert!(matches!(stale, Err(ActionError::Stale(_))));

        assert_eq!(manager.records().get(ItemId::new(1)).map(|i| i.name.as_str()), Some("Second"));
        assert_eq!(manager.state(), &ScreenState::Loaded);
    }

    #[tokio::test]
    async fn test_out_of_order_writes_to_different_records_both_apply() {
        let mut manager = loaded(vec![item(1, "Bolt", "Hardware", 50), item(2, "Nut", "Hardware", 30)]).await;

        manager.open_edit(ItemId::new(1)).unwrap().set("name", "Bolt v2").unwrap();
        let (first, _) = manager.begin_submit().unwrap();
        let second = manager.begin_delete(ItemId::new(2)).unwrap();

        manager.finish_delete(second, Ok(())).unwrap();
        manager.finish_submit(first, Ok(item(1, "Bolt v2", "Hardware", 50))).unwrap();

        let names: Vec<_> = manager.records().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Bolt v2"]);
    }

    #[tokio::test]
    async fn test_stale_stats_are_discarded() {
        let mut manager = loaded(Vec::new()).await;
        let older = manager.begin_stats();
        let newer = manager.begin_stats();
        let figures = |total_items| InventoryStats {
            total_items,
            ..InventoryStats::default()
        };

        manager.finish_stats(newer, Ok(figures(7))).unwrap();
        assert!(matches!(
            manager.finish_stats(older, Ok(figures(3))),
            Err(ActionError::Stale(_))
        ));
        assert_eq!(manager.stats().map(|s| s.total_items), Some(7));
    }

    #[tokio::test]
    async fn test_stats_failure_after_write_is_a_warning() {
        let mut manager = loaded(Vec::new()).await;
        fill_widget(&mut manager);
        let (write, input) = manager.begin_submit().unwrap();
        let created = manager.service().create(&input).await;
        manager.finish_submit(write, created).unwrap();

        let ticket = manager.begin_stats();
        let failure = ServiceError::Api {
            status: 503,
            message: "stats unavailable".to_owned(),
        };
        assert!(manager.finish_stats(ticket, Err(failure)).is_err());

        assert_eq!(manager.records().len(), 1);
        let notes = manager.drain_notifications();
        assert_eq!(notes.first().map(|n| n.level), Some(Level::Warning));
        assert_eq!(
            notes.first().map(|n| n.message.as_str()),
            Some("Refresh stats for inventory items failed: API error: 503 - stats unavailable")
        );
    }

    #[tokio::test]
    async fn test_cancel_discards_draft() {
        let mut manager = loaded(Vec::new()).await;
        fill_widget(&mut manager);
        manager.cancel_form();
        assert!(manager.form().is_none());
        assert!(matches!(manager.submit().await, Err(ActionError::NoOpenForm)));
        assert!(manager.open_create().is_pristine());
    }
}
