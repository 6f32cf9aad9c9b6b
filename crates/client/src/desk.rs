//! Inventory screen: items plus the category sub-resource.
//!
//! Categories are referenced from items by name. Deleting a category also
//! deletes, locally and on the backend, every item filed under that name.

use opsdesk_core::{
    Category, CategoryId, CategoryInput, Collection, Confirmation, Draft, InventoryItem,
    NumericPolicy, Operation, RequestSequencer, Ticket,
};
use tracing::instrument;

use crate::error::{ActionError, ServiceError};
use crate::manager::CollectionManager;
use crate::service::CategoryService;

const CATEGORY: &str = "category";
const CATEGORIES: &str = "categories";

/// Inventory items and categories behind one screen.
pub struct InventoryDesk<S: CategoryService<Record = InventoryItem>> {
    items: CollectionManager<S>,
    policy: NumericPolicy,
    categories: Collection<Category>,
    category_form: Option<Draft>,
    pending_category_delete: Option<Confirmation<CategoryId>>,
    category_loads: RequestSequencer,
}

impl<S: CategoryService<Record = InventoryItem>> std::fmt::Debug for InventoryDesk<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryDesk")
            .field("items", &self.items)
            .field("categories", &self.categories.len())
            .finish_non_exhaustive()
    }
}

impl<S: CategoryService<Record = InventoryItem>> InventoryDesk<S> {
    /// Create an idle desk.
    #[must_use]
    pub fn new(service: S, policy: NumericPolicy) -> Self {
        Self {
            items: CollectionManager::new(service, policy),
            policy,
            categories: Collection::new(),
            category_form: None,
            pending_category_delete: None,
            category_loads: RequestSequencer::new(),
        }
    }

    /// The item manager.
    pub const fn items(&self) -> &CollectionManager<S> {
        &self.items
    }

    /// The item manager, for forms, filters and item writes.
    pub const fn items_mut(&mut self) -> &mut CollectionManager<S> {
        &mut self.items
    }

    /// Cached categories.
    pub const fn categories(&self) -> &Collection<Category> {
        &self.categories
    }

    /// Category names in display order, for the category dropdown.
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// The open category form, if any.
    pub const fn category_form(&self) -> Option<&Draft> {
        self.category_form.as_ref()
    }

    /// The category delete awaiting confirmation, if any.
    pub const fn pending_category_delete(&self) -> Option<&Confirmation<CategoryId>> {
        self.pending_category_delete.as_ref()
    }

    /// Load items, stats and categories.
    ///
    /// Categories are fetched even when the item load fails.
    ///
    /// # Errors
    ///
    /// Returns the item load error if any, else the category load error.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<usize, ActionError> {
        let items = self.items.load().await;
        let categories = self.load_categories().await;
        let count = items?;
        categories?;
        Ok(count)
    }

    /// Fetch every category, replacing the cached ones.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::RequestFailed`] on failure; the cached
    /// categories are then empty.
    pub async fn load_categories(&mut self) -> Result<usize, ActionError> {
        let ticket = self.category_loads.issue();
        let result = self.items.service().list_categories().await;
        self.finish_categories(ticket, result)
    }

    fn finish_categories(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Category>, ServiceError>,
    ) -> Result<usize, ActionError> {
        if !self.category_loads.accept(ticket) {
            return Err(ActionError::Stale(ticket));
        }
        match result {
            Ok(categories) => {
                self.categories.load(categories);
                Ok(self.categories.len())
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load categories");
                self.categories.clear();
                let failure = ActionError::request_failed(Operation::Load, CATEGORIES, &err);
                self.items.notifications_mut().error(failure.to_string());
                Err(failure)
            }
        }
    }

    /// Open an empty category form.
    pub fn open_category_form(&mut self) -> &mut Draft {
        self.category_form.insert(Draft::for_input::<CategoryInput>())
    }

    /// Close the category form without submitting.
    pub fn cancel_category_form(&mut self) {
        self.category_form = None;
    }

    /// Validate and send the category form, then refresh stats.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NoOpenForm`], [`ActionError::ValidationFailed`],
    /// [`ActionError::InvalidState`] or [`ActionError::RequestFailed`].
    #[instrument(skip(self))]
    pub async fn submit_category(&mut self) -> Result<Category, ActionError> {
        let draft = self.category_form.as_ref().ok_or(ActionError::NoOpenForm)?;
        let input = match draft.to_input::<CategoryInput>(self.policy) {
            Ok(input) => input,
            Err(err) => {
                self.items.notifications_mut().error(err.to_string());
                return Err(err.into());
            }
        };

        self.items.begin_external_write(Operation::CreateCategory)?;
        let result = self.items.service().create_category(&input).await;
        self.items.finish_write()?;

        let category = result.map_err(|err| self.category_failed(Operation::CreateCategory, &err))?;
        self.categories.apply_create(category.clone());
        self.category_form = None;
        tracing::info!(id = %category.id, name = %category.name, "category created");
        let _ = self.items.refresh_stats().await;
        Ok(category)
    }

    /// Ask for confirmation before deleting a category and its items.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownRecord`] if `id` is not cached.
    pub fn request_category_delete(
        &mut self,
        id: CategoryId,
    ) -> Result<&Confirmation<CategoryId>, ActionError> {
        let category = self
            .categories
            .get(id)
            .ok_or_else(|| ActionError::UnknownRecord {
                entity: CATEGORY,
                id: id.to_string(),
            })?;
        let message = format!(
            "Are you sure you want to delete category \"{}\"? All items in this category will also be deleted.",
            category.name
        );
        Ok(self
            .pending_category_delete
            .insert(Confirmation::new(message, id)))
    }

    /// Drop the pending category delete without running it.
    pub fn dismiss_category_delete(&mut self) {
        self.pending_category_delete = None;
    }

    /// Run the pending category delete.
    ///
    /// On success the category and every cached item whose category equals
    /// its name are removed; returns how many items were removed.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NothingToConfirm`], [`ActionError::InvalidState`]
    /// or [`ActionError::RequestFailed`]; on failure nothing is removed.
    #[instrument(skip(self))]
    pub async fn confirm_category_delete(&mut self) -> Result<usize, ActionError> {
        let id = self
            .pending_category_delete
            .as_ref()
            .map(|pending| pending.action)
            .ok_or(ActionError::NothingToConfirm)?;

        self.items.begin_external_write(Operation::DeleteCategory)?;
        self.pending_category_delete = None;
        let result = self.items.service().delete_category(id).await;
        self.items.finish_write()?;
        result.map_err(|err| self.category_failed(Operation::DeleteCategory, &err))?;

        let removed = self
            .categories
            .apply_delete(id)
            .map_or(0, |category| {
                self.items
                    .records_mut()
                    .remove_where(|item| item.category == category.name)
            });
        tracing::info!(%id, removed, "category deleted");
        let _ = self.items.refresh_stats().await;
        Ok(removed)
    }

    fn category_failed(&mut self, operation: Operation, err: &ServiceError) -> ActionError {
        tracing::error!(error = %err, %operation, "category write failed");
        let failure = ActionError::request_failed(operation, CATEGORY, err);
        self.items.notifications_mut().error(failure.to_string());
        failure
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use opsdesk_core::{Level, ScreenState};

    use super::*;
    use crate::manager::tests::{FakeInventory, item};

    fn category(id: i64, name: &str) -> Category {
        Category {
            id: CategoryId::new(id),
            name: name.to_owned(),
            description: None,
            item_count: 0,
        }
    }

    async fn desk() -> InventoryDesk<FakeInventory> {
        let service = FakeInventory::with_items(vec![
            item(1, "Hammer", "Tools", 10),
            item(2, "Primer", "Paint", 4),
            item(3, "Wrench", "Tools", 8),
        ]);
        *service.categories.lock().unwrap() = vec![category(10, "Tools"), category(11, "Paint")];
        *service.next_id.lock().unwrap() = 20;
        let mut desk = InventoryDesk::new(service, NumericPolicy::default());
        desk.load().await.unwrap();
        desk
    }

    #[tokio::test]
    async fn test_load_fetches_items_and_categories() {
        let desk = desk().await;
        assert_eq!(desk.items().records().len(), 3);
        assert_eq!(desk.category_names(), vec!["Tools", "Paint"]);
    }

    #[tokio::test]
    async fn test_category_delete_cascades_to_items() {
        let mut desk = desk().await;
        let confirm = desk.request_category_delete(CategoryId::new(10)).unwrap();
        assert!(confirm.message.contains("\"Tools\""));

        let removed = desk.confirm_category_delete().await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(desk.category_names(), vec!["Paint"]);
        let remaining: Vec<_> = desk.items().records().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(remaining, vec!["Primer"]);
        assert!(desk.items().records().iter().all(|i| i.category != "Tools"));
        assert_eq!(desk.items().state(), &ScreenState::Loaded);
    }

    #[tokio::test]
    async fn test_failed_category_delete_changes_nothing() {
        let mut desk = desk().await;
        desk.request_category_delete(CategoryId::new(11)).unwrap();
        desk.items().service().fail("in use");

        let err = desk.confirm_category_delete().await.unwrap_err();
        assert_eq!(err.to_string(), "Delete category failed: API error: 500 - in use");
        assert_eq!(desk.categories().len(), 2);
        assert_eq!(desk.items().records().len(), 3);
        let notes = desk.items_mut().drain_notifications();
        assert_eq!(notes.first().map(|n| n.level), Some(Level::Error));
    }

    #[tokio::test]
    async fn test_category_delete_during_load_stays_pending() {
        let mut desk = desk().await;
        desk.request_category_delete(CategoryId::new(10)).unwrap();
        desk.items_mut().begin_load().unwrap();

        assert!(matches!(
            desk.confirm_category_delete().await,
            Err(ActionError::InvalidState(_))
        ));
        assert_eq!(
            desk.pending_category_delete().map(|p| p.action),
            Some(CategoryId::new(10))
        );
        assert_eq!(desk.categories().len(), 2);
    }

    #[tokio::test]
    async fn test_dismissed_category_delete_does_not_run() {
        let mut desk = desk().await;
        desk.request_category_delete(CategoryId::new(10)).unwrap();
        desk.dismiss_category_delete();
        assert!(matches!(
            desk.confirm_category_delete().await,
            Err(ActionError::NothingToConfirm)
        ));
        assert_eq!(desk.categories().len(), 2);
    }

    #[tokio::test]
    async fn test_create_category() {
        let mut desk = desk().await;
        desk.open_category_form().set("name", "Garden").unwrap();
        let created = desk.submit_category().await.unwrap();
        assert_eq!(created.name, "Garden");
        assert_eq!(desk.category_names(), vec!["Tools", "Paint", "Garden"]);
        assert!(desk.category_form().is_none());
    }

    #[tokio::test]
    async fn test_blank_category_name_is_rejected() {
        let mut desk = desk().await;
        desk.open_category_form();
        let err = desk.submit_category().await.unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all required fields");
        assert!(desk.category_form().is_some());
        assert_eq!(desk.categories().len(), 2);
    }
}
