//! Per-domain backend operations.
//!
//! [`CollectionService`] is the seam between a [`crate::CollectionManager`]
//! and the network. The HTTP implementations live in [`crate::services`];
//! tests substitute in-memory fakes.

use std::future::Future;

use opsdesk_core::{Category, CategoryId, CategoryInput, DraftInput, Editable, Record, Searchable};
use serde::Serialize;

use crate::error::ServiceError;

/// Record identifier of a service.
pub type IdOf<S> = <<S as CollectionService>::Record as Record>::Id;

/// Backend operations for one remote collection.
pub trait CollectionService: Send + Sync {
    /// Payload of create and update calls.
    type Input: DraftInput + Serialize + Send + Sync;
    /// Records of the collection.
    type Record: Editable<Input = Self::Input> + Searchable + Send + Sync;
    /// Summary figures shown above the list.
    type Stats: Send;

    /// Singular name used in messages, e.g. `"inventory item"`.
    const ENTITY: &'static str;
    /// Plural name used in messages, e.g. `"inventory items"`.
    const PLURAL: &'static str;

    /// Fetch every record.
    fn list(&self) -> impl Future<Output = Result<Vec<Self::Record>, ServiceError>> + Send;

    /// Fetch or compute summary figures.
    ///
    /// `records` is the current local collection, for services that reduce
    /// locally instead of calling a stats endpoint.
    fn stats(
        &self,
        records: &[Self::Record],
    ) -> impl Future<Output = Result<Self::Stats, ServiceError>> + Send;

    /// Create a record; returns the stored record with its assigned id.
    fn create(
        &self,
        input: &Self::Input,
    ) -> impl Future<Output = Result<Self::Record, ServiceError>> + Send;

    /// Replace the editable fields of a record; returns the stored record.
    fn update(
        &self,
        id: IdOf<Self>,
        input: &Self::Input,
    ) -> impl Future<Output = Result<Self::Record, ServiceError>> + Send;

    /// Delete a record.
    fn delete(&self, id: IdOf<Self>) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

/// Category sub-resource of the inventory backend.
pub trait CategoryService: CollectionService {
    /// Fetch every category.
    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>, ServiceError>> + Send;

    /// Create a category.
    fn create_category(
        &self,
        input: &CategoryInput,
    ) -> impl Future<Output = Result<Category, ServiceError>> + Send;

    /// Delete a category. The backend also deletes the items filed under it.
    fn delete_category(
        &self,
        id: CategoryId,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;
}
