use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stockdesk_core::ProductId;
use stockdesk_products::{ProductPatch, ProductRecord};

/// Listing order for [`ProductStore::list`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ProductOrder {
    /// Newest first.
    #[default]
    CreatedAtDesc,
    CreatedAtAsc,
}

/// Product persistence error.
///
/// Infrastructure failures only; domain validation happens before a record
/// ever reaches the store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("product not found: {0}")]
    NotFound(ProductId),

    #[error("product already exists: {0}")]
    AlreadyExists(ProductId),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Persistence gateway for product documents.
///
/// Writes are last-writer-wins; no concurrency control is applied to stock.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persist a new record and return its id.
    async fn create(&self, record: ProductRecord) -> Result<ProductId, StoreError>;

    async fn get(&self, id: ProductId) -> Result<Option<ProductRecord>, StoreError>;

    /// Apply a partial update. `NotFound` when the record is absent.
    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<(), StoreError>;

    /// `NotFound` when the record is absent.
    async fn delete(&self, id: ProductId) -> Result<(), StoreError>;

    async fn list(&self, order: ProductOrder) -> Result<Vec<ProductRecord>, StoreError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn create(&self, record: ProductRecord) -> Result<ProductId, StoreError> {
        (**self).create(record).await
    }

    async fn get(&self, id: ProductId) -> Result<Option<ProductRecord>, StoreError> {
        (**self).get(id).await
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<(), StoreError> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        (**self).delete(id).await
    }

    async fn list(&self, order: ProductOrder) -> Result<Vec<ProductRecord>, StoreError> {
        (**self).list(order).await
    }
}
