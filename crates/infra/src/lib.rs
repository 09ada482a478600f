//! Infrastructure layer: product persistence, media blob storage and the
//! product service that composes them.

pub mod blob_store;
pub mod product_store;
pub mod service;

pub use blob_store::{BlobError, BlobStore, InMemoryBlobStore};
pub use product_store::{InMemoryProductStore, ProductOrder, ProductStore, StoreError};
pub use service::{ProductService, ServiceError};
