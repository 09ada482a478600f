use std::sync::Arc;

use stockdesk_infra::{BlobStore, InMemoryBlobStore, InMemoryProductStore, ProductService, ProductStore};

use crate::config::ApiConfig;

pub type AppServices = ProductService<Arc<dyn ProductStore>, Arc<dyn BlobStore>>;

/// Wire the in-memory product and blob stores behind the product service.
pub fn build_services(config: &ApiConfig) -> AppServices {
    let store: Arc<dyn ProductStore> = Arc::new(InMemoryProductStore::new());
    let blobs: Arc<dyn BlobStore> = Arc::new(InMemoryBlobStore::new(config.blob_base_url.clone()));

    tracing::info!(blob_base_url = %config.blob_base_url, "product services wired (in-memory)");
    ProductService::new(store, blobs)
}
