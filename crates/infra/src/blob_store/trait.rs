use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use stockdesk_core::ProductId;
use stockdesk_products::MediaSlot;

#[derive(Debug, Clone, Error)]
pub enum BlobError {
    #[error("upload rejected for {path}: {reason}")]
    Rejected { path: String, reason: String },

    #[error("blob storage error: {0}")]
    Storage(String),
}

/// Object storage for product media.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `path` and return a retrievable URL.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobError>;
}

#[async_trait]
impl<B> BlobStore for Arc<B>
where
    B: BlobStore + ?Sized,
{
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobError> {
        (**self).upload(path, bytes, content_type).await
    }
}

/// `products/{id}/{folder}/{unix_millis}-{file_name}`
///
/// Only the last segment of `file_name` is kept, so a client supplied name
/// cannot leave the product's folder.
pub fn media_path(
    product_id: ProductId,
    slot: MediaSlot,
    file_name: &str,
    at: DateTime<Utc>,
) -> String {
    format!(
        "products/{}/{}/{}-{}",
        product_id,
        slot.folder(),
        at.timestamp_millis(),
        storage_file_name(file_name)
    )
}

fn storage_file_name(file_name: &str) -> &str {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    match base {
        "" | "." | ".." => "file",
        name => name,
    }
}
