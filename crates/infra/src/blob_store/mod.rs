//! Media blob storage boundary.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::{InMemoryBlobStore, StoredBlob, DEFAULT_BASE_URL};
pub use r#trait::{media_path, BlobError, BlobStore};
