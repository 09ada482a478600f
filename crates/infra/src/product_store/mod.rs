//! Product persistence boundary.
//!
//! The service layer talks to [`ProductStore`]; backends plug in behind it.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use r#trait::{ProductOrder, ProductStore, StoreError};
