use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use stockdesk_core::ProductId;
use stockdesk_products::{ProductPatch, ProductRecord};

use super::r#trait::{ProductOrder, ProductStore, StoreError};

/// In-memory product store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    records: RwLock<HashMap<ProductId, ProductRecord>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-built records, e.g. seed data.
    pub fn with_records(records: impl IntoIterator<Item = ProductRecord>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(|r| (r.id, r)).collect()),
        }
    }
}

fn poisoned() -> StoreError {
    StoreError::Storage("lock poisoned".to_string())
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn create(&self, record: ProductRecord) -> Result<ProductId, StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        if records.contains_key(&record.id) {
            return Err(StoreError::AlreadyExists(record.id));
        }
        let id = record.id;
        records.insert(id, record);
        Ok(id)
    }

    async fn get(&self, id: ProductId) -> Result<Option<ProductRecord>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(&id).cloned())
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let record = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        patch.apply(record);
        Ok(())
    }

    async fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(&self, order: ProductOrder) -> Result<Vec<ProductRecord>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        let mut list: Vec<ProductRecord> = records.values().cloned().collect();
        // v7 ids are time-ordered, so they break created_at ties consistently
        list.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        if order == ProductOrder::CreatedAtDesc {
            list.reverse();
        }
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use stockdesk_products::{
        MediaUrls, PickupMethods, ProductStatus, ProductType,
    };

    fn record(name: &str, minutes_ago: i64) -> ProductRecord {
        let at = Utc::now() - Duration::minutes(minutes_ago);
        ProductRecord {
            id: ProductId::new(),
            name: name.to_string(),
            sku: None,
            description: String::new(),
            product_type: ProductType::Single,
            price: 1_000,
            stock: 2,
            min_order: 1,
            sales: 0,
            pickup_methods: PickupMethods {
                self_pickup: true,
                home_delivery: false,
            },
            pickup_location: None,
            shipping_fee: None,
            media: MediaUrls::default(),
            status: ProductStatus::Active,
            created_at: at,
            updated_at: at,
            variant_groups: None,
            variant_combinations: None,
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = InMemoryProductStore::new();
        let product = record("Mug", 0);
        let id = store.create(product.clone()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), Some(product));
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected() {
        let store = InMemoryProductStore::new();
        let product = record("Mug", 0);
        store.create(product.clone()).await.unwrap();
        assert!(matches!(
            store.create(product).await,
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn list_orders_by_creation_time() {
        let old = record("old", 30);
        let mid = record("mid", 20);
        let new = record("new", 10);
        let store = InMemoryProductStore::with_records([mid, new, old]);

        let names = |list: Vec<ProductRecord>| list.into_iter().map(|r| r.name).collect::<Vec<_>>();
        assert_eq!(
            names(store.list(ProductOrder::CreatedAtDesc).await.unwrap()),
            ["new", "mid", "old"]
        );
        assert_eq!(
            names(store.list(ProductOrder::CreatedAtAsc).await.unwrap()),
            ["old", "mid", "new"]
        );
    }

    #[tokio::test]
    async fn update_applies_patch() {
        let store = InMemoryProductStore::new();
        let id = store.create(record("Mug", 0)).await.unwrap();

        store
            .update(id, ProductPatch::stock(0, Utc::now()))
            .await
            .unwrap();

        let stored = store.get(id).await.unwrap().unwrap();
        assert_eq!(stored.stock, 0);
        assert_eq!(stored.status, ProductStatus::OutOfStock);
    }

    #[tokio::test]
    async fn update_and_delete_missing_record_are_not_found() {
        let store = InMemoryProductStore::new();
        let missing = ProductId::new();
        assert!(matches!(
            store.update(missing, ProductPatch::default()).await,
            Err(StoreError::NotFound(id)) if id == missing
        ));
        assert!(matches!(
            store.delete(missing).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let store = InMemoryProductStore::new();
        let id = store.create(record("Mug", 0)).await.unwrap();
        store.delete(id).await.unwrap();
        assert!(store.get(id).await.unwrap().is_none());
        assert!(store.list(ProductOrder::default()).await.unwrap().is_empty());
    }
}
