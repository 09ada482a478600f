//! Product application service.
//!
//! Composes a [`ProductStore`] and a [`BlobStore`] into the operations the
//! admin panel needs:
//!
//! ```text
//! create:  draft -> validate -> totals -> upload media -> persist record
//! list:    store (newest first) -> tab / search / sort / page
//! stock:   patch { stock, status, updated_at }
//! delete:  remove record
//! ```
//!
//! Media is uploaded before the record is written. An upload failure aborts
//! creation; blobs uploaded before the failure are left in place.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, instrument};

use stockdesk_core::{DomainError, ProductId};
use stockdesk_products::{
    validate_form, CatalogPage, CatalogQuery, FormValidation, MediaSlot, MediaUrls, ProductDraft,
    ProductPatch, ProductRecord, ProductStatus,
};

use crate::blob_store::{media_path, BlobError, BlobStore};
use crate::product_store::{ProductOrder, ProductStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The draft failed form validation.
    #[error("validation failed")]
    Invalid(FormValidation),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("product not found: {0}")]
    NotFound(ProductId),

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Blob(#[from] BlobError),
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            other => ServiceError::Store(other),
        }
    }
}

#[derive(Debug)]
pub struct ProductService<S, B> {
    store: S,
    blobs: B,
}

impl<S, B> ProductService<S, B> {
    pub fn new(store: S, blobs: B) -> Self {
        Self { store, blobs }
    }
}

impl<S, B> ProductService<S, B>
where
    S: ProductStore,
    B: BlobStore,
{
    /// Validate, upload media and persist a new product.
    #[instrument(
        skip(self, draft),
        fields(product_type = ?draft.product_type()),
        err
    )]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<ProductId, ServiceError> {
        let report = validate_form(draft);
        if !report.is_valid() {
            return Err(ServiceError::Invalid(report));
        }
        let totals = draft.submission_totals()?;

        let id = ProductId::new();
        let now = Utc::now();
        let media = self.upload_media(id, draft, now).await?;

        let (variant_groups, variant_combinations) = if draft.has_variants() {
            let variants = draft.variants();
            (
                Some(variants.groups().to_vec()),
                Some(variants.combinations().to_vec()),
            )
        } else {
            (None, None)
        };

        let record = ProductRecord {
            id,
            name: draft.name().trim().to_string(),
            sku: non_empty(draft.sku()),
            description: draft.description().trim().to_string(),
            product_type: draft.product_type(),
            price: totals.price,
            stock: totals.stock,
            min_order: draft.min_order(),
            sales: 0,
            pickup_methods: draft.pickup_methods(),
            pickup_location: non_empty(draft.pickup_location()),
            shipping_fee: non_empty(draft.shipping_fee()),
            media,
            status: ProductStatus::for_stock(totals.stock),
            created_at: now,
            updated_at: now,
            variant_groups,
            variant_combinations,
        };

        let id = self.store.create(record).await?;
        info!(product_id = %id, price = totals.price, stock = totals.stock, "product created");
        Ok(id)
    }

    /// One page of the catalog.
    #[instrument(skip(self), err)]
    pub async fn list_products(&self, query: &CatalogQuery) -> Result<CatalogPage, ServiceError> {
        let records = self.store.list(ProductOrder::CreatedAtDesc).await?;
        Ok(query.apply(&records))
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn get_product(&self, id: ProductId) -> Result<ProductRecord, ServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Overwrite the stock count; status follows the new count.
    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn update_stock(&self, id: ProductId, stock: u32) -> Result<(), ServiceError> {
        self.store
            .update(id, ProductPatch::stock(stock, Utc::now()))
            .await?;
        info!(product_id = %id, stock, "stock updated");
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ServiceError> {
        self.store.delete(id).await?;
        info!(product_id = %id, "product deleted");
        Ok(())
    }

    async fn upload_media(
        &self,
        id: ProductId,
        draft: &ProductDraft,
        at: DateTime<Utc>,
    ) -> Result<MediaUrls, ServiceError> {
        let mut urls = MediaUrls::default();
        for slot in MediaSlot::ALL {
            let Some(file) = draft.media(slot).filter(|f| f.size() > 0) else {
                continue;
            };
            let path = media_path(id, slot, &file.file_name, at);
            let url = self
                .blobs
                .upload(&path, file.bytes.clone(), &file.content_type)
                .await?;
            let target = match slot {
                MediaSlot::Image => &mut urls.image,
                MediaSlot::ProfileImage => &mut urls.profile_image,
                MediaSlot::Video => &mut urls.video,
                MediaSlot::SizeChart => &mut urls.size_chart,
            };
            *target = Some(url);
        }
        Ok(urls)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use stockdesk_products::{DraftField, MediaFile, ProductTab, ProductType};
    use stockdesk_variants::{CombinationField, VariantGroup, VariantSet};

    use super::*;
    use crate::blob_store::InMemoryBlobStore;
    use crate::product_store::InMemoryProductStore;

    type TestService = ProductService<Arc<InMemoryProductStore>, Arc<InMemoryBlobStore>>;

    fn setup() -> (TestService, Arc<InMemoryProductStore>, Arc<InMemoryBlobStore>) {
        let store = Arc::new(InMemoryProductStore::new());
        let blobs = Arc::new(InMemoryBlobStore::default());
        (
            ProductService::new(store.clone(), blobs.clone()),
            store,
            blobs,
        )
    }

    fn png() -> MediaFile {
        MediaFile::new("front.png", "image/png", vec![7u8; 32])
    }

    fn single_draft(name: &str, stock: u32) -> ProductDraft {
        ProductDraft::new().with_fields([
            DraftField::Name(format!("  {name} ")),
            DraftField::Description("Stoneware, 350ml.".into()),
            DraftField::Price(15_000),
            DraftField::Stock(stock),
            DraftField::HomeDelivery(true),
            DraftField::PickupLocation("   ".into()),
            DraftField::Media(MediaSlot::Image, Some(png())),
            DraftField::Media(MediaSlot::ProfileImage, Some(png())),
            DraftField::Media(
                MediaSlot::SizeChart,
                Some(MediaFile::new("chart.pdf", "application/pdf", vec![1; 8])),
            ),
        ])
    }

    #[tokio::test]
    async fn create_single_product_persists_record_and_media() {
        let (service, _, blobs) = setup();
        let id = service.create_product(&single_draft("Mug", 4)).await.unwrap();

        let product = service.get_product(id).await.unwrap();
        assert_eq!(product.name, "Mug");
        assert_eq!(product.price, 15_000);
        assert_eq!(product.stock, 4);
        assert_eq!(product.status, ProductStatus::Active);
        assert_eq!(product.sales, 0);
        assert!(product.pickup_location.is_none());
        assert!(product.variant_groups.is_none());
        assert!(product.media.video.is_none());

        let image = product.media.image.unwrap();
        assert!(image.starts_with(&format!("memory://stockdesk/products/{id}/images/")));
        assert!(image.ends_with("-front.png"));
        assert_eq!(blobs.paths().len(), 3);
    }

    #[tokio::test]
    async fn zero_stock_is_created_out_of_stock() {
        let (service, _, _) = setup();
        let id = service.create_product(&single_draft("Mug", 0)).await.unwrap();
        let product = service.get_product(id).await.unwrap();
        assert_eq!(product.status, ProductStatus::OutOfStock);
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected_before_any_upload() {
        let (service, store, blobs) = setup();
        let draft = single_draft("Mug", 1).with_field(DraftField::Price(0));

        let err = service.create_product(&draft).await.unwrap_err();
        let report = match err {
            ServiceError::Invalid(report) => report,
            other => panic!("expected validation error, got {other:?}"),
        };
        assert_eq!(report.first_error().map(|e| e.field.as_str()), Some("price"));
        assert!(blobs.paths().is_empty());
        assert!(store.list(ProductOrder::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn variant_product_stores_totals_and_combinations() {
        let (service, _, _) = setup();
        let draft = single_draft("Shirt", 0)
            .with_field(DraftField::ProductType(ProductType::Multiple))
            .with_variants(VariantSet::from_groups(vec![
                VariantGroup::with_options("Size", ["S", "M"]),
                VariantGroup::with_options("Color", ["Red"]),
            ]));
        let ids: Vec<_> = draft.variants().combinations().iter().map(|c| c.id).collect();
        let draft = draft
            .edit_variants(|v| {
                v.update_combination(ids[0], CombinationField::Price(29_900))?
                    .update_combination(ids[0], CombinationField::Stock(3))?
                    .update_combination(ids[1], CombinationField::Price(31_900))?
                    .update_combination(ids[1], CombinationField::Stock(2))
            })
            .unwrap();

        let id = service.create_product(&draft).await.unwrap();
        let product = service.get_product(id).await.unwrap();

        assert_eq!(product.product_type, ProductType::Multiple);
        assert_eq!(product.price, 29_900);
        assert_eq!(product.stock, 5);
        assert_eq!(product.variant_groups.as_ref().map(Vec::len), Some(2));
        assert_eq!(product.variant_combinations.as_ref().map(Vec::len), Some(2));
        assert_eq!(product.variants().unwrap().total_stock(), 5);
    }

    #[tokio::test]
    async fn update_stock_recomputes_status() {
        let (service, _, _) = setup();
        let id = service.create_product(&single_draft("Mug", 4)).await.unwrap();

        service.update_stock(id, 0).await.unwrap();
        let product = service.get_product(id).await.unwrap();
        assert_eq!(product.stock, 0);
        assert_eq!(product.status, ProductStatus::OutOfStock);
        assert!(product.updated_at >= product.created_at);

        service.update_stock(id, 9).await.unwrap();
        assert_eq!(
            service.get_product(id).await.unwrap().status,
            ProductStatus::Active
        );
    }

    #[tokio::test]
    async fn missing_products_are_not_found() {
        let (service, _, _) = setup();
        let missing = ProductId::new();
        assert!(matches!(
            service.get_product(missing).await,
            Err(ServiceError::NotFound(id)) if id == missing
        ));
        assert!(matches!(
            service.update_stock(missing, 1).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_product(missing).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_then_list() {
        let (service, _, _) = setup();
        let keep = service.create_product(&single_draft("Mug", 1)).await.unwrap();
        let gone = service.create_product(&single_draft("Bowl", 0)).await.unwrap();

        service.delete_product(gone).await.unwrap();

        let page = service.list_products(&CatalogQuery::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.products[0].id, keep);
        assert_eq!(page.counts.all, 1);
    }

    #[tokio::test]
    async fn list_filters_by_tab() {
        let (service, _, _) = setup();
        service.create_product(&single_draft("Mug", 1)).await.unwrap();
        service.create_product(&single_draft("Bowl", 0)).await.unwrap();

        let query = CatalogQuery::default().with_tab(ProductTab::OutOfStock);
        let page = service.list_products(&query).await.unwrap();
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].name, "Bowl");
        assert_eq!(page.counts.active, 1);
    }

    fn shirt_draft(groups: Vec<VariantGroup>) -> ProductDraft {
        let draft = single_draft("Shirt", 0)
            .with_field(DraftField::ProductType(ProductType::Multiple))
            .with_variants(VariantSet::from_parts(groups, &[]));
        let ids: Vec<_> = draft.variants().combinations().iter().map(|c| c.id).collect();
        draft
            .edit_variants(|v| {
                ids.iter().try_fold(v.clone(), |acc, id| {
                    acc.update_combination(*id, CombinationField::Price(19_900))
                })
            })
            .unwrap()
    }

    #[tokio::test]
    async fn repeated_group_ids_are_rejected() {
        let (service, store, _) = setup();
        let size = VariantGroup::with_options("Size", ["S", "M"]);
        let mut color = VariantGroup::with_options("Color", ["Red"]);
        color.id = size.id;

        let err = service.create_product(&shirt_draft(vec![size, color])).await.unwrap_err();
        let report = match err {
            ServiceError::Invalid(report) => report,
            other => panic!("expected validation error, got {other:?}"),
        };
        assert!(report.error_for("variant_groups.1").is_some());
        assert!(store.list(ProductOrder::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn repeated_option_ids_are_rejected() {
        let (service, store, _) = setup();
        let mut color = VariantGroup::with_options("Color", ["Red", "Black"]);
        color.options[1].id = color.options[0].id;

        let err = service.create_product(&shirt_draft(vec![color])).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Invalid(ref report) if report.error_for("variant_groups.0").is_some()
        ));
        assert!(store.list(ProductOrder::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stored_combinations_reference_stored_groups() {
        let (service, _, _) = setup();
        let groups = vec![
            VariantGroup::with_options("Size", ["S", "M"]),
            VariantGroup::with_options("Color", ["Red", "Black"]),
        ];
        let id = service.create_product(&shirt_draft(groups.clone())).await.unwrap();

        let product = service.get_product(id).await.unwrap();
        assert_eq!(product.variant_groups.as_ref(), Some(&groups));
        let combos = product.variant_combinations.unwrap();
        assert_eq!(combos.len(), 4);
        for combo in &combos {
            assert!(combo.combination.iter().all(|(group, option)| {
                groups
                    .iter()
                    .any(|g| g.id == *group && g.option(*option).is_some())
            }));
        }
        let distinct: std::collections::HashSet<_> =
            combos.iter().map(|c| &c.combination).collect();
        assert_eq!(distinct.len(), 4);
    }

    #[derive(Debug)]
    struct FailingBlobStore;

    #[async_trait]
    impl BlobStore for FailingBlobStore {
        async fn upload(
            &self,
            path: &str,
            _bytes: Vec<u8>,
            _content_type: &str,
        ) -> Result<String, BlobError> {
            Err(BlobError::Storage(format!("bucket unavailable for {path}")))
        }
    }

    #[tokio::test]
    async fn upload_failure_aborts_creation() {
        let store = Arc::new(InMemoryProductStore::new());
        let service = ProductService::new(store.clone(), FailingBlobStore);

        let err = service
            .create_product(&single_draft("Mug", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Blob(BlobError::Storage(_))));
        assert!(store.list(ProductOrder::default()).await.unwrap().is_empty());
    }
}
