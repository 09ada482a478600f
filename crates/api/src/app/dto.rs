use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use stockdesk_products::{
    visible_pages, CatalogPage, DraftField, MediaFile, MediaSlot, PageLink, PickupMethods,
    ProductDraft, ProductRecord, ProductType, TabCounts,
};
use stockdesk_variants::{VariantCombination, VariantGroup, VariantSet};

// -------------------------
// Request DTOs
// -------------------------

/// A media attachment sent inline as base64.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaPayload {
    pub file_name: String,
    pub content_type: String,
    /// Standard base64, padded.
    pub data: String,
}

fn one() -> u32 {
    1
}

/// Submitted product form.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub product_type: ProductType,
    #[serde(default)]
    pub price: u64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default = "one")]
    pub min_order: u32,
    #[serde(default)]
    pub pickup_methods: PickupMethods,
    #[serde(default)]
    pub pickup_location: String,
    #[serde(default)]
    pub shipping_fee: String,
    #[serde(default)]
    pub image: Option<MediaPayload>,
    #[serde(default)]
    pub profile_image: Option<MediaPayload>,
    #[serde(default)]
    pub video: Option<MediaPayload>,
    #[serde(default)]
    pub size_chart: Option<MediaPayload>,
    #[serde(default)]
    pub variant_groups: Vec<VariantGroup>,
    /// Only price and stock are taken from these, matched by selection.
    #[serde(default)]
    pub variant_combinations: Vec<VariantCombination>,
}

/// A media field whose base64 payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMedia {
    pub field: &'static str,
}

impl CreateProductRequest {
    pub fn into_draft(self) -> Result<ProductDraft, InvalidMedia> {
        let media = [
            (MediaSlot::Image, self.image),
            (MediaSlot::ProfileImage, self.profile_image),
            (MediaSlot::Video, self.video),
            (MediaSlot::SizeChart, self.size_chart),
        ]
        .into_iter()
        .map(|(slot, payload)| Ok(DraftField::Media(slot, decode_media(slot, payload)?)))
        .collect::<Result<Vec<_>, InvalidMedia>>()?;

        let draft = ProductDraft::new()
            .with_fields([
                DraftField::Name(self.name),
                DraftField::Sku(self.sku),
                DraftField::Description(self.description),
                DraftField::ProductType(self.product_type),
                DraftField::Price(self.price),
                DraftField::Stock(self.stock),
                DraftField::MinOrder(self.min_order),
                DraftField::SelfPickup(self.pickup_methods.self_pickup),
                DraftField::HomeDelivery(self.pickup_methods.home_delivery),
                DraftField::PickupLocation(self.pickup_location),
                DraftField::ShippingFee(self.shipping_fee),
            ])
            .with_fields(media);

        Ok(match self.product_type {
            ProductType::Multiple => draft.with_variants(VariantSet::from_parts(
                self.variant_groups,
                &self.variant_combinations,
            )),
            ProductType::Single => draft,
        })
    }
}

fn decode_media(
    slot: MediaSlot,
    payload: Option<MediaPayload>,
) -> Result<Option<MediaFile>, InvalidMedia> {
    let Some(payload) = payload else {
        return Ok(None);
    };
    let bytes = STANDARD
        .decode(payload.data.trim())
        .map_err(|_| InvalidMedia { field: slot.field() })?;
    Ok(Some(MediaFile::new(payload.file_name, payload.content_type, bytes)))
}

/// Stock overwrite. Kept loose so non-integer and negative values get a 400
/// with a readable message instead of a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStockRequest {
    pub stock: serde_json::Value,
}

impl UpdateStockRequest {
    pub fn stock(&self) -> Option<u32> {
        self.stock.as_u64().and_then(|v| u32::try_from(v).ok())
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductRecord>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub counts: TabCounts,
    pub pages: Vec<PageLink>,
}

impl From<CatalogPage> for ProductListResponse {
    fn from(page: CatalogPage) -> Self {
        Self {
            pages: visible_pages(page.page, page.total_pages),
            products: page.products,
            total: page.total,
            page: page.page,
            total_pages: page.total_pages,
            counts: page.counts,
        }
    }
}
