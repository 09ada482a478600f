//! Product draft: the in-progress create form.
//!
//! A draft is a plain value. Setting a field or editing variants returns a
//! new draft; nothing is shared or mutated in place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockdesk_core::{DomainError, DomainResult};
use stockdesk_variants::{VariantGroup, VariantSet};

use crate::product::{PickupMethods, ProductType};

/// Media attachments a product can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaSlot {
    Image,
    ProfileImage,
    Video,
    SizeChart,
}

impl MediaSlot {
    pub const ALL: [MediaSlot; 4] = [
        MediaSlot::Image,
        MediaSlot::ProfileImage,
        MediaSlot::Video,
        MediaSlot::SizeChart,
    ];

    /// Form field name.
    pub fn field(&self) -> &'static str {
        match self {
            MediaSlot::Image => "image",
            MediaSlot::ProfileImage => "profile_image",
            MediaSlot::Video => "video",
            MediaSlot::SizeChart => "size_chart",
        }
    }

    /// Blob store folder under `products/{id}/`.
    pub fn folder(&self) -> &'static str {
        match self {
            MediaSlot::Image => "images",
            MediaSlot::ProfileImage => "profile",
            MediaSlot::Video => "videos",
            MediaSlot::SizeChart => "charts",
        }
    }
}

/// An attached, not-yet-uploaded file.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl core::fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MediaFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// One typed form field with its new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    Name(String),
    Sku(String),
    Description(String),
    ProductType(ProductType),
    /// Smallest currency unit.
    Price(u64),
    Stock(u32),
    MinOrder(u32),
    SelfPickup(bool),
    HomeDelivery(bool),
    PickupLocation(String),
    ShippingFee(String),
    Media(MediaSlot, Option<MediaFile>),
}

impl DraftField {
    /// Key under which validation errors for this field are reported.
    pub fn key(&self) -> &'static str {
        match self {
            DraftField::Name(_) => "name",
            DraftField::Sku(_) => "sku",
            DraftField::Description(_) => "description",
            DraftField::ProductType(_) => "product_type",
            DraftField::Price(_) => "price",
            DraftField::Stock(_) => "stock",
            DraftField::MinOrder(_) => "min_order",
            DraftField::SelfPickup(_) | DraftField::HomeDelivery(_) => "pickup_methods",
            DraftField::PickupLocation(_) => "pickup_location",
            DraftField::ShippingFee(_) => "shipping_fee",
            DraftField::Media(slot, _) => slot.field(),
        }
    }
}

/// Price and stock a draft will be persisted with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SubmissionTotals {
    pub price: u64,
    pub stock: u32,
}

/// The product create form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    name: String,
    sku: String,
    description: String,
    product_type: ProductType,
    price: u64,
    stock: u32,
    min_order: u32,
    pickup_methods: PickupMethods,
    pickup_location: String,
    shipping_fee: String,
    media: BTreeMap<MediaSlot, MediaFile>,
    variants: VariantSet,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductDraft {
    /// Initial form state: single product, minimum order of one, all else empty.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            sku: String::new(),
            description: String::new(),
            product_type: ProductType::Single,
            price: 0,
            stock: 0,
            min_order: 1,
            pickup_methods: PickupMethods::default(),
            pickup_location: String::new(),
            shipping_fee: String::new(),
            media: BTreeMap::new(),
            variants: VariantSet::new(),
        }
    }

    /// Back to the initial form state.
    pub fn reset(&self) -> Self {
        Self::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn product_type(&self) -> ProductType {
        self.product_type
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn min_order(&self) -> u32 {
        self.min_order
    }

    pub fn pickup_methods(&self) -> PickupMethods {
        self.pickup_methods
    }

    pub fn pickup_location(&self) -> &str {
        &self.pickup_location
    }

    pub fn shipping_fee(&self) -> &str {
        &self.shipping_fee
    }

    pub fn media(&self, slot: MediaSlot) -> Option<&MediaFile> {
        self.media.get(&slot)
    }

    pub fn variants(&self) -> &VariantSet {
        &self.variants
    }

    /// True when combinations, not the scalar fields, carry price and stock.
    pub fn has_variants(&self) -> bool {
        self.product_type == ProductType::Multiple
    }

    pub fn with_field(&self, field: DraftField) -> Self {
        let mut next = self.clone();
        match field {
            DraftField::Name(v) => next.name = v,
            DraftField::Sku(v) => next.sku = v,
            DraftField::Description(v) => next.description = v,
            DraftField::ProductType(t) => next.set_product_type(t),
            DraftField::Price(v) => next.price = v,
            DraftField::Stock(v) => next.stock = v,
            DraftField::MinOrder(v) => next.min_order = v,
            DraftField::SelfPickup(v) => next.pickup_methods.self_pickup = v,
            DraftField::HomeDelivery(v) => next.pickup_methods.home_delivery = v,
            DraftField::PickupLocation(v) => next.pickup_location = v,
            DraftField::ShippingFee(v) => next.shipping_fee = v,
            DraftField::Media(slot, Some(file)) => {
                next.media.insert(slot, file);
            }
            DraftField::Media(slot, None) => {
                next.media.remove(&slot);
            }
        }
        next
    }

    /// Apply several fields in order.
    pub fn with_fields(&self, fields: impl IntoIterator<Item = DraftField>) -> Self {
        fields
            .into_iter()
            .fold(self.clone(), |draft, field| draft.with_field(field))
    }

    /// Replace the variant set wholesale (e.g. from a submitted payload).
    pub fn with_variants(&self, variants: VariantSet) -> Self {
        Self {
            variants,
            ..self.clone()
        }
    }

    /// Run a variant edit and return the draft holding its result.
    ///
    /// ```ignore
    /// let draft = draft.edit_variants(|v| v.add_option(size_id, VariantOption::new("XL")))?;
    /// ```
    pub fn edit_variants<F>(&self, edit: F) -> DomainResult<Self>
    where
        F: FnOnce(&VariantSet) -> DomainResult<VariantSet>,
    {
        let variants = edit(&self.variants)?;
        Ok(self.with_variants(variants))
    }

    /// Price and stock the product will be stored with.
    ///
    /// Multiple: lowest combination price and total combination stock.
    pub fn submission_totals(&self) -> DomainResult<SubmissionTotals> {
        match self.product_type {
            ProductType::Single => Ok(SubmissionTotals {
                price: self.price,
                stock: self.stock,
            }),
            ProductType::Multiple => {
                let price = self.variants.min_price().ok_or_else(|| {
                    DomainError::validation("a variant product needs at least one combination")
                })?;
                let stock = u32::try_from(self.variants.total_stock())
                    .map_err(|_| DomainError::validation("total variant stock is too large"))?;
                Ok(SubmissionTotals { price, stock })
            }
        }
    }

    fn set_product_type(&mut self, product_type: ProductType) {
        self.product_type = product_type;
        if product_type == ProductType::Multiple && self.variants.is_empty() {
            self.variants = VariantSet::from_groups(vec![VariantGroup::new("")]);
        }
    }
}
