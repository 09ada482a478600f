use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockdesk_core::{Entity, ProductId};
use stockdesk_variants::{retain_valid_groups, VariantCombination, VariantGroup, VariantSet};

/// Whether a product is sold as-is or through variant combinations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    #[default]
    Single,
    Multiple,
}

/// Product status shown in the listing tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Active,
    OutOfStock,
    Inactive,
}

impl ProductStatus {
    /// Status derived from a stock count on create and on every stock update.
    pub fn for_stock(stock: u32) -> Self {
        if stock > 0 {
            ProductStatus::Active
        } else {
            ProductStatus::OutOfStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::OutOfStock => "out_of_stock",
            ProductStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupMethods {
    pub self_pickup: bool,
    pub home_delivery: bool,
}

impl PickupMethods {
    pub fn any(&self) -> bool {
        self.self_pickup || self.home_delivery
    }
}

/// Retrievable URLs of uploaded media.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaUrls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_chart: Option<String>,
}

/// Persisted product document.
///
/// For `Multiple` products `price` is the lowest combination price and `stock`
/// the sum of combination stock, both computed at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub description: String,
    pub product_type: ProductType,
    /// Price in smallest currency unit.
    pub price: u64,
    pub stock: u32,
    pub min_order: u32,
    pub sales: u64,
    pub pickup_methods: PickupMethods,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_fee: Option<String>,
    #[serde(default)]
    pub media: MediaUrls,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_groups: Option<Vec<VariantGroup>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_combinations: Option<Vec<VariantCombination>>,
}

impl ProductRecord {
    /// Stored variants, resynced against the stored groups.
    ///
    /// Groups failing the structural check are dropped before the resync.
    pub fn variants(&self) -> Option<VariantSet> {
        let groups = retain_valid_groups(self.variant_groups.clone()?);
        let combinations = self.variant_combinations.as_deref().unwrap_or_default();
        Some(VariantSet::from_parts(groups, combinations))
    }
}

impl Entity for ProductRecord {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Partial update applied by the persistence gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProductPatch {
    /// Stock change with its derived status.
    pub fn stock(stock: u32, at: DateTime<Utc>) -> Self {
        Self {
            stock: Some(stock),
            status: Some(ProductStatus::for_stock(stock)),
            updated_at: Some(at),
        }
    }

    pub fn apply(&self, record: &mut ProductRecord) {
        if let Some(stock) = self.stock {
            record.stock = stock;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(at) = self.updated_at {
            record.updated_at = at;
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(name: &str, price: u64, stock: u32, sales: u64) -> ProductRecord {
        let now = Utc::now();
        ProductRecord {
            id: ProductId::new(),
            name: name.to_string(),
            sku: None,
            description: format!("{name} description"),
            product_type: ProductType::Single,
            price,
            stock,
            min_order: 1,
            sales,
            pickup_methods: PickupMethods {
                self_pickup: true,
                home_delivery: false,
            },
            pickup_location: None,
            shipping_fee: None,
            media: MediaUrls::default(),
            status: ProductStatus::for_stock(stock),
            created_at: now,
            updated_at: now,
            variant_groups: None,
            variant_combinations: None,
        }
    }
}
