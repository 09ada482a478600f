//! Catalog listing: tab filter, search, sort and pagination over product records.

use serde::{Deserialize, Serialize};

use crate::product::{ProductRecord, ProductStatus};

pub const ITEMS_PER_PAGE: usize = 5;
/// Most entries the pager shows, gaps included.
pub const MAX_VISIBLE_PAGES: usize = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductTab {
    #[default]
    All,
    Active,
    OutOfStock,
    Inactive,
}

impl ProductTab {
    pub fn includes(&self, status: ProductStatus) -> bool {
        match self {
            ProductTab::All => true,
            ProductTab::Active => status == ProductStatus::Active,
            ProductTab::OutOfStock => status == ProductStatus::OutOfStock,
            ProductTab::Inactive => status == ProductStatus::Inactive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Sales,
    Price,
    Stock,
}

impl SortField {
    fn key(&self, record: &ProductRecord) -> u64 {
        match self {
            SortField::Sales => record.sales,
            SortField::Price => record.price,
            SortField::Stock => u64::from(record.stock),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn flipped(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

fn first_page() -> usize {
    1
}

/// Listing parameters as they arrive on the query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub tab: ProductTab,
    #[serde(default, rename = "q")]
    pub search: String,
    #[serde(default)]
    pub sort: Option<SortField>,
    #[serde(default)]
    pub order: SortOrder,
    /// 1-based.
    #[serde(default = "first_page")]
    pub page: usize,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            tab: ProductTab::All,
            search: String::new(),
            sort: None,
            order: SortOrder::Desc,
            page: 1,
        }
    }
}

impl CatalogQuery {
    /// Switch tab and go back to the first page.
    pub fn with_tab(self, tab: ProductTab) -> Self {
        Self { tab, page: 1, ..self }
    }

    /// Change the search text and go back to the first page.
    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            page: 1,
            ..self
        }
    }

    /// Clicking a column header: the same column flips the order, a new
    /// column starts descending. Always returns to the first page.
    pub fn sorted_by(self, field: SortField) -> Self {
        let order = if self.sort == Some(field) {
            self.order.flipped()
        } else {
            SortOrder::Desc
        };
        Self {
            sort: Some(field),
            order,
            page: 1,
            ..self
        }
    }

    pub fn with_page(self, page: usize) -> Self {
        Self { page, ..self }
    }

    fn matches(&self, record: &ProductRecord) -> bool {
        if !self.tab.includes(record.status) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        record.name.to_lowercase().contains(&needle)
            || record
                .sku
                .as_deref()
                .is_some_and(|sku| sku.to_lowercase().contains(&needle))
    }

    /// Filter, sort and cut one page out of `records`.
    ///
    /// `records` is expected in listing order (newest first); the sort is
    /// stable, so ties keep that order. Out-of-range pages clamp.
    pub fn apply(&self, records: &[ProductRecord]) -> CatalogPage {
        let mut matched: Vec<&ProductRecord> = records.iter().filter(|r| self.matches(r)).collect();

        if let Some(field) = self.sort {
            matched.sort_by(|a, b| {
                let ordering = field.key(a).cmp(&field.key(b));
                match self.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        let total = matched.len();
        let total_pages = total.div_ceil(ITEMS_PER_PAGE);
        let page = self.page.clamp(1, total_pages.max(1));
        let products = matched
            .into_iter()
            .skip((page - 1) * ITEMS_PER_PAGE)
            .take(ITEMS_PER_PAGE)
            .cloned()
            .collect();

        CatalogPage {
            products,
            total,
            page,
            total_pages,
            counts: TabCounts::tally(records),
        }
    }
}

/// Per-tab product counts over the unfiltered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabCounts {
    pub all: usize,
    pub active: usize,
    pub out_of_stock: usize,
    pub inactive: usize,
}

impl TabCounts {
    pub fn tally(records: &[ProductRecord]) -> Self {
        records.iter().fold(Self::default(), |mut counts, record| {
            counts.all += 1;
            match record.status {
                ProductStatus::Active => counts.active += 1,
                ProductStatus::OutOfStock => counts.out_of_stock += 1,
                ProductStatus::Inactive => counts.inactive += 1,
            }
            counts
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub products: Vec<ProductRecord>,
    /// Matches across all pages.
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub counts: TabCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageLink {
    Page(usize),
    Gap,
}

/// Pager entries for `current` of `total` pages.
///
/// Up to seven pages are listed outright. Beyond that the first and last page
/// are always shown, with a window around the current page and gaps between.
pub fn visible_pages(current: usize, total: usize) -> Vec<PageLink> {
    if total <= MAX_VISIBLE_PAGES {
        return (1..=total).map(PageLink::Page).collect();
    }

    let mut pages = Vec::with_capacity(MAX_VISIBLE_PAGES);
    if current <= 4 {
        pages.extend((1..=5).map(PageLink::Page));
        pages.push(PageLink::Gap);
        pages.push(PageLink::Page(total));
    } else if current >= total - 3 {
        pages.push(PageLink::Page(1));
        pages.push(PageLink::Gap);
        pages.extend((total - 4..=total).map(PageLink::Page));
    } else {
        pages.push(PageLink::Page(1));
        pages.push(PageLink::Gap);
        pages.extend((current - 1..=current + 1).map(PageLink::Page));
        pages.push(PageLink::Gap);
        pages.push(PageLink::Page(total));
    }
    pages
}
