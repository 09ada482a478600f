//! Products domain module.
//!
//! The persisted product record, the editable product draft, the form
//! validator that guards submission, and catalog listing (filter, search,
//! sort, paginate). Pure domain logic: no IO, no HTTP, no storage.

pub mod catalog;
pub mod draft;
pub mod product;
pub mod validation;

pub use catalog::{
    visible_pages, CatalogPage, CatalogQuery, PageLink, ProductTab, SortField, SortOrder,
    TabCounts, ITEMS_PER_PAGE,
};
pub use draft::{DraftField, MediaFile, MediaSlot, ProductDraft, SubmissionTotals};
pub use product::{
    MediaUrls, PickupMethods, ProductPatch, ProductRecord, ProductStatus, ProductType,
};
pub use validation::{validate_field, validate_form, FieldCheck, FieldError, FormValidation};
