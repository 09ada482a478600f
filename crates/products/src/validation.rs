//! Product form validation.
//!
//! Field rules run in form order, so [`FormValidation::first_error`] is the
//! error the user would reach first when scrolling the form.

use serde::Serialize;

use stockdesk_variants::{IdConflict, VariantSet};

use crate::draft::{DraftField, MediaFile, MediaSlot, ProductDraft};
use crate::product::{PickupMethods, ProductType};

pub const MAX_NAME_CHARS: usize = 120;
pub const MAX_DESCRIPTION_CHARS: usize = 3000;
pub const MAX_MEDIA_BYTES: usize = 10 * 1024 * 1024;
/// Highest single-product price (999,999 in whole units), in the smallest unit.
pub const MAX_PRICE: u64 = 999_999 * 100;

const DOCUMENT_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Outcome of checking one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCheck {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FieldCheck {
    fn from_result(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                error: None,
            },
            Err(message) => Self {
                valid: false,
                error: Some(message),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path, e.g. `variant_groups.0.options.1.name`.
    pub field: String,
    pub message: String,
}

/// Every error found in a draft, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormValidation {
    errors: Vec<FieldError>,
}

impl FormValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn first_error(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.push(field, message);
        }
    }
}

/// Check a single field in isolation.
pub fn validate_field(field: &DraftField) -> FieldCheck {
    FieldCheck::from_result(check_field(field))
}

/// Check the whole draft.
///
/// Single products validate their scalar price; multiple products validate
/// groups, options and combinations instead.
pub fn validate_form(draft: &ProductDraft) -> FormValidation {
    let mut report = FormValidation::default();

    report.check("name", check_name(draft.name()));
    report.check("image", check_media(MediaSlot::Image, draft.media(MediaSlot::Image)));
    report.check(
        "profile_image",
        check_media(MediaSlot::ProfileImage, draft.media(MediaSlot::ProfileImage)),
    );
    report.check("video", check_media(MediaSlot::Video, draft.media(MediaSlot::Video)));
    report.check("description", check_description(draft.description()));

    if draft.product_type() == ProductType::Single {
        report.check("price", check_price(draft.price()));
    }

    report.check("min_order", check_min_order(draft.min_order()));
    report.check(
        "size_chart",
        check_media(MediaSlot::SizeChart, draft.media(MediaSlot::SizeChart)),
    );
    report.check("pickup_methods", check_pickup(draft.pickup_methods()));

    if draft.has_variants() {
        check_variants(draft.variants(), &mut report);
    }

    report
}

fn check_field(field: &DraftField) -> Result<(), String> {
    match field {
        DraftField::Name(name) => check_name(name),
        DraftField::Description(text) => check_description(text),
        DraftField::Price(price) => check_price(*price),
        DraftField::MinOrder(min) => check_min_order(*min),
        DraftField::Media(slot, file) => check_media(*slot, file.as_ref()),
        // unsigned stock and free-text fields cannot be invalid on their own
        DraftField::Sku(_)
        | DraftField::ProductType(_)
        | DraftField::Stock(_)
        | DraftField::SelfPickup(_)
        | DraftField::HomeDelivery(_)
        | DraftField::PickupLocation(_)
        | DraftField::ShippingFee(_) => Ok(()),
    }
}

fn check_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("product name is required".into());
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(format!("product name must be at most {MAX_NAME_CHARS} characters"));
    }
    Ok(())
}

fn check_description(text: &str) -> Result<(), String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("product description is required".into());
    }
    if text.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(format!(
            "product description must be at most {MAX_DESCRIPTION_CHARS} characters"
        ));
    }
    Ok(())
}

fn check_price(price: u64) -> Result<(), String> {
    if price == 0 {
        return Err("price must be greater than 0".into());
    }
    if price > MAX_PRICE {
        return Err("price must not exceed 999,999".into());
    }
    Ok(())
}

fn check_min_order(min_order: u32) -> Result<(), String> {
    if min_order == 0 {
        return Err("minimum order must be greater than 0".into());
    }
    Ok(())
}

fn check_pickup(methods: PickupMethods) -> Result<(), String> {
    if !methods.any() {
        return Err("select at least one pickup method".into());
    }
    Ok(())
}

fn check_media(slot: MediaSlot, file: Option<&MediaFile>) -> Result<(), String> {
    let Some(file) = file else {
        return match slot {
            MediaSlot::Image => Err("product image is required".into()),
            MediaSlot::ProfileImage => Err("profile image is required".into()),
            MediaSlot::SizeChart => Err("size chart is required".into()),
            MediaSlot::Video => Ok(()),
        };
    };

    if file.size() > MAX_MEDIA_BYTES {
        return Err("file must be 10MB or smaller".into());
    }

    let mime = file.content_type.as_str();
    let is_image = mime.starts_with("image/");
    match slot {
        MediaSlot::Image | MediaSlot::ProfileImage if !is_image => {
            Err("only image files are allowed".into())
        }
        MediaSlot::Video if !mime.starts_with("video/") => {
            Err("only video files are allowed".into())
        }
        MediaSlot::SizeChart if !(is_image || DOCUMENT_TYPES.contains(&mime)) => {
            Err("only image, PDF or Word files are allowed".into())
        }
        _ => Ok(()),
    }
}

fn check_variants(variants: &VariantSet, report: &mut FormValidation) {
    let groups = variants.groups();
    if groups.is_empty() {
        report.push("variant_groups", "add at least one variant group");
        return;
    }

    for (i, group) in groups.iter().enumerate() {
        if group.name.trim().is_empty() {
            report.push(format!("variant_groups.{i}.name"), "variant group name is required");
        }
        if group.options.is_empty() {
            report.push(
                format!("variant_groups.{i}.options"),
                "add at least one option to this group",
            );
        }
        for (j, option) in group.options.iter().enumerate() {
            if option.name.trim().is_empty() {
                report.push(
                    format!("variant_groups.{i}.options.{j}.name"),
                    "option name is required",
                );
            }
        }
    }

    let conflicts = variants.id_conflicts();
    if !conflicts.is_empty() {
        for (i, conflict) in conflicts {
            let message = match conflict {
                IdConflict::GroupId => "variant group id is missing or used twice",
                IdConflict::OptionIds => "option ids must be unique within a group",
            };
            report.push(format!("variant_groups.{i}"), message);
        }
        return;
    }

    if let Some(overflow) = variants.overflow() {
        report.push("variant_combinations", overflow.to_string());
        return;
    }

    let combinations = variants.combinations();
    if combinations.is_empty() {
        report.push(
            "variant_combinations",
            "no variant combinations found; check the variant options",
        );
        return;
    }

    for (k, combination) in combinations.iter().enumerate() {
        if combination.price == 0 {
            report.push(
                format!("variant_combinations.{k}.price"),
                "enter a price for this combination",
            );
        }
    }
}
