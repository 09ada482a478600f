//! Variant model and combination engine.
//!
//! A variant product has ordered option groups (e.g. Size, Color). Every
//! combination of one option per non-empty group is a sellable variant with its
//! own price and stock. This crate defines those entities, generates the full
//! combination set, and keeps it in sync as groups and options are edited.
//!
//! Everything here is deterministic and in-memory (no IO).

pub mod editor;
pub mod generator;
pub mod model;

pub use editor::{CombinationField, VariantSet, MAX_OPTIONS_PER_GROUP};
pub use generator::{
    combination_count, generate, regenerate, CombinationOverflow, Generation, MAX_COMBINATIONS,
};
pub use model::{
    find_combination, id_conflicts, retain_valid_groups, IdConflict, Selection,
    VariantCombination, VariantGroup, VariantOption,
};
