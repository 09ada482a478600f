//! Editing variant groups while keeping combinations in sync.
//!
//! [`VariantSet`] pairs the ordered groups with their derived combinations.
//! Every edit takes `&self` and returns a new set; the receiver is never
//! modified, so a failed edit leaves the caller's value intact.
//!
//! - Structural edits (add/remove group or option) rebuild the combinations and
//!   carry price/stock forward for selections that survive unchanged.
//! - Renames only touch labels; combinations are returned as they were.

use serde::{Deserialize, Serialize};

use stockdesk_core::entity::{find_by_id, position_of};
use stockdesk_core::{CombinationId, DomainError, DomainResult, GroupId, OptionId};

use crate::generator::{regenerate, CombinationOverflow, Generation};
use crate::model::{
    find_combination, id_conflicts, IdConflict, Selection, VariantCombination, VariantGroup,
    VariantOption,
};

/// Options a single group may hold.
pub const MAX_OPTIONS_PER_GROUP: usize = 14;

/// Editable per-combination value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum CombinationField {
    /// Price in the smallest currency unit.
    Price(u64),
    Stock(u32),
}

/// Variant groups of a product together with their generated combinations.
///
/// Serializes for responses and logs only; a set is always built through
/// [`VariantSet::from_parts`] or the edit methods so combinations stay derived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VariantSet {
    groups: Vec<VariantGroup>,
    combinations: Vec<VariantCombination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    overflow: Option<CombinationOverflow>,
}

impl VariantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from groups alone; every combination starts at zero price and stock.
    pub fn from_groups(groups: Vec<VariantGroup>) -> Self {
        Self::rebuild(groups, &[])
    }

    /// Rebuild from externally supplied groups and combinations.
    ///
    /// Combinations are regenerated from the groups; submitted price/stock is
    /// kept only where a submitted selection matches a generated one, so stale
    /// references to removed options cannot survive. Groups are kept as given;
    /// if their ids conflict there are no combinations (see [`Self::id_conflicts`]).
    pub fn from_parts(groups: Vec<VariantGroup>, combinations: &[VariantCombination]) -> Self {
        Self::rebuild(groups, combinations)
    }

    pub fn groups(&self) -> &[VariantGroup] {
        &self.groups
    }

    pub fn combinations(&self) -> &[VariantCombination] {
        &self.combinations
    }

    /// Set when the last rebuild hit the combination ceiling.
    pub fn overflow(&self) -> Option<CombinationOverflow> {
        self.overflow
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn id_conflicts(&self) -> Vec<(usize, IdConflict)> {
        id_conflicts(&self.groups)
    }

    pub fn group(&self, group_id: GroupId) -> Option<&VariantGroup> {
        find_by_id(&self.groups, group_id)
    }

    pub fn find(&self, selection: &Selection) -> Option<&VariantCombination> {
        find_combination(&self.combinations, selection)
    }

    /// Lowest combination price, if there are any combinations.
    pub fn min_price(&self) -> Option<u64> {
        self.combinations.iter().map(|c| c.price).min()
    }

    /// Sum of all combination stock.
    pub fn total_stock(&self) -> u64 {
        self.combinations.iter().map(|c| u64::from(c.stock)).sum()
    }

    /// Append a group. Options it already carries count toward the rebuild.
    pub fn add_group(&self, group: VariantGroup) -> DomainResult<Self> {
        if self.group(group.id).is_some() {
            return Err(DomainError::conflict(format!("group {} already exists", group.id)));
        }
        ensure_option_cap(group.options.len())?;
        if group.id.is_nil() || (group.is_active() && !group.is_valid()) {
            return Err(DomainError::invariant(format!(
                "group {} has a nil id or repeated option ids",
                group.id
            )));
        }

        let mut groups = self.groups.clone();
        groups.push(group);
        Ok(self.resynced(groups))
    }

    pub fn remove_group(&self, group_id: GroupId) -> DomainResult<Self> {
        let index = self.group_index(group_id)?;
        let mut groups = self.groups.clone();
        groups.remove(index);
        Ok(self.resynced(groups))
    }

    pub fn rename_group(&self, group_id: GroupId, name: impl Into<String>) -> DomainResult<Self> {
        let index = self.group_index(group_id)?;
        let mut next = self.clone();
        next.groups[index].name = name.into();
        Ok(next)
    }

    pub fn add_option(&self, group_id: GroupId, option: VariantOption) -> DomainResult<Self> {
        let index = self.group_index(group_id)?;
        let group = &self.groups[index];
        if group.option(option.id).is_some() {
            return Err(DomainError::conflict(format!(
                "option {} already exists in group {}",
                option.id, group_id
            )));
        }
        ensure_option_cap(group.options.len() + 1)?;

        let mut groups = self.groups.clone();
        groups[index].options.push(option);
        Ok(self.resynced(groups))
    }

    pub fn remove_option(&self, group_id: GroupId, option_id: OptionId) -> DomainResult<Self> {
        let (group_index, option_index) = self.option_index(group_id, option_id)?;
        let mut groups = self.groups.clone();
        groups[group_index].options.remove(option_index);
        Ok(self.resynced(groups))
    }

    pub fn rename_option(
        &self,
        group_id: GroupId,
        option_id: OptionId,
        name: impl Into<String>,
    ) -> DomainResult<Self> {
        let (group_index, option_index) = self.option_index(group_id, option_id)?;
        let mut next = self.clone();
        next.groups[group_index].options[option_index].name = name.into();
        Ok(next)
    }

    pub fn update_combination(
        &self,
        combination_id: CombinationId,
        field: CombinationField,
    ) -> DomainResult<Self> {
        let index = position_of(&self.combinations, combination_id)
            .ok_or_else(|| DomainError::not_found(format!("combination {combination_id}")))?;

        let mut next = self.clone();
        let combination = &mut next.combinations[index];
        match field {
            CombinationField::Price(price) => combination.price = price,
            CombinationField::Stock(stock) => combination.stock = stock,
        }
        Ok(next)
    }

    fn resynced(&self, groups: Vec<VariantGroup>) -> Self {
        Self::rebuild(groups, &self.combinations)
    }

    fn rebuild(groups: Vec<VariantGroup>, previous: &[VariantCombination]) -> Self {
        match regenerate(&groups, previous) {
            Generation::Combinations(combinations) => Self {
                groups,
                combinations,
                overflow: None,
            },
            Generation::TooMany(overflow) => Self {
                groups,
                combinations: Vec::new(),
                overflow: Some(overflow),
            },
        }
    }

    fn group_index(&self, group_id: GroupId) -> DomainResult<usize> {
        position_of(&self.groups, group_id)
            .ok_or_else(|| DomainError::not_found(format!("group {group_id}")))
    }

    fn option_index(&self, group_id: GroupId, option_id: OptionId) -> DomainResult<(usize, usize)> {
        let group_index = self.group_index(group_id)?;
        let option_index = position_of(&self.groups[group_index].options, option_id)
            .ok_or_else(|| DomainError::not_found(format!("option {option_id} in group {group_id}")))?;
        Ok((group_index, option_index))
    }
}

fn ensure_option_cap(count: usize) -> DomainResult<()> {
    if count > MAX_OPTIONS_PER_GROUP {
        return Err(DomainError::validation(format!(
            "a group can hold at most {MAX_OPTIONS_PER_GROUP} options"
        )));
    }
    Ok(())
}
