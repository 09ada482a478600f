use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use stockdesk_core::entity::find_by_id;
use stockdesk_core::{CombinationId, Entity, GroupId, OptionId};

/// One chosen option per group, keyed by group id.
pub type Selection = BTreeMap<GroupId, OptionId>;

/// A single value along a group's axis (e.g. "Red").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    pub id: OptionId,
    pub name: String,
}

impl VariantOption {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: OptionId::new(),
            name: name.into(),
        }
    }
}

impl Entity for VariantOption {
    type Id = OptionId;

    fn id(&self) -> OptionId {
        self.id
    }
}

/// A named axis of differentiation (e.g. "Color") with its ordered options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantGroup {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub options: Vec<VariantOption>,
}

impl VariantGroup {
    /// New group without options (degenerate until the first option is added).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: GroupId::new(),
            name: name.into(),
            options: Vec::new(),
        }
    }

    /// New group with one freshly minted option per name, in order.
    pub fn with_options<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: GroupId::new(),
            name: name.into(),
            options: options.into_iter().map(VariantOption::new).collect(),
        }
    }

    /// A group takes part in generation only when it has at least one option.
    pub fn is_active(&self) -> bool {
        !self.options.is_empty()
    }

    /// Structural shape check used for defensive filtering.
    ///
    /// Names are not inspected; an empty name is still a valid shape.
    pub fn is_valid(&self) -> bool {
        if self.id.is_nil() || self.options.is_empty() {
            return false;
        }
        let mut seen = HashSet::with_capacity(self.options.len());
        self.options
            .iter()
            .all(|option| !option.id.is_nil() && seen.insert(option.id))
    }

    pub fn option(&self, option_id: OptionId) -> Option<&VariantOption> {
        find_by_id(&self.options, option_id)
    }
}

impl Entity for VariantGroup {
    type Id = GroupId;

    fn id(&self) -> GroupId {
        self.id
    }
}

/// One sellable combination with its own price and stock.
///
/// `price` is in the smallest currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantCombination {
    pub id: CombinationId,
    pub combination: Selection,
    pub price: u64,
    pub stock: u32,
}

impl VariantCombination {
    /// Fresh combination with zero price and stock.
    pub fn new(combination: Selection) -> Self {
        Self {
            id: CombinationId::new(),
            combination,
            price: 0,
            stock: 0,
        }
    }

    /// True when every pair in `selection` is present in this combination.
    pub fn matches(&self, selection: &Selection) -> bool {
        selection
            .iter()
            .all(|(group, option)| self.combination.get(group) == Some(option))
    }

    /// Human readable label, e.g. `"M / Red"`, using current option names.
    pub fn label(&self, groups: &[VariantGroup]) -> String {
        groups
            .iter()
            .filter_map(|group| {
                let option_id = self.combination.get(&group.id)?;
                group.option(*option_id).map(|o| o.name.as_str())
            })
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

impl Entity for VariantCombination {
    type Id = CombinationId;

    fn id(&self) -> CombinationId {
        self.id
    }
}

/// First combination agreeing with every pair of a (possibly partial) selection.
pub fn find_combination<'a>(
    combinations: &'a [VariantCombination],
    selection: &Selection,
) -> Option<&'a VariantCombination> {
    combinations.iter().find(|c| c.matches(selection))
}

/// Drop groups that fail [`VariantGroup::is_valid`].
pub fn retain_valid_groups(groups: Vec<VariantGroup>) -> Vec<VariantGroup> {
    groups.into_iter().filter(VariantGroup::is_valid).collect()
}

/// Why a group's ids cannot take part in generation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IdConflict {
    /// Nil, or already used by an earlier group.
    GroupId,
    /// An option id is nil or repeats within the group.
    OptionIds,
}

/// Groups whose ids would make selections ambiguous, by position.
///
/// Option-less groups are only checked for their own id.
pub fn id_conflicts(groups: &[VariantGroup]) -> Vec<(usize, IdConflict)> {
    let mut seen = HashSet::with_capacity(groups.len());
    groups
        .iter()
        .enumerate()
        .filter_map(|(i, group)| {
            if group.id.is_nil() || !seen.insert(group.id) {
                Some((i, IdConflict::GroupId))
            } else if group.is_active() && !group.is_valid() {
                Some((i, IdConflict::OptionIds))
            } else {
                None
            }
        })
        .collect()
}
