//! Combination generation.
//!
//! Combinations are enumerated like an odometer: one index per active group,
//! the last group's index turns fastest and carries into the group before it.
//! The resulting order is lexicographic by group position, then option position.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::model::{id_conflicts, Selection, VariantCombination, VariantGroup};

/// Upper bound on the number of combinations a single product may have.
pub const MAX_COMBINATIONS: usize = 1000;

/// Generation aborted because the Cartesian product is too large.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct CombinationOverflow {
    /// Requested combination count (saturated at `usize::MAX`).
    pub total: usize,
    pub ceiling: usize,
}

impl core::fmt::Display for CombinationOverflow {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "too many variant combinations ({} > {}); reduce the number of options",
            self.total, self.ceiling
        )
    }
}

/// Outcome of a generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// The full combination set. Empty when no group has options.
    Combinations(Vec<VariantCombination>),
    /// The ceiling was exceeded; nothing was generated.
    TooMany(CombinationOverflow),
}

impl Generation {
    /// The generated combinations, or an empty set when the ceiling was hit.
    pub fn into_combinations(self) -> Vec<VariantCombination> {
        match self {
            Generation::Combinations(combinations) => combinations,
            Generation::TooMany(_) => Vec::new(),
        }
    }

    pub fn overflow(&self) -> Option<CombinationOverflow> {
        match self {
            Generation::Combinations(_) => None,
            Generation::TooMany(overflow) => Some(*overflow),
        }
    }
}

/// Number of combinations the active groups would produce (0 when none is active).
pub fn combination_count(groups: &[VariantGroup]) -> usize {
    let mut active = groups.iter().filter(|g| g.is_active()).peekable();
    if active.peek().is_none() {
        return 0;
    }
    active.fold(1usize, |acc, g| acc.saturating_mul(g.options.len()))
}

/// Generate every combination of the active groups with zero price and stock.
///
/// Groups with conflicting ids (see [`id_conflicts`]) generate nothing, since
/// their selections could not tell options apart.
pub fn generate(groups: &[VariantGroup]) -> Generation {
    let active: Vec<&VariantGroup> = groups.iter().filter(|g| g.is_active()).collect();
    if active.is_empty() {
        return Generation::Combinations(Vec::new());
    }

    let conflicts = id_conflicts(groups);
    if !conflicts.is_empty() {
        warn!(
            conflicting_groups = conflicts.len(),
            "variant group or option ids are not unique; generation skipped"
        );
        return Generation::Combinations(Vec::new());
    }

    let total = combination_count(groups);
    if total > MAX_COMBINATIONS {
        warn!(
            total,
            ceiling = MAX_COMBINATIONS,
            "variant combination ceiling exceeded; generation aborted"
        );
        return Generation::TooMany(CombinationOverflow {
            total,
            ceiling: MAX_COMBINATIONS,
        });
    }

    let mut indices = vec![0usize; active.len()];
    let mut combinations = Vec::with_capacity(total);
    loop {
        let selection: Selection = active
            .iter()
            .zip(&indices)
            .map(|(group, &i)| (group.id, group.options[i].id))
            .collect();
        combinations.push(VariantCombination::new(selection));

        if !advance(&mut indices, &active) {
            break;
        }
    }

    Generation::Combinations(combinations)
}

/// Generate, then copy price and stock from `previous` entries whose
/// selection is identical to a newly generated one.
pub fn regenerate(groups: &[VariantGroup], previous: &[VariantCombination]) -> Generation {
    match generate(groups) {
        Generation::Combinations(mut combinations) => {
            let carried: HashMap<&Selection, (u64, u32)> = previous
                .iter()
                .map(|c| (&c.combination, (c.price, c.stock)))
                .collect();
            for combination in &mut combinations {
                if let Some(&(price, stock)) = carried.get(&combination.combination) {
                    combination.price = price;
                    combination.stock = stock;
                }
            }
            Generation::Combinations(combinations)
        }
        too_many => too_many,
    }
}

/// Step the odometer. Returns `false` once every digit has wrapped.
fn advance(indices: &mut [usize], groups: &[&VariantGroup]) -> bool {
    for (index, group) in indices.iter_mut().zip(groups).rev() {
        *index += 1;
        if *index < group.options.len() {
            return true;
        }
        *index = 0;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn names(groups: &[VariantGroup], combination: &VariantCombination) -> Vec<String> {
        groups
            .iter()
            .filter_map(|g| {
                let option = combination.combination.get(&g.id)?;
                Some(format!("{}={}", g.name, g.option(*option)?.name))
            })
            .collect()
    }

    #[test]
    fn size_by_color_enumerates_in_odometer_order() {
        let groups = vec![
            VariantGroup::with_options("Size", ["S", "M", "L"]),
            VariantGroup::with_options("Color", ["Red", "Black"]),
        ];

        let combos = generate(&groups).into_combinations();
        let rendered: Vec<Vec<String>> = combos.iter().map(|c| names(&groups, c)).collect();

        let expected = [
            ["Size=S", "Color=Red"],
            ["Size=S", "Color=Black"],
            ["Size=M", "Color=Red"],
            ["Size=M", "Color=Black"],
            ["Size=L", "Color=Red"],
            ["Size=L", "Color=Black"],
        ];
        assert_eq!(rendered.len(), 6);
        for (got, want) in rendered.iter().zip(expected) {
            assert_eq!(got, &want);
        }
        assert!(combos.iter().all(|c| c.price == 0 && c.stock == 0));
    }

    #[test]
    fn single_group_single_option_yields_one_combination() {
        let color = VariantGroup::with_options("Color", ["Red"]);
        let combos = generate(std::slice::from_ref(&color)).into_combinations();
        assert_eq!(combos.len(), 1);
        assert_eq!(
            combos[0].combination,
            Selection::from([(color.id, color.options[0].id)])
        );
    }

    #[test]
    fn empty_group_is_skipped() {
        let size = VariantGroup::new("Size");
        let color = VariantGroup::with_options("Color", ["Red", "Black"]);
        let combos = generate(&[size.clone(), color.clone()]).into_combinations();

        assert_eq!(combos.len(), 2);
        for combo in &combos {
            assert_eq!(combo.combination.len(), 1);
            assert!(!combo.combination.contains_key(&size.id));
            assert!(combo.combination.contains_key(&color.id));
        }
    }

    #[test]
    fn no_groups_or_only_empty_groups_generate_nothing() {
        assert_eq!(generate(&[]), Generation::Combinations(Vec::new()));
        assert_eq!(
            generate(&[VariantGroup::new("Size")]),
            Generation::Combinations(Vec::new())
        );
        assert_eq!(combination_count(&[VariantGroup::new("Size")]), 0);
    }

    #[test]
    fn exceeding_the_ceiling_is_reported() {
        let labels: Vec<String> = (0..11).map(|i| i.to_string()).collect();
        let groups: Vec<VariantGroup> = (0..3)
            .map(|g| VariantGroup::with_options(format!("g{g}"), labels.clone()))
            .collect();

        let generation = generate(&groups);
        assert_eq!(
            generation.overflow(),
            Some(CombinationOverflow {
                total: 1331,
                ceiling: MAX_COMBINATIONS
            })
        );
        assert!(generation.into_combinations().is_empty());
    }

    #[test]
    fn exactly_the_ceiling_is_allowed() {
        let labels: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let groups: Vec<VariantGroup> = (0..3)
            .map(|g| VariantGroup::with_options(format!("g{g}"), labels.clone()))
            .collect();

        let combos = generate(&groups).into_combinations();
        assert_eq!(combos.len(), MAX_COMBINATIONS);
        let distinct: HashSet<_> = combos.iter().map(|c| &c.combination).collect();
        assert_eq!(distinct.len(), MAX_COMBINATIONS);
    }

    #[test]
    fn ids_are_fresh_on_every_pass() {
        let groups = vec![VariantGroup::with_options("Color", ["Red", "Black"])];
        let first = generate(&groups).into_combinations();
        let second = generate(&groups).into_combinations();
        assert!(first.iter().zip(&second).all(|(a, b)| a.id != b.id));
    }

    #[test]
    fn regenerate_carries_price_and_stock_for_identical_selections() {
        let mut color = VariantGroup::with_options("Color", ["Red", "Black"]);
        let mut previous = generate(std::slice::from_ref(&color)).into_combinations();
        previous[0].price = 19_900;
        previous[0].stock = 4;
        previous[1].price = 21_900;
        previous[1].stock = 7;

        color.options.push(crate::VariantOption::new("White"));
        let combos = regenerate(std::slice::from_ref(&color), &previous).into_combinations();

        assert_eq!(combos.len(), 3);
        assert_eq!((combos[0].price, combos[0].stock), (19_900, 4));
        assert_eq!((combos[1].price, combos[1].stock), (21_900, 7));
        assert_eq!((combos[2].price, combos[2].stock), (0, 0));
    }

    #[test]
    fn regenerate_drops_values_when_a_group_is_added() {
        let color = VariantGroup::with_options("Color", ["Red"]);
        let mut previous = generate(std::slice::from_ref(&color)).into_combinations();
        previous[0].price = 500;

        let size = VariantGroup::with_options("Size", ["S"]);
        let combos = regenerate(&[color, size], &previous).into_combinations();
        assert_eq!(combos.len(), 1);
        assert_eq!(combos[0].price, 0);
    }

    #[test]
    fn repeated_group_ids_generate_nothing() {
        let size = VariantGroup::with_options("Size", ["S", "M"]);
        let mut color = VariantGroup::with_options("Color", ["Red"]);
        color.id = size.id;

        assert_eq!(generate(&[size, color]), Generation::Combinations(Vec::new()));
    }

    #[test]
    fn repeated_option_ids_generate_nothing() {
        let mut color = VariantGroup::with_options("Color", ["Red", "Black"]);
        color.options[1].id = color.options[0].id;

        assert!(generate(&[color]).into_combinations().is_empty());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn groups_strategy() -> impl Strategy<Value = Vec<VariantGroup>> {
            prop::collection::vec(0usize..6, 0..5).prop_map(|sizes| {
                sizes
                    .into_iter()
                    .enumerate()
                    .map(|(g, n)| {
                        VariantGroup::with_options(
                            format!("group-{g}"),
                            (0..n).map(|o| format!("option-{o}")),
                        )
                    })
                    .collect()
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: the set is exactly the Cartesian product of active groups.
            #[test]
            fn generates_the_full_cartesian_product(groups in groups_strategy()) {
                let combos = generate(&groups).into_combinations();
                let active: Vec<&VariantGroup> = groups.iter().filter(|g| g.is_active()).collect();

                let expected = if active.is_empty() {
                    0
                } else {
                    active.iter().map(|g| g.options.len()).product()
                };
                prop_assert_eq!(combos.len(), expected);

                let distinct: HashSet<&Selection> = combos.iter().map(|c| &c.combination).collect();
                prop_assert_eq!(distinct.len(), combos.len());

                for combo in &combos {
                    prop_assert_eq!(combo.combination.len(), active.len());
                    for group in &active {
                        let option = combo.combination.get(&group.id);
                        prop_assert!(option.is_some_and(|o| group.option(*o).is_some()));
                    }
                }
            }

            /// Property: re-running generation reproduces the same selections in order.
            #[test]
            fn order_is_deterministic(groups in groups_strategy()) {
                let first: Vec<Selection> = generate(&groups)
                    .into_combinations()
                    .into_iter()
                    .map(|c| c.combination)
                    .collect();
                let second: Vec<Selection> = generate(&groups)
                    .into_combinations()
                    .into_iter()
                    .map(|c| c.combination)
                    .collect();
                prop_assert_eq!(first, second);
            }

            /// Property: order is lexicographic by (group position, option position).
            #[test]
            fn order_is_lexicographic(groups in groups_strategy()) {
                let active: Vec<&VariantGroup> = groups.iter().filter(|g| g.is_active()).collect();
                let positions: Vec<Vec<usize>> = generate(&groups)
                    .into_combinations()
                    .iter()
                    .map(|c| {
                        active
                            .iter()
                            .map(|g| {
                                let id = c.combination[&g.id];
                                g.options.iter().position(|o| o.id == id).unwrap()
                            })
                            .collect()
                    })
                    .collect();
                prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}
