//! Property-based tests for seating capacity.

use super::seating_fits;
use proptest::prelude::*;

// Tries every assignment of parties to distinct tables.
fn exhaustive_fit(capacities: &[u32], parties: &[u32], used: &mut Vec<bool>) -> bool {
    let Some((&party, rest)) = parties.split_first() else {
        return true;
    };
    for (index, &capacity) in capacities.iter().enumerate() {
        if !used[index] && capacity >= party {
            used[index] = true;
            let fits = exhaustive_fit(capacities, rest, used);
            used[index] = false;
            if fits {
                return true;
            }
        }
    }
    false
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Greedy seating agrees with a brute-force search
    #[test]
    fn greedy_matches_exhaustive(
        capacities in prop::collection::vec(1u32..=10, 0..6),
        parties in prop::collection::vec(1u32..=10, 0..6)
    ) {
        let mut used = vec![false; capacities.len()];
        let expected = exhaustive_fit(&capacities, &parties, &mut used);
        prop_assert_eq!(seating_fits(capacities, parties), expected);
    }

    // Adding a table never turns a fit into a misfit
    #[test]
    fn more_tables_never_hurts(
        capacities in prop::collection::vec(1u32..=10, 0..6),
        parties in prop::collection::vec(1u32..=10, 0..6),
        extra in 1u32..=10
    ) {
        if seating_fits(capacities.clone(), parties.clone()) {
            let mut more = capacities;
            more.push(extra);
            prop_assert!(seating_fits(more, parties));
        }
    }

    // More parties than tables can never fit
    #[test]
    fn one_party_per_table(
        capacities in prop::collection::vec(1u32..=10, 0..5)
    ) {
        let parties = vec![1; capacities.len() + 1];
        prop_assert!(!seating_fits(capacities, parties));
    }
}
