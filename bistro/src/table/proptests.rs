//! Property-based tests for table allocation.

use std::collections::HashSet;

use proptest::prelude::*;

use super::{TableAllocator, TableStatus};
use crate::database::test_util::{create_test_database, insert_table};
use crate::database::Database;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    // Allocated tables are distinct, fit their party, and end up OCCUPIED
    #[test]
    fn allocations_never_share_a_table(
        capacities in prop::collection::vec(1u32..=8, 1..8),
        parties in prop::collection::vec(1u32..=8, 1..12)
    ) {
        let db = create_test_database();
        let conn = db.connection();
        for (index, capacity) in capacities.iter().enumerate() {
            insert_table(conn, u32::try_from(index + 1).unwrap(), *capacity);
        }

        let allocator = TableAllocator::default();
        let mut seen = HashSet::new();
        for party in &parties {
            if let Some(number) = allocator.allocate(conn, *party).unwrap() {
                prop_assert!(seen.insert(number), "table {} handed out twice", number);
                let table = Database::get_table(conn, number).unwrap().unwrap();
                prop_assert!(table.seats(*party));
                prop_assert_eq!(table.status(), TableStatus::Occupied);
            }
        }
        prop_assert!(seen.len() <= capacities.len());
    }

    // Of any number of claims on the same table, exactly one wins
    #[test]
    fn repeated_claims_have_one_winner(claims in 1usize..10) {
        let db = create_test_database();
        let conn = db.connection();
        let number = insert_table(conn, 1, 4);

        let allocator = TableAllocator::default();
        let wins = (0..claims)
            .filter(|_| allocator.claim(conn, number).unwrap())
            .count();
        prop_assert_eq!(wins, 1);
    }
}
