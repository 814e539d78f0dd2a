//! Property-based tests for pool loans.

use std::collections::HashSet;
use std::time::Duration;

use proptest::prelude::*;

use super::testing::FakeManager;
use super::{ConnectionPool, PoolConfig, PooledConnection};

#[derive(Debug, Clone)]
enum Step {
    Acquire,
    Release(usize),
    Invalidate(usize),
    Reap,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => Just(Step::Acquire),
        2 => any::<usize>().prop_map(Step::Release),
        1 => any::<usize>().prop_map(Step::Invalidate),
        1 => Just(Step::Reap),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    // Loans stay exclusive and the counts stay within bounds
    #[test]
    fn loans_respect_bounds(
        max_size in 1usize..5,
        max_idle in 0usize..5,
        steps in prop::collection::vec(step_strategy(), 1..40)
    ) {
        let config = PoolConfig::default()
            .with_max_size(max_size)
            .with_max_idle(max_idle)
            .with_idle_timeout(Duration::from_secs(3600))
            .with_acquire_timeout(Duration::from_millis(1))
            .without_reaper();
        let manager = FakeManager::default();
        let pool = ConnectionPool::new(manager.clone(), config).unwrap();
        let mut held: Vec<PooledConnection<FakeManager>> = Vec::new();

        for step in steps {
            match step {
                Step::Acquire => match pool.acquire() {
                    Ok(conn) => held.push(conn),
                    Err(e) => prop_assert_eq!(held.len(), max_size, "unexpected {:?}", e),
                },
                Step::Release(i) if !held.is_empty() => {
                    let conn = held.swap_remove(i % held.len());
                    pool.release(conn);
                }
                Step::Invalidate(i) if !held.is_empty() => {
                    let index = i % held.len();
                    held[index].invalidate();
                }
                Step::Reap => {
                    prop_assert_eq!(pool.reap_idle(), 0);
                }
                Step::Release(_) | Step::Invalidate(_) => {}
            }

            let ids: HashSet<u64> = held.iter().map(PooledConnection::id).collect();
            prop_assert_eq!(ids.len(), held.len());

            let state = pool.state();
            prop_assert_eq!(state.loaned, held.len());
            prop_assert!(state.open <= max_size);
            prop_assert!(state.idle <= max_idle);
            prop_assert_eq!(state.open, manager.connects() - manager.disconnects());
        }
    }
}
