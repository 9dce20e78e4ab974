//! Property-based invariant tests for the sheet stack reconciler.
//!
//! These tests verify, for arbitrary scripts of pushes, state removals,
//! user swipes, and frame ticks:
//!
//! 1. Every key in the state's tail is mounted
//! 2. A key the state dropped is flagged removing until evicted
//! 3. Every key is evicted at most once
//! 4. A key dismissed by the user produces exactly one pop, issued before
//!    eviction; a key the state dropped first produces none
//! 5. Mounted keys keep the order they were first pushed in
//! 6. Once the container catches up and animations settle, mounted keys and
//!    the state's tail agree

use std::collections::HashSet;

use proptest::prelude::*;
use sheetnav_core::RouteKey;
use sheetnav_harness::StackDriver;
use sheetnav_harness::strategies::{Op, script};

// ── Script runner ───────────────────────────────────────────────────────

struct Run {
    driver: StackDriver,
    pushed: usize,
    /// Keys the state dropped while they were still mounted.
    dropped_while_mounted: HashSet<String>,
}

impl Run {
    fn new() -> Self {
        Self {
            driver: StackDriver::new("base"),
            pushed: 0,
            dropped_while_mounted: HashSet::new(),
        }
    }

    fn apply(&mut self, op: &Op) {
        match op {
            Op::Push => {
                self.pushed += 1;
                let key = format!("s{:03}", self.pushed);
                self.driver.push(&key);
            }
            Op::Remove(i) => {
                let tail: Vec<String> = self.driver.keys()[1..].iter().map(|k| k.to_string()).collect();
                if tail.is_empty() {
                    return;
                }
                let key = &tail[i % tail.len()];
                if self.driver.stack.contains(&RouteKey::new(key)) {
                    self.dropped_while_mounted.insert(key.clone());
                }
                self.driver.remove(key);
            }
            Op::Swipe(i) => {
                let rendered: Vec<String> =
                    self.driver.rendered().iter().map(|k| k.to_string()).collect();
                if rendered.is_empty() {
                    return;
                }
                self.driver.swipe(&rendered[i % rendered.len()]);
            }
            Op::Tick(n) => {
                for _ in 0..*n {
                    self.driver.step();
                }
            }
            Op::ApplyPops => self.driver.apply_pops(),
        }
    }

    fn all_keys(&self) -> Vec<String> {
        (1..=self.pushed).map(|n| format!("s{n:03}")).collect()
    }

    fn check(&self) -> Result<(), TestCaseError> {
        let driver = &self.driver;
        let rendered = driver.rendered();

        // 1. tail ⊆ mounted, except keys whose pop the container has not
        //    applied yet
        for key in &driver.keys()[1..] {
            if driver.dispatcher.pops_for(key) > 0 {
                continue;
            }
            prop_assert!(rendered.contains(key), "tail key {key} not mounted: {rendered:?}");
        }

        // 2. dropped keys are flagged until evicted
        let tail: HashSet<&str> = driver.keys()[1..].iter().copied().collect();
        for key in &rendered {
            let removing = driver.stack.is_removing(&RouteKey::new(*key));
            prop_assert_eq!(removing, Some(!tail.contains(key)), "key {}", key);
        }

        for key in self.all_keys() {
            // 3. at most one eviction
            prop_assert!(driver.evictions(&key) <= 1, "{key} evicted twice");

            // 4. pops: at most one, never for state-dropped keys, always
            //    after the key left the stack
            let pops = driver.dispatcher.pops_for(&key);
            prop_assert!(pops <= 1, "{key} popped {pops} times");
            if self.dropped_while_mounted.contains(&key) {
                prop_assert_eq!(pops, 0, "state-dropped key {} was popped", key);
            }
            if pops == 1 {
                prop_assert!(!driver.stack.contains(&RouteKey::new(&key)));
                prop_assert_eq!(driver.evictions(&key), 1);
            }
        }

        // 5. stacking order follows push order
        let mut sorted = rendered.clone();
        sorted.sort_unstable();
        prop_assert_eq!(&rendered, &sorted);

        Ok(())
    }
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn invariants_hold_after_every_step(ops in script()) {
        let mut run = Run::new();
        for op in &ops {
            run.apply(op);
            run.check()?;
        }
    }

    #[test]
    fn converges_once_container_catches_up(ops in script()) {
        let mut run = Run::new();
        for op in &ops {
            run.apply(op);
        }
        run.driver.settle();
        run.driver.apply_pops();
        run.driver.settle();
        run.check()?;

        let tail: Vec<&str> = run.driver.keys()[1..].to_vec();
        prop_assert_eq!(run.driver.rendered(), tail);
        prop_assert!(run.driver.stack.is_settled());
    }

    #[test]
    fn user_dismissals_pop_exactly_once(pushes in 1usize..8, victim in any::<usize>()) {
        let mut run = Run::new();
        for _ in 0..pushes {
            run.apply(&Op::Push);
        }
        run.driver.settle();
        run.apply(&Op::Swipe(victim));
        run.driver.settle();

        let dispatched: usize = run.all_keys().iter().map(|k| run.driver.dispatcher.pops_for(k)).sum();
        prop_assert_eq!(dispatched, 1);
        prop_assert_eq!(run.driver.rendered().len(), pushes - 1);
    }
}
