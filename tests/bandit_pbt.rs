//! Property-based tests for the scheduler's arithmetic backbone:
//! - the update rule keeps `avg_reward` equal to the mean of all applied
//!   rewards and `pulls` equal to their count
//! - text normalization is idempotent and only emits letters and spaces
//! - the greedy selector always returns a weakest arm

use proptest::prelude::*;

use lexiease_backend_rust::bandit::reward::normalize;
use lexiease_backend_rust::bandit::selector::select_next;
use lexiease_backend_rust::bandit::{Arm, ItemKind};
use lexiease_backend_rust::store::MemoryArmStore;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn arb_reward() -> impl Strategy<Value = f64> {
    // bounded rewards, negatives included: propagation pushes below zero
    (-1000i64..=1000i64).prop_map(|v| v as f64 / 1000.0)
}

proptest! {
    #[test]
    fn update_rule_maintains_the_running_mean(rewards in prop::collection::vec(arb_reward(), 1..64)) {
        let store = MemoryArmStore::new();
        store.ensure_arm("learner", ItemKind::Letter, "a");

        let mut last = None;
        for r in &rewards {
            last = store.apply_reward("learner", ItemKind::Letter, "a", *r);
        }

        let arm = last.unwrap();
        let expected_total: f64 = rewards.iter().sum();
        prop_assert_eq!(arm.pulls, rewards.len() as i64);
        prop_assert!((arm.total_reward - expected_total).abs() < 1e-9);
        prop_assert!((arm.avg_reward - expected_total / rewards.len() as f64).abs() < 1e-9);
    }

    #[test]
    fn constant_reward_converges_exactly(r in arb_reward(), n in 1usize..128) {
        let store = MemoryArmStore::new();
        store.ensure_arm("learner", ItemKind::Letter, "a");

        let mut last = None;
        for _ in 0..n {
            last = store.apply_reward("learner", ItemKind::Letter, "a", r);
        }

        let arm = last.unwrap();
        prop_assert!((arm.avg_reward - r).abs() < 1e-9);
    }

    #[test]
    fn normalize_is_idempotent(input in ".{0,64}") {
        let once = normalize(&input);
        let twice = normalize(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalize_emits_only_letters_and_single_spaces(input in ".{0,64}") {
        let normalized = normalize(&input);
        prop_assert!(normalized.chars().all(|c| c.is_ascii_lowercase() || c == ' '));
        prop_assert!(!normalized.contains("  "));
        prop_assert!(!normalized.starts_with(' '));
        prop_assert!(!normalized.ends_with(' '));
    }

    #[test]
    fn greedy_selector_returns_a_weakest_arm(
        avgs in prop::collection::vec((-1000i64..=1000i64).prop_map(|v| v as f64 / 1000.0), 1..32),
        seed in any::<u64>(),
    ) {
        let pool: Vec<Arm> = avgs
            .iter()
            .enumerate()
            .map(|(i, avg)| {
                let mut arm = Arm::new("learner", ItemKind::Word, format!("w-{i}"));
                arm.pulls = 1;
                arm.total_reward = *avg;
                arm.avg_reward = *avg;
                arm
            })
            .collect();

        let mut rng = StdRng::seed_from_u64(seed);
        let chosen = select_next(&pool, 0.0, &mut rng).unwrap();
        let min = avgs.iter().cloned().fold(f64::INFINITY, f64::min);
        prop_assert!((chosen.avg_reward - min).abs() < 1e-12);
    }
}
