//! The adaptive content scheduler: per-learner, per-item bandit arms, an
//! epsilon-greedy policy biased toward the learner's weakest items, and
//! the reward/propagation rules that keep the arms honest.

pub mod coldstart;
pub mod cooldown;
pub mod engine;
pub mod propagation;
pub mod ranker;
pub mod reward;
pub mod selector;
pub mod types;

pub use engine::Scheduler;
pub use types::{
    Arm, AttemptInput, AttemptOutcome, ItemKind, KindProfile, RewardPolicy, SchedulerError,
    Selection,
};
