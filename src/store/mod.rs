//! Arm persistence. One record per `(learner, item type, item)` key with
//! atomic create-if-absent, activation, claim, and reward-update
//! operations; the store is the only shared mutable state in the service.
//!
//! Two backends behind one front: PostgreSQL for deployments, an
//! in-process map for tests and for running without a `DATABASE_URL`.

mod memory;
mod postgres;

pub use memory::MemoryArmStore;
pub use postgres::PgArmStore;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::bandit::{Arm, ItemKind};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub enum ArmStore {
    Postgres(PgArmStore),
    Memory(MemoryArmStore),
}

impl ArmStore {
    /// Connects to Postgres and brings the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        Ok(Self::Postgres(PgArmStore::connect(database_url).await?))
    }

    pub fn in_memory() -> Self {
        Self::Memory(MemoryArmStore::new())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Self::Postgres(store) => store.ping().await,
            Self::Memory(_) => Ok(()),
        }
    }

    /// Create-if-absent upsert. Never touches an existing arm's statistics;
    /// safe to call concurrently for the same key.
    pub async fn ensure_arm(
        &self,
        learner_id: &str,
        kind: ItemKind,
        item_id: &str,
    ) -> Result<(), StoreError> {
        match self {
            Self::Postgres(store) => store.ensure_arm(learner_id, kind, item_id).await,
            Self::Memory(store) => {
                store.ensure_arm(learner_id, kind, item_id);
                Ok(())
            }
        }
    }

    pub async fn get_arm(
        &self,
        learner_id: &str,
        kind: ItemKind,
        item_id: &str,
    ) -> Result<Option<Arm>, StoreError> {
        match self {
            Self::Postgres(store) => store.get_arm(learner_id, kind, item_id).await,
            Self::Memory(store) => Ok(store.get_arm(learner_id, kind, item_id)),
        }
    }

    pub async fn arms_for_items(
        &self,
        learner_id: &str,
        kind: ItemKind,
        item_ids: &[String],
    ) -> Result<Vec<Arm>, StoreError> {
        match self {
            Self::Postgres(store) => store.arms_for_items(learner_id, kind, item_ids).await,
            Self::Memory(store) => Ok(store.arms_for_items(learner_id, kind, item_ids)),
        }
    }

    /// The learner's weakest arms of a kind, ascending by average reward
    /// (ties toward fewer pulls).
    pub async fn weakest(
        &self,
        learner_id: &str,
        kind: ItemKind,
        limit: usize,
    ) -> Result<Vec<Arm>, StoreError> {
        match self {
            Self::Postgres(store) => store.weakest(learner_id, kind, limit).await,
            Self::Memory(store) => Ok(store.weakest(learner_id, kind, limit)),
        }
    }

    /// Atomically deactivates every other arm of the `(learner, kind)`
    /// partition and activates `item_id`, stamping `last_shown_at` when
    /// `touch_last_shown` is set. Concurrent activations for the same
    /// partition serialize; exactly one arm ends up active.
    pub async fn activate(
        &self,
        learner_id: &str,
        kind: ItemKind,
        item_id: &str,
        touch_last_shown: bool,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        match self {
            Self::Postgres(store) => {
                store
                    .activate(learner_id, kind, item_id, touch_last_shown, now)
                    .await
            }
            Self::Memory(store) => {
                store.activate(learner_id, kind, item_id, touch_last_shown, now);
                Ok(())
            }
        }
    }

    /// Consumes the active flag: flips `is_active` from true to false and
    /// reports whether this call did the flip. A concurrent duplicate
    /// attempt sees `false` and must not score.
    pub async fn claim_active(
        &self,
        learner_id: &str,
        kind: ItemKind,
        item_id: &str,
    ) -> Result<bool, StoreError> {
        match self {
            Self::Postgres(store) => store.claim_active(learner_id, kind, item_id).await,
            Self::Memory(store) => Ok(store.claim_active(learner_id, kind, item_id)),
        }
    }

    /// The update rule, as one atomic statement:
    /// `pulls += 1; total += r; avg = total / pulls`. Returns the updated
    /// arm, or `None` when no such arm exists.
    pub async fn apply_reward(
        &self,
        learner_id: &str,
        kind: ItemKind,
        item_id: &str,
        reward: f64,
    ) -> Result<Option<Arm>, StoreError> {
        match self {
            Self::Postgres(store) => store.apply_reward(learner_id, kind, item_id, reward).await,
            Self::Memory(store) => Ok(store.apply_reward(learner_id, kind, item_id, reward)),
        }
    }
}
