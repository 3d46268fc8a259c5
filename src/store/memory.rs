//! In-process arm store. Backs the test suite and `DATABASE_URL`-less
//! development runs with the same semantics as the Postgres backend.
//!
//! A single map-wide write lock makes every multi-arm operation (activate,
//! claim) atomic; no lock is ever held across an await point.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::bandit::{Arm, ItemKind};

type Key = (String, ItemKind, String);

#[derive(Default)]
pub struct MemoryArmStore {
    arms: RwLock<HashMap<Key, Arm>>,
}

impl MemoryArmStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(learner_id: &str, kind: ItemKind, item_id: &str) -> Key {
        (learner_id.to_string(), kind, item_id.to_string())
    }

    pub fn ensure_arm(&self, learner_id: &str, kind: ItemKind, item_id: &str) {
        let mut arms = self.arms.write();
        arms.entry(Self::key(learner_id, kind, item_id))
            .or_insert_with(|| Arm::new(learner_id, kind, item_id));
    }

    pub fn get_arm(&self, learner_id: &str, kind: ItemKind, item_id: &str) -> Option<Arm> {
        self.arms
            .read()
            .get(&Self::key(learner_id, kind, item_id))
            .cloned()
    }

    pub fn arms_for_items(
        &self,
        learner_id: &str,
        kind: ItemKind,
        item_ids: &[String],
    ) -> Vec<Arm> {
        let arms = self.arms.read();
        item_ids
            .iter()
            .filter_map(|item_id| arms.get(&Self::key(learner_id, kind, item_id)).cloned())
            .collect()
    }

    pub fn weakest(&self, learner_id: &str, kind: ItemKind, limit: usize) -> Vec<Arm> {
        let arms = self.arms.read();
        let mut matching: Vec<Arm> = arms
            .values()
            .filter(|arm| arm.learner_id == learner_id && arm.kind == kind)
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.avg_reward
                .partial_cmp(&b.avg_reward)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.pulls.cmp(&b.pulls))
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        matching.truncate(limit);
        matching
    }

    pub fn activate(
        &self,
        learner_id: &str,
        kind: ItemKind,
        item_id: &str,
        touch_last_shown: bool,
        now: DateTime<Utc>,
    ) {
        let mut arms = self.arms.write();
        for (key, arm) in arms.iter_mut() {
            if key.0 == learner_id && key.1 == kind && key.2 != item_id {
                arm.is_active = false;
            }
        }
        if let Some(arm) = arms.get_mut(&Self::key(learner_id, kind, item_id)) {
            arm.is_active = true;
            if touch_last_shown {
                arm.last_shown_at = Some(now);
            }
        }
    }

    pub fn claim_active(&self, learner_id: &str, kind: ItemKind, item_id: &str) -> bool {
        let mut arms = self.arms.write();
        match arms.get_mut(&Self::key(learner_id, kind, item_id)) {
            Some(arm) if arm.is_active => {
                arm.is_active = false;
                true
            }
            _ => false,
        }
    }

    pub fn apply_reward(
        &self,
        learner_id: &str,
        kind: ItemKind,
        item_id: &str,
        reward: f64,
    ) -> Option<Arm> {
        let mut arms = self.arms.write();
        let arm = arms.get_mut(&Self::key(learner_id, kind, item_id))?;
        arm.pulls += 1;
        arm.total_reward += reward;
        arm.avg_reward = arm.total_reward / arm.pulls as f64;
        Some(arm.clone())
    }
}
