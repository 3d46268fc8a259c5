//! Secondary letter-arm updates driven by composite attempts.

use super::types::ItemKind;
use crate::store::{ArmStore, StoreError};

/// Applies a fixed negative contribution to each problem letter's arm.
/// Letters without an existing arm are skipped; the learner has not
/// practiced them yet and there is nothing to remediate.
pub async fn penalize_problem_letters(
    store: &ArmStore,
    learner_id: &str,
    letters: &[char],
    penalty: f64,
) -> Result<(), StoreError> {
    for letter in letters {
        let item_id = letter.to_string();
        let updated = store
            .apply_reward(learner_id, ItemKind::Letter, &item_id, -penalty)
            .await?;
        if let Some(arm) = updated {
            tracing::debug!(
                learner_id,
                letter = %item_id,
                avg_reward = arm.avg_reward,
                "penalized problem letter"
            );
        }
    }
    Ok(())
}

/// Two-letter attempts reinforce every letter of the expected text with the
/// attempt's own reward, creating letter arms on demand.
pub async fn reinforce_expected_letters(
    store: &ArmStore,
    learner_id: &str,
    expected_norm: &str,
    reward: f64,
) -> Result<(), StoreError> {
    for letter in expected_norm.chars().filter(|c| c.is_ascii_lowercase()) {
        let item_id = letter.to_string();
        store
            .ensure_arm(learner_id, ItemKind::Letter, &item_id)
            .await?;
        store
            .apply_reward(learner_id, ItemKind::Letter, &item_id, reward)
            .await?;
    }
    Ok(())
}
