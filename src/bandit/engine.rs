//! The scheduler itself: wires cold start, ranking, cooldown, selection
//! and activation into the selection path, and reward computation, the
//! update rule and propagation into the attempt path.

use std::sync::Arc;

use chrono::Utc;

use super::types::{
    Arm, AttemptInput, AttemptOutcome, ItemKind, KindProfile, RewardPolicy, SchedulerError,
    Selection,
};
use super::{coldstart, cooldown, propagation, ranker, reward, selector};
use crate::catalog;
use crate::config::SchedulerConfig;
use crate::store::ArmStore;

pub struct Scheduler {
    store: Arc<ArmStore>,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(store: Arc<ArmStore>, config: SchedulerConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &ArmStore {
        &self.store
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Selection path. Activates exactly one arm for the learner and item
    /// type and returns the item to present.
    pub async fn select_next(
        &self,
        learner_id: &str,
        kind: ItemKind,
    ) -> Result<Selection, SchedulerError> {
        let profile = self.config.profile(kind);

        let entries = catalog::entries(kind);
        if entries.is_empty() {
            return Err(SchedulerError::NoCandidates(kind));
        }

        let (candidates, target_letters) = if profile.uses_ranker {
            let weak = self.weak_letters(learner_id).await?;
            (ranker::rank_candidates(entries, &weak), Some(weak))
        } else {
            (entries.iter().collect::<Vec<_>>(), None)
        };

        let candidate_ids: Vec<String> = candidates.iter().map(|e| e.id.to_string()).collect();
        coldstart::ensure_arms(
            &self.store,
            learner_id,
            kind,
            &candidate_ids,
            self.config.coldstart_concurrency,
        )
        .await?;

        let arms = self
            .store
            .arms_for_items(learner_id, kind, &candidate_ids)
            .await?;
        if arms.is_empty() {
            return Err(SchedulerError::NoCandidates(kind));
        }

        let pool = match profile.cooldown {
            Some(window) => cooldown::filter_recent(arms, window, Utc::now()),
            None => arms,
        };

        let chosen_id = {
            let mut rng = rand::rng();
            selector::select_next(&pool, profile.epsilon, &mut rng)
                .map(|arm| arm.item_id.clone())
                .ok_or(SchedulerError::NoCandidates(kind))?
        };

        self.store
            .activate(
                learner_id,
                kind,
                &chosen_id,
                profile.tracks_last_shown(),
                Utc::now(),
            )
            .await?;

        let entry = catalog::find(kind, &chosen_id).ok_or(SchedulerError::NoCandidates(kind))?;

        tracing::info!(learner_id, %kind, item_id = %chosen_id, "selected next item");

        Ok(Selection {
            item_id: entry.id.to_string(),
            display_text: entry.text.to_string(),
            target_letters,
        })
    }

    /// Attempt path. The transcript has already been produced; nothing here
    /// mutates state until the active flag is atomically claimed, so a
    /// failed precondition or a duplicate request leaves every arm as it
    /// was.
    pub async fn submit_attempt(
        &self,
        learner_id: &str,
        kind: ItemKind,
        input: AttemptInput,
    ) -> Result<AttemptOutcome, SchedulerError> {
        let profile = self.config.profile(kind);

        if input.item_id.trim().is_empty() {
            return Err(SchedulerError::InvalidInput("itemId is required".into()));
        }
        if input.expected.trim().is_empty() {
            return Err(SchedulerError::InvalidInput("expected text is required".into()));
        }
        if profile.policy == RewardPolicy::Spoken {
            match input.response_time_ms {
                Some(ms) if ms > 0 => {}
                _ => {
                    return Err(SchedulerError::InvalidInput(
                        "responseTimeMs must be a positive number".into(),
                    ));
                }
            }
        }

        let arm = self
            .store
            .get_arm(learner_id, kind, &input.item_id)
            .await?
            .ok_or_else(|| SchedulerError::Conflict(format!("no active {kind} to attempt")))?;
        if !arm.is_active {
            return Err(SchedulerError::Conflict(format!(
                "no active {kind} to attempt"
            )));
        }

        let scored = score_attempt(&profile, &input);

        // Consume the active flag before touching statistics; a replayed or
        // concurrent duplicate fails here instead of double-scoring.
        let claimed = self
            .store
            .claim_active(learner_id, kind, &input.item_id)
            .await?;
        if !claimed {
            return Err(SchedulerError::Conflict(format!(
                "{kind} attempt was already scored"
            )));
        }

        let updated: Arm = self
            .store
            .apply_reward(learner_id, kind, &input.item_id, scored.reward)
            .await?
            .ok_or_else(|| SchedulerError::Conflict(format!("no active {kind} to attempt")))?;

        if profile.reinforces_letters {
            propagation::reinforce_expected_letters(
                &self.store,
                learner_id,
                &reward::normalize(&input.expected),
                scored.reward,
            )
            .await?;
        }

        if profile.propagates && !scored.problem_letters.is_empty() {
            propagation::penalize_problem_letters(
                &self.store,
                learner_id,
                &scored.problem_letters,
                self.config.propagation_penalty,
            )
            .await?;
        }

        tracing::info!(
            learner_id,
            %kind,
            item_id = %input.item_id,
            score = scored.score,
            reward = scored.reward,
            correct = scored.correct,
            "attempt scored"
        );

        Ok(AttemptOutcome {
            correct: scored.correct,
            score: scored.score,
            reward: scored.reward,
            pulls: updated.pulls,
            avg_reward: updated.avg_reward,
            problem_letters: scored.problem_letters,
            transcript: scored.transcript,
        })
    }

    /// The learner's weakest letters by ascending average reward; a fixed
    /// bootstrap set before any letter has been practiced.
    async fn weak_letters(&self, learner_id: &str) -> Result<Vec<char>, SchedulerError> {
        let arms = self
            .store
            .weakest(learner_id, ItemKind::Letter, self.config.weak_letter_limit)
            .await?;

        if arms.is_empty() {
            return Ok(ranker::BOOTSTRAP_LETTERS.to_vec());
        }

        Ok(arms
            .iter()
            .filter_map(|arm| arm.item_id.chars().next())
            .collect())
    }
}

struct ScoredAttempt {
    correct: bool,
    score: i32,
    reward: f64,
    problem_letters: Vec<char>,
    transcript: String,
}

fn score_attempt(profile: &KindProfile, input: &AttemptInput) -> ScoredAttempt {
    let spoken_norm = reward::normalize(&input.transcript);
    let expected_norm = reward::normalize(&input.expected);

    match profile.policy {
        RewardPolicy::Letter => {
            let target = expected_norm.chars().next().unwrap_or_default();
            let score = reward::letter_score(target, &input.transcript);
            ScoredAttempt {
                correct: score == 100,
                score,
                reward: reward::letter_reward(score),
                problem_letters: Vec::new(),
                transcript: spoken_norm,
            }
        }
        RewardPolicy::TwoLetter => {
            let (score, correct) = reward::two_letter_score(&input.expected, &input.transcript);
            ScoredAttempt {
                correct,
                score,
                reward: reward::two_letter_reward(score),
                problem_letters: reward::positional_mismatches(&expected_norm, &spoken_norm),
                transcript: spoken_norm,
            }
        }
        RewardPolicy::Spoken => {
            let correct = expected_norm == spoken_norm;
            // validated above
            let response_time_ms = input.response_time_ms.unwrap_or(reward::FLUENCY_TARGET_MS);
            ScoredAttempt {
                correct,
                score: if correct { 100 } else { 0 },
                reward: reward::spoken_reward(correct, response_time_ms),
                problem_letters: reward::problem_letters(&expected_norm, &spoken_norm),
                transcript: spoken_norm,
            }
        }
    }
}
