use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::bandit::{ItemKind, KindProfile, RewardPolicy};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(5001);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            host,
            port,
            log_level,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Scheduler knobs. The exploration rate is one documented default with
/// optional per-item-type overrides, replacing the scattered per-call-site
/// constants of earlier iterations.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Exploration probability used by every item type unless overridden.
    pub epsilon: f64,
    /// Per-kind overrides, in [`ItemKind`] declaration order:
    /// letter, twoLetterWord, word, sentence.
    pub epsilon_overrides: [Option<f64>; 4],
    /// Recently-shown window for word-like item types.
    pub cooldown: Duration,
    /// How many of the learner's worst letters drive candidate ranking.
    pub weak_letter_limit: usize,
    /// Fixed magnitude of the propagated letter penalty.
    pub propagation_penalty: f64,
    /// Concurrent upserts during cold start.
    pub coldstart_concurrency: usize,
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            epsilon: env_f64("BANDIT_EPSILON").unwrap_or(defaults.epsilon),
            epsilon_overrides: [
                env_f64("BANDIT_EPSILON_LETTER"),
                env_f64("BANDIT_EPSILON_TWO_LETTER_WORD"),
                env_f64("BANDIT_EPSILON_WORD"),
                env_f64("BANDIT_EPSILON_SENTENCE"),
            ],
            cooldown: Duration::from_secs(
                env_u64("BANDIT_COOLDOWN_SECS").unwrap_or(defaults.cooldown.as_secs()),
            ),
            weak_letter_limit: env_u64("BANDIT_WEAK_LETTER_LIMIT")
                .map(|v| v as usize)
                .unwrap_or(defaults.weak_letter_limit),
            propagation_penalty: env_f64("BANDIT_PROPAGATION_PENALTY")
                .unwrap_or(defaults.propagation_penalty),
            coldstart_concurrency: env_u64("BANDIT_COLDSTART_CONCURRENCY")
                .map(|v| v as usize)
                .unwrap_or(defaults.coldstart_concurrency),
        }
    }

    pub fn epsilon_for(&self, kind: ItemKind) -> f64 {
        let idx = match kind {
            ItemKind::Letter => 0,
            ItemKind::TwoLetterWord => 1,
            ItemKind::Word => 2,
            ItemKind::Sentence => 3,
        };
        self.epsilon_overrides[idx]
            .unwrap_or(self.epsilon)
            .clamp(0.0, 1.0)
    }

    /// The strategy descriptor that turns the shared mechanics into one of
    /// the four item-type schedulers.
    pub fn profile(&self, kind: ItemKind) -> KindProfile {
        let epsilon = self.epsilon_for(kind);
        match kind {
            ItemKind::Letter => KindProfile {
                kind,
                epsilon,
                uses_ranker: false,
                cooldown: None,
                policy: RewardPolicy::Letter,
                propagates: false,
                reinforces_letters: false,
            },
            ItemKind::TwoLetterWord => KindProfile {
                kind,
                epsilon,
                uses_ranker: true,
                cooldown: Some(self.cooldown),
                policy: RewardPolicy::TwoLetter,
                propagates: false,
                reinforces_letters: true,
            },
            ItemKind::Word => KindProfile {
                kind,
                epsilon,
                uses_ranker: true,
                cooldown: Some(self.cooldown),
                policy: RewardPolicy::Spoken,
                propagates: true,
                reinforces_letters: false,
            },
            ItemKind::Sentence => KindProfile {
                kind,
                epsilon,
                uses_ranker: false,
                cooldown: None,
                policy: RewardPolicy::Spoken,
                propagates: true,
                reinforces_letters: false,
            },
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.3,
            epsilon_overrides: [None; 4],
            cooldown: Duration::from_secs(30),
            weak_letter_limit: 3,
            propagation_penalty: 0.2,
            coldstart_concurrency: 8,
        }
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_epsilon_applies_to_every_kind() {
        let config = SchedulerConfig::default();
        for kind in [
            ItemKind::Letter,
            ItemKind::TwoLetterWord,
            ItemKind::Word,
            ItemKind::Sentence,
        ] {
            assert_eq!(config.epsilon_for(kind), 0.3);
        }
    }

    #[test]
    fn per_kind_override_wins() {
        let mut config = SchedulerConfig::default();
        config.epsilon_overrides[0] = Some(0.1);
        assert_eq!(config.epsilon_for(ItemKind::Letter), 0.1);
        assert_eq!(config.epsilon_for(ItemKind::Word), 0.3);
    }

    #[test]
    fn profiles_wire_the_right_stages() {
        let config = SchedulerConfig::default();

        let letter = config.profile(ItemKind::Letter);
        assert!(!letter.uses_ranker);
        assert!(letter.cooldown.is_none());
        assert!(!letter.propagates);

        let word = config.profile(ItemKind::Word);
        assert!(word.uses_ranker);
        assert!(word.tracks_last_shown());
        assert!(word.propagates);

        let two_letter = config.profile(ItemKind::TwoLetterWord);
        assert!(two_letter.reinforces_letters);
        assert!(!two_letter.propagates);

        let sentence = config.profile(ItemKind::Sentence);
        assert!(!sentence.uses_ranker);
        assert!(sentence.cooldown.is_none());
        assert!(sentence.propagates);
    }
}
