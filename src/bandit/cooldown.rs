//! Recently-shown filter for item types that track `last_shown_at`.

use chrono::{DateTime, Utc};
use std::time::Duration;

use super::types::Arm;

/// Drops arms shown within `window` of `now`. Never empties the pool: if
/// every candidate is still cooling down, the unfiltered pool is returned
/// so selection always has something to pick.
pub fn filter_recent(arms: Vec<Arm>, window: Duration, now: DateTime<Utc>) -> Vec<Arm> {
    let window = chrono::Duration::from_std(window).unwrap_or_else(|_| chrono::Duration::seconds(30));
    let filtered: Vec<Arm> = arms
        .iter()
        .filter(|arm| match arm.last_shown_at {
            None => true,
            Some(shown) => now.signed_duration_since(shown) > window,
        })
        .cloned()
        .collect();

    if filtered.is_empty() {
        arms
    } else {
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bandit::types::ItemKind;
    use chrono::{TimeZone, Utc};

    const WINDOW: Duration = Duration::from_secs(30);

    fn arm(item_id: &str, shown_secs_ago: Option<i64>, now: DateTime<Utc>) -> Arm {
        let mut arm = Arm::new("learner", ItemKind::Word, item_id);
        arm.last_shown_at = shown_secs_ago.map(|secs| now - chrono::Duration::seconds(secs));
        arm
    }

    #[test]
    fn keeps_unshown_and_stale_arms() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let arms = vec![
            arm("fresh", Some(5), now),
            arm("stale", Some(120), now),
            arm("never", None, now),
        ];
        let kept = filter_recent(arms, WINDOW, now);
        let ids: Vec<&str> = kept.iter().map(|a| a.item_id.as_str()).collect();
        assert_eq!(ids, vec!["stale", "never"]);
    }

    #[test]
    fn boundary_is_exclusive() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let arms = vec![arm("edge", Some(30), now), arm("past", Some(31), now)];
        let kept = filter_recent(arms, WINDOW, now);
        let ids: Vec<&str> = kept.iter().map(|a| a.item_id.as_str()).collect();
        // exactly-30s-old is still cooling down
        assert_eq!(ids, vec!["past"]);
    }

    #[test]
    fn falls_back_to_unfiltered_pool_when_all_recent() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let arms = vec![arm("a", Some(1), now), arm("b", Some(2), now)];
        let kept = filter_recent(arms.clone(), WINDOW, now);
        assert_eq!(kept.len(), arms.len());
    }
}
