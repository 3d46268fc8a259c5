//! Scoring and reward policies: raw transcript in, normalized reward out.
//!
//! All comparisons run on normalized text (lowercased, non-letter
//! characters stripped, whitespace collapsed). Rewards are bounded per
//! attempt but arm averages are not clamped anywhere downstream.

use crate::catalog;

/// Fluency is full marks at or under this response time and decays
/// hyperbolically past it.
pub const FLUENCY_TARGET_MS: i64 = 3000;

/// Lowercase, drop everything that is not an ASCII letter or whitespace,
/// collapse runs of whitespace to a single space, trim.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_lowercase() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else if ch.is_whitespace() {
            pending_space = true;
        }
    }
    out
}

/// Letter scoring: 100 for a phonetic-variant match (exact or substring),
/// 30 for a non-empty transcript that matches nothing, 0 otherwise.
pub fn letter_score(target: char, transcript: &str) -> i32 {
    let spoken = normalize(transcript);
    for variant in catalog::letter_variants(target) {
        if spoken == *variant || spoken.contains(variant) {
            return 100;
        }
    }
    if spoken.is_empty() {
        0
    } else {
        30
    }
}

pub fn letter_reward(score: i32) -> f64 {
    if score >= 80 {
        1.0
    } else if score >= 30 {
        0.4
    } else {
        0.0
    }
}

/// Two-letter scoring: exact match 100, substring 80, otherwise the share
/// of positions that match, scaled to 100 and rounded. The substring case
/// keeps digraph answers like "bee" for "be" correct.
pub fn two_letter_score(expected: &str, spoken: &str) -> (i32, bool) {
    let expected = normalize(expected);
    let spoken = normalize(spoken);

    if spoken == expected {
        return (100, true);
    }
    if !expected.is_empty() && spoken.contains(&expected) {
        return (80, true);
    }

    let expected_chars: Vec<char> = expected.chars().collect();
    let spoken_chars: Vec<char> = spoken.chars().collect();
    if expected_chars.is_empty() {
        return (0, false);
    }
    let matches = expected_chars
        .iter()
        .zip(spoken_chars.iter())
        .filter(|(e, s)| e == s)
        .count();
    let score = ((matches as f64 / expected_chars.len() as f64) * 100.0).round() as i32;
    (score, false)
}

pub fn two_letter_reward(score: i32) -> f64 {
    if score >= 90 {
        1.0
    } else if score >= 50 {
        0.6
    } else if score >= 20 {
        0.3
    } else {
        0.0
    }
}

pub fn fluency(response_time_ms: i64) -> f64 {
    (FLUENCY_TARGET_MS as f64 / response_time_ms as f64).min(1.0)
}

/// Word/sentence reward: 60% correctness, 40% fluency.
pub fn spoken_reward(correct: bool, response_time_ms: i64) -> f64 {
    let correctness = if correct { 1.0 } else { 0.0 };
    0.6 * correctness + 0.4 * fluency(response_time_ms)
}

/// Letters the learner got wrong, position by position up to the shorter
/// text, deduplicated in first-seen order. Drives propagation for words
/// and sentences.
pub fn problem_letters(expected_norm: &str, spoken_norm: &str) -> Vec<char> {
    let mut out = Vec::new();
    for (exp, spk) in expected_norm.chars().zip(spoken_norm.chars()) {
        if exp != spk && exp.is_ascii_lowercase() && !out.contains(&exp) {
            out.push(exp);
        }
    }
    out
}

/// Positional mismatches over the full expected text; a spoken text that
/// runs short counts the remaining expected letters as mismatches. Used
/// for the two-letter problem report.
pub fn positional_mismatches(expected_norm: &str, spoken_norm: &str) -> Vec<char> {
    let spoken: Vec<char> = spoken_norm.chars().collect();
    let mut out = Vec::new();
    for (i, exp) in expected_norm.chars().enumerate() {
        if spoken.get(i) != Some(&exp) && exp.is_ascii_lowercase() && !out.contains(&exp) {
            out.push(exp);
        }
    }
    out
}
