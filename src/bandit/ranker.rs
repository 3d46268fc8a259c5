//! Weak-letter candidate ranking for word-like item types.
//!
//! Words that exercise the learner's worst letters are preferred; a word
//! scores one point per occurrence of each weak letter in its text.

use crate::catalog::CatalogEntry;

/// Bootstrap weak letters for a learner with no letter history yet.
pub const BOOTSTRAP_LETTERS: [char; 3] = ['a', 'e', 'i'];

/// Total occurrences of the weak letters in `text` (lowercased).
pub fn weak_letter_score(text: &str, weak_letters: &[char]) -> usize {
    let text = text.to_lowercase();
    weak_letters
        .iter()
        .map(|letter| text.chars().filter(|c| c == letter).count())
        .sum()
}

/// Candidates with a positive weak-letter score. When nothing in the
/// catalog stresses the weak letters, every entry is kept instead so
/// selection still has a pool to work with.
pub fn rank_candidates(
    entries: &'static [CatalogEntry],
    weak_letters: &[char],
) -> Vec<&'static CatalogEntry> {
    let scored: Vec<&CatalogEntry> = entries
        .iter()
        .filter(|entry| weak_letter_score(entry.text, weak_letters) > 0)
        .collect();

    if scored.is_empty() {
        entries.iter().collect()
    } else {
        scored
    }
}
