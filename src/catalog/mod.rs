//! Read-only catalog of practice content, loaded once at startup and shared
//! by every request.

mod data;

pub use data::{LETTERS, LETTER_VARIANTS, SENTENCES, TWO_LETTER_WORDS, WORDS};

use crate::bandit::ItemKind;

/// One practice item: a stable identifier plus the text shown to (and
/// expected from) the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub text: &'static str,
}

/// The full candidate set for an item type.
pub fn entries(kind: ItemKind) -> &'static [CatalogEntry] {
    match kind {
        ItemKind::Letter => &LETTERS,
        ItemKind::TwoLetterWord => &TWO_LETTER_WORDS,
        ItemKind::Word => &WORDS,
        ItemKind::Sentence => &SENTENCES,
    }
}

pub fn find(kind: ItemKind, item_id: &str) -> Option<&'static CatalogEntry> {
    entries(kind).iter().find(|entry| entry.id == item_id)
}

/// Accepted phonetic renderings for a letter; empty for anything that is
/// not a lowercase ASCII letter.
pub fn letter_variants(letter: char) -> &'static [&'static str] {
    LETTER_VARIANTS
        .iter()
        .find(|(l, _)| *l == letter)
        .map(|(_, variants)| *variants)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_letter_has_variants() {
        for entry in &LETTERS {
            let letter = entry.id.chars().next().unwrap();
            assert!(
                !letter_variants(letter).is_empty(),
                "letter {letter} has no phonetic variants"
            );
        }
    }

    #[test]
    fn catalog_ids_are_unique_per_kind() {
        for kind in [
            ItemKind::Letter,
            ItemKind::TwoLetterWord,
            ItemKind::Word,
            ItemKind::Sentence,
        ] {
            let items = entries(kind);
            let mut ids: Vec<&str> = items.iter().map(|e| e.id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), items.len());
        }
    }

    #[test]
    fn word_catalog_covers_the_alphabet() {
        for letter in 'a'..='z' {
            assert!(
                WORDS.iter().any(|w| w.text.contains(letter)),
                "no word contains {letter}"
            );
        }
    }

    #[test]
    fn find_resolves_known_ids() {
        assert_eq!(find(ItemKind::Word, "w-cat").unwrap().text, "cat");
        assert_eq!(find(ItemKind::Letter, "q").unwrap().text, "q");
        assert!(find(ItemKind::Sentence, "missing").is_none());
    }
}
