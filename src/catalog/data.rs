//! Static practice content. Reference data only; the scheduler never
//! mutates it.

use super::CatalogEntry;

/// Lowercase alphabet, one entry per letter. Letter ids are the letter
/// itself so arm keys stay readable in the store.
pub const LETTERS: [CatalogEntry; 26] = [
    CatalogEntry { id: "a", text: "a" },
    CatalogEntry { id: "b", text: "b" },
    CatalogEntry { id: "c", text: "c" },
    CatalogEntry { id: "d", text: "d" },
    CatalogEntry { id: "e", text: "e" },
    CatalogEntry { id: "f", text: "f" },
    CatalogEntry { id: "g", text: "g" },
    CatalogEntry { id: "h", text: "h" },
    CatalogEntry { id: "i", text: "i" },
    CatalogEntry { id: "j", text: "j" },
    CatalogEntry { id: "k", text: "k" },
    CatalogEntry { id: "l", text: "l" },
    CatalogEntry { id: "m", text: "m" },
    CatalogEntry { id: "n", text: "n" },
    CatalogEntry { id: "o", text: "o" },
    CatalogEntry { id: "p", text: "p" },
    CatalogEntry { id: "q", text: "q" },
    CatalogEntry { id: "r", text: "r" },
    CatalogEntry { id: "s", text: "s" },
    CatalogEntry { id: "t", text: "t" },
    CatalogEntry { id: "u", text: "u" },
    CatalogEntry { id: "v", text: "v" },
    CatalogEntry { id: "w", text: "w" },
    CatalogEntry { id: "x", text: "x" },
    CatalogEntry { id: "y", text: "y" },
    CatalogEntry { id: "z", text: "z" },
];

/// Accepted phonetic renderings per letter. A transcription service asked
/// for "the spoken letter" may answer with the letter name spelled out
/// ("bee", "see"), so scoring accepts those too.
pub const LETTER_VARIANTS: [(char, &[&str]); 26] = [
    ('a', &["a", "eh", "ay"]),
    ('b', &["b", "bee", "be"]),
    ('c', &["c", "see", "sea"]),
    ('d', &["d", "dee"]),
    ('e', &["e", "ee"]),
    ('f', &["f", "ef"]),
    ('g', &["g", "gee", "jee"]),
    ('h', &["h", "aitch"]),
    ('i', &["i", "eye"]),
    ('j', &["j", "jay"]),
    ('k', &["k", "kay"]),
    ('l', &["l", "el"]),
    ('m', &["m", "em"]),
    ('n', &["n", "en"]),
    ('o', &["o", "oh"]),
    ('p', &["p", "pee"]),
    ('q', &["q", "cue"]),
    ('r', &["r", "are", "ar"]),
    ('s', &["s", "ess"]),
    ('t', &["t", "tee"]),
    ('u', &["u", "you"]),
    ('v', &["v", "vee"]),
    ('w', &["w", "double u", "double you"]),
    ('x', &["x", "ex"]),
    ('y', &["y", "why"]),
    ('z', &["z", "zee", "zed"]),
];

pub const TWO_LETTER_WORDS: [CatalogEntry; 24] = [
    CatalogEntry { id: "tw-at", text: "at" },
    CatalogEntry { id: "tw-an", text: "an" },
    CatalogEntry { id: "tw-am", text: "am" },
    CatalogEntry { id: "tw-as", text: "as" },
    CatalogEntry { id: "tw-ax", text: "ax" },
    CatalogEntry { id: "tw-be", text: "be" },
    CatalogEntry { id: "tw-by", text: "by" },
    CatalogEntry { id: "tw-do", text: "do" },
    CatalogEntry { id: "tw-go", text: "go" },
    CatalogEntry { id: "tw-he", text: "he" },
    CatalogEntry { id: "tw-if", text: "if" },
    CatalogEntry { id: "tw-in", text: "in" },
    CatalogEntry { id: "tw-is", text: "is" },
    CatalogEntry { id: "tw-it", text: "it" },
    CatalogEntry { id: "tw-me", text: "me" },
    CatalogEntry { id: "tw-my", text: "my" },
    CatalogEntry { id: "tw-no", text: "no" },
    CatalogEntry { id: "tw-on", text: "on" },
    CatalogEntry { id: "tw-or", text: "or" },
    CatalogEntry { id: "tw-ox", text: "ox" },
    CatalogEntry { id: "tw-so", text: "so" },
    CatalogEntry { id: "tw-to", text: "to" },
    CatalogEntry { id: "tw-up", text: "up" },
    CatalogEntry { id: "tw-we", text: "we" },
];

/// Early-reader word list. Chosen so every letter of the alphabet occurs in
/// at least one word, which keeps the weak-letter ranker from going empty.
pub const WORDS: [CatalogEntry; 26] = [
    CatalogEntry { id: "w-ant", text: "ant" },
    CatalogEntry { id: "w-bed", text: "bed" },
    CatalogEntry { id: "w-box", text: "box" },
    CatalogEntry { id: "w-cat", text: "cat" },
    CatalogEntry { id: "w-cup", text: "cup" },
    CatalogEntry { id: "w-dog", text: "dog" },
    CatalogEntry { id: "w-egg", text: "egg" },
    CatalogEntry { id: "w-fox", text: "fox" },
    CatalogEntry { id: "w-gum", text: "gum" },
    CatalogEntry { id: "w-hat", text: "hat" },
    CatalogEntry { id: "w-ink", text: "ink" },
    CatalogEntry { id: "w-jam", text: "jam" },
    CatalogEntry { id: "w-kit", text: "kit" },
    CatalogEntry { id: "w-leg", text: "leg" },
    CatalogEntry { id: "w-map", text: "map" },
    CatalogEntry { id: "w-net", text: "net" },
    CatalogEntry { id: "w-owl", text: "owl" },
    CatalogEntry { id: "w-pig", text: "pig" },
    CatalogEntry { id: "w-quiz", text: "quiz" },
    CatalogEntry { id: "w-red", text: "red" },
    CatalogEntry { id: "w-sun", text: "sun" },
    CatalogEntry { id: "w-top", text: "top" },
    CatalogEntry { id: "w-van", text: "van" },
    CatalogEntry { id: "w-wig", text: "wig" },
    CatalogEntry { id: "w-yak", text: "yak" },
    CatalogEntry { id: "w-zip", text: "zip" },
];

pub const SENTENCES: [CatalogEntry; 10] = [
    CatalogEntry { id: "s-01", text: "The cat sat on the mat." },
    CatalogEntry { id: "s-02", text: "I can see the sun." },
    CatalogEntry { id: "s-03", text: "The dog ran to the park." },
    CatalogEntry { id: "s-04", text: "We like to read books." },
    CatalogEntry { id: "s-05", text: "The pig is in the pen." },
    CatalogEntry { id: "s-06", text: "She has a red hat." },
    CatalogEntry { id: "s-07", text: "The fox hid in the box." },
    CatalogEntry { id: "s-08", text: "Mom and I bake a cake." },
    CatalogEntry { id: "s-09", text: "The bus is big and blue." },
    CatalogEntry { id: "s-10", text: "He can hop and jump." },
];
