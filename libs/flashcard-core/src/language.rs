//! Word classification and diacritic handling.

/// Decides whether a word is written in the source language.
///
/// Used to split a bare word list into words that need translating
/// source -> target and words that need translating back.
pub trait WordClassifier: Send + Sync {
    fn is_source_language(&self, word: &str) -> bool;
}

/// Treats a word as source language when every letter is ASCII.
///
/// Good enough for English against non-Latin scripts such as Hebrew; it
/// cannot tell English from other Latin-script languages.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatinScriptClassifier;

impl WordClassifier for LatinScriptClassifier {
    fn is_source_language(&self, word: &str) -> bool {
        word.chars().filter(|c| c.is_alphabetic()).all(|c| c.is_ascii())
    }
}

/// Hebrew cantillation marks and points (niqqud).
const HEBREW_MARKS: std::ops::RangeInclusive<char> = '\u{0591}'..='\u{05C7}';

/// Strip Hebrew diacritic marks, leaving letters and everything else intact.
pub fn strip_diacritics(word: &str) -> String {
    word.chars().filter(|c| !HEBREW_MARKS.contains(c)).collect()
}
