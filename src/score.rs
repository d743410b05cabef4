//! Naive word-overlap scoring of transcripts against an expected sentence.

/// Lowercases and strips basic punctuation before comparison.
pub fn normalize_transcript(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | '!' | '?'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Percentage of expected words that appear anywhere in the actual
/// transcript. Deliberately simplistic: membership only, not position-aware,
/// and duplicate expected words each count if the word occurs at all.
pub fn word_overlap(expected: &str, actual: &str) -> f64 {
    let expected_words: Vec<&str> = expected.split_whitespace().collect();
    if expected_words.is_empty() {
        return 0.0;
    }
    let actual_words: Vec<&str> = actual.split_whitespace().collect();
    let matches = expected_words
        .iter()
        .filter(|word| actual_words.contains(word))
        .count();
    matches as f64 / expected_words.len() as f64 * 100.0
}
