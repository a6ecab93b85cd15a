//! Extractive summarization.
//!
//! Picks the sentences that share the most vocabulary with the rest of the
//! document and returns them verbatim, in the order they appeared. No model
//! is involved, so this is also what the AI layer falls back to whenever the
//! provider is missing or fails.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Character budget used when the caller does not supply one.
pub const DEFAULT_MAX_LENGTH: usize = 300;

/// Documents with fewer sentences than this are returned as-is.
const MIN_SENTENCES: usize = 4;

/// How many sentences make it into the summary.
const TOP_SENTENCES: usize = 3;

/// Words shorter than this never enter the frequency table.
const MIN_WORD_CHARS: usize = 4;

const ELLIPSIS: &str = "...";

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Document has no words longer than 3 characters")]
    EmptyVocabulary,
}

fn sentence_boundary() -> Result<&'static Regex, SummarizeError> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"[.!?]\s+"))
        .as_ref()
        .map_err(|e| SummarizeError::Pattern(e.clone()))
}

fn word_pattern() -> Result<&'static Regex, SummarizeError> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\w+"))
        .as_ref()
        .map_err(|e| SummarizeError::Pattern(e.clone()))
}

/// Summarizes `text` down to roughly `max_length` characters.
///
/// Never fails: if anything goes wrong internally the text is hard-truncated
/// to `max_length` characters (plus an ellipsis) instead.
pub fn summarize(text: &str, max_length: usize) -> String {
    match try_summarize(text, max_length) {
        Ok(summary) => summary,
        Err(e) => {
            tracing::debug!(error = %e, "Extractive summary fell back to truncation");
            truncate_chars(text, max_length)
        }
    }
}

fn try_summarize(text: &str, max_length: usize) -> Result<String, SummarizeError> {
    let document = text.trim();
    let sentences = split_sentences(document)?;

    // Too short to extract from. Over-budget short documents still get cut.
    if sentences.len() < MIN_SENTENCES {
        return Ok(truncate_chars(text, max_length));
    }

    let words = word_pattern()?;

    let mut frequencies: HashMap<String, usize> = HashMap::new();
    for token in tokens(words, document) {
        if token.chars().count() >= MIN_WORD_CHARS {
            *frequencies.entry(token).or_insert(0) += 1;
        }
    }

    if frequencies.is_empty() {
        return Err(SummarizeError::EmptyVocabulary);
    }

    let mut ranked: Vec<(usize, usize)> = sentences
        .iter()
        .enumerate()
        .map(|(index, sentence)| {
            let score = tokens(words, sentence)
                .map(|token| frequencies.get(&token).copied().unwrap_or(0))
                .sum();
            (index, score)
        })
        .collect();

    // sort_by is stable, so tied sentences keep document order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let mut picked: Vec<usize> = ranked
        .iter()
        .take(TOP_SENTENCES)
        .map(|(index, _)| *index)
        .collect();
    picked.sort_unstable();

    let joined = picked
        .iter()
        .map(|&index| sentences[index])
        .collect::<Vec<_>>()
        .join(" ");

    Ok(truncate_at_word(&joined, max_length).trim().to_string())
}

/// Splits after `.`, `!` or `?` when followed by whitespace. The whitespace
/// run is dropped; the punctuation stays with its sentence.
fn split_sentences(document: &str) -> Result<Vec<&str>, SummarizeError> {
    let boundary = sentence_boundary()?;

    let mut sentences = Vec::new();
    let mut start = 0;
    for m in boundary.find_iter(document) {
        // The terminal punctuation is a single ASCII byte.
        sentences.push(&document[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&document[start..]);

    Ok(sentences.into_iter().filter(|s| !s.is_empty()).collect())
}

fn tokens<'a>(words: &'a Regex, text: &'a str) -> impl Iterator<Item = String> + 'a {
    words.find_iter(text).map(|m| m.as_str().to_lowercase())
}

/// First `n` characters of `text`, respecting char boundaries.
fn prefix_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Hard cut at `max_length` characters with an ellipsis, or the text
/// unchanged when it already fits.
pub fn truncate_chars(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    format!("{}{}", prefix_chars(text, max_length), ELLIPSIS)
}

/// Cuts at the last whitespace at or before character `max_length`. Falls
/// back to a hard character cut when there is no whitespace in that window.
fn truncate_at_word(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let last_space = text
        .char_indices()
        .take(max_length + 1)
        .filter(|(_, c)| c.is_whitespace())
        .map(|(byte, _)| byte)
        .last();

    let head = match last_space {
        Some(byte) => &text[..byte],
        None => prefix_chars(text, max_length),
    };

    format!("{}{}", head.trim_end(), ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORM: &str =
        "The cat sat down. Storm storm storm arrived. Dogs bark loud. Birds fly high.";

    #[test]
    fn test_short_document_is_returned_unchanged() {
        let text = "Short sentence one. Short two. Short three.";
        assert_eq!(summarize(text, 300), text);
    }

    #[test]
    fn test_short_document_is_idempotent() {
        let text = "One line here! Another one? Last one.";
        let once = summarize(text, DEFAULT_MAX_LENGTH);
        assert_eq!(summarize(&once, DEFAULT_MAX_LENGTH), once);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(summarize("", 300), "");
    }

    #[test]
    fn test_long_single_sentence_is_hard_truncated() {
        let text = "word ".repeat(100);
        assert_eq!(text.len(), 500);

        let summary = summarize(&text, 50);
        assert_eq!(summary, format!("{}...", &text[..50]));
    }

    #[test]
    fn test_repeated_word_sentence_is_selected() {
        let summary = summarize(STORM, 300);
        assert_eq!(
            summary,
            "Storm storm storm arrived. Dogs bark loud. Birds fly high."
        );
    }

    #[test]
    fn test_ties_keep_document_order() {
        let text = "Alpha one. Bravo two. Charlie six. Delta ten. Echo zed.";
        assert_eq!(summarize(text, 300), "Alpha one. Bravo two. Charlie six.");
    }

    #[test]
    fn test_output_follows_source_order() {
        // The last sentence scores highest but must still come last.
        let text = "Rivers wind slowly. Mountains stand tall. Clouds drift past. \
                    Rivers mountains clouds rivers mountains clouds.";
        let summary = summarize(text, 300);

        let positions: Vec<usize> = summary
            .split_inclusive(". ")
            .map(|s| text.find(s.trim()).expect("sentence must come from the input"))
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
        assert!(summary.ends_with("Rivers mountains clouds rivers mountains clouds."));
    }

    #[test]
    fn test_truncates_at_word_boundary() {
        assert_eq!(summarize(STORM, 30), "Storm storm storm arrived....");
    }

    #[test]
    fn test_truncates_hard_without_whitespace() {
        assert_eq!(summarize(STORM, 4), "Stor...");
    }

    #[test]
    fn test_length_stays_within_budget() {
        let text = "Engines roar across the valley tonight. Pilots check their gauges carefully. \
                    Engines sputter and pilots worry about the valley. The valley sleeps quietly. \
                    Morning brings engines, pilots and a quiet valley.";
        for budget in [10, 40, 80, 120] {
            let summary = summarize(text, budget);
            assert!(summary.chars().count() <= budget + ELLIPSIS.len());
        }
    }

    #[test]
    fn test_empty_vocabulary_falls_back() {
        let text = "A b. C d. E f. G h.";
        assert_eq!(summarize(text, 300), text);
        assert_eq!(summarize(text, 5), "A b. ...");
    }

    #[test]
    fn test_split_keeps_punctuation_and_drops_whitespace() {
        let sentences = split_sentences("Hi there!  How are you?\nFine.").unwrap();
        assert_eq!(sentences, vec!["Hi there!", "How are you?", "Fine."]);
    }

    #[test]
    fn test_multibyte_text_is_cut_on_char_boundary() {
        let text = "ééééééééééé";
        assert_eq!(truncate_chars(text, 3), "ééé...");
    }
}
