//! Text shaping for the memory layer: chunking, indexability, dedupe.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::MIN_INDEXABLE_CHARS;

#[expect(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every whitespace run to one space and trim the ends.
#[must_use]
pub fn normalize_whitespace(input: &str) -> String {
    WHITESPACE_RUN.replace_all(input, " ").trim().to_owned()
}

/// Split text into fixed windows of `chunk_size` characters sharing `overlap`
/// characters with the previous window.
///
/// Whitespace is normalized first. Windows are counted in `char`s, so
/// multi-byte text never splits inside a code point. An `overlap` that would
/// stall the window is clamped to `chunk_size - 1`.
#[must_use]
pub fn chunk_text(input: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let text = normalize_whitespace(input);
    if text.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let overlap = overlap.min(chunk_size.saturating_sub(1));
    let mut chunks = Vec::new();
    let mut start = 0usize;

    loop {
        let end = start.saturating_add(chunk_size).min(chars.len());
        let window: String = chars.get(start..end).unwrap_or_default().iter().collect();
        let trimmed = window.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_owned());
        }
        if end == chars.len() {
            break;
        }
        start = end.saturating_sub(overlap);
    }
    chunks
}

/// Whether a chat message carries enough text to be worth embedding.
#[must_use]
pub fn should_index(text: &str) -> bool {
    text.trim().chars().count() >= MIN_INDEXABLE_CHARS
}

/// Trim snippets, drop empty ones, and keep only the first occurrence of each
/// case-insensitive text. Order is preserved.
pub fn dedupe_snippets<'a, I>(snippets: I) -> Vec<(usize, &'a str)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    snippets
        .into_iter()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let text = raw.trim();
            if text.is_empty() {
                return None;
            }
            seen.insert(text.to_lowercase()).then_some((idx, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CHUNK_OVERLAP, CHUNK_SIZE};

    #[test]
    fn test_normalize_collapses_newlines_and_tabs() {
        assert_eq!(normalize_whitespace("  a\n\n b\t\tc  "), "a b c");
    }

    #[test]
    fn test_chunk_empty_input() {
        assert!(chunk_text("   \n\t ", CHUNK_SIZE, CHUNK_OVERLAP).is_empty());
    }

    #[test]
    fn test_chunk_short_input_is_single_chunk() {
        let chunks = chunk_text("Lydia carries my burdens.", CHUNK_SIZE, CHUNK_OVERLAP);
        assert_eq!(chunks, vec!["Lydia carries my burdens.".to_owned()]);
    }

    #[test]
    fn test_chunk_windows_overlap() {
        let text: String = ('a'..='z').cycle().take(25).collect();
        let chunks = chunk_text(&text, 10, 3);
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0], text[0..10]);
        assert_eq!(chunks[1], text[7..17]);
        assert_eq!(chunks[2], text[14..24]);
        assert_eq!(chunks[3], text[21..25]);
    }

    #[test]
    fn test_chunk_exact_multiple_stops_at_end() {
        let text = "x".repeat(1200);
        let chunks = chunk_text(&text, CHUNK_SIZE, CHUNK_OVERLAP);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_chunk_default_window_sizes() {
        let text = "y".repeat(2500);
        let chunks = chunk_text(&text, CHUNK_SIZE, CHUNK_OVERLAP);
        let lens: Vec<usize> = chunks.iter().map(String::len).collect();
        assert_eq!(lens, vec![1200, 1200, 500]);
    }

    #[test]
    fn test_chunk_counts_chars_not_bytes() {
        let text = "ё".repeat(15);
        let chunks = chunk_text(&text, 10, 2);
        assert_eq!(chunks[0].chars().count(), 10);
        assert_eq!(chunks[1].chars().count(), 7);
    }

    #[test]
    fn test_chunk_oversized_overlap_still_terminates() {
        let chunks = chunk_text("abcdef", 3, 10);
        assert_eq!(chunks, vec!["abc", "bcd", "cde", "def"]);
    }

    #[test]
    fn test_chunk_zero_size_yields_nothing() {
        assert!(chunk_text("abc", 0, 0).is_empty());
    }

    #[test]
    fn test_should_index_threshold() {
        assert!(!should_index("ок"));
        assert!(!should_index("   short   "));
        assert!(should_index("0123456789"));
        assert!(should_index("Где найти лунный сахар?"));
    }

    #[test]
    fn test_dedupe_is_case_insensitive_and_keeps_first() {
        let docs = ["Dragon at Whiterun", "  dragon AT whiterun ", "", "Sweetroll"];
        let kept = dedupe_snippets(docs);
        assert_eq!(kept, vec![(0, "Dragon at Whiterun"), (3, "Sweetroll")]);
    }
}
