//! Per-chunk relevance gating
//!
//! A chunk survives only if it passes all four independent checks: trimmed
//! length bounds, minimum word count, markdown-link density, and the topical
//! keyword gate. Order of surviving chunks is preserved.

use regex::{Regex, RegexBuilder};

/// Minimum trimmed chunk length in characters
pub const MIN_CHUNK_CHARS: usize = 100;

/// Maximum trimmed chunk length in characters
pub const MAX_CHUNK_CHARS: usize = 1000;

/// Minimum whitespace-separated word count
pub const MIN_WORD_COUNT: usize = 15;

/// Maximum ratio of markdown links to words before a chunk is considered
/// navigation boilerplate
pub const MAX_LINK_RATIO: f64 = 0.3;

/// Relevance filter with pre-compiled match patterns
///
/// The keyword set comes from configuration and must be non-empty (config
/// validation enforces this); the thresholds above are fixed.
pub struct RelevanceFilter {
    keywords: Regex,
    link_pattern: Regex,
}

impl RelevanceFilter {
    /// Builds a filter from the configured keyword list
    ///
    /// Keywords are matched case-insensitively as literal substrings anywhere
    /// in the chunk text.
    pub fn new(keywords: &[String]) -> Result<Self, regex::Error> {
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k.trim()))
            .collect::<Vec<_>>()
            .join("|");

        let keywords = RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()?;

        let link_pattern = Regex::new(r"\[[^\]]*\]\([^)]*\)")?;

        Ok(Self {
            keywords,
            link_pattern,
        })
    }

    /// Applies all checks to a chunk list, returning the trimmed survivors
    pub fn filter(&self, chunks: Vec<String>) -> Vec<String> {
        chunks
            .into_iter()
            .filter_map(|chunk| {
                let text = chunk.trim();
                if self.is_relevant(text) {
                    Some(text.to_string())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Checks a single pre-trimmed chunk against all four gates
    pub fn is_relevant(&self, text: &str) -> bool {
        let length = text.chars().count();
        if !(MIN_CHUNK_CHARS..=MAX_CHUNK_CHARS).contains(&length) {
            return false;
        }

        let word_count = text.split_whitespace().count();
        if word_count < MIN_WORD_COUNT {
            return false;
        }

        // Mostly-links chunks are navigation menus, not content
        let link_count = self.link_pattern.find_iter(text).count();
        if link_count > 0 && link_count as f64 / word_count as f64 > MAX_LINK_RATIO {
            return false;
        }

        self.keywords.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_filter() -> RelevanceFilter {
        RelevanceFilter::new(&[
            "console".to_string(),
            "hardware".to_string(),
            "firmware".to_string(),
        ])
        .unwrap()
    }

    /// A chunk that passes every gate: long enough, wordy enough, no links,
    /// contains a keyword.
    fn relevant_chunk() -> String {
        "The latest console revision ships with updated hardware including a \
         faster storage controller, quieter cooling, and a smaller power \
         supply than the launch model offered at release."
            .to_string()
    }

    #[test]
    fn test_relevant_chunk_kept() {
        let kept = test_filter().filter(vec![relevant_chunk()]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_short_chunk_rejected() {
        let kept = test_filter().filter(vec!["console hardware".to_string()]);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_oversized_chunk_rejected() {
        let mut text = String::from("console ");
        text.push_str(&"padding words here ".repeat(80));
        assert!(text.chars().count() > MAX_CHUNK_CHARS);
        let kept = test_filter().filter(vec![text]);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_length_measured_after_trim() {
        let mut text = relevant_chunk();
        text.push_str(&" ".repeat(500));
        let kept = test_filter().filter(vec![text]);
        assert_eq!(kept.len(), 1, "trailing whitespace must not count");
    }

    #[test]
    fn test_low_word_count_rejected() {
        // 100+ chars but fewer than 15 words
        let text = format!("console{}", "x".repeat(120));
        let kept = test_filter().filter(vec![text]);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_link_heavy_chunk_rejected() {
        // 8 links over 20 words is a 0.4 ratio
        let links = "[a](https://example.com/a) ".repeat(8);
        let text = format!(
            "{} console hardware firmware words filler one two three four five six",
            links
        );
        let filter = test_filter();
        assert!(!filter.is_relevant(text.trim()));
    }

    #[test]
    fn test_sparse_links_allowed() {
        let text = "See the [teardown](https://example.com/t) for the new \
                    console hardware revision with its redesigned cooling \
                    assembly and updated storage controller details inside.";
        assert!(test_filter().is_relevant(text.trim()));
    }

    #[test]
    fn test_keyword_gate() {
        // Passes every structural check but mentions no keyword
        let text = "This paragraph talks at length about gardening, compost \
                    bins, tomato varieties, and the best season to plant \
                    spring onions in a cold climate region.";
        assert!(!test_filter().is_relevant(text.trim()));
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let text = relevant_chunk().replace("console", "CONSOLE");
        assert!(test_filter().is_relevant(text.trim()));
    }

    #[test]
    fn test_order_preserved() {
        let a = relevant_chunk();
        let b = relevant_chunk().replace("latest", "earlier");
        let kept = test_filter().filter(vec![a.clone(), b.clone()]);
        assert_eq!(kept, vec![a, b]);
    }

    #[test]
    fn test_regex_metacharacters_in_keywords_are_literal() {
        let filter = RelevanceFilter::new(&["c++".to_string()]).unwrap();
        let text = "A long discussion of c++ template metaprogramming with \
                    enough words to clear the minimum length and word count \
                    thresholds comfortably for this test.";
        assert!(filter.is_relevant(text.trim()));
    }
}
