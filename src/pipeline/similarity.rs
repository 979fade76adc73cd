//! Text similarity for duplicate detection.
//!
//! One metric, used consistently for titles and content: Jaccard
//! similarity over the set of lower-cased alphanumeric tokens of length
//! ≥ 3. Tokenisation case-folds, strips punctuation, and collapses
//! whitespace in one pass, so "Senate Passes New Bill" and "senate
//! passes new bill!" produce the same token set. The deduplication
//! thresholds are calibrated to this metric's scale.

use std::collections::BTreeSet;

/// Minimum token length; shorter tokens ("on", "of", "a") carry no
/// duplicate signal and would dilute the Jaccard score.
const MIN_TOKEN_LEN: usize = 3;

/// Splits text into lower-cased alphanumeric tokens of length ≥ 3.
pub(crate) fn token_set(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_lowercase)
        .collect()
}

/// Jaccard similarity of two token sets: |A∩B| / |A∪B|.
fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let inter = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    inter / union
}

/// Similarity between two titles in [0,1]. Empty titles never match.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    jaccard(&token_set(a), &token_set(b))
}

/// Similarity between two content bodies in [0,1]. Same metric as
/// titles; the caller gates on minimum content length.
pub fn content_similarity(a: &str, b: &str) -> f64 {
    jaccard(&token_set(a), &token_set(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_titles_score_one() {
        let sim = title_similarity("Rust 1.80 released", "Rust 1.80 released");
        assert!((sim - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn disjoint_titles_score_zero() {
        let sim = title_similarity("Rust release notes", "Football match tonight");
        assert!(sim.abs() < f64::EPSILON);
    }

    #[test]
    fn empty_title_scores_zero() {
        assert!(title_similarity("", "Rust released").abs() < f64::EPSILON);
        assert!(title_similarity("", "").abs() < f64::EPSILON);
    }

    #[test]
    fn case_and_punctuation_ignored() {
        let sim = title_similarity("Rust: The Book!", "rust the book");
        assert!((sim - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reworded_headline_scores_high() {
        // Short function words ("on") are dropped by the token filter,
        // so a reordered headline still matches.
        let sim = title_similarity(
            "Senate Passes New Bill on Climate Change",
            "Senate passes new climate change bill",
        );
        assert!(sim >= 0.9, "expected >= 0.9, got {sim}");
    }

    #[test]
    fn partially_overlapping_titles_score_between() {
        let sim = title_similarity(
            "Rust compiler performance improvements",
            "Rust compiler adds new lints",
        );
        assert!(sim > 0.0 && sim < 1.0, "got {sim}");
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = "Senate passes climate bill";
        let b = "Climate bill passes in Senate vote";
        assert!((title_similarity(a, b) - title_similarity(b, a)).abs() < f64::EPSILON);
    }

    #[test]
    fn similarity_stays_in_unit_range() {
        let pairs = [
            ("a b c", "a b c d e f"),
            ("breaking news today", "breaking news"),
            ("one two three", "four five six"),
        ];
        for (a, b) in pairs {
            let sim = title_similarity(a, b);
            assert!((0.0..=1.0).contains(&sim), "{a} / {b} gave {sim}");
        }
    }

    #[test]
    fn content_uses_same_metric_as_titles() {
        let a = "The quick brown fox jumps over the lazy dog";
        let b = "The quick brown fox jumps over the lazy dog";
        assert!((content_similarity(a, b) - 1.0).abs() < f64::EPSILON);
        assert!(
            (content_similarity(a, b) - title_similarity(a, b)).abs() < f64::EPSILON
        );
    }

    #[test]
    fn token_set_drops_short_tokens() {
        let tokens = token_set("A new era of AI on the web");
        assert!(tokens.contains("new"));
        assert!(tokens.contains("era"));
        assert!(tokens.contains("web"));
        assert!(!tokens.contains("a"));
        assert!(!tokens.contains("of"));
        assert!(!tokens.contains("on"));
        assert!(!tokens.contains("ai"));
    }
}
