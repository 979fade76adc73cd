//! Relevance analyzer: keyword overlap between the query and an item's
//! title and content, with title matches boosted over body matches.

use std::collections::BTreeSet;

use crate::config::RelevanceConfig;
use crate::types::NormalizedItem;

/// Function words filtered out before matching; they carry no relevance
/// signal and would inflate overlap scores.
const STOP_WORDS: &[&str] = &[
    "the", "and", "but", "for", "with", "are", "was", "were", "been", "being", "have", "has",
    "had", "does", "did", "will", "would", "could", "should", "may", "might", "must", "can",
    "this", "that", "these", "those", "you", "she", "they", "them", "his", "her", "its", "our",
    "their", "what", "when", "where", "which", "who", "how", "not", "all", "any", "into", "from",
    "about",
];

/// Splits text into lower-cased alphanumeric tokens, dropping stop words
/// and tokens shorter than three characters.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|t| t.chars().count() >= 3 && !STOP_WORDS.contains(&t.as_str()))
        .collect()
}

/// Fraction of query tokens present in the candidate token set.
fn overlap(query_tokens: &[String], candidate: &BTreeSet<&str>) -> f64 {
    if query_tokens.is_empty() {
        return 0.0;
    }
    let matches = query_tokens
        .iter()
        .filter(|t| candidate.contains(t.as_str()))
        .count();
    matches as f64 / query_tokens.len() as f64
}

/// Term-frequency density of query tokens within the candidate tokens,
/// saturating so that keyword stuffing cannot dominate.
fn term_frequency(query_tokens: &[String], candidate_tokens: &[String]) -> f64 {
    if query_tokens.is_empty() || candidate_tokens.is_empty() {
        return 0.0;
    }
    let hits = candidate_tokens
        .iter()
        .filter(|t| query_tokens.contains(t))
        .count();
    let density = hits as f64 / candidate_tokens.len() as f64;
    (density * 10.0).min(1.0)
}

/// Jaccard overlap of the query and candidate token sets.
fn token_jaccard(query_tokens: &[String], candidate: &BTreeSet<&str>) -> f64 {
    let query: BTreeSet<&str> = query_tokens.iter().map(String::as_str).collect();
    if query.is_empty() || candidate.is_empty() {
        return 0.0;
    }
    let inter = query.intersection(candidate).count() as f64;
    let union = query.union(candidate).count() as f64;
    inter / union
}

/// Scores the relevance of `item` to `query` in [0,1].
///
/// Components: body keyword overlap (0.3), title keyword overlap
/// boosted by `title_boost` (0.3), query-term density in the body
/// (0.2), and query/body token Jaccard (0.2). If any configured domain
/// keyword appears in the item, the result is multiplied by
/// `keyword_boost`. An empty query scores 0.0.
pub fn score(query: &str, item: &NormalizedItem, config: &RelevanceConfig) -> f64 {
    let query_tokens = tokenize(query);
    if query_tokens.is_empty() {
        return 0.0;
    }

    let title_tokens = tokenize(&item.title);
    let body_tokens = tokenize(&item.content);
    let title_set: BTreeSet<&str> = title_tokens.iter().map(String::as_str).collect();
    let full_tokens: Vec<String> = title_tokens
        .iter()
        .chain(body_tokens.iter())
        .cloned()
        .collect();
    let full_set: BTreeSet<&str> = full_tokens.iter().map(String::as_str).collect();

    let body_overlap = overlap(&query_tokens, &full_set);
    let title_overlap = overlap(&query_tokens, &title_set) * config.title_boost;
    let density = term_frequency(&query_tokens, &full_tokens);
    let semantic = token_jaccard(&query_tokens, &full_set);

    let mut combined =
        body_overlap * 0.3 + title_overlap * 0.3 + density * 0.2 + semantic * 0.2;

    if has_domain_keyword(item, &config.keywords) {
        combined *= config.keyword_boost;
    }

    combined.min(1.0)
}

/// True when any configured domain keyword appears in the item's title
/// or content (case-insensitive substring match).
fn has_domain_keyword(item: &NormalizedItem, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return false;
    }
    let haystack = format!("{} {}", item.title, item.content).to_lowercase();
    keywords
        .iter()
        .any(|k| !k.is_empty() && haystack.contains(&k.to_lowercase()))
}
