//! Static source-reputation table.
//!
//! A per-source trust weight in [0,1] used as a credibility prior, plus
//! the source's type. The table is immutable: it is built once at process
//! start and passed explicitly into the pipeline (dependency injection),
//! never consulted through a global. Lookup order: exact source id, then
//! host suffix match for domain-shaped keys, then [`DEFAULT_REPUTATION`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::SourceType;

/// Reputation assigned to sources absent from the table.
pub const DEFAULT_REPUTATION: f64 = 0.5;

/// Trust weight and type for one source or domain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SourceProfile {
    /// Static trust weight in [0,1].
    pub reputation: f64,
    /// What kind of source this is.
    pub source_type: SourceType,
}

impl SourceProfile {
    /// Convenience constructor.
    pub fn new(reputation: f64, source_type: SourceType) -> Self {
        Self {
            reputation,
            source_type,
        }
    }
}

/// Immutable reputation table keyed by source id or domain.
///
/// Keys containing a dot (`"bbc.com"`) are treated as domains and match
/// any host equal to them or ending in `".{key}"`; other keys
/// (`"hackernews"`) only match a source id exactly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReputationTable {
    entries: BTreeMap<String, SourceProfile>,
}

impl ReputationTable {
    /// An empty table: every lookup falls back to [`DEFAULT_REPUTATION`]
    /// and [`SourceType::Other`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A table pre-populated with well-known sources and domains.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        // Source ids of first-party collectors.
        table.insert("bbc", SourceProfile::new(0.9, SourceType::News));
        table.insert("techcrunch", SourceProfile::new(0.85, SourceType::News));
        table.insert("google_news", SourceProfile::new(0.8, SourceType::News));
        table.insert("duckduckgo", SourceProfile::new(0.75, SourceType::Search));
        table.insert("bing", SourceProfile::new(0.75, SourceType::Search));
        table.insert("wikipedia", SourceProfile::new(0.85, SourceType::Knowledge));
        table.insert("hackernews", SourceProfile::new(0.8, SourceType::Social));
        table.insert("reddit", SourceProfile::new(0.5, SourceType::Forum));
        table.insert("twitter", SourceProfile::new(0.4, SourceType::Social));
        table.insert("youtube", SourceProfile::new(0.45, SourceType::Video));
        // Domains, matched by host suffix.
        table.insert("reuters.com", SourceProfile::new(0.95, SourceType::News));
        table.insert("apnews.com", SourceProfile::new(0.95, SourceType::News));
        table.insert("bbc.com", SourceProfile::new(0.9, SourceType::News));
        table.insert("npr.org", SourceProfile::new(0.9, SourceType::News));
        table.insert("nytimes.com", SourceProfile::new(0.9, SourceType::News));
        table.insert("theguardian.com", SourceProfile::new(0.85, SourceType::News));
        table.insert("arxiv.org", SourceProfile::new(0.95, SourceType::Knowledge));
        table.insert("github.com", SourceProfile::new(0.8, SourceType::Forum));
        table.insert(
            "stackoverflow.com",
            SourceProfile::new(0.75, SourceType::Forum),
        );
        table.insert("medium.com", SourceProfile::new(0.6, SourceType::Blog));
        table.insert("reddit.com", SourceProfile::new(0.5, SourceType::Forum));
        table.insert("twitter.com", SourceProfile::new(0.4, SourceType::Social));
        table.insert("youtube.com", SourceProfile::new(0.45, SourceType::Video));
        table
    }

    /// Adds or replaces an entry. Intended for table construction at
    /// process start; the pipeline never mutates the table afterwards.
    pub fn insert(&mut self, key: impl Into<String>, profile: SourceProfile) {
        self.entries.insert(key.into(), profile);
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the profile for a source: exact source id first, then
    /// the longest domain key matching `host` by suffix.
    pub fn profile(&self, source_id: &str, host: Option<&str>) -> Option<&SourceProfile> {
        if let Some(profile) = self.entries.get(source_id) {
            return Some(profile);
        }
        let host = host?;
        self.entries
            .iter()
            .filter(|(key, _)| key.contains('.') && host_matches(host, key))
            .max_by_key(|(key, _)| key.len())
            .map(|(_, profile)| profile)
    }

    /// Reputation for a source, falling back to [`DEFAULT_REPUTATION`].
    pub fn reputation(&self, source_id: &str, host: Option<&str>) -> f64 {
        self.profile(source_id, host)
            .map_or(DEFAULT_REPUTATION, |p| p.reputation)
    }

    /// Source type for a source, falling back to [`SourceType::Other`].
    pub fn source_type(&self, source_id: &str, host: Option<&str>) -> SourceType {
        self.profile(source_id, host)
            .map_or(SourceType::Other, |p| p.source_type)
    }
}

/// True when `host` equals the domain key or is a subdomain of it.
fn host_matches(host: &str, key: &str) -> bool {
    host == key || host.ends_with(&format!(".{key}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_returns_defaults() {
        let table = ReputationTable::new();
        assert!((table.reputation("unknown", None) - DEFAULT_REPUTATION).abs() < f64::EPSILON);
        assert_eq!(table.source_type("unknown", None), SourceType::Other);
    }

    #[test]
    fn exact_source_id_match_wins() {
        let table = ReputationTable::builtin();
        assert!((table.reputation("bbc", None) - 0.9).abs() < f64::EPSILON);
        assert_eq!(table.source_type("bbc", None), SourceType::News);
    }

    #[test]
    fn host_suffix_match_applies_to_subdomains() {
        let table = ReputationTable::builtin();
        let rep = table.reputation("some_collector", Some("feeds.bbc.com"));
        assert!((rep - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn host_match_requires_label_boundary() {
        let mut table = ReputationTable::new();
        table.insert("bc.com", SourceProfile::new(0.9, SourceType::News));
        // "bbc.com" must not match "bc.com" merely by string suffix.
        assert!(
            (table.reputation("x", Some("bbc.com")) - DEFAULT_REPUTATION).abs() < f64::EPSILON
        );
    }

    #[test]
    fn longest_domain_key_wins() {
        let mut table = ReputationTable::new();
        table.insert("example.com", SourceProfile::new(0.4, SourceType::Other));
        table.insert(
            "news.example.com",
            SourceProfile::new(0.9, SourceType::News),
        );
        let rep = table.reputation("x", Some("live.news.example.com"));
        assert!((rep - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn source_id_does_not_match_domain_keys() {
        let table = ReputationTable::builtin();
        // "reuters.com" is a domain key; a source id lookup without a host
        // must not reach it.
        assert!(
            (table.reputation("reuters.com2", None) - DEFAULT_REPUTATION).abs() < f64::EPSILON
        );
    }

    #[test]
    fn exact_host_match_without_subdomain() {
        let table = ReputationTable::builtin();
        let rep = table.reputation("x", Some("arxiv.org"));
        assert!((rep - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn builtin_reputations_stay_in_unit_range() {
        let table = ReputationTable::builtin();
        for (key, profile) in &table.entries {
            assert!(
                (0.0..=1.0).contains(&profile.reputation),
                "{key} has out-of-range reputation {}",
                profile.reputation
            );
        }
    }

    #[test]
    fn serde_round_trip() {
        let table = ReputationTable::builtin();
        let json = serde_json::to_string(&table).expect("serialize");
        let decoded: ReputationTable = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded.len(), table.len());
        assert!((decoded.reputation("bbc", None) - 0.9).abs() < f64::EPSILON);
    }
}
