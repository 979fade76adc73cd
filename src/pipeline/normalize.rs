//! The normaliser (combiner): heterogeneous raw items in, canonical
//! schema out.
//!
//! Normalisation is pure and total — it never fails. Missing fields map
//! to documented defaults: empty string for text, `None` for optional
//! timestamps, zero engagement. The only inputs are the raw item and the
//! immutable reputation table injected at construction.

use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::pipeline::url_canon::{canonical_url, host_of};
use crate::reputation::ReputationTable;
use crate::types::{NormalizedItem, RawItem, SourceType};

/// Converts raw collector output into [`NormalizedItem`]s.
///
/// Holds a shared, read-only reputation table; never mutates state.
#[derive(Debug, Clone)]
pub struct Normalizer {
    table: Arc<ReputationTable>,
}

impl Normalizer {
    /// Creates a normaliser over an immutable reputation table.
    pub fn new(table: Arc<ReputationTable>) -> Self {
        Self { table }
    }

    /// Normalises one raw item.
    ///
    /// The id is a stable hash of the canonical URL and source id, so
    /// two raw items from the same source whose URLs canonicalise
    /// identically always get the same id. The source type comes from
    /// the reputation table, falling back to `fallback_type` (the
    /// collector's self-declared type) for sources the table does not
    /// know.
    pub fn normalize(&self, raw: RawItem, fallback_type: SourceType) -> NormalizedItem {
        let url = canonical_url(&raw.url);
        let host = host_of(&url);
        let host = host.as_deref();

        let source_reputation = self.table.reputation(&raw.source_id, host);
        let source_type = self
            .table
            .profile(&raw.source_id, host)
            .map_or(fallback_type, |p| p.source_type);

        NormalizedItem {
            id: item_id(&url, &raw.source_id),
            title: raw.title.trim().to_string(),
            url,
            content: raw.body_or_snippet.trim().to_string(),
            source_id: raw.source_id,
            source_type,
            author: raw.author.filter(|a| !a.trim().is_empty()),
            published_at: raw.published_at,
            engagement: raw.engagement,
            source_reputation,
        }
    }
}

/// Stable item identity: SHA-256 over canonical URL and source id,
/// truncated to 16 bytes and hex-encoded.
fn item_id(canonical_url: &str, source_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_url.as_bytes());
    hasher.update(b"|");
    hasher.update(source_id.as_bytes());
    let digest = hasher.finalize();
    digest[..16].iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reputation::{SourceProfile, DEFAULT_REPUTATION};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn make_raw(source_id: &str, url: &str) -> RawItem {
        RawItem {
            source_id: source_id.into(),
            url: url.into(),
            title: "  Title  ".into(),
            body_or_snippet: "Body text".into(),
            collected_at: Utc::now(),
            author: None,
            published_at: None,
            engagement: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }

    fn normalizer() -> Normalizer {
        Normalizer::new(Arc::new(ReputationTable::builtin()))
    }

    #[test]
    fn canonicalises_url_and_trims_text() {
        let item = normalizer().normalize(
            make_raw("bbc", "https://BBC.com/news/1/?utm_source=fb"),
            SourceType::Other,
        );
        assert_eq!(item.url, "https://bbc.com/news/1");
        assert_eq!(item.title, "Title");
        assert_eq!(item.content, "Body text");
    }

    #[test]
    fn same_canonical_url_and_source_gives_same_id() {
        let n = normalizer();
        let a = n.normalize(make_raw("bbc", "https://x.com/a?utm_source=fb"), SourceType::Other);
        let b = n.normalize(make_raw("bbc", "https://x.com/a"), SourceType::Other);
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn different_sources_give_different_ids() {
        let n = normalizer();
        let a = n.normalize(make_raw("bbc", "https://x.com/a"), SourceType::Other);
        let b = n.normalize(make_raw("reuters", "https://x.com/a"), SourceType::Other);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn id_is_hex_and_fixed_width() {
        let item = normalizer().normalize(make_raw("bbc", "https://x.com/a"), SourceType::Other);
        assert_eq!(item.id.len(), 32);
        assert!(item.id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn known_source_gets_table_reputation_and_type() {
        let item = normalizer().normalize(make_raw("bbc", "https://bbc.com/1"), SourceType::Other);
        assert!((item.source_reputation - 0.9).abs() < f64::EPSILON);
        assert_eq!(item.source_type, SourceType::News);
    }

    #[test]
    fn unknown_source_falls_back_to_host_match() {
        let item = normalizer().normalize(
            make_raw("some_scraper", "https://www.reuters.com/article/1"),
            SourceType::Other,
        );
        assert!((item.source_reputation - 0.95).abs() < f64::EPSILON);
        assert_eq!(item.source_type, SourceType::News);
    }

    #[test]
    fn fully_unknown_source_gets_defaults_and_fallback_type() {
        let item = normalizer().normalize(
            make_raw("mystery", "https://unknown-blog.example/post"),
            SourceType::Blog,
        );
        assert!((item.source_reputation - DEFAULT_REPUTATION).abs() < f64::EPSILON);
        assert_eq!(item.source_type, SourceType::Blog);
    }

    #[test]
    fn blank_author_becomes_none() {
        let mut raw = make_raw("bbc", "https://bbc.com/1");
        raw.author = Some("   ".into());
        let item = normalizer().normalize(raw, SourceType::Other);
        assert!(item.author.is_none());
    }

    #[test]
    fn engagement_and_published_pass_through() {
        let mut raw = make_raw("reddit", "https://reddit.com/r/rust/1");
        raw.engagement.insert("score".into(), 420);
        let published = Utc::now();
        raw.published_at = Some(published);
        let item = normalizer().normalize(raw, SourceType::Other);
        assert_eq!(item.engagement.get("score"), Some(&420));
        assert_eq!(item.published_at, Some(published));
    }

    #[test]
    fn custom_table_entry_wins_over_fallback() {
        let mut table = ReputationTable::new();
        table.insert("podsite", SourceProfile::new(0.7, SourceType::Video));
        let n = Normalizer::new(Arc::new(table));
        let item = n.normalize(make_raw("podsite", "https://podsite.io/ep1"), SourceType::Blog);
        assert_eq!(item.source_type, SourceType::Video);
        assert!((item.source_reputation - 0.7).abs() < f64::EPSILON);
    }
}
