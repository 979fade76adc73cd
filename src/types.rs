//! Core types for the aggregation pipeline: raw and normalised items,
//! analysis scores, duplicate clusters, and ranked results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Engagement metrics, keyed by metric name (`likes`, `comments`, `views`,
/// `score`, `shares`). A `BTreeMap` keeps iteration deterministic.
pub type Engagement = BTreeMap<String, u64>;

/// The kind of source a content item was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// News outlets and wire services.
    News,
    /// Web search engine result pages.
    Search,
    /// Social platforms (microblogs, link aggregators).
    Social,
    /// Discussion forums and Q&A sites.
    Forum,
    /// Blogs and newsletters.
    Blog,
    /// Video platforms (metadata only, never media).
    Video,
    /// Encyclopedias and reference works.
    Knowledge,
    /// Weather services.
    Weather,
    /// Anything not covered above.
    Other,
}

impl SourceType {
    /// Returns the lowercase name of this source type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Search => "search",
            Self::Social => "social",
            Self::Forum => "forum",
            Self::Blog => "blog",
            Self::Video => "video",
            Self::Knowledge => "knowledge",
            Self::Weather => "weather",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A source-specific item as produced by a collector.
///
/// Collectors own these until they are handed to the normaliser. A
/// collector that cannot produce a field supplies the documented default
/// (empty string for text, `None` for optional fields) rather than
/// omitting it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawItem {
    /// Identifier of the source that produced this item (e.g. `"bbc"`).
    pub source_id: String,
    /// The item's URL as reported by the source, not yet canonicalised.
    pub url: String,
    /// The item's title. May be empty.
    pub title: String,
    /// Body text or snippet. May be empty.
    pub body_or_snippet: String,
    /// When the collector fetched this item.
    pub collected_at: DateTime<Utc>,
    /// Author, if the source exposes one.
    #[serde(default)]
    pub author: Option<String>,
    /// Publication timestamp, if the source exposes one.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Engagement counts, if the source exposes any.
    #[serde(default)]
    pub engagement: Engagement,
    /// Opaque per-source fields carried through for provenance.
    #[serde(default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A content item in the pipeline's canonical schema.
///
/// Created by the normaliser, consumed by the deduplicator. Immutable
/// once created; analysis scores live in their own [`AnalysisScores`]
/// slot rather than on the item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedItem {
    /// Stable identity, derived from the canonical URL and source id.
    /// Two raw items from the same source whose URLs canonicalise
    /// identically get the same id.
    pub id: String,
    /// The item's title.
    pub title: String,
    /// Canonicalised URL (lower-cased host, tracking parameters
    /// stripped, default port and trailing slash removed).
    pub url: String,
    /// Plain-text content. May be empty.
    pub content: String,
    /// Identifier of the source that produced this item.
    pub source_id: String,
    /// The kind of source, looked up from the reputation table.
    pub source_type: SourceType,
    /// Author, if known.
    pub author: Option<String>,
    /// Publication timestamp, if known.
    pub published_at: Option<DateTime<Utc>>,
    /// Engagement counts.
    pub engagement: Engagement,
    /// Static trust weight for this item's source in [0,1]; 0.5 when the
    /// source is unknown to the reputation table.
    pub source_reputation: f64,
}

/// Signed bias magnitudes, one per dimension, each in [-1,1].
///
/// Political bias is signed: negative values lean left, positive lean
/// right. The remaining dimensions report non-negative magnitudes (how
/// loaded the language is, not which way it points).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasScores {
    /// Lexicon balance between left- and right-leaning terms.
    pub political: f64,
    /// Density of emotionally charged language.
    pub emotional: f64,
    /// Density of opinion and overcertainty markers.
    pub source: f64,
    /// Density of gendered language.
    pub gender: f64,
}

/// Sentiment of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Overall polarity in [-1,1].
    pub polarity: f64,
    /// How subjective the text reads, in [0,1].
    pub subjectivity: f64,
    /// Confidence in the polarity estimate, in [0,1]. Reported for
    /// observability; nothing downstream gates on it.
    pub confidence: f64,
}

/// Per-item bag of independent analyzer outputs.
///
/// `None` means the analyzer was unavailable for this item — never a
/// silent zero. The scorer substitutes a documented neutral value and
/// flags the substitution in the item's explanation trail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisScores {
    /// Relevance of the item to the query, in [0,1].
    pub relevance: Option<f64>,
    /// Trustworthiness of the item, in [0,1].
    pub credibility: Option<f64>,
    /// Per-dimension bias magnitudes.
    pub bias: Option<BiasScores>,
    /// Polarity and subjectivity.
    pub sentiment: Option<SentimentScore>,
}

/// A normalised item chosen to represent a duplicate cluster, with
/// metadata merged from all cluster members: earliest `published_at`,
/// per-metric maximum engagement, and the union of contributing sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalItem {
    /// The base record — the member with the highest source reputation —
    /// with merged `published_at` and `engagement`.
    pub item: NormalizedItem,
    /// All source ids that contributed a member, in first-seen order.
    pub source_ids: Vec<String>,
    /// Position of the cluster's earliest member in the original
    /// collection order. Used as the final ranking tie-break.
    pub collection_order: usize,
}

/// A non-empty set of normalised items judged equivalent, reduced to one
/// canonical representative. Clusters partition the deduplicator's input:
/// every input item lands in exactly one cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateCluster {
    /// The representative item with merged metadata.
    pub canonical: CanonicalItem,
    /// Ids of the remaining members, kept for provenance. Empty for a
    /// singleton cluster.
    pub duplicate_ids: Vec<String>,
}

impl DuplicateCluster {
    /// Number of members in this cluster, including the canonical item.
    pub fn len(&self) -> usize {
        1 + self.duplicate_ids.len()
    }

    /// Always false — clusters are non-empty by construction.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// One weighted factor of a composite score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreFactor {
    /// Factor name: `relevance`, `credibility`, `recency`, `engagement`.
    pub name: String,
    /// Configured weight (before normalisation by the weight sum).
    pub weight: f64,
    /// The factor's value in [0,1].
    pub value: f64,
    /// The factor's contribution to the composite score.
    pub contribution: f64,
    /// True when the value is a documented neutral fallback because the
    /// corresponding analyzer was unavailable.
    pub fallback: bool,
}

/// Why an item ranks where it does. Required output, not optional
/// telemetry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreExplanation {
    /// Each weighted factor and its numeric contribution, in the order
    /// they were combined.
    pub factors: Vec<ScoreFactor>,
    /// One-line human-readable summary, e.g.
    /// `"score 0.72 — highly relevant, high credibility, recent"`.
    pub summary: String,
}

/// A scored, ranked item — the pipeline's terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedItem {
    /// The canonical item this score applies to.
    pub canonical: CanonicalItem,
    /// Composite score in [0,1].
    pub score: f64,
    /// The weighted factors behind the score.
    pub explanation: ScoreExplanation,
}

/// Outcome of one source's collection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    /// The collector returned items (possibly zero) before its deadline.
    Succeeded,
    /// The collector reported a fetch or parse failure.
    Failed,
    /// The collector exceeded its per-source deadline, or the global
    /// query deadline cut it off.
    TimedOut,
}

/// Per-source outcome detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceReport {
    /// How the source's collection attempt ended.
    pub status: SourceStatus,
    /// Items the source contributed (0 unless `Succeeded`).
    pub items: usize,
}

/// Aggregate source counters for one query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceTally {
    /// Sources the orchestrator fanned out to.
    pub attempted: usize,
    /// Sources that returned items before their deadline.
    pub succeeded: usize,
    /// Sources that reported a fetch or parse failure.
    pub failed: usize,
    /// Sources cut off by a per-source or global deadline.
    pub timed_out: usize,
}

/// Run statistics: how complete the result set is and where it came
/// from. Always populated, so degraded completeness is observable rather
/// than silent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Aggregate source counters.
    pub sources: SourceTally,
    /// Per-source outcome and item count, keyed by source id.
    pub per_source: BTreeMap<String, SourceReport>,
    /// Normalised items entering deduplication.
    pub items_before_dedup: usize,
    /// Clusters (canonical items) leaving deduplication.
    pub items_after_dedup: usize,
    /// Items in the final ranking (above the score floor).
    pub items_ranked: usize,
    /// Items dropped by the `min_score` floor.
    pub items_dropped: usize,
    /// Share of the final ranking per source type, in percent.
    pub source_type_share: BTreeMap<String, f64>,
    /// Wall-clock time for the whole query in milliseconds.
    pub elapsed_ms: u64,
}

/// Everything a query produces: the ranked items and the statistics
/// describing how they were obtained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Ranked items, best first.
    pub items: Vec<RankedItem>,
    /// Completeness and provenance statistics.
    pub statistics: RunStatistics,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_normalized(id: &str) -> NormalizedItem {
        NormalizedItem {
            id: id.into(),
            title: "Example".into(),
            url: "https://example.com/a".into(),
            content: String::new(),
            source_id: "bbc".into(),
            source_type: SourceType::News,
            author: None,
            published_at: None,
            engagement: Engagement::new(),
            source_reputation: 0.9,
        }
    }

    #[test]
    fn source_type_display() {
        assert_eq!(SourceType::News.to_string(), "news");
        assert_eq!(SourceType::Knowledge.to_string(), "knowledge");
        assert_eq!(SourceType::Other.to_string(), "other");
    }

    #[test]
    fn source_type_serde_round_trip() {
        let json = serde_json::to_string(&SourceType::Video).expect("serialize");
        assert_eq!(json, "\"video\"");
        let decoded: SourceType = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, SourceType::Video);
    }

    #[test]
    fn raw_item_optional_fields_default_on_deserialize() {
        let json = r#"{
            "source_id": "bbc",
            "url": "https://bbc.com/news/1",
            "title": "Title",
            "body_or_snippet": "Body",
            "collected_at": "2026-08-01T12:00:00Z"
        }"#;
        let item: RawItem = serde_json::from_str(json).expect("deserialize");
        assert!(item.author.is_none());
        assert!(item.published_at.is_none());
        assert!(item.engagement.is_empty());
        assert!(item.extra.is_empty());
    }

    #[test]
    fn analysis_scores_default_is_all_unavailable() {
        let scores = AnalysisScores::default();
        assert!(scores.relevance.is_none());
        assert!(scores.credibility.is_none());
        assert!(scores.bias.is_none());
        assert!(scores.sentiment.is_none());
    }

    #[test]
    fn cluster_len_counts_canonical() {
        let cluster = DuplicateCluster {
            canonical: CanonicalItem {
                item: make_normalized("a"),
                source_ids: vec!["bbc".into()],
                collection_order: 0,
            },
            duplicate_ids: vec!["b".into(), "c".into()],
        };
        assert_eq!(cluster.len(), 3);
        assert!(!cluster.is_empty());
    }

    #[test]
    fn normalized_item_serde_round_trip() {
        let item = make_normalized("abc123");
        let json = serde_json::to_string(&item).expect("serialize");
        let decoded: NormalizedItem = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded.id, "abc123");
        assert_eq!(decoded.source_type, SourceType::News);
        assert!((decoded.source_reputation - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn run_statistics_default_is_empty() {
        let stats = RunStatistics::default();
        assert_eq!(stats.sources.attempted, 0);
        assert_eq!(stats.items_before_dedup, 0);
        assert!(stats.per_source.is_empty());
    }
}
