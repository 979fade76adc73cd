//! Pipeline configuration with sensible defaults.
//!
//! [`PipelineConfig`] controls deduplication thresholds, scoring weights,
//! timeouts, and which analyzers run. Loading configuration from files or
//! flags is the caller's concern; the pipeline only validates the values
//! it is handed. Invalid configuration is the single fatal error class —
//! it is rejected at pipeline construction, before any query runs.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::analyzers::AnalyzerKind;
use crate::error::AggregateError;

/// Similarity thresholds for the deduplicator.
///
/// All thresholds apply to token-set Jaccard similarity in [0,1];
/// `similarity_threshold` is a global floor below which a pair is never
/// merged, whatever a later stage would say.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DedupThresholds {
    /// Global floor for any merge decision.
    pub similarity_threshold: f64,
    /// Minimum title similarity for a title-stage merge.
    pub title_threshold: f64,
    /// Minimum content similarity for a content-stage merge.
    pub content_threshold: f64,
    /// Content stage only runs when both items' content is at least this
    /// many characters.
    pub min_content_length: usize,
}

impl Default for DedupThresholds {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.8,
            title_threshold: 0.9,
            content_threshold: 0.85,
            min_content_length: 50,
        }
    }
}

/// Weights for the composite score.
///
/// Weights must be non-negative and need not sum to 1 — the scorer
/// normalises by the weight sum, which keeps the composite in [0,1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight of query relevance.
    pub relevance: f64,
    /// Weight of source/content credibility.
    pub credibility: f64,
    /// Weight of publication recency.
    pub recency: f64,
    /// Weight of normalised engagement.
    pub engagement: f64,
}

impl ScoreWeights {
    /// Sum of all weights. Must be positive for scoring to be defined.
    pub fn sum(&self) -> f64 {
        self.relevance + self.credibility + self.recency + self.engagement
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            relevance: 0.4,
            credibility: 0.2,
            recency: 0.2,
            engagement: 0.2,
        }
    }
}

/// Tuning for the relevance analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevanceConfig {
    /// Multiplier applied to title matches over body matches.
    pub title_boost: f64,
    /// Multiplier applied when a configured domain keyword appears.
    pub keyword_boost: f64,
    /// Domain-specific keywords that trigger `keyword_boost`.
    pub keywords: Vec<String>,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            title_boost: 2.0,
            keyword_boost: 1.5,
            keywords: Vec::new(),
        }
    }
}

/// Which key orders the final ranking. Composite is the default; the
/// single-factor keys are for callers that want one lens (e.g. "newest
/// first"). `min_score` filtering and tie-breaks are unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    /// The weighted composite score.
    #[default]
    Composite,
    /// Relevance factor only.
    Relevance,
    /// Credibility factor only.
    Credibility,
    /// Recency factor only.
    Recency,
    /// Engagement factor only.
    Engagement,
}

/// Configuration for one aggregation pipeline.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides. [`PipelineConfig::validate`] is called at pipeline
/// construction and rejects out-of-range values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Deduplication thresholds.
    pub thresholds: DedupThresholds,
    /// Composite score weights.
    pub weights: ScoreWeights,
    /// Items scoring below this floor are dropped from the ranking, not
    /// merely sorted last.
    pub min_score: f64,
    /// Half-life for exponential recency decay.
    pub recency_half_life: Duration,
    /// Sort key for the final ranking.
    pub rank_by: RankBy,
    /// Deadline for each individual source task.
    pub per_source_timeout: Duration,
    /// Deadline for the whole query; sources still in flight when it
    /// expires are recorded as timed out.
    pub global_timeout: Duration,
    /// Cap on items accepted from any single source.
    pub max_items_per_source: usize,
    /// Which analyzers run. Disabled analyzers are treated as
    /// unavailable and the scorer substitutes documented neutral values.
    pub analyzers: Vec<AnalyzerKind>,
    /// Relevance analyzer tuning.
    pub relevance: RelevanceConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            thresholds: DedupThresholds::default(),
            weights: ScoreWeights::default(),
            min_score: 0.1,
            recency_half_life: Duration::from_secs(10 * 24 * 60 * 60),
            rank_by: RankBy::Composite,
            per_source_timeout: Duration::from_secs(8),
            global_timeout: Duration::from_secs(30),
            max_items_per_source: 100,
            analyzers: AnalyzerKind::all().to_vec(),
            relevance: RelevanceConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Validates this configuration.
    ///
    /// Checks:
    /// - every threshold and `min_score` in [0,1]
    /// - `min_content_length` greater than 0
    /// - every weight non-negative, weight sum positive
    /// - both timeouts and `recency_half_life` non-zero
    /// - `max_items_per_source` greater than 0
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::InvalidConfiguration`] naming the first
    /// offending field.
    pub fn validate(&self) -> Result<(), AggregateError> {
        let unit = [
            ("similarity_threshold", self.thresholds.similarity_threshold),
            ("title_threshold", self.thresholds.title_threshold),
            ("content_threshold", self.thresholds.content_threshold),
            ("min_score", self.min_score),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(AggregateError::InvalidConfiguration(format!(
                    "{name} must be within [0,1], got {value}"
                )));
            }
        }

        if self.thresholds.min_content_length == 0 {
            return Err(AggregateError::InvalidConfiguration(
                "min_content_length must be greater than 0".into(),
            ));
        }

        let weights = [
            ("relevance", self.weights.relevance),
            ("credibility", self.weights.credibility),
            ("recency", self.weights.recency),
            ("engagement", self.weights.engagement),
        ];
        for (name, value) in weights {
            if value < 0.0 || !value.is_finite() {
                return Err(AggregateError::InvalidConfiguration(format!(
                    "{name} weight must be non-negative, got {value}"
                )));
            }
        }
        if self.weights.sum() <= 0.0 {
            return Err(AggregateError::InvalidConfiguration(
                "weight sum must be positive".into(),
            ));
        }

        if self.per_source_timeout.is_zero() {
            return Err(AggregateError::InvalidConfiguration(
                "per_source_timeout must be greater than 0".into(),
            ));
        }
        if self.global_timeout.is_zero() {
            return Err(AggregateError::InvalidConfiguration(
                "global_timeout must be greater than 0".into(),
            ));
        }
        if self.recency_half_life.is_zero() {
            return Err(AggregateError::InvalidConfiguration(
                "recency_half_life must be greater than 0".into(),
            ));
        }
        if self.max_items_per_source == 0 {
            return Err(AggregateError::InvalidConfiguration(
                "max_items_per_source must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}
