//! Per-item analyzers: relevance, credibility, bias, sentiment.
//!
//! Each analyzer is an independent, side-effect-free scoring function
//! over `(query, item)`. The set of analyzers is closed and known at
//! pipeline construction; adding an analyzer means adding a variant
//! here, not runtime registration. Analyzers share no mutable state, so
//! they can run in any order, concurrently, across items and kinds.
//!
//! A disabled or unavailable analyzer leaves its [`AnalysisScores`] slot
//! as `None`; the scorer substitutes a documented neutral value and
//! flags the substitution in the item's explanation.

pub mod bias;
pub mod credibility;
pub mod relevance;
pub mod sentiment;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::RelevanceConfig;
use crate::types::{AnalysisScores, NormalizedItem};

/// The closed set of analyzers the pipeline knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    /// Query relevance via keyword overlap with title boost.
    Relevance,
    /// Source and content trustworthiness.
    Credibility,
    /// Per-dimension bias magnitudes.
    Bias,
    /// Polarity and subjectivity.
    Sentiment,
}

impl AnalyzerKind {
    /// Returns the lowercase name of this analyzer.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Credibility => "credibility",
            Self::Bias => "bias",
            Self::Sentiment => "sentiment",
        }
    }

    /// Returns all analyzer variants.
    pub fn all() -> &'static [AnalyzerKind] {
        &[
            Self::Relevance,
            Self::Credibility,
            Self::Bias,
            Self::Sentiment,
        ]
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The configured analyzer set for one pipeline.
///
/// Holds only read-only configuration; `analyze` is a pure function of
/// its arguments.
#[derive(Debug, Clone)]
pub struct AnalyzerSet {
    enabled: Vec<AnalyzerKind>,
    relevance: RelevanceConfig,
}

impl AnalyzerSet {
    /// Creates an analyzer set running the given kinds.
    pub fn new(enabled: Vec<AnalyzerKind>, relevance: RelevanceConfig) -> Self {
        Self { enabled, relevance }
    }

    /// True when `kind` is enabled for this pipeline.
    pub fn is_enabled(&self, kind: AnalyzerKind) -> bool {
        self.enabled.contains(&kind)
    }

    /// Runs every enabled analyzer against one item.
    ///
    /// Disabled analyzers leave their slot `None` (unavailable); they
    /// are never silently zero. `now` anchors the credibility recency
    /// heuristic so that a whole run shares one clock reading.
    pub fn analyze(
        &self,
        query: &str,
        item: &NormalizedItem,
        now: DateTime<Utc>,
    ) -> AnalysisScores {
        AnalysisScores {
            relevance: self
                .is_enabled(AnalyzerKind::Relevance)
                .then(|| relevance::score(query, item, &self.relevance)),
            credibility: self
                .is_enabled(AnalyzerKind::Credibility)
                .then(|| credibility::score(item, now)),
            bias: self
                .is_enabled(AnalyzerKind::Bias)
                .then(|| bias::score(item)),
            sentiment: self
                .is_enabled(AnalyzerKind::Sentiment)
                .then(|| sentiment::score(item)),
        }
    }
}
