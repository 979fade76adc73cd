//! # panora-aggregate
//!
//! Multi-source content aggregation pipeline for Panora.
//!
//! This crate turns a noisy, partially-failing stream of items collected
//! from many independent sources (news, search engines, forums, social
//! platforms, video metadata) into a single deduplicated, ranked result
//! set. The per-source collectors themselves are external collaborators
//! behind the [`Collector`] trait; this crate is the pipeline.
//!
//! ## Design
//!
//! - Fans out one task per source with per-source and global deadlines;
//!   a slow or failing source degrades completeness, never the query
//! - Normalises heterogeneous raw items into one canonical schema with
//!   stable ids and canonicalised URLs
//! - Scores every item with independent relevance, credibility, bias,
//!   and sentiment analyzers; unavailable analyzers fall back to
//!   documented neutral values, flagged in the explanation
//! - Clusters near-duplicates with staged URL/title/content matching
//!   and union-find merging, deterministically
//! - Ranks by a weighted composite score with a full per-factor
//!   explanation on every item
//!
//! ## Guarantees
//!
//! - A query never fails for partial source failure; completeness is
//!   reported in [`RunStatistics`] instead
//! - Identical inputs produce identical output ordering
//! - Only invalid configuration is fatal, and it is rejected before any
//!   query runs

pub mod analyzers;
pub mod collector;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod reputation;
pub mod types;

use std::sync::Arc;

pub use analyzers::AnalyzerKind;
pub use collector::Collector;
pub use config::{DedupThresholds, PipelineConfig, RankBy, RelevanceConfig, ScoreWeights};
pub use error::{AggregateError, CollectError, Result};
pub use pipeline::run::Pipeline;
pub use reputation::{ReputationTable, SourceProfile, DEFAULT_REPUTATION};
pub use types::{
    AnalysisScores, BiasScores, CanonicalItem, DuplicateCluster, Engagement, NormalizedItem,
    RankedItem, RawItem, RunResult, RunStatistics, ScoreExplanation, ScoreFactor, SentimentScore,
    SourceReport, SourceStatus, SourceTally, SourceType,
};

/// Aggregate content for one query across the given collectors.
///
/// Validates `config`, fans out collection, and drives the pipeline to
/// a ranked result. Collectors that fail or time out are recorded in
/// the result's statistics; only invalid configuration is an error.
///
/// Callers serving many queries should construct a [`Pipeline`] once
/// and call [`Pipeline::run`] instead — this wrapper rebuilds the
/// pipeline per call.
///
/// # Errors
///
/// Returns [`AggregateError::InvalidConfiguration`] if `config` fails
/// validation.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> panora_aggregate::Result<()> {
/// use std::sync::Arc;
///
/// let config = panora_aggregate::PipelineConfig::default();
/// let table = panora_aggregate::ReputationTable::builtin();
/// let collectors: Vec<Arc<dyn panora_aggregate::Collector>> = Vec::new();
///
/// let result = panora_aggregate::aggregate("rust 1.80", &collectors, &config, &table).await?;
/// for item in &result.items {
///     println!("{:.2} {}", item.score, item.canonical.item.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn aggregate(
    query: &str,
    collectors: &[Arc<dyn Collector>],
    config: &PipelineConfig,
    reputation: &ReputationTable,
) -> Result<RunResult> {
    let pipeline = Pipeline::new(config.clone(), reputation.clone())?;
    Ok(pipeline.run(query, collectors).await)
}
