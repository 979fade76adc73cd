//! Pipeline orchestration: concurrent source fan-out, best-effort join,
//! then the four stages in sequence.
//!
//! One task per enabled source, each bounded by the per-source timeout;
//! a global query deadline caps the whole fan-in. Each task writes its
//! outcome (items or an explicit failure marker) into its own result
//! slot, and the orchestrator reads all slots after the join barrier —
//! it never blocks indefinitely on any single source. A slow or failing
//! source degrades completeness, never the whole query.
//!
//! Items are processed in collector declaration order, not arrival
//! order, so a run's output is deterministic for a given completed set.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::analyzers::AnalyzerSet;
use crate::collector::Collector;
use crate::config::PipelineConfig;
use crate::error::{CollectError, Result};
use crate::pipeline::dedup::Deduplicator;
use crate::pipeline::normalize::Normalizer;
use crate::pipeline::score::Scorer;
use crate::reputation::ReputationTable;
use crate::types::{
    AnalysisScores, NormalizedItem, RawItem, RunResult, RunStatistics, SourceReport, SourceStatus,
    SourceTally,
};

/// Outcome of one source's collection task.
enum SourceOutcome {
    /// The collector returned items before its deadline.
    Items(Vec<RawItem>),
    /// The collector reported a fetch or parse failure.
    Failed(CollectError),
    /// The per-source deadline expired (or the collector self-reported
    /// a timeout).
    TimedOut,
}

/// A configured aggregation pipeline.
///
/// Construction validates the configuration — the only fatal error
/// class. A constructed pipeline holds only read-only state (the
/// reputation table, thresholds, weights) and can serve any number of
/// queries concurrently.
pub struct Pipeline {
    config: PipelineConfig,
    normalizer: Normalizer,
    deduplicator: Deduplicator,
    analyzers: AnalyzerSet,
    scorer: Scorer,
}

impl Pipeline {
    /// Creates a pipeline over an immutable reputation table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AggregateError::InvalidConfiguration`] if the
    /// configuration is out of range. No query can run before this
    /// check passes.
    pub fn new(config: PipelineConfig, reputation: ReputationTable) -> Result<Self> {
        config.validate()?;
        let table = Arc::new(reputation);
        let normalizer = Normalizer::new(Arc::clone(&table));
        let deduplicator = Deduplicator::new(config.thresholds);
        let analyzers = AnalyzerSet::new(config.analyzers.clone(), config.relevance.clone());
        let scorer = Scorer::new(
            config.weights,
            config.min_score,
            config.recency_half_life,
            config.rank_by,
        );
        Ok(Self {
            config,
            normalizer,
            deduplicator,
            analyzers,
            scorer,
        })
    }

    /// Runs one query across the given collectors.
    ///
    /// Always returns a result: per-source failures and timeouts are
    /// recorded in [`RunStatistics`] rather than raised, so degraded
    /// completeness is observable instead of fatal. A query where every
    /// source fails produces an empty ranking and statistics saying so.
    pub async fn run(&self, query: &str, collectors: &[Arc<dyn Collector>]) -> RunResult {
        let started = Instant::now();
        let now = Utc::now();

        // Fan out, then fan in with a best-effort barrier.
        let slots = self.collect_all(query, collectors).await;

        // Read all slots in collector declaration order and normalise.
        let mut per_source = std::collections::BTreeMap::new();
        let mut tally = SourceTally {
            attempted: collectors.len(),
            ..Default::default()
        };
        let mut normalized: Vec<NormalizedItem> = Vec::new();

        for (collector, outcome) in collectors.iter().zip(slots) {
            let source_id = collector.source_id().to_string();
            let report = match outcome {
                Some(SourceOutcome::Items(mut items)) => {
                    items.truncate(self.config.max_items_per_source);
                    let count = items.len();
                    tracing::debug!(source = %source_id, count, "source returned items");
                    for raw in items {
                        normalized.push(self.normalizer.normalize(raw, collector.source_type()));
                    }
                    tally.succeeded += 1;
                    SourceReport {
                        status: SourceStatus::Succeeded,
                        items: count,
                    }
                }
                Some(SourceOutcome::Failed(err)) => {
                    tracing::warn!(source = %source_id, error = %err, "source fetch failed");
                    tally.failed += 1;
                    SourceReport {
                        status: SourceStatus::Failed,
                        items: 0,
                    }
                }
                Some(SourceOutcome::TimedOut) => {
                    tracing::warn!(source = %source_id, "source timed out");
                    tally.timed_out += 1;
                    SourceReport {
                        status: SourceStatus::TimedOut,
                        items: 0,
                    }
                }
                // Still in flight when the global deadline expired; its
                // partial work is discarded, not used.
                None => {
                    tracing::warn!(source = %source_id, "source cut off by global deadline");
                    tally.timed_out += 1;
                    SourceReport {
                        status: SourceStatus::TimedOut,
                        items: 0,
                    }
                }
            };
            per_source.insert(source_id, report);
        }

        let items_before_dedup = normalized.len();

        // Analyzer set: independent per-item scores, no shared state, so
        // the items are analysed concurrently and each result lands in
        // its own slot.
        let analysis: HashMap<String, AnalysisScores> = futures::future::join_all(
            normalized
                .iter()
                .map(|item| async { (item.id.clone(), self.analyzers.analyze(query, item, now)) }),
        )
        .await
        .into_iter()
        .collect();

        // Deduplication is the pipeline's synchronisation point: it
        // needs the full normalised set before emitting clusters.
        let clusters = self.deduplicator.deduplicate(normalized);
        let items_after_dedup = clusters.len();
        tracing::debug!(
            before = items_before_dedup,
            after = items_after_dedup,
            "deduplicated"
        );

        let scored_input: Vec<_> = clusters
            .into_iter()
            .map(|cluster| {
                let scores = analysis
                    .get(&cluster.canonical.item.id)
                    .cloned()
                    .unwrap_or_default();
                (cluster.canonical, scores)
            })
            .collect();

        let (items, items_dropped) = self.scorer.rank(scored_input, now);
        tracing::debug!(ranked = items.len(), dropped = items_dropped, "ranked");

        let mut source_type_share = std::collections::BTreeMap::new();
        if !items.is_empty() {
            let total = items.len() as f64;
            for item in &items {
                *source_type_share
                    .entry(item.canonical.item.source_type.name().to_string())
                    .or_insert(0.0) += 1.0;
            }
            for share in source_type_share.values_mut() {
                *share = (*share / total * 1000.0).round() / 10.0;
            }
        }

        let statistics = RunStatistics {
            sources: tally,
            per_source,
            items_before_dedup,
            items_after_dedup,
            items_ranked: items.len(),
            items_dropped,
            source_type_share,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        RunResult { items, statistics }
    }

    /// Fans out one task per collector and joins them with a global
    /// deadline. Returns one slot per collector, in declaration order;
    /// `None` means the source was still in flight at the deadline.
    async fn collect_all(
        &self,
        query: &str,
        collectors: &[Arc<dyn Collector>],
    ) -> Vec<Option<SourceOutcome>> {
        let mut slots: Vec<Option<SourceOutcome>> = Vec::new();
        slots.resize_with(collectors.len(), || None);
        if collectors.is_empty() {
            return slots;
        }

        let (tx, mut rx) = mpsc::channel::<(usize, SourceOutcome)>(collectors.len());
        let mut handles = Vec::with_capacity(collectors.len());

        for (idx, collector) in collectors.iter().enumerate() {
            let collector = Arc::clone(collector);
            let tx = tx.clone();
            let query = query.to_string();
            let per_source_timeout = self.config.per_source_timeout;
            let max_items = self.config.max_items_per_source;

            handles.push(tokio::spawn(async move {
                let outcome =
                    match tokio::time::timeout(per_source_timeout, collector.collect(&query, max_items))
                        .await
                    {
                        Ok(Ok(items)) => SourceOutcome::Items(items),
                        Ok(Err(CollectError::Timeout(_))) => SourceOutcome::TimedOut,
                        Ok(Err(err)) => SourceOutcome::Failed(err),
                        Err(_) => SourceOutcome::TimedOut,
                    };
                // The receiver only disappears once the global deadline
                // has passed; a send failure then is expected.
                let _ = tx.send((idx, outcome)).await;
            }));
        }
        drop(tx);

        let deadline = tokio::time::Instant::now() + self.config.global_timeout;
        for _ in 0..collectors.len() {
            match tokio::time::timeout_at(deadline, rx.recv()).await {
                Ok(Some((idx, outcome))) => slots[idx] = Some(outcome),
                // All senders dropped — every task has reported.
                Ok(None) => break,
                // Global deadline: proceed with whatever completed.
                Err(_) => break,
            }
        }

        // Cancel anything still in flight.
        for handle in &handles {
            handle.abort();
        }

        slots
    }
}
