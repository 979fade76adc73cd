//! Duplicate clustering over normalised items.
//!
//! Multi-stage pairwise matching with union-find merging. Stages run in
//! a fixed order so that cheap, strict signals short-circuit expensive
//! ones:
//!
//! 1. **URL match** — byte-equal canonical URLs merge unconditionally.
//! 2. **Title similarity** — merge at `title_threshold` (default 0.9).
//! 3. **Content similarity** — only when both bodies are at least
//!    `min_content_length` characters; merge at `content_threshold`
//!    (default 0.85).
//!
//! The global `similarity_threshold` is a floor: a stage score below it
//! disqualifies the pair outright, so no later stage can merge it.
//! Near-misses (at or above the floor but under the stage threshold) are
//! logged at debug level for threshold tuning and never merged.
//!
//! Clustering is transitive: pairwise merges accumulate in a union-find
//! structure, so A–B and B–C put A, B, and C in one cluster even if A–C
//! alone would not cross a threshold. All iteration follows the input
//! order, which makes the output deterministic for a given input.

use std::collections::HashMap;

use crate::config::DedupThresholds;
use crate::pipeline::similarity::{content_similarity, title_similarity};
use crate::types::{CanonicalItem, DuplicateCluster, NormalizedItem};

/// Groups near-duplicate normalised items into clusters.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    thresholds: DedupThresholds,
}

/// Union-find over item indices. Roots are always the smallest index in
/// their set, so cluster identity follows the input order.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            // Path halving keeps lookups near-constant.
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        // The smaller index becomes the root.
        let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[hi] = lo;
    }
}

impl Deduplicator {
    /// Creates a deduplicator with the given thresholds. The thresholds
    /// are validated as part of [`crate::config::PipelineConfig`].
    pub fn new(thresholds: DedupThresholds) -> Self {
        Self { thresholds }
    }

    /// Partitions `items` into duplicate clusters.
    ///
    /// Every input item lands in exactly one cluster; singleton items
    /// become singleton clusters. The clusters come out ordered by the
    /// input position of their earliest member.
    pub fn deduplicate(&self, items: Vec<NormalizedItem>) -> Vec<DuplicateCluster> {
        if items.is_empty() {
            return Vec::new();
        }

        let mut uf = UnionFind::new(items.len());

        // Stage 1: byte-equal canonical URLs merge unconditionally.
        let mut first_by_url: HashMap<&str, usize> = HashMap::new();
        for (idx, item) in items.iter().enumerate() {
            match first_by_url.get(item.url.as_str()) {
                Some(&first) => uf.union(first, idx),
                None => {
                    first_by_url.insert(item.url.as_str(), idx);
                }
            }
        }

        // Stages 2 and 3: pairwise similarity in input order. Merge
        // decisions depend only on the two items, so evaluation order
        // cannot change the final partition.
        for i in 0..items.len() {
            for j in (i + 1)..items.len() {
                if uf.find(i) == uf.find(j) {
                    continue;
                }
                self.consider_pair(&items[i], &items[j], &mut uf, i, j);
            }
        }

        build_clusters(items, &mut uf)
    }

    /// Applies the title and content stages to one unmerged pair.
    fn consider_pair(
        &self,
        a: &NormalizedItem,
        b: &NormalizedItem,
        uf: &mut UnionFind,
        i: usize,
        j: usize,
    ) {
        let floor = self.thresholds.similarity_threshold;

        // Stage 2: title similarity.
        let title_sim = title_similarity(&a.title, &b.title);
        if title_sim < floor {
            return;
        }
        if title_sim >= self.thresholds.title_threshold {
            uf.union(i, j);
            return;
        }
        tracing::debug!(
            a = %a.id,
            b = %b.id,
            similarity = title_sim,
            threshold = self.thresholds.title_threshold,
            "ambiguous duplicate: title near-miss, not merging"
        );

        // Stage 3: content similarity, gated on minimum length.
        let min_len = self.thresholds.min_content_length;
        if a.content.chars().count() < min_len || b.content.chars().count() < min_len {
            return;
        }
        let content_sim = content_similarity(&a.content, &b.content);
        if content_sim < floor {
            return;
        }
        if content_sim >= self.thresholds.content_threshold {
            uf.union(i, j);
            return;
        }
        tracing::debug!(
            a = %a.id,
            b = %b.id,
            similarity = content_sim,
            threshold = self.thresholds.content_threshold,
            "ambiguous duplicate: content near-miss, not merging"
        );
    }
}

/// Derives clusters from the final partition and applies the merge
/// policy for each cluster's canonical item.
fn build_clusters(items: Vec<NormalizedItem>, uf: &mut UnionFind) -> Vec<DuplicateCluster> {
    // Group member indices under their root, preserving input order:
    // roots are minimal indices, so iterating 0..n visits clusters in
    // the order their earliest member appeared.
    let mut members_by_root: Vec<Vec<usize>> = vec![Vec::new(); items.len()];
    let mut root_order: Vec<usize> = Vec::new();
    for idx in 0..items.len() {
        let root = uf.find(idx);
        if members_by_root[root].is_empty() {
            root_order.push(root);
        }
        members_by_root[root].push(idx);
    }

    root_order
        .into_iter()
        .map(|root| merge_cluster(&items, &members_by_root[root]))
        .collect()
}

/// Merge policy: the member with the highest source reputation becomes
/// the base record (ties broken by input order); `published_at` becomes
/// the earliest non-null value; each engagement metric becomes the
/// per-metric maximum; every contributing source id is recorded.
fn merge_cluster(items: &[NormalizedItem], member_indices: &[usize]) -> DuplicateCluster {
    let canonical_idx = member_indices
        .iter()
        .copied()
        .max_by(|&a, &b| {
            items[a]
                .source_reputation
                .partial_cmp(&items[b].source_reputation)
                .unwrap_or(std::cmp::Ordering::Equal)
                // On equal reputation prefer the earlier item; max_by
                // keeps the later of equals, so invert the index order.
                .then(b.cmp(&a))
        })
        .unwrap_or(member_indices[0]);

    let mut base = items[canonical_idx].clone();
    let mut source_ids: Vec<String> = Vec::new();
    let mut duplicate_ids: Vec<String> = Vec::new();

    for &idx in member_indices {
        let member = &items[idx];
        if !source_ids.contains(&member.source_id) {
            source_ids.push(member.source_id.clone());
        }
        if idx != canonical_idx {
            duplicate_ids.push(member.id.clone());
        }
        if let Some(published) = member.published_at {
            base.published_at = match base.published_at {
                Some(existing) if existing <= published => Some(existing),
                _ => Some(published),
            };
        }
        for (metric, &count) in &member.engagement {
            let entry = base.engagement.entry(metric.clone()).or_insert(0);
            *entry = (*entry).max(count);
        }
    }

    DuplicateCluster {
        canonical: CanonicalItem {
            item: base,
            source_ids,
            collection_order: member_indices[0],
        },
        duplicate_ids,
    }
}
