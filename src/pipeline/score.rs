//! Composite scoring and final ranking.
//!
//! `score = w_rel·relevance + w_cred·credibility + w_rec·recency +
//! w_eng·engagement`, normalised by the weight sum so the composite
//! stays in [0,1] for any non-negative weights. Items under the
//! `min_score` floor are dropped from the ranking, not sorted last.
//! Every ranked item carries an explanation listing each weighted
//! factor and its contribution; this is a required output.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::config::{RankBy, ScoreWeights};
use crate::types::{
    AnalysisScores, CanonicalItem, NormalizedItem, RankedItem, ScoreExplanation, ScoreFactor,
    SourceType,
};

/// Scores canonical items and produces the final ordering.
#[derive(Debug, Clone)]
pub struct Scorer {
    weights: ScoreWeights,
    min_score: f64,
    half_life: std::time::Duration,
    rank_by: RankBy,
}

impl Scorer {
    /// Creates a scorer. The weights are validated as part of
    /// [`crate::config::PipelineConfig`].
    pub fn new(
        weights: ScoreWeights,
        min_score: f64,
        half_life: std::time::Duration,
        rank_by: RankBy,
    ) -> Self {
        Self {
            weights,
            min_score,
            half_life,
            rank_by,
        }
    }

    /// Scores one canonical item against its analyzer outputs.
    ///
    /// Unavailable analyzers get their documented neutral substitute
    /// (relevance 0.5, credibility = the item's source reputation),
    /// flagged as a fallback in the explanation.
    pub fn score_item(
        &self,
        canonical: CanonicalItem,
        scores: &AnalysisScores,
        now: DateTime<Utc>,
    ) -> RankedItem {
        let (relevance, relevance_fallback) = match scores.relevance {
            Some(value) => (value.clamp(0.0, 1.0), false),
            None => (0.5, true),
        };
        let (credibility, credibility_fallback) = match scores.credibility {
            Some(value) => (value.clamp(0.0, 1.0), false),
            None => (canonical.item.source_reputation.clamp(0.0, 1.0), true),
        };
        let recency = recency_decay(canonical.item.published_at, now, self.half_life);
        let engagement = engagement_norm(&canonical.item);

        let factors = vec![
            factor("relevance", self.weights.relevance, relevance, relevance_fallback),
            factor(
                "credibility",
                self.weights.credibility,
                credibility,
                credibility_fallback,
            ),
            factor("recency", self.weights.recency, recency, false),
            factor("engagement", self.weights.engagement, engagement, false),
        ];

        let weight_sum = self.weights.sum();
        let composite = factors.iter().map(|f| f.contribution).sum::<f64>() / weight_sum;
        let composite = composite.clamp(0.0, 1.0);

        let summary = summarize(composite, relevance, credibility, recency, engagement);

        RankedItem {
            canonical,
            score: composite,
            explanation: ScoreExplanation { factors, summary },
        }
    }

    /// Scores every canonical item, applies the `min_score` floor, and
    /// sorts the survivors.
    ///
    /// Ordering: the configured rank key descending, then source
    /// reputation, then `published_at` (most recent first, undated
    /// last), then original collection order. Returns the ranking and
    /// the number of items dropped by the floor.
    pub fn rank(
        &self,
        clusters: Vec<(CanonicalItem, AnalysisScores)>,
        now: DateTime<Utc>,
    ) -> (Vec<RankedItem>, usize) {
        let mut ranked: Vec<RankedItem> = clusters
            .into_iter()
            .map(|(canonical, scores)| self.score_item(canonical, &scores, now))
            .collect();

        let before = ranked.len();
        ranked.retain(|item| item.score > self.min_score);
        let dropped = before - ranked.len();

        let rank_by = self.rank_by;
        ranked.sort_by(|a, b| {
            sort_key(b, rank_by)
                .partial_cmp(&sort_key(a, rank_by))
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    b.canonical
                        .item
                        .source_reputation
                        .partial_cmp(&a.canonical.item.source_reputation)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| b.canonical.item.published_at.cmp(&a.canonical.item.published_at))
                .then_with(|| a.canonical.collection_order.cmp(&b.canonical.collection_order))
        });

        (ranked, dropped)
    }
}

/// The value the configured rank key selects for an item.
fn sort_key(item: &RankedItem, rank_by: RankBy) -> f64 {
    match rank_by {
        RankBy::Composite => item.score,
        RankBy::Relevance => factor_value(item, "relevance"),
        RankBy::Credibility => factor_value(item, "credibility"),
        RankBy::Recency => factor_value(item, "recency"),
        RankBy::Engagement => factor_value(item, "engagement"),
    }
}

fn factor_value(item: &RankedItem, name: &str) -> f64 {
    item.explanation
        .factors
        .iter()
        .find(|f| f.name == name)
        .map_or(0.0, |f| f.value)
}

fn factor(name: &str, weight: f64, value: f64, fallback: bool) -> ScoreFactor {
    ScoreFactor {
        name: name.into(),
        weight,
        value,
        contribution: weight * value,
        fallback,
    }
}

/// Exponential recency decay: 1.0 at publication, halving every
/// `half_life`. Undated items get a fixed neutral 0.5; future-dated
/// items score 1.0.
pub fn recency_decay(
    published_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    half_life: std::time::Duration,
) -> f64 {
    let Some(published) = published_at else {
        return 0.5;
    };
    let age = now - published;
    if age <= chrono::Duration::zero() {
        return 1.0;
    }
    let age_secs = age.num_seconds() as f64;
    let half_life_secs = half_life.as_secs_f64();
    (-(age_secs / half_life_secs)).exp2()
}

/// Normalises raw engagement counts to [0,1] with per-source-type
/// saturating curves, so a single viral item cannot dominate ranking.
///
/// Video: log-scaled views (saturating at one million) blended with the
/// like ratio. Social and forum: log-scaled score, comments, and
/// shares/likes. News, blog, and knowledge items rarely expose counts,
/// so body word count serves as a depth proxy (peaking at 800–1200
/// words). Everything else is neutral.
pub fn engagement_norm(item: &NormalizedItem) -> f64 {
    let metric = |name: &str| item.engagement.get(name).copied().unwrap_or(0) as f64;

    match item.source_type {
        SourceType::Video => {
            let views = metric("views");
            let likes = metric("likes");
            let view_score = (views.max(1.0).log10() / 6.0).min(1.0);
            let like_ratio = if views > 0.0 { likes / views } else { 0.0 };
            let like_score = (like_ratio * 100.0).min(1.0);
            view_score * 0.7 + like_score * 0.3
        }
        SourceType::Social | SourceType::Forum => {
            let score_n = (metric("score").max(1.0).log10() / 4.0).min(1.0);
            let comments_n = (metric("comments").max(1.0).log10() / 3.0).min(1.0);
            let spread = metric("shares") + metric("likes");
            let spread_n = (spread.max(1.0).log10() / 4.0).min(1.0);
            score_n * 0.4 + comments_n * 0.3 + spread_n * 0.3
        }
        SourceType::News | SourceType::Blog | SourceType::Knowledge => {
            let words = item.content.split_whitespace().count();
            match words {
                800..=1200 => 1.0,
                0..=199 => 0.3,
                w if w > 3000 => 0.6,
                _ => 0.7,
            }
        }
        SourceType::Search | SourceType::Weather | SourceType::Other => 0.5,
    }
}

/// One-line human summary from factor bands.
fn summarize(
    composite: f64,
    relevance: f64,
    credibility: f64,
    recency: f64,
    engagement: f64,
) -> String {
    let mut parts: Vec<&str> = Vec::new();

    parts.push(match relevance {
        r if r >= 0.8 => "highly relevant",
        r if r >= 0.6 => "moderately relevant",
        r if r >= 0.4 => "somewhat relevant",
        _ => "low relevance",
    });
    parts.push(match credibility {
        c if c >= 0.8 => "high credibility",
        c if c >= 0.6 => "moderate credibility",
        _ => "questionable credibility",
    });
    parts.push(match recency {
        r if r >= 0.8 => "very recent",
        r if r >= 0.6 => "recent",
        r if r >= 0.4 => "somewhat dated",
        _ => "old content",
    });
    if engagement >= 0.7 {
        parts.push("high engagement");
    } else if engagement >= 0.5 {
        parts.push("moderate engagement");
    }

    format!("score {composite:.2} - {}", parts.join(", "))
}
