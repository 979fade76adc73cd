//! Credibility analyzer: how much an item can be trusted.
//!
//! Combines the source-reputation prior with content-quality heuristics
//! using fixed sub-weights: domain 0.3, source type 0.2, content 0.25,
//! recency 0.15, author 0.1 (summing to 1.0).

use chrono::{DateTime, Utc};

use crate::pipeline::url_canon::host_of;
use crate::reputation::DEFAULT_REPUTATION;
use crate::types::{NormalizedItem, SourceType};

/// Markers of careful, sourced writing.
const QUALITY_MARKERS: &[&str] = &[
    "research",
    "study",
    "analysis",
    "citations",
    "references",
    "peer-reviewed",
    "journal",
    "evidence",
    "official",
    "verified",
];

/// Clickbait and promotional markers; each hit costs the content
/// component a penalty.
const CLICKBAIT_MARKERS: &[&str] = &[
    "you won't believe",
    "click here",
    "shocking",
    "doctors hate",
    "one weird trick",
    "won't believe what happened",
    "act now",
    "limited offer",
    "exclusive!!",
];

/// Sub-weights for the five credibility components. Must sum to 1.0.
const W_DOMAIN: f64 = 0.3;
const W_SOURCE: f64 = 0.2;
const W_CONTENT: f64 = 0.25;
const W_RECENCY: f64 = 0.15;
const W_AUTHOR: f64 = 0.1;

/// Scores the credibility of `item` in [0,1].
///
/// `now` anchors the recency component so one run shares one clock.
pub fn score(item: &NormalizedItem, now: DateTime<Utc>) -> f64 {
    let domain = domain_score(item);
    let source = source_type_prior(item.source_type);
    let content = content_quality(&item.title, &item.content);
    let recency = recency_band(item.published_at, now);
    let author = if item.author.is_some() { 1.0 } else { 0.4 };

    let combined = domain * W_DOMAIN
        + source * W_SOURCE
        + content * W_CONTENT
        + recency * W_RECENCY
        + author * W_AUTHOR;
    combined.clamp(0.0, 1.0)
}

/// Domain component: the reputation-table prior when the source is
/// known, otherwise a TLD heuristic over the item's host.
fn domain_score(item: &NormalizedItem) -> f64 {
    if (item.source_reputation - DEFAULT_REPUTATION).abs() > f64::EPSILON {
        return item.source_reputation;
    }
    match host_of(&item.url) {
        Some(host) if host.ends_with(".gov") => 0.9,
        Some(host) if host.ends_with(".edu") => 0.85,
        Some(host) if host.ends_with(".org") => 0.7,
        Some(host) if host.ends_with(".com") => 0.6,
        Some(_) => 0.5,
        None => 0.3,
    }
}

/// Prior trust per source type.
fn source_type_prior(source_type: SourceType) -> f64 {
    match source_type {
        SourceType::Knowledge => 0.85,
        SourceType::News => 0.75,
        SourceType::Search | SourceType::Weather => 0.7,
        SourceType::Forum | SourceType::Blog => 0.55,
        SourceType::Video | SourceType::Other => 0.5,
        SourceType::Social => 0.45,
    }
}

/// Content component: length bands plus quality/clickbait word lists.
fn content_quality(title: &str, content: &str) -> f64 {
    let haystack = format!("{title} {content}").to_lowercase();
    let word_count = content.split_whitespace().count();

    let mut quality: f64 = 0.5;
    if word_count >= 100 {
        quality += 0.1;
    }
    if word_count >= 400 {
        quality += 0.1;
    }

    let quality_hits = QUALITY_MARKERS
        .iter()
        .filter(|m| haystack.contains(*m))
        .count();
    quality += (quality_hits as f64 * 0.05).min(0.2);

    let clickbait_hits = CLICKBAIT_MARKERS
        .iter()
        .filter(|m| haystack.contains(*m))
        .count();
    quality -= clickbait_hits as f64 * 0.15;

    quality.clamp(0.0, 1.0)
}

/// Recency component in coarse bands; undated items are neutral.
fn recency_band(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(published) = published_at else {
        return 0.5;
    };
    let age_days = (now - published).num_days();
    match age_days {
        d if d <= 1 => 1.0,
        d if d <= 7 => 0.9,
        d if d <= 30 => 0.7,
        d if d <= 365 => 0.5,
        _ => 0.3,
    }
}
