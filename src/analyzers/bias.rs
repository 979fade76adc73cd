//! Bias analyzer: independent magnitudes per dimension.
//!
//! Four dimensions, each scored from its own lexicon: political (signed
//! — negative leans left, positive leans right), emotional (charged
//! language density), source (opinion and overcertainty markers), and
//! gender (gendered language density). No single scalar bias score is
//! produced; downstream consumers pick the dimensions they care about.

use crate::types::{BiasScores, NormalizedItem};

const LEFT_TERMS: &[&str] = &[
    "progressive",
    "social justice",
    "climate change",
    "gun control",
    "healthcare reform",
    "minimum wage",
    "wealth inequality",
    "systemic racism",
];

const RIGHT_TERMS: &[&str] = &[
    "conservative",
    "traditional values",
    "free market",
    "second amendment",
    "border security",
    "law and order",
    "fiscal responsibility",
    "small government",
];

const CHARGED_TERMS: &[&str] = &[
    "outrageous",
    "shocking",
    "devastating",
    "explosive",
    "scandalous",
    "horrific",
    "appalling",
    "catastrophic",
    "radical",
    "extremist",
    "corrupt",
    "disaster",
    "betrayal",
];

const OPINION_MARKERS: &[&str] = &[
    "i think",
    "i believe",
    "in my opinion",
    "personally",
    "i feel",
    "it seems to me",
    "i would argue",
];

const CERTAINTY_MARKERS: &[&str] = &[
    "definitely",
    "certainly",
    "obviously",
    "clearly",
    "undoubtedly",
    "without question",
    "absolutely",
];

const GENDERED_TERMS: &[&str] = &["bossy", "shrill", "hysterical", "emotional outburst"];

/// Scores all bias dimensions for one item.
///
/// Matching is case-insensitive substring search over title and
/// content, so multi-word markers ("in my opinion") work.
pub fn score(item: &NormalizedItem) -> BiasScores {
    let text = format!("{} {}", item.title, item.content).to_lowercase();

    BiasScores {
        political: political_lean(&text),
        emotional: density(&text, CHARGED_TERMS, 0.2),
        source: opinion_load(&text),
        gender: density(&text, GENDERED_TERMS, 0.25),
    }
}

/// Signed political lean in [-1,1]: lexicon balance scaled by how much
/// political vocabulary the text uses at all.
fn political_lean(text: &str) -> f64 {
    let left = hits(text, LEFT_TERMS);
    let right = hits(text, RIGHT_TERMS);
    let total = left + right;
    if total == 0 {
        return 0.0;
    }
    let balance = (right as f64 - left as f64) / total as f64;
    let intensity = (total as f64 / 5.0).min(1.0);
    balance * intensity
}

/// Opinion and overcertainty markers, combined.
fn opinion_load(text: &str) -> f64 {
    let load = hits(text, OPINION_MARKERS) + hits(text, CERTAINTY_MARKERS);
    (load as f64 * 0.2).min(1.0)
}

/// Saturating per-hit density for a lexicon.
fn density(text: &str, lexicon: &[&str], per_hit: f64) -> f64 {
    (hits(text, lexicon) as f64 * per_hit).min(1.0)
}

fn hits(text: &str, lexicon: &[&str]) -> usize {
    lexicon.iter().filter(|term| text.contains(*term)).count()
}
