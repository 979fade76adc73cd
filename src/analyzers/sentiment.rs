//! Sentiment analyzer: lexicon-based polarity and subjectivity.
//!
//! Polarity comes from the balance of positive and negative words,
//! subjectivity from the density of sentiment-bearing and opinion
//! vocabulary. Confidence is reported for observability only — nothing
//! downstream gates on it.

use std::collections::BTreeSet;

use crate::types::{NormalizedItem, SentimentScore};

const POSITIVE_WORDS: &[&str] = &[
    "excellent",
    "amazing",
    "fantastic",
    "great",
    "wonderful",
    "outstanding",
    "brilliant",
    "superb",
    "love",
    "awesome",
    "incredible",
    "remarkable",
    "exceptional",
    "success",
    "win",
    "improved",
];

const NEGATIVE_WORDS: &[&str] = &[
    "terrible",
    "awful",
    "horrible",
    "disgusting",
    "hate",
    "worst",
    "pathetic",
    "useless",
    "disappointing",
    "frustrating",
    "ridiculous",
    "failure",
    "disaster",
    "nightmare",
    "broken",
    "crisis",
];

/// First-person opinion markers, counted toward subjectivity.
const OPINION_WORDS: &[&str] = &["think", "believe", "feel", "opinion", "personally", "seems"];

/// Scores sentiment for one item over its title and content.
pub fn score(item: &NormalizedItem) -> SentimentScore {
    let text = format!("{} {}", item.title, item.content);
    let tokens: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect();
    let token_set: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();

    let positive = POSITIVE_WORDS
        .iter()
        .filter(|w| token_set.contains(*w))
        .count();
    let negative = NEGATIVE_WORDS
        .iter()
        .filter(|w| token_set.contains(*w))
        .count();
    let opinion = OPINION_WORDS
        .iter()
        .filter(|w| token_set.contains(*w))
        .count();

    let polarity = if positive + negative == 0 {
        0.0
    } else {
        (positive as f64 - negative as f64) / (positive + negative) as f64
    };

    // Sentiment-bearing and opinion vocabulary as a share of the text,
    // scaled so a handful of markers in a short text reads as clearly
    // subjective.
    let subjectivity = if tokens.is_empty() {
        0.0
    } else {
        (((positive + negative + opinion) as f64 / tokens.len() as f64) * 5.0).min(1.0)
    };

    let confidence = (polarity.abs() + (1.0 - subjectivity) * 0.3).min(1.0);

    SentimentScore {
        polarity,
        subjectivity,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Engagement, SourceType};

    fn make_item(title: &str, content: &str) -> NormalizedItem {
        NormalizedItem {
            id: "item".into(),
            title: title.into(),
            url: "https://example.com/a".into(),
            content: content.into(),
            source_id: "example".into(),
            source_type: SourceType::News,
            author: None,
            published_at: None,
            engagement: Engagement::new(),
            source_reputation: 0.5,
        }
    }

    #[test]
    fn empty_text_is_neutral() {
        let s = score(&make_item("", ""));
        assert!(s.polarity.abs() < f64::EPSILON);
        assert!(s.subjectivity.abs() < f64::EPSILON);
    }

    #[test]
    fn factual_text_is_neutral() {
        let s = score(&make_item(
            "Committee schedules vote",
            "The committee meets Tuesday to consider the measure",
        ));
        assert!(s.polarity.abs() < f64::EPSILON);
    }

    #[test]
    fn positive_text_scores_positive() {
        let s = score(&make_item(
            "An excellent release",
            "A great, remarkable improvement — users love it",
        ));
        assert!(s.polarity > 0.0, "got {}", s.polarity);
    }

    #[test]
    fn negative_text_scores_negative() {
        let s = score(&make_item(
            "A terrible outage",
            "The worst failure yet; a complete disaster",
        ));
        assert!(s.polarity < 0.0, "got {}", s.polarity);
    }

    #[test]
    fn mixed_text_lands_between_extremes() {
        let s = score(&make_item(
            "Great launch, terrible follow-up",
            "An excellent start undone by a disappointing patch",
        ));
        assert!(s.polarity > -1.0 && s.polarity < 1.0, "got {}", s.polarity);
    }

    #[test]
    fn opinionated_text_is_more_subjective_than_factual() {
        let factual = score(&make_item(
            "Quarterly figures published",
            "Revenue for the quarter was forty million dollars",
        ));
        let opinionated = score(&make_item(
            "I think this is great",
            "Personally I believe this feels like an amazing win",
        ));
        assert!(opinionated.subjectivity > factual.subjectivity);
    }

    #[test]
    fn all_outputs_stay_in_range() {
        let s = score(&make_item(
            "excellent terrible amazing awful",
            "love hate great worst think believe",
        ));
        assert!((-1.0..=1.0).contains(&s.polarity));
        assert!((0.0..=1.0).contains(&s.subjectivity));
        assert!((0.0..=1.0).contains(&s.confidence));
    }

    #[test]
    fn confidence_reported_even_when_neutral() {
        let s = score(&make_item("Committee schedules vote", ""));
        assert!(s.confidence > 0.0);
    }
}
