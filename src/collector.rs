//! Trait definition for pluggable source collectors.
//!
//! Collectors are external collaborators: the network fetch, payload
//! parsing, and per-source rate limiting all live behind this trait. The
//! pipeline only depends on the contract — a sequence of [`RawItem`]s or
//! an explicit failure signal, never an empty-but-successful result in
//! place of a failure.

use async_trait::async_trait;

use crate::error::CollectError;
use crate::types::{RawItem, SourceType};

/// A pluggable source collector.
///
/// Implementors fetch and parse one source (a news site, a search
/// engine, a forum) and produce raw items satisfying the mandatory-field
/// contract: `source_id`, `url`, `title`, `body_or_snippet`, and
/// `collected_at` always present, with documented defaults (empty
/// string, `None`) for anything the source cannot supply.
///
/// The trait is dyn-compatible so the orchestrator can fan out over a
/// heterogeneous set of collectors. All implementations must be
/// `Send + Sync`.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Stable identifier of this source (e.g. `"bbc"`), used for
    /// reputation lookup and statistics attribution.
    fn source_id(&self) -> &str;

    /// What kind of source this collector scrapes.
    fn source_type(&self) -> SourceType;

    /// Collect items for `query`, returning at most `max_items`.
    ///
    /// The orchestrator additionally enforces its own per-source
    /// timeout and truncates oversized result sets, so `max_items` is a
    /// politeness hint more than a hard contract.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError`] when the fetch or parse fails. An empty
    /// `Vec` means the source genuinely had nothing for this query.
    async fn collect(&self, query: &str, max_items: usize) -> Result<Vec<RawItem>, CollectError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;

    /// A mock collector for testing trait bounds and async dispatch.
    struct MockCollector {
        source_id: String,
        items: Vec<RawItem>,
    }

    impl MockCollector {
        fn new(source_id: &str, items: Vec<RawItem>) -> Self {
            Self {
                source_id: source_id.into(),
                items,
            }
        }

        fn failing(source_id: &str) -> Self {
            Self {
                source_id: source_id.into(),
                items: vec![],
            }
        }
    }

    #[async_trait]
    impl Collector for MockCollector {
        fn source_id(&self) -> &str {
            &self.source_id
        }

        fn source_type(&self) -> SourceType {
            SourceType::News
        }

        async fn collect(
            &self,
            _query: &str,
            max_items: usize,
        ) -> Result<Vec<RawItem>, CollectError> {
            if self.items.is_empty() {
                return Err(CollectError::Http("mock collector failure".into()));
            }
            Ok(self.items.iter().take(max_items).cloned().collect())
        }
    }

    fn make_raw(source_id: &str, url: &str) -> RawItem {
        RawItem {
            source_id: source_id.into(),
            url: url.into(),
            title: "Title".into(),
            body_or_snippet: "Body".into(),
            collected_at: Utc::now(),
            author: None,
            published_at: None,
            engagement: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn mock_collector_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockCollector>();
    }

    #[tokio::test]
    async fn mock_collector_returns_items() {
        let collector = MockCollector::new("bbc", vec![make_raw("bbc", "https://bbc.com/news/1")]);
        let items = collector.collect("query", 10).await.expect("should succeed");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source_id, "bbc");
    }

    #[tokio::test]
    async fn mock_collector_respects_max_items() {
        let items = (0..5)
            .map(|i| make_raw("bbc", &format!("https://bbc.com/news/{i}")))
            .collect();
        let collector = MockCollector::new("bbc", items);
        let returned = collector.collect("query", 2).await.expect("should succeed");
        assert_eq!(returned.len(), 2);
    }

    #[tokio::test]
    async fn mock_collector_propagates_failure() {
        let collector = MockCollector::failing("bbc");
        let result = collector.collect("query", 10).await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("mock collector failure"));
    }

    #[tokio::test]
    async fn collectors_work_behind_dyn_dispatch() {
        let collectors: Vec<Box<dyn Collector>> = vec![
            Box::new(MockCollector::new(
                "bbc",
                vec![make_raw("bbc", "https://bbc.com/news/1")],
            )),
            Box::new(MockCollector::failing("reddit")),
        ];
        let first = collectors[0].collect("query", 10).await;
        let second = collectors[1].collect("query", 10).await;
        assert!(first.is_ok());
        assert!(second.is_err());
    }
}
