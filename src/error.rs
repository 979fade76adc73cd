//! Error types for the panora-aggregate crate.
//!
//! The pipeline has exactly one fatal error class: an invalid
//! configuration, rejected at construction time. Everything that can go
//! wrong during a query (source timeouts, fetch failures, unavailable
//! analyzers, ambiguous duplicates) is isolated, recorded in run
//! statistics, and never surfaces as an error to the caller.

/// Fatal errors surfaced to callers of the aggregation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    /// Invalid pipeline configuration (negative weight, threshold outside
    /// [0,1], zero timeout). Rejected before any query runs.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Failures reported by a source collector.
///
/// Collectors must report fetch failure as a distinct signal rather than
/// an empty-but-successful result, so the orchestrator can attribute
/// failures correctly in statistics. None of these abort a query.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// An HTTP request to the source failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The source responded but its payload could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The collector gave up before its deadline (self-reported; the
    /// orchestrator also enforces its own per-source timeout).
    #[error("source timed out: {0}")]
    Timeout(String),
}

/// Convenience type alias for panora-aggregate results.
pub type Result<T> = std::result::Result<T, AggregateError>;
