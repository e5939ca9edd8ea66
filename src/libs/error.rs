//! Error model used by worklens operations.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorklensError>;

/// Error taxonomy for the retrieval pipeline and navigation state machine.
///
/// `UpstreamSearch` is fatal to the whole request. `UpstreamWorklogFetch`
/// is recovered locally by skipping the affected issue and is never
/// surfaced to the caller individually; if every issue fails the caller
/// still receives an empty successful result. `UnknownTab` signals a
/// programming-contract violation, not an expected runtime condition.
#[derive(Debug, Error)]
pub enum WorklensError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("worklog search failed: {0}")]
    UpstreamSearch(String),
    #[error("worklog fetch failed for {issue}: {message}")]
    UpstreamWorklogFetch { issue: String, message: String },
    #[error("unknown tab: {0}")]
    UnknownTab(String),
    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for WorklensError {
    /// Transport-level failures (connect, timeout, body decode) all map to
    /// `Network`; non-success HTTP statuses are classified by the caller,
    /// which knows whether a search or a worklog listing was in flight.
    fn from(err: reqwest::Error) -> Self {
        WorklensError::Network(err.to_string())
    }
}
