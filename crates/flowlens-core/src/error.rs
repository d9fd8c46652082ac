//! Flowlens error types.

use thiserror::Error;

/// All errors surfaced by Flowlens crates.
///
/// A malformed cron expression is deliberately NOT an error: the schedule
/// projector returns `None` for it, and the workflow simply gets no
/// projected next run. A summary without a matching definition file is
/// dropped by the aggregator, also without an error.
#[derive(Debug, Error)]
pub enum FlowlensError {
    /// Remote fetch failed: network, auth, rate limit, or a payload the
    /// client could not decode.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Config file unreadable or unparsable.
    #[error("Config error: {0}")]
    Config(String),

    /// Snapshot store I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, FlowlensError>;
