//! Error types for the chills engine and its plumbing.

use thiserror::Error;

/// Errors that can occur outside the pure matching computation.
///
/// Matching itself never fails: malformed rows are skipped and empty
/// profiles produce empty results. These variants cover loading data,
/// reading configuration and validating a squad before it is handed off.
#[derive(Error, Debug)]
pub enum ChillsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Roster error: {0}")]
    Roster(String),

    #[error("Cannot form squad: {0}")]
    InvalidSquad(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for chills operations.
pub type ChillsResult<T> = Result<T, ChillsError>;
