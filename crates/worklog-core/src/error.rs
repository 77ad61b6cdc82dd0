use chrono::NaiveDate;
use llm_gateway::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorklogError {
    #[error("no entries to add: every entry was empty")]
    EmptyBatch,

    #[error("too many entries: got {got}, at most {max} per submission")]
    TooManyEntries { got: usize, max: usize },

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error(
        "unknown report style '{0}': expected executive, detailed, chronological or accomplishments"
    )]
    InvalidStyle(String),

    #[error("invalid API key format: {0}")]
    InvalidFormat(String),

    #[error("no worklog entries found between {start} and {end}")]
    NoEntriesInRange { start: NaiveDate, end: NaiveDate },

    #[error("no API key configured: run 'worklog key set <key>'")]
    MissingCredential,

    #[error("nothing to undo: no prior version is available")]
    NoPriorVersion,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("credential store: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Coarse classification surfaces use to decide how to present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    MissingCredential,
    Gateway,
    Storage,
    NoPriorVersion,
}

impl WorklogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorklogError::EmptyBatch
            | WorklogError::TooManyEntries { .. }
            | WorklogError::InvalidRange { .. }
            | WorklogError::InvalidDate(_)
            | WorklogError::InvalidStyle(_)
            | WorklogError::InvalidFormat(_)
            | WorklogError::NoEntriesInRange { .. } => ErrorKind::Validation,
            WorklogError::MissingCredential => ErrorKind::MissingCredential,
            WorklogError::NoPriorVersion => ErrorKind::NoPriorVersion,
            WorklogError::Gateway(_) => ErrorKind::Gateway,
            WorklogError::Io(_) | WorklogError::Yaml(_) | WorklogError::Keyring(_) => {
                ErrorKind::Storage
            }
        }
    }

    /// True only for gateway failures worth retrying (rate limit, network).
    pub fn is_retryable(&self) -> bool {
        matches!(self, WorklogError::Gateway(e) if e.is_retryable())
    }
}

pub type Result<T> = std::result::Result<T, WorklogError>;
