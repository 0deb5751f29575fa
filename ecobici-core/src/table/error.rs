use crate::feed::FeedKind;
use crate::fetch::FetchError;
use crate::period::PeriodError;
use thiserror::Error;

/// Failure while binding or registering a table function.
#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to parse {feed} payload: {source}")]
    Parse {
        feed: FeedKind,
        source: serde_json::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    InvalidPeriod(#[from] PeriodError),

    #[error("unknown table function '{0}'")]
    UnknownFunction(String),

    #[error("table function '{0}' is already registered")]
    DuplicateFunction(String),
}
