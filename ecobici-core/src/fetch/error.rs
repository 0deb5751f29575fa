use super::transport::TransportError;
use crate::period::YearMonth;
use std::fmt;
use thiserror::Error;

/// What a failed request was trying to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTarget {
    Feed(String),
    Archive(YearMonth),
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchTarget::Feed(name) => write!(f, "GBFS feed {name}"),
            FetchTarget::Archive(period) => write!(f, "historical CSV for {period}"),
        }
    }
}

/// Classified failure of a single feed or archive fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("failed to fetch {target}: connection error ({source})")]
    Connection {
        target: FetchTarget,
        source: TransportError,
    },

    #[error("failed to fetch {target}: HTTP {status}")]
    HttpStatus { target: FetchTarget, status: u16 },

    #[error("failed to fetch historical CSV for {period}: file not found (tried both URL patterns)")]
    NotFoundAfterFallback { period: YearMonth },
}

impl FetchError {
    pub fn target(&self) -> FetchTarget {
        match self {
            FetchError::Connection { target, .. } | FetchError::HttpStatus { target, .. } => {
                target.clone()
            }
            FetchError::NotFoundAfterFallback { period } => FetchTarget::Archive(*period),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_feed_and_status() {
        let err = FetchError::HttpStatus {
            target: FetchTarget::Feed("station_status".into()),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch GBFS feed station_status: HTTP 503"
        );
    }

    #[test]
    fn fallback_message_names_period() {
        let err = FetchError::NotFoundAfterFallback {
            period: YearMonth::new(2023, 3).unwrap(),
        };
        assert!(err.to_string().contains("2023-03"));
        assert!(err.to_string().contains("both URL patterns"));
    }
}
