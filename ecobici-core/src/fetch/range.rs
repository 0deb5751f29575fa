//! Historical range walker.
//!
//! Walks a closed month range one month at a time and keeps whatever fetched.
//! A failed month is logged and skipped, never fatal to the range.

use super::error::FetchError;
use super::fetcher::FeedFetcher;
use super::transport::Transport;
use crate::period::{MonthRange, YearMonth};
use tracing::{debug, warn};

/// Outcome of fetching one month of a range.
#[derive(Debug, Clone)]
pub struct MonthFetch {
    pub period: YearMonth,
    pub result: Result<Vec<u8>, FetchError>,
}

/// Per-month outcomes of a range fetch, in chronological order.
#[derive(Debug, Clone, Default)]
pub struct RangeReport {
    pub months: Vec<MonthFetch>,
}

impl RangeReport {
    pub fn attempted(&self) -> usize {
        self.months.len()
    }

    /// Months whose archive was fetched.
    pub fn fetched(&self) -> Vec<YearMonth> {
        self.months
            .iter()
            .filter(|m| m.result.is_ok())
            .map(|m| m.period)
            .collect()
    }

    /// Months that failed, with the reason.
    pub fn missing(&self) -> Vec<(YearMonth, &FetchError)> {
        self.months
            .iter()
            .filter_map(|m| m.result.as_ref().err().map(|e| (m.period, e)))
            .collect()
    }

    /// Successful payloads in order; failed months leave no placeholder.
    pub fn into_payloads(self) -> Vec<Vec<u8>> {
        self.months.into_iter().filter_map(|m| m.result.ok()).collect()
    }
}

impl<T: Transport> FeedFetcher<T> {
    /// Fetch every month of `range`, reporting each outcome.
    pub fn fetch_range_report(&self, range: MonthRange) -> RangeReport {
        debug!(start = %range.start, end = %range.end, months = range.len(), "fetching archive range");

        let months = range
            .iter()
            .map(|period| {
                let result = self.fetch_historical_archive(period);
                if let Err(e) = &result {
                    warn!(%period, error = %e, "skipping month");
                }
                MonthFetch { period, result }
            })
            .collect();

        RangeReport { months }
    }

    /// Fetch every month of `range`, returning only the payloads that arrived.
    ///
    /// An empty result does not distinguish "no months in range" from
    /// "every month failed"; use [`FeedFetcher::fetch_range_report`] for that.
    pub fn fetch_range(&self, range: MonthRange) -> Vec<Vec<u8>> {
        self.fetch_range_report(range).into_payloads()
    }
}
