//! Feed kinds and fetch requests.

use crate::period::{MonthRange, YearMonth};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four data sources exposed as tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    StationStatus,
    StationInformation,
    SystemInformation,
    HistoricalTrips,
}

impl FeedKind {
    pub const ALL: [FeedKind; 4] = [
        FeedKind::StationStatus,
        FeedKind::StationInformation,
        FeedKind::SystemInformation,
        FeedKind::HistoricalTrips,
    ];

    /// Feed name as used in the GBFS URL and in logs.
    pub fn feed_name(&self) -> &'static str {
        match self {
            FeedKind::StationStatus => "station_status",
            FeedKind::StationInformation => "station_information",
            FeedKind::SystemInformation => "system_information",
            FeedKind::HistoricalTrips => "historical_trips",
        }
    }

    /// Name under which the table function is registered with a host.
    pub fn function_name(&self) -> &'static str {
        match self {
            FeedKind::StationStatus => "ecobici_station_status",
            FeedKind::StationInformation => "ecobici_station_information",
            FeedKind::SystemInformation => "ecobici_system_information",
            FeedKind::HistoricalTrips => "ecobici_historical_trips",
        }
    }

    pub fn is_realtime(&self) -> bool {
        !matches!(self, FeedKind::HistoricalTrips)
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.feed_name())
    }
}

impl FromStr for FeedKind {
    type Err = String;

    /// Accepts either the feed name or the table-function name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeedKind::ALL
            .into_iter()
            .find(|k| k.feed_name() == s || k.function_name() == s)
            .ok_or_else(|| format!("unknown feed '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchParams {
    /// Real-time GBFS feed by name.
    Feed(String),
    /// Closed range of archive months.
    Months(MonthRange),
}

/// One invocation's worth of fetching. Built at bind time, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    kind: FeedKind,
    params: FetchParams,
}

impl FetchRequest {
    /// Request for a real-time kind. Returns `None` for `HistoricalTrips`.
    pub fn realtime(kind: FeedKind) -> Option<Self> {
        kind.is_realtime().then(|| Self {
            kind,
            params: FetchParams::Feed(kind.feed_name().to_string()),
        })
    }

    pub fn historical(range: MonthRange) -> Self {
        Self {
            kind: FeedKind::HistoricalTrips,
            params: FetchParams::Months(range),
        }
    }

    pub fn historical_month(period: YearMonth) -> Self {
        Self::historical(MonthRange::single(period))
    }

    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    pub fn params(&self) -> &FetchParams {
        &self.params
    }
}
