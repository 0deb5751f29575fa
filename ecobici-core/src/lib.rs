//! Ecobici Core: bike-share feed acquisition and row materialization.
//!
//! This crate contains everything between the Ecobici HTTP endpoints and a
//! query engine's table functions:
//! - Immutable fetcher configuration (hosts, timeouts)
//! - Feed fetcher for real-time GBFS JSON and monthly trip CSV archives,
//!   including the archive's primary/fallback URL patterns
//! - Historical range walker that skips months it cannot fetch
//! - GBFS parsing into typed rows with upstream default quirks preserved
//! - Forward-only batch cursor over materialized rows
//! - Bind/pull table-function registration and an in-process registry
//! - Polars DataFrame view of pulled batches

pub mod config;
pub mod feed;
pub mod fetch;
pub mod period;
pub mod table;

pub use config::{ConfigError, FetcherConfig};
pub use feed::{FeedKind, FetchParams, FetchRequest};
pub use fetch::{FeedFetcher, FetchError, RangeReport, ReqwestTransport, Transport};
pub use period::{MonthRange, PeriodError, YearMonth};
pub use table::{
    BatchCursor, BoundTable, FunctionRegistry, Row, RowProducer, TableError, Value,
    STANDARD_BATCH_SIZE,
};
