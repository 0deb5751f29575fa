//! Network acquisition: transport seam, feed fetcher, historical range walker.

pub mod error;
pub mod fetcher;
pub mod http;
pub mod range;
pub mod scripted;
pub mod transport;

pub use error::{FetchError, FetchTarget};
pub use fetcher::{fallback_archive_path, primary_archive_path, realtime_feed_path, FeedFetcher};
pub use http::ReqwestTransport;
pub use range::{MonthFetch, RangeReport};
pub use scripted::{RecordedRequest, ScriptedTransport};
pub use transport::{HttpResponse, Transport, TransportError, TransportErrorKind};
