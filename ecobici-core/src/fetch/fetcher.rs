//! Feed fetcher: one GET per real-time feed, primary-then-fallback for archives.

use super::error::{FetchError, FetchTarget};
use super::http::ReqwestTransport;
use super::transport::{Transport, TransportError};
use crate::config::FetcherConfig;
use crate::period::YearMonth;
use tracing::{debug, info};

/// Path of a real-time GBFS feed on the GBFS host.
pub fn realtime_feed_path(feed_name: &str) -> String {
    format!("/gbfs/en/{feed_name}.json")
}

/// Primary archive path.
///
/// The upstream archive names the file after the *previous* month
/// (`2023/03/2023-02.csv`), and January therefore maps to `-00`.
pub fn primary_archive_path(period: YearMonth) -> String {
    let (year, month) = (period.year(), period.month());
    format!(
        "/wp-content/uploads/{year}/{month:02}/{year}-{:02}.csv",
        month - 1
    )
}

/// Fallback archive path, tried only when the primary answers 404.
pub fn fallback_archive_path(period: YearMonth) -> String {
    let (year, month) = (period.year(), period.month());
    format!("/wp-content/uploads/{year}/{month:02}/{year}-{month:02}.csv")
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

/// Fetches raw GBFS JSON and historical CSV bodies.
///
/// Holds no mutable state; one instance can serve any number of binds.
pub struct FeedFetcher<T: Transport = ReqwestTransport> {
    config: FetcherConfig,
    transport: T,
}

impl FeedFetcher<ReqwestTransport> {
    /// Fetcher over the blocking reqwest transport.
    pub fn from_config(config: FetcherConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> FeedFetcher<T> {
    pub fn new(config: FetcherConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `/gbfs/en/{feed_name}.json` and return the body unmodified.
    pub fn fetch_realtime_feed(&self, feed_name: &str) -> Result<Vec<u8>, FetchError> {
        let target = FetchTarget::Feed(feed_name.to_string());
        let url = join_url(&self.config.gbfs_base_url, &realtime_feed_path(feed_name));
        let timeout = self.config.realtime_timeout();

        debug!(%url, ?timeout, "fetching GBFS feed");
        let resp = self
            .transport
            .get(&url, timeout)
            .map_err(|source| FetchError::Connection {
                target: target.clone(),
                source,
            })?;
        debug!(%url, status = resp.status, bytes = resp.body.len(), "GBFS response");

        if resp.status != 200 {
            return Err(FetchError::HttpStatus {
                target,
                status: resp.status,
            });
        }

        Ok(resp.body)
    }

    /// Fetch one month of trip history.
    ///
    /// A 404 on the primary path triggers exactly one fallback request. Any
    /// other status, or a transport failure, on the primary path fails at once.
    pub fn fetch_historical_archive(&self, period: YearMonth) -> Result<Vec<u8>, FetchError> {
        let target = FetchTarget::Archive(period);
        let timeout = self.config.archive_timeout();
        let primary = join_url(&self.config.archive_base_url, &primary_archive_path(period));

        debug!(url = %primary, ?timeout, "fetching historical archive");
        let resp = self
            .transport
            .get(&primary, timeout)
            .map_err(|source| FetchError::Connection {
                target: target.clone(),
                source,
            })?;
        debug!(url = %primary, status = resp.status, bytes = resp.body.len(), "archive response");

        match resp.status {
            200 => Ok(resp.body),
            404 => {
                let fallback =
                    join_url(&self.config.archive_base_url, &fallback_archive_path(period));
                info!(%period, url = %fallback, "primary archive path not found, trying fallback");

                match self.transport.get(&fallback, timeout) {
                    Ok(resp) if resp.status == 200 => Ok(resp.body),
                    Ok(resp) => {
                        debug!(url = %fallback, status = resp.status, "fallback archive failed");
                        Err(FetchError::NotFoundAfterFallback { period })
                    }
                    Err(e) => {
                        debug!(url = %fallback, error = %e, "fallback archive failed");
                        Err(FetchError::NotFoundAfterFallback { period })
                    }
                }
            }
            status => Err(FetchError::HttpStatus { target, status }),
        }
    }
}
