//! Production transport over a blocking reqwest client.

use super::transport::{HttpResponse, Transport, TransportError, TransportErrorKind};
use crate::config::FetcherConfig;
use std::time::Duration;

/// Blocking HTTPS transport. Redirects are followed up to the configured limit.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(config: &FetcherConfig) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(config.connect_timeout())
            // Per-request timeouts are set in `get`.
            .timeout(None)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TransportError::new(TransportErrorKind::Other, e.to_string()))?;

        Ok(Self { client })
    }
}

fn classify(e: &reqwest::Error) -> TransportErrorKind {
    if e.is_timeout() {
        TransportErrorKind::Timeout
    } else if e.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        let resp = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(|e| TransportError::new(classify(&e), e.to_string()))?;

        let status = resp.status().as_u16();
        // Body read failures (e.g. timeout mid-download) are transport failures too.
        let body = resp
            .bytes()
            .map_err(|e| TransportError::new(classify(&e), e.to_string()))?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_default_config() {
        assert!(ReqwestTransport::new(&FetcherConfig::default()).is_ok());
    }

    #[test]
    fn unreachable_host_is_transport_error() {
        let transport = ReqwestTransport::new(&FetcherConfig::default()).unwrap();
        // Port 9 on loopback (discard) is almost never listening.
        let err = transport
            .get("http://127.0.0.1:9/gbfs/en/station_status.json", Duration::from_secs(2))
            .unwrap_err();
        assert_ne!(err.message, "");
    }
}
