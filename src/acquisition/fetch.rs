//! Archive download
//!
//! [`ArchiveFetcher`] is the seam between acquisition and the network.
//! [`HttpFetcher`] performs a blocking GET and reads the whole body into memory.

use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::Result;

/// Why an archive could not be downloaded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request did not complete (DNS, connection, timeout, truncated body)
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Source of archive bytes
pub trait ArchiveFetcher: Send + Sync {
    /// Download `url` completely
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

impl<T: ArchiveFetcher + ?Sized> ArchiveFetcher for Arc<T> {
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        (**self).fetch(url)
    }
}

impl<T: ArchiveFetcher + ?Sized> ArchiveFetcher for Box<T> {
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl ArchiveFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(transport)?;
        log::debug!("Downloaded {} bytes from {url}", body.len());
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_messages() {
        let status = FetchError::Status {
            url: "http://example.invalid/Deces_2020.zip".to_string(),
            status: 404,
        };
        assert_eq!(
            status.to_string(),
            "http://example.invalid/Deces_2020.zip returned HTTP 404"
        );
    }

    #[test]
    fn test_unreachable_host_is_a_transport_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
        // Port 9 on localhost is not expected to accept HTTP connections
        let result = fetcher.fetch("http://127.0.0.1:9/Deces_2020.zip");
        assert!(matches!(result, Err(FetchError::Transport { .. })));
    }
}
