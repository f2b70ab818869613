//! HTTP retrieval of listing and detail pages.
//!
//! The [`Fetch`] trait is the seam between the pipeline and the network:
//! [`HttpFetcher`] is the real client, tests substitute their own.
//!
//! There is no retry here. A failed request fails the caller's step and the
//! next monitoring cycle tries again.

use crate::error::FetchError;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Something that can turn a URL into page text.
pub trait Fetch {
    /// Fetch `url` and return the response body as text.
    ///
    /// Non-success statuses are errors; the body is never returned for them.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`Fetch`] implementation backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client with the crate's user agent and a per-request timeout.
    ///
    /// A timed-out request is reported as [`FetchError::Request`] like any
    /// other network failure.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(default_user_agent())
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url).send().await.map_err(request_error)?;
        let status = resp.status();
        if !status.is_success() {
            warn!(%status, "Non-success status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = resp.text().await.map_err(request_error)?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

fn default_user_agent() -> String {
    format!(
        "{}/{} (rust; {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/category/tour-dates"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>listing</html>"))
            .mount(&server)
            .await;

        let url = format!("{}/category/tour-dates", server.uri());
        let body = fetcher().fetch(&url).await.unwrap();
        assert_eq!(body, "<html>listing</html>");
    }

    #[tokio::test]
    async fn test_fetch_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let url = format!("{}/category/tour-dates", server.uri());
        let err = fetcher().fetch(&url).await.unwrap_err();
        match err {
            FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 503),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_fails_on_unreachable_host() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let err = fetcher().fetch("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let slow = HttpFetcher::new(Duration::from_millis(200)).unwrap();
        let err = slow.fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
    }
}
