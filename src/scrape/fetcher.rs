//! HTTP fetcher for result pages
//!
//! This module performs the network call for one page, including:
//! - Building the HTTP client with timeouts
//! - Attaching the session/locale cookie
//! - Retry logic for transient failures
//! - Outcome classification
//!
//! # Retry Logic
//!
//! | Condition | Action |
//! |-----------|--------|
//! | HTTP 404 | Immediate → NotFound, never retried |
//! | Other HTTP 4xx | Immediate → TransportError |
//! | HTTP 5xx | Retry up to the configured bound |
//! | Timeout | Retry up to the configured bound |
//! | Connection error | Retry up to the configured bound |
//!
//! The fetcher never returns a raw error: every outcome is classified and
//! page-level failures stay page-level.

use crate::scrape::request::PageRequest;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;

/// Result of fetching one page, before any parsing
#[derive(Debug)]
pub enum FetchOutcome {
    /// The page body was retrieved
    Success {
        /// HTTP status code
        status_code: u16,
        /// Raw page body
        body: String,
    },

    /// The upstream definitively reported the resource gone (HTTP 404)
    NotFound,

    /// Transport failed after exhausting retries
    TransportError {
        /// Error description
        error: String,
    },
}

/// Retry policy for transient transport errors
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per page, including the first
    pub attempts: u32,

    /// Delay between attempts
    pub delay: Duration,
}

/// Builds the HTTP client used for all page fetches in a run
///
/// # Arguments
///
/// * `timeout` - Per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("passwatch/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one page with retry and outcome classification
///
/// Transient failures (timeout, connection errors, 5xx) are retried up to
/// `retry.attempts` with `retry.delay` between attempts. A 404 means the
/// upstream removed the resource outright (entire feeds disappear this
/// way) and is classified immediately without retrying.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `request` - The page request to perform
/// * `retry` - Retry policy for transient errors
pub async fn fetch_page(client: &Client, request: &PageRequest, retry: &RetryPolicy) -> FetchOutcome {
    let mut last_error = String::new();

    for attempt in 1..=retry.attempts {
        if attempt > 1 {
            tracing::debug!(
                "Retrying page {} (attempt {}/{})",
                request.page,
                attempt,
                retry.attempts
            );
            tokio::time::sleep(retry.delay).await;
        }

        let mut builder = client.get(request.url.clone());
        if let Some(cookie) = &request.cookie {
            builder = builder.header(header::COOKIE, cookie.clone());
        }

        match builder.send().await {
            Ok(response) => {
                let status = response.status();

                if status == StatusCode::NOT_FOUND {
                    return FetchOutcome::NotFound;
                }

                if status.is_server_error() {
                    last_error = format!("HTTP {}", status.as_u16());
                    continue;
                }

                if !status.is_success() {
                    // Definitive client-side rejection; retrying cannot help
                    return FetchOutcome::TransportError {
                        error: format!("HTTP {}", status.as_u16()),
                    };
                }

                match response.text().await {
                    Ok(body) => {
                        return FetchOutcome::Success {
                            status_code: status.as_u16(),
                            body,
                        }
                    }
                    Err(e) => {
                        last_error = format!("Failed to read body: {}", e);
                        continue;
                    }
                }
            }
            Err(e) => {
                if e.is_timeout() {
                    last_error = "Request timeout".to_string();
                } else if e.is_connect() {
                    last_error = format!("Connection error: {}", e);
                } else {
                    last_error = e.to_string();
                }
                continue;
            }
        }
    }

    FetchOutcome::TransportError { error: last_error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;
    use wiremock::matchers::{header, method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn policy() -> RetryPolicy {
        RetryPolicy {
            attempts: 3,
            delay: Duration::from_millis(10),
        }
    }

    fn request_for(server_uri: &str, cookie: Option<&str>) -> PageRequest {
        let mut url = Url::parse(server_uri).unwrap();
        url.set_path("/PassSummary.aspx");
        url.query_pairs_mut()
            .append_pair("satid", "25544")
            .append_pair("page", "1");
        PageRequest {
            url,
            page: 1,
            cookie: cookie.map(str::to_string),
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(Duration::from_secs(30));
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("satid", "25544"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let client = build_http_client(Duration::from_secs(5)).unwrap();
        let outcome = fetch_page(&client, &request_for(&server.uri(), None), &policy()).await;

        match outcome {
            FetchOutcome::Success { status_code, body } => {
                assert_eq!(status_code, 200);
                assert!(body.contains("ok"));
            }
            other => panic!("Expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_session_cookie_attached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("cookie", "underConstruction=czo9"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>locale</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = build_http_client(Duration::from_secs(5)).unwrap();
        let outcome = fetch_page(
            &client,
            &request_for(&server.uri(), Some("underConstruction=czo9")),
            &policy(),
        )
        .await;

        assert!(matches!(outcome, FetchOutcome::Success { .. }));
    }

    #[tokio::test]
    async fn test_404_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1) // A second request would mean we retried
            .mount(&server)
            .await;

        let client = build_http_client(Duration::from_secs(5)).unwrap();
        let outcome = fetch_page(&client, &request_for(&server.uri(), None), &policy()).await;

        assert!(matches!(outcome, FetchOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_5xx_is_retried_until_exhausted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let client = build_http_client(Duration::from_secs(5)).unwrap();
        let outcome = fetch_page(&client, &request_for(&server.uri(), None), &policy()).await;

        match outcome {
            FetchOutcome::TransportError { error } => assert!(error.contains("503")),
            other => panic!("Expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_5xx_then_success_recovers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>recovered</html>"))
            .mount(&server)
            .await;

        let client = build_http_client(Duration::from_secs(5)).unwrap();
        let outcome = fetch_page(&client, &request_for(&server.uri(), None), &policy()).await;

        assert!(matches!(outcome, FetchOutcome::Success { .. }));
    }

    #[tokio::test]
    async fn test_other_4xx_is_definitive() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let client = build_http_client(Duration::from_secs(5)).unwrap();
        let outcome = fetch_page(&client, &request_for(&server.uri(), None), &policy()).await;

        match outcome {
            FetchOutcome::TransportError { error } => assert!(error.contains("403")),
            other => panic!("Expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_error_reported_after_retries() {
        // Nothing is listening on this port
        let client = build_http_client(Duration::from_secs(1)).unwrap();
        let request = request_for("http://127.0.0.1:1", None);
        let outcome = fetch_page(&client, &request, &policy()).await;

        assert!(matches!(outcome, FetchOutcome::TransportError { .. }));
    }
}
