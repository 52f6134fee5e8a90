//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable per-request timeout and User-Agent
//! - Bearer authentication and GitHub API headers on every request
//! - Cancellation: each request is raced against a `CancellationToken`
//! - Status code to `GatewayError` mapping
//!
//! Requests are not retried; a failed release is re-run by the operator.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::GatewayError;

/// Default timeout for a single HTTP request (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("git-release/", env!("CARGO_PKG_VERSION"));

/// Media type for the GitHub REST API
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// GitHub REST API version header
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

/// Remaining primary rate limit quota; `0` on a 403 means the limit was hit
const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Error body returned by the GitHub API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Authenticated HTTP client
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new(token: &str) -> Result<Self, GatewayError> {
        Self::with_config(token, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(
        token: &str,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, GatewayError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| GatewayError::AuthFailed("token contains invalid characters".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| GatewayError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Perform a GET request and parse the JSON response
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<T, GatewayError> {
        let response = self.send(self.client.get(url), cancel).await?;
        Self::decode(response, cancel).await
    }

    /// Perform a POST request with a JSON body and parse the JSON response
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<T, GatewayError> {
        let response = self.send(self.client.post(url).json(body), cancel).await?;
        Self::decode(response, cancel).await
    }

    /// Send a request, racing it against cancellation
    ///
    /// Non-success statuses are mapped to `GatewayError`.
    pub async fn send(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<Response, GatewayError> {
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(GatewayError::Cancelled),
            result = request.send() => result.map_err(map_transport_error)?,
        };

        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "http response");

        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::error_from_response(response, cancel).await)
        }
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        cancel: &CancellationToken,
    ) -> Result<T, GatewayError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GatewayError::Cancelled),
            parsed = response.json::<T>() => parsed.map_err(|e| {
                GatewayError::InvalidResponse(format!("failed to parse JSON: {}", e))
            }),
        }
    }

    async fn error_from_response(response: Response, cancel: &CancellationToken) -> GatewayError {
        let status = response.status();
        let quota_exhausted = response
            .headers()
            .get(RATE_LIMIT_REMAINING_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "0");
        let message = tokio::select! {
            biased;
            _ = cancel.cancelled() => return GatewayError::Cancelled,
            body = response.json::<ErrorBody>() => body
                .map(|b| b.message)
                .unwrap_or_else(|_| "Unknown error".to_string()),
        };
        map_status(status, message, quota_exhausted)
    }
}

/// Map an HTTP error status to the gateway taxonomy
///
/// GitHub answers an exhausted primary rate limit with 403 rather than 429.
pub(crate) fn map_status(
    status: StatusCode,
    message: String,
    quota_exhausted: bool,
) -> GatewayError {
    match status {
        StatusCode::UNAUTHORIZED => GatewayError::AuthFailed("Invalid or expired token".into()),
        StatusCode::FORBIDDEN if quota_exhausted => GatewayError::RateLimited,
        StatusCode::FORBIDDEN => {
            GatewayError::AuthFailed(format!("Permission denied: {}", message))
        }
        StatusCode::NOT_FOUND => GatewayError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited,
        _ => GatewayError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

fn map_transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Network(format!("request timed out: {}", e))
    } else {
        GatewayError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_creation() {
        assert!(HttpClient::new("ghp_test").is_ok());
    }

    #[test]
    fn test_http_client_with_config() {
        let client = HttpClient::with_config("ghp_test", Duration::from_secs(5), "test-agent/1.0");
        assert!(client.is_ok());
    }

    #[test]
    fn test_http_client_rejects_unprintable_token() {
        let err = HttpClient::new("bad\ntoken").unwrap_err();
        assert!(matches!(err, GatewayError::AuthFailed(_)));
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let client = HttpClient::new("ghp_secret").unwrap();
        assert!(!format!("{:?}", client).contains("ghp_secret"));
    }

    #[test]
    fn test_map_status() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, String::new(), false),
            GatewayError::AuthFailed(_)
        ));
        assert!(matches!(
            map_status(StatusCode::FORBIDDEN, "nope".into(), false),
            GatewayError::AuthFailed(msg) if msg.contains("nope")
        ));
        assert_eq!(
            map_status(StatusCode::NOT_FOUND, "Not Found".into(), false),
            GatewayError::NotFound("Not Found".into())
        );
        assert_eq!(
            map_status(StatusCode::TOO_MANY_REQUESTS, String::new(), false),
            GatewayError::RateLimited
        );
        assert_eq!(
            map_status(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Reference already exists".into(),
                false
            ),
            GatewayError::Api {
                status: 422,
                message: "Reference already exists".into()
            }
        );
    }

    #[test]
    fn test_forbidden_with_exhausted_quota_is_rate_limited() {
        let message = "API rate limit exceeded".to_string();
        assert_eq!(
            map_status(StatusCode::FORBIDDEN, message.clone(), true),
            GatewayError::RateLimited
        );
        assert!(matches!(
            map_status(StatusCode::FORBIDDEN, message, false),
            GatewayError::AuthFailed(_)
        ));
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
        assert!(DEFAULT_USER_AGENT.starts_with("git-release/"));
    }

    #[tokio::test]
    async fn test_cancelled_before_send() {
        let client = HttpClient::new("ghp_test").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        // unroutable address: the cancelled branch must win before any I/O
        let request = client.inner().get("http://127.0.0.1:9/never");
        let err = client.send(request, &cancel).await.unwrap_err();
        assert_eq!(err, GatewayError::Cancelled);
    }
}
