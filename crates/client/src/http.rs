//! HTTP access to the Ops Desk backend.
//!
//! All endpoints speak JSON with `snake_case` keys. List endpoints return a
//! bare JSON array; create and update return the stored record; delete
//! returns an empty body (or `204 No Content`).

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ServiceError;

/// Backend API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ServiceError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| ServiceError::Parse(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.as_str().trim_end_matches('/').to_owned(),
            }),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Execute a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let response = self.inner.client.get(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a POST request.
    pub(crate) async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let response = self
            .inner
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Execute a PUT request.
    pub(crate) async fn put<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let response = self
            .inner
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Execute a DELETE request.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), ServiceError> {
        let response = self.inner.client.delete(self.url(path)).send().await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(Self::parse_error(response).await)
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ServiceError> {
        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| ServiceError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Map a non-success response to an error.
    async fn parse_error(response: reqwest::Response) -> ServiceError {
        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(60);
            return ServiceError::RateLimited(retry_after);
        }

        if status == 401 || status == 403 {
            return ServiceError::Unauthorized;
        }

        let path = response.url().path().to_owned();
        if status == 404 {
            return ServiceError::NotFound(path);
        }

        let body = response.text().await.unwrap_or_default();
        ServiceError::Api {
            status,
            message: error_message(&body),
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Human-readable message from an error response body.
///
/// Prefers a JSON `error` or `message` field, then the raw text.
fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body)
        && let Some(message) = parsed.error.or(parsed.message)
    {
        return message;
    }
    let body = body.trim();
    if body.is_empty() {
        "Unknown error".to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_json() {
        assert_eq!(error_message(r#"{"error":"sku taken"}"#), "sku taken");
        assert_eq!(error_message(r#"{"message":"bad input"}"#), "bad input");
        assert_eq!(
            error_message(r#"{"error":"first","message":"second"}"#),
            "first"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(error_message("  gateway exploded \n"), "gateway exploded");
        assert_eq!(error_message(r#"{"detail":"x"}"#), r#"{"detail":"x"}"#);
        assert_eq!(error_message(""), "Unknown error");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = ClientConfig::new(url::Url::parse("http://localhost:9000/api/").unwrap());
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000/api");
        assert_eq!(client.url("/inventory/items"), "http://localhost:9000/api/inventory/items");
    }
}
