//! HTTP client for the backend's authentication endpoint.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::models::{LoginResponse, User};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Backend used when neither the config nor the environment names one
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Path of the login endpoint, relative to the API base URL
const LOGIN_PATH: &str = "/auth/login";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Exchanges credentials for a user record and token.
///
/// Implementations must be cheap to clone: the login view hands a clone to
/// every background request.
pub trait Authenticator: Clone + Send + Sync + 'static {
    type User: DeserializeOwned + Send + 'static;

    fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<LoginResponse<Self::User>>> + Send;
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// API client for the monitoring backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> Result<T> {
        let response = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }
}

impl Authenticator for ApiClient {
    type User = User;

    /// Credentials are sent exactly as typed.
    async fn authenticate(&self, email: &str, password: &str) -> Result<LoginResponse<User>> {
        let url = self.url(LOGIN_PATH);
        debug!(url = %url, "Sending login request");
        self.post(&url, &LoginRequest { email, password }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url(LOGIN_PATH), "http://localhost:8000/auth/login");
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login")
            .match_body(Matcher::Json(json!({"email": "a@b.com", "password": "pw"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"user":{"id":1,"name":"A"},"token":"abc123"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let resp = client.authenticate("a@b.com", "pw").await.unwrap();

        mock.assert_async().await;
        assert_eq!(resp.user.id, UserId::Numeric(1));
        assert_eq!(resp.user.name, "A");
        assert_eq!(resp.token, "abc123");
    }

    #[tokio::test]
    async fn test_authenticate_sends_empty_fields_as_is() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login")
            .match_body(Matcher::Json(json!({"email": "", "password": ""})))
            .with_status(401)
            .with_body(r#"{"detail":"Credenciais inválidas"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client.authenticate("", "").await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_server_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/login")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client.authenticate("a@b.com", "pw").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::ServerError(body)) if body == "boom"
        ));
    }

    #[tokio::test]
    async fn test_authenticate_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"abc123"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client.authenticate("a@b.com", "pw").await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON response"));
    }
}
