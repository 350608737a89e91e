//! OAuth2 client-credentials token exchange.
//!
//! The messaging API authenticates deliveries with a short-lived
//! bearer token. A fresh token is fetched for every notification
//! batch and discarded afterwards; nothing is cached between
//! invocations, and the client secret never appears in logs or error
//! output.

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// A bearer token for the messaging API.
///
/// `Debug` output is redacted so the token cannot leak through logged
/// or formatted values.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("token endpoint returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("token response missing or malformed `access_token`")]
    Malformed,
}

/// Exchanges API credentials for a bearer token.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Fetches a fresh token.
    ///
    /// No caching and no internal retry; a failed exchange surfaces to
    /// the caller unchanged.
    async fn fetch_token(&self, api_id: &str, api_secret: &str) -> Result<AccessToken, TokenError>;
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// `TokenProvider` backed by the platform's OAuth2 token endpoint.
pub struct OauthTokenProvider {
    client: reqwest::Client,
    token_url: String,
    scope: String,
}

impl OauthTokenProvider {
    /// Creates a provider against the given token endpoint.
    pub fn new(token_url: String, scope: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            token_url,
            scope,
        })
    }
}

#[async_trait]
impl TokenProvider for OauthTokenProvider {
    async fn fetch_token(&self, api_id: &str, api_secret: &str) -> Result<AccessToken, TokenError> {
        debug!(client_id = %api_id, "requesting access token");

        let params = [
            ("client_id", api_id),
            ("client_secret", api_secret),
            ("scope", self.scope.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TokenError::Status(response.status()));
        }

        let body: TokenResponse = response.json().await.map_err(|_| TokenError::Malformed)?;
        Ok(AccessToken(body.access_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server_uri: &str) -> OauthTokenProvider {
        OauthTokenProvider::new(
            format!("{server_uri}/oauth2/token"),
            "https://api.example.test/.default".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn exchanges_credentials_for_a_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=app-id"))
            .and(body_string_contains("client_secret=app-secret"))
            .and(body_string_contains("scope="))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token_type": "Bearer",
                "expires_in": 3600,
                "access_token": "tok-123",
            })))
            .mount(&server)
            .await;

        let token = provider(&server.uri())
            .fetch_token("app-id", "app-secret")
            .await
            .unwrap();
        assert_eq!(token.as_str(), "tok-123");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = provider(&server.uri())
            .fetch_token("app-id", "bad-secret")
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::Status(status) if status.as_u16() == 401));
    }

    #[tokio::test]
    async fn response_without_access_token_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "expires_in": 3600 })),
            )
            .mount(&server)
            .await;

        let err = provider(&server.uri())
            .fetch_token("app-id", "app-secret")
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::Malformed));
    }

    #[test]
    fn debug_output_redacts_the_token() {
        let token = AccessToken::new("tok-123");
        let debugged = format!("{token:?}");
        assert!(!debugged.contains("tok-123"));
    }
}
