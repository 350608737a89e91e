//! A client for delivering activities to the messaging API.

use crate::token::AccessToken;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// A trait for clients that can deliver one activity to one receiver.
#[async_trait]
pub trait ActivityClient: Send + Sync {
    /// Delivers `content` as a message activity to the receiver's
    /// conversation.
    async fn send_activity(
        &self,
        receiver: &str,
        token: &AccessToken,
        content: &str,
    ) -> anyhow::Result<()>;
}

/// `ActivityClient` backed by the platform's conversations endpoint.
pub struct HttpActivityClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpActivityClient {
    /// Creates a new `HttpActivityClient`.
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl ActivityClient for HttpActivityClient {
    /// POSTs the rendered message to the receiver's conversation.
    #[instrument(skip(self, token, content))]
    async fn send_activity(
        &self,
        receiver: &str,
        token: &AccessToken,
        content: &str,
    ) -> anyhow::Result<()> {
        let url = format!("{}/conversations/{}/activities", self.base_url, receiver);
        let payload = json!({ "message": { "content": content } });

        let response = self
            .client
            .post(&url)
            .bearer_auth(token.as_str())
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(res) => {
                let status = res.status();
                if status.is_success() {
                    debug!(%status, "activity delivered");
                    Ok(())
                } else {
                    let text = res.text().await.unwrap_or_default();
                    error!(
                        status = %status,
                        body = %text,
                        "messaging API rejected activity"
                    );
                    anyhow::bail!(
                        "delivery to {} failed: status {}, body: {}",
                        receiver,
                        status,
                        text
                    );
                }
            }
            Err(e) => {
                error!(error = %e, "HTTP request to messaging API failed");
                Err(e.into())
            }
        }
    }
}
