//! The delivery dispatcher.
//!
//! `Dispatcher::notify` is the entry point the host platform calls
//! once per error event: render the message, parse the receiver list,
//! fetch one bearer token, then attempt delivery to every receiver in
//! order. One receiver's failure never aborts the others; the caller
//! gets a per-receiver report instead.

use crate::client::{ActivityClient, HttpActivityClient};
use crate::config::{ProjectConfig, ServiceConfig};
use crate::core::NotificationEvent;
use crate::receivers::parse_receivers;
use crate::template::{self, TemplateError};
use crate::token::{OauthTokenProvider, TokenError, TokenProvider};
use thiserror::Error;
use tracing::{debug, error, instrument};

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(String),
}

/// One receiver's delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub receiver: String,
    pub outcome: DeliveryOutcome,
}

/// Per-receiver outcomes of a single `notify` invocation, in receiver
/// order.
///
/// An empty report means the project was not configured or had no
/// receivers; neither is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub deliveries: Vec<Delivery>,
}

impl DeliveryReport {
    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    /// Number of receivers the message reached.
    pub fn delivered_count(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|d| d.outcome == DeliveryOutcome::Delivered)
            .count()
    }

    /// Number of receivers whose delivery failed.
    pub fn failed_count(&self) -> usize {
        self.len() - self.delivered_count()
    }
}

/// Errors that abort a whole `notify` invocation before any send.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// The notification dispatcher.
pub struct Dispatcher<P: TokenProvider, C: ActivityClient> {
    tokens: P,
    client: C,
}

impl Dispatcher<OauthTokenProvider, HttpActivityClient> {
    /// Wires a dispatcher against the live messaging API described by
    /// `config`.
    pub fn from_config(config: &ServiceConfig) -> anyhow::Result<Self> {
        let timeout = config.request_timeout();
        Ok(Self::new(
            OauthTokenProvider::new(config.token_url.clone(), config.scope.clone(), timeout)?,
            HttpActivityClient::new(config.api_base_url.clone(), timeout)?,
        ))
    }
}

impl<P: TokenProvider, C: ActivityClient> Dispatcher<P, C> {
    /// Creates a dispatcher from explicit collaborators.
    pub fn new(tokens: P, client: C) -> Self {
        Self { tokens, client }
    }

    /// Delivers `event` to every receiver configured for the project.
    ///
    /// An unconfigured project (missing credentials or receivers) is a
    /// silent no-op returning an empty report. A template or token
    /// failure aborts the whole invocation before any send; a failure
    /// sending to one receiver is caught, logged and recorded while
    /// the remaining receivers are still attempted.
    #[instrument(skip(self, event, project), fields(project = %project.project_name))]
    pub async fn notify(
        &self,
        event: &NotificationEvent,
        project: &ProjectConfig,
    ) -> Result<DeliveryReport, NotifyError> {
        if !project.is_configured() {
            debug!("project is not configured for notifications, skipping");
            return Ok(DeliveryReport::default());
        }

        let message = template::render(project.message_template(), event, &project.project_name)?;
        debug!(chars = message.len(), "built message");

        let receivers = parse_receivers(&project.receivers_raw);
        if receivers.is_empty() {
            debug!("receiver list is empty, nothing to deliver");
            return Ok(DeliveryReport::default());
        }
        debug!(count = receivers.len(), "parsed receiver list");

        // One token per invocation, shared by every send below.
        let token = self
            .tokens
            .fetch_token(&project.api_id, &project.api_secret)
            .await?;

        let mut deliveries = Vec::with_capacity(receivers.len());
        for receiver in receivers {
            debug!(%receiver, "sending activity");
            let outcome = match self.client.send_activity(&receiver, &token, &message).await {
                Ok(()) => DeliveryOutcome::Delivered,
                Err(e) => {
                    error!(%receiver, error = %e, "delivery failed");
                    DeliveryOutcome::Failed(e.to_string())
                }
            };
            deliveries.push(Delivery { receiver, outcome });
        }

        Ok(DeliveryReport { deliveries })
    }
}
