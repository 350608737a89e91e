//! Configuration for alertcast
//!
//! Two surfaces live here. `ProjectConfig` holds the per-project
//! option values the host platform stores for each project (API
//! credentials, receiver list, message template). `ServiceConfig`
//! holds the endpoint and transport settings of the messaging API
//! itself; it ships with working defaults and uses the `figment`
//! crate to merge overrides from an `alertcast.toml` file and
//! `ALERTCAST_`-prefixed environment variables.

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Template applied when a project has no `message_template` option set.
pub const DEFAULT_MESSAGE_TEMPLATE: &str =
    "(yotfr)\nProject:<b> {project_name}</b>\n{tag[level]}: <b>{title}</b>\n{message}\n{url}\n(yotfr)";

/// Per-project options, as stored by the host platform.
///
/// Every field defaults to empty so a partially-filled option store
/// still deserializes; `is_configured` decides whether the project is
/// actionable.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProjectConfig {
    /// Messaging API application id.
    #[serde(default)]
    pub api_id: String,
    /// Messaging API application secret.
    #[serde(default)]
    pub api_secret: String,
    /// Receiver conversation ids, one per line.
    #[serde(default, rename = "receivers")]
    pub receivers_raw: String,
    /// Message template; empty means `DEFAULT_MESSAGE_TEMPLATE`.
    #[serde(default)]
    pub message_template: String,
    /// Display name of the project, available to templates.
    #[serde(default)]
    pub project_name: String,
}

impl ProjectConfig {
    /// A project is configured once both credentials and a raw
    /// receiver value are present.
    pub fn is_configured(&self) -> bool {
        !self.api_id.is_empty() && !self.api_secret.is_empty() && !self.receivers_raw.is_empty()
    }

    /// The template to render, falling back to the default.
    pub fn message_template(&self) -> &str {
        if self.message_template.is_empty() {
            DEFAULT_MESSAGE_TEMPLATE
        } else {
            &self.message_template
        }
    }
}

/// Messaging-API endpoint and transport settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServiceConfig {
    /// OAuth2 token endpoint for the client-credentials exchange.
    pub token_url: String,
    /// OAuth2 scope requested with the token.
    pub scope: String,
    /// Base URL of the messaging API.
    pub api_base_url: String,
    /// Timeout applied to every outbound request, in seconds.
    pub request_timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            token_url: "https://login.microsoftonline.com/botframework.com/oauth2/v2.0/token"
                .to_string(),
            scope: "https://api.botframework.com/.default".to_string(),
            api_base_url: "https://apis.skype.com/v2".to_string(),
            request_timeout_seconds: 10,
        }
    }
}

impl ServiceConfig {
    /// Loads service settings from the specified TOML file.
    ///
    /// # Arguments
    /// * `config_path` - The path to the TOML configuration file.
    pub fn load(config_path: &str) -> Result<Self> {
        let config: ServiceConfig = Figment::new()
            .merge(Serialized::defaults(ServiceConfig::default()))
            .merge(Toml::file(config_path))
            // Allow overriding with environment variables, e.g., ALERTCAST_TOKEN_URL=...
            .merge(Env::prefixed("ALERTCAST_"))
            .extract()?;
        Ok(config)
    }

    /// The outbound request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_point_at_the_live_endpoints() {
        let config = ServiceConfig::default();
        assert!(config.token_url.starts_with("https://"));
        assert!(config.api_base_url.starts_with("https://"));
        assert_eq!(config.request_timeout_seconds, 10);
    }

    #[test]
    fn load_merges_file_values_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_base_url = \"http://localhost:9090/v2\"").unwrap();

        let config = ServiceConfig::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.api_base_url, "http://localhost:9090/v2");
        // Untouched keys keep their defaults.
        assert_eq!(config.scope, ServiceConfig::default().scope);
    }

    #[test]
    fn unset_project_options_deserialize_as_unconfigured() {
        let project: ProjectConfig = serde_json::from_str("{}").unwrap();
        assert!(!project.is_configured());
        assert_eq!(project.message_template(), DEFAULT_MESSAGE_TEMPLATE);
    }

    #[test]
    fn receivers_option_maps_onto_receivers_raw() {
        let project: ProjectConfig =
            serde_json::from_str(r#"{"receivers": "29:alice\n29:bob"}"#).unwrap();
        assert_eq!(project.receivers_raw, "29:alice\n29:bob");
    }

    #[test]
    fn configured_needs_credentials_and_receivers() {
        let project = ProjectConfig {
            api_id: "app-id".to_string(),
            api_secret: "app-secret".to_string(),
            receivers_raw: "29:alice".to_string(),
            ..Default::default()
        };
        assert!(project.is_configured());

        let missing_secret = ProjectConfig {
            api_secret: String::new(),
            ..project.clone()
        };
        assert!(!missing_secret.is_configured());

        let missing_receivers = ProjectConfig {
            receivers_raw: String::new(),
            ..project
        };
        assert!(!missing_receivers.is_configured());
    }
}
