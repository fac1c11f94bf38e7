//! Provider configuration and its resolution against the environment.
//!
//! Each setting is taken from the explicit configuration value first, then
//! from its environment variable, then from a default. Empty strings count as
//! unset at every level.
//!
//! | setting | env var | default |
//! |---|---|---|
//! | `host` | `DREMIO_HOST` | `https://api.dremio.cloud` |
//! | `personal_access_token` | `DREMIO_PAT` | none (required) |
//! | `type` | `DREMIO_TYPE` | `cloud` |
//! | `project_id` | `DREMIO_PROJECT_ID` | none (required for cloud) |
//! | `timeout_seconds` | none | 30 |

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::diagnostic::Diagnostic;
use crate::error::{ProviderError, Result};

/// Default API host.
pub const DEFAULT_HOST: &str = "https://api.dremio.cloud";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Environment variable for the API host.
pub const ENV_HOST: &str = "DREMIO_HOST";
/// Environment variable for the personal access token.
pub const ENV_TOKEN: &str = "DREMIO_PAT";
/// Environment variable for the account type.
pub const ENV_TYPE: &str = "DREMIO_TYPE";
/// Environment variable for the cloud project id.
pub const ENV_PROJECT_ID: &str = "DREMIO_PROJECT_ID";

/// Which Dremio API surface to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Dremio Cloud, `v0` API scoped by project.
    #[default]
    Cloud,
    /// Self-hosted Dremio, `api/v3`.
    Software,
}

impl AccountType {
    /// Parse the configuration spelling of an account type.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cloud" => Some(Self::Cloud),
            "software" => Some(Self::Software),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cloud => write!(f, "cloud"),
            Self::Software => write!(f, "software"),
        }
    }
}

/// Raw provider configuration as supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API host.
    #[serde(default)]
    pub host: Option<String>,
    /// Personal access token.
    #[serde(default)]
    pub personal_access_token: Option<String>,
    /// Account type (`cloud` or `software`).
    #[serde(default, rename = "type")]
    pub account_type: Option<String>,
    /// Project id, required for cloud accounts.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

/// Configuration after applying environment and defaults.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// API host without a trailing slash.
    pub host: String,
    /// Personal access token.
    pub token: String,
    /// API surface.
    pub account_type: AccountType,
    /// Project id (empty for software accounts).
    pub project_id: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .field("account_type", &self.account_type)
            .field("project_id", &self.project_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl ProviderConfig {
    /// Parse the host's JSON configuration value.
    ///
    /// `null` is treated as an empty configuration.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|e| {
            ProviderError::Configuration(format!("invalid provider configuration: {}", e))
        })
    }

    /// Resolve against the process environment.
    pub fn resolve(&self) -> std::result::Result<ResolvedConfig, Vec<Diagnostic>> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary environment lookup.
    ///
    /// All problems are reported together rather than stopping at the first.
    pub fn resolve_with<F>(&self, env: F) -> std::result::Result<ResolvedConfig, Vec<Diagnostic>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |explicit: &Option<String>, key: &str| {
            non_empty(explicit.clone()).or_else(|| non_empty(env(key)))
        };

        let mut diagnostics = Vec::new();

        let host = pick(&self.host, ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host.trim_end_matches('/').to_string();

        let token = pick(&self.personal_access_token, ENV_TOKEN);
        if token.is_none() {
            diagnostics.push(
                Diagnostic::error("Unknown Dremio API Personal Access Token")
                    .with_detail(format!(
                        "Set `personal_access_token` in the provider configuration or use the {} environment variable.",
                        ENV_TOKEN
                    ))
                    .with_attribute("personal_access_token"),
            );
        }

        let raw_type = pick(&self.account_type, ENV_TYPE);
        let account_type = match raw_type.as_deref() {
            None => Some(AccountType::Cloud),
            Some(t) => {
                let parsed = AccountType::parse(t);
                if parsed.is_none() {
                    diagnostics.push(
                        Diagnostic::error("Unknown Dremio account type")
                            .with_detail(format!(
                                "Expected `cloud` or `software`, got `{}`.",
                                t
                            ))
                            .with_attribute("type"),
                    );
                }
                parsed
            }
        };

        let project_id = pick(&self.project_id, ENV_PROJECT_ID);
        if account_type == Some(AccountType::Cloud) && project_id.is_none() {
            diagnostics.push(
                Diagnostic::error("Unknown Dremio Project ID")
                    .with_detail(format!(
                        "A project id is required for Dremio Cloud. Set `project_id` or use the {} environment variable.",
                        ENV_PROJECT_ID
                    ))
                    .with_attribute("project_id"),
            );
        }

        let timeout_seconds = match self.timeout_seconds {
            Some(0) => {
                diagnostics.push(
                    Diagnostic::error("Invalid timeout")
                        .with_detail("`timeout_seconds` must be greater than zero.")
                        .with_attribute("timeout_seconds"),
                );
                DEFAULT_TIMEOUT_SECONDS
            }
            Some(secs) => secs,
            None => DEFAULT_TIMEOUT_SECONDS,
        };

        match (token, account_type) {
            (Some(token), Some(account_type)) if diagnostics.is_empty() => Ok(ResolvedConfig {
                host,
                token,
                account_type,
                project_id: project_id.unwrap_or_default(),
                timeout: Duration::from_secs(timeout_seconds),
            }),
            _ => Err(diagnostics),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_with_env_credentials() {
        let config = ProviderConfig::default();
        let resolved = config
            .resolve_with(env_of(&[(ENV_TOKEN, "pat"), (ENV_PROJECT_ID, "p1")]))
            .unwrap();
        assert_eq!(resolved.host, DEFAULT_HOST);
        assert_eq!(resolved.token, "pat");
        assert_eq!(resolved.account_type, AccountType::Cloud);
        assert_eq!(resolved.project_id, "p1");
        assert_eq!(resolved.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_explicit_beats_env() {
        let config = ProviderConfig {
            host: Some("https://dremio.internal/".to_string()),
            personal_access_token: Some("explicit".to_string()),
            account_type: Some("software".to_string()),
            project_id: None,
            timeout_seconds: Some(5),
        };
        let resolved = config
            .resolve_with(env_of(&[
                (ENV_HOST, "https://env.example"),
                (ENV_TOKEN, "from-env"),
                (ENV_TYPE, "cloud"),
            ]))
            .unwrap();
        assert_eq!(resolved.host, "https://dremio.internal");
        assert_eq!(resolved.token, "explicit");
        assert_eq!(resolved.account_type, AccountType::Software);
        assert_eq!(resolved.project_id, "");
        assert_eq!(resolved.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_empty_explicit_value_falls_back_to_env() {
        let config = ProviderConfig {
            personal_access_token: Some(String::new()),
            account_type: Some("software".to_string()),
            ..Default::default()
        };
        let resolved = config.resolve_with(env_of(&[(ENV_TOKEN, "env-pat")])).unwrap();
        assert_eq!(resolved.token, "env-pat");
    }

    #[test]
    fn test_missing_token_and_project() {
        let diags = ProviderConfig::default().resolve_with(no_env).unwrap_err();
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().all(Diagnostic::is_error));
        assert_eq!(diags[0].attribute.as_deref(), Some("personal_access_token"));
        assert_eq!(diags[1].attribute.as_deref(), Some("project_id"));
    }

    #[test]
    fn test_software_does_not_need_project() {
        let config = ProviderConfig {
            personal_access_token: Some("pat".to_string()),
            account_type: Some("software".to_string()),
            ..Default::default()
        };
        assert!(config.resolve_with(no_env).is_ok());
    }

    #[test]
    fn test_unknown_account_type() {
        let config = ProviderConfig {
            personal_access_token: Some("pat".to_string()),
            account_type: Some("onprem".to_string()),
            ..Default::default()
        };
        let diags = config.resolve_with(no_env).unwrap_err();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].attribute.as_deref(), Some("type"));
        assert!(diags[0].detail.as_deref().unwrap().contains("onprem"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ProviderConfig {
            personal_access_token: Some("pat".to_string()),
            account_type: Some("software".to_string()),
            timeout_seconds: Some(0),
            ..Default::default()
        };
        let diags = config.resolve_with(no_env).unwrap_err();
        assert_eq!(diags[0].attribute.as_deref(), Some("timeout_seconds"));
    }

    #[test]
    fn test_from_value() {
        let config = ProviderConfig::from_value(serde_json::json!({
            "host": "https://h",
            "type": "software",
            "personal_access_token": "t"
        }))
        .unwrap();
        assert_eq!(config.account_type.as_deref(), Some("software"));
        assert_eq!(config.host.as_deref(), Some("https://h"));

        assert_eq!(
            ProviderConfig::from_value(serde_json::Value::Null).unwrap(),
            ProviderConfig::default()
        );

        let err = ProviderConfig::from_value(serde_json::json!({"timeout_seconds": "soon"}))
            .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ProviderConfig {
            personal_access_token: Some("secret-pat".to_string()),
            account_type: Some("software".to_string()),
            ..Default::default()
        };
        let resolved = config.resolve_with(no_env).unwrap();
        let debug = format!("{:?}", resolved);
        assert!(!debug.contains("secret-pat"));
        assert!(debug.contains("<redacted>"));
    }
}
