//! Error types for the Dremio provider.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur while synchronizing resources with the Dremio API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API answered with a non-2xx status code.
    ///
    /// The raw response body is kept verbatim so the end user sees exactly
    /// what the server returned.
    #[error("API request failed with status {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The request never produced a response (connect failure, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The credential probe performed at client construction failed.
    #[error("login failed. status: {status}, body: {body}")]
    Authentication {
        /// HTTP status code returned by the probe.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// A response body was not valid JSON for the expected shape.
    #[error("Unable to parse response: {0}")]
    Parse(#[source] serde_json::Error),

    /// A request body could not be serialized.
    #[error("Unable to marshal request body: {0}")]
    Marshal(#[source] serde_json::Error),

    /// Caller-supplied input was rejected before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The provider configuration is incomplete or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource or data source type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// Operation not implemented for this resource type.
    #[error("Unimplemented: {0}")]
    Unimplemented(String),
}

impl ProviderError {
    /// HTTP status code carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Authentication { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the remote entity no longer exists.
    ///
    /// Readers treat this as "drop the local model" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Whether the server rejected a stale version token.
    ///
    /// Conflicts are classified but never retried.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Api { status: 409, .. })
    }

    /// Raw response body for errors produced by the API.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } | Self::Authentication { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_embeds_status_and_body() {
        let err = ProviderError::Api {
            status: 500,
            body: "internal boom".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "API request failed with status 500: internal boom"
        );
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.body(), Some("internal boom"));
    }

    #[test]
    fn test_not_found_classification() {
        let err = ProviderError::Api {
            status: 404,
            body: r#"{"message":"not found"}"#.to_string(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_conflict());

        let err = ProviderError::Api {
            status: 500,
            body: String::new(),
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_conflict_classification() {
        let err = ProviderError::Api {
            status: 409,
            body: "tag mismatch".to_string(),
        };
        assert!(err.is_conflict());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_authentication_display() {
        let err = ProviderError::Authentication {
            status: 401,
            body: "bad token".to_string(),
        };
        assert_eq!(format!("{}", err), "login failed. status: 401, body: bad token");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_other_variants_display() {
        let err = ProviderError::Validation("only one of `id` or `path`".to_string());
        assert_eq!(
            format!("{}", err),
            "Validation error: only one of `id` or `path`"
        );

        let err = ProviderError::Configuration("missing token".to_string());
        assert_eq!(format!("{}", err), "Configuration error: missing token");

        let err = ProviderError::UnknownResource("dremio_space".to_string());
        assert_eq!(format!("{}", err), "Unknown resource type: dremio_space");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_parse_error_display() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = ProviderError::Parse(source);
        assert!(format!("{}", err).starts_with("Unable to parse response:"));
    }
}
