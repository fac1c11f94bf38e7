//! Shared value types: version tokens, ACLs and provider-level results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque optimistic-concurrency token issued by the server.
///
/// Catalog entities and tags carry a string; wikis carry an integer. Every
/// mutation must present the token last observed for the entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionToken {
    /// String token (`tag` on catalog entities, `version` on tags).
    Text(String),
    /// Integer token (`version` on wikis).
    Number(i64),
}

impl VersionToken {
    /// The token as a string, if it is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// The token as an integer, if it is numeric.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<String> for VersionToken {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for VersionToken {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// Grants for a single user or role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// User or role id.
    pub id: String,
    /// Granted privileges, e.g. `SELECT`, `ALTER`.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Grant {
    /// Create a grant.
    pub fn new<I, S>(id: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Wire shape of an access control list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlList {
    /// User grants.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<Grant>,
    /// Role grants.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Grant>,
}

/// Owner of a catalog object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// User or role id.
    pub owner_id: String,
    /// `USER` or `ROLE`.
    pub owner_type: String,
}

/// A resource produced by an import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedResource {
    /// The resource type.
    pub resource_type: String,
    /// The imported state.
    pub state: serde_json::Value,
}

impl ImportedResource {
    /// Create a new imported resource.
    pub fn new(resource_type: impl Into<String>, state: serde_json::Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            state,
        }
    }
}

/// Resource and data source names the provider serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderMetadata {
    /// List of resource type names.
    pub resources: Vec<String>,
    /// List of data source type names.
    pub data_sources: Vec<String>,
}
