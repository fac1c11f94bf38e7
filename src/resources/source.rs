//! Catalog sources.
//!
//! The source `config` is kind-specific. `S3`, `POSTGRES` and `MYSQL` are
//! checked against typed shapes that reject unknown keys; every other kind is
//! passed through as an opaque JSON object. The config is never refreshed from
//! the server, which adds defaults and masks secrets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::acl::{self, AclModel};
use crate::client::Route;
use crate::error::{ProviderError, Result};
use crate::field::Field;
use crate::sync::{DeleteStrategy, SyncedEntity};
use crate::types::AccessControlList;

/// Connection property attached to some source kinds.
pub type PropertyList = Vec<Map<String, Value>>;

/// `S3` source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[allow(missing_docs)]
pub struct S3Config {
    /// `ACCESS_KEY`, `AWS_PROFILE`, `EC2_METADATA` or `NONE`.
    pub credential_type: String,
    #[serde(default, rename = "assumedRoleARN", skip_serializing_if = "Option::is_none")]
    pub assumed_role_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_access_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_bucket_list: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_async: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester_pays: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_file_status_check: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_partition_inference_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_path: Option<String>,
    #[serde(default, rename = "kmsKeyARN", skip_serializing_if = "Option::is_none")]
    pub kms_key_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ctas_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_list: Option<PropertyList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelisted_buckets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_caching_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cache_space_pct: Option<i64>,
}

/// `POSTGRES` source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[allow(missing_docs)]
pub struct PostgresConfig {
    /// Database host.
    pub hostname: String,
    /// Database port, as a string.
    pub port: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_resource_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_ssl: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_idle_conns: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_time_sec: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_validation_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_list: Option<PropertyList>,
}

/// `MYSQL` source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[allow(missing_docs)]
pub struct MySqlConfig {
    /// Database host.
    pub hostname: String,
    /// Database port, as a string.
    pub port: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_write_timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_idle_conns: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_time_sec: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_list: Option<PropertyList>,
}

/// Kind-specific source configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    /// `S3`
    S3(S3Config),
    /// `POSTGRES`
    Postgres(PostgresConfig),
    /// `MYSQL`
    MySql(MySqlConfig),
    /// Any other kind, passed through untouched.
    Opaque {
        /// Source kind, e.g. `SNOWFLAKE`.
        kind: String,
        /// Raw configuration object.
        config: Map<String, Value>,
    },
}

impl SourceConfig {
    /// Parse a configuration value for a source kind.
    pub fn from_value(kind: &str, value: Value) -> Result<Self> {
        let invalid = |e: serde_json::Error| {
            ProviderError::Validation(format!("invalid config for source type {}: {}", kind, e))
        };
        match kind {
            "S3" => serde_json::from_value(value).map(Self::S3).map_err(invalid),
            "POSTGRES" => serde_json::from_value(value)
                .map(Self::Postgres)
                .map_err(invalid),
            "MYSQL" => serde_json::from_value(value).map(Self::MySql).map_err(invalid),
            _ => match value {
                Value::Object(config) => Ok(Self::Opaque {
                    kind: kind.to_string(),
                    config,
                }),
                other => Err(ProviderError::Validation(format!(
                    "config for source type {} must be an object, got {}",
                    kind, other
                ))),
            },
        }
    }

    /// Source kind this configuration belongs to.
    pub fn kind(&self) -> &str {
        match self {
            Self::S3(_) => "S3",
            Self::Postgres(_) => "POSTGRES",
            Self::MySql(_) => "MYSQL",
            Self::Opaque { kind, .. } => kind,
        }
    }

    /// JSON object sent as `config`.
    pub fn to_wire(&self) -> Result<Value> {
        match self {
            Self::S3(c) => serde_json::to_value(c),
            Self::Postgres(c) => serde_json::to_value(c),
            Self::MySql(c) => serde_json::to_value(c),
            Self::Opaque { config, .. } => Ok(Value::Object(config.clone())),
        }
        .map_err(ProviderError::Marshal)
    }
}

/// Local model of a source's metadata refresh policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct MetadataPolicyModel {
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub auth_ttl_ms: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub names_refresh_ms: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub dataset_refresh_after_ms: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub dataset_expire_after_ms: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub dataset_update_mode: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub delete_unavailable_datasets: Field<bool>,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub auto_promote_datasets: Field<bool>,
}

/// Wire shape of a metadata policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataPolicy {
    #[serde(default, rename = "authTTLMs", skip_serializing_if = "Option::is_none")]
    auth_ttl_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    names_refresh_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dataset_refresh_after_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dataset_expire_after_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dataset_update_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delete_unavailable_datasets: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auto_promote_datasets: Option<bool>,
}

impl MetadataPolicyModel {
    fn to_wire(&self) -> MetadataPolicy {
        MetadataPolicy {
            auth_ttl_ms: self.auth_ttl_ms.cloned_value(),
            names_refresh_ms: self.names_refresh_ms.cloned_value(),
            dataset_refresh_after_ms: self.dataset_refresh_after_ms.cloned_value(),
            dataset_expire_after_ms: self.dataset_expire_after_ms.cloned_value(),
            dataset_update_mode: self.dataset_update_mode.cloned_value(),
            delete_unavailable_datasets: self.delete_unavailable_datasets.cloned_value(),
            auto_promote_datasets: self.auto_promote_datasets.cloned_value(),
        }
    }

    fn from_wire(wire: MetadataPolicy) -> Self {
        Self {
            auth_ttl_ms: Field::reported(wire.auth_ttl_ms),
            names_refresh_ms: Field::reported(wire.names_refresh_ms),
            dataset_refresh_after_ms: Field::reported(wire.dataset_refresh_after_ms),
            dataset_expire_after_ms: Field::reported(wire.dataset_expire_after_ms),
            dataset_update_mode: Field::reported(wire.dataset_update_mode),
            delete_unavailable_datasets: Field::reported(wire.delete_unavailable_datasets),
            auto_promote_datasets: Field::reported(wire.auto_promote_datasets),
        }
    }
}

/// Local model of a source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceModel {
    /// Server-assigned id.
    #[serde(default)]
    pub id: String,
    /// Source name, also its catalog path.
    pub name: String,
    /// Source kind, e.g. `S3`.
    #[serde(rename = "type")]
    pub source_type: String,
    /// Kind-specific configuration as written by the user.
    #[serde(default)]
    pub config: Value,
    /// Metadata refresh policy.
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub metadata_policy: Field<MetadataPolicyModel>,
    /// Reflection grace period.
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub acceleration_grace_period_ms: Field<i64>,
    /// Reflection refresh period.
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub acceleration_refresh_period_ms: Field<i64>,
    /// `NEVER`, `PERIOD` or `SCHEDULE`.
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub acceleration_active_policy_type: Field<String>,
    /// Cron expression for reflection refresh.
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub acceleration_refresh_schedule: Field<String>,
    /// Refresh reflections when Iceberg snapshots change.
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub acceleration_refresh_on_data_changes: Field<bool>,
    /// Optional access control list.
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub access_control_list: Field<AclModel>,
    /// Version tag.
    #[serde(default)]
    pub tag: String,
}

/// Source create and update body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRequest {
    entity_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "type")]
    source_type: String,
    name: String,
    config: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata_policy: Option<MetadataPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    acceleration_grace_period_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    acceleration_refresh_period_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    acceleration_active_policy_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    acceleration_refresh_schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    acceleration_refresh_on_data_changes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_control_list: Option<AccessControlList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
}

/// Source as returned by the catalog API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceResponse {
    id: String,
    #[serde(default)]
    tag: String,
    #[serde(default, rename = "type")]
    source_type: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    metadata_policy: Option<MetadataPolicy>,
    #[serde(default)]
    acceleration_grace_period_ms: Option<i64>,
    #[serde(default)]
    acceleration_refresh_period_ms: Option<i64>,
    #[serde(default)]
    acceleration_active_policy_type: Option<String>,
    #[serde(default)]
    acceleration_refresh_schedule: Option<String>,
    #[serde(default)]
    acceleration_refresh_on_data_changes: Option<bool>,
    #[serde(default)]
    access_control_list: Option<AccessControlList>,
}

fn keep<T>(previous: &Field<T>, wire: Option<T>) -> Field<T> {
    Field::observe(previous, wire, |w, _| w)
}

impl SyncedEntity for SourceModel {
    type Request = SourceRequest;
    type Response = SourceResponse;

    const KIND: &'static str = "source";
    const DELETE_STRATEGY: DeleteStrategy = DeleteStrategy::HardDeleteById;

    fn to_wire(&self) -> Result<SourceRequest> {
        if self.name.is_empty() {
            return Err(ProviderError::Validation(
                "source name must not be empty".to_string(),
            ));
        }
        let config = SourceConfig::from_value(&self.source_type, self.config.clone())?.to_wire()?;
        Ok(SourceRequest {
            entity_type: "source",
            id: None,
            source_type: self.source_type.clone(),
            name: self.name.clone(),
            config,
            metadata_policy: self.metadata_policy.value().map(MetadataPolicyModel::to_wire),
            acceleration_grace_period_ms: self.acceleration_grace_period_ms.cloned_value(),
            acceleration_refresh_period_ms: self.acceleration_refresh_period_ms.cloned_value(),
            acceleration_active_policy_type: self.acceleration_active_policy_type.cloned_value(),
            acceleration_refresh_schedule: self.acceleration_refresh_schedule.cloned_value(),
            acceleration_refresh_on_data_changes: self
                .acceleration_refresh_on_data_changes
                .cloned_value(),
            access_control_list: self.access_control_list.value().map(AclModel::to_wire),
            tag: None,
        })
    }

    fn from_wire(&self, r: SourceResponse) -> Self {
        Self {
            id: r.id,
            name: r.name.unwrap_or_else(|| self.name.clone()),
            source_type: r.source_type.unwrap_or_else(|| self.source_type.clone()),
            config: self.config.clone(),
            metadata_policy: Field::observe(&self.metadata_policy, r.metadata_policy, |w, _| {
                MetadataPolicyModel::from_wire(w)
            }),
            acceleration_grace_period_ms: keep(
                &self.acceleration_grace_period_ms,
                r.acceleration_grace_period_ms,
            ),
            acceleration_refresh_period_ms: keep(
                &self.acceleration_refresh_period_ms,
                r.acceleration_refresh_period_ms,
            ),
            acceleration_active_policy_type: keep(
                &self.acceleration_active_policy_type,
                r.acceleration_active_policy_type,
            ),
            acceleration_refresh_schedule: keep(
                &self.acceleration_refresh_schedule,
                r.acceleration_refresh_schedule,
            ),
            acceleration_refresh_on_data_changes: keep(
                &self.acceleration_refresh_on_data_changes,
                r.acceleration_refresh_on_data_changes,
            ),
            access_control_list: acl::observe(&self.access_control_list, r.access_control_list),
            tag: r.tag,
        }
    }

    fn stamp(request: &mut SourceRequest, observed: &Self) {
        request.id = Some(observed.id.clone());
        request.tag = Some(observed.tag.clone()).filter(|t| !t.is_empty());
    }

    fn create_route(&self) -> Route {
        Route::post("/catalog")
    }

    fn read_route(&self) -> Route {
        Route::get("/catalog").join(self.id.as_str())
    }

    fn update_route(&self) -> Route {
        Route::put("/catalog").join(self.id.as_str())
    }

    fn delete_route(&self) -> Route {
        Route::delete("/catalog").join(self.id.as_str())
    }
}
