//! Provider entry point.
//!
//! [`ProviderService`] is the JSON-level surface an engine drives.
//! [`DremioProvider`] implements it by decoding state into the typed models
//! of [`crate::resources`], running a [`Reconciler`] and encoding the result.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::client::ApiClient;
use crate::config::ProviderConfig;
use crate::datasources::{self, CatalogEntityQuery, CATALOG_ENTITY, DATA_SOURCE_TYPES};
use crate::diagnostic::Diagnostic;
use crate::error::{ProviderError, Result};
use crate::resources::{
    DatasetTagsModel, DatasetWikiModel, FolderModel, SourceModel, DATASET_TAGS, DATASET_WIKI,
    FOLDER, RESOURCE_TYPES, SOURCE,
};
use crate::sync::{Reconciler, SyncedEntity};
use crate::types::{ImportedResource, ProviderMetadata};
use crate::validation;

/// Operations an engine performs against a provider.
///
/// States and configurations are plain JSON values; implementations decode
/// them into their own types.
#[async_trait::async_trait]
pub trait ProviderService: Send + Sync + 'static {
    /// Resource and data source names served by this provider.
    fn metadata(&self) -> ProviderMetadata;

    /// Validate a resource configuration before planning.
    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>> {
        let _ = (resource_type, config);
        Ok(vec![])
    }

    /// Create a resource and return the state to store.
    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value>;

    /// Refresh a resource. `None` means it is gone and should be dropped.
    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Option<Value>>;

    /// Update a resource and return the new state.
    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value>;

    /// Delete a resource.
    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<()>;

    /// Bring an existing object under management.
    async fn import_resource(
        &self,
        resource_type: &str,
        _id: &str,
    ) -> Result<Vec<ImportedResource>> {
        Err(ProviderError::Unimplemented(format!(
            "import is not supported for {}",
            resource_type
        )))
    }

    /// Validate a data source configuration.
    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>> {
        let _ = (data_source_type, config);
        Ok(vec![])
    }

    /// Read a data source.
    async fn read_data_source(&self, data_source_type: &str, _config: Value) -> Result<Value> {
        Err(ProviderError::UnknownResource(data_source_type.to_string()))
    }
}

/// Provider for Dremio Cloud and Dremio Software.
#[derive(Debug, Clone)]
pub struct DremioProvider {
    client: ApiClient,
}

impl DremioProvider {
    /// Wrap an already connected client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Resolve the provider block, probe the credentials and build a provider.
    ///
    /// Every failure is reported as diagnostics.
    pub async fn configure(config: Value) -> std::result::Result<Self, Vec<Diagnostic>> {
        let config =
            ProviderConfig::from_value(config).map_err(|e| vec![Diagnostic::from(&e)])?;
        let resolved = config.resolve()?;
        debug!(?resolved, "Connecting to Dremio");
        let client = ApiClient::connect(&resolved).await.map_err(|e| {
            error!(error = %e, "Unable to create Dremio client");
            vec![Diagnostic::from(&e)
                .with_detail(format!("Unable to create Dremio client: {}", e))]
        })?;
        info!(account_type = %resolved.account_type, "Provider configured");
        Ok(Self::new(client))
    }

    /// The underlying API client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(&self.client)
    }

    async fn create_as<E>(&self, planned: Value) -> Result<Value>
    where
        E: SyncedEntity + Serialize + DeserializeOwned,
    {
        let plan: E = decode(planned)?;
        let created = self.reconciler().create(&plan).await?;
        encode(&created)
    }

    async fn read_as<E>(&self, current: Value) -> Result<Option<Value>>
    where
        E: SyncedEntity + Serialize + DeserializeOwned,
    {
        let state: E = decode(current)?;
        match self.reconciler().read(&state).await? {
            Some(refreshed) => Ok(Some(encode(&refreshed)?)),
            None => Ok(None),
        }
    }

    async fn update_as<E>(&self, prior: Value, planned: Value) -> Result<Value>
    where
        E: SyncedEntity + Serialize + DeserializeOwned,
    {
        let state: E = decode(prior)?;
        let plan: E = decode(planned)?;
        let updated = self.reconciler().update(&state, &plan).await?;
        encode(&updated)
    }

    async fn delete_as<E>(&self, current: Value) -> Result<()>
    where
        E: SyncedEntity + DeserializeOwned,
    {
        let state: E = decode(current)?;
        self.reconciler().delete(&state).await
    }

    async fn import_as<E>(&self, resource_type: &str, seed: E) -> Result<Vec<ImportedResource>>
    where
        E: SyncedEntity + Serialize,
    {
        match self.reconciler().read(&seed).await? {
            Some(state) => Ok(vec![ImportedResource::new(resource_type, encode(&state)?)]),
            None => Err(ProviderError::Validation(format!(
                "cannot import {}: object does not exist",
                resource_type
            ))),
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ProviderError::Validation(e.to_string()))
}

fn encode<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(ProviderError::Marshal)
}

fn unknown(resource_type: &str) -> ProviderError {
    ProviderError::UnknownResource(resource_type.to_string())
}

#[async_trait::async_trait]
impl ProviderService for DremioProvider {
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            resources: RESOURCE_TYPES.iter().map(|s| s.to_string()).collect(),
            data_sources: DATA_SOURCE_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[instrument(skip(self, config), name = "provider.validate_resource_config")]
    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>> {
        if !RESOURCE_TYPES.contains(&resource_type) {
            return Err(unknown(resource_type));
        }
        let diagnostics = validation::validate(resource_type, &config);
        debug!(count = diagnostics.len(), "Resource config validated");
        Ok(diagnostics)
    }

    #[instrument(skip(self, planned_state), name = "provider.create")]
    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value> {
        let result = match resource_type {
            FOLDER => self.create_as::<FolderModel>(planned_state).await,
            SOURCE => self.create_as::<SourceModel>(planned_state).await,
            DATASET_TAGS => self.create_as::<DatasetTagsModel>(planned_state).await,
            DATASET_WIKI => self.create_as::<DatasetWikiModel>(planned_state).await,
            other => Err(unknown(other)),
        };
        if let Err(e) = &result {
            error!(error = %e, "Create failed");
        }
        result
    }

    #[instrument(skip(self, current_state), name = "provider.read")]
    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Option<Value>> {
        let result = match resource_type {
            FOLDER => self.read_as::<FolderModel>(current_state).await,
            SOURCE => self.read_as::<SourceModel>(current_state).await,
            DATASET_TAGS => self.read_as::<DatasetTagsModel>(current_state).await,
            DATASET_WIKI => self.read_as::<DatasetWikiModel>(current_state).await,
            other => Err(unknown(other)),
        };
        if let Err(e) = &result {
            error!(error = %e, "Read failed");
        }
        result
    }

    #[instrument(skip(self, prior_state, planned_state), name = "provider.update")]
    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value> {
        let result = match resource_type {
            FOLDER => self.update_as::<FolderModel>(prior_state, planned_state).await,
            SOURCE => self.update_as::<SourceModel>(prior_state, planned_state).await,
            DATASET_TAGS => self.update_as::<DatasetTagsModel>(prior_state, planned_state).await,
            DATASET_WIKI => self.update_as::<DatasetWikiModel>(prior_state, planned_state).await,
            other => Err(unknown(other)),
        };
        if let Err(e) = &result {
            error!(error = %e, "Update failed");
        }
        result
    }

    #[instrument(skip(self, current_state), name = "provider.delete")]
    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<()> {
        let result = match resource_type {
            FOLDER => self.delete_as::<FolderModel>(current_state).await,
            SOURCE => self.delete_as::<SourceModel>(current_state).await,
            DATASET_TAGS => self.delete_as::<DatasetTagsModel>(current_state).await,
            DATASET_WIKI => self.delete_as::<DatasetWikiModel>(current_state).await,
            other => Err(unknown(other)),
        };
        if let Err(e) = &result {
            error!(error = %e, "Delete failed");
        }
        result
    }

    #[instrument(skip(self), name = "provider.import_resource")]
    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>> {
        let id = id.to_string();
        match resource_type {
            FOLDER => {
                let seed = FolderModel {
                    id,
                    ..Default::default()
                };
                self.import_as(resource_type, seed).await
            }
            SOURCE => {
                let seed = SourceModel {
                    id,
                    ..Default::default()
                };
                self.import_as(resource_type, seed).await
            }
            DATASET_TAGS => {
                let seed = DatasetTagsModel {
                    dataset_id: id,
                    ..Default::default()
                };
                self.import_as(resource_type, seed).await
            }
            DATASET_WIKI => {
                let seed = DatasetWikiModel {
                    dataset_id: id,
                    ..Default::default()
                };
                self.import_as(resource_type, seed).await
            }
            other => Err(unknown(other)),
        }
    }

    #[instrument(skip(self, config), name = "provider.validate_data_source_config")]
    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>> {
        if !DATA_SOURCE_TYPES.contains(&data_source_type) {
            return Err(unknown(data_source_type));
        }
        Ok(validation::validate(data_source_type, &config))
    }

    #[instrument(skip(self, config), name = "provider.read_data_source")]
    async fn read_data_source(&self, data_source_type: &str, config: Value) -> Result<Value> {
        match data_source_type {
            CATALOG_ENTITY => {
                let query: CatalogEntityQuery = decode(config)?;
                let entity = datasources::read_catalog_entity(&self.client, &query)
                    .await
                    .inspect_err(|e| error!(error = %e, "ReadDataSource failed"))?;
                encode(&entity)
            }
            other => Err(unknown(other)),
        }
    }
}
