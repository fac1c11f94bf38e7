//! Read-only data sources.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Result;
use crate::field::Field;
use crate::lookup::Lookup;
use crate::resources::acl::{self, AclModel};
use crate::types::{AccessControlList, Owner};

/// Data source type name of the catalog entity lookup.
pub const CATALOG_ENTITY: &str = "dremio_catalog_entity";

/// All data source type names served by the provider.
pub const DATA_SOURCE_TYPES: [&str; 1] = [CATALOG_ENTITY];

/// Configuration of a catalog entity lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntityQuery {
    /// Entity id. Exactly one of `id` and `path` is required.
    #[serde(default)]
    pub id: Option<String>,
    /// Entity path.
    #[serde(default)]
    pub path: Option<Vec<String>>,
    /// Maximum number of children to return.
    #[serde(default)]
    pub max_children: Option<u32>,
}

/// A child of a container entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogChild {
    /// Child id.
    pub id: String,
    /// Full path.
    #[serde(default)]
    pub path: Vec<String>,
    /// Version tag.
    #[serde(default)]
    pub tag: Option<String>,
    /// `CONTAINER` or `DATASET`.
    #[serde(default, rename = "type")]
    pub entity_type: Option<String>,
    /// `SPACE`, `SOURCE`, `FOLDER` or `HOME` for containers.
    #[serde(default)]
    pub container_type: Option<String>,
    /// `VIRTUAL_DATASET` or `PHYSICAL_DATASET` for datasets.
    #[serde(default)]
    pub dataset_type: Option<String>,
}

/// Result of a catalog entity lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntity {
    /// Entity id.
    pub id: String,
    /// Full path.
    pub path: Vec<String>,
    /// Version tag.
    pub tag: Option<String>,
    /// `folder`, `source`, `space`, `dataset`, ...
    pub entity_type: Option<String>,
    /// Children, for containers.
    pub children: Vec<CatalogChild>,
    /// Access control list as reported by the server.
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub access_control_list: Field<AclModel>,
    /// Owner, when reported.
    pub owner: Option<Owner>,
    /// Echo of the requested child limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_children: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntityResponse {
    id: String,
    #[serde(default)]
    path: Vec<String>,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    entity_type: Option<String>,
    #[serde(default)]
    children: Vec<CatalogChild>,
    #[serde(default)]
    access_control_list: Option<AccessControlList>,
    #[serde(default)]
    owner: Option<Owner>,
}

/// Look up a catalog entity by id or path.
///
/// Every returned attribute is computed and populated from the response.
pub async fn read_catalog_entity(
    client: &ApiClient,
    query: &CatalogEntityQuery,
) -> Result<CatalogEntity> {
    let lookup = Lookup::from_parts(query.id.as_deref(), query.path.as_deref())?;
    let mut route = lookup.route();
    if let Some(max) = query.max_children {
        route = route.with_query("maxChildren", max);
    }
    debug!(path = %route.path(), "Looking up catalog entity");

    let response: CatalogEntityResponse = client.send_json(&route, None::<&()>).await?;
    Ok(CatalogEntity {
        id: response.id,
        path: response.path,
        tag: response.tag,
        entity_type: response.entity_type,
        children: response.children,
        access_control_list: acl::reported(response.access_control_list),
        owner: response.owner,
        max_children: query.max_children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::software_client;
    use crate::error::ProviderError;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn folder_body() -> serde_json::Value {
        json!({
            "id": "f1",
            "path": ["space", "reports"],
            "tag": "t1",
            "entityType": "folder",
            "children": [
                {
                    "id": "c1",
                    "path": ["space", "reports", "q1"],
                    "type": "DATASET",
                    "datasetType": "VIRTUAL_DATASET"
                }
            ],
            "accessControlList": {"users": [{"id": "u1", "permissions": ["SELECT"]}]},
            "owner": {"ownerId": "u1", "ownerType": "USER"}
        })
    }

    #[tokio::test]
    async fn test_lookup_by_path_populates_computed_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/catalog/by-path/space/reports"))
            .and(query_param("maxChildren", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(folder_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = software_client(&server);
        let query = CatalogEntityQuery {
            id: None,
            path: Some(vec!["space".to_string(), "reports".to_string()]),
            max_children: Some(5),
        };
        let entity = read_catalog_entity(&client, &query).await.unwrap();
        assert_eq!(entity.id, "f1");
        assert_eq!(entity.entity_type.as_deref(), Some("folder"));
        assert_eq!(entity.children.len(), 1);
        assert_eq!(entity.children[0].dataset_type.as_deref(), Some("VIRTUAL_DATASET"));
        assert!(entity.access_control_list.value().is_some());
        assert_eq!(entity.owner.unwrap().owner_type, "USER");
    }

    #[tokio::test]
    async fn test_lookup_by_path_encodes_reserved_characters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/catalog/by-path/my%20space/q%231"))
            .and(query_param("maxChildren", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "q1",
                "path": ["my space", "q#1"],
                "entityType": "dataset"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = software_client(&server);
        let query = CatalogEntityQuery {
            id: None,
            path: Some(vec!["my space".to_string(), "q#1".to_string()]),
            max_children: Some(5),
        };
        let entity = read_catalog_entity(&client, &query).await.unwrap();
        assert_eq!(entity.id, "q1");
        assert_eq!(entity.path, vec!["my space".to_string(), "q#1".to_string()]);
    }

    #[tokio::test]
    async fn test_lookup_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/catalog/f1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "f1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = software_client(&server);
        let query = CatalogEntityQuery {
            id: Some("f1".to_string()),
            ..Default::default()
        };
        let entity = read_catalog_entity(&client, &query).await.unwrap();
        assert!(entity.children.is_empty());
        assert!(entity.access_control_list.is_null());
    }

    #[tokio::test]
    async fn test_both_id_and_path_fail_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = software_client(&server);
        let query = CatalogEntityQuery {
            id: Some("f1".to_string()),
            path: Some(vec!["space".to_string()]),
            max_children: None,
        };
        let err = read_catalog_entity(&client, &query).await.unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
    }
}
