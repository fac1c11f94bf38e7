//! Catalog folders.

use serde::{Deserialize, Serialize};

use super::acl::{self, AclModel};
use crate::client::Route;
use crate::error::{ProviderError, Result};
use crate::field::Field;
use crate::sync::{DeleteStrategy, SyncedEntity};
use crate::types::AccessControlList;
use crate::validation::validate_path_segments;

/// Local model of a folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderModel {
    /// Server-assigned id.
    #[serde(default)]
    pub id: String,
    /// Full path, the folder name last.
    pub path: Vec<String>,
    /// Optional access control list.
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub access_control_list: Field<AclModel>,
    /// Version tag.
    #[serde(default)]
    pub tag: String,
}

/// Folder create and update body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderRequest {
    entity_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    path: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_control_list: Option<AccessControlList>,
}

/// Folder as returned by the catalog API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderResponse {
    id: String,
    #[serde(default)]
    path: Vec<String>,
    #[serde(default)]
    tag: String,
    #[serde(default)]
    access_control_list: Option<AccessControlList>,
}

impl FolderModel {
    fn check_path(&self) -> Result<()> {
        if self.path.is_empty() {
            return Err(ProviderError::Validation(
                "folder path must have at least one element".to_string(),
            ));
        }
        match validate_path_segments("path", &self.path).into_iter().next() {
            Some(diag) => Err(ProviderError::Validation(
                diag.detail.unwrap_or(diag.summary),
            )),
            None => Ok(()),
        }
    }
}

impl SyncedEntity for FolderModel {
    type Request = FolderRequest;
    type Response = FolderResponse;

    const KIND: &'static str = "folder";
    const DELETE_STRATEGY: DeleteStrategy = DeleteStrategy::HardDeleteById;

    fn to_wire(&self) -> Result<FolderRequest> {
        self.check_path()?;
        Ok(FolderRequest {
            entity_type: "folder",
            id: None,
            path: self.path.clone(),
            tag: None,
            access_control_list: self.access_control_list.value().map(AclModel::to_wire),
        })
    }

    // The create API only accepts the path.
    fn create_request(&self) -> Result<FolderRequest> {
        let mut request = self.to_wire()?;
        request.access_control_list = None;
        Ok(request)
    }

    fn from_wire(&self, response: FolderResponse) -> Self {
        Self {
            id: response.id,
            path: if response.path.is_empty() {
                self.path.clone()
            } else {
                response.path
            },
            access_control_list: acl::observe(
                &self.access_control_list,
                response.access_control_list,
            ),
            tag: response.tag,
        }
    }

    fn stamp(request: &mut FolderRequest, observed: &Self) {
        request.id = Some(observed.id.clone());
        request.tag = Some(observed.tag.clone()).filter(|t| !t.is_empty());
    }

    fn needs_update_after_create(&self) -> bool {
        self.access_control_list.value().is_some()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::software_client;
    use crate::sync::Reconciler;
    use crate::types::Grant;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn folder(path: &[&str]) -> FolderModel {
        FolderModel {
            path: path.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn owner_acl() -> serde_json::Value {
        json!({"users": [{"id": "owner", "permissions": ["ALL"]}]})
    }

    #[test]
    fn test_create_body_is_path_only() {
        let mut model = folder(&["space", "reports"]);
        model.access_control_list = Field::Value(AclModel::default());
        let body = serde_json::to_value(model.create_request().unwrap()).unwrap();
        assert_eq!(body, json!({"entityType": "folder", "path": ["space", "reports"]}));
    }

    #[test]
    fn test_invalid_path_rejected_before_network() {
        let err = folder(&["space", "a/b"]).to_wire().unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
        assert!(folder(&[]).to_wire().is_err());
    }

    #[test]
    fn test_state_json_omits_unset_acl() {
        let state = serde_json::to_value(folder(&["s"])).unwrap();
        assert_eq!(state, json!({"id": "", "path": ["s"], "tag": ""}));

        let parsed: FolderModel = serde_json::from_value(json!({"path": ["s"]})).unwrap();
        assert!(parsed.access_control_list.is_unset());
    }

    #[tokio::test]
    async fn test_create_without_acl_keeps_it_unset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/catalog"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "f1", "path": ["space", "reports"], "tag": "t1",
                "entityType": "folder", "accessControlList": owner_acl()
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = software_client(&server);
        let created = Reconciler::new(&client)
            .create(&folder(&["space", "reports"]))
            .await
            .unwrap();
        assert_eq!(created.id, "f1");
        assert_eq!(created.tag, "t1");
        assert!(created.access_control_list.is_unset());
    }

    #[tokio::test]
    async fn test_create_with_acl_applies_follow_up_update() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/catalog"))
            .and(body_json(json!({"entityType": "folder", "path": ["space", "reports"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "f1", "path": ["space", "reports"], "tag": "t1"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/v3/catalog/f1"))
            .and(body_json(json!({
                "entityType": "folder",
                "id": "f1",
                "path": ["space", "reports"],
                "tag": "t1",
                "accessControlList": {"roles": [{"id": "r1", "permissions": ["SELECT"]}]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "f1", "path": ["space", "reports"], "tag": "t2",
                "accessControlList": {"roles": [{"id": "r1", "permissions": ["SELECT"]}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut plan = folder(&["space", "reports"]);
        plan.access_control_list = Field::Value(AclModel {
            users: Field::Unset,
            roles: Field::Value(vec![Grant::new("r1", ["SELECT"])]),
        });

        let client = software_client(&server);
        let created = Reconciler::new(&client).create(&plan).await.unwrap();
        assert_eq!(created.tag, "t2");
        let acl = created.access_control_list.value().unwrap();
        assert!(acl.users.is_null());
        assert_eq!(acl.roles.value().unwrap()[0].id, "r1");
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v3/catalog/f1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut state = folder(&["space", "reports"]);
        state.id = "f1".to_string();
        let client = software_client(&server);
        Reconciler::new(&client).delete(&state).await.unwrap();
    }
}
