//! Tags attached to a dataset.
//!
//! The tag collection always exists once the dataset does, so create adopts
//! the current version and delete posts an empty list instead of removing
//! anything.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Route;
use crate::error::Result;
use crate::sync::{DeleteStrategy, SyncedEntity};
use crate::types::VersionToken;

/// Local model of a dataset's tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetTagsModel {
    /// Id of the tagged dataset.
    pub dataset_id: String,
    /// Tag names.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Last observed version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionToken>,
}

/// Tags body.
#[derive(Debug, Clone, Serialize)]
pub struct TagsRequest {
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<VersionToken>,
}

/// Tags as returned by the collaboration API.
#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    version: Option<String>,
}

impl DatasetTagsModel {
    fn collection(&self, method: Method) -> Route {
        Route::new(method, "/catalog")
            .join(self.dataset_id.as_str())
            .join("collaboration")
            .join("tag")
    }
}

impl SyncedEntity for DatasetTagsModel {
    type Request = TagsRequest;
    type Response = TagsResponse;

    const KIND: &'static str = "dataset_tags";
    const DELETE_STRATEGY: DeleteStrategy = DeleteStrategy::UpdateToEmptyWithVersion;
    const ADOPTS_EXISTING_VERSION: bool = true;

    fn to_wire(&self) -> Result<TagsRequest> {
        Ok(TagsRequest {
            tags: self.tags.clone(),
            version: None,
        })
    }

    fn from_wire(&self, response: TagsResponse) -> Self {
        Self {
            dataset_id: self.dataset_id.clone(),
            tags: response.tags,
            version: response.version.map(VersionToken::Text),
        }
    }

    fn stamp(request: &mut TagsRequest, observed: &Self) {
        request.version = observed.version.clone();
    }

    fn adopt(request: &mut TagsRequest, existing: &TagsResponse) {
        request.version = existing
            .version
            .clone()
            .filter(|v| !v.is_empty())
            .map(VersionToken::Text);
    }

    fn empty_request(&self) -> Result<TagsRequest> {
        Ok(TagsRequest {
            tags: Vec::new(),
            version: None,
        })
    }

    fn create_route(&self) -> Route {
        self.collection(Method::POST)
    }

    fn read_route(&self) -> Route {
        self.collection(Method::GET)
    }

    fn update_route(&self) -> Route {
        self.collection(Method::PUT)
    }

    fn delete_route(&self) -> Route {
        self.collection(Method::POST)
    }
}
