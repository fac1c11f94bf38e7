//! Wiki text attached to a dataset.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Route;
use crate::error::Result;
use crate::sync::{DeleteStrategy, SyncedEntity};
use crate::types::VersionToken;

/// Local model of a dataset's wiki.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetWikiModel {
    /// Id of the documented dataset.
    pub dataset_id: String,
    /// Markdown text.
    #[serde(default)]
    pub text: String,
    /// Last observed version, an integer starting at 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionToken>,
}

/// Wiki body. Create, update and delete all post this shape.
#[derive(Debug, Clone, Serialize)]
pub struct WikiRequest {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<VersionToken>,
}

/// Wiki as returned by the collaboration API.
#[derive(Debug, Clone, Deserialize)]
pub struct WikiResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    version: Option<i64>,
}

impl DatasetWikiModel {
    fn collection(&self, method: Method) -> Route {
        Route::new(method, "/catalog")
            .join(self.dataset_id.as_str())
            .join("collaboration")
            .join("wiki")
    }
}

impl SyncedEntity for DatasetWikiModel {
    type Request = WikiRequest;
    type Response = WikiResponse;

    const KIND: &'static str = "dataset_wiki";
    const DELETE_STRATEGY: DeleteStrategy = DeleteStrategy::UpdateToEmptyWithVersion;
    const ADOPTS_EXISTING_VERSION: bool = true;

    fn to_wire(&self) -> Result<WikiRequest> {
        Ok(WikiRequest {
            text: self.text.clone(),
            version: None,
        })
    }

    fn from_wire(&self, response: WikiResponse) -> Self {
        Self {
            dataset_id: self.dataset_id.clone(),
            text: response.text,
            version: response.version.map(VersionToken::Number),
        }
    }

    fn stamp(request: &mut WikiRequest, observed: &Self) {
        request.version = observed.version.clone();
    }

    fn adopt(request: &mut WikiRequest, existing: &WikiResponse) {
        request.version = existing.version.map(VersionToken::Number);
    }

    fn empty_request(&self) -> Result<WikiRequest> {
        Ok(WikiRequest {
            text: String::new(),
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
        self.collection(Method::POST)
    }

    fn delete_route(&self) -> Route {
        self.collection(Method::POST)
    }
}
