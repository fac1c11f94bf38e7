//! Authenticated JSON transport to the Dremio REST API.
//!
//! The client is built once from a [`ResolvedConfig`] and shared by reference
//! across all resource adapters. Every call is a single attempt: non-2xx
//! answers become [`ProviderError::Api`] carrying the raw status and body.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{AccountType, ResolvedConfig, DEFAULT_TIMEOUT_SECONDS};
use crate::error::{ProviderError, Result};

/// Whether a path lives under the project or at the account level.
///
/// Only meaningful for cloud accounts; software accounts have one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// `/v0/projects/{project_id}{path}`
    #[default]
    Project,
    /// `/v0{path}`
    Global,
}

/// One logical API call.
///
/// Segments are kept raw and percent-encoded only when the URL is built, so
/// ids and catalog path elements may contain `#`, `?`, `%` or spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// HTTP method.
    pub method: Method,
    /// Unencoded path segments.
    pub segments: Vec<String>,
    /// Unencoded query pairs.
    pub query: Vec<(String, String)>,
    /// Cloud URL scope.
    pub scope: Scope,
}

impl Route {
    /// A project-scoped route for a static path such as `/catalog`.
    ///
    /// The path is split on `/`; use [`Route::join`] for dynamic segments.
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            query: Vec::new(),
            scope: Scope::Project,
        }
    }

    /// Project-scoped `GET`.
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    /// Project-scoped `POST`.
    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    /// Project-scoped `PUT`.
    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Project-scoped `DELETE`.
    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append one segment, taken verbatim.
    pub fn join(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Append a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Switch the route to the account-level surface.
    pub fn global(mut self) -> Self {
        self.scope = Scope::Global;
        self
    }

    /// Logical path, unencoded, for logs.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Options for building an [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Overall per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

/// HTTP client for the Dremio API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    account_type: AccountType,
    project_id: String,
}

impl ApiClient {
    /// Build a client without contacting the server.
    pub fn new(config: &ResolvedConfig) -> Result<Self> {
        Self::with_options(
            config,
            ClientOptions {
                timeout: config.timeout,
            },
        )
    }

    /// Build a client with explicit options, without contacting the server.
    pub fn with_options(config: &ResolvedConfig, options: ClientOptions) -> Result<Self> {
        let auth = HeaderValue::from_str(&format!("Bearer {}", config.token)).map_err(|_| {
            ProviderError::Configuration(
                "personal access token contains invalid header characters".to_string(),
            )
        })?;
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let base = Url::parse(config.host.trim_end_matches('/'))
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                ProviderError::Configuration(format!("invalid host URL `{}`", config.host))
            })?;

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            http,
            base,
            account_type: config.account_type,
            project_id: config.project_id.clone(),
        })
    }

    /// Build a client and verify the credentials with `GET /catalog`.
    ///
    /// Any answer other than `200` fails with [`ProviderError::Authentication`].
    pub async fn connect(config: &ResolvedConfig) -> Result<Self> {
        let client = Self::new(config)?;
        let probe = client.raw(&Route::get("/catalog"), None).await?;
        let status = probe.status().as_u16();
        if status != 200 {
            let body = probe.text().await.unwrap_or_default();
            warn!(status, "Credential probe failed");
            return Err(ProviderError::Authentication { status, body });
        }
        debug!(host = %client.base, "Credential probe succeeded");
        Ok(client)
    }

    /// The account type this client talks to.
    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    /// Absolute URL for a route, with every segment percent-encoded.
    pub fn url(&self, route: &Route) -> Url {
        let mut url = self.base.clone();
        // The base was checked to be hierarchical when the client was built.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            match (self.account_type, route.scope) {
                (AccountType::Software, _) => {
                    path.extend(["api", "v3"]);
                }
                (AccountType::Cloud, Scope::Global) => {
                    path.push("v0");
                }
                (AccountType::Cloud, Scope::Project) => {
                    path.extend(["v0", "projects", self.project_id.as_str()]);
                }
            }
            path.extend(&route.segments);
        }
        if !route.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&route.query);
        }
        url
    }

    async fn raw(&self, route: &Route, body: Option<Vec<u8>>) -> Result<Response> {
        let url = self.url(route);
        debug!(method = %route.method, %url, "Sending request");
        let mut request = self.http.request(route.method.clone(), url);
        if let Some(body) = body {
            request = request.body(body);
        }
        Ok(request.send().await?)
    }

    /// Send a request and return the response if its status is 2xx.
    ///
    /// Any other status reads the body and fails with [`ProviderError::Api`].
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        route: &Route,
        body: Option<&B>,
    ) -> Result<Response> {
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(ProviderError::Marshal)?;

        let response = self.raw(route, payload).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), path = %route.path(), "Request failed");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Send a request and parse the response body as `T`.
    pub async fn send_json<B, T>(&self, route: &Route, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(route, body).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(ProviderError::Parse)
    }

    /// Send a request and discard the response body.
    pub async fn send<B: Serialize + ?Sized>(&self, route: &Route, body: Option<&B>) -> Result<()> {
        self.request(route, body).await.map(|_| ())
    }
}
