//! Dremio Provider
//!
//! A typed synchronization layer between declarative resource models and
//! the Dremio REST API (Cloud and Software).
//!
//! # Overview
//!
//! - [`client`]: authenticated HTTP transport with Cloud/Software URL routing
//! - [`field`]: tri-state [`Field`] values that keep "never set" apart from
//!   "explicitly empty"
//! - [`sync`]: the [`SyncedEntity`] contract and the generic [`Reconciler`]
//! - [`resources`]: folders, sources, dataset tags and dataset wikis
//! - [`datasources`]: catalog entity lookup by id or path
//! - [`provider`]: JSON-level [`ProviderService`] dispatch implemented by
//!   [`DremioProvider`]
//!
//! # Quick Start
//!
//! ```ignore
//! use dremio_provider::{init_logging, DremioProvider, ProviderService};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging();
//!
//!     let provider = DremioProvider::configure(json!({
//!         "type": "software",
//!         "host": "http://localhost:9047",
//!         "personal_access_token": "..."
//!     }))
//!     .await
//!     .map_err(|d| format!("{:?}", d))?;
//!
//!     let state = provider
//!         .create("dremio_folder", json!({"path": ["space", "reports"]}))
//!         .await?;
//!     tracing::info!(%state, "created");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod datasources;
pub mod diagnostic;
pub mod error;
pub mod field;
pub mod logging;
pub mod lookup;
pub mod provider;
pub mod resources;
pub mod sync;
pub mod testing;
pub mod types;
pub mod validation;

pub use client::{ApiClient, ClientOptions, Route, Scope};
pub use config::{AccountType, ProviderConfig, ResolvedConfig};
pub use diagnostic::{Diagnostic, DiagnosticSeverity};
pub use error::{ProviderError, Result};
pub use field::Field;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use lookup::Lookup;
pub use provider::{DremioProvider, ProviderService};
pub use sync::{DeleteStrategy, Reconciler, SyncedEntity};
pub use types::{ImportedResource, ProviderMetadata, VersionToken};
pub use validation::{is_valid, validate, validate_result};

pub use async_trait::async_trait;
pub use serde_json;
pub use tracing;
