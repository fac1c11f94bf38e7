//! Managed resource kinds.
//!
//! Each submodule defines the local model of one entity kind, its wire
//! shapes and its [`SyncedEntity`](crate::sync::SyncedEntity) implementation.

pub mod acl;
pub mod dataset_tags;
pub mod dataset_wiki;
pub mod folder;
pub mod source;

pub use acl::AclModel;
pub use dataset_tags::DatasetTagsModel;
pub use dataset_wiki::DatasetWikiModel;
pub use folder::FolderModel;
pub use source::{SourceConfig, SourceModel};

/// Resource type name of [`FolderModel`].
pub const FOLDER: &str = "dremio_folder";
/// Resource type name of [`SourceModel`].
pub const SOURCE: &str = "dremio_source";
/// Resource type name of [`DatasetTagsModel`].
pub const DATASET_TAGS: &str = "dremio_dataset_tags";
/// Resource type name of [`DatasetWikiModel`].
pub const DATASET_WIKI: &str = "dremio_dataset_wiki";

/// All resource type names served by the provider.
pub const RESOURCE_TYPES: [&str; 4] = [FOLDER, SOURCE, DATASET_TAGS, DATASET_WIKI];
