//! Identify a catalog object by id or by path.

use crate::client::Route;
use crate::error::{ProviderError, Result};
use crate::validation::forbidden_char;

/// How a catalog object is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Server-assigned id.
    Id(String),
    /// Full path, one element per segment.
    Path(Vec<String>),
}

impl Lookup {
    /// Build a lookup from an optional id and an optional path.
    ///
    /// Exactly one of them must be present; empty values count as absent.
    /// Path segments must not contain `/`, `:`, `[` or `]`. Violations are
    /// reported before any network call.
    pub fn from_parts(id: Option<&str>, path: Option<&[String]>) -> Result<Self> {
        let id = id.filter(|s| !s.is_empty());
        let path = path.filter(|p| !p.is_empty());

        match (id, path) {
            (Some(id), None) => Ok(Self::Id(id.to_string())),
            (None, Some(path)) => {
                for segment in path {
                    if let Some(c) = forbidden_char(segment) {
                        return Err(ProviderError::Validation(format!(
                            "path elements must not contain the characters: /, :, [, ] (found '{}' in \"{}\")",
                            c, segment
                        )));
                    }
                }
                Ok(Self::Path(path.to_vec()))
            }
            (Some(_), Some(_)) => Err(ProviderError::Validation(
                "only one of `id` or `path` must be specified".to_string(),
            )),
            (None, None) => Err(ProviderError::Validation(
                "either `id` or `path` must be specified".to_string(),
            )),
        }
    }

    /// `GET` route of the catalog API for this lookup.
    pub fn route(&self) -> Route {
        match self {
            Self::Id(id) => Route::get("/catalog").join(id.as_str()),
            Self::Path(segments) => segments
                .iter()
                .fold(Route::get("/catalog/by-path"), |route, segment| {
                    route.join(segment.as_str())
                }),
        }
    }
}
