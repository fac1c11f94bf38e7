//! Configuration validation helpers.
//!
//! Validation runs on the raw JSON configuration before any network call and
//! reports problems as [`Diagnostic`]s with the offending attribute path.
//!
//! # Example
//!
//! ```
//! use dremio_provider::validation::validate;
//! use serde_json::json;
//!
//! let diagnostics = validate("dremio_folder", &json!({"path": ["space", "reports"]}));
//! assert!(diagnostics.is_empty());
//!
//! let diagnostics = validate("dremio_folder", &json!({"path": ["space", "a/b"]}));
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].attribute, Some("path[1]".to_string()));
//! ```

use serde_json::Value;

use crate::datasources::CATALOG_ENTITY;
use crate::diagnostic::Diagnostic;
use crate::resources::source::SourceConfig;
use crate::resources::{DATASET_TAGS, DATASET_WIKI, FOLDER, SOURCE};

/// Characters that may not appear in a catalog path segment.
pub const FORBIDDEN_PATH_CHARS: [char; 4] = ['/', ':', '[', ']'];

/// Validate a resource or data source configuration.
///
/// Unknown types yield a single error diagnostic.
pub fn validate(type_name: &str, value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let Some(obj) = value.as_object() else {
        diagnostics.push(
            Diagnostic::error("Expected object")
                .with_detail(format!("Got {}", value_type_name(value))),
        );
        return diagnostics;
    };

    match type_name {
        FOLDER => {
            validate_path_attribute(obj.get("path"), "path", true, &mut diagnostics);
        }
        SOURCE => {
            require_string(obj.get("name"), "name", &mut diagnostics);
            require_string(obj.get("type"), "type", &mut diagnostics);
            if let (Some(Value::String(kind)), Some(config)) =
                (obj.get("type"), obj.get("config"))
            {
                if let Err(err) = SourceConfig::from_value(kind, config.clone()) {
                    diagnostics.push(
                        Diagnostic::error("Invalid source config")
                            .with_detail(err.to_string())
                            .with_attribute("config"),
                    );
                }
            } else if obj.get("config").is_none() {
                diagnostics.push(missing("config"));
            }
        }
        DATASET_TAGS => {
            require_string(obj.get("dataset_id"), "dataset_id", &mut diagnostics);
            match obj.get("tags") {
                None | Some(Value::Null) => diagnostics.push(missing("tags")),
                Some(Value::Array(items)) => {
                    for (i, item) in items.iter().enumerate() {
                        if !item.is_string() {
                            diagnostics.push(type_error(&format!("tags[{}]", i), "string", item));
                        }
                    }
                }
                Some(other) => diagnostics.push(type_error("tags", "list", other)),
            }
        }
        DATASET_WIKI => {
            require_string(obj.get("dataset_id"), "dataset_id", &mut diagnostics);
            match obj.get("text") {
                None | Some(Value::Null) => diagnostics.push(missing("text")),
                Some(Value::String(_)) => {}
                Some(other) => diagnostics.push(type_error("text", "string", other)),
            }
        }
        CATALOG_ENTITY => {
            diagnostics.extend(exactly_one_of(obj.get("id"), obj.get("path"), "id", "path"));
            validate_path_attribute(obj.get("path"), "path", false, &mut diagnostics);
            if let Some(v) = obj.get("max_children") {
                if !v.is_null() && !is_non_negative_int(v) {
                    diagnostics.push(type_error("max_children", "non-negative integer", v));
                }
            }
        }
        other => {
            diagnostics.push(Diagnostic::error(format!("Unknown type: {}", other)));
        }
    }

    diagnostics
}

/// Validate a configuration, returning Ok if valid or Err with diagnostics.
pub fn validate_result(type_name: &str, value: &Value) -> Result<(), Vec<Diagnostic>> {
    let diagnostics = validate(type_name, value);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(diagnostics)
    }
}

/// Check if a configuration is valid.
pub fn is_valid(type_name: &str, value: &Value) -> bool {
    validate(type_name, value).is_empty()
}

/// First forbidden character in a path segment, if any.
pub fn forbidden_char(segment: &str) -> Option<char> {
    segment.chars().find(|c| FORBIDDEN_PATH_CHARS.contains(c))
}

/// Validate catalog path segments.
pub fn validate_path_segments(attribute: &str, segments: &[String]) -> Vec<Diagnostic> {
    segments
        .iter()
        .enumerate()
        .filter_map(|(i, segment)| {
            forbidden_char(segment).map(|c| {
                Diagnostic::error("Invalid path element")
                    .with_detail(format!(
                        "path elements must not contain the characters: /, :, [, ] (found '{}' in \"{}\")",
                        c, segment
                    ))
                    .with_attribute(index_path(attribute, i))
            })
        })
        .collect()
}

/// Exactly one of two attributes must be present.
///
/// Null, empty strings and empty lists count as absent.
pub fn exactly_one_of(
    a: Option<&Value>,
    b: Option<&Value>,
    a_name: &str,
    b_name: &str,
) -> Vec<Diagnostic> {
    match (is_present(a), is_present(b)) {
        (true, false) | (false, true) => Vec::new(),
        (false, false) => vec![Diagnostic::error(format!(
            "Missing {} or {}",
            a_name, b_name
        ))
        .with_detail(format!("Either `{}` or `{}` must be specified.", a_name, b_name))],
        (true, true) => vec![Diagnostic::error(format!(
            "Both {} and {} specified",
            a_name, b_name
        ))
        .with_detail(format!("Only one of `{}` or `{}` must be specified.", a_name, b_name))],
    }
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(_) => true,
    }
}

fn validate_path_attribute(
    value: Option<&Value>,
    attribute: &str,
    required: bool,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match value {
        None | Some(Value::Null) => {
            if required {
                diagnostics.push(missing(attribute));
            }
        }
        Some(Value::Array(items)) => {
            if required && items.is_empty() {
                diagnostics.push(
                    Diagnostic::error(format!("Empty attribute '{}'", attribute))
                        .with_detail("At least one path element is required")
                        .with_attribute(attribute),
                );
            }
            let mut segments = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item.as_str() {
                    Some(s) => segments.push(s.to_string()),
                    None => diagnostics.push(type_error(&index_path(attribute, i), "string", item)),
                }
            }
            diagnostics.extend(validate_path_segments(attribute, &segments));
        }
        Some(other) => diagnostics.push(type_error(attribute, "list", other)),
    }
}

fn require_string(value: Option<&Value>, attribute: &str, diagnostics: &mut Vec<Diagnostic>) {
    match value {
        None | Some(Value::Null) => diagnostics.push(missing(attribute)),
        Some(Value::String(s)) if s.is_empty() => diagnostics.push(
            Diagnostic::error(format!("Empty attribute '{}'", attribute))
                .with_detail("This attribute must not be empty")
                .with_attribute(attribute),
        ),
        Some(Value::String(_)) => {}
        Some(other) => diagnostics.push(type_error(attribute, "string", other)),
    }
}

fn missing(attribute: &str) -> Diagnostic {
    Diagnostic::error(format!("Missing required attribute '{}'", attribute))
        .with_detail("This attribute is required and must be provided")
        .with_attribute(attribute)
}

fn index_path(base: &str, index: usize) -> String {
    format!("{}[{}]", base, index)
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn is_non_negative_int(value: &Value) -> bool {
    value.as_u64().is_some()
}

fn type_error(path: &str, expected: &str, got: &Value) -> Diagnostic {
    Diagnostic::error(format!("Invalid type for '{}'", path))
        .with_detail(format!("Expected {}, got {}", expected, value_type_name(got)))
        .with_attribute(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_forbidden_char() {
        assert_eq!(forbidden_char("reports"), None);
        assert_eq!(forbidden_char("a/b"), Some('/'));
        assert_eq!(forbidden_char("db:1"), Some(':'));
        assert_eq!(forbidden_char("x[0]"), Some('['));
        assert_eq!(forbidden_char("with space"), None);
    }

    #[test]
    fn test_folder_valid() {
        assert!(is_valid("dremio_folder", &json!({"path": ["space", "reports"]})));
    }

    #[test]
    fn test_folder_missing_and_empty_path() {
        let d = validate("dremio_folder", &json!({}));
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].attribute.as_deref(), Some("path"));

        let d = validate("dremio_folder", &json!({"path": []}));
        assert_eq!(d.len(), 1);
        assert!(d[0].summary.contains("Empty"));
    }

    #[test]
    fn test_folder_bad_segments() {
        let d = validate("dremio_folder", &json!({"path": ["ok", "a:b", 3]}));
        assert_eq!(d.len(), 2);
        let attrs: Vec<_> = d.iter().filter_map(|d| d.attribute.as_deref()).collect();
        assert!(attrs.contains(&"path[1]"));
        assert!(attrs.contains(&"path[2]"));
    }

    #[test]
    fn test_exactly_one_of() {
        let id = json!("abc");
        let path = json!(["a"]);
        let empty = json!("");
        let empty_list = json!([]);

        assert!(exactly_one_of(Some(&id), None, "id", "path").is_empty());
        assert!(exactly_one_of(None, Some(&path), "id", "path").is_empty());
        assert!(exactly_one_of(Some(&empty), Some(&path), "id", "path").is_empty());

        let both = exactly_one_of(Some(&id), Some(&path), "id", "path");
        assert_eq!(both.len(), 1);
        assert!(both[0].summary.starts_with("Both"));

        let neither = exactly_one_of(Some(&empty), Some(&empty_list), "id", "path");
        assert_eq!(neither.len(), 1);
        assert!(neither[0].summary.starts_with("Missing"));
    }

    #[test]
    fn test_catalog_entity() {
        assert!(is_valid("dremio_catalog_entity", &json!({"id": "abc"})));
        assert!(is_valid(
            "dremio_catalog_entity",
            &json!({"path": ["s", "t"], "max_children": 10})
        ));
        assert!(!is_valid("dremio_catalog_entity", &json!({"id": "abc", "path": ["s"]})));
        assert!(!is_valid("dremio_catalog_entity", &json!({"id": "a", "max_children": -1})));
    }

    #[test]
    fn test_source_requires_fields() {
        let d = validate("dremio_source", &json!({}));
        let attrs: Vec<_> = d.iter().filter_map(|d| d.attribute.as_deref()).collect();
        assert_eq!(attrs, vec!["name", "type", "config"]);
    }

    #[test]
    fn test_source_typed_config() {
        let ok = json!({"name": "lake", "type": "S3", "config": {"credentialType": "NONE"}});
        assert!(is_valid("dremio_source", &ok));

        let bad = json!({"name": "lake", "type": "S3", "config": {"hostname": "x"}});
        let d = validate("dremio_source", &bad);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].attribute.as_deref(), Some("config"));

        let opaque = json!({"name": "snow", "type": "SNOWFLAKE", "config": {"anything": 1}});
        assert!(is_valid("dremio_source", &opaque));
    }

    #[test]
    fn test_dataset_tags_and_wiki() {
        assert!(is_valid("dremio_dataset_tags", &json!({"dataset_id": "d", "tags": ["a"]})));
        let d = validate("dremio_dataset_tags", &json!({"dataset_id": "d", "tags": [1]}));
        assert_eq!(d[0].attribute.as_deref(), Some("tags[0]"));

        assert!(is_valid("dremio_dataset_wiki", &json!({"dataset_id": "d", "text": ""})));
        let d = validate("dremio_dataset_wiki", &json!({"dataset_id": "", "text": 1}));
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn test_unknown_type_and_non_object() {
        assert_eq!(validate("dremio_space", &json!({})).len(), 1);
        let d = validate("dremio_folder", &json!("nope"));
        assert_eq!(d[0].summary, "Expected object");
        assert!(validate_result("dremio_folder", &json!(null)).is_err());
    }
}
