//! Central schema registry for every proceedings document.
//!
//! The `SchemaRegistry` builds JSON Schemas from sympo-core types at
//! construction time using [`schemars::schema_for!`] and validates via
//! `jsonschema`.

use std::collections::HashMap;

use schemars::schema_for;
use sympo_core::entities::{Paper, Person, Session, SsOrganizer};
use sympo_core::ingest::ColumnMap;
use sympo_core::pagination::PageCounts;
use sympo_core::patch::SessionPatch;
use sympo_core::projection::{CommonInfo, RevisionRequest, RevisionStatus, ViolationReport};
use sympo_core::side_files::AwardEntry;

use crate::error::SchemaError;

/// Central store of all document schemas.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

/// `schema_for!($ty)` as a `serde_json::Value`, stored under `$name`.
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, serde_json::to_value(schema_for!($ty)).unwrap());
    };
}

impl SchemaRegistry {
    /// Build a registry with the data file, its records, and every side
    /// document the pipeline reads or writes.
    ///
    /// # Panics
    ///
    /// Panics if `serde_json::to_value` fails on any `schemars`-generated
    /// schema, which `schemars` output never does.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // --- Data file and its records ---
        register!(schemas, "session_list", Vec<Session>);
        register!(schemas, "session", Session);
        register!(schemas, "paper", Paper);
        register!(schemas, "person", Person);

        // --- Inputs ---
        register!(schemas, "patch_document", Vec<SessionPatch>);
        register!(schemas, "awards", Vec<AwardEntry>);
        register!(schemas, "ss_organizers", Vec<SsOrganizer>);
        register!(schemas, "page_counts", PageCounts);
        register!(schemas, "column_map", ColumnMap);
        register!(schemas, "common_info", CommonInfo);

        // --- Outputs ---
        register!(schemas, "violation_reports", Vec<ViolationReport>);
        register!(schemas, "revision_requests", Vec<RevisionRequest>);
        register!(schemas, "revision_status", RevisionStatus);

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaError::Compile {
                schema: name.to_string(),
                reason: e.to_string(),
            })?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{}: {e}", e.instance_path))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed {
                schema: name.to_string(),
                errors,
            })
        }
    }

    /// Parse `text` as JSON and validate it against a named schema.
    ///
    /// # Errors
    ///
    /// `SchemaError::Parse` for malformed JSON, otherwise as [`Self::validate`].
    pub fn validate_str(&self, name: &str, text: &str) -> Result<(), SchemaError> {
        let instance: serde_json::Value = serde_json::from_str(text)?;
        self.validate(name, &instance)
    }

    /// List all registered schema names.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use pretty_assertions::assert_eq;
    use sympo_core::SessionList;
    use sympo_core::entities::Author;

    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
    }

    fn session_list() -> SessionList {
        let author = Author::new(Person::new("Doe", "Jane", "Univ. A").unwrap(), 1, true);
        let session = Session {
            category: "A1".into(),
            category_order: 1,
            code: "A1-1".into(),
            title: "Chaos".into(),
            room: "101".into(),
            start_time: DateTime::parse_from_rfc3339("2024-11-20T09:00:00+09:00").unwrap(),
            end_time: DateTime::parse_from_rfc3339("2024-11-20T10:00:00+09:00").unwrap(),
            chairs: Vec::new(),
            ss_organizers: None,
            papers: vec![Paper::new(12, "Attractors", 1, vec![author]).unwrap()],
        };
        SessionList::new(vec![session]).unwrap()
    }

    #[test]
    fn registry_has_expected_count() {
        assert_eq!(registry().schema_count(), 13);
    }

    #[test]
    fn registry_list_is_sorted() {
        let names = registry().list();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn get_nonexistent_schema() {
        assert!(registry().get("nonexistent").is_none());
    }

    #[test]
    fn validate_serialized_session_list() {
        let json = serde_json::to_value(session_list()).unwrap();
        assert!(registry().validate("session_list", &json).is_ok());
    }

    #[test]
    fn validate_rejects_missing_paper_id() {
        let mut json = serde_json::to_value(session_list()).unwrap();
        json[0]["papers"][0]
            .as_object_mut()
            .unwrap()
            .remove("id");
        let result = registry().validate("session_list", &json);
        let Err(SchemaError::ValidationFailed { errors, .. }) = result else {
            panic!("Expected ValidationFailed");
        };
        assert!(errors[0].contains("/0/papers/0"), "{errors:?}");
    }

    #[test]
    fn validate_rejects_bad_page_range() {
        let mut json = serde_json::to_value(session_list()).unwrap();
        json[0]["papers"][0]["pages"] = serde_json::json!([0, 3]);
        assert!(registry().validate("session_list", &json).is_err());
    }

    #[test]
    fn patch_document_requires_key_fields() {
        let reg = registry();
        assert!(reg
            .validate_str("patch_document", r#"[{"category": "A1", "category_order": 1}]"#)
            .is_ok());
        assert!(reg
            .validate_str("patch_document", r#"[{"category": "A1"}]"#)
            .is_err());
    }

    #[test]
    fn malformed_text_is_a_parse_error() {
        let result = registry().validate_str("awards", "[{");
        assert!(matches!(result, Err(SchemaError::Parse(_))));
    }

    #[test]
    fn validate_nonexistent_schema_returns_not_found() {
        let result = registry().validate("bogus", &serde_json::json!({}));
        assert!(matches!(result, Err(SchemaError::NotFound(_))));
    }

    #[test]
    fn all_expected_schemas_present() {
        let reg = registry();
        let expected = [
            "session_list",
            "session",
            "paper",
            "person",
            "patch_document",
            "awards",
            "ss_organizers",
            "page_counts",
            "column_map",
            "common_info",
            "violation_reports",
            "revision_requests",
            "revision_status",
        ];
        for name in &expected {
            assert!(reg.get(name).is_some(), "Missing expected schema: {name}");
        }
    }
}
