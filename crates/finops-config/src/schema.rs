//! JSON Schema validation of a profile's config map.

use std::collections::BTreeMap;
use std::path::Path;

use finops_core::AppError;

/// Outcome of validating a config map against a schema.
///
/// A failed validation is a report with `valid == false`, not an error;
/// errors are reserved for unreadable or malformed schema files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    /// One message per violated field.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Report used when no schema is configured: trivially valid.
    pub fn trivially_valid() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }
}

/// Validate `config` against the JSON schema at `schema_path`.
pub fn validate_config_map(
    config: &BTreeMap<String, String>,
    schema_path: &Path,
) -> Result<ValidationReport, AppError> {
    let content = std::fs::read_to_string(schema_path).map_err(|e| {
        AppError::SchemaError(format!("cannot read schema {}: {e}", schema_path.display()))
    })?;
    let schema: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        AppError::SchemaError(format!(
            "schema {} is not valid JSON: {e}",
            schema_path.display()
        ))
    })?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| AppError::SchemaError(format!("invalid schema: {e}")))?;

    let instance =
        serde_json::to_value(config).map_err(|e| AppError::SchemaError(e.to_string()))?;
    let errors: Vec<String> = validator
        .iter_errors(&instance)
        .map(|error| {
            let path = error.instance_path.to_string();
            if path.is_empty() {
                error.to_string()
            } else {
                format!("{path}: {error}")
            }
        })
        .collect();

    Ok(ValidationReport {
        valid: errors.is_empty(),
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SCHEMA: &str = r#"{
        "type": "object",
        "required": ["api-key", "org-id"],
        "properties": {
            "api-key": { "type": "string", "minLength": 1 },
            "org-id": { "type": "string" }
        },
        "additionalProperties": true
    }"#;

    fn write_schema(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp schema file");
        file.write_all(content.as_bytes()).expect("write schema");
        file
    }

    #[test]
    fn test_valid_config_passes() {
        let file = write_schema(SCHEMA);
        let config = BTreeMap::from([
            ("api-key".to_string(), "abc123".to_string()),
            ("org-id".to_string(), "org-1".to_string()),
        ]);

        let report = validate_config_map(&config, file.path()).expect("validate");
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_violations_produce_per_field_messages() {
        let file = write_schema(SCHEMA);
        let config = BTreeMap::from([("api-key".to_string(), String::new())]);

        let report = validate_config_map(&config, file.path()).expect("validate");
        assert!(!report.valid);
        // Empty api-key violates minLength, missing org-id violates required
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_missing_schema_file_is_error() {
        let config = BTreeMap::new();
        let err = validate_config_map(&config, Path::new("/nonexistent/schema.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read schema"));
    }

    #[test]
    fn test_malformed_schema_is_error() {
        let file = write_schema("{ not json");
        let err = validate_config_map(&BTreeMap::new(), file.path()).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }
}
