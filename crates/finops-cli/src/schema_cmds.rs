use std::path::Path;

use anyhow::{bail, Result};

use finops_config::{ConfigStore, ValidationReport};

fn report_failures(report: &ValidationReport) -> Result<()> {
    if report.valid {
        return Ok(());
    }
    for error in &report.errors {
        eprintln!("Validation error: {error}");
    }
    bail!("Configuration is invalid");
}

pub(crate) fn handle_set(store: &mut ConfigStore, file: &Path) -> Result<()> {
    store.set_value("schema-path", &file.to_string_lossy())?;
    let report = store.validate_config(Some(file))?;
    report_failures(&report)?;
    println!("Schema set and validated successfully");
    Ok(())
}

pub(crate) fn handle_validate(store: &ConfigStore) -> Result<()> {
    let report = store.validate_config(None)?;
    report_failures(&report)?;
    println!("Configuration is valid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_schema_set_validates_immediately() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store =
            ConfigStore::open_at(dir.path().join("config.json")).expect("open store");

        let mut schema = tempfile::NamedTempFile::new().expect("schema file");
        schema
            .write_all(br#"{"type": "object", "required": ["org-id"]}"#)
            .expect("write schema");

        // Default config carries org-id, so this passes
        handle_set(&mut store, schema.path()).expect("schema set");
        assert_eq!(
            store.get_value("schema-path").expect("get"),
            schema.path().to_string_lossy()
        );

        handle_validate(&store).expect("validate");
    }

    #[test]
    fn test_validate_reports_invalid_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store =
            ConfigStore::open_at(dir.path().join("config.json")).expect("open store");

        let mut schema = tempfile::NamedTempFile::new().expect("schema file");
        schema
            .write_all(br#"{"type": "object", "required": ["a-key-nobody-sets"]}"#)
            .expect("write schema");

        let err = handle_set(&mut store, schema.path()).unwrap_err();
        assert!(err.to_string().contains("invalid"));
    }
}
