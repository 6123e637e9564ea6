use std::io::Write as _;

use finops_core::AppError;
use tempfile::TempDir;

use crate::store::ConfigStore;
use crate::types::{DEFAULT_ENVIRONMENT, DEFAULT_PROFILE};

fn open_store(dir: &TempDir) -> ConfigStore {
    ConfigStore::open_at(dir.path().join("config.json")).expect("open store")
}

#[test]
fn test_create_environment() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);

    store.create_environment("prod", None).expect("create");
    let prod = store
        .list_environments()
        .iter()
        .find(|e| e.name == "prod")
        .expect("prod env");
    assert!(!prod.is_active);
    assert!(prod.profiles.is_empty());
}

#[test]
fn test_create_environment_with_unknown_profile_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);

    let err = store.create_environment("prod", Some("ghost")).unwrap_err();
    assert!(matches!(err, AppError::ProfileNotFound(_)));
    assert!(store.list_environments().iter().all(|e| e.name != "prod"));
}

#[test]
fn test_create_duplicate_environment_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);

    let err = store
        .create_environment(DEFAULT_ENVIRONMENT, None)
        .unwrap_err();
    assert!(matches!(err, AppError::EnvironmentExists(_)));
}

#[test]
fn test_set_environment_activates_first_linked_profile() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);

    store.create_profile("staging").expect("create profile");
    store.set_active_profile("staging").expect("activate");
    store
        .create_environment("prod", Some(DEFAULT_PROFILE))
        .expect("create env");

    let activated = store.set_environment("prod").expect("switch");
    assert_eq!(activated.as_deref(), Some(DEFAULT_PROFILE));
    assert_eq!(store.active_profile().expect("active").name, DEFAULT_PROFILE);

    let prod = store
        .list_environments()
        .iter()
        .find(|e| e.name == "prod")
        .expect("prod env");
    assert!(prod.is_active);
    assert_eq!(
        store
            .list_environments()
            .iter()
            .filter(|e| e.is_active)
            .count(),
        1
    );
}

#[test]
fn test_set_environment_without_profiles_keeps_active_profile() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);

    store.create_environment("empty", None).expect("create env");
    let activated = store.set_environment("empty").expect("switch");
    assert_eq!(activated, None);
    assert_eq!(store.active_profile().expect("active").name, DEFAULT_PROFILE);
}

#[test]
fn test_set_unknown_environment_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);
    let err = store.set_environment("ghost").unwrap_err();
    assert!(matches!(err, AppError::EnvironmentNotFound(_)));
}

#[test]
fn test_link_symmetry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);

    store.create_profile("staging").expect("create profile");
    store.create_environment("prod", None).expect("create env");
    store.link_profile("prod", "staging").expect("link");

    let prod = store
        .list_environments()
        .iter()
        .find(|e| e.name == "prod")
        .expect("prod env");
    assert_eq!(prod.profiles, vec!["staging".to_string()]);
    let staging = store
        .list_profiles()
        .iter()
        .find(|p| p.name == "staging")
        .expect("staging profile");
    assert_eq!(staging.environment.as_deref(), Some("prod"));
}

#[test]
fn test_link_already_linked_is_noop_success() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);

    store.create_profile("staging").expect("create profile");
    store.create_environment("prod", None).expect("create env");
    store.link_profile("prod", "staging").expect("link");
    store.link_profile("prod", "staging").expect("relink");

    let prod = store
        .list_environments()
        .iter()
        .find(|e| e.name == "prod")
        .expect("prod env");
    assert_eq!(prod.profiles.len(), 1);
}

#[test]
fn test_link_missing_either_side_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);

    let err = store.link_profile("ghost", DEFAULT_PROFILE).unwrap_err();
    assert!(matches!(err, AppError::EnvironmentNotFound(_)));

    let err = store.link_profile(DEFAULT_ENVIRONMENT, "ghost").unwrap_err();
    assert!(matches!(err, AppError::ProfileNotFound(_)));
}

#[test]
fn test_unlink_clears_only_matching_back_reference() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);

    store.create_profile("staging").expect("create profile");
    store.create_environment("prod", None).expect("create env");
    store.create_environment("qa", None).expect("create env");
    store.link_profile("prod", "staging").expect("link");
    // Second link moves the back-reference to qa
    store.link_profile("qa", "staging").expect("link");

    store.unlink_profile("prod", "staging").expect("unlink");

    let staging = store
        .list_profiles()
        .iter()
        .find(|p| p.name == "staging")
        .expect("staging profile");
    // Back-reference points at qa, not prod, so it survives
    assert_eq!(staging.environment.as_deref(), Some("qa"));

    store.unlink_profile("qa", "staging").expect("unlink");
    let staging = store
        .list_profiles()
        .iter()
        .find(|p| p.name == "staging")
        .expect("staging profile");
    assert_eq!(staging.environment, None);
}

#[test]
fn test_unlink_not_linked_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);

    store.create_profile("staging").expect("create profile");
    store.create_environment("prod", None).expect("create env");

    let err = store.unlink_profile("prod", "staging").unwrap_err();
    assert!(matches!(err, AppError::ProfileNotLinked { .. }));

    let err = store.unlink_profile("ghost", "staging").unwrap_err();
    assert!(matches!(err, AppError::EnvironmentNotFound(_)));
}

#[test]
fn test_environment_switch_is_audited() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);

    store.create_environment("prod", None).expect("create env");
    store.set_environment("prod").expect("switch");

    let log = store.audit_log(&Default::default()).expect("audit");
    let actions: Vec<&str> = log.iter().map(|e| e.action.as_str()).collect();
    assert!(actions.contains(&"create_environment"));
    assert_eq!(log.last().expect("entry").action, "set_environment");
}

#[test]
fn test_validate_config_without_schema_is_trivially_valid() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open_store(&dir);

    let report = store.validate_config(None).expect("validate");
    assert!(report.valid);
    assert!(report.errors.is_empty());
}

#[test]
fn test_validate_config_uses_profile_schema_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);

    let mut schema_file = tempfile::NamedTempFile::new().expect("schema file");
    schema_file
        .write_all(
            br#"{
                "type": "object",
                "required": ["org-id"],
                "properties": { "org-id": { "type": "string", "minLength": 1 } }
            }"#,
        )
        .expect("write schema");
    store
        .set_value("schema-path", &schema_file.path().to_string_lossy())
        .expect("set schema-path");

    let report = store.validate_config(None).expect("validate");
    assert!(!report.valid, "empty org-id should violate minLength");
    assert!(!report.errors.is_empty());

    store.set_value("org-id", "org-1").expect("set org-id");
    let report = store.validate_config(None).expect("validate");
    assert!(report.valid);
}

#[test]
fn test_validate_config_missing_schema_file_is_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open_store(&dir);

    let err = store
        .validate_config(Some(std::path::Path::new("/nonexistent/schema.json")))
        .unwrap_err();
    assert!(matches!(err, AppError::SchemaError(_)));
}
