use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("No active profile found")]
    NoActiveProfile,

    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("Profile '{0}' already exists")]
    ProfileExists(String),

    #[error("Environment '{0}' not found")]
    EnvironmentNotFound(String),

    #[error("Environment '{0}' already exists")]
    EnvironmentExists(String),

    #[error("The default profile cannot be deleted")]
    DefaultProfileProtected,

    #[error("Profile '{profile}' is not linked to environment '{environment}'")]
    ProfileNotLinked {
        profile: String,
        environment: String,
    },

    #[error("Invalid profile import: {0}")]
    InvalidImport(String),

    #[error("Invalid time period '{0}': expected START:END where each side is RFC 3339 or YYYY-MM-DD")]
    InvalidTimePeriod(String),

    #[error("Could not determine the user configuration directory")]
    NoConfigDir,

    #[error("Failed to {op} config store {path}: {source}")]
    Persistence {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config store {path} is not a valid config document: {source}")]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Schema validation failed: {0}")]
    SchemaError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_no_active_profile() {
        let err = AppError::NoActiveProfile;
        assert_eq!(err.to_string(), "No active profile found");
    }

    #[test]
    fn test_display_profile_not_found() {
        let err = AppError::ProfileNotFound("staging".into());
        assert_eq!(err.to_string(), "Profile 'staging' not found");
    }

    #[test]
    fn test_display_profile_exists() {
        let err = AppError::ProfileExists("staging".into());
        assert_eq!(err.to_string(), "Profile 'staging' already exists");
    }

    #[test]
    fn test_display_default_profile_protected() {
        let err = AppError::DefaultProfileProtected;
        assert_eq!(err.to_string(), "The default profile cannot be deleted");
    }

    #[test]
    fn test_display_profile_not_linked() {
        let err = AppError::ProfileNotLinked {
            profile: "staging".into(),
            environment: "prod".into(),
        };
        assert_eq!(
            err.to_string(),
            "Profile 'staging' is not linked to environment 'prod'"
        );
    }

    #[test]
    fn test_display_invalid_import() {
        let err = AppError::InvalidImport("entry 0: missing 'config'".into());
        assert_eq!(
            err.to_string(),
            "Invalid profile import: entry 0: missing 'config'"
        );
    }

    #[test]
    fn test_display_persistence_carries_path() {
        let err = AppError::Persistence {
            op: "write",
            path: PathBuf::from("/tmp/config.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/config.json"));
        assert!(err.to_string().contains("write"));
    }

    #[test]
    fn test_display_boundary_values() {
        // Empty names still render
        let err = AppError::ProfileNotFound(String::new());
        assert_eq!(err.to_string(), "Profile '' not found");

        let err = AppError::EnvironmentExists(String::new());
        assert_eq!(err.to_string(), "Environment '' already exists");
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AppError>();
    }
}
