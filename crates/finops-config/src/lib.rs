//! Profile, environment and secret store persisted as a single JSON document.

pub mod audit;
pub mod crypto;
pub mod paths;
pub mod schema;
pub mod store;
pub mod types;

pub use audit::AuditFilter;
pub use schema::ValidationReport;
pub use store::ConfigStore;
pub use types::{
    AuditEntry, ConfigDocument, Environment, Profile, SecretOptions, SecretStore, CONFIG_KEYS,
    DEFAULT_ENVIRONMENT, DEFAULT_PROFILE,
};
