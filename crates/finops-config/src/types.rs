use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the profile that always exists and can never be deleted.
pub const DEFAULT_PROFILE: &str = "default";
/// Name of the environment created on first initialization.
pub const DEFAULT_ENVIRONMENT: &str = "default";

/// Well-known configuration keys with help descriptions.
///
/// Arbitrary additional keys are permitted (secrets use free-form keys);
/// these are the ones surfaced in `config set/get` help text.
pub const CONFIG_KEYS: [(&str, &str); 8] = [
    ("api-key", "API key used to authenticate against the platform"),
    ("org-id", "Organization ID for team features"),
    ("tenant-id", "Tenant ID for multi-tenant features"),
    ("default-template", "Default template to use for new projects"),
    ("environment", "Current environment (dev/staging/prod)"),
    (
        "vault-type",
        "Secrets vault type (aws-secrets, azure-keyvault, hashicorp)",
    ),
    ("vault-url", "URL of the secrets vault"),
    ("schema-path", "Path to a JSON schema file for validation"),
];

/// Returns true if `key` is one of the well-known configuration keys.
pub fn is_config_key(key: &str) -> bool {
    CONFIG_KEYS.iter().any(|(k, _)| *k == key)
}

/// Default config map every new profile starts from.
pub fn default_config() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("api-key".to_string(), String::new()),
        ("org-id".to_string(), String::new()),
        ("tenant-id".to_string(), String::new()),
        ("default-template".to_string(), "app".to_string()),
        ("environment".to_string(), String::new()),
    ])
}

/// A named bundle of configuration key/value pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
    /// Back-reference to the environment this profile is linked to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Declared but uninterpreted; round-tripped for forward compatibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default = "now")]
    pub last_modified: DateTime<Utc>,
}

impl Profile {
    /// Create a profile with the default config map.
    pub fn new(name: impl Into<String>, is_active: bool) -> Self {
        Self {
            name: name.into(),
            is_active,
            config: default_config(),
            environment: None,
            locked: None,
            last_modified: Utc::now(),
        }
    }
}

/// A named grouping of profiles representing a deployment context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub name: String,
    #[serde(default)]
    pub profiles: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
}

/// Immutable record appended on every mutating store operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// The persisted document: everything the store owns, in one JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub environments: Vec<Environment>,
    #[serde(default)]
    pub audit_log: Vec<AuditEntry>,
}

/// Where a secret should be written.
///
/// Only `Local` is implemented; the vault-backed stores are external
/// collaborators and the value is still cached in the local profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecretStore {
    #[default]
    Local,
    Vault,
    AwsSecrets,
    AzureKeyvault,
}

impl fmt::Display for SecretStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Vault => write!(f, "vault"),
            Self::AwsSecrets => write!(f, "aws-secrets"),
            Self::AzureKeyvault => write!(f, "azure-keyvault"),
        }
    }
}

/// Options for [`crate::ConfigStore::set_secret`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretOptions {
    pub encrypted: bool,
    pub store: SecretStore,
}

fn now() -> DateTime<Utc> {
    Utc::now()
}
