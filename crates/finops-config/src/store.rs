//! The configuration store: profiles, environments and the audit trail,
//! persisted as one JSON document.
//!
//! Every mutating operation rewrites the whole document. The store is
//! opened once per process invocation and there is no cross-process
//! coordination: two concurrent invocations each load their own snapshot
//! and the last writer wins. Audit entries are appended after the
//! operation's own persist, so a logical mutation writes the file twice.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

use finops_core::AppError;

use crate::audit::{self, AuditFilter};
use crate::crypto;
use crate::paths;
use crate::schema::{self, ValidationReport};
use crate::types::{
    default_config, AuditEntry, ConfigDocument, Environment, Profile, SecretOptions, SecretStore,
    DEFAULT_ENVIRONMENT, DEFAULT_PROFILE,
};

/// Handle to the persisted configuration document.
///
/// Constructed once by the CLI entry point and passed into command
/// handlers; there is no process-wide singleton.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    document: ConfigDocument,
}

impl ConfigStore {
    /// Open the store at the default per-user location, initializing it
    /// with defaults if it does not exist yet.
    pub fn open() -> Result<Self, AppError> {
        let path = paths::store_file().ok_or(AppError::NoConfigDir)?;
        Self::open_at(path)
    }

    /// Open the store at an explicit path.
    ///
    /// A missing file initializes fresh defaults and persists them. A
    /// file that exists but cannot be read or parsed is a fatal error:
    /// silently replacing it would discard the user's data.
    pub fn open_at(path: PathBuf) -> Result<Self, AppError> {
        let Some(document) = Self::read_document(&path)? else {
            tracing::debug!(path = %path.display(), "no config store on disk, writing defaults");
            let mut store = Self {
                path,
                document: ConfigDocument::default(),
            };
            store.document.profiles.push(Profile::new(DEFAULT_PROFILE, true));
            store.document.environments.push(Environment {
                name: DEFAULT_ENVIRONMENT.to_string(),
                profiles: vec![DEFAULT_PROFILE.to_string()],
                is_active: true,
            });
            store.save()?;
            return Ok(store);
        };

        let mut store = Self { path, document };
        if store.ensure_defaults() {
            store.save()?;
        }
        Ok(store)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(path: &Path) -> Result<Option<ConfigDocument>, AppError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(persistence("read", path, e)),
        };
        let document = serde_json::from_str(&content).map_err(|e| AppError::CorruptStore {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Some(document))
    }

    /// Recreate a missing `default` profile/environment after load.
    ///
    /// The repaired default only becomes active when nothing else is,
    /// keeping the one-active-profile invariant. Returns true if the
    /// document changed.
    fn ensure_defaults(&mut self) -> bool {
        let mut repaired = false;

        if !self.document.profiles.iter().any(|p| p.name == DEFAULT_PROFILE) {
            tracing::warn!("default profile missing from store, recreating");
            let activate = !self.document.profiles.iter().any(|p| p.is_active);
            self.document
                .profiles
                .push(Profile::new(DEFAULT_PROFILE, activate));
            repaired = true;
        }

        if !self
            .document
            .environments
            .iter()
            .any(|e| e.name == DEFAULT_ENVIRONMENT)
        {
            tracing::warn!("default environment missing from store, recreating");
            let activate = !self.document.environments.iter().any(|e| e.is_active);
            self.document.environments.push(Environment {
                name: DEFAULT_ENVIRONMENT.to_string(),
                profiles: vec![DEFAULT_PROFILE.to_string()],
                is_active: activate,
            });
            repaired = true;
        }

        repaired
    }

    /// Serialize and atomically replace the backing file.
    fn save(&self) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(&self.document)
            .map_err(|e| persistence("serialize", &self.path, std::io::Error::other(e)))?;

        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).map_err(|e| persistence("create", &self.path, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| persistence("write", &self.path, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| persistence("write", &self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| persistence("write", &self.path, e.error))?;
        Ok(())
    }

    /// Append an audit entry stamped with the currently active profile,
    /// then persist. Called by every mutating operation after its own
    /// persist.
    fn add_audit_entry(
        &mut self,
        action: &str,
        key: Option<&str>,
        value: Option<&str>,
    ) -> Result<(), AppError> {
        let profile = self
            .document
            .profiles
            .iter()
            .find(|p| p.is_active)
            .map(|p| p.name.clone());
        self.document.audit_log.push(AuditEntry {
            timestamp: Utc::now(),
            action: action.to_string(),
            key: key.map(str::to_string),
            value: value.map(str::to_string),
            profile,
            user: std::env::var("USER").ok(),
        });
        self.save()
    }

    fn profile_index(&self, name: &str) -> Option<usize> {
        self.document.profiles.iter().position(|p| p.name == name)
    }

    fn environment_index(&self, name: &str) -> Option<usize> {
        self.document.environments.iter().position(|e| e.name == name)
    }

    fn active_profile_mut(&mut self) -> Result<&mut Profile, AppError> {
        self.document
            .profiles
            .iter_mut()
            .find(|p| p.is_active)
            .ok_or(AppError::NoActiveProfile)
    }

    // ----- profiles -----

    /// The profile with `is_active` set. Absence is an invariant
    /// violation after initialization.
    pub fn active_profile(&self) -> Result<&Profile, AppError> {
        self.document
            .profiles
            .iter()
            .find(|p| p.is_active)
            .ok_or(AppError::NoActiveProfile)
    }

    pub fn list_profiles(&self) -> &[Profile] {
        &self.document.profiles
    }

    /// Create an inactive profile with the default config map.
    pub fn create_profile(&mut self, name: &str) -> Result<(), AppError> {
        if self.profile_index(name).is_some() {
            return Err(AppError::ProfileExists(name.to_string()));
        }
        self.document.profiles.push(Profile::new(name, false));
        self.save()?;
        self.add_audit_entry("create_profile", Some(name), None)
    }

    pub fn set_active_profile(&mut self, name: &str) -> Result<(), AppError> {
        if self.profile_index(name).is_none() {
            return Err(AppError::ProfileNotFound(name.to_string()));
        }
        self.activate_profile(name);
        self.save()?;
        self.add_audit_entry("set_active_profile", Some(name), None)
    }

    fn activate_profile(&mut self, name: &str) {
        for profile in &mut self.document.profiles {
            profile.is_active = profile.name == name;
            if profile.is_active {
                profile.last_modified = Utc::now();
            }
        }
    }

    /// Delete a profile. The `default` profile is protected; deleting
    /// the active profile hands active status back to `default` first,
    /// and the profile is removed from every environment's link list.
    pub fn delete_profile(&mut self, name: &str) -> Result<(), AppError> {
        if name == DEFAULT_PROFILE {
            return Err(AppError::DefaultProfileProtected);
        }
        let index = self
            .profile_index(name)
            .ok_or_else(|| AppError::ProfileNotFound(name.to_string()))?;

        if self.document.profiles[index].is_active {
            self.activate_profile(DEFAULT_PROFILE);
        }
        for environment in &mut self.document.environments {
            environment.profiles.retain(|p| p != name);
        }
        self.document.profiles.remove(index);
        self.save()?;
        self.add_audit_entry("delete_profile", Some(name), None)
    }

    // ----- key/value and secrets -----

    /// Value for `key` in the active profile, or the empty string when
    /// the key is unset. Unknown keys are not an error.
    pub fn get_value(&self, key: &str) -> Result<String, AppError> {
        let active = self.active_profile()?;
        Ok(active.config.get(key).cloned().unwrap_or_default())
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        let profile = self.active_profile_mut()?;
        profile.config.insert(key.to_string(), value.to_string());
        profile.last_modified = Utc::now();
        self.save()?;
        self.add_audit_entry("set_value", Some(key), Some(value))
    }

    /// Replace the active profile's config with the defaults.
    pub fn reset(&mut self) -> Result<(), AppError> {
        let profile = self.active_profile_mut()?;
        profile.config = default_config();
        profile.last_modified = Utc::now();
        self.save()?;
        self.add_audit_entry("reset_config", None, None)
    }

    /// Store a secret in the active profile, encrypting it first when
    /// asked. Non-local stores are external collaborators: the target is
    /// noted but the value is only written to the local profile. The
    /// audit entry records the key, never the value.
    pub fn set_secret(
        &mut self,
        key: &str,
        value: &str,
        options: SecretOptions,
    ) -> Result<(), AppError> {
        let stored = if options.encrypted {
            crypto::encrypt(value)?
        } else {
            value.to_string()
        };
        if options.store != SecretStore::Local {
            tracing::warn!(
                store = %options.store,
                "external secret store is not configured; storing locally only"
            );
        }
        let profile = self.active_profile_mut()?;
        profile.config.insert(key.to_string(), stored);
        profile.last_modified = Utc::now();
        self.save()?;
        self.add_audit_entry("set_secret", Some(key), None)
    }

    // ----- environments -----

    pub fn list_environments(&self) -> &[Environment] {
        &self.document.environments
    }

    /// Create an inactive environment, optionally pre-linked to one
    /// existing profile.
    pub fn create_environment(
        &mut self,
        name: &str,
        profile: Option<&str>,
    ) -> Result<(), AppError> {
        if self.environment_index(name).is_some() {
            return Err(AppError::EnvironmentExists(name.to_string()));
        }
        if let Some(profile_name) = profile {
            if self.profile_index(profile_name).is_none() {
                return Err(AppError::ProfileNotFound(profile_name.to_string()));
            }
        }
        self.document.environments.push(Environment {
            name: name.to_string(),
            profiles: profile.map(str::to_string).into_iter().collect(),
            is_active: false,
        });
        self.save()?;
        self.add_audit_entry("create_environment", Some(name), None)
    }

    /// Activate an environment. Switching also activates the first
    /// profile linked to it; the returned name reports which profile, if
    /// any, became active.
    pub fn set_environment(&mut self, name: &str) -> Result<Option<String>, AppError> {
        let index = self
            .environment_index(name)
            .ok_or_else(|| AppError::EnvironmentNotFound(name.to_string()))?;

        let linked = self.document.environments[index].profiles.first().cloned();
        if let Some(profile_name) = &linked {
            if self.profile_index(profile_name).is_none() {
                return Err(AppError::ProfileNotFound(profile_name.clone()));
            }
        }

        for (i, environment) in self.document.environments.iter_mut().enumerate() {
            environment.is_active = i == index;
        }
        if let Some(profile_name) = &linked {
            self.activate_profile(profile_name);
        }
        self.save()?;
        self.add_audit_entry("set_environment", Some(name), None)?;
        Ok(linked)
    }

    /// Link a profile to an environment. Linking an already-linked pair
    /// is a no-op that still succeeds (and is still audited).
    pub fn link_profile(&mut self, env_name: &str, profile_name: &str) -> Result<(), AppError> {
        let env_index = self
            .environment_index(env_name)
            .ok_or_else(|| AppError::EnvironmentNotFound(env_name.to_string()))?;
        let profile_index = self
            .profile_index(profile_name)
            .ok_or_else(|| AppError::ProfileNotFound(profile_name.to_string()))?;

        let environment = &mut self.document.environments[env_index];
        if !environment.profiles.iter().any(|p| p == profile_name) {
            environment.profiles.push(profile_name.to_string());
            self.document.profiles[profile_index].environment = Some(env_name.to_string());
        }
        self.save()?;
        self.add_audit_entry("link_profile", Some(profile_name), Some(env_name))
    }

    /// Remove a profile/environment link. The profile's back-reference
    /// is cleared only when it points at this environment.
    pub fn unlink_profile(&mut self, env_name: &str, profile_name: &str) -> Result<(), AppError> {
        let env_index = self
            .environment_index(env_name)
            .ok_or_else(|| AppError::EnvironmentNotFound(env_name.to_string()))?;
        if !self.document.environments[env_index]
            .profiles
            .iter()
            .any(|p| p == profile_name)
        {
            return Err(AppError::ProfileNotLinked {
                profile: profile_name.to_string(),
                environment: env_name.to_string(),
            });
        }

        self.document.environments[env_index]
            .profiles
            .retain(|p| p != profile_name);
        if let Some(index) = self.profile_index(profile_name) {
            let profile = &mut self.document.profiles[index];
            if profile.environment.as_deref() == Some(env_name) {
                profile.environment = None;
            }
        }
        self.save()?;
        self.add_audit_entry("unlink_profile", Some(profile_name), Some(env_name))
    }

    // ----- audit, schema, import -----

    /// The audit log, filtered. Returns a new sequence; the stored log
    /// is never mutated.
    pub fn audit_log(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, AppError> {
        audit::filter_entries(&self.document.audit_log, filter)
    }

    /// Validate the active profile's config against a JSON schema.
    ///
    /// The schema path resolves from the argument, then the profile's
    /// own `schema-path` key; with neither set the config is trivially
    /// valid.
    pub fn validate_config(
        &self,
        schema_path: Option<&Path>,
    ) -> Result<ValidationReport, AppError> {
        let active = self.active_profile()?;
        let resolved = schema_path.map(Path::to_path_buf).or_else(|| {
            active
                .config
                .get("schema-path")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from)
        });
        match resolved {
            Some(path) => schema::validate_config_map(&active.config, &path),
            None => Ok(ValidationReport::trivially_valid()),
        }
    }

    /// Wholesale-replace the profile list from an import payload.
    ///
    /// Every entry must be an object with a non-empty string `name` and
    /// an object `config`; any violation rejects the whole payload and
    /// leaves the store untouched. Environments and the audit log are
    /// not reconciled against the new list.
    pub fn import_profiles(&mut self, payload: &serde_json::Value) -> Result<usize, AppError> {
        let entries = payload
            .as_array()
            .ok_or_else(|| AppError::InvalidImport("expected a JSON array of profiles".into()))?;

        let mut imported = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let object = entry
                .as_object()
                .ok_or_else(|| AppError::InvalidImport(format!("entry {index} is not an object")))?;
            if !object
                .get("name")
                .and_then(|name| name.as_str())
                .is_some_and(|name| !name.is_empty())
            {
                return Err(AppError::InvalidImport(format!(
                    "entry {index} is missing a non-empty 'name'"
                )));
            }
            if !object.get("config").is_some_and(|config| config.is_object()) {
                return Err(AppError::InvalidImport(format!(
                    "entry {index} is missing an object 'config'"
                )));
            }
            let profile: Profile = serde_json::from_value(entry.clone())
                .map_err(|e| AppError::InvalidImport(format!("entry {index}: {e}")))?;
            imported.push(profile);
        }

        let count = imported.len();
        self.document.profiles = imported;
        self.save()?;
        self.add_audit_entry("import_profiles", None, None)?;
        Ok(count)
    }
}

fn persistence(op: &'static str, path: &Path, source: std::io::Error) -> AppError {
    AppError::Persistence {
        op,
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;

#[cfg(test)]
#[path = "store_tests_env.rs"]
mod env_tests;
