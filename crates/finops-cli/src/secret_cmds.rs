use anyhow::{anyhow, bail, Result};

use finops_config::types::{SecretOptions, SecretStore};
use finops_config::{crypto, ConfigStore};

pub(crate) fn handle_set(
    store: &mut ConfigStore,
    key: &str,
    value: &str,
    encrypt: bool,
    secret_store: SecretStore,
) -> Result<()> {
    store.set_secret(
        key,
        value,
        SecretOptions {
            encrypted: encrypt,
            store: secret_store,
        },
    )?;
    println!("Secret {key} set successfully");
    Ok(())
}

pub(crate) fn handle_get(store: &ConfigStore, key: &str, decrypt: bool) -> Result<()> {
    let value = store.get_value(key)?;
    if decrypt {
        let plaintext = crypto::decrypt(&value)?;
        println!("{key}: {plaintext}");
    } else {
        println!("{key}: {value}");
    }
    Ok(())
}

pub(crate) fn handle_list(store: &ConfigStore, no_values: bool) -> Result<()> {
    let profile = store.active_profile()?;
    println!("Secrets:");
    for (key, value) in &profile.config {
        if no_values {
            println!("{key}");
        } else {
            println!("{key}: {value}");
        }
    }
    Ok(())
}

/// Re-encrypt an encrypted secret under a fresh nonce. Plaintext secrets
/// are rejected rather than silently encrypted.
pub(crate) fn handle_rotate(store: &mut ConfigStore, key: &str) -> Result<()> {
    let current = store.get_value(key)?;
    if current.is_empty() {
        bail!("Secret '{key}' is not set");
    }
    let plaintext = crypto::decrypt(&current)
        .map_err(|_| anyhow!("Secret '{key}' is not encrypted; rotation only applies to encrypted secrets"))?;
    store.set_secret(
        key,
        &plaintext,
        SecretOptions {
            encrypted: true,
            store: SecretStore::Local,
        },
    )?;
    println!("Secret {key} rotated successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store(dir: &tempfile::TempDir) -> ConfigStore {
        ConfigStore::open_at(dir.path().join("config.json")).expect("open store")
    }

    #[test]
    fn test_rotate_changes_ciphertext_not_plaintext() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = open_store(&dir);
        store
            .set_secret(
                "db-pass",
                "hunter2",
                SecretOptions {
                    encrypted: true,
                    store: SecretStore::Local,
                },
            )
            .expect("set secret");
        let before = store.get_value("db-pass").expect("get");

        handle_rotate(&mut store, "db-pass").expect("rotate");

        let after = store.get_value("db-pass").expect("get");
        assert_ne!(before, after);
        assert_eq!(crypto::decrypt(&after).expect("decrypt"), "hunter2");
    }

    #[test]
    fn test_rotate_rejects_unset_and_plaintext_secrets() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = open_store(&dir);

        let err = handle_rotate(&mut store, "missing").unwrap_err();
        assert!(err.to_string().contains("is not set"));

        store
            .set_secret("plain", "value", SecretOptions::default())
            .expect("set secret");
        let err = handle_rotate(&mut store, "plain").unwrap_err();
        assert!(err.to_string().contains("not encrypted"));
    }
}
