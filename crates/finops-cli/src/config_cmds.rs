use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};

use finops_config::types::{is_config_key, CONFIG_KEYS};
use finops_config::ConfigStore;
use finops_core::OutputFormat;

/// Mask values of key-like entries when rendering config to the terminal.
fn mask_value<'a>(key: &str, value: &'a str) -> &'a str {
    if key.contains("key") { "****" } else { value }
}

fn masked_config(config: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    config
        .iter()
        .map(|(key, value)| (key.clone(), mask_value(key, value).to_string()))
        .collect()
}

fn ensure_known_key(key: &str) -> Result<()> {
    if !is_config_key(key) {
        let keys: Vec<&str> = CONFIG_KEYS.iter().map(|(k, _)| *k).collect();
        bail!(
            "Invalid configuration key: {key}\nValid keys are: {}",
            keys.join(", ")
        );
    }
    Ok(())
}

pub(crate) fn handle_set(store: &mut ConfigStore, key: &str, value: &str) -> Result<()> {
    ensure_known_key(key)?;
    store.set_value(key, value)?;
    println!("Set {key}");
    Ok(())
}

pub(crate) fn handle_get(store: &ConfigStore, key: &str) -> Result<()> {
    ensure_known_key(key)?;
    println!("{}", store.get_value(key)?);
    Ok(())
}

pub(crate) fn handle_remove(store: &mut ConfigStore, key: &str) -> Result<()> {
    ensure_known_key(key)?;
    store.set_value(key, "")?;
    println!("Removed value for {key}");
    Ok(())
}

pub(crate) fn handle_reset(store: &mut ConfigStore) -> Result<()> {
    store.reset()?;
    println!("Reset configuration to default values");
    Ok(())
}

pub(crate) fn handle_list(store: &ConfigStore, format: OutputFormat) -> Result<()> {
    let profile = store.active_profile()?;
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&masked_config(&profile.config))?
            );
        }
        OutputFormat::Text => {
            println!("Configuration for profile: {}", profile.name);
            for (key, value) in &profile.config {
                println!("{key}: {}", mask_value(key, value));
            }
        }
    }
    Ok(())
}

pub(crate) fn handle_show(store: &ConfigStore, format: OutputFormat) -> Result<()> {
    let profiles = store.list_profiles();
    match format {
        OutputFormat::Json => {
            let masked: Vec<serde_json::Value> = profiles
                .iter()
                .map(|profile| {
                    serde_json::json!({
                        "name": profile.name,
                        "isActive": profile.is_active,
                        "environment": profile.environment,
                        "config": masked_config(&profile.config),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&masked)?);
        }
        OutputFormat::Text => {
            let active = store.active_profile()?;
            println!("Configuration Details:");
            println!("====================");
            println!("Active Profile: {}", active.name);
            println!("\nProfiles:");
            for profile in profiles {
                let marker = if profile.is_active { "* " } else { "  " };
                println!("{marker}{}", profile.name);
                for (key, value) in &profile.config {
                    println!("    {key}: {}", mask_value(key, value));
                }
                println!();
            }
        }
    }
    Ok(())
}

pub(crate) fn handle_export(store: &ConfigStore, file: &Path) -> Result<()> {
    let profiles = store.list_profiles();
    let json = serde_json::to_string_pretty(profiles)?;
    std::fs::write(file, json)
        .with_context(|| format!("Failed to write export file: {}", file.display()))?;
    println!("Exported {} profile(s) to {}", profiles.len(), file.display());
    Ok(())
}

pub(crate) fn handle_import(store: &mut ConfigStore, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;
    let payload: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Import file {} is not valid JSON", file.display()))?;
    let count = store.import_profiles(&payload)?;
    println!("Imported {count} profile(s) from {}", file.display());
    Ok(())
}

pub(crate) fn handle_whoami(store: &ConfigStore, verbose: bool) -> Result<()> {
    let profile = store.active_profile()?;
    println!("Current Context:");
    println!("===============");
    println!("Profile: {}", profile.name);
    println!(
        "Environment: {}",
        profile.environment.as_deref().unwrap_or("default")
    );

    if verbose {
        println!("\nConfiguration:");
        for (key, value) in &profile.config {
            if !key.contains("key") && !key.contains("secret") {
                println!("{key}: {value}");
            }
        }
    }
    Ok(())
}
