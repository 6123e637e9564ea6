use std::path::Path;

use anyhow::{Context, Result};

use finops_config::{AuditFilter, ConfigStore};
use finops_core::OutputFormat;

pub(crate) fn handle_audit(
    store: &ConfigStore,
    profile: Option<String>,
    action: Option<String>,
    time_period: Option<String>,
    export: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let filter = AuditFilter {
        profile,
        action,
        time_period,
    };
    let entries = store.audit_log(&filter)?;

    if let Some(path) = export {
        let json = serde_json::to_string_pretty(&entries)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write audit export: {}", path.display()))?;
        println!("Audit log exported to {}", path.display());
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            println!("Audit Log:");
            println!("==========");
            for entry in &entries {
                println!("\nTimestamp: {}", entry.timestamp.to_rfc3339());
                println!("Action: {}", entry.action);
                if let Some(key) = &entry.key {
                    println!("Key: {key}");
                }
                if let Some(profile) = &entry.profile {
                    println!("Profile: {profile}");
                }
                if let Some(user) = &entry.user {
                    println!("User: {user}");
                }
            }
        }
    }
    Ok(())
}
