use anyhow::{bail, Result};

use finops_config::ConfigStore;
use finops_core::OutputFormat;

/// Environment names are restricted at the CLI boundary; the store
/// itself accepts any non-colliding name (e.g. from imports).
fn validate_environment_name(name: &str) -> Result<()> {
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        bail!("Environment name can only contain letters, numbers, hyphens, and underscores");
    }
    if name.len() < 2 || name.len() > 32 {
        bail!("Environment name must be between 2 and 32 characters");
    }
    Ok(())
}

pub(crate) fn handle_create(
    store: &mut ConfigStore,
    name: &str,
    profile: Option<&str>,
) -> Result<()> {
    validate_environment_name(name)?;
    store.create_environment(name, profile)?;
    println!("Created environment: {name}");
    if let Some(profile) = profile {
        println!("Associated with profile: {profile}");
    }
    Ok(())
}

pub(crate) fn handle_use(store: &mut ConfigStore, name: &str) -> Result<()> {
    let activated = store.set_environment(name)?;
    println!("Switched to environment: {name}");
    match activated {
        Some(profile) => println!("Using profile: {profile}"),
        None => println!("No profiles linked; active profile unchanged"),
    }
    Ok(())
}

pub(crate) fn handle_list(store: &ConfigStore, format: OutputFormat) -> Result<()> {
    let environments = store.list_environments();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(environments)?);
        }
        OutputFormat::Text => {
            if environments.is_empty() {
                println!("No environments configured");
                return Ok(());
            }
            println!("Environments:");
            for environment in environments {
                let marker = if environment.is_active { "* " } else { "  " };
                println!("{marker}{}", environment.name);
                if environment.profiles.is_empty() {
                    println!("  No profiles linked");
                } else {
                    println!("  Profiles: {}", environment.profiles.join(", "));
                }
            }
            println!("\n* indicates active environment");
        }
    }
    Ok(())
}

pub(crate) fn handle_link(store: &mut ConfigStore, environment: &str, profile: &str) -> Result<()> {
    store.link_profile(environment, profile)?;
    println!("Linked profile {profile} to environment {environment}");
    Ok(())
}

pub(crate) fn handle_unlink(
    store: &mut ConfigStore,
    environment: &str,
    profile: &str,
) -> Result<()> {
    store.unlink_profile(environment, profile)?;
    println!("Unlinked profile {profile} from environment {environment}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_environment_name() {
        assert!(validate_environment_name("prod").is_ok());
        assert!(validate_environment_name("us-east_1").is_ok());

        assert!(validate_environment_name("p").is_err());
        assert!(validate_environment_name(&"x".repeat(33)).is_err());
        assert!(validate_environment_name("bad name").is_err());
        assert!(validate_environment_name("bad/name").is_err());
    }
}
