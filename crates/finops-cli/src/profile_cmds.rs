use anyhow::Result;

use finops_config::ConfigStore;
use finops_core::OutputFormat;

pub(crate) fn handle_create(store: &mut ConfigStore, name: &str) -> Result<()> {
    store.create_profile(name)?;
    println!("Created profile: {name}");
    Ok(())
}

pub(crate) fn handle_use(store: &mut ConfigStore, name: &str) -> Result<()> {
    store.set_active_profile(name)?;
    println!("Switched to profile: {name}");
    Ok(())
}

pub(crate) fn handle_list(store: &ConfigStore, format: OutputFormat) -> Result<()> {
    let profiles = store.list_profiles();
    match format {
        OutputFormat::Json => {
            let names: Vec<serde_json::Value> = profiles
                .iter()
                .map(|profile| {
                    serde_json::json!({
                        "name": profile.name,
                        "isActive": profile.is_active,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&names)?);
        }
        OutputFormat::Text => {
            println!("Available profiles:");
            for profile in profiles {
                let marker = if profile.is_active { "* " } else { "  " };
                println!("{marker}{}", profile.name);
            }
            println!("\n* indicates active profile");
        }
    }
    Ok(())
}

pub(crate) fn handle_delete(store: &mut ConfigStore, name: &str) -> Result<()> {
    store.delete_profile(name)?;
    println!("Deleted profile: {name}");
    Ok(())
}
