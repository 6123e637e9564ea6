use std::path::PathBuf;

use clap::{Parser, Subcommand};
use finops_config::types::CONFIG_KEYS;
use finops_config::SecretStore;
use finops_core::OutputFormat;

#[derive(Parser)]
#[command(name = "finops")]
#[command(about = "FinOps platform CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json)
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage CLI configuration and settings
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

/// Help footer listing the well-known configuration keys.
pub fn config_keys_help() -> String {
    let mut help = String::from("Configuration keys:\n");
    for (key, description) in CONFIG_KEYS {
        help.push_str(&format!("  {key:<20} {description}\n"));
    }
    help
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Set a configuration value in the active profile
    #[command(after_help = config_keys_help())]
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the configuration key
        value: String,
    },

    /// Get a configuration value from the active profile
    #[command(after_help = config_keys_help())]
    Get {
        /// Configuration key to retrieve
        key: String,
    },

    /// Remove a configuration value (clears it to empty)
    Remove {
        /// Configuration key to remove
        key: String,
    },

    /// Reset the active profile to default configuration
    Reset,

    /// List configuration values for the active profile
    List,

    /// Show detailed configuration for all profiles
    Show,

    /// Export profiles to a file
    Export {
        /// Path to export file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Import profiles from a file
    Import {
        /// Path to import file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display current user context
    Whoami {
        /// Show non-sensitive configuration values as well
        #[arg(long)]
        verbose: bool,
    },

    /// Manage configuration profiles
    Profile {
        #[command(subcommand)]
        cmd: ProfileCommands,
    },

    /// Manage configuration environments
    Environment {
        #[command(subcommand)]
        cmd: EnvironmentCommands,
    },

    /// Manage secrets and sensitive configuration
    Secret {
        #[command(subcommand)]
        cmd: SecretCommands,
    },

    /// Manage configuration schemas
    Schema {
        #[command(subcommand)]
        cmd: SchemaCommands,
    },

    /// View the configuration audit trail
    Audit {
        /// Filter by profile name
        #[arg(long)]
        profile: Option<String>,

        /// Filter by action type (e.g. set_value)
        #[arg(long)]
        action: Option<String>,

        /// Filter by inclusive START:END time period
        #[arg(long)]
        time_period: Option<String>,

        /// Export the filtered audit log to a JSON file
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Create a new profile
    Create {
        /// Name of the profile to create
        name: String,
    },
    /// Switch to a different profile
    Use {
        /// Name of the profile to switch to
        name: String,
    },
    /// List all available profiles
    List,
    /// Delete a profile
    Delete {
        /// Name of the profile to delete
        name: String,
    },
}

#[derive(Subcommand)]
pub enum EnvironmentCommands {
    /// Create a new environment
    Create {
        /// Name of the environment to create
        name: String,

        /// Associate with a profile
        #[arg(long)]
        profile: Option<String>,
    },
    /// Switch to an environment
    Use {
        /// Environment to switch to
        name: String,
    },
    /// List all environments
    List,
    /// Link a profile to an environment
    Link {
        /// Environment name
        environment: String,
        /// Profile to link
        profile: String,
    },
    /// Unlink a profile from an environment
    Unlink {
        /// Environment name
        environment: String,
        /// Profile to unlink
        profile: String,
    },
}

#[derive(Subcommand)]
pub enum SecretCommands {
    /// Set a secret value
    Set {
        /// Secret key to set
        key: String,
        /// Secret value
        value: String,

        /// Encrypt the value before storing it
        #[arg(long)]
        encrypt: bool,

        /// Storage target (local/vault/aws-secrets/azure-keyvault)
        #[arg(long, value_enum, default_value = "local")]
        store: SecretStore,
    },
    /// Get a secret value
    Get {
        /// Secret key to retrieve
        key: String,

        /// Decrypt the value
        #[arg(long)]
        decrypt: bool,
    },
    /// List all secrets in the active profile
    List {
        /// Only show keys
        #[arg(long)]
        no_values: bool,
    },
    /// Re-encrypt a secret with a fresh nonce
    Rotate {
        /// Secret to rotate
        key: String,
    },
}

#[derive(Subcommand)]
pub enum SchemaCommands {
    /// Set a schema file and validate against it
    Set {
        /// Path to schema file
        #[arg(long)]
        file: PathBuf,
    },
    /// Validate configuration against the configured schema
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_keys_help_lists_all_keys() {
        let help = config_keys_help();
        for (key, _) in CONFIG_KEYS {
            assert!(help.contains(key), "help should mention {key}");
        }
    }

    #[test]
    fn test_parse_profile_create() {
        let cli = Cli::parse_from(["finops", "config", "profile", "create", "staging"]);
        let Commands::Config { cmd } = cli.command;
        match cmd {
            ConfigCommands::Profile {
                cmd: ProfileCommands::Create { name },
            } => assert_eq!(name, "staging"),
            _ => panic!("expected profile create"),
        }
    }

    #[test]
    fn test_parse_secret_set_flags() {
        let cli = Cli::parse_from([
            "finops", "config", "secret", "set", "db-pass", "hunter2", "--encrypt", "--store",
            "vault",
        ]);
        let Commands::Config { cmd } = cli.command;
        match cmd {
            ConfigCommands::Secret {
                cmd:
                    SecretCommands::Set {
                        key,
                        value,
                        encrypt,
                        store,
                    },
            } => {
                assert_eq!(key, "db-pass");
                assert_eq!(value, "hunter2");
                assert!(encrypt);
                assert_eq!(store, SecretStore::Vault);
            }
            _ => panic!("expected secret set"),
        }
    }
}
