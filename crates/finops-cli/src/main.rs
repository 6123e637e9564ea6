use anyhow::Result;
use clap::Parser;

mod audit_cmds;
mod cli;
mod config_cmds;
mod environment_cmds;
mod profile_cmds;
mod schema_cmds;
mod secret_cmds;

use cli::{
    Cli, Commands, ConfigCommands, EnvironmentCommands, ProfileCommands, SchemaCommands,
    SecretCommands,
};
use finops_config::ConfigStore;

fn main() -> Result<()> {
    // Initialize tracing (output to stderr, initialize only once)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();
    let format = cli.format;

    // One store per process invocation; every command re-reads the
    // document from disk and the last concurrent writer wins.
    let mut store = ConfigStore::open()?;
    tracing::debug!(path = %store.path().display(), "opened config store");

    match cli.command {
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Set { key, value } => {
                config_cmds::handle_set(&mut store, &key, &value)
            }
            ConfigCommands::Get { key } => config_cmds::handle_get(&store, &key),
            ConfigCommands::Remove { key } => config_cmds::handle_remove(&mut store, &key),
            ConfigCommands::Reset => config_cmds::handle_reset(&mut store),
            ConfigCommands::List => config_cmds::handle_list(&store, format),
            ConfigCommands::Show => config_cmds::handle_show(&store, format),
            ConfigCommands::Export { file } => config_cmds::handle_export(&store, &file),
            ConfigCommands::Import { file } => config_cmds::handle_import(&mut store, &file),
            ConfigCommands::Whoami { verbose } => config_cmds::handle_whoami(&store, verbose),
            ConfigCommands::Profile { cmd } => match cmd {
                ProfileCommands::Create { name } => {
                    profile_cmds::handle_create(&mut store, &name)
                }
                ProfileCommands::Use { name } => profile_cmds::handle_use(&mut store, &name),
                ProfileCommands::List => profile_cmds::handle_list(&store, format),
                ProfileCommands::Delete { name } => {
                    profile_cmds::handle_delete(&mut store, &name)
                }
            },
            ConfigCommands::Environment { cmd } => match cmd {
                EnvironmentCommands::Create { name, profile } => {
                    environment_cmds::handle_create(&mut store, &name, profile.as_deref())
                }
                EnvironmentCommands::Use { name } => {
                    environment_cmds::handle_use(&mut store, &name)
                }
                EnvironmentCommands::List => environment_cmds::handle_list(&store, format),
                EnvironmentCommands::Link {
                    environment,
                    profile,
                } => environment_cmds::handle_link(&mut store, &environment, &profile),
                EnvironmentCommands::Unlink {
                    environment,
                    profile,
                } => environment_cmds::handle_unlink(&mut store, &environment, &profile),
            },
            ConfigCommands::Secret { cmd } => match cmd {
                SecretCommands::Set {
                    key,
                    value,
                    encrypt,
                    store: secret_store,
                } => secret_cmds::handle_set(&mut store, &key, &value, encrypt, secret_store),
                SecretCommands::Get { key, decrypt } => {
                    secret_cmds::handle_get(&store, &key, decrypt)
                }
                SecretCommands::List { no_values } => {
                    secret_cmds::handle_list(&store, no_values)
                }
                SecretCommands::Rotate { key } => secret_cmds::handle_rotate(&mut store, &key),
            },
            ConfigCommands::Schema { cmd } => match cmd {
                SchemaCommands::Set { file } => schema_cmds::handle_set(&mut store, &file),
                SchemaCommands::Validate => schema_cmds::handle_validate(&store),
            },
            ConfigCommands::Audit {
                profile,
                action,
                time_period,
                export,
            } => audit_cmds::handle_audit(
                &store,
                profile,
                action,
                time_period,
                export.as_deref(),
                format,
            ),
        },
    }
}
