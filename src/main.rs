mod cli;
mod config;
mod detect;
mod download;
mod env;
mod index;
mod platform;
mod types;
mod update;
mod verify;


use anyhow::{anyhow, Result};
use clap::Parser;
use cli::{Cli, Commands, ConfigAction, TargetArgs, UpdateArgs};
use config::{
    get_setting, load_config, load_config_file, normalize_key, save_config, set_setting,
    unset_setting, SETTING_KEYS,
};
use platform::resolve_platform;
use types::{GoupdateConfig, GoupdateSettings, UpdateOutcome};
use update::{run_update, UpdateOptions};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli)?;

    let config = load_config()?;

    match cli.command.unwrap_or(Commands::Update(UpdateArgs::default())) {
        Commands::Version => {
            println!("goupdate {}", cli::get_version());
        }

        Commands::Update(args) => {
            let settings = settings_with_overrides(&config.settings, &args.target);
            let opts = UpdateOptions {
                platform: resolve_platform(args.target.os.as_deref(), args.target.arch.as_deref()),
                force: args.force,
                skip_delay: args.yes,
                check_only: false,
                quiet: cli.quiet,
            };

            match run_update(&settings, &opts).await? {
                UpdateOutcome::Installed { version, goroot } => {
                    tracing::info!("Installed {} at {}", version, goroot.display());
                }
                UpdateOutcome::NoRelease { suffix } => {
                    if !cli.quiet {
                        eprintln!("No release archive ending in {} found. Nothing to do", suffix);
                    }
                }
                UpdateOutcome::UpToDate { version } => {
                    tracing::debug!("{} already installed", version);
                }
                UpdateOutcome::Checked { .. } => {}
            }

            env::print_exports(&settings.install_root()?, &settings)?;
        }

        Commands::Check(target) => {
            let settings = settings_with_overrides(&config.settings, &target);
            let opts = UpdateOptions {
                platform: resolve_platform(target.os.as_deref(), target.arch.as_deref()),
                force: false,
                skip_delay: true,
                check_only: true,
                quiet: cli.quiet,
            };

            match run_update(&settings, &opts).await? {
                UpdateOutcome::Checked { latest, current } => {
                    let current = current.unwrap_or_else(|| "none".to_string());
                    if latest == current {
                        println!("{} is up to date", current);
                    } else {
                        println!("Update available: {} -> {}", current, latest);
                    }
                }
                UpdateOutcome::NoRelease { suffix } => {
                    println!("No release archive ending in {} found", suffix);
                }
                other => tracing::debug!("Unexpected check outcome: {:?}", other),
            }
        }

        Commands::Env(target) => {
            let settings = settings_with_overrides(&config.settings, &target);
            env::print_exports(&settings.install_root()?, &settings)?;
        }

        Commands::Config { action } => handle_config(&config, action)?,
    }

    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if cli.quiet {
        "error"
    } else if cli.verbose == 0 {
        "warn"
    } else if cli.verbose == 1 {
        "info"
    } else {
        "debug"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout is reserved for the export block
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}

fn settings_with_overrides(settings: &GoupdateSettings, target: &TargetArgs) -> GoupdateSettings {
    let mut settings = settings.clone();
    if let Some(source) = &target.source {
        settings.source_url = source.clone();
    }
    if let Some(root) = &target.install_root {
        settings.install_root = Some(root.clone());
    }
    settings
}

/// `get`/`show` report effective settings; `set`/`unset` edit the file only.
fn handle_config(config: &GoupdateConfig, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            if let Some(key) = key {
                let value = get_setting(&config.settings, &key)
                    .unwrap_or_else(|| format!("Setting '{}' not found", key));
                println!("{}", value);
            } else {
                println!("--- goupdate Settings ---");
                for key in SETTING_KEYS {
                    let value = get_setting(&config.settings, key).unwrap_or_default();
                    println!("  {}: {}", key, value);
                }
            }
        }
        ConfigAction::Set { args } => {
            let (key, value) = match args.as_slice() {
                [single] => single
                    .split_once('=')
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .ok_or_else(|| anyhow!("Invalid format. Use 'key=value' or 'key value'."))?,
                [key, value] => (key.clone(), value.clone()),
                _ => return Err(anyhow!("Invalid format. Use 'key=value' or 'key value'.")),
            };
            let mut stored = load_config_file()?;
            set_setting(&mut stored.settings, &key, &value)?;
            save_config(&stored)?;
            tracing::info!("Setting '{}' updated to '{}'", normalize_key(&key), value);
        }
        ConfigAction::Unset { key } => {
            let mut stored = load_config_file()?;
            unset_setting(&mut stored.settings, &key)?;
            save_config(&stored)?;
            tracing::info!("Setting '{}' unset", normalize_key(&key));
        }
        ConfigAction::Show { format } => match format.as_str() {
            "json" => println!("{}", serde_json::to_string_pretty(config)?),
            "yaml" => print!("{}", serde_yaml::to_string(config)?),
            "plain" => {
                for key in SETTING_KEYS {
                    let value = get_setting(&config.settings, key).unwrap_or_default();
                    println!("{}={}", key, value);
                }
            }
            other => return Err(anyhow!("Unknown format '{}'. Use json, yaml or plain", other)),
        },
    }
    Ok(())
}
