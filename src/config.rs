use crate::types::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub const CONFIG_DIR_NAME: &str = ".goupdate";
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const SETTING_KEYS: &[&str] = &[
    "source_url",
    "go_binary",
    "install_root",
    "goproxy",
    "go111module",
    "download_delay_secs",
];

pub fn get_user_config_dir() -> Result<PathBuf> {
    let path = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join(CONFIG_DIR_NAME);
    Ok(path)
}

pub fn get_config_file_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("GOUPDATE_CONFIG_PATH") {
        return Ok(PathBuf::from(path));
    }
    let path = get_user_config_dir()?.join(CONFIG_FILE_NAME);
    tracing::debug!("Config file path: {}", path.display());
    Ok(path)
}

/// Settings as stored on disk, without environment overrides.
pub fn load_config_file() -> Result<GoupdateConfig> {
    let config_path = get_config_file_path()?;

    if !config_path.exists() {
        return Ok(GoupdateConfig::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Could not read config file at {}", config_path.display()))?;

    serde_json::from_str(&content).with_context(|| "Could not parse config file as JSON")
}

pub fn load_config() -> Result<GoupdateConfig> {
    let mut config = load_config_file()?;
    apply_env_overrides(&mut config.settings);
    Ok(config)
}

fn apply_env_overrides(settings: &mut GoupdateSettings) {
    if let Ok(url) = std::env::var("GOUPDATE_SOURCE_URL") {
        settings.source_url = url;
    }

    if let Ok(go_binary) = std::env::var("GOUPDATE_GO_BINARY") {
        settings.go_binary = go_binary;
    }

    if let Ok(root) = std::env::var("GOUPDATE_INSTALL_ROOT") {
        settings.install_root = Some(root);
    }

    if let Ok(proxy) = std::env::var("GOUPDATE_GOPROXY") {
        settings.goproxy = proxy;
    }

    if let Ok(delay) = std::env::var("GOUPDATE_DELAY_SECS") {
        match delay.parse::<u64>() {
            Ok(secs) => settings.download_delay_secs = secs,
            Err(_) => tracing::warn!("Ignoring invalid GOUPDATE_DELAY_SECS '{}'", delay),
        }
    }
}

pub fn save_config(config: &GoupdateConfig) -> Result<()> {
    let config_path = get_config_file_path()?;
    let config_dir = config_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Invalid config path"))?;

    fs::create_dir_all(config_dir)?;

    let content = serde_json::to_string_pretty(config)?;
    fs::write(&config_path, content)
        .with_context(|| format!("Could not write config file at {}", config_path.display()))?;

    Ok(())
}

pub fn normalize_key(key: &str) -> String {
    key.replace('-', "_")
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                format!("_{}", c.to_lowercase())
            } else {
                c.to_string()
            }
        })
        .collect::<String>()
        .to_lowercase()
}

pub fn get_setting(settings: &GoupdateSettings, key: &str) -> Option<String> {
    let value = match normalize_key(key).as_str() {
        "source_url" => settings.source_url.clone(),
        "go_binary" => settings.go_binary.clone(),
        "install_root" => settings.install_root.clone().unwrap_or_default(),
        "goproxy" => settings.goproxy.clone(),
        "go111module" => settings.go111module.clone(),
        "download_delay_secs" => settings.download_delay_secs.to_string(),
        _ => return None,
    };
    Some(value)
}

pub fn set_setting(settings: &mut GoupdateSettings, key: &str, value: &str) -> Result<()> {
    match normalize_key(key).as_str() {
        "source_url" => settings.source_url = value.to_string(),
        "go_binary" => settings.go_binary = value.to_string(),
        "install_root" => settings.install_root = Some(value.to_string()),
        "goproxy" => settings.goproxy = value.to_string(),
        "go111module" => settings.go111module = value.to_string(),
        "download_delay_secs" => {
            settings.download_delay_secs = value
                .parse()
                .with_context(|| format!("Invalid value for '{}': {}", key, value))?;
        }
        other => {
            anyhow::bail!(
                "'{}' is not a valid configuration setting. Valid settings: {}",
                other,
                SETTING_KEYS.join(", ")
            );
        }
    }
    Ok(())
}

pub fn unset_setting(settings: &mut GoupdateSettings, key: &str) -> Result<()> {
    let defaults = GoupdateSettings::default();
    match normalize_key(key).as_str() {
        "source_url" => settings.source_url = defaults.source_url,
        "go_binary" => settings.go_binary = defaults.go_binary,
        "install_root" => settings.install_root = defaults.install_root,
        "goproxy" => settings.goproxy = defaults.goproxy,
        "go111module" => settings.go111module = defaults.go111module,
        "download_delay_secs" => settings.download_delay_secs = defaults.download_delay_secs,
        other => {
            anyhow::bail!(
                "'{}' is not a valid configuration setting. Valid settings: {}",
                other,
                SETTING_KEYS.join(", ")
            );
        }
    }
    Ok(())
}
