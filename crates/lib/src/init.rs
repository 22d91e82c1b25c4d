//! Initialize the configuration directory: create `~/.relay` and a config template with every key.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{Config, DiscordConfig, PapagoConfig, RelayConfig};

/// Config with every setting present but blank, so the file shows what to fill in.
pub fn config_template() -> Config {
    Config {
        discord: DiscordConfig {
            bot_token: Some(String::new()),
            korean_channel: Some(String::new()),
            japanese_channel: Some(String::new()),
        },
        papago: PapagoConfig {
            client_id: Some(String::new()),
            client_secret: Some(String::new()),
            api_url: None,
        },
        relay: RelayConfig::default(),
    }
}

/// Create the config directory and write the template if no config file exists.
/// An existing config file is left untouched.
pub fn init_config_dir(config_path: &Path) -> Result<PathBuf> {
    let config_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("creating config directory {}", config_dir.display()))?;

    if !config_path.exists() {
        let template = serde_json::to_string_pretty(&config_template())
            .context("serializing config template")?;
        std::fs::write(config_path, template)
            .with_context(|| format!("writing default config to {}", config_path.display()))?;
        log::info!("created config template at {}", config_path.display());
    } else {
        log::debug!("config already exists at {}, skipping", config_path.display());
    }

    Ok(config_dir.to_path_buf())
}
