//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.relay/config.json`), a `.env` file and the
//! environment. Environment values win over the file. The resolved `RelaySettings` are
//! built once at startup and never re-read.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::routing::{ChannelPair, ChannelPairError};

pub const ENV_BOT_TOKEN: &str = "BOT_TOKEN";
pub const ENV_NAVER_CLIENT_ID: &str = "NAVER_CLIENT_ID";
pub const ENV_NAVER_CLIENT_SECRET: &str = "NAVER_CLIENT_SECRET";
pub const ENV_CH_KOREAN: &str = "CH_KOREAN";
pub const ENV_CH_JAPANESE: &str = "CH_JAPANESE";
pub const ENV_PAPAGO_API_URL: &str = "PAPAGO_API_URL";

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Discord bot token and the relayed channel pair.
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Papago API credentials.
    #[serde(default)]
    pub papago: PapagoConfig,

    /// Relay behavior.
    #[serde(default)]
    pub relay: RelayConfig,
}

/// Discord settings. Each field is overridden by its environment variable when set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordConfig {
    /// Bot token. Overridden by BOT_TOKEN.
    pub bot_token: Option<String>,
    /// Korean channel id. Overridden by CH_KOREAN.
    pub korean_channel: Option<String>,
    /// Japanese channel id. Overridden by CH_JAPANESE.
    pub japanese_channel: Option<String>,
}

/// Papago settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PapagoConfig {
    /// Overridden by NAVER_CLIENT_ID.
    pub client_id: Option<String>,
    /// Overridden by NAVER_CLIENT_SECRET.
    pub client_secret: Option<String>,
    /// Endpoint override (default: public n2mt endpoint). Overridden by PAPAGO_API_URL.
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayConfig {
    /// Post a short notice in the origin channel when a translation fails. Default: false.
    #[serde(default)]
    pub notify_failures: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "missing required settings: {}; set them in the environment, a .env file, or the config file",
        .0.join(", ")
    )]
    Missing(Vec<&'static str>),
    #[error("invalid channel pair: {0}")]
    Channels(#[from] ChannelPairError),
}

/// Resolved Papago credentials and endpoint.
#[derive(Clone)]
pub struct PapagoSettings {
    pub client_id: String,
    pub client_secret: String,
    pub api_url: Option<String>,
}

/// Fully resolved startup settings.
#[derive(Clone)]
pub struct RelaySettings {
    pub bot_token: String,
    pub papago: PapagoSettings,
    pub channels: ChannelPair,
    pub notify_failures: bool,
}

impl std::fmt::Debug for PapagoSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PapagoSettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl std::fmt::Debug for RelaySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelaySettings")
            .field("bot_token", &"<redacted>")
            .field("papago", &self.papago)
            .field("channels", &self.channels)
            .field("notify_failures", &self.notify_failures)
            .finish()
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Env value (when non-blank) else the config value (when non-blank).
fn resolve_with<F>(lookup: &F, key: &str, fallback: Option<&String>) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    non_blank(lookup(key)).or_else(|| non_blank(fallback.cloned()))
}

/// Resolve settings from `config` and the process environment.
pub fn resolve_settings(config: &Config) -> Result<RelaySettings, ConfigError> {
    resolve_settings_with(config, |key| std::env::var(key).ok())
}

/// Resolve only the Papago settings from `config` and the process environment.
pub fn resolve_papago(config: &Config) -> Result<PapagoSettings, ConfigError> {
    resolve_papago_with(config, |key| std::env::var(key).ok())
}

/// Keys from `required` whose value is absent, in order.
fn missing_keys(required: &[(&'static str, bool)]) -> Vec<&'static str> {
    required
        .iter()
        .filter(|(_, present)| !present)
        .map(|(key, _)| *key)
        .collect()
}

/// Resolve Papago settings using `lookup` for environment values.
pub fn resolve_papago_with<F>(config: &Config, lookup: F) -> Result<PapagoSettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let client_id = resolve_with(&lookup, ENV_NAVER_CLIENT_ID, config.papago.client_id.as_ref());
    let client_secret = resolve_with(
        &lookup,
        ENV_NAVER_CLIENT_SECRET,
        config.papago.client_secret.as_ref(),
    );
    let api_url = resolve_with(&lookup, ENV_PAPAGO_API_URL, config.papago.api_url.as_ref());
    match (client_id, client_secret) {
        (Some(client_id), Some(client_secret)) => Ok(PapagoSettings {
            client_id,
            client_secret,
            api_url,
        }),
        (client_id, client_secret) => Err(ConfigError::Missing(missing_keys(&[
            (ENV_NAVER_CLIENT_ID, client_id.is_some()),
            (ENV_NAVER_CLIENT_SECRET, client_secret.is_some()),
        ]))),
    }
}

/// Resolve settings using `lookup` for environment values. Reports every missing key at once.
pub fn resolve_settings_with<F>(config: &Config, lookup: F) -> Result<RelaySettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let bot_token = resolve_with(&lookup, ENV_BOT_TOKEN, config.discord.bot_token.as_ref());
    let papago = resolve_papago_with(config, &lookup);
    let korean = resolve_with(&lookup, ENV_CH_KOREAN, config.discord.korean_channel.as_ref());
    let japanese = resolve_with(
        &lookup,
        ENV_CH_JAPANESE,
        config.discord.japanese_channel.as_ref(),
    );

    match (bot_token, papago, korean, japanese) {
        (Some(bot_token), Ok(papago), Some(korean), Some(japanese)) => Ok(RelaySettings {
            bot_token,
            papago,
            channels: ChannelPair::new(korean, japanese)?,
            notify_failures: config.relay.notify_failures,
        }),
        (bot_token, papago, korean, japanese) => {
            let papago_missing = match papago {
                Err(ConfigError::Missing(keys)) => keys,
                _ => Vec::new(),
            };
            let mut missing = missing_keys(&[(ENV_BOT_TOKEN, bot_token.is_some())]);
            missing.extend(papago_missing);
            missing.extend(missing_keys(&[
                (ENV_CH_KOREAN, korean.is_some()),
                (ENV_CH_JAPANESE, japanese.is_some()),
            ]));
            Err(ConfigError::Missing(missing))
        }
    }
}

/// Outcome of loading a `.env` file: the path loaded, `None` when there is no file.
pub type DotenvResult = dotenvy::Result<Option<PathBuf>>;

fn dotenv_found(result: dotenvy::Result<PathBuf>) -> DotenvResult {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Load `.env` from the working directory (or a parent). Existing environment variables are kept.
/// Runs before the logger is set up (so RUST_LOG from `.env` applies); pass the result to
/// `dotenv_warning` once logging works.
pub fn load_dotenv() -> DotenvResult {
    dotenv_found(dotenvy::dotenv())
}

/// Load a specific `.env` file. A missing file is `Ok(None)`.
pub fn load_dotenv_from(path: &Path) -> DotenvResult {
    dotenv_found(dotenvy::from_path(path).map(|()| path.to_path_buf()))
}

/// Warning text for a `.env` that exists but could not be parsed. Parsing stops at the bad
/// line, so later keys in the file are not loaded either.
pub fn dotenv_warning(result: &DotenvResult) -> Option<String> {
    match result {
        Err(e) => Some(format!(
            ".env could not be loaded, keys at and after the bad line are ignored: {}",
            e
        )),
        Ok(_) => None,
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("RELAY_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".relay").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load config from the default path (or RELAY_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
