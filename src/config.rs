use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::hours::BusinessHours;
use crate::prompt::Persona;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub whatsapp: WhatsAppConfig,
    pub relay: RelayConfig,
    pub persona: Persona,
    pub hours: BusinessHours,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 200,
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    pub sidecar_url: String,
    pub inbound_path: String,
    pub events_path: String,
    pub client_id: String,
    pub session_path: String,
    /// Base URL the sidecar uses to reach this server; sent on `/init` when set.
    pub public_url: Option<String>,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            sidecar_url: "http://127.0.0.1:4040".to_string(),
            inbound_path: "/v1/channels/whatsapp/inbound".to_string(),
            events_path: "/v1/channels/whatsapp/events".to_string(),
            client_id: "default".to_string(),
            session_path: "/wwebjs_data".to_string(),
            public_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub allowed_sender: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            allowed_sender: "6285190338194@c.us".to_string(),
        }
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn resolve_config_path() -> PathBuf {
    env::var("RELAY_CONFIG")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| expand_tilde("~/.smartfix-relay/relay.json"))
}

/// Reads a JSON config file. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str::<Config>(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_config() -> Config {
    let path = resolve_config_path();
    let mut cfg = match load_config_from(&path) {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::warn!("{err}; using defaults");
            Config::default()
        }
    };
    apply_env_overrides(&mut cfg);
    cfg
}

fn non_blank(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub fn apply_env_overrides(cfg: &mut Config) {
    if let Some(port) = non_blank("PORT") {
        match port.trim().parse::<u16>() {
            Ok(port) => cfg.server.port = port,
            Err(_) => tracing::warn!(value = %port, "ignoring invalid PORT"),
        }
    }

    if let Some(key) = non_blank("OPENAI_API_KEY") {
        cfg.llm.api_key = Some(key);
    }

    if let Some(url) = non_blank("OPENAI_BASE_URL") {
        cfg.llm.base_url = url;
    }

    if let Some(model) = non_blank("OPENAI_MODEL") {
        cfg.llm.model = model;
    }

    if let Some(sender) = non_blank("RELAY_ALLOWED_SENDER") {
        cfg.relay.allowed_sender = sender.trim().to_string();
    }

    if let Some(url) = non_blank("WHATSAPP_SIDECAR_URL") {
        cfg.whatsapp.sidecar_url = url;
    }

    if let Some(path) = non_blank("WHATSAPP_SESSION_PATH") {
        cfg.whatsapp.session_path = path;
    }

    if let Some(url) = non_blank("RELAY_PUBLIC_URL") {
        cfg.whatsapp.public_url = Some(url);
    }
}
