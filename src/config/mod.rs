use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub pinger: PingerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Lyrics lookup executable (syncedlyrics compatible).
    pub program: String,
    /// Pass `-v` so the backend logs which provider answered.
    pub verbose: bool,
    /// Upper bound for a single lookup; unbounded when unset.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PingerConfig {
    /// Public URL of this service; the self-pinger is off when unset.
    pub service_url: Option<String>,
    pub interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            program: "syncedlyrics".to_string(),
            verbose: true,
            timeout_secs: None,
        }
    }
}

impl Default for PingerConfig {
    fn default() -> Self {
        Self {
            service_url: None,
            interval_secs: 300,
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Let `PORT`, `SERVICE_URL` and `SELF_PING_INTERVAL` override the file.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            match port.trim().parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!("ignoring invalid PORT={port}"),
            }
        }
        if let Some(url) = lookup("SERVICE_URL") {
            let url = url.trim();
            self.pinger.service_url = (!url.is_empty()).then(|| url.to_string());
        }
        if let Some(secs) = lookup("SELF_PING_INTERVAL") {
            match secs.trim().parse() {
                Ok(s) => self.pinger.interval_secs = s,
                Err(_) => tracing::warn!("ignoring invalid SELF_PING_INTERVAL={secs}"),
            }
        }
    }
}

pub fn save(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    write(cfg, &path)
}

fn write(cfg: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from("dev", "lyrics-api", "lyrics-api")
        .context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

/// Load the config file, writing the defaults first if there is none.
pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        let cfg = Config::default();
        write(&cfg, &path)?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
