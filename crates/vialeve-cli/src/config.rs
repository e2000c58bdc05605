//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use vialeve_core::rules::RuleConfig;

/// Environment variable holding the external scheduling link.
pub const SCHED_URL_ENV: &str = "VIALEVE_SCHED_URL";

/// Top-level vialeve configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VialeveConfig {
    /// External scheduling link offered to eligible patients. Absent value
    /// disables the affordance; it never errors.
    #[serde(default)]
    pub scheduling_url: Option<String>,
    /// Rule-engine settings.
    #[serde(default)]
    pub rules: RuleConfig,
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `vialeve.toml` in the current directory
/// 2. `~/.config/vialeve/config.toml`
///
/// `VIALEVE_SCHED_URL` overrides the scheduling link from either source.
pub fn load_config() -> Result<VialeveConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<VialeveConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("vialeve.toml");
        if local.exists() {
            Some(local)
        } else if let Some(global) = dirs_path().map(|d| d.join("config.toml")) {
            global.exists().then_some(global)
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<VialeveConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => VialeveConfig::default(),
    };

    if let Ok(url) = std::env::var(SCHED_URL_ENV) {
        if !url.trim().is_empty() {
            config.scheduling_url = Some(url);
        }
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("vialeve"))
}
