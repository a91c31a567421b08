//! Data directory and API URL resolution.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::{AppConfig, DEFAULT_API_URL};
use crate::store::write_atomic;

pub const DATA_DIR_ENV: &str = "USER_PORTAL_DATA_DIR";
pub const API_URL_ENV: &str = "USER_PORTAL_API_URL";
const DEFAULT_DATA_DIR: &str = ".user-portal";
const CONFIG_FILE: &str = "config.json";

/// `explicit`, else `$USER_PORTAL_DATA_DIR`, else `./.user-portal`.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| {
            std::env::var_os(DATA_DIR_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn read_config(data_dir: &Path) -> Result<AppConfig> {
    let path = data_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg: AppConfig = serde_json::from_slice(&bytes).context("parse config.json")?;
    if cfg.version != 1 {
        anyhow::bail!("unsupported config version {}", cfg.version);
    }
    Ok(cfg)
}

pub fn write_config(data_dir: &Path, cfg: &AppConfig) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(cfg).context("serialize config")?;
    write_atomic(&data_dir.join(CONFIG_FILE), &bytes).context("write config.json")
}

/// Flag, then environment, then `config.json`, then the built-in default.
pub fn resolve_api_url(explicit: Option<&str>, cfg: &AppConfig) -> String {
    let env = std::env::var(API_URL_ENV).ok();
    let url = [explicit, env.as_deref(), cfg.api_url.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|u| !u.is_empty())
        .unwrap_or(DEFAULT_API_URL);
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
