use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/mdv/config.toml`.
///
/// Every field has a default, so a missing or empty file behaves like no
/// file at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MdvConfig {
    /// Fixed hashing chunk size in bytes; None = sized from available memory.
    #[serde(default)]
    pub chunk_size_bytes: Option<u64>,
    /// Exit nonzero when a completed run has FAIL/MISSING/unreadable entries.
    /// Off by default: a completed verification is a success regardless of
    /// per-entry results.
    #[serde(default)]
    pub strict_exit: bool,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mdv")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MdvConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MdvConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MdvConfig = toml::from_str(&data)?;
    Ok(cfg)
}
