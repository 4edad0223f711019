use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$LIFEDESK_HOME`, else `~/.lifedesk`.
pub fn lifedesk_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("LIFEDESK_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".lifedesk"))
}

pub fn ensure_lifedesk_home() -> Result<PathBuf> {
    let dir = lifedesk_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn history_path() -> Result<PathBuf> {
    Ok(ensure_lifedesk_home()?.join("history.json"))
}

pub fn default_supplies_path() -> Result<PathBuf> {
    Ok(ensure_lifedesk_home()?.join("supplies.toml"))
}

pub fn default_agenda_path() -> Result<PathBuf> {
    Ok(ensure_lifedesk_home()?.join("agenda.toml"))
}
