use anyhow::{Context, Result};
use lifedesk_core::{Category, RuleConfig, RuleSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::{default_agenda_path, default_supplies_path, ensure_lifedesk_home};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IANA timezone used for "today" and "now".
    pub timezone: String,
    /// Category directory, in match order.
    pub categories: Vec<Category>,
    pub files: FilesSection,
    /// Interpreter rule overrides; absent tables keep the built-in ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<RuleConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplies: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agenda: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: "America/Chicago".to_string(),
            categories: vec![
                Category::new("personal", "Personal"),
                Category::new("work", "Work"),
                Category::new("school", "School"),
                Category::new("shopping", "Shopping"),
                Category::new("social", "Social"),
            ],
            files: FilesSection::default(),
            rules: None,
        }
    }
}

impl Config {
    pub fn rule_set(&self) -> Result<RuleSet> {
        match &self.rules {
            Some(cfg) => RuleSet::compile(cfg).context("compile [rules] from config.toml"),
            None => RuleSet::standard(),
        }
    }

    pub fn supplies_path(&self) -> Result<PathBuf> {
        match &self.files.supplies {
            Some(p) => Ok(p.clone()),
            None => default_supplies_path(),
        }
    }

    pub fn agenda_path(&self) -> Result<PathBuf> {
        match &self.files.agenda {
            Some(p) => Ok(p.clone()),
            None => default_agenda_path(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_lifedesk_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
timezone = "Europe/Berlin"

[[categories]]
id = "uni"
name = "School"
"#,
        )
        .unwrap();
        assert_eq!(cfg.timezone, "Europe/Berlin");
        assert_eq!(cfg.categories.len(), 1);
        assert!(cfg.rules.is_none());
        assert!(cfg.files.supplies.is_none());
    }

    #[test]
    fn test_rule_overrides_from_toml() {
        let cfg: Config = toml::from_str(
            r#"
[[rules.priorities]]
priority = "high"
indicators = ["p0"]
"#,
        )
        .unwrap();
        let rules = cfg.rule_set().unwrap();
        assert_eq!(rules.priorities.len(), 1);
        assert_eq!(rules.priorities[0].indicators, vec!["p0".to_string()]);
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.categories, Config::default().categories);
        assert!(!s.contains("[rules"));
    }
}
