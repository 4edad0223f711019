//! Recent quick-add inputs, newest first.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentEntries {
    entries: Vec<String>,
}

impl RecentEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `input` at the front, dropping an identical older entry and
    /// anything past the cap. Blank input is ignored.
    pub fn record(&mut self, input: &str) {
        if input.trim().is_empty() {
            return;
        }
        self.entries.retain(|e| e != input);
        self.entries.insert(0, input.to_string());
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Missing file means empty history.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let mut loaded: Self =
            serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        loaded.entries.truncate(HISTORY_LIMIT);
        Ok(loaded)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}
