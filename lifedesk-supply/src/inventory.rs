//! Supplement inventory: loading, projection and urgency ordering.
//!
//! File format (`supplies.toml`):
//!
//! ```toml
//! [[supplement]]
//! id = "vit-d"
//! name = "Vitamin D"
//! quantity_servings = 30
//! servings_per_day = 1
//! category_id = "shopping"
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::projector::{Projection, project};

/// Below this many servings a supplement counts toward the low-stock badge.
pub const LOW_STOCK_SERVINGS: f64 = 7.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplement {
    pub id: String,
    pub name: String,
    pub quantity_servings: Option<f64>,
    pub servings_per_day: Option<f64>,
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct InventoryFile {
    #[serde(default)]
    supplement: Vec<Supplement>,
}

pub fn parse_inventory(toml_text: &str) -> Result<Vec<Supplement>> {
    let file: InventoryFile = toml::from_str(toml_text).context("parse supplement inventory")?;

    let mut out = Vec::with_capacity(file.supplement.len());
    for s in file.supplement {
        if s.name.trim().is_empty() {
            warn!(id = %s.id, "skipping supplement without a name");
            continue;
        }
        out.push(s);
    }
    Ok(out)
}

pub fn load_inventory(path: &Path) -> Result<Vec<Supplement>> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_inventory(&s).with_context(|| format!("parsing {}", path.display()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projected {
    pub supplement: Supplement,
    pub projection: Projection,
}

pub fn project_all(items: &[Supplement], as_of: NaiveDate) -> Vec<Projected> {
    items
        .iter()
        .map(|s| Projected {
            supplement: s.clone(),
            projection: project(s.quantity_servings, s.servings_per_day, as_of),
        })
        .collect()
}

/// Severity first, then fewest days left; entries without a figure go last
/// within their bucket.
pub fn compare_urgency(a: &Projection, b: &Projection) -> Ordering {
    a.status.cmp(&b.status).then_with(|| match (a.days_left, b.days_left) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

pub fn sort_by_urgency(items: &mut [Projected]) {
    items.sort_by(|a, b| compare_urgency(&a.projection, &b.projection));
}

pub fn count_low_stock(items: &[Supplement]) -> usize {
    items
        .iter()
        .filter(|s| s.quantity_servings.is_some_and(|q| q < LOW_STOCK_SERVINGS))
        .count()
}
