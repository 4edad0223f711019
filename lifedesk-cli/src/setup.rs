use anyhow::{Result, bail};
use lifedesk_core::{Category, local_now};
use std::io::{self, Write};

use crate::config::{config_path, load_config, save_config};

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

fn prompt_multiline(label: &str) -> Result<Vec<String>> {
    println!("{} (enter one per line; blank line to finish)", label);
    let mut out = Vec::new();
    loop {
        print!("> ");
        io::stdout().flush().ok();
        let mut s = String::new();
        io::stdin().read_line(&mut s)?;
        let s = s.trim().to_string();
        if s.is_empty() {
            break;
        }
        out.push(s);
    }
    Ok(out)
}

/// Interactive: timezone plus category directory, written to config.toml.
/// Blank answers keep the current values.
pub fn run_setup() -> Result<()> {
    println!("Lifedesk setup\n");
    let mut cfg = load_config()?;

    let tz = prompt(&format!("Timezone [{}]", cfg.timezone))?;
    if !tz.is_empty() {
        if local_now(&tz).is_err() {
            bail!("unknown timezone: {tz}");
        }
        cfg.timezone = tz;
    }

    let names = prompt_multiline("Category names, in match order")?;
    if !names.is_empty() {
        cfg.categories = categories_from_names(&names);
    }

    save_config(&cfg)?;

    println!("\nWrote {}", config_path()?.display());
    println!("Categories:");
    for c in &cfg.categories {
        println!("- {} ({})", c.name, c.id);
    }

    println!("\nNext:");
    println!("- lifedesk add \"Team meeting tomorrow at 2pm\" --dry-run");
    println!("- lifedesk supplies");

    Ok(())
}

/// Ids are slugs of the names; duplicates get a numeric suffix.
fn categories_from_names(names: &[String]) -> Vec<Category> {
    let mut out: Vec<Category> = Vec::with_capacity(names.len());
    for name in names {
        let base = slug(name);
        let mut id = base.clone();
        let mut n = 2;
        while out.iter().any(|c| c.id == id) {
            id = format!("{base}-{n}");
            n += 1;
        }
        out.push(Category::new(id, name.clone()));
    }
    out
}

fn slug(name: &str) -> String {
    let mut s = String::new();
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            s.push(ch.to_ascii_lowercase());
        } else if !s.ends_with('-') && !s.is_empty() {
            s.push('-');
        }
    }
    let s = s.trim_end_matches('-').to_string();
    if s.is_empty() { "category".to_string() } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugged_ids_are_unique() {
        let names = vec![
            "Work".to_string(),
            "Side Project!".to_string(),
            "work".to_string(),
            "???".to_string(),
        ];
        let cats = categories_from_names(&names);
        let ids: Vec<&str> = cats.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["work", "side-project", "work-2", "category"]);
        assert_eq!(cats[1].name, "Side Project!");
    }
}
