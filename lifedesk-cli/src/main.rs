use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use lifedesk_core::{
    Badges, EntryKind, EventStatus, Interpreter, ItemType, NewRecord, RecentEntries, TaskStatus,
    build_agenda, due_label, event_status, examples_for, local_now, status_update, to_new_record,
};
use lifedesk_supply::{
    RestockEmitter, count_low_stock, consumption_rate_label, load_inventory, progress_percent,
    project_all, reorder_advice, sort_by_urgency,
};
use serde_json::json;
use std::path::PathBuf;
use tracing::debug;

mod agenda_file;
mod config;
mod setup;
mod state;

use agenda_file::AgendaFile;
use config::{Config, load_config};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("LIFEDESK_BUILD_SHA"),
    ", ",
    env!("LIFEDESK_BUILD_PROFILE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(
    name = "lifedesk",
    version,
    long_version = LONG_VERSION,
    about = "Quick-add, agenda and supplement tracking for a personal dashboard"
)]
struct Cli {
    /// Debug-level logs (LIFEDESK_LOG overrides)
    #[arg(long, global = true)]
    verbose: bool,

    /// Errors only
    #[arg(long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive setup: timezone and categories, written to ~/.lifedesk/config.toml
    Setup,

    /// Interpret free text and show the item it would create
    Add {
        /// The text, e.g. "Team meeting tomorrow at 2pm"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Force the item type (task, event, note, idea)
        #[arg(long = "type")]
        item_type: Option<ItemType>,

        /// Print candidate and record as JSON
        #[arg(long)]
        json: bool,

        /// Do not record the input in history
        #[arg(long)]
        dry_run: bool,
    },

    /// Recent quick-add inputs, newest first
    History {
        #[arg(long)]
        clear: bool,
    },

    /// Example prompts, filtered by what you have typed so far
    Examples { text: Vec<String> },

    /// Supplement run-out projections, most urgent first
    Supplies {
        /// Inventory file (default: [files].supplies or ~/.lifedesk/supplies.toml)
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long)]
        json: bool,

        /// Print shopping-list tasks for everything that needs reordering
        #[arg(long)]
        restock: bool,
    },

    /// Today's agenda and badge counts
    Today {
        /// Agenda file (default: [files].agenda or ~/.lifedesk/agenda.toml)
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Move a task to another board column
    Move {
        task_id: String,

        /// pending, in_progress or completed
        status: TaskStatus,

        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Config file management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config.toml if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    match cli.command {
        Command::Setup => setup::run_setup()?,

        Command::Add {
            text,
            item_type,
            json,
            dry_run,
        } => {
            let cfg = load_config()?;
            add(&cfg, &text.join(" "), item_type, json, dry_run)?;
        }

        Command::History { clear } => history(clear)?,

        Command::Examples { text } => {
            for e in examples_for(&text.join(" ")) {
                println!("- {e}");
            }
        }

        Command::Supplies {
            file,
            json,
            restock,
        } => {
            let cfg = load_config()?;
            let path = match file {
                Some(p) => p,
                None => cfg.supplies_path()?,
            };
            supplies(&cfg, path, json, restock)?;
        }

        Command::Today { file, json } => {
            let cfg = load_config()?;
            let path = match file {
                Some(p) => p,
                None => cfg.agenda_path()?,
            };
            today(&cfg, path, json)?;
        }

        Command::Move {
            task_id,
            status,
            file,
        } => {
            let cfg = load_config()?;
            let path = match file {
                Some(p) => p,
                None => cfg.agenda_path()?,
            };
            move_task(&cfg, path, &task_id, status)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("LIFEDESK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn add(
    cfg: &Config,
    text: &str,
    item_type: Option<ItemType>,
    as_json: bool,
    dry_run: bool,
) -> Result<()> {
    if text.trim().is_empty() {
        bail!("nothing to add");
    }

    let now = local_now(&cfg.timezone)?;
    let interpreter = Interpreter::new(cfg.rule_set()?);
    let item = interpreter.interpret(text, &cfg.categories, item_type, now);
    let record = to_new_record(&item, &cfg.categories, now.date())?;

    if as_json {
        let out = json!({ "candidate": item, "record": record });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let category = item
            .category
            .as_deref()
            .and_then(|id| cfg.categories.iter().find(|c| c.id == id))
            .map(|c| c.name.as_str())
            .unwrap_or("(none)");

        println!("{} [{}] {}", item.item_type.as_str(), category, item.title);
        if let Some(d) = item.due_date {
            println!("  date:       {} ({})", d, due_label(d, now.date()));
        }
        if let Some(t) = &item.start_time {
            match &item.end_time {
                Some(end) => println!("  time:       {t} - {end}"),
                None => println!("  time:       {t}"),
            }
        }
        println!("  priority:   {}", item.priority.as_str());
        if let Some(r) = &item.recurrence {
            println!("  repeats:    {r}");
        }
        if let Some(l) = &item.location {
            println!("  location:   {l}");
        }
        if !item.tags.is_empty() {
            println!("  tags:       {}", item.tags.join(", "));
        }
        println!("  confidence: {}%", item.confidence_percent());
        for s in &item.suggestions {
            println!("  hint: {s}");
        }
        for s in &item.ai_insights {
            println!("  note: {s}");
        }
        println!("\nWould insert into `{}`", record.table());
        if let NewRecord::Event(e) = &record {
            println!("  {} -> {}", e.start_at, e.end_at);
        }
    }

    if !dry_run {
        let path = state::history_path()?;
        let mut recent = RecentEntries::load(&path)?;
        recent.record(text);
        recent.save(&path)?;
        debug!(path = %path.display(), "recorded quick-add input");
    }

    Ok(())
}

fn history(clear: bool) -> Result<()> {
    let path = state::history_path()?;
    let mut recent = RecentEntries::load(&path)?;

    if clear {
        recent.clear();
        recent.save(&path)?;
        println!("History cleared.");
        return Ok(());
    }

    if recent.is_empty() {
        println!("No recent inputs.");
        return Ok(());
    }
    for (i, e) in recent.entries().iter().enumerate() {
        println!("{:>2}. {}", i + 1, e);
    }
    Ok(())
}

fn supplies(cfg: &Config, path: PathBuf, as_json: bool, restock: bool) -> Result<()> {
    if !path.exists() {
        bail!(
            "No inventory at {}. Pass --file <supplies.toml> or set [files].supplies",
            path.display()
        );
    }

    let today = local_now(&cfg.timezone)?.date();
    let items = load_inventory(&path)?;
    let mut projected = project_all(&items, today);
    sort_by_urgency(&mut projected);

    if restock {
        let (tasks, skipped) = RestockEmitter::emit(&projected);
        if as_json {
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        } else {
            println!("{} item(s) to reorder\n", tasks.len());
            for t in &tasks {
                println!("- [{}] {}", t.priority.as_str(), t.title);
            }
        }
        for name in skipped {
            eprintln!("skipped {name}: no category to file the task under");
        }
        return Ok(());
    }

    if as_json {
        let rows: Vec<_> = projected
            .iter()
            .map(|p| {
                let s = &p.supplement;
                json!({
                    "supplement": s,
                    "projection": p.projection,
                    "rateLabel": consumption_rate_label(s.servings_per_day),
                    "progress": progress_percent(&p.projection, s.quantity_servings, s.servings_per_day),
                    "advice": reorder_advice(&p.projection),
                    "reminder": RestockEmitter::reminder_date(&p.projection),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Supplies as of {today} ({} item(s))\n", projected.len());
    for p in &projected {
        let s = &p.supplement;
        let days = p
            .projection
            .days_left
            .map(|d| format!("{d} days left"))
            .unwrap_or_else(|| "no data".to_string());
        println!(
            "[{:<8}] {} | {} | {} | {:.0}%",
            p.projection.status.as_str(),
            s.name,
            days,
            consumption_rate_label(s.servings_per_day),
            progress_percent(&p.projection, s.quantity_servings, s.servings_per_day)
        );
        if let Some(advice) = reorder_advice(&p.projection) {
            println!("           {} {}", advice.message, advice.action);
        }
        if let Some(d) = RestockEmitter::reminder_date(&p.projection) {
            println!("           reminder: {d}");
        }
    }

    Ok(())
}

fn today(cfg: &Config, path: PathBuf, as_json: bool) -> Result<()> {
    if !path.exists() {
        bail!(
            "No agenda at {}. Pass --file <agenda.toml> or set [files].agenda",
            path.display()
        );
    }

    let now = local_now(&cfg.timezone)?;
    let agenda = AgendaFile::load(&path)?;

    let supplies_path = cfg.supplies_path()?;
    let low_stock = if supplies_path.exists() {
        count_low_stock(&load_inventory(&supplies_path)?)
    } else {
        debug!(path = %supplies_path.display(), "no inventory; low-stock count is 0");
        0
    };

    let open: Vec<_> = agenda
        .task
        .iter()
        .filter(|t| t.status != TaskStatus::Completed)
        .cloned()
        .collect();
    let todays_events: Vec<_> = agenda
        .event
        .iter()
        .filter(|e| e.start_at.date() == now.date())
        .cloned()
        .collect();

    let entries = build_agenda(&open, &todays_events, now);
    let badges = Badges::tally(&agenda.task, &agenda.event, low_stock, now.date());

    if as_json {
        let out = json!({ "now": now, "badges": badges, "agenda": entries });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("# {}\n", now.format("%A, %B %-d"));
    println!(
        "pending {} | overdue {} | events today {} | low stock {} | unread {}\n",
        badges.pending_tasks,
        badges.overdue_tasks,
        badges.today_events,
        badges.low_stock_supplements,
        badges.unread
    );

    if entries.is_empty() {
        println!("Nothing scheduled.");
        return Ok(());
    }

    for entry in &entries {
        match entry.kind {
            EntryKind::Task => {
                let when = entry
                    .at
                    .map(|d| due_label(d.date(), now.date()))
                    .unwrap_or_else(|| "No due date".to_string());
                println!("- [task] {} | {} | {:?}", entry.title, when, entry.urgency);
            }
            EntryKind::Event => {
                let Some(event) = todays_events.iter().find(|e| e.id == entry.id) else {
                    continue;
                };
                let status = match event_status(event.start_at, event.end_at, now) {
                    EventStatus::StartingSoon(m) => format!("starts in {m} min"),
                    EventStatus::Upcoming(m) => format!("in {m} min"),
                    EventStatus::Later(_) => format!("at {}", event.start_at.format("%H:%M")),
                    EventStatus::InProgress(m) => format!("{m} min left"),
                    EventStatus::Completed => "done".to_string(),
                };
                match &event.location {
                    Some(l) => println!("- [event] {} | {} | {}", entry.title, status, l),
                    None => println!("- [event] {} | {}", entry.title, status),
                }
            }
        }
    }

    Ok(())
}

fn move_task(cfg: &Config, path: PathBuf, task_id: &str, status: TaskStatus) -> Result<()> {
    if !path.exists() {
        bail!("No agenda at {}", path.display());
    }

    let now = local_now(&cfg.timezone)?;
    let mut agenda = AgendaFile::load(&path)?;
    let update = status_update(status, now);
    let task = agenda.apply(task_id, &update)?;
    println!("{} -> {}", task.title, status.as_str());
    agenda.save(&path)?;

    Ok(())
}
