//! Rule tables for the quick-add interpreter.
//!
//! Every keyword list and pattern lives here as data, in precedence order.
//! `RuleConfig` is the serializable form (so a config file can override single
//! tables); `RuleSet` is the compiled form the interpreter evaluates. Within a
//! table the first matching rule wins.

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::item::{ItemType, Priority};

/// How a matched date phrase turns into a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateResolve {
    /// Fixed offset from today.
    Offset { days: i64 },
    /// Next occurrence of the weekday, never today.
    Weekday { day: Weekday },
    /// `month`/`day`/optional `year` capture groups.
    MonthDay,
    /// `n` capture group, days from today.
    InDays,
    /// Coming Saturday, today included.
    ThisWeekend,
    /// Coming Friday, today included.
    EndOfWeek,
    EndOfMonth,
}

impl DateResolve {
    pub fn resolve(&self, caps: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            DateResolve::Offset { days } => today.checked_add_signed(Duration::try_days(*days)?),
            DateResolve::Weekday { day } => {
                let ahead = days_until(today, *day);
                let ahead = if ahead == 0 { 7 } else { ahead };
                today.checked_add_signed(Duration::days(ahead))
            }
            DateResolve::MonthDay => {
                let month: u32 = caps.name("month")?.as_str().parse().ok()?;
                let day: u32 = caps.name("day")?.as_str().parse().ok()?;
                let year = match caps.name("year") {
                    Some(y) => {
                        let y: i32 = y.as_str().parse().ok()?;
                        if y < 100 { 2000 + y } else { y }
                    }
                    None => today.year(),
                };
                NaiveDate::from_ymd_opt(year, month, day)
            }
            DateResolve::InDays => {
                let n: i64 = caps.name("n")?.as_str().parse().ok()?;
                today.checked_add_signed(Duration::try_days(n)?)
            }
            DateResolve::ThisWeekend => {
                today.checked_add_signed(Duration::days(days_until(today, Weekday::Sat)))
            }
            DateResolve::EndOfWeek => {
                today.checked_add_signed(Duration::days(days_until(today, Weekday::Fri)))
            }
            DateResolve::EndOfMonth => {
                let (y, m) = if today.month() == 12 {
                    (today.year() + 1, 1)
                } else {
                    (today.year(), today.month() + 1)
                };
                NaiveDate::from_ymd_opt(y, m, 1)?.pred_opt()
            }
        }
    }
}

fn days_until(today: NaiveDate, target: Weekday) -> i64 {
    let from = today.weekday().num_days_from_sunday() as i64;
    let to = target.num_days_from_sunday() as i64;
    (to - from + 7) % 7
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRuleConfig {
    /// Lowercased category name the cluster is bound to.
    pub category: String,
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRuleConfig {
    pub pattern: String,
    pub resolve: DateResolve,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityRuleConfig {
    pub priority: Priority,
    pub indicators: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRuleConfig {
    pub pattern: String,
    /// `{byday}` is replaced by the two-letter code of the `byday` capture.
    pub rule: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRuleConfig {
    pub item_type: ItemType,
    pub indicators: Vec<String>,
}

/// Serializable rule tables. Missing tables fall back to the built-in ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub clusters: Vec<ClusterRuleConfig>,
    pub dates: Vec<DateRuleConfig>,
    /// Each pattern must have a `time` capture group.
    pub times: Vec<String>,
    pub duration: String,
    pub priorities: Vec<PriorityRuleConfig>,
    pub recurrences: Vec<RecurrenceRuleConfig>,
    /// Each pattern must have a `loc` capture group; the whole match is
    /// removed from the title.
    pub locations: Vec<String>,
    pub tag: String,
    pub types: Vec<TypeRuleConfig>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn cluster(category: &str, pattern: &str) -> ClusterRuleConfig {
    ClusterRuleConfig {
        category: category.to_string(),
        pattern: pattern.to_string(),
    }
}

fn date(pattern: &str, resolve: DateResolve) -> DateRuleConfig {
    DateRuleConfig {
        pattern: pattern.to_string(),
        resolve,
    }
}

fn recur(pattern: &str, rule: &str) -> RecurrenceRuleConfig {
    RecurrenceRuleConfig {
        pattern: pattern.to_string(),
        rule: rule.to_string(),
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            clusters: vec![
                cluster("school", r"(?i)\b(?:assignment|homework|class|lecture|exam|study)"),
                cluster("work", r"(?i)\b(?:meeting|work|project|client|deadline|office)"),
                cluster("shopping", r"(?i)\b(?:buy|shop|grocery|store|purchase)"),
                cluster("social", r"(?i)\b(?:call|text|friend|family|social|party)"),
            ],
            dates: vec![
                date(r"(?i)\b(?:day after tomorrow|overmorrow)\b", DateResolve::Offset { days: 2 }),
                date(r"(?i)\b(?:today|now)\b", DateResolve::Offset { days: 0 }),
                date(r"(?i)\b(?:tomorrow|tmrw)\b", DateResolve::Offset { days: 1 }),
                date(r"(?i)\bnext week\b", DateResolve::Offset { days: 7 }),
                date(r"(?i)\bnext month\b", DateResolve::Offset { days: 30 }),
                date(r"(?i)\b(?:monday|mon)\b", DateResolve::Weekday { day: Weekday::Mon }),
                date(r"(?i)\b(?:tuesday|tues|tue)\b", DateResolve::Weekday { day: Weekday::Tue }),
                date(r"(?i)\b(?:wednesday|wed)\b", DateResolve::Weekday { day: Weekday::Wed }),
                date(r"(?i)\b(?:thursday|thurs|thu)\b", DateResolve::Weekday { day: Weekday::Thu }),
                date(r"(?i)\b(?:friday|fri)\b", DateResolve::Weekday { day: Weekday::Fri }),
                date(r"(?i)\b(?:saturday|sat)\b", DateResolve::Weekday { day: Weekday::Sat }),
                date(r"(?i)\b(?:sunday|sun)\b", DateResolve::Weekday { day: Weekday::Sun }),
                date(r"\b(?P<month>\d{1,2})/(?P<day>\d{1,2})(?:/(?P<year>\d{2,4}))?\b", DateResolve::MonthDay),
                date(r"(?i)\bin (?P<n>\d+) days?\b", DateResolve::InDays),
                date(r"(?i)\bthis weekend\b", DateResolve::ThisWeekend),
                date(r"(?i)\b(?:this week|end of week)\b", DateResolve::EndOfWeek),
                date(r"(?i)\bend of month\b", DateResolve::EndOfMonth),
            ],
            times: strings(&[
                r"(?i)(?:\bat\s+)?\b(?P<time>\d{1,2}:\d{2}\s*(?:am|pm))\b",
                r"(?i)(?:\bat\s+)?\b(?P<time>\d{1,2}\s*(?:am|pm))\b",
                r"(?:\bat\s+)?\b(?P<time>\d{1,2}:\d{2})\b",
                r"(?i)(?:\b(?:in the|this)\s+)?\b(?P<time>morning|morn)\b",
                r"(?i)(?:\b(?:in the|this)\s+)?\b(?P<time>afternoon|noon)\b",
                r"(?i)(?:\b(?:in the|this)\s+)?\b(?P<time>evening|eve)\b",
                r"(?i)(?:\b(?:at|this)\s+)?\b(?P<time>night|late)\b",
            ]),
            duration: r"(?i)\b(?P<n>\d+)\s*(?P<unit>hour|hr|minute|min)s?\b".to_string(),
            priorities: vec![
                PriorityRuleConfig {
                    priority: Priority::High,
                    indicators: strings(&[
                        "urgent",
                        "asap",
                        "critical",
                        "important",
                        "emergency",
                        "!!!",
                        "high priority",
                        "rush",
                        "deadline",
                    ]),
                },
                PriorityRuleConfig {
                    priority: Priority::Low,
                    indicators: strings(&[
                        "later",
                        "sometime",
                        "eventually",
                        "low priority",
                        "when free",
                        "casual",
                        "optional",
                    ]),
                },
            ],
            recurrences: vec![
                recur(r"(?i)\b(?:every day|daily)\b", "FREQ=DAILY"),
                recur(r"(?i)\b(?:every week|weekly)\b", "FREQ=WEEKLY"),
                recur(r"(?i)\b(?:every month|monthly)\b", "FREQ=MONTHLY"),
                recur(r"(?i)\b(?:every year|yearly|annually)\b", "FREQ=YEARLY"),
                recur(
                    r"(?i)\bevery (?P<byday>monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
                    "FREQ=WEEKLY;BYDAY={byday}",
                ),
                recur(r"(?i)\bweekdays?\b", "FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR"),
                recur(r"(?i)\bweekends?\b", "FREQ=WEEKLY;BYDAY=SA,SU"),
                recur(r"(?i)\bevery \d+ (?:days?|weeks?|months?)\b", "custom"),
            ],
            locations: strings(&[
                r"(?i)(?:\bat|@)\s+(?P<loc>[^,\s][^,\n]*)",
                r"(?i)\b(?:in|on)\s+(?P<loc>(?:room|office|building|hall|floor)\s+[A-Z0-9-]+)",
                r"(?i)\b(?P<loc>gym|home|work|office|school|mall|store|library|cafe|restaurant)\b",
                r"\b(?P<loc>[A-Z][a-z]+\s+(?:Street|St|Avenue|Ave|Road|Rd|Drive|Dr))\b",
            ]),
            tag: r"#(?P<tag>\w+)".to_string(),
            types: vec![
                TypeRuleConfig {
                    item_type: ItemType::Event,
                    indicators: strings(&[
                        "meeting",
                        "appointment",
                        "call",
                        "conference",
                        "interview",
                        "dinner",
                        "lunch",
                        "party",
                        "date",
                        "visit",
                    ]),
                },
                TypeRuleConfig {
                    item_type: ItemType::Note,
                    indicators: strings(&[
                        "note:",
                        "remember:",
                        "thoughts:",
                        "memo:",
                        "reminder:",
                        "info:",
                    ]),
                },
                TypeRuleConfig {
                    item_type: ItemType::Idea,
                    indicators: strings(&[
                        "idea:",
                        "brainstorm",
                        "concept",
                        "innovation",
                        "inspiration",
                        "thought:",
                        "maybe:",
                    ]),
                },
                TypeRuleConfig {
                    item_type: ItemType::Task,
                    indicators: strings(&[
                        "buy", "get", "pick up", "complete", "finish", "do", "make", "send",
                        "call", "email", "write", "read",
                    ]),
                },
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeywordCluster {
    pub category: String,
    pub pattern: Regex,
}

#[derive(Debug, Clone)]
pub struct DateRule {
    pub pattern: Regex,
    pub resolve: DateResolve,
}

#[derive(Debug, Clone)]
pub struct PriorityRule {
    pub priority: Priority,
    pub indicators: Vec<String>,
}

impl PriorityRule {
    /// `lower` must already be lowercased.
    pub fn matches(&self, lower: &str) -> bool {
        self.indicators.iter().any(|i| lower.contains(i.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct RecurrenceRule {
    pub pattern: Regex,
    pub rule: String,
}

impl RecurrenceRule {
    pub fn render(&self, caps: &Captures<'_>) -> String {
        match caps.name("byday") {
            Some(day) if self.rule.contains("{byday}") => {
                self.rule.replace("{byday}", &byday_code(day.as_str()))
            }
            _ => self.rule.clone(),
        }
    }
}

fn byday_code(day: &str) -> String {
    day.chars()
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

#[derive(Debug, Clone)]
pub struct TypeRule {
    pub item_type: ItemType,
    pub indicators: Vec<String>,
}

impl TypeRule {
    pub fn matches(&self, lower: &str) -> bool {
        self.indicators.iter().any(|i| lower.contains(i.as_str()))
    }
}

/// Compiled rule tables.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub clusters: Vec<KeywordCluster>,
    pub dates: Vec<DateRule>,
    pub times: Vec<Regex>,
    pub duration: Regex,
    pub priorities: Vec<PriorityRule>,
    pub recurrences: Vec<RecurrenceRule>,
    pub locations: Vec<Regex>,
    pub tag: Regex,
    pub types: Vec<TypeRule>,
}

fn compile(pattern: &str, table: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("invalid {table} rule pattern: {pattern}"))
}

fn lowered(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.to_lowercase()).collect()
}

impl RuleSet {
    /// Built-in tables.
    pub fn standard() -> Result<Self> {
        Self::compile(&RuleConfig::default())
    }

    pub fn compile(cfg: &RuleConfig) -> Result<Self> {
        let clusters = cfg
            .clusters
            .iter()
            .map(|c| {
                Ok(KeywordCluster {
                    category: c.category.to_lowercase(),
                    pattern: compile(&c.pattern, "cluster")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let dates = cfg
            .dates
            .iter()
            .map(|d| {
                Ok(DateRule {
                    pattern: compile(&d.pattern, "date")?,
                    resolve: d.resolve.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let times = cfg
            .times
            .iter()
            .map(|t| {
                let re = compile(t, "time")?;
                if re.capture_names().all(|n| n != Some("time")) {
                    bail!("time rule needs a `time` capture group: {t}");
                }
                Ok(re)
            })
            .collect::<Result<Vec<_>>>()?;

        let duration = compile(&cfg.duration, "duration")?;
        for group in ["n", "unit"] {
            if duration.capture_names().all(|n| n != Some(group)) {
                bail!("duration rule needs a `{group}` capture group: {}", cfg.duration);
            }
        }

        let priorities = cfg
            .priorities
            .iter()
            .map(|p| PriorityRule {
                priority: p.priority,
                indicators: lowered(&p.indicators),
            })
            .collect();

        let recurrences = cfg
            .recurrences
            .iter()
            .map(|r| {
                Ok(RecurrenceRule {
                    pattern: compile(&r.pattern, "recurrence")?,
                    rule: r.rule.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let locations = cfg
            .locations
            .iter()
            .map(|l| {
                let re = compile(l, "location")?;
                if re.capture_names().all(|n| n != Some("loc")) {
                    bail!("location rule needs a `loc` capture group: {l}");
                }
                Ok(re)
            })
            .collect::<Result<Vec<_>>>()?;

        let tag = compile(&cfg.tag, "tag")?;
        if tag.capture_names().all(|n| n != Some("tag")) {
            bail!("tag rule needs a `tag` capture group: {}", cfg.tag);
        }

        let types = cfg
            .types
            .iter()
            .map(|t| TypeRule {
                item_type: t.item_type,
                indicators: lowered(&t.indicators),
            })
            .collect();

        Ok(Self {
            clusters,
            dates,
            times,
            duration,
            priorities,
            recurrences,
            locations,
            tag,
            types,
        })
    }
}
