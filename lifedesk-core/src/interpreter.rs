//! Quick-add interpreter: free text in, `CandidateItem` out.
//!
//! Heuristic, not a grammar. The stages in `STAGES` run in that order as a
//! fold over a `Draft`; each takes the draft by value and hands back the
//! updated one. Stages that recognise a fragment strip it from the working
//! title so later stages don't see it again. Tags are the exception and stay
//! in the title.
//!
//! Never fails: anything unrecognised just leaves the field unset.

use std::ops::Range;

use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use regex::Regex;
use tracing::{debug, trace};

use crate::item::{CandidateItem, Category, ItemType, Priority, SUGGESTION_THRESHOLD};
use crate::rules::{DateResolve, RuleSet};

const CATEGORY_WEIGHT: f64 = 0.25;
const DATE_WEIGHT: f64 = 0.2;
const TIME_WEIGHT: f64 = 0.15;
const EVENT_BIAS_WEIGHT: f64 = 0.15;
const PRIORITY_WEIGHT: f64 = 0.15;
const RECURRENCE_WEIGHT: f64 = 0.2;
const LOCATION_WEIGHT: f64 = 0.15;
const TAG_WEIGHT: f64 = 0.1;
const TYPE_WEIGHT: f64 = 0.15;

pub const SUGGEST_DUE_DATE: &str = "Consider adding a due date";
pub const SUGGEST_CATEGORY: &str = "Specify which life area this belongs to";
pub const SUGGEST_TIME: &str = "Add a specific time";
pub const SUGGEST_HIGH_PRIORITY: &str = "Mark as high priority";

pub const INSIGHT_DEADLINE: &str = "💡 Tasks with deadlines are 3x more likely to be completed";
pub const INSIGHT_TRAVEL: &str = "📍 Location detected - consider setting travel time reminders";
pub const INSIGHT_HABIT: &str = "🔄 Recurring items help build consistent habits";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Category,
    Date,
    Time,
    Priority,
    Recurrence,
    Location,
    Tags,
    ItemType,
    Title,
    Suggestions,
    Insights,
}

/// Evaluation order. Earlier stages get first claim on a fragment.
pub const STAGES: [Stage; 11] = [
    Stage::Category,
    Stage::Date,
    Stage::Time,
    Stage::Priority,
    Stage::Recurrence,
    Stage::Location,
    Stage::Tags,
    Stage::ItemType,
    Stage::Title,
    Stage::Suggestions,
    Stage::Insights,
];

/// Partial result threaded through the stages.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub item: CandidateItem,
    /// Input text minus the fragments consumed so far.
    pub working: String,
}

impl Draft {
    fn new(text: &str, type_override: Option<ItemType>) -> Self {
        Self {
            item: CandidateItem::new(text, type_override.unwrap_or(ItemType::Task)),
            working: text.to_string(),
        }
    }

    fn strip(&mut self, range: Range<usize>) {
        self.working.replace_range(range, " ");
    }
}

/// Inputs every stage can read.
struct Input<'a> {
    text: &'a str,
    lower: String,
    categories: &'a [Category],
    type_override: Option<ItemType>,
    now: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct Interpreter {
    rules: RuleSet,
}

impl Interpreter {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Interpreter over the built-in rule tables.
    pub fn standard() -> Result<Self> {
        Ok(Self::new(RuleSet::standard()?))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Interpret `text` against the category directory.
    ///
    /// `now` is the only clock the interpreter reads, so the same arguments
    /// always give the same item.
    pub fn interpret(
        &self,
        text: &str,
        categories: &[Category],
        type_override: Option<ItemType>,
        now: NaiveDateTime,
    ) -> CandidateItem {
        let input = Input {
            text,
            lower: text.to_lowercase(),
            categories,
            type_override,
            now,
        };

        STAGES
            .iter()
            .fold(Draft::new(text, type_override), |draft, &stage| {
                let draft = self.run_stage(stage, draft, &input);
                trace!(?stage, confidence = draft.item.confidence, working = %draft.working);
                draft
            })
            .item
    }

    fn run_stage(&self, stage: Stage, draft: Draft, input: &Input<'_>) -> Draft {
        match stage {
            Stage::Category => self.match_category(draft, input),
            Stage::Date => self.extract_date(draft, input),
            Stage::Time => self.extract_time(draft, input),
            Stage::Priority => self.detect_priority(draft, input),
            Stage::Recurrence => self.detect_recurrence(draft),
            Stage::Location => self.extract_location(draft),
            Stage::Tags => self.collect_tags(draft, input),
            Stage::ItemType => self.infer_type(draft, input),
            Stage::Title => clean_title(draft, input),
            Stage::Suggestions => suggest(draft, input),
            Stage::Insights => insights(draft),
        }
    }

    fn match_category(&self, mut d: Draft, input: &Input<'_>) -> Draft {
        let found = input
            .categories
            .iter()
            .find(|c| self.category_matches(c, &input.lower));

        if let Some(cat) = found {
            debug!(category = %cat.name, "category matched");
            d.item.category = Some(cat.id.clone());
            d.item.confidence += CATEGORY_WEIGHT;
        }
        d
    }

    fn category_matches(&self, cat: &Category, lower: &str) -> bool {
        let name = cat.name.trim().to_lowercase();
        if name.is_empty() {
            return false;
        }

        let literal = [
            format!("#{name}"),
            format!("{name}:"),
            format!("for {name}"),
            format!("{name} "),
        ];
        if literal.iter().any(|p| lower.contains(p.as_str())) {
            return true;
        }

        let bounded = Regex::new(&format!(r"\b{}\b", regex::escape(&name)));
        if bounded.is_ok_and(|re| re.is_match(lower)) {
            return true;
        }

        self.rules
            .clusters
            .iter()
            .any(|c| c.category == name && c.pattern.is_match(lower))
    }

    fn extract_date(&self, mut d: Draft, input: &Input<'_>) -> Draft {
        let today = input.now.date();

        for rule in &self.rules.dates {
            let weekday = matches!(rule.resolve, DateResolve::Weekday { .. });
            let hit = rule.pattern.captures_iter(&d.working).find_map(|caps| {
                let m = caps.get(0)?;
                // "every monday" belongs to the recurrence stage.
                if weekday && follows_every(&d.working, m.start()) {
                    return None;
                }
                rule.resolve
                    .resolve(&caps, today)
                    .map(|date| (m.range(), date))
            });

            if let Some((range, date)) = hit {
                debug!(%date, phrase = &d.working[range.clone()], "due date matched");
                d.item.due_date = Some(date);
                d.strip(range);
                d.item.confidence += DATE_WEIGHT;
                break;
            }
        }
        d
    }

    fn extract_time(&self, mut d: Draft, input: &Input<'_>) -> Draft {
        let hit = self.rules.times.iter().find_map(|re| {
            let caps = re.captures(&d.working)?;
            let whole = caps.get(0)?.range();
            let time = caps.name("time")?.as_str().trim().to_string();
            Some((whole, time))
        });

        let Some((range, time)) = hit else {
            return d;
        };

        debug!(start = %time, "start time matched");
        d.item.start_time = Some(time);
        d.strip(range);
        d.item.confidence += TIME_WEIGHT;

        if let Some(end) = self.end_time(input) {
            d.item.end_time = Some(end);
        }

        if input.type_override.is_none() {
            d.item.item_type = ItemType::Event;
            d.item.confidence += EVENT_BIAS_WEIGHT;
        }
        d
    }

    /// End time from an hour-based duration phrase, counted from `now`
    /// rather than from the parsed start time.
    fn end_time(&self, input: &Input<'_>) -> Option<String> {
        let caps = self.rules.duration.captures(input.text)?;
        let n: i64 = caps.name("n")?.as_str().parse().ok()?;
        let unit = caps.name("unit")?.as_str().to_lowercase();
        if !(unit.starts_with("hour") || unit == "hr") {
            return None;
        }
        let end = input.now.checked_add_signed(Duration::try_hours(n)?)?;
        Some(end.format("%H:%M").to_string())
    }

    fn detect_priority(&self, mut d: Draft, input: &Input<'_>) -> Draft {
        if let Some(rule) = self.rules.priorities.iter().find(|r| r.matches(&input.lower)) {
            d.item.priority = rule.priority;
            d.item.confidence += PRIORITY_WEIGHT;
        }
        d
    }

    fn detect_recurrence(&self, mut d: Draft) -> Draft {
        let hit = self.rules.recurrences.iter().find_map(|rule| {
            let caps = rule.pattern.captures(&d.working)?;
            Some((caps.get(0)?.range(), rule.render(&caps)))
        });

        if let Some((range, rule)) = hit {
            debug!(%rule, "recurrence matched");
            d.item.recurrence = Some(rule);
            d.strip(range);
            d.item.confidence += RECURRENCE_WEIGHT;
        }
        d
    }

    fn extract_location(&self, mut d: Draft) -> Draft {
        let hit = self.rules.locations.iter().find_map(|re| {
            let caps = re.captures(&d.working)?;
            let loc = caps
                .name("loc")?
                .as_str()
                .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | ':' | ','));
            if loc.is_empty() {
                return None;
            }
            Some((caps.get(0)?.range(), loc.to_string()))
        });

        if let Some((range, loc)) = hit {
            debug!(location = %loc, "location matched");
            d.item.location = Some(loc);
            d.strip(range);
            d.item.confidence += LOCATION_WEIGHT;
        }
        d
    }

    fn collect_tags(&self, mut d: Draft, input: &Input<'_>) -> Draft {
        let tags: Vec<String> = self
            .rules
            .tag
            .captures_iter(input.text)
            .filter_map(|c| c.name("tag").map(|t| t.as_str().to_string()))
            .collect();

        if !tags.is_empty() {
            d.item.tags = tags;
            d.item.confidence += TAG_WEIGHT;
        }
        d
    }

    fn infer_type(&self, mut d: Draft, input: &Input<'_>) -> Draft {
        if input.type_override.is_some() {
            return d;
        }
        if let Some(rule) = self.rules.types.iter().find(|r| r.matches(&input.lower)) {
            d.item.item_type = rule.item_type;
            d.item.confidence += TYPE_WEIGHT;
        }
        d
    }
}

fn follows_every(text: &str, start: usize) -> bool {
    text[..start]
        .split_whitespace()
        .next_back()
        .is_some_and(|w| w.eq_ignore_ascii_case("every"))
}

/// Collapse whitespace and trim separator punctuation from both ends.
pub fn tidy(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| {
            c.is_whitespace() || matches!(c, '-' | ':' | ',' | ';' | '\u{2013}' | '\u{2014}')
        })
        .to_string()
}

fn clean_title(mut d: Draft, input: &Input<'_>) -> Draft {
    let mut title = tidy(&d.working);
    if title.is_empty() {
        title = tidy(input.text);
    }
    if title.is_empty() {
        title = input.text.trim().to_string();
    }
    d.item.title = title;
    d
}

fn suggest(mut d: Draft, input: &Input<'_>) -> Draft {
    let item = &mut d.item;
    if item.confidence >= SUGGESTION_THRESHOLD {
        return d;
    }

    if item.item_type == ItemType::Task && item.due_date.is_none() {
        item.suggestions.push(SUGGEST_DUE_DATE.to_string());
    }
    if item.category.is_none() {
        item.suggestions.push(SUGGEST_CATEGORY.to_string());
    }
    if item.item_type == ItemType::Event && item.start_time.is_none() {
        item.suggestions.push(SUGGEST_TIME.to_string());
    }
    if item.priority == Priority::Medium && input.lower.contains("important") {
        item.suggestions.push(SUGGEST_HIGH_PRIORITY.to_string());
    }
    d
}

fn insights(mut d: Draft) -> Draft {
    let item = &mut d.item;
    if item.item_type == ItemType::Task && item.due_date.is_none() {
        item.ai_insights.push(INSIGHT_DEADLINE.to_string());
    }
    if item.item_type == ItemType::Event && item.location.is_some() {
        item.ai_insights.push(INSIGHT_TRAVEL.to_string());
    }
    if item.recurrence.is_some() {
        item.ai_insights.push(INSIGHT_HABIT.to_string());
    }
    d
}
