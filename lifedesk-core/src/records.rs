//! Translation of candidate items into the storage service's record shapes.
//!
//! The core never talks to the database; the caller takes one of these and
//! inserts it wherever it persists things.

use anyhow::{Result, bail};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::item::{CandidateItem, Category, ItemType, Priority};
use crate::time::clock_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pending" | "todo" => Ok(TaskStatus::Pending),
            "in_progress" | "doing" => Ok(TaskStatus::InProgress),
            "completed" | "done" => Ok(TaskStatus::Completed),
            other => bail!("unknown task status: {other}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub category_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub recur_rule: Option<String>,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub category_id: Option<String>,
    pub title: String,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub location: Option<String>,
    pub recur_rule: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub category_id: Option<String>,
    pub content_md: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "table", rename_all = "snake_case")]
pub enum NewRecord {
    Task(TaskRecord),
    Event(EventRecord),
    Note(NoteRecord),
}

impl NewRecord {
    pub fn table(&self) -> &'static str {
        match self {
            NewRecord::Task(_) => "tasks",
            NewRecord::Event(_) => "events",
            NewRecord::Note(_) => "notes",
        }
    }
}

fn default_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Build the record to insert for a candidate.
///
/// Unmatched category falls back to the first directory entry. Events
/// without a date land on `today`, without a start at 09:00, and without an
/// end time last one hour. A parsed end time is taken as-is on the event's
/// date, even when it falls before the start: the interpreter measures
/// durations from the moment of entry, not from the start time.
pub fn to_new_record(
    item: &CandidateItem,
    categories: &[Category],
    today: NaiveDate,
) -> Result<NewRecord> {
    let title = item.title.trim();
    if title.is_empty() {
        bail!("refusing to create a record with an empty title");
    }

    let category_id = item
        .category
        .clone()
        .or_else(|| categories.first().map(|c| c.id.clone()));

    let record = match item.item_type {
        ItemType::Task => NewRecord::Task(TaskRecord {
            category_id,
            title: title.to_string(),
            description: None,
            due_date: item.due_date,
            priority: item.priority,
            recur_rule: item.recurrence.clone(),
            status: TaskStatus::Pending,
        }),
        ItemType::Event => {
            let date = item.due_date.unwrap_or(today);
            let start = item
                .start_time
                .as_deref()
                .and_then(clock_time)
                .unwrap_or_else(default_start);
            let start_at = date.and_time(start);
            let end_at = item
                .end_time
                .as_deref()
                .and_then(clock_time)
                .map(|t| date.and_time(t))
                .or_else(|| {
                    Duration::try_hours(1).and_then(|h| start_at.checked_add_signed(h))
                })
                .unwrap_or(start_at);

            NewRecord::Event(EventRecord {
                category_id,
                title: title.to_string(),
                start_at,
                end_at,
                location: item.location.clone(),
                recur_rule: item.recurrence.clone(),
            })
        }
        ItemType::Note | ItemType::Idea => NewRecord::Note(NoteRecord {
            category_id,
            content_md: title.to_string(),
        }),
    };

    Ok(record)
}

/// Field changes for moving a task between board columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: TaskStatus,
    pub completed_at: Option<NaiveDateTime>,
}

/// Completing stamps `completed_at`; any other move clears it.
pub fn status_update(status: TaskStatus, now: NaiveDateTime) -> StatusUpdate {
    StatusUpdate {
        status,
        completed_at: (status == TaskStatus::Completed).then_some(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        today().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_task_defaults_to_first_category() {
        let item = CandidateItem::new("Buy milk", ItemType::Task);
        let cats = vec![Category::new("c1", "Home"), Category::new("c2", "Work")];
        let NewRecord::Task(t) = to_new_record(&item, &cats, today()).unwrap() else {
            panic!("expected task");
        };
        assert_eq!(t.category_id.as_deref(), Some("c1"));
        assert_eq!(t.status, TaskStatus::Pending);
        assert_eq!(t.priority, Priority::Medium);
    }

    #[test]
    fn test_event_default_start_and_hour_length() {
        let item = CandidateItem::new("Standup", ItemType::Event);
        let NewRecord::Event(e) = to_new_record(&item, &[], today()).unwrap() else {
            panic!("expected event");
        };
        assert_eq!(e.start_at, at(9, 0));
        assert_eq!(e.end_at, at(10, 0));
    }

    #[test]
    fn test_event_uses_parsed_times() {
        let mut item = CandidateItem::new("Review", ItemType::Event);
        item.start_time = Some("2pm".to_string());
        item.end_time = Some("16:30".to_string());
        let NewRecord::Event(e) = to_new_record(&item, &[], today()).unwrap() else {
            panic!("expected event");
        };
        assert_eq!(e.start_at, at(14, 0));
        assert_eq!(e.end_at, at(16, 30));
    }

    #[test]
    fn test_duration_end_counts_from_entry_not_start() {
        // "workshop 3pm for 2 hours" typed at 10:00.
        let mut item = CandidateItem::new("workshop", ItemType::Event);
        item.start_time = Some("3pm".to_string());
        item.end_time = Some("12:00".to_string());
        let NewRecord::Event(e) = to_new_record(&item, &[], today()).unwrap() else {
            panic!("expected event");
        };
        assert_eq!(e.start_at, at(15, 0));
        assert_eq!(e.end_at, at(12, 0));
        assert!(e.end_at < e.start_at);
    }

    #[test]
    fn test_idea_becomes_note() {
        let item = CandidateItem::new("dark mode", ItemType::Idea);
        let rec = to_new_record(&item, &[], today()).unwrap();
        assert_eq!(rec.table(), "notes");
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["table"], "note");
        assert_eq!(v["content_md"], "dark mode");
    }

    #[test]
    fn test_empty_title_rejected() {
        let item = CandidateItem::new("   ", ItemType::Task);
        assert!(to_new_record(&item, &[], today()).is_err());
    }

    #[test]
    fn test_status_update_stamps_completion() {
        let now = at(12, 0);
        assert_eq!(status_update(TaskStatus::Completed, now).completed_at, Some(now));
        assert_eq!(status_update(TaskStatus::InProgress, now).completed_at, None);
    }

    #[test]
    fn test_status_parses_board_aliases() {
        assert_eq!("done".parse::<TaskStatus>().unwrap(), TaskStatus::Completed);
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert!("archived".parse::<TaskStatus>().is_err());
    }
}
