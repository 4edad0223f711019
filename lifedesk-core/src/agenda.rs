//! "Today" view derivations: task urgency, event status, agenda ordering,
//! due-date labels and sidebar badge counts.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::records::{StatusUpdate, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskUrgency {
    Overdue,
    /// Due within 2 hours.
    Urgent,
    /// Due within 6 hours.
    Soon,
    Normal,
    NoDeadline,
}

pub fn task_urgency(due: Option<NaiveDateTime>, now: NaiveDateTime) -> TaskUrgency {
    let Some(due) = due else {
        return TaskUrgency::NoDeadline;
    };
    if due < now {
        return TaskUrgency::Overdue;
    }
    let hours = (due - now).num_hours();
    if hours <= 2 {
        TaskUrgency::Urgent
    } else if hours <= 6 {
        TaskUrgency::Soon
    } else {
        TaskUrgency::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "minutes", rename_all = "kebab-case")]
pub enum EventStatus {
    /// Minutes until start.
    StartingSoon(i64),
    Upcoming(i64),
    Later(i64),
    /// Minutes remaining.
    InProgress(i64),
    Completed,
}

pub fn event_status(start: NaiveDateTime, end: NaiveDateTime, now: NaiveDateTime) -> EventStatus {
    if now < start {
        let until = (start - now).num_minutes();
        return if until <= 15 {
            EventStatus::StartingSoon(until)
        } else if until <= 60 {
            EventStatus::Upcoming(until)
        } else {
            EventStatus::Later(until)
        };
    }
    if now > start && now < end {
        return EventStatus::InProgress((end - now).num_minutes());
    }
    EventStatus::Completed
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaTask {
    pub id: String,
    pub title: String,
    #[serde(default = "pending")]
    pub status: TaskStatus,
    pub due: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<NaiveDateTime>,
}

impl AgendaTask {
    pub fn apply(&mut self, update: &StatusUpdate) {
        self.status = update.status;
        self.completed_at = update.completed_at;
    }
}

fn pending() -> TaskStatus {
    TaskStatus::Pending
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaEvent {
    pub id: String,
    pub title: String,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Task,
    Event,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaEntry {
    pub id: String,
    pub title: String,
    pub kind: EntryKind,
    /// Task due or event start; `None` sorts last.
    pub at: Option<NaiveDateTime>,
    pub urgency: TaskUrgency,
}

fn urgency_rank(u: TaskUrgency) -> u8 {
    match u {
        TaskUrgency::Overdue => 0,
        TaskUrgency::Urgent => 1,
        _ => 2,
    }
}

/// Merge tasks and events into one list: overdue first, then urgent, then by
/// time.
pub fn build_agenda(
    tasks: &[AgendaTask],
    events: &[AgendaEvent],
    now: NaiveDateTime,
) -> Vec<AgendaEntry> {
    let mut out: Vec<AgendaEntry> = tasks
        .iter()
        .map(|t| AgendaEntry {
            id: t.id.clone(),
            title: t.title.clone(),
            kind: EntryKind::Task,
            at: t.due,
            urgency: task_urgency(t.due, now),
        })
        .chain(events.iter().map(|e| AgendaEntry {
            id: e.id.clone(),
            title: e.title.clone(),
            kind: EntryKind::Event,
            at: Some(e.start_at),
            urgency: TaskUrgency::Normal,
        }))
        .collect();

    out.sort_by(|a, b| {
        urgency_rank(a.urgency)
            .cmp(&urgency_rank(b.urgency))
            .then_with(|| match (a.at, b.at) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    });
    out
}

/// Human label for a due date relative to `today`.
pub fn due_label(due: NaiveDate, today: NaiveDate) -> String {
    let days = (due - today).num_days();
    match days {
        0 => "Due today".to_string(),
        1 => "Due tomorrow".to_string(),
        -1 => "Was due yesterday".to_string(),
        d if d < -1 => format!("Overdue by {} days", -d),
        d if d <= 7 => format!("Due in {d} days"),
        _ => due.format("%b %-d").to_string(),
    }
}

/// Sidebar badge counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badges {
    pub pending_tasks: usize,
    pub overdue_tasks: usize,
    pub low_stock_supplements: usize,
    pub today_events: usize,
    pub unread: usize,
}

impl Badges {
    /// `low_stock` comes from the supply side; everything else is counted here.
    pub fn tally(
        tasks: &[AgendaTask],
        events: &[AgendaEvent],
        low_stock: usize,
        today: NaiveDate,
    ) -> Self {
        let pending: Vec<&AgendaTask> = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .collect();
        let overdue = pending
            .iter()
            .filter(|t| t.due.is_some_and(|d| d.date() < today))
            .count();
        let today_events = events.iter().filter(|e| e.start_at.date() == today).count();

        Self {
            pending_tasks: pending.len(),
            overdue_tasks: overdue,
            low_stock_supplements: low_stock,
            today_events,
            unread: overdue + low_stock,
        }
    }
}
