//! `agenda.toml`: the tasks and events the `today` and `move` commands read.
//!
//! ```toml
//! [[task]]
//! id = "t1"
//! title = "Submit report"
//! due = "2024-06-10T17:00:00"
//!
//! [[event]]
//! id = "e1"
//! title = "Standup"
//! start_at = "2024-06-10T09:30:00"
//! end_at = "2024-06-10T09:45:00"
//! ```
//!
//! Timestamps are quoted local times.

use anyhow::{Context, Result, bail};
use lifedesk_core::{AgendaEvent, AgendaTask, StatusUpdate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgendaFile {
    #[serde(default)]
    pub task: Vec<AgendaTask>,
    #[serde(default)]
    pub event: Vec<AgendaEvent>,
}

impl AgendaFile {
    pub fn parse(toml_text: &str) -> Result<Self> {
        toml::from_str(toml_text).context("parse agenda")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::parse(&s).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let s = toml::to_string_pretty(self).context("serialize agenda")?;
        fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn apply(&mut self, task_id: &str, update: &StatusUpdate) -> Result<&AgendaTask> {
        let Some(task) = self.task.iter_mut().find(|t| t.id == task_id) else {
            bail!("no task with id {task_id}");
        };
        task.apply(update);
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lifedesk_core::{TaskStatus, status_update};

    const SAMPLE: &str = r#"
[[task]]
id = "t1"
title = "Submit report"
due = "2024-06-10T17:00:00"

[[task]]
id = "t2"
title = "Someday"

[[event]]
id = "e1"
title = "Standup"
start_at = "2024-06-10T09:30:00"
end_at = "2024-06-10T09:45:00"
location = "Room 2"
"#;

    #[test]
    fn test_parse_sample() {
        let a = AgendaFile::parse(SAMPLE).unwrap();
        assert_eq!(a.task.len(), 2);
        assert_eq!(a.task[0].status, TaskStatus::Pending);
        assert_eq!(a.task[1].due, None);
        assert_eq!(a.event[0].location.as_deref(), Some("Room 2"));
    }

    #[test]
    fn test_move_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agenda.toml");
        fs::write(&path, SAMPLE).unwrap();

        let now = NaiveDate::from_ymd_opt(2024, 6, 10)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap();
        let mut a = AgendaFile::load(&path).unwrap();
        a.apply("t1", &status_update(TaskStatus::Completed, now)).unwrap();
        a.save(&path).unwrap();

        let back = AgendaFile::load(&path).unwrap();
        assert_eq!(back.task[0].status, TaskStatus::Completed);
        assert_eq!(back.task[0].completed_at, Some(now));
        assert_eq!(back.event.len(), 1);
    }

    #[test]
    fn test_unknown_task_id() {
        let mut a = AgendaFile::parse(SAMPLE).unwrap();
        let now = NaiveDate::from_ymd_opt(2024, 6, 10)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap();
        assert!(a.apply("nope", &status_update(TaskStatus::Completed, now)).is_err());
    }
}
