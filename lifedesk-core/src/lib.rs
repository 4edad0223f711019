//! lifedesk-core: quick-add interpretation and dashboard derivations
//!
//! Everything here is a pure function of its inputs plus an explicit "now";
//! persistence and notifications belong to the caller.

pub mod agenda;
pub mod history;
pub mod interpreter;
pub mod item;
pub mod prompts;
pub mod records;
pub mod rules;
pub mod time;

pub use agenda::{
    AgendaEntry, AgendaEvent, AgendaTask, Badges, EntryKind, EventStatus, TaskUrgency,
    build_agenda, due_label, event_status, task_urgency,
};
pub use history::{HISTORY_LIMIT, RecentEntries};
pub use interpreter::{Draft, Interpreter, STAGES, Stage};
pub use item::{CandidateItem, Category, ItemType, Priority};
pub use prompts::examples_for;
pub use records::{NewRecord, StatusUpdate, TaskRecord, TaskStatus, status_update, to_new_record};
pub use rules::{DateResolve, RuleConfig, RuleSet};
pub use time::{clock_time, local_now};
