//! Candidate item model: the structured guess the quick-add box produces
//! before anything is persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Task,
    Event,
    Note,
    Idea,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Task => "task",
            ItemType::Event => "event",
            ItemType::Note => "note",
            ItemType::Idea => "idea",
        }
    }
}

impl std::str::FromStr for ItemType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "task" => Ok(ItemType::Task),
            "event" => Ok(ItemType::Event),
            "note" => Ok(ItemType::Note),
            "idea" => Ok(ItemType::Idea),
            other => Err(anyhow::anyhow!("unknown item type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// Entry of the category directory the interpreter matches against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Output of the text interpreter.
///
/// Serialized with camelCase keys so it can be handed to a web front end as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateItem {
    pub title: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Category id from the supplied directory.
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
    /// Matched time fragment as typed ("2pm", "evening", "14:30").
    pub start_time: Option<String>,
    /// `HH:MM`.
    pub end_time: Option<String>,
    pub priority: Priority,
    pub recurrence: Option<String>,
    pub location: Option<String>,
    pub tags: Vec<String>,
    /// Additive, not clamped.
    pub confidence: f64,
    pub suggestions: Vec<String>,
    pub ai_insights: Vec<String>,
}

/// Confidence every candidate starts with before any rule matches.
pub const BASE_CONFIDENCE: f64 = 0.5;

/// Below this, the interpreter attaches improvement hints.
pub const SUGGESTION_THRESHOLD: f64 = 0.7;

impl CandidateItem {
    pub fn new(title: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            title: title.into(),
            item_type,
            category: None,
            due_date: None,
            start_time: None,
            end_time: None,
            priority: Priority::Medium,
            recurrence: None,
            location: None,
            tags: Vec::new(),
            confidence: BASE_CONFIDENCE,
            suggestions: Vec::new(),
            ai_insights: Vec::new(),
        }
    }

    /// Confidence as a whole percentage, the way the UI toasts show it.
    pub fn confidence_percent(&self) -> i64 {
        (self.confidence * 100.0).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_parse() {
        assert_eq!("Event".parse::<ItemType>().unwrap(), ItemType::Event);
        assert_eq!(" idea ".parse::<ItemType>().unwrap(), ItemType::Idea);
        assert!("chore".parse::<ItemType>().is_err());
    }

    #[test]
    fn test_candidate_serializes_camel_case() {
        let item = CandidateItem::new("Buy milk", ItemType::Task);
        let v = serde_json::to_value(&item).unwrap();
        assert_eq!(v["type"], "task");
        assert_eq!(v["priority"], "medium");
        assert!(v.get("dueDate").is_some());
        assert!(v.get("aiInsights").is_some());
    }

    #[test]
    fn test_confidence_percent_rounds() {
        let mut item = CandidateItem::new("x", ItemType::Note);
        item.confidence = 0.5 + 0.25 + 0.2;
        assert_eq!(item.confidence_percent(), 95);
    }
}
