//! Restock emitter: turns low supplements into shopping-list tasks and
//! reminder dates.

use anyhow::{Result, bail};
use chrono::{Duration, NaiveDate};
use lifedesk_core::records::{TaskRecord, TaskStatus};
use lifedesk_core::Priority;

use crate::inventory::{Projected, Supplement};
use crate::projector::{Projection, SupplyStatus, reorder_advice};

const DEFAULT_SERVINGS: f64 = 30.0;
const DEFAULT_RATE: f64 = 1.0;
const REMINDER_LEAD_DAYS: i64 = 7;

pub struct RestockEmitter;

impl RestockEmitter {
    /// Shopping task for one supplement. Needs a category to file it under.
    pub fn shopping_task(supplement: &Supplement, projection: &Projection) -> Result<TaskRecord> {
        let Some(category_id) = supplement.category_id.clone() else {
            bail!(
                "cannot add {} to the shopping list: missing category",
                supplement.name
            );
        };

        let priority = if projection.status == SupplyStatus::Critical {
            Priority::High
        } else {
            Priority::Medium
        };

        Ok(TaskRecord {
            category_id: Some(category_id),
            title: format!("Buy {}", supplement.name),
            description: Some(format!(
                "Supplement reorder - {} servings, {} per day",
                supplement.quantity_servings.unwrap_or(DEFAULT_SERVINGS),
                supplement.servings_per_day.unwrap_or(DEFAULT_RATE),
            )),
            due_date: None,
            priority,
            recur_rule: None,
            status: TaskStatus::Pending,
        })
    }

    /// Shopping tasks for every projected supplement that has reorder advice,
    /// most urgent first. Entries without a category are skipped and
    /// returned by name.
    pub fn emit(projected: &[Projected]) -> (Vec<TaskRecord>, Vec<String>) {
        let mut tasks = Vec::new();
        let mut skipped = Vec::new();

        let mut due: Vec<&Projected> = projected
            .iter()
            .filter(|p| reorder_advice(&p.projection).is_some())
            .collect();
        due.sort_by(|a, b| crate::inventory::compare_urgency(&a.projection, &b.projection));

        for p in due {
            match Self::shopping_task(&p.supplement, &p.projection) {
                Ok(t) => tasks.push(t),
                Err(e) => {
                    tracing::warn!(supplement = %p.supplement.name, "{e}");
                    skipped.push(p.supplement.name.clone());
                }
            }
        }

        (tasks, skipped)
    }

    /// One week before the run-out date.
    pub fn reminder_date(projection: &Projection) -> Option<NaiveDate> {
        let lead = Duration::try_days(REMINDER_LEAD_DAYS)?;
        projection.run_out_date?.checked_sub_signed(lead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::project_all;
    use crate::projector::project;

    fn jan1() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn supp(name: &str, qty: f64, category: Option<&str>) -> Supplement {
        Supplement {
            id: name.to_lowercase(),
            name: name.to_string(),
            quantity_servings: Some(qty),
            servings_per_day: Some(1.0),
            category_id: category.map(str::to_string),
        }
    }

    #[test]
    fn test_critical_is_high_priority() {
        let s = supp("Magnesium", 2.0, Some("shop"));
        let task = RestockEmitter::shopping_task(&s, &project(Some(2.0), Some(1.0), jan1())).unwrap();
        assert_eq!(task.title, "Buy Magnesium");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(
            task.description.as_deref(),
            Some("Supplement reorder - 2 servings, 1 per day")
        );
    }

    #[test]
    fn test_missing_category_fails() {
        let s = supp("Zinc", 5.0, None);
        let err = RestockEmitter::shopping_task(&s, &project(Some(5.0), Some(1.0), jan1())).unwrap_err();
        assert!(err.to_string().contains("missing category"));
    }

    #[test]
    fn test_emit_only_advised_items() {
        let items = vec![
            supp("Plenty", 90.0, Some("shop")),
            supp("Soon", 6.0, Some("shop")),
            supp("Now", 1.0, Some("shop")),
            supp("Orphan", 10.0, None),
        ];
        let projected = project_all(&items, jan1());
        let (tasks, skipped) = RestockEmitter::emit(&projected);
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Buy Now", "Buy Soon"]);
        assert_eq!(tasks[1].priority, Priority::Medium);
        assert_eq!(skipped, vec!["Orphan".to_string()]);
    }

    #[test]
    fn test_run_out_supplement_is_restocked() {
        let mut s = supp("Iron", 1.0, Some("shop"));
        s.servings_per_day = Some(2.0);
        let projected = project_all(&[s], jan1());
        assert_eq!(projected[0].projection.days_left, Some(0));

        let (tasks, skipped) = RestockEmitter::emit(&projected);
        assert!(skipped.is_empty());
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Buy Iron");
        assert_eq!(tasks[0].priority, Priority::High);
    }

    #[test]
    fn test_reminder_week_before_run_out() {
        let p = project(Some(30.0), Some(2.0), jan1());
        assert_eq!(
            RestockEmitter::reminder_date(&p),
            NaiveDate::from_ymd_opt(2024, 1, 9)
        );
        assert_eq!(RestockEmitter::reminder_date(&Projection::no_data()), None);
    }
}
