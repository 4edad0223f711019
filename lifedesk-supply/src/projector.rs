//! Supplement run-out projection.
//!
//! servings left / servings per day -> whole days left -> run-out date ->
//! status bucket. Pure; the caller supplies `as_of`.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Ordered by severity: sorting ascending puts critical first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupplyStatus {
    /// 3 days or less.
    Critical,
    /// 7 days or less.
    Warning,
    /// 14 days or less.
    Low,
    Good,
    NoData,
}

impl SupplyStatus {
    pub fn from_days_left(days: i64) -> Self {
        if days <= 3 {
            SupplyStatus::Critical
        } else if days <= 7 {
            SupplyStatus::Warning
        } else if days <= 14 {
            SupplyStatus::Low
        } else {
            SupplyStatus::Good
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SupplyStatus::Critical => "critical",
            SupplyStatus::Warning => "warning",
            SupplyStatus::Low => "low",
            SupplyStatus::Good => "good",
            SupplyStatus::NoData => "no-data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub days_left: Option<i64>,
    pub run_out_date: Option<NaiveDate>,
    pub status: SupplyStatus,
}

impl Projection {
    pub fn no_data() -> Self {
        Self {
            days_left: None,
            run_out_date: None,
            status: SupplyStatus::NoData,
        }
    }
}

/// Project when a supply runs out.
///
/// Missing inputs or a non-positive rate give `NoData`.
pub fn project(
    quantity_servings: Option<f64>,
    servings_per_day: Option<f64>,
    as_of: NaiveDate,
) -> Projection {
    let (Some(qty), Some(rate)) = (quantity_servings, servings_per_day) else {
        return Projection::no_data();
    };
    if !(rate > 0.0) || !qty.is_finite() {
        return Projection::no_data();
    }

    let days_left = (qty / rate).floor() as i64;
    Projection {
        days_left: Some(days_left),
        run_out_date: Duration::try_days(days_left).and_then(|d| as_of.checked_add_signed(d)),
        status: SupplyStatus::from_days_left(days_left),
    }
}

/// "Daily", "3x daily", "Every 2 days"; "Unknown" without a rate.
pub fn consumption_rate_label(servings_per_day: Option<f64>) -> String {
    match servings_per_day {
        Some(r) if r == 1.0 => "Daily".to_string(),
        Some(r) if r > 1.0 => format!("{}x daily", trim_float(r)),
        Some(r) if r > 0.0 => format!("Every {} days", (1.0 / r).round() as i64),
        _ => "Unknown".to_string(),
    }
}

fn trim_float(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderUrgency {
    Immediate,
    Soon,
    Plan,
}

impl ReorderUrgency {
    pub fn from_days_left(days: i64) -> Option<Self> {
        if days <= 3 {
            Some(ReorderUrgency::Immediate)
        } else if days <= 7 {
            Some(ReorderUrgency::Soon)
        } else if days <= 14 {
            Some(ReorderUrgency::Plan)
        } else {
            None
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ReorderUrgency::Immediate => "🚨 Order immediately - running out in 3 days or less",
            ReorderUrgency::Soon => "⚠️ Consider ordering soon - 1 week supply remaining",
            ReorderUrgency::Plan => "📅 Plan to reorder in the next week",
        }
    }

    pub fn action(self) -> &'static str {
        match self {
            ReorderUrgency::Immediate => "Order Now",
            ReorderUrgency::Soon => "Add to Cart",
            ReorderUrgency::Plan => "Set Reminder",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderAdvice {
    pub urgency: ReorderUrgency,
    pub message: &'static str,
    pub action: &'static str,
}

/// Advisory only. A supplement that has run out is the most urgent case.
pub fn reorder_advice(projection: &Projection) -> Option<ReorderAdvice> {
    let urgency = ReorderUrgency::from_days_left(projection.days_left?)?;
    Some(ReorderAdvice {
        urgency,
        message: urgency.message(),
        action: urgency.action(),
    })
}

/// Share of the original supply still left, 0-100.
pub fn progress_percent(
    projection: &Projection,
    quantity_servings: Option<f64>,
    servings_per_day: Option<f64>,
) -> f64 {
    let (Some(days), Some(qty), Some(rate)) =
        (projection.days_left, quantity_servings, servings_per_day)
    else {
        return 0.0;
    };
    if days == 0 || qty == 0.0 || rate <= 0.0 {
        return 0.0;
    }
    let total_days = qty / rate;
    (days as f64 / total_days * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan1() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_thirty_servings_two_a_day() {
        let p = project(Some(30.0), Some(2.0), jan1());
        assert_eq!(p.days_left, Some(15));
        // Past the 14-day bucket edge.
        assert_eq!(p.status, SupplyStatus::Good);
        assert_eq!(p.run_out_date, NaiveDate::from_ymd_opt(2024, 1, 16));
    }

    #[test]
    fn test_bucket_edges() {
        let status = |q: f64| project(Some(q), Some(1.0), jan1()).status;
        assert_eq!(status(3.0), SupplyStatus::Critical);
        assert_eq!(status(4.0), SupplyStatus::Warning);
        assert_eq!(status(7.0), SupplyStatus::Warning);
        assert_eq!(status(8.0), SupplyStatus::Low);
        assert_eq!(status(14.0), SupplyStatus::Low);
        assert_eq!(status(15.0), SupplyStatus::Good);
    }

    #[test]
    fn test_ten_servings_five_a_day_is_critical() {
        let p = project(Some(10.0), Some(5.0), jan1());
        assert_eq!(p.days_left, Some(2));
        assert_eq!(p.status, SupplyStatus::Critical);
    }

    #[test]
    fn test_missing_or_zero_rate_is_no_data() {
        assert_eq!(project(Some(30.0), None, jan1()), Projection::no_data());
        assert_eq!(project(None, Some(1.0), jan1()), Projection::no_data());
        assert_eq!(project(Some(30.0), Some(0.0), jan1()), Projection::no_data());
        assert_eq!(project(Some(30.0), Some(-1.0), jan1()), Projection::no_data());
    }

    #[test]
    fn test_floor_of_fractional_days() {
        let p = project(Some(10.0), Some(3.0), jan1());
        assert_eq!(p.days_left, Some(3));
        assert_eq!(p.status, SupplyStatus::Critical);
        let p = project(Some(15.0), Some(2.0), jan1());
        assert_eq!(p.days_left, Some(7));
        assert_eq!(p.status, SupplyStatus::Warning);
    }

    #[test]
    fn test_status_order_by_severity() {
        let mut v = vec![
            SupplyStatus::Good,
            SupplyStatus::Critical,
            SupplyStatus::NoData,
            SupplyStatus::Warning,
        ];
        v.sort();
        assert_eq!(
            v,
            vec![
                SupplyStatus::Critical,
                SupplyStatus::Warning,
                SupplyStatus::Good,
                SupplyStatus::NoData
            ]
        );
    }

    #[test]
    fn test_rate_labels() {
        assert_eq!(consumption_rate_label(Some(1.0)), "Daily");
        assert_eq!(consumption_rate_label(Some(3.0)), "3x daily");
        assert_eq!(consumption_rate_label(Some(1.5)), "1.5x daily");
        assert_eq!(consumption_rate_label(Some(0.5)), "Every 2 days");
        assert_eq!(consumption_rate_label(Some(1.0 / 3.0)), "Every 3 days");
        assert_eq!(consumption_rate_label(None), "Unknown");
    }

    #[test]
    fn test_reorder_tiers() {
        let advice = |q: f64| reorder_advice(&project(Some(q), Some(1.0), jan1()));
        assert_eq!(advice(3.0).map(|a| a.urgency), Some(ReorderUrgency::Immediate));
        assert_eq!(advice(7.0).map(|a| a.urgency), Some(ReorderUrgency::Soon));
        assert_eq!(advice(14.0).map(|a| a.urgency), Some(ReorderUrgency::Plan));
        assert_eq!(advice(15.0), None);
        assert_eq!(advice(0.0).map(|a| a.urgency), Some(ReorderUrgency::Immediate));
        assert_eq!(reorder_advice(&Projection::no_data()), None);
        assert_eq!(advice(3.0).unwrap().action, "Order Now");
        assert_eq!(
            advice(10.0).unwrap().message,
            "📅 Plan to reorder in the next week"
        );
    }

    #[test]
    fn test_progress_percent() {
        let p = project(Some(30.0), Some(2.0), jan1());
        assert_eq!(progress_percent(&p, Some(30.0), Some(2.0)), 100.0);
        assert_eq!(progress_percent(&Projection::no_data(), None, None), 0.0);
    }
}
