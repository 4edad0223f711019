use chrono::NaiveDate;
use lifedesk_supply::inventory::parse_inventory;
use lifedesk_supply::{
    RestockEmitter, SupplyStatus, consumption_rate_label, project_all, reorder_advice,
    sort_by_urgency,
};

const INVENTORY: &str = r#"
[[supplement]]
id = "omega"
name = "Omega-3"
quantity_servings = 30
servings_per_day = 2
category_id = "shopping"

[[supplement]]
id = "mag"
name = "Magnesium"
quantity_servings = 10
servings_per_day = 5
category_id = "shopping"

[[supplement]]
id = "probiotic"
name = "Probiotic"
quantity_servings = 60

[[supplement]]
id = "b12"
name = "B12"
quantity_servings = 12
servings_per_day = 0.5
category_id = "shopping"
"#;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// End to end: file text -> projections -> urgency order -> restock tasks.
#[test]
fn test_inventory_projection_pipeline() {
    let items = parse_inventory(INVENTORY).unwrap();
    let mut projected = project_all(&items, as_of());
    sort_by_urgency(&mut projected);

    let order: Vec<&str> = projected.iter().map(|p| p.supplement.id.as_str()).collect();
    assert_eq!(order, vec!["mag", "omega", "b12", "probiotic"]);

    let omega = projected.iter().find(|p| p.supplement.id == "omega").unwrap();
    assert_eq!(omega.projection.days_left, Some(15));
    assert_eq!(omega.projection.status, SupplyStatus::Good);
    assert_eq!(omega.projection.run_out_date, NaiveDate::from_ymd_opt(2024, 1, 16));

    let b12 = projected.iter().find(|p| p.supplement.id == "b12").unwrap();
    assert_eq!(b12.projection.days_left, Some(24));
    assert_eq!(consumption_rate_label(b12.supplement.servings_per_day), "Every 2 days");
    assert!(reorder_advice(&b12.projection).is_none());

    let probiotic = projected.last().unwrap();
    assert_eq!(probiotic.projection.status, SupplyStatus::NoData);
    assert_eq!(probiotic.projection.days_left, None);

    let (tasks, skipped) = RestockEmitter::emit(&projected);
    assert!(skipped.is_empty());
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    // Omega-3 has 15 days left, past the 14-day advice window.
    assert_eq!(titles, vec!["Buy Magnesium"]);
}

#[test]
fn test_projection_serializes_for_ui() {
    let items = parse_inventory(INVENTORY).unwrap();
    let projected = project_all(&items, as_of());
    let v = serde_json::to_value(&projected[1].projection).unwrap();
    assert_eq!(v["status"], "critical");
    assert_eq!(v["daysLeft"], 2);
    assert_eq!(v["runOutDate"], "2024-01-03");
}
