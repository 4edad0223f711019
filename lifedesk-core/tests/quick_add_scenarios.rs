use chrono::{Duration, NaiveDate, NaiveDateTime};
use lifedesk_core::{
    Category, Interpreter, ItemType, NewRecord, Priority, to_new_record,
};

// 2024-01-03 is a Wednesday.
fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 3)
        .unwrap()
        .and_hms_opt(8, 15, 0)
        .unwrap()
}

fn directory() -> Vec<Category> {
    vec![
        Category::new("cat-personal", "Personal"),
        Category::new("cat-work", "Work"),
        Category::new("cat-shopping", "Shopping"),
    ]
}

/// Regression: the canonical quick-add example.
#[test]
fn test_team_meeting_tomorrow() {
    let interp = Interpreter::standard().unwrap();
    let item = interp.interpret("Team meeting tomorrow at 2pm", &directory(), None, now());

    assert_eq!(item.item_type, ItemType::Event);
    assert_eq!(item.due_date, Some(now().date() + Duration::days(1)));
    assert_eq!(item.start_time.as_deref(), Some("2pm"));
    assert_eq!(item.category.as_deref(), Some("cat-work"));
    assert_eq!(item.title, "Team meeting");
    assert_eq!(item.location, None);
}

#[test]
fn test_tomorrow_is_stripped_from_title() {
    let interp = Interpreter::standard().unwrap();
    for text in ["tomorrow water plants", "water plants tomorrow", "water tomorrow plants"] {
        let item = interp.interpret(text, &[], None, now());
        assert_eq!(item.due_date, Some(NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()));
        assert!(!item.title.to_lowercase().contains("tomorrow"), "{text}");
        assert_eq!(item.title, "water plants");
    }
}

#[test]
fn test_plain_text_is_normalized_task() {
    let interp = Interpreter::standard().unwrap();
    let item = interp.interpret("  - water   plants :", &[], None, now());
    assert_eq!(item.title, "water plants");
    assert_eq!(item.item_type, ItemType::Task);
    assert_eq!(item.due_date, None);
    assert_eq!(item.category, None);
}

#[test]
fn test_priority_independent_of_position() {
    let interp = Interpreter::standard().unwrap();
    let a = interp.interpret("urgent: call mom", &[], None, now());
    let b = interp.interpret("call mom urgent", &[], None, now());
    assert_eq!(a.priority, Priority::High);
    assert_eq!(b.priority, Priority::High);
}

#[test]
fn test_interpretation_is_idempotent() {
    let interp = Interpreter::standard().unwrap();
    let text = "Coffee with Sarah next Wednesday 3pm at Starbucks #social";
    let first = interp.interpret(text, &directory(), None, now());
    let second = interp.interpret(text, &directory(), None, now());
    assert_eq!(first, second);
}

#[test]
fn test_event_record_from_interpreted_text() {
    let interp = Interpreter::standard().unwrap();
    let item = interp.interpret("Dentist appointment 1/15 10:30am", &directory(), None, now());
    assert_eq!(item.item_type, ItemType::Event);

    let NewRecord::Event(event) = to_new_record(&item, &directory(), now().date()).unwrap() else {
        panic!("expected an event record");
    };
    let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    assert_eq!(event.start_at, day.and_hms_opt(10, 30, 0).unwrap());
    assert_eq!(event.end_at, day.and_hms_opt(11, 30, 0).unwrap());
    assert_eq!(event.category_id.as_deref(), Some("cat-personal"));
}

#[test]
fn test_shopping_task_record() {
    let interp = Interpreter::standard().unwrap();
    let item = interp.interpret("buy groceries asap", &directory(), None, now());
    assert_eq!(item.category.as_deref(), Some("cat-shopping"));

    let NewRecord::Task(task) = to_new_record(&item, &directory(), now().date()).unwrap() else {
        panic!("expected a task record");
    };
    assert_eq!(task.title, "buy groceries asap");
    assert_eq!(task.priority, Priority::High);
    assert_eq!(task.category_id.as_deref(), Some("cat-shopping"));
}

#[test]
fn test_confidence_is_not_clamped() {
    let interp = Interpreter::standard().unwrap();
    let item = interp.interpret(
        "urgent client meeting tomorrow 9am weekly at Main office #q3",
        &directory(),
        None,
        now(),
    );
    assert!(item.confidence > 1.0, "confidence {}", item.confidence);
}
