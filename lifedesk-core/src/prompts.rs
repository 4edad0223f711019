//! Example inputs offered under the quick-add box.

pub const EXAMPLES: [&str; 15] = [
    "Team meeting tomorrow at 2pm in conference room A",
    "Buy groceries - milk, bread, eggs urgent",
    "CS101 assignment due Friday - data structures project",
    "Call mom this evening to check in",
    "Workout at gym 6pm - leg day",
    "Note: Meeting insights from client call",
    "Idea: New app feature for better UX",
    "Pay rent by the 1st high priority",
    "Dentist appointment next Tuesday 10am",
    "Project deadline Friday - final review needed",
    "Take vitamin D 2000 IU daily",
    "Coffee with Sarah next Wednesday 3pm at Starbucks",
    "Book flight to NYC for conference",
    "Review quarterly goals and metrics",
    "Plan birthday party for next month",
];

const IDLE_COUNT: usize = 3;
const MAX_MATCHES: usize = 5;

/// Examples relevant to what's typed so far.
///
/// Empty input shows the first few. Otherwise an example qualifies if it
/// contains the whole input or any input word longer than two characters.
pub fn examples_for(input: &str) -> Vec<&'static str> {
    if input.is_empty() {
        return EXAMPLES.iter().take(IDLE_COUNT).copied().collect();
    }

    let needle = input.to_lowercase();
    let words: Vec<&str> = needle.split(' ').filter(|w| w.len() > 2).collect();

    EXAMPLES
        .iter()
        .filter(|ex| {
            let ex = ex.to_lowercase();
            ex.contains(&needle) || words.iter().any(|w| ex.contains(w))
        })
        .take(MAX_MATCHES)
        .copied()
        .collect()
}
