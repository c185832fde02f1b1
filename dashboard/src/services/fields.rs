//! Field fallback chains for inconsistently shaped backend records.
//!
//! Every logical field the normalizers read is declared once here as an
//! ordered list of JSON paths. The first path that yields a present value
//! wins. A value is present when it is not `null` and, for strings, not blank.
//! Arrays and objects count as present even when empty.

use serde_json::Value;

/// Path into a JSON record. Numeric segments index into arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static [&'static str]);

impl FieldPath {
    /// Follow the path; `None` if any segment is missing.
    pub fn get<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(record, |current, segment| match current {
            Value::Object(map) => map.get(*segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Dotted spelling, e.g. `meal.name`.
    pub fn dotted(&self) -> String {
        self.0.join(".")
    }
}

/// Ordered fallback chain for one logical field.
#[derive(Debug, Clone, Copy)]
pub struct FieldChain {
    pub field: &'static str,
    pub paths: &'static [FieldPath],
}

impl FieldChain {
    pub const fn new(field: &'static str, paths: &'static [FieldPath]) -> Self {
        Self { field, paths }
    }

    /// First present value, with the path it came from.
    pub fn resolve_with_path<'a>(&self, record: &'a Value) -> Option<(FieldPath, &'a Value)> {
        self.paths
            .iter()
            .find_map(|path| path.get(record).filter(|v| is_present(v)).map(|v| (*path, v)))
    }

    /// First present value.
    pub fn resolve<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.resolve_with_path(record).map(|(_, v)| v)
    }

    /// First present value rendered as text. Numbers and booleans are
    /// stringified; arrays and objects are skipped.
    pub fn resolve_text(&self, record: &Value) -> Option<String> {
        self.paths
            .iter()
            .filter_map(|path| path.get(record))
            .find_map(scalar_text)
    }

    /// Every present value, in chain order.
    pub fn present<'a>(&'a self, record: &'a Value) -> impl Iterator<Item = &'a Value> + 'a {
        self.paths
            .iter()
            .filter_map(move |path| path.get(record))
            .filter(|v| is_present(v))
    }
}

/// Not null, and not a blank string.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Scalar as text; `None` for null, blank strings, arrays and objects.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Schedule / assignment rows (`admin/schedule/today`).
pub mod schedule {
    use super::{FieldChain, FieldPath};

    pub const MEAL_NAME: FieldChain = FieldChain::new(
        "meal_name",
        &[
            FieldPath(&["meal", "name"]),
            FieldPath(&["mealName"]),
            FieldPath(&["meal_name"]),
            FieldPath(&["name"]),
        ],
    );

    pub const MEAL_TYPE: FieldChain = FieldChain::new(
        "meal_type",
        &[
            FieldPath(&["meal_type"]),
            FieldPath(&["mealType"]),
            FieldPath(&["category"]),
        ],
    );

    pub const START_TIME: FieldChain = FieldChain::new(
        "start_time",
        &[
            FieldPath(&["pickup_time_start"]),
            FieldPath(&["startTime"]),
            FieldPath(&["start_time"]),
        ],
    );

    pub const QUANTITY: FieldChain = FieldChain::new(
        "quantity",
        &[FieldPath(&["quantity"]), FieldPath(&["servings"])],
    );

    pub const PICKED_UP: FieldChain = FieldChain::new(
        "picked_up",
        &[FieldPath(&["picked_up"]), FieldPath(&["pickedUp"])],
    );

    pub const STATUS: FieldChain = FieldChain::new("status", &[FieldPath(&["status"])]);

    pub const UNKNOWN_MEAL: &str = "Unknown Meal";
}

/// Student profiles and assignment rows (`admin/students-with-assignments`).
pub mod student {
    use super::{FieldChain, FieldPath};

    /// Embedded student of an assignment row.
    pub const EMBEDDED_STUDENT: FieldPath = FieldPath(&["student"]);

    pub const ID: FieldChain = FieldChain::new(
        "student_id",
        &[FieldPath(&["student_id"]), FieldPath(&["id"])],
    );

    pub const NAME: FieldChain = FieldChain::new(
        "name",
        &[
            FieldPath(&["name"]),
            FieldPath(&["full_name"]),
            FieldPath(&["display_name"]),
            FieldPath(&["email"]),
        ],
    );

    pub const DIETARY_PREFERENCES: FieldChain = FieldChain::new(
        "dietary_preferences",
        &[
            FieldPath(&["dietaryPreferences"]),
            FieldPath(&["dietary_preferences"]),
        ],
    );

    pub const PROFILE_DIETARY_TYPE: FieldChain = FieldChain::new(
        "dietary_type",
        &[FieldPath(&["profiles", "0", "dietary_type"])],
    );

    pub const SPORT_ACTIVITIES: FieldChain = FieldChain::new(
        "sport_activities",
        &[
            FieldPath(&["sportActivities"]),
            FieldPath(&["sport_activities"]),
            FieldPath(&["profiles", "0", "sport_activities"]),
        ],
    );

    pub const ASSIGNMENT_MEAL_TYPE: FieldChain = FieldChain::new(
        "meal_type",
        &[FieldPath(&["meal_type"]), FieldPath(&["mealType"])],
    );

    pub const ASSIGNMENT_MEAL: FieldPath = FieldPath(&["meal"]);

    pub const MEAL_NAME: FieldChain = FieldChain::new(
        "meal_name",
        &[
            FieldPath(&["name"]),
            FieldPath(&["mealName"]),
            FieldPath(&["meal_name"]),
        ],
    );

    pub const REASON: FieldChain = FieldChain::new("reason", &[FieldPath(&["reason"])]);

    pub const PRE_MERGED_MEALS: FieldChain = FieldChain::new(
        "assigned_meals",
        &[FieldPath(&["assignedMeals"]), FieldPath(&["assigned_meals"])],
    );

    pub const NESTED_ASSIGNMENTS: FieldChain =
        FieldChain::new("meal_assignments", &[FieldPath(&["meal_assignments"])]);

    pub const MISSING_ID: &str = "ID-MISSING";
    pub const UNKNOWN_STUDENT: &str = "Unknown Student";
}
