//! Student demand view: one entry per student with their assigned meals.
//!
//! `admin/students-with-assignments` may return bare student profiles,
//! assignment rows that embed a student and a meal, or profiles with
//! pre-mapped `assignedMeals`. [`classify`] turns each raw item into a
//! [`CanonicalRecord`] once; aggregation only ever sees that canonical form.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::fields::{self, schedule as schedule_chain, student as chain};
use crate::error::DataWarning;
use crate::models::MealType;

const SOURCE: &str = "students";

/// Placeholder reason the planner emits when it has nothing specific to say.
pub const PLACEHOLDER_REASON: &str = "AI Balanced Nutrition";

/// Meal assigned to a slot, with the reason shown to staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRef {
    pub meal_name: String,
    pub reason: String,
}

/// Breakfast, lunch and dinner slots of one student.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedMeals {
    pub breakfast: Option<MealRef>,
    pub lunch: Option<MealRef>,
    pub dinner: Option<MealRef>,
}

impl AssignedMeals {
    pub fn get(&self, slot: &MealType) -> Option<&MealRef> {
        match slot {
            MealType::Breakfast => self.breakfast.as_ref(),
            MealType::Lunch => self.lunch.as_ref(),
            MealType::Dinner => self.dinner.as_ref(),
            MealType::Other(_) => None,
        }
    }

    /// Mutable slot; `None` for meal types that are not a slot.
    pub fn slot_mut(&mut self, slot: &MealType) -> Option<&mut Option<MealRef>> {
        match slot {
            MealType::Breakfast => Some(&mut self.breakfast),
            MealType::Lunch => Some(&mut self.lunch),
            MealType::Dinner => Some(&mut self.dinner),
            MealType::Other(_) => None,
        }
    }

    pub fn assigned_count(&self) -> usize {
        [&self.breakfast, &self.lunch, &self.dinner]
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }
}

/// Presentation-ready student row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentViewModel {
    pub id: String,
    pub name: String,
    /// Ordered, without duplicates.
    pub dietary_preferences: Vec<String>,
    pub is_athlete: bool,
    pub assigned_meals: AssignedMeals,
}

/// Meal assignment read from a row or a nested `meal_assignments` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRow {
    pub meal_type: MealType,
    pub meal_name: String,
    /// `None` when missing or the planner placeholder.
    pub reason: Option<String>,
}

impl AssignmentRow {
    /// `Some` only if the value carries both a meal type and a meal.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let meal_type = chain::ASSIGNMENT_MEAL_TYPE.resolve_text(raw)?;
        let meal = chain::ASSIGNMENT_MEAL.get(raw).filter(|v| fields::is_present(v))?;
        let meal_name = match meal {
            Value::Object(_) => chain::MEAL_NAME.resolve_text(meal),
            other => fields::scalar_text(other),
        }
        .unwrap_or_else(|| schedule_chain::UNKNOWN_MEAL.to_string());

        Some(Self {
            meal_type: MealType::parse(&meal_type),
            meal_name,
            reason: backend_reason(raw),
        })
    }
}

/// How a raw item contributes to its student.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordKind<'a> {
    /// A single meal assignment.
    Assignment(AssignmentRow),
    /// A student profile, possibly carrying nested or pre-mapped meals.
    Profile {
        nested: Vec<AssignmentRow>,
        pre_merged: Option<&'a Map<String, Value>>,
    },
}

/// Raw item resolved to `{student, assignment?}`.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord<'a> {
    /// The embedded student for assignment rows, otherwise the item itself.
    pub student: &'a Value,
    /// `student_id` of the outer item when it differs from the item's own `id`.
    pub outer_student_id: Option<String>,
    pub kind: RecordKind<'a>,
}

/// Inspect a raw item once and emit its canonical form.
pub fn classify(item: &Value) -> CanonicalRecord<'_> {
    let student = chain::EMBEDDED_STUDENT
        .get(item)
        .filter(|s| s.is_object())
        .unwrap_or(item);

    let outer_student_id = item
        .get("student_id")
        .filter(|sid| fields::is_present(sid) && item.get("id") != Some(*sid))
        .and_then(fields::scalar_text);

    let kind = match AssignmentRow::from_raw(item) {
        Some(row) => RecordKind::Assignment(row),
        None => RecordKind::Profile {
            nested: chain::NESTED_ASSIGNMENTS
                .resolve(student)
                .and_then(Value::as_array)
                .map(|rows| rows.iter().filter_map(AssignmentRow::from_raw).collect())
                .unwrap_or_default(),
            pre_merged: chain::PRE_MERGED_MEALS
                .resolve(item)
                .and_then(Value::as_object),
        },
    };

    CanonicalRecord {
        student,
        outer_student_id,
        kind,
    }
}

/// Resolve the student id: `student_id`, then `id`, then the outer row's
/// `student_id`, then the shared sentinel.
pub fn resolve_student_id(index: usize, record: &CanonicalRecord<'_>) -> String {
    chain::ID
        .resolve_text(record.student)
        .or_else(|| record.outer_student_id.clone())
        .unwrap_or_else(|| {
            DataWarning::MissingId { record: index }.emit(SOURCE);
            chain::MISSING_ID.to_string()
        })
}

fn display_name(student: &Value) -> String {
    chain::NAME
        .resolve_text(student)
        .unwrap_or_else(|| chain::UNKNOWN_STUDENT.to_string())
}

fn dietary_preferences(student: &Value) -> Vec<String> {
    let listed: Vec<String> = match chain::DIETARY_PREFERENCES.resolve(student) {
        Some(Value::Array(items)) => items.iter().filter_map(fields::scalar_text).collect(),
        Some(other) => fields::scalar_text(other).into_iter().collect(),
        None => chain::PROFILE_DIETARY_TYPE
            .resolve_text(student)
            .filter(|t| !t.trim().eq_ignore_ascii_case("none"))
            .into_iter()
            .collect(),
    };

    let mut prefs: Vec<String> = Vec::with_capacity(listed.len());
    for pref in listed {
        let pref = pref.trim().to_string();
        if !pref.is_empty() && !prefs.contains(&pref) {
            prefs.push(pref);
        }
    }
    prefs
}

fn is_athlete(student: &Value) -> bool {
    chain::SPORT_ACTIVITIES
        .present(student)
        .any(|v| v.as_array().is_some_and(|a| !a.is_empty()))
}

fn backend_reason(raw: &Value) -> Option<String> {
    chain::REASON
        .resolve_text(raw)
        .filter(|r| r.trim() != PLACEHOLDER_REASON)
}

/// Deterministic reason for an assignment the planner did not explain.
///
/// Athlete text wins, then plant-based text, then the first preference,
/// then a generic line.
pub fn synthesize_reason(is_athlete: bool, preferences: &[String], meal_type: &MealType) -> String {
    if is_athlete {
        return match meal_type {
            MealType::Breakfast => {
                "High-protein fuel for peak performance and morning recovery.".to_string()
            }
            _ => "Optimized macro-ratio for athletic endurance and muscle support.".to_string(),
        };
    }
    let plant_based = preferences
        .iter()
        .any(|p| p.eq_ignore_ascii_case("vegan") || p.eq_ignore_ascii_case("vegetarian"));
    if plant_based {
        return "Plant-based nutrient density carefully balanced for energy.".to_string();
    }
    match preferences.first() {
        Some(first) => format!("Tailored for {} requirements with optimal nutrient balance.", first),
        None => "Scientifically balanced for sustained glucose levels and focus.".to_string(),
    }
}

impl StudentViewModel {
    fn new(id: String, student: &Value) -> Self {
        Self {
            id,
            name: display_name(student),
            dietary_preferences: dietary_preferences(student),
            is_athlete: is_athlete(student),
            assigned_meals: AssignedMeals::default(),
        }
    }

    /// Put an assignment in its slot, replacing whatever was there.
    pub fn assign(&mut self, row: &AssignmentRow) {
        let reason = row.reason.clone().unwrap_or_else(|| {
            synthesize_reason(self.is_athlete, &self.dietary_preferences, &row.meal_type)
        });
        match self.assigned_meals.slot_mut(&row.meal_type) {
            Some(slot) => {
                *slot = Some(MealRef {
                    meal_name: row.meal_name.clone(),
                    reason,
                })
            }
            None => log::debug!(
                "{}: ignoring {} assignment for student {}",
                SOURCE,
                row.meal_type,
                self.id
            ),
        }
    }

    /// Shallow-merge a pre-mapped `assignedMeals` object.
    ///
    /// Keys present in `incoming` replace their slot (`null` clears it);
    /// slots not mentioned are left alone.
    pub fn merge_assigned(&mut self, index: usize, incoming: &Map<String, Value>) {
        for (key, value) in incoming {
            let meal_type = MealType::parse(key);
            let meal = match value {
                Value::Null => None,
                Value::Object(_) => Some(self.meal_ref_from_mapped(value, &meal_type)),
                other => {
                    DataWarning::MalformedRecord {
                        record: index,
                        reason: format!("assignedMeals.{} is {}", key, other),
                    }
                    .emit(SOURCE);
                    continue;
                }
            };
            if let Some(slot) = self.assigned_meals.slot_mut(&meal_type) {
                *slot = meal;
            }
        }
    }

    fn meal_ref_from_mapped(&self, value: &Value, meal_type: &MealType) -> MealRef {
        let meal_name = chain::MEAL_NAME
            .resolve_text(value)
            .or_else(|| schedule_chain::MEAL_NAME.resolve_text(value))
            .unwrap_or_else(|| schedule_chain::UNKNOWN_MEAL.to_string());
        let reason = backend_reason(value).unwrap_or_else(|| {
            synthesize_reason(self.is_athlete, &self.dietary_preferences, meal_type)
        });
        MealRef { meal_name, reason }
    }
}

/// Collapse raw items into one view model per student id, in first-seen order.
///
/// Items without any id share the `ID-MISSING` entry.
pub fn aggregate_students(raw: &[Value]) -> Vec<StudentViewModel> {
    let mut students: Vec<StudentViewModel> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (index, item) in raw.iter().enumerate() {
        let record = classify(item);
        let id = resolve_student_id(index, &record);

        let position = *positions.entry(id.clone()).or_insert_with(|| {
            students.push(StudentViewModel::new(id, record.student));
            students.len() - 1
        });
        let student = &mut students[position];

        match &record.kind {
            RecordKind::Assignment(row) => student.assign(row),
            RecordKind::Profile { nested, pre_merged } => {
                for row in nested {
                    student.assign(row);
                }
                if let Some(map) = pre_merged {
                    student.merge_assigned(index, map);
                }
            }
        }
    }

    log::debug!(
        "aggregated {} student rows into {} students",
        raw.len(),
        students.len()
    );
    students
}

/// Case-insensitive match on name or id.
pub fn filter_students<'a>(
    students: &'a [StudentViewModel],
    query: &str,
) -> Vec<&'a StudentViewModel> {
    let needle = query.trim().to_lowercase();
    students
        .iter()
        .filter(|s| {
            needle.is_empty()
                || s.name.to_lowercase().contains(&needle)
                || s.id.to_lowercase().contains(&needle)
        })
        .collect()
}
