//! Cooking schedule: group raw assignment rows into production units.
//!
//! Raw rows come from `admin/schedule/today` and name the same dish in many
//! ways (`meal.name`, `mealName`, mixed case, times with seconds). Rows that
//! agree on normalized name, start time and meal type are folded into one
//! [`GroupedProductionUnit`]. Servings are summed and completion is an AND
//! over the members, so the result does not depend on input order.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{self, schedule as chain};
use crate::error::DataWarning;
use crate::models::MealType;

const SOURCE: &str = "schedule";

/// Start time used when a row has no readable `H:MM` component.
pub const FALLBACK_TIME: &str = "00:00";

/// One production batch on the cooking schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedProductionUnit {
    /// Grouping key: `name_time_type`, normalized.
    pub key: String,
    pub name: String,
    /// Zero-padded `HH:MM`.
    pub normalized_time: String,
    pub meal_type: MealType,
    pub total_servings: u64,
    pub is_completed: bool,
    /// Number of raw rows folded into this unit.
    pub entry_count: usize,
}

/// Canonical reading of one raw schedule row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub name: String,
    pub meal_type: MealType,
    pub normalized_time: String,
    pub quantity: u64,
    pub completed: bool,
}

impl ScheduleEntry {
    /// Read a raw row, repairing unreadable fields.
    ///
    /// `index` is the row position, used only in warnings.
    pub fn from_raw(index: usize, raw: &Value) -> Self {
        let name = chain::MEAL_NAME
            .resolve_text(raw)
            .map(|n| n.trim().to_string())
            .unwrap_or_else(|| chain::UNKNOWN_MEAL.to_string());

        let meal_type = chain::MEAL_TYPE
            .resolve_text(raw)
            .map(|t| MealType::parse(&t))
            .unwrap_or_default();

        let normalized_time = match chain::START_TIME.resolve(raw) {
            None => FALLBACK_TIME.to_string(),
            Some(value) => {
                let text = fields::scalar_text(value).unwrap_or_default();
                parse_time(&text).unwrap_or_else(|| {
                    DataWarning::UnparsableTime {
                        record: index,
                        raw: value.to_string(),
                    }
                    .emit(SOURCE);
                    FALLBACK_TIME.to_string()
                })
            }
        };

        let quantity = match chain::QUANTITY.resolve(raw) {
            None => 1,
            Some(value) => parse_quantity(value).unwrap_or_else(|| {
                DataWarning::BadQuantity {
                    record: index,
                    raw: value.to_string(),
                }
                .emit(SOURCE);
                1
            }),
        };

        Self {
            name,
            meal_type,
            normalized_time,
            quantity,
            completed: is_completed(raw),
        }
    }

    /// Composite grouping key.
    pub fn group_key(&self) -> String {
        format!(
            "{}_{}_{}",
            normalize_key_part(&self.name),
            self.normalized_time,
            normalize_key_part(self.meal_type.as_str())
        )
    }
}

fn time_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(\d{1,2})[:.](\d{2})").ok())
        .as_ref()
}

/// Extract a zero-padded `HH:MM` from free-form text.
///
/// Accepts `7:05`, `07:05:30`, `07.05` and ISO timestamps; the first match wins.
pub fn parse_time(raw: &str) -> Option<String> {
    let caps = time_pattern()?.captures(raw)?;
    Some(format!("{:0>2}:{}", &caps[1], &caps[2]))
}

/// Largest quantity a single row may carry; anything above is unreadable.
pub const MAX_QUANTITY: u64 = u32::MAX as u64;

/// Non-negative integer quantity; fractions truncate. `None` if unreadable.
///
/// Strings must be numeric as a whole: `"12abc"` is unreadable rather than
/// `12`, so a typo surfaces as a `BadQuantity` warning instead of a silently
/// truncated count. Values above [`MAX_QUANTITY`] are unreadable too.
pub fn parse_quantity(value: &Value) -> Option<u64> {
    let number = match value {
        Value::Number(n) => n.as_u64().map(|v| v as f64).or_else(|| n.as_f64()),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (number.is_finite() && (0.0..=MAX_QUANTITY as f64).contains(&number))
        .then(|| number.trunc() as u64)
}

/// Lowercase and strip everything that is not alphanumeric.
pub fn normalize_key_part(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Picked up, or status `completed` (any case).
pub fn is_completed(raw: &Value) -> bool {
    let picked_up = chain::PICKED_UP
        .present(raw)
        .any(|v| v.as_bool() == Some(true));
    let status_done = chain::STATUS
        .resolve(raw)
        .and_then(Value::as_str)
        .is_some_and(|s| s.trim().eq_ignore_ascii_case("completed"));
    picked_up || status_done
}

/// Fold raw schedule rows into production units sorted by start time.
///
/// Never fails: unreadable quantities count as 1 and unreadable times group
/// at `00:00`, both logged as warnings. Within a group the display name is
/// the lexicographically smallest spelling, so permuting the input yields
/// identical output.
pub fn group_schedule(raw: &[Value]) -> Vec<GroupedProductionUnit> {
    let mut groups: BTreeMap<(String, String), GroupedProductionUnit> = BTreeMap::new();

    for (index, row) in raw.iter().enumerate() {
        let entry = ScheduleEntry::from_raw(index, row);
        let key = entry.group_key();

        groups
            .entry((entry.normalized_time.clone(), key.clone()))
            .and_modify(|group| {
                group.total_servings = group.total_servings.saturating_add(entry.quantity);
                group.is_completed &= entry.completed;
                group.entry_count += 1;
                if entry.name < group.name {
                    group.name = entry.name.clone();
                }
                if entry.meal_type < group.meal_type {
                    group.meal_type = entry.meal_type.clone();
                }
            })
            .or_insert_with(|| GroupedProductionUnit {
                key,
                name: entry.name.clone(),
                normalized_time: entry.normalized_time.clone(),
                meal_type: entry.meal_type.clone(),
                total_servings: entry.quantity,
                is_completed: entry.completed,
                entry_count: 1,
            });
    }

    log::debug!("grouped {} schedule rows into {} units", raw.len(), groups.len());
    groups.into_values().collect()
}

/// Slice of the meal-type breakdown chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealTypeSlice {
    pub name: String,
    pub value: u64,
    pub fill: String,
}

/// The dish currently in production: first row not yet completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveProduction {
    pub name: String,
    pub meal_type: MealType,
    pub normalized_time: String,
}

/// Headline numbers for the cooking schedule page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    /// Raw rows, not groups.
    pub total: usize,
    pub completed: usize,
    /// `round(completed / total * 100)`, 0 when empty.
    pub completion_rate: u32,
    /// Rows per meal type, in first-seen order.
    pub meal_types: Vec<MealTypeSlice>,
    /// `None` once every row is completed.
    pub active: Option<ActiveProduction>,
}

pub fn summarize_schedule(raw: &[Value]) -> ScheduleSummary {
    let entries: Vec<ScheduleEntry> = raw
        .iter()
        .enumerate()
        .map(|(i, row)| ScheduleEntry::from_raw(i, row))
        .collect();

    let total = entries.len();
    let completed = entries.iter().filter(|e| e.completed).count();

    let mut meal_types: Vec<(MealType, u64)> = Vec::new();
    for entry in &entries {
        match meal_types.iter_mut().find(|(t, _)| *t == entry.meal_type) {
            Some((_, count)) => *count += 1,
            None => meal_types.push((entry.meal_type.clone(), 1)),
        }
    }

    ScheduleSummary {
        total,
        completed,
        completion_rate: percent(completed, total),
        meal_types: meal_types
            .into_iter()
            .map(|(meal_type, value)| MealTypeSlice {
                name: meal_type.label(),
                value,
                fill: meal_type.color().to_string(),
            })
            .collect(),
        active: entries
            .iter()
            .find(|e| !e.completed)
            .map(|e| ActiveProduction {
                name: e.name.clone(),
                meal_type: e.meal_type.clone(),
                normalized_time: e.normalized_time.clone(),
            }),
    }
}

/// Rounded integer percentage; 0 when `total` is 0.
pub(crate) fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}
