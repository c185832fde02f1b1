//! Meal type with tolerant parsing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Meal period a serving or assignment belongs to.
///
/// Parsing is case-insensitive and trims whitespace; anything that is not
/// breakfast, lunch or dinner is kept verbatim (upper-cased) as `Other`.
/// Serializes as the upper-case backend spelling (`"BREAKFAST"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Other(String),
}

impl MealType {
    /// The three assignment slots, in display order.
    pub const SLOTS: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "breakfast" => MealType::Breakfast,
            "lunch" => MealType::Lunch,
            "dinner" => MealType::Dinner,
            "" => MealType::Other("OTHER".to_string()),
            _ => MealType::Other(trimmed.to_uppercase()),
        }
    }

    /// Backend spelling, e.g. `"LUNCH"`.
    pub fn as_str(&self) -> &str {
        match self {
            MealType::Breakfast => "BREAKFAST",
            MealType::Lunch => "LUNCH",
            MealType::Dinner => "DINNER",
            MealType::Other(name) => name,
        }
    }

    /// Capitalized label for charts, e.g. `"Lunch"`.
    pub fn label(&self) -> String {
        let lower = self.as_str().to_lowercase();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Chart color used by the cooking schedule.
    pub fn color(&self) -> &'static str {
        match self {
            MealType::Breakfast => "#f59e0b",
            MealType::Lunch => "#6366f1",
            MealType::Dinner => "#8b5cf6",
            MealType::Other(_) => "#94a3b8",
        }
    }

    /// True for breakfast, lunch and dinner.
    pub fn is_slot(&self) -> bool {
        !matches!(self, MealType::Other(_))
    }
}

impl Default for MealType {
    fn default() -> Self {
        MealType::Other("OTHER".to_string())
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for MealType {
    fn from(raw: String) -> Self {
        MealType::parse(&raw)
    }
}

impl From<&str> for MealType {
    fn from(raw: &str) -> Self {
        MealType::parse(raw)
    }
}

impl From<MealType> for String {
    fn from(meal_type: MealType) -> Self {
        meal_type.as_str().to_string()
    }
}
