//! Typed wire records for admin endpoints.
//!
//! Field names follow the backend (snake_case, with camelCase analytics).
//! Aliases absorb the spellings used by the mock backend; numeric fields go
//! through [`super::lenient`] so a single bad value never rejects a record.
//! Schedule and student payloads are not typed here: their shapes vary too
//! much and are read through [`crate::services::fields`] instead.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient::{f64_or_zero, string_or_empty, strings_or_empty, u64_or_zero, vec_or_empty};
use super::MealType;

// =========================================================
// Ingredients & stock
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionalInfo {
    #[serde(deserialize_with = "f64_or_zero")]
    pub protein: f64,
    #[serde(deserialize_with = "f64_or_zero")]
    pub carbs: f64,
    #[serde(deserialize_with = "f64_or_zero")]
    pub fats: f64,
    #[serde(deserialize_with = "f64_or_zero")]
    pub calories: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ingredient {
    #[serde(deserialize_with = "string_or_empty")]
    pub ingredient_id: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub category: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub unit: String,
    #[serde(deserialize_with = "strings_or_empty")]
    pub allergens: Vec<String>,
    pub nutritional_info: Option<NutritionalInfo>,
}

/// One row of `admin/stock/list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockItem {
    #[serde(deserialize_with = "string_or_empty")]
    pub stock_id: String,
    #[serde(alias = "id", deserialize_with = "string_or_empty")]
    pub ingredient_id: String,
    #[serde(
        alias = "quantity",
        alias = "currentStock",
        deserialize_with = "f64_or_zero"
    )]
    pub available_quantity: f64,
    pub last_updated: Option<String>,
    pub ingredient: Option<Ingredient>,
    /// Flat name used by the mock backend (`item` or `name`).
    #[serde(alias = "item")]
    pub name: Option<String>,
    pub unit: Option<String>,
}

impl StockItem {
    /// Display name: nested ingredient name, then the flat name.
    pub fn display_name(&self) -> &str {
        self.ingredient
            .as_ref()
            .map(|i| i.name.as_str())
            .filter(|n| !n.is_empty())
            .or(self.name.as_deref())
            .unwrap_or("")
    }

    /// Display unit: flat unit, then the nested ingredient unit.
    pub fn display_unit(&self) -> &str {
        self.unit
            .as_deref()
            .or_else(|| self.ingredient.as_ref().map(|i| i.unit.as_str()))
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockUpdateRequest {
    pub ingredient_id: String,
    pub available_quantity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockUpdateResponse {
    #[serde(deserialize_with = "string_or_empty")]
    pub stock_id: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub ingredient_id: String,
    #[serde(deserialize_with = "f64_or_zero")]
    pub available_quantity: f64,
    #[serde(deserialize_with = "string_or_empty")]
    pub last_updated: String,
}

// =========================================================
// Meals & menu
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionFacts {
    #[serde(deserialize_with = "f64_or_zero")]
    pub protein: f64,
    #[serde(deserialize_with = "f64_or_zero")]
    pub carbs: f64,
    #[serde(deserialize_with = "f64_or_zero")]
    pub fats: f64,
    #[serde(deserialize_with = "f64_or_zero")]
    pub calories: f64,
    #[serde(deserialize_with = "strings_or_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meal {
    #[serde(alias = "id", deserialize_with = "string_or_empty")]
    pub meal_id: String,
    #[serde(alias = "mealName", deserialize_with = "string_or_empty")]
    pub name: String,
    pub description: Option<String>,
    pub nutrition_facts: Option<NutritionFacts>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealIngredient {
    #[serde(deserialize_with = "f64_or_zero")]
    pub quantity: f64,
    pub ingredients: Option<Ingredient>,
}

/// One row of `admin/menu/today`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealWithIngredients {
    #[serde(alias = "id", deserialize_with = "string_or_empty")]
    pub meal_id: String,
    #[serde(alias = "mealName", deserialize_with = "string_or_empty")]
    pub name: String,
    pub description: Option<String>,
    #[serde(alias = "nutrition")]
    pub nutrition_facts: Option<NutritionFacts>,
    pub category: Option<String>,
    #[serde(alias = "mealType")]
    pub meal_type: MealType,
    pub meal_ingredients: Vec<MealIngredient>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealInPlan {
    #[serde(default)]
    pub meal: Meal,
}

/// One row of `admin/schedule`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyMenuPlan {
    #[serde(deserialize_with = "string_or_empty")]
    pub plan_id: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub date: String,
    pub meal_type: MealType,
    pub distribution_stats: Value,
    pub is_active: bool,
    #[serde(deserialize_with = "string_or_empty")]
    pub generated_at: String,
    pub meals: Vec<MealInPlan>,
}

/// Query parameters for `admin/schedule`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,
}

impl ScheduleParams {
    /// Query pairs in a fixed order.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(ref date) = self.date {
            query.push(("date".to_string(), date.clone()));
        }
        if let Some(ref meal_type) = self.meal_type {
            query.push(("meal_type".to_string(), meal_type.as_str().to_string()));
        }
        query
    }
}

// =========================================================
// Distribution & analytics
// =========================================================

/// One row of `admin/distribution/timeslots`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeslotDistribution {
    #[serde(alias = "timeSlot", deserialize_with = "string_or_empty")]
    pub timeslot: String,
    #[serde(alias = "mealType", deserialize_with = "string_or_empty")]
    pub meal_type: String,
    pub pickup_time_start: Option<String>,
    pub pickup_time_end: Option<String>,
    #[serde(
        alias = "studentsCount",
        alias = "studentCount",
        deserialize_with = "u64_or_zero"
    )]
    pub count: u64,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendInfo {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub value: String,
    #[serde(default)]
    pub is_positive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealDistributionItem {
    #[serde(deserialize_with = "string_or_empty")]
    pub meal: String,
    #[serde(deserialize_with = "u64_or_zero")]
    pub count: u64,
    #[serde(deserialize_with = "u64_or_zero")]
    pub capacity: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockOverviewItem {
    #[serde(deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(deserialize_with = "u64_or_zero")]
    pub value: u64,
    #[serde(deserialize_with = "string_or_empty")]
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyTrendPoint {
    #[serde(deserialize_with = "string_or_empty")]
    pub day: String,
    #[serde(deserialize_with = "u64_or_zero")]
    pub breakfast: u64,
    #[serde(deserialize_with = "u64_or_zero")]
    pub lunch: u64,
    #[serde(deserialize_with = "u64_or_zero")]
    pub dinner: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsTrends {
    pub active_attendees: Option<TrendInfo>,
    pub meals_assigned: Option<TrendInfo>,
    pub today_pickups: Option<TrendInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EfficiencyPoint {
    #[serde(deserialize_with = "f64_or_zero")]
    pub v: f64,
}

/// Payload of `admin/analytics`. Every aggregate is optional; missing ones
/// are derived client-side by [`crate::services::analytics`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsData {
    #[serde(deserialize_with = "u64_or_zero")]
    pub total_students: u64,
    #[serde(deserialize_with = "u64_or_zero")]
    pub today_meals: u64,
    #[serde(deserialize_with = "u64_or_zero")]
    pub today_pickups: u64,
    #[serde(deserialize_with = "f64_or_zero")]
    pub pickup_rate: f64,
    #[serde(deserialize_with = "u64_or_zero")]
    pub weekly_commitments: u64,
    #[serde(deserialize_with = "u64_or_zero")]
    pub low_stock_items_count: u64,
    #[serde(deserialize_with = "vec_or_empty")]
    pub low_stock_items: Vec<StockItem>,
    pub meal_distribution: Option<Vec<MealDistributionItem>>,
    pub stock_overview: Option<Vec<StockOverviewItem>>,
    pub weekly_trends: Option<Vec<WeeklyTrendPoint>>,
    pub trends: Option<AnalyticsTrends>,
    pub efficiency_trend: Option<Vec<EfficiencyPoint>>,
}

// =========================================================
// AI meal planning
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanRequest {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratePlanData {
    #[serde(deserialize_with = "string_or_empty")]
    pub plan_id: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub date: String,
    pub meals: Vec<Meal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessDailyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessDailyData {
    #[serde(deserialize_with = "string_or_empty")]
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiLaunchData {
    #[serde(deserialize_with = "u64_or_zero")]
    pub processed: u64,
    #[serde(deserialize_with = "string_or_empty")]
    pub timestamp: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub status: String,
}
