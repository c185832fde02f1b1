//! Sample payloads for [`LocalTransport::with_sample_data`].
//!
//! Shapes mirror the mock backend, including its alternate field spellings,
//! so the local transport exercises the same tolerance paths as production.

use chrono::Utc;
use serde_json::{json, Value};

use super::admin::{
    AI_LAUNCH_PATH, ANALYTICS_PATH, GENERATE_PLAN_PATH, MENU_PATH, PROCESS_DAILY_PATH,
    SCHEDULE_PATH, STOCK_LIST_PATH, STOCK_PATH, STUDENTS_PATH, TIMESLOTS_PATH, TODAY_SCHEDULE_PATH,
};
use super::local::LocalTransport;
use super::transport::Method;
use crate::models::ApiResponse;

pub fn stock() -> Value {
    json!([
        {"stock_id": "st-1", "ingredient_id": "ing-rice", "available_quantity": 250,
         "ingredient": {"ingredient_id": "ing-rice", "name": "Rice", "category": "grain", "unit": "kg"}},
        {"stock_id": "st-2", "ingredient_id": "ing-chicken", "available_quantity": 45,
         "ingredient": {"ingredient_id": "ing-chicken", "name": "Chicken Breast", "category": "protein", "unit": "kg"}},
        {"stock_id": "st-3", "ingredient_id": "ing-tomato", "available_quantity": 80,
         "ingredient": {"ingredient_id": "ing-tomato", "name": "Tomatoes", "category": "vegetable", "unit": "kg"}},
        {"stock_id": "st-4", "ingredient_id": "ing-oil", "available_quantity": 15,
         "ingredient": {"ingredient_id": "ing-oil", "name": "Cooking Oil", "category": "pantry", "unit": "liters"}},
        {"stock_id": "st-5", "ingredient_id": "ing-milk", "available_quantity": 8,
         "ingredient": {"ingredient_id": "ing-milk", "name": "Milk", "category": "dairy", "unit": "liters"}},
        {"id": "ing-beef", "item": "Beef", "quantity": "22", "unit": "kg"},
        {"id": "ing-sugar", "item": "Sugar", "quantity": 0, "unit": "kg"}
    ])
}

pub fn today_schedule() -> Value {
    json!([
        {"meal": {"name": "Continental Breakfast"}, "meal_type": "BREAKFAST",
         "pickup_time_start": "07:00:00", "quantity": 1, "picked_up": true},
        {"mealName": "continental breakfast ", "mealType": "breakfast",
         "startTime": "07:00", "quantity": 2, "status": "completed"},
        {"meal": {"name": "Chicken Biryani with Raita"}, "meal_type": "LUNCH",
         "pickup_time_start": "12:30:00", "quantity": 1, "picked_up": false},
        {"meal": {"name": "Chicken Biryani with Raita"}, "meal_type": "LUNCH",
         "pickup_time_start": "12:30:00", "quantity": 1, "picked_up": true},
        {"meal_name": "Grilled Fish with Vegetables", "category": "dinner",
         "startTime": "2026-03-02T18:45:00", "servings": "3", "status": "pending"}
    ])
}

pub fn schedule() -> Value {
    json!([
        {"plan_id": "plan-1", "date": "2026-03-02", "meal_type": "LUNCH",
         "distribution_stats": {}, "is_active": true, "generated_at": "2026-03-01T22:00:00Z",
         "meals": [{"meal": {"meal_id": "m-2", "name": "Chicken Biryani with Raita"}}]}
    ])
}

pub fn menu() -> Value {
    json!([
        {"meal_id": "m-1", "name": "Continental Breakfast", "meal_type": "BREAKFAST",
         "description": "Eggs, toast, fresh fruits, juice, and coffee",
         "nutrition_facts": {"calories": 450, "protein": 18, "carbs": 55, "fats": 15},
         "meal_ingredients": [
            {"quantity": 100, "ingredients": {"ingredient_id": "ing-eggs", "name": "Eggs", "unit": "pieces"}}
         ]},
        {"meal_id": "m-2", "name": "Chicken Biryani with Raita", "meal_type": "LUNCH",
         "nutrition_facts": {"calories": 680, "protein": 32, "carbs": 85, "fats": 22},
         "meal_ingredients": [
            {"quantity": 80, "ingredients": {"ingredient_id": "ing-rice", "name": "Rice", "unit": "kg"}},
            {"quantity": 45, "ingredients": {"ingredient_id": "ing-chicken", "name": "Chicken Breast", "unit": "kg"}}
         ]},
        {"id": "m-3", "mealName": "Grilled Fish with Vegetables", "mealType": "dinner",
         "nutrition": {"calories": 520, "protein": 42, "carbs": 35, "fats": 24},
         "meal_ingredients": []}
    ])
}

pub fn timeslots() -> Value {
    json!([
        {"timeSlot": "07:00 - 08:00", "mealType": "Breakfast", "studentCount": 250, "status": "completed"},
        {"timeSlot": "08:00 - 09:00", "mealType": "Breakfast", "studentCount": 180, "status": "completed"},
        {"timeslot": "12:00 - 13:00", "meal_type": "LUNCH", "count": 320, "status": "in-progress"},
        {"timeslot": "13:00 - 14:00", "meal_type": "LUNCH", "count": 230, "status": "pending"},
        {"timeSlot": "18:00 - 19:00", "mealType": "Dinner", "studentsCount": 280, "status": "pending"}
    ])
}

pub fn students() -> Value {
    json!([
        {"student_id": "stu-1", "meal_type": "BREAKFAST", "meal": {"name": "Continental Breakfast"},
         "reason": "AI Balanced Nutrition",
         "student": {"id": "stu-1", "name": "Amina Yusuf",
                     "profiles": [{"dietary_type": "vegetarian", "sport_activities": []}]}},
        {"student_id": "stu-1", "meal_type": "LUNCH", "meal": {"name": "Chicken Biryani with Raita"},
         "student": {"id": "stu-1", "name": "Amina Yusuf"}},
        {"id": "stu-2", "full_name": "Lucas Moreau", "sportActivities": ["rowing"],
         "meal_assignments": [
            {"meal_type": "DINNER", "meal": {"name": "Grilled Fish with Vegetables"},
             "reason": "High protein for recovery"}
         ]},
        {"id": "stu-3", "email": "k.tanaka@campus.edu", "dietaryPreferences": ["vegan"],
         "assignedMeals": {"lunch": {"mealName": "Lentil Curry"}}}
    ])
}

pub fn analytics() -> Value {
    json!({
        "totalStudents": 3450,
        "todayMeals": 1250,
        "todayPickups": 830,
        "pickupRate": 66.4,
        "weeklyCommitments": 8120,
        "lowStockItemsCount": 2,
        "lowStockItems": [
            {"stock_id": "st-5", "ingredient_id": "ing-milk", "available_quantity": 8,
             "ingredient": {"name": "Milk", "unit": "liters"}}
        ],
        "trends": {"activeAttendees": {"value": "+4.2%", "isPositive": true}},
        "efficiencyTrend": [{"v": 62}, {"v": 70}, {"v": 66}, {"v": 74}]
    })
}

/// Register every admin route on `transport`.
pub fn install(transport: &LocalTransport) {
    transport
        .respond_data(Method::Get, ANALYTICS_PATH, analytics())
        .respond_data(Method::Get, STOCK_LIST_PATH, stock())
        .respond_data(Method::Get, STOCK_PATH, stock())
        .respond_data(Method::Get, SCHEDULE_PATH, schedule())
        .respond_data(Method::Get, TODAY_SCHEDULE_PATH, today_schedule())
        .respond_data(Method::Get, MENU_PATH, menu())
        .respond_data(Method::Get, TIMESLOTS_PATH, timeslots())
        .respond_data(Method::Get, STUDENTS_PATH, students());

    transport
        .handle(Method::Post, STOCK_PATH, |request| {
            let body = request.body.clone().unwrap_or(Value::Null);
            match body.get("ingredient_id").and_then(Value::as_str) {
                Some(id) => Ok(ApiResponse::success(json!({
                    "stock_id": format!("st-{}", id),
                    "ingredient_id": id,
                    "available_quantity": body.get("available_quantity").cloned().unwrap_or(json!(0)),
                    "last_updated": Utc::now().to_rfc3339(),
                }))),
                None => Ok(ApiResponse::failure(Some("ingredient_id is required"))),
            }
        })
        .handle(Method::Post, GENERATE_PLAN_PATH, |request| {
            let date = request
                .body
                .as_ref()
                .and_then(|b| b.get("date"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Ok(ApiResponse::success(json!({
                "plan_id": format!("plan-{}", date),
                "date": date,
                "meals": [{"meal_id": "m-2", "name": "Chicken Biryani with Raita"}],
            })))
        })
        .handle(Method::Post, PROCESS_DAILY_PATH, |request| {
            let date = request
                .body
                .as_ref()
                .and_then(|b| b.get("date"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string());
            Ok(ApiResponse::success(json!({ "date": date })))
        })
        .handle(Method::Post, AI_LAUNCH_PATH, |_| {
            Ok(ApiResponse::success(json!({
                "processed": 4,
                "timestamp": Utc::now().to_rfc3339(),
                "status": "completed",
            })))
        });
}

impl LocalTransport {
    /// Transport with sample responses for every admin endpoint.
    pub fn with_sample_data() -> Self {
        let transport = Self::new();
        install(&transport);
        transport
    }
}
