//! Menu planner view: today's meals with nutrition breakdown and macro goals.

use serde::{Deserialize, Serialize};

use crate::models::{MealType, MealWithIngredients, NutritionFacts};

/// Daily target per macro, in grams.
pub const MACRO_TARGET_GRAMS: f64 = 1000.0;

/// One meal on today's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuMeal {
    pub id: String,
    pub name: String,
    pub meal_type: MealType,
    pub description: Option<String>,
    pub nutrition: Option<NutritionFacts>,
    /// Ingredient names; entries without a name are dropped.
    pub ingredients: Vec<String>,
}

impl From<&MealWithIngredients> for MenuMeal {
    fn from(meal: &MealWithIngredients) -> Self {
        Self {
            id: meal.meal_id.clone(),
            name: meal.name.clone(),
            meal_type: meal.meal_type.clone(),
            description: meal.description.clone(),
            nutrition: meal.nutrition_facts.clone(),
            ingredients: meal
                .meal_ingredients
                .iter()
                .filter_map(|mi| mi.ingredients.as_ref())
                .map(|i| i.name.clone())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionSlice {
    pub name: String,
    pub value: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroGoal {
    pub label: String,
    pub current: f64,
    pub target: f64,
    /// Percent of target, capped at 100.
    pub progress: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuView {
    pub meals: Vec<MenuMeal>,
    pub nutrition: Vec<NutritionSlice>,
    pub goals: Vec<MacroGoal>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct MacroTotals {
    protein: f64,
    carbs: f64,
    fats: f64,
}

fn macro_totals(meals: &[MenuMeal]) -> MacroTotals {
    meals
        .iter()
        .filter_map(|m| m.nutrition.as_ref())
        .fold(MacroTotals::default(), |acc, n| MacroTotals {
            protein: acc.protein + n.protein,
            carbs: acc.carbs + n.carbs,
            fats: acc.fats + n.fats,
        })
}

/// Protein, carbs and fats as rounded shares of their sum, plus a fiber slice at 0.
pub fn nutrition_breakdown(meals: &[MenuMeal]) -> Vec<NutritionSlice> {
    let totals = macro_totals(meals);
    let sum = totals.protein + totals.carbs + totals.fats;
    let divisor = if sum > 0.0 { sum } else { 1.0 };
    let share = |grams: f64| (grams / divisor * 100.0).round().max(0.0) as u32;

    [
        ("Protein", share(totals.protein), "#ef4444"),
        ("Carbs", share(totals.carbs), "#3b82f6"),
        ("Fats", share(totals.fats), "#f59e0b"),
        ("Fiber", 0, "#10b981"),
    ]
    .into_iter()
    .map(|(name, value, color)| NutritionSlice {
        name: name.to_string(),
        value,
        color: color.to_string(),
    })
    .collect()
}

pub fn macro_goals(meals: &[MenuMeal]) -> Vec<MacroGoal> {
    let totals = macro_totals(meals);
    [
        ("Proteins", totals.protein),
        ("Carbs", totals.carbs),
        ("Fats", totals.fats),
    ]
    .into_iter()
    .map(|(label, current)| MacroGoal {
        label: label.to_string(),
        current,
        target: MACRO_TARGET_GRAMS,
        progress: (current / MACRO_TARGET_GRAMS * 100.0).clamp(0.0, 100.0) as u32,
    })
    .collect()
}

pub fn build_menu(raw: &[MealWithIngredients]) -> MenuView {
    let meals: Vec<MenuMeal> = raw.iter().map(MenuMeal::from).collect();
    MenuView {
        nutrition: nutrition_breakdown(&meals),
        goals: macro_goals(&meals),
        meals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, MealIngredient};

    fn meal(name: &str, protein: f64, carbs: f64, fats: f64) -> MealWithIngredients {
        MealWithIngredients {
            meal_id: format!("m-{}", name),
            name: name.to_string(),
            meal_type: MealType::Lunch,
            nutrition_facts: Some(NutritionFacts {
                protein,
                carbs,
                fats,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_menu_is_all_zero() {
        let view = build_menu(&[]);
        assert!(view.meals.is_empty());
        assert_eq!(view.nutrition.len(), 4);
        assert!(view.nutrition.iter().all(|s| s.value == 0));
        assert!(view.goals.iter().all(|g| g.progress == 0));
    }

    #[test]
    fn test_breakdown_shares() {
        let view = build_menu(&[meal("Bowl", 30.0, 50.0, 20.0), meal("Wrap", 10.0, 30.0, 10.0)]);
        let values: Vec<u32> = view.nutrition.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![27, 53, 20, 0]);
        assert_eq!(view.nutrition[3].name, "Fiber");
    }

    #[test]
    fn test_meals_without_nutrition_count_as_zero() {
        let mut bare = meal("Bread", 0.0, 0.0, 0.0);
        bare.nutrition_facts = None;
        let view = build_menu(&[bare]);
        assert!(view.nutrition.iter().all(|s| s.value == 0));
    }

    #[test]
    fn test_macro_goal_progress_is_capped() {
        let view = build_menu(&[meal("Feast", 1500.0, 250.0, 0.0)]);
        assert_eq!(view.goals[0].label, "Proteins");
        assert_eq!(view.goals[0].progress, 100);
        assert_eq!(view.goals[0].current, 1500.0);
        assert_eq!(view.goals[1].progress, 25);
        assert_eq!(view.goals[2].progress, 0);
    }

    #[test]
    fn test_ingredient_names() {
        let mut m = meal("Curry", 1.0, 1.0, 1.0);
        m.meal_ingredients = vec![
            MealIngredient {
                quantity: 2.0,
                ingredients: Some(Ingredient {
                    name: "Chickpeas".to_string(),
                    ..Default::default()
                }),
            },
            MealIngredient {
                quantity: 1.0,
                ingredients: None,
            },
        ];
        let menu = MenuMeal::from(&m);
        assert_eq!(menu.ingredients, vec!["Chickpeas"]);
        assert_eq!(menu.id, "m-Curry");
    }
}
