#[cfg(test)]
mod tests {
    use crate::models::MealType;
    use crate::services::schedule::{
        group_schedule, normalize_key_part, parse_quantity, parse_time, summarize_schedule,
        ScheduleEntry, FALLBACK_TIME, MAX_QUANTITY,
    };
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn row(name: &str, time: &str, meal_type: &str, quantity: u64, picked_up: bool) -> Value {
        json!({
            "meal": {"name": name},
            "pickup_time_start": time,
            "meal_type": meal_type,
            "quantity": quantity,
            "picked_up": picked_up
        })
    }

    #[test]
    fn test_soup_rows_collapse_into_one_group() {
        let raw = vec![
            json!({"name": "Soup", "startTime": "07:00", "mealType": "breakfast", "quantity": 50, "picked_up": true}),
            json!({"name": "soup", "startTime": "07:00:30", "mealType": "BREAKFAST", "quantity": 25, "picked_up": false}),
        ];
        let groups = group_schedule(&raw);

        assert_eq!(groups.len(), 1);
        let soup = &groups[0];
        assert_eq!(soup.key, "soup_07:00_breakfast");
        assert_eq!(soup.normalized_time, "07:00");
        assert_eq!(soup.meal_type, MealType::Breakfast);
        assert_eq!(soup.total_servings, 75);
        assert!(!soup.is_completed);
        assert_eq!(soup.entry_count, 2);
        assert_eq!(soup.name, "Soup");
    }

    #[test]
    fn test_empty_schedule() {
        assert!(group_schedule(&[]).is_empty());
        let summary = summarize_schedule(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.completion_rate, 0);
        assert!(summary.meal_types.is_empty());
        assert!(summary.active.is_none());
    }

    #[test]
    fn test_groups_sorted_by_time() {
        let raw = vec![
            row("Pasta", "12:30", "LUNCH", 10, false),
            row("Oats", "7:15", "BREAKFAST", 5, true),
            row("Curry", "18:00", "DINNER", 8, false),
        ];
        let times: Vec<String> = group_schedule(&raw)
            .into_iter()
            .map(|g| g.normalized_time)
            .collect();
        assert_eq!(times, vec!["07:15", "12:30", "18:00"]);
    }

    #[test]
    fn test_field_name_variants() {
        let raw = vec![
            json!({"mealName": "Rice Bowl", "startTime": "12:00", "category": "lunch", "quantity": "3"}),
            json!({"meal_name": "Rice-Bowl", "start_time": "2026-03-02T12:00:00Z", "meal_type": "Lunch", "status": "COMPLETED"}),
        ];
        let groups = group_schedule(&raw);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total_servings, 4);
        assert_eq!(groups[0].meal_type, MealType::Lunch);
        assert!(!groups[0].is_completed);
    }

    #[test]
    fn test_completion_via_status() {
        let raw = vec![
            json!({"meal": {"name": "Stew"}, "pickup_time_start": "18:00", "meal_type": "DINNER", "status": "completed"}),
            json!({"meal": {"name": "Stew"}, "pickup_time_start": "18:00", "meal_type": "DINNER", "pickedUp": true}),
        ];
        let groups = group_schedule(&raw);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_completed);
    }

    #[test]
    fn test_different_types_stay_apart() {
        let raw = vec![
            row("Eggs", "08:00", "BREAKFAST", 1, false),
            row("Eggs", "08:00", "LUNCH", 1, false),
            row("Eggs", "08:30", "BREAKFAST", 1, false),
        ];
        assert_eq!(group_schedule(&raw).len(), 3);
    }

    #[test]
    fn test_bad_quantity_counts_as_one() {
        let raw = vec![
            json!({"meal": {"name": "Salad"}, "pickup_time_start": "12:00", "quantity": "lots"}),
            json!({"meal": {"name": "Salad"}, "pickup_time_start": "12:00", "quantity": -4}),
            json!({"meal": {"name": "Salad"}, "pickup_time_start": "12:00"}),
            json!({"meal": {"name": "Salad"}, "pickup_time_start": "12:00", "quantity": 0}),
        ];
        let groups = group_schedule(&raw);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total_servings, 3);
    }

    #[test]
    fn test_oversized_quantity_counts_as_one() {
        let raw = vec![
            json!({"mealName": "Soup", "startTime": "07:00", "mealType": "lunch", "quantity": "1e30"}),
            json!({"mealName": "Soup", "startTime": "07:00", "mealType": "lunch", "quantity": 5}),
        ];
        let groups = group_schedule(&raw);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total_servings, 6);
        assert_eq!(groups[0].entry_count, 2);
    }

    // Unparsable times land at midnight. This merges unrelated rows and is
    // kept as a known approximation.
    #[test]
    fn test_unparsable_time_falls_back_to_midnight() {
        let raw = vec![
            row("Toast", "soon", "BREAKFAST", 2, false),
            row("Toast", "", "BREAKFAST", 3, false),
            json!({"meal": {"name": "Toast"}, "meal_type": "BREAKFAST", "quantity": 4}),
        ];
        let groups = group_schedule(&raw);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].normalized_time, FALLBACK_TIME);
        assert_eq!(groups[0].total_servings, 9);
    }

    #[test]
    fn test_missing_name_and_type() {
        let entry = ScheduleEntry::from_raw(0, &json!({"pickup_time_start": "9:05"}));
        assert_eq!(entry.name, "Unknown Meal");
        assert_eq!(entry.meal_type, MealType::Other("OTHER".to_string()));
        assert_eq!(entry.group_key(), "unknownmeal_09:05_other");
    }

    #[test]
    fn test_non_object_rows_do_not_panic() {
        let raw = vec![json!(null), json!(42), json!("x"), json!([1, 2])];
        let groups = group_schedule(&raw);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total_servings, 4);
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("7:05").as_deref(), Some("07:05"));
        assert_eq!(parse_time("07:05:59").as_deref(), Some("07:05"));
        assert_eq!(parse_time("12.30").as_deref(), Some("12:30"));
        assert_eq!(parse_time("2026-03-02T18:45:00.000Z").as_deref(), Some("18:45"));
        assert_eq!(parse_time("noon"), None);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(&json!(12)), Some(12));
        assert_eq!(parse_quantity(&json!("7")), Some(7));
        assert_eq!(parse_quantity(&json!(2.9)), Some(2));
        assert_eq!(parse_quantity(&json!(0)), Some(0));
        assert_eq!(parse_quantity(&json!(-1)), None);
        assert_eq!(parse_quantity(&json!(true)), None);
        assert_eq!(parse_quantity(&json!("12abc")), None);
        assert_eq!(parse_quantity(&json!("1e30")), None);
        assert_eq!(parse_quantity(&json!(1e30)), None);
        assert_eq!(parse_quantity(&json!(MAX_QUANTITY)), Some(MAX_QUANTITY));
    }

    #[test]
    fn test_normalize_key_part() {
        assert_eq!(normalize_key_part("Chicken & Rice!"), "chickenrice");
        assert_eq!(normalize_key_part("  LUNCH "), "lunch");
    }

    #[test]
    fn test_summary() {
        let raw = vec![
            row("Oats", "07:00", "BREAKFAST", 1, true),
            row("Pasta", "12:00", "LUNCH", 1, false),
            row("Eggs", "07:30", "breakfast", 1, true),
        ];
        let summary = summarize_schedule(&raw);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.completion_rate, 67);

        let names: Vec<&str> = summary.meal_types.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Breakfast", "Lunch"]);
        assert_eq!(summary.meal_types[0].value, 2);
        assert_eq!(summary.meal_types[0].fill, "#f59e0b");
        assert_eq!(summary.meal_types[1].fill, "#6366f1");

        let active = summary.active.unwrap();
        assert_eq!(active.name, "Pasta");
        assert_eq!(active.meal_type, MealType::Lunch);
    }

    fn arb_row() -> impl Strategy<Value = Value> {
        (
            prop::sample::select(vec!["Soup", "soup", "Pasta", "Curry", "Oats"]),
            prop::sample::select(vec!["07:00", "7:00:15", "12:30", "18:00", "bad"]),
            prop::sample::select(vec!["breakfast", "LUNCH", "Dinner", ""]),
            0u64..100,
            any::<bool>(),
        )
            .prop_map(|(name, time, meal_type, quantity, picked_up)| {
                json!({
                    "mealName": name,
                    "startTime": time,
                    "mealType": meal_type,
                    "quantity": quantity,
                    "picked_up": picked_up
                })
            })
    }

    proptest! {
        #[test]
        fn prop_grouping_is_order_independent(
            rows in prop::collection::vec(arb_row(), 0..40)
                .prop_flat_map(|rows| (Just(rows.clone()), Just(rows).prop_shuffle()))
        ) {
            let (original, shuffled) = rows;
            prop_assert_eq!(group_schedule(&original), group_schedule(&shuffled));
        }

        #[test]
        fn prop_servings_are_conserved(rows in prop::collection::vec(arb_row(), 0..40)) {
            let expected: u64 = rows
                .iter()
                .map(|r| r["quantity"].as_u64().unwrap_or(1))
                .sum();
            let total: u64 = group_schedule(&rows).iter().map(|g| g.total_servings).sum();
            prop_assert_eq!(total, expected);
        }

        #[test]
        fn prop_one_open_row_blocks_completion(
            rows in prop::collection::vec(arb_row(), 0..20),
        ) {
            let groups = group_schedule(&rows);
            for group in &groups {
                let members = rows
                    .iter()
                    .enumerate()
                    .map(|(i, r)| (ScheduleEntry::from_raw(i, r), r))
                    .filter(|(e, _)| e.group_key() == group.key);
                let any_open = members.clone().any(|(_, r)| r["picked_up"] == json!(false));
                prop_assert_eq!(group.is_completed, !any_open);
                prop_assert_eq!(members.count(), group.entry_count);
            }
        }
    }
}
