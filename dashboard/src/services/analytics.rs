//! Dashboard analytics: client-side fallbacks for aggregates the backend omits.
//!
//! Both derivers are total. Empty or missing input yields a well-formed
//! aggregate with zero values, never an error.

use serde::{Deserialize, Serialize};

use super::schedule::percent;
use crate::models::{
    AnalyticsData, MealDistributionItem, MealType, StockItem, StockOverviewItem, TimeslotDistribution,
    TrendInfo, WeeklyTrendPoint,
};

/// Nominal capacity per meal period, used by the distribution chart.
pub const MEAL_CAPACITIES: [(MealType, u64); 3] = [
    (MealType::Breakfast, 500),
    (MealType::Lunch, 600),
    (MealType::Dinner, 500),
];

/// Strictly below this, a positive quantity counts as low stock.
pub const LOW_STOCK_THRESHOLD: f64 = 10.0;

pub const IN_STOCK_COLOR: &str = "#10b981";
pub const LOW_STOCK_COLOR: &str = "#f59e0b";
pub const OUT_OF_STOCK_COLOR: &str = "#ef4444";

/// Client-side aggregate charts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsAggregate {
    pub meal_distribution: Vec<MealDistributionItem>,
    pub stock_overview: Vec<StockOverviewItem>,
}

/// Sum timeslot counts per meal period.
///
/// Always three buckets (breakfast, lunch, dinner) in that order; slots of
/// any other meal type are ignored.
pub fn derive_meal_distribution(timeslots: &[TimeslotDistribution]) -> Vec<MealDistributionItem> {
    MEAL_CAPACITIES
        .iter()
        .map(|(meal_type, capacity)| MealDistributionItem {
            meal: meal_type.label(),
            count: timeslots
                .iter()
                .filter(|slot| MealType::parse(&slot.meal_type) == *meal_type)
                .fold(0, |total, slot| total.saturating_add(slot.count)),
            capacity: *capacity,
        })
        .collect()
}

/// Bucket stock records into in-stock, low and out, as rounded percentages.
pub fn derive_stock_overview(stock: &[StockItem]) -> Vec<StockOverviewItem> {
    let total = stock.len();
    let out = stock
        .iter()
        .filter(|s| s.available_quantity <= 0.0)
        .count();
    let low = stock
        .iter()
        .filter(|s| s.available_quantity > 0.0 && s.available_quantity < LOW_STOCK_THRESHOLD)
        .count();
    let in_stock = total - out - low;

    vec![
        overview_item("In Stock", in_stock, total, IN_STOCK_COLOR),
        overview_item("Low Stock", low, total, LOW_STOCK_COLOR),
        overview_item("Out of Stock", out, total, OUT_OF_STOCK_COLOR),
    ]
}

fn overview_item(name: &str, count: usize, total: usize, color: &str) -> StockOverviewItem {
    StockOverviewItem {
        name: name.to_string(),
        value: u64::from(percent(count, total)),
        color: color.to_string(),
    }
}

pub fn derive_analytics(timeslots: &[TimeslotDistribution], stock: &[StockItem]) -> AnalyticsAggregate {
    AnalyticsAggregate {
        meal_distribution: derive_meal_distribution(timeslots),
        stock_overview: derive_stock_overview(stock),
    }
}

/// Seven-day series shown until the backend reports real trends.
pub fn default_weekly_trends() -> Vec<WeeklyTrendPoint> {
    [
        ("Mon", 210, 450, 280),
        ("Tue", 230, 480, 310),
        ("Wed", 190, 420, 250),
        ("Thu", 250, 510, 340),
        ("Fri", 220, 470, 300),
        ("Sat", 150, 300, 200),
        ("Sun", 160, 320, 220),
    ]
    .into_iter()
    .map(|(day, breakfast, lunch, dinner)| WeeklyTrendPoint {
        day: day.to_string(),
        breakfast,
        lunch,
        dinner,
    })
    .collect()
}

/// Headline trend badges with their fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewTrends {
    pub active_attendees: Option<TrendInfo>,
    pub meals_assigned: TrendInfo,
    pub today_pickups: TrendInfo,
}

/// Everything the main dashboard page renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_students: u64,
    pub today_meals: u64,
    pub today_pickups: u64,
    pub pickup_rate: f64,
    pub weekly_commitments: u64,
    pub low_stock_items_count: u64,
    pub trends: OverviewTrends,
    pub meal_distribution: Vec<MealDistributionItem>,
    pub stock_overview: Vec<StockOverviewItem>,
    pub weekly_trends: Vec<WeeklyTrendPoint>,
    pub efficiency_trend: Vec<f64>,
    /// At most three items, for the alert card.
    pub low_stock_highlights: Vec<StockItem>,
    /// True when either chart was derived client-side.
    pub derived: bool,
}

const LOW_STOCK_HIGHLIGHTS: usize = 3;

/// Combine the analytics payload with client-side fallbacks.
///
/// Backend aggregates win whenever present, even if empty. Missing ones are
/// derived from `timeslots` and `stock`. With no analytics payload at all,
/// headline numbers are zero.
pub fn build_overview(
    analytics: Option<&AnalyticsData>,
    timeslots: &[TimeslotDistribution],
    stock: &[StockItem],
) -> DashboardOverview {
    let empty = AnalyticsData::default();
    let data = analytics.unwrap_or(&empty);

    let backend_distribution = data.meal_distribution.clone();
    let backend_overview = data.stock_overview.clone();
    let derived = backend_distribution.is_none() || backend_overview.is_none();

    let backend_trends = data.trends.clone().unwrap_or_default();

    DashboardOverview {
        total_students: data.total_students,
        today_meals: data.today_meals,
        today_pickups: data.today_pickups,
        pickup_rate: data.pickup_rate,
        weekly_commitments: data.weekly_commitments,
        low_stock_items_count: data.low_stock_items_count,
        trends: OverviewTrends {
            active_attendees: backend_trends.active_attendees,
            meals_assigned: backend_trends
                .meals_assigned
                .unwrap_or_else(|| badge("AI Optimized")),
            today_pickups: backend_trends.today_pickups.unwrap_or_else(|| badge("Live")),
        },
        meal_distribution: backend_distribution
            .unwrap_or_else(|| derive_meal_distribution(timeslots)),
        stock_overview: backend_overview.unwrap_or_else(|| derive_stock_overview(stock)),
        weekly_trends: data
            .weekly_trends
            .clone()
            .unwrap_or_else(default_weekly_trends),
        efficiency_trend: data
            .efficiency_trend
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|p| p.v)
            .collect(),
        low_stock_highlights: data
            .low_stock_items
            .iter()
            .take(LOW_STOCK_HIGHLIGHTS)
            .cloned()
            .collect(),
        derived,
    }
}

fn badge(value: &str) -> TrendInfo {
    TrendInfo {
        value: value.to_string(),
        is_positive: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn slot(meal_type: &str, count: u64) -> TimeslotDistribution {
        TimeslotDistribution {
            timeslot: "12:00 - 12:30".to_string(),
            meal_type: meal_type.to_string(),
            count,
            ..Default::default()
        }
    }

    fn stock(quantity: f64) -> StockItem {
        StockItem {
            available_quantity: quantity,
            ..Default::default()
        }
    }

    #[test]
    fn test_meal_distribution_always_three_buckets() {
        let dist = derive_meal_distribution(&[]);
        assert_eq!(
            dist,
            vec![
                MealDistributionItem { meal: "Breakfast".into(), count: 0, capacity: 500 },
                MealDistributionItem { meal: "Lunch".into(), count: 0, capacity: 600 },
                MealDistributionItem { meal: "Dinner".into(), count: 0, capacity: 500 },
            ]
        );
    }

    #[test]
    fn test_meal_distribution_sums_case_insensitively() {
        let dist = derive_meal_distribution(&[
            slot("BREAKFAST", 40),
            slot("breakfast", 10),
            slot("Lunch", 120),
            slot("snack", 99),
        ]);
        assert_eq!(dist[0].count, 50);
        assert_eq!(dist[1].count, 120);
        assert_eq!(dist[2].count, 0);
    }

    #[test]
    fn test_meal_distribution_saturates_oversized_counts() {
        let huge: TimeslotDistribution =
            serde_json::from_value(serde_json::json!({"meal_type": "BREAKFAST", "count": "1e25"}))
                .unwrap();
        assert_eq!(huge.count, u64::MAX);

        let dist = derive_meal_distribution(&[huge, slot("BREAKFAST", 1), slot("lunch", 3)]);
        assert_eq!(dist[0].count, u64::MAX);
        assert_eq!(dist[1].count, 3);
    }

    #[test]
    fn test_stock_overview_thirds() {
        let overview = derive_stock_overview(&[stock(5.0), stock(0.0), stock(40.0)]);
        let values: Vec<u64> = overview.iter().map(|o| o.value).collect();
        assert_eq!(values, vec![33, 33, 33]);
        assert_eq!(overview[0].name, "In Stock");
        assert_eq!(overview[1].color, LOW_STOCK_COLOR);
        assert_eq!(overview[2].name, "Out of Stock");
    }

    #[test]
    fn test_stock_overview_empty_is_all_zero() {
        let overview = derive_stock_overview(&[]);
        assert_eq!(overview.len(), 3);
        assert!(overview.iter().all(|o| o.value == 0));
    }

    #[test]
    fn test_negative_stock_is_out() {
        let overview = derive_stock_overview(&[stock(-2.0), stock(10.0)]);
        assert_eq!(overview[0].value, 50);
        assert_eq!(overview[2].value, 50);
    }

    #[test]
    fn test_overview_without_analytics() {
        let overview = build_overview(None, &[slot("DINNER", 7)], &[stock(1.0)]);
        assert_eq!(overview.total_students, 0);
        assert!(overview.derived);
        assert_eq!(overview.meal_distribution[2].count, 7);
        assert_eq!(overview.stock_overview[1].value, 100);
        assert_eq!(overview.weekly_trends.len(), 7);
        assert_eq!(overview.trends.meals_assigned.value, "AI Optimized");
        assert_eq!(overview.trends.today_pickups.value, "Live");
        assert!(overview.trends.active_attendees.is_none());
    }

    #[test]
    fn test_backend_aggregates_win_even_when_empty() {
        let analytics = AnalyticsData {
            total_students: 420,
            meal_distribution: Some(Vec::new()),
            stock_overview: Some(vec![StockOverviewItem {
                name: "In Stock".into(),
                value: 100,
                color: IN_STOCK_COLOR.into(),
            }]),
            low_stock_items: vec![stock(1.0), stock(2.0), stock(3.0), stock(4.0)],
            ..Default::default()
        };
        let overview = build_overview(Some(&analytics), &[slot("LUNCH", 5)], &[stock(0.0)]);
        assert!(!overview.derived);
        assert!(overview.meal_distribution.is_empty());
        assert_eq!(overview.stock_overview.len(), 1);
        assert_eq!(overview.total_students, 420);
        assert_eq!(overview.low_stock_highlights.len(), 3);
    }

    proptest! {
        #[test]
        fn prop_stock_percentages_sum_to_about_100(
            quantities in prop::collection::vec(-5.0f64..60.0, 1..200)
        ) {
            let items: Vec<StockItem> = quantities.into_iter().map(stock).collect();
            let sum: u64 = derive_stock_overview(&items).iter().map(|o| o.value).sum();
            prop_assert!((99..=101).contains(&sum), "sum was {}", sum);
        }
    }
}
