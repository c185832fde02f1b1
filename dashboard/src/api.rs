//! Public surface for presentation code.
//!
//! Consumers render these types and never touch raw payloads or the wire
//! field-name variants behind them.

pub use crate::models::{
    AiLaunchData, AnalyticsData, ApiResponse, DailyMenuPlan, GeneratePlanData,
    GeneratePlanRequest, MealDistributionItem, MealType, MealWithIngredients, ProcessDailyData,
    ProcessDailyRequest, ScheduleParams, StockItem, StockOverviewItem, StockUpdateResponse,
    TimeslotDistribution, TrendInfo, WeeklyTrendPoint,
};
pub use crate::services::analytics::{AnalyticsAggregate, DashboardOverview, OverviewTrends};
pub use crate::services::dashboard::{CookingSchedule, DashboardService};
pub use crate::services::distribution::{DistributionPoint, DistributionSummary};
pub use crate::services::menu::{MacroGoal, MenuMeal, MenuView, NutritionSlice};
pub use crate::services::schedule::{
    ActiveProduction, GroupedProductionUnit, MealTypeSlice, ScheduleSummary,
};
pub use crate::services::stock::{StockLevel, StockRow, StockTable};
pub use crate::services::students::{AssignedMeals, MealRef, StudentViewModel};
