//! Normalizers and page-level orchestration.
//!
//! Every module except [`dashboard`] is pure: it takes one decoded payload
//! and returns a view model, so repeated or out-of-order calls are safe.
//!
//! - [`fields`]: field-name fallback chains for loosely shaped records
//! - [`schedule`]: production units and schedule summary
//! - [`students`]: one view model per student
//! - [`analytics`]: analytics fallbacks and the overview page
//! - [`menu`], [`distribution`], [`stock`]: remaining admin pages
//! - [`dashboard`]: fetch through the cache, normalize, memoize

pub mod analytics;
pub mod dashboard;
pub mod distribution;
pub mod fields;
pub mod menu;
pub mod schedule;
pub mod stock;
pub mod students;

#[cfg(test)]
mod schedule_tests;

pub use analytics::{
    build_overview, derive_analytics, derive_meal_distribution, derive_stock_overview,
    AnalyticsAggregate, DashboardOverview,
};
pub use dashboard::{CookingSchedule, DashboardService};
pub use distribution::{summarize_distribution, DistributionSummary};
pub use menu::{build_menu, MenuView};
pub use schedule::{group_schedule, summarize_schedule, GroupedProductionUnit, ScheduleSummary};
pub use stock::{build_stock_table, StockLevel, StockTable};
pub use students::{aggregate_students, filter_students, StudentViewModel};
