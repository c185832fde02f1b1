//! Typed admin endpoints over any [`Transport`].
//!
//! Each method unwraps the envelope and decodes `data` into its wire type.
//! Schedule and student payloads come back as raw records because their
//! shapes vary; the services normalize them.

use serde_json::{json, Value};
use std::sync::Arc;

use super::transport::Transport;
use crate::error::{DashboardError, DashboardResult};
use crate::models::envelope::raw_records;
use crate::models::{
    decode_data, decode_records, AiLaunchData, AnalyticsData, ApiResponse, DailyMenuPlan,
    GeneratePlanData, GeneratePlanRequest, MealWithIngredients, ProcessDailyData,
    ProcessDailyRequest, ScheduleParams, StockItem, StockUpdateRequest, StockUpdateResponse,
    TimeslotDistribution,
};

pub const ANALYTICS_PATH: &str = "admin/analytics";
pub const STOCK_LIST_PATH: &str = "admin/stock/list";
pub const STOCK_PATH: &str = "admin/stock";
pub const SCHEDULE_PATH: &str = "admin/schedule";
pub const TODAY_SCHEDULE_PATH: &str = "admin/schedule/today";
pub const MENU_PATH: &str = "admin/menu/today";
pub const TIMESLOTS_PATH: &str = "admin/distribution/timeslots";
pub const STUDENTS_PATH: &str = "admin/students-with-assignments";
pub const GENERATE_PLAN_PATH: &str = "admin/ai/generate-plan";
pub const PROCESS_DAILY_PATH: &str = "admin/ai/process-daily";
pub const AI_LAUNCH_PATH: &str = "admin/ai/launch";

/// Typed client for the admin API.
///
/// # Thread Safety
/// Cloning shares the transport; clones can be used from different tasks.
#[derive(Clone)]
pub struct AdminApi {
    transport: Arc<dyn Transport>,
}

fn date_query(date: Option<&str>) -> Vec<(String, String)> {
    date.map(|d| vec![("date".to_string(), d.to_string())])
        .unwrap_or_default()
}

impl AdminApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// GET and unwrap `data` without decoding it, tagging errors with the
    /// operation.
    pub async fn get_data(
        &self,
        operation: &str,
        path: &str,
        query: &[(String, String)],
    ) -> DashboardResult<Value> {
        log::debug!("{} via {}", operation, self.transport.name());
        self.transport
            .get(path, query)
            .await
            .and_then(ApiResponse::into_data)
            .map_err(|e| tag(e, operation, path))
    }

    async fn post_data(&self, operation: &str, path: &str, body: Option<&Value>) -> DashboardResult<Value> {
        log::debug!("{} via {}", operation, self.transport.name());
        self.transport
            .post(path, body)
            .await
            .and_then(ApiResponse::into_data)
            .map_err(|e| tag(e, operation, path))
    }

    /// Raw `GET` for callers that need the envelope itself.
    pub async fn get_envelope(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> DashboardResult<ApiResponse<Value>> {
        self.transport.get(path, query).await
    }

    // =========================================================
    // Analytics
    // =========================================================

    pub async fn get_analytics(&self) -> DashboardResult<AnalyticsData> {
        let data = self.get_data("get_analytics", ANALYTICS_PATH, &[]).await?;
        decode_data(data).map_err(|e| tag(e, "get_analytics", ANALYTICS_PATH))
    }

    // =========================================================
    // Stock
    // =========================================================

    pub async fn get_stock(&self) -> DashboardResult<Vec<StockItem>> {
        let data = self.get_data("get_stock", STOCK_LIST_PATH, &[]).await?;
        decode_records(data, "get_stock").map_err(|e| tag(e, "get_stock", STOCK_LIST_PATH))
    }

    pub async fn get_all_stock(&self) -> DashboardResult<Vec<StockItem>> {
        let data = self.get_data("get_all_stock", STOCK_PATH, &[]).await?;
        decode_records(data, "get_all_stock").map_err(|e| tag(e, "get_all_stock", STOCK_PATH))
    }

    /// Set the available quantity of one ingredient.
    pub async fn update_stock(
        &self,
        ingredient_id: &str,
        available_quantity: f64,
    ) -> DashboardResult<StockUpdateResponse> {
        let request = StockUpdateRequest {
            ingredient_id: ingredient_id.to_string(),
            available_quantity,
        };
        let body = serde_json::to_value(&request)?;
        let data = self.post_data("update_stock", STOCK_PATH, Some(&body)).await?;
        decode_data(data).map_err(|e| tag(e, "update_stock", STOCK_PATH))
    }

    // =========================================================
    // Schedule & menu
    // =========================================================

    pub async fn get_schedule(&self, params: &ScheduleParams) -> DashboardResult<Vec<DailyMenuPlan>> {
        let data = self
            .get_data("get_schedule", SCHEDULE_PATH, &params.to_query())
            .await?;
        decode_records(data, "get_schedule").map_err(|e| tag(e, "get_schedule", SCHEDULE_PATH))
    }

    /// Today's assignment rows, unnormalized.
    pub async fn get_today_schedule(&self) -> DashboardResult<Vec<Value>> {
        let data = self
            .get_data("get_today_schedule", TODAY_SCHEDULE_PATH, &[])
            .await?;
        Ok(raw_records(data))
    }

    pub async fn get_menu(&self) -> DashboardResult<Vec<MealWithIngredients>> {
        let data = self.get_data("get_menu", MENU_PATH, &[]).await?;
        decode_records(data, "get_menu").map_err(|e| tag(e, "get_menu", MENU_PATH))
    }

    // =========================================================
    // Distribution & students
    // =========================================================

    pub async fn get_distribution_timeslots(
        &self,
        date: Option<&str>,
    ) -> DashboardResult<Vec<TimeslotDistribution>> {
        let data = self
            .get_data("get_distribution_timeslots", TIMESLOTS_PATH, &date_query(date))
            .await?;
        decode_records(data, "get_distribution_timeslots")
            .map_err(|e| tag(e, "get_distribution_timeslots", TIMESLOTS_PATH))
    }

    /// Student and assignment records, unnormalized.
    pub async fn get_student_demands(&self, date: Option<&str>) -> DashboardResult<Vec<Value>> {
        let data = self
            .get_data("get_student_demands", STUDENTS_PATH, &date_query(date))
            .await?;
        Ok(raw_records(data))
    }

    // =========================================================
    // AI meal planning
    // =========================================================

    pub async fn generate_plan(&self, request: &GeneratePlanRequest) -> DashboardResult<GeneratePlanData> {
        let body = serde_json::to_value(request)?;
        let data = self
            .post_data("generate_plan", GENERATE_PLAN_PATH, Some(&body))
            .await?;
        decode_data(data).map_err(|e| tag(e, "generate_plan", GENERATE_PLAN_PATH))
    }

    /// Process one day of assignments; an absent request posts `{}`.
    pub async fn trigger_ai(&self, request: Option<&ProcessDailyRequest>) -> DashboardResult<ProcessDailyData> {
        let body = match request {
            Some(request) => serde_json::to_value(request)?,
            None => json!({}),
        };
        let data = self
            .post_data("trigger_ai", PROCESS_DAILY_PATH, Some(&body))
            .await?;
        decode_data(data).map_err(|e| tag(e, "trigger_ai", PROCESS_DAILY_PATH))
    }

    pub async fn launch_ai(&self) -> DashboardResult<AiLaunchData> {
        let data = self.post_data("launch_ai", AI_LAUNCH_PATH, None).await?;
        decode_data(data).map_err(|e| tag(e, "launch_ai", AI_LAUNCH_PATH))
    }
}

fn tag(err: DashboardError, operation: &str, path: &str) -> DashboardError {
    err.with_operation(operation).with_endpoint(path)
}
