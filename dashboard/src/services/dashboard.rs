//! Page-level orchestration.
//!
//! [`DashboardService`] fetches each admin query through the [`QueryCache`],
//! decodes it, runs the matching normalizer and memoizes the resulting view
//! against the payload checksum. Mutations invalidate the queries they make
//! stale.
//!
//! Transport and application errors propagate to the caller, which owns any
//! retry. The overview page is the one exception: distribution and stock are
//! secondary inputs there, so their failures degrade to empty collections.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::analytics::{build_overview, DashboardOverview};
use super::distribution::{summarize_distribution, DistributionSummary};
use super::menu::{build_menu, MenuView};
use super::schedule::{group_schedule, summarize_schedule, GroupedProductionUnit, ScheduleSummary};
use super::stock::{build_stock_table, update_for_name, StockTable};
use super::students::{aggregate_students, StudentViewModel};
use crate::cache::{Memo, QueryCache, QueryId, QueryKey};
use crate::checksum::payload_checksum;
use crate::client::admin::{
    AdminApi, ANALYTICS_PATH, MENU_PATH, STOCK_LIST_PATH, STUDENTS_PATH, TIMESLOTS_PATH,
    TODAY_SCHEDULE_PATH,
};
use crate::client::factory::TransportFactory;
use crate::config::ClientConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::models::envelope::raw_records;
use crate::models::{
    decode_data, decode_records, AiLaunchData, AnalyticsData, GeneratePlanData,
    GeneratePlanRequest, MealWithIngredients, ProcessDailyData, ProcessDailyRequest, StockItem,
    StockUpdateResponse, TimeslotDistribution,
};

/// Queries made stale by launching the AI flow.
pub const AI_LAUNCH_INVALIDATES: [QueryKey; 3] =
    [QueryKey::Analytics, QueryKey::Students, QueryKey::Distribution];

/// Cooking schedule page: grouped production units plus headline numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookingSchedule {
    pub units: Vec<GroupedProductionUnit>,
    pub summary: ScheduleSummary,
}

/// Operation name and endpoint behind each cached query.
fn endpoint(key: QueryKey) -> (&'static str, &'static str) {
    match key {
        QueryKey::Analytics => ("get_analytics", ANALYTICS_PATH),
        QueryKey::Stock => ("get_stock", STOCK_LIST_PATH),
        QueryKey::Schedule => ("get_today_schedule", TODAY_SCHEDULE_PATH),
        QueryKey::Menu => ("get_menu", MENU_PATH),
        QueryKey::Distribution => ("get_distribution_timeslots", TIMESLOTS_PATH),
        QueryKey::Students => ("get_student_demands", STUDENTS_PATH),
    }
}

fn query_id(key: QueryKey, date: Option<&str>) -> QueryId {
    match date {
        Some(date) => QueryId::scoped(key, date),
        None => QueryId::new(key),
    }
}

/// A fetched payload and its checksum.
struct Payload {
    data: Value,
    checksum: String,
}

#[derive(Default)]
struct Views {
    overview: Memo<DashboardOverview>,
    schedule: Memo<CookingSchedule>,
    students: Memo<Vec<StudentViewModel>>,
    menu: Memo<MenuView>,
    distribution: Memo<DistributionSummary>,
    stock: Memo<StockTable>,
}

/// Dashboard data service.
///
/// # Thread Safety
/// Cheap to clone; clones share the transport, the cache and the memoized
/// views, so they can serve concurrent pages.
#[derive(Clone)]
pub struct DashboardService {
    api: AdminApi,
    cache: QueryCache,
    ttl: Duration,
    analytics_refresh: Duration,
    views: Arc<Views>,
}

impl DashboardService {
    /// Service with its own empty cache.
    pub fn new(api: AdminApi, config: &ClientConfig) -> Self {
        Self::with_cache(api, QueryCache::new(), config)
    }

    /// Service sharing an existing cache.
    pub fn with_cache(api: AdminApi, cache: QueryCache, config: &ClientConfig) -> Self {
        Self {
            api,
            cache,
            ttl: config.cache_ttl(),
            analytics_refresh: config.analytics_refresh(),
            views: Arc::new(Views::default()),
        }
    }

    /// Build the transport named in `config` and wrap it.
    pub fn from_config(config: &ClientConfig) -> DashboardResult<Self> {
        let transport = TransportFactory::create(config)?;
        Ok(Self::new(AdminApi::new(transport), config))
    }

    pub fn api(&self) -> &AdminApi {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    fn ttl_for(&self, key: QueryKey) -> Duration {
        match key {
            QueryKey::Analytics => self.analytics_refresh,
            _ => self.ttl,
        }
    }

    /// Cached payload if fresh, else a network fetch recorded in the cache.
    async fn fetch(&self, key: QueryKey, date: Option<&str>) -> DashboardResult<Payload> {
        let id = query_id(key, date);
        if let Some(entry) = self.cache.get(&id) {
            if entry.is_fresh_at(self.ttl_for(key), chrono::Utc::now()) {
                if let (Some(data), Some(checksum)) = (entry.data, entry.checksum) {
                    log::debug!("cache hit for {}", id);
                    return Ok(Payload { data, checksum });
                }
            }
        }

        let (operation, path) = endpoint(key);
        let query: Vec<(String, String)> = date
            .map(|d| vec![("date".to_string(), d.to_string())])
            .unwrap_or_default();

        match self.api.get_data(operation, path, &query).await {
            Ok(data) => {
                let checksum = payload_checksum(&data);
                self.cache.record_success(&id, data.clone(), checksum.clone());
                Ok(Payload { data, checksum })
            }
            Err(e) => {
                log::warn!("{} failed: {}", id, e);
                self.cache.record_error(&id, e.message());
                Err(e)
            }
        }
    }

    /// Decode records of a secondary input, or nothing if it failed.
    fn degrade<T: serde::de::DeserializeOwned>(
        result: DashboardResult<Payload>,
        source: &str,
    ) -> (Vec<T>, String) {
        match result.and_then(|p| Ok((decode_records(p.data, source)?, p.checksum))) {
            Ok(decoded) => decoded,
            Err(e) => {
                log::warn!("{} unavailable, continuing without it: {}", source, e);
                (Vec::new(), String::from("unavailable"))
            }
        }
    }

    // =========================================================
    // Pages
    // =========================================================

    /// Main dashboard: analytics, timeslots and stock fetched concurrently.
    ///
    /// # Errors
    /// Only an analytics failure is returned.
    pub async fn overview(&self) -> DashboardResult<DashboardOverview> {
        let (analytics, timeslots, stock) = futures::join!(
            self.fetch(QueryKey::Analytics, None),
            self.fetch(QueryKey::Distribution, None),
            self.fetch(QueryKey::Stock, None),
        );

        let analytics = analytics?;
        let (timeslots, timeslot_sum): (Vec<TimeslotDistribution>, _) =
            Self::degrade(timeslots, "get_distribution_timeslots");
        let (stock, stock_sum): (Vec<StockItem>, _) = Self::degrade(stock, "get_stock");

        let checksum = format!("{}:{}:{}", analytics.checksum, timeslot_sum, stock_sum);
        let data: AnalyticsData = decode_data(analytics.data)
            .map_err(|e| e.with_operation("get_analytics").with_endpoint(ANALYTICS_PATH))?;

        Ok(self.views.overview.get_or_compute(&checksum, || {
            build_overview(Some(&data), &timeslots, &stock)
        }))
    }

    /// Today's cooking schedule, grouped into production units.
    pub async fn cooking_schedule(&self) -> DashboardResult<CookingSchedule> {
        let payload = self.fetch(QueryKey::Schedule, None).await?;
        let rows = raw_records(payload.data);
        Ok(self.views.schedule.get_or_compute(&payload.checksum, || CookingSchedule {
            units: group_schedule(&rows),
            summary: summarize_schedule(&rows),
        }))
    }

    /// One view model per student, optionally for a given date.
    pub async fn student_demands(&self, date: Option<&str>) -> DashboardResult<Vec<StudentViewModel>> {
        let payload = self.fetch(QueryKey::Students, date).await?;
        let rows = raw_records(payload.data);
        Ok(self
            .views
            .students
            .get_or_compute(&payload.checksum, || aggregate_students(&rows)))
    }

    pub async fn menu(&self) -> DashboardResult<MenuView> {
        let payload = self.fetch(QueryKey::Menu, None).await?;
        let meals: Vec<MealWithIngredients> = decode_records(payload.data, "get_menu")?;
        Ok(self
            .views
            .menu
            .get_or_compute(&payload.checksum, || build_menu(&meals)))
    }

    pub async fn distribution(&self, date: Option<&str>) -> DashboardResult<DistributionSummary> {
        let payload = self.fetch(QueryKey::Distribution, date).await?;
        let timeslots: Vec<TimeslotDistribution> =
            decode_records(payload.data, "get_distribution_timeslots")?;
        Ok(self
            .views
            .distribution
            .get_or_compute(&payload.checksum, || summarize_distribution(&timeslots)))
    }

    pub async fn stock_table(&self) -> DashboardResult<StockTable> {
        let payload = self.fetch(QueryKey::Stock, None).await?;
        let items: Vec<StockItem> = decode_records(payload.data, "get_stock")?;
        Ok(self
            .views
            .stock
            .get_or_compute(&payload.checksum, || build_stock_table(&items)))
    }

    // =========================================================
    // Mutations
    // =========================================================

    /// Set an ingredient's quantity and invalidate the stock query.
    pub async fn update_stock(
        &self,
        ingredient_id: &str,
        available_quantity: f64,
    ) -> DashboardResult<StockUpdateResponse> {
        let response = self.api.update_stock(ingredient_id, available_quantity).await?;
        self.cache.invalidate(QueryKey::Stock);
        log::info!("stock for {} set to {}", ingredient_id, available_quantity);
        Ok(response)
    }

    /// Same as [`Self::update_stock`], looking the item up by display name.
    ///
    /// # Errors
    /// `Application` when no stock item has that name.
    pub async fn update_stock_by_name(
        &self,
        name: &str,
        available_quantity: f64,
    ) -> DashboardResult<StockUpdateResponse> {
        let payload = self.fetch(QueryKey::Stock, None).await?;
        let items: Vec<StockItem> = decode_records(payload.data, "get_stock")?;
        let request = update_for_name(&items, name, available_quantity).ok_or_else(|| {
            DashboardError::application(Some(format!("No stock item named {:?}", name.trim()).as_str()))
                .with_operation("update_stock_by_name")
        })?;
        self.update_stock(&request.ingredient_id, request.available_quantity)
            .await
    }

    /// Run the AI assignment flow, then invalidate analytics, students and
    /// distribution.
    pub async fn launch_ai(&self) -> DashboardResult<AiLaunchData> {
        let launched = self.api.launch_ai().await?;
        let touched = self.cache.invalidate_all(&AI_LAUNCH_INVALIDATES);
        log::info!(
            "AI flow {} ({} assignments), {} cached queries invalidated",
            launched.status,
            launched.processed,
            touched
        );
        Ok(launched)
    }

    pub async fn generate_plan(&self, request: &GeneratePlanRequest) -> DashboardResult<GeneratePlanData> {
        self.api.generate_plan(request).await
    }

    pub async fn trigger_ai(&self, request: Option<&ProcessDailyRequest>) -> DashboardResult<ProcessDailyData> {
        self.api.trigger_ai(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStatus;
    use crate::client::local::LocalTransport;
    use crate::client::transport::Method;
    use serde_json::json;

    fn service(local: &LocalTransport) -> DashboardService {
        DashboardService::new(
            AdminApi::new(Arc::new(local.clone())),
            &ClientConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let local = LocalTransport::with_sample_data();
        let service = service(&local);

        let first = service.stock_table().await.unwrap();
        let second = service.stock_table().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(local.hits(Method::Get, STOCK_LIST_PATH), 1);
    }

    #[tokio::test]
    async fn test_update_stock_invalidates_stock() {
        let local = LocalTransport::with_sample_data();
        let service = service(&local);

        service.stock_table().await.unwrap();
        service.update_stock("ing-milk", 30.0).await.unwrap();
        assert_eq!(
            service.cache().get(&QueryId::new(QueryKey::Stock)).unwrap().status,
            CacheStatus::Invalidated
        );

        service.stock_table().await.unwrap();
        assert_eq!(local.hits(Method::Get, STOCK_LIST_PATH), 2);
    }

    #[tokio::test]
    async fn test_update_stock_by_unknown_name() {
        let local = LocalTransport::with_sample_data();
        let err = service(&local)
            .update_stock_by_name("Saffron", 1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Application { .. }));
        assert_eq!(local.hits(Method::Post, "admin/stock"), 0);
    }

    #[tokio::test]
    async fn test_update_stock_by_name_posts_ingredient_id() {
        let local = LocalTransport::with_sample_data();
        let updated = service(&local)
            .update_stock_by_name("cooking oil", 60.0)
            .await
            .unwrap();
        assert_eq!(updated.ingredient_id, "ing-oil");
    }

    #[tokio::test]
    async fn test_overview_survives_secondary_failures() {
        let local = LocalTransport::with_sample_data();
        local.fail(Method::Get, TIMESLOTS_PATH, Some(500));
        local.fail(Method::Get, STOCK_LIST_PATH, None);

        let overview = service(&local).overview().await.unwrap();
        assert_eq!(overview.total_students, 3450);
        assert!(overview.derived);
        assert!(overview.meal_distribution.iter().all(|m| m.count == 0));
        assert!(overview.stock_overview.iter().all(|s| s.value == 0));
    }

    #[tokio::test]
    async fn test_overview_fails_with_analytics() {
        let local = LocalTransport::with_sample_data();
        local.respond(
            Method::Get,
            ANALYTICS_PATH,
            crate::models::ApiResponse::failure(Some("Admin role required")),
        );
        let err = service(&local).overview().await.unwrap_err();
        assert_eq!(err.message(), "Admin role required");
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_data() {
        let local = LocalTransport::with_sample_data();
        let service = service(&local);
        service.menu().await.unwrap();

        service.cache().invalidate(QueryKey::Menu);
        local.set_offline(true);
        assert!(service.menu().await.is_err());

        let entry = service.cache().get(&QueryId::new(QueryKey::Menu)).unwrap();
        assert!(matches!(entry.status, CacheStatus::Error(_)));
        assert!(entry.data.is_some());
    }

    #[tokio::test]
    async fn test_launch_ai_invalidates_dependents() {
        let local = LocalTransport::with_sample_data();
        let service = service(&local);
        service.overview().await.unwrap();
        service.student_demands(None).await.unwrap();

        service.launch_ai().await.unwrap();
        for key in AI_LAUNCH_INVALIDATES {
            if let Some(entry) = service.cache().get(&QueryId::new(key)) {
                assert_eq!(entry.status, CacheStatus::Invalidated, "{}", key);
            }
        }
        assert_eq!(
            service.cache().get(&QueryId::new(QueryKey::Stock)).unwrap().status,
            CacheStatus::Success
        );
    }

    #[tokio::test]
    async fn test_student_demands_are_scoped_by_date() {
        let local = LocalTransport::new();
        local.respond_data(Method::Get, STUDENTS_PATH, json!([{"student_id": "s1"}]));
        let service = service(&local);

        service.student_demands(None).await.unwrap();
        service.student_demands(Some("2026-03-02")).await.unwrap();
        service.student_demands(Some("2026-03-02")).await.unwrap();
        assert_eq!(local.hits(Method::Get, STUDENTS_PATH), 2);
    }
}
