// HTTP request handlers
use crate::application::analysis_service::AnalysisRequest;
use crate::domain::calendar::parse_date;
use crate::domain::catalog::EnabledMap;
use crate::domain::dosing::{parse_timestamp, DosingEvent};
use crate::domain::equipment::{EquipmentFilter, EquipmentItem};
use crate::domain::error::AnalysisError;
use crate::domain::livestock::{LivestockFilter, LivestockItem, LivestockStatusFilter};
use crate::infrastructure::http_response::{
    accepts_brotli, error_response, ok_response, result_response,
};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct EquipmentQuery {
    pub status: Option<EquipmentFilter>,
    /// ISO date the timeline treats as today.
    pub now: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LivestockQuery {
    #[serde(default)]
    pub status: LivestockStatusFilter,
    pub search: Option<String>,
    pub now: Option<String>,
}

impl LivestockQuery {
    fn filter(&self) -> LivestockFilter {
        LivestockFilter {
            status: self.status,
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    /// ISO date of the change, or the day to report on; defaults to today.
    pub on: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IcpQuery {
    #[serde(default)]
    pub out_of_range: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct DosingRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DosingSummaryQuery {
    /// ISO date-time closing the 24 hour window; defaults to the local time.
    pub now: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DailyVolumeQuery {
    pub end: Option<String>,
    #[serde(default = "default_volume_days")]
    pub days: u32,
}

fn default_volume_days() -> u32 {
    30
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub source_id: String,
    /// Current selection; the catalog defaults when absent.
    #[serde(default)]
    pub enabled_sources: Option<EnabledMap>,
}

fn compress(state: &AppState, headers: &HeaderMap) -> bool {
    state.compress_responses && accepts_brotli(headers)
}

/// Parse an optional ISO date parameter, falling back to the local date.
fn date_or_today(value: Option<&str>) -> Result<NaiveDate, AnalysisError> {
    match value {
        Some(v) => parse_date(v),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, AnalysisError> {
    value.map(parse_date).transpose()
}

fn timestamp_or_now(value: Option<&str>) -> Result<NaiveDateTime, AnalysisError> {
    match value {
        Some(v) => parse_timestamp(v),
        None => Ok(chrono::Local::now().naive_local()),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_catalog(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let catalog = state.analysis_service.catalog();
    ok_response(&catalog, compress(&state, &headers)).await
}

/// Build both chart shapes' inputs from the client's UI snapshot
pub async fn post_view(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalysisRequest>,
) -> Response {
    let view = state.analysis_service.view(&request);
    ok_response(&view, compress(&state, &headers)).await
}

pub async fn post_toggle(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ToggleRequest>,
) -> Response {
    let enabled = request
        .enabled_sources
        .unwrap_or_else(|| state.analysis_service.catalog().enabled_sources);
    let result = state
        .analysis_service
        .toggle_source(&enabled, &request.source_id);
    ok_response(&result, compress(&state, &headers)).await
}

pub async fn list_equipment(
    Query(query): Query<EquipmentQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let filter = query.status.unwrap_or_default();
    let result = state.equipment_service.list(filter).await;
    result_response(result, compress(&state, &headers)).await
}

pub async fn create_equipment(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(item): Json<EquipmentItem>,
) -> Response {
    let compress = compress(&state, &headers);
    match state.equipment_service.create(item).await {
        Ok(created) => created_response(&created, compress).await,
        Err(e) => error_response(e, compress).await,
    }
}

pub async fn update_equipment(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(item): Json<EquipmentItem>,
) -> Response {
    let result = state.equipment_service.update(&id, item).await;
    result_response(result, compress(&state, &headers)).await
}

pub async fn retire_equipment(
    Path(id): Path<String>,
    Query(query): Query<DateQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = match date_or_today(query.on.as_deref()) {
        Ok(on) => state.equipment_service.retire(&id, on).await,
        Err(e) => Err(e.into()),
    };
    result_response(result, compress(&state, &headers)).await
}

pub async fn delete_equipment(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.equipment_service.delete(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e, compress(&state, &headers)).await,
    }
}

pub async fn equipment_timeline(
    Query(query): Query<EquipmentQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let filter = query.status.unwrap_or_default();
    let result = match date_or_today(query.now.as_deref()) {
        Ok(now) => state.equipment_service.timeline(filter, now).await,
        Err(e) => Err(e.into()),
    };
    result_response(result, compress(&state, &headers)).await
}

pub async fn list_livestock(
    Query(query): Query<LivestockQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = match date_or_today(query.now.as_deref()) {
        Ok(today) => state.livestock_service.list(&query.filter(), today).await,
        Err(e) => Err(e.into()),
    };
    result_response(result, compress(&state, &headers)).await
}

pub async fn create_livestock(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(item): Json<LivestockItem>,
) -> Response {
    let compress = compress(&state, &headers);
    match state.livestock_service.create(item).await {
        Ok(created) => created_response(&created, compress).await,
        Err(e) => error_response(e, compress).await,
    }
}

pub async fn update_livestock(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(item): Json<LivestockItem>,
) -> Response {
    let result = state.livestock_service.update(&id, item).await;
    result_response(result, compress(&state, &headers)).await
}

pub async fn mark_livestock_deceased(
    Path(id): Path<String>,
    Query(query): Query<DateQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = match date_or_today(query.on.as_deref()) {
        Ok(on) => state.livestock_service.mark_deceased(&id, on).await,
        Err(e) => Err(e.into()),
    };
    result_response(result, compress(&state, &headers)).await
}

pub async fn delete_livestock(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.livestock_service.delete(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e, compress(&state, &headers)).await,
    }
}

pub async fn livestock_timeline(
    Query(query): Query<LivestockQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = match date_or_today(query.now.as_deref()) {
        Ok(now) => state.livestock_service.timeline(&query.filter(), now).await,
        Err(e) => Err(e.into()),
    };
    result_response(result, compress(&state, &headers)).await
}

pub async fn list_icp_tests(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let tests = state.icp_service.list();
    ok_response(&tests, compress(&state, &headers)).await
}

pub async fn get_icp_test(
    Path(id): Path<String>,
    Query(query): Query<IcpQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = state
        .icp_service
        .get(&id, query.out_of_range)
        .map_err(anyhow::Error::from);
    result_response(result, compress(&state, &headers)).await
}

pub async fn get_element_history(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = state
        .icp_service
        .element_history(&id)
        .map_err(anyhow::Error::from);
    result_response(result, compress(&state, &headers)).await
}

pub async fn list_dosing_events(
    Query(query): Query<DosingRangeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let range = optional_date(query.from.as_deref())
        .and_then(|from| Ok((from, optional_date(query.to.as_deref())?)));
    let result = match range {
        Ok((from, to)) => state.dosing_service.events(from, to).await,
        Err(e) => Err(e.into()),
    };
    result_response(result, compress(&state, &headers)).await
}

pub async fn log_dosing_event(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(event): Json<DosingEvent>,
) -> Response {
    let compress = compress(&state, &headers);
    match state.dosing_service.log(event).await {
        Ok(logged) => created_response(&logged, compress).await,
        Err(e) => error_response(e, compress).await,
    }
}

pub async fn dosing_summary(
    Query(query): Query<DosingSummaryQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = match timestamp_or_now(query.now.as_deref()) {
        Ok(now) => state.dosing_service.summary(now).await,
        Err(e) => Err(e.into()),
    };
    result_response(result, compress(&state, &headers)).await
}

pub async fn daily_dosing_volume(
    Query(query): Query<DailyVolumeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = match date_or_today(query.end.as_deref()) {
        Ok(end) => state.dosing_service.daily(end, query.days).await,
        Err(e) => Err(e.into()),
    };
    result_response(result, compress(&state, &headers)).await
}

pub async fn list_trace_batches(
    Query(query): Query<DateQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = date_or_today(query.on.as_deref())
        .map(|today| state.dosing_service.batches(today))
        .map_err(anyhow::Error::from);
    result_response(result, compress(&state, &headers)).await
}

pub async fn list_trace_templates(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    ok_response(&state.dosing_service.templates(), compress(&state, &headers)).await
}

async fn created_response<T: serde::Serialize>(data: &T, compress: bool) -> Response {
    let mut response = ok_response(data, compress).await;
    if response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::CREATED;
    }
    response
}
