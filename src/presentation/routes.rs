// Router wiring
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::*;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    // Compression is handled in the response builders, so no CompressionLayer
    Router::new()
        .route("/healthz", get(health_check))
        .route("/analysis/catalog", get(get_catalog))
        .route("/analysis/view", post(post_view))
        .route("/analysis/toggle", post(post_toggle))
        .route("/equipment", get(list_equipment).post(create_equipment))
        .route("/equipment/timeline", get(equipment_timeline))
        .route(
            "/equipment/:id",
            put(update_equipment).delete(delete_equipment),
        )
        .route("/equipment/:id/retire", post(retire_equipment))
        .route("/livestock", get(list_livestock).post(create_livestock))
        .route("/livestock/timeline", get(livestock_timeline))
        .route(
            "/livestock/:id",
            put(update_livestock).delete(delete_livestock),
        )
        .route("/livestock/:id/deceased", post(mark_livestock_deceased))
        .route("/icp/tests", get(list_icp_tests))
        .route("/icp/tests/:id", get(get_icp_test))
        .route("/icp/elements/:id/history", get(get_element_history))
        .route("/dosing/events", get(list_dosing_events).post(log_dosing_event))
        .route("/dosing/summary", get(dosing_summary))
        .route("/dosing/daily", get(daily_dosing_volume))
        .route("/dosing/trace/batches", get(list_trace_batches))
        .route("/dosing/trace/templates", get(list_trace_templates))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
