use crate::infra::AppState;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use shelter_ops::workflows::adoption::{adoption_router, AdoptionRepository, AdoptionWorkflowService};
use shelter_ops::workflows::inventory::InventoryAlerts;
use std::sync::Arc;

pub(crate) fn with_service_routes<R>(service: Arc<AdoptionWorkflowService<R>>) -> axum::Router
where
    R: AdoptionRepository + 'static,
{
    adoption_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/inventory/alerts",
            axum::routing::get(inventory_alerts_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct InventoryAlertsQuery {
    #[serde(default)]
    pub(crate) expiry_days: Option<u32>,
}

pub(crate) async fn inventory_alerts_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<InventoryAlertsQuery>,
) -> Json<InventoryAlerts> {
    let within_days = query.expiry_days.unwrap_or(state.expiry_window_days);
    let today = Local::now().date_naive();
    Json(build_alerts(&state, today, within_days))
}

fn build_alerts(state: &AppState, today: NaiveDate, within_days: u32) -> InventoryAlerts {
    InventoryAlerts::build(&state.inventory, today, within_days)
}
