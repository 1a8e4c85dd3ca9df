use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryShelterStore};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use shelter_ops::config::AppConfig;
use shelter_ops::error::AppError;
use shelter_ops::telemetry;
use shelter_ops::workflows::adoption::AdoptionWorkflowService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(config.environment, &config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        inventory: Arc::new(crate::infra::seed_inventory()),
        expiry_window_days: config.alerts.expiry_window_days,
    };

    let store = Arc::new(InMemoryShelterStore::seeded());
    let adoption_service = Arc::new(AdoptionWorkflowService::new(store));

    let app = with_service_routes(adoption_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "shelter operations service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
