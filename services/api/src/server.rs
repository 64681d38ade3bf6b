use crate::cli::ServeArgs;
use crate::infra::{load_catalog, wire_service, AppState};
use crate::routes::with_applicant_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use visa_flow::config::AppConfig;
use visa_flow::error::AppError;
use visa_flow::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let catalog = load_catalog(&config)?;
    let destinations = catalog.len();
    let wiring = wire_service(&config, catalog);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        notifications: wiring.notifications.clone(),
    };

    let app = with_applicant_routes(wiring.service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, destinations, "visa application service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
