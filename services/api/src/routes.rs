use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use visa_flow::workflows::applicants::{
    applicant_router, ApplicantRepository, NotificationPublisher, TaskTracker,
    VisaApplicationService,
};

pub(crate) fn with_applicant_routes<R, N, T>(
    service: Arc<VisaApplicationService<R, N, T>>,
) -> axum::Router
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    applicant_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/notifications",
            axum::routing::get(notifications_endpoint),
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

pub(crate) async fn notifications_endpoint(
    Extension(state): Extension<AppState>,
) -> impl IntoResponse {
    let notifications = state.notifications.events();
    let unread = state.notifications.unread();
    Json(json!({
        "unread": unread,
        "notifications": notifications,
    }))
}
