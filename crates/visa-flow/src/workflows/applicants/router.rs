use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicantId, ApplicantStatusView, ProfileSubmission};
use super::intake::IntakeViolation;
use super::repository::{ApplicantRepository, NotificationPublisher, RepositoryError};
use super::service::{ApplicantServiceError, VisaApplicationService};
use super::staff::{NewStaff, StaffEdits, StaffError};
use super::tracker::TaskTracker;
use crate::workflows::catalog::DestinationId;
use crate::workflows::finance::{FinanceError, InvoiceRequest};
use crate::workflows::pricing::{DiscountCategory, PlanTier};

type SharedService<R, N, T> = Arc<VisaApplicationService<R, N, T>>;

/// Router builder exposing catalog, pricing, applicant, staff, and finance endpoints.
pub fn applicant_router<R, N, T>(service: SharedService<R, N, T>) -> Router
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    Router::new()
        .route("/api/v1/destinations", get(destinations_handler::<R, N, T>))
        .route(
            "/api/v1/destinations/:destination_id/pricing",
            get(pricing_handler::<R, N, T>),
        )
        .route(
            "/api/v1/installments/preview",
            post(preview_handler::<R, N, T>),
        )
        .route(
            "/api/v1/applicants",
            get(list_handler::<R, N, T>).post(create_handler::<R, N, T>),
        )
        .route(
            "/api/v1/applicants/:applicant_id",
            get(applicant_handler::<R, N, T>),
        )
        .route(
            "/api/v1/applicants/:applicant_id/approve",
            post(approve_handler::<R, N, T>),
        )
        .route(
            "/api/v1/applicants/:applicant_id/progress",
            post(progress_handler::<R, N, T>),
        )
        .route(
            "/api/v1/staff",
            get(staff_list_handler::<R, N, T>).post(staff_create_handler::<R, N, T>),
        )
        .route(
            "/api/v1/staff/:staff_id",
            put(staff_update_handler::<R, N, T>),
        )
        .route(
            "/api/v1/finance/transactions",
            get(transactions_handler::<R, N, T>),
        )
        .route(
            "/api/v1/finance/invoices",
            post(invoice_handler::<R, N, T>),
        )
        .route(
            "/api/v1/finance/transactions/:transaction_id/verify",
            post(verify_payment_handler::<R, N, T>),
        )
        .route(
            "/api/v1/finance/summary",
            get(ledger_summary_handler::<R, N, T>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PricingQuery {
    #[serde(default)]
    category: Option<DiscountCategory>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreviewRequest {
    #[serde(default)]
    destination_id: Option<DestinationId>,
    #[serde(default)]
    category: DiscountCategory,
    #[serde(default)]
    plan: Option<PlanTier>,
    application_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressRequest {
    step_index: usize,
}

pub(crate) async fn destinations_handler<R, N, T>(
    State(service): State<SharedService<R, N, T>>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    let catalog = service.catalog();
    (StatusCode::OK, Json(catalog.all().to_vec())).into_response()
}

pub(crate) async fn pricing_handler<R, N, T>(
    State(service): State<SharedService<R, N, T>>,
    Path(destination_id): Path<String>,
    Query(query): Query<PricingQuery>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    let category = query.category.unwrap_or_default();
    match service.quote(&DestinationId(destination_id), category) {
        Ok(options) => (StatusCode::OK, Json(options)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_handler<R, N, T>(
    State(service): State<SharedService<R, N, T>>,
    Json(request): Json<PreviewRequest>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    let installments = service.preview_installments(
        request.destination_id.as_ref(),
        request.category,
        request.plan,
        request.application_date,
    );
    (StatusCode::OK, Json(installments)).into_response()
}

pub(crate) async fn list_handler<R, N, T>(
    State(service): State<SharedService<R, N, T>>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    match service.list() {
        Ok(applicants) => {
            let views: Vec<ApplicantStatusView> =
                applicants.iter().map(|applicant| applicant.status_view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<R, N, T>(
    State(service): State<SharedService<R, N, T>>,
    Json(submission): Json<ProfileSubmission>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    match service.create_profile(submission) {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn applicant_handler<R, N, T>(
    State(service): State<SharedService<R, N, T>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    match service.get(&ApplicantId(applicant_id)) {
        Ok(applicant) => (StatusCode::OK, Json(applicant)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn approve_handler<R, N, T>(
    State(service): State<SharedService<R, N, T>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    match service.approve(&ApplicantId(applicant_id)) {
        Ok(outcome) => (StatusCode::OK, Json(outcome.applicant.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn progress_handler<R, N, T>(
    State(service): State<SharedService<R, N, T>>,
    Path(applicant_id): Path<String>,
    Json(request): Json<ProgressRequest>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    match service.advance_progress(&ApplicantId(applicant_id), request.step_index) {
        Ok(applicant) => (StatusCode::OK, Json(applicant.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn staff_list_handler<R, N, T>(
    State(service): State<SharedService<R, N, T>>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    (StatusCode::OK, Json(service.staff())).into_response()
}

pub(crate) async fn staff_create_handler<R, N, T>(
    State(service): State<SharedService<R, N, T>>,
    Json(new): Json<NewStaff>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    match service.add_staff(new) {
        Ok(outcome) => (StatusCode::CREATED, Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn staff_update_handler<R, N, T>(
    State(service): State<SharedService<R, N, T>>,
    Path(staff_id): Path<String>,
    Json(edits): Json<StaffEdits>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    match service.update_staff(&staff_id, edits) {
        Ok(member) => (StatusCode::OK, Json(member)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn transactions_handler<R, N, T>(
    State(service): State<SharedService<R, N, T>>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    (StatusCode::OK, Json(service.transactions())).into_response()
}

pub(crate) async fn invoice_handler<R, N, T>(
    State(service): State<SharedService<R, N, T>>,
    Json(request): Json<InvoiceRequest>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    match service.create_invoice(request, Utc::now().date_naive()) {
        Ok(invoice) => (StatusCode::CREATED, Json(invoice)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn verify_payment_handler<R, N, T>(
    State(service): State<SharedService<R, N, T>>,
    Path(transaction_id): Path<String>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    match service.verify_payment(&transaction_id) {
        Ok(transaction) => (StatusCode::OK, Json(transaction)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn ledger_summary_handler<R, N, T>(
    State(service): State<SharedService<R, N, T>>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    (StatusCode::OK, Json(service.ledger_totals())).into_response()
}

impl ApplicantServiceError {
    /// HTTP status reported for this error, shared by the router and `AppError`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApplicantServiceError::Intake(IntakeViolation::UnknownDestination(_))
            | ApplicantServiceError::DestinationNotFound(_)
            | ApplicantServiceError::Repository(RepositoryError::NotFound)
            | ApplicantServiceError::Staff(StaffError::NotFound(_))
            | ApplicantServiceError::Finance(FinanceError::UnknownTransaction(_)) => {
                StatusCode::NOT_FOUND
            }
            ApplicantServiceError::Intake(_)
            | ApplicantServiceError::InvalidFees(_)
            | ApplicantServiceError::StepOutOfRange { .. }
            | ApplicantServiceError::UnknownDocument(_)
            | ApplicantServiceError::DocumentTransition { .. }
            | ApplicantServiceError::InstallmentOutOfRange { .. }
            | ApplicantServiceError::Staff(_)
            | ApplicantServiceError::Finance(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApplicantServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            ApplicantServiceError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn error_response(error: ApplicantServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error.status_code(), Json(payload)).into_response()
}
