use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::applicants::domain::{
    Applicant, ApplicantId, ContactDetails, Notification, PassportDetails, ProfileSubmission,
};
use crate::workflows::applicants::memory::{
    InMemoryApplicantRepository, InMemoryNotifications, RecordingTracker,
};
use crate::workflows::applicants::repository::{
    ApplicantRepository, NotificationError, NotificationPublisher, RepositoryError,
};
use crate::workflows::applicants::{applicant_router, VisaApplicationService};
use crate::workflows::catalog::{DestinationCatalog, DestinationId};
use crate::workflows::pricing::{DiscountCategory, PlanTier};

pub(super) type MemoryService =
    VisaApplicationService<InMemoryApplicantRepository, InMemoryNotifications, RecordingTracker>;

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn submission() -> ProfileSubmission {
    ProfileSubmission {
        name: "Alex".to_string(),
        surname: "Mercer".to_string(),
        contact: ContactDetails {
            email: "alex.mercer@example.com".to_string(),
            mobile: "+381 64 555 0101".to_string(),
            alternative_mobile: None,
            whatsapp: Some("+381 64 555 0101".to_string()),
        },
        date_of_birth: Some(date(1992, 6, 3)),
        application_date: date(2024, 1, 15),
        passport: PassportDetails {
            number: "P4432190".to_string(),
            expiry: Some(date(2031, 4, 30)),
            nationality: "Indian".to_string(),
        },
        profession: "Welder".to_string(),
        destination_id: DestinationId::new("c1"),
        visa_name: None,
        discount: DiscountCategory::Standard,
        plan: PlanTier::ThreePart,
    }
}

pub(super) fn serbia_submission(plan: PlanTier) -> ProfileSubmission {
    let mut submission = submission();
    submission.destination_id = DestinationId::new("c3");
    submission.plan = plan;
    submission
}

pub(super) fn build_service() -> (
    MemoryService,
    Arc<InMemoryApplicantRepository>,
    Arc<InMemoryNotifications>,
    Arc<RecordingTracker>,
) {
    let repository = Arc::new(InMemoryApplicantRepository::default());
    let notifications = Arc::new(InMemoryNotifications::default());
    let tracker = Arc::new(RecordingTracker::default());
    let service = VisaApplicationService::new(
        DestinationCatalog::standard(),
        repository.clone(),
        notifications.clone(),
        tracker.clone(),
    );
    (service, repository, notifications, tracker)
}

pub(super) struct UnavailableRepository;

impl ApplicantRepository for UnavailableRepository {
    fn insert(&self, _applicant: Applicant) -> Result<Applicant, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _applicant: Applicant) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Applicant>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Accepts the id lookup but rejects every insert as a duplicate.
pub(super) struct ConflictRepository;

impl ApplicantRepository for ConflictRepository {
    fn insert(&self, _applicant: Applicant) -> Result<Applicant, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _applicant: Applicant) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        Ok(None)
    }

    fn list(&self) -> Result<Vec<Applicant>, RepositoryError> {
        Ok(Vec::new())
    }
}

/// Notification channel whose transport is down.
pub(super) struct OfflineNotifications;

impl NotificationPublisher for OfflineNotifications {
    fn publish(&self, _notification: Notification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp relay refused connection".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    applicant_router(Arc::new(service))
}
