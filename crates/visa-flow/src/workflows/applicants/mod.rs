//! Applicant profiles: intake validation, installment snapshots, document review, staff
//! accounts, and outbound notification and tracker hooks.

pub mod domain;
pub(crate) mod intake;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;
pub mod settings;
pub mod staff;
pub mod tracker;

#[cfg(test)]
mod tests;

pub use domain::{
    Applicant, ApplicantId, ApplicantStatus, ApplicantStatusView, ContactDetails, DocStatus,
    DocumentState, FinanceSnapshot, Notification, NotificationKind, PassportDetails,
    ProfileEdits, ProfileSubmission,
};
pub use intake::{age_on, IntakeGuard, IntakeViolation};
pub use memory::{InMemoryApplicantRepository, InMemoryNotifications, RecordingTracker};
pub use repository::{
    ApplicantRepository, NotificationError, NotificationPublisher, RepositoryError,
};
pub use router::applicant_router;
pub use service::{
    ApplicantOutcome, ApplicantServiceError, DocumentReadiness, StaffOutcome, SyncFailure,
    SyncReport, UndeliveredNotification, VisaApplicationService,
};
pub use settings::ApplicantSettings;
pub use staff::{
    NewStaff, StaffDirectory, StaffEdits, StaffError, StaffMember, StaffRole, StaffStatus,
};
pub use tracker::{
    destination_task, profile_task, user_task, TaskTracker, TrackerError, TrackerField,
    TrackerList, TrackerTask, TrackerValue,
};
