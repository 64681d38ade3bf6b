use super::domain::{Applicant, ApplicantId, Notification};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ApplicantRepository: Send + Sync {
    fn insert(&self, applicant: Applicant) -> Result<Applicant, RepositoryError>;
    fn update(&self, applicant: Applicant) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError>;
    /// All applicants ordered by id.
    fn list(&self) -> Result<Vec<Applicant>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound portal notification hook (in-app feed, e-mail, push).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: Notification) -> Result<(), NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
