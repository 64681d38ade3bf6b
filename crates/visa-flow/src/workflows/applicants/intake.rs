use chrono::{Datelike, NaiveDate};

use super::domain::ProfileSubmission;
use crate::workflows::catalog::{Destination, DestinationCatalog, DestinationId};
use crate::workflows::pricing::{FeeScheduleError, PlanTier};

/// Validation errors raised before a profile is materialized.
#[derive(Debug, thiserror::Error)]
pub enum IntakeViolation {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("email address '{0}' is not valid")]
    InvalidEmail(String),
    #[error("destination {0} is not in the catalog")]
    UnknownDestination(DestinationId),
    #[error("{destination} does not offer the {} plan", .plan.label())]
    InstallmentsNotOffered { destination: String, plan: PlanTier },
    #[error("destination fee schedule is invalid: {0}")]
    InvalidFees(#[from] FeeScheduleError),
    #[error("date of birth {date_of_birth} is after the application date {application_date}")]
    BirthAfterApplication {
        date_of_birth: NaiveDate,
        application_date: NaiveDate,
    },
}

/// Boundary checks for profile creation. The pricing engine trusts what passes here.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    pub fn validate<'a>(
        &self,
        submission: &ProfileSubmission,
        catalog: &'a DestinationCatalog,
    ) -> Result<&'a Destination, IntakeViolation> {
        if submission.name.trim().is_empty() {
            return Err(IntakeViolation::MissingField("name"));
        }
        if submission.surname.trim().is_empty() {
            return Err(IntakeViolation::MissingField("surname"));
        }

        let email = submission.contact.email.trim();
        if email.is_empty() {
            return Err(IntakeViolation::MissingField("email"));
        }
        if !looks_like_email(email) {
            return Err(IntakeViolation::InvalidEmail(email.to_string()));
        }

        if let Some(date_of_birth) = submission.date_of_birth {
            if date_of_birth > submission.application_date {
                return Err(IntakeViolation::BirthAfterApplication {
                    date_of_birth,
                    application_date: submission.application_date,
                });
            }
        }

        let destination = catalog
            .get(&submission.destination_id)
            .ok_or_else(|| IntakeViolation::UnknownDestination(submission.destination_id.clone()))?;

        destination.fees.validate()?;

        if submission.plan.is_split() && !destination.allow_installments {
            return Err(IntakeViolation::InstallmentsNotOffered {
                destination: destination.name.clone(),
                plan: submission.plan,
            });
        }

        Ok(destination)
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    }
}

/// Whole years between `date_of_birth` and `on`.
pub fn age_on(date_of_birth: NaiveDate, on: NaiveDate) -> u32 {
    if on <= date_of_birth {
        return 0;
    }

    let mut years = on.year() - date_of_birth.year();
    if (on.month(), on.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    years.max(0) as u32
}
