use super::common::*;
use crate::workflows::applicants::intake::{IntakeGuard, IntakeViolation};
use crate::workflows::catalog::{DestinationCatalog, DestinationId};
use crate::workflows::pricing::{FeeScheduleError, PlanTier};

#[test]
fn accepts_complete_submission() {
    let catalog = DestinationCatalog::standard();
    let destination = IntakeGuard
        .validate(&submission(), &catalog)
        .expect("valid submission");
    assert_eq!(destination.name, "Sweden");
}

#[test]
fn rejects_blank_identity_fields() {
    let catalog = DestinationCatalog::standard();

    let mut blank_name = submission();
    blank_name.name = "  ".to_string();
    assert!(matches!(
        IntakeGuard.validate(&blank_name, &catalog),
        Err(IntakeViolation::MissingField("name"))
    ));

    let mut blank_email = submission();
    blank_email.contact.email.clear();
    assert!(matches!(
        IntakeGuard.validate(&blank_email, &catalog),
        Err(IntakeViolation::MissingField("email"))
    ));

    let mut bad_email = submission();
    bad_email.contact.email = "alex.mercer".to_string();
    assert!(matches!(
        IntakeGuard.validate(&bad_email, &catalog),
        Err(IntakeViolation::InvalidEmail(_))
    ));
}

#[test]
fn rejects_unknown_destination() {
    let catalog = DestinationCatalog::standard();
    let mut unknown = submission();
    unknown.destination_id = DestinationId::new("c404");

    match IntakeGuard.validate(&unknown, &catalog) {
        Err(IntakeViolation::UnknownDestination(id)) => assert_eq!(id.as_str(), "c404"),
        other => panic!("expected unknown destination, got {other:?}"),
    }
}

#[test]
fn split_plans_require_installment_support() {
    let catalog = DestinationCatalog::standard();

    match IntakeGuard.validate(&serbia_submission(PlanTier::TwoPart), &catalog) {
        Err(IntakeViolation::InstallmentsNotOffered { destination, plan }) => {
            assert_eq!(destination, "Serbia");
            assert_eq!(plan, PlanTier::TwoPart);
        }
        other => panic!("expected installments violation, got {other:?}"),
    }

    assert!(IntakeGuard
        .validate(&serbia_submission(PlanTier::FullPayment), &catalog)
        .is_ok());
}

#[test]
fn rejects_destination_with_invalid_fees() {
    let mut catalog = DestinationCatalog::standard();
    if let Some(sweden) = catalog.get_mut(&DestinationId::new("c1")) {
        sweden.fees.vat_percent = -5.0;
    }

    assert!(matches!(
        IntakeGuard.validate(&submission(), &catalog),
        Err(IntakeViolation::InvalidFees(FeeScheduleError::PercentOutOfRange { .. }))
    ));
}

#[test]
fn rejects_birth_after_application() {
    let catalog = DestinationCatalog::standard();
    let mut future = submission();
    future.date_of_birth = Some(date(2025, 1, 1));

    assert!(matches!(
        IntakeGuard.validate(&future, &catalog),
        Err(IntakeViolation::BirthAfterApplication { .. })
    ));
}
