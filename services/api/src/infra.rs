use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;
use visa_flow::config::AppConfig;
use visa_flow::error::AppError;
use visa_flow::workflows::applicants::{
    InMemoryApplicantRepository, InMemoryNotifications, RecordingTracker, VisaApplicationService,
};
use visa_flow::workflows::catalog::DestinationCatalog;
use visa_flow::workflows::pricing::{DiscountCategory, PlanTier};

pub(crate) type ApiService =
    VisaApplicationService<InMemoryApplicantRepository, InMemoryNotifications, RecordingTracker>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) notifications: Arc<InMemoryNotifications>,
}

/// In-memory adapters wired around a service instance.
pub(crate) struct Wiring {
    pub(crate) service: Arc<ApiService>,
    pub(crate) notifications: Arc<InMemoryNotifications>,
    pub(crate) tracker: Arc<RecordingTracker>,
}

pub(crate) fn load_catalog(config: &AppConfig) -> Result<DestinationCatalog, AppError> {
    match &config.catalog_path {
        Some(path) => {
            let catalog = DestinationCatalog::from_path(path)?;
            info!(path = %path.display(), destinations = catalog.len(), "destination catalog imported");
            Ok(catalog)
        }
        None => Ok(DestinationCatalog::standard()),
    }
}

pub(crate) fn wire_service(config: &AppConfig, catalog: DestinationCatalog) -> Wiring {
    let notifications = Arc::new(InMemoryNotifications::default());
    let tracker = Arc::new(RecordingTracker::default());
    let service = Arc::new(VisaApplicationService::with_settings(
        config.applicants.clone(),
        catalog,
        Arc::new(InMemoryApplicantRepository::default()),
        notifications.clone(),
        tracker.clone(),
    ));

    Wiring {
        service,
        notifications,
        tracker,
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_category(raw: &str) -> Result<DiscountCategory, String> {
    DiscountCategory::parse(raw).ok_or_else(|| {
        format!("unknown discount category '{raw}' (expected Standard, Couple, Reference, Group, Skilled or Custom)")
    })
}

pub(crate) fn parse_plan(raw: &str) -> Result<PlanTier, String> {
    PlanTier::from_label(raw).ok_or_else(|| {
        format!("unknown plan '{raw}' (expected full_payment, two_part, three_part or four_part)")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_values() {
        assert_eq!(
            parse_date("2024-01-15"),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date"))
        );
        assert!(parse_date("15/01/2024").is_err());
        assert_eq!(parse_category("couple"), Ok(DiscountCategory::Couple));
        assert!(parse_category("vip").is_err());
        assert_eq!(parse_plan("3-Part Split"), Ok(PlanTier::ThreePart));
        assert_eq!(parse_plan("four_part"), Ok(PlanTier::FourPart));
    }
}
