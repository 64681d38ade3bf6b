use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::catalog::{Destination, DestinationId};
use crate::workflows::pricing::{
    DiscountCategory, FeeSchedule, Installment, InstallmentStatus, PlanTier,
};

/// Identifier wrapper for applicant profiles (e.g. `BCA-101`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicantId(pub String);

/// Review state of an applicant profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantStatus {
    #[default]
    PendingReview,
    Approved,
    ActionRequired,
}

impl ApplicantStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicantStatus::PendingReview => "pending_review",
            ApplicantStatus::Approved => "approved",
            ApplicantStatus::ActionRequired => "action_required",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocStatus {
    #[default]
    Missing,
    Scanning,
    AiVerified,
    Approved,
    Rejected,
}

impl DocStatus {
    /// Counts toward application-stage readiness.
    pub const fn is_cleared(self) -> bool {
        matches!(self, DocStatus::AiVerified | DocStatus::Approved)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub status: DocStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactDetails {
    pub email: String,
    pub mobile: String,
    #[serde(default)]
    pub alternative_mobile: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PassportDetails {
    pub number: String,
    #[serde(default)]
    pub expiry: Option<NaiveDate>,
    pub nationality: String,
}

/// Frozen financial snapshot captured when the profile is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceSnapshot {
    pub base_price: f64,
    pub discount_amount: f64,
    pub registration_fee: f64,
    pub entry_payment: f64,
    pub installment_amount: f64,
    pub installment_count: usize,
    pub total_amount: f64,
}

impl FinanceSnapshot {
    pub fn capture(
        fees: &FeeSchedule,
        category: DiscountCategory,
        installments: &[Installment],
    ) -> Self {
        Self {
            base_price: fees.base_price,
            discount_amount: fees.discount_amount(category),
            registration_fee: fees.registration_fee,
            entry_payment: installments.first().map(|inst| inst.amount).unwrap_or(0.0),
            installment_amount: installments.get(1).map(|inst| inst.amount).unwrap_or(0.0),
            installment_count: installments.len().saturating_sub(1),
            total_amount: installments.iter().map(|inst| inst.amount).sum(),
        }
    }
}

/// Profile creation form as submitted from the admin console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSubmission {
    pub name: String,
    pub surname: String,
    pub contact: ContactDetails,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    pub application_date: NaiveDate,
    pub passport: PassportDetails,
    #[serde(default)]
    pub profession: String,
    pub destination_id: DestinationId,
    #[serde(default)]
    pub visa_name: Option<String>,
    #[serde(default)]
    pub discount: DiscountCategory,
    pub plan: PlanTier,
}

/// Admin edits applied to an existing profile. Installments are never recomputed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileEdits {
    #[serde(default)]
    pub contact: Option<ContactDetails>,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub destination_id: Option<DestinationId>,
    #[serde(default)]
    pub visa_name: Option<String>,
    #[serde(default)]
    pub discount: Option<DiscountCategory>,
    #[serde(default)]
    pub plan: Option<PlanTier>,
}

/// Stored applicant record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub name: String,
    pub surname: String,
    pub contact: ContactDetails,
    pub date_of_birth: Option<NaiveDate>,
    pub age: u32,
    pub application_date: NaiveDate,
    pub passport: PassportDetails,
    pub profession: String,
    pub destination_id: DestinationId,
    pub visa_name: String,
    pub plan: PlanTier,
    pub discount: DiscountCategory,
    pub finance: FinanceSnapshot,
    pub installments: Vec<Installment>,
    pub status: ApplicantStatus,
    pub documents: BTreeMap<String, DocumentState>,
    /// 1-based position on the destination timeline.
    pub progress_step: u32,
}

impl Applicant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }

    /// Number of application-stage documents that are verified or approved.
    pub fn documents_ready(&self, destination: &Destination) -> usize {
        destination
            .docs_app_stage
            .iter()
            .filter(|doc| {
                self.documents
                    .get(doc.as_str())
                    .map(|state| state.status.is_cleared())
                    .unwrap_or(false)
            })
            .count()
    }

    pub fn status_view(&self) -> ApplicantStatusView {
        ApplicantStatusView {
            applicant_id: self.id.clone(),
            name: self.full_name(),
            status: self.status.label(),
            plan: self.plan.label(),
            progress_step: self.progress_step,
            total_amount: self.finance.total_amount,
            next_due: self
                .installments
                .iter()
                .find(|inst| inst.status != InstallmentStatus::Paid)
                .map(|inst| inst.due_date),
        }
    }
}

/// Public summary of an applicant returned by the HTTP layer.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicantStatusView {
    pub applicant_id: ApplicantId,
    pub name: String,
    pub status: &'static str,
    pub plan: &'static str,
    pub progress_step: u32,
    pub total_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
}

/// Portal notification fanned out to the applicant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_id: Option<ApplicantId>,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}
