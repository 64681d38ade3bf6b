use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    Applicant, ApplicantId, ApplicantStatus, DocStatus, DocumentState, FinanceSnapshot,
    Notification, NotificationKind, ProfileEdits, ProfileSubmission,
};
use super::intake::{age_on, IntakeGuard, IntakeViolation};
use super::repository::{ApplicantRepository, NotificationPublisher, RepositoryError};
use super::settings::ApplicantSettings;
use super::staff::{NewStaff, StaffDirectory, StaffEdits, StaffError, StaffMember};
use super::tracker::{
    destination_task, profile_task, user_task, TaskTracker, TrackerList, TrackerTask,
};
use crate::workflows::catalog::{Destination, DestinationCatalog, DestinationId};
use crate::workflows::finance::{FinanceError, InvoiceRequest, Ledger, LedgerTotals, Transaction};
use crate::workflows::pricing::{
    build_installments, build_installments_for, DiscountCategory, FeeScheduleError, Installment,
    InstallmentStatus, PlanTier, PricingOption,
};

/// Service composing the destination catalog, intake guard, repository, staff directory,
/// invoice ledger, and outbound hooks.
pub struct VisaApplicationService<R, N, T> {
    guard: IntakeGuard,
    settings: ApplicantSettings,
    catalog: RwLock<DestinationCatalog>,
    staff: RwLock<StaffDirectory>,
    ledger: Mutex<Ledger>,
    repository: Arc<R>,
    notifications: Arc<N>,
    tracker: Arc<T>,
    // Serializes id allocation with the insert that claims it.
    creation: Mutex<()>,
}

static NOTIFICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_notification_id() -> u64 {
    NOTIFICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

/// Outcome of the outbound hooks (tracker pushes and notifications) behind one operation.
/// Failures never roll back local state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub synced: Vec<TrackerList>,
    pub failures: Vec<SyncFailure>,
    pub undelivered: Vec<UndeliveredNotification>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncFailure {
    pub list: TrackerList,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UndeliveredNotification {
    pub title: String,
    pub reason: String,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.undelivered.is_empty()
    }
}

/// Stored applicant plus what happened to the hooks fired for it.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicantOutcome {
    pub applicant: Applicant,
    pub sync: SyncReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffOutcome {
    pub member: StaffMember,
    pub sync: SyncReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentReadiness {
    pub ready: usize,
    pub required: usize,
}

impl<R, N, T> VisaApplicationService<R, N, T>
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
    T: TaskTracker + 'static,
{
    pub fn new(
        catalog: DestinationCatalog,
        repository: Arc<R>,
        notifications: Arc<N>,
        tracker: Arc<T>,
    ) -> Self {
        Self::with_settings(
            ApplicantSettings::default(),
            catalog,
            repository,
            notifications,
            tracker,
        )
    }

    pub fn with_settings(
        settings: ApplicantSettings,
        catalog: DestinationCatalog,
        repository: Arc<R>,
        notifications: Arc<N>,
        tracker: Arc<T>,
    ) -> Self {
        Self {
            guard: IntakeGuard,
            settings,
            catalog: RwLock::new(catalog),
            staff: RwLock::new(StaffDirectory::default()),
            ledger: Mutex::new(Ledger::default()),
            repository,
            notifications,
            tracker,
            creation: Mutex::new(()),
        }
    }

    pub fn catalog(&self) -> DestinationCatalog {
        self.catalog.read().expect("catalog lock poisoned").clone()
    }

    pub fn destination(&self, id: &DestinationId) -> Result<Destination, ApplicantServiceError> {
        self.catalog
            .read()
            .expect("catalog lock poisoned")
            .get(id)
            .cloned()
            .ok_or_else(|| ApplicantServiceError::DestinationNotFound(id.clone()))
    }

    /// Options offered for a destination; full payment only when installments are disabled.
    pub fn quote(
        &self,
        destination_id: &DestinationId,
        category: DiscountCategory,
    ) -> Result<Vec<PricingOption>, ApplicantServiceError> {
        let destination = self.destination(destination_id)?;
        Ok(destination.available_options(category))
    }

    /// Validate and store a destination, then mirror it to the tracker's visa list.
    pub fn save_destination(
        &self,
        destination: Destination,
    ) -> Result<SyncReport, ApplicantServiceError> {
        destination.fees.validate()?;

        let task = destination_task(&destination);
        info!(destination = %destination.id, "saving destination");
        self.catalog
            .write()
            .expect("catalog lock poisoned")
            .upsert(destination);

        let mut report = SyncReport::default();
        self.sync(task, &mut report);
        Ok(report)
    }

    pub fn add_destination_template(&self, id: DestinationId) -> Destination {
        self.catalog
            .write()
            .expect("catalog lock poisoned")
            .add_template(id)
    }

    /// Next free id: highest existing numeric suffix plus one.
    pub fn next_applicant_id(&self) -> Result<ApplicantId, ApplicantServiceError> {
        let highest = self
            .repository
            .list()?
            .iter()
            .filter_map(|applicant| self.settings.sequence_of(&applicant.id.0))
            .max();

        let number = match highest {
            Some(highest) => highest + 1,
            None => self.settings.first_number,
        };
        Ok(ApplicantId(self.settings.format_id(number)))
    }

    /// Live preview for an incomplete form. Missing inputs yield an empty schedule.
    pub fn preview_installments(
        &self,
        destination_id: Option<&DestinationId>,
        category: DiscountCategory,
        tier: Option<PlanTier>,
        application_date: NaiveDate,
    ) -> Vec<Installment> {
        let catalog = self.catalog.read().expect("catalog lock poisoned");
        let fees = destination_id
            .and_then(|id| catalog.get(id))
            .map(|destination| &destination.fees);
        build_installments_for(fees, category, tier, application_date)
    }

    pub fn create_profile(
        &self,
        submission: ProfileSubmission,
    ) -> Result<ApplicantOutcome, ApplicantServiceError> {
        let destination = {
            let catalog = self.catalog.read().expect("catalog lock poisoned");
            self.guard.validate(&submission, &catalog)?.clone()
        };

        let installments = build_installments(
            &destination.fees,
            submission.discount,
            submission.plan,
            submission.application_date,
        );
        let finance = FinanceSnapshot::capture(&destination.fees, submission.discount, &installments);

        let documents: BTreeMap<String, DocumentState> = destination
            .required_documents()
            .map(|doc| (doc.to_string(), DocumentState::default()))
            .collect();

        let age = submission
            .date_of_birth
            .map(|dob| age_on(dob, submission.application_date))
            .unwrap_or(0);

        let stored = {
            let _creation = self.creation.lock().expect("creation mutex poisoned");
            let id = self.next_applicant_id()?;
            let applicant = Applicant {
                id,
                name: submission.name.trim().to_string(),
                surname: submission.surname.trim().to_string(),
                contact: submission.contact,
                date_of_birth: submission.date_of_birth,
                age,
                application_date: submission.application_date,
                passport: submission.passport,
                profession: submission.profession,
                destination_id: destination.id.clone(),
                visa_name: submission
                    .visa_name
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| destination.visa_type.clone()),
                plan: submission.plan,
                discount: submission.discount,
                finance,
                installments,
                status: ApplicantStatus::PendingReview,
                documents,
                progress_step: 1,
            };
            self.repository.insert(applicant)?
        };

        info!(
            applicant = %stored.id.0,
            destination = %destination.id,
            plan = stored.plan.label(),
            total = stored.finance.total_amount,
            "applicant profile created"
        );

        let mut sync = SyncReport::default();
        self.notify(
            Some(&stored.id),
            "New Profile Created",
            format!("Applicant {} has been registered.", stored.name),
            NotificationKind::Info,
            &mut sync,
        );
        self.sync(profile_task(&stored, Some(&destination)), &mut sync);
        let account = StaffMember::customer_account(&stored, Utc::now().date_naive());
        self.sync(user_task(&account), &mut sync);

        Ok(ApplicantOutcome {
            applicant: stored,
            sync,
        })
    }

    /// Apply admin edits. Installments and the finance snapshot stay frozen.
    pub fn update_profile(
        &self,
        applicant_id: &ApplicantId,
        edits: ProfileEdits,
    ) -> Result<Applicant, ApplicantServiceError> {
        let mut applicant = self.fetch(applicant_id)?;

        if let Some(destination_id) = edits.destination_id {
            let destination = self.destination(&destination_id)?;
            for doc in destination.required_documents() {
                applicant.documents.entry(doc.to_string()).or_default();
            }
            applicant.destination_id = destination_id;
        }
        if let Some(contact) = edits.contact {
            applicant.contact = contact;
        }
        if let Some(profession) = edits.profession {
            applicant.profession = profession;
        }
        if let Some(visa_name) = edits.visa_name {
            applicant.visa_name = visa_name;
        }
        if let Some(discount) = edits.discount {
            applicant.discount = discount;
        }
        if let Some(plan) = edits.plan {
            applicant.plan = plan;
        }

        self.repository.update(applicant.clone())?;
        Ok(applicant)
    }

    /// Move the applicant to the timeline step at `step_index` (0-based).
    pub fn advance_progress(
        &self,
        applicant_id: &ApplicantId,
        step_index: usize,
    ) -> Result<Applicant, ApplicantServiceError> {
        let mut applicant = self.fetch(applicant_id)?;
        let steps = self.destination(&applicant.destination_id)?.timeline_steps().len();
        if step_index >= steps {
            return Err(ApplicantServiceError::StepOutOfRange {
                index: step_index,
                steps,
            });
        }

        let step = step_index + 1;
        applicant.progress_step = step as u32;
        applicant.status = if step >= steps {
            ApplicantStatus::Approved
        } else {
            ApplicantStatus::PendingReview
        };

        self.repository.update(applicant.clone())?;
        info!(applicant = %applicant.id.0, step, steps, "progress updated");
        Ok(applicant)
    }

    pub fn approve(
        &self,
        applicant_id: &ApplicantId,
    ) -> Result<ApplicantOutcome, ApplicantServiceError> {
        let mut applicant = self.fetch(applicant_id)?;
        for document in applicant.documents.values_mut() {
            document.status = DocStatus::Approved;
        }
        applicant.status = ApplicantStatus::Approved;

        self.repository.update(applicant.clone())?;
        info!(applicant = %applicant.id.0, "applicant approved");

        let mut sync = SyncReport::default();
        self.notify(
            Some(&applicant.id),
            "Application Approved",
            "Your documents have been approved by an admin. We are preparing for the Embassy."
                .to_string(),
            NotificationKind::Success,
            &mut sync,
        );
        Ok(ApplicantOutcome { applicant, sync })
    }

    /// Record an upload and mark the document as being scanned.
    pub fn begin_document_scan(
        &self,
        applicant_id: &ApplicantId,
        document: &str,
        file_name: &str,
        at: DateTime<Utc>,
    ) -> Result<Applicant, ApplicantServiceError> {
        let mut applicant = self.fetch(applicant_id)?;
        let state = applicant
            .documents
            .get_mut(document)
            .ok_or_else(|| ApplicantServiceError::UnknownDocument(document.to_string()))?;

        if !matches!(state.status, DocStatus::Missing | DocStatus::Rejected) {
            return Err(ApplicantServiceError::DocumentTransition {
                document: document.to_string(),
                from: state.status,
                to: DocStatus::Scanning,
            });
        }

        *state = DocumentState {
            file_name: Some(file_name.to_string()),
            status: DocStatus::Scanning,
            uploaded_at: Some(at),
        };

        self.repository.update(applicant.clone())?;
        Ok(applicant)
    }

    pub fn complete_document_scan(
        &self,
        applicant_id: &ApplicantId,
        document: &str,
    ) -> Result<ApplicantOutcome, ApplicantServiceError> {
        let mut applicant = self.fetch(applicant_id)?;
        let state = applicant
            .documents
            .get_mut(document)
            .ok_or_else(|| ApplicantServiceError::UnknownDocument(document.to_string()))?;

        if state.status != DocStatus::Scanning {
            return Err(ApplicantServiceError::DocumentTransition {
                document: document.to_string(),
                from: state.status,
                to: DocStatus::AiVerified,
            });
        }
        state.status = DocStatus::AiVerified;

        self.repository.update(applicant.clone())?;
        let mut sync = SyncReport::default();
        self.notify(
            Some(&applicant.id),
            &format!("AI Verified: {document}"),
            format!("Your {document} has been scanned and verified."),
            NotificationKind::Success,
            &mut sync,
        );
        Ok(ApplicantOutcome { applicant, sync })
    }

    pub fn set_installment_status(
        &self,
        applicant_id: &ApplicantId,
        index: usize,
        status: InstallmentStatus,
    ) -> Result<Applicant, ApplicantServiceError> {
        let mut applicant = self.fetch(applicant_id)?;
        let count = applicant.installments.len();
        let installment = applicant
            .installments
            .get_mut(index)
            .ok_or(ApplicantServiceError::InstallmentOutOfRange { index, count })?;
        installment.status = status;

        self.repository.update(applicant.clone())?;
        Ok(applicant)
    }

    pub fn document_readiness(
        &self,
        applicant_id: &ApplicantId,
    ) -> Result<DocumentReadiness, ApplicantServiceError> {
        let applicant = self.fetch(applicant_id)?;
        let destination = self.destination(&applicant.destination_id)?;
        Ok(DocumentReadiness {
            ready: applicant.documents_ready(&destination),
            required: destination.docs_app_stage.len(),
        })
    }

    pub fn get(&self, applicant_id: &ApplicantId) -> Result<Applicant, ApplicantServiceError> {
        self.fetch(applicant_id)
    }

    pub fn list(&self) -> Result<Vec<Applicant>, ApplicantServiceError> {
        Ok(self.repository.list()?)
    }

    /// Create a back-office account and mirror it to the tracker's user list.
    pub fn add_staff(&self, new: NewStaff) -> Result<StaffOutcome, ApplicantServiceError> {
        let member = self
            .staff
            .write()
            .expect("staff lock poisoned")
            .add(new, Utc::now().date_naive())?;
        info!(staff = %member.id, role = member.role.label(), "staff member added");

        let mut sync = SyncReport::default();
        self.sync(user_task(&member), &mut sync);
        Ok(StaffOutcome { member, sync })
    }

    pub fn update_staff(
        &self,
        staff_id: &str,
        edits: StaffEdits,
    ) -> Result<StaffMember, ApplicantServiceError> {
        let member = self
            .staff
            .write()
            .expect("staff lock poisoned")
            .update(staff_id, edits)?;
        info!(staff = %member.id, status = member.status.label(), "staff member updated");
        Ok(member)
    }

    pub fn staff(&self) -> Vec<StaffMember> {
        self.staff.read().expect("staff lock poisoned").all().to_vec()
    }

    /// Bill an existing applicant. The invoice starts out pending.
    pub fn create_invoice(
        &self,
        request: InvoiceRequest,
        issued: NaiveDate,
    ) -> Result<Transaction, ApplicantServiceError> {
        let applicant = self.fetch(&request.applicant_id)?;
        let invoice = self
            .ledger
            .lock()
            .expect("ledger mutex poisoned")
            .issue_invoice(&applicant, request, issued)?;
        info!(
            invoice = %invoice.id,
            applicant = %applicant.id.0,
            amount = invoice.amount,
            "invoice issued"
        );
        Ok(invoice)
    }

    pub fn verify_payment(
        &self,
        transaction_id: &str,
    ) -> Result<Transaction, ApplicantServiceError> {
        let transaction = self
            .ledger
            .lock()
            .expect("ledger mutex poisoned")
            .verify_payment(transaction_id)?;
        info!(transaction = %transaction.id, amount = transaction.amount, "payment verified");
        Ok(transaction)
    }

    /// Ledger entries, newest first.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.ledger.lock().expect("ledger mutex poisoned").all().to_vec()
    }

    pub fn ledger_totals(&self) -> LedgerTotals {
        self.ledger.lock().expect("ledger mutex poisoned").totals()
    }

    fn fetch(&self, applicant_id: &ApplicantId) -> Result<Applicant, ApplicantServiceError> {
        let applicant = self
            .repository
            .fetch(applicant_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(applicant)
    }

    fn notify(
        &self,
        applicant_id: Option<&ApplicantId>,
        title: &str,
        message: String,
        kind: NotificationKind,
        report: &mut SyncReport,
    ) {
        let published = self.notifications.publish(Notification {
            id: next_notification_id(),
            applicant_id: applicant_id.cloned(),
            title: title.to_string(),
            message,
            kind,
            timestamp: Utc::now(),
            read: false,
        });
        if let Err(error) = published {
            warn!(title, %error, "notification publish failed");
            report.undelivered.push(UndeliveredNotification {
                title: title.to_string(),
                reason: error.to_string(),
            });
        }
    }

    fn sync(&self, task: TrackerTask, report: &mut SyncReport) {
        let list = task.list;
        match self.tracker.push(task) {
            Ok(()) => report.synced.push(list),
            Err(error) => {
                warn!(?list, %error, "tracker sync failed");
                report.failures.push(SyncFailure {
                    list,
                    reason: error.to_string(),
                });
            }
        }
    }
}

/// Error raised by the applicant service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicantServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    InvalidFees(#[from] FeeScheduleError),
    #[error(transparent)]
    Staff(#[from] StaffError),
    #[error(transparent)]
    Finance(#[from] FinanceError),
    #[error("destination {0} not found")]
    DestinationNotFound(DestinationId),
    #[error("step {index} is outside a timeline of {steps} steps")]
    StepOutOfRange { index: usize, steps: usize },
    #[error("document '{0}' is not required for this applicant")]
    UnknownDocument(String),
    #[error("document '{document}' cannot move from {from:?} to {to:?}")]
    DocumentTransition {
        document: String,
        from: DocStatus,
        to: DocStatus,
    },
    #[error("installment {index} does not exist (schedule has {count})")]
    InstallmentOutOfRange { index: usize, count: usize },
}
