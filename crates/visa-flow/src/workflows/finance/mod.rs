//! Invoice ledger: issuing invoices against applicants, verifying payments, and the revenue
//! totals shown on the finance board.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflows::applicants::{Applicant, ApplicantId};

const INVOICE_ID_PREFIX: &str = "inv_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Paid,
    Overdue,
    Verified,
}

impl TransactionStatus {
    pub const fn counts_as_revenue(self) -> bool {
        matches!(self, TransactionStatus::Paid | TransactionStatus::Verified)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Invoice,
    Receipt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub applicant_id: Option<ApplicantId>,
    pub applicant_name: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub reference: String,
}

/// Admin form for billing an applicant.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceRequest {
    pub applicant_id: ApplicantId,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// Finance board figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LedgerTotals {
    /// Paid and verified amounts.
    pub revenue: f64,
    pub pending: f64,
    /// Distinct applicants with at least one transaction.
    pub active_payers: usize,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FinanceError {
    #[error("invoice amount must be a positive number, got {0}")]
    InvalidAmount(f64),
    #[error("transaction {0} not found")]
    UnknownTransaction(String),
}

/// Transactions kept newest first.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Record a pending invoice at the head of the ledger.
    pub fn issue_invoice(
        &mut self,
        applicant: &Applicant,
        request: InvoiceRequest,
        issued: NaiveDate,
    ) -> Result<Transaction, FinanceError> {
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(FinanceError::InvalidAmount(request.amount));
        }

        let number = self.next_number();
        let invoice = Transaction {
            id: format!("{INVOICE_ID_PREFIX}{number:03}"),
            applicant_id: Some(applicant.id.clone()),
            applicant_name: applicant.full_name(),
            amount: request.amount,
            description: request
                .description
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
            kind: TransactionKind::Invoice,
            status: TransactionStatus::Pending,
            date: issued,
            due_date: request.due_date,
            reference: format!("REF-{number:04}"),
        };
        self.transactions.insert(0, invoice.clone());
        Ok(invoice)
    }

    pub fn verify_payment(&mut self, id: &str) -> Result<Transaction, FinanceError> {
        let transaction = self
            .transactions
            .iter_mut()
            .find(|tx| tx.id == id)
            .ok_or_else(|| FinanceError::UnknownTransaction(id.to_string()))?;
        transaction.status = TransactionStatus::Verified;
        Ok(transaction.clone())
    }

    pub fn totals(&self) -> LedgerTotals {
        let revenue = self
            .transactions
            .iter()
            .filter(|tx| tx.status.counts_as_revenue())
            .map(|tx| tx.amount)
            .sum();
        let pending = self
            .transactions
            .iter()
            .filter(|tx| tx.status == TransactionStatus::Pending)
            .map(|tx| tx.amount)
            .sum();
        let payers: BTreeSet<&ApplicantId> = self
            .transactions
            .iter()
            .filter_map(|tx| tx.applicant_id.as_ref())
            .collect();

        LedgerTotals {
            revenue,
            pending,
            active_payers: payers.len(),
        }
    }

    fn next_number(&self) -> u32 {
        self.transactions
            .iter()
            .filter_map(|tx| tx.id.strip_prefix(INVOICE_ID_PREFIX))
            .filter_map(|digits| digits.parse::<u32>().ok())
            .max()
            .map_or(1, |highest| highest + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn entry(
        id: &str,
        applicant: Option<&str>,
        amount: f64,
        status: TransactionStatus,
    ) -> Transaction {
        Transaction {
            id: id.to_string(),
            applicant_id: applicant.map(|raw| ApplicantId(raw.to_string())),
            applicant_name: "Alex Mercer".to_string(),
            amount,
            description: None,
            kind: TransactionKind::Invoice,
            status,
            date: date(2024, 2, 10),
            due_date: None,
            reference: format!("REF-{id}"),
        }
    }

    fn board() -> Ledger {
        Ledger::new(vec![
            entry("inv_003", Some("BCA-100"), 5250.0, TransactionStatus::Pending),
            entry("inv_002", Some("BCA-101"), 3650.0, TransactionStatus::Verified),
            entry("inv_001", Some("BCA-100"), 250.0, TransactionStatus::Paid),
            entry("inv_000", None, 80.0, TransactionStatus::Overdue),
        ])
    }

    #[test]
    fn totals_split_revenue_from_pending() {
        let totals = board().totals();
        assert_eq!(totals.revenue, 3900.0);
        assert_eq!(totals.pending, 5250.0);
        assert_eq!(totals.active_payers, 2);
    }

    #[test]
    fn verifying_moves_amount_into_revenue() {
        let mut ledger = board();
        let verified = ledger.verify_payment("inv_003").expect("verified");
        assert_eq!(verified.status, TransactionStatus::Verified);

        let totals = ledger.totals();
        assert_eq!(totals.revenue, 9150.0);
        assert_eq!(totals.pending, 0.0);
        assert_eq!(
            ledger.verify_payment("inv_404"),
            Err(FinanceError::UnknownTransaction("inv_404".to_string()))
        );
    }

    #[test]
    fn transactions_serialize_kind_as_type() {
        let paid = entry("inv_001", Some("BCA-100"), 250.0, TransactionStatus::Paid);
        let json = serde_json::to_value(paid).expect("serialize");
        assert_eq!(json["type"], "invoice");
        assert_eq!(json["status"], "paid");
        assert!(json.get("due_date").is_none());
    }
}
