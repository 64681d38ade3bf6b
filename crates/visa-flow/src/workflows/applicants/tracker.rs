//! Task-tracker payloads mirrored from profiles, staff, and destinations.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::domain::Applicant;
use super::staff::{StaffMember, StaffRole};
use crate::workflows::catalog::Destination;

/// Number of installment amount/date pairs the tracker board carries.
pub const TRACKED_INSTALLMENTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerList {
    ProfileCreation,
    Visa,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TrackerValue {
    Text(String),
    Number(f64),
    /// Unix milliseconds.
    Timestamp(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerField {
    pub key: &'static str,
    pub value: TrackerValue,
}

impl TrackerField {
    fn text(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: TrackerValue::Text(value.into()),
        }
    }

    fn number(key: &'static str, value: f64) -> Self {
        Self {
            key,
            value: TrackerValue::Number(value),
        }
    }

    fn date(key: &'static str, value: NaiveDate) -> Self {
        Self {
            key,
            value: TrackerValue::Timestamp(unix_millis(value)),
        }
    }
}

/// Task pushed to one of the tracker lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerTask {
    pub list: TrackerList,
    pub name: String,
    pub description: String,
    pub custom_fields: Vec<TrackerField>,
}

impl TrackerTask {
    pub fn field(&self, key: &str) -> Option<&TrackerValue> {
        self.custom_fields
            .iter()
            .find(|field| field.key == key)
            .map(|field| &field.value)
    }
}

/// Outbound tracker integration.
pub trait TaskTracker: Send + Sync {
    fn push(&self, task: TrackerTask) -> Result<(), TrackerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("tracker unreachable: {0}")]
    Unreachable(String),
}

pub fn profile_task(applicant: &Applicant, destination: Option<&Destination>) -> TrackerTask {
    let mut fields = vec![
        TrackerField::text("customer_id", applicant.id.0.clone()),
        TrackerField::text("surname", applicant.surname.clone()),
        TrackerField::text("phone", applicant.contact.mobile.clone()),
        TrackerField::text(
            "alt_phone",
            applicant.contact.alternative_mobile.clone().unwrap_or_default(),
        ),
        TrackerField::text("email", applicant.contact.email.clone()),
        TrackerField::text("role", StaffRole::Customer.label()),
        TrackerField::text(
            "apply_country",
            destination.map(|d| d.name.clone()).unwrap_or_default(),
        ),
        TrackerField::text("visa_name", applicant.visa_name.clone()),
        TrackerField::text("nationality", applicant.passport.nationality.clone()),
        TrackerField::text("job_title", applicant.profession.clone()),
        TrackerField::date("application_date", applicant.application_date),
        TrackerField::number("cost", applicant.finance.base_price),
        TrackerField::number("reg_fee", applicant.finance.registration_fee),
        TrackerField::number(
            "vat",
            destination.map(|d| d.fees.vat_percent).unwrap_or(0.0),
        ),
        TrackerField::text("discount_name", applicant.discount.label()),
        TrackerField::number("grand_total", applicant.finance.total_amount),
    ];

    const AMOUNT_KEYS: [&str; TRACKED_INSTALLMENTS] =
        ["inst_1_amt", "inst_2_amt", "inst_3_amt", "inst_4_amt"];
    const DATE_KEYS: [&str; TRACKED_INSTALLMENTS] =
        ["inst_1_date", "inst_2_date", "inst_3_date", "inst_4_date"];

    for (index, installment) in applicant
        .installments
        .iter()
        .take(TRACKED_INSTALLMENTS)
        .enumerate()
    {
        fields.push(TrackerField::number(AMOUNT_KEYS[index], installment.amount));
        fields.push(TrackerField::date(DATE_KEYS[index], installment.due_date));
    }

    TrackerTask {
        list: TrackerList::ProfileCreation,
        name: applicant.name.clone(),
        description: format!(
            "New Applicant Profile created via Admin Panel.\nPlan: {}",
            applicant.plan.label()
        ),
        custom_fields: fields,
    }
}

pub fn user_task(member: &StaffMember) -> TrackerTask {
    TrackerTask {
        list: TrackerList::User,
        name: member.name.clone(),
        description: format!("Staff Member - Status: {}", member.status.label()),
        custom_fields: vec![
            TrackerField::text("customer_id", member.id.clone()),
            TrackerField::text("email", member.email.clone()),
            TrackerField::text("role", member.role.label()),
            TrackerField::text("designation", member.designation.clone()),
        ],
    }
}

pub fn destination_task(destination: &Destination) -> TrackerTask {
    TrackerTask {
        list: TrackerList::Visa,
        name: destination.name.clone(),
        description: format!(
            "Visa Configuration for {}. VAT: {}%",
            destination.name, destination.fees.vat_percent
        ),
        custom_fields: vec![
            TrackerField::text("visa_code", destination.id.0.clone()),
            TrackerField::text("visa_name", destination.visa_type.clone()),
            TrackerField::number("cost", destination.fees.base_price),
            TrackerField::number("reg_fee", destination.fees.registration_fee),
        ],
    }
}

fn unix_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}
