//! Destination (country) catalog: fee schedules, visa timelines, and document checklists.

mod import;

pub use import::CatalogImportError;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::workflows::pricing::{
    compute_pricing_options, DiscountCategory, DiscountRates, FeeSchedule, PricingOption,
};

pub const STANDARD_TIMELINE_STEPS: [&str; 12] = [
    "Registration",
    "Document Verification",
    "Interview",
    "Work Permit Application",
    "PCC Verification",
    "Work Permit Approval",
    "Apply VFS/Embassy Appointment",
    "Visa Documents Submission",
    "Visa Approval",
    "Travel Arrangement",
    "Post Arrival",
    "TRC/Card",
];

/// Identifier wrapper for catalog destinations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DestinationId(pub String);

impl DestinationId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A destination country offered to applicants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    pub name: String,
    pub visa_type: String,
    pub fees: FeeSchedule,
    pub allow_installments: bool,
    #[serde(default)]
    pub custom_discount_name: String,
    pub timeline: Vec<String>,
    pub docs_app_stage: Vec<String>,
    pub docs_embassy_stage: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDirection {
    Up,
    Down,
}

impl Destination {
    /// Template used when an administrator adds a destination from scratch.
    pub fn template(id: DestinationId) -> Self {
        Self {
            id,
            name: "New Destination".to_string(),
            visa_type: "Standard Visa".to_string(),
            fees: FeeSchedule {
                base_price: 4000.0,
                registration_fee: 200.0,
                vat_percent: 20.0,
                discounts: DiscountRates {
                    full: 10.0,
                    couple: 5.0,
                    reference: 5.0,
                    group: 10.0,
                    skilled: 5.0,
                    custom: 0.0,
                },
            },
            allow_installments: true,
            custom_discount_name: "Seasonal".to_string(),
            timeline: strings(&["Registration", "Document Verification", "Visa Approval"]),
            docs_app_stage: strings(&["Passport Scan"]),
            docs_embassy_stage: strings(&["Bank Statement"]),
        }
    }

    /// Application-stage documents followed by embassy-stage documents.
    pub fn required_documents(&self) -> impl Iterator<Item = &str> {
        self.docs_app_stage
            .iter()
            .chain(self.docs_embassy_stage.iter())
            .map(String::as_str)
    }

    /// Timeline shown to the applicant, falling back to the standard steps when unset.
    pub fn timeline_steps(&self) -> Vec<String> {
        if self.timeline.is_empty() {
            strings(&STANDARD_TIMELINE_STEPS)
        } else {
            self.timeline.clone()
        }
    }

    /// Quotes offered to applicants; only full payment when installments are disabled.
    pub fn available_options(&self, category: DiscountCategory) -> Vec<PricingOption> {
        compute_pricing_options(&self.fees, category)
            .into_iter()
            .filter(|option| self.allow_installments || !option.tier.is_split())
            .collect()
    }

    pub fn move_step(&mut self, index: usize, direction: StepDirection) {
        match direction {
            StepDirection::Up if index > 0 && index < self.timeline.len() => {
                self.timeline.swap(index, index - 1);
            }
            StepDirection::Down if index + 1 < self.timeline.len() => {
                self.timeline.swap(index, index + 1);
            }
            _ => {}
        }
    }

    pub fn remove_step(&mut self, step: &str) {
        self.timeline.retain(|existing| existing != step);
    }

    /// Append a step; blank names and duplicates are ignored.
    pub fn add_step(&mut self, step: &str) -> bool {
        let step = step.trim();
        if step.is_empty() || self.timeline.iter().any(|existing| existing == step) {
            return false;
        }
        self.timeline.push(step.to_string());
        true
    }
}

/// Ordered in-memory destination catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationCatalog {
    destinations: Vec<Destination>,
}

impl DestinationCatalog {
    pub fn new(destinations: Vec<Destination>) -> Self {
        Self { destinations }
    }

    /// Catalog seeded with the default Sweden, Finland, and Serbia destinations.
    pub fn standard() -> Self {
        Self::new(vec![sweden(), finland(), serbia()])
    }

    pub fn all(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn get(&self, id: &DestinationId) -> Option<&Destination> {
        self.destinations.iter().find(|destination| &destination.id == id)
    }

    pub fn get_mut(&mut self, id: &DestinationId) -> Option<&mut Destination> {
        self.destinations
            .iter_mut()
            .find(|destination| &destination.id == id)
    }

    /// Replace the destination with the same id, or append it.
    pub fn upsert(&mut self, destination: Destination) {
        match self.get_mut(&destination.id) {
            Some(existing) => *existing = destination,
            None => self.destinations.push(destination),
        }
    }

    pub fn add_template(&mut self, id: DestinationId) -> Destination {
        let destination = Destination::template(id);
        self.upsert(destination.clone());
        destination
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn sweden() -> Destination {
    Destination {
        id: DestinationId::new("c1"),
        name: "Sweden".to_string(),
        visa_type: "Work Permit (Type D)".to_string(),
        fees: FeeSchedule {
            base_price: 5250.0,
            registration_fee: 250.0,
            vat_percent: 25.0,
            discounts: DiscountRates {
                full: 10.0,
                couple: 5.0,
                reference: 5.0,
                group: 10.0,
                skilled: 5.0,
                custom: 15.0,
            },
        },
        allow_installments: true,
        custom_discount_name: "Seasonal Promo".to_string(),
        timeline: strings(&[
            "Registration",
            "Document Verification",
            "Work Permit Application",
            "Work Permit Approval",
            "Visa Documents Submission",
            "Visa Approval",
            "Travel Arrangement",
        ]),
        docs_app_stage: strings(&["Passport Scan", "CV (Europass)"]),
        docs_embassy_stage: strings(&["Employment Contract", "Union Statement", "Biometrics"]),
    }
}

fn finland() -> Destination {
    Destination {
        id: DestinationId::new("c2"),
        name: "Finland".to_string(),
        visa_type: "Specialist Residence Permit".to_string(),
        fees: FeeSchedule {
            base_price: 4800.0,
            registration_fee: 200.0,
            vat_percent: 24.0,
            discounts: DiscountRates {
                full: 10.0,
                couple: 5.0,
                reference: 5.0,
                group: 10.0,
                skilled: 5.0,
                custom: 0.0,
            },
        },
        allow_installments: true,
        custom_discount_name: String::new(),
        timeline: strings(&[
            "Registration",
            "Document Verification",
            "Interview",
            "Work Permit Application",
            "Visa Approval",
            "Post Arrival",
            "TRC/Card",
        ]),
        docs_app_stage: strings(&["Passport Scan", "Degree Certificate"]),
        docs_embassy_stage: strings(&["Income Statement", "Tax Card"]),
    }
}

fn serbia() -> Destination {
    Destination {
        id: DestinationId::new("c3"),
        name: "Serbia".to_string(),
        visa_type: "Temporary Residence".to_string(),
        fees: FeeSchedule {
            base_price: 3500.0,
            registration_fee: 150.0,
            vat_percent: 20.0,
            discounts: DiscountRates {
                full: 10.0,
                couple: 5.0,
                reference: 5.0,
                group: 10.0,
                skilled: 5.0,
                custom: 0.0,
            },
        },
        allow_installments: false,
        custom_discount_name: String::new(),
        timeline: strings(&[
            "Registration",
            "Document Verification",
            "PCC Verification",
            "Visa Documents Submission",
            "Visa Approval",
            "TRC/Card",
        ]),
        docs_app_stage: strings(&["Passport Scan", "White Card (Police)"]),
        docs_embassy_stage: strings(&["Health Insurance", "Lease Agreement", "Bank Statement"]),
    }
}
