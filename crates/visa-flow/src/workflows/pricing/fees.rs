use serde::{Deserialize, Serialize};

use super::plan::DiscountCategory;

/// Discount percentages configured per destination, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DiscountRates {
    /// Shown in the admin console; no discount category resolves to it.
    pub full: f64,
    pub couple: f64,
    pub reference: f64,
    pub group: f64,
    pub skilled: f64,
    pub custom: f64,
}

/// Per-destination pricing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub base_price: f64,
    pub registration_fee: f64,
    pub vat_percent: f64,
    pub discounts: DiscountRates,
}

impl FeeSchedule {
    pub fn discount_percent(&self, category: DiscountCategory) -> f64 {
        match category {
            DiscountCategory::Standard => 0.0,
            DiscountCategory::Couple => self.discounts.couple,
            DiscountCategory::Reference => self.discounts.reference,
            DiscountCategory::Group => self.discounts.group,
            DiscountCategory::Skilled => self.discounts.skilled,
            DiscountCategory::Custom => self.discounts.custom,
        }
    }

    /// Base price after the profile discount, before plan multiplier and VAT.
    pub fn net_base(&self, category: DiscountCategory) -> f64 {
        self.base_price * (1.0 - self.discount_percent(category) / 100.0)
    }

    pub fn discount_amount(&self, category: DiscountCategory) -> f64 {
        self.base_price * self.discount_percent(category) / 100.0
    }

    pub fn apply_vat(&self, amount: f64) -> f64 {
        amount * (1.0 + self.vat_percent / 100.0)
    }

    /// Checks the schedule invariants. The pricing engine never calls this; intake
    /// boundaries do.
    pub fn validate(&self) -> Result<(), FeeScheduleError> {
        check_money("base_price", self.base_price)?;
        check_money("registration_fee", self.registration_fee)?;
        check_percent("vat_percent", self.vat_percent)?;

        let DiscountRates {
            full,
            couple,
            reference,
            group,
            skilled,
            custom,
        } = self.discounts;
        for (field, value) in [
            ("discount_full", full),
            ("discount_couple", couple),
            ("discount_reference", reference),
            ("discount_group", group),
            ("discount_skilled", skilled),
            ("discount_custom", custom),
        ] {
            check_percent(field, value)?;
        }

        Ok(())
    }
}

fn check_money(field: &'static str, value: f64) -> Result<(), FeeScheduleError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FeeScheduleError::NegativeAmount { field, value })
    }
}

fn check_percent(field: &'static str, value: f64) -> Result<(), FeeScheduleError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(FeeScheduleError::PercentOutOfRange { field, value })
    }
}

/// Fee schedule contract violations reported at intake boundaries.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeeScheduleError {
    #[error("{field} must be a non-negative amount (found {value})")]
    NegativeAmount { field: &'static str, value: f64 },
    #[error("{field} must be within 0-100 (found {value})")]
    PercentOutOfRange { field: &'static str, value: f64 },
}
