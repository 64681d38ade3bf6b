//! Pricing engine turning a destination fee schedule, a discount category, and a plan tier
//! into taxed quotes and dated installment schedules.
//!
//! Everything here is pure: the same inputs always produce the same quotes, so callers are free
//! to recompute on every form change instead of caching.

mod fees;
mod plan;
pub mod schedule;

pub use fees::{DiscountRates, FeeSchedule, FeeScheduleError};
pub use plan::{DiscountCategory, PlanTier, SplitSlice};
pub use schedule::{
    add_months, build_installments, build_installments_for, Installment, InstallmentStatus,
};

use serde::{Deserialize, Serialize};

pub const CURRENCY_SYMBOL: &str = "€";

/// Intermediate figures for one tier, kept at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanQuote {
    pub tier: PlanTier,
    pub discount_percent: f64,
    pub net_base: f64,
    pub plan_base: f64,
    pub taxed_total: f64,
    pub final_total: f64,
}

impl PlanQuote {
    pub fn new(schedule: &FeeSchedule, category: DiscountCategory, tier: PlanTier) -> Self {
        let net_base = schedule.net_base(category);
        let plan_base = net_base * tier.multiplier();
        let taxed_total = schedule.apply_vat(plan_base);

        Self {
            tier,
            discount_percent: schedule.discount_percent(category),
            net_base,
            plan_base,
            taxed_total,
            final_total: taxed_total + schedule.registration_fee,
        }
    }

    pub fn entry_payment(&self, registration_fee: f64) -> f64 {
        if self.tier.is_split() {
            registration_fee + self.slice_amount(self.tier.entry_fraction())
        } else {
            self.final_total
        }
    }

    pub fn slice_amount(&self, fraction: f64) -> f64 {
        self.taxed_total * fraction
    }
}

/// Label and fraction of one post-entry installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentSlice {
    pub label: String,
    pub fraction: f64,
}

/// Computed quote for one plan tier. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingOption {
    pub tier: PlanTier,
    pub name: String,
    pub total_contract_value: f64,
    pub entry_payment_amount: f64,
    pub per_installment_amount: f64,
    pub installment_count: usize,
    pub breakdown_text: String,
    pub is_popular: bool,
    pub structure: Vec<InstallmentSlice>,
}

/// Quote all four plan tiers, ordered full payment first.
pub fn compute_pricing_options(
    schedule: &FeeSchedule,
    category: DiscountCategory,
) -> [PricingOption; 4] {
    PlanTier::ALL.map(|tier| pricing_option(schedule, category, tier))
}

pub fn pricing_option(
    schedule: &FeeSchedule,
    category: DiscountCategory,
    tier: PlanTier,
) -> PricingOption {
    let quote = PlanQuote::new(schedule, category, tier);
    let post_entry = tier.post_entry_splits();

    let structure: Vec<InstallmentSlice> = post_entry
        .iter()
        .map(|slice| InstallmentSlice {
            label: slice.label.to_string(),
            fraction: slice.fraction,
        })
        .collect();

    let per_installment_amount = post_entry
        .first()
        .map(|slice| quote.slice_amount(slice.fraction))
        .unwrap_or(0.0);

    PricingOption {
        tier,
        name: tier.label().to_string(),
        total_contract_value: quote.final_total,
        entry_payment_amount: quote.entry_payment(schedule.registration_fee),
        per_installment_amount,
        installment_count: structure.len(),
        breakdown_text: breakdown_text(schedule, &quote),
        is_popular: tier == PlanTier::FullPayment,
        structure,
    }
}

fn breakdown_text(schedule: &FeeSchedule, quote: &PlanQuote) -> String {
    let tier = quote.tier;
    if !tier.is_split() {
        let plan_discount = percent_label(1.0 - tier.multiplier());
        return format!(
            "Includes {}% Profile Discount & {plan_discount}% Full Pay Discount. VAT included.",
            quote.discount_percent
        );
    }

    let splits = tier.splits();
    let entry = &splits[0];
    let entry_slice = format!(
        "{} ({}%)",
        format_money(quote.slice_amount(entry.fraction)),
        percent_label(entry.fraction)
    );
    let registration = format_money(schedule.registration_fee);

    let rest: Vec<String> = splits[1..]
        .iter()
        .map(|slice| {
            format!(
                "{} ({}%)",
                format_money(quote.slice_amount(slice.fraction)),
                percent_label(slice.fraction)
            )
        })
        .collect();

    match rest.as_slice() {
        [only] => format!("Entry: {registration} (Reg) + {entry_slice}. Followed by 1 x {only}."),
        [second, last] => {
            format!("Entry: {registration} (Reg) + {entry_slice}. Then {second} and {last}.")
        }
        _ => format!(
            "Entry: {registration} + {entry_slice}. Then {}.",
            rest.join(", ")
        ),
    }
}

fn percent_label(fraction: f64) -> String {
    format!("{}", (fraction * 100.0).round())
}

/// Render an amount rounded to whole currency units with thousands separators.
pub fn format_money(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{CURRENCY_SYMBOL}{grouped}")
    } else {
        format!("{CURRENCY_SYMBOL}{grouped}")
    }
}
