use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{format_money, pricing_option, DiscountCategory, FeeSchedule, PlanQuote, PlanTier};

pub const ENTRY_PAYMENT_LABEL: &str = "Entry Payment";

/// Lifecycle of a single payment obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
}

impl InstallmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            InstallmentStatus::Pending => "pending",
            InstallmentStatus::Paid => "paid",
            InstallmentStatus::Overdue => "overdue",
        }
    }
}

/// Dated payment obligation. `amount` keeps full precision; round only for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub label: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: InstallmentStatus,
}

impl Installment {
    pub fn display_amount(&self) -> String {
        format_money(self.amount)
    }
}

/// Materialize the dated schedule for one tier.
///
/// The entry payment is due on `application_date`; the n-th post-entry installment is due
/// `n` calendar months later.
pub fn build_installments(
    schedule: &FeeSchedule,
    category: DiscountCategory,
    tier: PlanTier,
    application_date: NaiveDate,
) -> Vec<Installment> {
    let option = pricing_option(schedule, category, tier);
    let quote = PlanQuote::new(schedule, category, tier);

    let mut installments = Vec::with_capacity(option.installment_count + 1);
    installments.push(Installment {
        label: ENTRY_PAYMENT_LABEL.to_string(),
        amount: option.entry_payment_amount,
        due_date: application_date,
        status: InstallmentStatus::Pending,
    });

    for (index, slice) in option.structure.iter().enumerate() {
        installments.push(Installment {
            label: slice.label.clone(),
            amount: quote.slice_amount(slice.fraction),
            due_date: add_months(application_date, index as u32 + 1),
            status: InstallmentStatus::Pending,
        });
    }

    installments
}

/// Preview variant used while a form is still incomplete: a missing destination or plan
/// yields an empty schedule rather than an error.
pub fn build_installments_for(
    schedule: Option<&FeeSchedule>,
    category: DiscountCategory,
    tier: Option<PlanTier>,
    application_date: NaiveDate,
) -> Vec<Installment> {
    match (schedule, tier) {
        (Some(schedule), Some(tier)) => {
            build_installments(schedule, category, tier, application_date)
        }
        _ => Vec::new(),
    }
}

/// Calendar month addition keeping the day of month, clamped to the month's last day.
/// Saturates at `NaiveDate::MAX` when the result leaves chrono's date range.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::pricing::DiscountRates;

    fn serbia() -> FeeSchedule {
        FeeSchedule {
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
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn three_part_schedule_is_monthly() {
        let installments = build_installments(
            &serbia(),
            DiscountCategory::Standard,
            PlanTier::ThreePart,
            date(2024, 1, 15),
        );

        let due: Vec<NaiveDate> = installments.iter().map(|inst| inst.due_date).collect();
        assert_eq!(
            due,
            vec![date(2024, 1, 15), date(2024, 2, 15), date(2024, 3, 15)]
        );
        assert_eq!(installments[0].label, ENTRY_PAYMENT_LABEL);
        assert_eq!(installments[1].label, "2nd Installment (40%)");
        assert!((installments[0].amount - 1599.0).abs() < 1e-9);
        assert!((installments[1].amount - 1932.0).abs() < 1e-9);
        assert!((installments[2].amount - 1449.0).abs() < 1e-9);
        assert!(installments
            .iter()
            .all(|inst| inst.status == InstallmentStatus::Pending));
    }

    #[test]
    fn full_payment_yields_single_entry() {
        let installments = build_installments(
            &serbia(),
            DiscountCategory::Skilled,
            PlanTier::FullPayment,
            date(2024, 2, 1),
        );
        assert_eq!(installments.len(), 1);
        let expected = 3500.0 * 0.95 * 0.90 * 1.20 + 150.0;
        assert!((installments[0].amount - expected).abs() < 1e-9);
    }

    #[test]
    fn month_end_dates_are_clamped() {
        assert_eq!(add_months(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(add_months(date(2023, 1, 31), 1), date(2023, 2, 28));
        assert_eq!(add_months(date(2024, 1, 31), 3), date(2024, 4, 30));
        assert_eq!(add_months(date(2024, 11, 30), 2), date(2025, 1, 30));
    }

    #[test]
    fn month_addition_saturates_at_calendar_end() {
        assert_eq!(add_months(NaiveDate::MAX, 1), NaiveDate::MAX);
    }

    #[test]
    fn four_part_from_month_end_keeps_clamping_per_installment() {
        let installments = build_installments(
            &serbia(),
            DiscountCategory::Group,
            PlanTier::FourPart,
            date(2024, 1, 31),
        );
        let due: Vec<NaiveDate> = installments.iter().map(|inst| inst.due_date).collect();
        assert_eq!(
            due,
            vec![
                date(2024, 1, 31),
                date(2024, 2, 29),
                date(2024, 3, 31),
                date(2024, 4, 30)
            ]
        );
    }

    #[test]
    fn missing_inputs_produce_empty_schedule() {
        let fees = serbia();
        let day = date(2024, 1, 15);
        let category = DiscountCategory::Standard;

        let no_destination =
            build_installments_for(None, category, Some(PlanTier::TwoPart), day);
        assert!(no_destination.is_empty());

        let no_plan = build_installments_for(Some(&fees), category, None, day);
        assert!(no_plan.is_empty());

        let complete = build_installments_for(Some(&fees), category, Some(PlanTier::TwoPart), day);
        assert_eq!(complete.len(), 2);
    }
}
