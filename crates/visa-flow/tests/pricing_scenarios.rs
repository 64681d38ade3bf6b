use chrono::NaiveDate;
use visa_flow::workflows::catalog::{DestinationCatalog, DestinationId};
use visa_flow::workflows::pricing::{
    build_installments, compute_pricing_options, DiscountCategory, DiscountRates, FeeSchedule,
    PlanQuote, PlanTier,
};

const TOLERANCE: f64 = 1e-9;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn schedule(base_price: f64, registration_fee: f64, vat_percent: f64) -> FeeSchedule {
    FeeSchedule {
        base_price,
        registration_fee,
        vat_percent,
        discounts: DiscountRates {
            full: 10.0,
            couple: 5.0,
            reference: 7.5,
            group: 10.0,
            skilled: 5.0,
            custom: 15.0,
        },
    }
}

fn sample_schedules() -> Vec<FeeSchedule> {
    vec![
        schedule(5250.0, 250.0, 25.0),
        schedule(3500.0, 150.0, 20.0),
        schedule(4800.0, 200.0, 24.0),
        schedule(0.0, 99.0, 0.0),
        schedule(12_999.99, 0.0, 17.5),
    ]
}

#[test]
fn sweden_full_payment_scenario() {
    let catalog = DestinationCatalog::standard();
    let sweden = catalog.get(&DestinationId::new("c1")).expect("sweden seeded");

    let options = compute_pricing_options(&sweden.fees, DiscountCategory::Standard);
    let full = &options[0];
    assert_eq!(full.tier, PlanTier::FullPayment);
    assert!((full.total_contract_value - 6156.25).abs() < TOLERANCE);
    assert!((full.entry_payment_amount - 6156.25).abs() < TOLERANCE);
    assert_eq!(full.installment_count, 0);
    assert!(full.structure.is_empty());

    let installments = build_installments(
        &sweden.fees,
        DiscountCategory::Standard,
        PlanTier::FullPayment,
        date(2024, 1, 15),
    );
    assert_eq!(installments.len(), 1);
    assert!((installments[0].amount - 6156.25).abs() < TOLERANCE);
}

#[test]
fn serbia_three_part_scenario() {
    let catalog = DestinationCatalog::standard();
    let serbia = catalog.get(&DestinationId::new("c3")).expect("serbia seeded");

    let quote = PlanQuote::new(&serbia.fees, DiscountCategory::Standard, PlanTier::ThreePart);
    assert!((quote.net_base - 3500.0).abs() < TOLERANCE);
    assert!((quote.plan_base - 4025.0).abs() < TOLERANCE);
    assert!((quote.taxed_total - 4830.0).abs() < TOLERANCE);
    assert!((quote.final_total - 4980.0).abs() < TOLERANCE);

    let installments = build_installments(
        &serbia.fees,
        DiscountCategory::Standard,
        PlanTier::ThreePart,
        date(2024, 1, 15),
    );
    let amounts: Vec<f64> = installments.iter().map(|inst| inst.amount).collect();
    let expected = [1599.0, 1932.0, 1449.0];
    for (actual, expected) in amounts.iter().zip(expected) {
        assert!((actual - expected).abs() < TOLERANCE, "{actual} != {expected}");
    }
    let due: Vec<NaiveDate> = installments.iter().map(|inst| inst.due_date).collect();
    assert_eq!(due, vec![date(2024, 1, 15), date(2024, 2, 15), date(2024, 3, 15)]);
}

#[test]
fn standard_category_leaves_base_untouched() {
    for fees in sample_schedules() {
        let quote = PlanQuote::new(&fees, DiscountCategory::Standard, PlanTier::TwoPart);
        assert!((quote.net_base - fees.base_price).abs() < TOLERANCE);
        assert_eq!(quote.discount_percent, 0.0);
    }
}

#[test]
fn totals_increase_with_plan_length() {
    for fees in sample_schedules() {
        for category in DiscountCategory::ALL {
            let options = compute_pricing_options(&fees, category);
            for pair in options.windows(2) {
                assert!(
                    pair[0].total_contract_value <= pair[1].total_contract_value,
                    "{} should not cost more than {}",
                    pair[0].name,
                    pair[1].name
                );
            }
        }
    }
}

#[test]
fn split_fractions_sum_to_one() {
    for tier in PlanTier::ALL {
        let total: f64 = tier.entry_fraction()
            + tier
                .post_entry_splits()
                .iter()
                .map(|slice| slice.fraction)
                .sum::<f64>();
        assert!((total - 1.0).abs() < TOLERANCE, "{tier:?} sums to {total}");
    }
}

#[test]
fn entry_installment_matches_quote() {
    let day = date(2024, 5, 31);
    for fees in sample_schedules() {
        for category in DiscountCategory::ALL {
            for tier in PlanTier::ALL {
                let quote = PlanQuote::new(&fees, category, tier);
                let installments = build_installments(&fees, category, tier, day);

                let expected_entry = if tier.is_split() {
                    fees.registration_fee + quote.taxed_total * tier.entry_fraction()
                } else {
                    quote.final_total
                };
                assert!((installments[0].amount - expected_entry).abs() < 1e-6);

                let sum: f64 = installments.iter().map(|inst| inst.amount).sum();
                assert!((sum - quote.final_total).abs() < 1e-6);
                assert_eq!(installments.len(), tier.splits().len());
            }
        }
    }
}

#[test]
fn pricing_is_repeatable() {
    for fees in sample_schedules() {
        for category in DiscountCategory::ALL {
            assert_eq!(
                compute_pricing_options(&fees, category),
                compute_pricing_options(&fees, category)
            );
        }
    }
}

#[test]
fn registration_fee_is_never_taxed() {
    let mut fees = schedule(0.0, 250.0, 25.0);
    fees.discounts = DiscountRates::default();
    for option in compute_pricing_options(&fees, DiscountCategory::Standard) {
        assert!((option.total_contract_value - 250.0).abs() < TOLERANCE);
        assert!((option.entry_payment_amount - 250.0).abs() < TOLERANCE);
    }
}
