#![cfg(feature = "loan")]

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use webtools_core::loan::amortization::{self, AmortizationInput};
use webtools_core::loan::annuity;
use webtools_core::loan::rate_solver::{self, RateSolverInput};
use webtools_core::parse::{parse_count, parse_decimal};
use webtools_core::{ErrorKind, WebToolsError};

// ===========================================================================
// Known answers
// ===========================================================================

#[test]
fn test_car_loan_known_answer() {
    // 25k over 5 years at 4.5%: 466.08/month
    let out = amortization::build_schedule(&AmortizationInput {
        principal: dec!(25000),
        annual_rate_percent: dec!(4.5),
        term_years: 5,
    })
    .unwrap();
    let s = out.result;
    assert_eq!(s.rows.len(), 60);
    assert_eq!(s.monthly_payment.round_dp(2), dec!(466.08));
    assert_eq!(s.rows[59].remaining_balance, Decimal::ZERO);
    assert!(out.warnings.is_empty());
}

#[test]
fn test_solver_then_schedule_round_trip() {
    let payment = dec!(1500);
    let solved = rate_solver::solve_rate(&RateSolverInput {
        principal: dec!(250000),
        monthly_payment: payment,
        term_years: 30,
    })
    .unwrap()
    .result;

    let schedule = amortization::build_schedule(&AmortizationInput {
        principal: dec!(250000),
        annual_rate_percent: solved.annual_rate_percent,
        term_years: 30,
    })
    .unwrap()
    .result;

    assert!(
        (schedule.monthly_payment - payment).abs() < dec!(0.01),
        "schedule payment {} vs requested {}",
        schedule.monthly_payment,
        payment
    );
}

#[test]
fn test_form_text_flows_through_parsers() {
    // Text fields as typed into the repayment form
    let principal = parse_decimal("loan_amount", "180000").unwrap();
    let rate = parse_decimal("interest_rate", "5.25").unwrap();
    let years = parse_count("loan_term", "15").unwrap();

    let s = amortization::build_schedule(&AmortizationInput {
        principal,
        annual_rate_percent: rate,
        term_years: years,
    })
    .unwrap()
    .result;
    assert_eq!(s.rows.len(), 180);

    let err = parse_decimal("interest_rate", "five").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_boundaries_are_errors_not_nan() {
    let zero_term = amortization::build_schedule(&AmortizationInput {
        principal: dec!(1000),
        annual_rate_percent: dec!(5),
        term_years: 0,
    });
    assert!(matches!(zero_term, Err(WebToolsError::InvalidInput { .. })));

    let zero_principal = rate_solver::solve_rate(&RateSolverInput {
        principal: Decimal::ZERO,
        monthly_payment: dec!(100),
        term_years: 10,
    });
    assert!(matches!(zero_principal, Err(WebToolsError::InvalidInput { .. })));
}

// ===========================================================================
// Properties over valid inputs
// ===========================================================================

fn principal() -> impl Strategy<Value = Decimal> {
    (1_000i64..=1_000_000).prop_map(Decimal::from)
}

/// Everyday APRs (0.01% to 20%) and extreme ones up to 15000%, where the
/// monthly rate passes 10, in basis-point steps.
fn annual_rate() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        (1i64..=2_000).prop_map(|bp| Decimal::new(bp, 2)),
        (2_001i64..=1_500_000).prop_map(|bp| Decimal::new(bp, 2)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_schedule_length_and_final_balance(
        principal in principal(),
        rate in annual_rate(),
        years in 1u32..=40,
    ) {
        let s = amortization::build_schedule(&AmortizationInput {
            principal,
            annual_rate_percent: rate,
            term_years: years,
        })
        .unwrap()
        .result;

        prop_assert_eq!(s.rows.len(), (years * 12) as usize);
        let last = s.rows.last().unwrap();
        prop_assert!(last.remaining_balance.abs() < dec!(0.01));

        let repaid: Decimal = s.rows.iter().map(|r| r.principal_portion).sum();
        prop_assert!((repaid - principal).abs() < dec!(0.01));

        for pair in s.rows.windows(2) {
            prop_assert!(pair[1].remaining_balance <= pair[0].remaining_balance);
        }
    }

    #[test]
    fn prop_solved_rate_reproduces_payment(
        principal in principal(),
        rate in annual_rate(),
        years in 1u32..=40,
    ) {
        let n = years * 12;
        let payment = annuity::level_payment(principal, rate / dec!(1200), n)
            .unwrap()
            .round_dp(2);
        prop_assume!(payment > principal / Decimal::from(n));

        let solved = rate_solver::solve_rate(&RateSolverInput {
            principal,
            monthly_payment: payment,
            term_years: years,
        })
        .unwrap()
        .result;

        let reproduced = annuity::level_payment(principal, solved.monthly_rate, n).unwrap();
        prop_assert!(
            (reproduced - payment).abs() < dec!(0.01),
            "reproduced {} vs payment {}", reproduced, payment
        );
    }
}
