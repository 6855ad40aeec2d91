use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::WebToolsError;
use crate::loan::annuity::{level_payment, level_payment_slope, term_in_months};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::WebToolsResult;

const INITIAL_GUESS: Decimal = dec!(0.1);
const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_ITERATIONS: u32 = 100;

// Newton steps are kept inside (0, 1e6] monthly; a root beyond the cap
// pins the estimate to the bound and is reported as a failure
const MIN_MONTHLY_RATE: Decimal = dec!(0.000000000001);
const MAX_MONTHLY_RATE: Decimal = dec!(1000000);

// A converged rate must reproduce the payment to this relative error
const PAYMENT_TOLERANCE: Decimal = dec!(0.000001);

/// Input for solving the interest rate implied by a monthly payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSolverInput {
    /// Amount borrowed.
    pub principal: Money,
    /// Desired level monthly payment.
    pub monthly_payment: Money,
    /// Loan term in whole years.
    pub term_years: u32,
}

/// Solved interest rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSolverOutput {
    /// Periodic (monthly) rate as a decimal.
    pub monthly_rate: Rate,
    /// Annual percentage rate: monthly rate × 1200.
    pub annual_rate_percent: Decimal,
    /// Newton iterations used.
    pub iterations: u32,
    /// Payment the solved rate produces; equals the requested payment to
    /// within solver tolerance.
    pub implied_payment: Money,
}

impl RateSolverOutput {
    /// Presentation copy with rates rounded to `dp` places.
    pub fn rounded(&self, dp: u32) -> RateSolverOutput {
        RateSolverOutput {
            monthly_rate: self.monthly_rate.round_dp(dp + 4),
            annual_rate_percent: self.annual_rate_percent.round_dp(dp),
            iterations: self.iterations,
            implied_payment: self.implied_payment.round_dp(dp),
        }
    }
}

/// Solve `payment = L·c(1+c)^n / ((1+c)^n − 1)` for the monthly rate `c`
/// with Newton-Raphson from `c₀ = 0.1`.
pub fn solve_rate(input: &RateSolverInput) -> WebToolsResult<ComputationOutput<RateSolverOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.principal <= Decimal::ZERO {
        return Err(WebToolsError::invalid(
            "principal",
            "Loan amount must be positive",
        ));
    }
    if input.monthly_payment <= Decimal::ZERO {
        return Err(WebToolsError::invalid(
            "monthly_payment",
            "Monthly payment must be positive",
        ));
    }
    let n = term_in_months(input.term_years)?;

    // At a zero rate the payment is principal / n; anything at or below that
    // never retires the loan at a positive rate.
    let floor = input.principal / Decimal::from(n);
    if input.monthly_payment <= floor {
        return Err(WebToolsError::FinancialImpossibility(format!(
            "A payment of {} cannot repay {} over {} months at a positive rate (minimum {})",
            input.monthly_payment,
            input.principal,
            n,
            floor.round_dp(2)
        )));
    }

    let (monthly_rate, iterations) = newton_rate(input.principal, input.monthly_payment, n)?;
    let annual_rate_percent = monthly_rate * dec!(1200);
    let implied_payment = level_payment(input.principal, monthly_rate, n)?;

    if annual_rate_percent > dec!(100) {
        warnings.push(format!(
            "Implied annual rate of {}% exceeds 100%",
            annual_rate_percent.round_dp(2)
        ));
    }

    let output = RateSolverOutput {
        monthly_rate,
        annual_rate_percent,
        iterations,
        implied_payment,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Newton-Raphson on the level-payment annuity identity (c0 = 0.1, tol 1e-7)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn newton_rate(principal: Money, payment: Money, n: u32) -> WebToolsResult<(Rate, u32)> {
    let mut c = INITIAL_GUESS;
    let mut last_delta = Decimal::ZERO;

    for i in 1..=MAX_ITERATIONS {
        let failure = |last_delta: Decimal| WebToolsError::ConvergenceFailure {
            function: "loan rate solver".into(),
            iterations: i,
            last_delta,
        };

        let f = level_payment(principal, c, n).map_err(|_| failure(last_delta))? - payment;
        let slope = level_payment_slope(principal, c, n).map_err(|_| failure(f))?;
        if slope.is_zero() {
            return Err(failure(f));
        }

        let raw = f
            .checked_div(slope)
            .and_then(|step| c.checked_sub(step))
            .ok_or_else(|| failure(f))?;
        let next = raw.clamp(MIN_MONTHLY_RATE, MAX_MONTHLY_RATE);
        let pinned = next != raw;
        last_delta = (next - c).abs();

        if last_delta < CONVERGENCE_THRESHOLD {
            if pinned {
                debug!(iterations = i, monthly_rate = %next, "rate solver stuck on a bound");
                return Err(failure(f));
            }
            let residual =
                level_payment(principal, next, n).map_err(|_| failure(last_delta))? - payment;
            if residual.abs() > payment * PAYMENT_TOLERANCE {
                return Err(failure(residual));
            }
            debug!(iterations = i, monthly_rate = %next, "rate solver converged");
            return Ok((next, i));
        }
        c = next;
    }

    Err(WebToolsError::ConvergenceFailure {
        function: "loan rate solver".into(),
        iterations: MAX_ITERATIONS,
        last_delta,
    })
}
