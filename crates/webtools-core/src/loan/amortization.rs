use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::WebToolsError;
use crate::loan::annuity::{level_payment, out_of_range, term_in_months};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::WebToolsResult;

/// Input for a level-payment amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    /// Amount borrowed.
    pub principal: Money,
    /// Annual interest rate in percent (6.5 = 6.5%).
    pub annual_rate_percent: Decimal,
    /// Loan term in whole years.
    pub term_years: u32,
}

/// One monthly payment in the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub payment_index: u32,
    pub payment_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
}

/// Month-by-month breakdown plus loan totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    pub rows: Vec<AmortizationRow>,
}

impl AmortizationSchedule {
    /// Presentation copy with every amount rounded to `dp` places. The
    /// schedule itself is computed at full precision.
    pub fn rounded(&self, dp: u32) -> AmortizationSchedule {
        AmortizationSchedule {
            monthly_payment: self.monthly_payment.round_dp(dp),
            total_paid: self.total_paid.round_dp(dp),
            total_interest: self.total_interest.round_dp(dp),
            rows: self
                .rows
                .iter()
                .map(|r| AmortizationRow {
                    payment_index: r.payment_index,
                    payment_amount: r.payment_amount.round_dp(dp),
                    principal_portion: r.principal_portion.round_dp(dp),
                    interest_portion: r.interest_portion.round_dp(dp),
                    remaining_balance: r.remaining_balance.round_dp(dp),
                })
                .collect(),
        }
    }
}

/// Build a monthly amortization schedule for a fixed-rate level-payment loan.
pub fn build_schedule(
    input: &AmortizationInput,
) -> WebToolsResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.principal <= Decimal::ZERO {
        return Err(WebToolsError::invalid(
            "principal",
            "Loan amount must be positive",
        ));
    }
    if input.annual_rate_percent < Decimal::ZERO {
        return Err(WebToolsError::invalid(
            "annual_rate_percent",
            "Interest rate cannot be negative",
        ));
    }
    let n = term_in_months(input.term_years)?;

    if input.annual_rate_percent.is_zero() {
        warnings.push("Zero interest rate; payments are principal only".into());
    } else if input.annual_rate_percent > dec!(100) {
        warnings.push(format!(
            "Annual rate of {}% is unusually high",
            input.annual_rate_percent
        ));
    }

    let monthly_rate = input.annual_rate_percent / dec!(1200);
    let payment = level_payment(input.principal, monthly_rate, n)?;

    let mut rows = Vec::with_capacity(n as usize);
    let mut balance = input.principal;
    let mut total_paid = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;

    for index in 1..=n {
        let interest = balance
            .checked_mul(monthly_rate)
            .ok_or_else(|| out_of_range("monthly interest"))?;
        let (payment_amount, principal_portion) = if index == n {
            // Final payment retires whatever drift remains
            let last = balance
                .checked_add(interest)
                .ok_or_else(|| out_of_range("final payment"))?;
            (last, balance)
        } else {
            (payment, payment - interest)
        };

        balance = (balance - principal_portion).max(Decimal::ZERO);
        total_paid = total_paid
            .checked_add(payment_amount)
            .ok_or_else(|| out_of_range("total paid"))?;
        total_interest = total_interest
            .checked_add(interest)
            .ok_or_else(|| out_of_range("total interest"))?;

        rows.push(AmortizationRow {
            payment_index: index,
            payment_amount,
            principal_portion,
            interest_portion: interest,
            remaining_balance: balance,
        });
    }

    debug!(
        periods = n,
        monthly_payment = %payment,
        total_interest = %total_interest,
        "amortization schedule built"
    );

    let output = AmortizationSchedule {
        monthly_payment: payment,
        total_paid,
        total_interest,
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment annuity amortization (monthly compounding, rate / 1200)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
