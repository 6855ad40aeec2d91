use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use webtools_core::loan::amortization::{self, AmortizationInput};
use webtools_core::loan::rate_solver::{self, RateSolverInput};

use crate::config::WebToolsConfig;
use crate::input;

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct AmortizeArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 6.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Omit the month-by-month rows and print totals only
    #[arg(long)]
    pub summary: bool,
}

pub fn run_amortize(
    args: AmortizeArgs,
    config: &WebToolsConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: AmortizationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        AmortizationInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_years: args.years.ok_or("--years is required (or provide --input)")?,
        }
    };

    let precision = config.output.precision;
    let result = amortization::build_schedule(&schedule_input)?.map_result(|schedule| {
        let mut rounded = schedule.rounded(precision);
        if args.summary {
            rounded.rows.clear();
        }
        rounded
    });
    Ok(serde_json::to_value(result)?)
}

/// Arguments for solving the interest rate from a target payment
#[derive(Args)]
pub struct SolveRateArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Desired monthly payment
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub years: Option<u32>,
}

pub fn run_solve_rate(
    args: SolveRateArgs,
    config: &WebToolsConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let solver_input: RateSolverInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        RateSolverInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            monthly_payment: args
                .payment
                .ok_or("--payment is required (or provide --input)")?,
            term_years: args.years.ok_or("--years is required (or provide --input)")?,
        }
    };

    let precision = config.output.precision;
    let result = rate_solver::solve_rate(&solver_input)?.map_result(|r| r.rounded(precision));
    Ok(serde_json::to_value(result)?)
}
