//! Loan calculators: the level-payment amortization schedule and the
//! interest rate implied by a given monthly payment.

pub mod amortization;
pub mod annuity;
pub mod rate_solver;
