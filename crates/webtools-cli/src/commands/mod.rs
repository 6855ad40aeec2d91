pub mod calculator;
pub mod currency;
pub mod life;
pub mod loan;
pub mod password;
pub mod units;
