pub mod error;
pub mod parse;
pub mod types;

#[cfg(feature = "loan")]
pub mod loan;

#[cfg(feature = "units")]
pub mod units;

#[cfg(feature = "currency")]
pub mod currency;

#[cfg(feature = "password")]
pub mod password;

#[cfg(feature = "calculator")]
pub mod calculator;

#[cfg(feature = "life_counter")]
pub mod life_counter;

pub use error::{ErrorKind, WebToolsError};
pub use types::*;

/// Standard result type for all WebTools operations
pub type WebToolsResult<T> = Result<T, WebToolsError>;
