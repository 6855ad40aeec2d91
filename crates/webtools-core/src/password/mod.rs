//! Random password generation from selectable character classes.

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::WebToolsError;
use crate::types::{with_metadata, ComputationOutput};
use crate::WebToolsResult;

pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const DIGITS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

pub const MIN_LENGTH: u32 = 8;
pub const MAX_LENGTH: u32 = 64;
pub const DEFAULT_LENGTH: u32 = 16;

fn default_length() -> u32 {
    DEFAULT_LENGTH
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordOptions {
    #[serde(default = "default_length")]
    pub length: u32,
    #[serde(default = "enabled")]
    pub uppercase: bool,
    #[serde(default = "enabled")]
    pub lowercase: bool,
    #[serde(default = "enabled")]
    pub digits: bool,
    #[serde(default = "enabled")]
    pub symbols: bool,
    /// Fixed seed for reproducible output; entropy-seeded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        PasswordOptions {
            length: DEFAULT_LENGTH,
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: true,
            seed: None,
        }
    }
}

impl PasswordOptions {
    /// Enabled classes concatenated in a fixed order.
    pub fn pool(&self) -> Vec<char> {
        [
            (self.uppercase, UPPERCASE),
            (self.lowercase, LOWERCASE),
            (self.digits, DIGITS),
            (self.symbols, SYMBOLS),
        ]
        .into_iter()
        .filter(|(on, _)| *on)
        .flat_map(|(_, chars)| chars.chars())
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordOutput {
    pub password: String,
    pub length: u32,
    pub pool_size: usize,
    /// `length × log2(pool_size)`.
    pub entropy_bits: Decimal,
}

pub fn generate_password(
    options: &PasswordOptions,
) -> WebToolsResult<ComputationOutput<PasswordOutput>> {
    let mut rng = match options.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    generate_with_rng(options, &mut rng)
}

/// Generate with a caller-supplied random source.
pub fn generate_with_rng<R: Rng>(
    options: &PasswordOptions,
    rng: &mut R,
) -> WebToolsResult<ComputationOutput<PasswordOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if !(MIN_LENGTH..=MAX_LENGTH).contains(&options.length) {
        return Err(WebToolsError::invalid(
            "length",
            format!("Password length must be between {MIN_LENGTH} and {MAX_LENGTH}"),
        ));
    }
    let pool = options.pool();
    if pool.is_empty() {
        return Err(WebToolsError::invalid(
            "character_classes",
            "Select at least one character type",
        ));
    }

    let password: String = (0..options.length)
        .map(|_| pool[rng.gen_range(0..pool.len())])
        .collect();

    let entropy_bits = (Decimal::from(options.length) * Decimal::from(pool.len()).ln()
        / Decimal::TWO.ln())
    .round_dp(2);
    if entropy_bits < Decimal::from(60) {
        warnings.push(format!(
            "Estimated entropy of {entropy_bits} bits is weak; use a longer password or more character types"
        ));
    }

    let output = PasswordOutput {
        password,
        length: options.length,
        pool_size: pool.len(),
        entropy_bits,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Uniform sampling with replacement from the enabled character classes",
        &serde_json::json!({
            "length": options.length,
            "uppercase": options.uppercase,
            "lowercase": options.lowercase,
            "digits": options.digits,
            "symbols": options.symbols,
            "seeded": options.seed.is_some(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
