use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.005 = 0.5% per period).
pub type Rate = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

impl<T: Serialize> ComputationOutput<T> {
    /// Replace the result (e.g. with a rounded presentation copy) and keep
    /// methodology, assumptions, warnings, and metadata.
    pub fn map_result<U: Serialize>(self, f: impl FnOnce(T) -> U) -> ComputationOutput<U> {
        ComputationOutput {
            result: f(self.result),
            methodology: self.methodology,
            assumptions: self.assumptions,
            warnings: self.warnings,
            metadata: self.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_map_result_keeps_envelope() {
        let out = with_metadata(
            "Level payment",
            &serde_json::json!({ "term_years": 30 }),
            vec!["check the rate".into()],
            12,
            dec!(1199.1010503),
        );
        let mapped = out.map_result(|v| v.round_dp(2));
        assert_eq!(mapped.result, dec!(1199.10));
        assert_eq!(mapped.methodology, "Level payment");
        assert_eq!(mapped.warnings, vec!["check the rate".to_string()]);
        assert_eq!(mapped.metadata.computation_time_us, 12);
        assert_eq!(mapped.assumptions["term_years"], 30);
    }
}
