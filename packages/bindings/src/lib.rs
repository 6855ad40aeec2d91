use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use webtools_core::WebToolsResult;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Decode the JSON input, run the operation, and encode its output.
fn call<I, O>(input_json: &str, op: impl FnOnce(&I) -> WebToolsResult<O>) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = op(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_amortization(input_json: String) -> NapiResult<String> {
    call(&input_json, webtools_core::loan::amortization::build_schedule)
}

#[napi]
pub fn solve_loan_rate(input_json: String) -> NapiResult<String> {
    call(&input_json, webtools_core::loan::rate_solver::solve_rate)
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

#[napi]
pub fn convert_units(input_json: String) -> NapiResult<String> {
    call(&input_json, webtools_core::units::convert_units)
}

/// Unit tables for populating pickers, grouped by category.
#[napi]
pub fn list_units() -> NapiResult<String> {
    let tables: serde_json::Map<String, serde_json::Value> = webtools_core::units::UnitCategory::ALL
        .into_iter()
        .map(|c| {
            let units = serde_json::to_value(c.units()).map_err(to_napi_error)?;
            Ok((c.to_string(), units))
        })
        .collect::<NapiResult<_>>()?;
    serde_json::to_string(&tables).map_err(to_napi_error)
}

#[napi]
pub fn convert_currency(input_json: String) -> NapiResult<String> {
    call(&input_json, webtools_core::currency::convert_currency)
}

// ---------------------------------------------------------------------------
// Utilities
// ---------------------------------------------------------------------------

#[napi]
pub fn generate_password(input_json: String) -> NapiResult<String> {
    call(&input_json, webtools_core::password::generate_password)
}

#[napi]
pub fn evaluate_expression(input_json: String) -> NapiResult<String> {
    call(&input_json, webtools_core::calculator::calculate)
}

#[napi]
pub fn run_life_counter(input_json: String) -> NapiResult<String> {
    call(&input_json, webtools_core::life_counter::run_game)
}
