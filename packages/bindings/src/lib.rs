use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: realty_finance_core::amortization::LoanParameters =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = realty_finance_core::amortization::calculate_amortization(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Depreciation
// ---------------------------------------------------------------------------

#[napi]
pub fn depreciation_schedule(input_json: String) -> NapiResult<String> {
    let input: realty_finance_core::depreciation::BuildingAsset =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = realty_finance_core::depreciation::calculate_depreciation(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Dead cross
// ---------------------------------------------------------------------------

#[napi]
pub fn dead_cross_analysis(input_json: String) -> NapiResult<String> {
    let input: realty_finance_core::dead_cross::DeadCrossInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        realty_finance_core::dead_cross::analyze_dead_cross(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Registration tax
// ---------------------------------------------------------------------------

#[napi]
pub fn registration_tax(input_json: String) -> NapiResult<String> {
    let input: realty_finance_core::registration_tax::TaxableAsset =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = realty_finance_core::registration_tax::calculate_registration_tax(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
