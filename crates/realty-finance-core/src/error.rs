use thiserror::Error;

#[derive(Debug, Error)]
pub enum RealtyFinanceError {
    #[error("Invalid loan parameters: {field} — {reason}")]
    InvalidLoanParameters { field: String, reason: String },

    #[error("Invalid building asset: {field} — {reason}")]
    InvalidBuildingAsset { field: String, reason: String },

    #[error("Invalid tax input: {field} — {reason}")]
    InvalidTaxInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RealtyFinanceError {
    fn from(e: serde_json::Error) -> Self {
        RealtyFinanceError::SerializationError(e.to_string())
    }
}
