pub mod error;
pub mod rounding;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "depreciation")]
pub mod depreciation;

#[cfg(feature = "dead_cross")]
pub mod dead_cross;

#[cfg(feature = "registration_tax")]
pub mod registration_tax;

pub use error::RealtyFinanceError;
pub use types::*;

/// Standard result type for all realty-finance operations
pub type RealtyFinanceResult<T> = Result<T, RealtyFinanceError>;
