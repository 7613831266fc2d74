pub mod amortization;
pub mod dead_cross;
pub mod depreciation;
pub mod registration_tax;
