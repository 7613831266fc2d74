//! Registration and license tax for a property acquisition.
//!
//! Three components are assessed independently: ownership transfer on the
//! land, ownership preservation (new building) or transfer (used building),
//! and mortgage creation. Each rate comes from a flat decision table keyed
//! by transaction type and reduction eligibility. Bases truncate to
//! 1,000-yen units and amounts to 100-yen units with a 1,000-yen minimum,
//! the standard convention for this tax.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RealtyFinanceError;
use crate::rounding::floor_to_unit;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::RealtyFinanceResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Taxable bases truncate to 1,000-yen units.
const BASE_UNIT: Decimal = dec!(1000);

/// Tax amounts truncate to 100-yen units.
const AMOUNT_UNIT: Decimal = dec!(100);

/// Minimum tax for an applicable component with a positive base.
const MINIMUM_TAX: Decimal = dec!(1000);

// Land ownership transfer.
const LAND_TRANSFER_REDUCED: Decimal = dec!(0.015);

// Ownership preservation (new building).
const PRESERVATION_STANDARD: Decimal = dec!(0.004);
const PRESERVATION_RESIDENTIAL: Decimal = dec!(0.0015);
const PRESERVATION_CERTIFIED: Decimal = dec!(0.001);

// Ownership transfer (used building).
const TRANSFER_STANDARD: Decimal = dec!(0.020);
const TRANSFER_RESIDENTIAL: Decimal = dec!(0.003);
const TRANSFER_LONG_TERM_QUALITY: Decimal = dec!(0.002);
const TRANSFER_LOW_CARBON: Decimal = dec!(0.001);
const TRANSFER_RESALE: Decimal = dec!(0.001);

// Mortgage creation.
const MORTGAGE_STANDARD: Decimal = dec!(0.004);
const MORTGAGE_RESIDENTIAL: Decimal = dec!(0.001);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// What is being registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    /// Newly built property: land transfer plus ownership preservation.
    NewPurchase,
    /// Existing property: land transfer plus ownership transfer.
    UsedPurchase,
    /// Land with no building registration.
    LandOnly,
}

/// Reduction eligibility, as attested by the purchaser.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReductionFlags {
    /// Purchaser will live in the building.
    #[serde(default)]
    pub self_residential: bool,
    /// Certified long-term quality housing.
    #[serde(default)]
    pub long_term_quality: bool,
    /// Certified low-carbon housing.
    #[serde(default)]
    pub low_carbon: bool,
    /// Certified renovated-resale acquisition.
    #[serde(default)]
    pub resale: bool,
}

impl ReductionFlags {
    fn any_certified(&self) -> bool {
        self.long_term_quality || self.low_carbon || self.resale
    }
}

/// The assessed values a registration is taxed on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxableAsset {
    /// Transaction type.
    pub transaction: TransactionType,
    /// Assessed value of the land, in whole yen.
    pub land_assessed_value: Money,
    /// Assessed value of the building, in whole yen. Ignored for LandOnly.
    pub building_assessed_value: Money,
    /// Reduction eligibility flags.
    #[serde(default)]
    pub reductions: ReductionFlags,
    /// Loan amount for mortgage-registration tax, if financed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_amount: Option<Money>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One tax component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxComponent {
    /// Taxable base after 1,000-yen truncation; zero when not applicable.
    pub taxable_base: Money,
    /// Applied rate; None when the component does not apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<Rate>,
    /// Tax owed on this component.
    pub amount: Money,
    /// True when a reduced rate was applied.
    pub reduction_applied: bool,
}

/// Per-component breakdown plus the total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationTaxOutput {
    /// Ownership transfer on the land.
    pub land_transfer: TaxComponent,
    /// Ownership preservation for a new building, transfer for a used one.
    pub building_registration: TaxComponent,
    /// Mortgage (lien) creation.
    pub mortgage_registration: TaxComponent,
    /// Sum of the component amounts.
    pub total: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Calculate registration and license tax for an acquisition.
pub fn calculate_registration_tax(
    input: &TaxableAsset,
) -> RealtyFinanceResult<ComputationOutput<RegistrationTaxOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    validate(input, &mut warnings)?;

    let land_transfer = land_component(input);
    let building_registration = building_component(input);
    let mortgage_registration = mortgage_component(input);

    let total =
        land_transfer.amount + building_registration.amount + mortgage_registration.amount;

    let output = RegistrationTaxOutput {
        land_transfer,
        building_registration,
        mortgage_registration,
        total,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Registration and License Tax (Tiered Rates)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(input: &TaxableAsset, warnings: &mut Vec<String>) -> RealtyFinanceResult<()> {
    if input.land_assessed_value < Decimal::ZERO {
        return Err(RealtyFinanceError::InvalidTaxInput {
            field: "land_assessed_value".into(),
            reason: "Assessed value cannot be negative".into(),
        });
    }
    if input.building_assessed_value < Decimal::ZERO {
        return Err(RealtyFinanceError::InvalidTaxInput {
            field: "building_assessed_value".into(),
            reason: "Assessed value cannot be negative".into(),
        });
    }
    if let Some(loan) = input.loan_amount {
        if loan < Decimal::ZERO {
            return Err(RealtyFinanceError::InvalidTaxInput {
                field: "loan_amount".into(),
                reason: "Loan amount cannot be negative".into(),
            });
        }
    }

    let flags = &input.reductions;
    if flags.any_certified() && !flags.self_residential {
        return Err(RealtyFinanceError::InvalidTaxInput {
            field: "reductions".into(),
            reason: "Certified-housing reductions require self-residential use".into(),
        });
    }
    if flags.long_term_quality && flags.low_carbon {
        return Err(RealtyFinanceError::InvalidTaxInput {
            field: "reductions".into(),
            reason: "Long-term quality and low-carbon certifications are mutually exclusive"
                .into(),
        });
    }
    if flags.resale && input.transaction != TransactionType::UsedPurchase {
        return Err(RealtyFinanceError::InvalidTaxInput {
            field: "reductions".into(),
            reason: "The resale reduction applies to used purchases only".into(),
        });
    }
    if input.transaction == TransactionType::LandOnly && flags.any_certified() {
        return Err(RealtyFinanceError::InvalidTaxInput {
            field: "reductions".into(),
            reason: "Building certifications do not apply to a land-only transaction".into(),
        });
    }

    if input.transaction == TransactionType::LandOnly
        && input.building_assessed_value > Decimal::ZERO
    {
        warnings.push(
            "Building assessed value is ignored for a land-only transaction".to_string(),
        );
    }
    if input.land_assessed_value.is_zero()
        && (input.transaction == TransactionType::LandOnly
            || input.building_assessed_value.is_zero())
    {
        warnings.push("All taxable bases are zero".to_string());
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

fn assess(base: Money, rate: Rate, reduction_applied: bool) -> TaxComponent {
    let taxable_base = floor_to_unit(base, BASE_UNIT);
    if taxable_base.is_zero() {
        return TaxComponent {
            taxable_base,
            rate: Some(rate),
            amount: Decimal::ZERO,
            reduction_applied,
        };
    }
    let amount = floor_to_unit(taxable_base * rate, AMOUNT_UNIT).max(MINIMUM_TAX);
    TaxComponent {
        taxable_base,
        rate: Some(rate),
        amount,
        reduction_applied,
    }
}

fn skipped() -> TaxComponent {
    TaxComponent {
        taxable_base: Decimal::ZERO,
        rate: None,
        amount: Decimal::ZERO,
        reduction_applied: false,
    }
}

fn land_component(input: &TaxableAsset) -> TaxComponent {
    // The blanket reduction measure covers every land transfer.
    assess(input.land_assessed_value, LAND_TRANSFER_REDUCED, true)
}

fn building_component(input: &TaxableAsset) -> TaxComponent {
    let flags = &input.reductions;
    match input.transaction {
        TransactionType::LandOnly => skipped(),
        TransactionType::NewPurchase => {
            let (rate, reduced) = if flags.self_residential {
                if flags.long_term_quality || flags.low_carbon {
                    (PRESERVATION_CERTIFIED, true)
                } else {
                    (PRESERVATION_RESIDENTIAL, true)
                }
            } else {
                (PRESERVATION_STANDARD, false)
            };
            assess(input.building_assessed_value, rate, reduced)
        }
        TransactionType::UsedPurchase => {
            let (rate, reduced) = if flags.resale {
                (TRANSFER_RESALE, true)
            } else if flags.low_carbon {
                (TRANSFER_LOW_CARBON, true)
            } else if flags.long_term_quality {
                (TRANSFER_LONG_TERM_QUALITY, true)
            } else if flags.self_residential {
                (TRANSFER_RESIDENTIAL, true)
            } else {
                (TRANSFER_STANDARD, false)
            };
            assess(input.building_assessed_value, rate, reduced)
        }
    }
}

fn mortgage_component(input: &TaxableAsset) -> TaxComponent {
    let Some(loan) = input.loan_amount else {
        return skipped();
    };
    // The reduced lien rate rides on a self-residential building; bare land
    // financing pays the standard rate.
    let (rate, reduced) = if input.reductions.self_residential
        && input.transaction != TransactionType::LandOnly
    {
        (MORTGAGE_RESIDENTIAL, true)
    } else {
        (MORTGAGE_STANDARD, false)
    };
    assess(loan, rate, reduced)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn residential_new() -> TaxableAsset {
        TaxableAsset {
            transaction: TransactionType::NewPurchase,
            land_assessed_value: dec!(10_000_000),
            building_assessed_value: dec!(8_000_000),
            reductions: ReductionFlags {
                self_residential: true,
                ..ReductionFlags::default()
            },
            loan_amount: Some(dec!(20_000_000)),
        }
    }

    fn run(input: &TaxableAsset) -> RegistrationTaxOutput {
        calculate_registration_tax(input).unwrap().result
    }

    // -----------------------------------------------------------------------
    // 1. Residential new purchase, all three components
    // -----------------------------------------------------------------------
    #[test]
    fn test_residential_new_purchase() {
        let out = run(&residential_new());

        // Land: 10,000,000 x 1.5%.
        assert_eq!(out.land_transfer.amount, dec!(150_000));
        assert!(out.land_transfer.reduction_applied);
        // Building preservation: 8,000,000 x 0.15%.
        assert_eq!(out.building_registration.amount, dec!(12_000));
        assert_eq!(out.building_registration.rate, Some(dec!(0.0015)));
        // Mortgage: 20,000,000 x 0.1%.
        assert_eq!(out.mortgage_registration.amount, dec!(20_000));
        assert_eq!(out.total, dec!(182_000));
    }

    // -----------------------------------------------------------------------
    // 2. Investor (non-residential) rates
    // -----------------------------------------------------------------------
    #[test]
    fn test_investor_new_purchase_standard_rates() {
        let input = TaxableAsset {
            reductions: ReductionFlags::default(),
            ..residential_new()
        };
        let out = run(&input);

        assert_eq!(out.building_registration.amount, dec!(32_000));
        assert!(!out.building_registration.reduction_applied);
        assert_eq!(out.mortgage_registration.amount, dec!(80_000));
        assert!(!out.mortgage_registration.reduction_applied);
    }

    // -----------------------------------------------------------------------
    // 3. Used purchase rates, with and without reductions
    // -----------------------------------------------------------------------
    #[test]
    fn test_used_purchase_rates() {
        let base = TaxableAsset {
            transaction: TransactionType::UsedPurchase,
            ..residential_new()
        };

        // Self-residential: 8,000,000 x 0.3%.
        assert_eq!(run(&base).building_registration.amount, dec!(24_000));

        // Long-term quality: 0.2%.
        let ltq = TaxableAsset {
            reductions: ReductionFlags {
                self_residential: true,
                long_term_quality: true,
                ..ReductionFlags::default()
            },
            ..base.clone()
        };
        assert_eq!(run(&ltq).building_registration.amount, dec!(16_000));

        // Low-carbon: 0.1%.
        let low_carbon = TaxableAsset {
            reductions: ReductionFlags {
                self_residential: true,
                low_carbon: true,
                ..ReductionFlags::default()
            },
            ..base.clone()
        };
        assert_eq!(run(&low_carbon).building_registration.amount, dec!(8_000));

        // Certified resale: 0.1%.
        let resale = TaxableAsset {
            reductions: ReductionFlags {
                self_residential: true,
                resale: true,
                ..ReductionFlags::default()
            },
            ..base.clone()
        };
        assert_eq!(run(&resale).building_registration.amount, dec!(8_000));

        // No flags at all: 2.0%.
        let investor = TaxableAsset {
            reductions: ReductionFlags::default(),
            ..base
        };
        assert_eq!(run(&investor).building_registration.amount, dec!(160_000));
    }

    // -----------------------------------------------------------------------
    // 4. Certified new building: 0.1% preservation
    // -----------------------------------------------------------------------
    #[test]
    fn test_certified_new_building() {
        let input = TaxableAsset {
            reductions: ReductionFlags {
                self_residential: true,
                long_term_quality: true,
                ..ReductionFlags::default()
            },
            ..residential_new()
        };
        let out = run(&input);
        assert_eq!(out.building_registration.amount, dec!(8_000));
        assert_eq!(out.building_registration.rate, Some(dec!(0.001)));
    }

    // -----------------------------------------------------------------------
    // 5. Land-only transaction skips the building component
    // -----------------------------------------------------------------------
    #[test]
    fn test_land_only_skips_building() {
        let input = TaxableAsset {
            transaction: TransactionType::LandOnly,
            land_assessed_value: dec!(10_000_000),
            building_assessed_value: Decimal::ZERO,
            reductions: ReductionFlags::default(),
            loan_amount: Some(dec!(8_000_000)),
        };
        let out = run(&input);

        assert_eq!(out.building_registration.rate, None);
        assert_eq!(out.building_registration.amount, Decimal::ZERO);
        assert_eq!(out.land_transfer.amount, dec!(150_000));
        // Bare-land financing pays the standard lien rate.
        assert_eq!(out.mortgage_registration.amount, dec!(32_000));
        assert_eq!(out.total, dec!(182_000));
    }

    // -----------------------------------------------------------------------
    // 6. No loan, no mortgage component
    // -----------------------------------------------------------------------
    #[test]
    fn test_cash_purchase_skips_mortgage() {
        let input = TaxableAsset {
            loan_amount: None,
            ..residential_new()
        };
        let out = run(&input);
        assert_eq!(out.mortgage_registration.rate, None);
        assert_eq!(out.mortgage_registration.amount, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 7. Base truncates to 1,000 yen, amount to 100 yen
    // -----------------------------------------------------------------------
    #[test]
    fn test_truncation() {
        let input = TaxableAsset {
            transaction: TransactionType::LandOnly,
            land_assessed_value: dec!(12_345_678),
            building_assessed_value: Decimal::ZERO,
            reductions: ReductionFlags::default(),
            loan_amount: None,
        };
        let out = run(&input);

        assert_eq!(out.land_transfer.taxable_base, dec!(12_345_000));
        // 12,345,000 x 1.5% = 185,175, truncated to 185,100.
        assert_eq!(out.land_transfer.amount, dec!(185_100));
    }

    // -----------------------------------------------------------------------
    // 8. Minimum tax of 1,000 yen on tiny bases
    // -----------------------------------------------------------------------
    #[test]
    fn test_minimum_tax() {
        let input = TaxableAsset {
            transaction: TransactionType::LandOnly,
            land_assessed_value: dec!(50_000),
            building_assessed_value: Decimal::ZERO,
            reductions: ReductionFlags::default(),
            loan_amount: None,
        };
        let out = run(&input);
        // 50,000 x 1.5% = 750, below the floor.
        assert_eq!(out.land_transfer.amount, dec!(1_000));
    }

    // -----------------------------------------------------------------------
    // 9. Zero bases produce zero amounts and a warning, not a minimum
    // -----------------------------------------------------------------------
    #[test]
    fn test_zero_bases() {
        let input = TaxableAsset {
            transaction: TransactionType::LandOnly,
            land_assessed_value: Decimal::ZERO,
            building_assessed_value: Decimal::ZERO,
            reductions: ReductionFlags::default(),
            loan_amount: None,
        };
        let result = calculate_registration_tax(&input).unwrap();
        assert_eq!(result.result.total, Decimal::ZERO);
        assert!(!result.warnings.is_empty());
    }

    // -----------------------------------------------------------------------
    // 10. Monotonicity: a higher base never lowers the tax
    // -----------------------------------------------------------------------
    #[test]
    fn test_monotonic_in_assessed_value() {
        let mut prev = Decimal::ZERO;
        for value in [
            dec!(0),
            dec!(999),
            dec!(1_000),
            dec!(65_432),
            dec!(1_000_000),
            dec!(9_999_999),
            dec!(10_000_000),
            dec!(250_000_000),
        ] {
            let input = TaxableAsset {
                transaction: TransactionType::LandOnly,
                land_assessed_value: value,
                building_assessed_value: Decimal::ZERO,
                reductions: ReductionFlags::default(),
                loan_amount: None,
            };
            let amount = run(&input).land_transfer.amount;
            assert!(amount >= prev, "value {value}: {amount} < {prev}");
            prev = amount;
        }
    }

    // -----------------------------------------------------------------------
    // 11. Validation failures
    // -----------------------------------------------------------------------
    #[test]
    fn test_negative_values_rejected() {
        let negative_land = TaxableAsset {
            land_assessed_value: dec!(-1),
            ..residential_new()
        };
        assert!(matches!(
            calculate_registration_tax(&negative_land),
            Err(RealtyFinanceError::InvalidTaxInput { .. })
        ));

        let negative_loan = TaxableAsset {
            loan_amount: Some(dec!(-1)),
            ..residential_new()
        };
        assert!(calculate_registration_tax(&negative_loan).is_err());
    }

    #[test]
    fn test_certified_without_residential_rejected() {
        let input = TaxableAsset {
            reductions: ReductionFlags {
                self_residential: false,
                long_term_quality: true,
                ..ReductionFlags::default()
            },
            ..residential_new()
        };
        assert!(calculate_registration_tax(&input).is_err());
    }

    #[test]
    fn test_conflicting_certifications_rejected() {
        let input = TaxableAsset {
            reductions: ReductionFlags {
                self_residential: true,
                long_term_quality: true,
                low_carbon: true,
                ..ReductionFlags::default()
            },
            ..residential_new()
        };
        assert!(calculate_registration_tax(&input).is_err());
    }

    #[test]
    fn test_resale_on_new_purchase_rejected() {
        let input = TaxableAsset {
            reductions: ReductionFlags {
                self_residential: true,
                resale: true,
                ..ReductionFlags::default()
            },
            ..residential_new()
        };
        assert!(calculate_registration_tax(&input).is_err());
    }

    // -----------------------------------------------------------------------
    // 12. Metadata is populated
    // -----------------------------------------------------------------------
    #[test]
    fn test_metadata_populated() {
        let result = calculate_registration_tax(&residential_new()).unwrap();
        assert!(result.methodology.contains("Registration"));
        assert_eq!(result.metadata.precision, "rust_decimal_128bit");
    }
}
