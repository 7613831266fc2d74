//! Straight-line building depreciation schedules.
//!
//! Useful life is a statutory lookup by structure category, adjusted for
//! building age, with the simplified method for buildings at or past their
//! statutory life. Land never depreciates and is excluded from the cost.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RealtyFinanceError;
use crate::rounding::{final_residue, round_yen};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::RealtyFinanceResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Floor for the simplified-method life.
const MIN_SIMPLIFIED_LIFE: u32 = 2;

/// Ages above this are unusual even for wooden rental stock.
const OLD_BUILDING_THRESHOLD_YEARS: u32 = 70;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Building structure category, as classified for statutory useful life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureCategory {
    ReinforcedConcrete,
    HeavySteel,
    /// Steel frame thicker than 3mm, up to 4mm.
    LightSteelThick,
    /// Steel frame up to 3mm.
    LightSteelThin,
    Wood,
    WoodMortar,
}

impl StructureCategory {
    /// Statutory useful life in years. A flat table, not a hierarchy.
    pub fn statutory_life(self) -> u32 {
        match self {
            StructureCategory::ReinforcedConcrete => 47,
            StructureCategory::HeavySteel => 34,
            StructureCategory::LightSteelThick => 27,
            StructureCategory::LightSteelThin => 19,
            StructureCategory::Wood => 22,
            StructureCategory::WoodMortar => 20,
        }
    }
}

/// A building acquisition, land excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingAsset {
    /// Acquisition cost attributable to the building, in whole yen.
    pub acquisition_cost: Money,
    /// Structure category.
    pub structure: StructureCategory,
    /// Age in whole years at acquisition (0 = new).
    pub age_years: u32,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Depreciation method actually applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepreciationMethod {
    /// Straight line over the (age-adjusted) statutory life.
    Standard,
    /// Simplified method for buildings at or past their statutory life.
    SimplifiedUsed,
}

/// One depreciation year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationYear {
    /// Year number (1-indexed).
    pub year: u32,
    /// Depreciation expensed this year.
    pub amount: Money,
    /// Cumulative depreciation through this year.
    pub accumulated: Money,
    /// Book value after this year's expense.
    pub closing_book_value: Money,
}

/// Full schedule plus the applied life and method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationOutput {
    /// Annual schedule; empty when the acquisition cost is zero.
    pub years: Vec<DepreciationYear>,
    /// Constant annual amount (the final year may differ by the residue).
    pub annual_amount: Money,
    /// Life actually applied.
    pub useful_life_years: u32,
    /// Statutory life for the structure category.
    pub statutory_life_years: u32,
    /// Method the life was derived with.
    pub method: DepreciationMethod,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Applied useful life for a building of the given age.
///
/// At or past the statutory life the simplified method applies: 20% of the
/// statutory life, floored, never less than 2 years. Below it, the elapsed
/// years come off the statutory life with 20% of them added back.
pub fn applied_useful_life(
    structure: StructureCategory,
    age_years: u32,
) -> (u32, DepreciationMethod) {
    let statutory = structure.statutory_life();
    if age_years >= statutory {
        let life = (statutory / 5).max(MIN_SIMPLIFIED_LIFE);
        (life, DepreciationMethod::SimplifiedUsed)
    } else {
        let life = statutory - age_years + age_years / 5;
        (life, DepreciationMethod::Standard)
    }
}

/// Build the annual depreciation schedule for a building.
pub fn calculate_depreciation(
    input: &BuildingAsset,
) -> RealtyFinanceResult<ComputationOutput<DepreciationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    validate(input, &mut warnings)?;

    let statutory = input.structure.statutory_life();
    let (life, method) = applied_useful_life(input.structure, input.age_years);

    let output = if input.acquisition_cost.is_zero() {
        DepreciationOutput {
            years: Vec::new(),
            annual_amount: Decimal::ZERO,
            useful_life_years: life,
            statutory_life_years: statutory,
            method,
        }
    } else {
        let annual = round_yen(input.acquisition_cost / Decimal::from(life));
        let mut years = Vec::with_capacity(life as usize);
        let mut accumulated = Decimal::ZERO;

        for year in 1..=life {
            let amount = if year == life {
                final_residue(input.acquisition_cost, annual, life)
            } else {
                annual
            };
            accumulated += amount;
            years.push(DepreciationYear {
                year,
                amount,
                accumulated,
                closing_book_value: input.acquisition_cost - accumulated,
            });
        }

        DepreciationOutput {
            years,
            annual_amount: annual,
            useful_life_years: life,
            statutory_life_years: statutory,
            method,
        }
    };

    let methodology = match method {
        DepreciationMethod::Standard => "Straight-Line Depreciation (Statutory Life)",
        DepreciationMethod::SimplifiedUsed => "Straight-Line Depreciation (Simplified Used)",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(input: &BuildingAsset, warnings: &mut Vec<String>) -> RealtyFinanceResult<()> {
    if input.acquisition_cost < Decimal::ZERO {
        return Err(RealtyFinanceError::InvalidBuildingAsset {
            field: "acquisition_cost".into(),
            reason: "Acquisition cost cannot be negative".into(),
        });
    }

    if input.acquisition_cost.is_zero() {
        warnings.push("Acquisition cost is zero; the schedule is empty".to_string());
    }
    if input.age_years > OLD_BUILDING_THRESHOLD_YEARS {
        warnings.push(format!(
            "Building age of {} years exceeds {} years",
            input.age_years, OLD_BUILDING_THRESHOLD_YEARS
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
