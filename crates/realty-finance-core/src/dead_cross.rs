//! Dead-cross analysis: the year loan principal repayment overtakes
//! depreciation expense.
//!
//! Principal repayment is cash out but not deductible; depreciation is
//! deductible but not cash out. The year the first exceeds the second is a
//! standard danger signal for rental cash flow, since taxable income starts
//! outrunning actual cash income. This module aggregates the monthly
//! amortization schedule into calendar years and zips it against the annual
//! depreciation schedule, year by year.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{self, AmortizationPeriod, LoanParameters};
use crate::depreciation::{self, BuildingAsset};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::RealtyFinanceResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A financed building acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadCrossInput {
    /// Loan terms. A zero principal models an all-cash acquisition.
    pub loan: LoanParameters,
    /// The building being acquired.
    pub building: BuildingAsset,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One analysis year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearComparison {
    /// Year number (1-indexed).
    pub year: u32,
    /// Loan principal repaid during the year.
    pub principal_repaid: Money,
    /// Depreciation expensed during the year.
    pub depreciation: Money,
    /// principal_repaid - depreciation.
    pub difference: Money,
    /// True when principal repaid exceeds depreciation this year. Evaluated
    /// per year, never carried forward.
    pub is_crossover: bool,
}

/// Crossover verdict plus the full comparison table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadCrossOutput {
    /// First year whose flag is set; None when no year crosses.
    pub crossover_year: Option<u32>,
    /// Principal repaid in the crossover year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_at_crossover: Option<Money>,
    /// Depreciation expensed in the crossover year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depreciation_at_crossover: Option<Money>,
    /// Year-by-year comparison over the full horizon.
    pub comparison: Vec<YearComparison>,
    /// max(loan term, applied depreciable life).
    pub horizon_years: u32,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Find the dead-cross year of a financed acquisition.
pub fn analyze_dead_cross(
    input: &DeadCrossInput,
) -> RealtyFinanceResult<ComputationOutput<DeadCrossOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // An all-cash acquisition repays no principal, so no year can cross.
    let yearly_principal: Vec<Money> = if input.loan.principal.is_zero() {
        warnings
            .push("Loan principal is zero; an all-cash acquisition never dead-crosses".to_string());
        Vec::new()
    } else {
        let schedule = amortization::calculate_amortization(&input.loan)?;
        aggregate_by_year(&schedule.result.periods)
    };

    let dep = depreciation::calculate_depreciation(&input.building)?;
    let yearly_depreciation: Vec<Money> = dep.result.years.iter().map(|y| y.amount).collect();

    if input.building.acquisition_cost.is_zero() && !yearly_principal.is_empty() {
        warnings.push(
            "Building cost is zero; any principal repayment crosses in year 1".to_string(),
        );
    }

    let horizon_years = input.loan.term_years.max(dep.result.useful_life_years);
    let comparison = merge_series(&yearly_principal, &yearly_depreciation, horizon_years);

    let first = comparison.iter().find(|y| y.is_crossover);
    let output = DeadCrossOutput {
        crossover_year: first.map(|y| y.year),
        principal_at_crossover: first.map(|y| y.principal_repaid),
        depreciation_at_crossover: first.map(|y| y.depreciation),
        comparison,
        horizon_years,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Dead-Cross Analysis (Principal vs Depreciation)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Series handling
// ---------------------------------------------------------------------------

/// Sum monthly principal portions into calendar-year totals. A partial final
/// year keeps whatever months it has.
fn aggregate_by_year(periods: &[AmortizationPeriod]) -> Vec<Money> {
    let mut totals: Vec<Money> = Vec::new();
    for p in periods {
        let year_idx = ((p.month - 1) / 12) as usize;
        if totals.len() <= year_idx {
            totals.push(Decimal::ZERO);
        }
        totals[year_idx] += p.principal;
    }
    totals
}

/// Index-aligned zip of the two yearly series over the horizon. Years past
/// the end of either series contribute zero.
fn merge_series(
    principal: &[Money],
    depreciation: &[Money],
    horizon_years: u32,
) -> Vec<YearComparison> {
    (1..=horizon_years)
        .map(|year| {
            let idx = (year - 1) as usize;
            let principal_repaid = principal.get(idx).copied().unwrap_or(Decimal::ZERO);
            let dep = depreciation.get(idx).copied().unwrap_or(Decimal::ZERO);
            YearComparison {
                year,
                principal_repaid,
                depreciation: dep,
                difference: principal_repaid - dep,
                is_crossover: principal_repaid > dep,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
