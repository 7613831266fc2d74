//! Loan amortization schedules for acquisition financing.
//!
//! Supports the two repayment methods offered by investment-property
//! lenders (level payment and level principal), optional annual bonus
//! payments, and whole-yen rounding with final-period residue absorption.
//! All math in `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RealtyFinanceError;
use crate::rounding::round_yen;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::RealtyFinanceResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Periods per year (monthly repayment).
const PERIODS_PER_YEAR: u32 = 12;

/// Annual rates at or above 100% make the annuity formula unusable.
const MAX_ANNUAL_RATE: Decimal = Decimal::ONE;

/// Rates above this level are unusual for property financing.
const HIGH_RATE_THRESHOLD: Decimal = dec!(0.10);

/// Terms beyond this are outside anything written for investment property.
const LONG_TERM_THRESHOLD_YEARS: u32 = 50;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// How the loan is repaid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepaymentMethod {
    /// Level payment: constant monthly payment, principal portion grows.
    EqualPayment,
    /// Level principal: constant principal portion, payment declines.
    EqualPrincipal,
}

/// Loan terms for an acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount borrowed, in whole yen.
    pub principal: Money,
    /// Annual nominal rate as a decimal (0.02 = 2%).
    pub annual_rate: Rate,
    /// Term in years.
    pub term_years: u32,
    /// Repayment method.
    pub repayment_method: RepaymentMethod,
    /// Extra principal repaid once every 12 periods, in whole yen.
    #[serde(default)]
    pub annual_bonus_payment: Money,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One month of the repayment schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationPeriod {
    /// Month number (1-indexed).
    pub month: u32,
    /// Total paid this month, bonus included.
    pub payment: Money,
    /// Principal portion, bonus included.
    pub principal: Money,
    /// Interest portion.
    pub interest: Money,
    /// Balance after this month's payment.
    pub remaining_balance: Money,
}

/// Full schedule plus summary figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    /// Monthly repayment schedule.
    pub periods: Vec<AmortizationPeriod>,
    /// Payment in the first month (the level payment for EqualPayment).
    pub first_payment: Money,
    /// Sum of the first twelve payments.
    pub first_year_debt_service: Money,
    /// Total paid over the life of the loan.
    pub total_payment: Money,
    /// Total interest paid.
    pub total_interest: Money,
    /// Number of periods actually repaid (less than the term when bonus
    /// payments retire the loan early).
    pub period_count: u32,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the full repayment schedule for a loan.
pub fn calculate_amortization(
    input: &LoanParameters,
) -> RealtyFinanceResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    validate(input, &mut warnings)?;

    let periods = match input.repayment_method {
        RepaymentMethod::EqualPayment => build_equal_payment(input),
        RepaymentMethod::EqualPrincipal => build_equal_principal(input),
    };

    let output = summarize(periods);

    let methodology = match input.repayment_method {
        RepaymentMethod::EqualPayment => "Loan Amortization (Level Payment)",
        RepaymentMethod::EqualPrincipal => "Loan Amortization (Level Principal)",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(input: &LoanParameters, warnings: &mut Vec<String>) -> RealtyFinanceResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(RealtyFinanceError::InvalidLoanParameters {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if input.term_years == 0 {
        return Err(RealtyFinanceError::InvalidLoanParameters {
            field: "term_years".into(),
            reason: "Term must be at least 1 year".into(),
        });
    }
    if input.annual_rate < Decimal::ZERO {
        return Err(RealtyFinanceError::InvalidLoanParameters {
            field: "annual_rate".into(),
            reason: "Rate cannot be negative".into(),
        });
    }
    if input.annual_rate >= MAX_ANNUAL_RATE {
        return Err(RealtyFinanceError::InvalidLoanParameters {
            field: "annual_rate".into(),
            reason: "Rates of 100% or more cannot be amortized".into(),
        });
    }
    if input.annual_bonus_payment < Decimal::ZERO {
        return Err(RealtyFinanceError::InvalidLoanParameters {
            field: "annual_bonus_payment".into(),
            reason: "Bonus payment cannot be negative".into(),
        });
    }

    if input.annual_rate > HIGH_RATE_THRESHOLD {
        warnings.push(format!(
            "Annual rate {} exceeds 10% — unusually high for property financing",
            input.annual_rate
        ));
    }
    if input.term_years > LONG_TERM_THRESHOLD_YEARS {
        warnings.push(format!(
            "Term of {} years exceeds {} years",
            input.term_years, LONG_TERM_THRESHOLD_YEARS
        ));
    }
    if input.annual_bonus_payment > input.principal / Decimal::from(input.term_years) {
        warnings.push(
            "Annual bonus exceeds one year of scheduled principal; the loan will retire well ahead of term"
                .to_string(),
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Schedule builders
// ---------------------------------------------------------------------------

fn build_equal_payment(input: &LoanParameters) -> Vec<AmortizationPeriod> {
    let n = input.term_years * PERIODS_PER_YEAR;
    let monthly_rate = input.annual_rate / Decimal::from(PERIODS_PER_YEAR);

    let scheduled_payment = if monthly_rate.is_zero() {
        round_yen(input.principal / Decimal::from(n))
    } else {
        // Annuity formula: P * r * (1+r)^N / ((1+r)^N - 1), rounded once.
        let factor = pow_int(Decimal::ONE + monthly_rate, n);
        round_yen(input.principal * monthly_rate * factor / (factor - Decimal::ONE))
    };

    let mut periods = Vec::with_capacity(n as usize);
    let mut balance = input.principal;

    for month in 1..=n {
        let interest = round_yen(balance * monthly_rate);
        let mut principal_portion = scheduled_payment - interest;

        if principal_portion < Decimal::ZERO {
            principal_portion = Decimal::ZERO;
        }
        // The final period consumes the remaining balance exactly.
        if month == n || principal_portion >= balance {
            principal_portion = balance;
        }
        principal_portion += bonus_portion(month, balance - principal_portion, input);

        let payment = principal_portion + interest;
        balance -= principal_portion;

        periods.push(AmortizationPeriod {
            month,
            payment,
            principal: principal_portion,
            interest,
            remaining_balance: balance,
        });

        if balance.is_zero() {
            break;
        }
    }

    periods
}

fn build_equal_principal(input: &LoanParameters) -> Vec<AmortizationPeriod> {
    let n = input.term_years * PERIODS_PER_YEAR;
    let monthly_rate = input.annual_rate / Decimal::from(PERIODS_PER_YEAR);
    // Rounded up: the final period then absorbs a non-positive residue and
    // payments stay non-increasing.
    let level_principal = (input.principal / Decimal::from(n)).ceil();

    let mut periods = Vec::with_capacity(n as usize);
    let mut balance = input.principal;

    for month in 1..=n {
        let interest = round_yen(balance * monthly_rate);
        let mut principal_portion = level_principal;

        if month == n || principal_portion >= balance {
            principal_portion = balance;
        }
        principal_portion += bonus_portion(month, balance - principal_portion, input);

        let payment = principal_portion + interest;
        balance -= principal_portion;

        periods.push(AmortizationPeriod {
            month,
            payment,
            principal: principal_portion,
            interest,
            remaining_balance: balance,
        });

        if balance.is_zero() {
            break;
        }
    }

    periods
}

/// Bonus principal for this month: posts on every 12th period, capped at the
/// balance left after the scheduled payment.
fn bonus_portion(month: u32, balance_after_scheduled: Money, input: &LoanParameters) -> Money {
    if input.annual_bonus_payment <= Decimal::ZERO || month % PERIODS_PER_YEAR != 0 {
        return Decimal::ZERO;
    }
    input.annual_bonus_payment.min(balance_after_scheduled)
}

fn summarize(periods: Vec<AmortizationPeriod>) -> AmortizationOutput {
    let total_payment: Decimal = periods.iter().map(|p| p.payment).sum();
    let total_interest: Decimal = periods.iter().map(|p| p.interest).sum();
    let first_year_debt_service: Decimal = periods
        .iter()
        .take(PERIODS_PER_YEAR as usize)
        .map(|p| p.payment)
        .sum();
    let first_payment = periods.first().map(|p| p.payment).unwrap_or(Decimal::ZERO);
    let period_count = periods.len() as u32;

    AmortizationOutput {
        periods,
        first_payment,
        first_year_debt_service,
        total_payment,
        total_interest,
        period_count,
    }
}

// ---------------------------------------------------------------------------
// Decimal pow helper (no f64, no powd)
// ---------------------------------------------------------------------------

/// base^n by iterative multiplication; exponents here never exceed the
/// period count of a 50-year loan.
fn pow_int(base: Decimal, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result *= base;
    }
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
