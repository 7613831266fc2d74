//! Shared rounding and residue-absorption helpers.
//!
//! Every schedule in this crate rounds per-period amounts to whole yen and
//! forces its final entry to absorb the accumulated rounding residue, so
//! that schedule totals reproduce the source amount exactly. The tax
//! calculator truncates to fixed currency units instead. Both conventions
//! live here so no component re-implements them.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to the nearest whole yen, midpoints away from zero.
pub fn round_yen(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Truncate down to a multiple of `unit` (100-yen or 1,000-yen units).
pub fn floor_to_unit(amount: Decimal, unit: Decimal) -> Decimal {
    if unit <= Decimal::ZERO {
        return amount;
    }
    (amount / unit).floor() * unit
}

/// Amount the final entry of a schedule must carry so that `count` entries
/// of `per_entry` (all but the last) sum exactly to `total`.
pub fn final_residue(total: Decimal, per_entry: Decimal, count: u32) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    total - per_entry * Decimal::from(count - 1)
}
