#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
// Levels are capped at 2^53 and whole XP is range-checked before casting
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
//! Experience curve math.
//!
//! Leaving level `L` costs `A * L^P` XP. Totals over a range of levels use the closed
//! form `A * (to^(P+1) - from^(P+1)) / (P+1)`, which can be inverted to find the level
//! some amount of XP lands on. Everything here is pure and allocation-free apart from
//! [`CurveParameters::build_breakdown`].

mod breakdown;
mod curve;
mod economy;
mod error;
mod inverse;

pub use breakdown::{Breakdown, BreakdownResult, DEFAULT_MAX_ENTRIES, LevelRange, PerLevelEntry};
pub use curve::{CurveParameters, DEFAULT_COEFFICIENT, DEFAULT_EXPONENT, MAX_LEVEL};
pub use economy::{
    CurrencyConversionSettings, DEFAULT_RATE_PER_UNIT_XP, KillTransfer, XP_PER_UNIT,
    apply_flat_tax, deduct_from_received, gross_up_cost,
};
pub use error::Error;
pub use inverse::{FractionalLevel, Progress};

#[cfg(test)]
pub(crate) fn close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance * b.abs().max(1.0)
}
