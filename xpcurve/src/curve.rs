use serde::{Deserialize, Serialize};

use crate::Error;

/// Observed coefficient of the game's curve.
pub const DEFAULT_COEFFICIENT: f64 = 3.44883;
/// Observed exponent of the game's curve.
pub const DEFAULT_EXPONENT: f64 = 1.70006;
/// Highest level the curve accepts. Every whole level up to here is exact as an `f64`.
pub const MAX_LEVEL: u64 = 1 << 53;

/// The constants that shape the curve. Leaving `level` for `level + 1` costs
/// `coefficient * level^exponent` XP.
///
/// The exponent of the cumulative closed form is always derived as `exponent + 1`
/// and never stored on its own.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawCurveParameters")]
pub struct CurveParameters {
    coefficient: f64,
    exponent: f64,
}

#[derive(Deserialize)]
struct RawCurveParameters {
    #[serde(default = "default_coefficient")]
    coefficient: f64,
    #[serde(default = "default_exponent")]
    exponent: f64,
}

const fn default_coefficient() -> f64 {
    DEFAULT_COEFFICIENT
}

const fn default_exponent() -> f64 {
    DEFAULT_EXPONENT
}

impl TryFrom<RawCurveParameters> for CurveParameters {
    type Error = Error;

    fn try_from(value: RawCurveParameters) -> Result<Self, Self::Error> {
        Self::new(value.coefficient, value.exponent)
    }
}

impl Default for CurveParameters {
    fn default() -> Self {
        Self {
            coefficient: DEFAULT_COEFFICIENT,
            exponent: DEFAULT_EXPONENT,
        }
    }
}

impl CurveParameters {
    /// Build a curve from its coefficient and exponent.
    /// # Errors
    /// If either constant is not a finite number above zero.
    pub fn new(coefficient: f64, exponent: f64) -> Result<Self, Error> {
        if !(coefficient.is_finite() && coefficient > 0.0) {
            return Err(Error::InvalidCoefficient(coefficient));
        }
        if !(exponent.is_finite() && exponent > 0.0) {
            return Err(Error::InvalidExponent(exponent));
        }
        Ok(Self {
            coefficient,
            exponent,
        })
    }

    #[must_use]
    #[inline]
    pub const fn coefficient(&self) -> f64 {
        self.coefficient
    }

    #[must_use]
    #[inline]
    pub const fn exponent(&self) -> f64 {
        self.exponent
    }

    /// Exponent of the integrated curve used by [`CurveParameters::cumulative_cost`].
    #[must_use]
    #[inline]
    pub fn cumulative_exponent(&self) -> f64 {
        self.exponent + 1.0
    }

    /// XP needed to advance from `level` to `level + 1`. Fractional levels are
    /// fine, callers are expected to pass values of at least 1.
    #[must_use]
    pub fn cost_of_level(&self, level: f64) -> f64 {
        self.coefficient * level.powf(self.exponent)
    }

    /// Closed-form XP between two levels, the integral of [`CurveParameters::cost_of_level`]
    /// over `from..to`. This approximates the stepped per-level sum, it does not equal it.
    /// # Errors
    /// If either level is below 1, above [`MAX_LEVEL`] or not finite, or if `to` is
    /// lower than `from`.
    pub fn cumulative_cost(&self, from: f64, to: f64) -> Result<f64, Error> {
        validate_level(from)?;
        validate_level(to)?;
        if to < from {
            return Err(Error::InvalidRange { from, to });
        }
        if to == from {
            return Ok(0.0);
        }
        Ok(self.integral_at(to) - self.integral_at(from))
    }

    /// `A * level^(P+1) / (P+1)`, the antiderivative of the per-level cost.
    pub(crate) fn integral_at(&self, level: f64) -> f64 {
        let exponent = self.cumulative_exponent();
        self.coefficient * level.powf(exponent) / exponent
    }
}

pub(crate) fn validate_level(level: f64) -> Result<f64, Error> {
    if !(level.is_finite() && level >= 1.0) {
        return Err(Error::InvalidLevel(level));
    }
    if level > MAX_LEVEL as f64 {
        return Err(Error::LevelTooHigh(level));
    }
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::close;

    #[test]
    fn first_level_cost() {
        let curve = CurveParameters::default();
        assert!(close(curve.cost_of_level(1.0), 3.44883, 1e-12));
    }

    #[test]
    fn first_level_closed_form() {
        let curve = CurveParameters::default();
        let closed = curve.cumulative_cost(1.0, 2.0).unwrap();
        assert!(close(closed, 7.023_053_378_634_538, 1e-9));
        // continuous and stepped totals disagree on purpose
        assert!((closed - curve.cost_of_level(1.0)).abs() > 1.0);
    }

    #[test]
    fn level_fifty_regression() {
        let curve = CurveParameters::default();
        let total = curve.cumulative_cost(1.0, 50.0).unwrap();
        assert!(close(total, 49_386.481_940_441_58, 1e-9), "{total}");
    }

    #[test]
    fn empty_range_is_zero() {
        let curve = CurveParameters::default();
        assert_eq!(curve.cumulative_cost(17.5, 17.5).unwrap(), 0.0);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let curve = CurveParameters::default();
        assert_eq!(
            curve.cumulative_cost(20.0, 10.0),
            Err(Error::InvalidRange {
                from: 20.0,
                to: 10.0
            })
        );
    }

    #[test]
    fn sub_one_level_is_rejected() {
        let curve = CurveParameters::default();
        assert_eq!(
            curve.cumulative_cost(0.5, 10.0),
            Err(Error::InvalidLevel(0.5))
        );
        assert!(matches!(
            curve.cumulative_cost(1.0, f64::NAN),
            Err(Error::InvalidLevel(_))
        ));
    }

    #[test]
    fn levels_past_the_cap_are_rejected() {
        let curve = CurveParameters::default();
        let cap = MAX_LEVEL as f64;
        assert!(curve.cumulative_cost(1.0, cap).is_ok());
        assert_eq!(
            curve.cumulative_cost(1.0, 1e17),
            Err(Error::LevelTooHigh(1e17))
        );
        assert_eq!(
            curve.cumulative_cost(cap * 2.0, cap * 4.0),
            Err(Error::LevelTooHigh(cap * 2.0))
        );
    }

    #[test]
    fn monotonic_in_target() {
        let curve = CurveParameters::default();
        let mut last = 0.0;
        for to in 2..400 {
            let total = curve.cumulative_cost(1.0, f64::from(to)).unwrap();
            assert!(total > last, "not increasing at {to}");
            last = total;
        }
    }

    #[test]
    fn decreasing_in_start() {
        let curve = CurveParameters::default();
        let wide = curve.cumulative_cost(3.0, 90.0).unwrap();
        let narrow = curve.cumulative_cost(4.0, 90.0).unwrap();
        assert!(wide > narrow);
    }

    #[test]
    fn additive_over_split_ranges() {
        let curve = CurveParameters::default();
        for (a, b, c) in [(1.0, 2.0, 3.0), (1.0, 37.25, 80.0), (12.0, 12.0, 500.0)] {
            let whole = curve.cumulative_cost(a, c).unwrap();
            let split = curve.cumulative_cost(a, b).unwrap() + curve.cumulative_cost(b, c).unwrap();
            assert!(close(whole, split, 1e-9), "{a} {b} {c}");
        }
    }

    #[test]
    fn cumulative_exponent_tracks_exponent() {
        let curve = CurveParameters::new(2.0, 1.25).unwrap();
        assert_eq!(curve.cumulative_exponent(), 2.25);
    }

    #[test]
    fn rejects_bad_constants() {
        assert_eq!(
            CurveParameters::new(0.0, 1.0),
            Err(Error::InvalidCoefficient(0.0))
        );
        assert_eq!(
            CurveParameters::new(1.0, -2.0),
            Err(Error::InvalidExponent(-2.0))
        );
        assert!(CurveParameters::new(f64::INFINITY, 1.0).is_err());
    }
}
