use serde::Serialize;

use crate::{CurveParameters, Error, MAX_LEVEL, curve::validate_level};

// pow/root round trips land a few ulps off whole levels
const SNAP_TOLERANCE: f64 = 8.0 * f64::EPSILON;

/// A level with partial progress toward the next one. Always between 1 and [`MAX_LEVEL`].
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Serialize)]
#[serde(transparent)]
pub struct FractionalLevel(f64);

impl FractionalLevel {
    /// # Errors
    /// If `level` is below 1, above [`MAX_LEVEL`] or not finite.
    pub fn new(level: f64) -> Result<Self, Error> {
        validate_level(level).map(Self)
    }

    #[must_use]
    #[inline]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// The last whole level reached. Exact, since the level never exceeds [`MAX_LEVEL`].
    #[must_use]
    #[inline]
    pub fn reached(self) -> u64 {
        self.0.floor() as u64
    }

    /// Progress toward the next whole level, in `0.0..1.0`.
    #[must_use]
    #[inline]
    pub fn progress(self) -> f64 {
        self.0.fract()
    }
}

/// Where a quantity of XP lands when added at some starting level.
///
/// `consumed` is the closed-form XP needed to get from `start` to the last whole
/// level reached, and `leftover` is whatever remains of `xp` after that.
#[derive(Copy, Clone, PartialEq, Debug, Serialize)]
pub struct Progress {
    start: f64,
    xp: f64,
    level: FractionalLevel,
    consumed: f64,
    leftover: f64,
}

impl Progress {
    #[must_use]
    pub const fn start(&self) -> f64 {
        self.start
    }

    #[must_use]
    pub const fn xp(&self) -> f64 {
        self.xp
    }

    #[must_use]
    pub const fn level(&self) -> FractionalLevel {
        self.level
    }

    #[must_use]
    pub fn reached(&self) -> u64 {
        self.level.reached()
    }

    #[must_use]
    pub const fn consumed(&self) -> f64 {
        self.consumed
    }

    #[must_use]
    pub const fn leftover(&self) -> f64 {
        self.leftover
    }
}

impl CurveParameters {
    /// Solve [`CurveParameters::cumulative_cost`] for its upper bound: the level reached
    /// after adding `xp` at `start`.
    /// # Errors
    /// If `start` is not a valid level or `xp` is negative. [`Error::LevelTooHigh`] if the
    /// XP would carry the level past [`MAX_LEVEL`].
    pub fn level_after_adding_xp(&self, start: f64, xp: f64) -> Result<FractionalLevel, Error> {
        validate_level(start)?;
        validate_xp(xp)?;
        let exponent = self.cumulative_exponent();
        let base = start.powf(exponent);
        // never take a fractional root of anything below the starting point
        let operand = (base + xp * exponent / self.coefficient()).max(base);
        let level = operand.powf(exponent.recip());
        if !level.is_finite() {
            return Err(Error::InvalidXp(xp));
        }
        let level = snap_to_whole(level).max(start);
        if level > MAX_LEVEL as f64 {
            return Err(Error::LevelTooHigh(level));
        }
        Ok(FractionalLevel(level))
    }

    /// Like [`CurveParameters::level_after_adding_xp`], but also reports how much of the XP
    /// was spent on whole levels and how much is left over.
    /// # Errors
    /// Same as [`CurveParameters::level_after_adding_xp`].
    pub fn progress(&self, start: f64, xp: f64) -> Result<Progress, Error> {
        let level = self.level_after_adding_xp(start, xp)?;
        let whole = level.get().floor().max(start);
        let consumed = self.cumulative_cost(start, whole)?.min(xp);
        Ok(Progress {
            start,
            xp,
            level,
            consumed,
            leftover: (xp - consumed).max(0.0),
        })
    }
}

fn snap_to_whole(level: f64) -> f64 {
    let nearest = level.round();
    if (level - nearest).abs() <= SNAP_TOLERANCE * nearest {
        nearest
    } else {
        level
    }
}

pub(crate) fn validate_xp(xp: f64) -> Result<f64, Error> {
    if xp.is_finite() && xp >= 0.0 {
        Ok(xp)
    } else {
        Err(Error::InvalidXp(xp))
    }
}
