use std::num::NonZeroU64;

use serde::Serialize;

use crate::{CurveParameters, Error, MAX_LEVEL};

/// Largest breakdown the calculator itemizes unless told otherwise.
pub const DEFAULT_MAX_ENTRIES: NonZeroU64 = NonZeroU64::new(500).unwrap();

/// Whole levels `from..to`, never empty.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct LevelRange {
    from: u64,
    to: u64,
}

impl LevelRange {
    /// # Errors
    /// If `from` is 0, `to` is above [`MAX_LEVEL`], or `to` is not above `from`.
    pub fn new(from: u64, to: u64) -> Result<Self, Error> {
        if from == 0 {
            return Err(Error::InvalidLevel(0.0));
        }
        if to > MAX_LEVEL {
            return Err(Error::LevelTooHigh(to as f64));
        }
        if to <= from {
            return Err(Error::InvalidRange {
                from: from as f64,
                to: to as f64,
            });
        }
        Ok(Self { from, to })
    }

    #[must_use]
    pub const fn from(&self) -> u64 {
        self.from
    }

    #[must_use]
    pub const fn to(&self) -> u64 {
        self.to
    }

    /// How many level-ups the range spans.
    #[must_use]
    pub const fn levels(&self) -> u64 {
        self.to - self.from
    }
}

/// One row of a breakdown: the rounded XP to go from `from` to `to`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
pub struct PerLevelEntry {
    pub from: u64,
    pub to: u64,
    pub xp: u64,
}

/// Every level of a range, itemized, with the rounded closed-form total alongside.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct BreakdownResult {
    range: LevelRange,
    entries: Vec<PerLevelEntry>,
    rounded_sum: u64,
    closed_form: u64,
    difference: i64,
}

impl BreakdownResult {
    #[must_use]
    pub const fn range(&self) -> LevelRange {
        self.range
    }

    #[must_use]
    pub fn entries(&self) -> &[PerLevelEntry] {
        &self.entries
    }

    /// Sum of every rounded entry.
    #[must_use]
    pub const fn rounded_sum(&self) -> u64 {
        self.rounded_sum
    }

    /// The closed-form total for the same range, rounded.
    #[must_use]
    pub const fn closed_form(&self) -> u64 {
        self.closed_form
    }

    /// `rounded_sum - closed_form`. Usually nonzero, the stepped sum trails the integral.
    #[must_use]
    pub const fn difference(&self) -> i64 {
        self.difference
    }

    #[must_use]
    pub const fn has_drift(&self) -> bool {
        self.rounded_sum != self.closed_form
    }
}

/// A breakdown, or the reason there isn't one.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Breakdown {
    Itemized(BreakdownResult),
    /// The range asked for more rows than `max_entries` allows.
    Suppressed {
        range: LevelRange,
        requested: u64,
        max_entries: u64,
        closed_form: u64,
    },
}

impl Breakdown {
    #[must_use]
    pub const fn range(&self) -> LevelRange {
        match self {
            Self::Itemized(result) => result.range,
            Self::Suppressed { range, .. } => *range,
        }
    }

    #[must_use]
    pub const fn closed_form(&self) -> u64 {
        match self {
            Self::Itemized(result) => result.closed_form,
            Self::Suppressed { closed_form, .. } => *closed_form,
        }
    }

    #[must_use]
    pub const fn itemized(&self) -> Option<&BreakdownResult> {
        match self {
            Self::Itemized(result) => Some(result),
            Self::Suppressed { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppressed { .. })
    }
}

impl CurveParameters {
    /// Itemize `range` one level at a time, unless that would take more than
    /// `max_entries` rows.
    /// # Errors
    /// [`Error::XpOverflow`] if a rounded total does not fit in whole XP.
    pub fn build_breakdown(
        &self,
        range: LevelRange,
        max_entries: NonZeroU64,
    ) -> Result<Breakdown, Error> {
        let closed_form =
            whole_xp(self.integral_at(range.to as f64) - self.integral_at(range.from as f64))?;
        if range.levels() > max_entries.get() {
            return Ok(Breakdown::Suppressed {
                range,
                requested: range.levels(),
                max_entries: max_entries.get(),
                closed_form,
            });
        }
        let entries = (range.from..range.to)
            .map(|level| {
                Ok(PerLevelEntry {
                    from: level,
                    to: level + 1,
                    xp: whole_xp(self.cost_of_level(level as f64))?,
                })
            })
            .collect::<Result<Vec<PerLevelEntry>, Error>>()?;
        let rounded_sum = entries.iter().try_fold(0_u64, |sum, entry| {
            sum.checked_add(entry.xp)
                .ok_or_else(|| Error::XpOverflow(sum as f64 + entry.xp as f64))
        })?;
        let difference = signed_xp(rounded_sum)? - signed_xp(closed_form)?;
        Ok(Breakdown::Itemized(BreakdownResult {
            range,
            entries,
            rounded_sum,
            closed_form,
            difference,
        }))
    }
}

/// Round to whole XP, refusing anything that does not fit.
fn whole_xp(xp: f64) -> Result<u64, Error> {
    let rounded = xp.round();
    // u64::MAX as f64 rounds up to 2^64, which is already out of range
    if (0.0..u64::MAX as f64).contains(&rounded) {
        Ok(rounded as u64)
    } else {
        Err(Error::XpOverflow(xp))
    }
}

fn signed_xp(xp: u64) -> Result<i64, Error> {
    i64::try_from(xp).map_err(|_| Error::XpOverflow(xp as f64))
}
