use serde::{Deserialize, Serialize};

use crate::Error;

/// What the user wants to know, relative to their current level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Mode {
    /// XP (and currency) needed to reach `target`.
    ToLevel { target: u64 },
    /// XP (and currency) needed to gain `levels` levels.
    ByLevels { levels: u64 },
    /// Where adding `xp` lands.
    ByXp { xp: f64 },
    /// Where spending `amount` currency on XP lands.
    ByCurrency { amount: f64 },
    /// Where absorbing a level `victim_level` player's progression lands, after tax.
    KillTax { victim_level: u64, tax_rate: f64 },
}

impl Mode {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ToLevel { .. } => "to_level",
            Self::ByLevels { .. } => "by_levels",
            Self::ByXp { .. } => "by_xp",
            Self::ByCurrency { .. } => "by_currency",
            Self::KillTax { .. } => "kill_tax",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub current_level: u64,
    #[serde(flatten)]
    pub mode: Mode,
}

impl CalculationRequest {
    #[must_use]
    pub const fn new(current_level: u64, mode: Mode) -> Self {
        Self {
            current_level,
            mode,
        }
    }

    /// The level a required-XP request aims for, if it is one.
    /// # Errors
    /// If the target is not above the current level, or would overflow.
    pub fn target(&self) -> Result<Option<u64>, Error> {
        match self.mode {
            Mode::ToLevel { target } => {
                if target <= self.current_level {
                    return Err(Error::TargetNotAboveCurrent {
                        current: self.current_level,
                        target,
                    });
                }
                Ok(Some(target))
            }
            Mode::ByLevels { levels } => {
                if levels == 0 {
                    return Err(Error::ZeroLevels);
                }
                self.current_level
                    .checked_add(levels)
                    .map(Some)
                    .ok_or(Error::LevelOverflow)
            }
            Mode::ByXp { .. } | Mode::ByCurrency { .. } | Mode::KillTax { .. } => Ok(None),
        }
    }

    /// Reject anything the curve math would choke on or that makes no sense to ask.
    /// # Errors
    /// The first problem found with the request.
    pub fn validate(&self) -> Result<(), Error> {
        if self.current_level == 0 {
            return Err(Error::LevelBelowOne);
        }
        self.target()?;
        match self.mode {
            Mode::ToLevel { .. } | Mode::ByLevels { .. } => {}
            Mode::ByXp { xp } => non_negative("xp", xp)?,
            Mode::ByCurrency { amount } => non_negative("amount", amount)?,
            Mode::KillTax {
                victim_level,
                tax_rate,
            } => {
                if victim_level == 0 {
                    return Err(Error::LevelBelowOne);
                }
                if !(0.0..=1.0).contains(&tax_rate) {
                    return Err(Error::TaxOutOfRange(tax_rate));
                }
            }
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), Error> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidInput { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_requests() {
        for mode in [
            Mode::ToLevel { target: 2 },
            Mode::ByLevels { levels: 1 },
            Mode::ByXp { xp: 0.0 },
            Mode::ByCurrency { amount: 12.5 },
            Mode::KillTax {
                victim_level: 1,
                tax_rate: 1.0,
            },
        ] {
            assert!(CalculationRequest::new(1, mode).validate().is_ok(), "{mode:?}");
        }
    }

    #[test]
    fn level_zero() {
        let request = CalculationRequest::new(0, Mode::ByXp { xp: 1.0 });
        assert!(matches!(request.validate(), Err(Error::LevelBelowOne)));
        let request = CalculationRequest::new(
            4,
            Mode::KillTax {
                victim_level: 0,
                tax_rate: 0.0,
            },
        );
        assert!(matches!(request.validate(), Err(Error::LevelBelowOne)));
    }

    #[test]
    fn target_must_be_above_current() {
        let request = CalculationRequest::new(10, Mode::ToLevel { target: 10 });
        assert!(matches!(
            request.validate(),
            Err(Error::TargetNotAboveCurrent {
                current: 10,
                target: 10
            })
        ));
    }

    #[test]
    fn by_levels_target() {
        let request = CalculationRequest::new(10, Mode::ByLevels { levels: 5 });
        assert_eq!(request.target().unwrap(), Some(15));
        let zero = CalculationRequest::new(10, Mode::ByLevels { levels: 0 });
        assert!(matches!(zero.validate(), Err(Error::ZeroLevels)));
        let overflow = CalculationRequest::new(u64::MAX, Mode::ByLevels { levels: 1 });
        assert!(matches!(overflow.validate(), Err(Error::LevelOverflow)));
    }

    #[test]
    fn rejects_bad_amounts() {
        for mode in [
            Mode::ByXp { xp: -1.0 },
            Mode::ByXp { xp: f64::NAN },
            Mode::ByCurrency {
                amount: f64::INFINITY,
            },
        ] {
            assert!(matches!(
                CalculationRequest::new(3, mode).validate(),
                Err(Error::InvalidInput { .. })
            ));
        }
        let taxed = CalculationRequest::new(
            3,
            Mode::KillTax {
                victim_level: 9,
                tax_rate: 1.5,
            },
        );
        assert!(matches!(taxed.validate(), Err(Error::TaxOutOfRange(_))));
    }
}
