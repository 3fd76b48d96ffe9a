use std::{num::NonZeroU64, time::Instant};

use serde::Serialize;
use xpcurve::{Breakdown, CurrencyConversionSettings, CurveParameters, LevelRange, Progress};

use crate::{CalculationRequest, Config, Error, Mode};

/// Runs [`CalculationRequest`]s against one curve and economy setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculator {
    curve: CurveParameters,
    economy: CurrencyConversionSettings,
    max_entries: NonZeroU64,
}

/// Where a quantity of XP leaves the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Landing {
    /// Fractional level after the XP is added.
    pub level: f64,
    /// Last whole level reached.
    pub reached: u64,
    /// Progress toward `reached + 1`, out of 100.
    pub percent: f64,
    /// XP beyond `reached`.
    pub leftover: f64,
}

impl From<Progress> for Landing {
    fn from(progress: Progress) -> Self {
        let level = progress.level();
        Self {
            level: level.get(),
            reached: level.reached(),
            percent: level.progress() * 100.0,
            leftover: progress.leftover(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// XP needed to go from the current level to `target`, and what that XP costs.
    /// `currency` is `None` when a 100% tax means no amount could ever buy it.
    Required {
        target: u64,
        xp: f64,
        currency: Option<f64>,
    },
    /// Where `xp` lands. `currency` is what that XP is worth at the current exchange rate
    /// (`None` under a 100% tax), or what was spent on it.
    Reached {
        xp: f64,
        currency: Option<f64>,
        landing: Landing,
    },
    /// Where a taxed kill transfer lands.
    Kill {
        victim_level: u64,
        victim_xp: f64,
        tax_rate: f64,
        taxed: f64,
        net_xp: f64,
        landing: Landing,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub request: CalculationRequest,
    pub outcome: Outcome,
    pub tax_enabled: bool,
    pub tax_rate: f64,
    /// Per-level listing over the levels actually crossed, if any were.
    pub breakdown: Option<Breakdown>,
}

impl From<Config> for Calculator {
    fn from(config: Config) -> Self {
        Self::new(config.curve, config.economy, config.breakdown.max_entries)
    }
}

impl Calculator {
    #[must_use]
    pub const fn new(
        curve: CurveParameters,
        economy: CurrencyConversionSettings,
        max_entries: NonZeroU64,
    ) -> Self {
        Self {
            curve,
            economy,
            max_entries,
        }
    }

    #[must_use]
    pub const fn curve(&self) -> &CurveParameters {
        &self.curve
    }

    #[must_use]
    pub const fn economy(&self) -> &CurrencyConversionSettings {
        &self.economy
    }

    /// Validate `request` and work it out.
    /// # Errors
    /// If the request is invalid, or the result lies beyond what the curve can represent.
    pub fn calculate(&self, request: &CalculationRequest) -> Result<Report, Error> {
        let start = Instant::now();
        debug!(
            mode = request.mode.label(),
            level = request.current_level,
            "Starting calculation"
        );
        request.validate()?;
        let current = request.current_level;

        let (outcome, crossed) = match request.mode {
            Mode::ToLevel { target } => self.required(current, target)?,
            Mode::ByLevels { levels } => {
                let target = current.checked_add(levels).ok_or(Error::LevelOverflow)?;
                self.required(current, target)?
            }
            Mode::ByXp { xp } => {
                let progress = self.curve.progress(current as f64, xp)?;
                let currency = self.price(xp)?;
                Self::reached(xp, currency, progress)
            }
            Mode::ByCurrency { amount } => {
                let xp = self.economy.currency_to_xp(amount)?;
                let progress = self.curve.progress(current as f64, xp)?;
                Self::reached(xp, Some(amount), progress)
            }
            Mode::KillTax {
                victim_level,
                tax_rate,
            } => {
                let transfer =
                    self.curve
                        .kill_transfer(current as f64, victim_level as f64, tax_rate)?;
                let landing = Landing::from(transfer.progress());
                (
                    Outcome::Kill {
                        victim_level,
                        victim_xp: transfer.victim_xp(),
                        tax_rate: transfer.tax_rate(),
                        taxed: transfer.taxed(),
                        net_xp: transfer.net_xp(),
                        landing,
                    },
                    landing.reached,
                )
            }
        };

        let breakdown = LevelRange::new(current, crossed)
            .ok()
            .map(|range| self.breakdown(range))
            .transpose()?;

        debug!(
            micros_taken = start.elapsed().as_micros(),
            "Finished calculation"
        );
        Ok(Report {
            request: *request,
            outcome,
            tax_enabled: self.economy.tax_enabled(),
            tax_rate: self.economy.effective_tax_rate(),
            breakdown,
        })
    }

    fn required(&self, current: u64, target: u64) -> Result<(Outcome, u64), Error> {
        let xp = self.curve.cumulative_cost(current as f64, target as f64)?;
        let currency = self.price(xp)?;
        Ok((
            Outcome::Required {
                target,
                xp,
                currency,
            },
            target,
        ))
    }

    /// What `xp` costs to buy, or `None` if a 100% tax makes it unbuyable.
    fn price(&self, xp: f64) -> Result<Option<f64>, Error> {
        match self.economy.xp_to_currency(xp) {
            Ok(currency) => Ok(Some(currency)),
            Err(xpcurve::Error::DegenerateTax) => {
                debug!(xp, "XP cannot be priced at a 100% tax");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn reached(xp: f64, currency: Option<f64>, progress: Progress) -> (Outcome, u64) {
        let landing = Landing::from(progress);
        (
            Outcome::Reached {
                xp,
                currency,
                landing,
            },
            landing.reached,
        )
    }

    fn breakdown(&self, range: LevelRange) -> Result<Breakdown, Error> {
        let breakdown = self.curve.build_breakdown(range, self.max_entries)?;
        match &breakdown {
            Breakdown::Suppressed {
                requested,
                max_entries,
                ..
            } => debug!(requested, max_entries, "Breakdown suppressed"),
            Breakdown::Itemized(result) if result.has_drift() => trace!(
                difference = result.difference(),
                rounded_sum = result.rounded_sum(),
                closed_form = result.closed_form(),
                "Per-level sum drifted from closed form"
            ),
            Breakdown::Itemized(_) => {}
        }
        Ok(breakdown)
    }
}
