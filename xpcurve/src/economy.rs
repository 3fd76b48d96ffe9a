//! Conversion between XP and the in-game currency, and the tax rules on both.
//!
//! Tax is always taken from what the recipient receives. Grossing up is the exact
//! inverse: the amount a payer must hand over so that, after tax, the recipient
//! ends up with the net amount they wanted.

use serde::{Deserialize, Serialize};

use crate::{CurveParameters, Error, Progress, curve::validate_level, inverse::validate_xp};

/// Exchange rates are quoted per this many XP.
pub const XP_PER_UNIT: f64 = 1_000_000.0;
/// Observed currency price of [`XP_PER_UNIT`] XP.
pub const DEFAULT_RATE_PER_UNIT_XP: f64 = 20_000.0;

/// Exchange rate and tax setup for currency conversions.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawConversionSettings")]
pub struct CurrencyConversionSettings {
    rate_per_unit_xp: f64,
    xp_per_unit: f64,
    tax_rate: f64,
    tax_enabled: bool,
}

#[derive(Deserialize)]
struct RawConversionSettings {
    #[serde(default = "default_rate")]
    rate_per_unit_xp: f64,
    #[serde(default = "default_xp_per_unit")]
    xp_per_unit: f64,
    #[serde(default)]
    tax_rate: f64,
    #[serde(default)]
    tax_enabled: bool,
}

const fn default_rate() -> f64 {
    DEFAULT_RATE_PER_UNIT_XP
}

const fn default_xp_per_unit() -> f64 {
    XP_PER_UNIT
}

impl TryFrom<RawConversionSettings> for CurrencyConversionSettings {
    type Error = Error;

    fn try_from(value: RawConversionSettings) -> Result<Self, Self::Error> {
        Self::new(value.rate_per_unit_xp, value.tax_rate, value.tax_enabled)?
            .with_xp_per_unit(value.xp_per_unit)
    }
}

impl Default for CurrencyConversionSettings {
    fn default() -> Self {
        Self {
            rate_per_unit_xp: DEFAULT_RATE_PER_UNIT_XP,
            xp_per_unit: XP_PER_UNIT,
            tax_rate: 0.0,
            tax_enabled: false,
        }
    }
}

impl CurrencyConversionSettings {
    /// `tax_rate` is clamped into `0.0..=1.0`, and ignored entirely unless `tax_enabled`.
    /// # Errors
    /// If `rate_per_unit_xp` is not a finite number above zero.
    pub fn new(rate_per_unit_xp: f64, tax_rate: f64, tax_enabled: bool) -> Result<Self, Error> {
        Ok(Self {
            rate_per_unit_xp: validate_rate(rate_per_unit_xp)?,
            xp_per_unit: XP_PER_UNIT,
            tax_rate: clamp_tax(tax_rate),
            tax_enabled,
        })
    }

    /// Quote the exchange rate per some other quantity of XP.
    /// # Errors
    /// If `xp_per_unit` is not a finite number above zero.
    pub fn with_xp_per_unit(self, xp_per_unit: f64) -> Result<Self, Error> {
        Ok(Self {
            xp_per_unit: validate_rate(xp_per_unit)?,
            ..self
        })
    }

    #[must_use]
    pub const fn rate_per_unit_xp(&self) -> f64 {
        self.rate_per_unit_xp
    }

    #[must_use]
    pub const fn xp_per_unit(&self) -> f64 {
        self.xp_per_unit
    }

    #[must_use]
    pub const fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    #[must_use]
    pub const fn tax_enabled(&self) -> bool {
        self.tax_enabled
    }

    /// The tax rate that actually applies, zero when tax is switched off.
    #[must_use]
    pub const fn effective_tax_rate(&self) -> f64 {
        if self.tax_enabled { self.tax_rate } else { 0.0 }
    }

    /// Currency a payer must supply for the recipient to end up with `xp`.
    /// # Errors
    /// If `xp` is negative or not finite, or tax is enabled at exactly 100%.
    pub fn xp_to_currency(&self, xp: f64) -> Result<f64, Error> {
        let gross = validate_xp(xp)? / self.xp_per_unit * self.rate_per_unit_xp;
        gross_up_cost(gross, self.effective_tax_rate())
    }

    /// XP the recipient ends up with when `amount` currency is spent.
    /// # Errors
    /// If `amount` is negative or not finite.
    pub fn currency_to_xp(&self, amount: f64) -> Result<f64, Error> {
        if !(amount.is_finite() && amount >= 0.0) {
            return Err(Error::InvalidAmount(amount));
        }
        let received = deduct_from_received(amount, self.effective_tax_rate());
        Ok(received / self.rate_per_unit_xp * self.xp_per_unit)
    }
}

/// What the recipient keeps of `amount` after tax.
#[must_use]
pub fn deduct_from_received(amount: f64, tax_rate: f64) -> f64 {
    amount * (1.0 - clamp_tax(tax_rate))
}

/// What a payer must hand over so that [`deduct_from_received`] leaves exactly `net`.
/// # Errors
/// [`Error::DegenerateTax`] when the tax rate is 100%.
pub fn gross_up_cost(net: f64, tax_rate: f64) -> Result<f64, Error> {
    let tax_rate = clamp_tax(tax_rate);
    if tax_rate >= 1.0 {
        return Err(Error::DegenerateTax);
    }
    Ok(net / (1.0 - tax_rate))
}

/// Tax taken straight out of an XP transfer, with no currency involved.
#[must_use]
pub fn apply_flat_tax(xp: f64, tax_rate: f64) -> f64 {
    deduct_from_received(xp, tax_rate)
}

/// The result of absorbing a defeated player's progression, minus tax.
#[derive(Copy, Clone, PartialEq, Debug, Serialize)]
pub struct KillTransfer {
    victim_level: f64,
    victim_xp: f64,
    tax_rate: f64,
    net_xp: f64,
    progress: Progress,
}

impl KillTransfer {
    #[must_use]
    pub const fn victim_level(&self) -> f64 {
        self.victim_level
    }

    /// Everything the victim earned from level 1.
    #[must_use]
    pub const fn victim_xp(&self) -> f64 {
        self.victim_xp
    }

    #[must_use]
    pub const fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    /// XP lost to tax on the way.
    #[must_use]
    pub fn taxed(&self) -> f64 {
        self.victim_xp - self.net_xp
    }

    #[must_use]
    pub const fn net_xp(&self) -> f64 {
        self.net_xp
    }

    /// Where the actor ends up after receiving [`KillTransfer::net_xp`].
    #[must_use]
    pub const fn progress(&self) -> Progress {
        self.progress
    }
}

impl CurveParameters {
    /// Hand the victim's full progression to the actor, after a flat tax.
    /// # Errors
    /// If either level is below 1 or not finite.
    pub fn kill_transfer(
        &self,
        actor_level: f64,
        victim_level: f64,
        tax_rate: f64,
    ) -> Result<KillTransfer, Error> {
        validate_level(actor_level)?;
        let victim_xp = self.cumulative_cost(1.0, victim_level)?;
        let tax_rate = clamp_tax(tax_rate);
        let net_xp = apply_flat_tax(victim_xp, tax_rate);
        Ok(KillTransfer {
            victim_level,
            victim_xp,
            tax_rate,
            net_xp,
            progress: self.progress(actor_level, net_xp)?,
        })
    }
}

fn clamp_tax(tax_rate: f64) -> f64 {
    if tax_rate.is_nan() {
        0.0
    } else {
        tax_rate.clamp(0.0, 1.0)
    }
}

fn validate_rate(rate: f64) -> Result<f64, Error> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(Error::InvalidExchangeRate(rate))
    }
}
