use std::{env::VarError, num::NonZeroU64, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};
use xpcurve::{CurrencyConversionSettings, CurveParameters, DEFAULT_MAX_ENTRIES};

use crate::Error;

pub const COEFFICIENT_VAR: &str = "XPCALC_CURVE_COEFFICIENT";
pub const EXPONENT_VAR: &str = "XPCALC_CURVE_EXPONENT";
pub const RATE_VAR: &str = "XPCALC_RATE_PER_UNIT_XP";
pub const XP_PER_UNIT_VAR: &str = "XPCALC_XP_PER_UNIT";
pub const TAX_RATE_VAR: &str = "XPCALC_TAX_RATE";
pub const TAX_ENABLED_VAR: &str = "XPCALC_TAX_ENABLED";
pub const MAX_BREAKDOWN_VAR: &str = "XPCALC_MAX_BREAKDOWN";

/// Everything a [`Calculator`](crate::Calculator) can be tuned with. Each section and
/// field is optional in TOML, missing ones fall back to the game's observed values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub curve: CurveParameters,
    pub economy: CurrencyConversionSettings,
    pub breakdown: BreakdownConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakdownConfig {
    pub max_entries: NonZeroU64,
}

impl Default for BreakdownConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl Config {
    /// # Errors
    /// If the TOML is malformed or holds out-of-range values.
    pub fn from_toml_str(input: &str) -> Result<Self, Error> {
        Ok(toml::from_str(input)?)
    }

    /// # Errors
    /// If the file cannot be read, or [`Config::from_toml_str`] fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        debug!(path = %path.display(), "Loaded calculator config");
        Ok(config)
    }

    /// Apply any `XPCALC_*` environment variables on top of this config.
    /// # Errors
    /// If a variable is set but cannot be parsed, or produces invalid settings.
    pub fn with_env_overrides(self) -> Result<Self, Error> {
        self.with_overrides(get_var_opt)
    }

    /// Same as [`Config::with_env_overrides`], reading variables through `lookup`.
    /// # Errors
    /// Same as [`Config::with_env_overrides`].
    pub fn with_overrides<F>(self, lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Result<Option<String>, Error>,
    {
        let coefficient: Option<f64> = parse_opt(&lookup, COEFFICIENT_VAR)?;
        let exponent: Option<f64> = parse_opt(&lookup, EXPONENT_VAR)?;
        let curve = if coefficient.is_some() || exponent.is_some() {
            debug!(?coefficient, ?exponent, "Overriding curve from environment");
            CurveParameters::new(
                coefficient.unwrap_or(self.curve.coefficient()),
                exponent.unwrap_or(self.curve.exponent()),
            )?
        } else {
            self.curve
        };

        let rate: Option<f64> = parse_opt(&lookup, RATE_VAR)?;
        let xp_per_unit: Option<f64> = parse_opt(&lookup, XP_PER_UNIT_VAR)?;
        let tax_rate: Option<f64> = parse_opt(&lookup, TAX_RATE_VAR)?;
        let tax_enabled: Option<bool> = parse_opt(&lookup, TAX_ENABLED_VAR)?;
        let economy = if rate.is_some()
            || xp_per_unit.is_some()
            || tax_rate.is_some()
            || tax_enabled.is_some()
        {
            debug!(
                ?rate,
                ?xp_per_unit,
                ?tax_rate,
                ?tax_enabled,
                "Overriding economy from environment"
            );
            CurrencyConversionSettings::new(
                rate.unwrap_or(self.economy.rate_per_unit_xp()),
                tax_rate.unwrap_or(self.economy.tax_rate()),
                tax_enabled.unwrap_or(self.economy.tax_enabled()),
            )?
            .with_xp_per_unit(xp_per_unit.unwrap_or(self.economy.xp_per_unit()))?
        } else {
            self.economy
        };

        let max_entries: Option<NonZeroU64> = parse_opt(&lookup, MAX_BREAKDOWN_VAR)?;
        if let Some(max_entries) = max_entries {
            debug!(max_entries = max_entries.get(), "Overriding breakdown cap from environment");
        }
        let breakdown = BreakdownConfig {
            max_entries: max_entries.unwrap_or(self.breakdown.max_entries),
        };

        Ok(Self {
            curve,
            economy,
            breakdown,
        })
    }
}

fn get_var_opt(name: &str) -> Result<Option<String>, Error> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(Error::UnparsableEnv(name.to_owned())),
    }
}

fn parse_opt<T, F>(lookup: &F, name: &str) -> Result<Option<T>, Error>
where
    F: Fn(&str) -> Result<Option<String>, Error>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(name)?
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| Error::FromStr(name.to_owned(), Box::new(e)))
        })
        .transpose()
}
