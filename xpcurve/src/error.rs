#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Level {0} is not a finite number of at least 1")]
    InvalidLevel(f64),
    #[error("Level {0} is above the highest supported level")]
    LevelTooHigh(f64),
    #[error("Level range {from} to {to} is reversed or empty")]
    InvalidRange { from: f64, to: f64 },
    #[error("XP amount {0} must be finite and non-negative")]
    InvalidXp(f64),
    #[error("{0} XP is too much to count in whole XP")]
    XpOverflow(f64),
    #[error("Currency amount {0} must be finite and non-negative")]
    InvalidAmount(f64),
    #[error("A 100% tax cannot be grossed up, the payer would never receive anything")]
    DegenerateTax,
    #[error("Curve coefficient {0} must be finite and greater than zero")]
    InvalidCoefficient(f64),
    #[error("Curve exponent {0} must be finite and greater than zero")]
    InvalidExponent(f64),
    #[error("Exchange rate {0} must be finite and greater than zero")]
    InvalidExchangeRate(f64),
}
