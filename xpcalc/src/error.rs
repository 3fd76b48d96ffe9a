#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Curve error: {0}")]
    Curve(#[from] xpcurve::Error),
    #[error("Tera error: {0}")]
    Template(#[from] tera::Error),
    #[error("Config parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse environment variable {0} as UTF-8")]
    UnparsableEnv(String),
    #[error("Could not parse environment variable {0}: {1}")]
    FromStr(String, Box<dyn std::error::Error + Send + Sync>),
    #[error("Levels start at 1!")]
    LevelBelowOne,
    #[error("Target level {target} must be above the current level {current}!")]
    TargetNotAboveCurrent { current: u64, target: u64 },
    #[error("You must gain at least one level!")]
    ZeroLevels,
    #[error("That many levels would overflow!")]
    LevelOverflow,
    #[error("{field} must be a finite, non-negative number, not {value}")]
    InvalidInput { field: &'static str, value: f64 },
    #[error("Tax rate must be between 0 and 1, not {0}")]
    TaxOutOfRange(f64),
}
