#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::cast_precision_loss)]
//! The experience calculator behind the results page: pick a mode, validate the
//! inputs, run the curve math from [`xpcurve`], and render what comes back.

mod calculator;
mod config;
mod error;
mod render;
mod request;

pub use calculator::{Calculator, Landing, Outcome, Report};
pub use config::{
    BreakdownConfig, COEFFICIENT_VAR, Config, EXPONENT_VAR, MAX_BREAKDOWN_VAR, RATE_VAR,
    TAX_ENABLED_VAR, TAX_RATE_VAR, XP_PER_UNIT_VAR,
};
pub use error::Error;
pub use render::{Renderer, group_thousands};
pub use request::{CalculationRequest, Mode};

#[macro_use]
extern crate tracing;
