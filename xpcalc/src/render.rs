use std::collections::HashMap;

use tera::{Tera, Value};

use crate::{Error, Report};

const REPORT_TEMPLATE_NAME: &str = "report.html";
const REPORT_TEMPLATE: &str = include_str!("../templates/report.html");

/// Turns a [`Report`] into the HTML results fragment shown under the calculator form.
#[derive(Debug, Clone)]
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// # Errors
    /// If the built-in template fails to compile.
    pub fn new() -> Result<Self, Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(REPORT_TEMPLATE_NAME, REPORT_TEMPLATE)?;
        tera.autoescape_on(vec![".html"]);
        tera.register_filter("localize", localize);
        tera.register_filter("percent", percent);
        Ok(Self { tera })
    }

    /// # Errors
    /// If tera has a problem.
    pub fn render(&self, report: &Report) -> Result<String, Error> {
        let ctx = tera::Context::from_serialize(report)?;
        Ok(self.tera.render(REPORT_TEMPLATE_NAME, &ctx)?)
    }
}

/// Group thousands with commas and keep at most two decimals, trimming trailing zeros.
#[must_use]
pub fn group_thousands(num: f64) -> String {
    let fixed = format!("{:.2}", num.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');
    let mut out = String::with_capacity(fixed.len() + whole.len() / 3 + 1);
    if num.is_sign_negative() && fixed != "0.00" {
        out.push('-');
    }
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[allow(clippy::unnecessary_wraps)]
fn localize(v: &Value, _hm: &HashMap<String, Value>) -> tera::Result<Value> {
    let Some(num) = v.as_f64() else {
        return Ok(v.clone());
    };
    Ok(Value::String(group_thousands(num)))
}

#[allow(clippy::unnecessary_wraps)]
fn percent(v: &Value, _hm: &HashMap<String, Value>) -> tera::Result<Value> {
    let Some(fraction) = v.as_f64() else {
        return Ok(v.clone());
    };
    Ok(Value::String(format!("{}%", group_thousands(fraction * 100.0))))
}

#[cfg(test)]
mod tests {
    use xpcurve::{CurrencyConversionSettings, CurveParameters};

    use super::*;
    use crate::{CalculationRequest, Calculator, Config, Mode};

    fn render(calculator: &Calculator, request: CalculationRequest) -> String {
        let report = calculator.calculate(&request).unwrap();
        Renderer::new().unwrap().render(&report).unwrap()
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1_000.0), "1,000");
        assert_eq!(group_thousands(1_234_567.891), "1,234,567.89");
        assert_eq!(group_thousands(26_666.666_666), "26,666.67");
        assert_eq!(group_thousands(-1_327.0), "-1,327");
        assert_eq!(group_thousands(-0.001), "0");
        assert_eq!(group_thousands(12.5), "12.5");
    }

    #[test]
    fn required_summary_and_drift_note() {
        let calculator = Calculator::from(Config::default());
        let html = render(
            &calculator,
            CalculationRequest::new(1, Mode::ToLevel { target: 50 }),
        );
        assert!(html.contains(
            "Total XP required to go from level 1 to level 50: 49,386 XP (closed-form)"
        ));
        assert!(html.contains(
            "Per-level rounded sum = 48,059 XP. Difference vs closed-form: -1,327 XP."
        ));
        assert!(html.contains("<li><span>Level 1 → 2</span><strong>3 XP</strong></li>"));
        assert!(html.contains("<li><span>Level 49 → 50</span>"));
        assert!(!html.contains("suppressed"));
    }

    #[test]
    fn suppressed_breakdown_notice() {
        let calculator = Calculator::from(Config::default());
        let html = render(
            &calculator,
            CalculationRequest::new(1, Mode::ByLevels { levels: 600 }),
        );
        assert!(html.contains("Breakdown suppressed for ranges &gt; 500 levels. (600 levels requested)"));
        assert!(!html.contains("<strong>"));
    }

    #[test]
    fn taxed_currency_line() {
        let calculator = Calculator::new(
            CurveParameters::default(),
            CurrencyConversionSettings::new(20_000.0, 0.25, true).unwrap(),
            xpcurve::DEFAULT_MAX_ENTRIES,
        );
        let html = render(
            &calculator,
            CalculationRequest::new(1, Mode::ByXp { xp: 1_000_000.0 }),
        );
        assert!(html.contains("Currency: 26,666.67 (25% tax)"), "{html}");
        assert!(html.contains("Adding 1,000,000 XP at level 1 reaches level"));
    }

    #[test]
    fn kill_summary() {
        let calculator = Calculator::from(Config::default());
        let html = render(
            &calculator,
            CalculationRequest::new(
                10,
                Mode::KillTax {
                    victim_level: 50,
                    tax_rate: 0.2,
                },
            ),
        );
        assert!(html.contains("Defeating a level 50 player is worth 49,386 XP"));
        assert!(html.contains("lost to 20% tax"));
    }

    #[test]
    fn unpriceable_currency_notice() {
        let calculator = Calculator::new(
            CurveParameters::default(),
            CurrencyConversionSettings::new(20_000.0, 1.0, true).unwrap(),
            xpcurve::DEFAULT_MAX_ENTRIES,
        );
        let reached = render(
            &calculator,
            CalculationRequest::new(10, Mode::ByXp { xp: 5_000.0 }),
        );
        assert!(reached.contains("Adding 5,000 XP at level 10 reaches level"));
        assert!(reached.contains(
            "Currency: unavailable, nothing bought under a 100% tax ever arrives."
        ));
        let required = render(
            &calculator,
            CalculationRequest::new(1, Mode::ToLevel { target: 2 }),
        );
        assert!(required.contains("Total XP required to go from level 1 to level 2: 7 XP"));
        assert!(required.contains("Cost: unavailable"));
    }

    #[test]
    fn no_breakdown_without_level_up() {
        let calculator = Calculator::from(Config::default());
        let html = render(&calculator, CalculationRequest::new(10, Mode::ByXp { xp: 1.0 }));
        assert!(html.contains("reaches level 10"));
        assert!(html.contains("Leftover: 1 XP"));
        assert!(!html.contains("breakdown"));
    }
}
