use crate::{config::LimitsConfig, LoanField, LoanRequest, RawLoanInput, ValidationErrorSet};
use serde_json::Value;
use tracing::debug;

pub const PRINCIPAL_MESSAGE: &str = "Principal must be a positive number.";
pub const INTEREST_RATE_MESSAGE: &str = "Interest rate must be zero or a positive number.";
pub const PERIOD_MESSAGE: &str = "Loan period must be a positive integer.";

pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Validate raw loan parameters
    ///
    /// Returns the typed request when every field is valid, otherwise the set
    /// of all failing fields. Never stops at the first failure.
    pub fn validate(&self, input: &RawLoanInput) -> Result<LoanRequest, ValidationErrorSet> {
        let mut errors = ValidationErrorSet::new();

        let principal = self.check_principal(input.principal.as_ref());
        let interest_rate = self.check_interest_rate(input.interest_rate.as_ref());
        let period_in_years = self.check_period(input.period_in_years.as_ref());

        for (field, outcome) in [
            (LoanField::Principal, principal.as_ref().err()),
            (LoanField::InterestRate, interest_rate.as_ref().err()),
            (LoanField::PeriodInYears, period_in_years.as_ref().err()),
        ] {
            if let Some(message) = outcome {
                debug!("Field {} rejected: {}", field, message);
                errors.insert(field, message.clone());
            }
        }

        match (principal, interest_rate, period_in_years) {
            (Ok(principal), Ok(interest_rate), Ok(period_in_years)) => {
                Ok(LoanRequest::new(principal, interest_rate, period_in_years))
            }
            _ => Err(errors),
        }
    }

    fn check_principal(&self, value: Option<&Value>) -> Result<f64, String> {
        let principal = parse_number(value)
            .filter(|p| *p > 0.0)
            .ok_or_else(|| PRINCIPAL_MESSAGE.to_string())?;

        if principal > self.limits.max_principal {
            return Err(format!("Principal must not exceed {}.", self.limits.max_principal));
        }
        Ok(principal)
    }

    fn check_interest_rate(&self, value: Option<&Value>) -> Result<f64, String> {
        let rate = parse_number(value)
            .filter(|r| *r >= 0.0)
            .ok_or_else(|| INTEREST_RATE_MESSAGE.to_string())?;

        if rate > self.limits.max_interest_rate {
            return Err(format!(
                "Interest rate must not exceed {}%.",
                self.limits.max_interest_rate
            ));
        }
        // Normalize -0.0 so the calculator's zero-rate branch sees 0.0.
        Ok(rate + 0.0)
    }

    fn check_period(&self, value: Option<&Value>) -> Result<u32, String> {
        let years = parse_number(value)
            .filter(|y| *y >= 1.0 && y.fract() == 0.0)
            .ok_or_else(|| PERIOD_MESSAGE.to_string())?;

        if years > f64::from(self.limits.max_period_in_years) {
            return Err(format!(
                "Loan period must not exceed {} years.",
                self.limits.max_period_in_years
            ));
        }
        Ok(years as u32)
    }
}

/// Accepts JSON numbers and numeric strings; anything non-finite is rejected.
fn parse_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}
