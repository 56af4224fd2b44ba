use crate::{LoanField, PaymentResult, RawLoanInput};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("float prefix pattern is valid")
});

static INT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+").expect("int prefix pattern is valid"));

pub type FieldErrors = BTreeMap<LoanField, String>;

/// Where a form is in its submission lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Idle,
    Submitting,
    Succeeded { message: String, result: PaymentResult },
    Failed { message: String, errors: FieldErrors },
}

/// Result of one round trip to the calculate endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Succeeded { message: String, result: PaymentResult },
    Failed { message: String, errors: FieldErrors },
}

/// Figures shown after a successful calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanSummary {
    pub weekly_payment: f64,
    pub monthly_payment: f64,
    pub yearly_payment: f64,
    pub total_repayment: f64,
    pub total_interest: f64,
}

/// The loan form: raw field text plus submission state.
#[derive(Debug, Clone)]
pub struct LoanForm {
    principal: String,
    interest_rate: String,
    period_in_years: String,
    state: FormState,
    /// Principal and term as parsed when the current submission started.
    submitted: Option<(f64, i64)>,
}

impl Default for LoanForm {
    fn default() -> Self {
        Self {
            principal: "0".to_string(),
            interest_rate: "0".to_string(),
            period_in_years: "0".to_string(),
            state: FormState::Idle,
            submitted: None,
        }
    }
}

impl LoanForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == FormState::Submitting
    }

    pub fn field(&self, field: LoanField) -> &str {
        match field {
            LoanField::Principal => &self.principal,
            LoanField::InterestRate => &self.interest_rate,
            LoanField::PeriodInYears => &self.period_in_years,
        }
    }

    /// Store new text for a field and drop any shown message or result.
    ///
    /// Edits while a submission is in flight keep the `Submitting` state so
    /// that the pending response still lands.
    pub fn set_field(&mut self, field: LoanField, value: impl Into<String>) {
        let value = value.into();
        match field {
            LoanField::Principal => self.principal = value,
            LoanField::InterestRate => self.interest_rate = value,
            LoanField::PeriodInYears => self.period_in_years = value,
        }
        if !self.is_submitting() {
            self.state = FormState::Idle;
        }
    }

    /// Enter `Submitting` and build the request payload.
    ///
    /// Returns `None` when a submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<RawLoanInput> {
        if self.is_submitting() {
            debug!("Submit ignored: calculation already in flight");
            return None;
        }
        self.state = FormState::Submitting;

        let principal = parse_float(&self.principal);
        let years = parse_int(&self.period_in_years);
        self.submitted = principal.zip(years);

        Some(RawLoanInput {
            principal: Some(number_or_null(principal)),
            interest_rate: Some(number_or_null(parse_float(&self.interest_rate))),
            period_in_years: Some(integer_or_null(years)),
        })
    }

    /// Apply the outcome of the in-flight submission. Ignored when nothing
    /// is in flight.
    pub fn complete(&mut self, outcome: SubmitOutcome) {
        if !self.is_submitting() {
            debug!("Discarding outcome: no submission in flight");
            return;
        }
        self.state = match outcome {
            SubmitOutcome::Succeeded { message, result } => FormState::Succeeded { message, result },
            SubmitOutcome::Failed { message, errors } => FormState::Failed { message, errors },
        };
    }

    /// Message to display, if any.
    pub fn message(&self) -> Option<&str> {
        match &self.state {
            FormState::Succeeded { message, .. } | FormState::Failed { message, .. } => {
                Some(message.as_str())
            }
            FormState::Idle | FormState::Submitting => None,
        }
    }

    pub fn field_error(&self, field: LoanField) -> Option<&str> {
        match &self.state {
            FormState::Failed { errors, .. } => errors.get(&field).map(String::as_str),
            _ => None,
        }
    }

    /// Payments plus totals over the whole term, once a calculation succeeded.
    pub fn summary(&self) -> Option<LoanSummary> {
        let FormState::Succeeded { result, .. } = &self.state else {
            return None;
        };

        // Edits made while the request was in flight don't reach the totals.
        let (principal, years) = self.submitted?;
        let total_repayment = result.yearly_payment * years as f64;

        Some(LoanSummary {
            weekly_payment: result.weekly_payment,
            monthly_payment: result.monthly_payment,
            yearly_payment: result.yearly_payment,
            total_repayment,
            total_interest: total_repayment - principal,
        })
    }
}

/// Longest leading decimal literal, ignoring leading whitespace; `None`
/// where a browser would produce `NaN` or an infinity.
fn parse_float(text: &str) -> Option<f64> {
    let matched = FLOAT_PREFIX.find(text.trim_start())?;
    let value: f64 = matched.as_str().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Leading base-10 integer, ignoring leading whitespace.
fn parse_int(text: &str) -> Option<i64> {
    let matched = INT_PREFIX.find(text.trim_start())?;
    matched.as_str().parse().ok()
}

fn number_or_null(value: Option<f64>) -> Value {
    value.map(Value::from).unwrap_or(Value::Null)
}

fn integer_or_null(value: Option<i64>) -> Value {
    value.map(Value::from).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_result() -> PaymentResult {
        PaymentResult {
            weekly_payment: 19.23,
            monthly_payment: 83.33,
            yearly_payment: 1000.0,
        }
    }

    fn filled_form(principal: &str, rate: &str, period: &str) -> LoanForm {
        let mut form = LoanForm::new();
        form.set_field(LoanField::Principal, principal);
        form.set_field(LoanField::InterestRate, rate);
        form.set_field(LoanField::PeriodInYears, period);
        form
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float("12.5"), Some(12.5));
        assert_eq!(parse_float("  3e2xyz"), Some(300.0));
        assert_eq!(parse_float(".5"), Some(0.5));
        assert_eq!(parse_float("-7."), Some(-7.0));
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float("Infinity"), None);
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int("10"), Some(10));
        assert_eq!(parse_int("10.9"), Some(10));
        assert_eq!(parse_int(" -3 years"), Some(-3));
        assert_eq!(parse_int("x5"), None);
    }

    #[test]
    fn test_begin_submit_builds_payload() {
        let mut form = filled_form("10000", "5.5", "10.7");
        let payload = form.begin_submit().unwrap();

        assert_eq!(payload.principal, Some(json!(10000.0)));
        assert_eq!(payload.interest_rate, Some(json!(5.5)));
        assert_eq!(payload.period_in_years, Some(json!(10)));
        assert_eq!(form.state(), &FormState::Submitting);
    }

    #[test]
    fn test_unparseable_fields_become_null() {
        let mut form = filled_form("", "n/a", "soon");
        let payload = form.begin_submit().unwrap();

        assert_eq!(payload.principal, Some(Value::Null));
        assert_eq!(payload.interest_rate, Some(Value::Null));
        assert_eq!(payload.period_in_years, Some(Value::Null));
    }

    #[test]
    fn test_submit_is_ignored_while_submitting() {
        let mut form = filled_form("1000", "5", "2");
        assert!(form.begin_submit().is_some());
        assert!(form.begin_submit().is_none());
        assert!(form.is_submitting());
    }

    #[test]
    fn test_success_transition_and_summary() {
        let mut form = filled_form("5000", "0", "5");
        form.begin_submit().unwrap();
        form.complete(SubmitOutcome::Succeeded {
            message: "Loan calculated successfully.".to_string(),
            result: sample_result(),
        });

        assert_eq!(form.message(), Some("Loan calculated successfully."));
        let summary = form.summary().unwrap();
        assert_eq!(summary.yearly_payment, 1000.0);
        assert_eq!(summary.total_repayment, 5000.0);
        assert_eq!(summary.total_interest, 0.0);

        // A new submission is allowed once the previous one finished.
        assert!(form.begin_submit().is_some());
    }

    #[test]
    fn test_failure_transition_exposes_field_errors() {
        let mut form = filled_form("-100", "5", "5");
        form.begin_submit().unwrap();

        let mut errors = FieldErrors::new();
        errors.insert(LoanField::Principal, "Principal must be a positive number.".to_string());
        form.complete(SubmitOutcome::Failed {
            message: "Validation failed.".to_string(),
            errors,
        });

        assert_eq!(form.message(), Some("Validation failed."));
        assert_eq!(
            form.field_error(LoanField::Principal),
            Some("Principal must be a positive number.")
        );
        assert_eq!(form.field_error(LoanField::InterestRate), None);
        assert!(form.summary().is_none());
    }

    #[test]
    fn test_editing_clears_result() {
        let mut form = filled_form("5000", "0", "5");
        form.begin_submit().unwrap();
        form.complete(SubmitOutcome::Succeeded {
            message: "ok".to_string(),
            result: sample_result(),
        });

        form.set_field(LoanField::Principal, "6000");
        assert_eq!(form.state(), &FormState::Idle);
        assert!(form.message().is_none());
        assert!(form.summary().is_none());
    }

    #[test]
    fn test_editing_during_submit_keeps_submitting() {
        let mut form = filled_form("5000", "0", "5");
        form.begin_submit().unwrap();
        form.set_field(LoanField::Principal, "6000");
        assert!(form.is_submitting());
    }

    #[test]
    fn test_summary_uses_submitted_values() {
        let mut form = filled_form("5000", "0", "5");
        form.begin_submit().unwrap();
        form.set_field(LoanField::Principal, "6000");
        form.set_field(LoanField::PeriodInYears, "7");
        form.complete(SubmitOutcome::Succeeded {
            message: "ok".to_string(),
            result: sample_result(),
        });

        let summary = form.summary().unwrap();
        assert_eq!(summary.total_repayment, 5000.0);
        assert_eq!(summary.total_interest, 0.0);
        assert_eq!(form.field(LoanField::Principal), "6000");
    }

    #[test]
    fn test_outcome_without_submission_is_discarded() {
        let mut form = LoanForm::new();
        form.complete(SubmitOutcome::Succeeded {
            message: "late".to_string(),
            result: sample_result(),
        });
        assert_eq!(form.state(), &FormState::Idle);
    }
}
