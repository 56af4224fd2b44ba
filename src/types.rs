use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The three caller-supplied loan fields, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LoanField {
    Principal,
    InterestRate,
    PeriodInYears,
}

impl LoanField {
    pub const ALL: [LoanField; 3] = [
        LoanField::Principal,
        LoanField::InterestRate,
        LoanField::PeriodInYears,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanField::Principal => "principal",
            LoanField::InterestRate => "interestRate",
            LoanField::PeriodInYears => "periodInYears",
        }
    }
}

impl fmt::Display for LoanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LoanField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or(())
    }
}

/// Loan parameters as received, before validation
///
/// Fields are kept as raw JSON so that an absent, `null` or non-numeric value
/// is reported as a field error rather than rejected as a malformed body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLoanInput {
    pub principal: Option<Value>,
    pub interest_rate: Option<Value>,
    pub period_in_years: Option<Value>,
}

impl RawLoanInput {
    pub fn get(&self, field: LoanField) -> Option<&Value> {
        match field {
            LoanField::Principal => self.principal.as_ref(),
            LoanField::InterestRate => self.interest_rate.as_ref(),
            LoanField::PeriodInYears => self.period_in_years.as_ref(),
        }
    }
}

/// A validated loan request
///
/// Only the validator can build one, so holding a `LoanRequest` means every
/// field is inside the accepted domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanRequest {
    principal: f64,
    interest_rate: f64,
    period_in_years: u32,
}

impl LoanRequest {
    pub(crate) fn new(principal: f64, interest_rate: f64, period_in_years: u32) -> Self {
        Self {
            principal,
            interest_rate,
            period_in_years,
        }
    }

    /// Amount borrowed, in currency units.
    pub fn principal(&self) -> f64 {
        self.principal
    }

    /// Nominal annual rate, in percent.
    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    pub fn period_in_years(&self) -> u32 {
        self.period_in_years
    }
}

/// Per-field validation messages. Only failing fields have an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrorSet {
    errors: BTreeMap<LoanField, String>,
}

impl ValidationErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: LoanField, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn get(&self, field: LoanField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: LoanField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = LoanField> + '_ {
        self.errors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LoanField, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for ValidationErrorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrorSet {}

/// Periodic payment figures derived from a `LoanRequest`
///
/// Monthly and weekly amounts are the yearly installment split evenly, not
/// separately compounded schedules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub weekly_payment: f64,
    pub monthly_payment: f64,
    pub yearly_payment: f64,
}

impl PaymentResult {
    /// Copy with every figure rounded to cents, for display.
    pub fn rounded(&self) -> Self {
        Self {
            weekly_payment: round_to_cents(self.weekly_payment),
            monthly_payment: round_to_cents(self.monthly_payment),
            yearly_payment: round_to_cents(self.yearly_payment),
        }
    }

    /// Sum of all yearly installments over the term.
    pub fn total_repayment(&self, request: &LoanRequest) -> f64 {
        self.yearly_payment * f64::from(request.period_in_years())
    }

    pub fn total_interest(&self, request: &LoanRequest) -> f64 {
        self.total_repayment(request) - request.principal()
    }
}

pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
