use crate::{LoanRequest, PaymentResult};

pub const MONTHS_PER_YEAR: f64 = 12.0;
pub const WEEKS_PER_YEAR: f64 = 52.0;

/// Compute the payment figures for a validated loan
///
/// # Formula
/// With `r = interest_rate / 100` and `n = period_in_years`:
/// - `r == 0`: `yearly = principal / n`
/// - `r > 0`: `yearly = principal * r / (1 - (1 + r)^-n)`
///
/// `monthly = yearly / 12` and `weekly = yearly / 52`. No rounding happens
/// here; figures are rounded to cents when the response is shaped.
pub fn calculate(request: &LoanRequest) -> PaymentResult {
    let principal = request.principal();
    let rate = request.interest_rate() / 100.0;
    let years = f64::from(request.period_in_years());

    debug_assert!(principal.is_finite() && principal > 0.0);
    debug_assert!(rate.is_finite() && rate >= 0.0);
    debug_assert!(years >= 1.0);

    let yearly_payment = if rate == 0.0 {
        principal / years
    } else {
        principal * rate / annuity_denominator(rate, years)
    };

    PaymentResult {
        weekly_payment: yearly_payment / WEEKS_PER_YEAR,
        monthly_payment: yearly_payment / MONTHS_PER_YEAR,
        yearly_payment,
    }
}

/// `1 - (1 + rate)^-years`, evaluated through `ln_1p`/`exp_m1` so that tiny
/// positive rates don't collapse to zero.
fn annuity_denominator(rate: f64, years: f64) -> f64 {
    -(-years * rate.ln_1p()).exp_m1()
}
