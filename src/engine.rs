//! Loan Engine Module
//!
//! Runs the pipeline validator → calculator → response shaper. The engine
//! holds no mutable state, so one instance can be shared by every request
//! handler without locking.

use crate::{
    calculator::calculate,
    config::LimitsConfig,
    response::CalculationResponse,
    validation::Validator,
    RawLoanInput,
};
use tracing::{info, warn};

pub struct LoanEngine {
    validator: Validator,
}

impl LoanEngine {
    pub fn new(limits: LimitsConfig) -> Self {
        Self {
            validator: Validator::new(limits),
        }
    }

    /// Validate the input and, if it is valid, compute its payments.
    pub fn process(&self, input: &RawLoanInput) -> CalculationResponse {
        match self.validator.validate(input) {
            Ok(request) => {
                let result = calculate(&request);
                info!(
                    principal = request.principal(),
                    interest_rate = request.interest_rate(),
                    period_in_years = request.period_in_years(),
                    yearly_payment = result.yearly_payment,
                    total_interest = result.total_interest(&request),
                    "Loan calculated"
                );
                CalculationResponse::success(&result)
            }
            Err(errors) => {
                warn!("Loan request rejected: {}", errors);
                CalculationResponse::validation_failed(errors)
            }
        }
    }
}

impl Default for LoanEngine {
    fn default() -> Self {
        Self::new(LimitsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LoanField;
    use serde_json::json;

    #[test]
    fn test_valid_request_yields_data() {
        let input = RawLoanInput {
            principal: Some(json!(5000)),
            interest_rate: Some(json!(0)),
            period_in_years: Some(json!(5)),
        };
        let response = LoanEngine::default().process(&input);

        assert!(response.success);
        assert!(response.errors.is_none());
        let data = response.data.unwrap();
        assert_eq!(data.yearly_payment, 1000.0);
        assert_eq!(data.monthly_payment, 83.33);
        assert_eq!(data.weekly_payment, 19.23);
    }

    #[test]
    fn test_invalid_request_yields_errors() {
        let input = RawLoanInput {
            principal: Some(json!(-100)),
            interest_rate: Some(json!(5)),
            period_in_years: Some(json!(5)),
        };
        let response = LoanEngine::default().process(&input);

        assert!(!response.success);
        assert!(response.data.is_none());
        let errors = response.errors.unwrap();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![LoanField::Principal]);
    }
}
