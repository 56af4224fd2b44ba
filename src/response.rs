//! Response Shaping Module
//!
//! Builds the JSON envelope returned for every calculation request. Exactly
//! one of `data` or `errors` is present, and neither when the body itself
//! could not be read.

use crate::{PaymentResult, ValidationErrorSet};
use serde::Serialize;

pub const SUCCESS_MESSAGE: &str = "Loan calculated successfully.";
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PaymentResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrorSet>,
}

impl CalculationResponse {
    /// Successful calculation. Figures are rounded to cents here, at the boundary.
    pub fn success(result: &PaymentResult) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            data: Some(result.rounded()),
            errors: None,
        }
    }

    pub fn validation_failed(errors: ValidationErrorSet) -> Self {
        Self {
            success: false,
            message: VALIDATION_FAILED_MESSAGE.to_string(),
            data: None,
            errors: Some(errors),
        }
    }

    /// Body could not be decoded. Built by the transport, never by the engine.
    pub fn invalid_body(detail: &str) -> Self {
        Self {
            success: false,
            message: format!("Invalid request body: {}", detail),
            data: None,
            errors: None,
        }
    }
}
