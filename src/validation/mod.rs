//! Loan Input Validation Module
//!
//! This module checks raw loan parameters before any payment is derived.
//! Every field is checked independently so the caller sees all problems at once.

mod validator;
pub use validator::{
    Validator,
    PRINCIPAL_MESSAGE,
    INTEREST_RATE_MESSAGE,
    PERIOD_MESSAGE,
};
