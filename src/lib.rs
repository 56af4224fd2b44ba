//! This crate implements a loan payment calculator: input validation, annuity
//! based payment derivation, the JSON response contract, an HTTP server that
//! exposes it, and a client that drives the loan form's submission flow.

pub mod types; // Wire and domain types shared by every component.
pub mod error; // Crate error type for configuration, transport and client failures.
pub mod config; // Defines and loads service configuration.
pub mod logging; // Tracing subscriber setup.
pub mod validation; // Field-by-field validation of raw loan input.
pub mod calculator; // Yearly, monthly and weekly payment derivation.
pub mod response; // Success and failure response envelopes.
pub mod engine; // Validation → calculation → response pipeline.
pub mod api; // HTTP endpoint in front of the engine.
pub mod client; // Form client and its submission state machine.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use engine::LoanEngine;
pub use error::{LoanError, Result};
pub use response::CalculationResponse;
