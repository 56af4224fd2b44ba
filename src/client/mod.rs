//! Form Client Module
//!
//! Client side of the calculate endpoint. `LoanForm` holds what the user
//! typed and walks the submission state machine
//! `Idle → Submitting → {Succeeded, Failed}`; `FormClient` performs the HTTP
//! call and maps every outcome, including transport failures, onto that
//! machine.

mod form;
mod http;

pub use form::{FieldErrors, FormState, LoanForm, LoanSummary, SubmitOutcome};
pub use http::{FormClient, DEFAULT_SERVER_URL, GENERIC_ERROR_MESSAGE};
