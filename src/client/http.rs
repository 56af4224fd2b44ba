use super::form::{FieldErrors, FormState, LoanForm, SubmitOutcome};
use crate::{
    api::CALCULATE_PATH,
    error::Result,
    response::SUCCESS_MESSAGE,
    LoanField,
    PaymentResult,
    RawLoanInput,
};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while calculating the loan.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the calculate endpoint.
#[derive(Debug, Clone)]
pub struct FormClient {
    http: reqwest::Client,
    base_url: String,
}

impl FormClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn calculate_url(&self) -> String {
        format!("{}{}", self.base_url, CALCULATE_PATH)
    }

    /// Run one submission of `form`
    ///
    /// Does nothing (and returns the current state) when the form already
    /// has a submission in flight.
    pub async fn submit<'a>(&self, form: &'a mut LoanForm) -> &'a FormState {
        let Some(payload) = form.begin_submit() else {
            return form.state();
        };

        let outcome = self.request(&payload).await;
        form.complete(outcome);
        form.state()
    }

    /// Post `payload` and map the reply onto a `SubmitOutcome`. Never fails:
    /// anything without a usable body becomes the generic error message.
    pub async fn request(&self, payload: &RawLoanInput) -> SubmitOutcome {
        let url = self.calculate_url();
        debug!("Posting loan request to {}", url);

        let response = match self.http.post(&url).json(payload).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Loan request to {} failed: {}", url, e);
                return generic_failure();
            }
        };

        let status = response.status();
        let body = match response.json::<Value>().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Unreadable response from {} (HTTP {}): {}", url, status, e);
                return generic_failure();
            }
        };

        // Each envelope field is read on its own; a mistyped one is treated
        // as absent instead of discarding the rest of the body.
        let message = body.get("message").and_then(Value::as_str).map(str::to_string);
        let succeeded = status.is_success() && body.get("success").and_then(Value::as_bool) == Some(true);
        let result = succeeded
            .then(|| body.get("data").cloned())
            .flatten()
            .and_then(|data| serde_json::from_value::<PaymentResult>(data).ok());

        match result {
            Some(result) => {
                info!("Loan calculated: yearly payment {:.2}", result.yearly_payment);
                SubmitOutcome::Succeeded {
                    message: message.unwrap_or_else(|| SUCCESS_MESSAGE.to_string()),
                    result,
                }
            }
            None => {
                info!("Loan calculation rejected (HTTP {})", status);
                SubmitOutcome::Failed {
                    message: message.unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
                    errors: field_errors(body.get("errors").and_then(Value::as_object)),
                }
            }
        }
    }
}

impl Default for FormClient {
    fn default() -> Self {
        let http = http_client().unwrap_or_else(|e| {
            warn!("Falling back to a client without request timeout: {}", e);
            reqwest::Client::new()
        });
        Self {
            http,
            base_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()
}

fn generic_failure() -> SubmitOutcome {
    SubmitOutcome::Failed {
        message: GENERIC_ERROR_MESSAGE.to_string(),
        errors: FieldErrors::new(),
    }
}

/// Keep only entries naming a known field with a string message.
fn field_errors(errors: Option<&Map<String, Value>>) -> FieldErrors {
    errors
        .into_iter()
        .flatten()
        .filter_map(|(key, value)| {
            let field = key.parse::<LoanField>().ok()?;
            let message = value.as_str()?.to_string();
            Some((field, message))
        })
        .collect()
}
