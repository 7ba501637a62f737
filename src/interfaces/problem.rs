use crate::error::OnboardingError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Structured failure description handed back to a client, modelled on
/// RFC 9457 problem details.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetail {
    pub status: u16,
    pub title: String,
    pub detail: String,
    pub timestamp: DateTime<Utc>,
    pub instance: String,
}

impl ProblemDetail {
    /// Maps an onboarding failure to its client-facing description.
    ///
    /// Unexpected failures get a generic detail; their cause stays in the logs.
    pub fn from_error(err: &OnboardingError, instance: impl Into<String>) -> Self {
        let (status, title, detail) = match err {
            OnboardingError::ValidationFailed(msg) => (400, "Invalid Data", msg.clone()),
            OnboardingError::DuplicateCustomer(msg) => (409, "Customer conflict", msg.clone()),
            OnboardingError::Unexpected(_) => (
                500,
                "Internal Server Error",
                "An unexpected error occurred.".to_string(),
            ),
        };

        Self {
            status,
            title: title.to_string(),
            detail,
            timestamp: Utc::now(),
            instance: instance.into(),
        }
    }
}
