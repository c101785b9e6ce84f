use std::error::Error as _;

/// Represents the ways a prediction round-trip can fail.
///
/// The `Display` output is the message shown to the user, so every variant
/// renders as a single readable line.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// One or more fields were unset, non-numeric or out of range. Detected locally.
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// The request never produced a response (refused, DNS, timeout, reset)
    #[error("Network error: {0}")]
    NetworkError(String),
    /// The service answered with a non-2xx status
    #[error("Request failed: {status_code}")]
    HttpError { status_code: u16 },
    /// The service answered 2xx but the body was not a prediction
    #[error("Invalid response: {0}")]
    DecodeError(String),
}

impl ClientError {
    /// True when the error was raised before any network traffic
    pub fn is_local(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }
}

/// Flattens an error and its sources into `outer: inner: root`
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::DecodeError(describe(&err))
        } else {
            ClientError::NetworkError(describe(&err))
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::DecodeError(err.to_string())
    }
}
