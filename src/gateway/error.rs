use std::fmt::Display;

use serde::de::Error;

/// Single entry of the error list the gateway returns with 4xx responses.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "Code")]
    pub code: i64,
    #[serde(rename = "Message")]
    pub message: String,
}

impl Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// Why the gateway could not be reached or did not answer.
#[derive(Debug, thiserror::Error)]
pub enum Unavailable {
    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("server error {status}")]
    Server { status: u16, body: String },
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request could not be built. Nothing was sent.
    #[error("request serialization: {0}")]
    Serialization(String),
    /// Transport failure, timeout or 5xx. Retry with the same request id.
    #[error("gateway unavailable: {0}")]
    Unavailable(#[from] Unavailable),
    /// 4xx answer. The request must be fixed before sending it again.
    #[error("gateway rejected request with status {status}: {}", join(.errors))]
    Rejected {
        status: u16,
        errors: Vec<ErrorDetail>,
    },
    /// The gateway reported a status code this client does not know.
    #[error("unknown transaction status code {0}")]
    UnknownStatus(i64),
    #[error("gateway response deserialization: {0}")]
    Deserialization(#[source] serde_json::Error),
}

fn join(errors: &[ErrorDetail]) -> String {
    if errors.is_empty() {
        return "no details".to_string();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl GatewayError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// The request may have reached the gateway but no answer came back.
    ///
    /// Such a call must only be retried with the same request id.
    pub fn outcome_unknown(&self) -> bool {
        match self {
            Self::Unavailable(Unavailable::Connect(_)) => false,
            Self::Unavailable(_) | Self::Deserialization(_) | Self::UnknownStatus(_) => true,
            Self::Serialization(_) | Self::Rejected { .. } => false,
        }
    }

    /// Error codes the gateway attached to a rejection.
    pub fn gateway_codes(&self) -> Vec<i64> {
        match self {
            Self::Rejected { errors, .. } => errors.iter().map(|e| e.code).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            return Self::Deserialization(serde_json::Error::custom(
                "failed to decode response body",
            ));
        }
        if value.is_builder() {
            return Self::Serialization(value.to_string());
        }
        let reason = if value.is_timeout() {
            Unavailable::Timeout(value)
        } else if value.is_connect() {
            Unavailable::Connect(value)
        } else {
            Unavailable::Transport(value)
        };
        Self::Unavailable(reason)
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(value: serde_json::Error) -> Self {
        Self::Deserialization(value)
    }
}
