use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::gateway::{
    Result,
    error::{ErrorDetail, GatewayError, Unavailable},
};

/// Error body shapes seen on 4xx answers.
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    List(Vec<ErrorDetail>),
    Single(ErrorDetail),
}

impl From<ErrorBody> for Vec<ErrorDetail> {
    fn from(value: ErrorBody) -> Self {
        match value {
            ErrorBody::List(errors) => errors,
            ErrorBody::Single(error) => vec![error],
        }
    }
}

/// Classify a gateway answer by HTTP status and parse its body.
///
/// 2xx bodies are parsed as `T`. A denial arrives here as a 2xx with a denied
/// status and is not an error. 4xx become [`GatewayError::Rejected`] and 5xx
/// [`Unavailable::Server`].
pub fn interpret<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T> {
    if status.is_success() {
        return Ok(serde_json::from_slice(body)?);
    }
    if status.is_client_error() {
        let errors = serde_json::from_slice::<ErrorBody>(body)
            .map(Vec::from)
            .unwrap_or_else(|_| Vec::new());
        return Err(GatewayError::Rejected {
            status: status.as_u16(),
            errors,
        });
    }
    Err(Unavailable::Server {
        status: status.as_u16(),
        body: String::from_utf8_lossy(body).into_owned(),
    }
    .into())
}
