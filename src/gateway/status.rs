use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::gateway::error::GatewayError;

/// Transaction status as reported by the gateway.
///
/// Codes follow the gateway contract. A code outside this table is an error,
/// see [`GatewayError::UnknownStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    NotFinished,
    Authorized,
    PaymentConfirmed,
    Denied,
    Voided,
    Refunded,
    Pending,
    Aborted,
    Scheduled,
}

impl Status {
    pub fn code(self) -> i64 {
        match self {
            Self::NotFinished => 0,
            Self::Authorized => 1,
            Self::PaymentConfirmed => 2,
            Self::Denied => 3,
            Self::Voided => 10,
            Self::Refunded => 11,
            Self::Pending => 12,
            Self::Aborted => 13,
            Self::Scheduled => 20,
        }
    }
}

impl TryFrom<i64> for Status {
    type Error = GatewayError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        let status = match code {
            0 => Self::NotFinished,
            1 => Self::Authorized,
            2 => Self::PaymentConfirmed,
            3 => Self::Denied,
            10 => Self::Voided,
            11 => Self::Refunded,
            12 => Self::Pending,
            13 => Self::Aborted,
            20 => Self::Scheduled,
            other => return Err(GatewayError::UnknownStatus(other)),
        };
        Ok(status)
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NotFinished => "not finished",
            Self::Authorized => "authorized",
            Self::PaymentConfirmed => "payment confirmed",
            Self::Denied => "denied",
            Self::Voided => "voided",
            Self::Refunded => "refunded",
            Self::Pending => "pending",
            Self::Aborted => "aborted",
            Self::Scheduled => "scheduled",
        };
        f.write_str(name)
    }
}
