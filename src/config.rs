//! Client configuration.
//!
//! Everything the client needs is passed in a [`ClientConfig`] at
//! construction. [`ClientConfig::from_env`] builds one from the process
//! environment (and a `.env` file when present).

use std::{fmt::Debug, str::FromStr, time::Duration};

pub const MERCHANT_ID_VAR: &str = "CIELO_MERCHANT_ID";
pub const MERCHANT_KEY_VAR: &str = "CIELO_MERCHANT_KEY";
pub const ENVIRONMENT_VAR: &str = "CIELO_ENVIRONMENT";
pub const TIMEOUT_VAR: &str = "CIELO_TIMEOUT_SECS";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Base URLs of the transactional and the query API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api: String,
    pub query: String,
}

impl Endpoints {
    pub fn new(api: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            api: trim_slash(api.into()),
            query: trim_slash(query.into()),
        }
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
    /// Any other deployment of the API, e.g. a local mock.
    Custom(Endpoints),
}

impl Environment {
    const SANDBOX_API: &str = "https://apisandbox.cieloecommerce.cielo.com.br";
    const SANDBOX_QUERY: &str = "https://apiquerysandbox.cieloecommerce.cielo.com.br";
    const PRODUCTION_API: &str = "https://api.cieloecommerce.cielo.com.br";
    const PRODUCTION_QUERY: &str = "https://apiquery.cieloecommerce.cielo.com.br";

    pub fn endpoints(&self) -> Endpoints {
        match self {
            Self::Sandbox => Endpoints::new(Self::SANDBOX_API, Self::SANDBOX_QUERY),
            Self::Production => Endpoints::new(Self::PRODUCTION_API, Self::PRODUCTION_QUERY),
            Self::Custom(endpoints) => endpoints.clone(),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown environment {other:?}")),
        }
    }
}

/// Merchant credentials sent with every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Merchant {
    id: String,
    key: String,
}

impl Merchant {
    pub fn new(id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Debug for Merchant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Merchant")
            .field("id", &self.id)
            .field("key", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: Environment,
    pub merchant: Merchant,
    /// Applied to every call unless overridden with
    /// [`CieloGateway::with_timeout`](crate::CieloGateway::with_timeout).
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(environment: Environment, merchant: Merchant) -> Self {
        Self {
            environment,
            merchant,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read configuration from the process environment, loading `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(p) => tracing::debug!(path = %p.display(), "Loaded environment variables from .env file"),
            Err(e) => tracing::debug!("No environment variables loaded from .env: {e}"),
        };
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let id = lookup(MERCHANT_ID_VAR).ok_or(ConfigError::Missing(MERCHANT_ID_VAR))?;
        let key = lookup(MERCHANT_KEY_VAR).ok_or(ConfigError::Missing(MERCHANT_KEY_VAR))?;
        let environment = match lookup(ENVIRONMENT_VAR) {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: ENVIRONMENT_VAR,
                value,
            })?,
            None => Environment::default(),
        };
        let timeout = match lookup(TIMEOUT_VAR) {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: TIMEOUT_VAR,
                        value,
                    });
                }
            },
            None => DEFAULT_TIMEOUT,
        };
        Ok(Self::new(environment, Merchant::new(id, key)).with_timeout(timeout))
    }
}
