use std::{fmt::Display, time::Duration};

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    config::{ClientConfig, Endpoints, Merchant},
    model::{PaymentUpdate, Transaction},
    retry::{RetryPolicy, retry_with_backoff},
};

mod auth;
pub mod error;
/// Conversions between the domain model and the wire schema
mod from;
/// Requisite masking for logs
pub mod mask;
/// HTTP status and body classification
pub mod response;
pub mod sale;
mod status;

pub use error::GatewayError;
pub use status::Status;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, Clone, Copy)]
pub enum PaymentAction {
    Capture,
    Void,
}

impl Display for PaymentAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Capture => f.write_str("capture"),
            Self::Void => f.write_str("void"),
        }
    }
}

/// Client for the Cielo e-commerce API.
///
/// Holds no per-transaction state. Clones share the connection pool and can
/// be used from concurrent tasks.
#[derive(Debug, Clone)]
pub struct CieloGateway {
    client: reqwest::Client,
    endpoints: Endpoints,
    merchant: Merchant,
    timeout: Duration,
}

impl CieloGateway {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoints: config.environment.endpoints(),
            merchant: config.merchant,
            timeout: config.timeout,
        }
    }

    /// Copy of this client whose calls time out after `timeout`.
    ///
    /// A timed out call has an unknown outcome, see
    /// [`GatewayError::outcome_unknown`].
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout,
            ..self.clone()
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        request_id: Uuid,
        query: Option<(&str, u64)>,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let headers = auth::authenticated_headers(&self.merchant, request_id)?;
        let mut request = self
            .client
            .request(method.clone(), &url)
            .headers(headers)
            .timeout(self.timeout);
        if let Some(query) = query {
            request = request.query(&[query]);
        }
        match &body {
            Some(body) => {
                tracing::debug!(%method, %url, data = %mask::secure_value(body), "Gateway API request");
                request = request.json(body);
            }
            None => tracing::debug!(%method, %url, ?query, "Gateway API request"),
        }

        let res = request.send().await?;
        let status = res.status();
        let bytes = res.bytes().await?;
        match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(value) => tracing::debug!(
                %status,
                data = %mask::secure_value(&value),
                "Gateway API response"
            ),
            Err(_) => tracing::debug!(%status, len = bytes.len(), "Gateway API non-json response"),
        }
        response::interpret(status, &bytes)
    }

    /// Create a sale.
    ///
    /// `request_id` identifies the logical request. Reuse it when retrying so
    /// the gateway does not create a second charge. A denied payment is an
    /// `Ok` with [`Status::Denied`].
    ///
    /// When `capture` is set and the gateway only authorized the payment, the
    /// capture is issued right away and the returned snapshot reflects it. If
    /// that capture fails the snapshot stays [`Status::Authorized`] and keeps
    /// its payment id, so the hold can still be captured or voided.
    #[instrument(skip_all, fields(%request_id, merchant_order_id = %transaction.merchant_order_id))]
    pub async fn create_transaction(
        &self,
        request_id: Uuid,
        transaction: &Transaction,
    ) -> Result<Transaction> {
        let request = sale::SaleRequest::try_from(transaction)?;
        let body = serde_json::to_value(&request)
            .map_err(|e| GatewayError::Serialization(e.to_string()))?;
        let url = format!("{}/1/sales/", self.endpoints.api);
        let response: sale::SaleResponse = self
            .send(Method::POST, url, request_id, None, Some(body))
            .await?;
        let payment_id = response.payment.payment_id;
        let mut created = Transaction::try_from(response)?;

        let status = created.status();
        tracing::info!(
            %payment_id,
            status = ?status,
            return_code = ?created.payment.receipt.return_code,
            "Created transaction"
        );

        if transaction.payment.capture && status == Some(Status::Authorized) {
            tracing::debug!(%payment_id, "Gateway only authorized, capturing");
            let capture_id = follow_up_request_id(request_id, PaymentAction::Capture);
            let amount = created.payment.amount;
            match self
                .update(PaymentAction::Capture, capture_id, payment_id, Some(amount))
                .await
            {
                Ok(update) => created.apply_update(&update, Some(amount)),
                // The authorization stands, the caller decides to capture or void it.
                Err(e) => tracing::warn!(
                    %payment_id,
                    error = %e,
                    "Capture after authorization failed, returning authorized transaction"
                ),
            }
        }
        Ok(created)
    }

    /// [`create_transaction`](Self::create_transaction) retried on
    /// unavailability with one request id for every attempt.
    pub async fn create_transaction_with_retry(
        &self,
        policy: &RetryPolicy,
        request_id: Uuid,
        transaction: &Transaction,
    ) -> Result<Transaction> {
        retry_with_backoff(policy, move || self.create_transaction(request_id, transaction)).await
    }

    /// Capture an authorized payment, fully or `amount` cents of it.
    #[instrument(skip(self))]
    pub async fn capture_transaction(
        &self,
        request_id: Uuid,
        payment_id: Uuid,
        amount: Option<u64>,
    ) -> Result<PaymentUpdate> {
        self.update(PaymentAction::Capture, request_id, payment_id, amount)
            .await
    }

    /// Cancel a payment, fully or `amount` cents of it.
    #[instrument(skip(self))]
    pub async fn void_transaction(
        &self,
        request_id: Uuid,
        payment_id: Uuid,
        amount: Option<u64>,
    ) -> Result<PaymentUpdate> {
        self.update(PaymentAction::Void, request_id, payment_id, amount)
            .await
    }

    async fn update(
        &self,
        action: PaymentAction,
        request_id: Uuid,
        payment_id: Uuid,
        amount: Option<u64>,
    ) -> Result<PaymentUpdate> {
        let url = format!("{}/1/sales/{}/{}", self.endpoints.api, payment_id, action);
        let query = amount.map(|amount| ("amount", amount));
        let response: sale::UpdateResponse = self
            .send(Method::PUT, url, request_id, query, None)
            .await?;
        let update = PaymentUpdate::try_from(response)?;
        tracing::info!(%payment_id, %action, status = %update.status, "Updated transaction");
        Ok(update)
    }

    /// Current state of a payment according to the gateway.
    #[instrument(skip(self))]
    pub async fn get_transaction(&self, payment_id: Uuid) -> Result<Transaction> {
        let url = format!("{}/1/sales/{}", self.endpoints.query, payment_id);
        let response: sale::SaleResponse = self
            .send(Method::GET, url, Uuid::new_v4(), None, None)
            .await?;
        Transaction::try_from(response)
    }
}

/// Request id for a call issued on behalf of another request. Stable, so a
/// retried create reuses the same id for its follow-up capture.
fn follow_up_request_id(request_id: Uuid, action: PaymentAction) -> Uuid {
    Uuid::new_v5(&request_id, action.to_string().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    #[test]
    fn follow_up_ids_are_stable_and_distinct() {
        let request_id = Uuid::new_v4();
        let capture = follow_up_request_id(request_id, PaymentAction::Capture);
        assert_eq!(capture, follow_up_request_id(request_id, PaymentAction::Capture));
        assert_ne!(capture, request_id);
        assert_ne!(capture, follow_up_request_id(request_id, PaymentAction::Void));
        assert_ne!(capture, follow_up_request_id(Uuid::new_v4(), PaymentAction::Capture));
    }

    #[test]
    fn with_timeout_keeps_configuration() {
        let config = ClientConfig::new(Environment::Production, Merchant::new("id", "key"));
        let gateway = CieloGateway::new(config);
        let short = gateway.with_timeout(Duration::from_millis(10));
        assert_eq!(short.timeout, Duration::from_millis(10));
        assert_eq!(short.endpoints(), gateway.endpoints());
        assert_eq!(
            short.endpoints().api,
            "https://api.cieloecommerce.cielo.com.br"
        );
    }
}
