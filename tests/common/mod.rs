//! In-process stand-in for the gateway sandbox.
//!
//! Decides outcomes from the sandbox card table, remembers sales by payment
//! id and request id, and can be told to misbehave (slow, failing, unknown
//! status, ignoring the combined capture, rejecting updates).

#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use cielo::{
    CardBrand, CieloGateway, ClientConfig, CreditCard, Customer, Environment, ExpirationDate,
    Merchant, Payment, Transaction,
    config::Endpoints,
    gateway::mask::mask_card_number,
    sandbox::{self, SandboxOutcome},
};
use serde_json::{Value, json};
use uuid::Uuid;

pub const MERCHANT_ID: &str = "9d4f2f3c-7e5e-4b7c-9bb6-0a6b1f3c2d11";
pub const MERCHANT_KEY: &str = "MOCKMERCHANTKEY0123456789";

#[derive(Debug, Default)]
pub struct MockState {
    sales: HashMap<Uuid, Value>,
    by_request: HashMap<String, Uuid>,
    pub create_calls: usize,
    pub update_calls: usize,
    /// Answer the next creates only after this delay. The sale is recorded
    /// before waiting.
    pub slow_creates: usize,
    pub create_delay: Duration,
    /// Answer the next creates with 503 without recording anything.
    pub failing_creates: usize,
    /// Answer creates with this raw status code.
    pub forced_status: Option<i64>,
    /// Answer creates with Authorized even when capture was requested.
    pub ignore_capture_flag: bool,
    /// Answer captures and voids with 400 without touching the sale.
    pub reject_updates: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    pub async fn start() -> (Self, SocketAddr) {
        let mock = Self::default();
        let api = Router::new()
            .route("/1/sales/", post(create_sale))
            .route("/1/sales/{payment_id}/capture", put(capture_sale))
            .route("/1/sales/{payment_id}/void", put(void_sale));
        let query = Router::new().route("/1/sales/{payment_id}", get(get_sale));
        let app = Router::new()
            .nest("/api", api)
            .nest("/query", query)
            .with_state(mock.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock gateway");
        let addr = listener.local_addr().expect("mock gateway address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock gateway serves");
        });
        (mock, addr)
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state lock")
    }

    pub fn sale_count(&self) -> usize {
        self.state().sales.len()
    }

    pub fn sale(&self, payment_id: Uuid) -> Option<Value> {
        self.state().sales.get(&payment_id).cloned()
    }
}

pub fn endpoints(addr: SocketAddr) -> Endpoints {
    Endpoints::new(format!("http://{addr}/api"), format!("http://{addr}/query"))
}

pub fn gateway(addr: SocketAddr) -> CieloGateway {
    let config = ClientConfig::new(
        Environment::Custom(endpoints(addr)),
        Merchant::new(MERCHANT_ID, MERCHANT_KEY),
    )
    .with_timeout(Duration::from_secs(5));
    CieloGateway::new(config)
}

pub fn valid_expiration() -> ExpirationDate {
    let year = time::OffsetDateTime::now_utc().year() + 1;
    ExpirationDate::new(12, year)
}

pub fn transaction(card_number: &str, amount: u64, installments: u32, capture: bool) -> Transaction {
    let card = CreditCard::new(
        card_number,
        "Teste Holder",
        valid_expiration(),
        "123",
        CardBrand::Visa,
    );
    let payment = Payment::new(amount, card)
        .with_installments(installments)
        .with_capture(capture)
        .with_soft_descriptor("Rust Test Project");
    Transaction::new(
        Uuid::new_v4().simple().to_string(),
        Customer::new("Fulano da Silva"),
        payment,
    )
}

fn errors(status: StatusCode, code: i64, message: &str) -> Response {
    (status, Json(json!([{ "Code": code, "Message": message }]))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    header("MerchantId") == Some(MERCHANT_ID) && header("MerchantKey") == Some(MERCHANT_KEY)
}

async fn create_sale(
    State(mock): State<MockGateway>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return errors(StatusCode::UNAUTHORIZED, 129, "MerchantId is required");
    }
    let Some(request_id) = headers
        .get("RequestId")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
    else {
        return errors(StatusCode::BAD_REQUEST, 100, "RequestId is required");
    };

    let (response, delay) = {
        let mut state = mock.state();
        state.create_calls += 1;
        if state.failing_creates > 0 {
            state.failing_creates -= 1;
            return (StatusCode::SERVICE_UNAVAILABLE, "try again later").into_response();
        }
        if let Some(payment_id) = state.by_request.get(&request_id) {
            let sale = state.sales[payment_id].clone();
            return (StatusCode::CREATED, Json(sale)).into_response();
        }

        let payment = &body["Payment"];
        let card = &payment["CreditCard"];
        let Some(card_number) = card["CardNumber"].as_str().map(str::to_string) else {
            return errors(StatusCode::BAD_REQUEST, 127, "Credit Card Number is required");
        };
        if card["ExpirationDate"]
            .as_str()
            .and_then(|d| ExpirationDate::try_from(d.to_string()).ok())
            .is_none()
        {
            return errors(StatusCode::BAD_REQUEST, 126, "Credit Card Expiration Date is invalid");
        }
        let Some(amount) = payment["Amount"].as_u64() else {
            return errors(StatusCode::BAD_REQUEST, 105, "Amount is required");
        };
        let installments = payment["Installments"].as_u64().unwrap_or(1) as u32;
        let capture = payment["Capture"].as_bool().unwrap_or(false);

        let outcome = match sandbox::expected_outcome(&card_number) {
            Some(SandboxOutcome::Random) | None => SandboxOutcome::Authorized,
            Some(outcome) => outcome,
        };
        let outcome = if sandbox::installment_amount_accepted(amount, installments) {
            outcome
        } else {
            SandboxOutcome::Denied { return_code: "05" }
        };
        let status = match outcome {
            SandboxOutcome::Denied { .. } => 3,
            _ if capture && !state.ignore_capture_flag => 2,
            _ => 1,
        };
        let status = state.forced_status.unwrap_or(status);

        let payment_id = Uuid::new_v4();
        let payment = &mut body["Payment"];
        payment["PaymentId"] = json!(payment_id);
        payment["Status"] = json!(status);
        payment["ReturnCode"] = json!(outcome.return_code());
        payment["ReturnMessage"] = json!(outcome.return_message());
        payment["Tid"] = json!("0305020554239");
        payment["ReceivedDate"] = json!("2026-10-16 10:00:00");
        if status != 3 {
            payment["ProofOfSale"] = json!("674532");
            payment["AuthorizationCode"] = json!("123456");
        }
        if status == 2 {
            payment["CapturedAmount"] = json!(amount);
        }
        payment["CreditCard"]["CardNumber"] = json!(mask_card_number(&card_number));
        if let Some(card) = payment["CreditCard"].as_object_mut() {
            card.remove("SecurityCode");
        }

        state.sales.insert(payment_id, body.clone());
        state.by_request.insert(request_id, payment_id);

        let delay = if state.slow_creates > 0 {
            state.slow_creates -= 1;
            Some(state.create_delay)
        } else {
            None
        };
        (body, delay)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    (StatusCode::CREATED, Json(response)).into_response()
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Capture,
    Void,
}

async fn capture_sale(
    state: State<MockGateway>,
    headers: HeaderMap,
    path: Path<Uuid>,
    query: Query<HashMap<String, String>>,
) -> Response {
    update_sale(state, headers, path, query, Action::Capture)
}

async fn void_sale(
    state: State<MockGateway>,
    headers: HeaderMap,
    path: Path<Uuid>,
    query: Query<HashMap<String, String>>,
) -> Response {
    update_sale(state, headers, path, query, Action::Void)
}

fn update_sale(
    State(mock): State<MockGateway>,
    headers: HeaderMap,
    Path(payment_id): Path<Uuid>,
    Query(query): Query<HashMap<String, String>>,
    action: Action,
) -> Response {
    if !authorized(&headers) {
        return errors(StatusCode::UNAUTHORIZED, 129, "MerchantId is required");
    }
    let mut state = mock.state();
    state.update_calls += 1;
    if state.reject_updates {
        return errors(StatusCode::BAD_REQUEST, 308, "Transaction not available to capture");
    }
    let Some(sale) = state.sales.get_mut(&payment_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let payment = &mut sale["Payment"];
    let total = payment["Amount"].as_u64().unwrap_or_default();
    let amount = match query.get("amount").map(|a| a.parse::<u64>()) {
        Some(Ok(amount)) => amount,
        Some(Err(_)) => return errors(StatusCode::BAD_REQUEST, 105, "Amount is invalid"),
        None => total,
    };
    let current = payment["Status"].as_i64().unwrap_or_default();

    let (status, return_code) = match action {
        Action::Capture => {
            if current != 1 {
                return errors(
                    StatusCode::BAD_REQUEST,
                    308,
                    "Transaction not available to capture",
                );
            }
            if amount > total {
                return errors(StatusCode::BAD_REQUEST, 309, "Amount greater than authorized");
            }
            payment["CapturedAmount"] = json!(amount);
            (2, "6")
        }
        Action::Void => {
            if current != 1 && current != 2 {
                return errors(StatusCode::BAD_REQUEST, 309, "Transaction not available to void");
            }
            payment["VoidedAmount"] = json!(amount);
            (10, "9")
        }
    };
    payment["Status"] = json!(status);
    payment["ReturnCode"] = json!(return_code);
    payment["ReturnMessage"] = json!("Operation Successful");

    let body = json!({
        "Status": status,
        "ReasonCode": 0,
        "ReasonMessage": "Successful",
        "ReturnCode": return_code,
        "ReturnMessage": "Operation Successful",
        "Tid": payment["Tid"],
        "ProofOfSale": payment["ProofOfSale"],
        "AuthorizationCode": payment["AuthorizationCode"],
        "Links": [{
            "Method": "GET",
            "Rel": "self",
            "Href": format!("/1/sales/{payment_id}")
        }]
    });
    (StatusCode::OK, Json(body)).into_response()
}

async fn get_sale(
    State(mock): State<MockGateway>,
    headers: HeaderMap,
    Path(payment_id): Path<Uuid>,
) -> Response {
    if !authorized(&headers) {
        return errors(StatusCode::UNAUTHORIZED, 129, "MerchantId is required");
    }
    match mock.sale(payment_id) {
        Some(sale) => (StatusCode::OK, Json(sale)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
