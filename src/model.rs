use std::fmt::Display;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gateway::Status;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
}

impl Customer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardBrand {
    Visa,
    Master,
    Amex,
    Elo,
    Aura,
    #[serde(rename = "JCB", alias = "Jcb")]
    Jcb,
    Diners,
    Discover,
    Hipercard,
    Hiper,
}

/// ISO 4217 currencies accepted by the gateway.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Brl,
    Usd,
    Mxn,
    Cop,
    Clp,
    Ars,
    Pen,
    Eur,
    Pyn,
    Uyu,
    Veb,
    Vef,
    Gbp,
}

/// Card expiration as a calendar month and year.
///
/// Serialized as `MM/YYYY`. Whether the date is in the past is decided by the
/// gateway, never here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExpirationDate {
    month: u8,
    year: i32,
}

impl ExpirationDate {
    pub fn new(month: u8, year: i32) -> Self {
        Self { month, year }
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

impl From<time::Date> for ExpirationDate {
    fn from(date: time::Date) -> Self {
        Self::new(date.month().into(), date.year())
    }
}

impl Display for ExpirationDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

impl From<ExpirationDate> for String {
    fn from(value: ExpirationDate) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for ExpirationDate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let (month, year) = value
            .split_once('/')
            .ok_or_else(|| format!("expiration date must be MM/YYYY, got {value:?}"))?;
        let month: u8 = month
            .parse()
            .map_err(|_| format!("invalid expiration month {month:?}"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid expiration year {year:?}"))?;
        if !(1..=12).contains(&month) {
            return Err(format!("expiration month out of range: {month}"));
        }
        Ok(Self { month, year })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
    pub card_number: String,
    pub holder: String,
    pub expiration_date: ExpirationDate,
    pub security_code: String,
    pub brand: CardBrand,
}

impl CreditCard {
    pub fn new(
        card_number: impl Into<String>,
        holder: impl Into<String>,
        expiration_date: impl Into<ExpirationDate>,
        security_code: impl Into<String>,
        brand: CardBrand,
    ) -> Self {
        Self {
            card_number: card_number.into(),
            holder: holder.into(),
            expiration_date: expiration_date.into(),
            security_code: security_code.into(),
            brand,
        }
    }
}

/// Authorization details the gateway attaches to a processed payment.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tid: Option<String>,
    pub proof_of_sale: Option<String>,
    pub authorization_code: Option<String>,
    pub return_code: Option<String>,
    pub return_message: Option<String>,
    pub received_date: Option<String>,
    pub captured_amount: Option<u64>,
    pub voided_amount: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Amount in minor currency units (cents).
    pub amount: u64,
    pub currency: Currency,
    pub installments: u32,
    /// Capture together with the authorization instead of only holding funds.
    pub capture: bool,
    /// Text shown on the cardholder statement.
    pub soft_descriptor: Option<String>,
    pub credit_card: CreditCard,
    /// Assigned by the gateway once the payment was created.
    pub payment_id: Option<Uuid>,
    pub status: Option<Status>,
    pub receipt: Receipt,
}

impl Payment {
    /// Single installment authorization in BRL, without capture.
    pub fn new(amount: u64, credit_card: CreditCard) -> Self {
        Self {
            amount,
            currency: Currency::default(),
            installments: 1,
            capture: false,
            soft_descriptor: None,
            credit_card,
            payment_id: None,
            status: None,
            receipt: Receipt::default(),
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_installments(mut self, installments: u32) -> Self {
        self.installments = installments;
        self
    }

    pub fn with_capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_soft_descriptor(mut self, soft_descriptor: impl Into<String>) -> Self {
        self.soft_descriptor = Some(soft_descriptor.into());
        self
    }
}

/// A sale as known to the client.
///
/// Built locally before creation, then replaced by the snapshot the gateway
/// returns. The gateway holds the authoritative state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub merchant_order_id: String,
    pub customer: Customer,
    pub payment: Payment,
}

impl Transaction {
    pub fn new(merchant_order_id: impl Into<String>, customer: Customer, payment: Payment) -> Self {
        Self {
            merchant_order_id: merchant_order_id.into(),
            customer,
            payment,
        }
    }

    pub fn payment_id(&self) -> Option<Uuid> {
        self.payment.payment_id
    }

    pub fn status(&self) -> Option<Status> {
        self.payment.status
    }
}

/// Snapshot returned by capture and void calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentUpdate {
    pub status: Status,
    pub return_code: Option<String>,
    pub return_message: Option<String>,
    pub reason_code: Option<i64>,
    pub reason_message: Option<String>,
    pub tid: Option<String>,
    pub proof_of_sale: Option<String>,
    pub authorization_code: Option<String>,
}
