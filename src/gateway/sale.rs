//! Wire schema of the sales endpoints.

use uuid::Uuid;

use crate::model::{CardBrand, Currency, ExpirationDate};

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SaleRequest<'a> {
    pub merchant_order_id: &'a str,
    pub customer: CustomerRequest<'a>,
    pub payment: PaymentRequest<'a>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentRequest<'a> {
    #[serde(rename = "Type")]
    pub kind: PaymentType,
    pub amount: u64,
    pub currency: Currency,
    pub country: &'a str,
    pub installments: u32,
    pub capture: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soft_descriptor: Option<&'a str>,
    pub credit_card: CreditCardRequest<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PaymentType {
    CreditCard,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreditCardRequest<'a> {
    pub card_number: &'a str,
    pub holder: &'a str,
    pub expiration_date: ExpirationDate,
    pub security_code: &'a str,
    pub brand: CardBrand,
}

/// Sale as returned by creation and query.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SaleResponse {
    pub merchant_order_id: String,
    pub customer: CustomerResponse,
    pub payment: PaymentResponse,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerResponse {
    pub name: String,
}

/// Status is kept as the raw code so unknown codes surface as
/// [`GatewayError::UnknownStatus`](super::error::GatewayError::UnknownStatus)
/// instead of a deserialization failure.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentResponse {
    pub payment_id: Uuid,
    pub status: i64,
    pub amount: u64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default = "single_installment")]
    pub installments: u32,
    #[serde(default)]
    pub capture: bool,
    pub soft_descriptor: Option<String>,
    pub credit_card: CreditCardResponse,
    pub tid: Option<String>,
    pub proof_of_sale: Option<String>,
    pub authorization_code: Option<String>,
    pub return_code: Option<String>,
    pub return_message: Option<String>,
    pub received_date: Option<String>,
    pub captured_amount: Option<u64>,
    pub voided_amount: Option<u64>,
    #[serde(default)]
    pub links: Vec<Link>,
}

fn single_installment() -> u32 {
    1
}

/// The gateway echoes the card back with the number already masked and
/// without the security code.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreditCardResponse {
    pub card_number: String,
    pub holder: Option<String>,
    pub expiration_date: ExpirationDate,
    #[serde(default)]
    pub security_code: Option<String>,
    pub brand: CardBrand,
}

/// Answer of the capture and void endpoints.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateResponse {
    pub status: i64,
    pub return_code: Option<String>,
    pub return_message: Option<String>,
    pub reason_code: Option<i64>,
    pub reason_message: Option<String>,
    pub tid: Option<String>,
    pub proof_of_sale: Option<String>,
    pub authorization_code: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Link {
    pub method: String,
    pub rel: String,
    pub href: String,
}
