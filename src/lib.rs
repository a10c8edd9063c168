//! The crate is split in these modules:
//!
//! - [model] (payment entities as the caller builds and reads them)
//! - [gateway] (HTTP client, wire schema and response interpretation)
//! - [config] (environment selection and merchant credentials)
//! - [retry] (backoff for calls that may be retried)
//! - [sandbox] (test cards with deterministic outcomes)
#![doc = include_str!("../README.md")]

pub mod config;
/// Cielo API integration
///
/// This module defines the types and methods to communicate with the external gateway.
pub mod gateway;
pub mod model;
pub mod retry;
pub mod sandbox;

pub use config::{ClientConfig, Environment, Merchant};
pub use gateway::{CieloGateway, GatewayError, Result, Status};
pub use model::{
    CardBrand, CreditCard, Currency, Customer, ExpirationDate, Payment, PaymentUpdate, Receipt,
    Transaction,
};
pub use retry::RetryPolicy;
