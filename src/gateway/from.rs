use crate::{
    gateway::{
        Status,
        error::GatewayError,
        sale::{
            CreditCardRequest, CustomerRequest, PaymentRequest, PaymentType, SaleRequest,
            SaleResponse, UpdateResponse,
        },
    },
    model::{CreditCard, Customer, Payment, PaymentUpdate, Receipt, Transaction},
};

/// Sales are always reported as Brazilian; the gateway rejects other values.
const COUNTRY: &str = "BRA";

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, GatewayError> {
    if value.trim().is_empty() {
        return Err(GatewayError::Serialization(format!(
            "required field {field} is empty"
        )));
    }
    Ok(value)
}

impl<'a> TryFrom<&'a Transaction> for SaleRequest<'a> {
    type Error = GatewayError;

    fn try_from(
        Transaction {
            merchant_order_id,
            customer,
            payment,
        }: &'a Transaction,
    ) -> Result<Self, Self::Error> {
        if payment.amount == 0 {
            return Err(GatewayError::Serialization(
                "Payment.Amount must be at least one minor unit".into(),
            ));
        }
        if payment.installments == 0 {
            return Err(GatewayError::Serialization(
                "Payment.Installments must be at least 1".into(),
            ));
        }
        let card = &payment.credit_card;
        Ok(SaleRequest {
            merchant_order_id: required("MerchantOrderId", merchant_order_id)?,
            customer: CustomerRequest {
                name: required("Customer.Name", &customer.name)?,
            },
            payment: PaymentRequest {
                kind: PaymentType::CreditCard,
                amount: payment.amount,
                currency: payment.currency,
                country: COUNTRY,
                installments: payment.installments,
                capture: payment.capture,
                soft_descriptor: payment.soft_descriptor.as_deref(),
                credit_card: CreditCardRequest {
                    card_number: required("CreditCard.CardNumber", &card.card_number)?,
                    holder: required("CreditCard.Holder", &card.holder)?,
                    expiration_date: card.expiration_date,
                    security_code: required("CreditCard.SecurityCode", &card.security_code)?,
                    brand: card.brand,
                },
            },
        })
    }
}

impl TryFrom<SaleResponse> for Transaction {
    type Error = GatewayError;

    fn try_from(value: SaleResponse) -> Result<Self, Self::Error> {
        let payment = value.payment;
        let status = Status::try_from(payment.status)?;
        let card = payment.credit_card;
        Ok(Transaction {
            merchant_order_id: value.merchant_order_id,
            customer: Customer::new(value.customer.name),
            payment: Payment {
                amount: payment.amount,
                currency: payment.currency,
                installments: payment.installments,
                capture: payment.capture,
                soft_descriptor: payment.soft_descriptor,
                credit_card: CreditCard {
                    card_number: card.card_number,
                    holder: card.holder.unwrap_or_default(),
                    expiration_date: card.expiration_date,
                    security_code: card.security_code.unwrap_or_default(),
                    brand: card.brand,
                },
                payment_id: Some(payment.payment_id),
                status: Some(status),
                receipt: Receipt {
                    tid: payment.tid,
                    proof_of_sale: payment.proof_of_sale,
                    authorization_code: payment.authorization_code,
                    return_code: payment.return_code,
                    return_message: payment.return_message,
                    received_date: payment.received_date,
                    captured_amount: payment.captured_amount,
                    voided_amount: payment.voided_amount,
                },
            },
        })
    }
}

impl TryFrom<UpdateResponse> for PaymentUpdate {
    type Error = GatewayError;

    fn try_from(value: UpdateResponse) -> Result<Self, Self::Error> {
        Ok(PaymentUpdate {
            status: Status::try_from(value.status)?,
            return_code: value.return_code,
            return_message: value.return_message,
            reason_code: value.reason_code,
            reason_message: value.reason_message,
            tid: value.tid,
            proof_of_sale: value.proof_of_sale,
            authorization_code: value.authorization_code,
        })
    }
}

impl Transaction {
    /// Apply the outcome of a capture to this snapshot.
    pub(crate) fn apply_update(&mut self, update: &PaymentUpdate, captured_amount: Option<u64>) {
        let payment = &mut self.payment;
        payment.status = Some(update.status);
        let receipt = &mut payment.receipt;
        if update.return_code.is_some() {
            receipt.return_code.clone_from(&update.return_code);
            receipt.return_message.clone_from(&update.return_message);
        }
        if update.tid.is_some() {
            receipt.tid.clone_from(&update.tid);
        }
        if update.proof_of_sale.is_some() {
            receipt.proof_of_sale.clone_from(&update.proof_of_sale);
        }
        if update.authorization_code.is_some() {
            receipt.authorization_code.clone_from(&update.authorization_code);
        }
        if update.status == Status::PaymentConfirmed {
            receipt.captured_amount = captured_amount.or(Some(payment.amount));
        }
    }
}
