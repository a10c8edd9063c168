//! Sandbox test cards.
//!
//! The sandbox decides the authorization outcome from the last digit of the
//! card number. Any expiration date in the future and any security code work.
//! These numbers are meaningless in production.

pub const AUTHORIZED_1: &str = "0000000000000001";
pub const AUTHORIZED_2: &str = "0000000000000004";
pub const NOT_AUTHORIZED: &str = "0000000000000002";
pub const NOT_AUTHORIZED_CARD_EXPIRED: &str = "0000000000000003";
pub const NOT_AUTHORIZED_CARD_BLOCKED: &str = "0000000000000005";
pub const NOT_AUTHORIZED_TIME_OUT: &str = "0000000000000006";
pub const NOT_AUTHORIZED_CARD_CANCELED: &str = "0000000000000007";
pub const NOT_AUTHORIZED_CARD_PROBLEMS: &str = "0000000000000008";
pub const AUTHORIZED_RANDOM: &str = "0000000000000009";

/// Smallest installment the sandbox accepts, in cents.
pub const MIN_INSTALLMENT_AMOUNT: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxOutcome {
    Authorized,
    Denied { return_code: &'static str },
    /// Either result, chosen by the sandbox.
    Random,
}

impl SandboxOutcome {
    pub fn return_code(self) -> &'static str {
        match self {
            Self::Authorized | Self::Random => "4",
            Self::Denied { return_code } => return_code,
        }
    }

    pub fn return_message(self) -> &'static str {
        match self.return_code() {
            "4" => "Operation Successful",
            "05" => "Not Authorized",
            "57" => "Card Expired",
            "78" => "Blocked Card",
            "99" => "Time Out",
            "77" => "Canceled Card",
            "70" => "Problems with Creditcard",
            _ => "Not Authorized",
        }
    }
}

/// Documented sandbox outcome for a card number. `None` for anything that is
/// not a digit string.
pub fn expected_outcome(card_number: &str) -> Option<SandboxOutcome> {
    if card_number.is_empty() || !card_number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let outcome = match card_number.chars().last()? {
        '0' | '1' | '4' => SandboxOutcome::Authorized,
        '2' => SandboxOutcome::Denied { return_code: "05" },
        '3' => SandboxOutcome::Denied { return_code: "57" },
        '5' => SandboxOutcome::Denied { return_code: "78" },
        '6' => SandboxOutcome::Denied { return_code: "99" },
        '7' => SandboxOutcome::Denied { return_code: "77" },
        '8' => SandboxOutcome::Denied { return_code: "70" },
        _ => SandboxOutcome::Random,
    };
    Some(outcome)
}

/// Whether each installment of `amount` reaches the sandbox minimum.
pub fn installment_amount_accepted(amount: u64, installments: u32) -> bool {
    installments <= 1 || amount / u64::from(installments) >= MIN_INSTALLMENT_AMOUNT
}
