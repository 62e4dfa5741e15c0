//! Transfer validation: admit/reject verdicts with fixed-priority reasons.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::constants::MAX_ADDRESS_LEN;
use crate::constants::MIN_ADDRESS_LEN;
use crate::types::TransferIntent;

/// Why a transfer was rejected.
///
/// The declaration order is a contract: when several conditions hold at
/// once, the earliest variant is the one reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// No wallet is connected.
    NoWallet,
    /// Recipient is not a structurally valid address.
    InvalidAddress,
    /// Amount is zero, negative, or not a number.
    InvalidAmount,
    /// Recipient equals the sender.
    SelfTransfer,
    /// Sender's balance does not cover the amount.
    InsufficientBalance,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            RejectReason::NoWallet => "no wallet connected",
            RejectReason::InvalidAddress => "invalid recipient address",
            RejectReason::InvalidAmount => "invalid amount",
            RejectReason::SelfTransfer => "cannot send to yourself",
            RejectReason::InsufficientBalance => "insufficient balance",
        };
        f.write_str(message)
    }
}

/// Validation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The transfer may be submitted.
    Admit,
    /// The transfer is refused for the given reason.
    Reject(RejectReason),
}

impl Verdict {
    /// Whether the transfer may proceed.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Verdict::Admit)
    }

    /// The reject reason, if any.
    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            Verdict::Admit => None,
            Verdict::Reject(reason) => Some(*reason),
        }
    }
}

/// Structural check of a base58 wallet address.
///
/// Length and alphabet only; the authoritative parse belongs to the RPC
/// boundary. Surrounding whitespace is ignored.
pub fn is_valid_address(address: &str) -> bool {
    let trimmed = address.trim();
    if trimmed.len() < MIN_ADDRESS_LEN || trimmed.len() > MAX_ADDRESS_LEN {
        return false;
    }
    trimmed.chars().all(is_base58_char)
}

// Base58 drops 0, O, I and l from the alphanumeric set.
fn is_base58_char(c: char) -> bool {
    c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l')
}

/// Validate a candidate transfer.
///
/// Rules run in [`RejectReason`] declaration order; the first failure wins.
/// Pure function of the intent: no I/O, no clock.
pub fn validate_transfer(intent: &TransferIntent) -> Verdict {
    let sender = match intent.sender.as_deref() {
        Some(sender) => sender.trim(),
        None => return Verdict::Reject(RejectReason::NoWallet),
    };

    let recipient = intent.recipient.trim();
    if !is_valid_address(recipient) {
        return Verdict::Reject(RejectReason::InvalidAddress);
    }

    if !intent.amount.is_finite() || intent.amount <= 0.0 {
        return Verdict::Reject(RejectReason::InvalidAmount);
    }

    if recipient == sender {
        return Verdict::Reject(RejectReason::SelfTransfer);
    }

    if intent.current_balance < intent.amount {
        return Verdict::Reject(RejectReason::InsufficientBalance);
    }

    Verdict::Admit
}

#[cfg(test)]
mod tests {
    use super::*;

    // Structurally valid base58 strings, 32-44 chars.
    const ADDR_1: &str = "4Nd1mYvM6kV8TjSzbQrqyFVTgJJqoQZjZVzp";
    const ADDR_2: &str = "7XzXsg3CW8WqYkgFHrBB6JPhyXdKq9hondkoNUyAmKQV";

    fn intent(sender: Option<&str>, recipient: &str, amount: f64, balance: f64) -> TransferIntent {
        TransferIntent {
            sender: sender.map(str::to_string),
            recipient: recipient.to_string(),
            amount,
            current_balance: balance,
        }
    }

    #[test]
    fn admits_a_well_formed_transfer() {
        let verdict = validate_transfer(&intent(Some(ADDR_1), ADDR_2, 1.0, 5.0));
        assert_eq!(verdict, Verdict::Admit);
        assert!(verdict.is_admitted());
        assert_eq!(verdict.reason(), None);
    }

    #[test]
    fn no_wallet_outranks_everything() {
        // Recipient invalid, amount negative, balance zero: still NoWallet.
        let verdict = validate_transfer(&intent(None, "", -1.0, 0.0));
        assert_eq!(verdict, Verdict::Reject(RejectReason::NoWallet));
    }

    #[test]
    fn invalid_address_outranks_self_transfer() {
        // Empty recipient equals no valid address; sender comparison never runs.
        let verdict = validate_transfer(&intent(Some(""), "", -1.0, 0.0));
        assert_eq!(verdict, Verdict::Reject(RejectReason::InvalidAddress));
    }

    #[test]
    fn rejects_malformed_recipient() {
        for recipient in ["", "abc", "0OIl0OIl0OIl0OIl0OIl0OIl0OIl0OIl", "not an address at all"] {
            let verdict = validate_transfer(&intent(Some(ADDR_1), recipient, 1.0, 5.0));
            assert_eq!(
                verdict,
                Verdict::Reject(RejectReason::InvalidAddress),
                "recipient {:?} should be structurally invalid",
                recipient
            );
        }
    }

    #[test]
    fn rejects_non_positive_and_non_finite_amounts() {
        for amount in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let verdict = validate_transfer(&intent(Some(ADDR_1), ADDR_2, amount, 5.0));
            assert_eq!(
                verdict,
                Verdict::Reject(RejectReason::InvalidAmount),
                "amount {} should be invalid",
                amount
            );
        }
    }

    #[test]
    fn rejects_self_transfer() {
        let verdict = validate_transfer(&intent(Some(ADDR_1), ADDR_1, 1.0, 5.0));
        assert_eq!(verdict, Verdict::Reject(RejectReason::SelfTransfer));
    }

    #[test]
    fn self_transfer_comparison_normalizes_whitespace() {
        let padded = format!("  {}  ", ADDR_1);
        let verdict = validate_transfer(&intent(Some(ADDR_1), &padded, 1.0, 5.0));
        assert_eq!(verdict, Verdict::Reject(RejectReason::SelfTransfer));
    }

    #[test]
    fn rejects_insufficient_balance() {
        let verdict = validate_transfer(&intent(Some(ADDR_1), ADDR_2, 10.0, 5.0));
        assert_eq!(verdict, Verdict::Reject(RejectReason::InsufficientBalance));
    }

    #[test]
    fn exact_balance_is_sufficient() {
        let verdict = validate_transfer(&intent(Some(ADDR_1), ADDR_2, 5.0, 5.0));
        assert_eq!(verdict, Verdict::Admit);
    }

    #[test]
    fn address_check_accepts_trimmed_base58() {
        assert!(is_valid_address(ADDR_2));
        assert!(is_valid_address(&format!(" {} ", ADDR_2)));
        assert!(!is_valid_address(&ADDR_2[..10]));
        assert!(!is_valid_address(&format!("{}!", &ADDR_2[..43])));
    }

    mod properties {
        use proptest::prelude::*;

        use super::ADDR_1;
        use super::ADDR_2;
        use crate::types::TransferIntent;
        use crate::validator::is_valid_address;
        use crate::validator::validate_transfer;
        use crate::validator::RejectReason;
        use crate::validator::Verdict;

        fn arb_address() -> impl Strategy<Value = String> {
            prop_oneof![
                Just(ADDR_1.to_string()),
                Just(ADDR_2.to_string()),
                Just(String::new()),
                Just("short".to_string()),
                "[1-9A-HJ-NP-Za-km-z]{32,44}",
                ".{0,50}",
            ]
        }

        proptest! {
            // The reported reason's own predicate must fail, and every
            // higher-priority predicate must pass.
            #[test]
            fn reported_reason_is_the_highest_priority_failure(
                sender in proptest::option::of(arb_address()),
                recipient in arb_address(),
                amount in -5.0f64..5.0,
                balance in -5.0f64..5.0,
            ) {
                let intent = TransferIntent {
                    sender: sender.clone(),
                    recipient: recipient.clone(),
                    amount,
                    current_balance: balance,
                };

                let has_sender = sender.is_some();
                let recipient_ok = is_valid_address(&recipient);
                let amount_ok = amount.is_finite() && amount > 0.0;
                let not_self = sender.as_deref().map(str::trim) != Some(recipient.trim());
                let funded = balance >= amount;

                let expected = if !has_sender {
                    Verdict::Reject(RejectReason::NoWallet)
                } else if !recipient_ok {
                    Verdict::Reject(RejectReason::InvalidAddress)
                } else if !amount_ok {
                    Verdict::Reject(RejectReason::InvalidAmount)
                } else if !not_self {
                    Verdict::Reject(RejectReason::SelfTransfer)
                } else if !funded {
                    Verdict::Reject(RejectReason::InsufficientBalance)
                } else {
                    Verdict::Admit
                };

                prop_assert_eq!(validate_transfer(&intent), expected);
            }
        }
    }
}
