//! Core data types for claim windows and transfer intents.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Per-address record of claims used and any active cooldown.
///
/// The partition key is the address: windows never interact across
/// addresses. `cooldown_ends_at_ms` is present exactly while a cooldown is
/// active; once the current instant passes it, the window resets to zero
/// claims with no cooldown. Persistence uses plain decimal strings keyed
/// per address; the serde derives exist for transport to a presentation
/// layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimWindow {
    /// Owning wallet address.
    pub address: String,
    /// Successful claims recorded in this window.
    pub claim_count: u32,
    /// Absolute cooldown deadline (Unix ms); present only while active.
    pub cooldown_ends_at_ms: Option<u64>,
}

impl ClaimWindow {
    /// A window with no claims and no cooldown.
    pub fn fresh(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            claim_count: 0,
            cooldown_ends_at_ms: None,
        }
    }

    /// Whether a cooldown is active at `now_ms`.
    pub fn is_on_cooldown(&self, now_ms: u64) -> bool {
        matches!(self.cooldown_ends_at_ms, Some(ends_at) if ends_at > now_ms)
    }

    /// Remaining cooldown at `now_ms`.
    ///
    /// Derived from the absolute deadline on every call, never decremented,
    /// so periodic recomputation cannot drift.
    pub fn remaining_cooldown_ms(&self, now_ms: u64) -> u64 {
        self.cooldown_ends_at_ms
            .map(|ends_at| ends_at.saturating_sub(now_ms))
            .unwrap_or(0)
    }

    /// Whether a recorded cooldown has elapsed at `now_ms`.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        matches!(self.cooldown_ends_at_ms, Some(ends_at) if now_ms >= ends_at)
    }
}

/// A candidate transfer, not yet validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferIntent {
    /// Acting wallet address, if a wallet is connected.
    pub sender: Option<String>,
    /// Recipient address as entered, unvalidated.
    pub recipient: String,
    /// Amount in whole currency units.
    pub amount: f64,
    /// Sender's latest known balance, supplied by the caller.
    ///
    /// The validator performs no I/O; staleness is the caller's problem.
    pub current_balance: f64,
}

/// Outcome of a claim-eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Eligibility {
    /// A claim may proceed.
    Eligible,
    /// No wallet address is available.
    NoWallet,
    /// The cooldown is still running.
    OnCooldown {
        /// Remaining cooldown in milliseconds.
        remaining_ms: u64,
    },
    /// The claim limit is used up but no cooldown is recorded yet.
    LimitReached {
        /// Claims already recorded.
        claims_used: u32,
    },
}

impl Eligibility {
    /// Whether a claim may proceed.
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }
}

/// Opaque reference to a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionRef(pub String);

impl TransactionRef {
    /// Wrap a collaborator-issued reference string.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The raw reference string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
