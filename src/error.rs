//! Error types for faucet operations.
//!
//! One enum per collaborator capability, a `ClaimError` for claim-state
//! persistence, and the caller-facing [`FaucetError`] taxonomy. Policy
//! rejections (`OnCooldown`, `LimitReached`) are distinct from network-side
//! throttling (`RateLimitedByNetwork`): the former come from this module's
//! own bookkeeping, the latter from the external service refusing us.

use snafu::Snafu;

use crate::config::Cluster;
use crate::validator::RejectReason;

/// Errors from the durable key-value store backing claim state.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum StoreError {
    /// The underlying storage medium failed.
    #[snafu(display("storage failed: {reason}"))]
    Failed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

/// Errors from claim-state persistence and decoding.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ClaimError {
    /// Underlying storage error.
    #[snafu(display("storage error: {source}"))]
    Storage {
        /// The underlying error.
        source: StoreError,
    },

    /// Persisted value is not a decimal string.
    #[snafu(display("corrupted claim state in key '{key}': {reason}"))]
    Corrupted {
        /// The key holding the corrupted value.
        key: String,
        /// Description of what went wrong.
        reason: String,
    },
}

impl From<StoreError> for ClaimError {
    fn from(source: StoreError) -> Self {
        ClaimError::Storage { source }
    }
}

/// Errors from the wallet collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum WalletError {
    /// Disconnecting the wallet failed.
    #[snafu(display("wallet disconnect failed: {reason}"))]
    Disconnect {
        /// Human-readable description of the failure.
        reason: String,
    },
}

/// Errors from the funding collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum FundingError {
    /// The network throttled the request on its own side.
    #[snafu(display("rate limited by network: {reason}"))]
    RateLimited {
        /// Human-readable description of the throttle.
        reason: String,
    },

    /// The funding request failed or timed out.
    #[snafu(display("funding request failed: {reason}"))]
    RequestFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

/// Errors from the balance collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum QueryError {
    /// The balance lookup failed or timed out.
    #[snafu(display("balance lookup failed: {reason}"))]
    LookupFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

/// Errors from the transfer collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum SubmitError {
    /// The transfer submission was rejected or timed out.
    #[snafu(display("transfer submission failed: {reason}"))]
    Rejected {
        /// Human-readable description of the failure.
        reason: String,
    },
}

/// Errors from transaction confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfirmationError {
    /// The transaction was submitted but failed to confirm.
    #[snafu(display("transaction '{reference}' failed: {reason}"))]
    TransactionFailed {
        /// Reference of the failed transaction.
        reference: String,
        /// Description of the failure.
        reason: String,
    },
}

/// Caller-facing failure taxonomy for the faucet flows.
///
/// Every variant renders a distinct, actionable reason; none of them is a
/// generic failure. Eligibility and validation rejections are terminal for
/// the attempt; nothing is retried automatically, and a failed external
/// call never mutates claim state.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum FaucetError {
    /// No wallet is connected.
    #[snafu(display("no wallet connected"))]
    NoWallet,

    /// The per-address cooldown is still running.
    #[snafu(display("on cooldown for another {remaining_ms}ms"))]
    OnCooldown {
        /// Remaining cooldown in milliseconds.
        remaining_ms: u64,
    },

    /// The claim limit is used up (cooldown not yet recorded).
    #[snafu(display("claim limit reached: {claims_used}/{max_claims}"))]
    LimitReached {
        /// Claims already recorded in this window.
        claims_used: u32,
        /// The policy's claim limit.
        max_claims: u32,
    },

    /// Requested amount falls outside the admissible range.
    #[snafu(display("amount {amount} outside [{min}, {max}]"))]
    AmountOutOfRange {
        /// The requested amount.
        amount: f64,
        /// Smallest admissible amount.
        min: f64,
        /// Largest admissible amount.
        max: f64,
    },

    /// Funding requests are not served on this cluster.
    #[snafu(display("airdrops are not available on {cluster}"))]
    UnsupportedCluster {
        /// The configured cluster.
        cluster: Cluster,
    },

    /// The network itself throttled the request; not this module's policy.
    #[snafu(display("rate limited by network: {reason}"))]
    RateLimitedByNetwork {
        /// Human-readable description of the throttle.
        reason: String,
    },

    /// The funding request failed.
    #[snafu(display("funding failed: {reason}"))]
    FundingFailed {
        /// Human-readable description of the failure.
        reason: String,
    },

    /// The transfer was rejected before submission.
    #[snafu(display("transfer rejected: {reason}"))]
    TransferRejected {
        /// The validator's reject reason.
        reason: RejectReason,
    },

    /// The transfer submission failed.
    #[snafu(display("transfer failed: {reason}"))]
    TransferFailed {
        /// Human-readable description of the failure.
        reason: String,
    },

    /// A transaction was submitted but did not confirm.
    #[snafu(display("confirmation failed for '{reference}': {reason}"))]
    ConfirmationFailed {
        /// Reference of the unconfirmed transaction.
        reference: String,
        /// Description of the failure.
        reason: String,
    },

    /// The balance lookup failed.
    #[snafu(display("balance unavailable: {reason}"))]
    BalanceUnavailable {
        /// Human-readable description of the failure.
        reason: String,
    },

    /// Disconnecting the wallet failed.
    #[snafu(display("disconnect failed: {reason}"))]
    DisconnectFailed {
        /// Human-readable description of the failure.
        reason: String,
    },

    /// Claim state could not be read or written.
    #[snafu(display("claim state error: {source}"))]
    State {
        /// The underlying error.
        source: ClaimError,
    },
}

impl From<ClaimError> for FaucetError {
    fn from(source: ClaimError) -> Self {
        FaucetError::State { source }
    }
}

impl From<FundingError> for FaucetError {
    fn from(error: FundingError) -> Self {
        match error {
            FundingError::RateLimited { reason } => FaucetError::RateLimitedByNetwork { reason },
            FundingError::RequestFailed { reason } => FaucetError::FundingFailed { reason },
        }
    }
}

impl From<QueryError> for FaucetError {
    fn from(error: QueryError) -> Self {
        match error {
            QueryError::LookupFailed { reason } => FaucetError::BalanceUnavailable { reason },
        }
    }
}

impl From<SubmitError> for FaucetError {
    fn from(error: SubmitError) -> Self {
        match error {
            SubmitError::Rejected { reason } => FaucetError::TransferFailed { reason },
        }
    }
}

impl From<ConfirmationError> for FaucetError {
    fn from(error: ConfirmationError) -> Self {
        match error {
            ConfirmationError::TransactionFailed { reference, reason } => {
                FaucetError::ConfirmationFailed { reference, reason }
            }
        }
    }
}

impl From<WalletError> for FaucetError {
    fn from(error: WalletError) -> Self {
        match error {
            WalletError::Disconnect { reason } => FaucetError::DisconnectFailed { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_and_network_rate_limits_render_distinctly() {
        let policy = FaucetError::LimitReached {
            claims_used: 2,
            max_claims: 2,
        };
        let network = FaucetError::RateLimitedByNetwork {
            reason: "429 too many requests".to_string(),
        };
        assert_eq!(policy.to_string(), "claim limit reached: 2/2");
        assert_eq!(network.to_string(), "rate limited by network: 429 too many requests");
    }

    #[test]
    fn cooldown_display_carries_remaining() {
        let err = FaucetError::OnCooldown { remaining_ms: 299_910 };
        assert_eq!(err.to_string(), "on cooldown for another 299910ms");
    }

    #[test]
    fn corrupted_state_names_the_key() {
        let err = ClaimError::Corrupted {
            key: "claim_count_Addr1".to_string(),
            reason: "'abc' is not a decimal count".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "corrupted claim state in key 'claim_count_Addr1': 'abc' is not a decimal count"
        );
    }

    #[test]
    fn funding_errors_map_into_the_taxonomy() {
        let throttled: FaucetError = FundingError::RateLimited {
            reason: "429".to_string(),
        }
        .into();
        assert!(matches!(throttled, FaucetError::RateLimitedByNetwork { .. }));

        let failed: FaucetError = FundingError::RequestFailed {
            reason: "timeout".to_string(),
        }
        .into();
        assert!(matches!(failed, FaucetError::FundingFailed { .. }));
    }

    #[test]
    fn store_error_propagates_through_claim_error() {
        let err: ClaimError = StoreError::Failed {
            reason: "quota exceeded".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "storage error: storage failed: quota exceeded");
    }
}
