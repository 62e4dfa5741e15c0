//! Faucet orchestration: the claim and transfer flows.
//!
//! Wires a UI-originated claim intent through the amount gate, the cluster
//! guard and the eligibility check, then the funding collaborator, and
//! records the claim only once the transaction confirms. Transfer intents
//! run through the validator and then the transfer collaborator. All
//! rendering stays outside; this layer only decides and reports.

use std::sync::Arc;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::Cluster;
use crate::error::FaucetError;
use crate::limiter::ClaimLimiter;
use crate::services::BalanceService;
use crate::services::FundingService;
use crate::services::TransferService;
use crate::services::WalletSource;
use crate::store::DurableKeyValueStore;
use crate::time::Clock;
use crate::types::ClaimWindow;
use crate::types::Eligibility;
use crate::types::TransactionRef;
use crate::types::TransferIntent;
use crate::validator::validate_transfer;
use crate::validator::Verdict;

/// Receipt for a confirmed claim.
#[derive(Debug, Clone)]
pub struct ClaimReceipt {
    /// The confirmed funding transaction.
    pub reference: TransactionRef,
    /// Window state after recording the claim.
    pub window: ClaimWindow,
}

/// Orchestrates claims and transfers over the collaborator capabilities.
///
/// Claim attempts for one address must be serialized by the caller (e.g.
/// disable the claim action while one is in flight): eligibility and
/// recording straddle the funding call, so two interleaved attempts can
/// both observe an eligible window and overshoot the limit.
pub struct FaucetService<S: DurableKeyValueStore + ?Sized> {
    limiter: ClaimLimiter<S>,
    wallet: Arc<dyn WalletSource>,
    funding: Arc<dyn FundingService>,
    balances: Arc<dyn BalanceService>,
    transfers: Arc<dyn TransferService>,
    clock: Arc<dyn Clock>,
    cluster: Cluster,
}

impl<S: DurableKeyValueStore + ?Sized> FaucetService<S> {
    /// Assemble a faucet over its collaborators.
    pub fn new(
        limiter: ClaimLimiter<S>,
        wallet: Arc<dyn WalletSource>,
        funding: Arc<dyn FundingService>,
        balances: Arc<dyn BalanceService>,
        transfers: Arc<dyn TransferService>,
        clock: Arc<dyn Clock>,
        cluster: Cluster,
    ) -> Self {
        Self {
            limiter,
            wallet,
            funding,
            balances,
            transfers,
            clock,
            cluster,
        }
    }

    /// The underlying claim limiter.
    pub fn limiter(&self) -> &ClaimLimiter<S> {
        &self.limiter
    }

    /// Request `amount` from the faucet for the connected wallet.
    ///
    /// Gates run in order: amount range, cluster support, wallet presence,
    /// eligibility. The claim is recorded only after the funding
    /// transaction confirms, so a failed or throttled request never
    /// consumes one of the allowed claims.
    pub async fn claim(&self, amount: f64) -> Result<ClaimReceipt, FaucetError> {
        let policy = *self.limiter.policy();
        // Amount range and eligibility are independent gates; the amount is
        // checked first, whatever state the window is in.
        if !policy.amount_in_range(amount) {
            debug!(amount, "claim refused: amount out of range");
            return Err(FaucetError::AmountOutOfRange {
                amount,
                min: policy.min_amount,
                max: policy.max_amount,
            });
        }

        if !self.cluster.supports_airdrop() {
            debug!(cluster = %self.cluster, "claim refused: cluster has no faucet");
            return Err(FaucetError::UnsupportedCluster { cluster: self.cluster });
        }

        let address = match self.wallet.current_address() {
            Some(address) => address,
            None => return Err(FaucetError::NoWallet),
        };

        let now_ms = self.clock.now_unix_ms();
        match self.limiter.check_eligibility(Some(&address), now_ms).await? {
            Eligibility::Eligible => {}
            Eligibility::NoWallet => return Err(FaucetError::NoWallet),
            Eligibility::OnCooldown { remaining_ms } => {
                debug!(address = %address, remaining_ms, "claim refused: on cooldown");
                return Err(FaucetError::OnCooldown { remaining_ms });
            }
            Eligibility::LimitReached { claims_used } => {
                debug!(address = %address, claims_used, "claim refused: limit reached");
                return Err(FaucetError::LimitReached {
                    claims_used,
                    max_claims: policy.max_claims,
                });
            }
        }

        let reference = match self.funding.request_funds(&address, amount).await {
            Ok(reference) => reference,
            Err(error) => {
                warn!(address = %address, error = %error, "funding request failed");
                return Err(error.into());
            }
        };
        self.funding.confirm(&reference).await?;

        // Only a confirmed success mutates the window.
        let window = self.limiter.record_claim(&address, self.clock.now_unix_ms()).await?;
        info!(
            address = %address,
            reference = %reference,
            claims_used = window.claim_count,
            "claim confirmed"
        );

        Ok(ClaimReceipt { reference, window })
    }

    /// Validate and submit a transfer from the connected wallet.
    ///
    /// The balance fed to the validator is looked up here; by submission
    /// time it may already be stale, which is inherent to the flow.
    pub async fn send(&self, recipient: &str, amount: f64) -> Result<TransactionRef, FaucetError> {
        let sender = self.wallet.current_address();
        let current_balance = match sender.as_deref() {
            Some(address) => self.balances.balance(address).await?,
            None => 0.0,
        };

        let intent = TransferIntent {
            sender: sender.clone(),
            recipient: recipient.to_string(),
            amount,
            current_balance,
        };
        if let Verdict::Reject(reason) = validate_transfer(&intent) {
            debug!(reason = %reason, "transfer refused");
            return Err(FaucetError::TransferRejected { reason });
        }

        // The validator admitted, so a sender exists.
        let sender = match sender {
            Some(sender) => sender,
            None => return Err(FaucetError::NoWallet),
        };

        let reference = self
            .transfers
            .submit_transfer(sender.trim(), recipient.trim(), amount)
            .await?;
        self.transfers.confirm(&reference).await?;

        info!(
            sender = %sender,
            recipient = %recipient,
            amount,
            reference = %reference,
            "transfer confirmed"
        );
        Ok(reference)
    }

    /// Eligibility snapshot for the connected wallet at the current time.
    pub async fn eligibility(&self) -> Result<Eligibility, FaucetError> {
        let address = self.wallet.current_address();
        let eligibility = self
            .limiter
            .check_eligibility(address.as_deref(), self.clock.now_unix_ms())
            .await?;
        Ok(eligibility)
    }

    /// Current balance of the connected wallet.
    pub async fn refresh_balance(&self) -> Result<f64, FaucetError> {
        let address = match self.wallet.current_address() {
            Some(address) => address,
            None => return Err(FaucetError::NoWallet),
        };
        Ok(self.balances.balance(&address).await?)
    }

    /// Disconnect the wallet.
    pub async fn disconnect(&self) -> Result<(), FaucetError> {
        self.wallet.disconnect().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClaimPolicy;
    use crate::error::ConfirmationError;
    use crate::error::FundingError;
    use crate::store::MemoryStore;
    use crate::test_support::FixedBalance;
    use crate::test_support::ScriptedFunding;
    use crate::test_support::ScriptedTransfers;
    use crate::test_support::StaticWallet;
    use crate::time::ManualClock;
    use crate::validator::RejectReason;

    const ADDR: &str = "4Nd1mYvM6kV8TjSzbQrqyFVTgJJqoQZjZVzp";
    const OTHER: &str = "7XzXsg3CW8WqYkgFHrBB6JPhyXdKq9hondkoNUyAmKQV";

    struct Fixture {
        service: FaucetService<MemoryStore>,
        wallet: Arc<StaticWallet>,
        funding: Arc<ScriptedFunding>,
        balances: Arc<FixedBalance>,
        transfers: Arc<ScriptedTransfers>,
        clock: ManualClock,
    }

    fn fixture_on(cluster: Cluster) -> Fixture {
        let wallet = Arc::new(StaticWallet::connected(ADDR));
        let funding = Arc::new(ScriptedFunding::succeeding());
        let balances = Arc::new(FixedBalance::of(5.0));
        let transfers = Arc::new(ScriptedTransfers::succeeding());
        let clock = ManualClock::new(1_000_000);

        let limiter = ClaimLimiter::new(Arc::new(MemoryStore::new()), ClaimPolicy::default());
        let service = FaucetService::new(
            limiter,
            Arc::clone(&wallet) as Arc<dyn WalletSource>,
            Arc::clone(&funding) as Arc<dyn FundingService>,
            Arc::clone(&balances) as Arc<dyn BalanceService>,
            Arc::clone(&transfers) as Arc<dyn TransferService>,
            Arc::new(clock.clone()) as Arc<dyn Clock>,
            cluster,
        );

        Fixture {
            service,
            wallet,
            funding,
            balances,
            transfers,
            clock,
        }
    }

    fn fixture() -> Fixture {
        fixture_on(Cluster::Devnet)
    }

    #[tokio::test]
    async fn confirmed_claim_records_the_window() {
        let fx = fixture();
        let receipt = fx.service.claim(1.0).await.unwrap();
        assert_eq!(receipt.window.claim_count, 1);
        assert_eq!(receipt.window.cooldown_ends_at_ms, None);
        assert_eq!(fx.funding.request_count(), 1);
    }

    #[tokio::test]
    async fn amount_gate_runs_before_eligibility() {
        let fx = fixture();
        // Exhaust the window first; the amount error must still win.
        fx.service.claim(1.0).await.unwrap();
        fx.service.claim(1.0).await.unwrap();

        let error = fx.service.claim(0.05).await.unwrap_err();
        assert!(matches!(error, FaucetError::AmountOutOfRange { .. }));
        assert_eq!(fx.funding.request_count(), 2, "gated claim must not reach funding");
    }

    #[tokio::test]
    async fn mainnet_claims_never_reach_the_collaborator() {
        let fx = fixture_on(Cluster::Mainnet);
        let error = fx.service.claim(1.0).await.unwrap_err();
        assert!(matches!(error, FaucetError::UnsupportedCluster { cluster: Cluster::Mainnet }));
        assert_eq!(fx.funding.request_count(), 0);
    }

    #[tokio::test]
    async fn claim_without_wallet_is_refused() {
        let fx = fixture();
        fx.wallet.set_address(None);
        let error = fx.service.claim(1.0).await.unwrap_err();
        assert!(matches!(error, FaucetError::NoWallet));
        assert_eq!(fx.funding.request_count(), 0);
    }

    #[tokio::test]
    async fn third_claim_hits_the_cooldown() {
        let fx = fixture();
        fx.service.claim(1.0).await.unwrap();
        let receipt = fx.service.claim(1.0).await.unwrap();
        assert_eq!(receipt.window.cooldown_ends_at_ms, Some(1_300_000));

        let error = fx.service.claim(1.0).await.unwrap_err();
        assert!(matches!(error, FaucetError::OnCooldown { remaining_ms: 300_000 }));
        assert_eq!(fx.funding.request_count(), 2);
    }

    #[tokio::test]
    async fn cooldown_expiry_reopens_the_faucet() {
        let fx = fixture();
        fx.service.claim(1.0).await.unwrap();
        fx.service.claim(1.0).await.unwrap();

        fx.clock.advance_ms(300_001);
        let receipt = fx.service.claim(1.0).await.unwrap();
        assert_eq!(receipt.window.claim_count, 1);
    }

    #[tokio::test]
    async fn failed_funding_consumes_no_claim() {
        let fx = fixture();
        fx.funding.queue_request(Err(FundingError::RequestFailed {
            reason: "rpc timeout".to_string(),
        }));

        let error = fx.service.claim(1.0).await.unwrap_err();
        assert!(matches!(error, FaucetError::FundingFailed { .. }));

        // The failed attempt left the window untouched.
        assert_eq!(fx.service.eligibility().await.unwrap(), Eligibility::Eligible);
        let window = fx.service.limiter().load_window(ADDR, 1_000_000).await.unwrap();
        assert_eq!(window.claim_count, 0);
    }

    #[tokio::test]
    async fn failed_confirmation_consumes_no_claim() {
        let fx = fixture();
        fx.funding.queue_confirmation(Err(ConfirmationError::TransactionFailed {
            reference: "funding-0".to_string(),
            reason: "dropped from mempool".to_string(),
        }));

        let error = fx.service.claim(1.0).await.unwrap_err();
        assert!(matches!(error, FaucetError::ConfirmationFailed { .. }));

        let window = fx.service.limiter().load_window(ADDR, 1_000_000).await.unwrap();
        assert_eq!(window.claim_count, 0);
    }

    #[tokio::test]
    async fn network_throttle_is_not_limit_reached() {
        let fx = fixture();
        fx.funding.queue_request(Err(FundingError::RateLimited {
            reason: "429 too many requests".to_string(),
        }));

        let error = fx.service.claim(1.0).await.unwrap_err();
        assert!(matches!(error, FaucetError::RateLimitedByNetwork { .. }));

        // The network's throttle must not count against our own window.
        assert_eq!(fx.service.eligibility().await.unwrap(), Eligibility::Eligible);
    }

    #[tokio::test]
    async fn admitted_transfer_is_submitted_and_confirmed() {
        let fx = fixture();
        let reference = fx.service.send(OTHER, 1.0).await.unwrap();
        assert!(reference.as_str().starts_with("transfer-"));
        assert_eq!(fx.transfers.submit_count(), 1);
        assert_eq!(fx.balances.query_count(), 1);
    }

    #[tokio::test]
    async fn self_transfer_is_rejected_before_submission() {
        let fx = fixture();
        let error = fx.service.send(ADDR, 1.0).await.unwrap_err();
        assert!(matches!(
            error,
            FaucetError::TransferRejected {
                reason: RejectReason::SelfTransfer
            }
        ));
        assert_eq!(fx.transfers.submit_count(), 0);
    }

    #[tokio::test]
    async fn overdrawn_transfer_is_rejected() {
        let fx = fixture();
        let error = fx.service.send(OTHER, 10.0).await.unwrap_err();
        assert!(matches!(
            error,
            FaucetError::TransferRejected {
                reason: RejectReason::InsufficientBalance
            }
        ));
        assert_eq!(fx.transfers.submit_count(), 0);
    }

    #[tokio::test]
    async fn malformed_recipient_is_rejected() {
        let fx = fixture();
        let error = fx.service.send("not-an-address", 1.0).await.unwrap_err();
        assert!(matches!(
            error,
            FaucetError::TransferRejected {
                reason: RejectReason::InvalidAddress
            }
        ));
    }

    #[tokio::test]
    async fn transfer_without_wallet_skips_the_balance_lookup() {
        let fx = fixture();
        fx.wallet.set_address(None);
        let error = fx.service.send(OTHER, 1.0).await.unwrap_err();
        assert!(matches!(
            error,
            FaucetError::TransferRejected {
                reason: RejectReason::NoWallet
            }
        ));
        assert_eq!(fx.balances.query_count(), 0);
    }

    #[tokio::test]
    async fn balance_failure_surfaces_as_unavailable() {
        let fx = fixture();
        let balances = Arc::new(FixedBalance::failing("rpc unreachable"));
        let service = FaucetService::new(
            ClaimLimiter::new(Arc::new(MemoryStore::new()), ClaimPolicy::default()),
            Arc::clone(&fx.wallet) as Arc<dyn WalletSource>,
            Arc::clone(&fx.funding) as Arc<dyn FundingService>,
            balances as Arc<dyn BalanceService>,
            Arc::clone(&fx.transfers) as Arc<dyn TransferService>,
            Arc::new(fx.clock.clone()) as Arc<dyn Clock>,
            Cluster::Devnet,
        );

        let error = service.send(OTHER, 1.0).await.unwrap_err();
        assert!(matches!(error, FaucetError::BalanceUnavailable { .. }));

        let error = service.refresh_balance().await.unwrap_err();
        assert!(matches!(error, FaucetError::BalanceUnavailable { .. }));
    }

    #[tokio::test]
    async fn disconnect_clears_the_wallet() {
        let fx = fixture();
        fx.service.disconnect().await.unwrap();
        assert_eq!(fx.wallet.current_address(), None);
        assert!(matches!(fx.service.claim(1.0).await.unwrap_err(), FaucetError::NoWallet));
    }
}
