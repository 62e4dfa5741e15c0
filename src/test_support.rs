//! Deterministic collaborator implementations for tests.
//!
//! Minimal scripted doubles for the capability traits in [`crate::services`],
//! used by this crate's own unit tests and by the integration tests. They
//! replay queued outcomes and fall back to success when nothing is queued.

use std::collections::VecDeque;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ConfirmationError;
use crate::error::FundingError;
use crate::error::QueryError;
use crate::error::SubmitError;
use crate::error::WalletError;
use crate::services::BalanceService;
use crate::services::FundingService;
use crate::services::TransferService;
use crate::services::WalletSource;
use crate::types::TransactionRef;

/// Wallet source with a settable address.
#[derive(Default)]
pub struct StaticWallet {
    address: Mutex<Option<String>>,
}

impl StaticWallet {
    /// A wallet connected as `address`.
    pub fn connected(address: impl Into<String>) -> Self {
        Self {
            address: Mutex::new(Some(address.into())),
        }
    }

    /// A wallet with no connected address.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Replace the connected address.
    pub fn set_address(&self, address: Option<String>) {
        *self.address.lock().unwrap() = address;
    }
}

#[async_trait]
impl WalletSource for StaticWallet {
    fn current_address(&self) -> Option<String> {
        self.address.lock().unwrap().clone()
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        *self.address.lock().unwrap() = None;
        Ok(())
    }
}

/// Funding service that replays queued outcomes and counts requests.
#[derive(Default)]
pub struct ScriptedFunding {
    requests: Mutex<VecDeque<Result<TransactionRef, FundingError>>>,
    confirmations: Mutex<VecDeque<Result<(), ConfirmationError>>>,
    request_count: AtomicUsize,
}

impl ScriptedFunding {
    /// A service that succeeds on every call.
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next funding request.
    pub fn queue_request(&self, outcome: Result<TransactionRef, FundingError>) {
        self.requests.lock().unwrap().push_back(outcome);
    }

    /// Queue the outcome of the next confirmation.
    pub fn queue_confirmation(&self, outcome: Result<(), ConfirmationError>) {
        self.confirmations.lock().unwrap().push_back(outcome);
    }

    /// Number of funding requests received.
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FundingService for ScriptedFunding {
    async fn request_funds(&self, address: &str, _amount: f64) -> Result<TransactionRef, FundingError> {
        let sequence = self.request_count.fetch_add(1, Ordering::SeqCst);
        match self.requests.lock().unwrap().pop_front() {
            Some(outcome) => outcome,
            None => Ok(TransactionRef::new(format!("funding-{}-{}", address, sequence))),
        }
    }

    async fn confirm(&self, _reference: &TransactionRef) -> Result<(), ConfirmationError> {
        self.confirmations.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// Balance service returning a configurable result.
pub struct FixedBalance {
    result: Mutex<Result<f64, QueryError>>,
    query_count: AtomicUsize,
}

impl FixedBalance {
    /// A service reporting `balance` for every address.
    pub fn of(balance: f64) -> Self {
        Self {
            result: Mutex::new(Ok(balance)),
            query_count: AtomicUsize::new(0),
        }
    }

    /// A service whose lookups fail with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            result: Mutex::new(Err(QueryError::LookupFailed { reason: reason.into() })),
            query_count: AtomicUsize::new(0),
        }
    }

    /// Replace the reported balance.
    pub fn set(&self, balance: f64) {
        *self.result.lock().unwrap() = Ok(balance);
    }

    /// Number of balance lookups received.
    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalanceService for FixedBalance {
    async fn balance(&self, _address: &str) -> Result<f64, QueryError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        self.result.lock().unwrap().clone()
    }
}

/// Transfer service that replays queued outcomes and counts submissions.
#[derive(Default)]
pub struct ScriptedTransfers {
    submissions: Mutex<VecDeque<Result<TransactionRef, SubmitError>>>,
    confirmations: Mutex<VecDeque<Result<(), ConfirmationError>>>,
    submit_count: AtomicUsize,
}

impl ScriptedTransfers {
    /// A service that succeeds on every call.
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next submission.
    pub fn queue_submission(&self, outcome: Result<TransactionRef, SubmitError>) {
        self.submissions.lock().unwrap().push_back(outcome);
    }

    /// Queue the outcome of the next confirmation.
    pub fn queue_confirmation(&self, outcome: Result<(), ConfirmationError>) {
        self.confirmations.lock().unwrap().push_back(outcome);
    }

    /// Number of submissions received.
    pub fn submit_count(&self) -> usize {
        self.submit_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransferService for ScriptedTransfers {
    async fn submit_transfer(
        &self,
        sender: &str,
        recipient: &str,
        _amount: f64,
    ) -> Result<TransactionRef, SubmitError> {
        let sequence = self.submit_count.fetch_add(1, Ordering::SeqCst);
        match self.submissions.lock().unwrap().pop_front() {
            Some(outcome) => outcome,
            None => Ok(TransactionRef::new(format!("transfer-{}-{}-{}", sender, recipient, sequence))),
        }
    }

    async fn confirm(&self, _reference: &TransactionRef) -> Result<(), ConfirmationError> {
        self.confirmations.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}
