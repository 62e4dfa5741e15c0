//! Capability contracts for external collaborators.
//!
//! Wallet handshake, funding requests, balance lookups and transfer
//! submission are black boxes behind these traits. Each call may fail and
//! its failure surfaces as the matching error enum, but the protocols
//! behind them are not this crate's concern.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ConfirmationError;
use crate::error::FundingError;
use crate::error::QueryError;
use crate::error::SubmitError;
use crate::error::WalletError;
use crate::types::TransactionRef;

/// Source of the acting wallet address.
#[async_trait]
pub trait WalletSource: Send + Sync {
    /// Address of the connected wallet; `None` while disconnected.
    fn current_address(&self) -> Option<String>;

    /// Disconnect the wallet.
    async fn disconnect(&self) -> Result<(), WalletError>;
}

/// Requests test-network funds.
#[async_trait]
pub trait FundingService: Send + Sync {
    /// Request `amount` for `address`; resolves to a transaction reference.
    async fn request_funds(&self, address: &str, amount: f64) -> Result<TransactionRef, FundingError>;

    /// Wait for the funding transaction to confirm.
    async fn confirm(&self, reference: &TransactionRef) -> Result<(), ConfirmationError>;
}

/// Looks up current balances.
#[async_trait]
pub trait BalanceService: Send + Sync {
    /// Latest balance for `address` in whole currency units.
    async fn balance(&self, address: &str) -> Result<f64, QueryError>;
}

/// Submits signed value transfers.
#[async_trait]
pub trait TransferService: Send + Sync {
    /// Submit a transfer; resolves to a transaction reference.
    async fn submit_transfer(
        &self,
        sender: &str,
        recipient: &str,
        amount: f64,
    ) -> Result<TransactionRef, SubmitError>;

    /// Wait for the transfer transaction to confirm.
    async fn confirm(&self, reference: &TransactionRef) -> Result<(), ConfirmationError>;
}

#[async_trait]
impl<T: WalletSource + ?Sized> WalletSource for Arc<T> {
    fn current_address(&self) -> Option<String> {
        (**self).current_address()
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        (**self).disconnect().await
    }
}

#[async_trait]
impl<T: FundingService + ?Sized> FundingService for Arc<T> {
    async fn request_funds(&self, address: &str, amount: f64) -> Result<TransactionRef, FundingError> {
        (**self).request_funds(address, amount).await
    }

    async fn confirm(&self, reference: &TransactionRef) -> Result<(), ConfirmationError> {
        (**self).confirm(reference).await
    }
}

#[async_trait]
impl<T: BalanceService + ?Sized> BalanceService for Arc<T> {
    async fn balance(&self, address: &str) -> Result<f64, QueryError> {
        (**self).balance(address).await
    }
}

#[async_trait]
impl<T: TransferService + ?Sized> TransferService for Arc<T> {
    async fn submit_transfer(
        &self,
        sender: &str,
        recipient: &str,
        amount: f64,
    ) -> Result<TransactionRef, SubmitError> {
        (**self).submit_transfer(sender, recipient, amount).await
    }

    async fn confirm(&self, reference: &TransactionRef) -> Result<(), ConfirmationError> {
        (**self).confirm(reference).await
    }
}
