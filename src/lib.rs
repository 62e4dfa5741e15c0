//! Claim rate limiting and transfer validation for a devnet faucet wallet.
//!
//! Pure state/logic core consumed by a presentation layer:
//!
//! - [`ClaimLimiter`] - per-address claim counting with persisted cooldown windows
//! - [`validate_transfer`] - admit/reject verdicts with fixed-priority reasons
//! - [`Debouncer`] - trailing-edge coalescing of repeated UI intents
//! - [`FaucetService`] - wires the flows through the collaborator capabilities
//! - [`CooldownWatch`] - countdown publishing derived from the absolute deadline
//!
//! Wallet handshake, RPC transport and signing live behind the capability
//! traits in [`services`]; durable state behind [`DurableKeyValueStore`].
//! Cooldown arithmetic is pure in the injected clock's `now_ms`: remainders
//! are recomputed from the stored end-time on every tick, never decremented,
//! so they cannot drift and are testable without waiting in real time.
//!
//! ## Claim flow
//!
//! ```ignore
//! use faucet_core::{ClaimLimiter, ClaimPolicy, Cluster, FaucetService, MemoryStore};
//!
//! let limiter = ClaimLimiter::new(store, ClaimPolicy::default());
//! let faucet = FaucetService::new(limiter, wallet, funding, balances, transfers, clock, Cluster::Devnet);
//!
//! match faucet.claim(1.0).await {
//!     Ok(receipt) => println!("funded: {}", receipt.reference),
//!     Err(reason) => println!("refused: {}", reason),
//! }
//! ```

pub mod config;
pub mod constants;
pub mod cooldown;
pub mod debounce;
pub mod error;
pub mod faucet;
pub mod limiter;
pub mod services;
pub mod store;
pub mod test_support;
pub mod time;
pub mod types;
pub mod util;
pub mod validator;

pub use config::ClaimPolicy;
pub use config::Cluster;
pub use cooldown::CooldownWatch;
pub use debounce::Debouncer;
pub use error::ClaimError;
pub use error::ConfirmationError;
pub use error::FaucetError;
pub use error::FundingError;
pub use error::QueryError;
pub use error::StoreError;
pub use error::SubmitError;
pub use error::WalletError;
pub use faucet::ClaimReceipt;
pub use faucet::FaucetService;
pub use limiter::ClaimLimiter;
pub use services::BalanceService;
pub use services::FundingService;
pub use services::TransferService;
pub use services::WalletSource;
pub use store::DurableKeyValueStore;
pub use store::MemoryStore;
pub use time::Clock;
pub use time::ManualClock;
pub use time::SystemClock;
pub use types::ClaimWindow;
pub use types::Eligibility;
pub use types::TransactionRef;
pub use types::TransferIntent;
pub use validator::validate_transfer;
pub use validator::RejectReason;
pub use validator::Verdict;
