//! Claim policy and target cluster configuration.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_COOLDOWN_DURATION_MS;
use crate::constants::DEFAULT_MAX_CLAIMS;
use crate::constants::DEFAULT_MAX_CLAIM_AMOUNT;
use crate::constants::DEFAULT_MIN_CLAIM_AMOUNT;

/// Claim policy: how many claims a window allows, how long the cooldown
/// runs once the limit is hit, and the admissible amount range.
///
/// Static configuration; never mutated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClaimPolicy {
    /// Successful claims allowed before the cooldown starts.
    pub max_claims: u32,
    /// Cooldown duration in milliseconds.
    pub cooldown_duration_ms: u64,
    /// Smallest claimable amount (whole currency units).
    pub min_amount: f64,
    /// Largest claimable amount (whole currency units).
    pub max_amount: f64,
}

impl Default for ClaimPolicy {
    fn default() -> Self {
        Self {
            max_claims: DEFAULT_MAX_CLAIMS,
            cooldown_duration_ms: DEFAULT_COOLDOWN_DURATION_MS,
            min_amount: DEFAULT_MIN_CLAIM_AMOUNT,
            max_amount: DEFAULT_MAX_CLAIM_AMOUNT,
        }
    }
}

impl ClaimPolicy {
    /// Create a policy with the given claim limit and cooldown, keeping the
    /// default amount range.
    pub fn new(max_claims: u32, cooldown_duration_ms: u64) -> Self {
        Self {
            max_claims,
            cooldown_duration_ms,
            ..Self::default()
        }
    }

    /// Create a policy with the cooldown given in whole minutes.
    pub fn with_cooldown_minutes(max_claims: u32, minutes: u64) -> Self {
        Self::new(max_claims, minutes * 60 * 1000)
    }

    /// Whether `amount` falls inside the admissible range.
    pub fn amount_in_range(&self, amount: f64) -> bool {
        amount >= self.min_amount && amount <= self.max_amount
    }

    /// Clamp `amount` into the admissible range (input-field helper).
    pub fn clamp_amount(&self, amount: f64) -> f64 {
        amount.clamp(self.min_amount, self.max_amount)
    }
}

/// Target cluster for funding requests.
///
/// Airdrops exist only on development clusters; a mainnet faucet request is
/// refused before any external call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cluster {
    /// Development cluster with faucet support.
    Devnet,
    /// Public test cluster with faucet support.
    Testnet,
    /// Production cluster; no faucet.
    Mainnet,
}

impl Cluster {
    /// Whether this cluster serves airdrop requests.
    pub fn supports_airdrop(&self) -> bool {
        !matches!(self, Cluster::Mainnet)
    }

    /// Lowercase cluster name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Cluster::Devnet => "devnet",
            Cluster::Testnet => "testnet",
            Cluster::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
