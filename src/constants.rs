//! Fixed policy constants for the faucet core.

/// Successful claims allowed per address before the cooldown starts.
pub const DEFAULT_MAX_CLAIMS: u32 = 2;

/// Cooldown duration once the claim limit is reached (5 minutes).
pub const DEFAULT_COOLDOWN_DURATION_MS: u64 = 5 * 60 * 1000;

/// Smallest claimable amount in whole currency units.
pub const DEFAULT_MIN_CLAIM_AMOUNT: f64 = 0.1;

/// Largest claimable amount in whole currency units.
pub const DEFAULT_MAX_CLAIM_AMOUNT: f64 = 2.0;

/// Interval between cooldown remainder recomputations.
pub const DEFAULT_COOLDOWN_TICK_MS: u64 = 1000;

/// Storage key prefix for per-address claim counts.
pub const CLAIM_COUNT_KEY_PREFIX: &str = "claim_count_";

/// Storage key prefix for per-address cooldown deadlines.
pub const CLAIM_COOLDOWN_KEY_PREFIX: &str = "claim_cooldown_";

/// Shortest structurally valid base58 wallet address.
pub const MIN_ADDRESS_LEN: usize = 32;

/// Longest structurally valid base58 wallet address.
pub const MAX_ADDRESS_LEN: usize = 44;
