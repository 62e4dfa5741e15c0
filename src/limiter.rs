//! Per-address claim counting with persisted cooldown windows.

use std::sync::Arc;

use tracing::debug;
use tracing::info;

use crate::config::ClaimPolicy;
use crate::error::ClaimError;
use crate::store::claim_cooldown_key;
use crate::store::claim_count_key;
use crate::store::DurableKeyValueStore;
use crate::types::ClaimWindow;
use crate::types::Eligibility;

/// Storage-backed claim limiter, scoped per wallet address.
///
/// State lives in the injected [`DurableKeyValueStore`] so it survives page
/// reloads; each address gets its own pair of keys. All decisions are pure
/// in the supplied `now_ms`; callers own the clock.
///
/// Checking eligibility and recording a claim are separate steps with an
/// external funding call in between, and that gap is not atomic: two claim
/// attempts for one address issued before the first resolves can both see
/// an eligible window. Callers must serialize claim attempts per address
/// (e.g. disable the claim action while one is in flight).
pub struct ClaimLimiter<S: DurableKeyValueStore + ?Sized> {
    store: Arc<S>,
    policy: ClaimPolicy,
}

impl<S: DurableKeyValueStore + ?Sized> Clone for ClaimLimiter<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            policy: self.policy,
        }
    }
}

impl<S: DurableKeyValueStore + ?Sized> ClaimLimiter<S> {
    /// Create a limiter over `store` with `policy`.
    pub fn new(store: Arc<S>, policy: ClaimPolicy) -> Self {
        Self { store, policy }
    }

    /// The configured claim policy.
    pub fn policy(&self) -> &ClaimPolicy {
        &self.policy
    }

    /// Load the window for `address`, lazily expiring a finished cooldown.
    ///
    /// The expiry check runs on every load; there is no background sweep.
    /// An elapsed cooldown clears both persisted keys and yields a fresh
    /// window, so loading twice after expiry is idempotent.
    pub async fn load_window(&self, address: &str, now_ms: u64) -> Result<ClaimWindow, ClaimError> {
        let cooldown_key = claim_cooldown_key(address);
        let cooldown_ends_at_ms = match self.store.get(&cooldown_key).await? {
            Some(raw) => Some(parse_timestamp(&cooldown_key, &raw)?),
            None => None,
        };

        if let Some(ends_at) = cooldown_ends_at_ms {
            if now_ms >= ends_at {
                self.reset(address).await?;
                debug!(address = %address, "cooldown expired, window reset");
                return Ok(ClaimWindow::fresh(address));
            }
        }

        let count_key = claim_count_key(address);
        let claim_count = match self.store.get(&count_key).await? {
            Some(raw) => parse_count(&count_key, &raw)?,
            None => 0,
        };

        Ok(ClaimWindow {
            address: address.to_string(),
            claim_count,
            cooldown_ends_at_ms,
        })
    }

    /// Decide whether a claim may proceed at `now_ms`.
    ///
    /// Rules in order: missing address, active cooldown, exhausted limit,
    /// otherwise eligible.
    pub async fn check_eligibility(
        &self,
        address: Option<&str>,
        now_ms: u64,
    ) -> Result<Eligibility, ClaimError> {
        let address = match address {
            Some(address) => address,
            None => return Ok(Eligibility::NoWallet),
        };

        let window = self.load_window(address, now_ms).await?;
        if window.is_on_cooldown(now_ms) {
            return Ok(Eligibility::OnCooldown {
                remaining_ms: window.remaining_cooldown_ms(now_ms),
            });
        }

        // Limit hit but cooldown not recorded: transitional, still refused.
        if window.claim_count >= self.policy.max_claims {
            return Ok(Eligibility::LimitReached {
                claims_used: window.claim_count,
            });
        }

        Ok(Eligibility::Eligible)
    }

    /// Record one confirmed claim for `address`.
    ///
    /// Call exactly once per confirmed funding success; a second call for
    /// the same success double-counts, and a failed funding call must not
    /// reach here at all. Reaching the claim limit starts the cooldown;
    /// this is the only place cooldowns are created.
    pub async fn record_claim(&self, address: &str, now_ms: u64) -> Result<ClaimWindow, ClaimError> {
        let mut window = self.load_window(address, now_ms).await?;
        window.claim_count = window.claim_count.saturating_add(1);
        self.store
            .set(&claim_count_key(address), &window.claim_count.to_string())
            .await?;

        if window.claim_count >= self.policy.max_claims {
            let ends_at = now_ms + self.policy.cooldown_duration_ms;
            self.store
                .set(&claim_cooldown_key(address), &ends_at.to_string())
                .await?;
            window.cooldown_ends_at_ms = Some(ends_at);
            info!(
                address = %address,
                claims_used = window.claim_count,
                cooldown_ends_at_ms = ends_at,
                "claim limit reached, cooldown started"
            );
        } else {
            debug!(address = %address, claims_used = window.claim_count, "claim recorded");
        }

        Ok(window)
    }

    /// Clear all persisted state for `address`.
    pub async fn reset(&self, address: &str) -> Result<(), ClaimError> {
        self.store.remove(&claim_count_key(address)).await?;
        self.store.remove(&claim_cooldown_key(address)).await?;
        Ok(())
    }
}

fn parse_count(key: &str, raw: &str) -> Result<u32, ClaimError> {
    raw.parse().map_err(|_| ClaimError::Corrupted {
        key: key.to_string(),
        reason: format!("'{}' is not a decimal count", raw),
    })
}

fn parse_timestamp(key: &str, raw: &str) -> Result<u64, ClaimError> {
    raw.parse().map_err(|_| ClaimError::Corrupted {
        key: key.to_string(),
        reason: format!("'{}' is not a millisecond timestamp", raw),
    })
}
