//! Conviction voting math.
//!
//! A voter who locks their position behind a choice earns a linear bonus on
//! top of their base weight, up to +70% at a 7-day lock. Decay is a pure
//! read-time projection: the stored vote and the tallies are never
//! rewritten as the lock elapses.

use agora_types::{Duration, Timestamp};

use crate::proposal::Vote;

/// Multiplier for an unlocked vote, in basis points (1.0x).
pub const CONVICTION_BASE_BPS: u64 = 10_000;

/// Largest bonus a lock can earn (+70%).
pub const CONVICTION_MAX_BONUS_BPS: u64 = 7_000;

/// Lock duration at which the bonus saturates (7 days).
pub const CONVICTION_MAX_LOCK: Duration = 7 * 86_400;

/// Multiplier in basis points for a given lock duration.
///
/// Linear in the lock time: 1 day earns +10% (11000), 7 days or more earn
/// the full +70% (17000). A zero lock is exactly the base.
pub fn calculate_conviction_multiplier(lock_secs: Duration) -> u64 {
    let bonus = (lock_secs as u128)
        .saturating_mul(CONVICTION_MAX_BONUS_BPS as u128)
        / CONVICTION_MAX_LOCK as u128;
    CONVICTION_BASE_BPS + (bonus as u64).min(CONVICTION_MAX_BONUS_BPS)
}

/// Scale a base weight by the conviction multiplier for `lock_secs`.
pub fn apply_conviction(power: u128, lock_secs: Duration) -> u128 {
    power.saturating_mul(calculate_conviction_multiplier(lock_secs) as u128)
        / CONVICTION_BASE_BPS as u128
}

/// The vote's currently effective weight as its lock elapses.
///
/// Projects the stored weight down by the ratio of the remaining-lock
/// multiplier to the multiplier it was cast with. A vote without a lock
/// projects to its stored weight unchanged, so this is callable at any
/// time.
pub fn decayed_weight(vote: &Vote, now: Timestamp) -> u128 {
    if vote.conviction_lock == 0 {
        return vote.voting_power;
    }
    let elapsed = now.saturating_sub(vote.cast_at);
    let remaining = vote.conviction_lock.saturating_sub(elapsed);

    let cast_multiplier = calculate_conviction_multiplier(vote.conviction_lock) as u128;
    let current_multiplier = calculate_conviction_multiplier(remaining) as u128;
    vote.voting_power.saturating_mul(current_multiplier) / cast_multiplier
}
