use alloy_primitives::U256;

use crate::{
    constants::MAX_LOCK,
    time::{now_ms, round_to_week, to_seconds},
};

/// Voting power granted by locking `lock_amount` until `unlock_time_ms`, evaluated at `now_ms`.
///
/// Mirrors the escrow's own linear decay: weight falls linearly with the remaining
/// (week-aligned) lock duration and saturates at `lock_amount` for locks of `MAX_LOCK` or more.
/// The amount is expected to be validated by the caller.
pub fn voting_power_at(lock_amount: U256, unlock_time_ms: u64, now_ms: u64) -> U256 {
    let unlock_seconds = to_seconds(round_to_week(unlock_time_ms)) as i128;
    let duration = unlock_seconds - to_seconds(now_ms) as i128;

    if duration <= 0 {
        return U256::ZERO;
    }
    if duration >= MAX_LOCK as i128 {
        return lock_amount;
    }

    // amount * duration / MAX_LOCK, split so the product cannot overflow
    // for any amount. Exact because duration < MAX_LOCK.
    let duration = U256::from(duration as u64);
    let max_lock = U256::from(MAX_LOCK);
    let whole = lock_amount / max_lock * duration;
    let rest = lock_amount % max_lock * duration / max_lock;
    whole + rest
}

pub fn get_voting_power(lock_amount: U256, unlock_time_ms: u64) -> U256 {
    voting_power_at(lock_amount, unlock_time_ms, now_ms())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{WEEK_MS, YEAR_SECONDS};
    use crate::time::to_milliseconds;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const NOW: u64 = 1_700_000_000_000;

    fn tokens(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18))
    }

    #[test_case(0 ; "zero amount")]
    #[test_case(1 ; "one wei")]
    #[test_case(1_000 ; "thousand tokens")]
    fn expired_lock_has_no_power(amount: u64) {
        let amount = tokens(amount);
        assert_eq!(voting_power_at(amount, NOW, NOW), U256::ZERO);
        assert_eq!(voting_power_at(amount, NOW - WEEK_MS, NOW), U256::ZERO);
        assert_eq!(voting_power_at(amount, 0, NOW), U256::ZERO);
    }

    #[test]
    fn lock_inside_current_week_has_no_power() {
        // Rounds down to a week boundary that is already in the past.
        let unlock = round_to_week(NOW) + 1;
        assert_eq!(voting_power_at(tokens(10), unlock, NOW), U256::ZERO);
    }

    #[test_case(0 ; "exactly max")]
    #[test_case(WEEK_MS ; "one week past max")]
    #[test_case(10 * 52 * WEEK_MS ; "ten years past max")]
    fn max_lock_grants_full_weight(extra_ms: u64) {
        let now = round_to_week(NOW);
        let unlock = now + to_milliseconds(MAX_LOCK) + extra_ms;
        let amount = tokens(1_000) + U256::from(7);

        assert_eq!(voting_power_at(amount, unlock, now), amount);
    }

    #[test]
    fn two_year_lock_grants_half_weight() {
        let amount = tokens(1_000);
        let unlock = NOW + to_milliseconds(2 * YEAR_SECONDS);
        let power = voting_power_at(amount, unlock, NOW);

        // Week alignment can shave up to one week off the duration.
        let one_week_of_power = amount * U256::from(WEEK_MS / 1_000) / U256::from(MAX_LOCK);
        let half = tokens(500);
        let tolerance = one_week_of_power + tokens(3);
        assert!(power <= half + tolerance, "power {power} too large");
        assert!(power + tolerance >= half, "power {power} too small");
    }

    #[test]
    fn linear_branch_multiplies_before_dividing() {
        // A lock amount smaller than MAX_LOCK would floor to zero if divided first.
        let now = round_to_week(NOW);
        let unlock = now + to_milliseconds(MAX_LOCK / 2);
        assert_eq!(voting_power_at(U256::from(1_000u64), unlock, now), U256::from(500u64));
    }

    #[test]
    fn huge_amounts_decay_without_capping() {
        let now = round_to_week(NOW);
        let unlock = now + to_milliseconds(MAX_LOCK / 2);

        assert_eq!(voting_power_at(U256::MAX, unlock, now), U256::MAX >> 1);

        let quarter = now + to_milliseconds(MAX_LOCK / 4);
        let amount = U256::MAX - U256::from(3u8);
        assert_eq!(voting_power_at(amount, quarter, now), amount / U256::from(4u8));
    }

    #[test]
    fn monotonic_and_bounded_between_now_and_max() {
        let amount = tokens(42);
        let mut previous = U256::ZERO;

        for week in 0..=210u64 {
            let unlock = NOW + week * WEEK_MS;
            let power = voting_power_at(amount, unlock, NOW);

            assert!(power >= previous);
            assert!(power <= amount);
            previous = power;
        }
        assert_eq!(previous, amount);
    }
}
