use chrono::{TimeZone, Utc};

use crate::constants::{MS_PER_SECOND, WEEK_MS};

pub fn to_seconds(ms: u64) -> u64 {
    ms / MS_PER_SECOND
}

pub fn to_milliseconds(seconds: u64) -> u64 {
    seconds.saturating_mul(MS_PER_SECOND)
}

/// Floors a millisecond timestamp to the start of its week, the only unlock times the escrow accepts.
pub fn round_to_week(ms: u64) -> u64 {
    ms / WEEK_MS * WEEK_MS
}

pub fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Week-aligned unlock timestamp, in seconds, `weeks` weeks after `now_ms`.
pub fn unlock_time_for_weeks(now_ms: u64, weeks: u64) -> u64 {
    to_seconds(round_to_week(
        now_ms.saturating_add(weeks.saturating_mul(WEEK_MS)),
    ))
}

/// Whole weeks left until `unlock_ms`, zero once the lock expired.
pub fn weeks_until(now_ms: u64, unlock_ms: u64) -> u64 {
    unlock_ms.saturating_sub(now_ms) / WEEK_MS
}

pub fn format_date_short(ms: u64) -> String {
    let Ok(ms) = i64::try_from(ms) else {
        return "-".to_string();
    };
    match Utc.timestamp_millis_opt(ms).single() {
        Some(date) => date.format("%d %b %Y").to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_to_week_floors() {
        assert_eq!(round_to_week(WEEK_MS - 1), 0);
        assert_eq!(round_to_week(WEEK_MS), WEEK_MS);
        assert_eq!(round_to_week(3 * WEEK_MS + 12_345), 3 * WEEK_MS);
    }

    #[test]
    fn unlock_time_is_week_aligned() {
        let now = 1_700_000_000_000;
        let unlock = unlock_time_for_weeks(now, 52);

        assert_eq!(unlock % (WEEK_MS / MS_PER_SECOND), 0);
        assert!(to_milliseconds(unlock) <= now + 52 * WEEK_MS);
        assert!(to_milliseconds(unlock) > now + 51 * WEEK_MS);
    }

    #[test]
    fn weeks_until_saturates() {
        assert_eq!(weeks_until(10 * WEEK_MS, 5 * WEEK_MS), 0);
        assert_eq!(weeks_until(0, 5 * WEEK_MS + 1), 5);
    }

    #[test]
    fn formats_short_dates() {
        // 2023-11-14T22:13:20Z
        assert_eq!(format_date_short(1_700_000_000_000), "14 Nov 2023");
    }

    #[test]
    fn out_of_range_dates_are_dashes() {
        assert_eq!(format_date_short(u64::MAX), "-");
        assert_eq!(format_date_short(i64::MAX as u64 + 1), "-");
        assert_eq!(format_date_short(i64::MAX as u64), "-");
    }
}
