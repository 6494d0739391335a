/// Clock helpers backing expiry checks.
///
/// Expiries are plain Unix timestamps in seconds; every relative or
/// table-driven legacy expiry is normalized to this form before storage.

/// Returns the current Unix timestamp in seconds.
pub fn now_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Whether the given Unix timestamp has already passed.
///
/// An instant equal to "now" counts as passed; a grant expiring this very
/// second is no longer live.
pub fn is_past(timestamp: i64) -> bool {
    timestamp <= now_timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_timestamp_is_reasonable() {
        let ts = now_timestamp();
        // Should be after 2024-01-01 (1704067200)
        assert!(ts > 1704067200, "Timestamp {} is too old", ts);
        // Should be before 2100-01-01 (4102444800)
        assert!(ts < 4102444800, "Timestamp {} is too far in future", ts);
    }

    #[test]
    fn test_is_past() {
        assert!(is_past(0));
        assert!(is_past(now_timestamp() - 60));
        assert!(!is_past(now_timestamp() + 3600));
    }
}
