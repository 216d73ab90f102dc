//! Timeout conversion utilities.

use std::time::Duration;

/// Convert a timeout configured in milliseconds into the whole seconds the
/// connection string carries.
///
/// Fractions of a second are dropped: 1999 ms becomes 1 s, and anything below
/// 1000 ms becomes zero, which the driver treats as "no timeout".
pub fn truncate_ms_to_secs(ms: u64) -> Duration {
    Duration::from_secs(ms / 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_fractional_seconds() {
        assert_eq!(truncate_ms_to_secs(1999), Duration::from_secs(1));
        assert_eq!(truncate_ms_to_secs(2000), Duration::from_secs(2));
        assert_eq!(truncate_ms_to_secs(30_500), Duration::from_secs(30));
    }

    #[test]
    fn test_sub_second_becomes_zero() {
        assert_eq!(truncate_ms_to_secs(0), Duration::ZERO);
        assert_eq!(truncate_ms_to_secs(999), Duration::ZERO);
    }
}
