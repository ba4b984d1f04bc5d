use chrono::{DateTime, SecondsFormat, Utc};

/// Source of the capture time stamped on measurement batches
pub trait Clock: Send + Sync {
    /// Capture time in whole epoch seconds, as SiteWise `timeInSeconds` expects
    fn now_epoch_seconds(&self) -> i64;

    /// Capture time for log fields, at second precision
    fn now_rfc3339(&self) -> String {
        DateTime::from_timestamp(self.now_epoch_seconds(), 0)
            .unwrap_or_default()
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Wall clock used by the deployed function
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Clock pinned to one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    epoch_seconds: i64,
}

impl FixedClock {
    /// Sub-second precision is dropped
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self::from_epoch_seconds(instant.timestamp())
    }

    pub fn from_epoch_seconds(epoch_seconds: i64) -> Self {
        Self { epoch_seconds }
    }
}

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> i64 {
        self.epoch_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_current() {
        let before = Utc::now().timestamp();
        let now = SystemClock::new().now_epoch_seconds();

        assert!(now >= before && now - before < 5);
    }

    #[test]
    fn test_fixed_clock_drops_fraction() {
        let instant = DateTime::from_timestamp(1700000000, 999_000_000).unwrap();
        let clock = FixedClock::new(instant);

        assert_eq!(clock.now_epoch_seconds(), 1700000000);
        assert_eq!(clock.now_rfc3339(), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_log_time_matches_capture_time() {
        let clock: &dyn Clock = &SystemClock::new();
        let logged = DateTime::parse_from_rfc3339(&clock.now_rfc3339()).unwrap();

        assert!((clock.now_epoch_seconds() - logged.timestamp()).abs() <= 1);
    }
}
