use chrono::{Local, NaiveDate, NaiveDateTime};
use std::time::{Duration, Instant};
use tracing::info;

/// Snapshot timestamp, e.g. `2024/01/31 08:05:00`.
pub const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Date embedded in the history file name, e.g. `2024_01_31`.
pub const FILE_DATE_FORMAT: &str = "%Y_%m_%d";

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Source of local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

pub fn format_timestamp(t: NaiveDateTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

pub fn format_file_date(d: NaiveDate) -> String {
    d.format(FILE_DATE_FORMAT).to_string()
}

// ── Timer ─────────────────────────────────────────────────────────────────────

/// A simple wall-clock timer for logging elapsed time.
pub struct Timer {
    label: String,
    start: Instant,
}

impl Timer {
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        info!("⏱  Starting: {}", label);
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!(
            "⏱  Finished: {} (took {:.2?})",
            self.label,
            self.elapsed()
        );
    }
}

/// Format a large integer with thousands separators.
pub fn fmt_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
pub mod testing {
    use super::Clock;
    use chrono::NaiveDateTime;

    /// Clock frozen at one instant.
    pub struct FixedClock(pub NaiveDateTime);

    impl FixedClock {
        pub fn at(s: &str) -> Self {
            Self(NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap())
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FixedClock;
    use super::*;

    #[test]
    fn test_fmt_number() {
        assert_eq!(fmt_number(1_234_567), "1,234,567");
        assert_eq!(fmt_number(0), "0");
        assert_eq!(fmt_number(999), "999");
    }

    #[test]
    fn test_formats() {
        let clock = FixedClock::at("2024-01-05 07:08:09");
        assert_eq!(format_timestamp(clock.now()), "2024/01/05 07:08:09");
        assert_eq!(format_file_date(clock.today()), "2024_01_05");
    }
}
