use std::time::{Duration, Instant};

/// How often the elapsed display refreshes.
pub const TICK: Duration = Duration::from_secs(1);

/// Elapsed-time thresholds for the timer's colour tiers. Read once from the
/// configuration at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerThresholds {
    pub warning_after: Duration,
    pub critical_after: Duration,
}

impl Default for TimerThresholds {
    fn default() -> Self {
        Self {
            warning_after: Duration::from_secs(600),
            critical_after: Duration::from_secs(630),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

impl Severity {
    /// Tiers switch strictly after a threshold: exactly 10:00 is still normal.
    pub fn classify(elapsed: Duration, thresholds: &TimerThresholds) -> Self {
        let secs = elapsed.as_secs();
        if secs > thresholds.critical_after.as_secs() {
            Self::Critical
        } else if secs > thresholds.warning_after.as_secs() {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

/// `MM:SS`, minutes keep growing past 99.
pub fn format_clock(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerReading {
    pub label: String,
    pub severity: Severity,
}

#[derive(Debug, Clone)]
pub struct ElapsedTimer {
    started: Instant,
    thresholds: TimerThresholds,
}

impl ElapsedTimer {
    pub fn started_at(started: Instant, thresholds: TimerThresholds) -> Self {
        Self {
            started,
            thresholds,
        }
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    /// Whole seconds since the start.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        Duration::from_secs(now.saturating_duration_since(self.started).as_secs())
    }

    pub fn reading_at(&self, now: Instant) -> TimerReading {
        let elapsed = self.elapsed_at(now);
        TimerReading {
            label: format_clock(elapsed),
            severity: Severity::classify(elapsed, &self.thresholds),
        }
    }

    /// Time until the displayed label next changes.
    pub fn until_next_tick(&self, now: Instant) -> Duration {
        let since = now.saturating_duration_since(self.started);
        TICK.saturating_sub(Duration::from_nanos(
            u64::try_from(since.as_nanos() % TICK.as_nanos()).unwrap_or(0),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(Duration::ZERO), "00:00");
        assert_eq!(format_clock(Duration::from_secs(59)), "00:59");
        assert_eq!(format_clock(Duration::from_secs(61)), "01:01");
        assert_eq!(format_clock(Duration::from_secs(630)), "10:30");
        assert_eq!(format_clock(Duration::from_secs(100 * 60 + 5)), "100:05");
        assert_eq!(format_clock(Duration::from_millis(1999)), "00:01");
    }

    #[test]
    fn test_severity_tiers() {
        let t = TimerThresholds::default();
        let at = |s| Severity::classify(Duration::from_secs(s), &t);
        assert_eq!(at(0), Severity::Normal);
        assert_eq!(at(600), Severity::Normal);
        assert_eq!(at(601), Severity::Warning);
        assert_eq!(at(630), Severity::Warning);
        assert_eq!(at(631), Severity::Critical);
    }

    #[test]
    fn test_custom_thresholds() {
        let t = TimerThresholds {
            warning_after: Duration::from_secs(60),
            critical_after: Duration::from_secs(120),
        };
        assert_eq!(Severity::classify(Duration::from_secs(90), &t), Severity::Warning);
        assert_eq!(Severity::classify(Duration::from_secs(121), &t), Severity::Critical);
    }

    #[test]
    fn test_reading_at() {
        let start = Instant::now();
        let timer = ElapsedTimer::started_at(start, TimerThresholds::default());
        let reading = timer.reading_at(start + Duration::from_millis(65_400));
        assert_eq!(reading.label, "01:05");
        assert_eq!(reading.severity, Severity::Normal);

        let reading = timer.reading_at(start + Duration::from_secs(700));
        assert_eq!(reading.label, "11:40");
        assert_eq!(reading.severity, Severity::Critical);
    }

    #[test]
    fn test_clock_before_start_reads_zero() {
        let start = Instant::now() + Duration::from_secs(5);
        let timer = ElapsedTimer::started_at(start, TimerThresholds::default());
        assert_eq!(timer.elapsed_at(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn test_until_next_tick() {
        let start = Instant::now();
        let timer = ElapsedTimer::started_at(start, TimerThresholds::default());
        let wait = timer.until_next_tick(start + Duration::from_millis(2_250));
        assert_eq!(wait, Duration::from_millis(750));
        assert_eq!(timer.until_next_tick(start), TICK);
    }
}
