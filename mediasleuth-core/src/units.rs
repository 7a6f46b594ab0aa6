//! Time units and best-fit duration formatting.
//!
//! Durations are held internally in milliseconds and rendered in the largest
//! unit whose value is at least one, rounded to two decimals
//! (`125 s` renders as `"2.08 minutes"`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Units ordered from smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 8] = [
        TimeUnit::Milliseconds,
        TimeUnit::Seconds,
        TimeUnit::Minutes,
        TimeUnit::Hours,
        TimeUnit::Days,
        TimeUnit::Weeks,
        TimeUnit::Months,
        TimeUnit::Years,
    ];

    /// Length of one unit in milliseconds. Months are four weeks and years
    /// twelve such months.
    pub fn factor(self) -> f64 {
        match self {
            TimeUnit::Milliseconds => 1.0,
            TimeUnit::Seconds => 1_000.0,
            TimeUnit::Minutes => 60_000.0,
            TimeUnit::Hours => 3_600_000.0,
            TimeUnit::Days => 86_400_000.0,
            TimeUnit::Weeks => 604_800_000.0,
            TimeUnit::Months => 2_419_200_000.0,
            TimeUnit::Years => 29_030_400_000.0,
        }
    }

    pub fn long_name(self) -> &'static str {
        match self {
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
            TimeUnit::Weeks => "weeks",
            TimeUnit::Months => "months",
            TimeUnit::Years => "years",
        }
    }

    fn short_names(self) -> &'static [&'static str] {
        match self {
            TimeUnit::Milliseconds => &["ms", "millisecond"],
            TimeUnit::Seconds => &["s", "sec", "second"],
            TimeUnit::Minutes => &["m", "min", "minute"],
            TimeUnit::Hours => &["h", "hr", "hour"],
            TimeUnit::Days => &["d", "day"],
            TimeUnit::Weeks => &["w", "wk", "week"],
            TimeUnit::Months => &["mo", "month"],
            TimeUnit::Years => &["y", "yr", "year"],
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.long_name())
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        TimeUnit::ALL
            .into_iter()
            .find(|u| u.long_name() == needle || u.short_names().contains(&needle.as_str()))
            .ok_or_else(|| format!("unknown time unit: {s}"))
    }
}

/// A span of time stored in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct SmartDuration {
    millis: f64,
}

impl SmartDuration {
    pub fn new(value: f64, unit: TimeUnit) -> Self {
        Self {
            millis: value * unit.factor(),
        }
    }

    pub fn from_seconds(seconds: f64) -> Self {
        Self::new(seconds, TimeUnit::Seconds)
    }

    pub fn as_unit(&self, unit: TimeUnit) -> f64 {
        self.millis / unit.factor()
    }

    /// Largest unit in which the value is at least one; milliseconds otherwise.
    pub fn best_fit_unit(&self) -> TimeUnit {
        TimeUnit::ALL
            .into_iter()
            .rev()
            .find(|u| self.millis.abs() / u.factor() >= 1.0)
            .unwrap_or(TimeUnit::Milliseconds)
    }

    /// Renders `"<value rounded to 2 places> <unit>"` in the best-fit unit.
    pub fn fit_string(&self) -> String {
        let unit = self.best_fit_unit();
        format!("{} {}", format_rounded(self.as_unit(unit), 2), unit)
    }
}

/// Shortcut for rendering `value` of `unit` in its best-fit unit.
pub fn fit_string(value: f64, unit: TimeUnit) -> String {
    SmartDuration::new(value, unit).fit_string()
}

/// Rounds to `places` decimals and drops trailing zeros, keeping one digit
/// after the point for whole numbers (`10.0`, `2.08`, `2.5`).
pub fn format_rounded(value: f64, places: i32) -> String {
    let scale = 10f64.powi(places);
    let rounded = (value * scale).round() / scale;
    if rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        let text = format!("{:.*}", places as usize, rounded);
        text.trim_end_matches('0').to_string()
    }
}
