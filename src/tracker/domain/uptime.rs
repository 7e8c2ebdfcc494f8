//! Day-bucketed uptime and round-trip time rollups.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder rendered for RTT figures of a day with no successful probe.
const NOT_AVAILABLE: &str = "n/a";

/// Round-trip time statistics over the non-null RTTs of one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RttStats {
    /// Fastest recorded RTT in milliseconds.
    pub min_ms: i64,
    /// Slowest recorded RTT in milliseconds.
    pub max_ms: i64,
    /// Mean RTT in milliseconds.
    pub mean_ms: f64,
}

impl RttStats {
    /// Computes statistics over `rtts`, returning `None` when it is empty.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "the mean of millisecond RTTs is a float ratio"
    )]
    pub fn from_millis(rtts: impl IntoIterator<Item = i64>) -> Option<Self> {
        let mut count: u64 = 0;
        let mut sum: i128 = 0;
        let mut min = i64::MAX;
        let mut max = i64::MIN;
        for rtt in rtts {
            count = count.saturating_add(1);
            sum = sum.saturating_add(i128::from(rtt));
            min = min.min(rtt);
            max = max.max(rtt);
        }
        (count > 0).then(|| Self {
            min_ms: min,
            max_ms: max,
            mean_ms: sum as f64 / count as f64,
        })
    }

    /// Returns the mean rounded to the nearest millisecond, halves away from
    /// zero.
    #[must_use]
    pub fn rounded_mean_ms(&self) -> f64 {
        self.mean_ms.round()
    }
}

/// Raw per-day sample counts as returned by a status repository.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySamples {
    /// UTC calendar day.
    pub day: NaiveDate,
    /// Number of samples recorded on the day.
    pub total: u32,
    /// Number of those samples classified up.
    pub up: u32,
    /// RTT statistics over the samples that carry an RTT.
    pub rtt: Option<RttStats>,
}

impl DailySamples {
    /// Returns an empty bucket for `day`.
    #[must_use]
    pub const fn empty(day: NaiveDate) -> Self {
        Self {
            day,
            total: 0,
            up: 0,
            rtt: None,
        }
    }
}

/// Colour band used when rendering an uptime percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UptimeClass {
    /// At least 99 percent.
    High,
    /// At least 50 and below 99 percent.
    Mid,
    /// Below 50 percent.
    Low,
}

impl UptimeClass {
    /// Buckets an uptime percentage.
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 99.0 {
            Self::High
        } else if percent >= 50.0 {
            Self::Mid
        } else {
            Self::Low
        }
    }

    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Mid => "mid",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for UptimeClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Uptime rollup for one UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UptimeDay {
    day: NaiveDate,
    uptime_percent: f64,
    samples: u32,
    rtt: Option<RttStats>,
}

impl UptimeDay {
    /// Builds the rollup for one day's samples.
    ///
    /// A day without samples has an uptime of zero.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "uptime is a percentage")]
    pub fn from_samples(samples: DailySamples) -> Self {
        let uptime_percent = if samples.total == 0 {
            0.0
        } else {
            100.0 * f64::from(samples.up) / f64::from(samples.total)
        };
        Self {
            day: samples.day,
            uptime_percent,
            samples: samples.total,
            rtt: samples.rtt,
        }
    }

    /// Returns the UTC calendar day.
    #[must_use]
    pub const fn day(&self) -> NaiveDate {
        self.day
    }

    /// Returns `100 * up / total`, or zero for an empty day.
    #[must_use]
    pub const fn uptime_percent(&self) -> f64 {
        self.uptime_percent
    }

    /// Returns the number of samples recorded on the day.
    #[must_use]
    pub const fn samples(&self) -> u32 {
        self.samples
    }

    /// Returns RTT statistics, absent when no sample carried an RTT.
    #[must_use]
    pub const fn rtt(&self) -> Option<RttStats> {
        self.rtt
    }

    /// Returns the colour band for the uptime percentage.
    #[must_use]
    pub fn class(&self) -> UptimeClass {
        UptimeClass::from_percent(self.uptime_percent)
    }

    /// Formats the uptime percentage with three significant digits and no
    /// trailing zeros (`66.7`, `100`, `0`).
    #[must_use]
    pub fn uptime_label(&self) -> String {
        let percent = self.uptime_percent;
        let decimals: usize = if percent >= 100.0 {
            0
        } else if percent >= 10.0 {
            1
        } else if percent >= 1.0 {
            2
        } else {
            3
        };
        let text = format!("{percent:.decimals$}");
        if text.contains('.') {
            text.trim_end_matches('0').trim_end_matches('.').to_owned()
        } else {
            text
        }
    }

    /// Formats the minimum RTT, or `n/a`.
    #[must_use]
    pub fn rtt_min_label(&self) -> String {
        self.rtt
            .map_or_else(|| NOT_AVAILABLE.to_owned(), |rtt| rtt.min_ms.to_string())
    }

    /// Formats the maximum RTT, or `n/a`.
    #[must_use]
    pub fn rtt_max_label(&self) -> String {
        self.rtt
            .map_or_else(|| NOT_AVAILABLE.to_owned(), |rtt| rtt.max_ms.to_string())
    }

    /// Formats the mean RTT rounded to the nearest millisecond, or `n/a`.
    #[must_use]
    pub fn rtt_mean_label(&self) -> String {
        self.rtt.map_or_else(
            || NOT_AVAILABLE.to_owned(),
            |rtt| format!("{:.0}", rtt.rounded_mean_ms()),
        )
    }
}

/// One cell of the calendar heat-map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// Zero-based week row, counted from the first Monday of the grid.
    pub week: u32,
    /// Day within the week, Monday being 0.
    pub day_offset: u8,
    /// Rollup for the day.
    pub uptime: UptimeDay,
}
