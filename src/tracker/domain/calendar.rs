//! Day sequences for uptime rollups.
//!
//! Both sequences are generated here rather than in SQL so every storage
//! backend returns the same days, including days without samples.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Length of the rolling uptime window, today included.
pub const ROLLING_WINDOW_DAYS: u64 = 15;

/// How far back the calendar grid reaches before snapping to a Monday.
pub const CALENDAR_LOOKBACK_DAYS: u64 = 150;

/// A day positioned in the calendar grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarSlot {
    /// UTC calendar day.
    pub day: NaiveDate,
    /// Zero-based week row.
    pub week: u32,
    /// Day within the week, Monday being 0.
    pub day_offset: u8,
}

/// Returns today and the preceding fourteen days, oldest first.
#[must_use]
pub fn rolling_window_days(today: NaiveDate) -> Vec<NaiveDate> {
    let first = today
        .checked_sub_days(Days::new(ROLLING_WINDOW_DAYS.saturating_sub(1)))
        .unwrap_or(NaiveDate::MIN);
    first.iter_days().take_while(|day| *day <= today).collect()
}

/// Returns every day from the Monday on or before `today - 150 days`
/// through `today`, tagged with its week row and weekday offset.
#[must_use]
pub fn calendar_grid_slots(today: NaiveDate) -> Vec<CalendarSlot> {
    let lookback = today
        .checked_sub_days(Days::new(CALENDAR_LOOKBACK_DAYS))
        .unwrap_or(NaiveDate::MIN);
    let first_monday = lookback
        .checked_sub_days(Days::new(u64::from(
            lookback.weekday().num_days_from_monday(),
        )))
        .unwrap_or(lookback);

    let mut slots = Vec::new();
    let mut week: u32 = 0;
    let mut day_offset: u8 = 0;
    for day in first_monday.iter_days().take_while(|day| *day <= today) {
        slots.push(CalendarSlot {
            day,
            week,
            day_offset,
        });
        if day_offset == 6 {
            day_offset = 0;
            week = week.saturating_add(1);
        } else {
            day_offset = day_offset.saturating_add(1);
        }
    }
    slots
}
