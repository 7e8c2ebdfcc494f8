//! Uptime rollups over the rolling window and the calendar grid.

use super::TrackerServiceResult;
use crate::tracker::{
    domain::{
        CalendarDay, DailySamples, ServerId, UptimeDay, calendar_grid_slots, rolling_window_days,
    },
    ports::StatusRepository,
};
use chrono::NaiveDate;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;

/// Turns status history into day-bucketed uptime figures.
///
/// Days are UTC calendar days. Every day of a requested range is present in
/// the output, with zero samples when nothing was recorded.
#[derive(Clone)]
pub struct UptimeAggregator<R, C>
where
    R: StatusRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> UptimeAggregator<R, C>
where
    R: StatusRepository,
    C: Clock + Send + Sync,
{
    /// Creates an aggregator.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns today and the fourteen preceding days, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerServiceError::Repository`] when samples
    /// cannot be loaded.
    pub async fn rolling_window(
        &self,
        server_id: ServerId,
    ) -> TrackerServiceResult<Vec<UptimeDay>> {
        let days = rolling_window_days(self.today());
        let (Some(&first), Some(&last)) = (days.first(), days.last()) else {
            return Ok(Vec::new());
        };
        let samples = self.samples_by_day(server_id, first, last).await?;

        Ok(days
            .into_iter()
            .map(|day| UptimeDay::from_samples(day_samples(&samples, day)))
            .collect())
    }

    /// Returns the calendar heat-map from the Monday on or before
    /// 150 days ago through today, ordered by week then weekday.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerServiceError::Repository`] when samples
    /// cannot be loaded.
    pub async fn calendar_grid(
        &self,
        server_id: ServerId,
    ) -> TrackerServiceResult<Vec<CalendarDay>> {
        let slots = calendar_grid_slots(self.today());
        let (Some(first), Some(last)) = (slots.first(), slots.last()) else {
            return Ok(Vec::new());
        };
        let samples = self.samples_by_day(server_id, first.day, last.day).await?;

        Ok(slots
            .into_iter()
            .map(|slot| CalendarDay {
                week: slot.week,
                day_offset: slot.day_offset,
                uptime: UptimeDay::from_samples(day_samples(&samples, slot.day)),
            })
            .collect())
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }

    async fn samples_by_day(
        &self,
        server_id: ServerId,
        first_day: NaiveDate,
        last_day: NaiveDate,
    ) -> TrackerServiceResult<HashMap<NaiveDate, DailySamples>> {
        let rows = self
            .repository
            .daily_samples(server_id, first_day, last_day)
            .await?;
        Ok(rows.into_iter().map(|row| (row.day, row)).collect())
    }
}

fn day_samples(samples: &HashMap<NaiveDate, DailySamples>, day: NaiveDate) -> DailySamples {
    samples
        .get(&day)
        .copied()
        .unwrap_or_else(|| DailySamples::empty(day))
}
