//! Clearing of the weekly and yearly stats when a new week or year begins.

use time::{Date, Duration, OffsetDateTime};

use crate::finance::{FinanceState, WeekStats};

/// The ISO-8601 week number (1-53) of `now`.
///
/// Week 1 is the week that contains the first Thursday of the year.
pub fn iso_week_number(now: OffsetDateTime) -> u8 {
    now.iso_week()
}

/// The Monday on or before `date`.
pub fn start_of_week(date: Date) -> Date {
    let days_since_monday = date.weekday().number_days_from_monday();

    date - Duration::days(days_since_monday.into())
}

/// Which of the stats were cleared by [apply_rollover].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rollover {
    /// The calendar year changed and `yearly_stats` was cleared.
    pub year: bool,
    /// The ISO week changed and `weekly_stats` was cleared.
    pub week: bool,
}

impl Rollover {
    /// Whether anything in the state was changed.
    pub fn any(self) -> bool {
        self.year || self.week
    }
}

/// Clear the stats whose window `now` no longer falls into and move the watermarks.
///
/// The year and week checks are independent, both may apply in one call.
///
/// A new year clears the whole of `yearly_stats`, including years before the
/// one that just ended. The week check compares only the ISO week number, so a
/// document last touched exactly 52 or 53 weeks ago keeps its weekly stats.
pub fn apply_rollover(state: &mut FinanceState, now: OffsetDateTime) -> Rollover {
    let current_year = now.year();
    let current_week = iso_week_number(now);
    let mut rollover = Rollover::default();

    if current_year != state.last_reset_year {
        tracing::info!(
            "Year changed from {} to {current_year}, clearing yearly stats",
            state.last_reset_year
        );
        state.yearly_stats.clear();
        state.last_reset_year = current_year;
        rollover.year = true;
    }

    if current_week != state.last_reset_week {
        let weekly_stats = WeekStats::starting(now);
        tracing::info!(
            "ISO week changed from {} to {current_week}, starting a new week on {}",
            state.last_reset_week,
            weekly_stats.start_date
        );
        state.weekly_stats = weekly_stats;
        state.last_reset_week = current_week;
        rollover.week = true;
    }

    rollover
}
