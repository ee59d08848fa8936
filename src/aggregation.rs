//! Accumulation of incomes and expenses into the weekly and monthly stats.

use time::{OffsetDateTime, Weekday};

use crate::finance::FinanceState;

/// The index into [WeekStats::days](crate::finance::WeekStats::days) for `weekday`.
///
/// Monday is 0 and Sunday is 6.
pub fn weekday_index(weekday: Weekday) -> usize {
    weekday.number_days_from_monday().into()
}

/// Add `income` and `expense` to the day, month and year that `effective_date` falls in.
///
/// Callers pass one of the two amounts as zero. The month entry, and the year
/// entry holding it, are created if this is the first transaction for the month.
pub fn record_transaction(
    state: &mut FinanceState,
    income: f64,
    expense: f64,
    effective_date: OffsetDateTime,
) {
    let day = &mut state.weekly_stats.days[weekday_index(effective_date.weekday())];
    day.incomes += income;
    day.expenses += expense;

    let month = state
        .yearly_stats
        .entry(effective_date.year())
        .or_default()
        .entry(effective_date.month().into())
        .or_default();
    month.incomes += income;
    month.expenses += expense;
}

#[cfg(test)]
mod weekday_index_tests {
    use time::Weekday;

    use super::weekday_index;

    #[test]
    fn monday_is_first_and_sunday_is_last() {
        assert_eq!(weekday_index(Weekday::Monday), 0);
        assert_eq!(weekday_index(Weekday::Wednesday), 2);
        assert_eq!(weekday_index(Weekday::Saturday), 5);
        assert_eq!(weekday_index(Weekday::Sunday), 6);
    }
}
