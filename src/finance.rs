//! The finance document and the records it is built from.
//!
//! The whole persistent state of the app is a single [FinanceState], which is
//! loaded, mutated and saved as one unit by the [ledger](crate::ledger).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::rollover::{iso_week_number, start_of_week};

/// The number of days tracked in [WeekStats], Monday through Sunday.
pub const DAYS_IN_WEEK: usize = 7;

/// Monthly totals keyed by year, then by month (1-12).
pub type YearlyStats = BTreeMap<i32, BTreeMap<u8, MonthStats>>;

/// The single persisted finance document.
///
/// Missing fields decode to their zero values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinanceState {
    /// The sum of all incomes minus the sum of all expenses.
    pub balance: f64,
    /// The latest savings amount set by the user.
    pub savings: f64,
    /// Every income in the order it was recorded.
    pub incomes: Vec<Transaction>,
    /// Every expense in the order it was recorded.
    pub expenses: Vec<Transaction>,
    /// Income and expense totals per month, created on the first transaction in a month.
    pub yearly_stats: YearlyStats,
    /// Income and expense totals per day for the current ISO week.
    pub weekly_stats: WeekStats,
    /// The ISO week number (1-53) that `weekly_stats` covers.
    pub last_reset_week: u8,
    /// The calendar year that `yearly_stats` was last reset for.
    pub last_reset_year: i32,
}

impl FinanceState {
    /// Create an empty document whose watermarks point at the week and year of `now`.
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            weekly_stats: WeekStats::starting(now),
            last_reset_week: iso_week_number(now),
            last_reset_year: now.year(),
            ..Default::default()
        }
    }

    /// Whether any amount, total or stat in the document is infinite or NaN.
    ///
    /// JSON has no representation for these, serde_json writes them as `null`.
    pub fn has_non_finite_amount(&self) -> bool {
        let transactions = self.incomes.iter().chain(&self.expenses).map(|t| t.amount);
        let months = self
            .yearly_stats
            .values()
            .flat_map(|months| months.values())
            .flat_map(|month| [month.incomes, month.expenses]);
        let days = self
            .weekly_stats
            .days
            .iter()
            .flat_map(|day| [day.incomes, day.expenses]);

        [self.balance, self.savings]
            .into_iter()
            .chain(transactions)
            .chain(months)
            .chain(days)
            .any(|amount| !amount.is_finite())
    }
}

/// A single income or expense.
///
/// The amount is always positive, the list a transaction is stored in decides
/// whether it adds to or subtracts from the balance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The amount of money that changed hands. Zero if left out.
    #[serde(default)]
    pub amount: f64,
    /// The date as entered by the user. Stored verbatim and not used for the stats.
    #[serde(default)]
    pub date: String,
    /// Free text describing the transaction.
    #[serde(default)]
    pub note: String,
}

/// Accumulated totals for one calendar month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthStats {
    /// Total income recorded in the month.
    pub incomes: f64,
    /// Total expenses recorded in the month.
    pub expenses: f64,
}

/// Accumulated totals for one day of the week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayStats {
    /// Total income recorded on the day.
    pub incomes: f64,
    /// Total expenses recorded on the day.
    pub expenses: f64,
}

/// Day by day totals for the live ISO week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekStats {
    /// The Monday that starts the week, formatted as `YYYY-MM-DD`.
    pub start_date: String,
    /// Index 0 is Monday, index 6 is Sunday.
    pub days: [DayStats; DAYS_IN_WEEK],
}

impl WeekStats {
    /// An all-zero week window for the ISO week containing `now`.
    pub fn starting(now: OffsetDateTime) -> Self {
        Self {
            start_date: start_of_week(now.date()).to_string(),
            days: Default::default(),
        }
    }
}
