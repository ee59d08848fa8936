//! The lock guarded operations on the finance document.
//!
//! Every operation holds the ledger's lock for its whole load, mutate and save
//! span, so no two operations ever interleave their reads and writes.

use std::sync::{Mutex, MutexGuard};

use time::OffsetDateTime;

use crate::{
    Error,
    aggregation::record_transaction,
    finance::{FinanceState, Transaction},
    rollover::apply_rollover,
    store::StateStore,
};

/// Owns the [StateStore] and exposes the only ways to read or change the document.
#[derive(Debug)]
pub struct Ledger<S> {
    store: Mutex<S>,
}

impl<S> Ledger<S>
where
    S: StateStore,
{
    /// Create a ledger over `store`.
    pub fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Save a fresh document for `now` if the store does not hold one yet.
    ///
    /// A document that exists but cannot be decoded is left as is.
    ///
    /// # Errors
    /// Returns an error if the lock is poisoned or the fresh document could not be saved.
    pub fn initialize(&self, now: OffsetDateTime) -> Result<(), Error> {
        let mut store = self.lock()?;

        match store.load() {
            Err(Error::NoSavedState) => {
                tracing::info!("No saved finance data found, creating a new document");
                store.save(&FinanceState::new(now))
            }
            Err(error) => {
                tracing::warn!("Existing finance data could not be loaded: {error}");
                Ok(())
            }
            Ok(_) => Ok(()),
        }
    }

    /// Get the document as of `now`.
    ///
    /// The document is only written back if the week or year rolled over.
    ///
    /// # Errors
    /// Returns [Error::LedgerLockError] if the lock is poisoned.
    pub fn snapshot(&self, now: OffsetDateTime) -> Result<FinanceState, Error> {
        let mut store = self.lock()?;
        let mut state = load_or_default(&*store);

        if apply_rollover(&mut state, now).any() {
            save_or_log(&mut *store, &state);
        }

        Ok(state)
    }

    /// Record `income`, bucketing it in the stats under `now`.
    ///
    /// The date in `income` is kept in the log but not used for the stats.
    ///
    /// # Errors
    /// Returns [Error::LedgerLockError] if the lock is poisoned.
    pub fn add_income(
        &self,
        income: Transaction,
        now: OffsetDateTime,
    ) -> Result<FinanceState, Error> {
        self.transact(now, |state| {
            tracing::info!("Recording income of {}", income.amount);
            state.balance += income.amount;
            record_transaction(state, income.amount, 0.0, now);
            state.incomes.push(income);
        })
    }

    /// Record `expense`, bucketing it in the stats under `now`.
    ///
    /// The date in `expense` is kept in the log but not used for the stats.
    ///
    /// # Errors
    /// Returns [Error::LedgerLockError] if the lock is poisoned.
    pub fn add_expense(
        &self,
        expense: Transaction,
        now: OffsetDateTime,
    ) -> Result<FinanceState, Error> {
        self.transact(now, |state| {
            tracing::info!("Recording expense of {}", expense.amount);
            state.balance -= expense.amount;
            record_transaction(state, 0.0, expense.amount, now);
            state.expenses.push(expense);
        })
    }

    /// Replace the savings amount with `amount`.
    ///
    /// # Errors
    /// Returns [Error::LedgerLockError] if the lock is poisoned.
    pub fn set_savings(&self, amount: f64, now: OffsetDateTime) -> Result<FinanceState, Error> {
        self.transact(now, |state| {
            tracing::info!("Setting savings to {amount}");
            state.savings = amount;
        })
    }

    /// Load, roll over, apply `mutate` and save, all under the lock.
    fn transact(
        &self,
        now: OffsetDateTime,
        mutate: impl FnOnce(&mut FinanceState),
    ) -> Result<FinanceState, Error> {
        let mut store = self.lock()?;
        let mut state = load_or_default(&*store);

        apply_rollover(&mut state, now);
        mutate(&mut state);
        save_or_log(&mut *store, &state);

        Ok(state)
    }

    fn lock(&self) -> Result<MutexGuard<'_, S>, Error> {
        self.store.lock().map_err(|error| {
            tracing::error!("could not acquire the ledger lock: {error}");
            Error::LedgerLockError
        })
    }
}

/// Load the document, falling back to a zero-valued one if there is none or it is unreadable.
fn load_or_default(store: &impl StateStore) -> FinanceState {
    match store.load() {
        Ok(state) => state,
        Err(Error::NoSavedState) => {
            tracing::debug!("No saved finance data, starting from an empty document");
            FinanceState::default()
        }
        Err(error) => {
            tracing::warn!("Could not load finance data, starting from an empty document: {error}");
            FinanceState::default()
        }
    }
}

/// Save the document. A failed save is logged and otherwise ignored.
fn save_or_log(store: &mut impl StateStore, state: &FinanceState) {
    if let Err(error) = store.save(state) {
        tracing::error!("Could not save finance data: {error}");
    }
}
