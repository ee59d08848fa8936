//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use time::OffsetDateTime;

use crate::{
    Error,
    ledger::Ledger,
    store::JsonFileStore,
    timezone::{get_local_offset, local_now},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The ledger guarding the finance document.
    pub ledger: Arc<Ledger<JsonFileStore>>,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] over the document in `store`.
    ///
    /// A fresh document is saved if `store` does not hold one yet.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the timezone is unknown or the fresh document cannot be saved.
    pub fn new(store: JsonFileStore, local_timezone: &str) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        let state = Self {
            ledger: Arc::new(Ledger::new(store)),
            local_timezone: local_timezone.to_owned(),
        };
        state.ledger.initialize(state.now()?)?;

        Ok(state)
    }

    /// The current date and time in the local timezone.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if the timezone cannot be resolved.
    pub fn now(&self) -> Result<OffsetDateTime, Error> {
        local_now(&self.local_timezone)
            .ok_or_else(|| Error::InvalidTimezoneError(self.local_timezone.clone()))
    }
}

#[cfg(test)]
mod app_state_tests {
    use crate::{Error, StateStore, store::JsonFileStore};

    use super::AppState;

    #[test]
    fn new_creates_document_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("finance_data.json"));

        let state = AppState::new(store.clone(), "Etc/UTC").unwrap();

        let saved = store.load().expect("Document was not created");
        let now = state.now().unwrap();
        assert_eq!(saved.last_reset_year, now.year());
        assert_eq!(saved.last_reset_week, now.iso_week());
    }

    #[test]
    fn new_rejects_unknown_timezone() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("finance_data.json"));

        let result = AppState::new(store.clone(), "Mars/Olympus");

        assert_eq!(
            result.map(|_| ()),
            Err(Error::InvalidTimezoneError("Mars/Olympus".to_owned()))
        );
        assert_eq!(store.load(), Err(Error::NoSavedState));
    }
}
