//! Durable storage for the finance document.
//!
//! Stores do no locking of their own, the [Ledger](crate::ledger::Ledger)
//! serializes all access to them.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{Error, finance::FinanceState};

/// Get and set the single finance document.
pub trait StateStore {
    /// Read the stored document.
    ///
    /// # Errors
    /// Returns [Error::NoSavedState] if nothing has been saved yet,
    /// [Error::CorruptState] if the stored content cannot be decoded and
    /// [Error::StorageRead] if the storage could not be read.
    fn load(&self) -> Result<FinanceState, Error>;

    /// Replace the stored document with `state`.
    ///
    /// # Errors
    /// Returns [Error::StorageWrite] if the document could not be written, or
    /// if it holds an amount that is infinite or NaN. The stored document is
    /// left unchanged in that case.
    fn save(&mut self, state: &FinanceState) -> Result<(), Error>;
}

/// Stores the finance document as pretty printed JSON in a file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the document at `path`. The file is created on the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<FinanceState, Error> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(Error::NoSavedState);
            }
            Err(error) => {
                return Err(Error::StorageRead(format!("{}: {error}", self.path.display())));
            }
        };

        serde_json::from_str(&text).map_err(|error| Error::CorruptState(error.to_string()))
    }

    fn save(&mut self, state: &FinanceState) -> Result<(), Error> {
        check_finite(state)?;

        let text = serde_json::to_string_pretty(state)
            .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

        fs::write(&self.path, text)
            .map_err(|error| Error::StorageWrite(format!("{}: {error}", self.path.display())))
    }
}

/// Reject documents that could not be read back after saving.
fn check_finite(state: &FinanceState) -> Result<(), Error> {
    if state.has_non_finite_amount() {
        return Err(Error::StorageWrite(
            "the finance data holds an amount that is too large to store".to_owned(),
        ));
    }

    Ok(())
}

/// An in-memory store that can be told to hold corrupt data or to fail writes.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryStore {
    pub document: Option<String>,
    pub fail_writes: bool,
    pub saves: usize,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_state(state: &FinanceState) -> Self {
        Self {
            document: Some(serde_json::to_string(state).expect("Could not serialize state")),
            ..Default::default()
        }
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            document: Some(text.to_owned()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
impl StateStore for MemoryStore {
    fn load(&self) -> Result<FinanceState, Error> {
        match &self.document {
            None => Err(Error::NoSavedState),
            Some(text) => serde_json::from_str(text)
                .map_err(|error| Error::CorruptState(error.to_string())),
        }
    }

    fn save(&mut self, state: &FinanceState) -> Result<(), Error> {
        if self.fail_writes {
            return Err(Error::StorageWrite("writes are disabled".to_owned()));
        }
        check_finite(state)?;

        self.document = Some(
            serde_json::to_string(state)
                .map_err(|error| Error::JSONSerializationError(error.to_string()))?,
        );
        self.saves += 1;

        Ok(())
    }
}
