//! A personal finance tracker.
//!
//! Keeps a running balance, a savings amount, logs of incomes and expenses and
//! weekly and monthly totals in a single JSON document, and serves it through a
//! small JSON API next to a static front end.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

pub mod aggregation;
mod api;
mod app_state;
pub mod endpoints;
pub mod finance;
pub mod ledger;
mod logging;
pub mod rollover;
mod routing;
pub mod store;
mod timezone;

pub use app_state::AppState;
pub use finance::{DayStats, FinanceState, MonthStats, Transaction, WeekStats};
pub use ledger::Ledger;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use store::{JsonFileStore, StateStore};
pub use timezone::{get_local_offset, local_now};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body could not be decoded.
    ///
    /// Holds the decoder's message, which is passed on to the client as is.
    #[error("{0}")]
    InvalidPayload(String),

    /// No finance document has been saved yet.
    #[error("no finance data has been saved yet")]
    NoSavedState,

    /// The stored finance document exists but could not be decoded.
    #[error("the saved finance data is corrupt: {0}")]
    CorruptState(String),

    /// The stored finance document could not be read.
    #[error("could not read the saved finance data: {0}")]
    StorageRead(String),

    /// The finance document could not be written.
    #[error("could not write the finance data: {0}")]
    StorageWrite(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the ledger lock
    #[error("could not acquire the ledger lock")]
    LedgerLockError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidPayload(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            )
                .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details.",
                )
                    .into_response()
            }
        }
    }
}
