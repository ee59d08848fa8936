//! Route handlers for the JSON API.
//!
//! Each handler answers with the whole finance document after the operation.

use axum::{Json, body::Bytes, extract::State};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    AppState, Error,
    finance::{FinanceState, Transaction},
};

/// The request body for setting the savings amount.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SavingsForm {
    /// The new savings amount. Zero if left out.
    #[serde(default)]
    pub amount: f64,
}

/// Decode a JSON request body, keeping the decoder's message for the client.
///
/// The content type of the request is not checked.
fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|error| {
        tracing::debug!("Rejecting request body: {error}");
        Error::InvalidPayload(error.to_string())
    })
}

/// Get the finance document, clearing stats for a new week or year first.
pub async fn get_data(State(state): State<AppState>) -> Result<Json<FinanceState>, Error> {
    let now = state.now()?;

    state.ledger.snapshot(now).map(Json)
}

/// Record an income and add it to the balance.
pub async fn add_income(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<FinanceState>, Error> {
    let income: Transaction = decode_body(&body)?;
    let now = state.now()?;

    state.ledger.add_income(income, now).map(Json)
}

/// Record an expense and subtract it from the balance.
pub async fn add_expense(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<FinanceState>, Error> {
    let expense: Transaction = decode_body(&body)?;
    let now = state.now()?;

    state.ledger.add_expense(expense, now).map(Json)
}

/// Replace the savings amount.
pub async fn update_savings(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<FinanceState>, Error> {
    let SavingsForm { amount } = decode_body(&body)?;
    let now = state.now()?;

    state.ledger.set_savings(amount, now).map(Json)
}

#[cfg(test)]
mod api_tests {
    use axum::{
        Router,
        http::StatusCode,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use serde_json::json;
    use time::OffsetDateTime;

    use crate::{
        AppState, endpoints,
        finance::{FinanceState, Transaction},
        store::JsonFileStore,
    };

    use super::{add_expense, add_income, get_data, update_savings};

    fn get_test_server() -> (tempfile::TempDir, TestServer) {
        let dir = tempfile::tempdir().expect("Could not create temp dir");
        let store = JsonFileStore::new(dir.path().join("finance_data.json"));
        let state = AppState::new(store, "Etc/UTC").expect("Could not create app state");

        let app = Router::new()
            .route(endpoints::DATA, get(get_data))
            .route(endpoints::ADD_INCOME, post(add_income))
            .route(endpoints::ADD_EXPENSE, post(add_expense))
            .route(endpoints::UPDATE_SAVINGS, post(update_savings))
            .with_state(state);

        let server = TestServer::new(app).expect("Could not create test server.");

        (dir, server)
    }

    #[tokio::test]
    async fn get_data_on_fresh_state() {
        let (_dir, server) = get_test_server();

        let response = server.get(endpoints::DATA).await;

        response.assert_status_ok();
        let state: FinanceState = response.json();
        let now = OffsetDateTime::now_utc();
        assert_eq!(state.balance, 0.0);
        assert!(state.incomes.is_empty());
        assert_eq!(state.last_reset_year, now.year());
        assert_eq!(state.weekly_stats.days.len(), 7);
    }

    #[tokio::test]
    async fn add_income_then_expense() {
        let (_dir, server) = get_test_server();

        let state: FinanceState = server
            .post(endpoints::ADD_INCOME)
            .json(&json!({"amount": 100.0, "date": "2024-01-10", "note": "pay"}))
            .await
            .json();

        let now = OffsetDateTime::now_utc();
        let month = u8::from(now.month());
        assert_eq!(state.balance, 100.0);
        assert_eq!(
            state.incomes,
            vec![Transaction {
                amount: 100.0,
                date: "2024-01-10".to_owned(),
                note: "pay".to_owned()
            }]
        );
        assert_eq!(state.yearly_stats[&now.year()][&month].incomes, 100.0);

        let state: FinanceState = server
            .post(endpoints::ADD_EXPENSE)
            .json(&json!({"amount": 30.0, "date": "2024-01-10", "note": "food"}))
            .await
            .json();

        assert_eq!(state.balance, 70.0);
        assert_eq!(state.expenses.len(), 1);
        assert_eq!(state.expenses[0].amount, 30.0);
        assert_eq!(state.yearly_stats[&now.year()][&month].expenses, 30.0);
    }

    #[tokio::test]
    async fn update_savings_overwrites() {
        let (_dir, server) = get_test_server();

        server
            .post(endpoints::UPDATE_SAVINGS)
            .json(&json!({"amount": 500.0}))
            .await
            .assert_status_ok();
        let state: FinanceState = server
            .post(endpoints::UPDATE_SAVINGS)
            .json(&json!({"amount": 200.0}))
            .await
            .json();

        assert_eq!(state.savings, 200.0);
        let state: FinanceState = server.get(endpoints::DATA).await.json();
        assert_eq!(state.savings, 200.0);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request_and_changes_nothing() {
        let (_dir, server) = get_test_server();
        server
            .post(endpoints::ADD_INCOME)
            .json(&json!({"amount": 10.0}))
            .await
            .assert_status_ok();

        let response = server
            .post(endpoints::ADD_INCOME)
            .text("{\"amount\": ")
            .await;

        response.assert_status_bad_request();
        assert!(response.text().contains("EOF"), "got {}", response.text());
        let state: FinanceState = server.get(endpoints::DATA).await.json();
        assert_eq!(state.balance, 10.0);
        assert_eq!(state.incomes.len(), 1);
    }

    #[tokio::test]
    async fn wrong_field_type_is_bad_request() {
        let (_dir, server) = get_test_server();

        let response = server
            .post(endpoints::ADD_EXPENSE)
            .json(&json!({"amount": "thirty"}))
            .await;

        response.assert_status_bad_request();
        let state: FinanceState = server.get(endpoints::DATA).await.json();
        assert!(state.expenses.is_empty());
    }

    #[tokio::test]
    async fn missing_savings_amount_resets_savings_to_zero() {
        let (_dir, server) = get_test_server();
        server
            .post(endpoints::UPDATE_SAVINGS)
            .json(&json!({"amount": 500.0}))
            .await
            .assert_status_ok();

        let state: FinanceState = server
            .post(endpoints::UPDATE_SAVINGS)
            .json(&json!({}))
            .await
            .json();

        assert_eq!(state.savings, 0.0);
    }

    #[tokio::test]
    async fn missing_transaction_amount_records_zero() {
        let (_dir, server) = get_test_server();

        let state: FinanceState = server
            .post(endpoints::ADD_INCOME)
            .json(&json!({"date": "x"}))
            .await
            .json();

        assert_eq!(state.balance, 0.0);
        assert_eq!(state.incomes.len(), 1);
        assert_eq!(state.incomes[0].amount, 0.0);
        assert_eq!(state.incomes[0].date, "x");
    }

    #[tokio::test]
    async fn wrong_method_is_not_allowed() {
        let (_dir, server) = get_test_server();

        for endpoint in [
            endpoints::ADD_INCOME,
            endpoints::ADD_EXPENSE,
            endpoints::UPDATE_SAVINGS,
        ] {
            server
                .get(endpoint)
                .await
                .assert_status(StatusCode::METHOD_NOT_ALLOWED);
        }

        let state: FinanceState = server.get(endpoints::DATA).await.json();
        assert_eq!(state.balance, 0.0);
    }
}
