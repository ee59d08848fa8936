//! Application router configuration.

use std::path::Path;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::{ServeDir, ServeFile};

use crate::{
    AppState,
    api::{add_expense, add_income, get_data, update_savings},
    endpoints,
};

/// Return a router with all the app's routes.
///
/// Static files are served from `static_dir`, and the root route serves its `index.html`.
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let api_routes = Router::new()
        .route(endpoints::DATA, get(get_data))
        .route(endpoints::ADD_INCOME, post(add_income))
        .route(endpoints::ADD_EXPENSE, post(add_expense))
        .route(endpoints::UPDATE_SAVINGS, post(update_savings));

    api_routes
        .route_service(endpoints::ROOT, ServeFile::new(static_dir.join("index.html")))
        .nest_service(endpoints::STATIC, ServeDir::new(static_dir))
        .with_state(state)
}
