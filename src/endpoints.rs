//! The API endpoints URIs.

/// The root route which serves the front end's index page.
pub const ROOT: &str = "/";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for getting the whole finance document.
pub const DATA: &str = "/api/data";
/// The route for recording an income.
pub const ADD_INCOME: &str = "/api/add-income";
/// The route for recording an expense.
pub const ADD_EXPENSE: &str = "/api/add-expense";
/// The route for setting the savings amount.
pub const UPDATE_SAVINGS: &str = "/api/update-savings";

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::DATA);
        assert_endpoint_is_valid_uri(endpoints::ADD_INCOME);
        assert_endpoint_is_valid_uri(endpoints::ADD_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::UPDATE_SAVINGS);
    }
}
