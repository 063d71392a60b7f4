//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_register_page, post_log_in, post_log_out,
        register_user,
    },
    endpoints,
    home::get_home_page,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{
        cancel_delete_endpoint, create_transaction_endpoint, delete_transaction_endpoint,
        pending_delete_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::AUTH_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        // Logging out must work even if the session has already ended.
        .route(endpoints::LOG_OUT, post(post_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_home_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These routes are called by htmx and need the HX-REDIRECT header for auth redirects to work.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(
                endpoints::DELETE_TRANSACTION,
                delete(delete_transaction_endpoint),
            )
            .route(endpoints::PENDING_DELETE, post(pending_delete_endpoint))
            .route(endpoints::CANCEL_DELETE, post(cancel_delete_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use scraper::{Html, Selector};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{TEST_EMAIL, TEST_PASSWORD, ledger_row_ids, test_state},
    };

    use super::build_router;

    fn get_test_server() -> TestServer {
        TestServer::try_new(build_router(test_state())).expect("Could not create test server.")
    }

    async fn register(server: &TestServer) -> axum_test::TestResponse {
        server
            .post(endpoints::USERS)
            .form(&[
                ("email", TEST_EMAIL),
                ("password", TEST_PASSWORD),
                ("confirm_password", TEST_PASSWORD),
            ])
            .await
    }

    #[tokio::test]
    async fn root_redirects_to_log_in_without_session() {
        let server = get_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::AUTH_VIEW);
    }

    #[tokio::test]
    async fn htmx_routes_redirect_with_hx_redirect_without_session() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .form(&[("amount", "1.00")])
            .await;

        assert_eq!(response.header("hx-redirect"), endpoints::AUTH_VIEW);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        server
            .get("/does/not/exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn auth_pages_are_public() {
        let server = get_test_server();

        server.get(endpoints::AUTH_VIEW).await.assert_status_ok();
        server.get(endpoints::REGISTER_VIEW).await.assert_status_ok();
    }

    #[tokio::test]
    async fn add_and_delete_transaction_through_the_router() {
        let server = get_test_server();
        let jar = register(&server).await.cookies();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .add_cookies(jar.clone())
            .form(&[
                ("date", "2025-03-14"),
                ("amount", "12.50"),
                ("type_", "debit"),
                ("account", "Everyday"),
                ("bucket", "food"),
                ("description", "groceries"),
            ])
            .await;
        response.assert_status_ok();
        let ids = ledger_row_ids(&Html::parse_fragment(&response.text()));
        assert_eq!(ids.len(), 1);
        let id: i64 = ids[0].parse().unwrap();

        server
            .post(&format_endpoint(endpoints::PENDING_DELETE, id))
            .add_cookies(jar.clone())
            .await
            .assert_status_ok();
        let response = server
            .delete(&format_endpoint(endpoints::DELETE_TRANSACTION, id))
            .add_cookies(jar.clone())
            .await;

        response.assert_status_ok();
        assert!(ledger_row_ids(&Html::parse_fragment(&response.text())).is_empty());
        assert!(response.text().contains("Deletion Successful"));
    }

    #[tokio::test]
    async fn transaction_without_date_shows_blank_date_cell() {
        let server = get_test_server();
        let jar = register(&server).await.cookies();

        server
            .post(endpoints::TRANSACTIONS_API)
            .add_cookies(jar.clone())
            .form(&[
                ("date", ""),
                ("amount", "3"),
                ("type_", "credit"),
                ("account", "Everyday"),
                ("bucket", "pay"),
                ("description", "tips"),
            ])
            .await
            .assert_status_ok();

        let response = server.get(endpoints::ROOT).add_cookies(jar).await;

        response.assert_status_ok();
        let document = Html::parse_document(&response.text());
        let date_cell = document
            .select(&Selector::parse("#ledger td[data-date]").unwrap())
            .next()
            .expect("No date cell found");
        assert_eq!(date_cell.text().collect::<String>(), "");
    }

    #[tokio::test]
    async fn log_out_ends_session() {
        let server = get_test_server();
        let jar = register(&server).await.cookies();

        let response = server.post(endpoints::LOG_OUT).add_cookies(jar.clone()).await;
        assert_eq!(response.header("hx-redirect"), endpoints::AUTH_VIEW);

        // The old cookie still decrypts, but the auth session behind it is gone.
        let response = server.get(endpoints::ROOT).add_cookies(jar).await;
        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::AUTH_VIEW);
    }

    #[tokio::test]
    async fn internal_error_page_is_public() {
        let server = get_test_server();

        let response = server.get(endpoints::INTERNAL_ERROR_VIEW).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }
}
