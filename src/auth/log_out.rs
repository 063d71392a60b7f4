//! Log-out route handler that ends the auth session and sends the client to the log-in page.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    alert::Alert,
    auth::middleware::AuthState,
    session::{CookieStorage, Redirector},
};

/// Sign the user out with the auth client, clear their page and the auth
/// cookie, and redirect the client to the log-in page.
///
/// If the auth client fails, an error alert is returned and the user stays
/// signed in.
pub async fn post_log_out(State(state): State<AuthState>, jar: PrivateCookieJar) -> Response {
    let mut storage = CookieStorage::new(jar, state.cookie_duration);
    let mut redirector = Redirector::new();

    match state.controller.log_out(&mut storage, &mut redirector).await {
        Ok(()) => (redirector.into_hx_redirect(), storage.into_jar()).into_response(),
        Err(_) => Alert::error(
            "Could not log out",
            "Something went wrong while logging out. Try again later.",
        )
        .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
    }
}
