//! Authentication middleware that restores the session, extends the auth cookie, and handles redirects.

use axum::{
    extract::{FromRef, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::Duration;

use crate::{
    AppState, AuthClient, Error,
    app_state::AppController,
    endpoints,
    session::{AuthEvent, CookieStorage, Navigator, Redirector, SessionStorage},
};

/// The state needed for the auth middleware and the log-in, registration and
/// log-out handlers.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// Reacts to sign-in and sign-out.
    pub controller: AppController,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            controller: state.controller.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that restores the session stored in the auth cookie.
///
/// The user ID is placed into the request and then the request executed
/// normally if there is a session and the user is still signed in with the
/// auth client, otherwise the client is sent to the log-in page using
/// `get_redirect`.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserId>` to receive the user ID.
#[inline]
async fn auth_guard_internal(
    state: AuthState,
    request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = PrivateCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
    let mut storage = CookieStorage::new(jar, state.cookie_duration);
    let mut redirector = Redirector::new();

    if let Err(error) = sign_out_if_expired(&state, &mut storage, &mut redirector).await {
        return error.into_response();
    }

    let user_id = match state.controller.restore(&storage, &mut redirector).await {
        Ok(Some(user_id)) => user_id,
        Ok(None) => {
            let location = redirector.location().unwrap_or(endpoints::AUTH_VIEW);
            return (storage, get_redirect(location)).into_response();
        }
        Err(error) => {
            tracing::error!("could not restore session: {error}");
            return error.into_response();
        }
    };

    parts.extensions.insert(user_id);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    if let Err(error) = storage.extend_expiry() {
        tracing::error!("Error extending cookie duration: {error:?}. Rolling back cookie jar.");
    }

    let (mut parts, body) = response.into_parts();
    for (key, val) in storage.into_jar().into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}

/// Process [AuthEvent::SignedOut] if the stored user no longer has an auth
/// session, e.g. because they logged out on another device.
async fn sign_out_if_expired(
    state: &AuthState,
    storage: &mut CookieStorage,
    navigator: &mut impl Navigator,
) -> Result<(), Error> {
    let Some(user_id) = storage.get_item() else {
        return Ok(());
    };

    if state.controller.auth().is_signed_in(&user_id).await? {
        return Ok(());
    }

    tracing::info!("auth session for user {user_id} has ended");

    state
        .controller
        .on_auth_event(AuthEvent::SignedOut, storage, navigator)
        .await
}

/// Middleware function that checks for a valid session.
/// The user ID is placed into request and then the request executed normally if the session is valid, otherwise a redirect to the log-in page is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserId>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Middleware function that checks for a valid session.
/// The user ID is placed into request and then the request executed normally if the session is valid, otherwise a HTMX redirect to the log-in page is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserId>` to receive the user ID.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}
