use rusqlite::Connection;

use crate::{
    AppState, AuthClient, PasswordHash, ValidatedPassword,
    session::{AuthEvent, MemoryStorage, Redirector},
    user::{UserId, parse_email},
};

pub(crate) const TEST_EMAIL: &str = "jane@example.com";
pub(crate) const TEST_PASSWORD: &str = "penguins-prefer-pickled-plums";

pub(crate) fn test_state() -> AppState {
    AppState::new(Connection::open_in_memory().unwrap(), "foobar", "Etc/UTC").unwrap()
}

/// Register `email` with [TEST_PASSWORD].
pub(crate) async fn sign_up(state: &AppState, email: &str) -> UserId {
    let password = ValidatedPassword::new(TEST_PASSWORD, &[]).unwrap();

    state
        .controller
        .auth()
        .sign_up(
            &parse_email(email).unwrap(),
            PasswordHash::new(password, 4).unwrap(),
        )
        .await
        .unwrap()
}

/// An app state with [TEST_EMAIL] registered and their page signed in.
pub(crate) async fn signed_in_state() -> (AppState, UserId) {
    let state = test_state();
    let user_id = sign_up(&state, TEST_EMAIL).await;

    state
        .controller
        .on_auth_event(
            AuthEvent::SignedIn(user_id.clone()),
            &mut MemoryStorage::default(),
            &mut Redirector::new(),
        )
        .await
        .unwrap();

    (state, user_id)
}
