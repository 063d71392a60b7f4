//! Where the signed-in user's ID is persisted between requests.

use axum::response::{IntoResponseParts, ResponseParts};
use axum_extra::extract::PrivateCookieJar;
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    auth::{
        extend_auth_cookie_duration_if_needed, get_token_from_cookies, invalidate_auth_cookie,
        set_auth_cookie,
    },
    user::UserId,
};

/// A key-value store with a single key: the signed-in user's ID.
pub trait SessionStorage {
    /// The stored user ID, if there is one.
    fn get_item(&self) -> Option<UserId>;

    /// Store `user_id`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be written.
    fn set_item(&mut self, user_id: &UserId) -> Result<(), Error>;

    /// Forget the stored user ID.
    fn remove_item(&mut self);
}

/// A [SessionStorage] backed by the encrypted auth cookie.
///
/// Changes only reach the client if the storage is returned as part of the
/// response, see [CookieStorage::into_jar].
#[derive(Debug, Clone)]
pub struct CookieStorage {
    jar: PrivateCookieJar,
    cookie_duration: Duration,
}

impl CookieStorage {
    /// Wrap the request's cookie jar. Tokens written by [SessionStorage::set_item]
    /// are valid for `cookie_duration`.
    pub fn new(jar: PrivateCookieJar, cookie_duration: Duration) -> Self {
        Self {
            jar,
            cookie_duration,
        }
    }

    /// Push the token's expiry out to at least `cookie_duration` from now.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no valid token. The cookie is left unchanged.
    pub fn extend_expiry(&mut self) -> Result<(), Error> {
        self.jar = extend_auth_cookie_duration_if_needed(self.jar.clone(), self.cookie_duration)?;

        Ok(())
    }

    /// The cookie jar with any changes made through this storage.
    pub fn into_jar(self) -> PrivateCookieJar {
        self.jar
    }
}

impl SessionStorage for CookieStorage {
    fn get_item(&self) -> Option<UserId> {
        match get_token_from_cookies(&self.jar) {
            Ok(token) if token.is_expired(OffsetDateTime::now_utc()) => {
                tracing::debug!("ignoring expired auth token for user {}", token.user_id);
                None
            }
            Ok(token) => Some(token.user_id),
            Err(Error::CookieMissing) => None,
            Err(error) => {
                tracing::debug!("ignoring unreadable auth cookie: {error}");
                None
            }
        }
    }

    fn set_item(&mut self, user_id: &UserId) -> Result<(), Error> {
        self.jar = set_auth_cookie(self.jar.clone(), user_id, self.cookie_duration)?;

        Ok(())
    }

    fn remove_item(&mut self) {
        self.jar = invalidate_auth_cookie(self.jar.clone());
    }
}

impl IntoResponseParts for CookieStorage {
    type Error = <PrivateCookieJar as IntoResponseParts>::Error;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.jar.into_response_parts(res)
    }
}

/// A [SessionStorage] that lives in memory, for embedding the controller
/// outside of a web server.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryStorage {
    item: Option<UserId>,
}

impl MemoryStorage {
    /// Create storage that already holds `user_id`.
    pub fn with_item(user_id: UserId) -> Self {
        Self {
            item: Some(user_id),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self) -> Option<UserId> {
        self.item.clone()
    }

    fn set_item(&mut self, user_id: &UserId) -> Result<(), Error> {
        self.item = Some(user_id.clone());

        Ok(())
    }

    fn remove_item(&mut self) {
        self.item = None;
    }
}
