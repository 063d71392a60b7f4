//! Shared handles to page state.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    Error,
    app::state::{Action, LoadTicket, PageState},
    user::UserId,
};

/// A handle to one user's [PageState] that can be shared between requests.
///
/// The lock is only held while reading or applying an action, never across
/// an await point.
#[derive(Debug, Clone, Default)]
pub struct Page {
    state: Arc<Mutex<PageState>>,
}

impl Page {
    fn lock(&self) -> Result<MutexGuard<'_, PageState>, Error> {
        self.state.lock().map_err(|error| {
            tracing::error!("could not acquire the page state lock: {error}");
            Error::PageLockError
        })
    }

    /// Run `f` with the current state.
    ///
    /// # Errors
    ///
    /// Returns an [Error::PageLockError] if the lock is poisoned.
    pub fn read<T>(&self, f: impl FnOnce(&PageState) -> T) -> Result<T, Error> {
        Ok(f(&*self.lock()?))
    }

    /// Apply `action`, see [PageState::apply].
    ///
    /// # Errors
    ///
    /// Returns an [Error::PageLockError] if the lock is poisoned.
    pub fn dispatch(&self, action: Action) -> Result<bool, Error> {
        Ok(self.lock()?.apply(action))
    }

    /// Start a load, see [PageState::begin_load].
    ///
    /// # Errors
    ///
    /// Returns an [Error::PageLockError] if the lock is poisoned.
    pub fn begin_load(&self, user_id: &UserId) -> Result<LoadTicket, Error> {
        Ok(self.lock()?.begin_load(user_id))
    }
}

/// One [Page] per user that has visited since the server started.
///
/// Pages are cleared on sign-out rather than removed, so handles held by
/// in-flight requests keep pointing at the same state.
#[derive(Debug, Clone, Default)]
pub(crate) struct Pages {
    pages: Arc<Mutex<HashMap<UserId, Page>>>,
}

impl Pages {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<UserId, Page>>, Error> {
        self.pages.lock().map_err(|error| {
            tracing::error!("could not acquire the page registry lock: {error}");
            Error::PageLockError
        })
    }

    /// The page of `user_id`, created signed-out if it does not exist yet.
    pub(crate) fn page_for(&self, user_id: &UserId) -> Result<Page, Error> {
        Ok(self.lock()?.entry(user_id.clone()).or_default().clone())
    }

    /// The page of `user_id` if it exists.
    pub(crate) fn get(&self, user_id: &UserId) -> Result<Option<Page>, Error> {
        Ok(self.lock()?.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use crate::{app::state::Action, user::UserId};

    use super::Pages;

    #[test]
    fn page_for_returns_the_same_page() {
        let pages = Pages::default();
        let jane = UserId::new("jane");

        pages
            .page_for(&jane)
            .unwrap()
            .dispatch(Action::SignedIn(jane.clone()))
            .unwrap();
        let session = pages
            .page_for(&jane)
            .unwrap()
            .read(|state| state.session().cloned())
            .unwrap();

        assert_eq!(session, Some(jane));
    }

    #[test]
    fn pages_are_separate_per_user() {
        let pages = Pages::default();
        let jane = UserId::new("jane");
        let john = UserId::new("john");

        pages
            .page_for(&jane)
            .unwrap()
            .dispatch(Action::SignedIn(jane.clone()))
            .unwrap();

        assert!(pages.get(&john).unwrap().is_none());
        let john_session = pages
            .page_for(&john)
            .unwrap()
            .read(|state| state.session().cloned())
            .unwrap();
        assert_eq!(john_session, None);
    }
}
