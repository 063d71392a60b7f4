//! Session bootstrap and the transaction list controller.

use crate::{
    Error,
    app::{
        page::{Page, Pages},
        state::Action,
    },
    auth::AuthClient,
    database_id::TransactionId,
    endpoints,
    session::{AuthEvent, Navigator, SessionStorage},
    transaction::{NewTransaction, Transaction, TransactionRepository},
    user::UserId,
};

/// How a call to [Controller::load] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The collection was replaced with this many transactions.
    Loaded(usize),
    /// The store returned an error and the collection was emptied.
    Failed,
    /// The session changed while loading, so the result was thrown away.
    Discarded,
}

/// Drives each user's page in response to auth events and ledger actions.
#[derive(Debug, Clone)]
pub struct Controller<A, R> {
    auth: A,
    repository: R,
    pages: Pages,
}

impl<A, R> Controller<A, R>
where
    A: AuthClient,
    R: TransactionRepository,
{
    /// Create a controller with no pages.
    pub fn new(auth: A, repository: R) -> Self {
        Self {
            auth,
            repository,
            pages: Pages::default(),
        }
    }

    /// The auth collaborator.
    pub fn auth(&self) -> &A {
        &self.auth
    }

    /// The page of `user_id`, created signed-out if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an [Error::PageLockError] if the page registry lock is poisoned.
    pub fn page_for(&self, user_id: &UserId) -> Result<Page, Error> {
        self.pages.page_for(user_id)
    }

    /// Pick up the session persisted in `storage`.
    ///
    /// If there is a stored user ID their page is signed in and loaded, unless
    /// that already happened. Otherwise `navigator` is sent to the auth page.
    ///
    /// # Errors
    ///
    /// Returns an error if page state could not be locked.
    pub async fn restore(
        &self,
        storage: &impl SessionStorage,
        navigator: &mut impl Navigator,
    ) -> Result<Option<UserId>, Error> {
        let Some(user_id) = storage.get_item() else {
            tracing::debug!("no stored session");
            navigator.push(endpoints::AUTH_VIEW);
            return Ok(None);
        };

        let page = self.pages.page_for(&user_id)?;
        let is_bootstrapped = page.read(|state| state.session() == Some(&user_id))?;

        if !is_bootstrapped {
            tracing::debug!("restoring session for user {user_id}");
            page.dispatch(Action::SignedIn(user_id.clone()))?;
            self.load(&page, &user_id).await?;
        }

        Ok(Some(user_id))
    }

    /// React to a change in authentication.
    ///
    /// On sign-in the user ID is persisted and their transactions are loaded.
    /// On sign-out the stored ID and the page are cleared and `navigator` is
    /// sent to the auth page.
    ///
    /// # Errors
    ///
    /// Returns an error if the user ID could not be stored or page state could
    /// not be locked.
    pub async fn on_auth_event(
        &self,
        event: AuthEvent,
        storage: &mut impl SessionStorage,
        navigator: &mut impl Navigator,
    ) -> Result<(), Error> {
        match event {
            AuthEvent::SignedIn(user_id) => {
                storage.set_item(&user_id)?;

                let page = self.pages.page_for(&user_id)?;
                page.dispatch(Action::SignedIn(user_id.clone()))?;
                self.load(&page, &user_id).await?;
            }
            AuthEvent::SignedOut => {
                if let Some(user_id) = storage.get_item() {
                    if let Some(page) = self.pages.get(&user_id)? {
                        page.dispatch(Action::SignedOut)?;
                    }

                    tracing::info!("user {user_id} signed out");
                }

                storage.remove_item();
                navigator.push(endpoints::AUTH_VIEW);
            }
        }

        Ok(())
    }

    /// Ask the auth collaborator to end the session, then sign out locally.
    ///
    /// # Errors
    ///
    /// If the auth collaborator fails the error is returned and nothing
    /// else changes.
    pub async fn log_out(
        &self,
        storage: &mut impl SessionStorage,
        navigator: &mut impl Navigator,
    ) -> Result<(), Error> {
        if let Some(user_id) = storage.get_item() {
            if let Err(error) = self.auth.sign_out(&user_id).await {
                tracing::error!("could not sign out user {user_id}: {error}");
                return Err(error);
            }
        }

        self.on_auth_event(AuthEvent::SignedOut, storage, navigator)
            .await
    }

    /// Replace the page's collection with the user's transactions from the store.
    ///
    /// A failed fetch is logged and leaves the collection empty. If the page
    /// was signed out or reloaded while fetching, the result is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if page state could not be locked.
    pub async fn load(&self, page: &Page, user_id: &UserId) -> Result<LoadOutcome, Error> {
        let ticket = page.begin_load(user_id)?;

        let (action, outcome) = match self.repository.list(user_id).await {
            Ok(transactions) => {
                let count = transactions.len();
                (
                    Action::Loaded {
                        ticket,
                        transactions,
                    },
                    LoadOutcome::Loaded(count),
                )
            }
            Err(error) => {
                tracing::error!("could not load transactions for user {user_id}: {error}");
                (Action::LoadFailed { ticket }, LoadOutcome::Failed)
            }
        };

        if page.dispatch(action)? {
            Ok(outcome)
        } else {
            tracing::debug!("discarding stale load for user {user_id}");
            Ok(LoadOutcome::Discarded)
        }
    }

    /// Insert `new_transaction` and append the stored row to the page.
    ///
    /// # Errors
    ///
    /// Returns the store's error, in which case the page is unchanged.
    pub async fn add_transaction(
        &self,
        page: &Page,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let transaction = self
            .repository
            .insert(new_transaction)
            .await
            .inspect_err(|error| tracing::error!("could not create transaction: {error}"))?;

        page.dispatch(Action::Appended(transaction.clone()))?;

        Ok(transaction)
    }

    /// Mark the ledger row `id` as waiting for delete confirmation.
    ///
    /// Returns `false` if there is no such row on the page.
    ///
    /// # Errors
    ///
    /// Returns an error if page state could not be locked.
    pub fn request_delete(&self, page: &Page, id: TransactionId) -> Result<bool, Error> {
        page.dispatch(Action::DeleteRequested(id))
    }

    /// Go back to idle without deleting anything.
    ///
    /// # Errors
    ///
    /// Returns an error if page state could not be locked.
    pub fn cancel_delete(&self, page: &Page) -> Result<(), Error> {
        page.dispatch(Action::DeleteCancelled)?;

        Ok(())
    }

    /// Delete transaction `id` from the store and remove it from the page.
    ///
    /// The page returns to idle whether or not the delete succeeded.
    ///
    /// # Errors
    ///
    /// Returns the store's error, in which case the row stays on the page.
    pub async fn confirm_delete(&self, page: &Page, id: TransactionId) -> Result<(), Error> {
        let (session, pending) =
            page.read(|state| (state.session().cloned(), state.pending_delete()))?;

        let Some(user_id) = session else {
            page.dispatch(Action::DeleteCancelled)?;
            return Err(Error::NotSignedIn);
        };

        if pending != Some(id) {
            tracing::debug!("deleting transaction {id} which was not awaiting confirmation");
        }

        let result = self.repository.delete(id, &user_id).await;

        match &result {
            Ok(()) => {
                page.dispatch(Action::Removed(id))?;
                tracing::info!("deleted transaction {id} for user {user_id}");
            }
            Err(error) => {
                tracing::error!("could not delete transaction {id}: {error}");
            }
        }

        page.dispatch(Action::DeleteCancelled)?;

        result
    }
}
