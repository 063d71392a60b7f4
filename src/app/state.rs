//! The per-user page state and the actions that change it.

use crate::{database_id::TransactionId, transaction::Transaction, user::UserId};

/// Identifies one load of a user's transactions.
///
/// A load result is only applied if its ticket is still current when it
/// arrives, see [PageState::begin_load].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    user_id: UserId,
    generation: u64,
}

/// Everything that can happen to a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A user signed in on the page.
    SignedIn(UserId),
    /// The user signed out or their session ended.
    SignedOut,
    /// A load finished successfully.
    Loaded {
        /// The ticket handed out when the load started.
        ticket: LoadTicket,
        /// The user's transactions in store order.
        transactions: Vec<Transaction>,
    },
    /// A load failed.
    LoadFailed {
        /// The ticket handed out when the load started.
        ticket: LoadTicket,
    },
    /// A transaction was inserted into the store.
    Appended(Transaction),
    /// A transaction was deleted from the store.
    Removed(TransactionId),
    /// The delete button of a ledger row was clicked.
    DeleteRequested(TransactionId),
    /// The pending delete was cancelled or has finished.
    DeleteCancelled,
}

/// The state of one user's page.
///
/// The collection only ever holds the transactions of the signed-in user, in
/// the order the store returned or accepted them. At most one row can be
/// waiting for delete confirmation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    session: Option<UserId>,
    transactions: Vec<Transaction>,
    pending_delete: Option<TransactionId>,
    generation: u64,
}

impl PageState {
    /// A signed-out page with no transactions.
    pub fn new() -> Self {
        Self::default()
    }

    /// The signed-in user, if any.
    pub fn session(&self) -> Option<&UserId> {
        self.session.as_ref()
    }

    /// The signed-in user's transactions.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The ledger row waiting for delete confirmation.
    pub fn pending_delete(&self) -> Option<TransactionId> {
        self.pending_delete
    }

    /// Start a load for `user_id`.
    ///
    /// Any load started earlier becomes stale, as do loads started before the
    /// next sign-in or sign-out.
    pub fn begin_load(&mut self, user_id: &UserId) -> LoadTicket {
        self.generation += 1;

        LoadTicket {
            user_id: user_id.clone(),
            generation: self.generation,
        }
    }

    fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation && self.session.as_ref() == Some(&ticket.user_id)
    }

    /// Apply `action` to the page.
    ///
    /// Returns `false` if the action was ignored: a load result with a stale
    /// ticket, a transaction that does not belong to the signed-in user, or a
    /// delete request for a row that is not in the ledger.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::SignedIn(user_id) => {
                if self.session.as_ref() != Some(&user_id) {
                    self.transactions.clear();
                    self.pending_delete = None;
                }

                self.session = Some(user_id);
                self.generation += 1;
            }
            Action::SignedOut => {
                self.session = None;
                self.transactions.clear();
                self.pending_delete = None;
                self.generation += 1;
            }
            Action::Loaded {
                ticket,
                transactions,
            } => {
                if !self.is_current(&ticket) {
                    return false;
                }

                self.transactions = transactions;
                self.pending_delete = None;
            }
            Action::LoadFailed { ticket } => {
                if !self.is_current(&ticket) {
                    return false;
                }

                self.transactions.clear();
                self.pending_delete = None;
            }
            Action::Appended(transaction) => {
                if self.session.as_ref() != Some(&transaction.user_id) {
                    return false;
                }

                self.transactions.push(transaction);
            }
            Action::Removed(id) => {
                self.transactions.retain(|transaction| transaction.id != id);

                if self.pending_delete == Some(id) {
                    self.pending_delete = None;
                }
            }
            Action::DeleteRequested(id) => {
                if !self.transactions.iter().any(|transaction| transaction.id == id) {
                    return false;
                }

                self.pending_delete = Some(id);
            }
            Action::DeleteCancelled => self.pending_delete = None,
        }

        true
    }
}
