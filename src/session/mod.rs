//! The client side of a session: where the signed-in user's ID is kept
//! between requests, and where the page is sent next.

mod navigator;
mod storage;

pub use navigator::{Navigator, Redirector};
pub use storage::{CookieStorage, MemoryStorage, SessionStorage};

use crate::user::UserId;

/// A change in authentication reported by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// A user signed in, or an existing session was confirmed.
    SignedIn(UserId),
    /// The current user signed out or their auth session ended.
    SignedOut,
}
