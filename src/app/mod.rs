//! The page logic, independent of HTTP.
//!
//! Each signed-in user has one [PageState] that is only changed by applying
//! an [Action]. The [Controller] turns auth events and ledger clicks into
//! calls on its collaborators and dispatches the results to the page.

mod controller;
mod page;
mod state;

pub use controller::{Controller, LoadOutcome};
pub use page::Page;
pub use state::{Action, LoadTicket, PageState};
