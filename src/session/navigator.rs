//! Navigation as a side effect of session changes.

use axum::response::Redirect;
use axum_htmx::HxRedirect;

/// Sends the client to another page.
pub trait Navigator {
    /// Navigate to `path`.
    ///
    /// If called more than once, the last path wins.
    fn push(&mut self, path: &str);
}

/// A [Navigator] that remembers the last pushed path so a handler can turn it
/// into a redirect response.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Redirector {
    location: Option<String>,
}

impl Redirector {
    /// Create a navigator that has not been sent anywhere yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last path pushed, if any.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// A `303 See Other` redirect to the last pushed path.
    pub fn into_redirect(self) -> Option<Redirect> {
        self.location.map(|location| Redirect::to(&location))
    }

    /// An htmx client-side redirect to the last pushed path.
    pub fn into_hx_redirect(self) -> Option<HxRedirect> {
        self.location.map(HxRedirect)
    }
}

impl Navigator for Redirector {
    fn push(&mut self, path: &str) {
        tracing::debug!("navigating to {path}");
        self.location = Some(path.to_owned());
    }
}
