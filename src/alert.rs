//! Alert system for displaying success and error messages to users.
//!
//! Alerts are swapped into the `#alert-container` element that every page
//! carries, either as the target of an htmx error response or out-of-band
//! alongside other content.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Success,
    Error,
}

/// An alert message with optional details.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new success alert
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }

    fn content(&self) -> Markup {
        let (type_name, container_style, icon) = match self.alert_type {
            AlertType::Success => (
                "success",
                "flex items-start gap-3 p-4 mb-4 text-sm rounded-lg shadow \
                text-green-800 bg-green-50 dark:bg-gray-800 dark:text-green-400",
                "✓",
            ),
            AlertType::Error => (
                "error",
                "flex items-start gap-3 p-4 mb-4 text-sm rounded-lg shadow \
                text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400",
                "!",
            ),
        };

        html! {
            div
                class=(container_style)
                role="alert"
                data-alert-type=(type_name)
            {
                span class="font-bold" aria-hidden="true" { (icon) }

                div class="flex-1"
                {
                    p class="font-medium" { (self.message) }

                    @if !self.details.is_empty() {
                        p { (self.details) }
                    }
                }

                button
                    type="button"
                    class="ms-auto font-bold"
                    aria-label="Dismiss"
                    onclick="document.getElementById('alert-container').classList.add('hidden')"
                {
                    "×"
                }
            }
        }
    }

    /// The alert for swapping into `#alert-container` with `hx-target-error`.
    pub fn into_markup(self) -> Markup {
        self.content()
    }

    /// The alert wrapped in an out-of-band swap of `#alert-container`, to be
    /// sent alongside the main content of an htmx response.
    pub fn into_oob_markup(self) -> Markup {
        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                (self.content())
            }
        }
    }

    /// Render the alert as the whole response body with `status_code`.
    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, self.into_markup()).into_response()
    }
}
