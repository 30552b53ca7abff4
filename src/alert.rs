//! Transient notifications shown in the alert container at the bottom of the page.
//!
//! Error alerts are swapped into `#alert-container` through `hx-target-error`.
//! Success alerts are sent as an out-of-band swap so that the main response
//! can target something else, e.g. the dialog container.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// The element ID of the container that alerts are rendered into.
pub const ALERT_CONTAINER_ID: &str = "alert-container";

/// A success or error message for the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with no extra details.
    SuccessSimple {
        /// The headline shown to the user.
        message: String,
    },
    /// An error message with a short explanation.
    Error {
        /// The headline shown to the user.
        message: String,
        /// What went wrong, or what the user can do about it.
        details: String,
    },
}

impl Alert {
    /// Render the alert on its own.
    pub fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::SuccessSimple { message } => (
                "flex items-start gap-3 p-4 rounded-lg shadow-lg border \
                text-green-800 bg-green-50 border-green-300 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800",
                message,
                None,
            ),
            Alert::Error { message, details } => (
                "flex items-start gap-3 p-4 rounded-lg shadow-lg border \
                text-red-800 bg-red-50 border-red-300 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
                message,
                Some(details),
            ),
        };

        html! {
            div class=(container_style) role="alert"
            {
                div class="flex-1"
                {
                    p class="font-medium" { (message) }

                    @if let Some(details) = details.filter(|details| !details.is_empty())
                    {
                        p class="mt-1 text-sm" { (details) }
                    }
                }

                button
                    type="button"
                    class="text-sm font-semibold opacity-70 hover:opacity-100"
                    aria-label="Dismiss"
                    data-dismiss-alert
                {
                    "✕"
                }
            }
        }
    }

    /// Render the alert wrapped in an out-of-band swap for the alert container.
    pub fn into_oob_html(self) -> Markup {
        html! {
            div id=(ALERT_CONTAINER_ID) hx-swap-oob="innerHTML"
            {
                (self.into_html())
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
