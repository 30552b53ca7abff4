//! Expense Tracker is a web app for recording expenses, grouping them into
//! colored categories and reviewing spending over a date range.
//!
//! This library provides a JSON API for categories and expenses, and
//! server-rendered HTML pages that drive the same operations through htmx.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use time::Date;
use tokio::signal;

mod alert;
mod app_state;
mod category;
mod config;
mod dashboard;
mod db;
mod endpoints;
mod expense;
mod html;
mod internal_server_error;
mod json;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use category::{
    Category, CategoryColor, CategoryId, CategoryName, NewCategory, create_category,
};
pub use config::Config;
pub use db::{initialize as initialize_db, open_store};
pub use expense::{Expense, ExpenseId, NewExpense, create_expense};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// A category color that is not a hex color such as `#3B82F6`.
    #[error("\"{0}\" is not a hex color, use the form #RGB or #RRGGBB")]
    InvalidColor(String),

    /// A category was submitted without a name or a color.
    #[error("Name and color required")]
    MissingCategoryFields,

    /// An empty string was used for an expense description.
    #[error("Description cannot be empty")]
    EmptyDescription,

    /// An expense amount that is negative or not a finite number.
    #[error("{0} is not a valid amount, amounts must be zero or more")]
    InvalidAmount(f64),

    /// A date string that is not in the form `YYYY-MM-DD`.
    #[error("\"{0}\" is not a valid date, use the form YYYY-MM-DD")]
    InvalidDate(String),

    /// The start of a date range is after its end.
    #[error("the start date {0} is after the end date {1}")]
    InvalidDateRange(Date, Date),

    /// The request body for a JSON endpoint was not sent as JSON.
    #[error("Content-Type must be application/json")]
    UnsupportedContentType,

    /// The request body is not valid JSON, or not the expected JSON shape.
    ///
    /// Callers should pass in a description of the problem.
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    /// The request body was empty, `null` or an empty object.
    #[error("No data provided")]
    NoData,

    /// The request body could not be read as an expense.
    ///
    /// Callers should pass in a description of the problem.
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),

    /// A dialog form was submitted with required fields left empty.
    ///
    /// The string is the message to show to the user.
    #[error("{0}")]
    MissingFormFields(&'static str),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an expense that does not exist.
    #[error("Expense not found")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist.
    #[error("Expense not found")]
    DeleteMissingExpense,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A blocking store task panicked or was cancelled.
    #[error("a store task failed to complete: {0}")]
    TaskError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Whether the error was caused by the client's input rather than the server.
    fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyCategoryName
                | Error::InvalidColor(_)
                | Error::MissingCategoryFields
                | Error::EmptyDescription
                | Error::InvalidAmount(_)
                | Error::InvalidDate(_)
                | Error::InvalidDateRange(_, _)
                | Error::UnsupportedContentType
                | Error::NoData
                | Error::InvalidJson(_)
                | Error::InvalidExpense(_)
                | Error::MissingFormFields(_)
        )
    }

    /// Convert the error into a JSON response of the form `{"error": "..."}`.
    ///
    /// Client errors keep their message, missing records map to 404 and
    /// everything else is logged and replaced with `server_message` so that
    /// internal details never reach the client.
    fn into_api_response(self, server_message: &str) -> Response {
        let (status, message) = match self {
            error if error.is_client_error() => (StatusCode::BAD_REQUEST, error.to_string()),
            error @ (Error::NotFound
            | Error::UpdateMissingExpense
            | Error::DeleteMissingExpense) => (StatusCode::NOT_FOUND, error.to_string()),
            error => {
                tracing::error!("{server_message}: {error}");
                (StatusCode::INTERNAL_SERVER_ERROR, server_message.to_owned())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }

    /// Convert the error into an alert fragment for htmx requests.
    fn into_alert_response(self) -> Response {
        match self {
            error if error.is_client_error() => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Please check your input".to_owned(),
                    details: error.to_string(),
                },
            )
                .into_response(),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Not found".to_owned(),
                    details: "The record could not be found. \
                        Try refreshing the page to see if it has been deleted."
                        .to_owned(),
                },
            )
                .into_response(),
            Error::UpdateMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update expense".to_owned(),
                    details: "The expense could not be found.".to_owned(),
                },
            )
                .into_response(),
            Error::DeleteMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete expense".to_owned(),
                    details: "The expense could not be found. \
                        Try refreshing the page to see if the expense has already been deleted."
                        .to_owned(),
                },
            )
                .into_response(),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details: "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                    },
                )
                    .into_response()
            }
        }
    }
}
