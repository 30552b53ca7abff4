//! JSON endpoints for listing, creating, updating and deleting expenses.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    body::Bytes,
    extract::{FromRef, Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{Value, json};
use time::Date;

use crate::{
    AppState, Error,
    db::lock_connection,
    expense::{
        ExpenseId, ExpenseUpdate, NewExpense, create_expense, delete_expense,
        domain::{ExpenseBody, ExpensePatchBody, parse_date},
        get_expenses, update_expense,
    },
    json::{parse_json_object, parse_json_or_default, require_json_content_type},
};

/// The state needed by the expense endpoints and dialogs.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The optional, inclusive date bounds for listing expenses.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    /// The earliest date to include, as `YYYY-MM-DD`.
    pub from: Option<String>,
    /// The latest date to include, as `YYYY-MM-DD`.
    pub to: Option<String>,
}

impl DateRangeQuery {
    /// Parse the bounds, ignoring empty values.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidDate] for a malformed date, or
    /// [Error::InvalidDateRange] if `from` is after `to`.
    pub fn parse(&self) -> Result<(Option<Date>, Option<Date>), Error> {
        let parse_bound = |bound: &Option<String>| {
            bound
                .as_deref()
                .filter(|text| !text.trim().is_empty())
                .map(parse_date)
                .transpose()
        };

        let from = parse_bound(&self.from)?;
        let to = parse_bound(&self.to)?;

        match (from, to) {
            (Some(from), Some(to)) if from > to => Err(Error::InvalidDateRange(from, to)),
            bounds => Ok(bounds),
        }
    }
}

/// List expenses in the order they were created, optionally limited to a date range.
pub async fn get_expenses_endpoint(
    State(state): State<ExpenseState>,
    Query(query): Query<DateRangeQuery>,
) -> Response {
    let (from, to) = match query.parse() {
        Ok(bounds) => bounds,
        Err(error) => return error.into_api_response("Failed to fetch expenses"),
    };

    lock_connection(&state.db_connection)
        .and_then(|connection| get_expenses(from, to, &connection))
        .map(|expenses| Json(expenses).into_response())
        .unwrap_or_else(|error| error.into_api_response("Failed to fetch expenses"))
}

/// Create an expense from a JSON object.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let new_expense = match parse_new_expense(&headers, &body) {
        Ok(new_expense) => new_expense,
        Err(error) => return error.into_api_response("Failed to add expense"),
    };

    lock_connection(&state.db_connection)
        .and_then(|connection| create_expense(new_expense, &connection))
        .map(|expense| Json(expense).into_response())
        .unwrap_or_else(|error| error.into_api_response("Failed to add expense"))
}

fn parse_new_expense(headers: &HeaderMap, body: &[u8]) -> Result<NewExpense, Error> {
    require_json_content_type(headers)?;
    let object = parse_json_object(body)?;
    let body: ExpenseBody = serde_json::from_value(Value::Object(object))
        .map_err(|error| Error::InvalidExpense(error.to_string()))?;

    NewExpense::try_from(body)
}

/// Merge the fields in the JSON body into an existing expense.
pub async fn update_expense_endpoint(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<ExpenseState>,
    body: Bytes,
) -> Response {
    let update = match parse_json_or_default::<ExpensePatchBody>(&body)
        .and_then(ExpenseUpdate::try_from)
    {
        Ok(update) => update,
        Err(error) => return error.into_api_response("Failed to update expense"),
    };

    lock_connection(&state.db_connection)
        .and_then(|connection| update_expense(expense_id, update, &connection))
        .map(|expense| Json(expense).into_response())
        .unwrap_or_else(|error| error.into_api_response("Failed to update expense"))
}

/// Delete an expense.
pub async fn delete_expense_endpoint(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<ExpenseState>,
) -> Response {
    lock_connection(&state.db_connection)
        .and_then(|connection| delete_expense(expense_id, &connection))
        .map(|_| Json(json!({ "message": "Expense deleted successfully" })).into_response())
        .unwrap_or_else(|error| error.into_api_response("Failed to delete expense"))
}
