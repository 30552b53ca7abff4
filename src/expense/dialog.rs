//! The add, edit and delete expense dialogs.
//!
//! These mirror the category dialogs. A successful submit fires
//! `expenses-changed` so that the dashboard content refetches.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HX_TRIGGER;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    alert::{ALERT_CONTAINER_ID, Alert},
    category::{Category, CategoryId, get_all_categories},
    db::lock_connection,
    endpoints,
    expense::{
        Expense, ExpenseId, ExpenseUpdate, NewExpense, create_expense, delete_expense,
        domain::parse_date, get_expense, update_expense,
    },
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, DIALOG_CONTAINER_ID, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, dialog,
    },
    timezone::local_today,
};

/// The event fired after an expense is added, changed or deleted.
pub const EXPENSES_CHANGED_EVENT: &str = "expenses-changed";

const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields";

/// The state needed by the expense dialogs.
#[derive(Debug, Clone)]
pub struct ExpenseDialogState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The canonical timezone used to pick the default date.
    pub local_timezone: String,
}

impl FromRef<AppState> for ExpenseDialogState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form fields submitted by the expense dialogs.
///
/// Every field arrives as text so that blank fields can be reported with a
/// single message instead of a deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseFormData {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category_id: String,
}

impl ExpenseFormData {
    fn validate(&self) -> Result<NewExpense, Error> {
        let any_blank = [
            &self.amount,
            &self.description,
            &self.date,
            &self.category_id,
        ]
        .iter()
        .any(|field| field.trim().is_empty());

        if any_blank {
            return Err(Error::MissingFormFields(MISSING_FIELDS_MESSAGE));
        }

        let amount: f64 = self.amount.trim().parse().map_err(|_| {
            Error::InvalidExpense(format!("\"{}\" is not a number", self.amount.trim()))
        })?;
        let category_id: CategoryId = self.category_id.trim().parse().map_err(|_| {
            Error::InvalidExpense(format!(
                "\"{}\" is not a category ID",
                self.category_id.trim()
            ))
        })?;

        NewExpense::new(
            amount,
            &self.description,
            parse_date(&self.date)?,
            Some(category_id),
        )
    }
}

/// Render the add expense dialog with today's date filled in.
pub async fn get_new_expense_dialog(State(state): State<ExpenseDialogState>) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    lock_connection(&state.db_connection)
        .and_then(|connection| get_all_categories(&connection))
        .map(|categories| expense_dialog_view(None, today, &categories).into_response())
        .unwrap_or_else(|error| error.into_alert_response())
}

/// Render the edit expense dialog filled in with the expense's current values.
pub async fn get_edit_expense_dialog(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<ExpenseDialogState>,
) -> Response {
    lock_connection(&state.db_connection)
        .and_then(|connection| {
            let expense = get_expense(expense_id, &connection)?;
            let categories = get_all_categories(&connection)?;
            Ok((expense, categories))
        })
        .map(|(expense, categories)| {
            expense_dialog_view(Some(&expense), expense.date, &categories).into_response()
        })
        .unwrap_or_else(|error| error.into_alert_response())
}

/// Handle the add expense dialog submission.
pub async fn create_expense_dialog_endpoint(
    State(state): State<ExpenseDialogState>,
    Form(form): Form<ExpenseFormData>,
) -> Response {
    let new_expense = match form.validate() {
        Ok(new_expense) => new_expense,
        Err(error) => return error.into_alert_response(),
    };

    lock_connection(&state.db_connection)
        .and_then(|connection| create_expense(new_expense, &connection))
        .map(|expense| {
            expenses_changed_response(Alert::SuccessSimple {
                message: format!("Added expense '{}'", expense.description),
            })
        })
        .unwrap_or_else(|error| error.into_alert_response())
}

/// Handle the edit expense dialog submission.
pub async fn update_expense_dialog_endpoint(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<ExpenseDialogState>,
    Form(form): Form<ExpenseFormData>,
) -> Response {
    let update = match form.validate() {
        Ok(fields) => ExpenseUpdate {
            amount: Some(fields.amount),
            description: Some(fields.description),
            date: Some(fields.date),
            category_id: Some(fields.category_id),
        },
        Err(error) => return error.into_alert_response(),
    };

    lock_connection(&state.db_connection)
        .and_then(|connection| update_expense(expense_id, update, &connection))
        .map(|expense| {
            expenses_changed_response(Alert::SuccessSimple {
                message: format!("Updated expense '{}'", expense.description),
            })
        })
        .unwrap_or_else(|error| error.into_alert_response())
}

/// Delete an expense from the expense list.
pub async fn delete_expense_dialog_endpoint(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<ExpenseDialogState>,
) -> Response {
    lock_connection(&state.db_connection)
        .and_then(|connection| delete_expense(expense_id, &connection))
        .map(|_| {
            expenses_changed_response(Alert::SuccessSimple {
                message: "Expense deleted successfully".to_owned(),
            })
        })
        .unwrap_or_else(|error| error.into_alert_response())
}

fn expenses_changed_response(alert: Alert) -> Response {
    (
        [(HX_TRIGGER, EXPENSES_CHANGED_EVENT)],
        alert.into_oob_html(),
    )
        .into_response()
}

fn expense_dialog_view(expense: Option<&Expense>, date: Date, categories: &[Category]) -> Markup {
    let (title, submit_label) = match expense {
        Some(_) => ("Edit Expense", "Save Changes"),
        None => ("Add Expense", "Add Expense"),
    };
    let amount = expense.map(|expense| format!("{:.2}", expense.amount));
    let description = expense
        .map(|expense| expense.description.as_str())
        .unwrap_or_default();
    let selected_category = expense.and_then(|expense| expense.category_id);

    let form = html! {
        form
            hx-post=[expense.is_none().then_some(endpoints::EXPENSE_DIALOGS)]
            hx-put=[expense.map(|expense| endpoints::format_endpoint(endpoints::EXPENSE_DIALOG, expense.id))]
            hx-target={ "#" (DIALOG_CONTAINER_ID) }
            hx-target-error={ "#" (ALERT_CONTAINER_ID) }
            hx-swap="innerHTML"
            class="space-y-4"
        {
            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    id="amount"
                    type="number"
                    name="amount"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    value=[amount]
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    id="description"
                    type="text"
                    name="description"
                    placeholder="What was it for?"
                    value=(description)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    id="date"
                    type="date"
                    name="date"
                    value=(date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

                select
                    id="category_id"
                    name="category_id"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[selected_category.is_none()] { "Select a category" }

                    @for category in categories {
                        option
                            value=(category.id)
                            selected[selected_category == Some(category.id)]
                        {
                            (category.name)
                        }
                    }
                }

                @if categories.is_empty() {
                    p class="mt-2 text-sm text-gray-500 dark:text-gray-400"
                    {
                        "No categories yet. "
                        a href=(endpoints::CATEGORIES_VIEW) class=(LINK_STYLE) { "Add a category" }
                        " first."
                    }
                }
            }

            div class="flex justify-end gap-2"
            {
                button type="button" class=(BUTTON_SECONDARY_STYLE) data-close-dialog
                {
                    "Cancel"
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
            }
        }
    };

    dialog(title, &form)
}
