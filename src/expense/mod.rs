//! Expenses: money spent on a given day, optionally filed under a category.

mod api;
mod db;
mod dialog;
mod domain;
mod list;

pub use api::{
    create_expense_endpoint, delete_expense_endpoint, get_expenses_endpoint,
    update_expense_endpoint,
};
pub use db::{
    create_expense, create_expense_table, delete_expense, get_expense, get_expenses,
    update_expense,
};
pub use dialog::{
    EXPENSES_CHANGED_EVENT, create_expense_dialog_endpoint, delete_expense_dialog_endpoint,
    get_edit_expense_dialog, get_new_expense_dialog, update_expense_dialog_endpoint,
};
pub use domain::{Expense, ExpenseId, ExpenseUpdate, NewExpense, parse_date};
pub(crate) use list::expense_list_view;
