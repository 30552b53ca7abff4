//! The expense list shown on the dashboard.

use std::collections::HashMap;

use maud::{Markup, html};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    category::{Category, CategoryId},
    endpoints,
    expense::Expense,
    html::{CARD_STYLE, CATEGORY_BADGE_STYLE, edit_delete_actions, format_currency},
};

/// Shown for expenses without a category, or whose category was deleted.
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";
/// The swatch color for [UNCATEGORIZED_NAME].
pub const UNCATEGORIZED_COLOR: &str = "#a1a1aa";

const LIST_DATE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[month repr:short] [day], [year]");

/// Look up the name and color to show for an expense's category.
fn category_label<'a>(
    category_id: Option<CategoryId>,
    categories: &HashMap<CategoryId, &'a Category>,
) -> (&'a str, &'a str) {
    category_id
        .and_then(|id| categories.get(&id))
        .map(|category| (category.name.as_ref(), category.color.as_ref()))
        .unwrap_or((UNCATEGORIZED_NAME, UNCATEGORIZED_COLOR))
}

fn format_list_date(date: Date) -> String {
    date.format(LIST_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Render the expense list card.
///
/// Expenses are shown in the order given. Unknown category IDs are shown as
/// [UNCATEGORIZED_NAME].
pub(crate) fn expense_list_view(expenses: &[Expense], categories: &[Category]) -> Markup {
    let categories_by_id: HashMap<CategoryId, &Category> = categories
        .iter()
        .map(|category| (category.id, category))
        .collect();
    let item_label = if expenses.len() == 1 { "item" } else { "items" };

    html!(
        section id="expense-list" class={ (CARD_STYLE) " w-full" }
        {
            header class="flex justify-between items-baseline pb-3 mb-3 border-b border-gray-200 dark:border-gray-700"
            {
                h2 class="text-lg font-semibold" { "Recent Expenses" }

                @if !expenses.is_empty() {
                    span class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        (expenses.len()) " " (item_label)
                    }
                }
            }

            @if expenses.is_empty() {
                p class="py-10 text-center text-gray-500 dark:text-gray-400"
                {
                    "No expenses found. Add your first expense to get started!"
                }
            } @else {
                ul class="flex flex-col gap-3"
                {
                    @for expense in expenses {
                        (expense_row(expense, &categories_by_id))
                    }
                }
            }
        }
    )
}

fn expense_row(expense: &Expense, categories: &HashMap<CategoryId, &Category>) -> Markup {
    let (category_name, category_color) = category_label(expense.category_id, categories);
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_EXPENSE_DIALOG, expense.id);
    let delete_url = endpoints::format_endpoint(endpoints::EXPENSE_DIALOG, expense.id);
    let confirm_message = format!(
        "Are you sure you want to delete '{}'? This action cannot be undone.",
        expense.description
    );

    html!(
        li
            class="flex flex-col sm:flex-row sm:items-center justify-between gap-4 p-4 rounded-lg
                border border-gray-200 dark:border-gray-700"
            data-expense-id=(expense.id)
        {
            div class="flex items-center gap-4 min-w-0"
            {
                span
                    class="w-10 h-10 shrink-0 rounded-lg"
                    style={ "background-color: " (category_color) ";" }
                {}

                div class="min-w-0"
                {
                    p class="font-medium truncate" { (expense.description) }

                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        span class=(CATEGORY_BADGE_STYLE) data-category { (category_name) }
                        " • "
                        time datetime=(expense.date) { (format_list_date(expense.date)) }
                    }
                }
            }

            div class="flex items-center justify-between sm:justify-end gap-4"
            {
                p class="text-lg font-semibold whitespace-nowrap" data-amount
                {
                    (format_currency(expense.amount))
                }

                div class="flex gap-3 text-sm"
                {
                    (edit_delete_actions(&edit_url, &delete_url, &confirm_message))
                }
            }
        }
    )
}
