//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/expenses/{expense_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The page showing spending totals, the category chart and the expense list.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The dashboard content without the surrounding page, for htmx swaps.
pub const DASHBOARD_CONTENT: &str = "/dashboard/content";
/// The page for managing categories.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The category grid without the surrounding page, for htmx swaps.
pub const CATEGORY_GRID: &str = "/categories/grid";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The dialog for adding a category.
pub const NEW_CATEGORY_DIALOG: &str = "/dialogs/categories/new";
/// The dialog for editing an existing category.
pub const EDIT_CATEGORY_DIALOG: &str = "/dialogs/categories/{category_id}/edit";
/// The route the add category dialog submits to.
pub const CATEGORY_DIALOGS: &str = "/dialogs/categories";
/// The route the edit category dialog submits to, also used to delete from the grid.
pub const CATEGORY_DIALOG: &str = "/dialogs/categories/{category_id}";
/// The dialog for adding an expense.
pub const NEW_EXPENSE_DIALOG: &str = "/dialogs/expenses/new";
/// The dialog for editing an existing expense.
pub const EDIT_EXPENSE_DIALOG: &str = "/dialogs/expenses/{expense_id}/edit";
/// The route the add expense dialog submits to.
pub const EXPENSE_DIALOGS: &str = "/dialogs/expenses";
/// The route the edit expense dialog submits to, also used to delete from the list.
pub const EXPENSE_DIALOG: &str = "/dialogs/expenses/{expense_id}";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route to list and create categories.
pub const CATEGORIES_API: &str = "/api/categories";
/// The route to update and delete a single category.
pub const CATEGORY_API: &str = "/api/categories/{category_id}";
/// The route to list and create expenses.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route to update and delete a single expense.
pub const EXPENSE_API: &str = "/api/expenses/{expense_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/expenses/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
