//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    category::{
        create_category_dialog_endpoint, create_category_endpoint,
        delete_category_dialog_endpoint, delete_category_endpoint, get_categories_endpoint,
        get_categories_page, get_category_grid, get_edit_category_dialog, get_new_category_dialog,
        update_category_dialog_endpoint, update_category_endpoint,
    },
    dashboard::{get_dashboard_content, get_dashboard_page},
    endpoints,
    expense::{
        create_expense_dialog_endpoint, create_expense_endpoint, delete_expense_dialog_endpoint,
        delete_expense_endpoint, get_edit_expense_dialog, get_expenses_endpoint,
        get_new_expense_dialog, update_expense_dialog_endpoint, update_expense_endpoint,
    },
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let view_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::DASHBOARD_CONTENT, get(get_dashboard_content))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::CATEGORY_GRID, get(get_category_grid));

    let dialog_routes = Router::new()
        .route(endpoints::NEW_CATEGORY_DIALOG, get(get_new_category_dialog))
        .route(endpoints::EDIT_CATEGORY_DIALOG, get(get_edit_category_dialog))
        .route(
            endpoints::CATEGORY_DIALOGS,
            axum::routing::post(create_category_dialog_endpoint),
        )
        .route(
            endpoints::CATEGORY_DIALOG,
            put(update_category_dialog_endpoint).delete(delete_category_dialog_endpoint),
        )
        .route(endpoints::NEW_EXPENSE_DIALOG, get(get_new_expense_dialog))
        .route(endpoints::EDIT_EXPENSE_DIALOG, get(get_edit_expense_dialog))
        .route(
            endpoints::EXPENSE_DIALOGS,
            axum::routing::post(create_expense_dialog_endpoint),
        )
        .route(
            endpoints::EXPENSE_DIALOG,
            put(update_expense_dialog_endpoint).delete(delete_expense_dialog_endpoint),
        );

    let api_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(
            endpoints::CATEGORIES_API,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY_API,
            put(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(
            endpoints::EXPENSES_API,
            get(get_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE_API,
            put(update_expense_endpoint).delete(delete_expense_endpoint),
        );

    view_routes
        .merge(dialog_routes)
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
