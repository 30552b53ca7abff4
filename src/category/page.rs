//! The category management page.
//!
//! The grid refetches itself whenever a dialog or delete action fires the
//! `categories-changed` event, so the page never edits the list in place.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    alert::ALERT_CONTAINER_ID,
    category::{Category, api::CategoryState, get_all_categories},
    db::lock_connection,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, DIALOG_CONTAINER_ID, PAGE_CONTAINER_STYLE, base,
        edit_delete_actions,
    },
    navigation::NavBar,
};

/// The event that tells the category grid to refetch.
pub const CATEGORIES_CHANGED_EVENT: &str = "categories-changed";

/// Render the category management page.
pub async fn get_categories_page(State(state): State<CategoryState>) -> Result<Response, Error> {
    let categories = lock_connection(&state.db_connection)
        .and_then(|connection| get_all_categories(&connection))
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    Ok(categories_view(&categories).into_response())
}

/// Render just the category grid for htmx swaps.
pub async fn get_category_grid(State(state): State<CategoryState>) -> Response {
    lock_connection(&state.db_connection)
        .and_then(|connection| get_all_categories(&connection))
        .map(|categories| category_grid_view(&categories).into_response())
        .unwrap_or_else(|error| error.into_alert_response())
}

fn categories_view(categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-5xl space-y-4"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Categories" }
                        p class="text-sm text-gray-600 dark:text-gray-400"
                        {
                            "Manage your expense categories"
                        }
                    }

                    button
                        type="button"
                        hx-get=(endpoints::NEW_CATEGORY_DIALOG)
                        hx-target={ "#" (DIALOG_CONTAINER_ID) }
                        hx-target-error={ "#" (ALERT_CONTAINER_ID) }
                        class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Add Category"
                    }
                }

                (category_grid_view(categories))
            }
        }
    );

    base("Categories", &[], &content)
}

fn category_grid_view(categories: &[Category]) -> Markup {
    html!(
        div
            id="category-grid"
            hx-get=(endpoints::CATEGORY_GRID)
            hx-trigger={ (CATEGORIES_CHANGED_EVENT) " from:body" }
            hx-swap="outerHTML"
            hx-target-error={ "#" (ALERT_CONTAINER_ID) }
            class="w-full"
        {
            @if categories.is_empty() {
                div class={ (CARD_STYLE) " text-center text-gray-500 dark:text-gray-400" }
                {
                    "No categories yet. Add one to get started!"
                }
            } @else {
                ul class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4"
                {
                    @for category in categories {
                        (category_card(category))
                    }
                }
            }
        }
    )
}

fn category_card(category: &Category) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_DIALOG, category.id);
    let delete_url = endpoints::format_endpoint(endpoints::CATEGORY_DIALOG, category.id);
    let confirm_message = format!(
        "Are you sure you want to delete '{}'? Its expenses will show as Uncategorized.",
        category.name
    );

    html!(
        li class={ (CARD_STYLE) " flex items-center justify-between gap-4" } data-category-id=(category.id)
        {
            div class="flex items-center gap-3 min-w-0"
            {
                span
                    class="w-6 h-6 rounded-full shrink-0"
                    style={ "background-color: " (category.color) ";" }
                    title=(category.color)
                {}

                span class="font-medium truncate" { (category.name) }
            }

            div class="flex gap-4 text-sm"
            {
                (edit_delete_actions(&edit_url, &delete_url, &confirm_message))
            }
        }
    )
}

#[cfg(test)]
mod categories_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        category::{
            CategoryColor, CategoryName, NewCategory, api::CategoryState, create_category,
            create_category_table, get_categories_page, get_category_grid,
        },
        endpoints,
        test_utils::{
            assert_content_type, assert_valid_html, parse_html_document, parse_html_fragment,
        },
    };

    fn get_test_state() -> CategoryState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_category_table(&connection).expect("Could not create category table");

        CategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn insert_category(state: &CategoryState, name: &str, color: &str) {
        create_category(
            NewCategory {
                name: CategoryName::new_unchecked(name),
                color: CategoryColor::new_unchecked(color),
            },
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test category");
    }

    fn card_names(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("#category-grid li span.font-medium").unwrap())
            .map(|span| span.text().collect::<String>())
            .collect()
    }

    #[tokio::test]
    async fn shows_empty_state_without_categories() {
        let response = get_categories_page(State(get_test_state())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let grid_text = html
            .select(&Selector::parse("#category-grid").unwrap())
            .next()
            .expect("No category grid found")
            .text()
            .collect::<String>();
        assert_eq!(grid_text.trim(), "No categories yet. Add one to get started!");
    }

    #[tokio::test]
    async fn lists_categories_sorted_by_name() {
        let state = get_test_state();
        insert_category(&state, "Transport", "#3B82F6");
        insert_category(&state, "Food", "#EF4444");

        let response = get_categories_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(card_names(&html), ["Food", "Transport"]);
    }

    #[tokio::test]
    async fn add_button_opens_dialog() {
        let response = get_categories_page(State(get_test_state())).await.unwrap();

        let html = parse_html_document(response).await;
        let button = html
            .select(&Selector::parse("button[hx-get]").unwrap())
            .next()
            .expect("No add button found");
        assert_eq!(
            button.value().attr("hx-get"),
            Some(endpoints::NEW_CATEGORY_DIALOG)
        );
        assert_eq!(button.value().attr("hx-target"), Some("#dialog-container"));
    }

    #[tokio::test]
    async fn grid_refetches_on_categories_changed() {
        let state = get_test_state();
        insert_category(&state, "Food", "#EF4444");

        let response = get_category_grid(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let grid = html
            .select(&Selector::parse("#category-grid").unwrap())
            .next()
            .expect("No category grid found");
        assert_eq!(grid.value().attr("hx-get"), Some(endpoints::CATEGORY_GRID));
        assert_eq!(
            grid.value().attr("hx-trigger"),
            Some("categories-changed from:body")
        );
        assert_eq!(card_names(&html), ["Food"]);
    }

    #[tokio::test]
    async fn delete_action_asks_for_confirmation() {
        let state = get_test_state();
        insert_category(&state, "Food", "#EF4444");

        let response = get_category_grid(State(state)).await;

        let html = parse_html_fragment(response).await;
        let delete_button = html
            .select(&Selector::parse("button[hx-delete]").unwrap())
            .next()
            .expect("No delete button found");
        assert_eq!(
            delete_button.value().attr("hx-delete"),
            Some(endpoints::format_endpoint(endpoints::CATEGORY_DIALOG, 1).as_str())
        );
        assert!(
            delete_button
                .value()
                .attr("hx-confirm")
                .is_some_and(|message| message.contains("Food"))
        );
    }
}
