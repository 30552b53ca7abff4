//! JSON endpoints for listing, creating, updating and deleting categories.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    body::Bytes,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState,
    category::{
        CategoryId, CategoryUpdate, NewCategory, create_category, delete_category,
        domain::CategoryBody, get_all_categories, update_category,
    },
    db::lock_connection,
    json::parse_json_or_default,
};

/// The state needed by the category endpoints, pages and dialogs.
#[derive(Debug, Clone)]
pub struct CategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List all categories sorted by name.
pub async fn get_categories_endpoint(State(state): State<CategoryState>) -> Response {
    lock_connection(&state.db_connection)
        .and_then(|connection| get_all_categories(&connection))
        .map(|categories| Json(categories).into_response())
        .unwrap_or_else(|error| error.into_api_response("Failed to fetch categories"))
}

/// Create a category from a `{name, color}` body and return it with 201.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    body: Bytes,
) -> Response {
    let new_category = match parse_json_or_default::<CategoryBody>(&body)
        .and_then(|body| NewCategory::parse(body.name.as_deref(), body.color.as_deref()))
    {
        Ok(new_category) => new_category,
        Err(error) => return error.into_api_response("Failed to create category"),
    };

    lock_connection(&state.db_connection)
        .and_then(|connection| create_category(new_category, &connection))
        .map(|category| (StatusCode::CREATED, Json(category)).into_response())
        .unwrap_or_else(|error| error.into_api_response("Failed to create category"))
}

/// Replace the name and/or color of a category.
///
/// Responds with `null` if the category does not exist.
pub async fn update_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryState>,
    body: Bytes,
) -> Response {
    let update = match parse_json_or_default::<CategoryBody>(&body)
        .and_then(|body| CategoryUpdate::parse(body.name.as_deref(), body.color.as_deref()))
    {
        Ok(update) => update,
        Err(error) => return error.into_api_response("Failed to update category"),
    };

    lock_connection(&state.db_connection)
        .and_then(|connection| update_category(category_id, update, &connection))
        .map(|category| {
            if category.is_none() {
                tracing::debug!("tried to update category {category_id} which does not exist");
            }

            Json(category).into_response()
        })
        .unwrap_or_else(|error| error.into_api_response("Failed to update category"))
}

/// Delete a category. Deleting a category that does not exist still succeeds.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryState>,
) -> Response {
    lock_connection(&state.db_connection)
        .and_then(|connection| delete_category(category_id, &connection))
        .map(|_| Json(json!({ "message": "Category deleted successfully" })).into_response())
        .unwrap_or_else(|error| error.into_api_response("Failed to delete category"))
}
