//! The add, edit and delete category dialogs.
//!
//! Dialogs are rendered into the dialog container. A successful submit
//! empties the container, shows a success alert and fires
//! `categories-changed` so that the grid refetches.

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HX_TRIGGER;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    alert::{ALERT_CONTAINER_ID, Alert},
    category::{
        Category, CategoryColor, CategoryId, CategoryName, CategoryUpdate, NewCategory,
        PRESET_COLORS, api::CategoryState, create_category, delete_category, get_category,
        page::CATEGORIES_CHANGED_EVENT, update_category,
    },
    db::lock_connection,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, DIALOG_CONTAINER_ID,
        FORM_COLOR_SWATCH_STYLE, FORM_LABEL_STYLE, FORM_RADIO_INPUT_STYLE, FORM_TEXT_INPUT_STYLE,
        dialog,
    },
};

const MISSING_NAME_MESSAGE: &str = "Please enter a category name";

/// The form fields submitted by the category dialogs.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryFormData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
}

impl CategoryFormData {
    fn validate(&self) -> Result<(CategoryName, CategoryColor), Error> {
        let name = CategoryName::new(&self.name)
            .map_err(|_| Error::MissingFormFields(MISSING_NAME_MESSAGE))?;
        let color = if self.color.trim().is_empty() {
            CategoryColor::default()
        } else {
            CategoryColor::new(&self.color)?
        };

        Ok((name, color))
    }
}

/// Render the add category dialog.
pub async fn get_new_category_dialog() -> Response {
    category_dialog_view(None).into_response()
}

/// Render the edit category dialog filled in with the category's current values.
pub async fn get_edit_category_dialog(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryState>,
) -> Response {
    lock_connection(&state.db_connection)
        .and_then(|connection| get_category(category_id, &connection))
        .map(|category| category_dialog_view(Some(&category)).into_response())
        .unwrap_or_else(|error| error.into_alert_response())
}

/// Handle the add category dialog submission.
pub async fn create_category_dialog_endpoint(
    State(state): State<CategoryState>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let (name, color) = match form.validate() {
        Ok(fields) => fields,
        Err(error) => return error.into_alert_response(),
    };

    lock_connection(&state.db_connection)
        .and_then(|connection| create_category(NewCategory { name, color }, &connection))
        .map(|category| {
            categories_changed_response(Alert::SuccessSimple {
                message: format!("Added category '{}'", category.name),
            })
        })
        .unwrap_or_else(|error| error.into_alert_response())
}

/// Handle the edit category dialog submission.
pub async fn update_category_dialog_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryState>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let (name, color) = match form.validate() {
        Ok(fields) => fields,
        Err(error) => return error.into_alert_response(),
    };
    let update = CategoryUpdate {
        name: Some(name),
        color: Some(color),
    };

    lock_connection(&state.db_connection)
        .and_then(|connection| update_category(category_id, update, &connection))
        .and_then(|category| category.ok_or(Error::NotFound))
        .map(|category| {
            categories_changed_response(Alert::SuccessSimple {
                message: format!("Updated category '{}'", category.name),
            })
        })
        .unwrap_or_else(|error| error.into_alert_response())
}

/// Delete a category from the category grid.
pub async fn delete_category_dialog_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryState>,
) -> Response {
    lock_connection(&state.db_connection)
        .and_then(|connection| delete_category(category_id, &connection))
        .map(|_| {
            categories_changed_response(Alert::SuccessSimple {
                message: "Category deleted successfully".to_owned(),
            })
        })
        .unwrap_or_else(|error| error.into_alert_response())
}

fn categories_changed_response(alert: Alert) -> Response {
    (
        [(HX_TRIGGER, CATEGORIES_CHANGED_EVENT)],
        alert.into_oob_html(),
    )
        .into_response()
}

fn category_dialog_view(category: Option<&Category>) -> Markup {
    let (title, submit_label) = match category {
        Some(_) => ("Edit Category", "Save Changes"),
        None => ("Add Category", "Add Category"),
    };
    let name = category.map(|category| category.name.as_ref()).unwrap_or_default();
    let selected_color = category
        .map(|category| category.color.as_ref())
        .unwrap_or(PRESET_COLORS[0]);

    // Categories created through the API may use a color outside the presets.
    let mut colors: Vec<&str> = PRESET_COLORS.to_vec();
    if !colors
        .iter()
        .any(|color| color.eq_ignore_ascii_case(selected_color))
    {
        colors.push(selected_color);
    }

    let form = html! {
        form
            hx-post=[category.is_none().then_some(endpoints::CATEGORY_DIALOGS)]
            hx-put=[category.map(|category| endpoints::format_endpoint(endpoints::CATEGORY_DIALOG, category.id))]
            hx-target={ "#" (DIALOG_CONTAINER_ID) }
            hx-target-error={ "#" (ALERT_CONTAINER_ID) }
            hx-swap="innerHTML"
            class="space-y-4"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="e.g. Groceries"
                    value=(name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Color" }

                div class="flex flex-wrap gap-3"
                {
                    @for color in colors {
                        label title=(color)
                        {
                            input
                                type="radio"
                                name="color"
                                value=(color)
                                checked[color.eq_ignore_ascii_case(selected_color)]
                                required
                                class=(FORM_RADIO_INPUT_STYLE);

                            span
                                class=(FORM_COLOR_SWATCH_STYLE)
                                style={ "background-color: " (color) ";" }
                            {}
                        }
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
