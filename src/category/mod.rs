//! Categories for grouping expenses.

mod api;
mod db;
mod dialog;
mod domain;
mod page;

pub use api::{
    create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
    update_category_endpoint,
};
pub use db::{
    create_category, create_category_table, delete_category, get_all_categories, get_category,
    update_category,
};
pub use dialog::{
    create_category_dialog_endpoint, delete_category_dialog_endpoint, get_edit_category_dialog,
    get_new_category_dialog, update_category_dialog_endpoint,
};
pub use domain::{
    Category, CategoryColor, CategoryId, CategoryName, CategoryUpdate, NewCategory, PRESET_COLORS,
};
pub use page::{CATEGORIES_CHANGED_EVENT, get_categories_page, get_category_grid};
