//! Dashboard module
//!
//! Provides an overview page showing spending for a date range: stat cards, a
//! pie chart of spending by category and the list of expenses.

mod cards;
mod charts;
mod filter;
mod handlers;
mod summary;

pub use handlers::{get_dashboard_content, get_dashboard_page};
