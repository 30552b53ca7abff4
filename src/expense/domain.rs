//! Core expense domain types and the input shapes accepted by the API.

use serde::{Deserialize, Deserializer, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, category::CategoryId};

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// The format of expense dates in JSON, forms and the database.
const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(expense_date, Date, "[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [Error::InvalidDate] if `text` is not a valid date in that form.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// Money spent on a given day, optionally filed under a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID assigned by the database.
    pub id: ExpenseId,
    /// How much was spent, zero or more.
    pub amount: f64,
    /// What the money was spent on.
    pub description: String,
    /// The day the money was spent.
    #[serde(with = "expense_date")]
    pub date: Date,
    /// The category the expense is filed under.
    ///
    /// This may refer to a category that has since been deleted.
    pub category_id: Option<CategoryId>,
}

/// The validated fields for creating an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// The amount spent, zero or more.
    pub amount: f64,
    /// What the money was spent on, trimmed and non-empty.
    pub description: String,
    /// The day the money was spent.
    pub date: Date,
    /// The category the expense is filed under, if any.
    pub category_id: Option<CategoryId>,
}

impl NewExpense {
    /// Validate the fields of a new expense.
    ///
    /// The description is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidAmount] if `amount` is negative or not finite,
    /// or [Error::EmptyDescription] if `description` is blank.
    pub fn new(
        amount: f64,
        description: &str,
        date: Date,
        category_id: Option<CategoryId>,
    ) -> Result<Self, Error> {
        Ok(Self {
            amount: validate_amount(amount)?,
            description: validate_description(description)?,
            date,
            category_id,
        })
    }
}

/// The validated fields to change on an expense. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<Date>,
    /// `Some(None)` clears the category.
    pub category_id: Option<Option<CategoryId>>,
}

fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(amount))
    }
}

fn validate_description(description: &str) -> Result<String, Error> {
    let description = description.trim();

    if description.is_empty() {
        Err(Error::EmptyDescription)
    } else {
        Ok(description.to_owned())
    }
}

/// The JSON body accepted when creating an expense.
///
/// Unknown fields, such as `_id`, are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseBody {
    pub amount: f64,
    pub description: String,
    pub date: String,
    #[serde(default, alias = "category_id")]
    pub category_id: Option<CategoryId>,
}

impl TryFrom<ExpenseBody> for NewExpense {
    type Error = Error;

    fn try_from(body: ExpenseBody) -> Result<Self, Self::Error> {
        NewExpense::new(
            body.amount,
            &body.description,
            parse_date(&body.date)?,
            body.category_id,
        )
    }
}

/// The JSON body accepted when updating an expense. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatchBody {
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<String>,
    #[serde(default, alias = "category_id", deserialize_with = "deserialize_present")]
    pub category_id: Option<Option<CategoryId>>,
}

impl TryFrom<ExpensePatchBody> for ExpenseUpdate {
    type Error = Error;

    fn try_from(body: ExpensePatchBody) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: body.amount.map(validate_amount).transpose()?,
            description: body
                .description
                .as_deref()
                .map(validate_description)
                .transpose()?,
            date: body.date.as_deref().map(parse_date).transpose()?,
            category_id: body.category_id,
        })
    }
}

/// Distinguish a field set to `null` from a missing field.
///
/// Used with `#[serde(default)]`, a missing field becomes `None` and `null`
/// becomes `Some(None)`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
