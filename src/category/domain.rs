//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

/// The colors offered by the category dialogs, the first one is the default.
pub const PRESET_COLORS: [&str; 8] = [
    "#EF4444", "#F59E0B", "#10B981", "#3B82F6", "#8B5CF6", "#EC4899", "#6B7280", "#14B8A6",
];

/// Database identifier for a category.
pub type CategoryId = i64;

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty or just whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A hex color string, either `#RGB` or `#RRGGBB`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryColor(String);

impl CategoryColor {
    /// Create a category color.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidColor] if `color` is not a
    /// `#` followed by three or six hex digits.
    pub fn new(color: &str) -> Result<Self, Error> {
        let color = color.trim();
        let is_hex_color = color
            .strip_prefix('#')
            .filter(|digits| matches!(digits.len(), 3 | 6))
            .is_some_and(|digits| digits.chars().all(|c| c.is_ascii_hexdigit()));

        if is_hex_color {
            Ok(Self(color.to_string()))
        } else {
            Err(Error::InvalidColor(color.to_owned()))
        }
    }

    /// Create a category color without validation.
    ///
    /// The caller should ensure that the string is a hex color.
    pub fn new_unchecked(color: &str) -> Self {
        Self(color.to_string())
    }
}

impl Default for CategoryColor {
    fn default() -> Self {
        Self::new_unchecked(PRESET_COLORS[0])
    }
}

impl AsRef<str> for CategoryColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, colored label for grouping expenses (e.g., 'Groceries', 'Transport').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The ID assigned by the database.
    pub id: CategoryId,
    /// The display name of the category.
    pub name: CategoryName,
    /// The color used for the category's swatch and chart slice.
    pub color: CategoryColor,
    /// When the category was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the category was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The validated fields for creating a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// The display name.
    pub name: CategoryName,
    /// The swatch and chart color.
    pub color: CategoryColor,
}

impl NewCategory {
    /// Validate raw name and color values, e.g. from a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingCategoryFields] if either value is missing or
    /// blank, or [Error::InvalidColor] if the color is not a hex color.
    pub fn parse(name: Option<&str>, color: Option<&str>) -> Result<Self, Error> {
        let (Some(name), Some(color)) = (
            name.filter(|name| !name.trim().is_empty()),
            color.filter(|color| !color.trim().is_empty()),
        ) else {
            return Err(Error::MissingCategoryFields);
        };

        Ok(Self {
            name: CategoryName::new(name)?,
            color: CategoryColor::new(color)?,
        })
    }
}

/// The validated fields to change on a category. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryUpdate {
    pub name: Option<CategoryName>,
    pub color: Option<CategoryColor>,
}

impl CategoryUpdate {
    /// Validate the raw values that are present.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyCategoryName] or [Error::InvalidColor] if a value
    /// is present but invalid.
    pub fn parse(name: Option<&str>, color: Option<&str>) -> Result<Self, Error> {
        Ok(Self {
            name: name.map(CategoryName::new).transpose()?,
            color: color.map(CategoryColor::new).transpose()?,
        })
    }
}

/// The JSON body accepted when creating or updating a category.
///
/// Fields are optional here so that missing fields can be reported with a
/// 400 rather than a deserialization rejection.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CategoryBody {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[cfg(test)]
mod category_name_tests {
    use crate::{Error, category::CategoryName};

    #[test]
    fn new_fails_on_empty_string() {
        let name = CategoryName::new("");

        assert_eq!(name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let name = CategoryName::new("\n\t \r");

        assert_eq!(name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_trims_whitespace() {
        let name = CategoryName::new("  Groceries ").unwrap();

        assert_eq!(name.as_ref(), "Groceries");
    }
}
