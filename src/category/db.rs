//! Database operations for categories.

use rusqlite::{Connection, OptionalExtension, Row};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    category::{Category, CategoryColor, CategoryId, CategoryName, CategoryUpdate, NewCategory},
};

/// Create a category and return it with its generated ID and timestamps.
pub fn create_category(category: NewCategory, connection: &Connection) -> Result<Category, Error> {
    let now = now_utc_seconds();

    connection.execute(
        "INSERT INTO category (name, color, created_at, updated_at) VALUES (?1, ?2, ?3, ?4);",
        (
            category.name.as_ref(),
            category.color.as_ref(),
            now,
            now,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        name: category.name,
        color: category.color,
        created_at: now,
        updated_at: now,
    })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, name, color, created_at, updated_at FROM category WHERE id = :id;",
        )?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, color, created_at, updated_at FROM category ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Change the name and/or color of a category.
///
/// Returns the updated category, or `None` if no category has the ID
/// `category_id`. A missing category is not an error.
pub fn update_category(
    category_id: CategoryId,
    update: CategoryUpdate,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    let rows_affected = connection.execute(
        "UPDATE category
            SET name = COALESCE(?1, name), color = COALESCE(?2, color), updated_at = ?3
            WHERE id = ?4",
        (
            update.name.as_ref().map(CategoryName::as_ref),
            update.color.as_ref().map(CategoryColor::as_ref),
            now_utc_seconds(),
            category_id,
        ),
    )?;

    if rows_affected == 0 {
        return Ok(None);
    }

    connection
        .prepare(
            "SELECT id, name, color, created_at, updated_at FROM category WHERE id = :id;",
        )?
        .query_row(&[(":id", &category_id)], map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Delete a category by ID.
///
/// Expenses that refer to the category are left untouched. Returns whether
/// a category was deleted, deleting a missing category is not an error.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<bool, Error> {
    let rows_affected = connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    Ok(rows_affected > 0)
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_category_name ON category(name);",
    )?;

    Ok(())
}

/// The current time truncated to whole seconds so that it survives a round
/// trip through the database unchanged.
fn now_utc_seconds() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();

    now - Duration::nanoseconds(now.nanosecond().into())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let raw_color: String = row.get(2)?;

    Ok(Category {
        id,
        name: CategoryName::new_unchecked(&raw_name),
        color: CategoryColor::new_unchecked(&raw_color),
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        category::{
            CategoryColor, CategoryName, CategoryUpdate, NewCategory, create_category,
            delete_category, get_all_categories, get_category, update_category,
        },
    };

    use super::create_category_table;

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_category_table(&connection).expect("Could not create category table");
        connection
    }

    fn new_category(name: &str, color: &str) -> NewCategory {
        NewCategory {
            name: CategoryName::new_unchecked(name),
            color: CategoryColor::new_unchecked(color),
        }
    }

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_db_connection();

        let category = create_category(new_category("Food", "#EF4444"), &connection)
            .expect("Could not create category");

        assert!(category.id > 0);
        assert_eq!(category.name.as_ref(), "Food");
        assert_eq!(category.color.as_ref(), "#EF4444");
        assert_eq!(category.created_at, category.updated_at);
    }

    #[test]
    fn get_category_round_trips() {
        let connection = get_test_db_connection();
        let inserted = create_category(new_category("Food", "#EF4444"), &connection)
            .expect("Could not create test category");

        let selected = get_category(inserted.id, &connection);

        assert_eq!(Ok(inserted), selected);
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();
        let inserted = create_category(new_category("Food", "#EF4444"), &connection)
            .expect("Could not create test category");

        let selected = get_category(inserted.id + 123, &connection);

        assert_eq!(selected, Err(Error::NotFound));
    }

    #[test]
    fn get_all_categories_sorts_by_name() {
        let connection = get_test_db_connection();
        for name in ["Transport", "Bills", "Food"] {
            create_category(new_category(name, "#fff"), &connection)
                .expect("Could not create test category");
        }

        let names: Vec<String> = get_all_categories(&connection)
            .expect("Could not get all categories")
            .into_iter()
            .map(|category| category.name.to_string())
            .collect();

        assert_eq!(names, ["Bills", "Food", "Transport"]);
    }

    #[test]
    fn update_category_changes_only_given_fields() {
        let connection = get_test_db_connection();
        let category = create_category(new_category("Food", "#EF4444"), &connection)
            .expect("Could not create test category");

        let update = CategoryUpdate {
            name: Some(CategoryName::new_unchecked("Groceries")),
            color: None,
        };
        let updated = update_category(category.id, update, &connection)
            .expect("Could not update category")
            .expect("Category should exist");

        assert_eq!(updated.id, category.id);
        assert_eq!(updated.name.as_ref(), "Groceries");
        assert_eq!(updated.color.as_ref(), "#EF4444");
        assert_eq!(updated.created_at, category.created_at);
        assert_eq!(Ok(updated), get_category(category.id, &connection));
    }

    #[test]
    fn update_missing_category_returns_none() {
        let connection = get_test_db_connection();

        let result = update_category(999999, CategoryUpdate::default(), &connection);

        assert_eq!(result, Ok(None));
    }

    #[test]
    fn delete_category_succeeds() {
        let connection = get_test_db_connection();
        let category = create_category(new_category("Food", "#EF4444"), &connection)
            .expect("Could not create test category");

        let result = delete_category(category.id, &connection);

        assert_eq!(result, Ok(true));
        assert_eq!(get_category(category.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_category_is_not_an_error() {
        let connection = get_test_db_connection();

        let result = delete_category(999999, &connection);

        assert_eq!(result, Ok(false));
    }
}
