//! Database operations for expenses.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error,
    expense::{Expense, ExpenseId, ExpenseUpdate, NewExpense},
};

/// Create an expense and return it with its generated ID.
///
/// The category ID is stored as is, it does not have to refer to an existing category.
pub fn create_expense(expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "INSERT INTO expense (amount, description, date, category_id)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, amount, description, date, category_id",
        )?
        .query_row(
            (
                expense.amount,
                expense.description,
                expense.date,
                expense.category_id,
            ),
            map_row,
        )?;

    Ok(expense)
}

/// Retrieve an expense by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "SELECT id, amount, description, date, category_id FROM expense WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_row)?;

    Ok(expense)
}

/// Retrieve the expenses dated between `from` and `to`, both inclusive, in
/// the order they were created.
///
/// A missing bound leaves that side of the range open.
pub fn get_expenses(
    from: Option<Date>,
    to: Option<Date>,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, amount, description, date, category_id FROM expense
             WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
             ORDER BY id ASC",
        )?
        .query_map((from, to), map_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Merge `update` into the expense with the ID `id` and return the result.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingExpense] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_expense(
    id: ExpenseId,
    update: ExpenseUpdate,
    connection: &Connection,
) -> Result<Expense, Error> {
    let (set_category, category_id) = match update.category_id {
        Some(category_id) => (true, category_id),
        None => (false, None),
    };

    let mut statement = connection.prepare(
        "UPDATE expense
            SET amount = COALESCE(?1, amount),
                description = COALESCE(?2, description),
                date = COALESCE(?3, date),
                category_id = CASE WHEN ?4 THEN ?5 ELSE category_id END
            WHERE id = ?6
            RETURNING id, amount, description, date, category_id",
    )?;

    let mut rows = statement.query_map(
        (
            update.amount,
            update.description,
            update.date,
            set_category,
            category_id,
            id,
        ),
        map_row,
    )?;

    match rows.next() {
        Some(expense) => Ok(expense?),
        None => Err(Error::UpdateMissingExpense),
    }
}

/// Delete the expense with the ID `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingExpense] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        Err(Error::DeleteMissingExpense)
    } else {
        Ok(())
    }
}

/// Create the expense table in the database.
///
/// `category_id` deliberately has no foreign key, deleting a category leaves
/// its expenses pointing at a category that no longer exists.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            amount REAL NOT NULL,
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            category_id INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        amount: row.get(1)?,
        description: row.get(2)?,
        date: row.get(3)?,
        category_id: row.get(4)?,
    })
}
