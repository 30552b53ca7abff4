//! Opening and initializing the application database.
//!
//! The database is the store behind the store handle held in
//! [AppState](crate::AppState). Each record type owns its table definition,
//! this module only creates them together.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, category::create_category_table, expense::create_expense_table};

/// Open the database named by `database_url`.
///
/// `database_url` is a path to a SQLite database file, which is created if it
/// does not exist, or `:memory:` for a throwaway in-memory database.
///
/// # Errors
/// Returns an error if the database file cannot be opened.
pub fn open_store(database_url: &str) -> Result<Connection, Error> {
    let connection = if database_url == ":memory:" {
        Connection::open_in_memory()?
    } else {
        Connection::open(database_url)?
    };

    Ok(connection)
}

/// Lock the shared database connection for the duration of one store operation.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if another thread panicked while holding the lock.
pub(crate) fn lock_connection(
    db_connection: &Arc<Mutex<Connection>>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}

/// Create the tables for the domain models if they do not exist yet.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod db_tests {
    use crate::db::{initialize, open_store};

    #[test]
    fn initialize_is_idempotent() {
        let connection = open_store(":memory:").expect("Could not open in-memory database");

        initialize(&connection).expect("Could not initialize database");
        initialize(&connection).expect("Could not initialize database a second time");
    }
}
