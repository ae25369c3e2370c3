//! Database set up and tear down.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Transaction as SqlTransaction, functions::FunctionFlags};

use crate::{Error, transaction::create_transaction_table};

/// The name of the SQL function that lowercases text with Unicode case rules.
pub(crate) const FOLD_FUNCTION: &str = "fold";

/// Create all of the database tables for the application and register the
/// SQL functions the queries rely on.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    register_functions(connection)?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Register `fold(text)`, which lowercases text with Unicode case rules.
///
/// SQLite's own `lower` and `LIKE` only fold ASCII letters.
fn register_functions(connection: &Connection) -> Result<(), Error> {
    connection.create_scalar_function(
        FOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |context| {
            let text: Option<String> = context.get(0)?;
            Ok(text.map(|text| text.to_lowercase()))
        },
    )?;

    Ok(())
}

/// Close the shared database connection.
///
/// Call this after the server has shut down and every other handle to the
/// connection has been dropped.
///
/// # Errors
/// Returns [Error::StoreUnavailable] if the connection is still shared or the
/// lock is poisoned, or [Error::SqlError] if SQLite fails to close.
pub fn close(connection: Arc<Mutex<Connection>>) -> Result<(), Error> {
    let connection = Arc::try_unwrap(connection)
        .map_err(|_| {
            tracing::error!("could not close database: connection is still in use");
            Error::StoreUnavailable
        })?
        .into_inner()
        .map_err(|error| {
            tracing::error!("could not close database: {error}");
            Error::StoreUnavailable
        })?;

    connection.close().map_err(|(_, error)| error.into())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::Error;

    use super::{close, initialize};

    #[test]
    fn initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).expect("first initialization failed");
        initialize(&conn).expect("second initialization failed");
    }

    #[test]
    fn fold_lowercases_unicode_text() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let folded: String = conn
            .query_row("SELECT fold('ÉCLAIR Café')", [], |row| row.get(0))
            .unwrap();

        assert_eq!(folded, "éclair café");
    }

    #[test]
    fn close_succeeds_with_single_owner() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        assert_eq!(close(Arc::new(Mutex::new(conn))), Ok(()));
    }

    #[test]
    fn close_fails_while_shared() {
        let conn = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let _other_handle = conn.clone();

        assert_eq!(close(conn), Err(Error::StoreUnavailable));
    }
}
