//! SQLite persistence for reference data, payroll runs and receipts.
//!
//! [`PayrollDb`] owns the connection. The query functions in this module
//! take a `&Connection` so they run unchanged inside a transaction.
//!
//! # Example
//!
//! ```
//! use nomina_engine::store::{PayrollDb, get_uma};
//!
//! let db = PayrollDb::open_in_memory().unwrap();
//! assert!(get_uma(db.conn(), 2025).is_err());
//! ```

mod queries;
mod schema;

use std::path::Path;

use rusqlite::Connection;

use crate::error::PayrollResult;

pub use queries::{
    count_receipts, department_is_active, get_run, get_uma, import_fiscal_config,
    insert_department, insert_employee, insert_isr_bracket, insert_position, insert_receipts,
    insert_run, insert_uma, list_active_employees, list_receipts, load_isr_tariff,
    mark_run_populated, position_is_active,
};
pub use schema::init_schema;

/// A SQLite database holding the payroll tables.
#[derive(Debug)]
pub struct PayrollDb {
    conn: Connection,
}

impl PayrollDb {
    /// Opens (or creates) a database file and ensures the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Opens a private in-memory database with the schema applied.
    pub fn open_in_memory() -> PayrollResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Returns the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Returns the underlying connection mutably, for opening transactions.
    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
