//! SQLite schema for the payroll store.

use rusqlite::Connection;

use crate::error::PayrollResult;

/// Monetary columns are TEXT so decimals keep their exact scale.
const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS positions (
    id          TEXT PRIMARY KEY,
    description TEXT NOT NULL,
    active      INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS departments (
    id          TEXT PRIMARY KEY,
    description TEXT NOT NULL,
    active      INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS employees (
    id                    TEXT PRIMARY KEY,
    position_id           TEXT NOT NULL REFERENCES positions(id),
    department_id         TEXT NOT NULL REFERENCES departments(id),
    rfc                   TEXT NOT NULL DEFAULT '',
    full_name             TEXT NOT NULL DEFAULT '',
    daily_wage            TEXT NOT NULL,
    daily_integrated_wage TEXT NOT NULL,
    pay_period_days       INTEGER,
    active                INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_employees_scope
    ON employees(position_id, department_id, active);

CREATE TABLE IF NOT EXISTS uma_references (
    fiscal_year               INTEGER NOT NULL,
    daily_value               TEXT NOT NULL,
    monthly_conversion_factor TEXT NOT NULL,
    subsidy_percentage        TEXT NOT NULL,
    income_ceiling            TEXT NOT NULL,
    active                    INTEGER NOT NULL DEFAULT 1
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_uma_active_year
    ON uma_references(fiscal_year) WHERE active = 1;

CREATE TABLE IF NOT EXISTS isr_brackets (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    fiscal_year     INTEGER NOT NULL,
    pay_period_days INTEGER NOT NULL,
    lower_bound     TEXT NOT NULL,
    upper_bound     TEXT,
    fixed_quota     TEXT NOT NULL,
    marginal_rate   TEXT NOT NULL,
    active          INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_isr_brackets_year
    ON isr_brackets(fiscal_year, pay_period_days, active);

CREATE TABLE IF NOT EXISTS payroll_runs (
    id            TEXT PRIMARY KEY,
    position_id   TEXT NOT NULL REFERENCES positions(id),
    department_id TEXT NOT NULL REFERENCES departments(id),
    payroll_date  TEXT NOT NULL,
    payment_date  TEXT NOT NULL,
    status        TEXT NOT NULL CHECK(status IN ('created','populated')),
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS receipts (
    id                       INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id                   TEXT NOT NULL REFERENCES payroll_runs(id),
    employee_id              TEXT NOT NULL REFERENCES employees(id),
    pay_period_days          INTEGER NOT NULL,
    daily_wage               TEXT NOT NULL,
    daily_integrated_wage    TEXT NOT NULL,
    taxable_wages            TEXT NOT NULL,
    exempt_income            TEXT NOT NULL,
    isr_determined           TEXT NOT NULL,
    isr_withheld             TEXT NOT NULL,
    subsidy_caused           TEXT NOT NULL,
    subsidy_delivered        TEXT NOT NULL,
    social_security_withheld TEXT NOT NULL,
    net_pay                  TEXT NOT NULL,
    audit_trace              TEXT NOT NULL,
    UNIQUE(run_id, employee_id)
);
"#;

/// Creates every table and index if missing. Safe to call repeatedly.
pub fn init_schema(conn: &Connection) -> PayrollResult<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get::<_, String>(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect()
    }

    #[test]
    fn test_init_schema_creates_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let tables = table_names(&conn);
        for expected in [
            "departments",
            "employees",
            "isr_brackets",
            "payroll_runs",
            "positions",
            "receipts",
            "uma_references",
        ] {
            assert!(tables.iter().any(|t| t == expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
    }
}
