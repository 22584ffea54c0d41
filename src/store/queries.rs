//! Reads and writes against the payroll store.
//!
//! Every function takes a plain `&Connection`, so callers can pass either
//! the connection itself or an open `Transaction`.

use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::config::FiscalConfig;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    AuditTrace, Department, Employee, IsrBracket, IsrTariff, PayFrequency, PayrollRun, Position,
    Receipt, RunStatus, UmaReference,
};

/// Reads a TEXT column and parses it with `FromStr`.
fn parse_column<T>(row: &Row<'_>, name: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(name)?;
    raw.parse::<T>().map_err(|e| {
        let idx = row.as_ref().column_index(name).unwrap_or(0);
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
    })
}

fn conversion_failure(row: &Row<'_>, name: &str, message: String) -> rusqlite::Error {
    let idx = row.as_ref().column_index(name).unwrap_or(0);
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

// ---------------------------
// Reference data
// ---------------------------

/// Inserts a position.
pub fn insert_position(conn: &Connection, position: &Position) -> PayrollResult<()> {
    conn.execute(
        "INSERT INTO positions (id, description, active) VALUES (?1, ?2, ?3)",
        params![position.id, position.description, position.active],
    )?;
    Ok(())
}

/// Inserts a department.
pub fn insert_department(conn: &Connection, department: &Department) -> PayrollResult<()> {
    conn.execute(
        "INSERT INTO departments (id, description, active) VALUES (?1, ?2, ?3)",
        params![department.id, department.description, department.active],
    )?;
    Ok(())
}

/// Returns true if an active position with this id exists.
pub fn position_is_active(conn: &Connection, id: &str) -> PayrollResult<bool> {
    let active: Option<bool> = conn
        .query_row("SELECT active FROM positions WHERE id = ?1", [id], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(active.unwrap_or(false))
}

/// Returns true if an active department with this id exists.
pub fn department_is_active(conn: &Connection, id: &str) -> PayrollResult<bool> {
    let active: Option<bool> = conn
        .query_row("SELECT active FROM departments WHERE id = ?1", [id], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(active.unwrap_or(false))
}

/// Inserts an employee.
pub fn insert_employee(conn: &Connection, employee: &Employee) -> PayrollResult<()> {
    conn.execute(
        "INSERT INTO employees (id, position_id, department_id, rfc, full_name,
                                daily_wage, daily_integrated_wage, pay_period_days, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            employee.id,
            employee.position_id,
            employee.department_id,
            employee.rfc,
            employee.full_name,
            employee.daily_wage.to_string(),
            employee.daily_integrated_wage.to_string(),
            employee.pay_period_days,
            employee.active,
        ],
    )?;
    Ok(())
}

fn map_employee(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get("id")?,
        position_id: row.get("position_id")?,
        department_id: row.get("department_id")?,
        rfc: row.get("rfc")?,
        full_name: row.get("full_name")?,
        daily_wage: parse_column(row, "daily_wage")?,
        daily_integrated_wage: parse_column(row, "daily_integrated_wage")?,
        pay_period_days: row.get("pay_period_days")?,
        active: row.get("active")?,
    })
}

/// Lists the active employees of a position and department, ordered by id.
pub fn list_active_employees(
    conn: &Connection,
    position_id: &str,
    department_id: &str,
) -> PayrollResult<Vec<Employee>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM employees
         WHERE position_id = ?1 AND department_id = ?2 AND active = 1
         ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([position_id, department_id], map_employee)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Inserts a UMA reference after validating it.
pub fn insert_uma(conn: &Connection, uma: &UmaReference) -> PayrollResult<()> {
    uma.validate()?;
    conn.execute(
        "INSERT INTO uma_references (fiscal_year, daily_value, monthly_conversion_factor,
                                     subsidy_percentage, income_ceiling, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            uma.fiscal_year,
            uma.daily_value.to_string(),
            uma.monthly_conversion_factor.to_string(),
            uma.subsidy_percentage.to_string(),
            uma.income_ceiling.to_string(),
            uma.active,
        ],
    )?;
    Ok(())
}

/// Returns the active UMA reference for a fiscal year.
///
/// # Errors
///
/// `UmaNotFound` when the year has no active row.
pub fn get_uma(conn: &Connection, fiscal_year: i32) -> PayrollResult<UmaReference> {
    let uma = conn
        .query_row(
            "SELECT * FROM uma_references WHERE fiscal_year = ?1 AND active = 1",
            [fiscal_year],
            |row| {
                Ok(UmaReference {
                    fiscal_year: row.get("fiscal_year")?,
                    daily_value: parse_column(row, "daily_value")?,
                    monthly_conversion_factor: parse_column(row, "monthly_conversion_factor")?,
                    subsidy_percentage: parse_column(row, "subsidy_percentage")?,
                    income_ceiling: parse_column(row, "income_ceiling")?,
                    active: row.get("active")?,
                })
            },
        )
        .optional()?;

    uma.ok_or(PayrollError::UmaNotFound { fiscal_year })
}

/// Inserts one active ISR bracket row.
pub fn insert_isr_bracket(conn: &Connection, bracket: &IsrBracket) -> PayrollResult<()> {
    conn.execute(
        "INSERT INTO isr_brackets (fiscal_year, pay_period_days, lower_bound, upper_bound,
                                   fixed_quota, marginal_rate, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)",
        params![
            bracket.fiscal_year,
            bracket.frequency.period_days(),
            bracket.lower_bound.to_string(),
            bracket.upper_bound.map(|u| u.to_string()),
            bracket.fixed_quota.to_string(),
            bracket.marginal_rate.to_string(),
        ],
    )?;
    Ok(())
}

fn map_bracket(row: &Row<'_>) -> rusqlite::Result<IsrBracket> {
    let days: u32 = row.get("pay_period_days")?;
    let frequency = PayFrequency::from_period_days(days)
        .map_err(|e| conversion_failure(row, "pay_period_days", e.to_string()))?;

    let upper: Option<String> = row.get("upper_bound")?;
    let upper_bound = upper
        .map(|u| Decimal::from_str(&u))
        .transpose()
        .map_err(|e| conversion_failure(row, "upper_bound", e.to_string()))?;

    Ok(IsrBracket {
        fiscal_year: row.get("fiscal_year")?,
        frequency,
        lower_bound: parse_column(row, "lower_bound")?,
        upper_bound,
        fixed_quota: parse_column(row, "fixed_quota")?,
        marginal_rate: parse_column(row, "marginal_rate")?,
    })
}

/// Loads the active weekly and biweekly ISR rows of a fiscal year.
///
/// Rows for other period lengths are never read. A year without rows yields
/// an empty tariff; the bracket resolver reports the missing table.
pub fn load_isr_tariff(conn: &Connection, fiscal_year: i32) -> PayrollResult<IsrTariff> {
    let mut stmt = conn.prepare(
        "SELECT * FROM isr_brackets
         WHERE fiscal_year = ?1 AND active = 1 AND pay_period_days IN (7, 15)
         ORDER BY pay_period_days ASC, CAST(lower_bound AS REAL) ASC",
    )?;

    let rows = stmt.query_map([fiscal_year], map_bracket)?;

    let mut brackets = Vec::new();
    for r in rows {
        brackets.push(r?);
    }
    Ok(IsrTariff::new(fiscal_year, brackets))
}

/// Seeds the UMA and ISR tables from a loaded fiscal configuration.
pub fn import_fiscal_config(conn: &Connection, config: &FiscalConfig) -> PayrollResult<()> {
    for uma in config.uma_references() {
        insert_uma(conn, uma)?;
    }
    for tariff in config.tariffs() {
        for bracket in tariff.brackets() {
            insert_isr_bracket(conn, bracket)?;
        }
        debug!(fiscal_year = tariff.fiscal_year(), "Imported ISR tariff");
    }
    Ok(())
}

// ---------------------------
// Payroll runs
// ---------------------------

/// Inserts a payroll run header.
pub fn insert_run(conn: &Connection, run: &PayrollRun) -> PayrollResult<()> {
    conn.execute(
        "INSERT INTO payroll_runs (id, position_id, department_id, payroll_date,
                                   payment_date, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            run.id.to_string(),
            run.position_id,
            run.department_id,
            run.payroll_date.format("%Y-%m-%d").to_string(),
            run.payment_date.format("%Y-%m-%d").to_string(),
            run.status.as_str(),
            run.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn map_run(row: &Row<'_>) -> rusqlite::Result<PayrollRun> {
    let status_str: String = row.get("status")?;
    let status = RunStatus::parse(&status_str)
        .ok_or_else(|| conversion_failure(row, "status", format!("Invalid run status: {}", status_str)))?;

    Ok(PayrollRun {
        id: parse_column(row, "id")?,
        position_id: row.get("position_id")?,
        department_id: row.get("department_id")?,
        payroll_date: parse_column(row, "payroll_date")?,
        payment_date: parse_column(row, "payment_date")?,
        status,
        created_at: parse_column(row, "created_at")?,
    })
}

/// Returns a payroll run.
///
/// # Errors
///
/// `RunNotFound` when no run has this id.
pub fn get_run(conn: &Connection, run_id: Uuid) -> PayrollResult<PayrollRun> {
    let run = conn
        .query_row(
            "SELECT * FROM payroll_runs WHERE id = ?1",
            [run_id.to_string()],
            map_run,
        )
        .optional()?;

    run.ok_or(PayrollError::RunNotFound { run_id })
}

/// Moves a run to `populated`. Only a `created` run can move.
pub fn mark_run_populated(conn: &Connection, run_id: Uuid) -> PayrollResult<()> {
    let updated = conn.execute(
        "UPDATE payroll_runs SET status = ?1 WHERE id = ?2 AND status = ?3",
        params![
            RunStatus::Populated.as_str(),
            run_id.to_string(),
            RunStatus::Created.as_str(),
        ],
    )?;

    if updated == 0 {
        return Err(PayrollError::RunAlreadyPopulated { run_id });
    }
    Ok(())
}

// ---------------------------
// Receipts
// ---------------------------

/// Inserts all receipts of a run with one prepared statement.
///
/// # Errors
///
/// `DuplicateReceipt` when a receipt for the same run and employee exists.
pub fn insert_receipts(conn: &Connection, receipts: &[Receipt]) -> PayrollResult<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO receipts (run_id, employee_id, pay_period_days, daily_wage,
                               daily_integrated_wage, taxable_wages, exempt_income,
                               isr_determined, isr_withheld, subsidy_caused,
                               subsidy_delivered, social_security_withheld, net_pay,
                               audit_trace)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
    )?;

    for receipt in receipts {
        let audit_trace = serde_json::to_string(&receipt.audit_trace)?;
        let result = stmt.execute(params![
            receipt.run_id.to_string(),
            receipt.employee_id,
            receipt.pay_period_days,
            receipt.daily_wage.to_string(),
            receipt.daily_integrated_wage.to_string(),
            receipt.taxable_wages.to_string(),
            receipt.exempt_income.to_string(),
            receipt.isr_determined.to_string(),
            receipt.isr_withheld.to_string(),
            receipt.subsidy_caused.to_string(),
            receipt.subsidy_delivered.to_string(),
            receipt.social_security_withheld.to_string(),
            receipt.net_pay.to_string(),
            audit_trace,
        ]);

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(PayrollError::DuplicateReceipt {
                    run_id: receipt.run_id,
                    employee_id: receipt.employee_id.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(receipts.len())
}

// Foreign key failures share the constraint code; only UNIQUE maps to a duplicate.
fn is_unique_violation(error: &rusqlite::Error) -> bool {
    error.sqlite_error_code() == Some(ErrorCode::ConstraintViolation)
        && matches!(
            error,
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )
}

fn map_receipt(row: &Row<'_>) -> rusqlite::Result<Receipt> {
    let trace_json: String = row.get("audit_trace")?;
    let audit_trace: AuditTrace = serde_json::from_str(&trace_json).map_err(|e| {
        let idx = row.as_ref().column_index("audit_trace").unwrap_or(0);
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
    })?;

    Ok(Receipt {
        run_id: parse_column(row, "run_id")?,
        employee_id: row.get("employee_id")?,
        pay_period_days: row.get("pay_period_days")?,
        daily_wage: parse_column(row, "daily_wage")?,
        daily_integrated_wage: parse_column(row, "daily_integrated_wage")?,
        taxable_wages: parse_column(row, "taxable_wages")?,
        exempt_income: parse_column(row, "exempt_income")?,
        isr_determined: parse_column(row, "isr_determined")?,
        isr_withheld: parse_column(row, "isr_withheld")?,
        subsidy_caused: parse_column(row, "subsidy_caused")?,
        subsidy_delivered: parse_column(row, "subsidy_delivered")?,
        social_security_withheld: parse_column(row, "social_security_withheld")?,
        net_pay: parse_column(row, "net_pay")?,
        audit_trace,
    })
}

/// Lists the receipts of a run, ordered by employee id.
pub fn list_receipts(conn: &Connection, run_id: Uuid) -> PayrollResult<Vec<Receipt>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM receipts WHERE run_id = ?1 ORDER BY employee_id ASC",
    )?;

    let rows = stmt.query_map([run_id.to_string()], map_receipt)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Counts the receipts of a run.
pub fn count_receipts(conn: &Connection, run_id: Uuid) -> PayrollResult<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM receipts WHERE run_id = ?1",
        [run_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FiscalConstants;
    use crate::store::init_schema;
    use chrono::NaiveDate;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        insert_position(
            &conn,
            &Position {
                id: "pos_ops".to_string(),
                description: "Operations".to_string(),
                active: true,
            },
        )
        .unwrap();
        insert_department(
            &conn,
            &Department {
                id: "dep_ops".to_string(),
                description: "Operations".to_string(),
                active: true,
            },
        )
        .unwrap();
        conn
    }

    fn uma_2025() -> UmaReference {
        UmaReference {
            fiscal_year: 2025,
            daily_value: dec("113.14"),
            monthly_conversion_factor: dec("30.4"),
            subsidy_percentage: dec("13.8"),
            income_ceiling: dec("10171.00"),
            active: true,
        }
    }

    fn test_run() -> PayrollRun {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        PayrollRun::new("pos_ops", "dep_ops", date, date)
    }

    fn test_receipt(run_id: Uuid, employee_id: &str) -> Receipt {
        Receipt {
            run_id,
            employee_id: employee_id.to_string(),
            pay_period_days: 15,
            daily_wage: dec("300.00"),
            daily_integrated_wage: dec("314.79"),
            taxable_wages: dec("4500.00"),
            exempt_income: dec("0.00"),
            isr_determined: dec("333.12"),
            isr_withheld: dec("140.63"),
            subsidy_caused: dec("192.49"),
            subsidy_delivered: dec("0.00"),
            social_security_withheld: dec("112.14"),
            net_pay: dec("4247.23"),
            audit_trace: AuditTrace::default(),
        }
    }

    #[test]
    fn test_employee_round_trip_keeps_decimal_scale() {
        let conn = create_test_db();
        let employee = Employee::new(
            "emp_001",
            "pos_ops",
            "dep_ops",
            dec("300.00"),
            Some(15),
            &FiscalConstants::default(),
        );
        insert_employee(&conn, &employee).unwrap();

        let loaded = list_active_employees(&conn, "pos_ops", "dep_ops").unwrap();
        assert_eq!(loaded, vec![employee]);
        assert_eq!(loaded[0].daily_wage.to_string(), "300.00");
    }

    #[test]
    fn test_list_active_employees_filters_scope_and_status() {
        let conn = create_test_db();
        let constants = FiscalConstants::default();

        let mut inactive = Employee::new("emp_002", "pos_ops", "dep_ops", dec("250.00"), Some(7), &constants);
        inactive.active = false;
        insert_employee(&conn, &inactive).unwrap();
        insert_employee(
            &conn,
            &Employee::new("emp_001", "pos_ops", "dep_ops", dec("300.00"), None, &constants),
        )
        .unwrap();

        let loaded = list_active_employees(&conn, "pos_ops", "dep_ops").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "emp_001");
        assert_eq!(loaded[0].pay_period_days, None);

        assert!(list_active_employees(&conn, "pos_other", "dep_ops").unwrap().is_empty());
    }

    #[test]
    fn test_get_uma_reads_active_row() {
        let conn = create_test_db();
        insert_uma(&conn, &uma_2025()).unwrap();

        assert_eq!(get_uma(&conn, 2025).unwrap(), uma_2025());
    }

    #[test]
    fn test_get_uma_missing_year() {
        let conn = create_test_db();
        match get_uma(&conn, 2031) {
            Err(PayrollError::UmaNotFound { fiscal_year }) => assert_eq!(fiscal_year, 2031),
            other => panic!("Expected UmaNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_inactive_uma_is_not_found() {
        let conn = create_test_db();
        let mut uma = uma_2025();
        uma.active = false;
        insert_uma(&conn, &uma).unwrap();

        assert!(matches!(get_uma(&conn, 2025), Err(PayrollError::UmaNotFound { .. })));
    }

    #[test]
    fn test_invalid_uma_is_rejected() {
        let conn = create_test_db();
        let mut uma = uma_2025();
        uma.daily_value = Decimal::ZERO;

        assert!(matches!(
            insert_uma(&conn, &uma),
            Err(PayrollError::InvalidReferenceData { .. })
        ));
    }

    #[test]
    fn test_load_isr_tariff_orders_numerically() {
        let conn = create_test_db();
        for (lower, upper) in [("1458.04", Some("2562.35")), ("171.79", Some("1458.03")), ("0.01", Some("171.78"))] {
            insert_isr_bracket(
                &conn,
                &IsrBracket {
                    fiscal_year: 2025,
                    frequency: PayFrequency::Weekly,
                    lower_bound: dec(lower),
                    upper_bound: upper.map(dec),
                    fixed_quota: dec("0.00"),
                    marginal_rate: dec("1.92"),
                },
            )
            .unwrap();
        }

        let tariff = load_isr_tariff(&conn, 2025).unwrap();
        let lowers: Vec<_> = tariff
            .table(PayFrequency::Weekly)
            .iter()
            .map(|b| b.lower_bound.to_string())
            .collect();
        assert_eq!(lowers, vec!["0.01", "171.79", "1458.04"]);
        assert!(tariff.table(PayFrequency::Biweekly).is_empty());
    }

    #[test]
    fn test_load_isr_tariff_skips_other_periods() {
        let conn = create_test_db();
        conn.execute(
            "INSERT INTO isr_brackets (fiscal_year, pay_period_days, lower_bound, upper_bound,
                                       fixed_quota, marginal_rate)
             VALUES (2025, 30, '0.01', NULL, '0.00', '1.92')",
            [],
        )
        .unwrap();

        let tariff = load_isr_tariff(&conn, 2025).unwrap();
        assert_eq!(tariff.brackets().count(), 0);
    }

    #[test]
    fn test_run_round_trip_and_status_transition() {
        let conn = create_test_db();
        let run = test_run();
        insert_run(&conn, &run).unwrap();

        let loaded = get_run(&conn, run.id).unwrap();
        assert_eq!(loaded.id, run.id);
        assert_eq!(loaded.payroll_date, run.payroll_date);
        assert_eq!(loaded.status, RunStatus::Created);

        mark_run_populated(&conn, run.id).unwrap();
        assert_eq!(get_run(&conn, run.id).unwrap().status, RunStatus::Populated);

        assert!(matches!(
            mark_run_populated(&conn, run.id),
            Err(PayrollError::RunAlreadyPopulated { .. })
        ));
    }

    #[test]
    fn test_get_run_unknown_id() {
        let conn = create_test_db();
        let run_id = Uuid::new_v4();
        match get_run(&conn, run_id) {
            Err(PayrollError::RunNotFound { run_id: missing }) => assert_eq!(missing, run_id),
            other => panic!("Expected RunNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_receipts_round_trip() {
        let conn = create_test_db();
        let constants = FiscalConstants::default();
        insert_employee(
            &conn,
            &Employee::new("emp_001", "pos_ops", "dep_ops", dec("300.00"), Some(15), &constants),
        )
        .unwrap();
        let run = test_run();
        insert_run(&conn, &run).unwrap();

        let receipt = test_receipt(run.id, "emp_001");
        assert_eq!(insert_receipts(&conn, &[receipt.clone()]).unwrap(), 1);

        let loaded = list_receipts(&conn, run.id).unwrap();
        assert_eq!(loaded, vec![receipt]);
        assert_eq!(loaded[0].net_pay.to_string(), "4247.23");
        assert_eq!(count_receipts(&conn, run.id).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_receipt_is_rejected() {
        let conn = create_test_db();
        let constants = FiscalConstants::default();
        insert_employee(
            &conn,
            &Employee::new("emp_001", "pos_ops", "dep_ops", dec("300.00"), Some(15), &constants),
        )
        .unwrap();
        let run = test_run();
        insert_run(&conn, &run).unwrap();

        let receipt = test_receipt(run.id, "emp_001");
        insert_receipts(&conn, &[receipt.clone()]).unwrap();

        match insert_receipts(&conn, &[receipt]) {
            Err(PayrollError::DuplicateReceipt { employee_id, .. }) => {
                assert_eq!(employee_id, "emp_001")
            }
            other => panic!("Expected DuplicateReceipt, got {:?}", other),
        }
    }

    #[test]
    fn test_scope_lookups() {
        let conn = create_test_db();
        assert!(position_is_active(&conn, "pos_ops").unwrap());
        assert!(department_is_active(&conn, "dep_ops").unwrap());
        assert!(!position_is_active(&conn, "pos_missing").unwrap());
    }
}
