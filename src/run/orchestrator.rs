//! The payroll run orchestrator.
//!
//! A run is created first and populated later. Population loads the fiscal
//! tables and the run's employees, computes every receipt and stores them
//! inside a single write-locked transaction. Any error drops the
//! transaction, which rolls back every write of the run.

use chrono::{Datelike, NaiveDate, Utc};
use rusqlite::TransactionBehavior;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::FiscalConstants;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{PayrollRun, Receipt, RunStatus};
use crate::store::{
    PayrollDb, department_is_active, get_run, get_uma, insert_receipts, insert_run,
    list_active_employees, load_isr_tariff, mark_run_populated, position_is_active,
};

use super::pipeline::{FiscalContext, ReceiptOutcome, compute_receipt};

/// Column totals across the receipts of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    /// Sum of taxable wages.
    pub taxable_wages: Decimal,
    /// Sum of ISR withheld.
    pub isr_withheld: Decimal,
    /// Sum of subsidy delivered.
    pub subsidy_delivered: Decimal,
    /// Sum of IMSS worker contributions.
    pub social_security_withheld: Decimal,
    /// Sum of net pay.
    pub net_pay: Decimal,
}

impl RunTotals {
    fn from_receipts(receipts: &[Receipt]) -> Self {
        receipts.iter().fold(Self::default(), |acc, r| Self {
            taxable_wages: acc.taxable_wages + r.taxable_wages,
            isr_withheld: acc.isr_withheld + r.isr_withheld,
            subsidy_delivered: acc.subsidy_delivered + r.subsidy_delivered,
            social_security_withheld: acc.social_security_withheld + r.social_security_withheld,
            net_pay: acc.net_pay + r.net_pay,
        })
    }
}

/// The outcome of populating a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// The populated run.
    pub run_id: Uuid,
    /// The fiscal year whose tables were applied.
    pub fiscal_year: i32,
    /// The stored receipts, ordered by employee id.
    pub receipts: Vec<Receipt>,
    /// Employees left out for a zero wage or a missing pay period.
    pub skipped_employee_ids: Vec<String>,
    /// Column totals across `receipts`.
    pub totals: RunTotals,
}

/// Creates payroll runs and generates their receipts.
///
/// # Example
///
/// ```
/// use nomina_engine::config::FiscalConstants;
/// use nomina_engine::run::PayrollEngine;
/// use nomina_engine::store::PayrollDb;
/// use chrono::NaiveDate;
///
/// let db = PayrollDb::open_in_memory().unwrap();
/// let mut engine = PayrollEngine::new(db, FiscalConstants::default());
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
/// // unknown position and department
/// assert!(engine.create_run("pos_ops", "dep_ops", date, date).is_err());
/// ```
#[derive(Debug)]
pub struct PayrollEngine {
    db: PayrollDb,
    constants: FiscalConstants,
}

impl PayrollEngine {
    /// Creates an engine over a database with the given statutory constants.
    pub fn new(db: PayrollDb, constants: FiscalConstants) -> Self {
        Self { db, constants }
    }

    /// Returns the database.
    pub fn db(&self) -> &PayrollDb {
        &self.db
    }

    /// Returns the statutory constants.
    pub fn constants(&self) -> &FiscalConstants {
        &self.constants
    }

    /// Creates a payroll run in the `created` state.
    ///
    /// # Errors
    ///
    /// `InvalidRun` when the position or department does not exist or is
    /// inactive.
    pub fn create_run(
        &mut self,
        position_id: &str,
        department_id: &str,
        payroll_date: NaiveDate,
        payment_date: NaiveDate,
    ) -> PayrollResult<PayrollRun> {
        let tx = self.db.conn_mut().transaction()?;

        if !position_is_active(&tx, position_id)? {
            return Err(PayrollError::InvalidRun {
                message: format!("position '{}' does not exist or is inactive", position_id),
            });
        }
        if !department_is_active(&tx, department_id)? {
            return Err(PayrollError::InvalidRun {
                message: format!("department '{}' does not exist or is inactive", department_id),
            });
        }

        let run = PayrollRun::new(position_id, department_id, payroll_date, payment_date);
        insert_run(&tx, &run)?;
        tx.commit()?;

        info!(
            run_id = %run.id,
            position_id = %run.position_id,
            department_id = %run.department_id,
            "Created payroll run"
        );
        Ok(run)
    }

    /// Generates the receipts of a run using the current calendar year's tables.
    pub fn generate_receipts(&mut self, run_id: Uuid) -> PayrollResult<RunSummary> {
        self.generate_receipts_for_year(run_id, Utc::now().year())
    }

    /// Generates the receipts of a run using a given fiscal year's tables.
    ///
    /// Either every receipt is stored and the run becomes `populated`, or
    /// nothing is written at all.
    ///
    /// # Errors
    ///
    /// - `RunNotFound` / `RunAlreadyPopulated` for a missing or finished run
    /// - `UmaNotFound` when the year has no UMA reference
    /// - any pipeline error for any employee
    pub fn generate_receipts_for_year(
        &mut self,
        run_id: Uuid,
        fiscal_year: i32,
    ) -> PayrollResult<RunSummary> {
        info!(run_id = %run_id, fiscal_year, "Generating receipts");

        let result = self.populate(run_id, fiscal_year);
        match &result {
            Ok(summary) => info!(
                run_id = %run_id,
                fiscal_year,
                receipts = summary.receipts.len(),
                skipped = summary.skipped_employee_ids.len(),
                net_pay = %summary.totals.net_pay,
                "Payroll run populated"
            ),
            Err(err) => warn!(
                run_id = %run_id,
                fiscal_year,
                error = %err,
                "Payroll run aborted, nothing was written"
            ),
        }
        result
    }

    fn populate(&mut self, run_id: Uuid, fiscal_year: i32) -> PayrollResult<RunSummary> {
        let constants = self.constants;
        let tx = self
            .db
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let run = get_run(&tx, run_id)?;
        if run.status == RunStatus::Populated {
            return Err(PayrollError::RunAlreadyPopulated { run_id });
        }

        let ctx = FiscalContext {
            fiscal_year,
            uma: get_uma(&tx, fiscal_year)?,
            tariff: load_isr_tariff(&tx, fiscal_year)?,
        };

        let employees = list_active_employees(&tx, &run.position_id, &run.department_id)?;

        let mut receipts = Vec::with_capacity(employees.len());
        let mut skipped_employee_ids = Vec::new();

        for employee in &employees {
            match compute_receipt(employee, run_id, &ctx, &constants)? {
                ReceiptOutcome::Computed(receipt) => receipts.push(*receipt),
                ReceiptOutcome::Skipped => {
                    warn!(
                        run_id = %run_id,
                        employee_id = %employee.id,
                        "Skipping employee with zero wage or no pay period"
                    );
                    skipped_employee_ids.push(employee.id.clone());
                }
            }
        }

        insert_receipts(&tx, &receipts)?;
        mark_run_populated(&tx, run_id)?;
        tx.commit()?;

        let totals = RunTotals::from_receipts(&receipts);
        Ok(RunSummary {
            run_id,
            fiscal_year,
            receipts,
            skipped_employee_ids,
            totals,
        })
    }
}
