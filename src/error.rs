//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that can abort a receipt computation or a payroll run.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Broad classification of a [`PayrollError`].
///
/// Every kind is fatal to the enclosing payroll run. The kind only tells the
/// caller who has to fix the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Deployment or data-setup defect (unsupported pay period, missing tariff table).
    Configuration,
    /// A fiscal table exists but does not cover the requested value or year.
    DataNotFound,
    /// Malformed reference data or an illegal request.
    Validation,
    /// The underlying store failed.
    Persistence,
}

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use nomina_engine::error::{ErrorKind, PayrollError};
///
/// let error = PayrollError::UnsupportedPayPeriod { days: 30 };
/// assert_eq!(error.to_string(), "No ISR tariff is defined for a 30-day pay period");
/// assert_eq!(error.kind(), ErrorKind::Configuration);
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The pay-period length has no ISR tariff frequency.
    #[error("No ISR tariff is defined for a {days}-day pay period")]
    UnsupportedPayPeriod {
        /// The offending period length in days.
        days: u32,
    },

    /// The fiscal year has no bracket rows for a supported frequency.
    #[error("No {frequency} ISR bracket table loaded for fiscal year {fiscal_year}")]
    BracketTableMissing {
        /// The fiscal year requested.
        fiscal_year: i32,
        /// The frequency name (e.g. "weekly").
        frequency: String,
    },

    /// The bracket table exists but no row covers the amount.
    #[error("No {frequency} ISR bracket covers {amount} in fiscal year {fiscal_year}")]
    BracketNotFound {
        /// The fiscal year requested.
        fiscal_year: i32,
        /// The frequency name (e.g. "biweekly").
        frequency: String,
        /// The taxable amount that fell into a gap.
        amount: Decimal,
    },

    /// No active UMA reference exists for the fiscal year.
    #[error("UMA reference not found for fiscal year {fiscal_year}")]
    UmaNotFound {
        /// The fiscal year requested.
        fiscal_year: i32,
    },

    /// An employee record contained invalid data.
    #[error("Invalid employee '{employee_id}' field '{field}': {message}")]
    InvalidEmployee {
        /// The employee identifier.
        employee_id: String,
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A fiscal reference row contained invalid data.
    #[error("Invalid reference data in {table}: {message}")]
    InvalidReferenceData {
        /// The reference table (e.g. "isr_brackets").
        table: String,
        /// A description of the defect.
        message: String,
    },

    /// A payroll run could not be created.
    #[error("Invalid payroll run: {message}")]
    InvalidRun {
        /// A description of the defect.
        message: String,
    },

    /// The payroll run does not exist.
    #[error("Payroll run not found: {run_id}")]
    RunNotFound {
        /// The run identifier.
        run_id: Uuid,
    },

    /// Receipts were already generated for the run.
    #[error("Payroll run {run_id} already has receipts")]
    RunAlreadyPopulated {
        /// The run identifier.
        run_id: Uuid,
    },

    /// A receipt for the same run and employee already exists.
    #[error("Duplicate receipt for employee '{employee_id}' in run {run_id}")]
    DuplicateReceipt {
        /// The run identifier.
        run_id: Uuid,
        /// The employee identifier.
        employee_id: String,
    },

    /// The SQLite store reported an error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An audit trace could not be encoded for storage.
    #[error("Failed to encode audit trace: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PayrollError {
    /// Returns the broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PayrollError::ConfigNotFound { .. }
            | PayrollError::ConfigParseError { .. }
            | PayrollError::UnsupportedPayPeriod { .. }
            | PayrollError::BracketTableMissing { .. } => ErrorKind::Configuration,
            PayrollError::BracketNotFound { .. }
            | PayrollError::UmaNotFound { .. }
            | PayrollError::RunNotFound { .. } => ErrorKind::DataNotFound,
            PayrollError::InvalidEmployee { .. }
            | PayrollError::InvalidReferenceData { .. }
            | PayrollError::InvalidRun { .. }
            | PayrollError::RunAlreadyPopulated { .. }
            | PayrollError::DuplicateReceipt { .. } => ErrorKind::Validation,
            PayrollError::Database(_) | PayrollError::Serialization(_) => ErrorKind::Persistence,
        }
    }
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;
