//! Payroll run model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a payroll run.
///
/// A run moves from `Created` to `Populated` exactly once, when its receipts
/// are generated. There is no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The run exists but has no receipts yet.
    Created,
    /// Receipts were generated for the run.
    Populated,
}

impl RunStatus {
    /// Returns the value stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Created => "created",
            RunStatus::Populated => "populated",
        }
    }

    /// Parses the stored value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "created" => Some(RunStatus::Created),
            "populated" => Some(RunStatus::Populated),
            _ => None,
        }
    }
}

/// A payroll run scoped to one position and department.
///
/// # Example
///
/// ```
/// use nomina_engine::models::{PayrollRun, RunStatus};
/// use chrono::NaiveDate;
///
/// let run = PayrollRun::new(
///     "pos_ops",
///     "dep_ops",
///     NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
/// );
/// assert_eq!(run.status, RunStatus::Created);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique identifier for the run.
    pub id: Uuid,
    /// The position whose employees are paid.
    pub position_id: String,
    /// The department whose employees are paid.
    pub department_id: String,
    /// The payroll (period) date.
    pub payroll_date: NaiveDate,
    /// The date the payment is made.
    pub payment_date: NaiveDate,
    /// Current lifecycle status.
    pub status: RunStatus,
    /// When the run was created.
    pub created_at: DateTime<Utc>,
}

impl PayrollRun {
    /// Creates a new run in the `Created` state.
    pub fn new(
        position_id: impl Into<String>,
        department_id: impl Into<String>,
        payroll_date: NaiveDate,
        payment_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            position_id: position_id.into(),
            department_id: department_id.into(),
            payroll_date,
            payment_date,
            status: RunStatus::Created,
            created_at: Utc::now(),
        }
    }
}
