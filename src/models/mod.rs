//! Core data models for the payroll engine.
//!
//! This module contains the master data consumed by the engine (employees,
//! positions, departments, fiscal tables) and the records it produces
//! (payroll runs and receipts).

mod employee;
mod fiscal;
mod payroll_run;
mod receipt;

pub use employee::{Department, Employee, Position};
pub use fiscal::{IsrBracket, IsrTariff, PayFrequency, SBC_CAP_UMA_MULTIPLE, UmaReference};
pub use payroll_run::{PayrollRun, RunStatus};
pub use receipt::{AuditStep, AuditTrace, Receipt};
