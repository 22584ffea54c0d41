//! Payroll receipt engine for Mexican payroll
//!
//! This crate computes periodic payroll receipts under the LFT, LISR and LSS:
//! daily integrated wage, employment subsidy, ISR withholding from the Art. 96
//! tariffs, IMSS worker contributions and net pay, and stores one receipt per
//! employee of a payroll run in SQLite.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod run;
pub mod store;
