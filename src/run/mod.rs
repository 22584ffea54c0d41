//! Payroll runs: the per-employee pipeline and the transactional orchestrator.
//!
//! # Example
//!
//! ```no_run
//! use nomina_engine::config::ConfigLoader;
//! use nomina_engine::run::PayrollEngine;
//! use nomina_engine::store::{PayrollDb, import_fiscal_config};
//! use chrono::NaiveDate;
//!
//! let config = ConfigLoader::load("./config/mx").unwrap();
//! let db = PayrollDb::open("nomina.db").unwrap();
//! import_fiscal_config(db.conn(), config.config()).unwrap();
//!
//! let mut engine = PayrollEngine::new(db, *config.constants());
//! let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
//! let run = engine.create_run("pos_ops", "dep_ops", date, date).unwrap();
//! let summary = engine.generate_receipts(run.id).unwrap();
//! println!("{} receipts, net {}", summary.receipts.len(), summary.totals.net_pay);
//! ```

mod orchestrator;
mod pipeline;

pub use orchestrator::{PayrollEngine, RunSummary, RunTotals};
pub use pipeline::{FiscalContext, ReceiptOutcome, compute_receipt};
