//! Fiscal configuration for the payroll engine.
//!
//! This module provides the statutory constants used by the salary
//! integration formulas and loads UMA references and ISR tariffs from YAML.
//!
//! # Example
//!
//! ```no_run
//! use nomina_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/mx").unwrap();
//! println!("Bonus days: {}", config.constants().bonus_days);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BracketRow, DEFAULT_BONUS_DAYS, DEFAULT_DAYS_IN_YEAR, DEFAULT_VACATION_DAYS,
    DEFAULT_VACATION_PREMIUM_RATE, FiscalConfig, FiscalConstants, StatutesFile, TariffFile,
};
