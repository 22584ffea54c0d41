//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading fiscal
//! configuration (statutes, UMA references and ISR tariffs) from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{IsrTariff, UmaReference};

use super::types::{FiscalConfig, FiscalConstants, StatutesFile, TariffFile};

/// Loads and provides access to fiscal configuration.
///
/// # Directory Structure
///
/// ```text
/// config/mx/
/// ├── statutes.yaml   # Statutory benefit constants
/// ├── uma/
/// │   └── 2025.yaml   # UMA reference for the fiscal year
/// └── isr/
///     └── 2025.yaml   # Weekly and biweekly ISR tables
/// ```
///
/// # Example
///
/// ```no_run
/// use nomina_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/mx").unwrap();
/// let uma = loader.get_uma(2025).unwrap();
/// println!("UMA 2025: {}", uma.daily_value);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: FiscalConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Fails with `ConfigNotFound` when a required file or directory is
    /// missing and with `ConfigParseError` when a file is not valid YAML for
    /// its schema.
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();

        let statutes = Self::load_yaml::<StatutesFile>(&path.join("statutes.yaml"))?;
        let uma = Self::load_dir::<UmaReference>(&path.join("uma"))?;
        let tariffs: Vec<IsrTariff> = Self::load_dir::<TariffFile>(&path.join("isr"))?
            .into_iter()
            .map(TariffFile::into_tariff)
            .collect();

        debug!(
            path = %path.display(),
            uma_years = uma.len(),
            tariff_years = tariffs.len(),
            "Loaded fiscal configuration"
        );

        let config = FiscalConfig::new(statutes.jurisdiction, statutes.constants, uma, tariffs);
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> PayrollResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PayrollError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every `.yaml` file of a directory.
    fn load_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> PayrollResult<Vec<T>> {
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| PayrollError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| PayrollError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(PayrollError::ConfigNotFound {
                path: format!("{} (no yaml files found)", dir_str),
            });
        }

        paths.sort();
        paths.iter().map(|p| Self::load_yaml::<T>(p)).collect()
    }

    /// Returns the underlying fiscal configuration.
    pub fn config(&self) -> &FiscalConfig {
        &self.config
    }

    /// Returns the statutory constants.
    pub fn constants(&self) -> &FiscalConstants {
        self.config.constants()
    }

    /// Gets the UMA reference for a fiscal year.
    pub fn get_uma(&self, fiscal_year: i32) -> PayrollResult<&UmaReference> {
        self.config
            .uma(fiscal_year)
            .ok_or(PayrollError::UmaNotFound { fiscal_year })
    }

    /// Gets the ISR tariff for a fiscal year.
    pub fn get_tariff(&self, fiscal_year: i32) -> PayrollResult<&IsrTariff> {
        self.config
            .tariff(fiscal_year)
            .ok_or_else(|| PayrollError::BracketTableMissing {
                fiscal_year,
                frequency: "any".to_string(),
            })
    }
}
