//! Configuration types for payroll computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML files of a fiscal configuration directory.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{IsrBracket, IsrTariff, PayFrequency, UmaReference};

/// Minimum annual bonus (aguinaldo) days, LFT Art. 87.
pub const DEFAULT_BONUS_DAYS: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

/// Vacation days for the first year of service, LFT Art. 76.
pub const DEFAULT_VACATION_DAYS: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Minimum vacation premium rate (25%), LFT Art. 80.
pub const DEFAULT_VACATION_PREMIUM_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Days in the year used by IMSS proration.
pub const DEFAULT_DAYS_IN_YEAR: Decimal = Decimal::from_parts(365, 0, 0, false, 0);

/// Statutory benefit constants feeding the integration factor and the SBC.
///
/// Values are immutable once built; recalculating a prior year under older
/// statutes means building a different `FiscalConstants`.
///
/// # Example
///
/// ```
/// use nomina_engine::config::FiscalConstants;
/// use rust_decimal::Decimal;
///
/// let constants = FiscalConstants::default();
/// assert_eq!(constants.bonus_days, Decimal::from(15));
/// assert_eq!(constants.days_in_year, Decimal::from(365));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalConstants {
    /// Annual bonus (aguinaldo) days.
    #[serde(default = "default_bonus_days")]
    pub bonus_days: Decimal,
    /// Annual vacation days.
    #[serde(default = "default_vacation_days")]
    pub vacation_days: Decimal,
    /// Vacation premium rate as a fraction (0.25 = 25%).
    #[serde(default = "default_vacation_premium_rate")]
    pub vacation_premium_rate: Decimal,
    /// Days in the year.
    #[serde(default = "default_days_in_year")]
    pub days_in_year: Decimal,
}

fn default_bonus_days() -> Decimal {
    DEFAULT_BONUS_DAYS
}

fn default_vacation_days() -> Decimal {
    DEFAULT_VACATION_DAYS
}

fn default_vacation_premium_rate() -> Decimal {
    DEFAULT_VACATION_PREMIUM_RATE
}

fn default_days_in_year() -> Decimal {
    DEFAULT_DAYS_IN_YEAR
}

impl Default for FiscalConstants {
    fn default() -> Self {
        Self {
            bonus_days: DEFAULT_BONUS_DAYS,
            vacation_days: DEFAULT_VACATION_DAYS,
            vacation_premium_rate: DEFAULT_VACATION_PREMIUM_RATE,
            days_in_year: DEFAULT_DAYS_IN_YEAR,
        }
    }
}

/// Metadata and statutes from statutes.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct StatutesFile {
    /// Jurisdiction label (e.g. "MX").
    pub jurisdiction: String,
    /// Statutory benefit constants.
    pub constants: FiscalConstants,
}

/// A single bracket row as written in isr/<year>.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct BracketRow {
    /// Lower bound of the bracket.
    pub lower_bound: Decimal,
    /// Upper bound, absent for the open-ended top bracket.
    #[serde(default)]
    pub upper_bound: Option<Decimal>,
    /// Fixed quota applied to the bracket.
    pub fixed_quota: Decimal,
    /// Marginal rate in percent (e.g. 10.88).
    pub marginal_rate: Decimal,
}

/// The content of isr/<year>.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct TariffFile {
    /// The fiscal year of the tariff.
    pub fiscal_year: i32,
    /// Weekly (7-day) bracket rows.
    #[serde(default)]
    pub weekly: Vec<BracketRow>,
    /// Biweekly (15-day) bracket rows.
    #[serde(default)]
    pub biweekly: Vec<BracketRow>,
}

impl TariffFile {
    /// Converts the file rows into a sorted [`IsrTariff`].
    pub fn into_tariff(self) -> IsrTariff {
        let fiscal_year = self.fiscal_year;
        let to_brackets = |rows: Vec<BracketRow>, frequency: PayFrequency| {
            rows.into_iter()
                .map(|row| IsrBracket {
                    fiscal_year,
                    frequency,
                    lower_bound: row.lower_bound,
                    upper_bound: row.upper_bound,
                    fixed_quota: row.fixed_quota,
                    marginal_rate: row.marginal_rate,
                })
                .collect::<Vec<_>>()
        };

        let mut brackets = to_brackets(self.weekly, PayFrequency::Weekly);
        brackets.extend(to_brackets(self.biweekly, PayFrequency::Biweekly));
        IsrTariff::new(fiscal_year, brackets)
    }
}

/// The complete fiscal configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct FiscalConfig {
    /// Jurisdiction label.
    jurisdiction: String,
    /// Statutory benefit constants.
    constants: FiscalConstants,
    /// UMA references by fiscal year.
    uma: BTreeMap<i32, UmaReference>,
    /// ISR tariffs by fiscal year.
    tariffs: BTreeMap<i32, IsrTariff>,
}

impl FiscalConfig {
    /// Creates a new FiscalConfig from its component parts.
    pub fn new(
        jurisdiction: String,
        constants: FiscalConstants,
        uma: Vec<UmaReference>,
        tariffs: Vec<IsrTariff>,
    ) -> Self {
        Self {
            jurisdiction,
            constants,
            uma: uma.into_iter().map(|u| (u.fiscal_year, u)).collect(),
            tariffs: tariffs.into_iter().map(|t| (t.fiscal_year(), t)).collect(),
        }
    }

    /// Returns the jurisdiction label.
    pub fn jurisdiction(&self) -> &str {
        &self.jurisdiction
    }

    /// Returns the statutory constants.
    pub fn constants(&self) -> &FiscalConstants {
        &self.constants
    }

    /// Returns the UMA reference for a fiscal year, if loaded.
    pub fn uma(&self, fiscal_year: i32) -> Option<&UmaReference> {
        self.uma.get(&fiscal_year)
    }

    /// Returns the ISR tariff for a fiscal year, if loaded.
    pub fn tariff(&self, fiscal_year: i32) -> Option<&IsrTariff> {
        self.tariffs.get(&fiscal_year)
    }

    /// Iterates over all UMA references, oldest year first.
    pub fn uma_references(&self) -> impl Iterator<Item = &UmaReference> {
        self.uma.values()
    }

    /// Iterates over all tariffs, oldest year first.
    pub fn tariffs(&self) -> impl Iterator<Item = &IsrTariff> {
        self.tariffs.values()
    }
}
