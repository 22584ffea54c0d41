//! Fiscal reference data: pay frequencies, ISR brackets and UMA values.
//!
//! These values are maintained outside the engine and consumed read-only.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// The pay frequencies that have an ISR tariff table.
///
/// Supporting another period length means adding a variant here and a
/// table to the tariff files.
///
/// # Example
///
/// ```
/// use nomina_engine::models::PayFrequency;
///
/// assert_eq!(PayFrequency::from_period_days(15).unwrap(), PayFrequency::Biweekly);
/// assert!(PayFrequency::from_period_days(30).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// Seven-day pay period.
    Weekly,
    /// Fifteen-day pay period.
    Biweekly,
}

impl PayFrequency {
    /// All supported frequencies.
    pub const ALL: [PayFrequency; 2] = [PayFrequency::Weekly, PayFrequency::Biweekly];

    /// Maps a pay-period length to its frequency.
    ///
    /// Any length other than 7 or 15 days is an `UnsupportedPayPeriod`
    /// configuration error; there is no fallback table.
    pub fn from_period_days(days: u32) -> PayrollResult<Self> {
        match days {
            7 => Ok(PayFrequency::Weekly),
            15 => Ok(PayFrequency::Biweekly),
            _ => Err(PayrollError::UnsupportedPayPeriod { days }),
        }
    }

    /// Returns the number of days in the period.
    pub fn period_days(self) -> u32 {
        match self {
            PayFrequency::Weekly => 7,
            PayFrequency::Biweekly => 15,
        }
    }

    /// Returns the lowercase name used in logs and errors.
    pub fn as_str(self) -> &'static str {
        match self {
            PayFrequency::Weekly => "weekly",
            PayFrequency::Biweekly => "biweekly",
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the LISR Art. 96 tariff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsrBracket {
    /// The fiscal year of the tariff.
    pub fiscal_year: i32,
    /// The frequency this row belongs to.
    pub frequency: PayFrequency,
    /// Inclusive lower bound.
    pub lower_bound: Decimal,
    /// Inclusive upper bound, `None` for the open-ended top bracket.
    pub upper_bound: Option<Decimal>,
    /// Fixed quota added to the marginal tax.
    pub fixed_quota: Decimal,
    /// Marginal rate in percent applied to the excess over the lower bound.
    pub marginal_rate: Decimal,
}

impl IsrBracket {
    /// Returns true if `amount` falls inside this bracket.
    pub fn covers(&self, amount: Decimal) -> bool {
        self.lower_bound <= amount && self.upper_bound.is_none_or(|upper| upper >= amount)
    }
}

/// All bracket rows of one fiscal year, grouped by frequency.
///
/// Rows are kept sorted by ascending lower bound. The tariff does not check
/// that rows partition the amounts without gaps; that is a property of the
/// externally maintained data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsrTariff {
    fiscal_year: i32,
    weekly: Vec<IsrBracket>,
    biweekly: Vec<IsrBracket>,
}

impl IsrTariff {
    /// Builds a tariff from unsorted bracket rows.
    pub fn new(fiscal_year: i32, brackets: Vec<IsrBracket>) -> Self {
        let (mut weekly, mut biweekly): (Vec<_>, Vec<_>) = brackets
            .into_iter()
            .partition(|b| b.frequency == PayFrequency::Weekly);
        weekly.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));
        biweekly.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));
        Self {
            fiscal_year,
            weekly,
            biweekly,
        }
    }

    /// Returns the fiscal year.
    pub fn fiscal_year(&self) -> i32 {
        self.fiscal_year
    }

    /// Returns the rows for a frequency, ascending by lower bound.
    pub fn table(&self, frequency: PayFrequency) -> &[IsrBracket] {
        match frequency {
            PayFrequency::Weekly => &self.weekly,
            PayFrequency::Biweekly => &self.biweekly,
        }
    }

    /// Iterates over every row of the tariff.
    pub fn brackets(&self) -> impl Iterator<Item = &IsrBracket> {
        self.weekly.iter().chain(self.biweekly.iter())
    }
}

/// The UMA reference values of one fiscal year.
///
/// # Example
///
/// ```
/// use nomina_engine::models::UmaReference;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let uma = UmaReference {
///     fiscal_year: 2024,
///     daily_value: Decimal::from_str("108.57").unwrap(),
///     monthly_conversion_factor: Decimal::from_str("30.4").unwrap(),
///     subsidy_percentage: Decimal::from_str("11.82").unwrap(),
///     income_ceiling: Decimal::from_str("9081.00").unwrap(),
///     active: true,
/// };
/// assert_eq!(uma.contribution_cap(), Decimal::from_str("2714.25").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UmaReference {
    /// The fiscal year.
    pub fiscal_year: i32,
    /// Daily UMA value.
    pub daily_value: Decimal,
    /// Factor converting daily values to monthly ones (30.4).
    pub monthly_conversion_factor: Decimal,
    /// Employment subsidy as a percentage of the monthly UMA.
    pub subsidy_percentage: Decimal,
    /// Taxable wages above this ceiling cause no subsidy.
    pub income_ceiling: Decimal,
    /// Whether the row is active.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Multiple of the daily UMA that caps the base contribution salary (LSS Art. 28).
pub const SBC_CAP_UMA_MULTIPLE: Decimal = Decimal::from_parts(25, 0, 0, false, 0);

impl UmaReference {
    /// Returns the base contribution salary ceiling, 25 daily UMA.
    pub fn contribution_cap(&self) -> Decimal {
        self.daily_value * SBC_CAP_UMA_MULTIPLE
    }

    /// Returns true if the taxable wages of a period are low enough to cause subsidy.
    pub fn subsidy_applies(&self, taxable_wages: Decimal) -> bool {
        taxable_wages <= self.income_ceiling
    }

    /// Checks the values are usable by the subsidy and contribution formulas.
    pub fn validate(&self) -> PayrollResult<()> {
        let invalid = |message: &str| PayrollError::InvalidReferenceData {
            table: "uma_references".to_string(),
            message: format!("fiscal year {}: {}", self.fiscal_year, message),
        };

        if self.daily_value <= Decimal::ZERO {
            return Err(invalid("daily_value must be positive"));
        }
        if self.monthly_conversion_factor <= Decimal::ZERO {
            return Err(invalid("monthly_conversion_factor must be positive"));
        }
        if self.subsidy_percentage < Decimal::ZERO {
            return Err(invalid("subsidy_percentage must not be negative"));
        }
        if self.income_ceiling < Decimal::ZERO {
            return Err(invalid("income_ceiling must not be negative"));
        }
        Ok(())
    }
}
