//! ISR bracket resolution.
//!
//! This module selects the LISR Art. 96 tariff row that applies to a
//! period's taxable amount.

use rust_decimal::Decimal;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{AuditStep, IsrBracket, IsrTariff, PayFrequency};

/// Finds the bracket covering `taxable_amount` for a frequency.
///
/// Rows are scanned by ascending lower bound and the first row with
/// `lower_bound ≤ amount ≤ upper_bound` (or an open upper bound) wins.
///
/// # Errors
///
/// - `BracketTableMissing` when the tariff has no rows for the frequency
/// - `BracketNotFound` when rows exist but none covers the amount
pub fn find_bracket(
    tariff: &IsrTariff,
    frequency: PayFrequency,
    taxable_amount: Decimal,
) -> PayrollResult<&IsrBracket> {
    let table = tariff.table(frequency);
    if table.is_empty() {
        return Err(PayrollError::BracketTableMissing {
            fiscal_year: tariff.fiscal_year(),
            frequency: frequency.to_string(),
        });
    }

    table
        .iter()
        .find(|bracket| bracket.covers(taxable_amount))
        .ok_or_else(|| PayrollError::BracketNotFound {
            fiscal_year: tariff.fiscal_year(),
            frequency: frequency.to_string(),
            amount: taxable_amount,
        })
}

/// The resolved bracket, including the audit step.
#[derive(Debug, Clone)]
pub struct BracketResolution {
    /// The frequency derived from the pay-period length.
    pub frequency: PayFrequency,
    /// The applicable bracket row.
    pub bracket: IsrBracket,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Resolves the ISR bracket for a pay-period length and taxable amount.
///
/// # Errors
///
/// - `UnsupportedPayPeriod` when the period length is not 7 or 15 days
/// - `BracketTableMissing` / `BracketNotFound` as in [`find_bracket`]
///
/// # Examples
///
/// ```
/// use nomina_engine::calculation::resolve_bracket;
/// use nomina_engine::models::{IsrBracket, IsrTariff, PayFrequency};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let tariff = IsrTariff::new(2025, vec![IsrBracket {
///     fiscal_year: 2025,
///     frequency: PayFrequency::Weekly,
///     lower_bound: Decimal::from_str("0.01").unwrap(),
///     upper_bound: None,
///     fixed_quota: Decimal::ZERO,
///     marginal_rate: Decimal::from_str("1.92").unwrap(),
/// }]);
///
/// let resolution = resolve_bracket(&tariff, 7, Decimal::from(100), 3).unwrap();
/// assert_eq!(resolution.frequency, PayFrequency::Weekly);
/// assert!(resolve_bracket(&tariff, 30, Decimal::from(100), 3).is_err());
/// ```
pub fn resolve_bracket(
    tariff: &IsrTariff,
    pay_period_days: u32,
    taxable_amount: Decimal,
    step_number: u32,
) -> PayrollResult<BracketResolution> {
    let frequency = PayFrequency::from_period_days(pay_period_days)?;
    let bracket = find_bracket(tariff, frequency, taxable_amount)?.clone();

    let upper = bracket
        .upper_bound
        .map(|u| u.to_string())
        .unwrap_or_else(|| "open".to_string());

    let audit_step = AuditStep {
        step_number,
        rule_id: "isr_bracket_lookup".to_string(),
        rule_name: "ISR Bracket Lookup".to_string(),
        clause_ref: "LISR Art. 96".to_string(),
        input: serde_json::json!({
            "fiscal_year": tariff.fiscal_year(),
            "frequency": frequency.as_str(),
            "taxable_amount": taxable_amount.to_string()
        }),
        output: serde_json::json!({
            "lower_bound": bracket.lower_bound.to_string(),
            "upper_bound": upper,
            "fixed_quota": bracket.fixed_quota.to_string(),
            "marginal_rate": bracket.marginal_rate.to_string()
        }),
        reasoning: format!(
            "${} falls in the {} {} bracket ${} - {}",
            taxable_amount,
            tariff.fiscal_year(),
            frequency,
            bracket.lower_bound,
            upper
        ),
    };

    Ok(BracketResolution {
        frequency,
        bracket,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn row(frequency: PayFrequency, lower: &str, upper: Option<&str>, quota: &str, rate: &str) -> IsrBracket {
        IsrBracket {
            fiscal_year: 2025,
            frequency,
            lower_bound: dec(lower),
            upper_bound: upper.map(dec),
            fixed_quota: dec(quota),
            marginal_rate: dec(rate),
        }
    }

    fn create_test_tariff() -> IsrTariff {
        use PayFrequency::{Biweekly, Weekly};
        IsrTariff::new(
            2025,
            vec![
                row(Weekly, "1458.04", Some("2562.35"), "85.61", "10.88"),
                row(Weekly, "0.01", Some("171.78"), "0.00", "1.92"),
                row(Weekly, "171.79", Some("1458.03"), "3.29", "6.40"),
                row(Weekly, "86573.35", None, "27150.83", "35.00"),
                row(Biweekly, "368.11", Some("3124.35"), "7.05", "6.40"),
                row(Biweekly, "3124.36", Some("5490.75"), "183.45", "10.88"),
            ],
        )
    }

    /// BK-001: amount inside a weekly bracket
    #[test]
    fn test_weekly_amount_resolves() {
        let tariff = create_test_tariff();
        let result = resolve_bracket(&tariff, 7, dec("2100.00"), 3).unwrap();

        assert_eq!(result.frequency, PayFrequency::Weekly);
        assert_eq!(result.bracket.lower_bound, dec("1458.04"));
        assert_eq!(result.audit_step.rule_id, "isr_bracket_lookup");
        assert_eq!(result.audit_step.clause_ref, "LISR Art. 96");
        assert_eq!(
            result.audit_step.output["fixed_quota"].as_str().unwrap(),
            "85.61"
        );
    }

    /// BK-002: bounds are inclusive on both ends
    #[test]
    fn test_bounds_are_inclusive() {
        let tariff = create_test_tariff();

        let at_upper = find_bracket(&tariff, PayFrequency::Weekly, dec("171.78")).unwrap();
        assert_eq!(at_upper.lower_bound, dec("0.01"));

        let at_lower = find_bracket(&tariff, PayFrequency::Weekly, dec("171.79")).unwrap();
        assert_eq!(at_lower.lower_bound, dec("171.79"));
    }

    /// BK-003: open-ended top bracket
    #[test]
    fn test_open_top_bracket() {
        let tariff = create_test_tariff();
        let result = resolve_bracket(&tariff, 7, dec("250000.00"), 1).unwrap();

        assert_eq!(result.bracket.upper_bound, None);
        assert_eq!(result.audit_step.output["upper_bound"].as_str().unwrap(), "open");
    }

    /// BK-004: a gap in the table is a DataNotFound error, not a default
    #[test]
    fn test_gap_in_table_returns_bracket_not_found() {
        let tariff = create_test_tariff();
        // weekly table jumps from 2562.35 to 86573.35
        match find_bracket(&tariff, PayFrequency::Weekly, dec("5000.00")) {
            Err(PayrollError::BracketNotFound {
                fiscal_year,
                frequency,
                amount,
            }) => {
                assert_eq!(fiscal_year, 2025);
                assert_eq!(frequency, "weekly");
                assert_eq!(amount, dec("5000.00"));
            }
            other => panic!("Expected BracketNotFound, got {:?}", other),
        }
    }

    /// BK-005: amount below the first lower bound
    #[test]
    fn test_amount_below_first_row_returns_bracket_not_found() {
        let tariff = create_test_tariff();
        let result = find_bracket(&tariff, PayFrequency::Biweekly, dec("100.00"));
        assert!(matches!(result, Err(PayrollError::BracketNotFound { .. })));
    }

    /// BK-006: unsupported period length is a configuration error
    #[test]
    fn test_thirty_day_period_is_configuration_error() {
        let tariff = create_test_tariff();
        match resolve_bracket(&tariff, 30, dec("9000.00"), 1) {
            Err(PayrollError::UnsupportedPayPeriod { days }) => assert_eq!(days, 30),
            other => panic!("Expected UnsupportedPayPeriod, got {:?}", other),
        }
    }

    /// BK-007: supported frequency with no rows loaded
    #[test]
    fn test_missing_table_is_configuration_error() {
        let tariff = IsrTariff::new(2025, vec![]);
        match resolve_bracket(&tariff, 15, dec("4500.00"), 1) {
            Err(PayrollError::BracketTableMissing {
                fiscal_year,
                frequency,
            }) => {
                assert_eq!(fiscal_year, 2025);
                assert_eq!(frequency, "biweekly");
            }
            other => panic!("Expected BracketTableMissing, got {:?}", other),
        }
    }
}
