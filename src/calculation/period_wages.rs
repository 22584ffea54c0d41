//! Period wages (sueldos y salarios).
//!
//! This module computes the taxable wages of a pay period from the daily
//! wage and the number of days paid.

use rust_decimal::Decimal;

use crate::models::AuditStep;

use super::rounding::quantize_cent;

/// The result of computing period wages, including the audit step.
#[derive(Debug, Clone)]
pub struct PeriodWagesResult {
    /// Taxable wages of the period.
    pub taxable_wages: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes `round(daily_wage × pay_period_days, 2)`.
///
/// # Examples
///
/// ```
/// use nomina_engine::calculation::calculate_period_wages;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = calculate_period_wages(Decimal::from_str("278.80").unwrap(), 7, 1);
/// assert_eq!(result.taxable_wages, Decimal::from_str("1951.60").unwrap());
/// ```
pub fn calculate_period_wages(
    daily_wage: Decimal,
    pay_period_days: u32,
    step_number: u32,
) -> PeriodWagesResult {
    let taxable_wages = quantize_cent(daily_wage * Decimal::from(pay_period_days));

    let audit_step = AuditStep {
        step_number,
        rule_id: "period_wages".to_string(),
        rule_name: "Period Wages".to_string(),
        clause_ref: "LISR Art. 94".to_string(),
        input: serde_json::json!({
            "daily_wage": daily_wage.to_string(),
            "pay_period_days": pay_period_days
        }),
        output: serde_json::json!({
            "taxable_wages": taxable_wages.to_string()
        }),
        reasoning: format!(
            "${} x {} days = ${}",
            daily_wage, pay_period_days, taxable_wages
        ),
    };

    PeriodWagesResult {
        taxable_wages,
        audit_step,
    }
}
