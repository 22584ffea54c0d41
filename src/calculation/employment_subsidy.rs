//! Employment subsidy (subsidio para el empleo).
//!
//! The subsidy is a percentage of the monthly UMA, converted to a daily
//! amount and multiplied by the days of the pay period.

use rust_decimal::Decimal;

use crate::models::{AuditStep, UmaReference};

use super::rounding::quantize_cent;

/// Returns the employment subsidy caused in a pay period.
///
/// ```text
/// monthly_uma     = daily_value × monthly_conversion_factor
/// monthly_subsidy = monthly_uma × subsidy_percentage / 100
/// daily_subsidy   = monthly_subsidy / monthly_conversion_factor
/// subsidy         = round(daily_subsidy × pay_period_days, 2)
/// ```
///
/// This function does not check eligibility; see [`calculate_employment_subsidy`].
pub fn employment_subsidy(uma: &UmaReference, pay_period_days: u32) -> Decimal {
    let monthly_uma = uma.daily_value * uma.monthly_conversion_factor;
    let monthly_subsidy = monthly_uma * (uma.subsidy_percentage / Decimal::ONE_HUNDRED);
    let daily_subsidy = monthly_subsidy / uma.monthly_conversion_factor;
    quantize_cent(daily_subsidy * Decimal::from(pay_period_days))
}

/// The result of the subsidy step, including the audit step.
#[derive(Debug, Clone)]
pub struct EmploymentSubsidyResult {
    /// Subsidy the worker is entitled to this period (0.00 when ineligible).
    pub subsidy_caused: Decimal,
    /// Whether the period wages were under the income ceiling.
    pub eligible: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the subsidy caused, applying the UMA income ceiling first.
///
/// Taxable wages above `uma.income_ceiling` cause no subsidy.
///
/// # Examples
///
/// ```
/// use nomina_engine::calculation::calculate_employment_subsidy;
/// use nomina_engine::models::UmaReference;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let uma = UmaReference {
///     fiscal_year: 2025,
///     daily_value: Decimal::from_str("113.14").unwrap(),
///     monthly_conversion_factor: Decimal::from_str("30.4").unwrap(),
///     subsidy_percentage: Decimal::from_str("13.8").unwrap(),
///     income_ceiling: Decimal::from_str("10171.00").unwrap(),
///     active: true,
/// };
///
/// let result = calculate_employment_subsidy(&uma, 7, Decimal::from_str("1951.60").unwrap(), 2);
/// assert!(result.eligible);
/// assert_eq!(result.subsidy_caused, Decimal::from_str("109.29").unwrap());
/// ```
pub fn calculate_employment_subsidy(
    uma: &UmaReference,
    pay_period_days: u32,
    taxable_wages: Decimal,
    step_number: u32,
) -> EmploymentSubsidyResult {
    let eligible = uma.subsidy_applies(taxable_wages);
    let subsidy_caused = if eligible {
        employment_subsidy(uma, pay_period_days)
    } else {
        quantize_cent(Decimal::ZERO)
    };

    let reasoning = if eligible {
        format!(
            "Wages ${} within ceiling ${}: {}% of UMA ${} x {} days = ${}",
            taxable_wages,
            uma.income_ceiling,
            uma.subsidy_percentage,
            uma.daily_value,
            pay_period_days,
            subsidy_caused
        )
    } else {
        format!(
            "Wages ${} exceed ceiling ${}, no subsidy caused",
            taxable_wages, uma.income_ceiling
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "employment_subsidy".to_string(),
        rule_name: "Employment Subsidy".to_string(),
        clause_ref: "Decreto subsidio para el empleo".to_string(),
        input: serde_json::json!({
            "fiscal_year": uma.fiscal_year,
            "uma_daily_value": uma.daily_value.to_string(),
            "subsidy_percentage": uma.subsidy_percentage.to_string(),
            "income_ceiling": uma.income_ceiling.to_string(),
            "taxable_wages": taxable_wages.to_string(),
            "pay_period_days": pay_period_days
        }),
        output: serde_json::json!({
            "eligible": eligible,
            "subsidy_caused": subsidy_caused.to_string()
        }),
        reasoning,
    };

    EmploymentSubsidyResult {
        subsidy_caused,
        eligible,
        audit_step,
    }
}
