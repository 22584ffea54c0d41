//! IMSS worker contributions (cuotas obreras).
//!
//! The worker share of social security is made of five branches, each a
//! percentage of the base contribution salary times the days of the period.
//! Only the in-kind sickness branch is restricted to the excess over three
//! daily UMA.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::FiscalConstants;
use crate::models::{AuditStep, UmaReference};

use super::base_contribution_salary::base_contribution_salary;
use super::rounding::quantize_cent;

/// In-kind sickness and maternity, worker share on the excess (LSS Art. 106-II): 0.40%
pub const IN_KIND_EXCESS_RATE: Decimal = Decimal::from_parts(40, 0, 0, false, 2);

/// Pensioner medical expenses (LSS Art. 25): 0.375%
pub const PENSIONER_MEDICAL_RATE: Decimal = Decimal::from_parts(375, 0, 0, false, 3);

/// Cash sickness benefits (LSS Art. 107): 0.25%
pub const CASH_BENEFITS_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Disability and life (LSS Art. 147): 0.625%
pub const DISABILITY_LIFE_RATE: Decimal = Decimal::from_parts(625, 0, 0, false, 3);

/// Severance at old age and advanced age (LSS Art. 168-II): 1.125%
pub const RETIREMENT_RATE: Decimal = Decimal::from_parts(1125, 0, 0, false, 3);

/// The excess threshold for the in-kind sickness branch, in daily UMA.
pub const IN_KIND_THRESHOLD_UMA_MULTIPLE: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

/// The five worker contribution branches for one pay period.
///
/// Branches carry full precision; only `total` is rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImssContributions {
    /// Base contribution salary the branches were computed on.
    pub base_contribution_salary: Decimal,
    /// 0.40% of the SBC excess over 3 UMA.
    pub in_kind_excess: Decimal,
    /// 0.375% of SBC.
    pub pensioner_medical: Decimal,
    /// 0.25% of SBC.
    pub cash_benefits: Decimal,
    /// 0.625% of SBC.
    pub disability_life: Decimal,
    /// 1.125% of SBC.
    pub retirement: Decimal,
    /// Sum of the branches, rounded to the cent.
    pub total: Decimal,
}

fn percent_of(rate: Decimal, base: Decimal, days: Decimal) -> Decimal {
    rate / Decimal::ONE_HUNDRED * base * days
}

/// Computes the worker IMSS contributions for a pay period.
///
/// # Examples
///
/// ```
/// use nomina_engine::calculation::imss_worker_contributions;
/// use nomina_engine::config::FiscalConstants;
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
///
/// let imss = imss_worker_contributions(
///     Decimal::from_str("300.00").unwrap(),
///     15,
///     &uma,
///     &FiscalConstants::default(),
/// );
/// assert_eq!(imss.in_kind_excess, Decimal::ZERO);
/// assert_eq!(imss.total, Decimal::from_str("112.14").unwrap());
/// ```
pub fn imss_worker_contributions(
    daily_wage: Decimal,
    pay_period_days: u32,
    uma: &UmaReference,
    constants: &FiscalConstants,
) -> ImssContributions {
    let sbc = base_contribution_salary(daily_wage, uma, constants);
    let days = Decimal::from(pay_period_days);

    let threshold = uma.daily_value * IN_KIND_THRESHOLD_UMA_MULTIPLE;
    let excess = (sbc - threshold).max(Decimal::ZERO);

    let in_kind_excess = percent_of(IN_KIND_EXCESS_RATE, excess, days);
    let pensioner_medical = percent_of(PENSIONER_MEDICAL_RATE, sbc, days);
    let cash_benefits = percent_of(CASH_BENEFITS_RATE, sbc, days);
    let disability_life = percent_of(DISABILITY_LIFE_RATE, sbc, days);
    let retirement = percent_of(RETIREMENT_RATE, sbc, days);

    let total = quantize_cent(
        in_kind_excess + pensioner_medical + cash_benefits + disability_life + retirement,
    );

    ImssContributions {
        base_contribution_salary: sbc,
        in_kind_excess,
        pensioner_medical,
        cash_benefits,
        disability_life,
        retirement,
        total,
    }
}

/// The result of the IMSS step, including the audit step.
#[derive(Debug, Clone)]
pub struct ImssResult {
    /// The contribution breakdown.
    pub contributions: ImssContributions,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the worker IMSS contributions and records an audit step.
pub fn calculate_imss(
    daily_wage: Decimal,
    pay_period_days: u32,
    uma: &UmaReference,
    constants: &FiscalConstants,
    step_number: u32,
) -> ImssResult {
    let contributions = imss_worker_contributions(daily_wage, pay_period_days, uma, constants);
    let capped = contributions.base_contribution_salary == quantize_cent(uma.contribution_cap());

    let audit_step = AuditStep {
        step_number,
        rule_id: "imss_worker_contributions".to_string(),
        rule_name: "IMSS Worker Contributions".to_string(),
        clause_ref: "LSS Art. 25, 106, 107, 147, 168".to_string(),
        input: serde_json::json!({
            "daily_wage": daily_wage.to_string(),
            "pay_period_days": pay_period_days,
            "uma_daily_value": uma.daily_value.to_string()
        }),
        output: serde_json::json!({
            "base_contribution_salary": contributions.base_contribution_salary.to_string(),
            "sbc_capped": capped,
            "in_kind_excess": contributions.in_kind_excess.to_string(),
            "pensioner_medical": contributions.pensioner_medical.to_string(),
            "cash_benefits": contributions.cash_benefits.to_string(),
            "disability_life": contributions.disability_life.to_string(),
            "retirement": contributions.retirement.to_string(),
            "total": contributions.total.to_string()
        }),
        reasoning: format!(
            "SBC ${} x {} days across five worker branches = ${}",
            contributions.base_contribution_salary, pay_period_days, contributions.total
        ),
    };

    ImssResult {
        contributions,
        audit_step,
    }
}
