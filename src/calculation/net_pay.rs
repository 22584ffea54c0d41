//! Net pay aggregation.

use rust_decimal::Decimal;

use crate::models::AuditStep;

use super::rounding::quantize_cent;

/// Returns `round(taxable + exempt + subsidy_delivered − isr_withheld − social_security, 2)`.
///
/// # Examples
///
/// ```
/// use nomina_engine::calculation::calculate_net_pay;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let net = calculate_net_pay(dec("4500.00"), dec("0.00"), dec("0.00"), dec("140.63"), dec("112.14"));
/// assert_eq!(net, dec("4247.23"));
/// ```
pub fn calculate_net_pay(
    taxable_income: Decimal,
    exempt_income: Decimal,
    subsidy_delivered: Decimal,
    isr_withheld: Decimal,
    social_security: Decimal,
) -> Decimal {
    quantize_cent(taxable_income + exempt_income + subsidy_delivered - isr_withheld - social_security)
}

/// The inputs to net pay for one receipt.
#[derive(Debug, Clone, Copy)]
pub struct NetPayInputs {
    /// Taxable wages of the period.
    pub taxable_income: Decimal,
    /// Exempt income of the period.
    pub exempt_income: Decimal,
    /// Subsidy paid out to the worker.
    pub subsidy_delivered: Decimal,
    /// ISR withheld.
    pub isr_withheld: Decimal,
    /// IMSS worker contributions.
    pub social_security: Decimal,
}

/// The result of the net pay step, including the audit step.
#[derive(Debug, Clone)]
pub struct NetPayResult {
    /// Net pay delivered to the worker.
    pub net_pay: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Aggregates net pay and records an audit step.
pub fn apply_net_pay(inputs: NetPayInputs, step_number: u32) -> NetPayResult {
    let net_pay = calculate_net_pay(
        inputs.taxable_income,
        inputs.exempt_income,
        inputs.subsidy_delivered,
        inputs.isr_withheld,
        inputs.social_security,
    );

    let audit_step = AuditStep {
        step_number,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        clause_ref: "LFT Art. 110".to_string(),
        input: serde_json::json!({
            "taxable_income": inputs.taxable_income.to_string(),
            "exempt_income": inputs.exempt_income.to_string(),
            "subsidy_delivered": inputs.subsidy_delivered.to_string(),
            "isr_withheld": inputs.isr_withheld.to_string(),
            "social_security": inputs.social_security.to_string()
        }),
        output: serde_json::json!({
            "net_pay": net_pay.to_string()
        }),
        reasoning: format!(
            "${} + ${} + ${} - ${} - ${} = ${}",
            inputs.taxable_income,
            inputs.exempt_income,
            inputs.subsidy_delivered,
            inputs.isr_withheld,
            inputs.social_security,
            net_pay
        ),
    };

    NetPayResult {
        net_pay,
        audit_step,
    }
}
