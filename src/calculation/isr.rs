//! ISR determination and reconciliation against the employment subsidy.
//!
//! The tax determined from the tariff is offset by the subsidy caused. What
//! remains is either withheld from the worker or, when the subsidy is
//! larger, paid out to the worker as delivered subsidy. Never both.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, IsrBracket};

use super::rounding::quantize_cent;

/// Returns the ISR determined for a taxable amount.
///
/// `round((amount − lower_bound) × marginal_rate / 100 + fixed_quota, 2)`
///
/// # Examples
///
/// ```
/// use nomina_engine::calculation::determine_isr;
/// use nomina_engine::models::{IsrBracket, PayFrequency};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let bracket = IsrBracket {
///     fiscal_year: 2025,
///     frequency: PayFrequency::Biweekly,
///     lower_bound: Decimal::from_str("3124.36").unwrap(),
///     upper_bound: Some(Decimal::from_str("5490.75").unwrap()),
///     fixed_quota: Decimal::from_str("183.45").unwrap(),
///     marginal_rate: Decimal::from_str("10.88").unwrap(),
/// };
/// let isr = determine_isr(&bracket, Decimal::from_str("4500.00").unwrap());
/// assert_eq!(isr, Decimal::from_str("333.12").unwrap());
/// ```
pub fn determine_isr(bracket: &IsrBracket, taxable_amount: Decimal) -> Decimal {
    let excess = taxable_amount - bracket.lower_bound;
    let marginal_tax = excess * bracket.marginal_rate / Decimal::ONE_HUNDRED;
    quantize_cent(marginal_tax + bracket.fixed_quota)
}

/// How ISR and subsidy settle for the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsrReconciliation {
    /// ISR withheld from the worker.
    pub isr_withheld: Decimal,
    /// Subsidy paid out to the worker.
    pub subsidy_delivered: Decimal,
}

/// Offsets the ISR determined against the subsidy caused.
///
/// A positive difference is withheld; otherwise its absolute value is
/// delivered as subsidy. At most one of the two outputs is nonzero.
///
/// # Examples
///
/// ```
/// use nomina_engine::calculation::reconcile_isr;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
///
/// let owed = reconcile_isr(dec("333.12"), dec("192.49"));
/// assert_eq!(owed.isr_withheld, dec("140.63"));
/// assert_eq!(owed.subsidy_delivered, dec("0.00"));
///
/// let credited = reconcile_isr(dec("59.50"), dec("109.29"));
/// assert_eq!(credited.isr_withheld, dec("0.00"));
/// assert_eq!(credited.subsidy_delivered, dec("49.79"));
/// ```
pub fn reconcile_isr(isr_determined: Decimal, subsidy_caused: Decimal) -> IsrReconciliation {
    let difference = isr_determined - subsidy_caused;

    if difference > Decimal::ZERO {
        IsrReconciliation {
            isr_withheld: quantize_cent(difference),
            subsidy_delivered: quantize_cent(Decimal::ZERO),
        }
    } else {
        IsrReconciliation {
            isr_withheld: quantize_cent(Decimal::ZERO),
            subsidy_delivered: quantize_cent(difference.abs()),
        }
    }
}

/// The result of the ISR steps, including their audit steps.
#[derive(Debug, Clone)]
pub struct IsrResult {
    /// ISR from the tariff before subsidy.
    pub isr_determined: Decimal,
    /// Settlement of ISR against subsidy.
    pub reconciliation: IsrReconciliation,
    /// Audit steps for the determination and the reconciliation.
    pub audit_steps: Vec<AuditStep>,
}

/// Determines ISR and reconciles it against the subsidy caused.
///
/// Produces two audit steps, numbered from `step_number`.
pub fn calculate_isr(
    bracket: &IsrBracket,
    taxable_amount: Decimal,
    subsidy_caused: Decimal,
    step_number: u32,
) -> IsrResult {
    let isr_determined = determine_isr(bracket, taxable_amount);
    let excess = taxable_amount - bracket.lower_bound;

    let determination_step = AuditStep {
        step_number,
        rule_id: "isr_determination".to_string(),
        rule_name: "ISR Determination".to_string(),
        clause_ref: "LISR Art. 96".to_string(),
        input: serde_json::json!({
            "taxable_amount": taxable_amount.to_string(),
            "lower_bound": bracket.lower_bound.to_string(),
            "marginal_rate": bracket.marginal_rate.to_string(),
            "fixed_quota": bracket.fixed_quota.to_string()
        }),
        output: serde_json::json!({
            "excess": excess.to_string(),
            "isr_determined": isr_determined.to_string()
        }),
        reasoning: format!(
            "(${} - ${}) x {}% + ${} = ${}",
            taxable_amount,
            bracket.lower_bound,
            bracket.marginal_rate,
            bracket.fixed_quota,
            isr_determined
        ),
    };

    let reconciliation = reconcile_isr(isr_determined, subsidy_caused);

    let reasoning = if reconciliation.isr_withheld > Decimal::ZERO {
        format!(
            "ISR ${} exceeds subsidy ${}, withholding ${}",
            isr_determined, subsidy_caused, reconciliation.isr_withheld
        )
    } else {
        format!(
            "Subsidy ${} covers ISR ${}, delivering ${}",
            subsidy_caused, isr_determined, reconciliation.subsidy_delivered
        )
    };

    let reconciliation_step = AuditStep {
        step_number: step_number + 1,
        rule_id: "isr_reconciliation".to_string(),
        rule_name: "ISR / Subsidy Reconciliation".to_string(),
        clause_ref: "LISR Art. 96; Decreto subsidio para el empleo".to_string(),
        input: serde_json::json!({
            "isr_determined": isr_determined.to_string(),
            "subsidy_caused": subsidy_caused.to_string()
        }),
        output: serde_json::json!({
            "isr_withheld": reconciliation.isr_withheld.to_string(),
            "subsidy_delivered": reconciliation.subsidy_delivered.to_string()
        }),
        reasoning,
    };

    IsrResult {
        isr_determined,
        reconciliation,
        audit_steps: vec![determination_step, reconciliation_step],
    }
}
