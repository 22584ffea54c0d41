//! Receipt models for the payroll engine.
//!
//! This module contains the [`Receipt`] produced for each employee of a
//! payroll run, and the [`AuditTrace`] that records how every amount on it
//! was derived.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::calculate_net_pay;

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statute article for this rule.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The complete audit trace for one receipt.
///
/// # Example
///
/// ```
/// use nomina_engine::models::AuditTrace;
///
/// let trace = AuditTrace { steps: vec![] };
/// assert!(trace.step("isr_reconciliation").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
}

impl AuditTrace {
    /// Returns the first step recorded for a rule.
    pub fn step(&self, rule_id: &str) -> Option<&AuditStep> {
        self.steps.iter().find(|s| s.rule_id == rule_id)
    }
}

/// The payroll receipt of one employee in one run.
///
/// All monetary fields carry exactly two fractional digits. Receipts are
/// never edited; a correction requires a new run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// The payroll run the receipt belongs to.
    pub run_id: Uuid,
    /// The employee paid.
    pub employee_id: String,
    /// Days paid in the period.
    pub pay_period_days: u32,
    /// Daily wage (SD) at generation time.
    pub daily_wage: Decimal,
    /// Daily integrated wage (SDI) at generation time.
    pub daily_integrated_wage: Decimal,
    /// Taxable wages of the period.
    pub taxable_wages: Decimal,
    /// Exempt income of the period.
    pub exempt_income: Decimal,
    /// ISR from the Art. 96 tariff before subsidy.
    pub isr_determined: Decimal,
    /// ISR actually withheld.
    pub isr_withheld: Decimal,
    /// Employment subsidy the worker is entitled to.
    pub subsidy_caused: Decimal,
    /// Employment subsidy paid out in cash.
    pub subsidy_delivered: Decimal,
    /// IMSS worker contributions withheld.
    pub social_security_withheld: Decimal,
    /// Net pay.
    pub net_pay: Decimal,
    /// How each amount was derived.
    pub audit_trace: AuditTrace,
}

impl Receipt {
    /// Total income of the period (taxable plus exempt).
    pub fn total_income(&self) -> Decimal {
        self.taxable_wages + self.exempt_income
    }

    /// Recomputes net pay from the stored components.
    ///
    /// For every receipt produced by the engine this equals `net_pay`.
    pub fn recomputed_net_pay(&self) -> Decimal {
        calculate_net_pay(
            self.taxable_wages,
            self.exempt_income,
            self.subsidy_delivered,
            self.isr_withheld,
            self.social_security_withheld,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_receipt() -> Receipt {
        Receipt {
            run_id: Uuid::new_v4(),
            employee_id: "emp_001".to_string(),
            pay_period_days: 15,
            daily_wage: dec("300.00"),
            daily_integrated_wage: dec("314.79"),
            taxable_wages: dec("4500.00"),
            exempt_income: dec("0.00"),
            isr_determined: dec("333.12"),
            isr_withheld: dec("140.63"),
            subsidy_caused: dec("192.49"),
            subsidy_delivered: dec("0.00"),
            social_security_withheld: dec("112.14"),
            net_pay: dec("4247.23"),
            audit_trace: AuditTrace::default(),
        }
    }

    /// RC-001: net pay recomputed from components matches stored value
    #[test]
    fn test_recomputed_net_pay_matches_stored() {
        let receipt = create_sample_receipt();
        assert_eq!(receipt.recomputed_net_pay(), receipt.net_pay);
        assert_eq!(receipt.total_income(), dec("4500.00"));
    }

    #[test]
    fn test_receipt_serializes_money_as_strings() {
        let receipt = create_sample_receipt();
        let json = serde_json::to_value(&receipt).unwrap();

        assert_eq!(json["net_pay"].as_str().unwrap(), "4247.23");
        assert_eq!(json["isr_withheld"].as_str().unwrap(), "140.63");
        assert_eq!(json["pay_period_days"].as_u64().unwrap(), 15);
    }

    #[test]
    fn test_receipt_round_trips_through_json() {
        let receipt = create_sample_receipt();
        let json = serde_json::to_string(&receipt).unwrap();
        let deserialized: Receipt = serde_json::from_str(&json).unwrap();
        assert_eq!(receipt, deserialized);
    }

    #[test]
    fn test_audit_trace_finds_step_by_rule() {
        let trace = AuditTrace {
            steps: vec![AuditStep {
                step_number: 1,
                rule_id: "period_wages".to_string(),
                rule_name: "Period Wages".to_string(),
                clause_ref: "LISR Art. 94".to_string(),
                input: serde_json::json!({}),
                output: serde_json::json!({"taxable_wages": "4500.00"}),
                reasoning: "$300.00 x 15 days = $4500.00".to_string(),
            }],
        };

        let step = trace.step("period_wages").unwrap();
        assert_eq!(step.output["taxable_wages"].as_str().unwrap(), "4500.00");
        assert!(trace.step("imss_worker_contributions").is_none());
    }
}
