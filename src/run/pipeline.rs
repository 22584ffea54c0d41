//! The per-employee receipt pipeline.
//!
//! Runs period wages, employment subsidy, ISR bracket lookup, ISR
//! determination and reconciliation, IMSS contributions and net pay in
//! order, numbering the audit steps as it goes.

use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::calculation::{
    NetPayInputs, apply_net_pay, calculate_employment_subsidy, calculate_imss, calculate_isr,
    calculate_period_wages, quantize_cent, resolve_bracket,
};
use crate::config::FiscalConstants;
use crate::error::PayrollResult;
use crate::models::{AuditStep, AuditTrace, Employee, IsrTariff, Receipt, UmaReference};

/// The fiscal reference data a run computes against.
#[derive(Debug, Clone)]
pub struct FiscalContext {
    /// The fiscal year the tables belong to.
    pub fiscal_year: i32,
    /// The UMA reference of the year.
    pub uma: UmaReference,
    /// The ISR tariff of the year.
    pub tariff: IsrTariff,
}

/// What the pipeline did with one employee.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiptOutcome {
    /// A receipt was computed.
    Computed(Box<Receipt>),
    /// The employee has a zero wage or no pay period and was left out.
    Skipped,
}

/// Computes the receipt of one employee.
///
/// Employees without a payable period are skipped rather than failed.
///
/// # Errors
///
/// - `InvalidEmployee` for a negative wage
/// - `UnsupportedPayPeriod`, `BracketTableMissing` or `BracketNotFound`
///   from the bracket lookup
pub fn compute_receipt(
    employee: &Employee,
    run_id: Uuid,
    ctx: &FiscalContext,
    constants: &FiscalConstants,
) -> PayrollResult<ReceiptOutcome> {
    employee.validate()?;

    let Some(days) = employee.payable_period_days() else {
        debug!(employee_id = %employee.id, "Employee has no payable period");
        return Ok(ReceiptOutcome::Skipped);
    };

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut step_number: u32 = 1;

    let wages = calculate_period_wages(employee.daily_wage, days, step_number);
    let taxable_wages = wages.taxable_wages;
    steps.push(wages.audit_step);
    step_number += 1;

    let subsidy = calculate_employment_subsidy(&ctx.uma, days, taxable_wages, step_number);
    let subsidy_caused = subsidy.subsidy_caused;
    steps.push(subsidy.audit_step);
    step_number += 1;

    let resolution = resolve_bracket(&ctx.tariff, days, taxable_wages, step_number)?;
    steps.push(resolution.audit_step);
    step_number += 1;

    let isr = calculate_isr(&resolution.bracket, taxable_wages, subsidy_caused, step_number);
    let steps_count = isr.audit_steps.len();
    steps.extend(isr.audit_steps);
    step_number += steps_count as u32;

    let imss = calculate_imss(employee.daily_wage, days, &ctx.uma, constants, step_number);
    let social_security = imss.contributions.total;
    steps.push(imss.audit_step);
    step_number += 1;

    let exempt_income = quantize_cent(Decimal::ZERO);
    let net = apply_net_pay(
        NetPayInputs {
            taxable_income: taxable_wages,
            exempt_income,
            subsidy_delivered: isr.reconciliation.subsidy_delivered,
            isr_withheld: isr.reconciliation.isr_withheld,
            social_security,
        },
        step_number,
    );
    steps.push(net.audit_step);

    debug!(
        employee_id = %employee.id,
        frequency = %resolution.frequency,
        taxable_wages = %taxable_wages,
        net_pay = %net.net_pay,
        "Computed receipt"
    );

    Ok(ReceiptOutcome::Computed(Box::new(Receipt {
        run_id,
        employee_id: employee.id.clone(),
        pay_period_days: days,
        daily_wage: employee.daily_wage,
        daily_integrated_wage: employee.daily_integrated_wage,
        taxable_wages,
        exempt_income,
        isr_determined: isr.isr_determined,
        isr_withheld: isr.reconciliation.isr_withheld,
        subsidy_caused,
        subsidy_delivered: isr.reconciliation.subsidy_delivered,
        social_security_withheld: social_security,
        net_pay: net.net_pay,
        audit_trace: AuditTrace { steps },
    })))
}
