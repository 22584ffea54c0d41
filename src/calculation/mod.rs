//! Calculation logic for the payroll engine.
//!
//! This module contains the per-employee formula chain: the salary
//! integration factor, base contribution salary, period wages, employment
//! subsidy, ISR bracket lookup, ISR determination and reconciliation, IMSS
//! worker contributions and net pay. All functions are pure; monetary
//! outputs are quantized to the cent with [`quantize_cent`].

mod base_contribution_salary;
mod employment_subsidy;
mod imss;
mod integration_factor;
mod isr;
mod isr_bracket;
mod net_pay;
mod period_wages;
mod rounding;

pub use base_contribution_salary::base_contribution_salary;
pub use employment_subsidy::{
    EmploymentSubsidyResult, calculate_employment_subsidy, employment_subsidy,
};
pub use imss::{
    CASH_BENEFITS_RATE, DISABILITY_LIFE_RATE, IN_KIND_EXCESS_RATE, IN_KIND_THRESHOLD_UMA_MULTIPLE,
    ImssContributions, ImssResult, PENSIONER_MEDICAL_RATE, RETIREMENT_RATE, calculate_imss,
    imss_worker_contributions,
};
pub use integration_factor::{daily_integrated_wage, integration_factor};
pub use isr::{IsrReconciliation, IsrResult, calculate_isr, determine_isr, reconcile_isr};
pub use isr_bracket::{BracketResolution, find_bracket, resolve_bracket};
pub use net_pay::{NetPayInputs, NetPayResult, apply_net_pay, calculate_net_pay};
pub use period_wages::{PeriodWagesResult, calculate_period_wages};
pub use rounding::quantize_cent;
