//! Salary integration factor.
//!
//! The integration factor turns a daily wage (SD) into the daily integrated
//! wage (SDI) by spreading the statutory annual bonus and vacation premium
//! over the year.

use rust_decimal::Decimal;

use crate::config::FiscalConstants;

use super::rounding::quantize_cent;

/// Returns the SDI integration factor.
///
/// `(days_in_year + bonus_days + vacation_days × vacation_premium_rate) / days_in_year`
///
/// The result is not rounded; it depends only on the statutory constants and
/// is at least 1 for non-negative benefit days.
///
/// # Examples
///
/// ```
/// use nomina_engine::calculation::integration_factor;
/// use nomina_engine::config::FiscalConstants;
/// use rust_decimal::Decimal;
///
/// let factor = integration_factor(&FiscalConstants::default());
/// assert_eq!(factor.round_dp(6), Decimal::new(1_049_315, 6));
/// ```
pub fn integration_factor(constants: &FiscalConstants) -> Decimal {
    let benefit_days = constants.bonus_days + constants.vacation_days * constants.vacation_premium_rate;
    (constants.days_in_year + benefit_days) / constants.days_in_year
}

/// Returns the daily integrated wage, `round(daily_wage × factor, 2)`.
pub fn daily_integrated_wage(daily_wage: Decimal, constants: &FiscalConstants) -> Decimal {
    quantize_cent(daily_wage * integration_factor(constants))
}
