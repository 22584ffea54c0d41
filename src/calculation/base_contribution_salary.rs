//! Base contribution salary (SBC).
//!
//! This module derives the capped daily wage base used by the IMSS
//! contribution formulas, as per LSS Art. 27 and 28.

use rust_decimal::Decimal;

use crate::config::FiscalConstants;
use crate::models::UmaReference;

use super::rounding::quantize_cent;

/// Returns the base contribution salary for a daily wage.
///
/// The daily wage is integrated with the proportional daily share of the
/// annual bonus and of the vacation premium:
///
/// ```text
/// sbc = sd + bonus_days × sd / days_in_year
///          + vacation_days × sd × vacation_premium_rate / days_in_year
/// ```
///
/// The sum is capped at 25 daily UMA and then rounded to the cent. The cap
/// applies to the integrated sum, never to the parts.
///
/// # Examples
///
/// ```
/// use nomina_engine::calculation::base_contribution_salary;
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
/// let sbc = base_contribution_salary(
///     Decimal::from_str("300.00").unwrap(),
///     &uma,
///     &FiscalConstants::default(),
/// );
/// assert_eq!(sbc, Decimal::from_str("314.79").unwrap());
/// ```
pub fn base_contribution_salary(
    daily_wage: Decimal,
    uma: &UmaReference,
    constants: &FiscalConstants,
) -> Decimal {
    let proportional_bonus = constants.bonus_days * daily_wage / constants.days_in_year;
    let proportional_premium =
        constants.vacation_days * daily_wage * constants.vacation_premium_rate / constants.days_in_year;

    let integrated = daily_wage + proportional_bonus + proportional_premium;
    quantize_cent(integrated.min(uma.contribution_cap()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn uma_2024() -> UmaReference {
        UmaReference {
            fiscal_year: 2024,
            daily_value: dec("108.57"),
            monthly_conversion_factor: dec("30.4"),
            subsidy_percentage: dec("11.82"),
            income_ceiling: dec("9081.00"),
            active: true,
        }
    }

    /// SBC-001: 300.00 wage stays under the cap
    #[test]
    fn test_sbc_for_300_daily_wage() {
        let sbc = base_contribution_salary(dec("300.00"), &uma_2024(), &FiscalConstants::default());
        // 300 + 12.3288 + 2.4658
        assert_eq!(sbc, dec("314.79"));
    }

    /// SBC-002: wages above the cap are limited to 25 UMA exactly
    #[test]
    fn test_sbc_capped_at_25_uma() {
        let sbc = base_contribution_salary(dec("5000.00"), &uma_2024(), &FiscalConstants::default());
        assert_eq!(sbc, dec("2714.25"));
    }

    /// SBC-003: the cap applies after integration
    #[test]
    fn test_cap_applies_to_integrated_sum() {
        // 2600 alone is under the 2714.25 cap; integrated it is 2728.22
        let sbc = base_contribution_salary(dec("2600.00"), &uma_2024(), &FiscalConstants::default());
        assert_eq!(sbc, dec("2714.25"));
    }

    #[test]
    fn test_sbc_matches_sdi_below_cap() {
        let constants = FiscalConstants::default();
        let wage = dec("278.80");
        let sbc = base_contribution_salary(wage, &uma_2024(), &constants);
        assert_eq!(sbc, crate::calculation::daily_integrated_wage(wage, &constants));
    }

    #[test]
    fn test_sbc_of_zero_wage_is_zero() {
        let sbc = base_contribution_salary(Decimal::ZERO, &uma_2024(), &FiscalConstants::default());
        assert_eq!(sbc, dec("0.00"));
    }
}
