//! Cent quantization shared by every monetary formula.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to two decimals, half away from zero, and fixes the scale at 2.
///
/// # Examples
///
/// ```
/// use nomina_engine::calculation::quantize_cent;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(quantize_cent(Decimal::from_str("314.795").unwrap()).to_string(), "314.80");
/// assert_eq!(quantize_cent(Decimal::from(4500)).to_string(), "4500.00");
/// ```
pub fn quantize_cent(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
