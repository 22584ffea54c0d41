//! Employee model and its organizational dimensions.
//!
//! This module defines the [`Employee`] master record together with the
//! [`Position`] and [`Department`] that scope employees and payroll runs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::daily_integrated_wage;
use crate::config::FiscalConstants;
use crate::error::{PayrollError, PayrollResult};

/// A position (plaza) an employee occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Unique identifier for the position.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Soft-deactivation flag.
    pub active: bool,
}

/// A department employees belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Unique identifier for the department.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Soft-deactivation flag.
    pub active: bool,
}

/// An employee as maintained by the master-data layer.
///
/// `daily_integrated_wage` is derived from `daily_wage`; build employees with
/// [`Employee::new`] and change wages with [`Employee::set_daily_wage`] so
/// the two never drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The position the employee occupies.
    pub position_id: String,
    /// The department the employee belongs to.
    pub department_id: String,
    /// Federal taxpayer registry code.
    #[serde(default)]
    pub rfc: String,
    /// Full name.
    #[serde(default)]
    pub full_name: String,
    /// Daily wage (SD).
    pub daily_wage: Decimal,
    /// Daily integrated wage (SDI), `round(SD × integration factor, 2)`.
    pub daily_integrated_wage: Decimal,
    /// Days paid per period; `None` when not configured.
    pub pay_period_days: Option<u32>,
    /// Whether the employee is active.
    pub active: bool,
}

impl Employee {
    /// Creates an active employee, deriving the SDI from the daily wage.
    ///
    /// # Examples
    ///
    /// ```
    /// use nomina_engine::config::FiscalConstants;
    /// use nomina_engine::models::Employee;
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    ///
    /// let employee = Employee::new(
    ///     "emp_001",
    ///     "pos_ops",
    ///     "dep_ops",
    ///     Decimal::from_str("300.00").unwrap(),
    ///     Some(15),
    ///     &FiscalConstants::default(),
    /// );
    /// assert_eq!(employee.daily_integrated_wage, Decimal::from_str("314.79").unwrap());
    /// ```
    pub fn new(
        id: impl Into<String>,
        position_id: impl Into<String>,
        department_id: impl Into<String>,
        daily_wage: Decimal,
        pay_period_days: Option<u32>,
        constants: &FiscalConstants,
    ) -> Self {
        Self {
            id: id.into(),
            position_id: position_id.into(),
            department_id: department_id.into(),
            rfc: String::new(),
            full_name: String::new(),
            daily_wage,
            daily_integrated_wage: daily_integrated_wage(daily_wage, constants),
            pay_period_days,
            active: true,
        }
    }

    /// Sets the daily wage and recomputes the SDI.
    pub fn set_daily_wage(&mut self, daily_wage: Decimal, constants: &FiscalConstants) {
        self.daily_wage = daily_wage;
        self.daily_integrated_wage = daily_integrated_wage(daily_wage, constants);
    }

    /// Returns the pay-period length if the employee can be paid in a run.
    ///
    /// Employees with a zero wage or a zero/unset period are left out of
    /// payroll runs; this is an expected omission, not an error.
    pub fn payable_period_days(&self) -> Option<u32> {
        match self.pay_period_days {
            Some(days) if days > 0 && !self.daily_wage.is_zero() => Some(days),
            _ => None,
        }
    }

    /// Validates the wage fields.
    pub fn validate(&self) -> PayrollResult<()> {
        if self.daily_wage < Decimal::ZERO {
            return Err(PayrollError::InvalidEmployee {
                employee_id: self.id.clone(),
                field: "daily_wage".to_string(),
                message: format!("must not be negative, got {}", self.daily_wage),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_employee(daily_wage: &str, pay_period_days: Option<u32>) -> Employee {
        Employee::new(
            "emp_001",
            "pos_ops",
            "dep_ops",
            dec(daily_wage),
            pay_period_days,
            &FiscalConstants::default(),
        )
    }

    /// EMP-001: SDI derived on creation
    #[test]
    fn test_new_derives_sdi() {
        let employee = create_test_employee("300.00", Some(15));
        assert_eq!(employee.daily_integrated_wage, dec("314.79"));
        assert!(employee.active);
    }

    /// EMP-002: SDI recomputed whenever the wage is set
    #[test]
    fn test_set_daily_wage_recomputes_sdi() {
        let mut employee = create_test_employee("300.00", Some(15));
        employee.set_daily_wage(dec("250.00"), &FiscalConstants::default());

        assert_eq!(employee.daily_wage, dec("250.00"));
        assert_eq!(employee.daily_integrated_wage, dec("262.33"));
    }

    #[test]
    fn test_set_daily_wage_uses_given_constants() {
        let mut employee = create_test_employee("300.00", Some(15));
        let constants = FiscalConstants {
            vacation_days: dec("0"),
            bonus_days: dec("0"),
            ..FiscalConstants::default()
        };
        employee.set_daily_wage(dec("300.00"), &constants);

        assert_eq!(employee.daily_integrated_wage, dec("300.00"));
    }

    #[test]
    fn test_payable_period_days_for_regular_employee() {
        let employee = create_test_employee("300.00", Some(7));
        assert_eq!(employee.payable_period_days(), Some(7));
    }

    #[test]
    fn test_zero_wage_is_not_payable() {
        let employee = create_test_employee("0.00", Some(15));
        assert_eq!(employee.payable_period_days(), None);
    }

    #[test]
    fn test_zero_or_missing_period_is_not_payable() {
        assert_eq!(
            create_test_employee("300.00", Some(0)).payable_period_days(),
            None
        );
        assert_eq!(
            create_test_employee("300.00", None).payable_period_days(),
            None
        );
    }

    #[test]
    fn test_negative_wage_fails_validation() {
        let employee = create_test_employee("-1.00", Some(15));
        match employee.validate() {
            Err(PayrollError::InvalidEmployee { field, .. }) => assert_eq!(field, "daily_wage"),
            other => panic!("Expected InvalidEmployee, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_employee_without_period() {
        let json = r#"{
            "id": "emp_002",
            "position_id": "pos_ops",
            "department_id": "dep_ops",
            "daily_wage": "278.80",
            "daily_integrated_wage": "292.55",
            "pay_period_days": null,
            "active": true
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.daily_wage, dec("278.80"));
        assert_eq!(employee.pay_period_days, None);
        assert!(employee.rfc.is_empty());
    }
}
