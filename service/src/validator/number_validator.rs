//! Numeric range validation

use metamodel_core::prelude::*;
use std::fmt;

/// Validates numeric values against inclusive bounds
///
/// An absent bound leaves that side open.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberValidator {
    lower: Option<f64>,
    upper: Option<f64>,
}

impl NumberValidator {
    /// Create a range validator
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::InvalidValidatorSpec` if neither bound is
    /// given, a bound is not finite, or `lower > upper`
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Result<Self> {
        if lower.is_none() && upper.is_none() {
            return Err(MetamodelError::invalid_validator(
                "invalid range, lower and/or upper bound must be specified",
            ));
        }
        if lower.into_iter().chain(upper).any(|b| !b.is_finite()) {
            return Err(MetamodelError::invalid_validator(
                "range bounds must be finite numbers",
            ));
        }
        if let (Some(lower), Some(upper)) = (lower, upper)
            && lower > upper
        {
            return Err(MetamodelError::invalid_validator(format!(
                "lower bound {lower} must be less than or equal to upper bound {upper}"
            )));
        }
        Ok(Self { lower, upper })
    }

    /// Inclusive lower bound
    #[must_use]
    pub fn lower(&self) -> Option<f64> {
        self.lower
    }

    /// Inclusive upper bound
    #[must_use]
    pub fn upper(&self) -> Option<f64> {
        self.upper
    }

    /// Whether both bounds are whole numbers
    #[must_use]
    pub fn has_integral_bounds(&self) -> bool {
        self.lower.into_iter().chain(self.upper).all(|b| b.fract() == 0.0)
    }

    /// Check a value against the range
    ///
    /// # Errors
    ///
    /// Returns a `ValidationFailure` if the value is not a number or falls outside the range
    pub fn validate(&self, identifier: &str, value: &Value) -> std::result::Result<(), ValidationFailure> {
        let Some(number) = value.as_f64() else {
            return Err(ValidationFailure::new(
                identifier,
                value.clone(),
                "is not a number",
            ));
        };

        if let Some(lower) = self.lower
            && number < lower
        {
            return Err(ValidationFailure::new(
                identifier,
                value.clone(),
                format!("is outside lower bound {lower}"),
            ));
        }
        if let Some(upper) = self.upper
            && number > upper
        {
            return Err(ValidationFailure::new(
                identifier,
                value.clone(),
                format!("is outside upper bound {upper}"),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for NumberValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lower = self.lower.map(|b| b.to_string()).unwrap_or_default();
        let upper = self.upper.map(|b| b.to_string()).unwrap_or_default();
        write!(f, "range=[{lower},{upper}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_closed_range() -> Result<()> {
        let validator = NumberValidator::new(Some(0.0), Some(10.0))?;
        assert!(validator.validate("n", &json!(0)).is_ok());
        assert!(validator.validate("n", &json!(10)).is_ok());
        assert!(validator.validate("n", &json!(5.5)).is_ok());

        let failure = validator.validate("n", &json!(11)).unwrap_err();
        assert_eq!(failure.expected, "is outside upper bound 10");
        let failure = validator.validate("n", &json!(-1)).unwrap_err();
        assert_eq!(failure.expected, "is outside lower bound 0");
        Ok(())
    }

    #[test]
    fn test_open_sides() -> Result<()> {
        let at_least = NumberValidator::new(Some(1.0), None)?;
        assert!(at_least.validate("n", &json!(i64::MAX)).is_ok());
        assert!(at_least.validate("n", &json!(0)).is_err());

        let at_most = NumberValidator::new(None, Some(1.0))?;
        assert!(at_most.validate("n", &json!(-1e9)).is_ok());
        assert!(at_most.validate("n", &json!(2)).is_err());
        Ok(())
    }

    #[test]
    fn test_invalid_specs() {
        assert!(NumberValidator::new(None, None).is_err());
        assert!(NumberValidator::new(Some(2.0), Some(1.0)).is_err());
        assert!(NumberValidator::new(Some(f64::NAN), None).is_err());
        assert!(NumberValidator::new(Some(1.0), Some(1.0)).is_ok());
    }

    #[test]
    fn test_non_number_rejected() -> Result<()> {
        let validator = NumberValidator::new(Some(0.0), None)?;
        assert!(validator.validate("n", &json!("5")).is_err());
        Ok(())
    }

    #[test]
    fn test_display() -> Result<()> {
        assert_eq!(NumberValidator::new(Some(1.0), None)?.to_string(), "range=[1,]");
        assert_eq!(NumberValidator::new(Some(0.5), Some(2.0))?.to_string(), "range=[0.5,2]");
        Ok(())
    }
}
