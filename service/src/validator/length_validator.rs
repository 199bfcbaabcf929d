//! Length range validation

use metamodel_core::prelude::*;
use std::fmt;

/// Validates the element count of a value against inclusive bounds
///
/// Strings are measured in Unicode scalar values, arrays in elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthValidator {
    min: Option<usize>,
    max: Option<usize>,
}

impl LengthValidator {
    /// Create a length validator from declared bounds
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::InvalidValidatorSpec` if neither bound is
    /// given, a bound is negative, or `min > max`
    pub fn new(min: Option<i64>, max: Option<i64>) -> Result<Self> {
        if min.is_none() && max.is_none() {
            return Err(MetamodelError::invalid_validator(
                "length validator must specify minLength and/or maxLength",
            ));
        }
        let min = min.map(to_length).transpose()?;
        let max = max.map(to_length).transpose()?;
        if let (Some(min), Some(max)) = (min, max)
            && min > max
        {
            return Err(MetamodelError::invalid_validator(format!(
                "minLength {min} must be less than or equal to maxLength {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Inclusive minimum length
    #[must_use]
    pub fn min(&self) -> Option<usize> {
        self.min
    }

    /// Inclusive maximum length
    #[must_use]
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// Check a value's length against the bounds
    ///
    /// # Errors
    ///
    /// Returns a `ValidationFailure` if the value has no length or it falls outside the bounds
    pub fn validate(&self, identifier: &str, value: &Value) -> std::result::Result<(), ValidationFailure> {
        let length = match value {
            Value::String(s) => s.chars().count(),
            Value::Array(items) => items.len(),
            _ => {
                return Err(ValidationFailure::new(
                    identifier,
                    value.clone(),
                    "has no length",
                ));
            }
        };

        if let Some(min) = self.min
            && length < min
        {
            return Err(ValidationFailure::new(
                identifier,
                value.clone(),
                format!("is shorter than minimum length {min}"),
            ));
        }
        if let Some(max) = self.max
            && length > max
        {
            return Err(ValidationFailure::new(
                identifier,
                value.clone(),
                format!("is longer than maximum length {max}"),
            ));
        }
        Ok(())
    }
}

fn to_length(bound: i64) -> Result<usize> {
    usize::try_from(bound).map_err(|_| {
        MetamodelError::invalid_validator(format!("length bound {bound} must not be negative"))
    })
}

impl fmt::Display for LengthValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min = self.min.map(|b| b.to_string()).unwrap_or_default();
        let max = self.max.map(|b| b.to_string()).unwrap_or_default();
        write!(f, "length=[{min},{max}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_length_counts_chars() -> Result<()> {
        let validator = LengthValidator::new(Some(2), Some(3))?;
        assert!(validator.validate("s", &json!("ab")).is_ok());
        assert!(validator.validate("s", &json!("äöü")).is_ok());
        assert!(validator.validate("s", &json!("a")).is_err());
        assert!(validator.validate("s", &json!("abcd")).is_err());
        Ok(())
    }

    #[test]
    fn test_array_length() -> Result<()> {
        let validator = LengthValidator::new(None, Some(1))?;
        assert!(validator.validate("a", &json!([])).is_ok());
        assert!(validator.validate("a", &json!([1, 2])).is_err());
        Ok(())
    }

    #[test]
    fn test_invalid_specs() {
        assert!(LengthValidator::new(None, None).is_err());
        assert!(LengthValidator::new(Some(-1), None).is_err());
        assert!(LengthValidator::new(Some(5), Some(4)).is_err());
    }

    #[test]
    fn test_value_without_length() -> Result<()> {
        let validator = LengthValidator::new(Some(0), None)?;
        let failure = validator.validate("s", &json!(true)).unwrap_err();
        assert_eq!(failure.expected, "has no length");
        Ok(())
    }
}
