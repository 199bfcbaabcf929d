//! Declarative value validators
//!
//! A validator is a stateless rule built once from a declaration's validator
//! spec. Evaluating it against a data value yields either success or a
//! [`ValidationFailure`]; it never produces a model error.

pub mod length_validator;
pub mod number_validator;
pub mod string_validator;

pub use length_validator::LengthValidator;
pub use number_validator::NumberValidator;
pub use string_validator::StringValidator;

use metamodel_core::metamodel::{ValidatorClass, short_class_name};
use metamodel_core::prelude::*;
use std::fmt;

/// A compiled validator rule
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    /// Regular expression over strings
    String(StringValidator),
    /// Inclusive numeric range
    Number(NumberValidator),
    /// Inclusive length range
    Length(LengthValidator),
}

impl Validator {
    /// Build a validator from its declarative fragment
    ///
    /// When the fragment carries no `$class`, the variant is inferred from the
    /// keys present: `pattern`, then `lower`/`upper`, then
    /// `minLength`/`maxLength`.
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::InvalidValidatorSpec` if the fragment is empty,
    /// names an unknown class, has inverted bounds, or carries a pattern that
    /// fails to compile
    pub fn from_spec(spec: &ValidatorAst) -> Result<Self> {
        let class = match spec.class.as_deref() {
            Some(class) => ValidatorClass::parse(class).ok_or_else(|| {
                MetamodelError::invalid_validator(format!(
                    "unknown validator class '{}'",
                    short_class_name(class)
                ))
            })?,
            None => infer_class(spec)?,
        };

        match class {
            ValidatorClass::StringRegex => {
                let pattern = spec.pattern.as_deref().ok_or_else(|| {
                    MetamodelError::invalid_validator("string validator requires a pattern")
                })?;
                let flags = spec.flags.as_deref().unwrap_or_default();
                StringValidator::new(pattern, flags).map(Self::String)
            }
            ValidatorClass::Domain(kind) => {
                let validator = NumberValidator::new(spec.lower, spec.upper)?;
                if kind.is_integral() && !validator.has_integral_bounds() {
                    return Err(MetamodelError::invalid_validator(format!(
                        "{kind} range bounds must be whole numbers"
                    )));
                }
                Ok(Self::Number(validator))
            }
            ValidatorClass::StringLength => {
                LengthValidator::new(spec.min_length, spec.max_length).map(Self::Length)
            }
        }
    }

    /// Build a length rule, rejecting specs that describe any other rule
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::InvalidValidatorSpec` if the fragment is malformed
    /// or is not a length rule
    pub fn length_from_spec(spec: &ValidatorAst) -> Result<LengthValidator> {
        match Self::from_spec(spec)? {
            Self::Length(validator) => Ok(validator),
            other => Err(MetamodelError::invalid_validator(format!(
                "lengthValidator must be a length rule, found a {} rule",
                other.kind_name()
            ))),
        }
    }

    /// Check a data value against this rule
    ///
    /// # Errors
    ///
    /// Returns a `ValidationFailure` naming the identifier, the value and the
    /// rule that rejected it
    pub fn validate(&self, identifier: &str, value: &Value) -> std::result::Result<(), ValidationFailure> {
        match self {
            Self::String(v) => v.validate(identifier, value),
            Self::Number(v) => v.validate(identifier, value),
            Self::Length(v) => v.validate(identifier, value),
        }
    }

    /// Whether this rule can be attached to a property of the given primitive kind
    #[must_use]
    pub fn is_compatible_with(&self, primitive: PrimitiveType) -> bool {
        match self {
            Self::String(_) | Self::Length(_) => primitive == PrimitiveType::String,
            Self::Number(v) => {
                primitive.is_numeric() && (!primitive.is_integral() || v.has_integral_bounds())
            }
        }
    }

    /// Short name of the rule kind, for diagnostics
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Length(_) => "length",
        }
    }
}

fn infer_class(spec: &ValidatorAst) -> Result<ValidatorClass> {
    if spec.pattern.is_some() {
        Ok(ValidatorClass::StringRegex)
    } else if spec.lower.is_some() || spec.upper.is_some() {
        Ok(ValidatorClass::Domain(PrimitiveType::Double))
    } else if spec.min_length.is_some() || spec.max_length.is_some() {
        Ok(ValidatorClass::StringLength)
    } else {
        Err(MetamodelError::invalid_validator(
            "validator spec has no pattern, bounds or lengths",
        ))
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(v) => v.fmt(f),
            Self::Number(v) => v.fmt(f),
            Self::Length(v) => v.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(value: Value) -> ValidatorAst {
        serde_json::from_value(value).expect("valid validator spec")
    }

    #[test]
    fn test_infers_string_validator() -> Result<()> {
        let validator = Validator::from_spec(&spec(json!({ "pattern": "^suchValidator$", "flags": "" })))?;
        assert!(matches!(validator, Validator::String(_)));
        assert!(validator.validate("id", &json!("suchValidator")).is_ok());
        Ok(())
    }

    #[test]
    fn test_infers_number_and_length_validators() -> Result<()> {
        let number = Validator::from_spec(&spec(json!({ "lower": 1, "upper": 3 })))?;
        assert!(matches!(number, Validator::Number(_)));

        let length = Validator::from_spec(&spec(json!({ "maxLength": 5 })))?;
        assert!(matches!(length, Validator::Length(_)));
        Ok(())
    }

    #[test]
    fn test_explicit_class() -> Result<()> {
        let validator = Validator::from_spec(&spec(json!({
            "$class": "concerto.metamodel@1.0.0.IntegerDomainValidator",
            "lower": 0,
            "upper": 100
        })))?;
        assert!(validator.is_compatible_with(PrimitiveType::Integer));
        assert!(!validator.is_compatible_with(PrimitiveType::String));

        let err = Validator::from_spec(&spec(json!({
            "$class": "concerto.metamodel@1.0.0.IntegerDomainValidator",
            "lower": 0.5
        })));
        assert!(matches!(err, Err(MetamodelError::InvalidValidatorSpec { .. })));
        Ok(())
    }

    #[test]
    fn test_rejects_empty_and_unknown() {
        assert!(Validator::from_spec(&ValidatorAst::default()).is_err());
        assert!(Validator::from_spec(&spec(json!({ "$class": "FancyValidator", "pattern": "x" }))).is_err());
        assert!(
            Validator::from_spec(&spec(json!({ "$class": "StringRegexValidator" }))).is_err()
        );
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = Validator::from_spec(&spec(json!({ "lower": 10, "upper": 1 })));
        assert!(matches!(err, Err(MetamodelError::InvalidValidatorSpec { .. })));

        let err = Validator::from_spec(&spec(json!({ "minLength": 10, "maxLength": 1 })));
        assert!(matches!(err, Err(MetamodelError::InvalidValidatorSpec { .. })));
    }

    #[test]
    fn test_compatibility() -> Result<()> {
        let fractional = Validator::from_spec(&spec(json!({ "lower": 0.5 })))?;
        assert!(fractional.is_compatible_with(PrimitiveType::Double));
        assert!(!fractional.is_compatible_with(PrimitiveType::Long));

        let pattern = Validator::from_spec(&spec(json!({ "pattern": "x" })))?;
        assert!(pattern.is_compatible_with(PrimitiveType::String));
        assert!(!pattern.is_compatible_with(PrimitiveType::DateTime));
        Ok(())
    }
}
