//! Error types for metamodel introspection
//!
//! Structural errors ([`MetamodelError`]) abort model construction or the
//! global validation pass. Instance-level rejections are reported separately
//! through [`ValidationFailure`] so that a bad data value never invalidates
//! the model itself.

use serde_json::Value;
use thiserror::Error;

/// Main error type for model construction and validation
#[derive(Error, Debug)]
pub enum MetamodelError {
    /// A referenced type (super type, property type, import target) cannot be located
    #[error("Type '{type_name}' not found{}", format_context(.context.as_deref()))]
    TypeNotFound {
        /// Name of the missing type as it was referenced
        type_name: String,
        /// Where the reference occurred
        context: Option<String>,
    },

    /// Two declarations in one model file share a name
    #[error("Duplicate declaration name '{name}' in namespace '{namespace}'")]
    DuplicateDeclarationName {
        /// Namespace of the model file
        namespace: String,
        /// Colliding declaration name
        name: String,
    },

    /// Two properties of one declaration share a name
    #[error("Duplicate property name '{property}' in declaration '{declaration}'")]
    DuplicatePropertyName {
        /// Fully qualified declaration name
        declaration: String,
        /// Colliding property name
        property: String,
    },

    /// A namespace was registered twice with the same model manager
    #[error("Namespace '{0}' is already registered")]
    DuplicateNamespace(String),

    /// The super type chain of a declaration revisits itself
    #[error("Circular inheritance detected for '{declaration}': {}", .chain.join(" -> "))]
    CircularInheritance {
        /// Fully qualified declaration name
        declaration: String,
        /// Chain of fully qualified names that closed the cycle
        chain: Vec<String>,
    },

    /// Malformed property fragment or incompatible property/type pairing
    #[error("Illegal property '{property}'{}: {message}", format_context(.declaration.as_deref()))]
    IllegalProperty {
        /// Property name (may be empty if the fragment had none)
        property: String,
        /// Owning declaration, when known
        declaration: Option<String>,
        /// What is wrong with it
        message: String,
    },

    /// Malformed declaration fragment or illegal declaration structure
    #[error("Illegal declaration '{declaration}': {message}")]
    IllegalDeclaration {
        /// Declaration name (fully qualified when known)
        declaration: String,
        /// What is wrong with it
        message: String,
    },

    /// Malformed validator spec (inverted bounds, bad pattern, unknown flag)
    #[error("Invalid validator spec: {message}")]
    InvalidValidatorSpec {
        /// What is wrong with it
        message: String,
        /// Offending pattern, if any
        pattern: Option<String>,
    },

    /// Malformed model or import fragment
    #[error("Illegal model: {message}")]
    IllegalModel {
        /// What is wrong with it
        message: String,
        /// Namespace of the model, when known
        namespace: Option<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

fn format_context(context: Option<&str>) -> String {
    context.map(|c| format!(" (in {c})")).unwrap_or_default()
}

/// Result type alias for metamodel operations
pub type Result<T> = std::result::Result<T, MetamodelError>;

impl MetamodelError {
    /// Create a type-not-found error without context
    #[must_use]
    pub fn type_not_found(type_name: impl Into<String>) -> Self {
        Self::TypeNotFound {
            type_name: type_name.into(),
            context: None,
        }
    }

    /// Create a type-not-found error naming where the reference occurred
    #[must_use]
    pub fn type_not_found_in(type_name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::TypeNotFound {
            type_name: type_name.into(),
            context: Some(context.into()),
        }
    }

    /// Create a duplicate declaration error
    #[must_use]
    pub fn duplicate_declaration(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateDeclarationName {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Create a duplicate property error
    #[must_use]
    pub fn duplicate_property(declaration: impl Into<String>, property: impl Into<String>) -> Self {
        Self::DuplicatePropertyName {
            declaration: declaration.into(),
            property: property.into(),
        }
    }

    /// Create a circular inheritance error
    #[must_use]
    pub fn circular_inheritance(declaration: impl Into<String>, chain: Vec<String>) -> Self {
        Self::CircularInheritance {
            declaration: declaration.into(),
            chain,
        }
    }

    /// Create an illegal property error for a property whose owner is not known yet
    #[must_use]
    pub fn illegal_property(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::IllegalProperty {
            property: property.into(),
            declaration: None,
            message: message.into(),
        }
    }

    /// Create an illegal property error inside a known declaration
    #[must_use]
    pub fn illegal_property_in(
        declaration: impl Into<String>,
        property: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::IllegalProperty {
            property: property.into(),
            declaration: Some(declaration.into()),
            message: message.into(),
        }
    }

    /// Create an illegal declaration error
    #[must_use]
    pub fn illegal_declaration(declaration: impl Into<String>, message: impl Into<String>) -> Self {
        Self::IllegalDeclaration {
            declaration: declaration.into(),
            message: message.into(),
        }
    }

    /// Create an invalid validator spec error
    #[must_use]
    pub fn invalid_validator(message: impl Into<String>) -> Self {
        Self::InvalidValidatorSpec {
            message: message.into(),
            pattern: None,
        }
    }

    /// Create an illegal model error
    #[must_use]
    pub fn illegal_model(message: impl Into<String>) -> Self {
        Self::IllegalModel {
            message: message.into(),
            namespace: None,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Attach the owning declaration to an [`MetamodelError::IllegalProperty`].
    ///
    /// Other variants pass through unchanged.
    #[must_use]
    pub fn within_declaration(self, declaration: &str) -> Self {
        match self {
            Self::IllegalProperty {
                property,
                declaration: None,
                message,
            } => Self::IllegalProperty {
                property,
                declaration: Some(declaration.to_string()),
                message,
            },
            Self::TypeNotFound {
                type_name,
                context: None,
            } => Self::TypeNotFound {
                type_name,
                context: Some(declaration.to_string()),
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for MetamodelError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for MetamodelError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A data value rejected by a validator
///
/// This is a value-level outcome, not a model error.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Validator error for field '{identifier}': value {value} {expected}")]
pub struct ValidationFailure {
    /// Field identifier the value was supplied for
    pub identifier: String,
    /// Rejected value
    pub value: Value,
    /// Description of the rule that rejected the value
    pub expected: String,
}

impl ValidationFailure {
    /// Create a new validation failure
    #[must_use]
    pub fn new(identifier: impl Into<String>, value: Value, expected: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            value,
            expected: expected.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_creation() {
        let err = MetamodelError::type_not_found("org.acme.Missing");
        assert!(matches!(err, MetamodelError::TypeNotFound { .. }));

        let err = MetamodelError::type_not_found_in("Missing", "super type of org.acme.Car");
        match err {
            MetamodelError::TypeNotFound { context, .. } => {
                assert_eq!(context.as_deref(), Some("super type of org.acme.Car"));
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = MetamodelError::circular_inheritance(
            "org.acme.A",
            vec!["org.acme.A".into(), "org.acme.B".into(), "org.acme.A".into()],
        );
        assert_eq!(
            err.to_string(),
            "Circular inheritance detected for 'org.acme.A': org.acme.A -> org.acme.B -> org.acme.A"
        );

        let err = MetamodelError::illegal_property_in("org.acme.Car", "vin", "bad default");
        assert_eq!(
            err.to_string(),
            "Illegal property 'vin' (in org.acme.Car): bad default"
        );
    }

    #[test]
    fn test_within_declaration_fills_missing_owner_only() {
        let err = MetamodelError::illegal_property("vin", "bad").within_declaration("org.acme.Car");
        assert!(matches!(
            err,
            MetamodelError::IllegalProperty { declaration: Some(ref d), .. } if d == "org.acme.Car"
        ));

        let err = MetamodelError::DuplicateNamespace("org.acme".into()).within_declaration("x");
        assert!(matches!(err, MetamodelError::DuplicateNamespace(_)));
    }

    #[test]
    fn test_error_conversions() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: MetamodelError = json_err.into();
        assert!(matches!(err, MetamodelError::SerializationError(_)));
    }

    #[test]
    fn test_validation_failure_display() {
        let failure = ValidationFailure::new("id", json!("abc"), "does not match /^x$/");
        assert_eq!(
            failure.to_string(),
            "Validator error for field 'id': value \"abc\" does not match /^x$/"
        );
    }
}
