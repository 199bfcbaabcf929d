//! Scalar unboxing
//!
//! A property typed by a named scalar behaves as if it were typed by the
//! scalar's primitive kind. The declared property is never modified; the
//! effective view is a new value.

use super::declaration::Declaration;
use super::property::{Property, PropertyKind, is_representable};
use super::type_name::TypeRef;
use crate::validator::{LengthValidator, Validator};
use metamodel_core::prelude::*;

/// Scalar declaration payload: primitive kind, default value and validators
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarDeclaration {
    pub(crate) primitive: PrimitiveType,
    pub(crate) default_value: Option<Value>,
    pub(crate) validator: Option<Validator>,
    pub(crate) length_validator: Option<LengthValidator>,
}

impl ScalarDeclaration {
    pub(crate) fn from_ast(primitive: PrimitiveType, ast: &DeclarationAst) -> Result<Self> {
        Ok(Self {
            primitive,
            default_value: ast.default_value.clone(),
            validator: ast.validator.as_ref().map(Validator::from_spec).transpose()?,
            length_validator: ast
                .length_validator
                .as_ref()
                .map(Validator::length_from_spec)
                .transpose()?,
        })
    }

    /// Check that the default value and validators suit the primitive kind
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::IllegalDeclaration` naming `fqn`
    pub fn validate(&self, fqn: &str, config: &IntrospectConfig) -> Result<()> {
        let illegal = |message: String| MetamodelError::illegal_declaration(fqn, message);
        let primitive = self.primitive;

        if config.validation.check_validator_compatibility {
            if let Some(validator) = &self.validator
                && !validator.is_compatible_with(primitive)
            {
                return Err(illegal(format!(
                    "{} validator {validator} is not compatible with scalar type {primitive}",
                    validator.kind_name()
                )));
            }
            if self.length_validator.is_some() && primitive != PrimitiveType::String {
                return Err(illegal(format!(
                    "length validator is not compatible with scalar type {primitive}"
                )));
            }
        }

        if let Some(default) = &self.default_value
            && config.validation.validate_default_values
        {
            if !is_representable(primitive, default) {
                return Err(illegal(format!(
                    "default value {default} is not a valid {primitive}"
                )));
            }
            let checks = self
                .validator
                .iter()
                .map(|v| v.validate(fqn, default))
                .chain(self.length_validator.iter().map(|v| v.validate(fqn, default)));
            for check in checks {
                check.map_err(|failure| {
                    illegal(format!(
                        "default value {default} is rejected by its validator: {}",
                        failure.expected
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Underlying primitive kind
    #[must_use]
    pub fn primitive(&self) -> PrimitiveType {
        self.primitive
    }

    /// Default value inherited by unboxed properties
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Validator inherited by unboxed properties
    #[must_use]
    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    /// Length validator inherited by unboxed properties
    #[must_use]
    pub fn length_validator(&self) -> Option<&LengthValidator> {
        self.length_validator.as_ref()
    }
}

/// Reinterpret a scalar-typed property as its underlying primitive
///
/// The property's own default and validators win over the scalar's. Array
/// properties keep the scalar's validators, applied per element, but do not
/// adopt its default.
/// Properties already typed with a primitive (or untyped enum values) are
/// returned unchanged, so unboxing is idempotent.
///
/// # Errors
///
/// Returns `MetamodelError::IllegalProperty` if `scalar` is not a scalar
/// declaration or the property is a relationship
pub fn unbox(property: &Property, scalar: &Declaration) -> Result<Property> {
    if !matches!(property.type_ref, Some(TypeRef::Named(_))) {
        return Ok(property.clone());
    }

    let Some(payload) = scalar.scalar() else {
        return Err(MetamodelError::illegal_property(
            property.name(),
            format!(
                "cannot unbox to '{}', which is {}",
                scalar.fully_qualified_name(),
                scalar.kind_name()
            ),
        ));
    };
    if property.kind != PropertyKind::Field {
        return Err(MetamodelError::illegal_property(
            property.name(),
            format!(
                "{} cannot be typed by scalar '{}'",
                property.kind,
                scalar.fully_qualified_name()
            ),
        ));
    }

    tracing::trace!(
        property = property.name(),
        scalar = %scalar.fully_qualified_name(),
        "unboxing scalar property"
    );

    Ok(Property {
        type_ref: Some(TypeRef::Primitive(payload.primitive)),
        // a scalar default describes one value, never a whole array
        default_value: property
            .default_value
            .clone()
            .or_else(|| payload.default_value.clone().filter(|_| !property.array)),
        validator: property
            .validator
            .clone()
            .or_else(|| payload.validator.clone()),
        length_validator: property
            .length_validator
            .clone()
            .or_else(|| payload.length_validator.clone()),
        ..property.clone()
    })
}
