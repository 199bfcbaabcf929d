//! Class members: fields, relationships and enum values

use super::scalar::unbox;
use super::traits::OwningDeclaration;
use super::type_name::{TypeName, TypeRef};
use crate::validator::{LengthValidator, Validator};
use chrono::DateTime;
use metamodel_core::metamodel::PropertyClass;
use metamodel_core::prelude::*;
use std::fmt;

/// Property variants, selected once from the `$class` discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Value-typed member
    Field,
    /// Reference to an identified class instance
    Relationship,
    /// Member of an enumeration
    EnumValue,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Field => "Field",
            Self::Relationship => "Relationship",
            Self::EnumValue => "EnumValue",
        };
        f.write_str(name)
    }
}

/// A named member of a declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub(crate) kind: PropertyKind,
    pub(crate) name: String,
    pub(crate) type_ref: Option<TypeRef>,
    pub(crate) array: bool,
    pub(crate) optional: bool,
    pub(crate) default_value: Option<Value>,
    pub(crate) validator: Option<Validator>,
    pub(crate) length_validator: Option<LengthValidator>,
}

impl Property {
    /// Build a property from its AST fragment
    ///
    /// Type references are stored by name; whether they resolve, and whether
    /// the validator suits the resolved type, is checked by [`Property::validate`].
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::IllegalProperty` for an unrecognized `$class`,
    /// a named property without a type, or an enum value carrying field
    /// attributes; `MetamodelError::InvalidValidatorSpec` for a malformed validator
    pub fn from_ast(ast: &PropertyAst) -> Result<Self> {
        let illegal = |message: String| MetamodelError::illegal_property(&ast.name, message);

        let class = PropertyClass::parse(&ast.class)
            .ok_or_else(|| illegal(format!("unrecognized property class '{}'", ast.class)))?;

        let named_type = || {
            ast.type_ref
                .as_ref()
                .map(|t| TypeRef::Named(TypeName::from(t)))
                .ok_or_else(|| illegal("named property requires a type".to_string()))
        };

        let (kind, type_ref) = match class {
            PropertyClass::Primitive(primitive) => {
                (PropertyKind::Field, Some(TypeRef::Primitive(primitive)))
            }
            PropertyClass::Object => (PropertyKind::Field, Some(named_type()?)),
            PropertyClass::Relationship => (PropertyKind::Relationship, Some(named_type()?)),
            PropertyClass::Enum => {
                if ast.is_array
                    || ast.default_value.is_some()
                    || ast.validator.is_some()
                    || ast.length_validator.is_some()
                {
                    return Err(illegal(
                        "enum values cannot be arrays or declare defaults or validators"
                            .to_string(),
                    ));
                }
                (PropertyKind::EnumValue, None)
            }
        };

        let validator = ast.validator.as_ref().map(Validator::from_spec).transpose()?;
        let length_validator = ast
            .length_validator
            .as_ref()
            .map(Validator::length_from_spec)
            .transpose()?;

        Ok(Self {
            kind,
            name: ast.name.clone(),
            type_ref,
            array: ast.is_array,
            optional: ast.is_optional,
            default_value: ast.default_value.clone(),
            validator,
            length_validator,
        })
    }

    /// Build a property from an already-parsed JSON fragment
    ///
    /// # Errors
    ///
    /// See [`Property::from_ast`]
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::from_ast(&PropertyAst::from_value(value)?)
    }

    /// Property name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Property variant
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Declared type; `None` for enum values
    #[must_use]
    pub fn type_ref(&self) -> Option<&TypeRef> {
        self.type_ref.as_ref()
    }

    /// Primitive kind, if the declared type is primitive
    #[must_use]
    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        self.type_ref.as_ref().and_then(TypeRef::as_primitive)
    }

    /// Array marker
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.array
    }

    /// Optionality marker
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the declared type is a primitive kind
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.primitive_type().is_some()
    }

    /// Whether this is a relationship
    #[must_use]
    pub fn is_relationship(&self) -> bool {
        self.kind == PropertyKind::Relationship
    }

    /// Whether this is an enum value
    #[must_use]
    pub fn is_enum_value(&self) -> bool {
        self.kind == PropertyKind::EnumValue
    }

    /// Declared default value
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Declared value validator
    #[must_use]
    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    /// Declared length validator
    #[must_use]
    pub fn length_validator(&self) -> Option<&LengthValidator> {
        self.length_validator.as_ref()
    }

    /// Fully qualified name of the declared type
    ///
    /// Primitive kinds render by name; enum values report their owner.
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::TypeNotFound` if a named type is neither local nor imported
    pub fn fully_qualified_type_name(&self, owner: &dyn OwningDeclaration) -> Result<String> {
        match &self.type_ref {
            Some(TypeRef::Primitive(p)) => Ok(p.as_str().to_string()),
            Some(TypeRef::Named(name)) => owner.fully_qualified_type_name(name),
            None => Ok(owner.fully_qualified_name()),
        }
    }

    /// Effective view with scalar types unboxed
    ///
    /// A property typed by a scalar declaration is reinterpreted as the
    /// scalar's primitive kind, adopting the scalar's default and validators
    /// where the property declares none. Any other property is returned as is.
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::TypeNotFound` if a named type cannot be located
    pub fn effective(&self, owner: &dyn OwningDeclaration) -> Result<Self> {
        match &self.type_ref {
            Some(TypeRef::Named(name)) => {
                let target = owner
                    .get_type(name)
                    .map_err(|e| self.locate_missing_type(e, name, owner))?;
                if target.is_scalar() {
                    unbox(self, target)
                } else {
                    Ok(self.clone())
                }
            }
            _ => Ok(self.clone()),
        }
    }

    /// Check the declared type resolves and that defaults and validators suit it
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::TypeNotFound` for an unresolved type and
    /// `MetamodelError::IllegalProperty` for an incompatible default, validator
    /// or relationship target
    pub fn validate(&self, owner: &dyn OwningDeclaration, config: &IntrospectConfig) -> Result<()> {
        let owner_fqn = owner.fully_qualified_name();
        let illegal = |message: String| {
            MetamodelError::illegal_property_in(owner_fqn.as_str(), self.name.as_str(), message)
        };

        let type_name = match &self.type_ref {
            None => return Ok(()),
            Some(TypeRef::Primitive(primitive)) => {
                return self.validate_primitive(*primitive, &owner_fqn, config);
            }
            Some(TypeRef::Named(type_name)) => type_name,
        };

        let target = owner
            .get_type(type_name)
            .map_err(|e| self.locate_missing_type(e, type_name, owner))?;
        let has_validators = self.validator.is_some() || self.length_validator.is_some();

        if self.is_relationship() {
            if !target.is_class() {
                return Err(illegal(format!(
                    "relationship must reference a class declaration, '{}' is {}",
                    target.fully_qualified_name(),
                    target.kind_name()
                )));
            }
            if self.default_value.is_some() {
                return Err(illegal("relationships cannot declare a default value".into()));
            }
            if has_validators {
                return Err(illegal("relationships cannot declare validators".into()));
            }
            return Ok(());
        }

        if target.is_scalar() {
            let effective = unbox(self, target)?;
            return match effective.primitive_type() {
                Some(primitive) => effective.validate_primitive(primitive, &owner_fqn, config),
                None => Ok(()),
            };
        }

        if has_validators && config.validation.check_validator_compatibility {
            return Err(illegal(format!(
                "validators are not supported on properties of type '{}'",
                target.fully_qualified_name()
            )));
        }

        if let Some(default) = &self.default_value
            && config.validation.validate_default_values
        {
            if !target.is_enum() {
                return Err(illegal(format!(
                    "default values are not supported on properties of type '{}'",
                    target.fully_qualified_name()
                )));
            }
            let known = default
                .as_str()
                .is_some_and(|value| target.own_property(value).is_some());
            if !known {
                return Err(illegal(format!(
                    "default value {default} is not a value of enum '{}'",
                    target.fully_qualified_name()
                )));
            }
        }
        Ok(())
    }

    fn validate_primitive(
        &self,
        primitive: PrimitiveType,
        owner_fqn: &str,
        config: &IntrospectConfig,
    ) -> Result<()> {
        let illegal = |message: String| {
            MetamodelError::illegal_property_in(owner_fqn, self.name.as_str(), message)
        };

        if config.validation.check_validator_compatibility {
            if let Some(validator) = &self.validator
                && !validator.is_compatible_with(primitive)
            {
                return Err(illegal(format!(
                    "{} validator {validator} is not compatible with type {primitive}",
                    validator.kind_name()
                )));
            }
            if self.length_validator.is_some() && primitive != PrimitiveType::String {
                return Err(illegal(format!(
                    "length validator is not compatible with type {primitive}"
                )));
            }
        }

        if let Some(default) = &self.default_value
            && config.validation.validate_default_values
        {
            if self.array {
                return Err(illegal("array properties cannot declare a default value".into()));
            }
            if !is_representable(primitive, default) {
                return Err(illegal(format!(
                    "default value {default} is not a valid {primitive}"
                )));
            }
            self.check_scalar_value(default).map_err(|failure| {
                illegal(format!(
                    "default value {default} is rejected by its validator: {}",
                    failure.expected
                ))
            })?;
        }
        Ok(())
    }

    /// Check an instance value against the property's validators
    ///
    /// Array properties apply the validators to each element.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationFailure` encountered
    pub fn validate_value(&self, value: &Value) -> std::result::Result<(), ValidationFailure> {
        match value {
            Value::Array(items) if self.array => {
                items.iter().try_for_each(|item| self.check_scalar_value(item))
            }
            _ => self.check_scalar_value(value),
        }
    }

    fn check_scalar_value(&self, value: &Value) -> std::result::Result<(), ValidationFailure> {
        if let Some(validator) = &self.validator {
            validator.validate(&self.name, value)?;
        }
        if let Some(validator) = &self.length_validator {
            validator.validate(&self.name, value)?;
        }
        Ok(())
    }

    fn locate_missing_type(
        &self,
        err: MetamodelError,
        type_name: &TypeName,
        owner: &dyn OwningDeclaration,
    ) -> MetamodelError {
        match err {
            MetamodelError::TypeNotFound { .. } => MetamodelError::type_not_found_in(
                type_name.to_string(),
                format!(
                    "type of property '{}' of {}",
                    self.name,
                    owner.fully_qualified_name()
                ),
            ),
            other => other,
        }
    }

    /// Diagnostic rendering with the fully qualified type name
    ///
    /// `Field {name=field, type=org.acme.Address, array=false, optional=false}`
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::TypeNotFound` if a named type is neither local nor imported
    pub fn describe(&self, owner: &dyn OwningDeclaration) -> Result<String> {
        let type_name = self.fully_qualified_type_name(owner)?;
        Ok(self.render(&type_name))
    }

    /// Render with an explicit type name in place of the declared one
    ///
    /// Enum values have no type, array or optional marker, so they render as
    /// `EnumValue {name=RED}`.
    pub(crate) fn render(&self, type_name: &str) -> String {
        if self.is_enum_value() {
            return format!("{} {{name={}}}", self.kind, self.name);
        }
        format!(
            "{} {{name={}, type={type_name}, array={}, optional={}}}",
            self.kind, self.name, self.array, self.optional
        )
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_name = self
            .type_ref
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        f.write_str(&self.render(&type_name))
    }
}

/// Whether a JSON value is a valid literal of a primitive kind
#[must_use]
pub fn is_representable(primitive: PrimitiveType, value: &Value) -> bool {
    match primitive {
        PrimitiveType::String => value.is_string(),
        PrimitiveType::Boolean => value.is_boolean(),
        PrimitiveType::Double => value.is_number(),
        PrimitiveType::Long => value.as_i64().is_some(),
        PrimitiveType::Integer => value
            .as_i64()
            .is_some_and(|n| i32::try_from(n).is_ok()),
        PrimitiveType::DateTime => value
            .as_str()
            .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_unrecognized_class() {
        let err = Property::from_value(&json!({
            "$class": "concerto.metamodel@1.0.0.MapProperty",
            "name": "field",
        }));
        assert!(matches!(err, Err(MetamodelError::IllegalProperty { .. })));
    }

    #[test]
    fn test_object_property_requires_type() {
        let err = Property::from_value(&json!({
            "$class": "concerto.metamodel@1.0.0.ObjectProperty",
            "name": "owner",
        }));
        assert!(matches!(err, Err(MetamodelError::IllegalProperty { .. })));
    }

    #[test]
    fn test_enum_value_rejects_field_attributes() {
        let err = Property::from_value(&json!({
            "$class": "concerto.metamodel@1.0.0.EnumProperty",
            "name": "RED",
            "defaultValue": "x",
        }));
        assert!(matches!(err, Err(MetamodelError::IllegalProperty { .. })));
    }

    #[test]
    fn test_length_validator_must_be_length_rule() {
        let err = Property::from_value(&json!({
            "$class": "concerto.metamodel@1.0.0.StringProperty",
            "name": "code",
            "lengthValidator": { "pattern": "x" },
        }));
        assert!(matches!(err, Err(MetamodelError::InvalidValidatorSpec { .. })));
    }

    #[test]
    fn test_display_variants() -> Result<()> {
        let relationship = Property::from_value(&json!({
            "$class": "concerto.metamodel@1.0.0.RelationshipProperty",
            "name": "owner",
            "type": { "name": "Person", "namespace": "org.acme" },
            "isArray": true,
        }))?;
        assert_eq!(
            relationship.to_string(),
            "Relationship {name=owner, type=org.acme.Person, array=true, optional=false}"
        );

        let value = Property::from_value(&json!({
            "$class": "concerto.metamodel@1.0.0.EnumProperty",
            "name": "RED",
        }))?;
        assert_eq!(value.to_string(), "EnumValue {name=RED}");
        Ok(())
    }

    #[test]
    fn test_array_value_validated_per_element() -> Result<()> {
        let property = Property::from_value(&json!({
            "$class": "concerto.metamodel@1.0.0.IntegerProperty",
            "name": "scores",
            "isArray": true,
            "validator": { "lower": 0, "upper": 10 },
        }))?;
        assert!(property.validate_value(&json!([0, 5, 10])).is_ok());
        let failure = property.validate_value(&json!([1, 11])).unwrap_err();
        assert_eq!(failure.identifier, "scores");
        assert_eq!(failure.value, json!(11));
        Ok(())
    }

    #[test]
    fn test_representable_literals() {
        assert!(is_representable(PrimitiveType::Integer, &json!(42)));
        assert!(!is_representable(PrimitiveType::Integer, &json!(4_294_967_296_i64)));
        assert!(is_representable(PrimitiveType::Long, &json!(4_294_967_296_i64)));
        assert!(!is_representable(PrimitiveType::Long, &json!(1.5)));
        assert!(is_representable(PrimitiveType::Double, &json!(1)));
        assert!(is_representable(PrimitiveType::DateTime, &json!("2024-01-31T10:00:00Z")));
        assert!(!is_representable(PrimitiveType::DateTime, &json!("yesterday")));
        assert!(!is_representable(PrimitiveType::Boolean, &json!("true")));
    }
}
