//! Field construction, scalar unboxing and rendering
//!
//! Fields are exercised against a minimal owning declaration whose type
//! lookup always answers with a `MyScalar` string scalar.

use metamodel_introspect::introspect::{Declaration, OwningDeclaration, Property, TypeName};
use metamodel_introspect::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

struct ScalarOwner {
    scalar: Declaration,
}

impl ScalarOwner {
    fn new() -> Self {
        let scalar = Declaration::from_value(
            "org.acme",
            &json!({
                "$class": "concerto.metamodel@1.0.0.StringScalar",
                "name": "MyScalar",
                "defaultValue": "abc"
            }),
        )
        .expect("valid scalar");
        Self { scalar }
    }
}

impl OwningDeclaration for ScalarOwner {
    fn name(&self) -> &str {
        "Car"
    }

    fn namespace(&self) -> &str {
        "org.acme"
    }

    fn fully_qualified_type_name(&self, _type_name: &TypeName) -> Result<String> {
        Ok("fqn".to_string())
    }

    fn get_type(&self, _type_name: &TypeName) -> Result<&Declaration> {
        Ok(&self.scalar)
    }
}

fn string_field(extra: Value) -> Property {
    let mut ast = json!({
        "$class": "concerto.metamodel@1.0.0.StringProperty",
        "name": "field",
    });
    if let (Some(ast), Some(extra)) = (ast.as_object_mut(), extra.as_object()) {
        ast.extend(extra.clone());
    }
    Property::from_value(&ast).expect("valid field")
}

#[test]
fn test_no_validator_by_default() {
    assert!(string_field(json!({})).validator().is_none());
}

#[test]
fn test_saves_string_validator() {
    let field = string_field(json!({
        "validator": { "pattern": "^suchValidator$", "flags": "" }
    }));
    let validator = field.validator().expect("validator");
    assert!(validator.validate("id", &json!("suchValidator")).is_ok());
    assert!(validator.validate("id", &json!("suchValidatorNot")).is_err());
}

#[test]
fn test_saves_string_validator_with_unicode_flag() {
    let field = string_field(json!({
        "validator": { "pattern": "^suchValidator$", "flags": "u" }
    }));
    let validator = field.validator().expect("validator");
    assert!(validator.validate("id", &json!("suchValidator")).is_ok());
}

#[test]
fn test_rejection_names_identifier_and_value() {
    let field = string_field(json!({
        "validator": { "pattern": "^suchValidator$" }
    }));
    let failure = field
        .validator()
        .expect("validator")
        .validate("id", &json!("nope"))
        .unwrap_err();
    assert_eq!(failure.identifier, "id");
    assert_eq!(failure.value, json!("nope"));
    assert_eq!(
        failure.to_string(),
        "Validator error for field 'id': value \"nope\" does not match the regular expression /^suchValidator$/"
    );
}

#[test]
fn test_no_default_value_by_default() {
    assert_eq!(string_field(json!({})).default_value(), None);
}

#[test]
fn test_saves_default_value() {
    let field = string_field(json!({ "defaultValue": "wowSuchDefault" }));
    assert_eq!(field.default_value(), Some(&json!("wowSuchDefault")));
}

#[test]
fn test_optional_flag() {
    assert!(!string_field(json!({})).is_optional());
    assert!(string_field(json!({ "isOptional": true })).is_optional());
}

#[test]
fn test_unboxes_scalar_property() -> Result<()> {
    let owner = ScalarOwner::new();
    let property = Property::from_value(&json!({
        "$class": "concerto.metamodel@1.0.0.ObjectProperty",
        "name": "property",
        "type": { "name": "MyScalar" }
    }))?;

    let effective = property.effective(&owner)?;
    assert_eq!(effective.primitive_type(), Some(PrimitiveType::String));
    assert_eq!(effective.type_ref().map(ToString::to_string), Some("String".to_string()));
    assert_eq!(effective.default_value(), Some(&json!("abc")));
    assert_eq!(property.default_value(), None);
    Ok(())
}

#[test]
fn test_describe() -> Result<()> {
    let owner = ScalarOwner::new();
    let field = Property::from_value(&json!({
        "$class": "concerto.metamodel@1.0.0.ObjectProperty",
        "name": "field",
        "type": { "name": "Anything" }
    }))?;
    assert_eq!(
        field.describe(&owner)?,
        "Field {name=field, type=fqn, array=false, optional=false}"
    );
    Ok(())
}

#[test]
fn test_validate_against_scalar_owner() -> Result<()> {
    let owner = ScalarOwner::new();
    let config = IntrospectConfig::default();

    let property = Property::from_value(&json!({
        "$class": "concerto.metamodel@1.0.0.ObjectProperty",
        "name": "code",
        "type": { "name": "MyScalar" },
        "validator": { "pattern": "^[a-z]+$" }
    }))?;
    property.validate(&owner, &config)?;

    let bad_default = Property::from_value(&json!({
        "$class": "concerto.metamodel@1.0.0.ObjectProperty",
        "name": "code",
        "type": { "name": "MyScalar" },
        "defaultValue": 42
    }))?;
    let err = bad_default.validate(&owner, &config);
    assert!(matches!(
        err,
        Err(MetamodelError::IllegalProperty { declaration: Some(ref d), .. }) if d == "org.acme.Car"
    ));
    Ok(())
}
