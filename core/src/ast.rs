//! Abstract syntax fragments consumed by the introspection engine
//!
//! These mirror the metamodel JSON produced by the external parser. Unknown
//! keys (decorators, source locations) are ignored; `$class` is kept as a raw
//! string and dispatched on by the model layer.

use crate::error::{MetamodelError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A whole model file: one namespace, its imports and declarations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelAst {
    /// Discriminator, normally `...Model`
    #[serde(rename = "$class", default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Dotted namespace, optionally versioned (`org.acme@1.0.0`)
    pub namespace: String,

    /// Import statements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<ImportAst>,

    /// Declaration fragments in source order, decoded one at a time with
    /// [`DeclarationAst::from_value`] so errors can name the declaration
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub declarations: Vec<Value>,
}

impl ModelAst {
    /// Deserialize a model fragment from an already-parsed JSON tree
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::IllegalModel` if the tree is not a model fragment
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| MetamodelError::IllegalModel {
            message: e.to_string(),
            namespace: value
                .get("namespace")
                .and_then(Value::as_str)
                .map(ToString::to_string),
        })
    }
}

/// Import statement
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportAst {
    /// Discriminator: `ImportType`, `ImportTypes` or `ImportAll`
    #[serde(rename = "$class")]
    pub class: String,

    /// Namespace imported from
    pub namespace: String,

    /// Single imported type (`ImportType`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Imported types (`ImportTypes`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

/// Reference to a named type, as written in the source
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypeIdentifierAst {
    /// Local type name
    pub name: String,

    /// Explicit namespace, when the parser already qualified the reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Identifier declaration of a class
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IdentifiedAst {
    /// `Identified` (system identifier) or `IdentifiedBy` (named field)
    #[serde(rename = "$class")]
    pub class: String,

    /// Identifying property (`IdentifiedBy` only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Declaration fragment: class, enum or scalar
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationAst {
    /// Discriminator selecting the declaration variant
    #[serde(rename = "$class")]
    pub class: String,

    /// Local declaration name
    pub name: String,

    /// Abstract flag (classes only)
    #[serde(default)]
    pub is_abstract: bool,

    /// Super type reference, resolved lazily
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_type: Option<TypeIdentifierAst>,

    /// Identifier declaration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identified: Option<IdentifiedAst>,

    /// Member fragments in declaration order (classes and enums), decoded
    /// one at a time with [`PropertyAst::from_value`]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Value>,

    /// Default value (scalars only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    /// Value validator (scalars only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<ValidatorAst>,

    /// Length validator (string scalars only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_validator: Option<ValidatorAst>,
}

impl DeclarationAst {
    /// Deserialize a declaration fragment from an already-parsed JSON tree
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::IllegalDeclaration` if required keys are missing
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| {
            let name = value.get("name").and_then(Value::as_str).unwrap_or_default();
            MetamodelError::illegal_declaration(name, e.to_string())
        })
    }
}

/// Property fragment: field, relationship or enum value
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAst {
    /// Discriminator selecting the property variant
    #[serde(rename = "$class")]
    pub class: String,

    /// Property name
    pub name: String,

    /// Array marker
    #[serde(default)]
    pub is_array: bool,

    /// Optionality marker
    #[serde(default)]
    pub is_optional: bool,

    /// Named type (`ObjectProperty` / `RelationshipProperty`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<TypeIdentifierAst>,

    /// Default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    /// Value validator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<ValidatorAst>,

    /// Length validator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_validator: Option<ValidatorAst>,
}

impl PropertyAst {
    /// Deserialize a property fragment from an already-parsed JSON tree
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::IllegalProperty` if `$class` or `name` is missing
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| {
            let name = value.get("name").and_then(Value::as_str).unwrap_or_default();
            MetamodelError::illegal_property(name, e.to_string())
        })
    }
}

/// Declarative validator spec
///
/// `$class` is optional; without it the variant is inferred from the keys
/// that are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorAst {
    /// Optional discriminator
    #[serde(rename = "$class", default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Regular expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Regular expression flags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,

    /// Inclusive lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,

    /// Inclusive upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,

    /// Inclusive minimum length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,

    /// Inclusive maximum length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
}
