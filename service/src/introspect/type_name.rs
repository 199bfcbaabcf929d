//! Unresolved type references
//!
//! A [`TypeName`] is exactly what the source wrote. It only becomes a
//! declaration handle once the global validation pass has run (see
//! [`crate::introspect::resolved`]).

use metamodel_core::ast::TypeIdentifierAst;
use metamodel_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Split a fully qualified name into namespace and local name
///
/// Namespaces may carry a version (`org.acme@1.0.0`), so the split happens at
/// the last `.`.
#[must_use]
pub fn split_fully_qualified_name(fqn: &str) -> Option<(&str, &str)> {
    fqn.rsplit_once('.')
        .filter(|(namespace, name)| !namespace.is_empty() && !name.is_empty())
}

/// Join a namespace and a local name
#[must_use]
pub fn fully_qualified_name(namespace: &str, name: &str) -> String {
    format!("{namespace}.{name}")
}

/// Name of a declaration as referenced in source, optionally qualified
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName {
    namespace: Option<String>,
    name: String,
}

impl TypeName {
    /// Unqualified reference, resolved against the referencing model file
    #[must_use]
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    /// Explicitly qualified reference
    #[must_use]
    pub fn qualified(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    /// Local name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Explicit namespace, if the source gave one
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

impl From<&TypeIdentifierAst> for TypeName {
    fn from(ast: &TypeIdentifierAst) -> Self {
        match &ast.namespace {
            Some(namespace) => Self::qualified(namespace.clone(), ast.name.clone()),
            None => Self::local(ast.name.clone()),
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{namespace}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Declared type of a property
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    /// Built-in primitive kind
    Primitive(PrimitiveType),
    /// Reference to a declaration (class, enum or scalar)
    Named(TypeName),
}

impl TypeRef {
    /// Primitive kind, if this is not a named reference
    #[must_use]
    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            Self::Primitive(p) => Some(*p),
            Self::Named(_) => None,
        }
    }

    /// Named reference, if this is not a primitive
    #[must_use]
    pub fn as_named(&self) -> Option<&TypeName> {
        match self {
            Self::Named(name) => Some(name),
            Self::Primitive(_) => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => p.fmt(f),
            Self::Named(name) => name.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_versioned_namespace() {
        assert_eq!(
            split_fully_qualified_name("org.acme@1.0.0.Car"),
            Some(("org.acme@1.0.0", "Car"))
        );
        assert_eq!(split_fully_qualified_name("Car"), None);
        assert_eq!(split_fully_qualified_name("org.acme."), None);
    }

    #[test]
    fn test_type_name_display() {
        assert_eq!(TypeName::local("Car").to_string(), "Car");
        assert_eq!(TypeName::qualified("org.acme", "Car").to_string(), "org.acme.Car");
        assert_eq!(TypeRef::Primitive(PrimitiveType::Long).to_string(), "Long");
    }

    #[test]
    fn test_from_ast() {
        let ast = TypeIdentifierAst {
            name: "Car".into(),
            namespace: Some("org.acme".into()),
        };
        assert_eq!(TypeName::from(&ast), TypeName::qualified("org.acme", "Car"));
    }
}
