//! Named type definitions: classes, enumerations and scalars

use super::property::{Property, PropertyKind};
use super::scalar::ScalarDeclaration;
use super::traits::{DeclarationScope, TypeLookup};
use super::type_name::{TypeName, TypeRef, fully_qualified_name};
use crate::inheritance::InheritanceResolver;
use metamodel_core::metamodel::{DeclarationClass, short_class_name};
use metamodel_core::prelude::*;
use std::collections::HashSet;

/// How instances of a class are identified
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// System-assigned identifier (`Identified`)
    System,
    /// Named string field (`IdentifiedBy`)
    Field(String),
}

/// Declaration variants, selected once from the `$class` discriminator
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationKind {
    /// Class with an ordered property list
    Class(ClassKind),
    /// Enumeration; its properties are all enum values
    Enum,
    /// Named alias of a primitive kind
    Scalar(ScalarDeclaration),
}

/// A named type definition within a namespace
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    name: String,
    namespace: String,
    kind: DeclarationKind,
    super_type: Option<TypeName>,
    is_abstract: bool,
    identifier: Option<Identifier>,
    properties: Vec<Property>,
}

impl Declaration {
    /// Build a declaration from its AST fragment
    ///
    /// The super type is stored by name and resolved by [`Declaration::validate`].
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::IllegalDeclaration` for an unrecognized
    /// `$class` or members that do not fit the variant,
    /// `MetamodelError::DuplicatePropertyName` if two properties share a
    /// name, and any error raised while building a property
    pub fn from_ast(namespace: &str, ast: &DeclarationAst) -> Result<Self> {
        let fqn = fully_qualified_name(namespace, &ast.name);
        let illegal = |message: String| MetamodelError::illegal_declaration(fqn.as_str(), message);

        let class = DeclarationClass::parse(&ast.class).ok_or_else(|| {
            illegal(format!(
                "unrecognized declaration class '{}'",
                short_class_name(&ast.class)
            ))
        })?;

        let mut seen = HashSet::new();
        let mut properties = Vec::with_capacity(ast.properties.len());
        for value in &ast.properties {
            let property = Property::from_value(value).map_err(|e| e.within_declaration(&fqn))?;
            if !seen.insert(property.name().to_string()) {
                return Err(MetamodelError::duplicate_property(fqn.as_str(), property.name()));
            }
            properties.push(property);
        }

        let kind = match class {
            DeclarationClass::Class(class_kind) => {
                if let Some(value) = properties.iter().find(|p| p.is_enum_value()) {
                    return Err(illegal(format!(
                        "enum value '{}' is only allowed in an enum declaration",
                        value.name()
                    )));
                }
                if ast.default_value.is_some() || ast.validator.is_some() || ast.length_validator.is_some() {
                    return Err(illegal(
                        "class declarations cannot declare a default value or validators".into(),
                    ));
                }
                DeclarationKind::Class(class_kind)
            }
            DeclarationClass::Enum => {
                if let Some(member) = properties.iter().find(|p| !p.is_enum_value()) {
                    return Err(illegal(format!(
                        "enum declarations can only contain enum values, found {} '{}'",
                        member.kind(),
                        member.name()
                    )));
                }
                DeclarationKind::Enum
            }
            DeclarationClass::Scalar(primitive) => {
                if !properties.is_empty() {
                    return Err(illegal("scalar declarations cannot have properties".into()));
                }
                DeclarationKind::Scalar(
                    ScalarDeclaration::from_ast(primitive, ast)
                        .map_err(|e| e.within_declaration(&fqn))?,
                )
            }
        };

        let is_class = matches!(kind, DeclarationKind::Class(_));
        if !is_class && (ast.super_type.is_some() || ast.identified.is_some() || ast.is_abstract) {
            return Err(illegal(
                "only class declarations can declare a super type, an identifier or be abstract"
                    .into(),
            ));
        }

        let identifier = ast
            .identified
            .as_ref()
            .map(|identified| match (short_class_name(&identified.class), &identified.name) {
                ("Identified", _) => Ok(Identifier::System),
                ("IdentifiedBy", Some(name)) => Ok(Identifier::Field(name.clone())),
                ("IdentifiedBy", None) => Err(illegal("IdentifiedBy requires a field name".into())),
                (other, _) => Err(illegal(format!("unrecognized identifier class '{other}'"))),
            })
            .transpose()?;

        Ok(Self {
            name: ast.name.clone(),
            namespace: namespace.to_string(),
            kind,
            super_type: ast.super_type.as_ref().map(TypeName::from),
            is_abstract: ast.is_abstract,
            identifier,
            properties,
        })
    }

    /// Build a declaration from an already-parsed JSON fragment
    ///
    /// # Errors
    ///
    /// See [`Declaration::from_ast`]
    pub fn from_value(namespace: &str, value: &Value) -> Result<Self> {
        let ast = DeclarationAst::from_value(value).map_err(|e| match e {
            MetamodelError::IllegalDeclaration {
                declaration,
                message,
            } if declaration.is_empty() => MetamodelError::illegal_declaration(namespace, message),
            MetamodelError::IllegalDeclaration {
                declaration,
                message,
            } => MetamodelError::illegal_declaration(
                fully_qualified_name(namespace, &declaration),
                message,
            ),
            other => other,
        })?;
        Self::from_ast(namespace, &ast)
    }

    /// Local name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning namespace
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `namespace.Name`
    #[must_use]
    pub fn fully_qualified_name(&self) -> String {
        fully_qualified_name(&self.namespace, &self.name)
    }

    /// Declaration variant
    #[must_use]
    pub fn kind(&self) -> &DeclarationKind {
        &self.kind
    }

    /// Variant name with an article, for diagnostics
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            DeclarationKind::Class(_) => "a class",
            DeclarationKind::Enum => "an enum",
            DeclarationKind::Scalar(_) => "a scalar",
        }
    }

    /// Whether this is a class declaration
    #[must_use]
    pub fn is_class(&self) -> bool {
        matches!(self.kind, DeclarationKind::Class(_))
    }

    /// Whether this is an enum declaration
    #[must_use]
    pub fn is_enum(&self) -> bool {
        matches!(self.kind, DeclarationKind::Enum)
    }

    /// Whether this is a scalar declaration
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, DeclarationKind::Scalar(_))
    }

    /// Class flavour, for class declarations
    #[must_use]
    pub fn class_kind(&self) -> Option<ClassKind> {
        match self.kind {
            DeclarationKind::Class(kind) => Some(kind),
            _ => None,
        }
    }

    /// Scalar payload, for scalar declarations
    #[must_use]
    pub fn scalar(&self) -> Option<&ScalarDeclaration> {
        match &self.kind {
            DeclarationKind::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Super type reference as written in the source
    #[must_use]
    pub fn super_type(&self) -> Option<&TypeName> {
        self.super_type.as_ref()
    }

    /// Abstract flag
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Identifier declared on this class itself
    #[must_use]
    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    /// Own properties in declaration order
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Own property by name, ignoring the super type chain
    #[must_use]
    pub fn own_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Resolve the super type reference
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::TypeNotFound` if the super type cannot be located
    pub fn super_type_declaration<'a>(
        &'a self,
        lookup: &'a dyn TypeLookup,
    ) -> Result<Option<&'a Declaration>> {
        InheritanceResolver::new(lookup).super_type(self)
    }

    /// Super type chain, nearest ancestor first
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::CircularInheritance` if the chain revisits a
    /// declaration and `MetamodelError::TypeNotFound` for a missing ancestor
    pub fn ancestors<'a>(&'a self, lookup: &'a dyn TypeLookup) -> Result<Vec<&'a Declaration>> {
        InheritanceResolver::new(lookup).ancestors(self)
    }

    /// Property by name: own properties first, then the super type chain
    ///
    /// # Errors
    ///
    /// Propagates super type resolution errors
    pub fn get_property<'a>(
        &'a self,
        name: &str,
        lookup: &'a dyn TypeLookup,
    ) -> Result<Option<&'a Property>> {
        if let Some(property) = self.own_property(name) {
            return Ok(Some(property));
        }
        Ok(self
            .ancestors(lookup)?
            .into_iter()
            .find_map(|ancestor| ancestor.own_property(name)))
    }

    /// Own and inherited properties, ancestors first
    ///
    /// An overriding property replaces the inherited one at the inherited position.
    ///
    /// # Errors
    ///
    /// Propagates super type resolution errors
    pub fn all_properties<'a>(&'a self, lookup: &'a dyn TypeLookup) -> Result<Vec<&'a Property>> {
        Ok(InheritanceResolver::new(lookup)
            .resolve_properties(self)?
            .into_iter()
            .map(|(_, property)| property)
            .collect())
    }

    /// Whether this declaration is, or inherits from, the declaration named `fqn`
    ///
    /// # Errors
    ///
    /// Propagates super type resolution errors
    pub fn is_subclass_of(&self, fqn: &str, lookup: &dyn TypeLookup) -> Result<bool> {
        crate::inheritance::is_subclass_of(self, fqn, lookup)
    }

    /// Whether this class or one of its ancestors declares an identifier
    ///
    /// # Errors
    ///
    /// Propagates super type resolution errors
    pub fn is_identified(&self, lookup: &dyn TypeLookup) -> Result<bool> {
        if self.identifier.is_some() {
            return Ok(true);
        }
        Ok(self
            .ancestors(lookup)?
            .iter()
            .any(|ancestor| ancestor.identifier.is_some()))
    }

    /// Check the declaration against the registry
    ///
    /// Resolves the super type chain, then checks every own property, any
    /// overrides of inherited properties, and the identifier.
    ///
    /// # Errors
    ///
    /// Returns the first structural error found
    pub fn validate(&self, lookup: &dyn TypeLookup, config: &IntrospectConfig) -> Result<()> {
        let fqn = self.fully_qualified_name();
        tracing::debug!(declaration = %fqn, kind = self.kind_name(), "validating declaration");

        let scope = DeclarationScope::of(self, lookup)?;
        let resolver = InheritanceResolver::with_config(lookup, &config.resolution);

        if let Some(parent) = resolver.super_type(self)?
            && !parent.is_class()
        {
            return Err(MetamodelError::illegal_declaration(
                fqn,
                format!(
                    "super type '{}' must be a class declaration, found {}",
                    parent.fully_qualified_name(),
                    parent.kind_name()
                ),
            ));
        }
        let ancestors = resolver.ancestors(self)?;

        if let Some(scalar) = self.scalar() {
            return scalar.validate(&fqn, config);
        }

        for property in &self.properties {
            property.validate(&scope, config)?;

            if property.is_relationship()
                && config.resolution.require_identified_relationships
                && let Some(target_name) = property.type_ref().and_then(TypeRef::as_named)
            {
                let target = scope.resolve_type(target_name)?;
                if !target.is_identified(lookup)? {
                    return Err(MetamodelError::illegal_property_in(
                        fqn.as_str(),
                        property.name(),
                        format!(
                            "relationship target '{}' is not identified",
                            target.fully_qualified_name()
                        ),
                    ));
                }
            }

            let inherited = ancestors
                .iter()
                .find_map(|ancestor| ancestor.own_property(property.name()).map(|p| (*ancestor, p)));
            if let Some((ancestor, inherited)) = inherited {
                self.check_override(&scope, property, ancestor, inherited, config)?;
            }
        }

        self.validate_identifier(&fqn, &resolver)
    }

    fn check_override(
        &self,
        scope: &DeclarationScope<'_>,
        property: &Property,
        ancestor: &Declaration,
        inherited: &Property,
        config: &IntrospectConfig,
    ) -> Result<()> {
        let fqn = self.fully_qualified_name();
        if !config.resolution.allow_property_override {
            return Err(MetamodelError::duplicate_property(fqn, property.name()));
        }

        let ancestor_scope = DeclarationScope::of(ancestor, scope.lookup())?;
        let own_type = property.effective(scope)?.fully_qualified_type_name(scope)?;
        let inherited_type = inherited
            .effective(&ancestor_scope)?
            .fully_qualified_type_name(&ancestor_scope)?;

        let problem = if property.kind() != inherited.kind() {
            Some(format!("changes the property kind from {}", inherited.kind()))
        } else if own_type != inherited_type {
            Some(format!("changes the type from {inherited_type} to {own_type}"))
        } else if property.is_array() != inherited.is_array() {
            Some("changes the array marker".to_string())
        } else if property.is_optional() && !inherited.is_optional() {
            Some("relaxes a required property to optional".to_string())
        } else {
            None
        };

        match problem {
            Some(problem) => Err(MetamodelError::illegal_property_in(
                fqn,
                property.name(),
                format!(
                    "override of property inherited from '{}' {problem}",
                    ancestor.fully_qualified_name()
                ),
            )),
            None => Ok(()),
        }
    }

    fn validate_identifier<'a>(&'a self, fqn: &str, resolver: &InheritanceResolver<'a>) -> Result<()> {
        let Some(Identifier::Field(field)) = &self.identifier else {
            return Ok(());
        };
        let illegal = |message: String| MetamodelError::illegal_declaration(fqn, message);

        let (owner, property) = resolver
            .resolve_properties(self)?
            .into_iter()
            .find(|(_, property)| property.name() == field)
            .ok_or_else(|| illegal(format!("identifying field '{field}' is not a property")))?;

        let owner_scope = DeclarationScope::of(owner, resolver.lookup())?;
        let effective = property.effective(&owner_scope)?;
        if property.kind() != PropertyKind::Field
            || effective.primitive_type() != Some(PrimitiveType::String)
        {
            return Err(illegal(format!(
                "identifying field '{field}' must be a String field"
            )));
        }
        if property.is_optional() || property.is_array() {
            return Err(illegal(format!(
                "identifying field '{field}' cannot be optional or an array"
            )));
        }
        Ok(())
    }
}
