//! The resolved view of a validated model
//!
//! Only [`ModelManager::resolve`] constructs a [`ResolvedModel`], and only
//! after the global validation pass succeeded. Cross references in this view
//! are [`DeclarationId`] handles rather than names, so nothing here can
//! observe an unresolved reference.

use super::declaration::Declaration;
use super::model_file::ModelFile;
use super::model_manager::ModelManager;
use super::property::Property;
use super::traits::{DeclarationScope, TypeLookup};
use super::type_name::TypeRef;
use crate::inheritance::InheritanceResolver;
use metamodel_core::prelude::*;
use std::collections::HashMap;
use std::fmt;

/// Resolved handle of a declaration within one [`ResolvedModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclarationId(usize);

impl DeclarationId {
    /// Position of the declaration in registration order
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Effective type of a resolved property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedType {
    /// Primitive kind, including unboxed scalars
    Primitive(PrimitiveType),
    /// Class or enum declaration
    Declaration(DeclarationId),
}

/// Effective property: scalars unboxed, type resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProperty {
    property: Property,
    declared_in: DeclarationId,
    type_name: String,
    resolved_type: Option<ResolvedType>,
}

impl ResolvedProperty {
    /// Effective property
    #[must_use]
    pub fn property(&self) -> &Property {
        &self.property
    }

    /// Property name
    #[must_use]
    pub fn name(&self) -> &str {
        self.property.name()
    }

    /// Declaration that declares (or overrides) this property
    #[must_use]
    pub fn declared_in(&self) -> DeclarationId {
        self.declared_in
    }

    /// Fully qualified name of the effective type
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Effective type; `None` for enum values
    #[must_use]
    pub fn resolved_type(&self) -> Option<ResolvedType> {
        self.resolved_type
    }

    /// Check an instance value against the effective validators
    ///
    /// # Errors
    ///
    /// Returns the `ValidationFailure` of the first rule that rejects the value
    pub fn validate_value(&self, value: &Value) -> std::result::Result<(), ValidationFailure> {
        self.property.validate_value(value)
    }
}

impl fmt::Display for ResolvedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.property.render(&self.type_name))
    }
}

/// A declaration with its super type chain and effective properties
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDeclaration<'m> {
    id: DeclarationId,
    declaration: &'m Declaration,
    fully_qualified_name: String,
    super_type: Option<DeclarationId>,
    ancestors: Vec<DeclarationId>,
    properties: Vec<ResolvedProperty>,
}

impl<'m> ResolvedDeclaration<'m> {
    /// Handle of this declaration
    #[must_use]
    pub fn id(&self) -> DeclarationId {
        self.id
    }

    /// Declared structure
    #[must_use]
    pub fn declaration(&self) -> &'m Declaration {
        self.declaration
    }

    /// `namespace.Name`
    #[must_use]
    pub fn fully_qualified_name(&self) -> &str {
        &self.fully_qualified_name
    }

    /// Direct super type
    #[must_use]
    pub fn super_type(&self) -> Option<DeclarationId> {
        self.super_type
    }

    /// Super type chain, nearest first
    #[must_use]
    pub fn ancestors(&self) -> &[DeclarationId] {
        &self.ancestors
    }

    /// Own and inherited effective properties, ancestors first
    #[must_use]
    pub fn properties(&self) -> &[ResolvedProperty] {
        &self.properties
    }

    /// Effective property by name
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&ResolvedProperty> {
        self.properties.iter().find(|p| p.name() == name)
    }
}

/// Immutable, cross-referenced view of a validated [`ModelManager`]
#[derive(Debug, Clone)]
pub struct ResolvedModel<'m> {
    manager: &'m ModelManager,
    declarations: Vec<ResolvedDeclaration<'m>>,
    index: HashMap<String, DeclarationId>,
}

impl<'m> ResolvedModel<'m> {
    pub(crate) fn build(manager: &'m ModelManager) -> Result<Self> {
        let lookup: &'m dyn TypeLookup = manager;
        let resolver = InheritanceResolver::with_config(lookup, &manager.config().resolution);

        let index: HashMap<String, DeclarationId> = manager
            .model_files()
            .flat_map(ModelFile::declarations)
            .enumerate()
            .map(|(i, declaration)| (declaration.fully_qualified_name(), DeclarationId(i)))
            .collect();
        let id_of = |fqn: &str| {
            index
                .get(fqn)
                .copied()
                .ok_or_else(|| MetamodelError::type_not_found(fqn))
        };

        let mut declarations = Vec::with_capacity(index.len());
        for (i, declaration) in manager
            .model_files()
            .flat_map(ModelFile::declarations)
            .enumerate()
        {
            let super_type = resolver
                .super_type(declaration)?
                .map(|parent| id_of(&parent.fully_qualified_name()))
                .transpose()?;
            let ancestors = resolver
                .ancestors(declaration)?
                .into_iter()
                .map(|ancestor| id_of(&ancestor.fully_qualified_name()))
                .collect::<Result<Vec<_>>>()?;

            let mut properties = Vec::new();
            for (owner, property) in resolver.resolve_properties(declaration)? {
                let scope = DeclarationScope::of(owner, lookup)?;
                let effective = property.effective(&scope)?;
                let type_name = effective.fully_qualified_type_name(&scope)?;
                let resolved_type = match effective.type_ref() {
                    Some(TypeRef::Primitive(primitive)) => Some(ResolvedType::Primitive(*primitive)),
                    Some(TypeRef::Named(_)) => Some(ResolvedType::Declaration(id_of(&type_name)?)),
                    None => None,
                };
                properties.push(ResolvedProperty {
                    property: effective,
                    declared_in: id_of(&owner.fully_qualified_name())?,
                    type_name,
                    resolved_type,
                });
            }

            declarations.push(ResolvedDeclaration {
                id: DeclarationId(i),
                declaration,
                fully_qualified_name: declaration.fully_qualified_name(),
                super_type,
                ancestors,
                properties,
            });
        }

        tracing::debug!(declarations = declarations.len(), "resolved model");
        Ok(Self {
            manager,
            declarations,
            index,
        })
    }

    /// Manager this view was resolved from
    #[must_use]
    pub fn manager(&self) -> &'m ModelManager {
        self.manager
    }

    /// Number of declarations
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether the model has no declarations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Resolved declarations in registration order
    pub fn declarations(&self) -> impl Iterator<Item = &ResolvedDeclaration<'m>> {
        self.declarations.iter()
    }

    /// Handle of the declaration named `fqn`
    #[must_use]
    pub fn id_of(&self, fqn: &str) -> Option<DeclarationId> {
        self.index.get(fqn).copied()
    }

    /// Declaration by handle
    #[must_use]
    pub fn get(&self, id: DeclarationId) -> Option<&ResolvedDeclaration<'m>> {
        self.declarations.get(id.0)
    }

    /// Declaration by fully qualified name
    #[must_use]
    pub fn by_name(&self, fqn: &str) -> Option<&ResolvedDeclaration<'m>> {
        self.id_of(fqn).and_then(|id| self.get(id))
    }

    /// Whether `child` is, or inherits from, `parent`
    #[must_use]
    pub fn is_subclass_of(&self, child: DeclarationId, parent: DeclarationId) -> bool {
        child == parent
            || self
                .get(child)
                .is_some_and(|declaration| declaration.ancestors.contains(&parent))
    }

    /// Check one instance value against a property's effective validators
    ///
    /// The outer result reports an unknown declaration or property; the inner
    /// result is the value-level outcome.
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::TypeNotFound` for an unknown declaration and
    /// `MetamodelError::IllegalProperty` for an unknown property
    pub fn validate_instance_value(
        &self,
        fqn: &str,
        property: &str,
        value: &Value,
    ) -> Result<std::result::Result<(), ValidationFailure>> {
        let declaration = self
            .by_name(fqn)
            .ok_or_else(|| MetamodelError::type_not_found(fqn))?;
        let property = declaration.property(property).ok_or_else(|| {
            MetamodelError::illegal_property_in(fqn, property, "no such property")
        })?;
        Ok(property.validate_value(value))
    }
}
