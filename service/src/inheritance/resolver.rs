//! Super type chain resolution for class declarations
//!
//! Declarations have at most one super type, so the method resolution order
//! is simply the chain itself. Walks are bounded by the number of
//! declarations the lookup knows about, so a cycle is reported instead of
//! looping.

use crate::introspect::declaration::Declaration;
use crate::introspect::property::Property;
use crate::introspect::traits::{DeclarationScope, TypeLookup};
use metamodel_core::config::ResolutionConfig;
use metamodel_core::prelude::*;
use std::collections::{HashMap, HashSet};

/// Inheritance resolver over a type lookup
#[derive(Clone, Copy)]
pub struct InheritanceResolver<'a> {
    lookup: &'a dyn TypeLookup,
    max_depth: Option<usize>,
}

impl<'a> InheritanceResolver<'a> {
    /// Create a resolver bounded only by the declaration count
    #[must_use]
    pub fn new(lookup: &'a dyn TypeLookup) -> Self {
        Self {
            lookup,
            max_depth: None,
        }
    }

    /// Create a resolver honouring the configured depth cap
    #[must_use]
    pub fn with_config(lookup: &'a dyn TypeLookup, config: &ResolutionConfig) -> Self {
        Self {
            lookup,
            max_depth: config.max_inheritance_depth,
        }
    }

    /// Lookup the resolver walks through
    #[must_use]
    pub fn lookup(&self) -> &'a dyn TypeLookup {
        self.lookup
    }

    /// Resolve the direct super type of a declaration
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::TypeNotFound` if the super type cannot be located
    pub fn super_type(&self, declaration: &'a Declaration) -> Result<Option<&'a Declaration>> {
        let Some(super_type) = declaration.super_type() else {
            return Ok(None);
        };
        let scope = DeclarationScope::of(declaration, self.lookup)?;
        scope.resolve_type(super_type).map(Some).map_err(|e| match e {
            MetamodelError::TypeNotFound { .. } => MetamodelError::type_not_found_in(
                super_type.to_string(),
                format!("super type of {}", declaration.fully_qualified_name()),
            ),
            other => other,
        })
    }

    /// Walk the super type chain, nearest ancestor first
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::CircularInheritance` if the chain revisits a
    /// declaration, `MetamodelError::IllegalDeclaration` if it is longer than
    /// the configured cap, and `MetamodelError::TypeNotFound` for a missing ancestor
    pub fn ancestors(&self, declaration: &'a Declaration) -> Result<Vec<&'a Declaration>> {
        let root = declaration.fully_qualified_name();
        let bound = self.lookup.declaration_count();
        let mut chain = vec![root.clone()];
        let mut visited = HashSet::from([root.clone()]);
        let mut ancestors = Vec::new();
        let mut current = declaration;

        while let Some(parent) = self.super_type(current)? {
            let parent_name = parent.fully_qualified_name();
            chain.push(parent_name.clone());
            if !visited.insert(parent_name) || ancestors.len() >= bound {
                return Err(MetamodelError::circular_inheritance(root, chain));
            }
            ancestors.push(parent);
            if let Some(max_depth) = self.max_depth
                && ancestors.len() > max_depth
            {
                return Err(MetamodelError::illegal_declaration(
                    root,
                    format!("inheritance chain is deeper than the maximum of {max_depth}"),
                ));
            }
            current = parent;
        }

        Ok(ancestors)
    }

    /// Merge own and inherited properties, each paired with its declaring class
    ///
    /// Properties appear root ancestor first. A re-declared property replaces
    /// the inherited entry in place, so overrides keep their inherited position.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`InheritanceResolver::ancestors`]
    pub fn resolve_properties(
        &self,
        declaration: &'a Declaration,
    ) -> Result<Vec<(&'a Declaration, &'a Property)>> {
        let mut lineage = self.ancestors(declaration)?;
        lineage.reverse();
        lineage.push(declaration);

        let mut merged: Vec<(&'a Declaration, &'a Property)> = Vec::new();
        let mut positions: HashMap<&'a str, usize> = HashMap::new();
        for owner in lineage {
            for property in owner.properties() {
                match positions.get(property.name()) {
                    Some(&index) => merged[index] = (owner, property),
                    None => {
                        positions.insert(property.name(), merged.len());
                        merged.push((owner, property));
                    }
                }
            }
        }
        Ok(merged)
    }
}

/// Fully qualified names of a declaration and its ancestors, nearest first
///
/// # Errors
///
/// Propagates errors from [`InheritanceResolver::ancestors`]
pub fn get_inheritance_chain(declaration: &Declaration, lookup: &dyn TypeLookup) -> Result<Vec<String>> {
    let resolver = InheritanceResolver::new(lookup);
    let mut chain = vec![declaration.fully_qualified_name()];
    chain.extend(
        resolver
            .ancestors(declaration)?
            .into_iter()
            .map(Declaration::fully_qualified_name),
    );
    Ok(chain)
}

/// Check if a declaration is, or inherits from, the declaration named `parent`
///
/// # Errors
///
/// Propagates errors from [`InheritanceResolver::ancestors`]
pub fn is_subclass_of(declaration: &Declaration, parent: &str, lookup: &dyn TypeLookup) -> Result<bool> {
    Ok(get_inheritance_chain(declaration, lookup)?
        .iter()
        .any(|name| name == parent))
}
