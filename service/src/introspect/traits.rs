//! Capability interfaces the model layer depends on
//!
//! Properties and declarations never hold a reference to the registry that
//! owns them. Whatever they need for cross-reference resolution is passed in
//! through these traits, so several registries can coexist and tests can
//! substitute minimal doubles.

use super::declaration::Declaration;
use super::model_file::ModelFile;
use super::type_name::{TypeName, fully_qualified_name};
use metamodel_core::prelude::*;

/// Global type lookup by fully qualified name
pub trait TypeLookup {
    /// Find a declaration by fully qualified name
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::TypeNotFound` if no registered model file declares it
    fn get_type(&self, fully_qualified_name: &str) -> Result<&Declaration>;

    /// Model file registered for a namespace
    fn model_file(&self, namespace: &str) -> Option<&ModelFile>;

    /// Number of declarations known to the lookup; bounds super type walks
    fn declaration_count(&self) -> usize;
}

/// What a property needs to know about the declaration that owns it
pub trait OwningDeclaration {
    /// Local name of the owner
    fn name(&self) -> &str;

    /// Namespace of the owner
    fn namespace(&self) -> &str;

    /// Fully qualified name of the owner
    fn fully_qualified_name(&self) -> String {
        fully_qualified_name(self.namespace(), self.name())
    }

    /// Qualify a type name as written in the owner's model file
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::TypeNotFound` if the name is neither local nor imported
    fn fully_qualified_type_name(&self, type_name: &TypeName) -> Result<String>;

    /// Resolve a type name as written in the owner's model file
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::TypeNotFound` if the name cannot be resolved
    fn get_type(&self, type_name: &TypeName) -> Result<&Declaration>;
}

/// A declaration seen from inside its model file and registry
#[derive(Clone, Copy)]
pub struct DeclarationScope<'a> {
    declaration: &'a Declaration,
    model_file: &'a ModelFile,
    lookup: &'a dyn TypeLookup,
}

impl<'a> DeclarationScope<'a> {
    /// Scope a declaration belonging to `model_file`
    #[must_use]
    pub fn new(
        declaration: &'a Declaration,
        model_file: &'a ModelFile,
        lookup: &'a dyn TypeLookup,
    ) -> Self {
        Self {
            declaration,
            model_file,
            lookup,
        }
    }

    /// Scope a declaration, locating its model file through the lookup
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::TypeNotFound` if the declaration's namespace is not registered
    pub fn of(declaration: &'a Declaration, lookup: &'a dyn TypeLookup) -> Result<Self> {
        let model_file = lookup.model_file(declaration.namespace()).ok_or_else(|| {
            MetamodelError::type_not_found_in(
                declaration.namespace(),
                format!("namespace of {}", declaration.fully_qualified_name()),
            )
        })?;
        Ok(Self::new(declaration, model_file, lookup))
    }

    /// Scoped declaration
    #[must_use]
    pub fn declaration(&self) -> &'a Declaration {
        self.declaration
    }

    /// Registry the scope resolves through
    #[must_use]
    pub fn lookup(&self) -> &'a dyn TypeLookup {
        self.lookup
    }

    /// Resolve a type name as written in the scoped declaration's model file
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::TypeNotFound` if the name cannot be resolved
    pub fn resolve_type(&self, type_name: &TypeName) -> Result<&'a Declaration> {
        match type_name.namespace() {
            Some(namespace) => self
                .lookup
                .get_type(&fully_qualified_name(namespace, type_name.name())),
            None => self.model_file.get_type(type_name.name(), self.lookup),
        }
    }
}

impl OwningDeclaration for DeclarationScope<'_> {
    fn name(&self) -> &str {
        self.declaration.name()
    }

    fn namespace(&self) -> &str {
        self.declaration.namespace()
    }

    fn fully_qualified_type_name(&self, type_name: &TypeName) -> Result<String> {
        match type_name.namespace() {
            Some(namespace) => Ok(fully_qualified_name(namespace, type_name.name())),
            None => self
                .model_file
                .fully_qualified_type_name(type_name.name(), self.lookup),
        }
    }

    fn get_type(&self, type_name: &TypeName) -> Result<&Declaration> {
        self.resolve_type(type_name)
    }
}
