//! Model files: one namespace, its imports and its declarations

use super::declaration::Declaration;
use super::traits::TypeLookup;
use super::type_name::fully_qualified_name;
use indexmap::IndexMap;
use metamodel_core::metamodel::{ImportClass, short_class_name};
use metamodel_core::prelude::*;

/// Import statement of a model file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Import {
    /// A single named type
    Type {
        /// Namespace imported from
        namespace: String,
        /// Imported type
        name: String,
    },
    /// Several named types
    Types {
        /// Namespace imported from
        namespace: String,
        /// Imported types
        names: Vec<String>,
    },
    /// Every declaration of a namespace
    All {
        /// Namespace imported from
        namespace: String,
    },
}

impl Import {
    fn from_ast(file_namespace: &str, ast: &ImportAst) -> Result<Self> {
        let illegal = |message: String| MetamodelError::IllegalModel {
            message,
            namespace: Some(file_namespace.to_string()),
        };

        if ast.namespace.is_empty() {
            return Err(illegal("import is missing a namespace".into()));
        }
        let class = ImportClass::parse(&ast.class).ok_or_else(|| {
            illegal(format!(
                "unrecognized import class '{}'",
                short_class_name(&ast.class)
            ))
        })?;

        let namespace = ast.namespace.clone();
        match class {
            ImportClass::Type => {
                let name = ast.name.clone().ok_or_else(|| {
                    illegal(format!("import from '{namespace}' is missing a type name"))
                })?;
                Ok(Self::Type { namespace, name })
            }
            ImportClass::Types if ast.types.is_empty() => {
                Err(illegal(format!("import from '{namespace}' lists no types")))
            }
            ImportClass::Types => Ok(Self::Types {
                namespace,
                names: ast.types.clone(),
            }),
            ImportClass::All => Ok(Self::All { namespace }),
        }
    }

    /// Namespace imported from
    #[must_use]
    pub fn namespace(&self) -> &str {
        match self {
            Self::Type { namespace, .. } | Self::Types { namespace, .. } | Self::All { namespace } => {
                namespace
            }
        }
    }

    /// Whether the import names `name` explicitly
    #[must_use]
    pub fn names(&self, name: &str) -> bool {
        match self {
            Self::Type { name: imported, .. } => imported == name,
            Self::Types { names, .. } => names.iter().any(|imported| imported == name),
            Self::All { .. } => false,
        }
    }

    /// Whether this is a wildcard import
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::All { .. })
    }
}

/// The declarations and imports belonging to one namespace
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFile {
    namespace: String,
    imports: Vec<Import>,
    declarations: IndexMap<String, Declaration>,
}

impl ModelFile {
    /// Build a model file from its AST fragment
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::IllegalModel` for an empty namespace or a
    /// malformed import, `MetamodelError::DuplicateDeclarationName` if two
    /// declarations share a name, and any error raised while building a declaration
    pub fn from_ast(ast: &ModelAst) -> Result<Self> {
        let namespace = ast.namespace.trim();
        if namespace.is_empty() {
            return Err(MetamodelError::illegal_model("model file has an empty namespace"));
        }
        if let Some(class) = &ast.class
            && short_class_name(class) != "Model"
        {
            return Err(MetamodelError::IllegalModel {
                message: format!("expected a Model fragment, found '{}'", short_class_name(class)),
                namespace: Some(namespace.to_string()),
            });
        }

        let imports = ast
            .imports
            .iter()
            .map(|import| Import::from_ast(namespace, import))
            .collect::<Result<Vec<_>>>()?;

        let mut declarations = IndexMap::with_capacity(ast.declarations.len());
        for value in &ast.declarations {
            let declaration = Declaration::from_value(namespace, value)?;
            if declarations.contains_key(declaration.name()) {
                return Err(MetamodelError::duplicate_declaration(namespace, declaration.name()));
            }
            declarations.insert(declaration.name().to_string(), declaration);
        }

        Ok(Self {
            namespace: namespace.to_string(),
            imports,
            declarations,
        })
    }

    /// Build a model file from an already-parsed JSON fragment
    ///
    /// # Errors
    ///
    /// See [`ModelFile::from_ast`]
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::from_ast(&ModelAst::from_value(value)?)
    }

    /// Namespace of the file
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Import statements in source order
    #[must_use]
    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    /// Declarations in source order
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.values()
    }

    /// Number of declarations in the file
    #[must_use]
    pub fn declaration_count(&self) -> usize {
        self.declarations.len()
    }

    /// Declaration by local name, ignoring imports
    #[must_use]
    pub fn get_local_type(&self, name: &str) -> Option<&Declaration> {
        self.declarations.get(name)
    }

    /// Qualify a bare type name as seen from this file
    ///
    /// Local declarations win, then explicitly imported names, then wildcard
    /// imports in source order.
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::TypeNotFound` if the name is neither local nor imported
    pub fn fully_qualified_type_name(&self, name: &str, lookup: &dyn TypeLookup) -> Result<String> {
        if self.declarations.contains_key(name) {
            return Ok(fully_qualified_name(&self.namespace, name));
        }
        if let Some(import) = self.imports.iter().find(|import| import.names(name)) {
            return Ok(fully_qualified_name(import.namespace(), name));
        }
        self.imports
            .iter()
            .filter(|import| import.is_wildcard())
            .find(|import| {
                lookup
                    .model_file(import.namespace())
                    .is_some_and(|file| file.get_local_type(name).is_some())
            })
            .map(|import| fully_qualified_name(import.namespace(), name))
            .ok_or_else(|| {
                MetamodelError::type_not_found_in(name, format!("model file {}", self.namespace))
            })
    }

    /// Resolve a bare type name as seen from this file
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::TypeNotFound` if the name cannot be resolved
    pub fn get_type<'a>(&'a self, name: &str, lookup: &'a dyn TypeLookup) -> Result<&'a Declaration> {
        if let Some(local) = self.get_local_type(name) {
            return Ok(local);
        }
        let fqn = self.fully_qualified_type_name(name, lookup)?;
        lookup.get_type(&fqn)
    }

    /// Check imports and every declaration against the registry
    ///
    /// # Errors
    ///
    /// Returns the first structural error found
    pub fn validate(&self, lookup: &dyn TypeLookup, config: &IntrospectConfig) -> Result<()> {
        tracing::debug!(
            namespace = %self.namespace,
            declarations = self.declarations.len(),
            "validating model file"
        );

        for import in &self.imports {
            let context = format!("import in model file {}", self.namespace);
            let file = lookup.model_file(import.namespace()).ok_or_else(|| {
                MetamodelError::type_not_found_in(import.namespace(), context.as_str())
            })?;
            let missing = match import {
                Import::Type { name, .. } => file.get_local_type(name).is_none().then_some(name),
                Import::Types { names, .. } => {
                    names.iter().find(|name| file.get_local_type(name).is_none())
                }
                Import::All { .. } => None,
            };
            if let Some(name) = missing {
                return Err(MetamodelError::type_not_found_in(
                    fully_qualified_name(import.namespace(), name),
                    context,
                ));
            }
        }

        self.declarations
            .values()
            .try_for_each(|declaration| declaration.validate(lookup, config))
    }
}
