//! The registry of model files and the global validation pass

use super::declaration::Declaration;
use super::model_file::ModelFile;
use super::resolved::ResolvedModel;
use super::traits::TypeLookup;
use super::type_name::split_fully_qualified_name;
use indexmap::IndexMap;
use metamodel_core::prelude::*;
use tracing::{debug, info};

/// Registry owning every model file, keyed by namespace
///
/// Assembly (`add_*`) and validation are separate phases so model files may
/// reference each other in any order. Once [`ModelManager::validate`] has
/// succeeded, the manager is meant to be shared read-only; see
/// [`crate::registry::ModelRegistry`] for publishing updated snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelManager {
    config: IntrospectConfig,
    model_files: IndexMap<String, ModelFile>,
    declaration_count: usize,
}

impl ModelManager {
    /// Create an empty manager with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty manager with the given configuration
    #[must_use]
    pub fn with_config(config: IntrospectConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &IntrospectConfig {
        &self.config
    }

    /// Register a model file
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::DuplicateNamespace` if the namespace is already registered
    pub fn add_model_file(&mut self, model_file: ModelFile) -> Result<()> {
        let namespace = model_file.namespace().to_string();
        if self.model_files.contains_key(&namespace) {
            return Err(MetamodelError::DuplicateNamespace(namespace));
        }
        debug!(
            namespace = %namespace,
            declarations = model_file.declaration_count(),
            "registered model file"
        );
        self.declaration_count += model_file.declaration_count();
        self.model_files.insert(namespace, model_file);
        Ok(())
    }

    /// Build and register a model file from its AST fragment
    ///
    /// # Errors
    ///
    /// Returns construction errors from [`ModelFile::from_ast`] or
    /// `MetamodelError::DuplicateNamespace`
    pub fn add_model_ast(&mut self, ast: &ModelAst) -> Result<()> {
        self.add_model_file(ModelFile::from_ast(ast)?)
    }

    /// Build and register a model file from an already-parsed JSON tree
    ///
    /// # Errors
    ///
    /// See [`ModelManager::add_model_ast`]
    pub fn add_model_value(&mut self, value: &Value) -> Result<()> {
        self.add_model_file(ModelFile::from_value(value)?)
    }

    /// Model file registered for a namespace
    #[must_use]
    pub fn model_file(&self, namespace: &str) -> Option<&ModelFile> {
        self.model_files.get(namespace)
    }

    /// Registered model files in registration order
    pub fn model_files(&self) -> impl Iterator<Item = &ModelFile> {
        self.model_files.values()
    }

    /// Registered namespaces in registration order
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.model_files.keys().map(String::as_str)
    }

    /// Total number of declarations across all model files
    #[must_use]
    pub fn declaration_count(&self) -> usize {
        self.declaration_count
    }

    /// Find a declaration by fully qualified name
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::TypeNotFound` if the name is not qualified,
    /// the namespace is unknown, or the namespace does not declare the name
    pub fn get_type(&self, fully_qualified_name: &str) -> Result<&Declaration> {
        let (namespace, name) = split_fully_qualified_name(fully_qualified_name)
            .ok_or_else(|| MetamodelError::type_not_found(fully_qualified_name))?;
        self.model_files
            .get(namespace)
            .and_then(|file| file.get_local_type(name))
            .ok_or_else(|| MetamodelError::type_not_found(fully_qualified_name))
    }

    /// Run the global validation pass
    ///
    /// Every declaration of every model file is validated in registration
    /// order. The first error aborts the pass.
    ///
    /// # Errors
    ///
    /// Returns the first structural error found
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        info!(
            model_files = self.model_files.len(),
            declarations = self.declaration_count,
            "validating models"
        );
        for model_file in self.model_files.values() {
            model_file.validate(self, &self.config)?;
        }
        debug!("model validation complete");
        Ok(())
    }

    /// Validate, then build the resolved view
    ///
    /// # Errors
    ///
    /// Returns the first structural error found
    pub fn resolve(&self) -> Result<ResolvedModel<'_>> {
        self.validate()?;
        ResolvedModel::build(self)
    }
}

impl TypeLookup for ModelManager {
    fn get_type(&self, fully_qualified_name: &str) -> Result<&Declaration> {
        Self::get_type(self, fully_qualified_name)
    }

    fn model_file(&self, namespace: &str) -> Option<&ModelFile> {
        Self::model_file(self, namespace)
    }

    fn declaration_count(&self) -> usize {
        self.declaration_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_duplicate_namespace() -> Result<()> {
        let mut manager = ModelManager::new();
        manager.add_model_value(&json!({ "namespace": "org.acme" }))?;
        let err = manager.add_model_value(&json!({ "namespace": "org.acme" }));
        assert!(matches!(err, Err(MetamodelError::DuplicateNamespace(ref ns)) if ns == "org.acme"));
        Ok(())
    }

    #[test]
    fn test_get_type_requires_qualified_name() -> Result<()> {
        let mut manager = ModelManager::new();
        manager.add_model_value(&json!({
            "namespace": "org.acme@1.0.0",
            "declarations": [
                { "$class": "concerto.metamodel@1.0.0.ConceptDeclaration", "name": "Address" }
            ]
        }))?;

        assert_eq!(manager.get_type("org.acme@1.0.0.Address")?.name(), "Address");
        assert!(manager.get_type("Address").is_err());
        assert!(manager.get_type("org.other.Address").is_err());
        assert_eq!(manager.declaration_count(), 1);
        Ok(())
    }

    #[test]
    fn test_invalid_config_fails_validation() {
        let mut config = IntrospectConfig::default();
        config.resolution.max_inheritance_depth = Some(0);
        let manager = ModelManager::with_config(config);
        assert!(matches!(manager.validate(), Err(MetamodelError::ConfigError(_))));
    }

    #[test]
    fn test_empty_manager_is_valid() {
        assert!(ModelManager::new().validate().is_ok());
    }
}
