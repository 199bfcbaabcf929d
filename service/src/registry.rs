//! Published model snapshots for long-lived services
//!
//! A published [`ModelManager`] is never mutated. Updates build a new
//! manager, validate it completely, and only then swap it in atomically;
//! readers holding the previous snapshot keep a consistent view.

use crate::introspect::ModelManager;
use arc_swap::ArcSwap;
use metamodel_core::prelude::*;
use std::sync::Arc;
use tracing::{info, warn};

/// Atomically swappable reference to the current validated model
#[derive(Debug)]
pub struct ModelRegistry {
    current: ArcSwap<ModelManager>,
}

impl ModelRegistry {
    /// Create a registry publishing `manager`
    ///
    /// # Errors
    ///
    /// Returns the first validation error of `manager`
    pub fn new(manager: ModelManager) -> Result<Self> {
        manager.validate()?;
        Ok(Self {
            current: ArcSwap::from_pointee(manager),
        })
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> Arc<ModelManager> {
        self.current.load_full()
    }

    /// Validate `manager` and publish it, returning the replaced snapshot
    ///
    /// On failure the previous snapshot stays published.
    ///
    /// # Errors
    ///
    /// Returns the first validation error of `manager`
    pub fn publish(&self, manager: ModelManager) -> Result<Arc<ModelManager>> {
        if let Err(e) = manager.validate() {
            warn!(error = %e, "rejected model snapshot");
            return Err(e);
        }
        let namespaces = manager.namespaces().collect::<Vec<_>>().join(", ");
        let previous = self.current.swap(Arc::new(manager));
        info!(namespaces = %namespaces, "published model snapshot");
        Ok(previous)
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self {
            current: ArcSwap::from_pointee(ModelManager::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manager(declarations: Value) -> Result<ModelManager> {
        let mut manager = ModelManager::new();
        manager.add_model_value(&json!({ "namespace": "org.acme", "declarations": declarations }))?;
        Ok(manager)
    }

    #[test]
    fn test_publish_swaps_snapshot() -> Result<()> {
        let registry = ModelRegistry::default();
        let held = registry.snapshot();

        registry.publish(manager(json!([
            { "$class": "concerto.metamodel@1.0.0.ConceptDeclaration", "name": "Address" }
        ]))?)?;

        assert_eq!(held.declaration_count(), 0);
        assert_eq!(registry.snapshot().declaration_count(), 1);
        Ok(())
    }

    #[test]
    fn test_failed_publish_keeps_previous() -> Result<()> {
        let registry = ModelRegistry::new(manager(json!([
            { "$class": "concerto.metamodel@1.0.0.ConceptDeclaration", "name": "Address" }
        ]))?)?;

        let broken = manager(json!([
            {
                "$class": "concerto.metamodel@1.0.0.ConceptDeclaration",
                "name": "Address",
                "superType": { "name": "Missing" }
            }
        ]))?;
        assert!(registry.publish(broken).is_err());
        assert!(registry.snapshot().get_type("org.acme.Address")?.super_type().is_none());
        Ok(())
    }
}
