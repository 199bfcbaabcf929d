//! Prelude module for the introspection service
//!
//! This module re-exports commonly used types and functions for convenient import.

// Re-export core types
pub use metamodel_core::prelude::*;

// Re-export the model layer
pub use crate::introspect::{
    Declaration, DeclarationId, DeclarationKind, Identifier, ModelFile, ModelManager,
    OwningDeclaration, Property, PropertyKind, ResolvedModel, ResolvedProperty, TypeLookup,
    TypeName, TypeRef,
};

// Re-export validators and the snapshot registry
pub use crate::registry::ModelRegistry;
pub use crate::validator::{LengthValidator, NumberValidator, StringValidator, Validator};
