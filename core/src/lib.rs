//! # Metamodel Core
//!
//! Core types for the metamodel introspection engine: the abstract syntax
//! fragments produced by the external parser, the metamodel vocabulary used to
//! dispatch on their `$class` discriminators, configuration, and the error
//! taxonomy shared by every layer.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Abstract syntax fragments
pub mod ast;

/// Configuration types
pub mod config;

/// Error taxonomy
pub mod error;

/// `$class` vocabulary and primitive kinds
pub mod metamodel;

pub use config::IntrospectConfig;
pub use error::{MetamodelError, Result, ValidationFailure};
pub use metamodel::{ClassKind, METAMODEL_NAMESPACE, PrimitiveType};
pub use serde_json::Value;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::*;
    pub use crate::error::{MetamodelError, Result, ValidationFailure};
    pub use crate::metamodel::*;
    pub use serde_json::Value;
}
