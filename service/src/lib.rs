//! # Metamodel Introspection
//!
//! Declaration and property resolution for metamodel-based schemas.
//!
//! ## Overview
//!
//! Given already-parsed model files (metamodel JSON keyed by `$class`), this
//! crate builds a closed, cross-referenced and validated type system:
//!
//! - **Validators**: regex, numeric range and length rules checked against instance values
//! - **Scalar unboxing**: properties typed by a named scalar behave as its primitive kind
//! - **Inheritance**: bounded super type walks with cycle detection and property overrides
//! - **Cross-namespace lookup**: local names, explicit imports and wildcard imports
//! - **Two-phase assembly**: register model files in any order, then validate fail-fast
//!
//! ## Quick Start
//!
//! ```rust
//! use metamodel_introspect::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let mut manager = ModelManager::new();
//!     manager.add_model_value(&json!({
//!         "namespace": "org.acme",
//!         "declarations": [{
//!             "$class": "concerto.metamodel@1.0.0.ConceptDeclaration",
//!             "name": "Address",
//!             "properties": [{
//!                 "$class": "concerto.metamodel@1.0.0.StringProperty",
//!                 "name": "zip",
//!                 "validator": { "pattern": "^[0-9]{5}$" }
//!             }]
//!         }]
//!     }))?;
//!
//!     let model = manager.resolve()?;
//!     let outcome = model.validate_instance_value("org.acme.Address", "zip", &json!("1234"))?;
//!     assert!(outcome.is_err());
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)] // subjective determination
#![allow(clippy::doc_markdown)] // metamodel class names read as proper nouns
#![allow(clippy::format_push_string)] // format! macro is more readable than write!

/// Command-line interface
pub mod cli;

/// Configuration loading
pub mod config;

/// Inheritance resolution
pub mod inheritance;

/// Declarations, properties, model files and the model manager
pub mod introspect;

/// Prelude for common imports
pub mod prelude;

/// Published model snapshots
pub mod registry;

/// Declarative value validators
pub mod validator;

pub use introspect::{ModelManager, ResolvedModel};
pub use metamodel_core::{MetamodelError, Result, ValidationFailure};
pub use registry::ModelRegistry;
