//! Inheritance resolution for class declarations
//!
//! This module provides:
//! - Super type lookup through the owning model file's imports
//! - Bounded ancestor walks with cycle detection
//! - Property merging with in-place overrides

pub mod resolver;

pub use resolver::{InheritanceResolver, get_inheritance_chain, is_subclass_of};
