//! Model introspection: declarations, properties and their resolution
//!
//! Assembly is two-phase. Model files are registered with a
//! [`ModelManager`] in any order; [`ModelManager::validate`] then resolves
//! every cross reference and checks every declaration, failing on the first
//! error. [`ModelManager::resolve`] additionally returns a [`ResolvedModel`]
//! whose references are [`DeclarationId`] handles.

pub mod declaration;
pub mod model_file;
pub mod model_manager;
pub mod property;
pub mod resolved;
pub mod scalar;
pub mod traits;
pub mod type_name;

pub use declaration::{Declaration, DeclarationKind, Identifier};
pub use model_file::{Import, ModelFile};
pub use model_manager::ModelManager;
pub use property::{Property, PropertyKind, is_representable};
pub use resolved::{DeclarationId, ResolvedDeclaration, ResolvedModel, ResolvedProperty, ResolvedType};
pub use scalar::{ScalarDeclaration, unbox};
pub use traits::{DeclarationScope, OwningDeclaration, TypeLookup};
pub use type_name::{TypeName, TypeRef, fully_qualified_name, split_fully_qualified_name};
