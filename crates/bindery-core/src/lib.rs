#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Binding model for the bindery generator.
//!
//! Two layers:
//! - **Declaration layer** (`decl`): 1:1 mapping to the JSON model file
//! - **Model layer** (`model`): arena-indexed classes with resolved parents and
//!   validated signatures, plus the naming rules shared by every generated artifact

pub mod class;
pub mod decl;
pub mod error;
pub mod function;
pub mod model;
pub mod naming;
pub mod template;
pub mod types;
pub mod utils;

#[cfg(test)]
mod types_tests;
#[cfg(test)]
mod utils_tests;

pub use class::{Class, ClassId, ClassKind, ClassSet, ModuleId};
pub use decl::{ClassDecl, ModuleUnit, PackageDecl, TemplateDecl};
pub use error::ModelError;
pub use function::{Arg, FreeFunction, Function, FunctionKind};
pub use model::Model;
pub use naming::ClassNames;
pub use template::{Template, TemplateClass, TemplateInstance};
pub use types::{ClassShape, CppType, Primitive, ShapeKind};

/// Errors loading a model file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed model: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}
