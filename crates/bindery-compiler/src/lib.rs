//! Bindery compiler: turns a validated model into generated binding artifacts.
//!
//! Pipeline stages, in order:
//! - `hierarchy` - ancestor closures and daughter maps
//! - `symbols` - naming registry, rejects collisions before anything is emitted
//! - `partition` - emission modules and their import sets
//! - `emit` - structured host (Rust) and foreign (C++) declarations per module
//! - `render` - declarations to source text
//! - `materialize` - digest-compared, idempotent persistence
//!
//! `Generator` drives all of them.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod emit;
pub mod generate;
pub mod hierarchy;
pub mod materialize;
pub mod partition;
pub mod render;
pub mod symbols;

mod invariants;

#[cfg(test)]
pub mod test_utils;

use std::path::PathBuf;

pub use bindery_core::ModelError;
pub use config::Config;
pub use generate::{Analysis, Generator, Plan};
pub use hierarchy::Hierarchy;
pub use materialize::{Materializer, Report};
pub use partition::{ModuleImports, ModuleSet};
pub use symbols::SymbolTable;

/// Two declarations that would generate the same name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NamingError {
    #[error("wrapper symbol `{symbol}` is generated by both {first} and {second}")]
    DuplicateSymbol {
        symbol: String,
        first: String,
        second: String,
    },

    #[error("entry `{entry}` of class `{class}` is generated by both {first} and {second}")]
    DuplicateEntry {
        class: String,
        entry: String,
        first: String,
        second: String,
    },

    #[error("identifier `{ident}` is generated by both {first} and {second}")]
    DuplicateIdentifier {
        ident: String,
        first: String,
        second: String,
    },
}

/// Errors that abort generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
