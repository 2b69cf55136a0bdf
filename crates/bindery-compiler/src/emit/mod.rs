//! Emission of structured declarations.
//!
//! For each module: handle, wrapper header, wrapper definition, capability interface,
//! cast glue, implementation glue and, when another module defers its import, a forward
//! stub. Template modules get the generic declaration plus instantiation requests.
//! Package-level artifacts are the free-function module and the aggregate `lib.rs`.

mod decl;
mod host;
pub mod marshal;
mod package;
mod template;
mod wrapper;

#[cfg(test)]
mod emit_tests;

use std::path::PathBuf;

use indexmap::IndexMap;

use bindery_core::naming::package_prefix;
use bindery_core::{Class, ClassId, ClassNames, Model, ModuleId};

use crate::config::Config;
use crate::hierarchy::Hierarchy;
use crate::partition::{Module, ModuleSet};
use crate::symbols::SymbolTable;

pub use decl::{
    Artifact, ArtifactBody, ArtifactKind, ExternFn, ForeignItem, HostFn, HostItem,
    ModuleArtifacts, Param, Receiver, WrapperSig,
};
pub use marshal::Marshal;

/// Everything one run emits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Emission {
    pub modules: Vec<ModuleArtifacts>,
    /// Aggregate and free-function artifacts.
    pub package: ModuleArtifacts,
}

impl Emission {
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.modules
            .iter()
            .chain(std::iter::once(&self.package))
            .flat_map(|m| &m.artifacts)
    }
}

pub struct Emitter<'a> {
    model: &'a Model,
    hierarchy: &'a Hierarchy,
    symbols: &'a SymbolTable,
    modules: &'a ModuleSet,
    config: &'a Config,
    marshal: Marshal<'a>,
    /// Module -> class it holds, across packages.
    owners: IndexMap<ModuleId, ClassId>,
}

impl<'a> Emitter<'a> {
    pub fn new(
        model: &'a Model,
        hierarchy: &'a Hierarchy,
        symbols: &'a SymbolTable,
        modules: &'a ModuleSet,
        config: &'a Config,
    ) -> Self {
        let owners = model
            .classes
            .iter()
            .map(|(id, class)| (class.module_id(), id))
            .collect();
        Self {
            model,
            hierarchy,
            symbols,
            modules,
            config,
            marshal: Marshal::new(model, &config.runtime_crate),
            owners,
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(modules = self.modules.len()))]
    pub fn emit(&self) -> Emission {
        let modules: Vec<ModuleArtifacts> = self
            .modules
            .iter()
            .map(|module| self.emit_module(module))
            .collect();
        let package = self.emit_package(&modules);
        Emission { modules, package }
    }

    fn emit_module(&self, module: &Module) -> ModuleArtifacts {
        let _span = tracing::debug_span!("module", name = %module.id.name).entered();
        let mut artifacts = Vec::new();
        if let Some(id) = module.class {
            artifacts.extend(self.class_artifacts(module, id));
        }
        for &index in &module.templates {
            artifacts.extend(self.template_artifacts(module, index));
        }
        tracing::trace!(artifacts = artifacts.len(), "emitted module");
        ModuleArtifacts {
            module: module.id.clone(),
            artifacts,
        }
    }

    fn class_artifacts(&self, module: &Module, id: ClassId) -> Vec<Artifact> {
        let class = self.model.classes.get(id);
        let names = ClassNames::of(class);
        let mut artifacts = vec![
            self.handle(module, id, &names),
            self.wrapper_header(module, id, &names),
            self.wrapper_source(module, id, &names),
            self.interface(module, id, &names),
            self.cast(&names),
            self.implementation(module, id, &names),
        ];
        if module.needs_stub && self.config.emit_forward_stubs {
            artifacts.push(self.stub(module, &names));
        }
        artifacts
    }

    /// Rust path of a module: `crate::m` locally, `::pkg::m` for other packages.
    fn module_path(&self, id: &ModuleId) -> String {
        if id.package == self.model.package {
            format!("crate::{}", id.name)
        } else {
            format!("::{}::{}", package_prefix(&id.package), id.name)
        }
    }

    fn owner(&self, id: &ModuleId) -> Option<&'a Class> {
        self.owners.get(id).map(|&c| self.model.classes.get(c))
    }

    fn runtime(&self) -> &str {
        &self.config.runtime_crate
    }
}

fn host_path(module: &str, file: &str) -> PathBuf {
    PathBuf::from("src").join(module).join(format!("{file}.rs"))
}

fn foreign_path(file: &str) -> PathBuf {
    PathBuf::from("csrc").join(file)
}
