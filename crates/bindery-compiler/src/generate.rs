//! Pipeline facade.
//!
//! `plan` runs every validating stage and renders every file in memory; only a plan
//! that fully succeeded is handed to the materializer, so a model error or naming
//! collision never leaves partial output behind.

use std::path::{Path, PathBuf};

use bindery_core::{Model, ModuleId};

use crate::Result;
use crate::config::Config;
use crate::emit::{ArtifactKind, Emitter};
use crate::hierarchy::Hierarchy;
use crate::materialize::{MANIFEST_FILE, Manifest, Materializer, Report};
use crate::partition::ModuleSet;
use crate::render::{RenderedFile, RenderedModule, render_module};
use crate::symbols::SymbolTable;

/// Validated structure of a model, before anything is emitted.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub hierarchy: Hierarchy,
    pub symbols: SymbolTable,
    pub modules: ModuleSet,
}

/// Every file of one run, rendered and grouped by module.
#[derive(Clone, Debug)]
pub struct Plan {
    pub modules: Vec<RenderedModule>,
    pub manifest: Manifest,
}

impl Plan {
    pub fn files(&self) -> impl Iterator<Item = &RenderedFile> {
        self.modules.iter().flat_map(|m| &m.files)
    }

    pub fn module(&self, id: &ModuleId) -> Option<&RenderedModule> {
        self.modules.iter().find(|m| &m.module == id)
    }
}

pub struct Generator {
    config: Config,
}

impl Generator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Hierarchy, naming registry and module partition. Fails on cycles and collisions.
    #[tracing::instrument(level = "debug", skip_all, fields(package = %model.package))]
    pub fn analyze(&self, model: &Model) -> Result<Analysis> {
        let hierarchy = Hierarchy::resolve(&model.classes)?;
        let symbols = SymbolTable::build(model, &hierarchy)?;
        let modules = ModuleSet::build(model, &hierarchy, &symbols);
        Ok(Analysis {
            hierarchy,
            symbols,
            modules,
        })
    }

    /// Emit and render everything in memory.
    #[tracing::instrument(level = "debug", skip_all, fields(package = %model.package))]
    pub fn plan(&self, model: &Model) -> Result<Plan> {
        let analysis = self.analyze(model)?;
        let emission = Emitter::new(
            model,
            &analysis.hierarchy,
            &analysis.symbols,
            &analysis.modules,
            &self.config,
        )
        .emit();

        let mut modules: Vec<RenderedModule> = emission.modules.iter().map(render_module).collect();
        let mut package = render_module(&emission.package);
        let manifest = Manifest::new(
            &model.package,
            modules.iter().chain(std::iter::once(&package)),
        );
        package.files.push(RenderedFile {
            path: PathBuf::from(MANIFEST_FILE),
            kind: ArtifactKind::Manifest,
            content: manifest.to_json()?,
        });
        modules.push(package);

        tracing::debug!(
            modules = modules.len(),
            files = modules.iter().map(|m| m.files.len()).sum::<usize>(),
            "planned"
        );
        Ok(Plan { modules, manifest })
    }

    /// Plan, then materialize into `out`.
    #[tracing::instrument(level = "debug", skip_all, fields(package = %model.package))]
    pub fn generate(&self, model: &Model, out: &Path) -> Result<Report> {
        let plan = self.plan(model)?;
        let materializer = Materializer::new(self.config.staging_for(out), out);
        Ok(materializer.materialize(&plan.modules))
    }
}
