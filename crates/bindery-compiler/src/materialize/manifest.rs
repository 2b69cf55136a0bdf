//! Package manifest: which generated files belong to which module.

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::render::RenderedModule;

pub const MANIFEST_FILE: &str = "bindery-manifest.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub package: String,
    /// Module name -> artifact paths, `/`-separated and relative to the install root.
    pub modules: IndexMap<String, Vec<String>>,
}

impl Manifest {
    pub fn new<'m>(
        package: impl Into<String>,
        modules: impl IntoIterator<Item = &'m RenderedModule>,
    ) -> Self {
        let modules = modules
            .into_iter()
            .map(|m| {
                let files = m.files.iter().map(|f| portable(&f.path)).collect();
                (m.module.name.clone(), files)
            })
            .collect();
        Self {
            package: package.into(),
            modules,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

fn portable(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
