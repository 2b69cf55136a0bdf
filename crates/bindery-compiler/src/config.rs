//! Generator configuration.

use std::path::{Path, PathBuf};

/// Configuration for a generator run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Host macro consuming template instantiation requests
    pub(crate) template_macro: String,
    /// Crate path of the runtime support library in generated code
    pub(crate) runtime_crate: String,
    /// Whether deferred interface imports go through forward stubs
    pub(crate) emit_forward_stubs: bool,
    /// Where files are written before being staged into the install tree
    pub(crate) staging_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_macro: "instantiate_template".to_string(),
            runtime_crate: "bindery_runtime".to_string(),
            emit_forward_stubs: true,
            staging_dir: None,
        }
    }
}

impl Config {
    /// Create a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host macro invoked for each template instance.
    pub fn template_macro(mut self, value: impl Into<String>) -> Self {
        self.template_macro = value.into();
        self
    }

    /// Set the runtime crate name used in generated paths.
    pub fn runtime_crate(mut self, value: impl Into<String>) -> Self {
        self.runtime_crate = value.into();
        self
    }

    /// Set whether forward stubs are emitted for deferred imports.
    pub fn emit_forward_stubs(mut self, value: bool) -> Self {
        self.emit_forward_stubs = value;
        self
    }

    /// Set the staging directory. Defaults to `.bindery-staging` under the install root.
    pub fn staging_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(value.into());
        self
    }

    pub fn staging_for(&self, install: &Path) -> PathBuf {
        self.staging_dir
            .clone()
            .unwrap_or_else(|| install.join(".bindery-staging"))
    }
}
