//! Idempotent persistence of rendered files.
//!
//! Files are written to a staging tree first, then copied into the install tree. Both
//! steps skip files whose content is already identical, so re-running over an unchanged
//! model leaves every modification time alone.
//!
//! Each module is a unit of work: an I/O error abandons the rest of that module and
//! moves on to the next one.

mod digest;
mod manifest;


use std::io;
use std::path::{Path, PathBuf};

use bindery_core::ModuleId;

use crate::Error;
use crate::render::RenderedModule;

pub use digest::Digest;
pub use manifest::{MANIFEST_FILE, Manifest};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

/// A module whose materialization stopped early.
#[derive(Debug)]
pub struct Failure {
    pub module: ModuleId,
    pub error: Error,
}

/// Outcome of one materialization run.
#[derive(Debug, Default)]
pub struct Report {
    /// Install-tree files that were created or replaced.
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub failures: Vec<Failure>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Materializer {
    staging: PathBuf,
    install: PathBuf,
}

impl Materializer {
    pub fn new(staging: impl Into<PathBuf>, install: impl Into<PathBuf>) -> Self {
        Self {
            staging: staging.into(),
            install: install.into(),
        }
    }

    pub fn staging(&self) -> &Path {
        &self.staging
    }

    pub fn install(&self) -> &Path {
        &self.install
    }

    /// Write `content` to `rel` under the staging tree unless it already holds it.
    pub fn write(&self, rel: &Path, content: &[u8]) -> io::Result<WriteOutcome> {
        let path = self.staging.join(rel);
        if digest::holds(&path, content)? {
            return Ok(WriteOutcome::Unchanged);
        }
        ensure_parent(&path)?;
        std::fs::write(&path, content)?;
        Ok(WriteOutcome::Written)
    }

    /// Copy the staged `rel` into the install tree unless it already holds the same bytes.
    ///
    /// Returns the install path.
    pub fn stage(&self, rel: &Path) -> io::Result<(PathBuf, WriteOutcome)> {
        let staged = self.staging.join(rel);
        let installed = self.install.join(rel);
        let Some(content) = digest::read_existing(&staged)? else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} was never staged", staged.display()),
            ));
        };
        if digest::holds(&installed, &content)? {
            return Ok((installed, WriteOutcome::Unchanged));
        }
        ensure_parent(&installed)?;
        std::fs::write(&installed, &content)?;
        Ok((installed, WriteOutcome::Written))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(install = %self.install.display()))]
    pub fn materialize(&self, modules: &[RenderedModule]) -> Report {
        let mut report = Report::default();
        for module in modules {
            if let Err(error) = self.materialize_module(module, &mut report) {
                tracing::debug!(module = %module.module, %error, "module abandoned");
                report.failures.push(Failure {
                    module: module.module.clone(),
                    error,
                });
            }
        }
        tracing::debug!(
            written = report.written.len(),
            unchanged = report.unchanged.len(),
            failures = report.failures.len(),
            "materialized"
        );
        report
    }

    fn materialize_module(
        &self,
        module: &RenderedModule,
        report: &mut Report,
    ) -> Result<(), Error> {
        for file in &module.files {
            self.write(&file.path, file.content.as_bytes())
                .map_err(|source| io_error(self.staging.join(&file.path), source))?;
            let (installed, outcome) = self
                .stage(&file.path)
                .map_err(|source| io_error(self.install.join(&file.path), source))?;
            match outcome {
                WriteOutcome::Written => {
                    tracing::trace!(path = %installed.display(), "written");
                    report.written.push(installed);
                }
                WriteOutcome::Unchanged => report.unchanged.push(installed),
            }
        }
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn io_error(path: PathBuf, source: io::Error) -> Error {
    Error::Io { path, source }
}
