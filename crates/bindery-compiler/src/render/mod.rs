//! Declarations to source text.
//!
//! Rendering is a pure function of the artifact, so unchanged input renders to
//! byte-identical files.

mod cpp;
mod rust;


use std::path::PathBuf;

use bindery_core::ModuleId;

use crate::emit::{Artifact, ArtifactBody, ArtifactKind, ModuleArtifacts};

/// First line of every generated file.
pub const BANNER: &str = "// @generated by bindery. Do not edit.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedFile {
    /// Relative to the install root.
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub content: String,
}

/// Rendered files of one module, materialized together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedModule {
    pub module: ModuleId,
    pub files: Vec<RenderedFile>,
}

pub fn render(artifact: &Artifact) -> String {
    let body = match &artifact.body {
        ArtifactBody::Host(items) => rust::render(items),
        ArtifactBody::Foreign(items) => cpp::render(items),
    };
    format!("{BANNER}\n\n{body}")
}

pub fn render_module(module: &ModuleArtifacts) -> RenderedModule {
    RenderedModule {
        module: module.module.clone(),
        files: module
            .artifacts
            .iter()
            .map(|artifact| RenderedFile {
                path: artifact.path.clone(),
                kind: artifact.kind,
                content: render(artifact),
            })
            .collect(),
    }
}

/// Indented line writer.
#[derive(Default)]
struct Writer {
    out: String,
    indent: usize,
}

impl Writer {
    fn line(&mut self, text: &str) {
        if text.is_empty() {
            self.out.push('\n');
            return;
        }
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with("\n\n") && !self.out.ends_with("{\n") {
            self.out.push('\n');
        }
    }

    /// Write `head {` and indent.
    fn open(&mut self, head: &str) {
        self.line(&format!("{head} {{"));
        self.indent += 1;
    }

    fn close(&mut self) {
        self.close_with("}");
    }

    fn close_with(&mut self, text: &str) {
        while self.out.ends_with("\n\n") {
            self.out.pop();
        }
        self.indent = self.indent.saturating_sub(1);
        self.line(text);
    }

    /// Doc or line comment, one prefix per line.
    fn comment(&mut self, prefix: &str, text: &str) {
        for line in text.lines() {
            if line.is_empty() {
                self.line(prefix);
            } else {
                self.line(&format!("{prefix} {line}"));
            }
        }
    }

    fn finish(mut self) -> String {
        while self.out.ends_with("\n\n") {
            self.out.pop();
        }
        self.out
    }
}
