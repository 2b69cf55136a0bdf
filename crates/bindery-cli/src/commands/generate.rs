use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use bindery_compiler::{Config, Generator, Report};

use super::model_loader::load_model_or_exit;

pub struct GenerateArgs {
    pub model_path: PathBuf,
    pub out: PathBuf,
    pub staging: Option<PathBuf>,
    pub template_macro: Option<String>,
    pub runtime_crate: Option<String>,
    pub forward_stubs: bool,
}

impl GenerateArgs {
    pub fn config(&self) -> Config {
        let mut config = Config::new().emit_forward_stubs(self.forward_stubs);
        if let Some(staging) = &self.staging {
            config = config.staging_dir(staging);
        }
        if let Some(name) = &self.template_macro {
            config = config.template_macro(name);
        }
        if let Some(name) = &self.runtime_crate {
            config = config.runtime_crate(name);
        }
        config
    }
}

pub fn run(args: GenerateArgs) {
    let model = load_model_or_exit(&args.model_path);
    let generator = Generator::new(args.config());

    let report = match generator.generate(&model, &args.out) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    print!("{}", summary(&report, &args.out));
    for failure in &report.failures {
        eprintln!("error: module `{}`: {}", failure.module, failure.error);
    }
    if !report.is_success() {
        std::process::exit(1);
    }
}

/// Written files relative to `out`, then totals.
pub fn summary(report: &Report, out: &Path) -> String {
    let mut text = String::new();
    for path in &report.written {
        let shown = path.strip_prefix(out).unwrap_or(path);
        let _ = writeln!(text, "wrote {}", shown.display());
    }
    let _ = write!(
        text,
        "{} written, {} unchanged",
        report.written.len(),
        report.unchanged.len()
    );
    if !report.failures.is_empty() {
        let _ = write!(text, ", {} module(s) failed", report.failures.len());
    }
    text.push('\n');
    text
}
