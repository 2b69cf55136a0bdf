//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use crate::commands::check::CheckArgs;
use crate::commands::generate::GenerateArgs;
use crate::commands::graph::GraphArgs;

/// Default `EnvFilter` directive for a `-v` count.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,bindery=debug,bindery_core=debug,bindery_compiler=debug",
        _ => "warn,bindery=trace,bindery_core=trace,bindery_compiler=trace",
    }
}

pub struct GenerateParams {
    pub model_path: PathBuf,
    pub out: PathBuf,
    pub staging: Option<PathBuf>,
    pub template_macro: Option<String>,
    pub runtime_crate: Option<String>,
    pub forward_stubs: bool,
    pub verbose: u8,
}

impl GenerateParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            model_path: model_path(m),
            out: m.get_one::<PathBuf>("out").cloned().unwrap_or_default(),
            staging: m.get_one::<PathBuf>("staging").cloned(),
            template_macro: m.get_one::<String>("template_macro").cloned(),
            runtime_crate: m.get_one::<String>("runtime_crate").cloned(),
            forward_stubs: !m.get_flag("no_forward_stubs"),
            verbose: m.get_count("verbose"),
        }
    }
}

impl From<GenerateParams> for GenerateArgs {
    fn from(p: GenerateParams) -> Self {
        Self {
            model_path: p.model_path,
            out: p.out,
            staging: p.staging,
            template_macro: p.template_macro,
            runtime_crate: p.runtime_crate,
            forward_stubs: p.forward_stubs,
        }
    }
}

pub struct CheckParams {
    pub model_path: PathBuf,
    pub verbose: u8,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            model_path: model_path(m),
            verbose: m.get_count("verbose"),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            model_path: p.model_path,
        }
    }
}

pub struct GraphParams {
    pub model_path: PathBuf,
    pub json: bool,
    pub verbose: u8,
}

impl GraphParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            model_path: model_path(m),
            json: m.get_flag("json"),
            verbose: m.get_count("verbose"),
        }
    }
}

impl From<GraphParams> for GraphArgs {
    fn from(p: GraphParams) -> Self {
        Self {
            model_path: p.model_path,
            json: p.json,
        }
    }
}

/// Required by every command, so clap has already rejected its absence.
fn model_path(m: &ArgMatches) -> PathBuf {
    m.get_one::<PathBuf>("model_path")
        .cloned()
        .unwrap_or_default()
}
