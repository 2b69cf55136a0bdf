//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so the same definition can be reused by every
//! command that needs it.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Model file (positional).
pub fn model_path_arg() -> Arg {
    Arg::new("model_path")
        .value_name("MODEL")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("Model file in JSON (use \"-\" for stdin)")
}

/// Install directory (-o/--out).
pub fn out_arg() -> Arg {
    Arg::new("out")
        .short('o')
        .long("out")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("Directory receiving the generated package")
}

/// Staging directory (--staging).
pub fn staging_arg() -> Arg {
    Arg::new("staging")
        .long("staging")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .help("Staging directory (default: <DIR>/.bindery-staging)")
}

/// Host macro for template instances (--template-macro).
pub fn template_macro_arg() -> Arg {
    Arg::new("template_macro")
        .long("template-macro")
        .value_name("NAME")
        .help("Host macro invoked once per template instance")
}

/// Runtime crate path (--runtime-crate).
pub fn runtime_crate_arg() -> Arg {
    Arg::new("runtime_crate")
        .long("runtime-crate")
        .value_name("NAME")
        .help("Crate providing FfiHandle and the cast helpers")
}

/// Disable forward stubs (--no-forward-stubs).
pub fn no_forward_stubs_arg() -> Arg {
    Arg::new("no_forward_stubs")
        .long("no-forward-stubs")
        .action(ArgAction::SetTrue)
        .help("Import deferred interfaces directly instead of through forward stubs")
}

/// Machine-readable output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of text")
}

/// Verbosity level (-v/--verbose, repeatable).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .help("Log pipeline stages (-v: debug, -vv: trace)")
}
