//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("bindery")
        .about("C-linkage wrappers and typed Rust bindings for C++ class hierarchies")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(generate_command())
        .subcommand(check_command())
        .subcommand(graph_command())
}

/// Run the full pipeline and write the package.
pub fn generate_command() -> Command {
    Command::new("generate")
        .about("Generate wrappers and bindings for a model")
        .after_help(
            r#"EXAMPLES:
  bindery generate shapes.json -o bindings/shapes
  bindery generate shapes.json -o out --staging /tmp/stage
  bindery generate shapes.json -o out --runtime-crate my_rt -v"#,
        )
        .arg(model_path_arg())
        .arg(out_arg())
        .arg(staging_arg())
        .arg(template_macro_arg())
        .arg(runtime_crate_arg())
        .arg(no_forward_stubs_arg())
        .arg(verbose_arg())
}

/// Validate a model without writing anything.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Validate a model")
        .after_help(
            r#"EXAMPLES:
  bindery check shapes.json
  cat shapes.json | bindery check -"#,
        )
        .arg(model_path_arg())
        .arg(verbose_arg())
}

/// Show module import sets and daughter maps.
pub fn graph_command() -> Command {
    Command::new("graph")
        .about("Show module imports and daughter maps")
        .after_help(
            r#"EXAMPLES:
  bindery graph shapes.json
  bindery graph shapes.json --json"#,
        )
        .arg(model_path_arg())
        .arg(json_arg())
        .arg(verbose_arg())
}
