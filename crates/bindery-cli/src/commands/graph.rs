use std::fmt::Write as _;
use std::path::PathBuf;

use indexmap::IndexSet;
use serde::Serialize;

use bindery_compiler::{Analysis, Config, Generator};
use bindery_core::{ClassId, Model, ModuleId};

use super::model_loader::load_model_or_exit;

pub struct GraphArgs {
    pub model_path: PathBuf,
    pub json: bool,
}

/// Import sets and daughter maps of every emission module.
#[derive(Debug, Serialize)]
pub struct Graph {
    pub package: String,
    pub modules: Vec<ModuleGraph>,
}

#[derive(Debug, Serialize)]
pub struct ModuleGraph {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<String>,
    pub raw: Vec<String>,
    pub same_layer: Vec<String>,
    pub parent_layer: Vec<String>,
    pub deferred: Vec<String>,
    pub needs_stub: bool,
    pub daughters: Vec<String>,
    pub daughters_self: Vec<String>,
}

pub fn run(args: GraphArgs) {
    let model = load_model_or_exit(&args.model_path);
    let analysis = Generator::new(Config::new())
        .analyze(&model)
        .unwrap_or_else(|e| {
            eprintln!("error: {}", e);
            std::process::exit(1);
        });

    let graph = Graph::new(&model, &analysis);
    if args.json {
        match serde_json::to_string_pretty(&graph) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", graph.render_text());
    }
}

impl Graph {
    pub fn new(model: &Model, analysis: &Analysis) -> Self {
        let modules = analysis
            .modules
            .iter()
            .map(|module| ModuleGraph {
                name: module.id.name.clone(),
                class: module.class.map(|id| model.classes.get(id).name.clone()),
                templates: module
                    .templates
                    .iter()
                    .map(|&t| model.templates[t].class.name.clone())
                    .collect(),
                raw: module_names(&module.imports.raw),
                same_layer: module_names(&module.imports.same_layer),
                parent_layer: module_names(&module.imports.parent_layer),
                deferred: module_names(&module.imports.deferred),
                needs_stub: module.needs_stub,
                daughters: class_names(model, analysis.hierarchy.daughters(&module.id)),
                daughters_self: class_names(model, analysis.hierarchy.daughters_self(&module.id)),
            })
            .collect();
        Self {
            package: model.package.clone(),
            modules,
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for (i, module) in self.modules.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = write!(out, "{}::{}", self.package, module.name);
            if let Some(class) = &module.class {
                let _ = write!(out, " (class {})", class);
            }
            for template in &module.templates {
                let _ = write!(out, " (template {})", template);
            }
            if module.needs_stub {
                out.push_str(" [stub]");
            }
            out.push('\n');
            row(&mut out, "raw", &module.raw);
            row(&mut out, "same-layer", &module.same_layer);
            row(&mut out, "parent-layer", &module.parent_layer);
            row(&mut out, "deferred", &module.deferred);
            row(&mut out, "daughters", &module.daughters);
            row(&mut out, "daughters+self", &module.daughters_self);
        }
        out
    }
}

fn row(out: &mut String, label: &str, items: &[String]) {
    let items = if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    };
    let _ = writeln!(out, "  {:<16}{}", format!("{}:", label), items);
}

fn class_names(model: &Model, ids: impl Iterator<Item = ClassId>) -> Vec<String> {
    ids.map(|id| model.classes.get(id).name.clone()).collect()
}

fn module_names(set: &IndexSet<ModuleId>) -> Vec<String> {
    set.iter().map(ToString::to_string).collect()
}
