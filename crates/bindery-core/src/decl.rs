//! Declarative input, 1:1 with the JSON model file.
//!
//! Nothing here is validated; [`crate::Model::from_decl`] resolves names and checks
//! every signature.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::function::{FreeFunction, Function};
use crate::template::TemplateInstance;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDecl {
    pub package: String,
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    #[serde(default)]
    pub functions: Vec<FreeFunction>,
    #[serde(default)]
    pub templates: Vec<TemplateDecl>,
    /// Module name -> C++ unit it wraps. Used for grouping only.
    #[serde(default)]
    pub modules: IndexMap<String, ModuleUnit>,
}

impl PackageDecl {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    /// Owning package when the class is defined by another binding package.
    #[serde(default)]
    pub package: Option<String>,
    /// Parent names, in declaration order.
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub protected: Vec<String>,
    #[serde(default)]
    pub functions: Vec<Function>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDecl {
    pub name: String,
    pub header: String,
    /// Class module to group into; defaults to a module of its own.
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub functions: Vec<Function>,
    #[serde(default)]
    pub instances: Vec<TemplateInstance>,
}

/// Namespaces and headers of the C++ unit behind a module.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleUnit {
    #[serde(default)]
    pub namespaces: Vec<String>,
    #[serde(default)]
    pub headers: Vec<String>,
}
