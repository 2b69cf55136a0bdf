//! Template classes and their instantiation requests.

use serde::{Deserialize, Serialize};

use crate::function::Function;
use crate::types::CppType;

/// A class template with a single type parameter (`T` in signatures).
///
/// Never constructible as a value: every use goes through an instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateClass {
    pub name: String,
    #[serde(default)]
    pub functions: Vec<Function>,
}

/// One requested concrete specialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateInstance {
    pub argument: CppType,
    /// Host module the instantiation should produce.
    pub module: String,
}

/// A template class together with where it lives and what to instantiate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    pub class: TemplateClass,
    /// C++ header declaring the template.
    pub header: String,
    /// Module the template is grouped into.
    pub module: String,
    pub instances: Vec<TemplateInstance>,
}

impl Template {
    pub fn ident(&self) -> &str {
        &self.class.name
    }

    /// Whether the template shares a module with a class rather than owning one.
    pub fn is_grouped(&self) -> bool {
        self.module != crate::utils::to_snake_case(&self.class.name)
    }
}
