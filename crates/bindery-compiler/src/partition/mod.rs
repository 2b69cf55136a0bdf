//! Module partitioning.
//!
//! One module per local class, named after the class identifier, plus one per template
//! that is not grouped into a class module. Each module gets its four import sets; the
//! set is built once and never patched.

mod imports;

#[cfg(test)]
mod partition_tests;

use indexmap::{IndexMap, IndexSet};

use bindery_core::{ClassId, Model, ModuleId};

use crate::hierarchy::Hierarchy;
use crate::symbols::SymbolTable;

pub use imports::ModuleImports;

#[derive(Clone, Debug)]
pub struct Module {
    pub id: ModuleId,
    pub class: Option<ClassId>,
    /// Indexes into the model's templates.
    pub templates: Vec<usize>,
    pub imports: ModuleImports,
    /// Some other module defers its interface import of this one.
    pub needs_stub: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ModuleSet {
    modules: IndexMap<String, Module>,
}

impl ModuleSet {
    #[tracing::instrument(level = "debug", skip_all, fields(package = %model.package))]
    pub fn build(model: &Model, hierarchy: &Hierarchy, symbols: &SymbolTable) -> Self {
        let mut modules = IndexMap::new();

        for (id, class) in model.local_classes() {
            let own = class.module_id();
            let mut raw = IndexSet::new();
            let mut virtual_refs = IndexSet::new();
            for entry in symbols.declared(id) {
                let function = &class.functions[entry.index];
                for ty in function.signature_types() {
                    for name in ty.class_refs() {
                        let Some(referenced) = model.classes.by_name(name) else {
                            continue;
                        };
                        let module = referenced.module_id();
                        if module == own {
                            continue;
                        }
                        if function.is_virtual() {
                            virtual_refs.insert(module.clone());
                        }
                        raw.insert(module);
                    }
                }
            }
            let ancestors = hierarchy
                .ancestors(id)
                .iter()
                .map(|&a| model.classes.get(a).module_id())
                .filter(|m| *m != own)
                .collect();

            modules.insert(
                own.name.clone(),
                Module {
                    id: own,
                    class: Some(id),
                    templates: Vec::new(),
                    imports: ModuleImports::new(raw, ancestors, virtual_refs),
                    needs_stub: false,
                },
            );
        }

        for (index, template) in model.templates.iter().enumerate() {
            let module = modules
                .entry(template.module.clone())
                .or_insert_with(|| Module {
                    id: ModuleId::new(&model.package, &template.module),
                    class: None,
                    templates: Vec::new(),
                    imports: ModuleImports::default(),
                    needs_stub: false,
                });
            module.templates.push(index);
            for function in &template.class.functions {
                for ty in function.signature_types() {
                    for name in ty.class_refs() {
                        if let Some(referenced) = model.classes.by_name(name) {
                            let referenced = referenced.module_id();
                            if referenced != module.id {
                                module.imports.raw.insert(referenced.clone());
                                if !module.imports.parent_layer.contains(&referenced) {
                                    module.imports.same_layer.insert(referenced);
                                }
                            }
                        }
                    }
                }
            }
        }

        let mut set = Self { modules };
        set.defer_symmetric(hierarchy);
        tracing::debug!(modules = set.len(), "partitioned modules");
        set
    }

    /// Break every symmetric parent-layer dependency between two local modules.
    ///
    /// When one side is an ancestor of the other, the supertrait edge stays direct and the
    /// reverse edge is deferred. Otherwise the edge pointing at the later module is.
    fn defer_symmetric(&mut self, hierarchy: &Hierarchy) {
        let names: Vec<String> = self.modules.keys().cloned().collect();
        let mut deferrals = Vec::new();
        for (i, first) in names.iter().enumerate() {
            for second in &names[i + 1..] {
                let (a, b) = (&self.modules[first], &self.modules[second]);
                let symmetric = a.imports.parent_layer.contains(&b.id)
                    && b.imports.parent_layer.contains(&a.id);
                if !symmetric {
                    continue;
                }
                let below = |x: Option<ClassId>, y: Option<ClassId>| {
                    matches!((x, y), (Some(x), Some(y)) if hierarchy.is_ancestor(y, x))
                };
                // (from, to): `from` reaches `to` through its stub.
                let forward = (first.clone(), second.clone());
                let backward = (second.clone(), first.clone());
                let edge = if below(a.class, b.class) {
                    backward
                } else if below(b.class, a.class) || first < second {
                    forward
                } else {
                    backward
                };
                deferrals.push(edge);
            }
        }
        for (from, to) in deferrals {
            tracing::trace!(%from, %to, "deferred interface import");
            let target = self.modules[&to].id.clone();
            if let Some(module) = self.modules.get_mut(&from) {
                module.imports.deferred.insert(target);
            }
            if let Some(module) = self.modules.get_mut(&to) {
                module.needs_stub = true;
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
