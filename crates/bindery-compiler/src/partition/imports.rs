use indexmap::IndexSet;

use bindery_core::ModuleId;

/// What a module imports, split by the layer that needs it.
///
/// `same_layer` and `parent_layer` are disjoint. `deferred` is a subset of `parent_layer`:
/// those modules are reached through their forward stub from the interface layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleImports {
    /// Modules supplying handle types used in this module's signatures.
    pub raw: IndexSet<ModuleId>,
    /// Needed by the implementation layer only.
    pub same_layer: IndexSet<ModuleId>,
    /// Needed by the capability interface: ancestors and classes in virtual signatures.
    pub parent_layer: IndexSet<ModuleId>,
    pub deferred: IndexSet<ModuleId>,
}

impl ModuleImports {
    pub(crate) fn new(
        raw: IndexSet<ModuleId>,
        ancestors: IndexSet<ModuleId>,
        virtual_refs: IndexSet<ModuleId>,
    ) -> Self {
        let parent_layer: IndexSet<ModuleId> =
            ancestors.iter().chain(&virtual_refs).cloned().collect();
        let same_layer = raw
            .iter()
            .chain(&ancestors)
            .filter(|m| !parent_layer.contains(*m))
            .cloned()
            .collect();
        Self {
            raw,
            same_layer,
            parent_layer,
            deferred: IndexSet::new(),
        }
    }

    /// Parent-layer modules imported in full by the interface.
    pub fn direct_parents(&self) -> impl Iterator<Item = &ModuleId> {
        self.parent_layer
            .iter()
            .filter(|m| !self.deferred.contains(*m))
    }

    /// Every module the implementation layer imports in full.
    pub fn implementation(&self) -> impl Iterator<Item = &ModuleId> {
        self.parent_layer.iter().chain(&self.same_layer)
    }
}
