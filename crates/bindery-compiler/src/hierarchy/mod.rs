//! Hierarchy resolution.
//!
//! Computes, once per run, every class's ancestor closure and the two daughter maps:
//! - `daughters`: module -> classes strictly below the module's class
//! - `daughters_self`: the same, plus the module's own class
//!
//! Both maps depend only on the class set and are built in arena order, so the same
//! input always yields the same maps.

mod closure;

#[cfg(test)]
mod hierarchy_tests;

use indexmap::{IndexMap, IndexSet};

use bindery_core::{ClassId, ClassSet, ModelError, ModuleId};

pub use closure::ancestor_closure;

pub type DaughterMap = IndexMap<ModuleId, IndexSet<ClassId>>;

#[derive(Clone, Debug)]
pub struct Hierarchy {
    ancestors: Vec<IndexSet<ClassId>>,
    daughters: DaughterMap,
    daughters_self: DaughterMap,
}

impl Hierarchy {
    /// Resolve every class. Fails on the first parent cycle.
    #[tracing::instrument(level = "debug", skip_all, fields(classes = classes.len()))]
    pub fn resolve(classes: &ClassSet) -> Result<Self, ModelError> {
        let ancestors = classes
            .ids()
            .map(|id| ancestor_closure(classes, id))
            .collect::<Result<Vec<_>, _>>()?;

        let mut daughters = DaughterMap::new();
        let mut daughters_self = DaughterMap::new();
        for (id, class) in classes.iter() {
            daughters_self
                .entry(class.module_id())
                .or_default()
                .insert(id);
            for &ancestor in &ancestors[id.index()] {
                let module = classes.get(ancestor).module_id();
                daughters.entry(module.clone()).or_default().insert(id);
                daughters_self.entry(module).or_default().insert(id);
            }
        }
        tracing::debug!(
            modules = daughters_self.len(),
            with_descendants = daughters.len(),
            "resolved hierarchy"
        );

        Ok(Self {
            ancestors,
            daughters,
            daughters_self,
        })
    }

    /// Ancestor closure of `id`, nearest first, excluding `id`.
    pub fn ancestors(&self, id: ClassId) -> &IndexSet<ClassId> {
        self.ensure_ancestors(id)
    }

    pub(crate) fn ancestor_sets(&self) -> &[IndexSet<ClassId>] {
        &self.ancestors
    }

    pub fn is_ancestor(&self, ancestor: ClassId, of: ClassId) -> bool {
        self.ancestors(of).contains(&ancestor)
    }

    /// Classes crossed going from `from` up to its ancestor `to`, ending at `to`.
    ///
    /// Takes the first parent leading to `to` at every step, so an ancestor reachable
    /// twice through a diamond always resolves to the same subobject.
    pub fn path(&self, classes: &ClassSet, from: ClassId, to: ClassId) -> Vec<ClassId> {
        let mut path = Vec::new();
        let mut current = from;
        while current != to {
            let next = classes
                .get(current)
                .parents
                .iter()
                .copied()
                .find(|&p| p == to || self.is_ancestor(to, p));
            let Some(next) = next else { break };
            path.push(next);
            current = next;
        }
        path
    }

    /// Classes strictly below the class of `module`.
    pub fn daughters(&self, module: &ModuleId) -> impl Iterator<Item = ClassId> + '_ {
        self.daughters.get(module).into_iter().flatten().copied()
    }

    /// Classes at or below the class of `module`.
    pub fn daughters_self(&self, module: &ModuleId) -> impl Iterator<Item = ClassId> + '_ {
        self.daughters_self.get(module).into_iter().flatten().copied()
    }

    pub fn daughter_map(&self) -> &DaughterMap {
        &self.daughters
    }

    pub fn daughter_self_map(&self) -> &DaughterMap {
        &self.daughters_self
    }
}
