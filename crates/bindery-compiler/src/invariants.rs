//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use indexmap::IndexSet;

use bindery_core::ClassId;

use crate::hierarchy::Hierarchy;
use crate::symbols::{Entry, SymbolTable};

impl Hierarchy {
    pub(crate) fn ensure_ancestors(&self, id: ClassId) -> &IndexSet<ClassId> {
        self.ancestor_sets().get(id.index()).unwrap_or_else(|| {
            panic!(
                "Hierarchy: class {} not resolved \
                 (hierarchy must be built from the same ClassSet)",
                id.index()
            )
        })
    }
}

impl SymbolTable {
    pub(crate) fn ensure_entries(&self, class: ClassId) -> &[Entry] {
        self.class_entries().get(class.index()).unwrap_or_else(|| {
            panic!(
                "SymbolTable: class {} has no entries \
                 (table must be built from the same Model)",
                class.index()
            )
        })
    }
}
