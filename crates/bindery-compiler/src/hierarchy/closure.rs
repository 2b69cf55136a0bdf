use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};

use bindery_core::{ClassId, ClassSet, ModelError};

/// Every class reachable from `id` through parent edges, breadth-first, without `id`.
///
/// Shared ancestors reached along several paths appear once. Reaching `id` again is a
/// parent cycle and fails with the path that closes it.
pub fn ancestor_closure(classes: &ClassSet, id: ClassId) -> Result<IndexSet<ClassId>, ModelError> {
    let mut closure = IndexSet::new();
    // Child through which each ancestor was first reached.
    let mut via: IndexMap<ClassId, ClassId> = IndexMap::new();
    let mut queue = VecDeque::from([id]);

    while let Some(current) = queue.pop_front() {
        for &parent in &classes.get(current).parents {
            if parent == id {
                return Err(cycle(classes, id, current, &via));
            }
            if closure.insert(parent) {
                via.insert(parent, current);
                queue.push_back(parent);
            }
        }
    }
    Ok(closure)
}

fn cycle(
    classes: &ClassSet,
    start: ClassId,
    last: ClassId,
    via: &IndexMap<ClassId, ClassId>,
) -> ModelError {
    let mut chain = vec![last];
    let mut cursor = last;
    while let Some(&child) = via.get(&cursor) {
        chain.push(child);
        cursor = child;
    }
    // `chain` runs from the last hop back to `start`; `start` closes the loop.
    chain.reverse();
    if chain.first() != Some(&start) {
        chain.insert(0, start);
    }
    chain.push(start);

    let path = chain
        .into_iter()
        .map(|c| classes.get(c).name.clone())
        .collect();
    ModelError::ParentCycle { path }
}
