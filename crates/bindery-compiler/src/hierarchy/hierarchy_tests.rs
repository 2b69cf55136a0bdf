use bindery_core::{ClassId, Model, ModelError, ModuleId};

use super::{Hierarchy, ancestor_closure};
use crate::test_utils::{DIAMOND, TWO_CLASSES, class_id, model};

fn names(model: &Model, ids: impl IntoIterator<Item = ClassId>) -> Vec<String> {
    ids.into_iter()
        .map(|id| model.classes.get(id).name.clone())
        .collect()
}

#[test]
fn shared_ancestor_appears_once() {
    let m = model(DIAMOND);
    let bottom = class_id(&m, "Bottom");
    let closure = ancestor_closure(&m.classes, bottom).expect("acyclic");
    assert_eq!(names(&m, closure), vec!["Left", "Right", "Top"]);
}

#[test]
fn closure_is_idempotent() {
    let m = model(DIAMOND);
    let h = Hierarchy::resolve(&m.classes).expect("acyclic");
    for id in m.classes.ids() {
        let closure = h.ancestors(id);
        for &ancestor in closure {
            // Every ancestor's own closure is already contained.
            assert!(h.ancestors(ancestor).is_subset(closure));
        }
        let again = ancestor_closure(&m.classes, id).expect("acyclic");
        assert_eq!(&again, closure);
    }
}

#[test]
fn path_follows_the_first_parent_through_a_diamond() {
    let m = model(DIAMOND);
    let h = Hierarchy::resolve(&m.classes).expect("acyclic");
    let bottom = class_id(&m, "Bottom");

    let to_top = h.path(&m.classes, bottom, class_id(&m, "Top"));
    assert_eq!(names(&m, to_top), vec!["Left", "Top"]);
    let to_right = h.path(&m.classes, bottom, class_id(&m, "Right"));
    assert_eq!(names(&m, to_right), vec!["Right"]);
    assert!(h.path(&m.classes, bottom, bottom).is_empty());
}

#[test]
fn cycle_is_rejected_with_its_path() {
    let m = model(
        r#"{"package": "p", "classes": [
            {"name": "A", "parents": ["C"]},
            {"name": "B", "parents": ["A"]},
            {"name": "C", "parents": ["B"]}
        ]}"#,
    );
    let err = Hierarchy::resolve(&m.classes).unwrap_err();
    assert_eq!(
        err,
        ModelError::ParentCycle {
            path: vec!["A".into(), "C".into(), "B".into(), "A".into()],
        }
    );
}

#[test]
fn self_parent_is_a_cycle() {
    let m = model(r#"{"package": "p", "classes": [{"name": "A", "parents": ["A"]}]}"#);
    let err = ancestor_closure(&m.classes, class_id(&m, "A")).unwrap_err();
    assert_eq!(
        err,
        ModelError::ParentCycle {
            path: vec!["A".into(), "A".into()],
        }
    );
}

#[test]
fn daughter_maps() {
    let m = model(DIAMOND);
    let h = Hierarchy::resolve(&m.classes).expect("acyclic");
    let top = ModuleId::new("dia", "top");
    let bottom = ModuleId::new("dia", "bottom");

    assert_eq!(names(&m, h.daughters(&top)), vec!["Left", "Right", "Bottom"]);
    assert_eq!(
        names(&m, h.daughters_self(&top)),
        vec!["Top", "Left", "Right", "Bottom"]
    );
    assert_eq!(h.daughters(&bottom).count(), 0);
    assert_eq!(names(&m, h.daughters_self(&bottom)), vec!["Bottom"]);
}

#[test]
fn daughter_self_membership_matches_closure() {
    let m = model(DIAMOND);
    let h = Hierarchy::resolve(&m.classes).expect("acyclic");

    for (module, _) in h.daughter_self_map() {
        for id in m.classes.ids() {
            let member = h.daughters_self(module).any(|d| d == id);
            let reaches = std::iter::once(id)
                .chain(h.ancestors(id).iter().copied())
                .any(|c| &m.classes.get(c).module_id() == module);
            assert_eq!(member, reaches, "{module} / {}", m.classes.get(id).name);
        }
    }
}

#[test]
fn same_input_same_maps() {
    let m = model(TWO_CLASSES);
    let first = Hierarchy::resolve(&m.classes).expect("acyclic");
    let second = Hierarchy::resolve(&m.classes).expect("acyclic");
    assert_eq!(first.daughter_map(), second.daughter_map());
    assert_eq!(first.daughter_self_map(), second.daughter_self_map());
    assert!(first.is_ancestor(class_id(&m, "A"), class_id(&m, "B")));
}
