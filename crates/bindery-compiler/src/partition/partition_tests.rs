use indexmap::IndexSet;
use indoc::indoc;

use bindery_core::{Model, ModuleId};

use super::ModuleSet;
use crate::hierarchy::Hierarchy;
use crate::symbols::SymbolTable;
use crate::test_utils::{DIAMOND, TWO_CLASSES, model};

fn partition(m: &Model) -> ModuleSet {
    let h = Hierarchy::resolve(&m.classes).expect("acyclic");
    let symbols = SymbolTable::build(m, &h).expect("no collisions");
    ModuleSet::build(m, &h, &symbols)
}

fn ids(package: &str, names: &[&str]) -> IndexSet<ModuleId> {
    names.iter().map(|n| ModuleId::new(package, *n)).collect()
}

#[test]
fn two_classes_scenario() {
    let m = model(TWO_CLASSES);
    let set = partition(&m);
    assert_eq!(set.len(), 2);

    let a = set.get("a").expect("module a");
    assert!(a.imports.raw.is_empty());
    assert!(a.imports.parent_layer.is_empty());

    let b = set.get("b").expect("module b");
    assert_eq!(b.imports.raw, ids("shapes", &["a"]));
    assert_eq!(b.imports.parent_layer, ids("shapes", &["a"]));
    assert!(b.imports.same_layer.is_empty());
    assert!(b.imports.deferred.is_empty());
    assert!(set.iter().all(|m| !m.needs_stub));
}

#[test]
fn diamond_parent_layer_holds_every_ancestor_once() {
    let m = model(DIAMOND);
    let set = partition(&m);
    let bottom = set.get("bottom").expect("module bottom");
    assert_eq!(bottom.imports.parent_layer, ids("dia", &["left", "right", "top"]));
    assert!(bottom.imports.raw.is_empty());
}

#[test]
fn non_virtual_references_stay_in_same_layer() {
    let m = model(indoc! {r#"
        {
            "package": "p",
            "classes": [
                {"name": "Point"},
                {"name": "Shape", "functions": [
                    {"kind": "non_virtual", "ret": {"primitive": {"class": "Point"}}, "name": "origin"}
                ]}
            ]
        }
    "#});
    let set = partition(&m);
    let shape = set.get("shape").expect("module shape");
    assert_eq!(shape.imports.raw, ids("p", &["point"]));
    assert_eq!(shape.imports.same_layer, ids("p", &["point"]));
    assert!(shape.imports.parent_layer.is_empty());
}

#[test]
fn symmetric_siblings_defer_toward_the_later_module() {
    let m = model(indoc! {r#"
        {
            "package": "p",
            "classes": [
                {"name": "Node", "functions": [
                    {"kind": "virtual", "ret": {"pointer": {"primitive": {"class": "Edge"}}}, "name": "first_edge"}
                ]},
                {"name": "Edge", "functions": [
                    {"kind": "virtual", "ret": {"pointer": {"primitive": {"class": "Node"}}}, "name": "target"}
                ]}
            ]
        }
    "#});
    let set = partition(&m);
    let edge = set.get("edge").expect("module edge");
    let node = set.get("node").expect("module node");

    assert_eq!(edge.imports.deferred, ids("p", &["node"]));
    assert!(node.imports.deferred.is_empty());
    assert!(node.needs_stub);
    assert!(!edge.needs_stub);
    assert_eq!(edge.imports.direct_parents().count(), 0);
}

#[test]
fn ancestor_keeps_supertrait_edge_direct() {
    let m = model(indoc! {r#"
        {
            "package": "p",
            "classes": [
                {"name": "Base", "functions": [
                    {"kind": "virtual", "ret": {"pointer": {"primitive": {"class": "Derived"}}}, "name": "as_derived"}
                ]},
                {"name": "Derived", "parents": ["Base"]}
            ]
        }
    "#});
    let set = partition(&m);
    let base = set.get("base").expect("module base");
    let derived = set.get("derived").expect("module derived");

    assert_eq!(base.imports.deferred, ids("p", &["derived"]));
    assert!(derived.imports.deferred.is_empty());
    assert!(derived.needs_stub);
}

#[test]
fn external_ancestors_are_imported_but_not_partitioned() {
    let m = model(indoc! {r#"
        {
            "package": "widgets",
            "classes": [
                {"name": "Object", "package": "core-lib"},
                {"name": "Button", "parents": ["Object"]}
            ]
        }
    "#});
    let set = partition(&m);
    assert_eq!(set.len(), 1);
    let button = set.get("button").expect("module button");
    assert_eq!(button.imports.parent_layer, ids("core-lib", &["object"]));
}

#[test]
fn templates_get_their_own_module_unless_grouped() {
    let m = model(indoc! {r#"
        {
            "package": "p",
            "classes": [{"name": "Point"}],
            "templates": [
                {"name": "Vector", "header": "vector",
                 "functions": [{"kind": "non_virtual", "ret": {"primitive": {"class": "Point"}}, "name": "front"}]},
                {"name": "Box", "header": "box.hpp", "module": "point"}
            ]
        }
    "#});
    let set = partition(&m);
    assert_eq!(set.len(), 2);

    let vector = set.get("vector").expect("module vector");
    assert_eq!(vector.class, None);
    assert_eq!(vector.templates, vec![0]);
    assert_eq!(vector.imports.same_layer, ids("p", &["point"]));

    let point = set.get("point").expect("module point");
    assert_eq!(point.templates, vec![1]);
}
