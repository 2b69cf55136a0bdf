use std::path::Path;

use indoc::indoc;

use super::{Artifact, ArtifactBody, ArtifactKind, Emission, Emitter, ForeignItem, HostItem};
use crate::config::Config;
use crate::hierarchy::Hierarchy;
use crate::partition::ModuleSet;
use crate::symbols::SymbolTable;
use crate::test_utils::{DIAMOND, TWO_CLASSES, model};

fn emit(json: &str) -> Emission {
    emit_with(json, &Config::new())
}

fn emit_with(json: &str, config: &Config) -> Emission {
    let m = model(json);
    let h = Hierarchy::resolve(&m.classes).expect("acyclic");
    let symbols = SymbolTable::build(&m, &h).expect("no collisions");
    let modules = ModuleSet::build(&m, &h, &symbols);
    Emitter::new(&m, &h, &symbols, &modules, config).emit()
}

fn artifact<'e>(emission: &'e Emission, path: &str) -> &'e Artifact {
    emission
        .artifacts()
        .find(|a| a.path == Path::new(path))
        .unwrap_or_else(|| panic!("no artifact at {path}"))
}

fn host(artifact: &Artifact) -> &[HostItem] {
    match &artifact.body {
        ArtifactBody::Host(items) => items,
        ArtifactBody::Foreign(_) => panic!("{} is not a host artifact", artifact.path.display()),
    }
}

fn foreign(artifact: &Artifact) -> &[ForeignItem] {
    match &artifact.body {
        ArtifactBody::Foreign(items) => items,
        ArtifactBody::Host(_) => panic!("{} is not a foreign artifact", artifact.path.display()),
    }
}

fn uses(items: &[HostItem]) -> Vec<&str> {
    items
        .iter()
        .filter_map(|item| match item {
            HostItem::Use { path, .. } => Some(path.as_str()),
            _ => None,
        })
        .collect()
}

fn trait_methods(items: &[HostItem]) -> Vec<&str> {
    items
        .iter()
        .filter_map(|item| match item {
            HostItem::Trait { items, .. } => Some(items),
            _ => None,
        })
        .flatten()
        .map(|f| f.name.as_str())
        .collect()
}

fn trait_impls(items: &[HostItem]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            HostItem::Impl {
                trait_name: Some(t),
                target,
                ..
            } => Some(format!("{t} for {target}")),
            _ => None,
        })
        .collect()
}

fn inherent_fns(items: &[HostItem]) -> Vec<&str> {
    items
        .iter()
        .filter_map(|item| match item {
            HostItem::Impl {
                trait_name: None,
                items,
                ..
            } => Some(items),
            _ => None,
        })
        .flatten()
        .map(|f| f.name.as_str())
        .collect()
}

fn wrapper_symbols(items: &[ForeignItem]) -> Vec<&str> {
    let mut out = Vec::new();
    for item in items {
        match item {
            ForeignItem::ExternC(inner) => out.extend(wrapper_symbols(inner)),
            ForeignItem::Prototype(sig) | ForeignItem::Definition { sig, .. } => {
                out.push(sig.symbol.as_str())
            }
            _ => {}
        }
    }
    out
}

fn definition_bodies(items: &[ForeignItem]) -> Vec<&str> {
    let mut out = Vec::new();
    for item in items {
        match item {
            ForeignItem::ExternC(inner) => out.extend(definition_bodies(inner)),
            ForeignItem::Definition { body, .. } => out.extend(body.iter().map(String::as_str)),
            _ => {}
        }
    }
    out
}

#[test]
fn two_classes_scenario() {
    let emission = emit(TWO_CLASSES);
    let modules: Vec<&str> = emission.modules.iter().map(|m| m.module.name.as_str()).collect();
    assert_eq!(modules, ["a", "b"]);

    let b_interface = host(artifact(&emission, "src/b/interface.rs"));
    assert_eq!(trait_methods(b_interface), ["method2"]);
    let b_uses = uses(b_interface);
    assert!(b_uses.contains(&"crate::a::interface::IA"));
    assert!(b_uses.contains(&"crate::a::raw::{A, RawA}"));

    let b_impl = host(artifact(&emission, "src/b/implementation.rs"));
    assert_eq!(trait_impls(b_impl), ["IA for B", "IB for B"]);
    assert_eq!(inherent_fns(b_impl), ["new_b"]);

    let a_impl = host(artifact(&emission, "src/a/implementation.rs"));
    assert_eq!(trait_impls(a_impl), ["IA for A"]);
    assert_eq!(inherent_fns(a_impl), ["new_a", "delete"]);

    assert!(
        emission
            .artifacts()
            .all(|a| a.kind != ArtifactKind::ForwardStub)
    );
}

#[test]
fn capability_supertraits_follow_parents() {
    let emission = emit(TWO_CLASSES);
    let supertraits = |path: &str| -> Vec<String> {
        host(artifact(&emission, path))
            .iter()
            .find_map(|item| match item {
                HostItem::Trait { supertraits, .. } => Some(supertraits.clone()),
                _ => None,
            })
            .expect("capability trait")
    };
    assert_eq!(supertraits("src/a/interface.rs"), ["Upcast<A>"]);
    assert_eq!(supertraits("src/b/interface.rs"), ["IA", "Upcast<B>"]);
}

#[test]
fn wrappers_cover_every_declared_entry() {
    let emission = emit(TWO_CLASSES);

    let header = foreign(artifact(&emission, "csrc/B.h"));
    assert_eq!(
        wrapper_symbols(header),
        [
            "shapes_b_newb",
            "shapes_b_method2",
            "shapes_b_as_a",
            "shapes_b_from_a"
        ]
    );
    assert!(header.contains(&ForeignItem::Include {
        path: "A.h".to_string(),
        system: false,
    }));

    let source = foreign(artifact(&emission, "csrc/B.cpp"));
    assert_eq!(
        definition_bodies(source),
        [
            "return reinterpret_cast<B_p>(new B());",
            "return reinterpret_cast<A_p>(new A(\
             reinterpret_cast<B*>(self_)->method2(*reinterpret_cast<A*>(x))));",
            "return reinterpret_cast<A_p>(static_cast<A*>(reinterpret_cast<B*>(self_)));",
            "return reinterpret_cast<B_p>(static_cast<B*>(reinterpret_cast<A*>(base)));",
        ]
    );
    let includes: Vec<&str> = source
        .iter()
        .filter_map(|item| match item {
            ForeignItem::Include { path, .. } => Some(path.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(includes, ["B.h", "B.hpp", "A.hpp"]);
    let namespaces = source
        .iter()
        .filter(|item| matches!(item, ForeignItem::UsingNamespace(ns) if ns == "geo"))
        .count();
    assert_eq!(namespaces, 1);

    let a_source = foreign(artifact(&emission, "csrc/A.cpp"));
    assert_eq!(
        definition_bodies(a_source),
        [
            "return reinterpret_cast<A_p>(new A());",
            "reinterpret_cast<A*>(self_)->method1();",
            "delete reinterpret_cast<A*>(self_);",
        ]
    );
}

#[test]
fn overriding_virtual_is_served_by_ancestor_capability() {
    let emission = emit(indoc! {r#"
        {
            "package": "p",
            "classes": [
                {"name": "Base", "functions": [
                    {"kind": "virtual", "ret": {"primitive": "int"}, "name": "size"}
                ]},
                {"name": "Derived", "parents": ["Base"], "functions": [
                    {"kind": "virtual", "ret": {"primitive": "int"}, "name": "size"},
                    {"kind": "virtual", "ret": {"primitive": "void"}, "name": "grow"}
                ]}
            ]
        }
    "#});
    let interface = host(artifact(&emission, "src/derived/interface.rs"));
    assert_eq!(trait_methods(interface), ["grow"]);
    let header = foreign(artifact(&emission, "csrc/Derived.h"));
    assert_eq!(
        wrapper_symbols(header),
        ["p_derived_grow", "p_derived_as_base", "p_derived_from_base"]
    );
}

#[test]
fn abstract_class_declares_capability_without_implementing_it() {
    let emission = emit(indoc! {r#"
        {
            "package": "p",
            "classes": [
                {"name": "Shape", "abstract": true, "functions": [
                    {"kind": "constructor"},
                    {"kind": "virtual", "ret": {"primitive": "double"}, "name": "area"}
                ]},
                {"name": "Circle", "parents": ["Shape"], "functions": [
                    {"kind": "constructor", "args": [{"type": {"primitive": "double"}, "name": "r"}]}
                ]}
            ]
        }
    "#});
    let shape_impl = host(artifact(&emission, "src/shape/implementation.rs"));
    assert!(trait_impls(shape_impl).is_empty());
    assert!(inherent_fns(shape_impl).is_empty());
    assert_eq!(
        wrapper_symbols(foreign(artifact(&emission, "csrc/Shape.h"))),
        ["p_shape_area"]
    );

    let circle_impl = host(artifact(&emission, "src/circle/implementation.rs"));
    assert_eq!(trait_impls(circle_impl), ["IShape for Circle", "ICircle for Circle"]);
}

const MULTIPLE: &str = indoc! {r#"
    {
        "package": "mi",
        "classes": [
            {"name": "Left", "functions": [
                {"kind": "virtual", "ret": {"primitive": "int"}, "name": "left"}
            ]},
            {"name": "Right", "functions": [
                {"kind": "virtual", "ret": {"primitive": "double"}, "name": "area"}
            ]},
            {"name": "Multi", "parents": ["Left", "Right"], "functions": [
                {"kind": "constructor"},
                {"kind": "virtual", "ret": {"primitive": "double"}, "name": "area"}
            ]}
        ],
        "functions": [
            {"ret": {"primitive": "double"}, "name": "measure",
             "args": [{"type": {"reference": {"primitive": {"class": "Right"}}}, "name": "r"}]}
        ]
    }
"#};

fn impl_bodies<'i>(items: &'i [HostItem], trait_name: &str) -> Vec<(&'i str, &'i [String])> {
    items
        .iter()
        .filter_map(|item| match item {
            HostItem::Impl {
                trait_name: Some(t),
                items,
                ..
            } if t == trait_name => Some(items),
            _ => None,
        })
        .flatten()
        .map(|f| (f.name.as_str(), f.body.as_deref().unwrap_or_default()))
        .collect()
}

#[test]
fn second_base_is_reached_through_its_subobject() {
    let emission = emit(MULTIPLE);

    // The override dispatches through `Right`'s wrapper; `Multi` adds only casts.
    assert_eq!(
        wrapper_symbols(foreign(artifact(&emission, "csrc/Multi.h"))),
        [
            "mi_multi_newmulti",
            "mi_multi_as_left",
            "mi_multi_from_left",
            "mi_multi_as_right",
            "mi_multi_from_right",
        ]
    );

    let source = foreign(artifact(&emission, "csrc/Multi.cpp"));
    let bodies = definition_bodies(source);
    assert!(bodies.contains(
        &"return reinterpret_cast<Right_p>(static_cast<Right*>(reinterpret_cast<Multi*>(self_)));"
    ));
    assert!(bodies.contains(
        &"return reinterpret_cast<Multi_p>(static_cast<Multi*>(reinterpret_cast<Right*>(base)));"
    ));

    let raw = host(artifact(&emission, "src/multi/raw.rs"));
    assert!(uses(raw).contains(&"crate::right::raw::{Right, RawRight}"));
    assert_eq!(
        impl_bodies(raw, "bindery_runtime::Upcast<Right>"),
        [
            ("upcast_raw", &["unsafe { mi_multi_as_right(self.0) }".to_string()][..]),
            ("downcast_raw", &["Self(unsafe { mi_multi_from_right(raw) })".to_string()][..]),
        ]
    );

    // Inherited defaults ask the implementor for the `Right` subobject.
    let right = host(artifact(&emission, "src/right/interface.rs"));
    let area = right
        .iter()
        .find_map(|item| match item {
            HostItem::Trait { items, .. } => items.iter().find(|f| f.name == "area"),
            _ => None,
        })
        .expect("area");
    assert_eq!(
        area.body.as_deref(),
        Some(&["unsafe { mi_right_area(<Self as Upcast<Right>>::upcast_raw(self)) }".to_string()][..])
    );

    let toplevel = host(artifact(&emission, "src/toplevel.rs"));
    let measure = toplevel
        .iter()
        .find_map(|item| match item {
            HostItem::Fn(f) if f.name == "measure" => f.body.as_ref(),
            _ => None,
        })
        .expect("measure");
    assert!(measure[0].contains("bindery_runtime::Upcast::<Right>::upcast_raw(r)"));
}

#[test]
fn diamond_casts_follow_the_first_parent() {
    let emission = emit(DIAMOND);
    let bodies = definition_bodies(foreign(artifact(&emission, "csrc/Bottom.cpp")));
    assert_eq!(
        bodies,
        [
            "return reinterpret_cast<Left_p>(static_cast<Left*>(reinterpret_cast<Bottom*>(self_)));",
            "return reinterpret_cast<Bottom_p>(static_cast<Bottom*>(reinterpret_cast<Left*>(base)));",
            "return reinterpret_cast<Right_p>(static_cast<Right*>(reinterpret_cast<Bottom*>(self_)));",
            "return reinterpret_cast<Bottom_p>(static_cast<Bottom*>(reinterpret_cast<Right*>(base)));",
            "return reinterpret_cast<Top_p>(\
             static_cast<Top*>(static_cast<Left*>(reinterpret_cast<Bottom*>(self_))));",
            "return reinterpret_cast<Bottom_p>(\
             static_cast<Bottom*>(static_cast<Left*>(reinterpret_cast<Top*>(base))));",
        ]
    );
}

const MUTUAL: &str = indoc! {r#"
    {
        "package": "graph",
        "classes": [
            {"name": "Node", "functions": [
                {"kind": "virtual", "ret": {"pointer": {"primitive": {"class": "Edge"}}}, "name": "first_edge"}
            ]},
            {"name": "Edge", "functions": [
                {"kind": "virtual", "ret": {"pointer": {"primitive": {"class": "Node"}}}, "name": "target"}
            ]}
        ]
    }
"#};

#[test]
fn symmetric_interface_imports_go_through_a_forward_stub() {
    let emission = emit(MUTUAL);
    let stubs: Vec<&Path> = emission
        .artifacts()
        .filter(|a| a.kind == ArtifactKind::ForwardStub)
        .map(|a| a.path.as_path())
        .collect();
    assert_eq!(stubs, [Path::new("src/node/forward.rs")]);

    let edge_interface = host(artifact(&emission, "src/edge/interface.rs"));
    assert!(uses(edge_interface).contains(&"crate::node::forward::{INode, Node, RawNode}"));
    let node_interface = host(artifact(&emission, "src/node/interface.rs"));
    assert!(uses(node_interface).contains(&"crate::edge::interface::IEdge"));

    // The implementation layer always imports directly.
    let edge_impl = host(artifact(&emission, "src/edge/implementation.rs"));
    assert!(uses(edge_impl).contains(&"crate::node::interface::INode"));
}

#[test]
fn forward_stubs_can_be_disabled() {
    let emission = emit_with(MUTUAL, &Config::new().emit_forward_stubs(false));
    assert!(
        emission
            .artifacts()
            .all(|a| a.kind != ArtifactKind::ForwardStub)
    );
    let edge_interface = host(artifact(&emission, "src/edge/interface.rs"));
    assert!(uses(edge_interface).contains(&"crate::node::interface::INode"));
}

#[test]
fn template_declaration_and_requests() {
    let emission = emit(indoc! {r#"
        {
            "package": "p",
            "templates": [{
                "name": "Vector",
                "header": "vector",
                "functions": [
                    {"kind": "constructor"},
                    {"kind": "non_virtual", "ret": {"primitive": "void"}, "name": "push_back",
                     "args": [{"type": {"const": "template_param"}, "name": "x"}]},
                    {"kind": "destructor"}
                ],
                "instances": [
                    {"argument": {"primitive": "int"}, "module": "vector_int"},
                    {"argument": {"primitive": "double"}, "module": "vector_double"}
                ]
            }]
        }
    "#});
    let decl = artifact(&emission, "src/vector/template.rs");
    assert_eq!(decl.kind, ArtifactKind::Template);
    let methods: Vec<(&str, bool)> = host(decl)
        .iter()
        .filter_map(|item| match item {
            HostItem::Trait { items, generic, .. } => {
                assert!(*generic);
                Some(items)
            }
            _ => None,
        })
        .flatten()
        .map(|f| {
            assert!(f.body.is_none());
            (f.name.as_str(), f.sized)
        })
        .collect();
    assert_eq!(
        methods,
        [("new_vector", true), ("vector_push_back", false), ("delete", true)]
    );

    let instances = host(artifact(&emission, "src/vector/instances.rs"));
    let requests: Vec<&[(String, String)]> = instances
        .iter()
        .filter_map(|item| match item {
            HostItem::MacroCall { name, fields } => {
                assert_eq!(name, "instantiate_template");
                Some(fields.as_slice())
            }
            _ => None,
        })
        .collect();
    assert_eq!(requests.len(), 2);
    let field = |fields: &[(String, String)], key: &str| -> String {
        fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    };
    assert_eq!(field(requests[0], "template"), "Vector");
    assert_eq!(field(requests[0], "header"), "\"vector\"");
    assert_eq!(field(requests[0], "argument"), "c_int");
    assert_eq!(field(requests[0], "cpp_argument"), "\"int\"");
    assert_eq!(field(requests[1], "module"), "vector_double");
    assert!(uses(instances).contains(&"std::ffi::{c_double, c_int}"));
}

#[test]
fn grouped_template_shares_the_class_module() {
    let emission = emit(indoc! {r#"
        {
            "package": "p",
            "classes": [{"name": "Pool"}],
            "templates": [{
                "name": "Handle",
                "header": "pool.hpp",
                "module": "pool",
                "instances": [{"argument": {"primitive": {"class": "Pool"}}, "module": "pool_handle"}]
            }]
        }
    "#});
    let pool = emission
        .modules
        .iter()
        .find(|m| m.module.name == "pool")
        .expect("pool module");
    let paths: Vec<&Path> = pool.artifacts.iter().map(|a| a.path.as_path()).collect();
    assert!(paths.contains(&Path::new("src/pool/template_handle.rs")));
    assert!(paths.contains(&Path::new("src/pool/instances_handle.rs")));

    let instances = host(artifact(&emission, "src/pool/instances_handle.rs"));
    assert!(uses(instances).contains(&"super::template_handle::{Handle, IHandle}"));
    assert!(uses(instances).contains(&"crate::pool::raw::{Pool, RawPool}"));
}

#[test]
fn free_functions_and_aggregate() {
    let emission = emit(indoc! {r#"
        {
            "package": "my-lib",
            "classes": [{"name": "Widget", "functions": [{"kind": "constructor"}]}],
            "functions": [
                {"ret": {"primitive": "int"}, "name": "version"},
                {"ret": {"primitive": "void"}, "name": "show",
                 "args": [{"type": {"reference": {"primitive": {"class": "Widget"}}}, "name": "w"}]}
            ],
            "modules": {"toplevel": {"headers": ["api.hpp", "cstdio"]}}
        }
    "#});
    let header = foreign(artifact(&emission, "csrc/TopLevel.h"));
    assert_eq!(wrapper_symbols(header), ["my_lib_version", "my_lib_show"]);

    let source = foreign(artifact(&emission, "csrc/TopLevel.cpp"));
    assert!(source.contains(&ForeignItem::Include {
        path: "cstdio".to_string(),
        system: true,
    }));
    assert_eq!(
        definition_bodies(source),
        ["return version();", "show(*reinterpret_cast<Widget*>(w));"]
    );

    let toplevel = host(artifact(&emission, "src/toplevel.rs"));
    assert!(uses(toplevel).contains(&"crate::widget::interface::IWidget"));
    let show = toplevel
        .iter()
        .find_map(|item| match item {
            HostItem::Fn(f) if f.name == "show" => Some(f),
            _ => None,
        })
        .expect("show");
    assert_eq!(show.params[0].ty, "&impl IWidget");

    let lib = host(artifact(&emission, "src/lib.rs"));
    assert!(lib.contains(&HostItem::ModDecl("toplevel".to_string())));
    assert!(lib.contains(&HostItem::Module {
        name: "widget".to_string(),
        children: vec![
            "raw".to_string(),
            "interface".to_string(),
            "cast".to_string(),
            "implementation".to_string(),
        ],
        reexports: vec![
            "raw::Widget".to_string(),
            "interface::IWidget".to_string(),
            "cast::{upcast_widget, downcast_widget}".to_string(),
        ],
    }));
    assert!(uses(lib).contains(&"widget::{Widget, IWidget, upcast_widget, downcast_widget}"));
    assert!(uses(lib).contains(&"toplevel::*"));
}
