pub mod check;
pub mod generate;
pub mod graph;
pub mod model_loader;

#[cfg(test)]
mod model_loader_tests;

/// `A` and `B: A` in separate modules, as a model file would declare them.
#[cfg(test)]
pub(crate) const SHAPES: &str = indoc::indoc! {r#"
    {
        "package": "shapes",
        "classes": [
            {"name": "A", "functions": [
                {"kind": "constructor"},
                {"kind": "virtual", "ret": {"primitive": "void"}, "name": "method1"},
                {"kind": "destructor"}
            ]},
            {"name": "B", "parents": ["A"], "functions": [
                {"kind": "constructor"},
                {
                    "kind": "virtual",
                    "ret": {"primitive": {"class": "A"}},
                    "name": "method2",
                    "args": [{"type": {"primitive": {"class": "A"}}, "name": "x"}]
                }
            ]}
        ],
        "modules": {
            "a": {"namespaces": ["geo"], "headers": ["A.hpp"]},
            "b": {"namespaces": ["geo"], "headers": ["B.hpp"]}
        }
    }
"#};
