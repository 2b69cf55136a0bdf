//! Test fixtures.

use bindery_core::{ClassId, Model};

/// Parse and validate a JSON model, panicking on any error.
pub fn model(json: &str) -> Model {
    Model::from_json(json).unwrap_or_else(|e| panic!("invalid test model: {e}"))
}

pub fn class_id(model: &Model, name: &str) -> ClassId {
    model
        .classes
        .lookup(name)
        .unwrap_or_else(|| panic!("no class `{name}` in test model"))
}

/// `A` with virtual `method1() -> void`; `B extends A` with virtual `method2(x: A) -> A`.
pub const TWO_CLASSES: &str = r#"
{
    "package": "shapes",
    "classes": [
        {
            "name": "A",
            "functions": [
                {"kind": "constructor"},
                {"kind": "virtual", "ret": {"primitive": "void"}, "name": "method1"},
                {"kind": "destructor"}
            ]
        },
        {
            "name": "B",
            "parents": ["A"],
            "functions": [
                {"kind": "constructor"},
                {
                    "kind": "virtual",
                    "ret": {"primitive": {"class": "A"}},
                    "name": "method2",
                    "args": [{"type": {"primitive": {"class": "A"}}, "name": "x"}]
                }
            ]
        }
    ],
    "modules": {
        "a": {"namespaces": ["geo"], "headers": ["A.hpp"]},
        "b": {"namespaces": ["geo"], "headers": ["B.hpp"]}
    }
}
"#;

/// Diamond: `Top`, `Left: Top`, `Right: Top`, `Bottom: Left, Right`.
pub const DIAMOND: &str = r#"
{
    "package": "dia",
    "classes": [
        {"name": "Top"},
        {"name": "Left", "parents": ["Top"]},
        {"name": "Right", "parents": ["Top"]},
        {"name": "Bottom", "parents": ["Left", "Right"]}
    ]
}
"#;
