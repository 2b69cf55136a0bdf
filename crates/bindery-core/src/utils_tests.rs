use crate::utils::{escape_keyword, is_identifier, to_snake_case};

#[test]
fn snake_case_from_pascal() {
    assert_eq!(to_snake_case("FooBar"), "foo_bar");
    assert_eq!(to_snake_case("Foo"), "foo");
    assert_eq!(to_snake_case("A"), "a");
}

#[test]
fn snake_case_from_camel() {
    assert_eq!(to_snake_case("fooBar"), "foo_bar");
    assert_eq!(to_snake_case("newA"), "new_a");
    assert_eq!(to_snake_case("method1"), "method1");
}

#[test]
fn snake_case_keeps_acronyms_together() {
    assert_eq!(to_snake_case("HTTPServer"), "http_server");
    assert_eq!(to_snake_case("newQPoint"), "new_q_point");
    assert_eq!(to_snake_case("IO"), "io");
}

#[test]
fn snake_case_idempotent() {
    assert_eq!(to_snake_case("foo_bar"), "foo_bar");
    assert_eq!(to_snake_case("a_foo_Bar"), "a_foo_bar");
}

#[test]
fn identifiers() {
    assert!(is_identifier("A"));
    assert!(is_identifier("_private2"));
    assert!(!is_identifier(""));
    assert!(!is_identifier("2d"));
    assert!(!is_identifier("std::string"));
}

#[test]
fn keywords_are_escaped() {
    assert_eq!(escape_keyword("type"), "r#type");
    assert_eq!(escape_keyword("move"), "r#move");
    assert_eq!(escape_keyword("size"), "size");
}

#[test]
fn path_keywords_get_suffix() {
    assert_eq!(escape_keyword("self"), "self_");
    assert_eq!(escape_keyword("crate"), "crate_");
}
