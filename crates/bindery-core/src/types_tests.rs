use crate::types::{CppType, Primitive};

#[test]
fn primitives_render_their_cpp_names() {
    assert_eq!(CppType::int().render(), "int");
    assert_eq!(CppType::Primitive(Primitive::ULongLong).render(), "unsigned long long");
    assert_eq!(CppType::Primitive(Primitive::LongDouble).render(), "long double");
    assert_eq!(CppType::class("ns::Widget").render(), "ns::Widget");
}

#[test]
fn pointers_and_references() {
    assert_eq!(CppType::int().ptr().render(), "int*");
    assert_eq!(CppType::int().ptr().ptr().render(), "int**");
    assert_eq!(CppType::class("A").reference().render(), "A&");
}

#[test]
fn const_is_east_side() {
    assert_eq!(CppType::int().constant().render(), "int const");
    assert_eq!(CppType::int().constant().ptr().render(), "int const*");
    assert_eq!(CppType::int().ptr().constant().render(), "int* const");
    assert_eq!(CppType::class("A").constant().reference().render(), "A const&");
}

#[test]
fn arrays_nest_in_declaration_order() {
    assert_eq!(CppType::int().array(3).render(), "int[3]");
    assert_eq!(CppType::int().array(4).array(3).render(), "int[3][4]");
    assert_eq!(CppType::int().array(3).ptr().render(), "int(*)[3]");
}

#[test]
fn pointer_to_function_groups_the_pointer() {
    let callback = CppType::function(vec![CppType::int(), CppType::double()], CppType::void()).ptr();
    assert_eq!(callback.render(), "void(*)(int, double)");

    let returns_pointer = CppType::function(vec![], CppType::int().ptr());
    assert_eq!(returns_pointer.render(), "int*()");
}

#[test]
fn member_pointer() {
    let ty = CppType::MemberPointer {
        owner: "A".into(),
        pointee: Primitive::Int,
    };
    assert_eq!(ty.render(), "int A::*");
}

#[test]
fn restrict_renders_even_though_unsupported() {
    let ty = CppType::Restrict(Box::new(CppType::int().ptr()));
    assert_eq!(ty.render(), "int* __restrict");
    assert!(ty.contains_restrict());
    assert!(!CppType::int().ptr().contains_restrict());
}

#[test]
fn named_declarators() {
    assert_eq!(CppType::int().declarator("x"), "int x");
    assert_eq!(CppType::int().ptr().declarator("p"), "int* p");
    assert_eq!(CppType::int().ptr().constant().declarator("p"), "int* const p");
    assert_eq!(CppType::int().array(3).declarator("xs"), "int xs[3]");

    let callback = CppType::function(vec![CppType::int()], CppType::void()).ptr();
    assert_eq!(callback.declarator("cb"), "void(*cb)(int)");
}

#[test]
fn function_returning_function_pointer_declares_inside_out() {
    let callback = CppType::function(vec![CppType::int()], CppType::void()).ptr();
    assert_eq!(callback.declarator("f(long x)"), "void(*f(long x))(int)");
}

#[test]
fn leaf_substitution() {
    let ty = CppType::class("A").ptr();
    let rendered = ty.declarator_with("", &|p: &Primitive| match p {
        Primitive::ClassRef(name) => format!("{name}_t"),
        other => other.c_name().to_string(),
    });
    assert_eq!(rendered, "A_t*");
}

#[test]
fn class_type_detection() {
    assert!(CppType::class("A").is_class_type());
    assert!(CppType::class("A").constant().ptr().is_class_type());
    assert!(CppType::class("A").reference().is_class_type());
    assert!(!CppType::int().ptr().is_class_type());
    assert!(!CppType::class("A").array(2).is_class_type());
}

#[test]
fn class_refs_are_collected_once_in_order() {
    let ty = CppType::function(
        vec![CppType::class("B").ptr(), CppType::class("A"), CppType::class("B")],
        CppType::class("C").reference(),
    )
    .ptr();
    assert_eq!(ty.class_refs(), vec!["B", "A", "C"]);

    let member = CppType::MemberPointer {
        owner: "Owner".into(),
        pointee: Primitive::Int,
    };
    assert_eq!(member.class_refs(), vec!["Owner"]);
}

#[test]
fn template_param_detection() {
    assert!(CppType::TemplateParam.ptr().contains_template_param());
    assert!(!CppType::int().contains_template_param());
    assert_eq!(CppType::TemplateParam.constant().reference().render(), "T const&");
}

#[test]
fn deserializes_from_json() {
    let ty: CppType = serde_json::from_str(r#"{"pointer": {"const": {"primitive": "char"}}}"#)
        .expect("valid type");
    assert_eq!(ty.render(), "char const*");

    let class: CppType =
        serde_json::from_str(r#"{"reference": {"primitive": {"class": "A"}}}"#).expect("valid type");
    assert_eq!(class, CppType::class("A").reference());

    let uint: CppType = serde_json::from_str(r#"{"primitive": "uint"}"#).expect("valid type");
    assert_eq!(uint.render(), "unsigned int");
}

#[test]
fn class_shapes() {
    use crate::types::ShapeKind;

    let class = CppType::class("A");
    let value = class.class_shape().expect("value shape");
    assert_eq!((value.class, value.kind, value.constant), ("A", ShapeKind::Value, false));

    let const_ref = CppType::class("A").constant().reference();
    let shape = const_ref.class_shape().expect("reference shape");
    assert_eq!((shape.kind, shape.constant), (ShapeKind::Reference, true));

    let ptr = CppType::class("A").ptr().constant();
    let shape = ptr.class_shape().expect("pointer shape");
    assert_eq!((shape.kind, shape.constant), (ShapeKind::Pointer, false));

    assert!(CppType::class("A").ptr().ptr().class_shape().is_none());
    assert!(CppType::class("A").array(2).class_shape().is_none());
    assert!(CppType::int().ptr().class_shape().is_none());
}

#[test]
fn class_values_ignore_member_pointer_owner() {
    let member = CppType::MemberPointer {
        owner: "A".into(),
        pointee: Primitive::Int,
    };
    assert!(!member.mentions_class_value());
    assert!(CppType::class("A").array(2).mentions_class_value());
    assert!(CppType::Primitive(Primitive::LongDouble).ptr().contains_primitive(&Primitive::LongDouble));
}
