//! Foreign (C++) type model.
//!
//! `CppType` is a recursive tag over the type constructors a wrapped signature can use.
//! Rendering is purely structural: the canonical C++ spelling is built bottom-up from the
//! tag, without consulting class metadata. Declarators follow C++ rules, so nested
//! function and array types come out well-formed (`void(*)(int)`, `int(*)[3]`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Leaf types.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Char,
    Int,
    Long,
    UChar,
    UInt,
    ULong,
    LongLong,
    ULongLong,
    Double,
    LongDouble,
    Bool,
    Void,
    /// Reference to a class of the current class set, by foreign name.
    #[serde(rename = "class")]
    ClassRef(String),
}

impl Primitive {
    /// C++ spelling.
    pub fn c_name(&self) -> &str {
        match self {
            Primitive::Char => "char",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::UChar => "unsigned char",
            Primitive::UInt => "unsigned int",
            Primitive::ULong => "unsigned long",
            Primitive::LongLong => "long long",
            Primitive::ULongLong => "unsigned long long",
            Primitive::Double => "double",
            Primitive::LongDouble => "long double",
            Primitive::Bool => "bool",
            Primitive::Void => "void",
            Primitive::ClassRef(name) => name,
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Primitive::ClassRef(_))
    }
}

/// A foreign type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CppType {
    Primitive(Primitive),
    Pointer(Box<CppType>),
    Reference(Box<CppType>),
    Array {
        size: usize,
        element: Box<CppType>,
    },
    Function {
        #[serde(default)]
        args: Vec<CppType>,
        ret: Box<CppType>,
    },
    Const(Box<CppType>),
    Volatile(Box<CppType>),
    /// Renders, but is rejected in any wrapped signature.
    Restrict(Box<CppType>),
    MemberPointer {
        owner: String,
        pointee: Primitive,
    },
    /// The single type parameter of a template class.
    TemplateParam,
}

impl CppType {
    pub fn void() -> Self {
        CppType::Primitive(Primitive::Void)
    }

    pub fn int() -> Self {
        CppType::Primitive(Primitive::Int)
    }

    pub fn bool() -> Self {
        CppType::Primitive(Primitive::Bool)
    }

    pub fn double() -> Self {
        CppType::Primitive(Primitive::Double)
    }

    pub fn class(name: impl Into<String>) -> Self {
        CppType::Primitive(Primitive::ClassRef(name.into()))
    }

    pub fn ptr(self) -> Self {
        CppType::Pointer(Box::new(self))
    }

    pub fn reference(self) -> Self {
        CppType::Reference(Box::new(self))
    }

    pub fn constant(self) -> Self {
        CppType::Const(Box::new(self))
    }

    pub fn array(self, size: usize) -> Self {
        CppType::Array {
            size,
            element: Box::new(self),
        }
    }

    pub fn function(args: Vec<CppType>, ret: CppType) -> Self {
        CppType::Function {
            args,
            ret: Box::new(ret),
        }
    }

    /// Canonical C++ spelling of the type as an abstract declarator.
    pub fn render(&self) -> String {
        self.declarator("")
    }

    /// Spelling of a declaration of `name` with this type (`int* p`, `void(*cb)(int)`).
    pub fn declarator(&self, name: &str) -> String {
        self.declarator_with(name, &|p: &Primitive| p.c_name().to_string())
    }

    /// Like [`Self::declarator`], with leaf spellings supplied by `leaf`.
    pub fn declarator_with(&self, name: &str, leaf: &dyn Fn(&Primitive) -> String) -> String {
        self.decl(name.to_string(), leaf)
    }

    fn decl(&self, inner: String, leaf: &dyn Fn(&Primitive) -> String) -> String {
        match self {
            CppType::Primitive(p) => attach(leaf(p), &inner),
            CppType::TemplateParam => attach("T".to_string(), &inner),
            CppType::Pointer(t) => t.decl(t.indirect('*', &inner), leaf),
            CppType::Reference(t) => t.decl(t.indirect('&', &inner), leaf),
            CppType::MemberPointer { owner, pointee } => {
                attach(leaf(pointee), &format!("{owner}::*{}", spaced(&inner)))
            }
            CppType::Array { size, element } => element.decl(format!("{inner}[{size}]"), leaf),
            CppType::Function { args, ret } => {
                let list = args
                    .iter()
                    .map(|a| a.declarator_with("", leaf))
                    .collect::<Vec<_>>()
                    .join(", ");
                ret.decl(format!("{inner}({list})"), leaf)
            }
            CppType::Const(t) => t.qualified("const", inner, leaf),
            CppType::Volatile(t) => t.qualified("volatile", inner, leaf),
            CppType::Restrict(t) => t.qualified("__restrict", inner, leaf),
        }
    }

    /// East-side qualifier: applies to the pointer itself for indirections,
    /// to the leaf otherwise.
    fn qualified(&self, q: &str, inner: String, leaf: &dyn Fn(&Primitive) -> String) -> String {
        if self.is_indirection() {
            self.decl(format!(" {q}{}", spaced(&inner)), leaf)
        } else {
            attach(format!("{} {q}", self.decl(String::new(), leaf)), &inner)
        }
    }

    /// Declarator of a pointer or reference to `self`. Array and function declarators
    /// bind tighter than `*`/`&`, so those targets need parentheses.
    fn indirect(&self, marker: char, inner: &str) -> String {
        match self {
            CppType::Array { .. } | CppType::Function { .. } => format!("({marker}{inner})"),
            _ => format!("{marker}{}", spaced(inner)),
        }
    }

    fn is_indirection(&self) -> bool {
        matches!(
            self,
            CppType::Pointer(_) | CppType::Reference(_) | CppType::MemberPointer { .. }
        )
    }

    /// Whether the type is a class, possibly behind qualifiers, pointers or references.
    pub fn is_class_type(&self) -> bool {
        match self {
            CppType::Primitive(p) => p.is_class(),
            CppType::Pointer(t)
            | CppType::Reference(t)
            | CppType::Const(t)
            | CppType::Volatile(t)
            | CppType::Restrict(t) => t.is_class_type(),
            _ => false,
        }
    }

    /// Every class name the type mentions, in first-occurrence order, including member
    /// pointer owners and classes inside function types.
    pub fn class_refs(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_class_refs(&mut out);
        out
    }

    fn collect_class_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            CppType::Primitive(Primitive::ClassRef(name)) => push_unique(out, name),
            CppType::Primitive(_) | CppType::TemplateParam => {}
            CppType::MemberPointer { owner, pointee } => {
                push_unique(out, owner);
                if let Primitive::ClassRef(name) = pointee {
                    push_unique(out, name);
                }
            }
            CppType::Pointer(t)
            | CppType::Reference(t)
            | CppType::Const(t)
            | CppType::Volatile(t)
            | CppType::Restrict(t) => t.collect_class_refs(out),
            CppType::Array { element, .. } => element.collect_class_refs(out),
            CppType::Function { args, ret } => {
                for arg in args {
                    arg.collect_class_refs(out);
                }
                ret.collect_class_refs(out);
            }
        }
    }

    /// Whether a `Restrict` qualifier appears anywhere in the type.
    pub fn contains_restrict(&self) -> bool {
        match self {
            CppType::Restrict(_) => true,
            CppType::Primitive(_) | CppType::TemplateParam | CppType::MemberPointer { .. } => false,
            CppType::Pointer(t)
            | CppType::Reference(t)
            | CppType::Const(t)
            | CppType::Volatile(t) => t.contains_restrict(),
            CppType::Array { element, .. } => element.contains_restrict(),
            CppType::Function { args, ret } => {
                ret.contains_restrict() || args.iter().any(CppType::contains_restrict)
            }
        }
    }

    /// Whether the template parameter appears anywhere in the type.
    pub fn contains_template_param(&self) -> bool {
        match self {
            CppType::TemplateParam => true,
            CppType::Primitive(_) | CppType::MemberPointer { .. } => false,
            CppType::Pointer(t)
            | CppType::Reference(t)
            | CppType::Const(t)
            | CppType::Volatile(t)
            | CppType::Restrict(t) => t.contains_template_param(),
            CppType::Array { element, .. } => element.contains_template_param(),
            CppType::Function { args, ret } => {
                ret.contains_template_param() || args.iter().any(CppType::contains_template_param)
            }
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, CppType::Primitive(Primitive::Void))
    }

    /// The type with top-level `const`/`volatile` removed.
    pub fn unqualified(&self) -> &CppType {
        match self {
            CppType::Const(t) | CppType::Volatile(t) => t.unqualified(),
            _ => self,
        }
    }

    /// How a class travels through this type, if it is one of the shapes that map onto a
    /// handle: `X`, `X*`, `X&`, each optionally `const`.
    pub fn class_shape(&self) -> Option<ClassShape<'_>> {
        let (kind, target) = match self.unqualified() {
            CppType::Primitive(Primitive::ClassRef(name)) => {
                return Some(ClassShape {
                    class: name,
                    kind: ShapeKind::Value,
                    constant: matches!(self, CppType::Const(_)),
                });
            }
            CppType::Pointer(t) => (ShapeKind::Pointer, t),
            CppType::Reference(t) => (ShapeKind::Reference, t),
            _ => return None,
        };
        match target.as_ref() {
            CppType::Primitive(Primitive::ClassRef(name)) => Some(ClassShape {
                class: name,
                kind,
                constant: false,
            }),
            CppType::Const(inner) => match inner.as_ref() {
                CppType::Primitive(Primitive::ClassRef(name)) => Some(ClassShape {
                    class: name,
                    kind,
                    constant: true,
                }),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether a class appears anywhere other than as a member pointer's owner.
    pub fn mentions_class_value(&self) -> bool {
        match self {
            CppType::Primitive(p) => p.is_class(),
            CppType::TemplateParam => false,
            CppType::MemberPointer { pointee, .. } => pointee.is_class(),
            CppType::Pointer(t)
            | CppType::Reference(t)
            | CppType::Const(t)
            | CppType::Volatile(t)
            | CppType::Restrict(t) => t.mentions_class_value(),
            CppType::Array { element, .. } => element.mentions_class_value(),
            CppType::Function { args, ret } => {
                ret.mentions_class_value() || args.iter().any(CppType::mentions_class_value)
            }
        }
    }

    /// Whether `primitive` appears anywhere in the type.
    pub fn contains_primitive(&self, primitive: &Primitive) -> bool {
        match self {
            CppType::Primitive(p) => p == primitive,
            CppType::TemplateParam => false,
            CppType::MemberPointer { pointee, .. } => pointee == primitive,
            CppType::Pointer(t)
            | CppType::Reference(t)
            | CppType::Const(t)
            | CppType::Volatile(t)
            | CppType::Restrict(t) => t.contains_primitive(primitive),
            CppType::Array { element, .. } => element.contains_primitive(primitive),
            CppType::Function { args, ret } => {
                ret.contains_primitive(primitive)
                    || args.iter().any(|a| a.contains_primitive(primitive))
            }
        }
    }
}

/// A class-typed signature position. See [`CppType::class_shape`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassShape<'a> {
    pub class: &'a str,
    pub kind: ShapeKind,
    /// `const X`, `X const*` or `X const&`.
    pub constant: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Value,
    Pointer,
    Reference,
}

impl fmt::Display for CppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn push_unique<'a>(out: &mut Vec<&'a str>, name: &'a str) {
    if !out.contains(&name) {
        out.push(name);
    }
}

fn starts_with_ident(s: &str) -> bool {
    s.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Separate a declarator that starts with a name from the token before it.
fn spaced(inner: &str) -> String {
    if starts_with_ident(inner) {
        format!(" {inner}")
    } else {
        inner.to_string()
    }
}

fn attach(base: String, inner: &str) -> String {
    if inner.is_empty() {
        base
    } else if starts_with_ident(inner) {
        format!("{base} {inner}")
    } else {
        format!("{base}{inner}")
    }
}
