//! Type mapping across the boundary.
//!
//! Three views of every signature type:
//! - wrapper layer (C linkage): class shapes collapse to the class's `X_p` pointer,
//!   references become pointers, `long double` narrows to `double`
//! - host FFI layer (`extern "C"` block): the Rust spelling of the wrapper type
//! - host safe layer: class shapes surface as capabilities (arguments) and handles
//!   (returns), everything else as in the FFI layer
//!
//! Inputs are validated model types; shapes the model rejects are never seen here.

use indexmap::IndexSet;

use bindery_core::{ClassNames, CppType, Model, Primitive, ShapeKind};

/// `std::ffi` names used by generated code, collected while mapping.
pub type FfiNames = IndexSet<&'static str>;

pub struct Marshal<'a> {
    model: &'a Model,
    /// Crate path of the runtime support library.
    runtime: &'a str,
}

impl<'a> Marshal<'a> {
    pub fn new(model: &'a Model, runtime: &'a str) -> Self {
        Self { model, runtime }
    }

    /// Generated names for the class spelled `name` in C++.
    pub fn names(&self, name: &str) -> ClassNames {
        match self.model.classes.by_name(name) {
            Some(class) => ClassNames::of(class),
            None => ClassNames::from_ident(name),
        }
    }

    // ---- wrapper layer ----------------------------------------------------

    pub fn foreign_type(&self, ty: &CppType) -> CppType {
        if let Some(shape) = ty.class_shape() {
            return CppType::class(self.names(shape.class).c_ptr);
        }
        match ty {
            CppType::Primitive(Primitive::LongDouble) => CppType::double(),
            CppType::Const(t) => CppType::Const(Box::new(self.foreign_type(t))),
            CppType::Volatile(t) => CppType::Volatile(Box::new(self.foreign_type(t))),
            CppType::Pointer(t) | CppType::Reference(t) => {
                CppType::Pointer(Box::new(self.foreign_type(t)))
            }
            CppType::Array { size, element } => CppType::Array {
                size: *size,
                element: Box::new(self.foreign_type(element)),
            },
            CppType::Function { args, ret } => CppType::Function {
                args: args.iter().map(|a| self.foreign_type(a)).collect(),
                ret: Box::new(self.foreign_type(ret)),
            },
            other => other.clone(),
        }
    }

    /// Expression passing wrapper parameter `name` to the wrapped call.
    ///
    /// Class arguments already address the declared class's subobject, so the opaque
    /// pointer converts back without adjustment.
    pub fn foreign_arg(&self, ty: &CppType, name: &str) -> String {
        if let Some(shape) = ty.class_shape() {
            let target = qualified(shape.class, shape.constant);
            return match shape.kind {
                ShapeKind::Value | ShapeKind::Reference => {
                    format!("*reinterpret_cast<{target}*>({name})")
                }
                ShapeKind::Pointer => format!("reinterpret_cast<{target}*>({name})"),
            };
        }
        match ty.unqualified() {
            CppType::Reference(_) => format!("*{name}"),
            _ => name.to_string(),
        }
    }

    /// Statement returning the result of `call` through the wrapper layer.
    pub fn foreign_return(&self, ty: &CppType, call: &str) -> String {
        if ty.is_void() {
            return format!("{call};");
        }
        if let Some(shape) = ty.class_shape() {
            let ptr = self.names(shape.class).c_ptr;
            let class = shape.class;
            return match (shape.kind, shape.constant) {
                (ShapeKind::Value, _) => {
                    format!("return reinterpret_cast<{ptr}>(new {class}({call}));")
                }
                (ShapeKind::Pointer, false) => format!("return reinterpret_cast<{ptr}>({call});"),
                (ShapeKind::Pointer, true) => {
                    format!("return reinterpret_cast<{ptr}>(const_cast<{class}*>({call}));")
                }
                (ShapeKind::Reference, false) => {
                    format!("return reinterpret_cast<{ptr}>(&{call});")
                }
                (ShapeKind::Reference, true) => {
                    format!("return reinterpret_cast<{ptr}>(const_cast<{class}*>(&{call}));")
                }
            };
        }
        match ty.unqualified() {
            CppType::Reference(_) => format!("return &{call};"),
            _ => format!("return {call};"),
        }
    }

    // ---- host FFI layer ---------------------------------------------------

    pub fn host_ffi(&self, ty: &CppType, ffi: &mut FfiNames) -> String {
        if let Some(shape) = ty.class_shape() {
            return format!("*mut {}", self.names(shape.class).raw);
        }
        match ty {
            CppType::Primitive(p) => primitive(p, ffi).to_string(),
            CppType::Const(t) | CppType::Volatile(t) | CppType::Restrict(t) => {
                self.host_ffi(t, ffi)
            }
            CppType::Pointer(t) | CppType::Reference(t) => self.pointer_to(t, ffi),
            // Array parameters decay to a pointer to their first element.
            CppType::Array { element, .. } => self.pointer_to(element, ffi),
            CppType::Function { args, ret } => self.fn_pointer(args, ret, ffi),
            CppType::MemberPointer { .. } => "isize".to_string(),
            CppType::TemplateParam => "T".to_string(),
        }
    }

    /// Host return type of the FFI declaration; `None` for `void`.
    pub fn host_ffi_return(&self, ty: &CppType, ffi: &mut FfiNames) -> Option<String> {
        (!ty.is_void()).then(|| self.host_ffi(ty, ffi))
    }

    fn pointer_to(&self, pointee: &CppType, ffi: &mut FfiNames) -> String {
        if let CppType::Function { args, ret } = pointee.unqualified() {
            return self.fn_pointer(args, ret, ffi);
        }
        let mutability = if matches!(pointee, CppType::Const(_)) {
            "const"
        } else {
            "mut"
        };
        format!("*{mutability} {}", self.pointee(pointee, ffi))
    }

    fn pointee(&self, ty: &CppType, ffi: &mut FfiNames) -> String {
        match ty.unqualified() {
            CppType::Primitive(Primitive::Void) => {
                ffi.insert("c_void");
                "c_void".to_string()
            }
            CppType::Array { size, element } => format!("[{}; {size}]", self.pointee(element, ffi)),
            other => self.host_ffi(other, ffi),
        }
    }

    fn fn_pointer(&self, args: &[CppType], ret: &CppType, ffi: &mut FfiNames) -> String {
        let args = args
            .iter()
            .map(|a| self.host_ffi(a, ffi))
            .collect::<Vec<_>>()
            .join(", ");
        match self.host_ffi_return(ret, ffi) {
            Some(ret) => format!("Option<unsafe extern \"C\" fn({args}) -> {ret}>"),
            None => format!("Option<unsafe extern \"C\" fn({args})>"),
        }
    }

    // ---- host safe layer --------------------------------------------------

    /// Safe parameter type and the FFI argument expression built from it.
    ///
    /// Class arguments pass the address of the declared class's subobject.
    pub fn host_param(&self, ty: &CppType, name: &str, ffi: &mut FfiNames) -> (String, String) {
        match ty.class_shape() {
            Some(shape) => {
                let names = self.names(shape.class);
                (
                    format!("&impl {}", names.capability),
                    format!(
                        "{}::Upcast::<{}>::upcast_raw({name})",
                        self.runtime, names.handle
                    ),
                )
            }
            None => (self.host_ffi(ty, ffi), name.to_string()),
        }
    }

    /// Safe return type; `None` for `void`.
    pub fn host_return(&self, ty: &CppType, ffi: &mut FfiNames) -> Option<String> {
        match ty.class_shape() {
            Some(shape) => Some(self.names(shape.class).handle),
            None => self.host_ffi_return(ty, ffi),
        }
    }

    /// Wrap an FFI call so it yields the safe return type.
    pub fn host_wrap(&self, ty: &CppType, call: &str) -> String {
        match ty.class_shape() {
            Some(shape) => format!("{}::from_raw({call})", self.names(shape.class).handle),
            None => call.to_string(),
        }
    }

    /// Type passed to an instantiation request for a template argument.
    pub fn host_argument(&self, ty: &CppType, ffi: &mut FfiNames) -> String {
        match ty.class_shape() {
            Some(shape) if shape.kind == ShapeKind::Value => self.names(shape.class).handle,
            _ => self.host_ffi(ty, ffi),
        }
    }
}

fn qualified(class: &str, constant: bool) -> String {
    if constant {
        format!("{class} const")
    } else {
        class.to_string()
    }
}

fn primitive(p: &Primitive, ffi: &mut FfiNames) -> &'static str {
    let name = match p {
        Primitive::Char => "c_char",
        Primitive::Int => "c_int",
        Primitive::Long => "c_long",
        Primitive::UChar => "c_uchar",
        Primitive::UInt => "c_uint",
        Primitive::ULong => "c_ulong",
        Primitive::LongLong => "c_longlong",
        Primitive::ULongLong => "c_ulonglong",
        Primitive::Double | Primitive::LongDouble => "c_double",
        Primitive::Bool => return "bool",
        Primitive::Void => return "()",
        Primitive::ClassRef(_) => "c_void",
    };
    ffi.insert(name);
    name
}
