//! Structured declarations.
//!
//! Emission produces these; `render` turns them into text. Bodies are kept as
//! pre-formatted statement lines since they are opaque to every later stage.

use std::path::PathBuf;

use bindery_core::{CppType, ModuleId};

/// One generated file, not yet serialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Relative to the install root.
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub body: ArtifactBody,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Handle,
    WrapperHeader,
    WrapperSource,
    Interface,
    Cast,
    Implementation,
    ForwardStub,
    Template,
    Instances,
    TopLevel,
    Aggregate,
    /// `bindery-manifest.json`, added after rendering.
    Manifest,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtifactBody {
    Host(Vec<HostItem>),
    Foreign(Vec<ForeignItem>),
}

/// Artifacts of one module, the unit of materialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleArtifacts {
    pub module: ModuleId,
    pub artifacts: Vec<Artifact>,
}

/// Rust items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostItem {
    /// `//!` lines.
    ModuleDoc(String),
    /// `#![...]`
    InnerAttribute(String),
    Use {
        path: String,
        public: bool,
    },
    /// `#[repr(C)]` zero-sized pointee.
    OpaqueStruct {
        name: String,
        generic: bool,
    },
    /// Identity handle over `*mut raw`, with `FfiHandle`, `Display` and `Debug`.
    Handle {
        name: String,
        raw: String,
        generic: bool,
        runtime: String,
    },
    ExternBlock(Vec<ExternFn>),
    Trait {
        doc: Option<String>,
        name: String,
        generic: bool,
        supertraits: Vec<String>,
        items: Vec<HostFn>,
    },
    Impl {
        trait_name: Option<String>,
        target: String,
        items: Vec<HostFn>,
    },
    Fn(HostFn),
    /// `pub mod name;`
    ModDecl(String),
    /// `pub mod name { pub mod child; ... pub use ...; }`
    Module {
        name: String,
        children: Vec<String>,
        reexports: Vec<String>,
    },
    /// Braced invocation with `key: value` fields.
    MacroCall {
        name: String,
        fields: Vec<(String, String)>,
    },
}

/// Declaration in an `extern "C"` block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternFn {
    pub symbol: String,
    pub params: Vec<Param>,
    pub ret: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Receiver {
    Ref,
    Value,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostFn {
    pub doc: Option<String>,
    pub public: bool,
    pub is_unsafe: bool,
    pub name: String,
    /// Contents of `<...>`, if any.
    pub generics: Option<String>,
    pub receiver: Option<Receiver>,
    pub params: Vec<Param>,
    pub ret: Option<String>,
    /// `where Self: Sized`, for associated functions of object-safe-looking traits.
    pub sized: bool,
    /// `None` declares without a body.
    pub body: Option<Vec<String>>,
}

/// C/C++ items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ForeignItem {
    Comment(String),
    PragmaOnce,
    Include {
        path: String,
        system: bool,
    },
    UsingNamespace(String),
    /// `typedef struct X_t X_t; typedef X_t* X_p;`
    OpaqueTypedef {
        c_struct: String,
        c_ptr: String,
    },
    /// Guarded `extern "C"` block, valid from both C and C++.
    ExternC(Vec<ForeignItem>),
    Prototype(WrapperSig),
    Definition {
        sig: WrapperSig,
        body: Vec<String>,
    },
}

/// Signature of one wrapper; types are already mapped to the wrapper layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrapperSig {
    pub symbol: String,
    pub params: Vec<(CppType, String)>,
    pub ret: CppType,
}
