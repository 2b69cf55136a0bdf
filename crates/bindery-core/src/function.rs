//! Member and free function declarations.

use serde::{Deserialize, Serialize};

use crate::types::CppType;

/// A named, typed parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Arg {
    #[serde(rename = "type")]
    pub ty: CppType,
    pub name: String,
}

impl Arg {
    pub fn new(ty: CppType, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
        }
    }
}

/// A member function of a class or template class.
///
/// Exactly one categorization per declaration. A destructor has no arguments and
/// returns `void` regardless of anything else the caller supplied.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Function {
    Constructor {
        #[serde(default)]
        args: Vec<Arg>,
        #[serde(default)]
        alias: Option<String>,
    },
    Virtual {
        ret: CppType,
        name: String,
        #[serde(default)]
        args: Vec<Arg>,
        #[serde(default)]
        alias: Option<String>,
    },
    NonVirtual {
        ret: CppType,
        name: String,
        #[serde(default)]
        args: Vec<Arg>,
        #[serde(default)]
        alias: Option<String>,
    },
    Static {
        ret: CppType,
        name: String,
        #[serde(default)]
        args: Vec<Arg>,
        #[serde(default)]
        alias: Option<String>,
    },
    Destructor {
        #[serde(default)]
        alias: Option<String>,
    },
}

/// Categorization of a [`Function`]; drives which emission rule applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunctionKind {
    Constructor,
    Virtual,
    NonVirtual,
    Static,
    Destructor,
}

impl Function {
    pub fn kind(&self) -> FunctionKind {
        match self {
            Function::Constructor { .. } => FunctionKind::Constructor,
            Function::Virtual { .. } => FunctionKind::Virtual,
            Function::NonVirtual { .. } => FunctionKind::NonVirtual,
            Function::Static { .. } => FunctionKind::Static,
            Function::Destructor { .. } => FunctionKind::Destructor,
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.kind() == FunctionKind::Constructor
    }

    pub fn is_virtual(&self) -> bool {
        self.kind() == FunctionKind::Virtual
    }

    pub fn is_non_virtual(&self) -> bool {
        self.kind() == FunctionKind::NonVirtual
    }

    pub fn is_static(&self) -> bool {
        self.kind() == FunctionKind::Static
    }

    pub fn is_destructor(&self) -> bool {
        self.kind() == FunctionKind::Destructor
    }

    /// Whether the wrapper takes the instance handle as its first argument.
    pub fn takes_self(&self) -> bool {
        matches!(
            self.kind(),
            FunctionKind::Virtual | FunctionKind::NonVirtual | FunctionKind::Destructor
        )
    }

    /// Declared name; `None` for constructors and destructors.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Function::Virtual { name, .. }
            | Function::NonVirtual { name, .. }
            | Function::Static { name, .. } => Some(name),
            Function::Constructor { .. } | Function::Destructor { .. } => None,
        }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            Function::Constructor { alias, .. }
            | Function::Virtual { alias, .. }
            | Function::NonVirtual { alias, .. }
            | Function::Static { alias, .. }
            | Function::Destructor { alias } => alias.as_deref(),
        }
    }

    /// Declared arguments; always empty for destructors.
    pub fn args(&self) -> &[Arg] {
        match self {
            Function::Constructor { args, .. }
            | Function::Virtual { args, .. }
            | Function::NonVirtual { args, .. }
            | Function::Static { args, .. } => args,
            Function::Destructor { .. } => &[],
        }
    }

    /// Arguments and effective return type.
    ///
    /// A constructor yields an opaque handle to `class_name`, modelled as a pointer to
    /// the class; a destructor returns `void`.
    pub fn args_and_return(&self, class_name: &str) -> (&[Arg], CppType) {
        match self {
            Function::Constructor { args, .. } => (args, CppType::class(class_name).ptr()),
            Function::Virtual { ret, args, .. }
            | Function::NonVirtual { ret, args, .. }
            | Function::Static { ret, args, .. } => (args, ret.clone()),
            Function::Destructor { .. } => (&[], CppType::void()),
        }
    }

    /// Every type in the signature: arguments first, then the declared return type.
    pub fn signature_types(&self) -> impl Iterator<Item = &CppType> {
        let ret = match self {
            Function::Virtual { ret, .. }
            | Function::NonVirtual { ret, .. }
            | Function::Static { ret, .. } => Some(ret),
            Function::Constructor { .. } | Function::Destructor { .. } => None,
        };
        self.args().iter().map(|a| &a.ty).chain(ret)
    }
}

/// A free (namespace-level) function.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FreeFunction {
    pub ret: CppType,
    pub name: String,
    #[serde(default)]
    pub args: Vec<Arg>,
    #[serde(default)]
    pub alias: Option<String>,
}

impl FreeFunction {
    /// Alias if present, otherwise the declared name.
    pub fn entry_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn signature_types(&self) -> impl Iterator<Item = &CppType> {
        self.args.iter().map(|a| &a.ty).chain(std::iter::once(&self.ret))
    }
}
