//! Derived names.
//!
//! Everything generated for a class is named from its identifier (alias or name), so
//! the rules here are the single source of truth for symbols on both sides of the
//! boundary.

use crate::class::Class;
use crate::function::{FreeFunction, Function};
use crate::utils::{escape_keyword, to_snake_case};

/// Public entry name of `function` declared in a class (or template) identified by `ident`.
///
/// An explicit alias always wins. Otherwise constructors become `new<Ident>`, destructors
/// `delete`, virtuals keep their name, and non-virtual/static functions are prefixed with
/// the snake-cased identifier.
pub fn entry_name(ident: &str, function: &Function) -> String {
    if let Some(alias) = function.alias() {
        return alias.to_string();
    }
    match function {
        Function::Constructor { .. } => constructor_name(ident),
        Function::Destructor { .. } => "delete".to_string(),
        Function::Virtual { name, .. } => name.clone(),
        Function::NonVirtual { name, .. } | Function::Static { name, .. } => {
            format!("{}_{name}", to_snake_case(ident))
        }
    }
}

pub fn constructor_name(ident: &str) -> String {
    format!("new{ident}")
}

/// Package name as it appears in symbols and Rust paths.
pub fn package_prefix(package: &str) -> String {
    package.replace('-', "_")
}

/// C-linkage export name: `<package>_<ident>_<entry>`, lowercased.
pub fn wrapper_symbol(package: &str, ident: &str, entry: &str) -> String {
    format!(
        "{}_{}_{}",
        package_prefix(package),
        ident.to_lowercase(),
        entry.to_lowercase()
    )
}

/// C-linkage export name of a free function: `<package>_<entry>`, lowercased.
pub fn free_wrapper_symbol(package: &str, function: &FreeFunction) -> String {
    format!(
        "{}_{}",
        package_prefix(package),
        function.entry_name().to_lowercase()
    )
}

/// Rust function name for an entry name.
pub fn host_fn_name(entry: &str) -> String {
    escape_keyword(&to_snake_case(entry))
}

/// Rust parameter name; unnamed parameters become `arg<i>`.
pub fn host_param_name(name: &str, position: usize) -> String {
    if name.is_empty() {
        format!("arg{position}")
    } else {
        escape_keyword(name)
    }
}

/// C++ parameter name; unnamed parameters become `arg<i>`.
pub fn foreign_param_name(name: &str, position: usize) -> String {
    if name.is_empty() {
        format!("arg{position}")
    } else {
        name.to_string()
    }
}

/// Identifiers generated for one class or template on both sides of the boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassNames {
    /// Handle type, also the identifier base.
    pub handle: String,
    /// Opaque pointee of the handle.
    pub raw: String,
    /// Capability trait.
    pub capability: String,
    /// Opaque C struct.
    pub c_struct: String,
    /// C pointer typedef.
    pub c_ptr: String,
    pub module: String,
    pub upcast: String,
    pub downcast: String,
}

impl ClassNames {
    pub fn from_ident(ident: &str) -> Self {
        let module = to_snake_case(ident);
        Self {
            handle: ident.to_string(),
            raw: format!("Raw{ident}"),
            capability: format!("I{ident}"),
            c_struct: format!("{ident}_t"),
            c_ptr: format!("{ident}_p"),
            upcast: format!("upcast_{module}"),
            downcast: format!("downcast_{module}"),
            module,
        }
    }

    pub fn of(class: &Class) -> Self {
        Self::from_ident(class.ident())
    }
}
