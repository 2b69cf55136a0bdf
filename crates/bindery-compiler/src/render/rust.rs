//! Rust rendering.

use crate::emit::{ExternFn, HostFn, HostItem, Param, Receiver};

use super::Writer;

/// Derives of a non-generic handle: identity semantics come from the raw pointer.
const HANDLE_DERIVES: &str = "#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]";

pub(super) fn render(items: &[HostItem]) -> String {
    let mut w = Writer::default();
    let mut previous: Option<&HostItem> = None;
    for item in items {
        if !same_group(previous, item) {
            w.blank();
        }
        item_into(&mut w, item);
        previous = Some(item);
    }
    w.finish()
}

/// Consecutive `use` lines and `mod` declarations stay together.
fn same_group(previous: Option<&HostItem>, item: &HostItem) -> bool {
    matches!(
        (previous, item),
        (Some(HostItem::Use { .. }), HostItem::Use { .. })
            | (Some(HostItem::ModDecl(_)), HostItem::ModDecl(_))
    )
}

fn item_into(w: &mut Writer, item: &HostItem) {
    match item {
        HostItem::ModuleDoc(doc) => w.comment("//!", doc),
        HostItem::InnerAttribute(attr) => w.line(&format!("#![{attr}]")),
        HostItem::Use { path, public } => {
            w.line(&format!("{}use {path};", if *public { "pub " } else { "" }))
        }
        HostItem::OpaqueStruct { name, generic } => opaque_struct(w, name, *generic),
        HostItem::Handle {
            name,
            raw,
            generic,
            runtime,
        } => handle(w, name, raw, *generic, runtime),
        HostItem::ExternBlock(fns) => extern_block(w, fns),
        HostItem::Trait {
            doc,
            name,
            generic,
            supertraits,
            items,
        } => {
            if let Some(doc) = doc {
                w.comment("///", doc);
            }
            let params = if *generic { "<T>" } else { "" };
            let head = format!("pub trait {name}{params}: {}", supertraits.join(" + "));
            block(w, &head, items);
        }
        HostItem::Impl {
            trait_name,
            target,
            items,
        } => {
            let head = match trait_name {
                Some(t) => format!("impl {t} for {target}"),
                None => format!("impl {target}"),
            };
            block(w, &head, items);
        }
        HostItem::Fn(f) => function(w, f),
        HostItem::ModDecl(name) => w.line(&format!("pub mod {name};")),
        HostItem::Module {
            name,
            children,
            reexports,
        } => {
            w.open(&format!("pub mod {name}"));
            for child in children {
                w.line(&format!("pub mod {child};"));
            }
            if !reexports.is_empty() {
                w.blank();
                for path in reexports {
                    w.line(&format!("pub use {path};"));
                }
            }
            w.close();
        }
        HostItem::MacroCall { name, fields } => {
            w.open(&format!("{name}!"));
            for (key, value) in fields {
                w.line(&format!("{key}: {value},"));
            }
            w.close();
        }
    }
}

/// `head {}` when empty, otherwise one function per paragraph.
fn block(w: &mut Writer, head: &str, items: &[HostFn]) {
    if items.is_empty() {
        w.line(&format!("{head} {{}}"));
        return;
    }
    w.open(head);
    for (i, f) in items.iter().enumerate() {
        if i > 0 {
            w.blank();
        }
        function(w, f);
    }
    w.close();
}

fn function(w: &mut Writer, f: &HostFn) {
    if let Some(doc) = &f.doc {
        w.comment("///", doc);
    }
    let mut sig = String::new();
    if f.public {
        sig.push_str("pub ");
    }
    if f.is_unsafe {
        sig.push_str("unsafe ");
    }
    sig.push_str("fn ");
    sig.push_str(&f.name);
    if let Some(generics) = &f.generics {
        sig.push_str(&format!("<{generics}>"));
    }
    let mut params: Vec<String> = f
        .receiver
        .map(|r| match r {
            Receiver::Ref => "&self".to_string(),
            Receiver::Value => "self".to_string(),
        })
        .into_iter()
        .collect();
    params.extend(f.params.iter().map(param));
    sig.push_str(&format!("({})", params.join(", ")));
    if let Some(ret) = &f.ret {
        sig.push_str(&format!(" -> {ret}"));
    }
    if f.sized {
        sig.push_str(" where Self: Sized");
    }

    match &f.body {
        None => w.line(&format!("{sig};")),
        Some(body) => {
            w.open(&sig);
            for line in body {
                w.line(line);
            }
            w.close();
        }
    }
}

fn extern_block(w: &mut Writer, fns: &[ExternFn]) {
    w.open("unsafe extern \"C\"");
    for f in fns {
        let params = f.params.iter().map(param).collect::<Vec<_>>().join(", ");
        match &f.ret {
            Some(ret) => w.line(&format!("pub fn {}({params}) -> {ret};", f.symbol)),
            None => w.line(&format!("pub fn {}({params});", f.symbol)),
        }
    }
    w.close();
}

fn param(p: &Param) -> String {
    format!("{}: {}", p.name, p.ty)
}

fn opaque_struct(w: &mut Writer, name: &str, generic: bool) {
    let (params, marker) = if generic {
        ("<T>", "*mut T")
    } else {
        ("", "*mut u8")
    };
    w.line("#[repr(C)]");
    w.open(&format!("pub struct {name}{params}"));
    w.line("_data: [u8; 0],");
    w.line(&format!(
        "_marker: core::marker::PhantomData<({marker}, core::marker::PhantomPinned)>,"
    ));
    w.close();
}

fn handle(w: &mut Writer, name: &str, raw: &str, generic: bool, runtime: &str) {
    let params = if generic { "<T>" } else { "" };
    let ty = format!("{name}{params}");
    let raw_ty = format!("{raw}{params}");

    w.line("#[repr(transparent)]");
    if !generic {
        w.line(HANDLE_DERIVES);
    }
    w.line(&format!("pub struct {ty}(*mut {raw_ty});"));
    if generic {
        // Derives would bound `T`; the handle is a pointer whatever `T` is.
        identity_impls(w, &ty, params);
    }

    w.blank();
    w.open(&format!("impl{params} {runtime}::FfiHandle for {ty}"));
    w.line(&format!("type Raw = {raw_ty};"));
    w.blank();
    w.open(&format!("fn as_raw(&self) -> *mut {raw_ty}"));
    w.line("self.0");
    w.close();
    w.blank();
    w.open(&format!("unsafe fn from_raw(raw: *mut {raw_ty}) -> Self"));
    w.line("Self(raw)");
    w.close();
    w.close();

    for fmt_trait in ["Display", "Debug"] {
        w.blank();
        w.open(&format!("impl{params} std::fmt::{fmt_trait} for {ty}"));
        w.open("fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result");
        w.line(&format!(
            "{runtime}::fmt_handle(\"{name}\", self.0.cast_const().cast(), f)"
        ));
        w.close();
        w.close();
    }
}

fn identity_impls(w: &mut Writer, ty: &str, params: &str) {
    w.blank();
    w.open(&format!("impl{params} Clone for {ty}"));
    w.open("fn clone(&self) -> Self");
    w.line("*self");
    w.close();
    w.close();
    w.blank();
    w.line(&format!("impl{params} Copy for {ty} {{}}"));
    w.blank();
    w.open(&format!("impl{params} PartialEq for {ty}"));
    w.open("fn eq(&self, other: &Self) -> bool");
    w.line("self.0 == other.0");
    w.close();
    w.close();
    w.blank();
    w.line(&format!("impl{params} Eq for {ty} {{}}"));
    w.blank();
    w.open(&format!("impl{params} PartialOrd for {ty}"));
    w.open("fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering>");
    w.line("Some(self.cmp(other))");
    w.close();
    w.close();
    w.blank();
    w.open(&format!("impl{params} Ord for {ty}"));
    w.open("fn cmp(&self, other: &Self) -> std::cmp::Ordering");
    w.line("self.0.cmp(&other.0)");
    w.close();
    w.close();
    w.blank();
    w.open(&format!("impl{params} std::hash::Hash for {ty}"));
    w.open("fn hash<H: std::hash::Hasher>(&self, state: &mut H)");
    w.line("self.0.hash(state);");
    w.close();
    w.close();
}
