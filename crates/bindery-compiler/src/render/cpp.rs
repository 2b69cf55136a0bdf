//! C/C++ rendering.

use crate::emit::{ForeignItem, WrapperSig};

use super::Writer;

pub(super) fn render(items: &[ForeignItem]) -> String {
    let mut w = Writer::default();
    let mut previous: Option<&ForeignItem> = None;
    for item in items {
        if !same_group(previous, item) {
            w.blank();
        }
        item_into(&mut w, item);
        previous = Some(item);
    }
    w.finish()
}

fn same_group(previous: Option<&ForeignItem>, item: &ForeignItem) -> bool {
    matches!(
        (previous, item),
        (Some(ForeignItem::Include { .. }), ForeignItem::Include { .. })
            | (Some(ForeignItem::UsingNamespace(_)), ForeignItem::UsingNamespace(_))
            | (Some(ForeignItem::Prototype(_)), ForeignItem::Prototype(_))
    )
}

fn item_into(w: &mut Writer, item: &ForeignItem) {
    match item {
        ForeignItem::Comment(text) => w.comment("//", text),
        ForeignItem::PragmaOnce => w.line("#pragma once"),
        ForeignItem::Include { path, system: true } => w.line(&format!("#include <{path}>")),
        ForeignItem::Include {
            path,
            system: false,
        } => w.line(&format!("#include \"{path}\"")),
        ForeignItem::UsingNamespace(ns) => w.line(&format!("using namespace {ns};")),
        ForeignItem::OpaqueTypedef { c_struct, c_ptr } => {
            w.line(&format!("typedef struct {c_struct} {c_struct};"));
            w.line(&format!("typedef {c_struct}* {c_ptr};"));
        }
        ForeignItem::ExternC(inner) => {
            w.line("#ifdef __cplusplus");
            w.line("extern \"C\" {");
            w.line("#endif");
            let mut previous: Option<&ForeignItem> = None;
            for item in inner {
                if !same_group(previous, item) {
                    w.blank();
                }
                item_into(w, item);
                previous = Some(item);
            }
            w.blank();
            w.line("#ifdef __cplusplus");
            w.line("}");
            w.line("#endif");
        }
        ForeignItem::Prototype(sig) => w.line(&format!("{};", signature(sig))),
        ForeignItem::Definition { sig, body } => {
            w.open(&signature(sig));
            for line in body {
                w.line(line);
            }
            w.close();
        }
    }
}

/// `ret symbol(params)`, with C's `(void)` for an empty parameter list.
fn signature(sig: &WrapperSig) -> String {
    let params = if sig.params.is_empty() {
        "void".to_string()
    } else {
        sig.params
            .iter()
            .map(|(ty, name)| ty.declarator(name))
            .collect::<Vec<_>>()
            .join(", ")
    };
    sig.ret.declarator(&format!("{}({params})", sig.symbol))
}
