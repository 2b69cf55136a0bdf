//! Host-side (Rust) artifacts of a class module.

use indexmap::IndexMap;

use bindery_core::naming::host_param_name;
use bindery_core::{Class, ClassId, ClassNames, FunctionKind, ModuleId};

use super::decl::{
    Artifact, ArtifactBody, ArtifactKind, ExternFn, HostFn, HostItem, Param, Receiver,
};
use super::marshal::FfiNames;
use super::{Emitter, host_path};
use crate::partition::Module;
use crate::symbols::{CastEntry, Entry};

const DESTRUCTOR_SAFETY: &str = "# Safety\n\n\
    The handle and every copy of it must not be used afterwards.";

impl Emitter<'_> {
    /// `raw.rs`: opaque pointee, identity handle, the `extern "C"` block and one
    /// `Upcast` impl per ancestor.
    pub(super) fn handle(&self, module: &Module, id: ClassId, names: &ClassNames) -> Artifact {
        let class = self.model.classes.get(id);
        let mut ffi = FfiNames::new();
        let mut externs: Vec<ExternFn> = self
            .symbols
            .declared(id)
            .map(|entry| self.lower(class, names, entry, "", &mut ffi).0)
            .collect();
        let mut upcasts = Vec::new();
        for cast in self.symbols.casts(id) {
            let (extern_fns, upcast) = self.upcast_impl(names, cast);
            externs.extend(extern_fns);
            upcasts.push(upcast);
        }

        let mut items = vec![HostItem::ModuleDoc(format!(
            "Opaque handle and foreign declarations for `{}`.",
            class.name
        ))];
        items.extend(ffi_use(&ffi));
        // Ancestors need their handle as well, for the `Upcast` impls.
        let mut imported: IndexMap<ModuleId, bool> = module
            .imports
            .raw
            .iter()
            .map(|m| (m.clone(), false))
            .collect();
        imported.extend(self.ancestor_modules(id).into_iter().map(|m| (m, true)));
        for (other, with_handle) in &imported {
            if let Some(owner) = self.owner(other) {
                let owner = ClassNames::of(owner);
                let used = if *with_handle {
                    format!("{{{}, {}}}", owner.handle, owner.raw)
                } else {
                    owner.raw
                };
                items.push(use_item(format!(
                    "{}::raw::{used}",
                    self.module_path(other)
                )));
            }
        }
        items.push(HostItem::OpaqueStruct {
            name: names.raw.clone(),
            generic: false,
        });
        items.push(HostItem::Handle {
            name: names.handle.clone(),
            raw: names.raw.clone(),
            generic: false,
            runtime: self.runtime().to_string(),
        });
        if !externs.is_empty() {
            items.push(HostItem::ExternBlock(externs));
        }
        items.extend(upcasts);
        self.host_artifact(names, "raw", ArtifactKind::Handle, items)
    }

    /// Declarations of one ancestor's cast wrappers and the `Upcast` impl calling them.
    fn upcast_impl(&self, names: &ClassNames, cast: &CastEntry) -> ([ExternFn; 2], HostItem) {
        let target = ClassNames::of(self.model.classes.get(cast.ancestor));
        let own_ptr = format!("*mut {}", names.raw);
        let base_ptr = format!("*mut {}", target.raw);
        let externs = [
            ExternFn {
                symbol: cast.upcast.clone(),
                params: vec![Param::new("self_", own_ptr.clone())],
                ret: Some(base_ptr.clone()),
            },
            ExternFn {
                symbol: cast.downcast.clone(),
                params: vec![Param::new("base", base_ptr.clone())],
                ret: Some(own_ptr),
            },
        ];
        let upcast_raw = HostFn {
            name: "upcast_raw".to_string(),
            receiver: Some(Receiver::Ref),
            ret: Some(base_ptr.clone()),
            body: Some(vec![format!("unsafe {{ {}(self.0) }}", cast.upcast)]),
            ..HostFn::default()
        };
        let downcast_raw = HostFn {
            is_unsafe: true,
            name: "downcast_raw".to_string(),
            params: vec![Param::new("raw", base_ptr)],
            ret: Some("Self".to_string()),
            body: Some(vec![format!("Self(unsafe {{ {}(raw) }})", cast.downcast)]),
            ..HostFn::default()
        };
        let upcast = HostItem::Impl {
            trait_name: Some(format!("{}::Upcast<{}>", self.runtime(), target.handle)),
            target: names.handle.clone(),
            items: vec![upcast_raw, downcast_raw],
        };
        (externs, upcast)
    }

    /// `interface.rs`: the capability trait, one default method per declared virtual.
    ///
    /// Defaults reach the instance through `Upcast`, so an implementor whose subobject
    /// sits at an offset still passes the right address.
    pub(super) fn interface(&self, module: &Module, id: ClassId, names: &ClassNames) -> Artifact {
        let class = self.model.classes.get(id);
        let mut ffi = FfiNames::new();
        let self_expr = format!("<Self as Upcast<{}>>::upcast_raw(self)", names.handle);
        let virtuals: Vec<&Entry> = self
            .symbols
            .declared(id)
            .filter(|entry| class.functions[entry.index].is_virtual())
            .collect();
        let methods: Vec<HostFn> = virtuals
            .iter()
            .map(|entry| {
                let mut method = self.lower(class, names, entry, &self_expr, &mut ffi).1;
                method.public = false;
                method
            })
            .collect();
        // Returned handles are rebuilt with `FfiHandle::from_raw`.
        let returns_handle = virtuals.iter().any(|entry| {
            let (_, ret) = class.functions[entry.index].args_and_return(&class.name);
            ret.class_shape().is_some()
        });
        let runtime_use = if returns_handle {
            format!("{}::{{FfiHandle, Upcast}}", self.runtime())
        } else {
            format!("{}::Upcast", self.runtime())
        };

        let mut items = vec![
            HostItem::ModuleDoc(format!("Capability of `{}`.", class.name)),
            use_item(runtime_use),
            use_item("super::raw::*"),
        ];
        for imported in &module.imports.parent_layer {
            let via_stub =
                self.config.emit_forward_stubs && module.imports.deferred.contains(imported);
            items.extend(self.module_imports(imported, via_stub));
        }
        items.extend(ffi_use(&ffi));

        let mut supertraits: Vec<String> = class
            .parents
            .iter()
            .map(|&p| ClassNames::of(self.model.classes.get(p)).capability)
            .collect();
        supertraits.push(format!("Upcast<{}>", names.handle));
        items.push(HostItem::Trait {
            doc: Some(self.capability_doc(class, &module.id)),
            name: names.capability.clone(),
            generic: false,
            supertraits,
            items: methods,
        });
        self.host_artifact(names, "interface", ArtifactKind::Interface, items)
    }

    /// `cast.rs`: conversions to and from the class handle, through `Upcast`.
    pub(super) fn cast(&self, names: &ClassNames) -> Artifact {
        let runtime = self.runtime();
        let upcast = HostFn {
            doc: Some(format!(
                "View any `{}` implementor as a `{}` handle to the same instance.",
                names.capability, names.handle
            )),
            public: true,
            name: names.upcast.clone(),
            generics: Some(format!("T: {}", names.capability)),
            params: vec![Param::new("handle", "&T")],
            ret: Some(names.handle.clone()),
            body: Some(vec![format!("{runtime}::upcast(handle)")]),
            ..HostFn::default()
        };
        let downcast = HostFn {
            doc: Some(format!(
                "Narrow a `{}` handle to `T`.\n\n# Safety\n\n\
                 The instance must actually be a `T`. Nothing checks this.",
                names.handle
            )),
            public: true,
            is_unsafe: true,
            name: names.downcast.clone(),
            generics: Some(format!("T: {}", names.capability)),
            params: vec![Param::new("handle", names.handle.clone())],
            ret: Some("T".to_string()),
            body: Some(vec![format!("unsafe {{ {runtime}::downcast(handle) }}")]),
            ..HostFn::default()
        };
        let items = vec![
            use_item(format!("super::interface::{}", names.capability)),
            use_item(format!("super::raw::{}", names.handle)),
            HostItem::Fn(upcast),
            HostItem::Fn(downcast),
        ];
        self.host_artifact(names, "cast", ArtifactKind::Cast, items)
    }

    /// `implementation.rs`: inherent functions plus the capability impls that bind every
    /// ancestor's defaults to this handle.
    pub(super) fn implementation(
        &self,
        module: &Module,
        id: ClassId,
        names: &ClassNames,
    ) -> Artifact {
        let class = self.model.classes.get(id);
        let mut ffi = FfiNames::new();
        let inherent: Vec<HostFn> = self
            .symbols
            .declared(id)
            .filter(|entry| !class.functions[entry.index].is_virtual())
            .map(|entry| self.lower(class, names, entry, "self.as_raw()", &mut ffi).1)
            .collect();

        let mut items = vec![
            use_item(format!("{}::FfiHandle", self.runtime())),
            use_item("super::raw::*"),
            use_item(format!("super::interface::{}", names.capability)),
        ];
        for imported in module.imports.implementation() {
            items.extend(self.module_imports(imported, false));
        }
        items.extend(ffi_use(&ffi));
        if !inherent.is_empty() {
            items.push(HostItem::Impl {
                trait_name: None,
                target: names.handle.clone(),
                items: inherent,
            });
        }
        if !class.is_abstract() {
            for (owner_module, members) in self.hierarchy.daughter_self_map() {
                if !members.contains(&id) {
                    continue;
                }
                if let Some(owner) = self.owner(owner_module) {
                    items.push(HostItem::Impl {
                        trait_name: Some(ClassNames::of(owner).capability),
                        target: names.handle.clone(),
                        items: Vec::new(),
                    });
                }
            }
        }
        self.host_artifact(names, "implementation", ArtifactKind::Implementation, items)
    }

    /// `forward.rs`: the handle and capability names alone, for deferred imports.
    pub(super) fn stub(&self, module: &Module, names: &ClassNames) -> Artifact {
        let mut doc = format!("Forward declarations of `{}`.", names.handle);
        let daughters = self.class_list(self.hierarchy.daughters(&module.id));
        if !daughters.is_empty() {
            doc.push_str(&format!("\n\nCapability also implemented by {daughters}."));
        }
        let items = vec![
            HostItem::ModuleDoc(doc),
            HostItem::Use {
                path: format!("super::raw::{{{}, {}}}", names.handle, names.raw),
                public: true,
            },
            HostItem::Use {
                path: format!("super::interface::{}", names.capability),
                public: true,
            },
        ];
        self.host_artifact(names, "forward", ArtifactKind::ForwardStub, items)
    }

    /// Lower one entry to its `extern "C"` declaration and its safe host function.
    ///
    /// `self_expr` is how the safe function obtains the instance pointer.
    pub(super) fn lower(
        &self,
        class: &Class,
        names: &ClassNames,
        entry: &Entry,
        self_expr: &str,
        ffi: &mut FfiNames,
    ) -> (ExternFn, HostFn) {
        let function = &class.functions[entry.index];
        let (args, ret) = function.args_and_return(&class.name);

        let mut extern_params = Vec::new();
        let mut call_args = Vec::new();
        if function.takes_self() {
            extern_params.push(Param::new("self_", format!("*mut {}", names.raw)));
            call_args.push(self_expr.to_string());
        }
        let mut params = Vec::new();
        for (i, arg) in args.iter().enumerate() {
            let name = host_param_name(&arg.name, i);
            extern_params.push(Param::new(&name, self.marshal.host_ffi(&arg.ty, ffi)));
            let (ty, expr) = self.marshal.host_param(&arg.ty, &name, ffi);
            params.push(Param::new(name, ty));
            call_args.push(expr);
        }

        let extern_fn = ExternFn {
            symbol: entry.symbol.clone(),
            params: extern_params,
            ret: self.marshal.host_ffi_return(&ret, ffi),
        };
        let call = format!("{}({})", entry.symbol, call_args.join(", "));
        let kind = function.kind();
        let host = HostFn {
            doc: (kind == FunctionKind::Destructor).then(|| DESTRUCTOR_SAFETY.to_string()),
            public: true,
            is_unsafe: kind == FunctionKind::Destructor,
            name: entry.host.clone(),
            receiver: match kind {
                FunctionKind::Virtual | FunctionKind::NonVirtual => Some(Receiver::Ref),
                FunctionKind::Destructor => Some(Receiver::Value),
                FunctionKind::Constructor | FunctionKind::Static => None,
            },
            params,
            ret: self.marshal.host_return(&ret, ffi),
            body: Some(vec![format!(
                "unsafe {{ {} }}",
                self.marshal.host_wrap(&ret, &call)
            )]),
            ..HostFn::default()
        };
        (extern_fn, host)
    }

    /// Imports of another class module: capability and handle, directly or via its stub.
    pub(super) fn module_imports(&self, id: &ModuleId, via_stub: bool) -> Vec<HostItem> {
        let Some(owner) = self.owner(id) else {
            return Vec::new();
        };
        let names = ClassNames::of(owner);
        let path = self.module_path(id);
        if via_stub {
            return vec![use_item(format!(
                "{path}::forward::{{{}, {}, {}}}",
                names.capability, names.handle, names.raw
            ))];
        }
        vec![
            use_item(format!("{path}::interface::{}", names.capability)),
            use_item(format!("{path}::raw::{{{}, {}}}", names.handle, names.raw)),
        ]
    }

    fn capability_doc(&self, class: &Class, module: &ModuleId) -> String {
        let mut doc = format!("Virtual functions of `{}`.", class.name);
        if class.is_abstract() {
            doc.push_str(&format!(
                "\n\n`{}` is abstract: only its descendants implement this capability.",
                class.name
            ));
        }
        let daughters = self.class_list(self.hierarchy.daughters(module));
        if !daughters.is_empty() {
            doc.push_str(&format!("\n\nAlso implemented by {daughters}."));
        }
        doc
    }

    fn class_list(&self, ids: impl Iterator<Item = ClassId>) -> String {
        ids.map(|id| format!("`{}`", self.model.classes.get(id).name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn host_artifact(
        &self,
        names: &ClassNames,
        file: &str,
        kind: ArtifactKind,
        items: Vec<HostItem>,
    ) -> Artifact {
        Artifact {
            path: host_path(&names.module, file),
            kind,
            body: ArtifactBody::Host(items),
        }
    }
}

pub(super) fn use_item(path: impl Into<String>) -> HostItem {
    HostItem::Use {
        path: path.into(),
        public: false,
    }
}

/// `use std::ffi::{..};` for the names a file needs, sorted.
pub(super) fn ffi_use(ffi: &FfiNames) -> Option<HostItem> {
    let mut names: Vec<&str> = ffi.iter().copied().collect();
    names.sort_unstable();
    match names.as_slice() {
        [] => None,
        [one] => Some(use_item(format!("std::ffi::{one}"))),
        many => Some(use_item(format!("std::ffi::{{{}}}", many.join(", ")))),
    }
}
