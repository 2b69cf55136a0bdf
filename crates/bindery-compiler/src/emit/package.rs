//! Package-level artifacts: wrapped free functions and the aggregate `lib.rs`.

use indexmap::IndexSet;

use bindery_core::naming::{foreign_param_name, host_param_name};
use bindery_core::{ClassNames, ModuleId};

use super::decl::{
    Artifact, ArtifactBody, ArtifactKind, ExternFn, ForeignItem, HostFn, HostItem,
    ModuleArtifacts, Param, WrapperSig,
};
use super::host::{ffi_use, use_item};
use super::marshal::FfiNames;
use super::template::template_stems;
use super::{Emitter, foreign_path};
use crate::symbols::{FreeEntry, TOPLEVEL_MODULE};

/// Lints the generated names trip by construction.
const AGGREGATE_ALLOW: &str =
    "allow(non_camel_case_types, non_snake_case, unused_imports, clippy::missing_safety_doc)";

/// Module id under which package-level artifacts are materialized.
const PACKAGE_UNIT: &str = "lib";

impl Emitter<'_> {
    pub(super) fn emit_package(&self, modules: &[ModuleArtifacts]) -> ModuleArtifacts {
        let mut artifacts = Vec::new();
        let has_free = !self.symbols.free_functions().is_empty();
        if has_free {
            let referenced = self.free_function_modules();
            artifacts.push(self.toplevel_host(&referenced));
            artifacts.push(self.toplevel_header(&referenced));
            artifacts.push(self.toplevel_source(&referenced));
        }
        artifacts.push(self.aggregate(modules, has_free));
        ModuleArtifacts {
            module: ModuleId::new(&self.model.package, PACKAGE_UNIT),
            artifacts,
        }
    }

    /// `src/toplevel.rs`.
    fn toplevel_host(&self, referenced: &IndexSet<ModuleId>) -> Artifact {
        let mut ffi = FfiNames::new();
        let (externs, functions): (Vec<ExternFn>, Vec<HostFn>) = self
            .symbols
            .free_functions()
            .iter()
            .map(|entry| self.lower_free(entry, &mut ffi))
            .unzip();

        let mut items = vec![
            HostItem::ModuleDoc(format!("Free functions of `{}`.", self.model.package)),
            use_item(format!("{}::FfiHandle", self.runtime())),
        ];
        for id in referenced {
            items.extend(self.module_imports(id, false));
        }
        items.extend(ffi_use(&ffi));
        items.push(HostItem::ExternBlock(externs));
        items.extend(functions.into_iter().map(HostItem::Fn));
        Artifact {
            path: format!("src/{TOPLEVEL_MODULE}.rs").into(),
            kind: ArtifactKind::TopLevel,
            body: ArtifactBody::Host(items),
        }
    }

    /// `csrc/TopLevel.h`.
    fn toplevel_header(&self, referenced: &IndexSet<ModuleId>) -> Artifact {
        let mut items = vec![
            ForeignItem::Comment(format!(
                "C-linkage wrappers for free functions of `{}`.",
                self.model.package
            )),
            ForeignItem::PragmaOnce,
        ];
        items.extend(self.wrapper_includes(referenced));
        let prototypes = self
            .symbols
            .free_functions()
            .iter()
            .map(|entry| ForeignItem::Prototype(self.free_sig(entry)))
            .collect();
        items.push(ForeignItem::ExternC(prototypes));
        Artifact {
            path: foreign_path("TopLevel.h"),
            kind: ArtifactKind::WrapperHeader,
            body: ArtifactBody::Foreign(items),
        }
    }

    /// `csrc/TopLevel.cpp`.
    fn toplevel_source(&self, referenced: &IndexSet<ModuleId>) -> Artifact {
        let mut items = vec![ForeignItem::Include {
            path: "TopLevel.h".to_string(),
            system: false,
        }];
        let units = std::iter::once(TOPLEVEL_MODULE)
            .chain(referenced.iter().map(|m| m.name.as_str()));
        items.extend(self.unit_items(units));
        let definitions = self
            .symbols
            .free_functions()
            .iter()
            .map(|entry| {
                let function = &self.model.functions[entry.index];
                let args = function
                    .args
                    .iter()
                    .enumerate()
                    .map(|(i, arg)| {
                        self.marshal
                            .foreign_arg(&arg.ty, &foreign_param_name(&arg.name, i))
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                let call = format!("{}({args})", function.name);
                ForeignItem::Definition {
                    sig: self.free_sig(entry),
                    body: vec![self.marshal.foreign_return(&function.ret, &call)],
                }
            })
            .collect();
        items.push(ForeignItem::ExternC(definitions));
        Artifact {
            path: foreign_path("TopLevel.cpp"),
            kind: ArtifactKind::WrapperSource,
            body: ArtifactBody::Foreign(items),
        }
    }

    fn free_sig(&self, entry: &FreeEntry) -> WrapperSig {
        let function = &self.model.functions[entry.index];
        WrapperSig {
            symbol: entry.symbol.clone(),
            params: function
                .args
                .iter()
                .enumerate()
                .map(|(i, arg)| {
                    (
                        self.marshal.foreign_type(&arg.ty),
                        foreign_param_name(&arg.name, i),
                    )
                })
                .collect(),
            ret: self.marshal.foreign_type(&function.ret),
        }
    }

    fn lower_free(&self, entry: &FreeEntry, ffi: &mut FfiNames) -> (ExternFn, HostFn) {
        let function = &self.model.functions[entry.index];
        let mut extern_params = Vec::new();
        let mut params = Vec::new();
        let mut call_args = Vec::new();
        for (i, arg) in function.args.iter().enumerate() {
            let name = host_param_name(&arg.name, i);
            extern_params.push(Param::new(&name, self.marshal.host_ffi(&arg.ty, ffi)));
            let (ty, expr) = self.marshal.host_param(&arg.ty, &name, ffi);
            params.push(Param::new(name, ty));
            call_args.push(expr);
        }
        let call = format!("{}({})", entry.symbol, call_args.join(", "));
        let extern_fn = ExternFn {
            symbol: entry.symbol.clone(),
            params: extern_params,
            ret: self.marshal.host_ffi_return(&function.ret, ffi),
        };
        let host = HostFn {
            public: true,
            name: entry.host.clone(),
            params,
            ret: self.marshal.host_return(&function.ret, ffi),
            body: Some(vec![format!(
                "unsafe {{ {} }}",
                self.marshal.host_wrap(&function.ret, &call)
            )]),
            ..HostFn::default()
        };
        (extern_fn, host)
    }

    /// Class modules named by free-function signatures.
    fn free_function_modules(&self) -> IndexSet<ModuleId> {
        self.model
            .functions
            .iter()
            .flat_map(|f| f.signature_types())
            .flat_map(|ty| ty.class_refs())
            .filter_map(|name| self.model.classes.by_name(name))
            .map(|class| class.module_id())
            .collect()
    }

    /// `src/lib.rs`: every module inline, with its public surface re-exported at the root.
    fn aggregate(&self, modules: &[ModuleArtifacts], has_free: bool) -> Artifact {
        let mut items = vec![
            HostItem::ModuleDoc(format!(
                "Generated bindings for the `{}` package.",
                self.model.package
            )),
            HostItem::InnerAttribute(AGGREGATE_ALLOW.to_string()),
        ];
        let mut exports = Vec::new();
        for unit in modules {
            let children: Vec<String> = unit
                .artifacts
                .iter()
                .filter(|a| matches!(a.body, ArtifactBody::Host(_)))
                .filter_map(|a| a.path.file_stem())
                .map(|stem| stem.to_string_lossy().into_owned())
                .collect();
            if children.is_empty() {
                continue;
            }
            let (reexports, names) = self.module_surface(&unit.module);
            items.push(HostItem::Module {
                name: unit.module.name.clone(),
                children,
                reexports,
            });
            if !names.is_empty() {
                exports.push(format!("{}::{{{}}}", unit.module.name, names.join(", ")));
            }
        }
        if has_free {
            items.push(HostItem::ModDecl(TOPLEVEL_MODULE.to_string()));
            exports.push(format!("{TOPLEVEL_MODULE}::*"));
        }
        items.extend(exports.into_iter().map(|path| HostItem::Use { path, public: true }));
        Artifact {
            path: "src/lib.rs".into(),
            kind: ArtifactKind::Aggregate,
            body: ArtifactBody::Host(items),
        }
    }

    /// Re-exports inside a module and the names they bring into scope.
    fn module_surface(&self, id: &ModuleId) -> (Vec<String>, Vec<String>) {
        let mut reexports = Vec::new();
        let mut names = Vec::new();
        let Some(module) = self.modules.get(&id.name) else {
            return (reexports, names);
        };
        if let Some(class) = module.class {
            let n = ClassNames::of(self.model.classes.get(class));
            reexports.push(format!("raw::{}", n.handle));
            reexports.push(format!("interface::{}", n.capability));
            reexports.push(format!("cast::{{{}, {}}}", n.upcast, n.downcast));
            names.extend([n.handle, n.capability, n.upcast, n.downcast]);
        }
        for &index in &module.templates {
            let template = &self.model.templates[index];
            let n = ClassNames::from_ident(template.ident());
            let (stem, _) = template_stems(template);
            reexports.push(format!("{stem}::{{{}, {}}}", n.handle, n.capability));
            names.extend([n.handle, n.capability]);
        }
        (reexports, names)
    }
}
