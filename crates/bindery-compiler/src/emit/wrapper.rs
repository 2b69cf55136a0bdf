//! Foreign-side (C++) wrapper artifacts of a class module.

use indexmap::IndexSet;

use bindery_core::naming::foreign_param_name;
use bindery_core::{Class, ClassId, ClassNames, CppType, Function, ModuleId};

use super::decl::{Artifact, ArtifactBody, ArtifactKind, ForeignItem, WrapperSig};
use super::{Emitter, foreign_path};
use crate::partition::Module;
use crate::symbols::{CastEntry, Entry};

impl Emitter<'_> {
    /// `<Id>.h`: opaque typedefs and one C-linkage prototype per declared entry.
    pub(super) fn wrapper_header(
        &self,
        module: &Module,
        id: ClassId,
        names: &ClassNames,
    ) -> Artifact {
        let class = self.model.classes.get(id);
        let mut items = vec![
            ForeignItem::Comment(format!("C-linkage wrappers for `{}`.", class.name)),
            ForeignItem::PragmaOnce,
        ];
        let ancestors = self.ancestor_modules(id);
        let included: IndexSet<&ModuleId> = module.imports.raw.iter().chain(&ancestors).collect();
        items.extend(self.wrapper_includes(included));

        let mut block = vec![ForeignItem::OpaqueTypedef {
            c_struct: names.c_struct.clone(),
            c_ptr: names.c_ptr.clone(),
        }];
        block.extend(
            self.symbols
                .declared(id)
                .map(|entry| ForeignItem::Prototype(self.wrapper_sig(class, names, entry))),
        );
        for cast in self.symbols.casts(id) {
            block.extend(
                self.cast_wrappers(class, names, cast)
                    .map(|(sig, _)| ForeignItem::Prototype(sig)),
            );
        }
        items.push(ForeignItem::ExternC(block));

        Artifact {
            path: foreign_path(&format!("{}.h", names.handle)),
            kind: ArtifactKind::WrapperHeader,
            body: ArtifactBody::Foreign(items),
        }
    }

    /// `<Id>.cpp`: wrapper definitions forwarding to the wrapped class.
    pub(super) fn wrapper_source(
        &self,
        module: &Module,
        id: ClassId,
        names: &ClassNames,
    ) -> Artifact {
        let class = self.model.classes.get(id);
        let mut items = vec![ForeignItem::Include {
            path: format!("{}.h", names.handle),
            system: false,
        }];
        let ancestors = self.ancestor_modules(id);
        let units = std::iter::once(&module.id)
            .chain(&module.imports.raw)
            .chain(&ancestors);
        items.extend(self.unit_items(units.map(|m| m.name.as_str())));

        let mut definitions: Vec<ForeignItem> = self
            .symbols
            .declared(id)
            .map(|entry| ForeignItem::Definition {
                sig: self.wrapper_sig(class, names, entry),
                body: vec![self.wrapper_body(class, names, &class.functions[entry.index])],
            })
            .collect();
        for cast in self.symbols.casts(id) {
            definitions.extend(
                self.cast_wrappers(class, names, cast)
                    .map(|(sig, body)| ForeignItem::Definition {
                        sig,
                        body: vec![body],
                    }),
            );
        }
        items.push(ForeignItem::ExternC(definitions));

        Artifact {
            path: foreign_path(&format!("{}.cpp", names.handle)),
            kind: ArtifactKind::WrapperSource,
            body: ArtifactBody::Foreign(items),
        }
    }

    pub(super) fn wrapper_sig(
        &self,
        class: &Class,
        names: &ClassNames,
        entry: &Entry,
    ) -> WrapperSig {
        let function = &class.functions[entry.index];
        let self_ty = CppType::class(names.c_ptr.clone());
        let mut params = Vec::new();
        if function.takes_self() {
            params.push((self_ty.clone(), "self_".to_string()));
        }
        let (args, ret) = function.args_and_return(&class.name);
        for (i, arg) in args.iter().enumerate() {
            params.push((
                self.marshal.foreign_type(&arg.ty),
                foreign_param_name(&arg.name, i),
            ));
        }
        WrapperSig {
            symbol: entry.symbol.clone(),
            params,
            ret: self.marshal.foreign_type(&ret),
        }
    }

    fn wrapper_body(&self, class: &Class, names: &ClassNames, function: &Function) -> String {
        let args = function
            .args()
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                self.marshal
                    .foreign_arg(&arg.ty, &foreign_param_name(&arg.name, i))
            })
            .collect::<Vec<_>>()
            .join(", ");
        let this = format!("reinterpret_cast<{}*>(self_)", class.name);
        match function {
            Function::Constructor { .. } => format!(
                "return reinterpret_cast<{}>(new {}({args}));",
                names.c_ptr, class.name
            ),
            Function::Destructor { .. } => format!("delete {this};"),
            Function::Virtual { ret, name, .. } | Function::NonVirtual { ret, name, .. } => self
                .marshal
                .foreign_return(ret, &format!("{this}->{name}({args})")),
            Function::Static { ret, name, .. } => self
                .marshal
                .foreign_return(ret, &format!("{}::{name}({args})", class.name)),
        }
    }

    /// Upcast and downcast wrappers between `class` and one ancestor.
    ///
    /// Both step through every class on the inheritance path with `static_cast`, so C++
    /// applies each base offset, and pick the first path when the ancestor is reachable
    /// more than once.
    fn cast_wrappers(
        &self,
        class: &Class,
        names: &ClassNames,
        cast: &CastEntry,
    ) -> [(WrapperSig, String); 2] {
        let ancestor = self.model.classes.get(cast.ancestor);
        let target = ClassNames::of(ancestor);
        let chain: Vec<&str> = std::iter::once(class.name.as_str())
            .chain(cast.path.iter().map(|&c| self.model.classes.get(c).name.as_str()))
            .collect();

        let up = chain[1..].iter().fold(
            format!("reinterpret_cast<{}*>(self_)", class.name),
            |expr, step| format!("static_cast<{step}*>({expr})"),
        );
        let down = chain[..chain.len() - 1].iter().rev().fold(
            format!("reinterpret_cast<{}*>(base)", ancestor.name),
            |expr, step| format!("static_cast<{step}*>({expr})"),
        );
        let own = CppType::class(names.c_ptr.clone());
        let base = CppType::class(target.c_ptr.clone());
        [
            (
                WrapperSig {
                    symbol: cast.upcast.clone(),
                    params: vec![(own.clone(), "self_".to_string())],
                    ret: base.clone(),
                },
                format!("return reinterpret_cast<{}>({up});", target.c_ptr),
            ),
            (
                WrapperSig {
                    symbol: cast.downcast.clone(),
                    params: vec![(base, "base".to_string())],
                    ret: own,
                },
                format!("return reinterpret_cast<{}>({down});", names.c_ptr),
            ),
        ]
    }

    /// Modules of every ancestor of `id`, nearest first.
    pub(super) fn ancestor_modules(&self, id: ClassId) -> IndexSet<ModuleId> {
        self.symbols
            .casts(id)
            .iter()
            .map(|cast| self.model.classes.get(cast.ancestor).module_id())
            .collect()
    }

    /// Wrapper headers of the given class modules.
    pub(super) fn wrapper_includes<'m>(
        &self,
        modules: impl IntoIterator<Item = &'m ModuleId>,
    ) -> Vec<ForeignItem> {
        modules
            .into_iter()
            .filter_map(|m| self.owner(m))
            .map(|owner| ForeignItem::Include {
                path: format!("{}.h", owner.ident()),
                system: false,
            })
            .collect()
    }

    /// Headers and namespaces of the C++ units behind the named modules, de-duplicated.
    pub(super) fn unit_items<'m>(
        &self,
        modules: impl Iterator<Item = &'m str>,
    ) -> Vec<ForeignItem> {
        let mut headers = IndexSet::new();
        let mut namespaces = IndexSet::new();
        for name in modules {
            if let Some(unit) = self.model.unit(name) {
                headers.extend(unit.headers.iter().cloned());
                namespaces.extend(unit.namespaces.iter().cloned());
            }
        }
        let includes = headers.into_iter().map(|path| ForeignItem::Include {
            system: is_system_header(&path),
            path,
        });
        includes
            .chain(namespaces.into_iter().map(ForeignItem::UsingNamespace))
            .collect()
    }
}

/// Extension-less headers (`vector`, `memory`) are standard library headers.
fn is_system_header(path: &str) -> bool {
    !path.contains('.')
}
