//! Template instantiation glue.
//!
//! The generic declaration is emitted once per template; every requested argument
//! becomes one invocation of the configured host macro. Nothing here specializes.

use indexmap::IndexSet;

use bindery_core::naming::host_param_name;
use bindery_core::{ClassNames, FunctionKind, ModuleId, Template};

use super::decl::{Artifact, ArtifactBody, ArtifactKind, HostFn, HostItem, Param, Receiver};
use super::host::{ffi_use, use_item};
use super::marshal::FfiNames;
use super::{Emitter, host_path};
use crate::partition::Module;
use crate::symbols::Entry;

impl Emitter<'_> {
    pub(super) fn template_artifacts(&self, module: &Module, index: usize) -> Vec<Artifact> {
        let template = &self.model.templates[index];
        let names = ClassNames::from_ident(template.ident());
        let (decl_stem, instances_stem) = template_stems(template);
        vec![
            self.template_decl(module, index, &names, &decl_stem),
            self.template_instances(module, template, &names, &decl_stem, &instances_stem),
        ]
    }

    /// Generic handle and capability, parameterized over the held type `T`.
    fn template_decl(
        &self,
        module: &Module,
        index: usize,
        names: &ClassNames,
        stem: &str,
    ) -> Artifact {
        let template = &self.model.templates[index];
        let mut ffi = FfiNames::new();
        let methods: Vec<HostFn> = self
            .symbols
            .template_entries(index)
            .iter()
            .map(|entry| self.template_method(template, entry, &mut ffi))
            .collect();

        let mut items = vec![
            HostItem::ModuleDoc(format!(
                "Generic declaration of `{}<T>` from `{}`.",
                template.class.name, template.header
            )),
            use_item(format!("{}::FfiHandle", self.runtime())),
        ];
        for referenced in referenced_modules(self, template) {
            items.extend(self.module_imports(&referenced, false));
        }
        items.extend(ffi_use(&ffi));
        items.push(HostItem::OpaqueStruct {
            name: names.raw.clone(),
            generic: true,
        });
        items.push(HostItem::Handle {
            name: names.handle.clone(),
            raw: names.raw.clone(),
            generic: true,
            runtime: self.runtime().to_string(),
        });
        items.push(HostItem::Trait {
            doc: Some(format!(
                "Functions of `{}<T>`, provided per instance by `{}!`.",
                template.class.name, self.config.template_macro
            )),
            name: names.capability.clone(),
            generic: true,
            supertraits: vec!["FfiHandle".to_string()],
            items: methods,
        });
        tracing::trace!(
            module = %module.id.name,
            template = %template.class.name,
            "template declaration"
        );
        Artifact {
            path: host_path(&module.id.name, stem),
            kind: ArtifactKind::Template,
            body: ArtifactBody::Host(items),
        }
    }

    /// One instantiation request per concrete argument.
    fn template_instances(
        &self,
        module: &Module,
        template: &Template,
        names: &ClassNames,
        decl_stem: &str,
        stem: &str,
    ) -> Artifact {
        let mut ffi = FfiNames::new();
        let mut imported = IndexSet::new();
        let mut requests = Vec::new();
        for instance in &template.instances {
            for class in instance.argument.class_refs() {
                if let Some(owner) = self.model.classes.by_name(class) {
                    imported.insert(owner.module_id());
                }
            }
            requests.push(HostItem::MacroCall {
                name: self.config.template_macro.clone(),
                fields: vec![
                    ("template".to_string(), names.handle.clone()),
                    ("header".to_string(), quoted(&template.header)),
                    (
                        "argument".to_string(),
                        self.marshal.host_argument(&instance.argument, &mut ffi),
                    ),
                    (
                        "cpp_argument".to_string(),
                        quoted(&instance.argument.render()),
                    ),
                    ("module".to_string(), instance.module.clone()),
                ],
            });
        }

        let mut items = vec![
            HostItem::ModuleDoc(format!(
                "Instantiation requests for `{}<T>`.",
                template.class.name
            )),
            use_item(format!(
                "super::{decl_stem}::{{{}, {}}}",
                names.handle, names.capability
            )),
        ];
        for id in &imported {
            if let Some(owner) = self.owner(id) {
                let owner = ClassNames::of(owner);
                items.push(use_item(format!(
                    "{}::raw::{{{}, {}}}",
                    self.module_path(id),
                    owner.handle,
                    owner.raw
                )));
            }
        }
        items.extend(ffi_use(&ffi));
        items.extend(requests);
        Artifact {
            path: host_path(&module.id.name, stem),
            kind: ArtifactKind::Instances,
            body: ArtifactBody::Host(items),
        }
    }

    /// Trait method of the generic capability. Instances supply the bodies.
    fn template_method(&self, template: &Template, entry: &Entry, ffi: &mut FfiNames) -> HostFn {
        let function = &template.class.functions[entry.index];
        let (args, ret) = function.args_and_return(&template.class.name);
        let params = args
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                let name = host_param_name(&arg.name, i);
                let (ty, _) = self.marshal.host_param(&arg.ty, &name, ffi);
                Param::new(name, ty)
            })
            .collect();
        let kind = function.kind();
        let ret = match kind {
            FunctionKind::Constructor => Some("Self".to_string()),
            _ => self.marshal.host_return(&ret, ffi),
        };
        HostFn {
            doc: (kind == FunctionKind::Destructor)
                .then(|| "# Safety\n\nThe handle must not be used afterwards.".to_string()),
            is_unsafe: kind == FunctionKind::Destructor,
            name: entry.host.clone(),
            receiver: match kind {
                FunctionKind::Virtual | FunctionKind::NonVirtual => Some(Receiver::Ref),
                FunctionKind::Destructor => Some(Receiver::Value),
                FunctionKind::Constructor | FunctionKind::Static => None,
            },
            params,
            ret,
            sized: !function.takes_self() || kind == FunctionKind::Destructor,
            ..HostFn::default()
        }
    }
}

/// `template`/`instances` when the template owns its module, suffixed when grouped.
pub(super) fn template_stems(template: &Template) -> (String, String) {
    if template.is_grouped() {
        let snake = bindery_core::utils::to_snake_case(template.ident());
        (format!("template_{snake}"), format!("instances_{snake}"))
    } else {
        ("template".to_string(), "instances".to_string())
    }
}

/// Class modules mentioned by the template's signatures.
fn referenced_modules(emitter: &Emitter<'_>, template: &Template) -> IndexSet<ModuleId> {
    template
        .class
        .functions
        .iter()
        .flat_map(|f| f.signature_types())
        .flat_map(|ty| ty.class_refs())
        .filter_map(|name| emitter.model.classes.by_name(name))
        .map(|class| class.module_id())
        .collect()
}

fn quoted(text: &str) -> String {
    format!("{text:?}")
}
