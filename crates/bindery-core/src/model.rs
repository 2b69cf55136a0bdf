//! Validated binding model.
//!
//! Built once from a [`PackageDecl`]: parent names are resolved to [`ClassId`]s and every
//! signature is checked, so later stages can assume well-formed input.

use indexmap::{IndexMap, IndexSet};

use crate::class::{Class, ClassId, ClassKind, ClassSet};
use crate::decl::{ModuleUnit, PackageDecl};
use crate::error::ModelError;
use crate::function::{Arg, FreeFunction, Function};
use crate::naming::package_prefix;
use crate::template::{Template, TemplateClass};
use crate::types::{CppType, Primitive};
use crate::utils::{is_identifier, to_snake_case};

#[derive(Clone, Debug)]
pub struct Model {
    pub package: String,
    pub classes: ClassSet,
    pub functions: Vec<FreeFunction>,
    pub templates: Vec<Template>,
    pub modules: IndexMap<String, ModuleUnit>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Position {
    Param,
    Return,
}

impl Model {
    pub fn from_decl(decl: PackageDecl) -> Result<Self, ModelError> {
        identifier(&package_prefix(&decl.package), "package name")?;
        for name in decl.modules.keys() {
            identifier(name, "module name")?;
        }

        let mut classes = ClassSet::new();
        let mut parent_names = Vec::with_capacity(decl.classes.len());
        for class in decl.classes {
            identifier(&class.name, "class name")?;
            if let Some(alias) = &class.alias {
                identifier(alias, &format!("alias of class `{}`", class.name))?;
            }
            let name = class.name.clone();
            let inserted = classes.insert(Class {
                name: class.name,
                package: class.package.unwrap_or_else(|| decl.package.clone()),
                parents: Vec::new(),
                protected: class.protected.into_iter().collect::<IndexSet<_>>(),
                alias: class.alias,
                functions: class.functions,
                kind: if class.is_abstract {
                    ClassKind::Abstract
                } else {
                    ClassKind::Concrete
                },
            });
            let Some(id) = inserted else {
                return Err(ModelError::DuplicateClass(name));
            };
            parent_names.push((id, class.parents));
        }

        // Parents may be declared after their children.
        for (id, names) in parent_names {
            let mut parents = Vec::with_capacity(names.len());
            for name in names {
                let parent = classes.lookup(&name).ok_or_else(|| ModelError::UnknownClass {
                    name: name.clone(),
                    referenced_by: format!("parents of `{}`", classes.get(id).name),
                })?;
                parents.push(parent);
            }
            classes.get_mut(id).parents = parents;
        }

        for (_, class) in classes.iter() {
            for function in &class.functions {
                let context = function_context(&class.name, function);
                check_member(function, &context, &classes, false)?;
            }
        }

        for function in &decl.functions {
            let context = format!("free function `{}`", function.name);
            identifier(&function.name, &context)?;
            if let Some(alias) = &function.alias {
                identifier(alias, &context)?;
            }
            check_args(&function.args, &context, &classes, false)?;
            check_type(&function.ret, Position::Return, &context, &classes, false)?;
        }

        let mut templates = Vec::with_capacity(decl.templates.len());
        for template in decl.templates {
            identifier(&template.name, "template name")?;
            let module = template
                .module
                .unwrap_or_else(|| to_snake_case(&template.name));
            identifier(&module, &format!("module of template `{}`", template.name))?;
            for function in &template.functions {
                let context = function_context(&template.name, function);
                check_member(function, &context, &classes, true)?;
            }
            for instance in &template.instances {
                check_instance(&template.name, &instance.argument, &instance.module, &classes)?;
            }
            templates.push(Template {
                class: TemplateClass {
                    name: template.name,
                    functions: template.functions,
                },
                header: template.header,
                module,
                instances: template.instances,
            });
        }

        Ok(Self {
            package: decl.package,
            classes,
            functions: decl.functions,
            templates,
            modules: decl.modules,
        })
    }

    /// Parse and validate a JSON model.
    pub fn from_json(json: &str) -> Result<Self, crate::Error> {
        let decl = PackageDecl::from_json(json)?;
        Ok(Self::from_decl(decl)?)
    }

    /// Whether the class belongs to the package being generated.
    pub fn is_local(&self, class: &Class) -> bool {
        class.package == self.package
    }

    pub fn local_classes(&self) -> impl Iterator<Item = (ClassId, &Class)> {
        self.classes.iter().filter(|(_, c)| self.is_local(c))
    }

    pub fn unit(&self, module: &str) -> Option<&ModuleUnit> {
        self.modules.get(module)
    }
}

fn identifier(name: &str, context: &str) -> Result<(), ModelError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(ModelError::InvalidIdentifier {
            name: name.to_string(),
            context: context.to_string(),
        })
    }
}

fn function_context(owner: &str, function: &Function) -> String {
    match function.declared_name() {
        Some(name) => format!("`{owner}::{name}`"),
        None if function.is_constructor() => format!("constructor of `{owner}`"),
        None => format!("destructor of `{owner}`"),
    }
}

fn check_member(
    function: &Function,
    context: &str,
    classes: &ClassSet,
    template: bool,
) -> Result<(), ModelError> {
    if let Some(name) = function.declared_name() {
        identifier(name, context)?;
    }
    if let Some(alias) = function.alias() {
        identifier(alias, context)?;
    }
    check_args(function.args(), context, classes, template)?;
    match function {
        Function::Virtual { ret, .. }
        | Function::NonVirtual { ret, .. }
        | Function::Static { ret, .. } => {
            check_type(ret, Position::Return, context, classes, template)
        }
        Function::Constructor { .. } | Function::Destructor { .. } => Ok(()),
    }
}

fn check_args(
    args: &[Arg],
    context: &str,
    classes: &ClassSet,
    template: bool,
) -> Result<(), ModelError> {
    for arg in args {
        if !arg.name.is_empty() {
            identifier(&arg.name, context)?;
        }
        check_type(&arg.ty, Position::Param, context, classes, template)?;
    }
    Ok(())
}

fn check_type(
    ty: &CppType,
    position: Position,
    context: &str,
    classes: &ClassSet,
    template: bool,
) -> Result<(), ModelError> {
    for name in ty.class_refs() {
        if classes.lookup(name).is_none() {
            return Err(ModelError::UnknownClass {
                name: name.to_string(),
                referenced_by: context.to_string(),
            });
        }
    }
    let reason = unsupported_reason(ty, position, template);
    match reason {
        Some(reason) => Err(ModelError::UnsupportedType {
            ty: ty.render(),
            context: context.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn unsupported_reason(ty: &CppType, position: Position, template: bool) -> Option<&'static str> {
    if ty.contains_restrict() {
        return Some("restrict qualifier is not supported");
    }
    if !template && ty.contains_template_param() {
        return Some("template parameter outside a template");
    }
    if ty.is_class_type() {
        if ty.class_shape().is_none() {
            return Some("classes may only be passed by value, pointer or reference");
        }
    } else if ty.mentions_class_value() {
        return Some("class used inside a composite type");
    }
    let long_double = Primitive::LongDouble;
    if ty.contains_primitive(&long_double)
        && *ty.unqualified() != CppType::Primitive(long_double)
    {
        return Some("long double is only supported by value");
    }
    match (position, ty.unqualified()) {
        (Position::Param, t) if t.is_void() => Some("parameter of type void"),
        (Position::Return, CppType::Array { .. } | CppType::Function { .. }) => {
            Some("functions cannot return arrays or functions")
        }
        _ => None,
    }
}

fn check_instance(
    template: &str,
    argument: &CppType,
    module: &str,
    classes: &ClassSet,
) -> Result<(), ModelError> {
    let invalid = |reason: String| ModelError::InvalidTemplateInstance {
        template: template.to_string(),
        reason,
    };
    if !is_identifier(module) {
        return Err(invalid(format!("module `{module}` is not a valid identifier")));
    }
    if argument.contains_template_param() {
        return Err(invalid("argument mentions the template parameter".to_string()));
    }
    if let Some(name) = argument
        .class_refs()
        .into_iter()
        .find(|name| classes.lookup(name).is_none())
    {
        return Err(invalid(format!("argument names unknown class `{name}`")));
    }
    if let Some(reason) = unsupported_reason(argument, Position::Param, false) {
        return Err(invalid(format!("argument `{argument}`: {reason}")));
    }
    Ok(())
}
