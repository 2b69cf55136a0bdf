//! Naming registry.
//!
//! Built once per run, before emission, from every class, template and free function,
//! plus the cast wrappers between each local class and its ancestors. Collisions in
//! wrapper symbols, host entry names or generated identifiers fail the whole run and name
//! both offending declarations.

use indexmap::IndexMap;
use indexmap::map::Entry as MapEntry;

use bindery_core::naming::{entry_name, free_wrapper_symbol, host_fn_name, wrapper_symbol};
use bindery_core::{ClassId, Function, Model};

use crate::NamingError;
use crate::hierarchy::Hierarchy;

/// Module holding wrapped free functions.
pub const TOPLEVEL_MODULE: &str = "toplevel";

/// Names derived for one wrapped member function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Index into the owner's function list.
    pub index: usize,
    pub entry: String,
    /// Rust function name.
    pub host: String,
    /// C-linkage export.
    pub symbol: String,
    /// Ancestor whose capability already exposes this virtual entry.
    pub overrides: Option<ClassId>,
}

impl Entry {
    pub fn is_declared(&self) -> bool {
        self.overrides.is_none()
    }
}

/// Conversion wrappers between a local class and one of its ancestors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CastEntry {
    pub ancestor: ClassId,
    /// Classes crossed on the way up, ending at `ancestor`.
    pub path: Vec<ClassId>,
    /// `<pkg>_<id>_as_<ancestor>`
    pub upcast: String,
    /// `<pkg>_<id>_from_<ancestor>`
    pub downcast: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FreeEntry {
    pub index: usize,
    pub entry: String,
    pub host: String,
    pub symbol: String,
}

#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    classes: Vec<Vec<Entry>>,
    casts: Vec<Vec<CastEntry>>,
    templates: Vec<Vec<Entry>>,
    free: Vec<FreeEntry>,
}

impl SymbolTable {
    #[tracing::instrument(level = "debug", skip_all, fields(package = %model.package))]
    pub fn build(model: &Model, hierarchy: &Hierarchy) -> Result<Self, NamingError> {
        let mut table = Self::default();
        let mut symbols = Registry::default();

        for (id, class) in model.classes.iter() {
            let ident = class.ident();
            let mut hosts = Registry::default();
            let mut entries = Vec::new();
            for (index, function) in class.wrapped_functions() {
                let entry = entry_name(ident, function);
                let host = host_fn_name(&entry);
                let overrides = if function.is_virtual() {
                    hierarchy
                        .ancestors(id)
                        .iter()
                        .copied()
                        .find(|&a| exposes_virtual(model, a, &host))
                } else {
                    None
                };
                let symbol = wrapper_symbol(&class.package, ident, &entry);
                if overrides.is_none() && model.is_local(class) {
                    let what = describe(&class.name, function);
                    hosts.claim(&host, &what).map_err(|(first, second)| {
                        NamingError::DuplicateEntry {
                            class: class.name.clone(),
                            entry: host.clone(),
                            first,
                            second,
                        }
                    })?;
                    symbols.claim(&symbol, &what).map_err(|(first, second)| {
                        NamingError::DuplicateSymbol {
                            symbol: symbol.clone(),
                            first,
                            second,
                        }
                    })?;
                }
                entries.push(Entry {
                    index,
                    entry,
                    host,
                    symbol,
                    overrides,
                });
            }
            table.classes.push(entries);

            let mut casts = Vec::new();
            if model.is_local(class) {
                for &ancestor in hierarchy.ancestors(id) {
                    let target = model.classes.get(ancestor);
                    let cast = CastEntry {
                        ancestor,
                        path: hierarchy.path(&model.classes, id, ancestor),
                        upcast: wrapper_symbol(
                            &class.package,
                            ident,
                            &format!("as_{}", target.ident()),
                        ),
                        downcast: wrapper_symbol(
                            &class.package,
                            ident,
                            &format!("from_{}", target.ident()),
                        ),
                    };
                    let up = format!("upcast of `{}` to `{}`", class.name, target.name);
                    let down = format!("downcast of `{}` to `{}`", target.name, class.name);
                    for (symbol, what) in [(&cast.upcast, up), (&cast.downcast, down)] {
                        symbols.claim(symbol, &what).map_err(|(first, second)| {
                            NamingError::DuplicateSymbol {
                                symbol: symbol.clone(),
                                first,
                                second,
                            }
                        })?;
                    }
                    casts.push(cast);
                }
            }
            table.casts.push(casts);
        }

        for template in &model.templates {
            let mut hosts = Registry::default();
            let mut entries = Vec::new();
            for (index, function) in template.class.functions.iter().enumerate() {
                let entry = entry_name(template.ident(), function);
                let host = host_fn_name(&entry);
                let what = describe(&template.class.name, function);
                hosts.claim(&host, &what).map_err(|(first, second)| {
                    NamingError::DuplicateEntry {
                        class: template.class.name.clone(),
                        entry: host.clone(),
                        first,
                        second,
                    }
                })?;
                let symbol = wrapper_symbol(&model.package, template.ident(), &entry);
                symbols.claim(&symbol, &what).map_err(|(first, second)| {
                    NamingError::DuplicateSymbol {
                        symbol: symbol.clone(),
                        first,
                        second,
                    }
                })?;
                entries.push(Entry {
                    index,
                    entry,
                    host,
                    symbol,
                    overrides: None,
                });
            }
            table.templates.push(entries);
        }

        let mut free_hosts = Registry::default();
        for (index, function) in model.functions.iter().enumerate() {
            let symbol = free_wrapper_symbol(&model.package, function);
            let what = format!("free function `{}`", function.name);
            symbols
                .claim(&symbol, &what)
                .map_err(|(first, second)| NamingError::DuplicateSymbol {
                    symbol: symbol.clone(),
                    first,
                    second,
                })?;
            let entry = function.entry_name().to_string();
            let host = host_fn_name(&entry);
            free_hosts
                .claim(&host, &what)
                .map_err(|(first, second)| NamingError::DuplicateEntry {
                    class: TOPLEVEL_MODULE.to_string(),
                    entry: host.clone(),
                    first,
                    second,
                })?;
            table.free.push(FreeEntry {
                index,
                entry,
                host,
                symbol,
            });
        }

        check_identifiers(model)?;
        tracing::debug!(symbols = symbols.len(), "naming registry built");
        Ok(table)
    }

    /// Every wrapped function of the class, overrides included.
    pub fn entries(&self, class: ClassId) -> &[Entry] {
        self.ensure_entries(class)
    }

    pub(crate) fn class_entries(&self) -> &[Vec<Entry>] {
        &self.classes
    }

    /// Entries that get their own wrapper and host declaration.
    pub fn declared(&self, class: ClassId) -> impl Iterator<Item = &Entry> {
        self.entries(class).iter().filter(|e| e.is_declared())
    }

    /// Cast wrappers of a local class, one per ancestor, nearest first.
    pub fn casts(&self, class: ClassId) -> &[CastEntry] {
        &self.casts[class.index()]
    }

    pub fn template_entries(&self, template: usize) -> &[Entry] {
        &self.templates[template]
    }

    pub fn free_functions(&self) -> &[FreeEntry] {
        &self.free
    }
}

/// Whether `class` declares a wrapped virtual whose host name is `host`.
fn exposes_virtual(model: &Model, class: ClassId, host: &str) -> bool {
    let class = model.classes.get(class);
    class
        .wrapped_functions()
        .filter(|(_, f)| f.is_virtual())
        .any(|(_, f)| host_fn_name(&entry_name(class.ident(), f)) == host)
}

/// Class identifiers and module paths must be unique across the package.
fn check_identifiers(model: &Model) -> Result<(), NamingError> {
    let mut idents = Registry::default();
    let mut modules = Registry::default();

    if !model.functions.is_empty() {
        modules
            .claim(TOPLEVEL_MODULE, "free functions")
            .map_err(duplicate(TOPLEVEL_MODULE))?;
    }
    for (_, class) in model.local_classes() {
        let what = format!("class `{}`", class.name);
        idents
            .claim(class.ident(), &what)
            .map_err(duplicate(class.ident()))?;
        let module = class.module_name();
        modules.claim(&module, &what).map_err(duplicate(&module))?;
    }
    for template in &model.templates {
        let what = format!("template `{}`", template.class.name);
        idents
            .claim(template.ident(), &what)
            .map_err(duplicate(template.ident()))?;
        if !template.is_grouped() {
            modules
                .claim(&template.module, &what)
                .map_err(duplicate(&template.module))?;
        }
        for instance in &template.instances {
            let what = format!(
                "instance `{}` of template `{}`",
                instance.argument, template.class.name
            );
            modules
                .claim(&instance.module, &what)
                .map_err(duplicate(&instance.module))?;
        }
    }
    Ok(())
}

fn duplicate(ident: &str) -> impl FnOnce((String, String)) -> NamingError + '_ {
    move |(first, second)| NamingError::DuplicateIdentifier {
        ident: ident.to_string(),
        first,
        second,
    }
}

fn describe(owner: &str, function: &Function) -> String {
    match function.declared_name() {
        Some(name) => format!("`{owner}::{name}`"),
        None if function.is_constructor() => format!("constructor of `{owner}`"),
        None => format!("destructor of `{owner}`"),
    }
}

/// First claimant per name.
#[derive(Default)]
struct Registry {
    owners: IndexMap<String, String>,
}

impl Registry {
    /// Record `owner` for `name`; on conflict returns `(first, second)` owners.
    fn claim(&mut self, name: &str, owner: &str) -> Result<(), (String, String)> {
        match self.owners.entry(name.to_string()) {
            MapEntry::Occupied(e) => Err((e.get().clone(), owner.to_string())),
            MapEntry::Vacant(e) => {
                e.insert(owner.to_string());
                Ok(())
            }
        }
    }

    fn len(&self) -> usize {
        self.owners.len()
    }
}
