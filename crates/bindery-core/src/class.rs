//! Class arena.
//!
//! Classes are stored once in a [`ClassSet`] and refer to their parents by [`ClassId`],
//! so shared ancestors are shared nodes rather than copies.

use std::fmt;

use indexmap::{IndexMap, IndexSet};

use crate::function::Function;
use crate::utils::to_snake_case;

/// Index of a class in its [`ClassSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity of one emission module: owning package plus module name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId {
    pub package: String,
    pub name: String,
}

impl ModuleId {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.package, self.name)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClassKind {
    #[default]
    Concrete,
    /// Never constructed directly; constructors are not emitted.
    Abstract,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Class {
    /// Foreign name, as spelled in C++.
    pub name: String,
    pub package: String,
    pub parents: Vec<ClassId>,
    pub protected: IndexSet<String>,
    pub alias: Option<String>,
    pub functions: Vec<Function>,
    pub kind: ClassKind,
}

impl Class {
    /// Base of every generated identifier: alias if present, otherwise the name.
    pub fn ident(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn module_name(&self) -> String {
        to_snake_case(self.ident())
    }

    pub fn module_id(&self) -> ModuleId {
        ModuleId::new(&self.package, self.module_name())
    }

    pub fn is_abstract(&self) -> bool {
        self.kind == ClassKind::Abstract
    }

    pub fn is_protected(&self, function: &Function) -> bool {
        function
            .declared_name()
            .is_some_and(|name| self.protected.contains(name))
    }

    /// Functions that get wrappers, in declaration order, with their declaration index.
    ///
    /// Protected functions are dropped, and so are constructors of abstract classes.
    pub fn wrapped_functions(&self) -> impl Iterator<Item = (usize, &Function)> {
        self.functions.iter().enumerate().filter(|(_, f)| {
            !self.is_protected(f) && !(self.is_abstract() && f.is_constructor())
        })
    }
}

/// All classes of a run, local and external, indexed by foreign name.
#[derive(Clone, Debug, Default)]
pub struct ClassSet {
    classes: Vec<Class>,
    by_name: IndexMap<String, ClassId>,
}

impl ClassSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a class. Returns `None` when a class with the same name already exists.
    pub fn insert(&mut self, class: Class) -> Option<ClassId> {
        if self.by_name.contains_key(&class.name) {
            return None;
        }
        let id = ClassId(self.classes.len() as u32);
        self.by_name.insert(class.name.clone(), id);
        self.classes.push(class);
        Some(id)
    }

    pub fn get(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.classes[id.index()]
    }

    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&Class> {
        self.lookup(name).map(|id| self.get(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.classes.len()).map(|i| ClassId(i as u32))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &Class)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, c)| (ClassId(i as u32), c))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
