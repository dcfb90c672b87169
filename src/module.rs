//! Loaded schema modules as seen by the context.
//!
//! The compiler that produces module trees lives elsewhere; the context only
//! needs a module's identity (interned name and revision) and whether it is
//! implemented or merely imported.

use std::fmt;
use std::sync::Arc;

/// A loaded schema module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Interned module name.
    pub name: Arc<str>,
    /// Interned revision date, if the module declares one.
    pub revision: Option<Arc<str>>,
    /// Implemented modules contribute data nodes; the rest are import-only.
    pub implemented: bool,
}

impl Module {
    /// True if this module has `name` and, when given, `revision`.
    pub fn matches(&self, name: &str, revision: Option<&str>) -> bool {
        if &*self.name != name {
            return false;
        }
        match revision {
            Some(rev) => self.revision.as_deref() == Some(rev),
            None => true,
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.revision {
            Some(rev) => write!(f, "{}@{}", self.name, rev),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Shared handle to a module in a context's module list.
///
/// Equality is handle identity, so two separately loaded modules with the same
/// name are still distinct entries.
#[derive(Debug, Clone)]
pub struct ModuleRef(Arc<Module>);

impl ModuleRef {
    pub fn new(module: Module) -> Self {
        ModuleRef(Arc::new(module))
    }

    pub fn module(&self) -> &Module {
        &self.0
    }
}

impl std::ops::Deref for ModuleRef {
    type Target = Module;

    fn deref(&self) -> &Module {
        &self.0
    }
}

impl PartialEq for ModuleRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ModuleRef {}
