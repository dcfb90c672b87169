//! Context: the owner of every long-lived resource the schema engine shares.
//!
//! A [`Context`] holds the interned-string dictionary, the search-directory
//! registry, the loaded-module list, the behavior flags, the module-set epoch
//! and the per-thread error channel. Parser, compiler and validator all work
//! against a borrowed context.
//!
//! Everything except the error channel needs `&mut Context` to change, so
//! callers that share a context between threads serialize mutation
//! themselves. Diagnostics may be recorded and read through `&Context` from
//! any thread.

pub mod bootstrap;
pub mod options;
pub mod searchdirs;

pub use bootstrap::{Bootstrap, InternalModule, INTERNAL_MODULES};
pub use options::ContextOptions;

use crate::config::ContextConfig;
use crate::diagnostics::{Diagnostic, ErrorChannel, ErrorStore, KeyRegistry};
use crate::dict::Dictionary;
use crate::error::ContextError;
use crate::module::{Module, ModuleRef};
use crate::set::{Set, SetOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error};

/// Callback releasing per-module resources owned by the caller.
pub type ModuleDestructor<'a> = &'a mut dyn FnMut(&Module);

/// Shared engine state for one independent schema universe.
#[derive(Debug)]
pub struct Context {
    dictionary: Dictionary,
    search_paths: Set<PathBuf>,
    modules: Set<ModuleRef>,
    flags: ContextOptions,
    module_set_id: u16,
    errors: ErrorChannel,
    torn_down: bool,
}

impl Context {
    /// Create a context.
    ///
    /// `search_dir_spec` is a list of directories joined with the platform
    /// path-list separator (`:` on Unix). Construction fails as a whole if any
    /// listed directory cannot be registered.
    pub fn new(
        search_dir_spec: Option<&str>,
        options: ContextOptions,
    ) -> Result<Self, ContextError> {
        Self::build(search_dir_spec, options, None)
    }

    /// Create a context and load the built-in modules through `bootstrap`.
    pub fn with_bootstrap(
        search_dir_spec: Option<&str>,
        options: ContextOptions,
        bootstrap: &mut dyn Bootstrap,
    ) -> Result<Self, ContextError> {
        Self::build(search_dir_spec, options, Some(bootstrap))
    }

    /// Create a context from loaded configuration.
    pub fn from_config(config: &ContextConfig) -> Result<Self, ContextError> {
        let mut ctx = Self::new(None, config.options.to_flags())?;
        ctx.set_error_store(config.errors);
        for dir in &config.search_dirs {
            ctx.set_search_dir(Some(dir.as_path()))?;
        }
        Ok(ctx)
    }

    fn build(
        search_dir_spec: Option<&str>,
        options: ContextOptions,
        bootstrap: Option<&mut dyn Bootstrap>,
    ) -> Result<Self, ContextError> {
        Self::build_in(&KeyRegistry::global(), search_dir_spec, options, bootstrap)
    }

    fn build_in(
        registry: &Arc<KeyRegistry>,
        search_dir_spec: Option<&str>,
        options: ContextOptions,
        bootstrap: Option<&mut dyn Bootstrap>,
    ) -> Result<Self, ContextError> {
        let dictionary = Dictionary::new();
        let key = registry.acquire()?;

        // From here on a failed step drops `ctx`, which tears down everything
        // acquired so far.
        let mut ctx = Context {
            dictionary,
            search_paths: Set::new(),
            modules: Set::new(),
            flags: options,
            module_set_id: 0,
            errors: ErrorChannel::new(key),
            torn_down: false,
        };

        if let Some(spec) = search_dir_spec {
            ctx.add_search_dirs(spec)?;
        }
        ctx.module_set_id = 1;

        if let Some(bootstrap) = bootstrap {
            bootstrap::load_internal_modules(&mut ctx, bootstrap)?;
        }

        debug!(
            key = ?ctx.errors.key_id(),
            options = ctx.flags.bits(),
            search_dirs = ctx.search_paths.len(),
            modules = ctx.modules.len(),
            "Context created"
        );
        Ok(ctx)
    }

    /// Destroy the context, passing every loaded module to `destructor` first.
    ///
    /// Modules are released last to first, then the search directories, the
    /// diagnostics of all threads and the error key, and finally the
    /// dictionary.
    pub fn destroy(mut self, destructor: Option<ModuleDestructor<'_>>) {
        self.teardown(destructor);
    }

    fn teardown(&mut self, mut destructor: Option<ModuleDestructor<'_>>) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        while let Some(module) = self.modules.pop() {
            if let Some(destructor) = destructor.as_deref_mut() {
                destructor(module.module());
            }
            self.release_module_strings(&module);
        }
        self.modules.free();

        // clearing an empty registry never fails
        let _ = self.unset_search_dirs(None);

        self.errors.release();
        self.dictionary.clean();
    }

    /// Current module-set epoch. Starts at 1 and changes whenever a module
    /// is added or removed.
    pub fn module_set_id(&self) -> u16 {
        self.module_set_id
    }

    /// The context's interned-string dictionary.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Loaded modules in load order (until one is removed).
    pub fn modules(&self) -> &[ModuleRef] {
        self.modules.as_slice()
    }

    /// Register a module by name; strings are interned in this context.
    ///
    /// The module is implemented when [`ContextOptions::ALL_IMPLEMENTED`] is set.
    pub fn add_module(
        &mut self,
        name: &str,
        revision: Option<&str>,
    ) -> Result<ModuleRef, ContextError> {
        let module = Module {
            name: Arc::from(name),
            revision: revision.map(Arc::from),
            implemented: self.flags.contains(ContextOptions::ALL_IMPLEMENTED),
        };
        self.insert_module(module)
    }

    /// Take ownership of a module built elsewhere.
    pub fn insert_module(&mut self, module: Module) -> Result<ModuleRef, ContextError> {
        let module = Module {
            name: self.dictionary.insert(&module.name),
            revision: module
                .revision
                .as_deref()
                .map(|rev| self.dictionary.insert(rev)),
            implemented: module.implemented,
        };
        let handle = ModuleRef::new(module);

        if let Err(err) = self.modules.add(handle.clone(), SetOptions::empty()) {
            self.release_module_strings(&handle);
            return Err(self.report(err));
        }
        self.bump_module_set_id();

        debug!(module = %handle.module(), epoch = self.module_set_id, "Module added");
        Ok(handle)
    }

    /// Remove a module. Returns `None` if it was not loaded in this context.
    pub fn remove_module(&mut self, module: &ModuleRef) -> Option<ModuleRef> {
        let removed = self.modules.remove(module)?;
        self.release_module_strings(&removed);
        self.bump_module_set_id();
        Some(removed)
    }

    /// Find a loaded module. Without a revision the newest revision wins.
    pub fn get_module(&self, name: &str, revision: Option<&str>) -> Option<&ModuleRef> {
        let mut found = self
            .modules
            .iter()
            .filter(|module| module.matches(name, revision));
        if revision.is_some() {
            return found.next();
        }
        found.max_by(|a, b| a.revision.cmp(&b.revision))
    }

    /// Record a diagnostic for the calling thread and log it.
    pub fn record_error(&self, diagnostic: Diagnostic) {
        error!(kind = %diagnostic.kind, path = ?diagnostic.path, "{}", diagnostic.message);
        self.errors.record(diagnostic);
    }

    /// Most recent diagnostic of the calling thread.
    pub fn last_error(&self) -> Option<Diagnostic> {
        self.errors.last()
    }

    /// All diagnostics of the calling thread, oldest first.
    pub fn errors(&self) -> Vec<Diagnostic> {
        self.errors.errors()
    }

    /// Remove and return the calling thread's diagnostics.
    pub fn take_errors(&self) -> Vec<Diagnostic> {
        self.errors.take()
    }

    /// Drop the calling thread's diagnostics.
    pub fn clean_errors(&self) {
        self.errors.clean_thread();
    }

    pub fn error_store(&self) -> ErrorStore {
        self.errors.store()
    }

    pub fn set_error_store(&mut self, store: ErrorStore) {
        self.errors.set_store(store);
    }

    /// Error key held by this context; `None` once torn down.
    pub(crate) fn error_key_id(&self) -> Option<usize> {
        self.errors.key_id()
    }

    /// Record `err` as a diagnostic and hand it back for returning.
    pub(crate) fn report(&self, err: ContextError) -> ContextError {
        self.record_error(Diagnostic::from_error(&err));
        err
    }

    fn release_module_strings(&self, module: &ModuleRef) {
        self.dictionary.remove(&module.name);
        if let Some(rev) = &module.revision {
            self.dictionary.remove(rev);
        }
    }

    fn bump_module_set_id(&mut self) {
        self.module_set_id = self.module_set_id.wrapping_add(1);
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.teardown(None);
    }
}

/// Destroy `ctx` if there is one. `None` is accepted and ignored.
pub fn destroy(ctx: Option<Context>, destructor: Option<ModuleDestructor<'_>>) {
    if let Some(ctx) = ctx {
        ctx.destroy(destructor);
    }
}
