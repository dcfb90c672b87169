//! Built-in modules loaded into every new context.
//!
//! The context does not parse schema text itself. A [`Bootstrap`]
//! implementation supplied by the caller turns each [`InternalModule`]
//! descriptor into a [`Module`]; the context then takes ownership of it.

use super::{Context, ContextOptions};
use crate::error::ContextError;
use crate::module::Module;
use tracing::debug;

/// Descriptor of a module every context starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternalModule {
    pub name: &'static str,
    pub revision: &'static str,
    pub implemented: bool,
}

/// Built-in modules in load order.
///
/// ietf-datastores and ietf-yang-library must stay last: they are the ones
/// skipped under [`ContextOptions::NO_YANG_LIBRARY`].
pub const INTERNAL_MODULES: [InternalModule; 6] = [
    InternalModule {
        name: "ietf-yang-metadata",
        revision: "2016-08-05",
        implemented: false,
    },
    InternalModule {
        name: "yang",
        revision: "2017-02-20",
        implemented: true,
    },
    InternalModule {
        name: "ietf-inet-types",
        revision: "2013-07-15",
        implemented: false,
    },
    InternalModule {
        name: "ietf-yang-types",
        revision: "2013-07-15",
        implemented: false,
    },
    InternalModule {
        name: "ietf-datastores",
        revision: "2017-08-17",
        implemented: false,
    },
    InternalModule {
        name: "ietf-yang-library",
        revision: "2018-01-17",
        implemented: true,
    },
];

/// Number of trailing yang-library modules in [`INTERNAL_MODULES`].
const YANG_LIBRARY_MODULES: usize = 2;

/// Produces the built-in modules of a new context.
pub trait Bootstrap {
    fn load(&mut self, ctx: &Context, module: &InternalModule) -> Result<Module, ContextError>;
}

impl<F> Bootstrap for F
where
    F: FnMut(&Context, &InternalModule) -> Result<Module, ContextError>,
{
    fn load(&mut self, ctx: &Context, module: &InternalModule) -> Result<Module, ContextError> {
        self(ctx, module)
    }
}

/// Built-in modules applicable under `options`.
pub fn internal_modules(options: ContextOptions) -> &'static [InternalModule] {
    if options.contains(ContextOptions::NO_YANG_LIBRARY) {
        &INTERNAL_MODULES[..INTERNAL_MODULES.len() - YANG_LIBRARY_MODULES]
    } else {
        &INTERNAL_MODULES
    }
}

pub(crate) fn load_internal_modules(
    ctx: &mut Context,
    bootstrap: &mut dyn Bootstrap,
) -> Result<(), ContextError> {
    for internal in internal_modules(ctx.options()) {
        let mut module = match bootstrap.load(ctx, internal) {
            Ok(module) => module,
            Err(err) => return Err(ctx.report(err)),
        };
        module.implemented = internal.implemented;
        ctx.insert_module(module)?;
        debug!(module = internal.name, revision = internal.revision, "Internal module loaded");
    }
    Ok(())
}
