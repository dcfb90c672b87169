//! Yang Context: shared runtime substrate for a YANG schema engine
//!
//! A [`Context`] owns the long-lived resources the parser, compiler and data
//! validator work against: the interned-string dictionary, module search
//! directories, loaded modules, behavior flags and per-thread diagnostics.
//! [`Set`] is the generic ordered container used for every module and node
//! collection in the engine.

pub mod config;
pub mod context;
pub mod diagnostics;
pub mod dict;
pub mod error;
pub mod logging;
pub mod module;
pub mod set;

pub use context::{Context, ContextOptions};
pub use diagnostics::{Diagnostic, ErrorStore};
pub use error::{ContextError, ErrorKind};
pub use module::{Module, ModuleRef};
pub use set::{Set, SetOptions};
