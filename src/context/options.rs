//! Context behavior flags.

use super::Context;
use bitflags::bitflags;

bitflags! {
    /// Independently toggleable context behaviors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ContextOptions: u32 {
        /// Newly loaded modules are implemented rather than import-only.
        const ALL_IMPLEMENTED = 0x01;
        /// Skip validation the loader and compiler would otherwise perform.
        const TRUSTED = 0x02;
        /// Do not load ietf-datastores and ietf-yang-library on bootstrap.
        const NO_YANG_LIBRARY = 0x04;
        /// The module loader does not consult the search directories.
        const DISABLE_SEARCHDIRS = 0x08;
        /// The module loader does not fall back to the working directory.
        const DISABLE_SEARCHDIR_CWD = 0x10;
        /// The module loader tries search directories before other strategies.
        const PREFER_SEARCHDIRS = 0x20;
    }
}

impl Context {
    /// Raw flags bitmask.
    pub fn options(&self) -> ContextOptions {
        self.flags
    }

    pub fn set_disable_searchdirs(&mut self) {
        self.flags.insert(ContextOptions::DISABLE_SEARCHDIRS);
    }

    pub fn unset_disable_searchdirs(&mut self) {
        self.flags.remove(ContextOptions::DISABLE_SEARCHDIRS);
    }

    pub fn set_disable_searchdir_cwd(&mut self) {
        self.flags.insert(ContextOptions::DISABLE_SEARCHDIR_CWD);
    }

    pub fn unset_disable_searchdir_cwd(&mut self) {
        self.flags.remove(ContextOptions::DISABLE_SEARCHDIR_CWD);
    }

    pub fn set_prefer_searchdirs(&mut self) {
        self.flags.insert(ContextOptions::PREFER_SEARCHDIRS);
    }

    pub fn unset_prefer_searchdirs(&mut self) {
        self.flags.remove(ContextOptions::PREFER_SEARCHDIRS);
    }

    pub fn set_all_implemented(&mut self) {
        self.flags.insert(ContextOptions::ALL_IMPLEMENTED);
    }

    pub fn unset_all_implemented(&mut self) {
        self.flags.remove(ContextOptions::ALL_IMPLEMENTED);
    }

    pub fn set_trusted(&mut self) {
        self.flags.insert(ContextOptions::TRUSTED);
    }

    pub fn unset_trusted(&mut self) {
        self.flags.remove(ContextOptions::TRUSTED);
    }
}
