//! Search-Directory Registry
//!
//! Directories the module loader consults when resolving imports. Every entry
//! is checked for read and search permission, then stored in canonical
//! absolute form, once.

use super::Context;
use crate::error::ContextError;
use crate::set::SetOptions;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

impl Context {
    /// Register a search directory.
    ///
    /// `None` or an empty path is accepted and changes nothing. Registering a
    /// directory that is already present (under any spelling that resolves to
    /// the same canonical path) is also a no-op.
    pub fn set_search_dir(&mut self, search_dir: Option<&Path>) -> Result<(), ContextError> {
        let Some(dir) = search_dir.filter(|dir| !dir.as_os_str().is_empty()) else {
            return Ok(());
        };

        if let Err(source) = check_access(dir) {
            return Err(self.report(ContextError::SearchDirAccess {
                path: dir.to_path_buf(),
                source,
            }));
        }

        let canonical = match dunce::canonicalize(dir) {
            Ok(canonical) => canonical,
            Err(source) => {
                return Err(self.report(ContextError::Canonicalize {
                    path: dir.to_path_buf(),
                    source,
                }));
            }
        };

        let before = self.search_paths.len();
        match self.search_paths.add(canonical, SetOptions::empty()) {
            Ok(index) => {
                if self.search_paths.len() > before {
                    debug!(dir = %self.search_paths[index].display(), "Search directory added");
                }
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Register every directory of a path list (`:`-separated on Unix).
    ///
    /// Empty components are skipped. The first failure stops processing;
    /// directories registered before it stay registered.
    pub fn add_search_dirs(&mut self, search_dir_spec: &str) -> Result<(), ContextError> {
        for dir in std::env::split_paths(search_dir_spec) {
            if dir.as_os_str().is_empty() {
                continue;
            }
            self.set_search_dir(Some(dir.as_path()))?;
        }
        Ok(())
    }

    /// Registered directories in canonical form.
    pub fn search_dirs(&self) -> &[PathBuf] {
        self.search_paths.as_slice()
    }

    /// Remove one search directory, or all of them when `index` is `None`.
    ///
    /// Removing a single entry moves the last entry into its slot. Any call on
    /// an empty registry succeeds without effect.
    pub fn unset_search_dirs(&mut self, index: Option<usize>) -> Result<(), ContextError> {
        if self.search_paths.is_empty() {
            return Ok(());
        }

        match index {
            Some(index) => match self.search_paths.remove_at(index) {
                Ok(removed) => {
                    debug!(dir = %removed.display(), "Search directory removed");
                    Ok(())
                }
                Err(err) => Err(self.report(err)),
            },
            None => {
                self.search_paths.free();
                Ok(())
            }
        }
    }
}

/// Require `dir` to be a directory we can list and traverse.
fn check_access(dir: &Path) -> io::Result<()> {
    let metadata = fs::metadata(dir)?;
    if !metadata.is_dir() {
        return Err(io::Error::from(io::ErrorKind::NotADirectory));
    }
    // listing needs read permission
    fs::read_dir(dir)?;
    // resolving an entry inside needs search permission
    fs::metadata(dir.join("."))?;
    Ok(())
}
