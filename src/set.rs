//! Generic Ordered Set
//!
//! A growable, insertion-ordered array of references used for every node and
//! module collection in the engine. By default the container behaves as a set
//! (insertion scans for an equal item first); with [`SetOptions::USE_AS_LIST`]
//! it is an append-only list that accepts duplicates.
//!
//! The set owns only its storage. Items are expected to be handles (`Arc`s,
//! [`crate::module::ModuleRef`], paths owned by the embedding structure), so
//! dropping the set never tears down what the handles point at.
//!
//! Removal is swap-remove: the last item moves into the freed slot, so indexes
//! are not stable across removals.

use crate::error::ContextError;
use bitflags::bitflags;
use std::ops::Index;

bitflags! {
    /// Options changing the behavior of [`Set::add`] and [`Set::merge`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SetOptions: u8 {
        /// Do not check for duplicates; the set is used as a list.
        const USE_AS_LIST = 0x01;
    }
}

/// Minimum number of slots added when the storage is full.
const MIN_GROWTH: usize = 8;

/// Ordered set of references.
#[derive(Debug)]
pub struct Set<T> {
    items: Vec<T>,
}

impl<T> Default for Set<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Set<T> {
    /// Create an empty set with no storage allocated.
    pub fn new() -> Self {
        Set { items: Vec::new() }
    }

    /// Remove the item at `index`. The last item takes its slot.
    pub fn remove_at(&mut self, index: usize) -> Result<T, ContextError> {
        if index >= self.items.len() {
            return Err(ContextError::InvalidArgument(format!(
                "set index {} out of range (count {})",
                index,
                self.items.len()
            )));
        }
        Ok(self.items.swap_remove(index))
    }

    /// Remove every item but keep the storage for reuse.
    pub fn clean(&mut self) {
        self.items.clear();
    }

    /// Release the storage. The set stays usable and empty.
    pub fn free(&mut self) {
        self.items = Vec::new();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of allocated slots.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Remove and yield the last item.
    pub(crate) fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Double the storage (at least [`MIN_GROWTH`] slots) once every slot is used.
    fn grow_if_full(&mut self) -> Result<(), ContextError> {
        let len = self.items.len();
        if len < self.items.capacity() {
            return Ok(());
        }
        let additional = len.max(MIN_GROWTH);
        self.items.try_reserve_exact(additional)?;
        Ok(())
    }
}

impl<T: PartialEq> Set<T> {
    /// Add an item, returning its index.
    ///
    /// In set mode an equal item already present is not added again and its
    /// index is returned instead.
    pub fn add(&mut self, item: T, options: SetOptions) -> Result<usize, ContextError> {
        if !options.contains(SetOptions::USE_AS_LIST) {
            if let Some(index) = self.contains(&item) {
                return Ok(index);
            }
        }

        self.grow_if_full()?;
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    /// Index of the first item equal to `item`.
    pub fn contains(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|existing| existing == item)
    }

    /// Move every item of `src` into this set, returning how many were added.
    ///
    /// On allocation failure the set keeps the items merged so far and the
    /// rest of `src` is dropped.
    pub fn merge(&mut self, src: Set<T>, options: SetOptions) -> Result<usize, ContextError> {
        let mut added = 0;
        for item in src.items {
            let before = self.items.len();
            self.add(item, options)?;
            if self.items.len() > before {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Remove the first item equal to `item`.
    ///
    /// Returns `None` when nothing matched; that is not an error.
    pub fn remove(&mut self, item: &T) -> Option<T> {
        let index = self.contains(item)?;
        Some(self.items.swap_remove(index))
    }
}

impl<T: Clone> Set<T> {
    /// Shallow copy: new storage, same handles.
    pub fn duplicate(&self) -> Result<Set<T>, ContextError> {
        let mut items = Vec::new();
        items.try_reserve_exact(self.items.capacity())?;
        items.extend(self.items.iter().cloned());
        Ok(Set { items })
    }
}

impl<T> Index<usize> for Set<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a Set<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for Set<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Collects in set mode: later duplicates are dropped.
impl<T: PartialEq> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Set::new();
        for item in iter {
            if set.contains(&item).is_none() {
                set.items.push(item);
            }
        }
        set
    }
}
