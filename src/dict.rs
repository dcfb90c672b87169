//! Interned-String Dictionary
//!
//! Per-context table of immutable strings. Every structure created through a
//! context (module names, revisions) refers to text by the canonical
//! `Arc<str>` handle issued here instead of owning a private copy.
//!
//! Entries are reference counted: each [`Dictionary::insert`] adds a
//! reference, each [`Dictionary::remove`] drops one, and the entry disappears
//! when the count reaches zero. Handles already given out stay valid after
//! removal because they share ownership of the text.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
struct Record {
    value: Arc<str>,
    refcount: usize,
}

/// Interned-string store owned by a single context.
#[derive(Debug, Default)]
pub struct Dictionary {
    records: Mutex<HashMap<Arc<str>, Record>>,
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary {
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Intern `value`, returning the canonical handle.
    pub fn insert(&self, value: &str) -> Arc<str> {
        let mut records = self.records.lock();
        if let Some(record) = records.get_mut(value) {
            record.refcount += 1;
            return Arc::clone(&record.value);
        }

        let interned: Arc<str> = Arc::from(value);
        records.insert(
            Arc::clone(&interned),
            Record {
                value: Arc::clone(&interned),
                refcount: 1,
            },
        );
        interned
    }

    /// Canonical handle for `value` if it is interned. Does not add a reference.
    pub fn get(&self, value: &str) -> Option<Arc<str>> {
        self.records
            .lock()
            .get(value)
            .map(|record| Arc::clone(&record.value))
    }

    /// Drop one reference to `value`. Returns false if it was not interned.
    pub fn remove(&self, value: &str) -> bool {
        let mut records = self.records.lock();
        let Some(record) = records.get_mut(value) else {
            return false;
        };
        record.refcount -= 1;
        if record.refcount == 0 {
            records.remove(value);
        }
        true
    }

    /// Number of distinct interned strings.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Drop every entry regardless of outstanding references.
    pub fn clean(&self) {
        let mut records = self.records.lock();
        if !records.is_empty() {
            debug!(entries = records.len(), "Dictionary cleaned with live entries");
        }
        records.clear();
        records.shrink_to_fit();
    }
}
