//! Per-Thread Error Channel
//!
//! Each context owns one [`ErrorChannel`]. Diagnostics recorded through it are
//! filed under the identity of the recording thread, so threads sharing a
//! context never see or clobber each other's errors.
//!
//! A channel is bound to an [`ErrorKey`] taken from a process-wide
//! [`KeyRegistry`] with a fixed number of slots. Acquisition retries with
//! capped exponential backoff and gives up with
//! [`ContextError::KeyExhausted`] after [`KEY_ACQUIRE_ATTEMPTS`] attempts.
//!
//! A thread's diagnostics are dropped when that thread exits: the first
//! record from a thread leaves a guard in thread-local storage that removes
//! the thread's list from the channel on exit.

use crate::error::{ContextError, ErrorKind};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock, Weak};
use std::thread::{self, ThreadId};
use std::time::Duration;
use tracing::{debug, warn};

/// Number of slots in the process-wide key registry.
pub const MAX_ERROR_KEYS: usize = 1024;

/// Attempts made before key acquisition fails.
pub const KEY_ACQUIRE_ATTEMPTS: u32 = 32;

const INITIAL_BACKOFF: Duration = Duration::from_micros(50);
const MAX_BACKOFF: Duration = Duration::from_millis(5);

/// Which diagnostics a channel keeps per thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStore {
    /// Keep every diagnostic until cleaned.
    #[default]
    All,
    /// Keep only the most recent diagnostic.
    Last,
    /// Keep nothing; diagnostics are only logged.
    Off,
}

/// A recorded failure with its human-readable context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
    pub path: Option<PathBuf>,
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            message: message.into(),
            path: None,
        }
    }

    pub fn from_error(err: &ContextError) -> Self {
        Diagnostic {
            kind: err.kind(),
            message: err.to_string(),
            path: err.path().map(PathBuf::from),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Fixed pool of error-channel keys.
#[derive(Debug)]
pub struct KeyRegistry {
    slots: Mutex<Vec<bool>>,
}

impl KeyRegistry {
    pub fn with_capacity(capacity: usize) -> Arc<Self> {
        Arc::new(KeyRegistry {
            slots: Mutex::new(vec![false; capacity]),
        })
    }

    /// The registry shared by every context in the process.
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<KeyRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| KeyRegistry::with_capacity(MAX_ERROR_KEYS)))
    }

    /// Take a free key, retrying while the registry is full.
    pub fn acquire(self: &Arc<Self>) -> Result<ErrorKey, ContextError> {
        let mut backoff = INITIAL_BACKOFF;
        for attempt in 1..=KEY_ACQUIRE_ATTEMPTS {
            if let Some(key) = self.try_acquire() {
                return Ok(key);
            }
            if attempt < KEY_ACQUIRE_ATTEMPTS {
                thread::sleep(backoff);
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
        }

        warn!(
            attempts = KEY_ACQUIRE_ATTEMPTS,
            "Error key registry exhausted"
        );
        Err(ContextError::KeyExhausted {
            attempts: KEY_ACQUIRE_ATTEMPTS,
        })
    }

    /// Take a free key without waiting.
    pub fn try_acquire(self: &Arc<Self>) -> Option<ErrorKey> {
        let mut slots = self.slots.lock();
        let id = slots.iter().position(|used| !used)?;
        slots[id] = true;
        Some(ErrorKey {
            id,
            registry: Arc::clone(self),
        })
    }

    /// Number of keys currently handed out.
    pub fn in_use(&self) -> usize {
        self.slots.lock().iter().filter(|used| **used).count()
    }

    fn release(&self, id: usize) {
        if let Some(slot) = self.slots.lock().get_mut(id) {
            *slot = false;
        }
    }
}

/// A registry slot. Returned to its registry when dropped.
#[derive(Debug)]
pub struct ErrorKey {
    id: usize,
    registry: Arc<KeyRegistry>,
}

impl ErrorKey {
    pub fn id(&self) -> usize {
        self.id
    }

    /// Identity of this slot across every registry in the process.
    fn slot(&self) -> (usize, usize) {
        (Arc::as_ptr(&self.registry) as usize, self.id)
    }
}

impl Drop for ErrorKey {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

type ThreadLists = Mutex<HashMap<ThreadId, Vec<Diagnostic>>>;

thread_local! {
    /// Exit hooks of the calling thread, one per channel it has recorded to,
    /// keyed by the channel's error-key slot.
    static THREAD_GUARDS: RefCell<HashMap<(usize, usize), ThreadGuard>> =
        RefCell::new(HashMap::new());
}

/// Removes one thread's list from a channel when the thread exits.
struct ThreadGuard {
    thread: ThreadId,
    lists: Weak<ThreadLists>,
}

impl ThreadGuard {
    fn watches(&self, lists: &Arc<ThreadLists>) -> bool {
        self.lists.as_ptr() == Arc::as_ptr(lists)
    }
}

impl Drop for ThreadGuard {
    fn drop(&mut self) {
        // the channel may already be gone
        if let Some(lists) = self.lists.upgrade() {
            lists.lock().remove(&self.thread);
        }
    }
}

/// Thread-partitioned diagnostic storage for one context.
///
/// A thread's list lives until the thread exits, the thread cleans it, or the
/// channel is released.
#[derive(Debug)]
pub struct ErrorChannel {
    key: Option<ErrorKey>,
    store: ErrorStore,
    lists: Arc<ThreadLists>,
}

impl ErrorChannel {
    pub fn new(key: ErrorKey) -> Self {
        ErrorChannel {
            key: Some(key),
            store: ErrorStore::default(),
            lists: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Key this channel is bound to; `None` once released.
    pub fn key_id(&self) -> Option<usize> {
        self.key.as_ref().map(ErrorKey::id)
    }

    pub fn store(&self) -> ErrorStore {
        self.store
    }

    pub fn set_store(&mut self, store: ErrorStore) {
        self.store = store;
    }

    /// File a diagnostic under the calling thread.
    pub fn record(&self, diagnostic: Diagnostic) {
        if self.store == ErrorStore::Off {
            return;
        }
        self.watch_current_thread();

        let mut lists = self.lists.lock();
        let list = lists.entry(thread::current().id()).or_default();
        if self.store == ErrorStore::Last {
            list.clear();
        }
        list.push(diagnostic);
    }

    /// Make sure the calling thread's list is dropped when the thread exits.
    fn watch_current_thread(&self) {
        let Some(slot) = self.key.as_ref().map(ErrorKey::slot) else {
            return;
        };
        // Fails only while the thread's locals are being destroyed.
        let _ = THREAD_GUARDS.try_with(|guards| {
            let stale = {
                let mut guards = guards.borrow_mut();
                if guards.get(&slot).is_some_and(|guard| guard.watches(&self.lists)) {
                    return;
                }
                guards.insert(
                    slot,
                    ThreadGuard {
                        thread: thread::current().id(),
                        lists: Arc::downgrade(&self.lists),
                    },
                )
            };
            // a guard left by an earlier channel that held the same key
            drop(stale);
        });
    }

    /// Most recent diagnostic of the calling thread.
    pub fn last(&self) -> Option<Diagnostic> {
        self.lists
            .lock()
            .get(&thread::current().id())
            .and_then(|list| list.last().cloned())
    }

    /// Every diagnostic of the calling thread, oldest first.
    pub fn errors(&self) -> Vec<Diagnostic> {
        self.lists
            .lock()
            .get(&thread::current().id())
            .cloned()
            .unwrap_or_default()
    }

    /// Remove and return the calling thread's diagnostics.
    pub fn take(&self) -> Vec<Diagnostic> {
        self.lists
            .lock()
            .remove(&thread::current().id())
            .unwrap_or_default()
    }

    /// Drop the calling thread's diagnostics.
    pub fn clean_thread(&self) {
        self.lists.lock().remove(&thread::current().id());
    }

    /// Drop the diagnostics of every thread.
    pub fn clean_all(&self) {
        let mut lists = self.lists.lock();
        lists.clear();
        lists.shrink_to_fit();
    }

    /// Number of threads holding diagnostics.
    pub fn thread_count(&self) -> usize {
        self.lists.lock().len()
    }

    /// Drop all diagnostics and give the key back to the registry.
    pub fn release(&mut self) {
        self.clean_all();
        if let Some(key) = self.key.take() {
            debug!(key = key.id(), "Error key released");
        }
    }
}
