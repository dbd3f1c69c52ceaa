//! Storage origin: the preference store plus its change-signal fan-out.
//!
//! Mirrors how browser storage behaves across tabs of one origin: a write is
//! visible to every context on its next read, and every *other* context gets
//! a change signal. The writer's own context is never signalled.
//!
//! Alongside the durable store the origin keeps a transient slot map, shared
//! by every attached context but never written to the store (like per-origin
//! session state). It uses the same signal fan-out.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, mpsc};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{InMemoryPreferenceStore, PreferenceStore, StoreError};
use crate::subscription::Subscription;

/// Identifier of one attached observation context (a tab/window).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(Uuid);

impl ContextId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ContextId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// "Key `key` changed; re-read the store."
///
/// Carries no value on purpose: receivers always re-read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSignal {
    pub key: String,
}

pub struct StorageOrigin {
    store: Arc<dyn PreferenceStore>,
    transient: Mutex<BTreeMap<String, String>>,
    listeners: Mutex<Vec<(ContextId, mpsc::Sender<StorageSignal>)>>,
}

impl StorageOrigin {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            store,
            transient: Mutex::new(BTreeMap::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryPreferenceStore::new()))
    }

    /// Attach a new context and return its storage-signal queue.
    pub fn attach(&self) -> (ContextId, Subscription<StorageSignal>) {
        let context_id = ContextId::new();
        let (tx, rx) = mpsc::channel();

        // A poisoned listener list still hands out a subscription;
        // it just won't receive signals.
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((context_id, tx));
        }

        (context_id, Subscription::new(rx))
    }

    pub fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.store.get(key)
    }

    /// Persist `value` and signal every context except `writer`.
    ///
    /// Signalling is fire-and-forget; the write never waits on readers.
    pub fn write(&self, writer: ContextId, key: &str, value: &str) -> Result<(), StoreError> {
        self.store.set(key, value)?;
        self.signal(writer, key);
        Ok(())
    }

    /// Current value of a transient slot.
    pub fn read_transient(&self, key: &str) -> Option<String> {
        self.transient_slots().get(key).cloned()
    }

    /// Set (or with `None`, remove) a transient slot and signal every context
    /// except `writer`. Nothing reaches the durable store.
    pub fn publish(&self, writer: ContextId, key: &str, value: Option<&str>) {
        {
            let mut slots = self.transient_slots();
            match value {
                Some(value) => slots.insert(key.to_string(), value.to_string()),
                None => slots.remove(key),
            };
        }
        self.signal(writer, key);
    }

    fn transient_slots(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.transient.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn signal(&self, writer: ContextId, key: &str) {
        let Ok(mut listeners) = self.listeners.lock() else {
            tracing::warn!(key, "storage listener list poisoned; change signal dropped");
            return;
        };

        // Drop detached contexts while fanning out.
        listeners.retain(|(context_id, tx)| {
            *context_id == writer
                || tx
                    .send(StorageSignal {
                        key: key.to_string(),
                    })
                    .is_ok()
        });
    }

    /// Number of contexts currently attached (detached ones are pruned lazily).
    pub fn attached_contexts(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }
}

impl core::fmt::Debug for StorageOrigin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StorageOrigin")
            .field("attached_contexts", &self.attached_contexts())
            .finish_non_exhaustive()
    }
}
