//! Per-context notification bus.
//!
//! One `NotificationBus` is attached per observation context. It is the
//! source of truth for that context's active error and collapse flag; every
//! observer holds a derived copy and re-reads on notification.
//!
//! ```text
//! set_collapsed ──► StorageOrigin::write ──► signal other contexts ──► their process_signals()
//!        │                                                                  │
//!        └──► local observers (same context)                                └──► their local observers
//! ```
//!
//! The error channel takes the same path through `StorageOrigin::publish`,
//! which keeps the value in the origin's transient slots instead of the
//! durable store.

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::event::{ErrorState, NotificationEvent, SurfacedError};
use crate::observers::{ObserverHandle, ObserverRegistry};
use crate::origin::{ContextId, StorageOrigin, StorageSignal};
use crate::store::StoreError;
use crate::subscription::Subscription;

/// Durable key holding the layout-collapse preference ("true"/"false").
pub const COLLAPSE_KEY: &str = "dashgate.layout.collapsed";

/// Transient key holding the active error as JSON; absent when idle.
pub const ERROR_KEY: &str = "dashgate.error.active";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to persist layout preference: {0}")]
    Persist(#[from] StoreError),
}

fn encode_collapsed(collapsed: bool) -> &'static str {
    if collapsed { "true" } else { "false" }
}

/// Anything other than the literal "true" reads as expanded.
fn decode_collapsed(raw: Option<&str>) -> bool {
    raw == Some("true")
}

#[derive(Debug, Default)]
struct BusState {
    error: ErrorState,
    collapsed: bool,
}

pub struct NotificationBus {
    context_id: ContextId,
    origin: Arc<StorageOrigin>,
    signals: Mutex<Subscription<StorageSignal>>,
    state: Mutex<BusState>,
    observers: Arc<ObserverRegistry<NotificationEvent>>,
}

impl NotificationBus {
    /// Attach a new context to `origin`.
    ///
    /// The persisted collapse flag and any shared active error are read
    /// synchronously here, so the context starts with the last written values
    /// rather than waiting for a signal.
    pub fn attach(origin: Arc<StorageOrigin>) -> Self {
        let (context_id, signals) = origin.attach();
        let collapsed = read_persisted(&origin).unwrap_or(false);
        let error = match read_shared_error(&origin) {
            Some(error) => ErrorState::Showing { error },
            None => ErrorState::Idle,
        };

        tracing::debug!(%context_id, collapsed, "notification bus attached");

        Self {
            context_id,
            origin,
            signals: Mutex::new(signals),
            state: Mutex::new(BusState { error, collapsed }),
            observers: ObserverRegistry::new(),
        }
    }

    pub fn context_id(&self) -> ContextId {
        self.context_id
    }

    pub fn origin(&self) -> &Arc<StorageOrigin> {
        &self.origin
    }

    // ─────────────────────────────────────────────────────────────────────
    // Error channel
    // ─────────────────────────────────────────────────────────────────────

    /// Surface `error` in every context, replacing any error already showing.
    ///
    /// Local observers fire immediately; other contexts pick it up in
    /// `process_signals`.
    pub fn show_error(&self, error: SurfacedError) {
        tracing::debug!(
            context_id = %self.context_id,
            code = error.code.as_deref(),
            status = error.status,
            "error surfaced"
        );

        self.state().error = ErrorState::Showing {
            error: error.clone(),
        };

        match serde_json::to_string(&error) {
            Ok(encoded) => self.origin.publish(self.context_id, ERROR_KEY, Some(&encoded)),
            Err(e) => {
                tracing::warn!(context_id = %self.context_id, "failed to encode surfaced error: {e}")
            }
        }

        self.observers.notify(&NotificationEvent::ErrorRaised { error });
    }

    /// Return to `Idle` in every context. Local observers are only notified
    /// if an error was showing here.
    pub fn clear_error(&self) {
        let was_showing = {
            let mut state = self.state();
            let was_showing = state.error != ErrorState::Idle;
            state.error = ErrorState::Idle;
            was_showing
        };

        self.origin.publish(self.context_id, ERROR_KEY, None);

        if was_showing {
            self.observers.notify(&NotificationEvent::ErrorCleared);
        }
    }

    pub fn error_state(&self) -> ErrorState {
        self.state().error.clone()
    }

    pub fn active_error(&self) -> Option<SurfacedError> {
        self.state().error.active().cloned()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Collapse channel
    // ─────────────────────────────────────────────────────────────────────

    /// Change the collapse preference.
    ///
    /// Other contexts learn about it through the storage signal; this
    /// context's observers are notified directly, since the storage signal
    /// never reaches the writer. If persisting fails the local value still
    /// changes and observers still fire; the store error is returned.
    pub fn set_collapsed(&self, collapsed: bool) -> Result<(), NotifyError> {
        self.state().collapsed = collapsed;

        let persisted = self
            .origin
            .write(self.context_id, COLLAPSE_KEY, encode_collapsed(collapsed));
        if let Err(e) = &persisted {
            tracing::warn!(context_id = %self.context_id, "failed to persist collapse preference: {e}");
        }

        self.observers
            .notify(&NotificationEvent::LayoutCollapseChanged { collapsed });

        persisted.map_err(NotifyError::from)
    }

    /// This context's current view of the collapse flag.
    pub fn is_collapsed(&self) -> bool {
        self.state().collapsed
    }

    /// Drain and handle pending storage signals from other contexts.
    ///
    /// Each relevant signal triggers a re-read of the origin; the signal
    /// payload itself is never trusted. Observers fire only when the value
    /// this context holds actually changes. Returns the number of signals
    /// drained.
    pub fn process_signals(&self) -> usize {
        let pending = self.lock_signals().drain();

        for signal in &pending {
            match signal.key.as_str() {
                COLLAPSE_KEY => self.reconcile_collapsed(),
                ERROR_KEY => self.reconcile_error(),
                _ => {}
            }
        }

        pending.len()
    }

    fn reconcile_collapsed(&self) {
        let latest = match read_persisted(&self.origin) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(context_id = %self.context_id, "failed to re-read collapse preference: {e}");
                return;
            }
        };

        let changed = {
            let mut state = self.state();
            let changed = state.collapsed != latest;
            state.collapsed = latest;
            changed
        };

        if changed {
            self.observers
                .notify(&NotificationEvent::LayoutCollapseChanged { collapsed: latest });
        }
    }

    fn reconcile_error(&self) {
        let latest = read_shared_error(&self.origin);

        let changed = {
            let mut state = self.state();
            if state.error.active() == latest.as_ref() {
                false
            } else {
                state.error = match latest.clone() {
                    Some(error) => ErrorState::Showing { error },
                    None => ErrorState::Idle,
                };
                true
            }
        };

        if changed {
            let event = match latest {
                Some(error) => NotificationEvent::ErrorRaised { error },
                None => NotificationEvent::ErrorCleared,
            };
            self.observers.notify(&event);
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Observers
    // ─────────────────────────────────────────────────────────────────────

    /// Register a same-context observer.
    ///
    /// Handlers run in registration order after the bus state has been
    /// updated, with no bus lock held.
    pub fn subscribe<F>(&self, handler: F) -> ObserverHandle
    where
        F: Fn(&NotificationEvent) + Send + Sync + 'static,
    {
        self.observers.register(handler)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn state(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_signals(&self) -> MutexGuard<'_, Subscription<StorageSignal>> {
        self.signals.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl core::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("context_id", &self.context_id)
            .field("state", &*self.state())
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn read_persisted(origin: &StorageOrigin) -> Result<bool, StoreError> {
    let raw = origin.read(COLLAPSE_KEY)?;
    Ok(decode_collapsed(raw.as_deref()))
}

/// An undecodable slot reads as idle.
fn read_shared_error(origin: &StorageOrigin) -> Option<SurfacedError> {
    let raw = origin.read_transient(ERROR_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(error) => Some(error),
        Err(e) => {
            tracing::warn!("ignoring undecodable shared error: {e}");
            None
        }
    }
}
