//! Explicit observer registration with cancellation handles.

use std::sync::{Arc, Mutex, Weak};

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registered<E> {
    next_id: u64,
    handlers: Vec<(u64, Handler<E>)>,
}

/// Ordered list of observers for events of type `E`.
///
/// Handlers run in registration order, outside the registry lock, so a
/// handler may subscribe, cancel, or read other state without deadlocking.
pub struct ObserverRegistry<E> {
    inner: Mutex<Registered<E>>,
}

impl<E: 'static> ObserverRegistry<E> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Registered {
                next_id: 0,
                handlers: Vec::new(),
            }),
        })
    }

    pub fn register<F>(self: &Arc<Self>, handler: F) -> ObserverHandle
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.handlers.push((id, Arc::new(handler)));

        let registry: Weak<dyn Unregister> = Arc::downgrade(self) as Weak<dyn Unregister>;
        ObserverHandle {
            id: Some(id),
            registry,
        }
    }

    /// Deliver `event` to every registered observer. Returns how many ran.
    pub fn notify(&self, event: &E) -> usize {
        let handlers: Vec<Handler<E>> = self.lock().handlers.iter().map(|(_, h)| h.clone()).collect();
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    pub fn len(&self) -> usize {
        self.lock().handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registered<E>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

trait Unregister: Send + Sync {
    fn unregister(&self, id: u64);
}

impl<E: 'static> Unregister for ObserverRegistry<E> {
    fn unregister(&self, id: u64) {
        self.lock().handlers.retain(|(hid, _)| *hid != id);
    }
}

/// Cancellation handle returned by `subscribe`.
///
/// Dropping the handle unregisters the observer; call [`cancel`](Self::cancel)
/// to make teardown explicit.
#[must_use = "dropping the handle immediately unsubscribes the observer"]
pub struct ObserverHandle {
    id: Option<u64>,
    registry: Weak<dyn Unregister>,
}

impl ObserverHandle {
    pub fn cancel(mut self) {
        self.unregister();
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some() && self.registry.strong_count() > 0
    }

    fn unregister(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(registry) = self.registry.upgrade() {
                registry.unregister(id);
            }
        }
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        self.unregister();
    }
}

impl core::fmt::Debug for ObserverHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObserverHandle")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
