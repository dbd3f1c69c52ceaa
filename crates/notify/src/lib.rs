//! `dashgate-notify` — cross-context UI state synchronization.
//!
//! Two channels of ephemeral UI state, each with one owner per context:
//!
//! - **error**: the error currently surfaced to the user, shared by every
//!   attached context but never persisted
//! - **layout collapse**: a durable preference mirrored across every context
//!   attached to the same [`StorageOrigin`]
//!
//! Consistency is eventual: a context sees another context's write only after
//! it runs [`NotificationBus::process_signals`]. Last write wins.

pub mod bus;
pub mod event;
pub mod observers;
pub mod origin;
pub mod store;
pub mod subscription;

pub use bus::{COLLAPSE_KEY, ERROR_KEY, NotificationBus, NotifyError};
pub use event::{ErrorState, NotificationEvent, SurfacedError};
pub use observers::{ObserverHandle, ObserverRegistry};
pub use origin::{ContextId, StorageOrigin, StorageSignal};
pub use store::{FilePreferenceStore, InMemoryPreferenceStore, PreferenceStore, StoreError};
pub use subscription::Subscription;
