//! Permission query facade.
//!
//! This is the only sanctioned way to ask "may the current identity do X?".
//! Role logic lives in [`resolver`](crate::resolver); nothing here re-derives it.

use std::sync::{Arc, RwLock};

use crate::permissions::{Capability, PermissionSet};
use crate::principal::Identity;
use crate::resolver;

/// Effective permissions of an optional identity.
pub fn permissions_for(identity: Option<&Identity>) -> PermissionSet {
    resolver::resolve(identity.map(|i| &i.role))
}

/// Does `identity` hold the capability named `capability`?
///
/// Anonymous identities get least privilege; unknown capability names are
/// denied for everyone.
pub fn has_permission(identity: Option<&Identity>, capability: &str) -> bool {
    permissions_for(identity).grants_named(capability)
}

pub fn has_capability(identity: Option<&Identity>, capability: Capability) -> bool {
    permissions_for(identity).grants(capability)
}

/// Process-wide session state.
///
/// Starts anonymous. The identity changes only through [`sign_in`](Self::sign_in)
/// and [`sign_out`](Self::sign_out).
#[derive(Debug, Default)]
pub struct SessionState {
    identity: RwLock<Option<Identity>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(identity: Identity) -> Self {
        Self {
            identity: RwLock::new(Some(identity)),
        }
    }

    pub fn sign_in(&self, identity: Identity) {
        tracing::debug!(user_id = %identity.user_id, role = %identity.role, "session signed in");
        *self.write() = Some(identity);
    }

    pub fn sign_out(&self) {
        tracing::debug!("session signed out");
        *self.write() = None;
    }

    pub fn current(&self) -> Option<Identity> {
        self.identity
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Identity>> {
        self.identity
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Facade bound to a shared [`SessionState`].
#[derive(Debug, Clone)]
pub struct PermissionQuery {
    session: Arc<SessionState>,
}

impl PermissionQuery {
    pub fn new(session: Arc<SessionState>) -> Self {
        Self { session }
    }

    pub fn has(&self, capability: &str) -> bool {
        has_permission(self.session.current().as_ref(), capability)
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        has_capability(self.session.current().as_ref(), capability)
    }

    pub fn permissions(&self) -> PermissionSet {
        permissions_for(self.session.current().as_ref())
    }
}
