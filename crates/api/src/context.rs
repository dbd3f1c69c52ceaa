use dashgate_auth::{Capability, Identity, PermissionSet, has_capability, has_permission, permissions_for};

/// Session context for a request (resolved identity, if any).
///
/// Attached by the guard middleware to every request it lets through.
/// `None` means anonymous: no credential, or one the identity source rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionContext {
    identity: Option<Identity>,
}

impl SessionContext {
    pub fn new(identity: Option<Identity>) -> Self {
        Self { identity }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn permissions(&self) -> PermissionSet {
        permissions_for(self.identity())
    }

    pub fn has_permission(&self, capability: &str) -> bool {
        has_permission(self.identity(), capability)
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        has_capability(self.identity(), capability)
    }
}
