//! RBAC registry (roles and capabilities, for audit/display).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::permissions::{CAPABILITY_SCHEMA_VERSION, Capability, PermissionSet};
use crate::resolver::role_permissions;
use crate::roles::Role;

/// Role definition with its granted capabilities.
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub permissions: PermissionSet,
}

/// Capability definition.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
}

/// Complete view of the declared roles and capabilities.
#[derive(Debug, Clone, Serialize)]
pub struct RbacRegistry {
    pub schema_version: u32,
    pub roles: BTreeMap<&'static str, RoleDefinition>,
    pub capabilities: BTreeMap<&'static str, CapabilityDefinition>,
}

impl RbacRegistry {
    pub fn build() -> Self {
        let roles = Role::ALL
            .into_iter()
            .map(|role| {
                (
                    role.as_str(),
                    RoleDefinition {
                        name: role.as_str(),
                        description: role.description(),
                        permissions: role_permissions(role),
                    },
                )
            })
            .collect();

        let capabilities = Capability::ALL
            .into_iter()
            .map(|cap| {
                (
                    cap.as_str(),
                    CapabilityDefinition {
                        name: cap.as_str(),
                        description: cap.description(),
                        category: cap.category(),
                    },
                )
            })
            .collect();

        Self {
            schema_version: CAPABILITY_SCHEMA_VERSION,
            roles,
            capabilities,
        }
    }

    /// Declared roles that grant `capability`.
    pub fn roles_granting(&self, capability: Capability) -> Vec<&'static str> {
        self.roles
            .values()
            .filter(|def| def.permissions.grants(capability))
            .map(|def| def.name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_role_and_capability() {
        let registry = RbacRegistry::build();
        assert_eq!(registry.roles.len(), Role::ALL.len());
        assert_eq!(registry.capabilities.len(), Capability::ALL.len());
        assert_eq!(registry.roles_granting(Capability::ManageUsers), vec!["admin"]);
        assert_eq!(
            registry.roles_granting(Capability::ViewDashboard),
            vec!["admin", "editor", "viewer"]
        );
    }

    #[test]
    fn serializes_permission_matrix() {
        let json = serde_json::to_value(RbacRegistry::build()).unwrap();
        assert_eq!(json["roles"]["viewer"]["permissions"]["dashboard.view"], true);
        assert_eq!(json["roles"]["viewer"]["permissions"]["users.manage"], false);
        assert_eq!(json["capabilities"]["content.edit"]["category"], "content");
    }
}
