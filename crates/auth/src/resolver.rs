//! Role → permission resolution.
//!
//! The mapping is static data; resolution is a lookup, never an error.

use crate::permissions::{Capability, PermissionSet};
use crate::roles::{Role, RoleId};

pub const VIEWER_PERMISSIONS: PermissionSet =
    PermissionSet::of(&[Capability::ViewDashboard, Capability::ViewReports]);

pub const EDITOR_PERMISSIONS: PermissionSet = VIEWER_PERMISSIONS.union(PermissionSet::of(&[
    Capability::EditContent,
    Capability::PublishContent,
]));

pub const ADMIN_PERMISSIONS: PermissionSet = PermissionSet::all();

/// Least-privilege set granted to anonymous and unrecognized identities.
pub const DEFAULT_PERMISSIONS: PermissionSet = VIEWER_PERMISSIONS;

/// Permission set of a declared role.
pub const fn role_permissions(role: Role) -> PermissionSet {
    match role {
        Role::Admin => ADMIN_PERMISSIONS,
        Role::Editor => EDITOR_PERMISSIONS,
        Role::Viewer => VIEWER_PERMISSIONS,
    }
}

/// Resolve an optional role identifier to its permission set.
///
/// `None` and unrecognized roles fall back to [`DEFAULT_PERMISSIONS`].
pub fn resolve(role: Option<&RoleId>) -> PermissionSet {
    match role {
        Some(RoleId::Declared(role)) => role_permissions(*role),
        Some(RoleId::Unrecognized(_)) | None => DEFAULT_PERMISSIONS,
    }
}

/// Convenience for callers holding a raw role string.
pub fn resolve_str(role: Option<&str>) -> PermissionSet {
    let role = role.map(RoleId::parse);
    resolve(role.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_unknown_roles_get_viewer() {
        assert_eq!(resolve(None), VIEWER_PERMISSIONS);
        assert_eq!(resolve(Some(&RoleId::parse("root"))), VIEWER_PERMISSIONS);
        assert_eq!(resolve_str(Some("")), VIEWER_PERMISSIONS);
    }

    #[test]
    fn admin_includes_everything_viewer_lacks() {
        let admin = resolve_str(Some("ADMIN"));
        assert_eq!(admin, ADMIN_PERMISSIONS);

        let lacking: Vec<Capability> = Capability::ALL
            .into_iter()
            .filter(|c| !VIEWER_PERMISSIONS.grants(*c))
            .collect();
        assert!(!lacking.is_empty());
        assert!(lacking.iter().all(|c| admin.grants(*c)));
    }

    #[test]
    fn roles_are_ordered_by_privilege() {
        assert!(ADMIN_PERMISSIONS.is_superset_of(&EDITOR_PERMISSIONS));
        assert!(EDITOR_PERMISSIONS.is_superset_of(&VIEWER_PERMISSIONS));
        assert_ne!(EDITOR_PERMISSIONS, VIEWER_PERMISSIONS);
        assert!(!EDITOR_PERMISSIONS.grants(Capability::ManageUsers));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_role() -> impl Strategy<Value = Role> {
            prop_oneof![Just(Role::Admin), Just(Role::Editor), Just(Role::Viewer)]
        }

        proptest! {
            /// Property: resolution is deterministic for declared roles.
            #[test]
            fn resolve_is_pure(role in any_role()) {
                let id = RoleId::from(role);
                prop_assert_eq!(resolve(Some(&id)), resolve(Some(&id)));
                prop_assert_eq!(resolve(Some(&id)), role_permissions(role));
            }

            /// Property: any string that is not a declared role degrades to viewer.
            #[test]
            fn unknown_strings_degrade(raw in "[a-zA-Z_]{0,16}") {
                prop_assume!(Role::parse(&raw).is_none());
                prop_assert_eq!(resolve_str(Some(&raw)), resolve(None));
            }
        }
    }
}
