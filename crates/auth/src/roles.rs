use serde::{Deserialize, Serialize};

/// Declared dashboard roles.
///
/// The set is closed: adding a role means adding a match arm to
/// [`role_permissions`](crate::resolver::role_permissions).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Editor, Role::Viewer];

    /// Case-insensitive lookup of a declared role.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "editor" => Some(Role::Editor),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::Admin => "Full dashboard administrator with every capability",
            Role::Editor => "Content editor who can create and publish content",
            Role::Viewer => "Read-only access to dashboards and reports",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role identifier as received from an identity source.
///
/// Identity sources hand back loosely-typed strings; anything that is not a
/// declared [`Role`] is kept as `Unrecognized` so callers can still log it,
/// while the resolver grants it least privilege.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoleId {
    Declared(Role),
    Unrecognized(String),
}

impl RoleId {
    pub fn parse(raw: &str) -> Self {
        match Role::parse(raw) {
            Some(role) => RoleId::Declared(role),
            None => RoleId::Unrecognized(raw.to_string()),
        }
    }

    pub fn declared(&self) -> Option<Role> {
        match self {
            RoleId::Declared(role) => Some(*role),
            RoleId::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RoleId::Declared(role) => role.as_str(),
            RoleId::Unrecognized(raw) => raw,
        }
    }
}

impl From<Role> for RoleId {
    fn from(value: Role) -> Self {
        RoleId::Declared(value)
    }
}

impl From<String> for RoleId {
    fn from(value: String) -> Self {
        RoleId::parse(&value)
    }
}

impl From<&str> for RoleId {
    fn from(value: &str) -> Self {
        RoleId::parse(value)
    }
}

impl From<RoleId> for String {
    fn from(value: RoleId) -> Self {
        match value {
            RoleId::Declared(role) => role.as_str().to_string(),
            RoleId::Unrecognized(raw) => raw,
        }
    }
}

impl core::fmt::Display for RoleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
