use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

/// Version of the capability enumeration shared with UI call sites.
///
/// Bump whenever a variant is added to [`Capability`].
pub const CAPABILITY_SCHEMA_VERSION: u32 = 1;

/// Capability identifier.
///
/// Closed set; names use the "area.action" convention (e.g. "content.edit").
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "dashboard.view")]
    ViewDashboard,
    #[serde(rename = "reports.view")]
    ViewReports,
    #[serde(rename = "content.edit")]
    EditContent,
    #[serde(rename = "content.publish")]
    PublishContent,
    #[serde(rename = "content.delete")]
    DeleteContent,
    #[serde(rename = "users.manage")]
    ManageUsers,
    #[serde(rename = "settings.manage")]
    ManageSettings,
    #[serde(rename = "audit.view")]
    ViewAuditLog,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::ViewDashboard,
        Capability::ViewReports,
        Capability::EditContent,
        Capability::PublishContent,
        Capability::DeleteContent,
        Capability::ManageUsers,
        Capability::ManageSettings,
        Capability::ViewAuditLog,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewDashboard => "dashboard.view",
            Capability::ViewReports => "reports.view",
            Capability::EditContent => "content.edit",
            Capability::PublishContent => "content.publish",
            Capability::DeleteContent => "content.delete",
            Capability::ManageUsers => "users.manage",
            Capability::ManageSettings => "settings.manage",
            Capability::ViewAuditLog => "audit.view",
        }
    }

    /// Exact-name lookup. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Capability::ViewDashboard => "Open the dashboard",
            Capability::ViewReports => "View reports and charts",
            Capability::EditContent => "Create and update content",
            Capability::PublishContent => "Publish content",
            Capability::DeleteContent => "Delete content",
            Capability::ManageUsers => "Invite users and assign roles",
            Capability::ManageSettings => "Change workspace settings",
            Capability::ViewAuditLog => "Read the audit log",
        }
    }

    /// Area part of the name ("content" for "content.edit").
    pub fn category(&self) -> &'static str {
        let name = self.as_str();
        match name.split_once('.') {
            Some((area, _)) => area,
            None => name,
        }
    }

    const fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable, total capability → grant mapping.
///
/// Every [`Capability`] has an answer; unknown names answer `false`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PermissionSet {
    bits: u32,
}

impl PermissionSet {
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    pub const fn of(capabilities: &[Capability]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < capabilities.len() {
            bits |= capabilities[i].bit();
            i += 1;
        }
        Self { bits }
    }

    pub const fn all() -> Self {
        Self::of(&Capability::ALL)
    }

    pub const fn union(self, other: PermissionSet) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    pub const fn grants(&self, capability: Capability) -> bool {
        self.bits & capability.bit() != 0
    }

    /// Lookup by name; unknown capabilities are denied.
    pub fn grants_named(&self, name: &str) -> bool {
        Capability::parse(name).is_some_and(|c| self.grants(c))
    }

    pub fn is_superset_of(&self, other: &PermissionSet) -> bool {
        self.bits & other.bits == other.bits
    }

    /// Granted capabilities, in declaration order.
    pub fn granted(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|c| self.grants(*c))
    }

    /// Full matrix keyed by capability name.
    pub fn to_map(&self) -> BTreeMap<&'static str, bool> {
        Capability::ALL
            .into_iter()
            .map(|c| (c.as_str(), self.grants(c)))
            .collect()
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}
