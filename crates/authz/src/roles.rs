//! Role directory: named principal sets and owner zone reservations.
//!
//! Pure lookup, no policy. The sets are fixed once the directory is built
//! at startup; populating them from a user directory is the host's job.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use metagov_core::{Principal, ZoneName};

/// The named principal sets recognized by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSet {
    /// Every recognized identity, person or not. Principals outside this
    /// set are denied everything.
    AllUsers,
    /// Human staff.
    Employees,
    ServerAdmins,
    ServerOperators,
    ServerInvestigators,
    /// Principals authorized to mutate the metadata type-definition model.
    TypeArchitects,
    /// Non-person service identities, confined to designated zones but
    /// exempt from personal-data restrictions.
    AutomationAccounts,
}

/// Lookup-only directory of role memberships.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleDirectory {
    pub(crate) all_users: BTreeSet<Principal>,
    pub(crate) employees: BTreeSet<Principal>,
    pub(crate) server_admins: BTreeSet<Principal>,
    pub(crate) server_operators: BTreeSet<Principal>,
    pub(crate) server_investigators: BTreeSet<Principal>,
    pub(crate) type_architects: BTreeSet<Principal>,
    pub(crate) automation_accounts: BTreeSet<Principal>,
    pub(crate) owner_zones: BTreeMap<Principal, ZoneName>,
}

impl RoleDirectory {
    pub fn is_member(&self, set: RoleSet, user: &Principal) -> bool {
        let members = match set {
            RoleSet::AllUsers => &self.all_users,
            RoleSet::Employees => &self.employees,
            RoleSet::ServerAdmins => &self.server_admins,
            RoleSet::ServerOperators => &self.server_operators,
            RoleSet::ServerInvestigators => &self.server_investigators,
            RoleSet::TypeArchitects => &self.type_architects,
            RoleSet::AutomationAccounts => &self.automation_accounts,
        };
        members.contains(user)
    }

    /// The zone reserved for `owner`, if any. Reserved zones are unioned
    /// into an asset's membership once the principal becomes its declared
    /// owner.
    pub fn owner_zone(&self, owner: &Principal) -> Option<&ZoneName> {
        self.owner_zones.get(owner)
    }
}
