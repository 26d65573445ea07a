//! Central access decision engine.
//!
//! Every governed operation (asset create/read/update/delete, type
//! definition maintenance, connection-credential access and the platform
//! service checks) flows through here. Each rule either explicitly allows
//! the request or falls through to the default-deny branch at the end of
//! its evaluation, so new operation kinds are secure by default.
//!
//! The engine is stateless and side-effect-free per call: it owns only the
//! immutable role directory and zone rule table built at startup, performs
//! no I/O, and is safe to call concurrently from any number of request
//! handlers without locking. For a single asset update, the old/new zone
//! sets are trusted as given; serializing read-then-decide-then-write per
//! asset is the caller's responsibility.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use metagov_core::{Principal, ZoneBehavior, ZoneName, ZoneSet};

use crate::asset::{AssetAuditHeader, AssetSnapshot, ConnectionSummary};
use crate::assignment;
use crate::duties;
use crate::roles::{RoleDirectory, RoleSet};
use crate::zones::ZoneRuleTable;

/// Service name whose asset-delete operation is reserved for automation
/// accounts. Deletion is realized by the caller as a move into the
/// terminal zone; automated processes clean that zone up later.
pub const ASSET_OWNER_SERVICE: &str = "asset-owner";

/// Operation name of the restricted delete call.
pub const DELETE_ASSET_OPERATION: &str = "delete-asset";

/// Asset-level operations governed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetOperation {
    Create,
    Read,
    /// Update of elements attached to the asset (connections, schema,
    /// semantic links). Cannot change zone membership.
    AttachmentUpdate,
    /// General update of the asset's details, which may change zone
    /// membership and ownership.
    DetailUpdate,
    Delete,
}

impl AssetOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetOperation::Create => "asset create",
            AssetOperation::Read => "asset read",
            AssetOperation::AttachmentUpdate => "asset attachment update",
            AssetOperation::DetailUpdate => "asset detail update",
            AssetOperation::Delete => "asset delete",
        }
    }
}

impl core::fmt::Display for AssetOperation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations on metadata type definitions. Independent of zone logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDefOperation {
    Create,
    Read,
    Update,
    Delete,
}

impl TypeDefOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeDefOperation::Create => "typedef create",
            TypeDefOperation::Read => "typedef read",
            TypeDefOperation::Update => "typedef update",
            TypeDefOperation::Delete => "typedef delete",
        }
    }
}

impl core::fmt::Display for TypeDefOperation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed denial returned to the caller. Authorization failures are
/// terminal for the request; there is no retry. Denials never expose the
/// rule-table contents.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// Ordinary policy denial, carrying the operation and actor for audit
    /// logging.
    #[error("user '{user}' is not authorized for {operation}")]
    NotAuthorized { operation: String, user: Principal },

    /// A zone-release update was attempted without the owner details the
    /// transition requires. A caller bug rather than a security violation:
    /// surfaced distinctly so the caller can prompt for the missing data.
    #[error("asset {guid} is missing details required for {operation} by user '{user}'")]
    IncompleteAsset {
        operation: String,
        user: Principal,
        guid: Uuid,
    },

    /// Separation-of-duty violation on a release from the onboarding zone.
    #[error("user '{user}' may not perform this zone change on asset {guid}")]
    UnauthorizedZoneChange {
        user: Principal,
        guid: Uuid,
        old_zones: ZoneSet,
        new_zones: ZoneSet,
    },
}

/// The central authorizer.
///
/// Built once from a validated [`GovernanceConfig`](crate::GovernanceConfig)
/// and shared read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecisionEngine {
    roles: RoleDirectory,
    zones: ZoneRuleTable,
    default_zones: ZoneSet,
    local_server: Option<Principal>,
}

impl AccessDecisionEngine {
    pub(crate) fn new(
        roles: RoleDirectory,
        zones: ZoneRuleTable,
        default_zones: ZoneSet,
        local_server: Option<Principal>,
    ) -> Self {
        Self {
            roles,
            zones,
            default_zones,
            local_server,
        }
    }

    pub fn roles(&self) -> &RoleDirectory {
        &self.roles
    }

    pub fn zone_rules(&self) -> &ZoneRuleTable {
        &self.zones
    }

    pub fn default_zones(&self) -> &ZoneSet {
        &self.default_zones
    }

    // ─────────────────────────────────────────────────────────────────────
    // Asset operations
    // ─────────────────────────────────────────────────────────────────────

    /// Authorize an asset-level operation.
    ///
    /// `audit_header` and `updated` matter only for
    /// [`AssetOperation::DetailUpdate`], where `snapshot` carries the
    /// original values and `updated` the proposed ones.
    pub fn authorize(
        &self,
        operation: AssetOperation,
        user: &Principal,
        snapshot: &AssetSnapshot,
        audit_header: Option<&AssetAuditHeader>,
        updated: Option<&AssetSnapshot>,
    ) -> Result<(), AuthzError> {
        if !self.roles.is_member(RoleSet::AllUsers, user) {
            return Err(self.deny(operation.as_str(), user));
        }

        match operation {
            AssetOperation::Create => {
                let zones = assignment::initial_zones(&self.default_zones, snapshot);
                self.check_zone_access(operation, user, &zones, true, false, snapshot)
            }
            AssetOperation::Read => {
                let zones = self.effective_zones(snapshot);
                self.check_zone_access(operation, user, &zones, false, false, snapshot)
            }
            AssetOperation::AttachmentUpdate | AssetOperation::Delete => {
                let zones = self.effective_zones(snapshot);
                self.check_zone_access(operation, user, &zones, true, false, snapshot)
            }
            AssetOperation::DetailUpdate => match updated {
                Some(updated) => self.authorize_detail_update(user, snapshot, audit_header, updated),
                None => Err(self.deny(operation.as_str(), user)),
            },
        }
    }

    fn authorize_detail_update(
        &self,
        user: &Principal,
        original: &AssetSnapshot,
        audit_header: Option<&AssetAuditHeader>,
        updated: &AssetSnapshot,
    ) -> Result<(), AuthzError> {
        let operation = AssetOperation::DetailUpdate;
        let changed = has_zone_changed(
            original.zone_membership.as_ref(),
            updated.zone_membership.as_ref(),
        );
        let original_zones = self.effective_zones(original);

        if !self.has_access(user, &original_zones, true, changed, original.is_owned_by(user)) {
            return Err(self.deny(operation.as_str(), user));
        }

        // A detail update may never null out the zone membership.
        let Some(new_zones) = updated.zone_membership.as_ref() else {
            return Err(self.incomplete(operation, user, updated.guid));
        };

        if zone_been_removed(
            self.zones.onboarding_zone(),
            original.zone_membership.as_ref(),
            Some(new_zones),
        ) {
            // Releasing an asset from the onboarding zone requires a
            // declared owner and the separation-of-duty rule to hold.
            if updated.owner.is_none() || updated.owner_type.is_none() {
                return Err(self.incomplete(operation, user, updated.guid));
            }
            if !duties::can_release_from_quarantine(user, audit_header) {
                let old_zones = original.zone_membership.clone().unwrap_or_default();
                tracing::warn!(
                    user = %user,
                    guid = %updated.guid,
                    "separation-of-duty violation on onboarding zone release"
                );
                return Err(AuthzError::UnauthorizedZoneChange {
                    user: user.clone(),
                    guid: updated.guid,
                    old_zones,
                    new_zones: new_zones.clone(),
                });
            }
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Zone evaluation
    // ─────────────────────────────────────────────────────────────────────

    /// The asset's zone set for authorization purposes; never empty.
    fn effective_zones(&self, snapshot: &AssetSnapshot) -> ZoneSet {
        match snapshot.zone_membership.as_ref() {
            Some(zones) if !zones.is_empty() => zones.clone(),
            _ => ZoneSet::from([self.zones.onboarding_zone().clone()]),
        }
    }

    fn check_zone_access(
        &self,
        operation: AssetOperation,
        user: &Principal,
        zones: &ZoneSet,
        update_requested: bool,
        zone_membership_changed: bool,
        snapshot: &AssetSnapshot,
    ) -> Result<(), AuthzError> {
        if self.has_access(
            user,
            zones,
            update_requested,
            zone_membership_changed,
            snapshot.is_owned_by(user),
        ) {
            Ok(())
        } else {
            Err(self.deny(operation.as_str(), user))
        }
    }

    /// Whether `user` may act on an asset in `zones`: true as soon as any
    /// single zone qualifies, false when none does.
    ///
    /// `zone_membership_changed` is carried for rule evaluation but no
    /// current branch depends on it.
    fn has_access(
        &self,
        user: &Principal,
        zones: &ZoneSet,
        update_requested: bool,
        _zone_membership_changed: bool,
        is_owner: bool,
    ) -> bool {
        let fallback;
        let zones = if zones.is_empty() {
            fallback = ZoneSet::from([self.zones.onboarding_zone().clone()]);
            &fallback
        } else {
            zones
        };

        for zone in zones {
            let allowed = match self.zones.behavior(zone) {
                // Updates in a restricted-write zone are reserved for
                // automation; other users must qualify via another zone.
                Some(ZoneBehavior::RestrictedWrite) if update_requested => {
                    self.roles.is_member(RoleSet::AutomationAccounts, user)
                }
                // Only the declared owner, whatever the zone's principal
                // set says. Assigning the asset to another zone may open
                // it up to others.
                Some(ZoneBehavior::OwnerOnly) => is_owner,
                Some(ZoneBehavior::AutomationOnly) => {
                    self.roles.is_member(RoleSet::AutomationAccounts, user)
                }
                Some(_) => self.zones.zone_accessible_by(zone, user),
                // Unknown zone: default deny.
                None => false,
            };
            if allowed {
                return true;
            }
        }

        false
    }

    // ─────────────────────────────────────────────────────────────────────
    // Zone recommendations
    // ─────────────────────────────────────────────────────────────────────

    /// Recommended zone membership for a new asset; the caller persists it.
    pub fn compute_initial_zones(&self, snapshot: &AssetSnapshot) -> ZoneSet {
        assignment::initial_zones(&self.default_zones, snapshot)
    }

    /// Recommended zone membership after an update; the caller persists it.
    pub fn compute_updated_zones(
        &self,
        supported_zones: &ZoneSet,
        original: &AssetSnapshot,
        updated: &AssetSnapshot,
    ) -> Option<ZoneSet> {
        assignment::reconcile_zones(
            &self.roles,
            &self.default_zones,
            supported_zones,
            original,
            updated,
        )
    }

    // ─────────────────────────────────────────────────────────────────────
    // Type definitions
    // ─────────────────────────────────────────────────────────────────────

    /// Authorize a type-definition operation. Any recognized user may read
    /// the types; only type architects (and the server's own identity) may
    /// change them.
    pub fn authorize_type(
        &self,
        operation: TypeDefOperation,
        user: &Principal,
        type_name: &str,
    ) -> Result<(), AuthzError> {
        let allowed = match operation {
            TypeDefOperation::Read => self.roles.is_member(RoleSet::AllUsers, user),
            TypeDefOperation::Create | TypeDefOperation::Update | TypeDefOperation::Delete => {
                self.roles.is_member(RoleSet::TypeArchitects, user)
            }
        };

        if allowed || self.is_local_server(user) {
            return Ok(());
        }

        tracing::debug!(user = %user, type_name, "type operation denied");
        Err(self.deny(operation.as_str(), user))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Connections
    // ─────────────────────────────────────────────────────────────────────

    /// Authorize access to a connection. Connections without secret
    /// material are open; ones embedding credentials are reserved for
    /// automation accounts.
    pub fn authorize_connection(
        &self,
        user: &Principal,
        connection: &ConnectionSummary,
    ) -> Result<(), AuthzError> {
        if !connection.carries_secrets() {
            return Ok(());
        }
        if self.roles.is_member(RoleSet::AutomationAccounts, user) {
            return Ok(());
        }

        Err(self.deny("connection access", user))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Platform and service checks
    // ─────────────────────────────────────────────────────────────────────

    /// Any recognized user may issue requests to the server.
    pub fn authorize_server_access(&self, user: &Principal) -> Result<(), AuthzError> {
        self.require_membership(RoleSet::AllUsers, "server access", user)
    }

    pub fn authorize_server_admin(&self, user: &Principal) -> Result<(), AuthzError> {
        self.require_membership(RoleSet::ServerAdmins, "server administration", user)
    }

    pub fn authorize_server_operator(&self, user: &Principal) -> Result<(), AuthzError> {
        self.require_membership(RoleSet::ServerOperators, "server operations", user)
    }

    pub fn authorize_server_investigator(&self, user: &Principal) -> Result<(), AuthzError> {
        self.require_membership(RoleSet::ServerInvestigators, "server diagnostics", user)
    }

    /// Authorize a named service operation. The asset-owner service's
    /// delete operation is reserved for automation accounts; everything
    /// else requires a recognized user.
    pub fn authorize_service_operation(
        &self,
        user: &Principal,
        service: &str,
        operation: &str,
    ) -> Result<(), AuthzError> {
        if service == ASSET_OWNER_SERVICE && operation == DELETE_ASSET_OPERATION {
            if self.roles.is_member(RoleSet::AutomationAccounts, user) {
                return Ok(());
            }
        } else if self.roles.is_member(RoleSet::AllUsers, user) {
            return Ok(());
        }

        Err(self.deny(&format!("service operation {service}/{operation}"), user))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Denial helpers
    // ─────────────────────────────────────────────────────────────────────

    fn is_local_server(&self, user: &Principal) -> bool {
        self.local_server.as_ref() == Some(user)
    }

    fn require_membership(
        &self,
        set: RoleSet,
        operation: &str,
        user: &Principal,
    ) -> Result<(), AuthzError> {
        if self.roles.is_member(set, user) {
            Ok(())
        } else {
            Err(self.deny(operation, user))
        }
    }

    fn deny(&self, operation: &str, user: &Principal) -> AuthzError {
        tracing::debug!(user = %user, operation, "request denied");
        AuthzError::NotAuthorized {
            operation: operation.to_string(),
            user: user.clone(),
        }
    }

    fn incomplete(&self, operation: AssetOperation, user: &Principal, guid: Uuid) -> AuthzError {
        AuthzError::IncompleteAsset {
            operation: operation.as_str().to_string(),
            user: user.clone(),
            guid,
        }
    }
}

/// Whether the zone membership differs between the two views. `None` and
/// `None` are equal; `None` against anything else is a change.
fn has_zone_changed(old: Option<&ZoneSet>, new: Option<&ZoneSet>) -> bool {
    match (old, new) {
        (None, None) => false,
        (Some(old), Some(new)) => old != new,
        _ => true,
    }
}

/// Whether `zone` is present in the old membership but absent from the
/// new one. An unset old membership means nothing could have been removed.
fn zone_been_removed(zone: &ZoneName, old: Option<&ZoneSet>, new: Option<&ZoneSet>) -> bool {
    let Some(old) = old else {
        return false;
    };
    if !old.contains(zone) {
        return false;
    }
    match new {
        Some(new) => !new.contains(zone),
        None => true,
    }
}
