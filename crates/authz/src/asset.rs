//! Caller-supplied views of assets, audit provenance and connections.
//!
//! These are transient inputs to authorization decisions. The engine never
//! mutates them and holds no per-asset state between calls; persistence and
//! retrieval belong to the surrounding service.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use metagov_core::{Principal, ZoneSet};

/// How an asset's owner field is to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerType {
    UserId,
    ProfileId,
}

/// Point-in-time view of a governed asset.
///
/// `zone_membership` distinguishes `None` ("caller specified nothing, use
/// the server default") from an explicit set. For authorization purposes an
/// asset's effective zone set is never empty: `None`/empty is treated as
/// exactly the onboarding zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSnapshot {
    pub guid: Uuid,
    pub owner: Option<Principal>,
    pub owner_type: Option<OwnerType>,
    pub zone_membership: Option<ZoneSet>,
}

impl AssetSnapshot {
    pub fn new(guid: Uuid) -> Self {
        Self {
            guid,
            owner: None,
            owner_type: None,
            zone_membership: None,
        }
    }

    /// Whether `user` is the asset's declared owner.
    ///
    /// This is an exact identity match; it does not resolve profile names
    /// to user ids.
    pub fn is_owned_by(&self, user: &Principal) -> bool {
        self.owner.as_ref() == Some(user)
    }
}

/// Provenance of an asset, supplied for update decisions that may release
/// the asset from the onboarding zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAuditHeader {
    pub created_by: Principal,
    pub created_at: DateTime<Utc>,
}

/// The credential-bearing parts of a connection, as seen by the engine.
///
/// Connections without secret material are readable by anyone who can see
/// the asset; ones that embed credentials are reserved for automation
/// accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSummary {
    pub qualified_name: Option<String>,
    pub clear_password: Option<String>,
    pub encrypted_password: Option<String>,
    pub secured_properties: Option<BTreeMap<String, String>>,
}

impl ConnectionSummary {
    pub fn carries_secrets(&self) -> bool {
        self.clear_password.is_some()
            || self.encrypted_password.is_some()
            || self.secured_properties.is_some()
    }
}
