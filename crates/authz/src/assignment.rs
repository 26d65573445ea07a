//! Zone assignment policy: the zone membership to store on an asset at
//! creation time, and its reconciliation on update.
//!
//! These are pure recommendations: the caller persists the returned set;
//! the engine never writes anything.

use metagov_core::ZoneSet;

use crate::asset::AssetSnapshot;
use crate::roles::RoleDirectory;

/// Zone membership for a newly created asset.
///
/// An explicit, non-empty classification supplied by the caller wins;
/// otherwise the server-wide default applies (typically the onboarding
/// zone).
pub fn initial_zones(default_zones: &ZoneSet, snapshot: &AssetSnapshot) -> ZoneSet {
    match &snapshot.zone_membership {
        Some(zones) if !zones.is_empty() => zones.clone(),
        _ => default_zones.clone(),
    }
}

/// Zone membership after an asset update.
///
/// When the update assigns an owner who holds a reserved zone, that zone is
/// unioned into the updated membership. Otherwise the updated membership is
/// returned unchanged (which may be `None` when the caller supplied none).
///
/// `supported_zones` is accepted for zone-allowlist validation but is not
/// enforced here; validation happens in the surrounding service.
pub fn reconcile_zones(
    directory: &RoleDirectory,
    _default_zones: &ZoneSet,
    _supported_zones: &ZoneSet,
    _original: &AssetSnapshot,
    updated: &AssetSnapshot,
) -> Option<ZoneSet> {
    let Some(owner) = &updated.owner else {
        return updated.zone_membership.clone();
    };

    match directory.owner_zone(owner) {
        Some(reserved) => {
            let mut zones = updated.zone_membership.clone().unwrap_or_default();
            zones.insert(reserved.clone());
            Some(zones)
        }
        None => updated.zone_membership.clone(),
    }
}
