//! Separation-of-duty rule for releasing an asset from the onboarding
//! zone: the actor completing the release must differ from the asset's
//! original creator.

use metagov_core::Principal;

use crate::asset::AssetAuditHeader;

/// Whether `actor` may complete a release from the onboarding zone.
///
/// False iff the actor is the asset's recorded creator. A missing audit
/// header means no provenance is known and no constraint is applied;
/// callers performing release transitions are expected to supply one.
pub fn can_release_from_quarantine(
    actor: &Principal,
    audit_header: Option<&AssetAuditHeader>,
) -> bool {
    match audit_header {
        Some(header) => header.created_by != *actor,
        None => true,
    }
}
