//! Zone rule table: which principals may act in which zone, and which
//! zones carry special behavior.

use std::collections::{BTreeMap, BTreeSet};

use metagov_core::{Principal, ZoneBehavior, ZoneName};

use crate::config::ConfigError;

/// The rule entry for a single zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ZoneRule {
    pub(crate) principals: BTreeSet<Principal>,
    pub(crate) behavior: ZoneBehavior,
}

/// Immutable map from zone name to its rule entry.
///
/// Built once at startup. Construction fails fast if no zone carries the
/// onboarding behavior, since the engine needs a landing zone for
/// unclassified assets. Unknown zone names are denied by default at
/// lookup time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRuleTable {
    rules: BTreeMap<ZoneName, ZoneRule>,
    onboarding_zone: ZoneName,
}

impl ZoneRuleTable {
    pub(crate) fn new(rules: BTreeMap<ZoneName, ZoneRule>) -> Result<Self, ConfigError> {
        let mut onboarding = rules
            .iter()
            .filter(|(_, rule)| rule.behavior == ZoneBehavior::OnboardingOnly)
            .map(|(name, _)| name.clone());

        let Some(onboarding_zone) = onboarding.next() else {
            return Err(ConfigError::MissingOnboardingZone);
        };
        if let Some(second) = onboarding.next() {
            return Err(ConfigError::MultipleOnboardingZones {
                first: onboarding_zone,
                second,
            });
        }

        Ok(Self {
            rules,
            onboarding_zone,
        })
    }

    /// The single zone tagged with the onboarding behavior.
    pub fn onboarding_zone(&self) -> &ZoneName {
        &self.onboarding_zone
    }

    pub fn contains(&self, zone: &ZoneName) -> bool {
        self.rules.contains_key(zone)
    }

    /// Behavior tag for `zone`; `None` for zones with no rule entry.
    pub fn behavior(&self, zone: &ZoneName) -> Option<ZoneBehavior> {
        self.rules.get(zone).map(|rule| rule.behavior)
    }

    /// Plain membership lookup in the zone's authorized-principal set.
    /// Unknown zones are inaccessible.
    pub fn zone_accessible_by(&self, zone: &ZoneName, user: &Principal) -> bool {
        self.rules
            .get(zone)
            .is_some_and(|rule| rule.principals.contains(user))
    }
}
