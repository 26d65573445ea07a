//! Startup configuration surface for the governance engine.
//!
//! The host loads one `GovernanceConfig` (from a file, environment, or a
//! directory sync job), builds the engine once, and shares it read-only
//! across request handlers. Validation is fail-fast: a zone referenced
//! anywhere without a rule entry is a deployment error, not a per-request
//! denial.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use metagov_core::{Principal, ZoneBehavior, ZoneName, ZoneSet};

use crate::engine::AccessDecisionEngine;
use crate::roles::RoleDirectory;
use crate::zones::{ZoneRule, ZoneRuleTable};

/// Fatal configuration error. Raised at startup only; per-request outcomes
/// are always typed denials, never configuration faults.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("zone '{zone}' referenced by {referenced_by} has no rule entry")]
    UnknownZone {
        zone: ZoneName,
        referenced_by: &'static str,
    },

    #[error("duplicate rule entry for zone '{0}'")]
    DuplicateZone(ZoneName),

    #[error("no zone is tagged with the onboarding behavior")]
    MissingOnboardingZone,

    #[error("zones '{first}' and '{second}' are both tagged with the onboarding behavior")]
    MultipleOnboardingZones { first: ZoneName, second: ZoneName },
}

/// Rule entry for one zone: its name, behavior tag and authorized
/// principals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRuleConfig {
    pub name: ZoneName,
    #[serde(default)]
    pub behavior: ZoneBehavior,
    #[serde(default)]
    pub principals: BTreeSet<Principal>,
}

/// The complete configuration for an [`AccessDecisionEngine`].
///
/// Role memberships are abstract principal sets; how they are populated is
/// outside this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    #[serde(default)]
    pub all_users: BTreeSet<Principal>,
    #[serde(default)]
    pub employees: BTreeSet<Principal>,
    #[serde(default)]
    pub server_admins: BTreeSet<Principal>,
    #[serde(default)]
    pub server_operators: BTreeSet<Principal>,
    #[serde(default)]
    pub server_investigators: BTreeSet<Principal>,
    #[serde(default)]
    pub type_architects: BTreeSet<Principal>,
    #[serde(default)]
    pub automation_accounts: BTreeSet<Principal>,

    pub zones: Vec<ZoneRuleConfig>,

    /// Reserved zone per principal, unioned into an asset's membership
    /// once that principal becomes its declared owner.
    #[serde(default)]
    pub owner_zones: BTreeMap<Principal, ZoneName>,

    /// Zone membership assigned to assets created without an explicit
    /// classification. Defaults to the onboarding zone when left empty.
    #[serde(default)]
    pub default_zones: ZoneSet,

    /// The server's own identity, trusted for type-definition maintenance.
    #[serde(default)]
    pub local_server_principal: Option<Principal>,
}

impl GovernanceConfig {
    /// Validate the configuration and build the engine.
    pub fn build(self) -> Result<AccessDecisionEngine, ConfigError> {
        let mut rules: BTreeMap<ZoneName, ZoneRule> = BTreeMap::new();
        for zone in self.zones {
            let entry = ZoneRule {
                principals: zone.principals,
                behavior: zone.behavior,
            };
            if rules.insert(zone.name.clone(), entry).is_some() {
                return Err(ConfigError::DuplicateZone(zone.name));
            }
        }
        let table = ZoneRuleTable::new(rules)?;

        for zone in &self.default_zones {
            if !table.contains(zone) {
                return Err(ConfigError::UnknownZone {
                    zone: zone.clone(),
                    referenced_by: "default_zones",
                });
            }
        }
        for zone in self.owner_zones.values() {
            if !table.contains(zone) {
                return Err(ConfigError::UnknownZone {
                    zone: zone.clone(),
                    referenced_by: "owner_zones",
                });
            }
        }

        let default_zones = if self.default_zones.is_empty() {
            ZoneSet::from([table.onboarding_zone().clone()])
        } else {
            self.default_zones
        };

        let directory = RoleDirectory {
            all_users: self.all_users,
            employees: self.employees,
            server_admins: self.server_admins,
            server_operators: self.server_operators,
            server_investigators: self.server_investigators,
            type_architects: self.type_architects,
            automation_accounts: self.automation_accounts,
            owner_zones: self.owner_zones,
        };

        Ok(AccessDecisionEngine::new(
            directory,
            table,
            default_zones,
            self.local_server_principal,
        ))
    }
}

#[cfg(test)]
mod tests {
    use metagov_core::ZoneBehavior;

    use super::*;

    fn minimal_config() -> GovernanceConfig {
        GovernanceConfig {
            all_users: BTreeSet::from([Principal::new("peterprofile")]),
            zones: vec![ZoneRuleConfig {
                name: ZoneName::new("quarantine"),
                behavior: ZoneBehavior::OnboardingOnly,
                principals: BTreeSet::from([Principal::new("peterprofile")]),
            }],
            ..GovernanceConfig::default()
        }
    }

    #[test]
    fn empty_default_zones_fall_back_to_the_onboarding_zone() {
        let engine = minimal_config().build().unwrap();
        assert_eq!(
            engine.default_zones(),
            &ZoneSet::from([ZoneName::new("quarantine")])
        );
    }

    #[test]
    fn default_zone_without_rule_entry_fails_fast() {
        let mut config = minimal_config();
        config.default_zones = ZoneSet::from([ZoneName::new("landing")]);

        assert_eq!(
            config.build(),
            Err(ConfigError::UnknownZone {
                zone: ZoneName::new("landing"),
                referenced_by: "default_zones",
            })
        );
    }

    #[test]
    fn owner_binding_to_unknown_zone_fails_fast() {
        let mut config = minimal_config();
        config.owner_zones = BTreeMap::from([(
            Principal::new("tanyatidie"),
            ZoneName::new("clinical-trials"),
        )]);

        assert!(matches!(
            config.build(),
            Err(ConfigError::UnknownZone {
                referenced_by: "owner_zones",
                ..
            })
        ));
    }

    #[test]
    fn duplicate_zone_entries_fail_fast() {
        let mut config = minimal_config();
        config.zones.push(ZoneRuleConfig {
            name: ZoneName::new("quarantine"),
            behavior: ZoneBehavior::Standard,
            principals: BTreeSet::new(),
        });

        assert_eq!(
            config.build(),
            Err(ConfigError::DuplicateZone(ZoneName::new("quarantine")))
        );
    }

    #[test]
    fn config_round_trips_through_json() {
        let json = r#"{
            "all_users": ["erinoverview", "peterprofile"],
            "type_architects": ["erinoverview"],
            "zones": [
                { "name": "quarantine", "behavior": "onboarding-only",
                  "principals": ["peterprofile", "erinoverview"] },
                { "name": "research", "principals": ["tessatube"] },
                { "name": "trash-can", "behavior": "automation-only" }
            ],
            "owner_zones": { "tanyatidie": "research" },
            "default_zones": ["quarantine"]
        }"#;

        let config: GovernanceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.zones.len(), 3);
        assert_eq!(config.zones[1].behavior, ZoneBehavior::Standard);
        assert!(config.build().is_ok());
    }
}
