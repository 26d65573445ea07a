use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Name of a governance zone: a classification bucket used to gate access
/// to an asset. An asset may belong to several zones simultaneously; zones
/// are not hierarchical.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneName(Cow<'static, str>);

impl ZoneName {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ZoneName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ZoneName {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ZoneName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// An asset's zone membership: order irrelevant, duplicates collapsed.
pub type ZoneSet = BTreeSet<ZoneName>;

/// Behavior tag for zones that need special processing during access
/// evaluation. Most zones are `Standard`: a plain membership lookup in the
/// zone's authorized-principal set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ZoneBehavior {
    /// Plain principal-set membership.
    #[default]
    Standard,
    /// The default landing zone for newly ingested, not-yet-classified
    /// assets. Leaving it is a governed transition.
    OnboardingOnly,
    /// Only the asset's declared owner may act, regardless of the zone's
    /// principal set.
    OwnerOnly,
    /// Updates are reserved for automation accounts; reads fall back to the
    /// zone's principal set.
    RestrictedWrite,
    /// Terminal zone serviced by automation accounts only.
    AutomationOnly,
}
