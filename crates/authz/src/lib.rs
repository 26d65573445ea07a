//! `metagov-authz` — zone-based asset governance authorization engine.
//!
//! For every operation on a governed metadata asset, this crate decides
//! whether an acting identity may perform it, based on the asset's zone
//! classification, declared ownership, and separation-of-duty constraints.
//! The engine is a pure function of its inputs plus an immutable
//! configuration built once at startup: no storage, no transport, no
//! ambient globals. Anything not explicitly allowed is denied.

pub mod asset;
pub mod assignment;
pub mod config;
pub mod duties;
pub mod engine;
pub mod roles;
pub mod zones;

pub use asset::{AssetAuditHeader, AssetSnapshot, ConnectionSummary, OwnerType};
pub use config::{ConfigError, GovernanceConfig, ZoneRuleConfig};
pub use engine::{AccessDecisionEngine, AssetOperation, AuthzError, TypeDefOperation};
pub use roles::{RoleDirectory, RoleSet};
pub use zones::ZoneRuleTable;
