//! `metagov-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives for metadata governance
//! (no infrastructure concerns).

pub mod principal;
pub mod zone;

pub use principal::Principal;
pub use zone::{ZoneBehavior, ZoneName, ZoneSet};
