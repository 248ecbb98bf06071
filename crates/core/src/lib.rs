//! `quantiv-core`: Core types shared by every Quantiv crate.
//!
//! Individuals, derived groups, the assessment registry, and the validation
//! rules for user-entered numbers. No IO.

pub mod entity;
pub mod registry;
pub mod score;

pub use entity::{Entity, Group, IdentityKey, Individual, Roster};
pub use registry::{AssessmentDefinition, AssessmentRegistry};
pub use score::{NationalOverride, ValidationError};
