//! `quantiv-recon`: Roster reconciliation.
//!
//! Pure crate: receives the already-read contents of the structured roster and
//! the legacy flat file, decides which one is authoritative, and derives each
//! individual's observation sequence. No IO.

pub mod engine;
pub mod error;
pub mod legacy;
pub mod model;
pub mod structured;

pub use engine::reconcile;
pub use error::ReconError;
pub use model::{LegacyRow, LoadReport, Reconciled, RosterSource, SourceState, SourceStatus};
