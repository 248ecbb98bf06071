// File I/O operations

pub mod error;
pub mod json;
pub mod legacy;
pub mod roster;
pub mod store;

pub use error::StoreError;
pub use roster::{StudentRecord, UpsertOutcome};
pub use store::{RosterLoad, Store};
