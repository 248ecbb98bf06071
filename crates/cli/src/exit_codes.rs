//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 2    | Usage error (bad arguments, unreadable config file)  |
//! | 3    | Not found (individual, group, assessment)            |
//! | 4    | Validation failure (non-numeric score, bad registry) |
//! | 5    | Write failure (I/O, refusing to rewrite a bad file)  |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `CliError`

use quantiv_io::StoreError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options, invalid config.
/// Also what clap itself exits with on a parse error.
pub const EXIT_USAGE: u8 = 2;

/// The named individual, group or assessment does not exist.
pub const EXIT_NOT_FOUND: u8 = 3;

/// User input rejected: a score or override is not a finite number, or an
/// assessment list has a blank or duplicate name.
pub const EXIT_VALIDATION: u8 = 4;

/// A file could not be written. The previous content is left in place.
pub const EXIT_WRITE: u8 = 5;

/// Map a store error to its exit code.
pub fn store_exit_code(err: &StoreError) -> u8 {
    match err {
        StoreError::Validation(_) => EXIT_VALIDATION,
        StoreError::Io { .. } | StoreError::Unreadable { .. } | StoreError::Serialize(_) => EXIT_WRITE,
    }
}
