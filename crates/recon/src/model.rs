use quantiv_core::{IdentityKey, Individual};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Source states
// ---------------------------------------------------------------------------

/// Outcome of reading one persisted source.
///
/// Keeps "nothing there" apart from "there but unreadable" even though both
/// end up as an empty dataset for the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceState<T> {
    Missing,
    Malformed(String),
    Loaded(T),
}

impl<T> SourceState<T> {
    pub fn loaded(self) -> Option<T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SourceState<U> {
        match self {
            Self::Missing => SourceState::Missing,
            Self::Malformed(reason) => SourceState::Malformed(reason),
            Self::Loaded(data) => SourceState::Loaded(f(data)),
        }
    }

    /// Summarize the state; `count` measures loaded data.
    pub fn status(&self, count: impl FnOnce(&T) -> usize) -> SourceStatus {
        match self {
            Self::Missing => SourceStatus::Missing,
            Self::Malformed(reason) => SourceStatus::Malformed(reason.clone()),
            Self::Loaded(data) => SourceStatus::Loaded { records: count(data) },
        }
    }
}

impl<T: Default> SourceState<T> {
    /// The data, or an empty dataset for a missing or malformed source.
    pub fn into_data(self) -> T {
        self.loaded().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Missing,
    Malformed(String),
    Loaded { records: usize },
}

impl std::fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::Malformed(reason) => write!(f, "malformed ({reason})"),
            Self::Loaded { records } => write!(f, "loaded ({records} records)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One row of the legacy flat file, fields as stored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegacyRow {
    pub last_name: String,
    pub first_name: String,
    pub group_name: String,
    pub data: String,
}

impl LegacyRow {
    pub fn new(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        group_name: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            group_name: group_name.into(),
            data: data.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterSource {
    Structured,
    Legacy,
}

impl std::fmt::Display for RosterSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structured => write!(f, "structured"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

/// A legacy row whose numeric field could not be read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnparsedRow {
    /// 0-based data row (header excluded).
    pub row: usize,
    pub identity: IdentityKey,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub source: RosterSource,
    pub structured: SourceStatus,
    /// Only read when the structured roster was unusable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy: Option<SourceStatus>,
    /// Identity keys that appeared more than once in the structured roster.
    pub duplicate_keys: Vec<IdentityKey>,
    pub unparsed_rows: Vec<UnparsedRow>,
    /// Legacy rows dropped for a blank last or first name.
    pub nameless_rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub individuals: Vec<Individual>,
    pub report: LoadReport,
}
