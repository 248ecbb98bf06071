use std::fmt;

/// Why a structured roster was abandoned.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconError {
    /// Roster entry is not a JSON object.
    RecordNotObject { index: usize },
    /// Name field holds something other than a string.
    FieldNotText { index: usize, field: String },
    /// `scores` is not an object while the registry needs to look names up.
    ScoresNotObject { index: usize },
    /// A score that takes part in derivation is not numeric.
    ScoreNotNumeric { index: usize, assessment: String, value: String },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RecordNotObject { index } => write!(f, "record {index}: not an object"),
            Self::FieldNotText { index, field } => {
                write!(f, "record {index}: field '{field}' is not a string")
            }
            Self::ScoresNotObject { index } => {
                write!(f, "record {index}: 'scores' is not an object")
            }
            Self::ScoreNotNumeric { index, assessment, value } => {
                write!(f, "record {index}: score '{assessment}' is not numeric ({value})")
            }
        }
    }
}

impl std::error::Error for ReconError {}
