// Score validation
// Numbers typed by a user (scores, national override) are checked here, at
// data-entry time. Load-time parsing of stored files is lenient and lives in
// quantiv-recon.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value does not parse as a number.
    NotNumeric { field: String, value: String },
    /// Value parses but is NaN or infinite.
    NotFinite { field: String, value: String },
    /// Assessment name is empty after trimming.
    BlankAssessmentName { position: usize },
    /// Two assessments share a name.
    DuplicateAssessment(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotNumeric { field, value } => {
                write!(f, "{field}: '{value}' is not a number")
            }
            Self::NotFinite { field, value } => {
                write!(f, "{field}: '{value}' is not a finite number")
            }
            Self::BlankAssessmentName { position } => {
                write!(f, "assessment #{} has a blank name", position + 1)
            }
            Self::DuplicateAssessment(name) => write!(f, "duplicate assessment name: {name}"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Parse a single user-entered score.
///
/// Surrounding whitespace is ignored. A decimal comma (`12,5`) is accepted
/// since scores are typed by hand on French-locale keyboards.
pub fn parse_score(field: &str, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replacen(',', ".", 1)
    } else {
        trimmed.to_string()
    };

    let value: f64 = normalized.parse().map_err(|_| ValidationError::NotNumeric {
        field: field.to_string(),
        value: raw.to_string(),
    })?;

    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
            value: raw.to_string(),
        });
    }
    Ok(value)
}

/// Parse a comma-joined list of scores (`"12,15,18"`), rejecting the whole
/// list on the first bad token.
pub fn parse_score_list(field: &str, raw: &str) -> Result<Vec<f64>, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',')
        .enumerate()
        .map(|(i, token)| {
            let token = token.trim();
            let value: f64 = token.parse().map_err(|_| ValidationError::NotNumeric {
                field: format!("{field}[{i}]"),
                value: token.to_string(),
            })?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(ValidationError::NotFinite {
                    field: format!("{field}[{i}]"),
                    value: token.to_string(),
                })
            }
        })
        .collect()
}

/// Render observations the way the legacy flat file stores them.
pub fn format_score_list(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Operator-set replacement for the population mean in national comparisons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NationalOverride {
    #[serde(default)]
    pub mean: Option<f64>,
}

impl NationalOverride {
    pub fn new(mean: Option<f64>) -> Self {
        Self { mean }
    }

    /// Parse operator input. Blank input (or `none`) clears the override.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(Self { mean: None });
        }
        parse_score("national mean", trimmed).map(|mean| Self { mean: Some(mean) })
    }

    pub fn is_set(&self) -> bool {
        self.mean.is_some()
    }
}
