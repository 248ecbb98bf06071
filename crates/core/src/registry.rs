// Assessment registry
// Ordered list of named assessments ("notes"). The order defines how an
// individual's per-assessment scores line up into its observation sequence.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::score::ValidationError;

/// One scorable assessment, optionally carrying a national reference value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "national", default)]
    pub reference_value: Option<f64>,
}

impl AssessmentDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), reference_value: None }
    }

    pub fn with_reference(name: impl Into<String>, reference_value: f64) -> Self {
        Self { name: name.into(), reference_value: Some(reference_value) }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssessmentRegistry {
    definitions: Vec<AssessmentDefinition>,
}

impl AssessmentRegistry {
    /// Build a registry from user input. Names are trimmed; blank or
    /// duplicate names are rejected.
    pub fn new(definitions: Vec<AssessmentDefinition>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(definitions.len());

        for (position, mut def) in definitions.into_iter().enumerate() {
            def.name = def.name.trim().to_string();
            if def.name.is_empty() {
                return Err(ValidationError::BlankAssessmentName { position });
            }
            if let Some(value) = def.reference_value {
                if !value.is_finite() {
                    return Err(ValidationError::NotFinite {
                        field: format!("{} reference", def.name),
                        value: value.to_string(),
                    });
                }
            }
            if !seen.insert(def.name.clone()) {
                return Err(ValidationError::DuplicateAssessment(def.name));
            }
            out.push(def);
        }

        Ok(Self { definitions: out })
    }

    /// Build a registry from a stored file. Stored data is never rejected:
    /// a repeated name keeps its first occurrence.
    pub fn from_stored(definitions: Vec<AssessmentDefinition>) -> Self {
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(definitions.len());

        for def in definitions {
            if !seen.insert(def.name.clone()) {
                log::warn!("assessment registry: dropping duplicate entry '{}'", def.name);
                continue;
            }
            out.push(def);
        }

        Self { definitions: out }
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssessmentDefinition> {
        self.definitions.iter()
    }

    pub fn definitions(&self) -> &[AssessmentDefinition] {
        &self.definitions
    }

    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&AssessmentDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.definitions.iter().position(|d| d.name == name)
    }

    /// Append a definition, keeping names unique.
    pub fn push(&mut self, def: AssessmentDefinition) -> Result<(), ValidationError> {
        let mut all = self.definitions.clone();
        all.push(def);
        *self = Self::new(all)?;
        Ok(())
    }

    /// Remove a definition by name. Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.definitions.len();
        self.definitions.retain(|d| d.name != name);
        self.definitions.len() != before
    }

    /// Line scores up in registry order. Missing entries count as 0.
    pub fn align(&self, scores: &BTreeMap<String, f64>) -> Vec<f64> {
        self.definitions
            .iter()
            .map(|d| scores.get(&d.name).copied().unwrap_or(0.0))
            .collect()
    }
}

impl<'a> IntoIterator for &'a AssessmentRegistry {
    type Item = &'a AssessmentDefinition;
    type IntoIter = std::slice::Iter<'a, AssessmentDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.definitions.iter()
    }
}
