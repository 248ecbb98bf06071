// Structured roster (JSON)
// An array of { nom, prenom, groupe, scores: { <assessment>: number } }.
// Records are kept as raw JSON so unknown fields survive a rewrite.

use quantiv_recon::structured::{FIELD_FIRST_NAME, FIELD_GROUP, FIELD_LAST_NAME, FIELD_SCORES};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Incoming student data for an upsert. Only the fields that are set are
/// merged over an existing record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    #[serde(rename = "groupe", default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StudentRecord {
    pub fn new(last_name: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            ..Self::default()
        }
    }

    pub fn group(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = Some(group_name.into());
        self
    }

    /// Add one score. Scores given this way replace the stored `scores`
    /// object as a whole on merge.
    pub fn score(mut self, assessment: impl Into<String>, value: f64) -> Self {
        self.scores
            .get_or_insert_with(Map::new)
            .insert(assessment.into(), Value::from(value));
        self
    }

    pub fn to_object(&self) -> Map<String, Value> {
        let mut obj = self.extra.clone();
        obj.insert(FIELD_LAST_NAME.into(), Value::from(self.last_name.clone()));
        obj.insert(FIELD_FIRST_NAME.into(), Value::from(self.first_name.clone()));
        if let Some(group) = &self.group_name {
            obj.insert(FIELD_GROUP.into(), Value::from(group.clone()));
        }
        if let Some(scores) = &self.scores {
            obj.insert(FIELD_SCORES.into(), Value::Object(scores.clone()));
        }
        obj
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

fn record_matches(record: &Value, last_name: &str, first_name: &str) -> bool {
    let text = |field: &str| record.get(field).and_then(Value::as_str).map(str::trim);
    text(FIELD_LAST_NAME) == Some(last_name.trim()) && text(FIELD_FIRST_NAME) == Some(first_name.trim())
}

/// Merge `incoming` over the last record with the same identity key, or
/// append it. Loading keeps the last duplicate, so that is the one updated.
pub fn upsert(records: &mut Vec<Value>, incoming: &StudentRecord) -> UpsertOutcome {
    let fields = incoming.to_object();
    let existing = records
        .iter_mut()
        .rev()
        .find(|r| record_matches(r, &incoming.last_name, &incoming.first_name))
        .and_then(Value::as_object_mut);

    match existing {
        Some(obj) => {
            for (key, value) in fields {
                obj.insert(key, value);
            }
            UpsertOutcome::Updated
        }
        None => {
            records.push(Value::Object(fields));
            UpsertOutcome::Inserted
        }
    }
}

/// Drop every record with the identity key. Returns how many were removed.
pub fn remove(records: &mut Vec<Value>, last_name: &str, first_name: &str) -> usize {
    let before = records.len();
    records.retain(|r| !record_matches(r, last_name, first_name));
    before - records.len()
}
