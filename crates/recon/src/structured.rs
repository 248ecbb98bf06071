use std::collections::{BTreeMap, HashMap};

use quantiv_core::{AssessmentRegistry, IdentityKey, Individual};
use serde_json::{Map, Value};

use crate::error::ReconError;

pub const FIELD_LAST_NAME: &str = "nom";
pub const FIELD_FIRST_NAME: &str = "prenom";
pub const FIELD_GROUP: &str = "groupe";
pub const FIELD_SCORES: &str = "scores";

#[derive(Debug, Clone, PartialEq)]
pub struct StructuredOutcome {
    pub individuals: Vec<Individual>,
    pub duplicate_keys: Vec<IdentityKey>,
}

/// Build individuals from structured roster records.
///
/// Any ill-formed record fails the whole roster: the caller falls back to the
/// legacy file rather than mixing sources.
pub fn individuals_from_records(
    records: &[Value],
    registry: &AssessmentRegistry,
) -> Result<StructuredOutcome, ReconError> {
    let mut individuals = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let obj = record.as_object().ok_or(ReconError::RecordNotObject { index })?;
        individuals.push(individual_from_record(index, obj, registry)?);
    }
    Ok(dedupe_last_wins(individuals))
}

fn individual_from_record(
    index: usize,
    obj: &Map<String, Value>,
    registry: &AssessmentRegistry,
) -> Result<Individual, ReconError> {
    let last_name = text_field(index, obj, FIELD_LAST_NAME)?;
    let first_name = text_field(index, obj, FIELD_FIRST_NAME)?;
    let group_name = text_field(index, obj, FIELD_GROUP)?;

    let scores = match obj.get(FIELD_SCORES) {
        None => None,
        Some(Value::Object(map)) => Some(map),
        Some(_) if !registry.is_empty() => return Err(ReconError::ScoresNotObject { index }),
        Some(_) => None,
    };

    let observations = match scores {
        Some(map) if !registry.is_empty() => registry
            .iter()
            .map(|def| match map.get(&def.name) {
                None => Ok(0.0),
                Some(v) => score_value(v).ok_or_else(|| ReconError::ScoreNotNumeric {
                    index,
                    assessment: def.name.clone(),
                    value: v.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?,
        // No registry: every stored value counts, in stored order.
        Some(map) => map
            .iter()
            .map(|(name, v)| {
                score_value(v).ok_or_else(|| ReconError::ScoreNotNumeric {
                    index,
                    assessment: name.clone(),
                    value: v.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        // No scores yet: one zero per assessment.
        None => vec![0.0; registry.len()],
    };

    let mut typed = BTreeMap::new();
    if let Some(map) = scores {
        for (name, v) in map {
            match score_value(v) {
                Some(score) => {
                    typed.insert(name.clone(), score);
                }
                None => log::debug!("record {index}: ignoring non-numeric score '{name}'"),
            }
        }
    }

    Ok(Individual::new(last_name, first_name, group_name, observations).with_scores(typed))
}

/// Trimmed string field; missing or null reads as empty.
fn text_field(index: usize, obj: &Map<String, Value>, field: &str) -> Result<String, ReconError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(ReconError::FieldNotText { index, field: field.to_string() }),
    }
}

/// Numeric reading of a stored score: numbers, numeric strings and booleans.
pub fn score_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Later records replace earlier ones with the same identity key, keeping the
/// position of the first.
fn dedupe_last_wins(individuals: Vec<Individual>) -> StructuredOutcome {
    let mut out: Vec<Individual> = Vec::with_capacity(individuals.len());
    let mut seen: HashMap<IdentityKey, usize> = HashMap::new();
    let mut duplicate_keys = Vec::new();

    for ind in individuals {
        let key = ind.identity();
        match seen.get(&key) {
            Some(&pos) => {
                log::warn!("structured roster: duplicate entry for {key}, keeping the last one");
                if !duplicate_keys.contains(&key) {
                    duplicate_keys.push(key);
                }
                out[pos] = ind;
            }
            None => {
                seen.insert(key, out.len());
                out.push(ind);
            }
        }
    }

    StructuredOutcome { individuals: out, duplicate_keys }
}
