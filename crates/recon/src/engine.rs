use quantiv_core::AssessmentRegistry;
use serde_json::Value;

use crate::legacy::individuals_from_legacy;
use crate::model::{LegacyRow, LoadReport, Reconciled, RosterSource, SourceState, SourceStatus};
use crate::structured::individuals_from_records;

/// Pick the authoritative roster source and build the individual list.
///
/// A structured roster that was read and whose every record is well-formed
/// wins outright, even when empty. Otherwise it is dropped as a whole and the
/// legacy rows are used. The two are never merged. `load_legacy` is only
/// called on fallback.
pub fn reconcile<F>(
    structured: SourceState<Vec<Value>>,
    registry: &AssessmentRegistry,
    load_legacy: F,
) -> Reconciled
where
    F: FnOnce() -> SourceState<Vec<LegacyRow>>,
{
    let structured_status = match structured {
        SourceState::Loaded(records) => match individuals_from_records(&records, registry) {
            Ok(outcome) => {
                log::debug!(
                    "roster: using structured source ({} individuals)",
                    outcome.individuals.len()
                );
                return Reconciled {
                    individuals: outcome.individuals,
                    report: LoadReport {
                        source: RosterSource::Structured,
                        structured: SourceStatus::Loaded { records: records.len() },
                        legacy: None,
                        duplicate_keys: outcome.duplicate_keys,
                        unparsed_rows: Vec::new(),
                        nameless_rows: 0,
                    },
                };
            }
            Err(e) => {
                log::warn!("roster: structured source rejected, falling back to legacy: {e}");
                SourceStatus::Malformed(e.to_string())
            }
        },
        SourceState::Malformed(reason) => {
            log::warn!("roster: structured source unreadable, falling back to legacy: {reason}");
            SourceStatus::Malformed(reason)
        }
        SourceState::Missing => SourceStatus::Missing,
    };

    let legacy = load_legacy();
    let legacy_status = legacy.status(|rows| rows.len());
    if let SourceStatus::Malformed(reason) = &legacy_status {
        log::warn!("roster: legacy source unreadable: {reason}");
    }

    let outcome = individuals_from_legacy(&legacy.into_data());
    if !outcome.unparsed_rows.is_empty() {
        log::warn!(
            "roster: {} legacy row(s) with unreadable scores",
            outcome.unparsed_rows.len()
        );
    }

    Reconciled {
        individuals: outcome.individuals,
        report: LoadReport {
            source: RosterSource::Legacy,
            structured: structured_status,
            legacy: Some(legacy_status),
            duplicate_keys: Vec::new(),
            unparsed_rows: outcome.unparsed_rows,
            nameless_rows: outcome.nameless_rows,
        },
    }
}
