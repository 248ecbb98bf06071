// Persistence adapter
// The only component that touches on-disk state. Reads never fail: they
// degrade to an empty dataset and report why. Writes return a StoreError.

use quantiv_config::StoragePaths;
use quantiv_core::score::format_score_list;
use quantiv_core::{AssessmentDefinition, AssessmentRegistry, Individual, NationalOverride, Roster};
use quantiv_recon::{reconcile, LegacyRow, LoadReport, SourceState, SourceStatus};
use serde_json::Value;

use crate::error::StoreError;
use crate::json::{read_json, write_json};
use crate::legacy::{self, same_text};
use crate::roster::{self, StudentRecord, UpsertOutcome};

/// A freshly loaded population and how it was obtained.
#[derive(Debug, Clone)]
pub struct RosterLoad {
    pub roster: Roster,
    pub registry: AssessmentRegistry,
    pub report: LoadReport,
    pub registry_status: SourceStatus,
}

#[derive(Debug, Clone)]
pub struct Store {
    paths: StoragePaths,
}

impl Store {
    pub fn new(paths: StoragePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    // -----------------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------------

    /// Load every individual, structured roster first, legacy file otherwise.
    pub fn load_roster(&self) -> RosterLoad {
        let notes = self.read_notes();
        if let SourceState::Malformed(reason) = &notes {
            log::warn!("{}: unreadable assessment registry: {reason}", self.paths.notes.display());
        }
        let registry_status = notes.status(|r| r.len());
        let registry = notes.into_data();

        let structured = self.read_students();
        let reconciled = reconcile(structured, &registry, || self.read_legacy_rows());

        log::debug!(
            "loaded {} individual(s) from {} source",
            reconciled.individuals.len(),
            reconciled.report.source
        );

        RosterLoad {
            roster: Roster::new(reconciled.individuals),
            registry,
            report: reconciled.report,
            registry_status,
        }
    }

    pub fn load_all_individuals(&self) -> Vec<Individual> {
        self.load_roster().roster.into_individuals()
    }

    /// Raw structured records, as stored.
    pub fn read_students(&self) -> SourceState<Vec<Value>> {
        read_json(&self.paths.roster)
    }

    pub fn load_students(&self) -> Vec<Value> {
        self.read_students().into_data()
    }

    /// Records for a rewrite. A missing file starts empty; an unreadable one
    /// is never overwritten.
    fn students_for_update(&self) -> Result<Option<Vec<Value>>, StoreError> {
        match self.read_students() {
            SourceState::Loaded(records) => Ok(Some(records)),
            SourceState::Missing => Ok(None),
            SourceState::Malformed(reason) => Err(StoreError::Unreadable {
                path: self.paths.roster.clone(),
                reason,
            }),
        }
    }

    /// Insert or shallow-merge a student in the structured roster.
    pub fn save_student(&self, record: &StudentRecord) -> Result<UpsertOutcome, StoreError> {
        let mut records = self.students_for_update()?.unwrap_or_default();
        let outcome = roster::upsert(&mut records, record);
        write_json(&self.paths.roster, &records)?;
        log::info!("student {} {}: {:?}", record.last_name, record.first_name, outcome);
        Ok(outcome)
    }

    /// Remove every structured record with the identity key. Returns how many
    /// were removed; zero is not an error.
    pub fn delete_student(&self, last_name: &str, first_name: &str) -> Result<usize, StoreError> {
        // No roster file: nothing to delete, and writing an empty one would
        // hide the legacy file from future loads.
        let Some(mut records) = self.students_for_update()? else {
            return Ok(0);
        };
        let removed = roster::remove(&mut records, last_name, first_name);
        write_json(&self.paths.roster, &records)?;
        log::info!("deleted {removed} structured record(s) for {last_name} {first_name}");
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Assessment registry
    // -----------------------------------------------------------------------

    pub fn read_notes(&self) -> SourceState<AssessmentRegistry> {
        read_json::<Vec<AssessmentDefinition>>(&self.paths.notes).map(AssessmentRegistry::from_stored)
    }

    pub fn load_notes(&self) -> AssessmentRegistry {
        let state = self.read_notes();
        if let SourceState::Malformed(reason) = &state {
            log::warn!("{}: unreadable assessment registry: {reason}", self.paths.notes.display());
        }
        state.into_data()
    }

    /// Replace the registry file.
    pub fn save_notes(&self, registry: &AssessmentRegistry) -> Result<(), StoreError> {
        write_json(&self.paths.notes, registry.definitions())
    }

    /// Validate a definition list, then replace the registry file.
    pub fn save_note_definitions(
        &self,
        definitions: Vec<AssessmentDefinition>,
    ) -> Result<AssessmentRegistry, StoreError> {
        let registry = AssessmentRegistry::new(definitions)?;
        self.save_notes(&registry)?;
        Ok(registry)
    }

    // -----------------------------------------------------------------------
    // National override
    // -----------------------------------------------------------------------

    pub fn read_national_override(&self) -> SourceState<NationalOverride> {
        read_json(&self.paths.national)
    }

    pub fn load_national_override(&self) -> NationalOverride {
        let state = self.read_national_override();
        if let SourceState::Malformed(reason) = &state {
            log::warn!("{}: unreadable national override: {reason}", self.paths.national.display());
        }
        state.into_data()
    }

    pub fn save_national_override(&self, value: &NationalOverride) -> Result<(), StoreError> {
        if let Some(mean) = value.mean {
            if !mean.is_finite() {
                return Err(quantiv_core::ValidationError::NotFinite {
                    field: "national mean".into(),
                    value: mean.to_string(),
                }
                .into());
            }
        }
        write_json(&self.paths.national, value)
    }

    // -----------------------------------------------------------------------
    // Legacy flat file
    // -----------------------------------------------------------------------

    pub fn read_legacy_rows(&self) -> SourceState<Vec<LegacyRow>> {
        legacy::read_rows(&self.paths.legacy)
    }

    fn legacy_for_update(&self) -> Result<Option<Vec<LegacyRow>>, StoreError> {
        match self.read_legacy_rows() {
            SourceState::Loaded(rows) => Ok(Some(rows)),
            SourceState::Missing => Ok(None),
            SourceState::Malformed(reason) => Err(StoreError::Unreadable {
                path: self.paths.legacy.clone(),
                reason,
            }),
        }
    }

    /// Append an individual to the legacy file. No deduplication.
    pub fn save_individual(&self, individual: &Individual) -> Result<(), StoreError> {
        let row = LegacyRow::new(
            individual.last_name.clone(),
            individual.first_name.clone(),
            individual.group_name.clone(),
            format_score_list(&individual.observations),
        );
        legacy::append_row(&self.paths.legacy, &row)?;
        log::info!("legacy entry added: {}", individual.display_name());
        Ok(())
    }

    /// Remove every legacy row for the identity key. Returns how many were
    /// removed; the file is only rewritten when something matched.
    pub fn delete_individual(&self, last_name: &str, first_name: &str) -> Result<usize, StoreError> {
        let Some(rows) = self.legacy_for_update()? else {
            return Ok(0);
        };
        match legacy::without(&rows, last_name, first_name) {
            Some(kept) => {
                legacy::rewrite(&self.paths.legacy, &kept)?;
                let removed = rows.len() - kept.len();
                log::info!("deleted {removed} legacy row(s) for {last_name} {first_name}");
                Ok(removed)
            }
            None => {
                log::info!("no legacy entry for {last_name} {first_name}");
                Ok(0)
            }
        }
    }

    /// Change the group and/or observations of the first matching legacy row.
    pub fn update_individual(
        &self,
        last_name: &str,
        first_name: &str,
        group_name: Option<&str>,
        observations: Option<&[f64]>,
    ) -> Result<bool, StoreError> {
        let Some(mut rows) = self.legacy_for_update()? else {
            return Ok(false);
        };
        let data = observations.map(format_score_list);
        if !legacy::update_first(&mut rows, last_name, first_name, group_name, data.as_deref()) {
            return Ok(false);
        }
        legacy::rewrite(&self.paths.legacy, &rows)?;
        Ok(true)
    }

    pub fn search_by_name(&self, last_name: &str, first_name: &str) -> Vec<LegacyRow> {
        self.read_legacy_rows()
            .into_data()
            .into_iter()
            .filter(|r| same_text(&r.last_name, last_name) && same_text(&r.first_name, first_name))
            .collect()
    }

    pub fn search_by_group(&self, group_name: &str) -> Vec<LegacyRow> {
        self.read_legacy_rows()
            .into_data()
            .into_iter()
            .filter(|r| same_text(&r.group_name, group_name))
            .collect()
    }

    /// Keep only the header.
    pub fn clear_legacy(&self) -> Result<(), StoreError> {
        legacy::rewrite(&self.paths.legacy, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantiv_recon::RosterSource;
    use std::fs;
    use tempfile::tempdir;

    fn store(dir: &std::path::Path) -> Store {
        Store::new(StoragePaths::in_dir(dir))
    }

    #[test]
    fn empty_directory_loads_empty_roster() {
        let dir = tempdir().unwrap();
        let load = store(dir.path()).load_roster();
        assert!(load.roster.is_empty());
        assert_eq!(load.report.source, RosterSource::Legacy);
        assert_eq!(load.report.structured, SourceStatus::Missing);
        assert_eq!(load.registry_status, SourceStatus::Missing);
    }

    #[test]
    fn save_student_upserts() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        let record = StudentRecord::new("Durand", "Paul").group("A1").score("DS1", 10.0);
        assert_eq!(store.save_student(&record).unwrap(), UpsertOutcome::Inserted);
        assert_eq!(store.save_student(&record).unwrap(), UpsertOutcome::Updated);
        assert_eq!(store.load_students().len(), 1);
    }

    #[test]
    fn save_student_over_duplicated_roster_reloads_new_values() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        fs::write(
            &store.paths().roster,
            r#"[{"nom":"Durand","prenom":"Paul","groupe":"A1"},{"nom":"Durand","prenom":"Paul","groupe":"A2"}]"#,
        )
        .unwrap();

        let outcome = store.save_student(&StudentRecord::new("Durand", "Paul").group("B2")).unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);
        let load = store.load_roster();
        assert_eq!(load.roster.len(), 1);
        assert_eq!(load.roster.find("Durand", "Paul").unwrap().group_name, "B2");
    }

    #[test]
    fn malformed_notes_fall_back_to_stored_score_order() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        fs::write(&store.paths().notes, "[{\"name\": 3}]").unwrap();
        store
            .save_student(&StudentRecord::new("Durand", "Paul").score("DS2", 8.0).score("DS1", 12.0))
            .unwrap();

        let load = store.load_roster();
        assert!(matches!(load.registry_status, SourceStatus::Malformed(_)));
        assert!(load.registry.is_empty());
        assert_eq!(load.roster.find("Durand", "Paul").unwrap().observations, vec![8.0, 12.0]);
    }

    #[test]
    fn save_student_refuses_to_clobber_unreadable_roster() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        fs::write(&store.paths().roster, "{ not json").unwrap();

        let err = store.save_student(&StudentRecord::new("Durand", "Paul")).unwrap_err();
        assert!(matches!(err, StoreError::Unreadable { .. }));
        assert_eq!(fs::read_to_string(&store.paths().roster).unwrap(), "{ not json");
    }

    #[test]
    fn delete_student_without_roster_file_writes_nothing() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        assert_eq!(store.delete_student("Durand", "Paul").unwrap(), 0);
        assert!(!store.paths().roster.exists());
    }

    #[test]
    fn delete_student_unknown_identity_is_ok() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        store.save_student(&StudentRecord::new("Durand", "Paul")).unwrap();
        assert_eq!(store.delete_student("Martin", "Sophie").unwrap(), 0);
        assert_eq!(store.delete_student("Durand", "Paul").unwrap(), 1);
        assert!(store.load_students().is_empty());
    }

    #[test]
    fn notes_round_trip_and_validation() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        store
            .save_note_definitions(vec![
                AssessmentDefinition::with_reference("DS1", 11.0),
                AssessmentDefinition::new("DS2"),
            ])
            .unwrap();
        let registry = store.load_notes();
        assert_eq!(registry.names(), vec!["DS1", "DS2"]);
        assert_eq!(registry.get("DS1").unwrap().reference_value, Some(11.0));

        let err = store
            .save_note_definitions(vec![AssessmentDefinition::new("X"), AssessmentDefinition::new("X")])
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.load_notes().len(), 2, "rejected list must not reach disk");
    }

    #[test]
    fn malformed_notes_load_as_empty() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        fs::write(&store.paths().notes, "[{\"name\": 3}]").unwrap();
        assert!(matches!(store.read_notes(), SourceState::Malformed(_)));
        assert!(store.load_notes().is_empty());
    }

    #[test]
    fn national_override_round_trip() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        assert_eq!(store.load_national_override(), NationalOverride::default());
        store.save_national_override(&NationalOverride::new(Some(11.5))).unwrap();
        assert_eq!(store.load_national_override().mean, Some(11.5));
        store.save_national_override(&NationalOverride::new(None)).unwrap();
        assert_eq!(store.load_national_override().mean, None);
        assert!(store.save_national_override(&NationalOverride::new(Some(f64::NAN))).is_err());
    }

    #[test]
    fn legacy_save_is_append_only() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        let ind = Individual::new("Dupont", "Jean", "A1", vec![12.0, 15.0, 18.0]);
        store.save_individual(&ind).unwrap();
        store.save_individual(&ind).unwrap();
        let rows = store.read_legacy_rows().loaded().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].data, "12,15,18");
    }

    #[test]
    fn legacy_update_delete_search_clear() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        store.save_individual(&Individual::new("Dupont", "Jean", "A1", vec![12.0])).unwrap();
        store.save_individual(&Individual::new("Martin", "Sophie", "B2", vec![14.0])).unwrap();

        assert!(store.update_individual("Dupont", "Jean", Some("B2"), Some(&[10.0, 11.5])).unwrap());
        assert!(!store.update_individual("Nobody", "Here", Some("B2"), None).unwrap());
        let found = store.search_by_name("dupont", "JEAN");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].data, "10,11.5");
        assert_eq!(store.search_by_group("b2").len(), 2);

        assert_eq!(store.delete_individual("Martin", "Sophie").unwrap(), 1);
        assert_eq!(store.delete_individual("Martin", "Sophie").unwrap(), 0);
        assert_eq!(store.read_legacy_rows().loaded().unwrap().len(), 1);

        store.clear_legacy().unwrap();
        assert_eq!(store.read_legacy_rows(), SourceState::Loaded(vec![]));
    }

    #[test]
    fn delete_individual_without_file() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        assert_eq!(store.delete_individual("Dupont", "Jean").unwrap(), 0);
        assert!(!store.paths().legacy.exists());
    }
}
