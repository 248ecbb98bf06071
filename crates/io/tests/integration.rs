use std::fs;
use std::path::{Path, PathBuf};

use quantiv_config::StoragePaths;
use quantiv_core::{AssessmentDefinition, Individual};
use quantiv_io::{Store, StudentRecord};
use quantiv_recon::{RosterSource, SourceStatus};
use tempfile::tempdir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture_store(name: &str) -> Store {
    Store::new(StoragePaths::in_dir(fixtures_dir().join(name)))
}

/// Copy a fixture set into a scratch directory so the test may write to it.
fn scratch_store(name: &str, dir: &Path) -> Store {
    for entry in fs::read_dir(fixtures_dir().join(name)).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), dir.join(entry.file_name())).unwrap();
    }
    Store::new(StoragePaths::in_dir(dir))
}

// -------------------------------------------------------------------------
// Source selection
// -------------------------------------------------------------------------

#[test]
fn legacy_only_scenario() {
    let load = fixture_store("legacy").load_roster();
    assert_eq!(load.report.source, RosterSource::Legacy);
    assert_eq!(load.roster.len(), 2);

    let groups = load.roster.groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].name, "A1");
    assert_eq!(groups[1].name, "B2");
    assert!(groups.iter().all(|g| g.len() == 1));

    let dupont = load.roster.find("Dupont", "Jean").unwrap();
    assert_eq!(dupont.observations, vec![12.0, 15.0, 18.0]);
}

#[test]
fn structured_roster_is_authoritative() {
    let load = fixture_store("structured").load_roster();
    assert_eq!(load.report.source, RosterSource::Structured);
    assert_eq!(load.report.legacy, None);
    assert_eq!(load.roster.len(), 3);
    assert!(load.roster.find("Dupont", "Jean").is_none(), "legacy rows must not be merged in");

    let durand = load.roster.find("Durand", "Paul").unwrap();
    assert_eq!(durand.observations, vec![10.0, 0.0]);

    // Registry order, not stored order.
    let lefevre = load.roster.find("Lefèvre", "Camille").unwrap();
    assert_eq!(lefevre.last_name, "Lefèvre");
    assert_eq!(lefevre.observations, vec![12.0, 14.0]);
    assert_eq!(lefevre.observations.len(), lefevre.scores.len());
}

#[test]
fn broken_roster_falls_back_to_legacy() {
    let load = fixture_store("broken").load_roster();
    assert_eq!(load.report.source, RosterSource::Legacy);
    assert!(matches!(load.report.structured, SourceStatus::Malformed(_)));
    assert_eq!(load.report.legacy, Some(SourceStatus::Loaded { records: 3 }));
    assert_eq!(load.roster.len(), 3);

    let petit = load.roster.find("Petit", "Luc").unwrap();
    assert!(petit.observations.is_empty());
    assert_eq!(load.report.unparsed_rows.len(), 1);
}

#[test]
fn groups_partition_every_fixture() {
    for name in ["legacy", "structured", "broken"] {
        let load = fixture_store(name).load_roster();
        let grouped: usize = load.roster.groups().iter().map(|g| g.len()).sum();
        let ungrouped = load.roster.ungrouped().count();
        assert_eq!(grouped + ungrouped, load.roster.len(), "fixture {name}");
    }
}

// -------------------------------------------------------------------------
// Writes
// -------------------------------------------------------------------------

#[test]
fn save_student_round_trip_is_idempotent() {
    let dir = tempdir().unwrap();
    let store = scratch_store("structured", dir.path());

    for score in [8.0, 9.0, 13.0] {
        let record = StudentRecord::new("Durand", "Paul").group("B2").score("DS1", score).score("DS2", 11.0);
        store.save_student(&record).unwrap();
    }

    let individuals = store.load_all_individuals();
    let matches: Vec<&Individual> = individuals
        .iter()
        .filter(|i| i.last_name == "Durand" && i.first_name == "Paul")
        .collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].group_name, "B2");
    assert_eq!(matches[0].observations, vec![13.0, 11.0]);
    assert_eq!(individuals.len(), 3);
}

#[test]
fn first_structured_save_hides_legacy_file() {
    let dir = tempdir().unwrap();
    let store = scratch_store("legacy", dir.path());
    assert_eq!(store.load_all_individuals().len(), 2);

    store.save_student(&StudentRecord::new("Durand", "Paul").group("A1")).unwrap();
    let load = store.load_roster();
    assert_eq!(load.report.source, RosterSource::Structured);
    assert_eq!(load.roster.len(), 1);
}

#[test]
fn reordering_registry_changes_structured_derivation_only() {
    let dir = tempdir().unwrap();
    let store = scratch_store("structured", dir.path());
    store
        .save_note_definitions(vec![AssessmentDefinition::new("DS2"), AssessmentDefinition::new("DS1")])
        .unwrap();
    let lefevre = store
        .load_all_individuals()
        .into_iter()
        .find(|i| i.first_name == "Camille")
        .unwrap();
    assert_eq!(lefevre.observations, vec![14.0, 12.0]);

    let legacy_dir = tempdir().unwrap();
    let legacy_store = scratch_store("legacy", legacy_dir.path());
    legacy_store
        .save_note_definitions(vec![AssessmentDefinition::new("Z"), AssessmentDefinition::new("Y")])
        .unwrap();
    let dupont = legacy_store.load_all_individuals().into_iter().next().unwrap();
    assert_eq!(dupont.observations, vec![12.0, 15.0, 18.0]);
}

#[test]
fn legacy_append_then_load() {
    let dir = tempdir().unwrap();
    let store = Store::new(StoragePaths::in_dir(dir.path()));
    store.save_individual(&Individual::new("Dupont", "Jean", "A1", vec![12.0, 15.0, 18.0])).unwrap();
    store.save_individual(&Individual::new("Martin", "Sophie", "", vec![14.5])).unwrap();

    let load = store.load_roster();
    assert_eq!(load.roster.len(), 2);
    assert_eq!(load.roster.groups().len(), 1);
    assert_eq!(load.roster.find("Martin", "Sophie").unwrap().observations, vec![14.5]);
}
