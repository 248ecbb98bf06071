//! `quantiv student`: structured roster records.

use clap::Subcommand;
use quantiv_core::score::parse_score;
use quantiv_io::{StudentRecord, UpsertOutcome};

use crate::{CliError, Context};

#[derive(Subcommand)]
pub enum StudentCommands {
    /// Insert a student, or merge into the existing record with the same name
    #[command(after_help = "\
Given scores replace the stored scores as a whole.

Examples:
  quantiv student save Dupont Jean --group A1 --score DS1=12 --score DS2=15.5
  quantiv student save Dupont Jean --group B2")]
    Save {
        last_name: String,
        first_name: String,

        #[arg(long)]
        group: Option<String>,

        /// Assessment score. Repeatable.
        #[arg(long = "score", value_name = "NAME=VALUE")]
        scores: Vec<String>,
    },

    /// Delete every record with this name
    Delete { last_name: String, first_name: String },
}

pub fn cmd_student(ctx: &Context, cmd: StudentCommands) -> Result<(), CliError> {
    match cmd {
        StudentCommands::Save { last_name, first_name, group, scores } => {
            let record = build_record(last_name, first_name, group, &scores)?;
            let registry = ctx.store.load_notes();
            if let Some(scores) = &record.scores {
                for name in scores.keys().filter(|n| registry.get(n).is_none()) {
                    log::warn!("score for unregistered assessment '{}' is stored but not derived", name);
                }
            }
            let outcome = ctx.store.save_student(&record)?;
            let verb = match outcome {
                UpsertOutcome::Inserted => "added",
                UpsertOutcome::Updated => "updated",
            };
            eprintln!("{} {} {}", verb, record.last_name, record.first_name);
            Ok(())
        }
        StudentCommands::Delete { last_name, first_name } => {
            let removed = ctx.store.delete_student(&last_name, &first_name)?;
            if removed == 0 {
                eprintln!("no record for {} {}", last_name, first_name);
            } else {
                eprintln!("deleted {} record(s)", removed);
            }
            Ok(())
        }
    }
}

fn build_record(
    last_name: String,
    first_name: String,
    group: Option<String>,
    scores: &[String],
) -> Result<StudentRecord, CliError> {
    let mut record = StudentRecord::new(last_name, first_name);
    if let Some(group) = group {
        record = record.group(group);
    }
    for raw in scores {
        let (name, value) = raw
            .split_once('=')
            .ok_or_else(|| CliError::usage(format!("--score expects NAME=VALUE, got '{}'", raw)))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CliError::usage(format!("--score has no assessment name: '{}'", raw)));
        }
        record = record.score(name, parse_score(name, value)?);
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::{EXIT_USAGE, EXIT_VALIDATION};

    #[test]
    fn record_from_flags() {
        let record = build_record(
            "Dupont".into(),
            "Jean".into(),
            Some("A1".into()),
            &["DS1=12".to_string(), "DS2 = 15,5".to_string()],
        )
        .unwrap();
        assert_eq!(record.group_name.as_deref(), Some("A1"));
        let scores = record.scores.unwrap();
        assert_eq!(scores["DS1"], serde_json::json!(12.0));
        assert_eq!(scores["DS2"], serde_json::json!(15.5));
    }

    #[test]
    fn no_scores_leaves_stored_scores_alone() {
        let record = build_record("Dupont".into(), "Jean".into(), None, &[]).unwrap();
        assert!(record.scores.is_none());
        assert!(record.group_name.is_none());
    }

    #[test]
    fn bad_score_flags() {
        let err = build_record("D".into(), "J".into(), None, &["DS1".to_string()]).unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
        let err = build_record("D".into(), "J".into(), None, &["DS1=douze".to_string()]).unwrap_err();
        assert_eq!(err.code, EXIT_VALIDATION);
    }
}
