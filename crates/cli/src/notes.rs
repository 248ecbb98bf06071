//! `quantiv notes`: the assessment registry.

use clap::Subcommand;
use quantiv_core::score::parse_score;
use quantiv_core::{AssessmentDefinition, AssessmentRegistry};
use quantiv_recon::SourceState;

use crate::util::{fmt_num, pad_right, print_json};
use crate::{CliError, Context};

#[derive(Subcommand)]
pub enum NotesCommands {
    /// List assessments in registry order
    List,

    /// Replace the whole registry. Order given is the derivation order.
    #[command(after_help = "\
Each assessment is NAME or NAME=REFERENCE.

Examples:
  quantiv notes set DS1=11.5 DS2 TP=12")]
    Set {
        #[arg(required = true, value_name = "NAME[=REFERENCE]")]
        definitions: Vec<String>,
    },

    /// Append one assessment
    Add {
        name: String,

        /// National reference value
        #[arg(long, value_name = "VALUE")]
        national: Option<String>,
    },

    /// Remove one assessment by name
    Remove { name: String },
}

pub fn cmd_notes(ctx: &Context, cmd: NotesCommands) -> Result<(), CliError> {
    match cmd {
        NotesCommands::List => cmd_notes_list(ctx),
        NotesCommands::Set { definitions } => {
            let defs = definitions
                .iter()
                .map(|d| parse_definition(d))
                .collect::<Result<Vec<_>, _>>()?;
            let registry = ctx.store.save_note_definitions(defs)?;
            eprintln!("{} assessment(s) saved", registry.len());
            Ok(())
        }
        NotesCommands::Add { name, national } => {
            let mut registry = registry_for_update(ctx)?;
            let mut def = AssessmentDefinition::new(name);
            if let Some(raw) = national {
                def.reference_value = Some(parse_score("national", &raw)?);
            }
            registry.push(def)?;
            ctx.store.save_notes(&registry)?;
            eprintln!("{} assessment(s) saved", registry.len());
            Ok(())
        }
        NotesCommands::Remove { name } => {
            let mut registry = registry_for_update(ctx)?;
            if !registry.remove(name.trim()) {
                return Err(CliError::not_found(format!("no assessment named '{}'", name)));
            }
            ctx.store.save_notes(&registry)?;
            eprintln!("{} assessment(s) saved", registry.len());
            Ok(())
        }
    }
}

fn cmd_notes_list(ctx: &Context) -> Result<(), CliError> {
    let registry = ctx.store.load_notes();
    if ctx.json {
        return print_json(registry.definitions());
    }
    let p = ctx.precision();
    for def in &registry {
        let reference = def.reference_value.map(|v| fmt_num(v, p)).unwrap_or_else(|| "-".to_string());
        println!("{} {:>8}", pad_right(&def.name, 20), reference);
    }
    if registry.is_empty() {
        eprintln!("no assessments defined");
    }
    Ok(())
}

/// Current registry for an edit. An unreadable file is not silently replaced.
fn registry_for_update(ctx: &Context) -> Result<AssessmentRegistry, CliError> {
    match ctx.store.read_notes() {
        SourceState::Loaded(registry) => Ok(registry),
        SourceState::Missing => Ok(AssessmentRegistry::default()),
        SourceState::Malformed(reason) => Err(CliError::write(format!(
            "refusing to rewrite unreadable {}: {}",
            ctx.store.paths().notes.display(),
            reason
        ))
        .with_hint("use `quantiv notes set` to replace it")),
    }
}

/// `NAME` or `NAME=REFERENCE`.
fn parse_definition(raw: &str) -> Result<AssessmentDefinition, CliError> {
    match raw.split_once('=') {
        Some((name, value)) => Ok(AssessmentDefinition {
            name: name.trim().to_string(),
            reference_value: Some(parse_score(name.trim(), value)?),
        }),
        None => Ok(AssessmentDefinition::new(raw.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_forms() {
        assert_eq!(parse_definition("DS1").unwrap(), AssessmentDefinition::new("DS1"));
        assert_eq!(
            parse_definition(" DS1 = 11,5").unwrap(),
            AssessmentDefinition::with_reference("DS1", 11.5)
        );
        let err = parse_definition("DS1=abc").unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_VALIDATION);
    }
}
