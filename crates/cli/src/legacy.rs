//! `quantiv legacy`: the flat-record file.

use clap::Subcommand;
use quantiv_core::score::parse_score_list;
use quantiv_core::Individual;
use quantiv_recon::LegacyRow;
use serde::Serialize;

use crate::util::pad_right;
use crate::{CliError, Context};

#[derive(Subcommand)]
pub enum LegacyCommands {
    /// Append a row (no deduplication)
    #[command(after_help = "\
Examples:
  quantiv legacy add Dupont Jean --group A1 --data 12,15,18")]
    Add {
        last_name: String,
        first_name: String,

        #[arg(long, default_value = "")]
        group: String,

        /// Comma-separated observations
        #[arg(long, default_value = "", value_name = "VALUES")]
        data: String,
    },

    /// Delete every row with this name
    Delete { last_name: String, first_name: String },

    /// Change the group and/or observations of the first row with this name
    Update {
        last_name: String,
        first_name: String,

        #[arg(long)]
        group: Option<String>,

        /// Comma-separated observations
        #[arg(long, value_name = "VALUES")]
        data: Option<String>,
    },

    /// Case-insensitive lookup by name or by group
    #[command(after_help = "\
Examples:
  quantiv legacy search --name dupont jean
  quantiv legacy search --group a1")]
    Search {
        #[arg(long, num_args = 2, value_names = ["LAST", "FIRST"], conflicts_with = "group", required_unless_present = "group")]
        name: Option<Vec<String>>,

        #[arg(long)]
        group: Option<String>,
    },

    /// Remove every row, keeping the header
    Clear {
        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },
}

pub fn cmd_legacy(ctx: &Context, cmd: LegacyCommands) -> Result<(), CliError> {
    match cmd {
        LegacyCommands::Add { last_name, first_name, group, data } => {
            let observations = parse_score_list("data", &data)?;
            let individual = Individual::new(last_name, first_name, group, observations);
            ctx.store.save_individual(&individual)?;
            eprintln!("added {}", individual.display_name());
            Ok(())
        }
        LegacyCommands::Delete { last_name, first_name } => {
            let removed = ctx.store.delete_individual(&last_name, &first_name)?;
            if removed == 0 {
                eprintln!("no row for {} {}", last_name, first_name);
            } else {
                eprintln!("deleted {} row(s)", removed);
            }
            Ok(())
        }
        LegacyCommands::Update { last_name, first_name, group, data } => {
            if group.is_none() && data.is_none() {
                return Err(CliError::usage("nothing to update").with_hint("pass --group and/or --data"));
            }
            let observations = data.as_deref().map(|d| parse_score_list("data", d)).transpose()?;
            let updated =
                ctx.store
                    .update_individual(&last_name, &first_name, group.as_deref(), observations.as_deref())?;
            if !updated {
                return Err(CliError::not_found(format!("no row for {} {}", last_name, first_name)));
            }
            eprintln!("updated {} {}", last_name, first_name);
            Ok(())
        }
        LegacyCommands::Search { name, group } => {
            let rows = match (name, group) {
                (Some(name), _) if name.len() == 2 => ctx.store.search_by_name(&name[0], &name[1]),
                (_, Some(group)) => ctx.store.search_by_group(&group),
                _ => return Err(CliError::usage("pass --name LAST FIRST or --group GROUP")),
            };
            print_rows(ctx, &rows)
        }
        LegacyCommands::Clear { yes } => {
            if !yes {
                return Err(CliError::usage("refusing to clear the legacy file")
                    .with_hint("re-run with --yes"));
            }
            ctx.store.clear_legacy()?;
            eprintln!("cleared {}", ctx.store.paths().legacy.display());
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct RowOutput<'a> {
    last_name: &'a str,
    first_name: &'a str,
    group_name: &'a str,
    data: &'a str,
}

fn print_rows(ctx: &Context, rows: &[LegacyRow]) -> Result<(), CliError> {
    if ctx.json {
        let out: Vec<RowOutput> = rows
            .iter()
            .map(|r| RowOutput {
                last_name: &r.last_name,
                first_name: &r.first_name,
                group_name: &r.group_name,
                data: &r.data,
            })
            .collect();
        return crate::util::print_json(&out);
    }
    for r in rows {
        println!(
            "{} {} {}",
            pad_right(&format!("{} {}", r.last_name, r.first_name), 28),
            pad_right(&r.group_name, 10),
            r.data
        );
    }
    eprintln!("{} row(s)", rows.len());
    Ok(())
}
