//! Read commands: `list`, `groups`, `show`, `stats`, `compare`, `export`.

use std::path::PathBuf;

use clap::Subcommand;
use quantiv_core::{Entity, Individual};
use quantiv_io::json::write_json;
use quantiv_io::RosterLoad;
use quantiv_stats::compare::{compare_assessments, AssessmentComparison};
use quantiv_stats::{
    group_statistics, national_statistics, summary_statistics, Comparison, EntityReport, GroupSummary,
    PopulationReport, SummaryStatistics,
};
use serde::Serialize;

use crate::util::{fmt_num, fmt_signed, pad_right, print_json};
use crate::{CliError, Context};

#[derive(Subcommand)]
pub enum StatsTarget {
    /// Statistics over one individual's observations
    Individual { last_name: String, first_name: String },

    /// Statistics over every member's observations
    Group { name: String },

    /// Statistics over the whole population (mean replaced by the override when set)
    National,
}

#[derive(Subcommand)]
pub enum CompareTarget {
    /// Compare an individual against the population and its own group
    #[command(after_help = "\
Examples:
  quantiv compare individual Dupont Jean
  quantiv compare individual Dupont Jean --json")]
    Individual { last_name: String, first_name: String },

    /// Compare a group against the population
    Group { name: String },
}

const NAME_WIDTH: usize = 28;
const GROUP_WIDTH: usize = 10;

// ============================================================================
// lookups
// ============================================================================

fn load(ctx: &Context) -> RosterLoad {
    let load = ctx.store.load_roster();
    if !load.report.unparsed_rows.is_empty() {
        log::warn!(
            "{} legacy row(s) with unreadable scores (kept with no observations)",
            load.report.unparsed_rows.len()
        );
    }
    load
}

fn find_individual<'r>(
    load: &'r RosterLoad,
    last_name: &str,
    first_name: &str,
) -> Result<&'r Individual, CliError> {
    load.roster.find(last_name, first_name).ok_or_else(|| {
        CliError::not_found(format!("no individual named {} {}", last_name, first_name))
            .with_hint("names are matched exactly after trimming; see `quantiv list`")
    })
}

fn group_not_found(name: &str) -> CliError {
    CliError::not_found(format!("no group named '{}'", name)).with_hint("see `quantiv groups`")
}

// ============================================================================
// list / groups
// ============================================================================

#[derive(Serialize)]
struct ListOutput<'a> {
    source: String,
    individuals: Vec<&'a Individual>,
}

pub fn cmd_list(ctx: &Context, group: Option<String>) -> Result<(), CliError> {
    let load = load(ctx);
    let individuals: Vec<&Individual> = load
        .roster
        .iter()
        .filter(|i| group.as_deref().map_or(true, |g| i.group_name == g))
        .collect();

    if ctx.json {
        return print_json(&ListOutput { source: load.report.source.to_string(), individuals });
    }

    let p = ctx.precision();
    println!("{} {} {:>6} {:>8}", pad_right("NAME", NAME_WIDTH), pad_right("GROUP", GROUP_WIDTH), "N", "MEAN");
    for ind in &individuals {
        let mean = summary_statistics(&ind.observations)
            .map(|s| fmt_num(s.mean, p))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} {} {:>6} {:>8}",
            pad_right(&ind.display_name(), NAME_WIDTH),
            pad_right(&ind.group_name, GROUP_WIDTH),
            ind.observations.len(),
            mean
        );
    }
    eprintln!("{} individual(s), {} source", individuals.len(), load.report.source);
    Ok(())
}

pub fn cmd_groups(ctx: &Context) -> Result<(), CliError> {
    let load = load(ctx);
    let summaries: Vec<GroupSummary> = load.roster.groups().iter().map(GroupSummary::from_group).collect();

    if ctx.json {
        return print_json(&summaries);
    }

    let p = ctx.precision();
    println!("{} {:>8} {:>8} {:>8}", pad_right("GROUP", GROUP_WIDTH), "MEMBERS", "MEAN", "MEDIAN");
    for g in &summaries {
        println!(
            "{} {:>8} {:>8} {:>8}",
            pad_right(&g.name, GROUP_WIDTH),
            g.members,
            fmt_num(g.mean, p),
            fmt_num(g.median, p)
        );
    }
    let ungrouped = load.roster.ungrouped().count();
    if ungrouped > 0 {
        eprintln!("{} individual(s) without a group", ungrouped);
    }
    Ok(())
}

// ============================================================================
// show
// ============================================================================

#[derive(Serialize)]
struct ShowOutput<'a> {
    individual: &'a Individual,
    assessments: Vec<AssessmentComparison>,
}

pub fn cmd_show(ctx: &Context, last_name: &str, first_name: &str) -> Result<(), CliError> {
    let load = load(ctx);
    let ind = find_individual(&load, last_name, first_name)?;
    let assessments = compare_assessments(ind, &load.registry);

    if ctx.json {
        return print_json(&ShowOutput { individual: ind, assessments });
    }

    let p = ctx.precision();
    println!("{}", ind.display_name());
    println!("group: {}", if ind.has_group() { ind.group_name.as_str() } else { "-" });

    if ind.scores.is_empty() {
        let values: Vec<String> = ind.observations.iter().map(|v| fmt_num(*v, p)).collect();
        println!("observations: {}", if values.is_empty() { "-".to_string() } else { values.join(", ") });
    } else if load.registry.is_empty() {
        println!();
        for (name, score) in &ind.scores {
            println!("  {} {:>8}", pad_right(name, 16), fmt_num(*score, p));
        }
    } else {
        println!();
        for (idx, def) in load.registry.iter().enumerate() {
            let score = ind.observations.get(idx).copied().unwrap_or(0.0);
            let reference = def
                .reference_value
                .map(|r| format!("  (national {})", fmt_num(r, p)))
                .unwrap_or_default();
            println!("  {} {:>8}{}", pad_right(&def.name, 16), fmt_num(score, p), reference);
        }
    }

    if !assessments.is_empty() {
        println!();
        println!("vs reference values:");
        for row in &assessments {
            println!(
                "  {} {:>8} {:>8}%  {}",
                pad_right(&row.assessment, 16),
                fmt_signed(row.difference, p),
                fmt_signed(row.percent_difference, p),
                row.verdict
            );
        }
    }
    Ok(())
}

// ============================================================================
// stats
// ============================================================================

#[derive(Serialize)]
struct StatsOutput {
    name: String,
    kind: &'static str,
    stats: Option<SummaryStatistics>,
}

pub fn cmd_stats(ctx: &Context, target: StatsTarget) -> Result<(), CliError> {
    let load = load(ctx);
    let output = match target {
        StatsTarget::Individual { last_name, first_name } => {
            let ind = find_individual(&load, &last_name, &first_name)?;
            StatsOutput {
                name: ind.display_name(),
                kind: "individual",
                stats: summary_statistics(&ind.observations),
            }
        }
        StatsTarget::Group { name } => {
            let group = load.roster.group(&name).ok_or_else(|| group_not_found(&name))?;
            StatsOutput { name: group.name.clone(), kind: "group", stats: group_statistics(&group) }
        }
        StatsTarget::National => {
            let national = ctx.store.load_national_override();
            StatsOutput {
                name: "national".to_string(),
                kind: "national",
                stats: national_statistics(load.roster.individuals(), &national),
            }
        }
    };

    if ctx.json {
        return print_json(&output);
    }

    println!("{} ({})", output.name, output.kind);
    match output.stats {
        Some(s) => print_summary(&s, ctx.precision()),
        None => println!("  no data"),
    }
    Ok(())
}

fn print_summary(s: &SummaryStatistics, p: usize) {
    println!("  count   {:>10}", s.count);
    println!("  mean    {:>10}", fmt_num(s.mean, p));
    println!("  median  {:>10}", fmt_num(s.median, p));
    println!("  std dev {:>10}", fmt_num(s.std_dev, p));
    println!("  min     {:>10}", fmt_num(s.min, p));
    println!("  q1      {:>10}", fmt_num(s.q1, p));
    println!("  q3      {:>10}", fmt_num(s.q3, p));
    println!("  max     {:>10}", fmt_num(s.max, p));
}

// ============================================================================
// compare
// ============================================================================

pub fn cmd_compare(ctx: &Context, target: CompareTarget) -> Result<(), CliError> {
    let load = load(ctx);
    let national = ctx.store.load_national_override();

    let report = match &target {
        CompareTarget::Individual { last_name, first_name } => {
            let ind = find_individual(&load, last_name, first_name)?;
            EntityReport::build(&Entity::Individual(ind), &load.roster, &national)
        }
        CompareTarget::Group { name } => {
            let group = load.roster.group(name).ok_or_else(|| group_not_found(name))?;
            EntityReport::build(&Entity::Group(&group), &load.roster, &national)
        }
    };

    if ctx.json {
        return print_json(&report);
    }

    let p = ctx.precision();
    println!("{} ({})", report.name, report.kind);
    if report.summary.is_none() {
        println!("  no data");
        return Ok(());
    }
    match &report.national {
        Some(cmp) => print_comparison("national", cmp, p),
        None => println!("  national: no data"),
    }
    if let Some(group) = &report.group {
        print_comparison(&format!("group {}", group.name), &group.comparison, p);
    }
    if national.is_set() {
        eprintln!("note: national mean overridden");
    }
    Ok(())
}

fn print_comparison(label: &str, cmp: &Comparison, p: usize) {
    println!();
    println!("  vs {}: {}", label, cmp.verdict);
    println!("  {:<8} {:>10} {:>10} {:>10} {:>9}", "FIELD", "VALUE", "BENCH", "DIFF", "DIFF %");
    for f in &cmp.fields {
        println!(
            "  {:<8} {:>10} {:>10} {:>10} {:>8}%",
            f.field.to_string(),
            fmt_num(f.entity, p),
            fmt_num(f.benchmark, p),
            fmt_signed(f.difference, p),
            fmt_signed(f.percent_difference, p)
        );
    }
}

// ============================================================================
// export
// ============================================================================

pub fn cmd_export(ctx: &Context, output: Option<PathBuf>) -> Result<(), CliError> {
    let load = load(ctx);
    let national = ctx.store.load_national_override();
    let report = PopulationReport::build(&load.roster, &national);

    match output {
        Some(path) => {
            write_json(&path, &report)?;
            eprintln!("wrote {} ({} group(s))", path.display(), report.groups.len());
            Ok(())
        }
        None => print_json(&report),
    }
}
