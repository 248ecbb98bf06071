// Assembled reports for one entity or the whole population

use quantiv_core::{Entity, Group, NationalOverride, Roster};
use serde::Serialize;

use crate::aggregate::{group_mean, group_median, group_statistics, national_statistics};
use crate::compare::{compare, Comparison};
use crate::summary::{summary_statistics, SummaryStatistics};

/// Everything shown for a single individual or group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityReport {
    pub name: String,
    pub kind: &'static str,
    /// `None` when the entity has no observations.
    pub summary: Option<SummaryStatistics>,
    pub national: Option<Comparison>,
    /// Set only for an individual whose group is non-empty and present in
    /// the roster.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupBenchmark>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBenchmark {
    pub name: String,
    pub comparison: Comparison,
}

impl EntityReport {
    pub fn build(entity: &Entity<'_>, roster: &Roster, national: &NationalOverride) -> Self {
        let summary = summary_statistics(&entity.observations());
        let national_stats = national_statistics(roster.individuals(), national);

        let national_cmp = match (&summary, &national_stats) {
            (Some(s), Some(n)) => Some(compare(s, n)),
            _ => None,
        };

        let group = match (entity, &summary) {
            (Entity::Individual(ind), Some(s)) if ind.has_group() => roster
                .group(&ind.group_name)
                .and_then(|g| group_statistics(&g).map(|gs| (g.name.clone(), gs)))
                .map(|(name, gs)| GroupBenchmark { name, comparison: compare(s, &gs) }),
            _ => None,
        };

        EntityReport {
            name: entity.name(),
            kind: entity.kind(),
            summary,
            national: national_cmp,
            group,
        }
    }
}

/// Per-group line of a population report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub name: String,
    pub members: usize,
    pub mean: f64,
    pub median: f64,
    pub stats: Option<SummaryStatistics>,
}

impl GroupSummary {
    pub fn from_group(group: &Group<'_>) -> Self {
        GroupSummary {
            name: group.name.clone(),
            members: group.len(),
            mean: group_mean(group),
            median: group_median(group),
            stats: group_statistics(group),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationReport {
    pub individuals: usize,
    pub ungrouped: usize,
    pub national_override: Option<f64>,
    pub national: Option<SummaryStatistics>,
    pub groups: Vec<GroupSummary>,
}

impl PopulationReport {
    pub fn build(roster: &Roster, national: &NationalOverride) -> Self {
        PopulationReport {
            individuals: roster.len(),
            ungrouped: roster.ungrouped().count(),
            national_override: national.mean,
            national: national_statistics(roster.individuals(), national),
            groups: roster.groups().iter().map(GroupSummary::from_group).collect(),
        }
    }
}
