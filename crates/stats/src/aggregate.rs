use quantiv_core::{Group, Individual, NationalOverride};

use crate::summary::{self, summary_statistics, SummaryStatistics};

/// Mean of all member observations; 0.0 when the group has none.
pub fn group_mean(group: &Group<'_>) -> f64 {
    summary::mean(&group.observations()).unwrap_or(0.0)
}

/// Median of all member observations; 0.0 when the group has none.
pub fn group_median(group: &Group<'_>) -> f64 {
    summary::median(&group.observations()).unwrap_or(0.0)
}

pub fn group_statistics(group: &Group<'_>) -> Option<SummaryStatistics> {
    summary_statistics(&group.observations())
}

/// Summary over every individual's observations, with the mean replaced by
/// the override when one is set. Nothing else is overridden.
pub fn national_statistics(
    population: &[Individual],
    national: &NationalOverride,
) -> Option<SummaryStatistics> {
    let values: Vec<f64> = population
        .iter()
        .flat_map(|i| i.observations.iter().copied())
        .collect();
    let mut stats = summary_statistics(&values)?;
    if let Some(mean) = national.mean {
        stats.mean = mean;
    }
    Some(stats)
}
