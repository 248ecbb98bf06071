use quantiv_core::{AssessmentRegistry, Individual};
use serde::Serialize;

use crate::summary::SummaryStatistics;

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatField {
    Mean,
    Median,
    StdDev,
    Min,
    Max,
    Q1,
    Q3,
    Count,
}

impl StatField {
    pub const ALL: [StatField; 8] = [
        StatField::Mean,
        StatField::Median,
        StatField::StdDev,
        StatField::Min,
        StatField::Max,
        StatField::Q1,
        StatField::Q3,
        StatField::Count,
    ];

    pub fn value(&self, stats: &SummaryStatistics) -> f64 {
        match self {
            Self::Mean => stats.mean,
            Self::Median => stats.median,
            Self::StdDev => stats.std_dev,
            Self::Min => stats.min,
            Self::Max => stats.max,
            Self::Q1 => stats.q1,
            Self::Q3 => stats.q3,
            Self::Count => stats.count as f64,
        }
    }
}

impl std::fmt::Display for StatField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mean => write!(f, "mean"),
            Self::Median => write!(f, "median"),
            Self::StdDev => write!(f, "std_dev"),
            Self::Min => write!(f, "min"),
            Self::Max => write!(f, "max"),
            Self::Q1 => write!(f, "q1"),
            Self::Q3 => write!(f, "q3"),
            Self::Count => write!(f, "count"),
        }
    }
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Above,
    Below,
    Equal,
}

impl Verdict {
    pub fn from_difference(difference: f64) -> Self {
        if difference > 0.0 {
            Self::Above
        } else if difference < 0.0 {
            Self::Below
        } else {
            Self::Equal
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Above => write!(f, "above"),
            Self::Below => write!(f, "below"),
            Self::Equal => write!(f, "equal"),
        }
    }
}

/// Difference as a percentage of `benchmark`; 0 when the benchmark is 0.
pub fn percent_difference(difference: f64, benchmark: f64) -> f64 {
    if benchmark == 0.0 {
        0.0
    } else {
        difference / benchmark * 100.0
    }
}

// ---------------------------------------------------------------------------
// Summary comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldComparison {
    pub field: StatField,
    pub entity: f64,
    pub benchmark: f64,
    pub difference: f64,
    pub percent_difference: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub fields: Vec<FieldComparison>,
    /// Decided on the mean alone.
    pub verdict: Verdict,
}

impl Comparison {
    pub fn field(&self, field: StatField) -> Option<&FieldComparison> {
        self.fields.iter().find(|f| f.field == field)
    }
}

/// Compare an entity's summary against a benchmark summary, field by field.
pub fn compare(entity: &SummaryStatistics, benchmark: &SummaryStatistics) -> Comparison {
    let fields: Vec<FieldComparison> = StatField::ALL
        .iter()
        .map(|&field| {
            let e = field.value(entity);
            let b = field.value(benchmark);
            let difference = e - b;
            FieldComparison {
                field,
                entity: e,
                benchmark: b,
                difference,
                percent_difference: percent_difference(difference, b),
            }
        })
        .collect();

    let verdict = Verdict::from_difference(entity.mean - benchmark.mean);
    Comparison { fields, verdict }
}

// ---------------------------------------------------------------------------
// Per-assessment comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentComparison {
    pub assessment: String,
    pub score: f64,
    pub reference: f64,
    pub difference: f64,
    pub percent_difference: f64,
    pub verdict: Verdict,
}

/// Compare each score against its assessment's reference value. Assessments
/// without a reference value are skipped.
///
/// Scores come from the individual's keyed scores (missing counts as 0, as in
/// derivation). An individual without keyed scores is read positionally from
/// its observations.
pub fn compare_assessments(
    individual: &Individual,
    registry: &AssessmentRegistry,
) -> Vec<AssessmentComparison> {
    registry
        .iter()
        .enumerate()
        .filter_map(|(idx, def)| {
            let reference = def.reference_value?;
            let score = if individual.scores.is_empty() {
                *individual.observations.get(idx)?
            } else {
                individual.scores.get(&def.name).copied().unwrap_or(0.0)
            };
            let difference = score - reference;
            Some(AssessmentComparison {
                assessment: def.name.clone(),
                score,
                reference,
                difference,
                percent_difference: percent_difference(difference, reference),
                verdict: Verdict::from_difference(difference),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::summary_statistics;
    use quantiv_core::AssessmentDefinition;
    use std::collections::BTreeMap;

    #[test]
    fn fields_and_verdict() {
        let entity = summary_statistics(&[12.0, 15.0, 18.0]).unwrap();
        let bench = summary_statistics(&[10.0, 12.0, 14.0]).unwrap();
        let cmp = compare(&entity, &bench);

        assert_eq!(cmp.fields.len(), 8);
        assert_eq!(cmp.verdict, Verdict::Above);
        let mean = cmp.field(StatField::Mean).unwrap();
        assert_eq!((mean.entity, mean.benchmark, mean.difference), (15.0, 12.0, 3.0));
        assert_eq!(mean.percent_difference, 25.0);
        let count = cmp.field(StatField::Count).unwrap();
        assert_eq!((count.difference, count.percent_difference), (0.0, 0.0));
    }

    #[test]
    fn verdict_uses_mean_only() {
        // Same mean, very different spread.
        let entity = summary_statistics(&[10.0, 10.0]).unwrap();
        let bench = summary_statistics(&[0.0, 20.0]).unwrap();
        let cmp = compare(&entity, &bench);
        assert_eq!(cmp.verdict, Verdict::Equal);
        assert!(cmp.field(StatField::StdDev).unwrap().difference < 0.0);

        let below = compare(&bench, &summary_statistics(&[11.0]).unwrap());
        assert_eq!(below.verdict, Verdict::Below);
    }

    #[test]
    fn zero_benchmark_gives_zero_percent() {
        let entity = summary_statistics(&[5.0, 9.0]).unwrap();
        let mut bench = summary_statistics(&[0.0]).unwrap();
        bench.mean = 0.0;
        let cmp = compare(&entity, &bench);
        let mean = cmp.field(StatField::Mean).unwrap();
        assert_eq!(mean.difference, 7.0);
        assert_eq!(mean.percent_difference, 0.0);
        assert!(cmp.fields.iter().all(|f| f.percent_difference.is_finite()));
    }

    #[test]
    fn verdict_display() {
        assert_eq!(Verdict::Above.to_string(), "above");
        assert_eq!(Verdict::from_difference(0.0), Verdict::Equal);
        assert_eq!(StatField::StdDev.to_string(), "std_dev");
    }

    #[test]
    fn assessments_against_reference_values() {
        let registry = AssessmentRegistry::new(vec![
            AssessmentDefinition::with_reference("DS1", 10.0),
            AssessmentDefinition::new("DS2"),
            AssessmentDefinition::with_reference("TP", 0.0),
        ])
        .unwrap();
        let mut scores = BTreeMap::new();
        scores.insert("DS1".to_string(), 12.0);
        scores.insert("DS2".to_string(), 8.0);
        let ind = Individual::new("Durand", "Paul", "A1", registry.align(&scores)).with_scores(scores);

        let rows = compare_assessments(&ind, &registry);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].assessment, "DS1");
        assert_eq!(rows[0].percent_difference, 20.0);
        assert_eq!(rows[0].verdict, Verdict::Above);
        assert_eq!(rows[1].assessment, "TP");
        assert_eq!(rows[1].score, 0.0);
        assert_eq!(rows[1].percent_difference, 0.0);
        assert_eq!(rows[1].verdict, Verdict::Equal);
    }

    #[test]
    fn assessments_positional_for_legacy_individual() {
        let registry = AssessmentRegistry::new(vec![
            AssessmentDefinition::with_reference("DS1", 10.0),
            AssessmentDefinition::with_reference("DS2", 10.0),
        ])
        .unwrap();
        let ind = Individual::new("Dupont", "Jean", "A1", vec![9.0]);
        let rows = compare_assessments(&ind, &registry);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].verdict, Verdict::Below);
    }
}
