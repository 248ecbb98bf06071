//! `quantiv-stats`: Statistics engine.
//!
//! Pure crate: takes individuals, groups or raw value sequences and returns
//! descriptive summaries and benchmark comparisons. No IO.

pub mod aggregate;
pub mod compare;
pub mod report;
pub mod summary;

pub use aggregate::{group_mean, group_median, group_statistics, national_statistics};
pub use compare::{
    compare, compare_assessments, AssessmentComparison, Comparison, FieldComparison, StatField, Verdict,
};
pub use report::{EntityReport, GroupBenchmark, GroupSummary, PopulationReport};
pub use summary::{summary_statistics, SummaryStatistics};
