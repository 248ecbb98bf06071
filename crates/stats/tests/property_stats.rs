// Property-based tests for the statistics engine.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use quantiv_core::{Individual, NationalOverride, Roster};
use quantiv_stats::*;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

/// Rounding slack for comparisons between separately computed fields.
const EPS: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Scores as entered: mostly grades on a 0..20 scale, sometimes wider.
fn arb_score() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => (0u32..=40).prop_map(|half| half as f64 / 2.0),
        1 => -1000.0..1000.0f64,
    ]
}

fn arb_values() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(arb_score(), 1..40)
}

/// Group names drawn from a small pool so groups collide; "" and " " mean
/// no group.
fn arb_group() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("A1".to_string()),
        Just("B2".to_string()),
        Just("C3".to_string()),
        Just("".to_string()),
        Just(" ".to_string()),
    ]
}

fn arb_roster() -> impl Strategy<Value = Roster> {
    proptest::collection::vec(
        (arb_group(), proptest::collection::vec(arb_score(), 0..6)),
        0..25,
    )
    .prop_map(|rows| {
        Roster::new(
            rows.into_iter()
                .enumerate()
                .map(|(i, (group, obs))| Individual::new(format!("Nom{i}"), "Prenom", group, obs))
                .collect(),
        )
    })
}

// ---------------------------------------------------------------------------
// Summary invariants
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn quantiles_are_ordered(values in arb_values()) {
        let s = summary_statistics(&values).unwrap();
        prop_assert!(s.min <= s.q1 + EPS, "min {} > q1 {}", s.min, s.q1);
        prop_assert!(s.q1 <= s.median + EPS, "q1 {} > median {}", s.q1, s.median);
        prop_assert!(s.median <= s.q3 + EPS, "median {} > q3 {}", s.median, s.q3);
        prop_assert!(s.q3 <= s.max + EPS, "q3 {} > max {}", s.q3, s.max);
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn mean_within_range_and_count_matches(values in arb_values()) {
        let s = summary_statistics(&values).unwrap();
        let slack = EPS * s.max.abs().max(s.min.abs()).max(1.0);
        prop_assert!(s.min - slack <= s.mean && s.mean <= s.max + slack);
        prop_assert_eq!(s.count, values.len());
        prop_assert!(s.std_dev >= 0.0);
        prop_assert!(s.std_dev <= (s.max - s.min) + slack);
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn summary_ignores_input_order(mut values in arb_values()) {
        let forward = summary_statistics(&values).unwrap();
        values.reverse();
        let backward = summary_statistics(&values).unwrap();
        prop_assert_eq!(forward.median, backward.median);
        prop_assert_eq!(forward.q1, backward.q1);
        prop_assert_eq!(forward.q3, backward.q3);
        prop_assert_eq!((forward.min, forward.max), (backward.min, backward.max));
    }
}

// ---------------------------------------------------------------------------
// Comparison invariants
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn zero_benchmark_never_divides(values in arb_values()) {
        let entity = summary_statistics(&values).unwrap();
        let mut bench = summary_statistics(&[0.0]).unwrap();
        bench.mean = 0.0;
        let cmp = compare(&entity, &bench);
        for f in &cmp.fields {
            prop_assert!(f.percent_difference.is_finite(), "{} not finite", f.field);
            if f.benchmark == 0.0 {
                prop_assert_eq!(f.percent_difference, 0.0);
            }
        }
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn verdict_follows_mean_difference(a in arb_values(), b in arb_values()) {
        let sa = summary_statistics(&a).unwrap();
        let sb = summary_statistics(&b).unwrap();
        let cmp = compare(&sa, &sb);
        let expected = if sa.mean > sb.mean {
            Verdict::Above
        } else if sa.mean < sb.mean {
            Verdict::Below
        } else {
            Verdict::Equal
        };
        prop_assert_eq!(cmp.verdict, expected);
        prop_assert_eq!(compare(&sa, &sa).verdict, Verdict::Equal);
    }
}

// ---------------------------------------------------------------------------
// Groups and population
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn groups_partition_the_roster(roster in arb_roster()) {
        let groups = roster.groups();
        let grouped: usize = groups.iter().map(|g| g.len()).sum();
        prop_assert_eq!(grouped + roster.ungrouped().count(), roster.len());
        for g in &groups {
            prop_assert!(!g.is_empty());
            prop_assert!(g.members.iter().all(|m| m.group_name == g.name));
        }
        let mut names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        names.sort();
        names.dedup();
        prop_assert_eq!(names.len(), groups.len());
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn national_override_only_touches_mean(roster in arb_roster(), m in arb_score()) {
        let plain = national_statistics(roster.individuals(), &NationalOverride::default());
        let overridden = national_statistics(roster.individuals(), &NationalOverride::new(Some(m)));
        match (plain, overridden) {
            (None, None) => prop_assert!(roster.observations().is_empty()),
            (Some(p), Some(o)) => {
                prop_assert_eq!(o.mean, m);
                prop_assert_eq!(o.median, p.median);
                prop_assert_eq!(o.std_dev, p.std_dev);
                prop_assert_eq!(o.count, p.count);
            }
            _ => prop_assert!(false, "override changed data presence"),
        }
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn population_report_covers_every_group(roster in arb_roster()) {
        let report = PopulationReport::build(&roster, &NationalOverride::default());
        let members: usize = report.groups.iter().map(|g| g.members).sum();
        prop_assert_eq!(members + report.ungrouped, report.individuals);
        for g in &report.groups {
            if g.stats.is_none() {
                prop_assert_eq!((g.mean, g.median), (0.0, 0.0));
            }
        }
    }
}
