//! Property-based tests for scoring and sorting

use proptest::prelude::*;
use scorecard_core::{
    Audit, AuditRef, Category, CategoryRef, Group, Issue, IssueSeverity, PluginReport, Report,
};
use scorecard_scoring::{compare_audits, compare_issues, score_report, sort_report};
use std::cmp::Ordering;

const TITLES: [&str; 4] = ["Alpha", "Beta", "Beta", "Gamma"];

fn severity(rank: u8) -> IssueSeverity {
    match rank {
        0 => IssueSeverity::Info,
        1 => IssueSeverity::Warning,
        _ => IssueSeverity::Error,
    }
}

/// (score, value, title index, weight) per audit
fn audit_specs() -> impl Strategy<Value = Vec<(f64, f64, usize, f64)>> {
    prop::collection::vec((0.0f64..=1.0, 0.0f64..1000.0, 0usize..4, 0.0f64..10.0), 1..24)
}

/// (severity rank, line, message index) per issue
fn issue_specs() -> impl Strategy<Value = Vec<(u8, Option<u32>, u8)>> {
    prop::collection::vec((0u8..3, prop::option::of(1u32..50), 0u8..5), 0..16)
}

fn build_report(specs: &[(f64, f64, usize, f64)], issues: &[(u8, Option<u32>, u8)]) -> Report {
    let audits = specs.iter().enumerate().map(|(i, (score, value, title, _))| {
        let audit = Audit::new(format!("a{}", i), TITLES[*title], *score, *value);
        if i == 0 {
            audit.with_issues(
                issues
                    .iter()
                    .map(|(rank, line, message)| {
                        let issue = Issue::new(severity(*rank), format!("issue {}", message));
                        match line {
                            Some(line) => issue.at("src/lib.ts", *line),
                            None => issue,
                        }
                    })
                    .collect(),
            )
        } else {
            audit
        }
    });
    let refs = specs
        .iter()
        .enumerate()
        .map(|(i, (_, _, _, weight))| AuditRef::new(format!("a{}", i), *weight))
        .collect();
    let category_refs = std::iter::once(CategoryRef::group("p", "g", 2.0))
        .chain(
            specs
                .iter()
                .enumerate()
                .map(|(i, (_, _, _, weight))| CategoryRef::audit("p", format!("a{}", i), *weight)),
        )
        .collect();

    let date = "2026-04-01T12:00:00Z".parse().unwrap();
    Report::new("prop", "0.0.0", date)
        .with_plugin(
            PluginReport::new("p", "Plugin")
                .with_audits(audits)
                .with_group(Group::new("g", "Group", refs)),
        )
        .with_category(Category::new("c", "Category", category_refs))
}

proptest! {
    #[test]
    fn test_group_score_is_weighted_average(specs in audit_specs()) {
        let total: f64 = specs.iter().map(|s| s.3).sum();
        prop_assume!(total > 0.0);

        let report = build_report(&specs, &[]);
        let scored = score_report(&report).unwrap();
        let group = scored.plugins[0].group("g").unwrap();

        let expected = specs.iter().map(|s| s.3 * s.0).sum::<f64>() / total;
        prop_assert!((group.score - expected).abs() < 1e-9);
        prop_assert!(group.score >= 0.0 && group.score <= 1.0 + 1e-12);
    }

    #[test]
    fn test_sort_is_idempotent(specs in audit_specs(), issues in issue_specs()) {
        let total: f64 = specs.iter().map(|s| s.3).sum();
        prop_assume!(total > 0.0);

        let scored = score_report(&build_report(&specs, &issues)).unwrap();
        let once = sort_report(&scored).unwrap();
        let twice = sort_report(&once).unwrap();

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.fingerprint().unwrap(), twice.fingerprint().unwrap());
    }

    #[test]
    fn test_sort_preserves_membership(specs in audit_specs(), issues in issue_specs()) {
        let total: f64 = specs.iter().map(|s| s.3).sum();
        prop_assume!(total > 0.0);

        let scored = score_report(&build_report(&specs, &issues)).unwrap();
        let sorted = sort_report(&scored).unwrap();

        let mut before: Vec<&str> = scored.plugins[0].audits.iter().map(|a| a.slug.as_str()).collect();
        let mut after: Vec<&str> = sorted.plugins[0].audits.iter().map(|a| a.slug.as_str()).collect();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);

        prop_assert_eq!(scored.categories[0].refs.len(), sorted.categories[0].refs.len());
        prop_assert_eq!(scored.issue_counts(), sorted.issue_counts());
        prop_assert_eq!(scored.categories[0].score, sorted.categories[0].score);
    }

    #[test]
    fn test_audit_order_is_total(specs in audit_specs()) {
        let report = build_report(&specs, &[]);
        let audits = &report.plugins[0].audits;

        for (i, a) in audits.iter().enumerate() {
            for b in &audits[i + 1..] {
                prop_assert_ne!(compare_audits(a, b), Ordering::Equal);
                prop_assert_eq!(compare_audits(a, b), compare_audits(b, a).reverse());
            }
        }
    }

    #[test]
    fn test_issues_sorted_by_severity(issues in issue_specs()) {
        let report = build_report(&[(1.0, 0.0, 0, 1.0)], &issues);
        let sorted = sort_report(&score_report(&report).unwrap()).unwrap();
        let sorted_issues = sorted.plugins[0].audits[0].issues();

        for pair in sorted_issues.windows(2) {
            prop_assert!(pair[0].severity >= pair[1].severity);
            prop_assert_ne!(compare_issues(&pair[0], &pair[1]), Ordering::Greater);
        }
    }
}
