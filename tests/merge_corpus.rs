//! Merge corpus tests
//!
//! Golden-file merge of the fixture requirements plus the behaviours a
//! consolidated requirements file has to guarantee.

mod fixtures;

use fixtures::{fixture, CLEAN_INPUTS, CONFLICTING_INPUT, GOLDEN_OUTPUT};
use reqfuse::{merge, MergeOptions, Merger, PassThroughPlacement};

fn clean_blobs() -> Vec<String> {
    CLEAN_INPUTS.iter().map(|name| fixture(name)).collect()
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Category 1: Golden output
// =============================================================================

#[test]
fn test_fixtures_match_golden() {
    let outcome = Merger::default().merge_blobs(&clean_blobs()).unwrap();
    assert_eq!(outcome.render(true), fixture(GOLDEN_OUTPUT));
}

#[test]
fn test_golden_is_fixed_point() {
    let golden = fixture(GOLDEN_OUTPUT);
    let outcome = Merger::default().merge_blobs(&[golden.as_str()]).unwrap();
    assert_eq!(outcome.render(true), golden);
}

#[test]
fn test_input_order_does_not_change_sorted_entries() {
    let mut blobs = clean_blobs();
    let forward = Merger::default().merge_blobs(&blobs).unwrap();
    blobs.reverse();
    let backward = Merger::default().merge_blobs(&blobs).unwrap();

    let render = |o: &reqfuse::MergeOutcome| o.entries().iter().map(|e| e.render()).collect::<Vec<_>>();
    // Extras order and display names follow first occurrence, so compare keys and constraints
    let keys = |o: &reqfuse::MergeOutcome| {
        o.entries()
            .iter()
            .map(|e| (e.key.clone(), e.constraint_label()))
            .collect::<Vec<_>>()
    };
    assert_eq!(keys(&forward), keys(&backward));
    assert_eq!(render(&forward).len(), 7);
}

// =============================================================================
// Category 2: Conflicts
// =============================================================================

#[test]
fn test_conflicting_fixture_rejected() {
    let mut blobs = clean_blobs();
    blobs.push(fixture(CONFLICTING_INPUT));

    let err = Merger::default().merge_blobs(&blobs).unwrap_err();
    assert_eq!(err.package, "requests");
    assert_eq!(err.first.constraint.to_string(), "==2.31.0");
    assert_eq!(err.first.source_index, 1);
    assert_eq!(err.second.constraint.to_string(), "==2.28.0");
    assert_eq!(err.second.source_index, 3);
    assert_eq!(err.second.line_number, 2);
}

#[test]
fn test_operator_mismatch_is_conflict() {
    let err = merge(&["torch>=2.2\n", "torch<=3.0\n"], false).unwrap_err();
    assert_eq!(err.package, "torch");
}

#[test]
fn test_compatible_release_vs_pin_is_conflict() {
    assert!(merge(&["jinja2~=3.1\n", "Jinja2==3.1.2\n"], false).is_err());
}

#[test]
fn test_not_equal_duplicates_are_fine() {
    let output = merge(&["urllib3!=2.0.0\n", "urllib3!=2.0.0\n"], false).unwrap();
    assert_eq!(output, lines(&["urllib3!=2.0.0"]));
}

// =============================================================================
// Category 3: Pass-through lines
// =============================================================================

#[test]
fn test_header_placement_on_fixtures() {
    let merger = Merger::new(MergeOptions {
        pass_through: PassThroughPlacement::Header,
        ..Default::default()
    });
    let output = merger.merge_blobs(&clean_blobs()).unwrap().lines();
    assert_eq!(output.first().map(String::as_str), Some("# generated by tool"));
    assert_eq!(output[1], "celery[redis,msgpack]==5.3.6");
    assert_eq!(output.last().map(String::as_str), Some("--index-url https://pypi.org/simple"));
}

#[test]
fn test_keep_order_on_fixtures() {
    let merger = Merger::new(MergeOptions {
        order_preserving: true,
        ..Default::default()
    });
    let outcome = merger.merge_blobs(&clean_blobs()).unwrap();
    let names: Vec<&str> = outcome.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Django",
            "djangorestframework",
            "requests",
            "psycopg2-binary",
            "Jinja2",
            "celery",
            "python_dateutil",
        ]
    );
}

#[test]
fn test_comment_only_inputs() {
    let output = merge(&["# nothing yet\n", "\n\n"], false).unwrap();
    assert_eq!(output, lines(&["# nothing yet"]));
}

#[test]
fn test_empty_inputs() {
    let output = merge(&["", ""], false).unwrap();
    assert!(output.is_empty());
    let none: [&str; 0] = [];
    assert!(merge(&none, false).unwrap().is_empty());
}
