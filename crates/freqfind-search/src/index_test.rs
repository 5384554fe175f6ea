// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use freqfind_solver::SolverResult;
use rstest::rstest;

use super::{RankedEntry, ResultIndex};
use crate::{Candidate, Selection};

fn entry(multiplier: i64, requested_freq: f64, achieved_freq: f64) -> RankedEntry {
    RankedEntry::new(
        Candidate::new(multiplier, requested_freq),
        SolverResult {
            achieved_freq,
            fbdiv: 100,
            vco: 1200,
            pd1: 4,
            pd2: 3,
        },
    )
}

fn multipliers(entries: &[RankedEntry]) -> Vec<i64> {
    entries.iter().map(|e| e.multiplier).collect()
}

#[rstest]
#[case(100.0, 100.5, 0.5)]
#[case(100.0, 99.5, -0.5)]
#[case(100.0, 100.0, 0.0)]
fn test_entry_error_is_signed(#[case] requested: f64, #[case] achieved: f64, #[case] error: f64) {
    let entry = entry(1, requested, achieved);
    assert_eq!(entry.error, error);
    assert_eq!(entry.abs_error(), error.abs());
    assert_eq!(entry.requested_freq, requested);
}

#[rstest]
fn test_entry_delta_from_reference() {
    let entry = entry(2, 66.0, 133.0);
    assert_eq!(entry.delta_from(125.0), 8.0);
    assert_eq!(entry.delta_from(150.0), -17.0);
}

#[rstest]
fn test_empty_index() {
    let index = ResultIndex::default();
    assert!(index.is_empty());
    assert_eq!(index.len(), 0);
    assert!(index.best().is_none());
    assert!(index.select(Selection::Best).is_empty());
    assert!(index.select(Selection::All).is_empty());
}

#[rstest]
fn test_opposite_errors_share_a_group() {
    let index: ResultIndex = [entry(1, 100.0, 100.5), entry(2, 100.0, 199.5)]
        .into_iter()
        .collect();
    assert_eq!(index.group_count(), 1);
    let best = index.best().unwrap();
    assert_eq!(best.abs_error, 0.5);
    assert_eq!(multipliers(best.entries), vec![1, 2]);
    assert_eq!(best.entries[0].error, 0.5);
    assert_eq!(best.entries[1].error, -0.5);
}

#[rstest]
fn test_equal_achieved_frequencies_are_not_merged() {
    // different multipliers may land on the same configuration
    let index: ResultIndex = [entry(2, 62.5, 125.0), entry(1, 125.0, 125.0)]
        .into_iter()
        .collect();
    assert_eq!(index.len(), 2);
    assert_eq!(multipliers(index.best().unwrap().entries), vec![1, 2]);
}

#[rstest]
fn test_groups_ascend_by_error() {
    let index: ResultIndex = [
        entry(1, 100.0, 102.0),
        entry(2, 100.0, 200.25),
        entry(3, 100.0, 301.0),
        entry(4, 100.0, 398.0),
    ]
    .into_iter()
    .collect();

    let groups = index.select(Selection::All);
    let errors: Vec<_> = groups.iter().map(|g| g.abs_error).collect();
    assert_eq!(errors, vec![0.25, 1.0, 2.0]);
    assert_eq!(multipliers(groups[2].entries), vec![1, 4]);

    let best = index.select(Selection::Best);
    assert_eq!(best.len(), 1);
    assert_eq!(multipliers(best[0].entries), vec![2]);
}

#[rstest]
fn test_nearly_equal_errors_are_separate_groups() {
    // 0.3 - 0.1 and 0.4 - 0.2 differ in the last bit
    let a = entry(1, 0.1, 0.3);
    let b = entry(2, 0.1, 0.4);
    assert_ne!(a.abs_error(), b.abs_error());
    assert!((a.abs_error() - b.abs_error()).abs() < 1e-15);

    let index: ResultIndex = [a, b].into_iter().collect();
    assert_eq!(index.group_count(), 2);
}

#[rstest]
fn test_selection_is_repeatable() {
    let entries = [
        entry(1, 48.0, 48.0),
        entry(2, 48.0, 96.0),
        entry(3, 48.0, 144.5),
    ];
    let first: ResultIndex = entries.into_iter().collect();
    let second: ResultIndex = entries.into_iter().collect();
    assert_eq!(first.select(Selection::All), second.select(Selection::All));
}
