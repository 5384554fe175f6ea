// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use std::cmp::Ordering;
use std::collections::BTreeMap;

use freqfind_solver::SolverResult;

use crate::{Candidate, Selection};

#[cfg(test)]
#[path = "./index_test.rs"]
mod index_test;

/// A solver result for one candidate, with its approximation error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankedEntry {
    pub multiplier: i64,
    /// The multiplied frequency that was asked of the solver
    pub requested_freq: f64,
    pub result: SolverResult,
    /// Achieved minus requested frequency
    pub error: f64,
}

impl RankedEntry {
    pub fn new(candidate: Candidate, result: SolverResult) -> Self {
        Self {
            multiplier: candidate.multiplier,
            requested_freq: candidate.target_freq,
            error: result.achieved_freq - candidate.target_freq,
            result,
        }
    }

    pub fn abs_error(&self) -> f64 {
        self.error.abs()
    }

    /// How far the achieved frequency is above (or below) the reference.
    pub fn delta_from(&self, reference_freq: f64) -> f64 {
        self.result.achieved_freq - reference_freq
    }
}

/// Orders error magnitudes by their exact value.
///
/// Errors that differ in the last bit are different keys and are
/// never grouped together.
#[derive(Clone, Copy, Debug)]
struct ErrorKey(f64);

impl PartialEq for ErrorKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ErrorKey {}

impl PartialOrd for ErrorKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ErrorKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// All entries that share one error magnitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ErrorGroup<'a> {
    pub abs_error: f64,
    /// In ascending multiplier order
    pub entries: &'a [RankedEntry],
}

/// Ranked entries grouped by the magnitude of their error.
#[derive(Clone, Debug, Default)]
pub struct ResultIndex {
    groups: BTreeMap<ErrorKey, Vec<RankedEntry>>,
}

impl ResultIndex {
    /// Add an entry to the group for its error magnitude.
    ///
    /// Entries with the same magnitude are kept in multiplier order
    /// and are never merged, even when they achieve the same frequency.
    pub fn insert(&mut self, entry: RankedEntry) {
        let group = self.groups.entry(ErrorKey(entry.abs_error())).or_default();
        let position = group.partition_point(|e| e.multiplier <= entry.multiplier);
        group.insert(position, entry);
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The total number of entries across all groups
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// The group with the smallest error, if any.
    pub fn best(&self) -> Option<ErrorGroup<'_>> {
        self.groups().next()
    }

    /// Every group, in ascending order of error.
    pub fn groups(&self) -> impl Iterator<Item = ErrorGroup<'_>> {
        self.groups.iter().map(|(key, entries)| ErrorGroup {
            abs_error: key.0,
            entries,
        })
    }

    /// The groups to report for the given selection.
    pub fn select(&self, selection: Selection) -> Vec<ErrorGroup<'_>> {
        match selection {
            Selection::Best => self.best().into_iter().collect(),
            Selection::All => self.groups().collect(),
        }
    }
}

impl Extend<RankedEntry> for ResultIndex {
    fn extend<T: IntoIterator<Item = RankedEntry>>(&mut self, iter: T) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

impl FromIterator<RankedEntry> for ResultIndex {
    fn from_iter<T: IntoIterator<Item = RankedEntry>>(iter: T) -> Self {
        let mut index = Self::default();
        index.extend(iter);
        index
    }
}
