// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use freqfind_solver::FrequencySolver;
use futures::{StreamExt, TryStreamExt};

use crate::{Candidate, Error, FrequencyRequest, RankedEntry, Result, ResultIndex};

#[cfg(test)]
#[path = "./search_test.rs"]
mod search_test;

/// Ranks the solver's answers for every multiple of a requested frequency.
pub struct FrequencySearch<S> {
    solver: S,
    max_concurrent_solves: usize,
}

impl<S> FrequencySearch<S>
where
    S: FrequencySolver,
{
    /// Create a search that runs one solve at a time.
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            max_concurrent_solves: 1,
        }
    }

    /// Allow up to this many solves to be in flight at once.
    ///
    /// Results are still consumed in multiplier order, so the
    /// ranking is the same for any value. Zero is treated as one.
    pub fn with_max_concurrent_solves(mut self, max_concurrent_solves: usize) -> Self {
        self.max_concurrent_solves = max_concurrent_solves.max(1);
        self
    }

    /// Ask the solver about a single candidate.
    ///
    /// Returns `None` when no configuration can reach the target.
    pub async fn evaluate(&self, candidate: Candidate) -> Result<Option<RankedEntry>> {
        if candidate.target_freq <= 0.0 {
            tracing::debug!(
                multiplier = candidate.multiplier,
                "skipping non-positive target frequency {}",
                candidate.target_freq
            );
            return Ok(None);
        }

        tracing::debug!(
            multiplier = candidate.multiplier,
            "solving for {} MHz",
            candidate.target_freq
        );
        let Some(result) = self.solver.solve(candidate.target_freq).await?.found() else {
            tracing::debug!(
                multiplier = candidate.multiplier,
                "no configuration reaches {} MHz",
                candidate.target_freq
            );
            return Ok(None);
        };
        Ok(Some(RankedEntry::new(candidate, result)))
    }

    /// Evaluate every candidate of the request, grouping them by error.
    ///
    /// The returned index is empty when nothing was feasible. Any
    /// solver failure stops the search and is returned as is.
    pub async fn build_index(&self, request: &FrequencyRequest) -> Result<ResultIndex> {
        let range = request.multiplier_range()?;
        tracing::debug!(
            "searching {} multipliers of {} MHz, from {} to {}",
            range.len(),
            request.requested_freq,
            range.min,
            range.max,
        );

        let index = futures::stream::iter(range.candidates(request.requested_freq))
            .map(|candidate| self.evaluate(candidate))
            .buffered(self.max_concurrent_solves)
            .try_fold(ResultIndex::default(), |mut index, entry| async move {
                if let Some(entry) = entry {
                    index.insert(entry);
                }
                Ok(index)
            })
            .await?;

        tracing::debug!(
            "found {} feasible configurations in {} error groups",
            index.len(),
            index.group_count()
        );
        Ok(index)
    }

    /// Search the request, failing when no configuration is feasible.
    pub async fn run(&self, request: &FrequencyRequest) -> Result<ResultIndex> {
        let index = self.build_index(request).await?;
        if index.is_empty() {
            let range = request.multiplier_range()?;
            return Err(Error::NoResults {
                min_multiplier: range.min,
                max_multiplier: range.max,
            });
        }
        Ok(index)
    }
}
