// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use crate::Result;

/// One achievable PLL configuration reported by the solver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverResult {
    /// The frequency actually produced, in MHz
    pub achieved_freq: f64,
    /// Feedback divider
    pub fbdiv: u32,
    /// VCO frequency, in MHz
    pub vco: u32,
    /// First post divider
    pub pd1: u32,
    /// Second post divider
    pub pd2: u32,
}

/// The answer of a single solve.
///
/// Not finding a configuration is an expected outcome and is
/// distinct from the solver itself failing, which is an [`crate::Error`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SolveOutcome {
    Found(SolverResult),
    NotFound,
}

impl SolveOutcome {
    pub fn found(self) -> Option<SolverResult> {
        match self {
            SolveOutcome::Found(result) => Some(result),
            SolveOutcome::NotFound => None,
        }
    }
}

impl From<Option<SolverResult>> for SolveOutcome {
    fn from(value: Option<SolverResult>) -> Self {
        match value {
            Some(result) => SolveOutcome::Found(result),
            None => SolveOutcome::NotFound,
        }
    }
}

/// Computes the closest achievable clock configuration for a frequency.
#[async_trait::async_trait]
pub trait FrequencySolver: Send + Sync {
    /// Solve for the given target frequency, in MHz.
    async fn solve(&self, target_freq: f64) -> Result<SolveOutcome>;
}

#[async_trait::async_trait]
impl<T> FrequencySolver for &T
where
    T: FrequencySolver + ?Sized,
{
    async fn solve(&self, target_freq: f64) -> Result<SolveOutcome> {
        (**self).solve(target_freq).await
    }
}
