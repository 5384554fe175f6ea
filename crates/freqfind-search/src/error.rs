// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Diagnostic, Debug, Error)]
pub enum Error {
    #[error("Invalid request: {0}")]
    #[diagnostic(code(freqfind::invalid_input))]
    InvalidInput(String),

    #[error(transparent)]
    #[diagnostic(forward(0))]
    Solver(#[from] freqfind_solver::Error),

    #[error("No feasible configuration found for multipliers {min_multiplier} through {max_multiplier}")]
    #[diagnostic(
        code(freqfind::no_results),
        help("Try widening the range with --min_freq/--max_freq")
    )]
    NoResults {
        min_multiplier: i64,
        max_multiplier: i64,
    },
}
