// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

//! Adapters for the external PLL solver that computes achievable clocks.

mod error;
mod solver;
mod vcocalc;

pub use error::{Error, Result};
pub use solver::{FrequencySolver, SolveOutcome, SolverResult};
pub use vcocalc::{VcocalcSolver, parse_solver_output};
