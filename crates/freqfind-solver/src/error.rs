// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Diagnostic, Debug, Error)]
pub enum Error {
    #[error("Solver unavailable: {0}")]
    #[diagnostic(
        code(freqfind::solver_unavailable),
        help("Set PICO_SDK_PATH (or solver.sdk_path) to a valid pico-sdk checkout")
    )]
    Unavailable(String),

    #[error("Failed to spawn {0} process")]
    #[diagnostic(
        code(freqfind::solver_unavailable),
        help("Check that the solver interpreter is installed and on PATH")
    )]
    ProcessSpawnError(String, #[source] std::io::Error),

    #[error("Solver exited with code {code}")]
    #[diagnostic(code(freqfind::solver_failed))]
    ExecutionFailure {
        /// The exit code of the solver process
        code: i32,
        /// Everything the solver wrote to stderr
        stderr: String,
    },

    #[error("Solver task did not complete: {0}")]
    TaskJoinError(#[from] tokio::task::JoinError),
}
