// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use miette::Diagnostic;
use thiserror::Error;

#[derive(Diagnostic, Debug, Error)]
pub enum Error {
    #[error("Cannot determine the user configuration directory")]
    #[diagnostic(
        code(freqfind::config::no_home),
        help("Set FREQFIND_SOLVER_SDK_PATH and related variables instead of a user config file")
    )]
    NoConfigDir,

    #[error("Cannot load config, lock has been poisoned: {0}")]
    LockPoisonedRead(String),
    #[error("Cannot update config, lock has been poisoned: {0}")]
    LockPoisonedWrite(String),

    #[error(transparent)]
    #[diagnostic(code(freqfind::config::invalid))]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
