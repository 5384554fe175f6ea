// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Error, FrequencySolver, Result, SolveOutcome, SolverResult};

#[cfg(test)]
#[path = "./vcocalc_test.rs"]
mod vcocalc_test;

static RESULT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"Achieved: (\d+[.]\d+) MHz\nFBDIV: (\d+) [(]VCO = (\d+) MHz[)]\nPD1: (\d+)\nPD2: (\d+)",
    )
    .expect("solver result pattern is a valid regex")
});

/// Runs the pico-sdk `vcocalc.py` script as a subprocess.
#[derive(Clone, Debug)]
pub struct VcocalcSolver {
    interpreter: String,
    script: PathBuf,
}

impl VcocalcSolver {
    /// Create a solver that runs `script` with `interpreter`, without
    /// checking that either exists.
    pub fn new<I, S>(interpreter: I, script: S) -> Self
    where
        I: Into<String>,
        S: Into<PathBuf>,
    {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
        }
    }

    /// Locate the solver script as configured.
    ///
    /// Fails when no sdk path is configured, the sdk path is not a
    /// directory, or the script cannot be found under it.
    pub fn from_config(config: &freqfind_config::Solver) -> Result<Self> {
        Self::from_config_with_env(config, |key| std::env::var_os(key))
    }

    /// Like [`Self::from_config`], reading environment variables
    /// through `lookup` instead of the process environment.
    pub fn from_config_with_env<F>(config: &freqfind_config::Solver, lookup: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Option<OsString>,
    {
        let Some(sdk_path) = config.resolve_sdk_path_from(lookup) else {
            return Err(Error::Unavailable(format!(
                "no sdk path configured, set the {} environment variable",
                freqfind_config::PICO_SDK_PATH_VAR
            )));
        };
        if !sdk_path.is_dir() {
            return Err(Error::Unavailable(format!(
                "sdk path is not a directory: {}",
                sdk_path.display()
            )));
        }
        let script = config.script_path(&sdk_path);
        if !script.is_file() {
            return Err(Error::Unavailable(format!(
                "could not find the solver script at: {}",
                script.display()
            )));
        }
        tracing::debug!(script = %script.display(), "located solver script");
        Ok(Self::new(config.interpreter.clone(), script))
    }

    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    /// The command that solves for the given target frequency.
    pub fn command(&self, target_freq: f64) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.interpreter);
        // debug formatting always keeps the decimal point, eg: 250.0
        cmd.arg(&self.script).arg(format!("{target_freq:?}"));
        cmd
    }
}

#[async_trait::async_trait]
impl FrequencySolver for VcocalcSolver {
    async fn solve(&self, target_freq: f64) -> Result<SolveOutcome> {
        let mut cmd = self.command(target_freq);
        cmd.stdin(std::process::Stdio::null());
        tracing::trace!("{:?}", cmd);
        // Not using `tokio::process` here because it relies on `SIGCHLD` to know
        // when the process is done, which can be unreliable if something else
        // is trapping signals.
        let output = tokio::task::spawn_blocking(move || cmd.output())
            .await?
            .map_err(|err| Error::ProcessSpawnError(self.interpreter.clone(), err))?;

        if !output.status.success() {
            return Err(Error::ExecutionFailure {
                // a process killed by a signal has no exit code
                code: output.status.code().unwrap_or(1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(parse_solver_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse the report printed by the solver.
///
/// The report must contain exactly one result block, anything else
/// means that no configuration could be found.
pub fn parse_solver_output(stdout: &str) -> SolveOutcome {
    let mut matches = RESULT_PATTERN.captures_iter(stdout);
    let (Some(caps), None) = (matches.next(), matches.next()) else {
        return SolveOutcome::NotFound;
    };

    let parsed = result_from_captures(&caps);
    if parsed.is_none() {
        tracing::debug!("solver reported values out of range: {}", &caps[0]);
    }
    parsed.into()
}

fn result_from_captures(caps: &regex::Captures<'_>) -> Option<SolverResult> {
    Some(SolverResult {
        achieved_freq: caps[1].parse().ok()?,
        fbdiv: caps[2].parse().ok()?,
        vco: caps[3].parse().ok()?,
        pd1: caps[4].parse().ok()?,
        pd2: caps[5].parse().ok()?,
    })
}
