// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use clap::Args;
use freqfind_search::solver::{self, FrequencySolver, VcocalcSolver};
use freqfind_search::{
    DEFAULT_MAX_FREQ,
    DEFAULT_MIN_FREQ,
    DEFAULT_REFERENCE_FREQ,
    ErrorGroup,
    FrequencyRequest,
    FrequencySearch,
    RankedEntry,
};
use miette::Result;

use crate::Run;

#[cfg(test)]
#[path = "./cmd_find_test.rs"]
mod cmd_find_test;

pub const COLUMNS_HELP: &str = "\
Columns:
    Error          -> Absolute difference between requested (multiplied) and achieved frequency
    Mult           -> Integer multiplier of the requested frequency
    Requested Freq -> Multiplied requested frequency (requested_freq * Mult)
    Achieved Freq  -> Possible frequency
    Over-/Undercl  -> Difference to the default frequency
    FBDIV          -> Feedback divider
    VCO            -> Voltage controlled oscillator frequency
    PD1            -> First post divider
    PD2            -> Second post divider";

pub trait Output: Default + Send + Sync {
    /// A line of output to display.
    fn println(&mut self, line: String);

    /// Diagnostic text from the solver, to be passed through unchanged.
    fn eprint(&mut self, text: &str);
}

#[derive(Default)]
pub struct Console {}

impl Output for Console {
    fn println(&mut self, line: String) {
        println!("{line}");
    }

    fn eprint(&mut self, text: &str) {
        eprint!("{text}");
    }
}

/// Find the clock configurations closest to a multiple of a frequency
#[derive(Args)]
pub struct Find<Output: Default = Console> {
    /// Desired frequency, in MHz
    #[clap(allow_negative_numbers = true)]
    pub requested_freq: f64,

    /// Print all results, by default only the closest match(es) are shown
    #[clap(long)]
    pub all: bool,

    /// The maximum frequency the CPU can be overclocked to
    #[clap(long = "max_freq", visible_alias = "max-freq", default_value_t = DEFAULT_MAX_FREQ)]
    pub max_freq: f64,

    /// The minimum frequency the CPU can run with
    #[clap(long = "min_freq", visible_alias = "min-freq", default_value_t = DEFAULT_MIN_FREQ)]
    pub min_freq: f64,

    /// The default CPU frequency used to calculate over-/underclock
    #[clap(
        long = "default_freq",
        visible_alias = "default-freq",
        default_value_t = DEFAULT_REFERENCE_FREQ
    )]
    pub default_freq: f64,

    /// The number of solver processes that may run at once
    ///
    /// Defaults to the search.max_concurrent_solves config value.
    #[clap(long)]
    pub max_concurrent_solves: Option<usize>,

    #[clap(skip)]
    pub(crate) output: Output,
}

impl<T: Output> Find<T> {
    pub fn request(&self) -> FrequencyRequest {
        FrequencyRequest::new(self.requested_freq)
            .with_bounds(self.min_freq, self.max_freq)
            .with_default_freq(self.default_freq)
            .with_show_all(self.all)
    }

    /// Search with the given solver and print the selected results.
    ///
    /// Returns the exit code for the process: the solver's own
    /// code when it fails, and 1 when nothing is feasible.
    pub async fn run_with_solver<S>(&mut self, solver: S, max_concurrent_solves: usize) -> Result<i32>
    where
        S: FrequencySolver,
    {
        let request = self.request();
        let search = FrequencySearch::new(solver).with_max_concurrent_solves(max_concurrent_solves);

        let index = match search.run(&request).await {
            Ok(index) => index,
            Err(freqfind_search::Error::NoResults { .. }) => {
                tracing::debug!("no feasible configuration for {} MHz", request.requested_freq);
                return Ok(1);
            }
            Err(freqfind_search::Error::Solver(solver::Error::ExecutionFailure { code, stderr })) => {
                self.output.eprint(&stderr);
                return Ok(code);
            }
            Err(err) => return Err(err.into()),
        };

        self.output.println(format_header());
        for group in index.select(request.selection()) {
            self.print_group(group, request.default_freq);
        }
        Ok(0)
    }

    fn print_group(&mut self, group: ErrorGroup<'_>, default_freq: f64) {
        for entry in group.entries {
            self.output
                .println(format_entry(group.abs_error, default_freq, entry));
        }
    }
}

#[async_trait::async_trait]
impl<T: Output> Run for Find<T> {
    type Output = i32;

    async fn run(&mut self) -> Result<Self::Output> {
        self.request().validate()?;

        let config = freqfind_config::get_config()?;
        let solver = VcocalcSolver::from_config(&config.solver)?;
        let max_concurrent_solves = self
            .max_concurrent_solves
            .unwrap_or(config.search.max_concurrent_solves);

        self.run_with_solver(solver, max_concurrent_solves).await
    }
}

/// The column titles of the result table.
pub fn format_header() -> String {
    format!(
        "{:>18}, {:>4}, {:>21}, {:>21}, {:>16}, {:>6}, {:>5}, {:>4}, {:>4}",
        "Error",
        "Mult",
        "Requested Freq",
        "Achieved Freq",
        "Over-/Undercl",
        "FBDIV",
        "VCO",
        "PD1",
        "PD2"
    )
}

/// One row of the result table.
pub fn format_entry(abs_error: f64, default_freq: f64, entry: &RankedEntry) -> String {
    format!(
        "{:>18.16}, {:>4}, {:>21.16}, {:>21.16}, {:>16.6}, {:>6}, {:>5}, {:>4}, {:>4}",
        abs_error,
        entry.multiplier,
        entry.requested_freq,
        entry.result.achieved_freq,
        entry.delta_from(default_freq),
        entry.result.fbdiv,
        entry.result.vco,
        entry.result.pd1,
        entry.result.pd2
    )
}
