// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use clap::Parser;
use freqfind_search::solver::{self, FrequencySolver, SolveOutcome, SolverResult};
use freqfind_search::{Candidate, RankedEntry};
use rstest::rstest;

use super::{Find, Output, format_entry, format_header};
use crate::Run;

const HEADER: &str = "             Error, Mult,        Requested Freq,         Achieved Freq,    Over-/Undercl,  FBDIV,   VCO,  PD1,  PD2";
const ROW_MULT_1: &str = "0.5000000000000000,    1,   50.0000000000000000,   50.5000000000000000,       -74.500000,    101,  1212,    6,    4";
const ROW_MULT_2: &str = "0.5000000000000000,    2,  100.0000000000000000,   99.5000000000000000,       -25.500000,    101,  1212,    6,    2";
const ROW_MULT_3: &str = "2.0000000000000000,    3,  150.0000000000000000,  152.0000000000000000,        27.000000,    101,  1212,    4,    2";

/// Stands in for vcocalc.py, answering for multiples of 50 MHz.
const FAKE_VCOCALC: &str = r#"case "$1" in
  50.0) printf 'Achieved: 50.5 MHz\nFBDIV: 101 (VCO = 1212 MHz)\nPD1: 6\nPD2: 4\n' ;;
  100.0) printf 'Achieved: 99.5 MHz\nFBDIV: 101 (VCO = 1212 MHz)\nPD1: 6\nPD2: 2\n' ;;
  150.0) printf 'Achieved: 152.0 MHz\nFBDIV: 101 (VCO = 1212 MHz)\nPD1: 4\nPD2: 2\n' ;;
esac
"#;

#[derive(Default)]
struct OutputToVec {
    vec: Vec<String>,
    stderr: String,
}

impl Output for OutputToVec {
    fn println(&mut self, line: String) {
        self.vec.push(line);
    }

    fn eprint(&mut self, text: &str) {
        self.stderr.push_str(text);
    }
}

#[derive(Parser)]
struct Opt {
    #[clap(flatten)]
    find: Find<OutputToVec>,
}

/// Answers like the fake script above, without spawning anything.
struct MultiplesOf50;

#[async_trait::async_trait]
impl FrequencySolver for MultiplesOf50 {
    async fn solve(&self, target_freq: f64) -> solver::Result<SolveOutcome> {
        let result = |achieved_freq, pd1, pd2| {
            SolveOutcome::Found(SolverResult {
                achieved_freq,
                fbdiv: 101,
                vco: 1212,
                pd1,
                pd2,
            })
        };
        Ok(match target_freq as i64 {
            50 => result(50.5, 6, 4),
            100 => result(99.5, 6, 2),
            150 => result(152.0, 4, 2),
            _ => SolveOutcome::NotFound,
        })
    }
}

struct NeverFound;

#[async_trait::async_trait]
impl FrequencySolver for NeverFound {
    async fn solve(&self, _target_freq: f64) -> solver::Result<SolveOutcome> {
        Ok(SolveOutcome::NotFound)
    }
}

struct Crashes;

#[async_trait::async_trait]
impl FrequencySolver for Crashes {
    async fn solve(&self, _target_freq: f64) -> solver::Result<SolveOutcome> {
        Err(solver::Error::ExecutionFailure {
            code: 2,
            stderr: String::from("usage: vcocalc.py [-h] mhz\n"),
        })
    }
}

#[rstest]
fn test_find_defaults() {
    let opt = Opt::try_parse_from(["freqfind", "48"]).unwrap();
    let request = opt.find.request();
    assert_eq!(request.requested_freq, 48.0);
    assert_eq!(request.min_freq, 16.0);
    assert_eq!(request.max_freq, 420.0);
    assert_eq!(request.default_freq, 125.0);
    assert!(!request.show_all);
    assert_eq!(opt.find.max_concurrent_solves, None);
}

#[rstest]
#[case(&["freqfind", "12.5", "--all", "--max_freq", "300", "--min_freq", "20", "--default_freq", "133"])]
#[case(&["freqfind", "--max-freq=300", "--min-freq=20", "--default-freq=133", "--all", "12.5"])]
fn test_find_flags(#[case] args: &[&str]) {
    let opt = Opt::try_parse_from(args).unwrap();
    let request = opt.find.request();
    assert_eq!(request.requested_freq, 12.5);
    assert_eq!(request.min_freq, 20.0);
    assert_eq!(request.max_freq, 300.0);
    assert_eq!(request.default_freq, 133.0);
    assert!(request.show_all);
}

#[rstest]
fn test_find_requires_frequency() {
    assert!(Opt::try_parse_from(["freqfind"]).is_err());
    assert!(Opt::try_parse_from(["freqfind", "fast"]).is_err());
}

#[rstest]
#[tokio::test]
async fn test_find_rejects_negative_frequency() {
    let mut opt = Opt::try_parse_from(["freqfind", "-100"]).unwrap();
    let err = opt.find.run().await.unwrap_err();
    assert!(err.to_string().contains("must be positive"), "{err}");
    assert!(opt.find.output.vec.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_find_prints_best_group() {
    let mut opt = Opt::try_parse_from(["freqfind", "50", "--max_freq", "150"]).unwrap();
    let code = opt.find.run_with_solver(MultiplesOf50, 1).await.unwrap();
    assert_eq!(code, 0);
    assert_eq!(opt.find.output.vec, vec![HEADER, ROW_MULT_1, ROW_MULT_2]);
}

#[rstest]
#[tokio::test]
async fn test_find_prints_all_groups() {
    let mut opt = Opt::try_parse_from(["freqfind", "50", "--max_freq", "150", "--all"]).unwrap();
    let code = opt.find.run_with_solver(MultiplesOf50, 4).await.unwrap();
    assert_eq!(code, 0);
    assert_eq!(
        opt.find.output.vec,
        vec![HEADER, ROW_MULT_1, ROW_MULT_2, ROW_MULT_3]
    );
}

#[rstest]
#[tokio::test]
async fn test_find_without_results_prints_nothing() {
    let mut opt = Opt::try_parse_from(["freqfind", "50"]).unwrap();
    let code = opt.find.run_with_solver(NeverFound, 1).await.unwrap();
    assert_eq!(code, 1);
    assert!(opt.find.output.vec.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_find_passes_solver_failure_through() {
    let mut opt = Opt::try_parse_from(["freqfind", "50"]).unwrap();
    let code = opt.find.run_with_solver(Crashes, 1).await.unwrap();
    assert_eq!(code, 2);
    assert!(opt.find.output.vec.is_empty());
    assert_eq!(opt.find.output.stderr, "usage: vcocalc.py [-h] mhz\n");
}

#[rstest]
#[tokio::test]
#[serial_test::serial(config)]
async fn test_find_runs_configured_solver() {
    let tmpdir = tempfile::tempdir().unwrap();
    let script = tmpdir.path().join("vcocalc.sh");
    std::fs::write(&script, FAKE_VCOCALC).unwrap();

    let mut config = freqfind_config::Config::default();
    config.solver.sdk_path = Some(tmpdir.path().to_owned());
    config.solver.interpreter = String::from("sh");
    config.solver.script = script;
    config.make_current().unwrap();

    let mut opt = Opt::try_parse_from(["freqfind", "50", "--max_freq", "150"]).unwrap();
    let code = opt.find.run().await.unwrap();
    assert_eq!(code, 0);
    assert_eq!(opt.find.output.vec, vec![HEADER, ROW_MULT_1, ROW_MULT_2]);
}

#[rstest]
#[tokio::test]
#[serial_test::serial(config)]
async fn test_find_fails_without_solver() {
    let tmpdir = tempfile::tempdir().unwrap();
    let mut config = freqfind_config::Config::default();
    config.solver.sdk_path = Some(tmpdir.path().join("missing-sdk"));
    config.make_current().unwrap();

    let mut opt = Opt::try_parse_from(["freqfind", "50"]).unwrap();
    let err = opt.find.run().await.unwrap_err();
    assert!(err.to_string().contains("Solver unavailable"), "{err}");
    assert!(opt.find.output.vec.is_empty());
}

#[rstest]
fn test_format_header() {
    assert_eq!(format_header(), HEADER);
}

#[rstest]
fn test_format_entry_relative_to_default() {
    let entry = RankedEntry::new(
        Candidate::new(2, 50.0),
        SolverResult {
            achieved_freq: 99.5,
            fbdiv: 101,
            vco: 1212,
            pd1: 6,
            pd2: 2,
        },
    );
    assert_eq!(format_entry(entry.abs_error(), 125.0, &entry), ROW_MULT_2);
    assert_eq!(
        format_entry(entry.abs_error(), 100.0, &entry),
        "0.5000000000000000,    2,  100.0000000000000000,   99.5000000000000000,        -0.500000,    101,  1212,    6,    2"
    );
}
