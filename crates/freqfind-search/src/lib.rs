// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

//! Searches multiples of a requested frequency for the clock
//! configurations that approximate it best.

mod error;
mod index;
mod request;
mod search;

pub use error::{Error, Result};
pub use freqfind_solver as solver;
pub use index::{ErrorGroup, RankedEntry, ResultIndex};
pub use request::{
    Candidate,
    DEFAULT_MAX_FREQ,
    DEFAULT_MIN_FREQ,
    DEFAULT_REFERENCE_FREQ,
    FrequencyRequest,
    MultiplierRange,
    Selection,
};
pub use search::FrequencySearch;
