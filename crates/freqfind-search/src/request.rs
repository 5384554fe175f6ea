// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use crate::{Error, Result};

#[cfg(test)]
#[path = "./request_test.rs"]
mod request_test;

/// The lowest frequency the CPU can run with, in MHz
pub const DEFAULT_MIN_FREQ: f64 = 16.0;
/// The highest frequency the CPU can be overclocked to, in MHz
pub const DEFAULT_MAX_FREQ: f64 = 420.0;
/// The stock CPU frequency used to report over-/underclocking, in MHz
pub const DEFAULT_REFERENCE_FREQ: f64 = 125.0;

/// Which of the ranked results should be reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    /// Only the entries tied for the smallest error
    #[default]
    Best,
    /// Every entry, in increasing order of error
    All,
}

/// A frequency to approximate and the bounds to search within.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyRequest {
    /// The desired frequency, in MHz
    pub requested_freq: f64,
    pub min_freq: f64,
    pub max_freq: f64,
    /// Reference frequency, used only to report over-/underclocking
    pub default_freq: f64,
    pub show_all: bool,
}

impl FrequencyRequest {
    pub fn new(requested_freq: f64) -> Self {
        Self {
            requested_freq,
            min_freq: DEFAULT_MIN_FREQ,
            max_freq: DEFAULT_MAX_FREQ,
            default_freq: DEFAULT_REFERENCE_FREQ,
            show_all: false,
        }
    }

    pub fn with_bounds(mut self, min_freq: f64, max_freq: f64) -> Self {
        self.min_freq = min_freq;
        self.max_freq = max_freq;
        self
    }

    pub fn with_default_freq(mut self, default_freq: f64) -> Self {
        self.default_freq = default_freq;
        self
    }

    pub fn with_show_all(mut self, show_all: bool) -> Self {
        self.show_all = show_all;
        self
    }

    pub fn selection(&self) -> Selection {
        if self.show_all {
            Selection::All
        } else {
            Selection::Best
        }
    }

    /// Check that this request can be searched.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("requested frequency", self.requested_freq),
            ("minimum frequency", self.min_freq),
            ("maximum frequency", self.max_freq),
            ("default frequency", self.default_freq),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidInput(format!("{name} must be finite, got {value}")));
            }
        }
        if self.requested_freq <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "requested frequency must be positive, got {}",
                self.requested_freq
            )));
        }
        if self.min_freq > self.max_freq {
            return Err(Error::InvalidInput(format!(
                "minimum frequency {} is above the maximum frequency {}",
                self.min_freq, self.max_freq
            )));
        }
        Ok(())
    }

    /// The multipliers of the requested frequency that fall within bounds.
    pub fn multiplier_range(&self) -> Result<MultiplierRange> {
        self.validate()?;
        Ok(MultiplierRange {
            // float to int casts saturate, so extreme ratios cannot wrap
            min: (self.min_freq / self.requested_freq).floor() as i64,
            max: (self.max_freq / self.requested_freq).floor() as i64,
        })
    }
}

/// An inclusive range of integer multipliers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MultiplierRange {
    pub min: i64,
    pub max: i64,
}

impl MultiplierRange {
    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }

    /// The number of multipliers in this range
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        self.max.abs_diff(self.min).saturating_add(1)
    }

    /// Every candidate in this range, in ascending multiplier order.
    pub fn candidates(&self, requested_freq: f64) -> impl Iterator<Item = Candidate> + use<> {
        (self.min..=self.max).map(move |multiplier| Candidate::new(multiplier, requested_freq))
    }
}

/// One multiple of the requested frequency to hand to the solver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub multiplier: i64,
    pub target_freq: f64,
}

impl Candidate {
    pub fn new(multiplier: i64, requested_freq: f64) -> Self {
        Self {
            multiplier,
            target_freq: multiplier as f64 * requested_freq,
        }
    }
}
