// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk
mod config;
mod error;

pub use error::{Error, Result};

pub use self::config::*;
