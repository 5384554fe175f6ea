// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

pub mod cmd_find;
mod env;
mod run;

pub use env::configure_logging;
pub use run::Run;
