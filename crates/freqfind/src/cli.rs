// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk
//! Main entry point for the freqfind command line.

use clap::Parser;
use colored::Colorize;
use freqfind::cmd_find::{COLUMNS_HELP, Find};
use freqfind::{Run, configure_logging};
use miette::{Result, WrapErr};

/// Finds the closest possible clocks to a given frequency for the Raspberry Pi Pico.
///
/// Every multiple of the requested frequency between the minimum and
/// maximum frequency is handed to the vcocalc.py script of the pico-sdk,
/// and the achievable frequencies are ranked by how far they are from
/// the multiple. Set the PICO_SDK_PATH environment variable to the
/// pico-sdk checkout to use.
#[derive(Parser)]
#[clap(version, after_long_help = COLUMNS_HELP)]
pub struct Opt {
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[clap(flatten)]
    pub find: Find,
}

impl Opt {
    pub async fn run(&mut self) -> Result<i32> {
        let res = configure_logging(self.verbose).wrap_err("Failed to initialize output log");
        if let Err(err) = res {
            eprintln!("{}", err.to_string().red());
            return Ok(1);
        }

        self.find.run().await
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut opts = Opt::parse();
    let code = match opts.run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:?}");
            1
        }
    };
    std::process::exit(code);
}
