// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use miette::{IntoDiagnostic, Result, WrapErr};

const FREQFIND_LOG: &str = "FREQFIND_LOG";

/// The logging directives for the given number of `-v` flags.
fn directives_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "freqfind=info",
        1 => "freqfind=debug",
        _ => "freqfind=trace",
    }
}

pub fn configure_logging(verbosity: u8) -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;

    let mut directives = directives_for(verbosity).to_string();
    if let Ok(overrides) = std::env::var(FREQFIND_LOG) {
        directives = format!("{directives},{overrides}");
    }
    if let Ok(overrides) = std::env::var("RUST_LOG") {
        // we also allow a full override via the RUST_LOG variable for debugging
        directives = overrides;
    }
    let env_filter = tracing_subscriber::filter::EnvFilter::new(directives);
    let registry = tracing_subscriber::Registry::default().with(env_filter);
    let mut fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time();
    if verbosity < 3 {
        fmt_layer = fmt_layer.with_target(false);
    }
    let sub = registry.with(fmt_layer);

    tracing::subscriber::set_global_default(sub)
        .into_diagnostic()
        .wrap_err("Failed to set default logger")
}
