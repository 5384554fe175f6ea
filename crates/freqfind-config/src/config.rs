// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::Result;

#[cfg(test)]
#[path = "./config_test.rs"]
mod config_test;

static CONFIG: OnceCell<RwLock<Arc<Config>>> = OnceCell::new();

/// Prefix of environment variables that override configuration values.
pub const ENV_PREFIX: &str = "FREQFIND_";

/// The environment variable consulted when no sdk path is configured.
pub const PICO_SDK_PATH_VAR: &str = "PICO_SDK_PATH";

/// Location of vcocalc.py within a pico-sdk checkout.
pub const DEFAULT_SOLVER_SCRIPT: &str = "src/rp2_common/hardware_clocks/scripts/vcocalc.py";

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Solver {
    /// Root of the pico-sdk checkout that provides the solver script
    ///
    /// When unset, the value of the PICO_SDK_PATH environment
    /// variable is used instead.
    pub sdk_path: Option<PathBuf>,

    /// The interpreter used to run the solver script
    pub interpreter: String,

    /// Path to the solver script, relative to the sdk path unless absolute
    pub script: PathBuf,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            sdk_path: None,
            interpreter: String::from("python"),
            script: PathBuf::from(DEFAULT_SOLVER_SCRIPT),
        }
    }
}

impl Solver {
    /// The configured sdk path, falling back to `$PICO_SDK_PATH`.
    pub fn resolve_sdk_path(&self) -> Option<PathBuf> {
        self.resolve_sdk_path_from(|key| std::env::var_os(key))
    }

    /// The configured sdk path, falling back to the value that
    /// `lookup` returns for `PICO_SDK_PATH`.
    ///
    /// An empty path is the same as no path at all.
    pub fn resolve_sdk_path_from<F>(&self, lookup: F) -> Option<PathBuf>
    where
        F: FnOnce(&str) -> Option<OsString>,
    {
        self.sdk_path
            .clone()
            .or_else(|| lookup(PICO_SDK_PATH_VAR).map(PathBuf::from))
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Full path to the solver script under the given sdk root.
    pub fn script_path(&self, sdk_path: &Path) -> PathBuf {
        // joining an absolute path replaces the root entirely
        sdk_path.join(&self.script)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Search {
    /// The number of solver processes that may run at the same time
    ///
    /// Results are always ranked in multiplier order, so raising
    /// this only changes how long a search takes.
    pub max_concurrent_solves: usize,
}

impl Default for Search {
    fn default() -> Self {
        Self {
            max_concurrent_solves: 1,
        }
    }
}

/// Configuration values for freqfind.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    // These sub-types should aim to only have one level of
    // values within them, otherwise they become impossible to address
    // with environment variables.
    pub solver: Solver,
    pub search: Search,
}

impl Config {
    /// Get the current loaded config, loading it if needed
    pub fn current() -> Result<Arc<Self>> {
        get_config()
    }

    /// Make this config the current global one
    pub fn make_current(self) -> Result<Arc<Self>> {
        // Note we don't know if we won the race to set the value here,
        // so we still need to try to update it.
        let config = CONFIG.get_or_try_init(|| -> Result<RwLock<Arc<Config>>> {
            Ok(RwLock::new(Arc::new(self.clone())))
        })?;

        let mut lock = config
            .write()
            .map_err(|err| crate::Error::LockPoisonedWrite(err.to_string()))?;
        *Arc::make_mut(&mut lock) = self;
        Ok(Arc::clone(&lock))
    }
}

/// Get the current freqfind config, fetching it from disk if needed.
pub fn get_config() -> Result<Arc<Config>> {
    let config = CONFIG.get_or_try_init(|| -> Result<RwLock<Arc<Config>>> {
        Ok(RwLock::new(Arc::new(load_config()?)))
    })?;
    let lock = config
        .read()
        .map_err(|err| crate::Error::LockPoisonedRead(err.to_string()))?;
    Ok(Arc::clone(&*lock))
}

/// Load the freqfind configuration from disk, even if it has already been loaded.
///
/// This includes the system and user configurations (if they exist)
/// and any `FREQFIND_<SECTION>_<NAME>` environment overrides.
pub fn load_config() -> Result<Config> {
    let user_config = dirs::config_dir()
        .ok_or(crate::Error::NoConfigDir)?
        .join("freqfind")
        .join("freqfind");
    load_config_from(
        [PathBuf::from("/etc/freqfind"), user_config],
        unicode_vars(std::env::vars_os()),
    )
}

/// Drop the variables that are not valid unicode, they can never be overrides.
fn unicode_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(var, value)| Some((var.into_string().ok()?, value.into_string().ok()?)))
}

/// Load a configuration from the given files, in increasing priority,
/// with overrides taken from the given environment variables.
///
/// Missing files are skipped. Files can be in any format supported
/// by the `config` crate: toml, yaml, json, ini, etc.
pub fn load_config_from<P, V>(files: P, vars: V) -> Result<Config>
where
    P: IntoIterator<Item = PathBuf>,
    V: IntoIterator<Item = (String, String)>,
{
    use config::{Config as RawConfig, File};

    let mut config_builder = RawConfig::builder();
    for file in files {
        config_builder =
            config_builder.add_source(File::with_name(&format!("{}", file.display())).required(false));
    }

    for (var, value) in vars {
        let Some(tail) = var.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let Some((section, name)) = tail.split_once('_') else {
            // typically, a value with no section is not a configuration
            // value, and can be skipped (eg: FREQFIND_LOG)
            continue;
        };

        let key = format!("{}.{}", section.to_lowercase(), name.to_lowercase());
        config_builder = config_builder.set_override(key, value)?;
    }

    let config = config_builder.build()?;
    Ok(Config::deserialize(config)?)
}
