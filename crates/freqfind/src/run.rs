// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk
//! Main entry points and utilities for command line interface and interaction.

use miette::Result;

/// Trait all cli commands must implement to be runnable.
#[async_trait::async_trait]
pub trait Run {
    type Output;

    async fn run(&mut self) -> Result<Self::Output>;
}
