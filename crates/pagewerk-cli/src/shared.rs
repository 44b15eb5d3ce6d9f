// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Helpers shared by the subcommands: logging setup, options files, and
// exit codes.

use std::path::Path;

use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::{ConvertOptions, ErrorKind, VerbosityLevel};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over `level`.
pub fn init_tracing(level: VerbosityLevel) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(level.filter_directive())),
        )
        .init();
}

/// Read conversion options from a JSON file, or start from empty options.
pub async fn load_options(path: Option<&Path>) -> Result<ConvertOptions> {
    let Some(path) = path else {
        return Ok(ConvertOptions::default());
    };
    let text = tokio::fs::read_to_string(path).await.map_err(|err| {
        PagewerkError::InvalidOptions(format!("cannot read {}: {err}", path.display()))
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// Process exit code for an error family. 2 is left to clap for usage
/// errors.
pub fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Options => 3,
        ErrorKind::InputRead => 4,
        ErrorKind::DocumentOpen => 5,
        ErrorKind::Render | ErrorKind::Surface => 6,
        ErrorKind::Persist | ErrorKind::PathTraversal => 7,
    }
}
