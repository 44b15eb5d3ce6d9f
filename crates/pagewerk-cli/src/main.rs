// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagewerk — PDF to PNG converter.
//
// Entry point. Parses arguments, runs the subcommand, and turns errors into
// a message on stderr and a per-family exit code.

mod cli;
mod convert_cmd;
mod info_cmd;
mod page_range;
mod shared;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert(args) => convert_cmd::run(args, cli.verbosity).await,
        Commands::Info(args) => info_cmd::run(args, cli.verbosity).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(kind = ?err.kind(), "command failed");
            eprintln!("error: {err}");
            ExitCode::from(shared::exit_code(err.kind()))
        }
    }
}
