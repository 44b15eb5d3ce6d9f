// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pagewerk_core::VerbosityLevel;

/// Render PDF pages to PNG images.
#[derive(Debug, Parser)]
#[command(name = "pagewerk", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, value_enum)]
    pub verbosity: Option<VerbosityArg>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render pages to PNG files
    Convert(ConvertArgs),

    /// Show page count and page sizes
    Info(InfoArgs),
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Path to the PDF file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Folder the PNG files are written to. Default: current directory
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Viewport scale (1.0 = 72 DPI)
    #[arg(long)]
    pub scale: Option<f32>,

    /// Page range (e.g. '1,3-5'). Default: all pages
    #[arg(long)]
    pub pages: Option<String>,

    /// Render pages concurrently in batches
    #[arg(long)]
    pub parallel: bool,

    /// Pages per batch when rendering in parallel
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Password for encrypted PDFs
    #[arg(long)]
    pub password: Option<String>,

    /// File name prefix: pages are written as <NAME>_page_<N>.png
    #[arg(long, value_name = "NAME")]
    pub mask: Option<String>,

    /// Drop PNG bytes after writing, even if the options file keeps them
    #[arg(long)]
    pub no_content: bool,

    /// JSON file with conversion options; flags override its values
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Path to the PDF file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Viewport scale used for the reported sizes
    #[arg(long)]
    pub scale: Option<f32>,

    /// Password for encrypted PDFs
    #[arg(long)]
    pub password: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log verbosity choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VerbosityArg {
    Errors,
    Warnings,
    Infos,
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        match arg {
            VerbosityArg::Errors => VerbosityLevel::Errors,
            VerbosityArg::Warnings => VerbosityLevel::Warnings,
            VerbosityArg::Infos => VerbosityLevel::Infos,
        }
    }
}
