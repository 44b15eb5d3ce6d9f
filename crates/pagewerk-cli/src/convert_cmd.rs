// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::path::PathBuf;

use pagewerk_convert::{ConvertOptions, PageOutput, convert_pdf_to_png};
use pagewerk_core::VerbosityLevel;
use pagewerk_core::error::{PagewerkError, Result};

use crate::cli::{ConvertArgs, VerbosityArg};
use crate::page_range::parse_page_range;
use crate::shared::{init_tracing, load_options};

pub async fn run(args: ConvertArgs, verbosity: Option<VerbosityArg>) -> Result<()> {
    let options = build_options(&args, verbosity).await?;
    init_tracing(options.verbosity_level.unwrap_or_default());

    let outputs = convert_pdf_to_png(args.file.as_path(), &options).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
    } else {
        for output in &outputs {
            println!("{}", describe(output));
        }
    }
    Ok(())
}

/// Options file first, then flags on top.
async fn build_options(args: &ConvertArgs, verbosity: Option<VerbosityArg>) -> Result<ConvertOptions> {
    let mut options = load_options(args.options.as_deref()).await?;

    if let Some(out) = &args.out {
        options.output_folder = Some(out.clone());
    }
    if options.output_folder.is_none() {
        options.output_folder = Some(PathBuf::from("."));
    }
    if let Some(scale) = args.scale {
        options.viewport_scale = Some(scale);
    }
    if let Some(pages) = &args.pages {
        let pages = parse_page_range(pages).map_err(PagewerkError::InvalidOptions)?;
        options.pages_to_process = Some(pages);
    }
    if args.parallel {
        options.process_pages_in_parallel = Some(true);
    }
    if let Some(limit) = args.concurrency {
        options.concurrency_limit = Some(limit);
    }
    if let Some(password) = &args.password {
        options.pdf_file_password = Some(password.clone());
    }
    if let Some(mask) = &args.mask {
        options.output_file_mask = Some(mask.clone());
    }
    // Pages always go to disk here, so in-memory copies are opt-in.
    if args.no_content || options.return_page_content.is_none() {
        options.return_page_content = Some(false);
    }
    if let Some(verbosity) = verbosity {
        options.verbosity_level = Some(VerbosityLevel::from(verbosity));
    }
    Ok(options)
}

fn describe(output: &PageOutput) -> String {
    let path = output
        .path
        .as_ref()
        .map_or_else(|| "-".to_owned(), |path| path.display().to_string());
    format!(
        "{:>4}  {}  {:.0}x{:.0}  {}",
        output.page_number, output.name, output.width, output.height, path
    )
}
