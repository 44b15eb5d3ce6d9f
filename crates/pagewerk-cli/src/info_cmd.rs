// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use pagewerk_convert::{ConvertOptions, get_document_info};
use pagewerk_core::VerbosityLevel;
use pagewerk_core::error::Result;

use crate::cli::{InfoArgs, VerbosityArg};
use crate::shared::init_tracing;

pub async fn run(args: InfoArgs, verbosity: Option<VerbosityArg>) -> Result<()> {
    init_tracing(verbosity.map(VerbosityLevel::from).unwrap_or_default());

    let options = ConvertOptions {
        viewport_scale: args.scale,
        pdf_file_password: args.password,
        ..Default::default()
    };
    let info = get_document_info(args.file.as_path(), &options).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Pages: {}", info.num_pages);
    for page in &info.pages {
        println!(
            "{:>4}  {:.2} x {:.2}  rotation {}",
            page.page_number, page.width, page.height, page.rotation
        );
    }
    Ok(())
}
