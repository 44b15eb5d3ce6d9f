// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagewerk-convert — PDF to PNG conversion orchestration.
//
// Resolves the input to bytes, opens the document once, selects the pages
// to process, renders them sequentially or in bounded batches, optionally
// writes each PNG under an output folder, and always releases the document
// before returning.

pub mod convert;
pub mod input;
pub mod output;
pub mod pages;

pub use convert::Converter;
pub use input::resolve_input;
pub use output::{page_name, resolve_output_path};
pub use pages::select_pages;

pub use pagewerk_core::{
    ConvertDefaults, ConvertOptions, DocumentInfo, PageInfo, PageOutput, PagewerkError, PdfInput,
};

#[cfg(feature = "pdfium")]
pub use convert::{convert_pdf_to_png, get_document_info};
