// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion orchestrator.
//
// One call walks: input resolved → document open → pages selected →
// rendering (in batches) → optional persistence → done. Once the document
// is open it is cleaned up exactly once, on success and on every error,
// before the result or error is handed back.
//
// Batches are joined on the calling task with an order-preserving join, so
// at most `batch_size` drawing surfaces are alive at any time and results
// always come back in the requested page order. The first failure in a
// batch drops its siblings (their surfaces are released by the lease
// guard) and skips the remaining batches. Nothing partial is returned.

use std::path::Path;

use futures::future::try_join_all;
use pagewerk_core::config::normalize;
use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::{ConvertDefaults, ConvertOptions, DocumentInfo, PageInfo, PageOutput, PdfInput};
use pagewerk_render::{
    PageRequest, PdfDocumentHandle, PdfPageHandle, RasterSurfaceFactory, RenderEngine,
    SurfaceFactory, render_page,
};
use tracing::{debug, info, instrument};

use crate::input::resolve_input;
use crate::output::{page_name, persist_page, prepare_output_folder};
use crate::pages::select_pages;

/// Drives PDF-to-PNG conversions against a rendering engine and a
/// drawing-surface factory.
pub struct Converter<E, F = RasterSurfaceFactory> {
    engine: E,
    surfaces: F,
    defaults: ConvertDefaults,
}

impl<E: RenderEngine> Converter<E> {
    /// Converter using the default `image`-backed surfaces.
    pub fn new(engine: E) -> Self {
        Self::with_surfaces(engine, RasterSurfaceFactory)
    }
}

impl<E: RenderEngine, F: SurfaceFactory> Converter<E, F> {
    pub fn with_surfaces(engine: E, surfaces: F) -> Self {
        Self {
            engine,
            surfaces,
            defaults: ConvertDefaults::default(),
        }
    }

    /// Replace the defaults applied to unset options.
    pub fn with_defaults(mut self, defaults: ConvertDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn surfaces(&self) -> &F {
        &self.surfaces
    }

    pub fn defaults(&self) -> &ConvertDefaults {
        &self.defaults
    }

    /// Convert the selected pages of a PDF into PNGs.
    #[instrument(skip_all)]
    pub async fn convert(
        &self,
        input: impl Into<PdfInput>,
        options: &ConvertOptions,
    ) -> Result<Vec<PageOutput>> {
        let input = input.into();
        let scale = checked_scale(options, &self.defaults)?;
        let default_mask = input.default_mask();
        info!(source = %describe(&input), scale, "converting PDF");

        let data = resolve_input(input).await?;
        let params = normalize(options, &self.defaults);
        let document = self.engine.open_document(data, &params).await?;

        let outcome = self
            .render_document(&document, options, scale, &default_mask)
            .await;
        document.cleanup().await;

        match &outcome {
            Ok(outputs) => info!(pages = outputs.len(), "conversion complete"),
            Err(err) => debug!(%err, "conversion failed; document released"),
        }
        outcome
    }

    /// Page count and per-page viewport geometry, without rasterizing.
    #[instrument(skip_all)]
    pub async fn document_info(
        &self,
        input: impl Into<PdfInput>,
        options: &ConvertOptions,
    ) -> Result<DocumentInfo> {
        let input = input.into();
        let scale = checked_scale(options, &self.defaults)?;
        debug!(source = %describe(&input), scale, "reading document info");

        let data = resolve_input(input).await?;
        let params = normalize(options, &self.defaults);
        let document = self.engine.open_document(data, &params).await?;

        let outcome = collect_info(&document, scale).await;
        document.cleanup().await;
        outcome
    }

    async fn render_document<D: PdfDocumentHandle>(
        &self,
        document: &D,
        options: &ConvertOptions,
        scale: f32,
        default_mask: &str,
    ) -> Result<Vec<PageOutput>> {
        let num_pages = document.num_pages();
        let selected = select_pages(options.pages_to_process.as_deref(), num_pages);
        let batch_size = options.batch_size(&self.defaults);
        info!(
            num_pages,
            selected = selected.len(),
            batch_size,
            "pages selected"
        );

        let folder = match options.output_folder.as_deref() {
            Some(folder) => Some(prepare_output_folder(folder).await?),
            None => None,
        };

        let keep_content = options.return_page_content(&self.defaults);
        // Content is always produced when it has to be written to disk.
        let want_content = keep_content || folder.is_some();

        let mut outputs = Vec::with_capacity(selected.len());
        for batch in selected.chunks(batch_size) {
            let rendered = try_join_all(batch.iter().map(|&page_number| {
                let request = PageRequest {
                    page_number,
                    viewport_scale: scale,
                    name: page_name(options, default_mask, page_number),
                    want_content,
                };
                self.process_page(document, request, folder.as_deref(), keep_content)
            }))
            .await?;
            debug!(pages = ?batch, "batch complete");
            outputs.extend(rendered);
        }
        Ok(outputs)
    }

    async fn process_page<D: PdfDocumentHandle>(
        &self,
        document: &D,
        request: PageRequest,
        folder: Option<&Path>,
        keep_content: bool,
    ) -> Result<PageOutput> {
        let mut output = render_page(document, &self.surfaces, request).await?;
        if let Some(folder) = folder {
            persist_page(&mut output, folder, keep_content).await?;
        }
        Ok(output)
    }
}

async fn collect_info<D: PdfDocumentHandle>(document: &D, scale: f32) -> Result<DocumentInfo> {
    let num_pages = document.num_pages();
    let mut pages = Vec::with_capacity(num_pages as usize);
    for page_number in 1..=num_pages {
        let mut page = document.page(page_number).await?;
        let viewport = page.viewport(scale);
        page.cleanup();
        pages.push(PageInfo {
            page_number,
            width: viewport.width,
            height: viewport.height,
            rotation: viewport.rotation,
        });
    }
    Ok(DocumentInfo { num_pages, pages })
}

/// Effective viewport scale; must be finite and positive so every viewport
/// maps to a non-empty surface.
fn checked_scale(options: &ConvertOptions, defaults: &ConvertDefaults) -> Result<f32> {
    let scale = options.viewport_scale(defaults);
    if !(scale.is_finite() && scale > 0.0) {
        return Err(PagewerkError::InvalidOptions(format!(
            "viewport scale must be a positive number, got {scale}"
        )));
    }
    Ok(scale)
}

fn describe(input: &PdfInput) -> String {
    match input {
        PdfInput::Path(path) => path.display().to_string(),
        PdfInput::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
    }
}

/// Convert a PDF with a freshly bound PDFium engine.
#[cfg(feature = "pdfium")]
pub async fn convert_pdf_to_png(
    input: impl Into<PdfInput>,
    options: &ConvertOptions,
) -> Result<Vec<PageOutput>> {
    let converter = Converter::new(pagewerk_render::PdfiumEngine::bind()?);
    converter.convert(input, options).await
}

/// Read document geometry with a freshly bound PDFium engine.
#[cfg(feature = "pdfium")]
pub async fn get_document_info(
    input: impl Into<PdfInput>,
    options: &ConvertOptions,
) -> Result<DocumentInfo> {
    let converter = Converter::new(pagewerk_render::PdfiumEngine::bind()?);
    converter.document_info(input, options).await
}
