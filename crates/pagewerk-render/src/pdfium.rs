// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDFium rendering backend using the `pdfium-render` crate.
//
// The PDFium shared library is bound at runtime: first from the install
// directory, then from the system library path. Each engine owns its own
// binding, so a converter can create one per call.

use std::path::Path;

use image::RgbaImage;
use pagewerk_core::config::install_dir;
use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::{EngineInitParams, VerbosityLevel};
use pdfium_render::prelude::*;
use tracing::{debug, info, instrument};

use crate::engine::{PdfDocumentHandle, PdfPageHandle, RenderEngine, Viewport};
use crate::surface::Canvas;

/// Rendering engine backed by a bound PDFium library.
///
/// Only the password and verbosity from [`EngineInitParams`] affect this
/// engine. PDFium uses its bundled character maps and base-14 fonts and
/// renders AcroForm content only, so `disable_font_face`,
/// `use_system_fonts`, `enable_xfa`, `cmap_dir`, `cmap_packed` and
/// `standard_font_dir` are accepted and logged but have no effect.
pub struct PdfiumEngine {
    pdfium: Pdfium,
}

impl PdfiumEngine {
    /// Bind PDFium from the install directory, falling back to the system
    /// library.
    pub fn bind() -> Result<Self> {
        Self::bind_in(&install_dir())
    }

    /// Bind PDFium from `library_dir`, falling back to the system library.
    #[instrument(skip_all, fields(dir = %library_dir.display()))]
    pub fn bind_in(library_dir: &Path) -> Result<Self> {
        let bindings =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(library_dir))
                .or_else(|_| Pdfium::bind_to_system_library())
                .map_err(|err| PagewerkError::EngineUnavailable(err.to_string()))?;
        debug!("PDFium bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl RenderEngine for PdfiumEngine {
    type Document<'e>
        = PdfiumDocument<'e>
    where
        Self: 'e;

    async fn open_document(
        &self,
        data: Vec<u8>,
        params: &EngineInitParams,
    ) -> Result<PdfiumDocument<'_>> {
        debug!(
            bytes = data.len(),
            encrypted = params.password.is_some(),
            use_system_fonts = params.use_system_fonts,
            enable_xfa = params.enable_xfa,
            cmap_dir = %params.cmap_dir.display(),
            "opening document with PDFium"
        );

        let document = self
            .pdfium
            .load_pdf_from_byte_vec(data, params.password.as_deref())
            .map_err(|err| PagewerkError::DocumentOpen(err.to_string()))?;

        let num_pages = document.pages().len() as u32;
        if params.verbosity == VerbosityLevel::Infos {
            info!(num_pages, "PDFium document opened");
        }

        Ok(PdfiumDocument {
            document,
            num_pages,
            verbosity: params.verbosity,
        })
    }
}

/// A document opened by [`PdfiumEngine`].
pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
    num_pages: u32,
    verbosity: VerbosityLevel,
}

impl PdfDocumentHandle for PdfiumDocument<'_> {
    type Page<'d>
        = PdfiumPage<'d>
    where
        Self: 'd;

    fn num_pages(&self) -> u32 {
        self.num_pages
    }

    async fn page(&self, page_number: u32) -> Result<PdfiumPage<'_>> {
        let unavailable = |reason: String| PagewerkError::PageUnavailable {
            page: page_number,
            reason,
        };

        let index = page_number
            .checked_sub(1)
            .and_then(|index| PdfPageIndex::try_from(index).ok())
            .ok_or_else(|| unavailable("page index out of range".into()))?;

        let page = self
            .document
            .pages()
            .get(index)
            .map_err(|err| unavailable(err.to_string()))?;

        Ok(PdfiumPage {
            page: Some(page),
            number: page_number,
            verbosity: self.verbosity,
        })
    }

    async fn cleanup(self) {
        if self.verbosity != VerbosityLevel::Errors {
            debug!(num_pages = self.num_pages, "closing PDFium document");
        }
        drop(self.document);
    }
}

/// A page loaded from a [`PdfiumDocument`].
pub struct PdfiumPage<'a> {
    page: Option<PdfPage<'a>>,
    number: u32,
    verbosity: VerbosityLevel,
}

impl PdfPageHandle for PdfiumPage<'_> {
    fn viewport(&self, scale: f32) -> Viewport {
        let Some(page) = self.page.as_ref() else {
            return Viewport {
                width: 0.0,
                height: 0.0,
                rotation: 0,
                scale,
            };
        };

        let rotation = match page.rotation() {
            Ok(PdfPageRenderRotation::Degrees90) => 90,
            Ok(PdfPageRenderRotation::Degrees180) => 180,
            Ok(PdfPageRenderRotation::Degrees270) => 270,
            _ => 0,
        };

        Viewport {
            width: page.width().value * scale,
            height: page.height().value * scale,
            rotation,
            scale,
        }
    }

    async fn render(&self, canvas: &mut Canvas<'_>, viewport: &Viewport) -> Result<()> {
        let render_error = |reason: String| PagewerkError::Render {
            page: self.number,
            reason,
        };

        let page = self
            .page
            .as_ref()
            .ok_or_else(|| render_error("page already released".into()))?;

        let target_width = i32::try_from(canvas.width()).unwrap_or(i32::MAX);
        let target_height = i32::try_from(canvas.height()).unwrap_or(i32::MAX);
        let config = PdfRenderConfig::new()
            .set_target_width(target_width)
            .set_maximum_height(target_height);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|err| render_error(err.to_string()))?;

        let rendered = bitmap.as_image().to_rgba8();
        let (width, height) = rendered.dimensions();
        let pixels = RgbaImage::from_raw(width, height, rendered.into_raw())
            .ok_or_else(|| render_error("bitmap size does not match its pixel data".into()))?;
        canvas.draw_image(&pixels, 0, 0);

        if self.verbosity == VerbosityLevel::Infos {
            info!(
                page = self.number,
                scale = viewport.scale,
                width,
                height,
                "PDFium page rasterized"
            );
        }
        Ok(())
    }

    fn cleanup(&mut self) {
        self.page.take();
    }
}
