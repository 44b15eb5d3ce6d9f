// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rendering-engine abstractions.
//
// The converter never parses PDF itself. It talks to an engine through
// these traits: open a document from bytes, ask for pages, compute a
// viewport, and render into a caller-owned canvas. Futures returned here
// are awaited on the calling task and are never spawned, so
// implementations do not need to be `Send`.

use pagewerk_core::EngineInitParams;
use pagewerk_core::error::Result;

use crate::surface::Canvas;

/// Pixel-space rectangle a page is rasterized into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Page width × scale.
    pub width: f32,
    /// Page height × scale.
    pub height: f32,
    /// Clockwise rotation in degrees.
    pub rotation: u16,
    pub scale: f32,
}

impl Viewport {
    /// Whole-pixel surface size covering this viewport.
    ///
    /// Fractional sizes round up. Non-finite or non-positive sizes map to 0,
    /// which the surface factory rejects.
    pub fn pixel_size(&self) -> (u32, u32) {
        (to_pixels(self.width), to_pixels(self.height))
    }
}

fn to_pixels(value: f32) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.ceil() as u32
    } else {
        0
    }
}

/// Opens PDF documents.
#[allow(async_fn_in_trait)]
pub trait RenderEngine {
    type Document<'e>: PdfDocumentHandle
    where
        Self: 'e;

    /// Open a document from raw bytes. Malformed input and missing or
    /// wrong passwords fail with `PagewerkError::DocumentOpen`.
    async fn open_document(
        &self,
        data: Vec<u8>,
        params: &EngineInitParams,
    ) -> Result<Self::Document<'_>>;
}

/// An open document. Shared read-only across concurrent page renders.
#[allow(async_fn_in_trait)]
pub trait PdfDocumentHandle {
    type Page<'d>: PdfPageHandle
    where
        Self: 'd;

    fn num_pages(&self) -> u32;

    /// Load the page with the given 1-based number.
    async fn page(&self, page_number: u32) -> Result<Self::Page<'_>>;

    /// Release the document. Called exactly once per opened document.
    async fn cleanup(self);
}

/// A loaded page, owned by a single render.
#[allow(async_fn_in_trait)]
pub trait PdfPageHandle {
    fn viewport(&self, scale: f32) -> Viewport;

    /// Paint the page into `canvas` at `viewport`.
    async fn render(&self, canvas: &mut Canvas<'_>, viewport: &Viewport) -> Result<()>;

    /// Release page-level resources.
    fn cleanup(&mut self);
}
