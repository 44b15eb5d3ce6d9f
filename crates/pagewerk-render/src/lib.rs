// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagewerk-render — Rendering for the Pagewerk converter.
//
// Defines the seams to the external PDF rendering engine (document and page
// handles), the drawing-surface factory that owns pixel buffers, and the
// page renderer that ties one page to one PNG with guaranteed cleanup.

pub mod engine;
pub mod page;
pub mod surface;

#[cfg(feature = "pdfium")]
pub mod pdfium;

// Re-export the primary items so callers can use `pagewerk_render::render_page` etc.
pub use engine::{PdfDocumentHandle, PdfPageHandle, RenderEngine, Viewport};
pub use page::{PageRequest, render_page};
pub use surface::{
    Canvas, DrawingSurface, MAX_SURFACE_PIXELS, PaintContext, RasterSurfaceFactory, SurfaceFactory,
    SurfaceHandle, SurfaceLease,
};

#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumEngine;
