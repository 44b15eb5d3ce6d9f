// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page renderer — one page number in, one PNG out.
//
// Page and surface resources are released on every path: the page handle
// is cleaned up after the render attempt whatever its outcome, and the
// surface lives in a lease that is destroyed when it goes out of scope.

use pagewerk_core::PageOutput;
use pagewerk_core::error::Result;
use tracing::{debug, instrument};

use crate::engine::{PdfDocumentHandle, PdfPageHandle, Viewport};
use crate::surface::{SurfaceFactory, SurfaceLease};

/// What to render for a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// 1-based page number, already validated against the document.
    pub page_number: u32,
    pub viewport_scale: f32,
    /// Output file name recorded in the result.
    pub name: String,
    /// Encode the surface to PNG. When false, `content` stays `None`.
    pub want_content: bool,
}

/// Render one page of `document` into a [`PageOutput`].
#[instrument(skip_all, fields(page = request.page_number, scale = request.viewport_scale))]
pub async fn render_page<D, F>(document: &D, surfaces: &F, request: PageRequest) -> Result<PageOutput>
where
    D: PdfDocumentHandle,
    F: SurfaceFactory + ?Sized,
{
    let mut page = document.page(request.page_number).await?;
    let outcome = rasterize(&page, surfaces, &request).await;
    page.cleanup();

    let (viewport, content) = outcome?;
    debug!(
        width = viewport.width,
        height = viewport.height,
        png_bytes = content.as_ref().map_or(0, Vec::len),
        "page rendered"
    );

    Ok(PageOutput {
        page_number: request.page_number,
        name: request.name,
        content,
        path: None,
        width: viewport.width,
        height: viewport.height,
    })
}

async fn rasterize<P, F>(
    page: &P,
    surfaces: &F,
    request: &PageRequest,
) -> Result<(Viewport, Option<Vec<u8>>)>
where
    P: PdfPageHandle,
    F: SurfaceFactory + ?Sized,
{
    let viewport = page.viewport(request.viewport_scale);
    let (width, height) = viewport.pixel_size();
    let mut lease = SurfaceLease::acquire(surfaces, width, height)?;

    {
        let mut canvas = lease.canvas()?;
        page.render(&mut canvas, &viewport).await?;
    }

    let content = if request.want_content {
        Some(lease.surface()?.encode_png()?)
    } else {
        None
    };
    Ok((viewport, content))
}
