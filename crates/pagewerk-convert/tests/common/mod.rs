// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scripted rendering engine and counting surface factory shared by the
// integration tests and the benchmark.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use image::Rgba;
use pagewerk_core::EngineInitParams;
use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_render::{
    Canvas, PdfDocumentHandle, PdfPageHandle, RasterSurfaceFactory, RenderEngine, SurfaceFactory,
    SurfaceHandle, Viewport,
};

/// Bytes the mock engine accepts as a document.
pub const MOCK_PDF: &[u8] = b"%PDF-1.7 mock";

/// Counters shared between the mock engine, its documents, and its pages.
#[derive(Debug, Default)]
pub struct EngineStats {
    pub opened: AtomicUsize,
    pub document_cleanups: AtomicUsize,
    pub pages_loaded: AtomicUsize,
    pub page_cleanups: AtomicUsize,
    pub renders: AtomicUsize,
}

impl EngineStats {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// Engine serving fixed page sizes, with an optional password and an
/// optional page whose render fails.
#[derive(Debug, Default)]
pub struct MockEngine {
    pages: Vec<(f32, f32)>,
    password: Option<String>,
    fail_on_page: Option<u32>,
    pub stats: EngineStats,
}

impl MockEngine {
    pub fn with_pages(count: usize) -> Self {
        Self::with_sizes(vec![(100.0, 200.0); count])
    }

    pub fn with_sizes(pages: Vec<(f32, f32)>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    pub fn encrypted(mut self, password: &str) -> Self {
        self.password = Some(password.to_owned());
        self
    }

    pub fn failing_on(mut self, page_number: u32) -> Self {
        self.fail_on_page = Some(page_number);
        self
    }

    pub fn opened(&self) -> usize {
        EngineStats::get(&self.stats.opened)
    }

    pub fn document_cleanups(&self) -> usize {
        EngineStats::get(&self.stats.document_cleanups)
    }

    pub fn pages_loaded(&self) -> usize {
        EngineStats::get(&self.stats.pages_loaded)
    }

    pub fn page_cleanups(&self) -> usize {
        EngineStats::get(&self.stats.page_cleanups)
    }
}

impl RenderEngine for MockEngine {
    type Document<'e> = MockDocument<'e>;

    async fn open_document(
        &self,
        data: Vec<u8>,
        params: &EngineInitParams,
    ) -> Result<MockDocument<'_>> {
        if !data.starts_with(b"%PDF") {
            return Err(PagewerkError::DocumentOpen("invalid PDF structure".into()));
        }
        if let Some(expected) = &self.password {
            if params.password.as_deref() != Some(expected.as_str()) {
                return Err(PagewerkError::DocumentOpen("incorrect password".into()));
            }
        }
        self.stats.opened.fetch_add(1, Ordering::SeqCst);
        Ok(MockDocument { engine: self })
    }
}

pub struct MockDocument<'e> {
    engine: &'e MockEngine,
}

impl PdfDocumentHandle for MockDocument<'_> {
    type Page<'d>
        = MockPage<'d>
    where
        Self: 'd;

    fn num_pages(&self) -> u32 {
        self.engine.pages.len() as u32
    }

    async fn page(&self, page_number: u32) -> Result<MockPage<'_>> {
        let index = page_number as usize;
        let &(width, height) = index
            .checked_sub(1)
            .and_then(|i| self.engine.pages.get(i))
            .ok_or(PagewerkError::PageUnavailable {
                page: page_number,
                reason: "out of range".into(),
            })?;
        self.engine.stats.pages_loaded.fetch_add(1, Ordering::SeqCst);
        Ok(MockPage {
            engine: self.engine,
            number: page_number,
            width,
            height,
        })
    }

    async fn cleanup(self) {
        self.engine
            .stats
            .document_cleanups
            .fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MockPage<'e> {
    engine: &'e MockEngine,
    number: u32,
    width: f32,
    height: f32,
}

impl PdfPageHandle for MockPage<'_> {
    fn viewport(&self, scale: f32) -> Viewport {
        Viewport {
            width: self.width * scale,
            height: self.height * scale,
            rotation: 0,
            scale,
        }
    }

    async fn render(&self, canvas: &mut Canvas<'_>, _viewport: &Viewport) -> Result<()> {
        // Let sibling renders in the same batch start before this one ends.
        tokio::task::yield_now().await;
        if self.engine.fail_on_page == Some(self.number) {
            return Err(PagewerkError::Render {
                page: self.number,
                reason: "scripted failure".into(),
            });
        }
        // Darker fill for later pages so outputs differ per page.
        let shade = 255u8.saturating_sub((self.number as u8).saturating_mul(20));
        canvas.set_fill_style(Rgba([shade, shade, shade, 255]));
        let (width, height) = (canvas.width(), canvas.height());
        canvas.fill_rect(0, 0, width / 2, height / 2);
        self.engine.stats.renders.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn cleanup(&mut self) {
        self.engine.stats.page_cleanups.fetch_add(1, Ordering::SeqCst);
    }
}

/// Raster factory that tracks how many surfaces are alive.
#[derive(Debug, Default)]
pub struct CountingSurfaces {
    inner: RasterSurfaceFactory,
    created: AtomicUsize,
    destroyed: AtomicUsize,
    live: AtomicUsize,
    max_live: AtomicUsize,
}

impl CountingSurfaces {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }

    pub fn max_live(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }
}

impl SurfaceFactory for CountingSurfaces {
    fn create(&self, width: u32, height: u32) -> Result<SurfaceHandle> {
        let handle = self.inner.create(width, height)?;
        self.created.fetch_add(1, Ordering::SeqCst);
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_live.fetch_max(live, Ordering::SeqCst);
        Ok(handle)
    }

    fn reset(&self, handle: &mut SurfaceHandle, width: u32, height: u32) -> Result<()> {
        self.inner.reset(handle, width, height)
    }

    fn destroy(&self, handle: &mut SurfaceHandle) -> Result<()> {
        self.inner.destroy(handle)?;
        self.destroyed.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}
