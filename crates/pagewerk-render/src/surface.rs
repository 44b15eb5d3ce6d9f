// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Drawing-surface factory — creates, resets, and destroys the pixel buffer
// and paint context pair a page is rendered into, using the `image` crate
// for storage and PNG encoding.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use pagewerk_core::error::{PagewerkError, Result};
use tracing::{debug, warn};

/// Opaque white, the default fill for fresh paint contexts.
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Largest surface the raster factory allocates: 2^28 pixels, 1 GiB of
/// RGBA. Bigger requests fail with `InvalidDimension` instead of aborting
/// on allocation.
pub const MAX_SURFACE_PIXELS: u64 = 1 << 28;

/// An in-memory RGBA pixel buffer.
#[derive(Debug)]
pub struct DrawingSurface {
    pixels: RgbaImage,
}

impl DrawingSurface {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Borrow the raw pixel buffer.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Encode the current pixels as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .map_err(|err| PagewerkError::Encode(err.to_string()))?;
        Ok(buffer)
    }
}

/// 2D paint state bound to one surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintContext {
    fill_style: Rgba<u8>,
    bound_size: (u32, u32),
}

impl PaintContext {
    fn bound_to(width: u32, height: u32) -> Self {
        Self {
            fill_style: WHITE,
            bound_size: (width, height),
        }
    }

    pub fn fill_style(&self) -> Rgba<u8> {
        self.fill_style
    }

    /// Dimensions of the surface this context was bound to.
    pub fn bound_size(&self) -> (u32, u32) {
        self.bound_size
    }
}

/// A surface and its paint context. Either may be absent once destroyed.
#[derive(Debug, Default)]
pub struct SurfaceHandle {
    pub surface: Option<DrawingSurface>,
    pub context: Option<PaintContext>,
}

impl SurfaceHandle {
    /// Borrow surface and context together for painting.
    pub fn canvas(&mut self) -> Result<Canvas<'_>> {
        match (self.surface.as_mut(), self.context.as_mut()) {
            (Some(surface), Some(context)) => Ok(Canvas { surface, context }),
            _ => Err(PagewerkError::MissingSurface),
        }
    }
}

/// Mutable painting view handed to the rendering engine.
pub struct Canvas<'a> {
    surface: &'a mut DrawingSurface,
    context: &'a mut PaintContext,
}

impl Canvas<'_> {
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn set_fill_style(&mut self, colour: Rgba<u8>) {
        self.context.fill_style = colour;
    }

    /// Fill a rectangle with the current fill style. Clamped to the surface.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32) {
        let colour = self.context.fill_style;
        let x_end = x.saturating_add(width).min(self.width());
        let y_end = y.saturating_add(height).min(self.height());
        for py in y.min(y_end)..y_end {
            for px in x.min(x_end)..x_end {
                self.surface.pixels.put_pixel(px, py, colour);
            }
        }
    }

    /// Copy `image` onto the surface with its top-left corner at (x, y).
    /// Pixels falling outside the surface are clipped.
    pub fn draw_image(&mut self, image: &RgbaImage, x: i64, y: i64) {
        image::imageops::replace(&mut self.surface.pixels, image, x, y);
    }

    /// Direct access to the pixel buffer.
    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.surface.pixels
    }
}

/// Allocates and releases drawing surfaces.
///
/// Implementations must be usable from several in-flight renders at once
/// (`&self` methods); each render owns the handle it was given.
pub trait SurfaceFactory {
    /// Allocate a `width × height` surface and bind a paint context to it.
    fn create(&self, width: u32, height: u32) -> Result<SurfaceHandle>;

    /// Resize the surface in place and bind a fresh paint context.
    fn reset(&self, handle: &mut SurfaceHandle, width: u32, height: u32) -> Result<()>;

    /// Release the pixel buffer and clear both surface and context.
    fn destroy(&self, handle: &mut SurfaceHandle) -> Result<()>;
}

/// Default factory backed by `image::RgbaImage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterSurfaceFactory;

impl SurfaceFactory for RasterSurfaceFactory {
    fn create(&self, width: u32, height: u32) -> Result<SurfaceHandle> {
        check_dimensions(width, height)?;
        debug!(width, height, "allocating drawing surface");
        Ok(SurfaceHandle {
            surface: Some(DrawingSurface {
                pixels: RgbaImage::from_pixel(width, height, WHITE),
            }),
            context: Some(PaintContext::bound_to(width, height)),
        })
    }

    fn reset(&self, handle: &mut SurfaceHandle, width: u32, height: u32) -> Result<()> {
        let surface = handle.surface.as_mut().ok_or(PagewerkError::MissingSurface)?;
        check_dimensions(width, height)?;
        // Existing pixels are discarded rather than preserved.
        surface.pixels = RgbaImage::from_pixel(width, height, WHITE);
        handle.context = Some(PaintContext::bound_to(width, height));
        Ok(())
    }

    fn destroy(&self, handle: &mut SurfaceHandle) -> Result<()> {
        let surface = handle.surface.take().ok_or(PagewerkError::MissingSurface)?;
        handle.context = None;
        debug!(
            width = surface.width(),
            height = surface.height(),
            "releasing drawing surface"
        );
        drop(surface);
        Ok(())
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    let pixels = u64::from(width) * u64::from(height);
    if pixels == 0 || pixels > MAX_SURFACE_PIXELS {
        return Err(PagewerkError::InvalidDimension { width, height });
    }
    Ok(())
}

/// A surface borrowed from a factory for the duration of one render.
///
/// Destroys the surface when dropped, so the buffer is released on success,
/// on error, and when the owning future is cancelled mid-render.
pub struct SurfaceLease<'f, F: SurfaceFactory + ?Sized> {
    factory: &'f F,
    handle: SurfaceHandle,
}

impl<'f, F: SurfaceFactory + ?Sized> SurfaceLease<'f, F> {
    pub fn acquire(factory: &'f F, width: u32, height: u32) -> Result<Self> {
        let handle = factory.create(width, height)?;
        Ok(Self { factory, handle })
    }

    pub fn canvas(&mut self) -> Result<Canvas<'_>> {
        self.handle.canvas()
    }

    pub fn surface(&self) -> Result<&DrawingSurface> {
        self.handle
            .surface
            .as_ref()
            .ok_or(PagewerkError::MissingSurface)
    }
}

impl<F: SurfaceFactory + ?Sized> Drop for SurfaceLease<'_, F> {
    fn drop(&mut self) {
        if self.handle.surface.is_none() {
            return;
        }
        if let Err(err) = self.factory.destroy(&mut self.handle) {
            warn!(%err, "failed to release drawing surface");
        }
    }
}
