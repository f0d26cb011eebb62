//! Waterfall canvas: rolling pixel buffer with a coalescing draw scheduler
//!
//! - `WaterfallBuffer`: fixed W×H RGBA grid, row 0 oldest, row H-1 newest
//! - `WaterfallCanvas`: turns validated frames into rows, at most one per tick
//! - `RenderSurface`: where the buffer is presented after it changes

use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::colormap::{ColorTable, Rgba};
use super::downsample::downsample_into;
use super::errors::RenderError;
use super::frame::{Frame, FRAME_LEN};

/// Background color used by `clear()` and for a fresh buffer
pub const BACKGROUND: Rgba = [0, 0, 0, 255];

// ============================================================================
// WaterfallBuffer
// ============================================================================

/// Fixed-size pixel grid. Dimensions never change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaterfallBuffer {
    width: usize,
    height: usize,
    /// Row-major, `width * height` pixels
    pixels: Vec<Rgba>,
}

impl WaterfallBuffer {
    pub fn new(width: usize, height: usize) -> Result<Self, RenderError> {
        if width == 0 || height == 0 || width > FRAME_LEN {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![BACKGROUND; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row `y`, where 0 is the oldest row and `height - 1` the newest
    pub fn row(&self, y: usize) -> &[Rgba] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Flat RGBA bytes, `width * height * 4` long
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_flattened()
    }

    /// Drop row 0, move every other row up by one, write `row` at the bottom.
    ///
    /// `row` must be exactly `width` pixels; callers build it before calling.
    fn push_row(&mut self, row: &[Rgba]) {
        debug_assert_eq!(row.len(), self.width);
        let w = self.width;
        self.pixels.copy_within(w.., 0);
        let bottom = self.pixels.len() - w;
        self.pixels[bottom..].copy_from_slice(row);
    }

    fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }
}

// ============================================================================
// RenderSurface
// ============================================================================

/// Presentation target for the buffer (texture, terminal, nothing).
pub trait RenderSurface {
    fn present(&mut self, buffer: &WaterfallBuffer) -> Result<(), RenderError>;
}

/// Surface that presents nothing; used by the headless CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl RenderSurface for Headless {
    fn present(&mut self, _buffer: &WaterfallBuffer) -> Result<(), RenderError> {
        Ok(())
    }
}

// ============================================================================
// WaterfallCanvas
// ============================================================================

/// Canvas counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanvasStats {
    /// Frames handed to `on_frame`
    pub frames_scheduled: u64,
    /// Pending frames replaced by a newer one before being drawn
    pub frames_coalesced: u64,
    pub rows_drawn: u64,
    pub render_errors: u64,
}

/// Owns the waterfall buffer and its surface.
///
/// Frame arrival is decoupled from drawing: `on_frame` only fills a single
/// pending slot, `on_tick` draws at most one row from it.
pub struct WaterfallCanvas<S: RenderSurface = Headless> {
    buffer: WaterfallBuffer,
    table: Arc<ColorTable>,
    surface: Option<S>,
    /// Latest frame not yet drawn
    pending: Option<Frame>,
    /// Buffer changed without a row being drawn (e.g. cleared)
    needs_present: bool,
    /// Reused downsampling output
    averages: Vec<f32>,
    stats: CanvasStats,
}

impl<S: RenderSurface> WaterfallCanvas<S> {
    pub fn new(width: usize, height: usize, table: Arc<ColorTable>) -> Result<Self, RenderError> {
        let buffer = WaterfallBuffer::new(width, height)?;
        debug!(width, height, "Waterfall canvas created");
        Ok(Self {
            buffer,
            table,
            surface: None,
            pending: None,
            needs_present: true,
            averages: vec![0.0; width],
            stats: CanvasStats::default(),
        })
    }

    pub fn with_surface(mut self, surface: S) -> Self {
        self.attach_surface(surface);
        self
    }

    pub fn attach_surface(&mut self, surface: S) {
        self.surface = Some(surface);
        self.needs_present = true;
    }

    pub fn detach_surface(&mut self) -> Option<S> {
        self.surface.take()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn buffer(&self) -> &WaterfallBuffer {
        &self.buffer
    }

    pub fn stats(&self) -> CanvasStats {
        self.stats
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Schedule a frame for the next tick, replacing any frame still pending.
    pub fn on_frame(&mut self, frame: Frame) {
        self.stats.frames_scheduled += 1;
        if self.pending.replace(frame).is_some() {
            self.stats.frames_coalesced += 1;
            trace!(coalesced = self.stats.frames_coalesced, "Pending frame superseded");
        }
    }

    /// Display refresh. Draws the pending frame, if any.
    ///
    /// Returns `Ok(true)` when a row was appended. On error the buffer holds
    /// its last valid contents and the pending frame is discarded.
    pub fn on_tick(&mut self) -> Result<bool, RenderError> {
        let result = match self.pending.take() {
            Some(frame) => self.draw(&frame).map(|()| true),
            None if self.needs_present && self.surface.is_some() => self.present().map(|()| false),
            None => Ok(false),
        };

        if let Err(e) = &result {
            self.stats.render_errors += 1;
            warn!(error = %e, "Error in draw");
        }
        result
    }

    fn draw(&mut self, frame: &Frame) -> Result<(), RenderError> {
        if self.surface.is_none() {
            return Err(RenderError::SurfaceDetached);
        }

        let row = self.render_row(frame)?;
        self.buffer.push_row(&row);
        self.stats.rows_drawn += 1;
        self.needs_present = true;
        trace!(rows = self.stats.rows_drawn, "Spectrogram line drawn");

        self.present()
    }

    /// Downsample and color-map one frame into a row of `width` pixels.
    pub fn render_row(&mut self, frame: &Frame) -> Result<Vec<Rgba>, RenderError> {
        let width = self.buffer.width();
        let values = frame.values();
        if values.len() < width {
            return Err(RenderError::FrameTooShort {
                len: values.len(),
                width,
            });
        }

        downsample_into(values, &mut self.averages);
        Ok(self
            .averages
            .iter()
            .map(|&avg| self.table.lookup(avg))
            .collect())
    }

    /// Reset every pixel to the background color, regardless of pending work.
    pub fn clear(&mut self) {
        self.buffer.fill(BACKGROUND);
        self.needs_present = true;
        debug!("Spectrogram cleared");
    }

    /// Drop pending work and release the surface.
    pub fn dispose(&mut self) {
        if self.pending.take().is_some() {
            trace!("Pending draw cancelled");
        }
        self.surface = None;
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let surface = self.surface.as_mut().ok_or(RenderError::SurfaceDetached)?;
        surface.present(&self.buffer)?;
        self.needs_present = false;
        Ok(())
    }
}
