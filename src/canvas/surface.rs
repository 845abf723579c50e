//! Freehand drawing surface backed by a tiny-skia pixmap
//!
//! Strokes are painted eagerly: the pixmap is the only record of what was
//! drawn. Points arrive in logical coordinates relative to the surface and
//! are scaled by the device pixel ratio when painted.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};
use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Stroke,
    Transform,
};

/// Stroke width in logical pixels
pub const STROKE_WIDTH: f32 = 3.0;

/// Drawing surface errors
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("Invalid surface dimensions: {width}x{height} at pixel ratio {pixel_ratio}")]
    InvalidDimensions {
        width: f32,
        height: f32,
        pixel_ratio: f32,
    },

    #[error("Failed to create a {width}x{height} pixmap")]
    PixmapCreationFailed { width: u32, height: u32 },

    #[error("Failed to encode surface as PNG: {0}")]
    EncodingFailed(String),
}

/// A point relative to the surface's top-left corner, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Where a drag gesture came from; both are handled identically
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    #[default]
    Pointer,
    Touch,
}

/// Persistent bitmap holding every stroke painted since the last erase
#[derive(Debug)]
pub struct DrawingSurface {
    pixmap: Pixmap,
    pixel_ratio: f32,
    /// Ink for the next stroke
    ink: Color,
    /// Ink of the stroke in progress
    stroke_ink: Color,
    /// Last painted point while the pen is down
    cursor: Option<Point>,
}

impl DrawingSurface {
    /// Allocate a blank surface for a `width` x `height` logical area
    ///
    /// The backing pixmap is `ceil(width * pixel_ratio)` by
    /// `ceil(height * pixel_ratio)` device pixels and never changes size.
    pub fn mount(
        width: f32,
        height: f32,
        pixel_ratio: f32,
        ink: Color,
    ) -> Result<Self, SurfaceError> {
        let invalid = || SurfaceError::InvalidDimensions {
            width,
            height,
            pixel_ratio,
        };
        if !(width > 0.0 && height > 0.0 && pixel_ratio > 0.0) {
            return Err(invalid());
        }

        let device_width = (width * pixel_ratio).ceil();
        let device_height = (height * pixel_ratio).ceil();
        let fits = |side: f32| side.is_finite() && side <= u32::MAX as f32;
        if !fits(device_width) || !fits(device_height) {
            return Err(invalid());
        }

        let (device_width, device_height) = (device_width as u32, device_height as u32);
        let pixmap = Pixmap::new(device_width, device_height).ok_or(
            SurfaceError::PixmapCreationFailed {
                width: device_width,
                height: device_height,
            },
        )?;

        Ok(Self {
            pixmap,
            pixel_ratio,
            ink,
            stroke_ink: ink,
            cursor: None,
        })
    }

    /// Device pixel dimensions of the backing pixmap
    pub fn dimensions(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    /// Set the ink used by strokes begun from now on
    pub fn set_ink(&mut self, ink: Color) {
        self.ink = ink;
    }

    pub fn is_pen_down(&self) -> bool {
        self.cursor.is_some()
    }

    /// Put the pen down at `point`, painting a dot
    pub fn pen_down(&mut self, point: Point) {
        self.stroke_ink = self.ink;
        self.paint_dot(point);
        self.cursor = Some(point);
    }

    /// Drag the pen to `point`
    ///
    /// Paints a segment from the last point; returns false when the pen is
    /// up and nothing was painted.
    pub fn pen_move(&mut self, point: Point) -> bool {
        let Some(from) = self.cursor else {
            return false;
        };
        self.paint_segment(from, point);
        self.cursor = Some(point);
        true
    }

    /// Lift the pen; returns whether it was down
    pub fn pen_up(&mut self) -> bool {
        self.cursor.take().is_some()
    }

    /// Wipe every pixel back to transparent and lift the pen
    pub fn erase(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
        self.cursor = None;
    }

    pub fn is_blank(&self) -> bool {
        self.pixmap.data().iter().all(|&byte| byte == 0)
    }

    /// Hash of the pixel bytes, for cheap before/after comparisons
    pub fn checksum(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.pixmap.data().hash(&mut hasher);
        hasher.finish()
    }

    /// Pixel at device coordinates
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremultipliedColorU8> {
        self.pixmap.pixel(x, y)
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        self.pixmap
            .encode_png()
            .map_err(|e| SurfaceError::EncodingFailed(e.to_string()))
    }

    fn paint(&self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(self.stroke_ink);
        paint.anti_alias = true;
        paint
    }

    fn transform(&self) -> Transform {
        Transform::from_scale(self.pixel_ratio, self.pixel_ratio)
    }

    fn paint_dot(&mut self, at: Point) {
        // Non-finite points yield no path and paint nothing
        if let Some(path) = PathBuilder::from_circle(at.x, at.y, STROKE_WIDTH / 2.0) {
            let paint = self.paint();
            let transform = self.transform();
            self.pixmap
                .fill_path(&path, &paint, FillRule::Winding, transform, None);
        }
    }

    fn paint_segment(&mut self, from: Point, to: Point) {
        if from == to {
            self.paint_dot(to);
            return;
        }

        let mut path_builder = PathBuilder::new();
        path_builder.move_to(from.x, from.y);
        path_builder.line_to(to.x, to.y);

        if let Some(path) = path_builder.finish() {
            let paint = self.paint();
            let stroke = Stroke {
                width: STROKE_WIDTH,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            let transform = self.transform();
            self.pixmap
                .stroke_path(&path, &paint, &stroke, transform, None);
        }
    }
}
