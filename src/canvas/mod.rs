//! Doodle canvas
//!
//! A tiny-skia drawing surface and the countdown-gated doodle zone built on
//! top of it.

pub mod doodle;
pub mod surface;

pub use doodle::{DoodleStatus, DoodleZone, StrokeStart, EXPIRY_NOTICE};
pub use surface::{DrawingSurface, InputSource, Point, SurfaceError};
