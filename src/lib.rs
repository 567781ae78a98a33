//! Analog clock rendering.
//!
//! The dial, minute marks and numerals are rendered once into an off-screen buffer.
//! Every tick the buffer is copied onto the live surface and the hands are drawn on
//! top, positioned from the current time with sub-unit smoothing.

// ============================================================================
// MODULES
// ============================================================================

pub mod clock;
pub mod config;
pub mod error;
pub mod geometry;
pub mod raster;
pub mod scene;
pub mod surface;
pub mod time;
pub mod window;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use clock::{ClockRenderer, RunningClock};
pub use config::{ClockConfig, Color, Palette, WindowConfig};
pub use error::{Error, Result};
pub use raster::{FontBook, PixelSurface};
pub use scene::{DrawCommand, FontSpec, Scene};
pub use surface::{Mount, Surface};
pub use time::{FixedTime, SystemClock, TickSchedule, TimeOfDay, TimeSource};
