//! Error types for the clock and its window host

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for clock operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The windowing event loop could not be created or run
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The OS refused to open a window
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    /// The pixel buffer could not be created or presented
    #[error("pixel buffer failed: {0}")]
    Pixels(#[from] pixels::Error),

    #[error("pixel buffer resize failed: {0}")]
    Texture(#[from] pixels::TextureError),

    /// A font file was read but could not be parsed
    #[error("not a usable font: {}", path.display())]
    FontLoad { path: PathBuf },

    /// Numerals or a label were requested but no font face is available
    #[error("no font face available to draw {family} text")]
    MissingFont { family: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
