//! Error types for startup and drawing.

use thiserror::Error;

/// Fatal failures while bringing the game up. The loop never starts.
#[derive(Debug, Error)]
pub enum InitError {
    /// No browser window or document to attach to.
    #[error("browser window or document unavailable")]
    NoDocument,

    /// The canvas element is missing from the page.
    #[error("canvas element '{0}' not found")]
    CanvasNotFound(String),

    /// The element exists but is not a canvas.
    #[error("element '{0}' is not a canvas")]
    NotACanvas(String),

    /// The 2D rendering context could not be acquired.
    #[error("failed to get 2D context: {0}")]
    ContextUnavailable(String),
}

/// A single draw call failed. Logged and skipped; the next frame retries.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("canvas call failed: {0}")]
    Canvas(String),
}
