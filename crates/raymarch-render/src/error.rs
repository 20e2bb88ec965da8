use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("resolution must be non-zero, got {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("frame buffer holds {actual} pixels, expected {expected}")]
    FrameSizeMismatch { expected: usize, actual: usize },
}
