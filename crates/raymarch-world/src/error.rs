use thiserror::Error;

/// Precondition violations in shape generation. Never clamped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("sponge density must be within [0, 1], got {0}")]
    DensityOutOfRange(f64),

    #[error("column radius must be within (0, 1), got {0}")]
    RadiusOutOfRange(f64),
}
