use glam::UVec3;
use thiserror::Error;

/// Errors from checked volume access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VolumeError {
    #[error("voxel ({x}, {y}, {z}) is outside volume of size {size}")]
    OutOfBounds { x: u32, y: u32, z: u32, size: UVec3 },
}

/// Errors from loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse settings RON: {0}")]
    Parse(String),

    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
