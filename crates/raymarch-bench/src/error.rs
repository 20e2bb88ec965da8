use std::path::PathBuf;

use raymarch_core::ConfigError;
use raymarch_render::RenderError;
use raymarch_world::ShapeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Config(#[from] ConfigError),

    #[error("scene construction failed: {0}")]
    Shape(#[from] ShapeError),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("baseline JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
