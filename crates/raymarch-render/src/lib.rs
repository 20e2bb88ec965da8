//! CPU raymarch renderer for packed voxel volumes.
//!
//! The scene volume is packed into a 2D voxel image, every pixel is
//! marched independently in parallel, and the frame is post-filtered with
//! FXAA.

pub mod ao;
pub mod error;
pub mod frame;
pub mod fxaa;
pub mod kernel;
pub mod layout;
pub mod lighting;
pub mod noise;
pub mod renderer;
pub mod transparency;

pub use error::RenderError;
pub use frame::FrameBuffer;
pub use kernel::{shade_pixel, MarchOutcome, MarchResult, ShadingContext};
pub use layout::VoxelImage;
pub use renderer::{FrameStats, Renderer};
