//! Voxel data model shared by the scene and render crates: the packed
//! 32-bit voxel codec, the dense `Volume` container, render parameters and
//! settings.

pub mod constants;
pub mod error;
pub mod math;
pub mod params;
pub mod settings;
pub mod types;
pub mod volume;

pub use error::{ConfigError, VolumeError};
pub use math::{decode_voxel, pack_voxel, rgb_to_hue, unpack_voxel, DecodedVoxel};
pub use params::RenderParams;
pub use settings::Settings;
pub use types::{MaterialState, Voxel, VoxelFields};
pub use volume::Volume;
