use glam::{IVec3, Vec3, Vec4};

use crate::constants::MAX_MARCH_STEPS;

/// Per-frame inputs shared by every pixel invocation of the kernel.
///
/// Volume size is not repeated here: the kernel reads it from the packed
/// voxel image it is handed, so the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    /// Integer scroll of the scene window; only seeds colour noise.
    pub scene_offset: IVec3,
    pub light_position: Vec3,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub near_clip: f32,
    /// Horizontal field of view in degrees.
    pub field_of_view: f32,
    pub fog_distance: f32,
    /// Alpha is 1 for the primary pass.
    pub fog_color: Vec4,
    pub max_steps: u32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            scene_offset: IVec3::ZERO,
            light_position: Vec3::new(0.0, 1024.0, 0.0),
            camera_position: Vec3::ZERO,
            camera_target: Vec3::Z,
            near_clip: 0.01,
            field_of_view: 75.0,
            fog_distance: 256.0,
            fog_color: Vec4::new(0.5, 0.5, 0.5, 1.0),
            max_steps: MAX_MARCH_STEPS,
        }
    }
}
