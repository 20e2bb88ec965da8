//! Direct light and distance fog for a shaded hit.

use glam::{Vec3, Vec4};

/// Single point-light term: Lambert against the face normal, darkened by
/// occlusion. Result is in [0, 1].
#[inline]
pub fn point_light(normal: Vec3, light_position: Vec3, hit: Vec3, occlusion: f32) -> f32 {
    let to_light = (light_position - hit).normalize_or_zero();
    (1.0 - occlusion) * normal.dot(to_light).clamp(0.0, 1.0)
}

/// Fog blend factor: 0 at the camera, 1 at `fog_distance` and beyond.
#[inline]
pub fn fog_factor(hit: Vec3, camera_position: Vec3, fog_distance: f32) -> f32 {
    (hit.distance(camera_position) / fog_distance).min(1.0)
}

/// Lit voxel colour faded towards the fog colour.
#[inline]
pub fn shade(color: Vec3, light: f32, fog_color: Vec4, fog: f32) -> Vec3 {
    (color * light).lerp(fog_color.truncate(), fog)
}
