//! Front-to-back "over" compositing along a ray.

use glam::{Vec3, Vec4};

/// Accumulated alpha at which the march stops.
pub const OPAQUE_ALPHA: f32 = 1.0;

/// Blend a voxel of colour `color` and coverage `alpha` behind everything
/// accumulated in `acc` so far.
#[inline]
pub fn composite_over(acc: Vec4, color: Vec3, alpha: f32) -> Vec4 {
    let rgb = acc.truncate().lerp(color, (1.0 - acc.w) * alpha);
    rgb.extend((acc.w + alpha).min(OPAQUE_ALPHA))
}

#[inline]
pub fn is_opaque(acc: Vec4) -> bool {
    acc.w >= OPAQUE_ALPHA
}
