//! Deterministic value noise used to break up flat voxel colours.
//!
//! Pure functions, no state. The hash is the classic `fract(sin(x) * k)`
//! construction, so results depend only on the seed.

use glam::Vec3;

/// Hash a scalar seed into [0, 1).
#[inline]
pub fn hash(seed: f32) -> f32 {
    let v = seed.sin() * 43758.5453;
    v - v.floor()
}

/// Smoothly interpolated 3D value noise in [0, 1).
///
/// Lattice corners are hashed from `x + 57 y + 113 z`; the fractional part
/// is eased with `3t² - 2t³` before trilinear blending.
pub fn value_noise(seed: Vec3) -> f32 {
    let cell = seed.floor();
    let t = seed - cell;
    let t = t * t * (Vec3::splat(3.0) - 2.0 * t);

    let base = cell.x + cell.y * 57.0 + 113.0 * cell.z;
    let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;

    let near = lerp(
        lerp(hash(base), hash(base + 1.0), t.x),
        lerp(hash(base + 57.0), hash(base + 58.0), t.x),
        t.y,
    );
    let far = lerp(
        lerp(hash(base + 113.0), hash(base + 114.0), t.x),
        lerp(hash(base + 170.0), hash(base + 171.0), t.x),
        t.y,
    );
    lerp(near, far, t.z)
}
