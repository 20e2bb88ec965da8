//! Per-pixel raymarch and shading.
//!
//! Every pixel is independent: `shade_pixel` reads only the frame's shared
//! inputs and returns one colour, so the driver can evaluate pixels in any
//! order on any thread.

use glam::{BVec3, UVec2, Vec2, Vec3, Vec3Swizzles, Vec4};
use raymarch_core::{decode_voxel, RenderParams};

use crate::ao::ambient_occlusion;
use crate::layout::VoxelImage;
use crate::lighting::{fog_factor, point_light, shade};
use crate::noise::value_noise;
use crate::transparency::{composite_over, is_opaque};

/// Added to every ray direction component.
pub const DIRECTION_EPSILON: f32 = 1e-6;

/// Distance the march origin is pushed past the volume entry point.
pub const ENTRY_NUDGE: f32 = 1e-4;

/// Amplitude of the per-cell colour noise.
pub const COLOR_NOISE: f32 = 0.3;

/// Orthonormal camera frame with world +Y as the reference up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl CameraBasis {
    pub fn look_at(position: Vec3, target: Vec3) -> Self {
        let forward = (target - position).normalize();
        let right = Vec3::Y.cross(forward).normalize();
        let up = forward.cross(right).normalize();
        Self { forward, right, up }
    }
}

/// Near-clip plane the primary rays start from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Lower-left corner in world space.
    pub origin: Vec3,
    /// World-space width and height.
    pub extent: Vec2,
    pub right: Vec3,
    pub up: Vec3,
}

impl Viewport {
    /// Width is `2 * near * tan(fov / 2)`; height follows the aspect ratio.
    pub fn new(camera: Vec3, basis: &CameraBasis, near: f32, fov_degrees: f32, resolution: UVec2) -> Self {
        let width = 2.0 * near * (fov_degrees * 0.5).to_radians().tan();
        let extent = Vec2::new(width, width * resolution.y as f32 / resolution.x as f32);
        let origin = camera + basis.forward * near
            - 0.5 * extent.x * basis.right
            - 0.5 * extent.y * basis.up;
        Self {
            origin,
            extent,
            right: basis.right,
            up: basis.up,
        }
    }

    /// Point on the plane for normalised viewport coordinates, (0, 0) at
    /// the lower left.
    #[inline]
    pub fn point(&self, uv: Vec2) -> Vec3 {
        self.origin + uv.x * self.extent.x * self.right + uv.y * self.extent.y * self.up
    }
}

/// Slab-method ray/box test. Returns the entry distance (clamped to 0 when
/// the origin is inside) if the far plane lies beyond it.
#[inline]
pub fn ray_box_intersect(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let to_min = (min - origin) / direction;
    let to_max = (max - origin) / direction;
    let far = to_min.max(to_max);
    let near = to_min.min(to_max);

    let back = far.min_element();
    let depth = near.x.max(0.0).max(near.y.max(near.z));
    (back > depth).then_some(depth)
}

/// Half-open containment: `min <= p < max` on every axis.
#[inline]
pub fn is_inside_box(point: Vec3, min: Vec3, max: Vec3) -> bool {
    point.cmpge(min).all() && point.cmplt(max).all()
}

/// Sign with zero mapping to zero.
#[inline]
fn sign(v: Vec3) -> Vec3 {
    Vec3::new(sign1(v.x), sign1(v.y), sign1(v.z))
}

#[inline]
fn sign1(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// The cell face a ray hit, with the two tangent axes spanning it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitFace {
    pub normal: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl HitFace {
    /// Pick the face from the hit point's offset to the cell centre. The
    /// largest component wins; ties fall through Y, then X, then Z.
    pub fn select(offset: Vec3) -> Self {
        let a = offset.abs();
        if a.y > a.x && a.y > a.z {
            Self {
                normal: Vec3::new(0.0, sign1(offset.y), 0.0),
                right: Vec3::X,
                up: Vec3::Z,
            }
        } else if a.x > a.z {
            Self {
                normal: Vec3::new(sign1(offset.x), 0.0, 0.0),
                right: Vec3::Y,
                up: Vec3::Z,
            }
        } else {
            Self {
                normal: Vec3::new(0.0, 0.0, sign1(offset.z)),
                right: Vec3::X,
                up: Vec3::Y,
            }
        }
    }
}

/// Why the march for a pixel stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarchOutcome {
    /// The ray never entered the volume.
    Missed,
    /// Accumulated coverage reached 1.
    Occluded,
    /// The ray left the volume.
    Exited,
    /// The iteration cap was reached.
    StepLimit,
    /// A non-empty cell failed its own box test; resolved to fog.
    Fogged,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchResult {
    pub color: Vec4,
    /// Cells visited.
    pub steps: u32,
    pub outcome: MarchOutcome,
}

/// Per-frame inputs shared by every pixel, with the camera frame and
/// viewport derived once.
#[derive(Debug, Clone, Copy)]
pub struct ShadingContext {
    pub params: RenderParams,
    pub basis: CameraBasis,
    pub viewport: Viewport,
    pub resolution: UVec2,
    pub volume_size: Vec3,
}

impl ShadingContext {
    pub fn new(params: RenderParams, resolution: UVec2, image: &VoxelImage) -> Self {
        let basis = CameraBasis::look_at(params.camera_position, params.camera_target);
        let viewport = Viewport::new(
            params.camera_position,
            &basis,
            params.near_clip,
            params.field_of_view,
            resolution,
        );
        Self {
            params,
            basis,
            viewport,
            resolution,
            volume_size: image.volume_size().as_vec3(),
        }
    }

    /// Primary ray through the centre of pixel `(x, y)`, `y` counted from
    /// the bottom row. Returns the origin on the near plane and the
    /// direction.
    pub fn primary_ray(&self, x: u32, y: u32) -> (Vec3, Vec3) {
        let uv = (Vec2::new(x as f32, y as f32) + 0.5) / self.resolution.as_vec2();
        let origin = self.viewport.point(uv);
        let direction = (origin - self.params.camera_position).normalize() + DIRECTION_EPSILON;
        // The epsilon can cancel a component of exactly -1e-6.
        let direction = Vec3::select(direction.cmpeq(Vec3::ZERO), Vec3::splat(DIRECTION_EPSILON), direction);
        (origin, direction)
    }
}

/// Shade pixel `(x, y)`, `y` counted from the bottom row.
pub fn shade_pixel(ctx: &ShadingContext, image: &VoxelImage, x: u32, y: u32) -> MarchResult {
    let (origin, direction) = ctx.primary_ray(x, y);
    march(ctx, image, origin, direction)
}

/// March one ray through the voxel image, compositing front to back.
pub fn march(ctx: &ShadingContext, image: &VoxelImage, origin: Vec3, direction: Vec3) -> MarchResult {
    let params = &ctx.params;
    let fog = params.fog_color;
    let size = ctx.volume_size;

    let mut march_origin = origin;
    if !is_inside_box(origin, Vec3::ZERO, size) {
        let Some(depth) = ray_box_intersect(origin, direction, Vec3::ZERO, size) else {
            return MarchResult {
                color: fog.truncate().extend(0.0),
                steps: 0,
                outcome: MarchOutcome::Missed,
            };
        };
        march_origin = origin + direction * depth + direction * ENTRY_NUDGE;
    }

    let mut cell = march_origin.floor();
    let step = sign(direction);
    let mut t_max = ((cell + 0.5) + 0.5 * step - march_origin) / direction;
    let t_delta = step / direction;

    let noise_seed = params.scene_offset.as_vec3();
    let mut color = fog.truncate().extend(0.0);

    for iteration in 0..params.max_steps {
        let steps = iteration + 1;
        let cell_i = cell.as_ivec3();
        let voxel = image.fetch(cell_i);

        if !voxel.is_empty() {
            let Some(depth) = ray_box_intersect(origin, direction, cell, cell + Vec3::ONE) else {
                return MarchResult {
                    color: color.lerp(fog, fog.w),
                    steps,
                    outcome: MarchOutcome::Fogged,
                };
            };

            let decoded = decode_voxel(voxel);
            let hit = origin + direction * depth;
            let face = HitFace::select(hit - (cell + 0.5));

            let occlusion = ambient_occlusion(image, cell_i, &face, hit);
            let light = point_light(face.normal, params.light_position, hit, occlusion);
            let fogged = fog_factor(hit, params.camera_position, params.fog_distance);

            let base = decoded.color() + COLOR_NOISE * value_noise(cell + noise_seed);
            let lit = shade(base, light, fog, fogged);

            color = composite_over(color, lit, decoded.alpha);
            if is_opaque(color) {
                return MarchResult {
                    color,
                    steps,
                    outcome: MarchOutcome::Occluded,
                };
            }
        }

        let advance: BVec3 = t_max.cmple(t_max.yzx().min(t_max.zxy()));
        t_max += Vec3::select(advance, t_delta, Vec3::ZERO);
        cell += Vec3::select(advance, step, Vec3::ZERO);

        if !is_inside_box(cell, Vec3::ZERO, size) {
            return MarchResult {
                color: color.truncate().extend(1.0),
                steps,
                outcome: MarchOutcome::Exited,
            };
        }
    }

    MarchResult {
        color: color.truncate().extend(1.0),
        steps: params.max_steps,
        outcome: MarchOutcome::StepLimit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use raymarch_core::{Voxel, Volume};

    fn params_looking_down_z(camera: Vec3) -> RenderParams {
        RenderParams {
            scene_offset: IVec3::ZERO,
            light_position: Vec3::new(camera.x, camera.y, -1000.0),
            camera_position: camera,
            camera_target: camera + Vec3::Z,
            fog_distance: 1.0e6,
            ..RenderParams::default()
        }
    }

    fn context(params: RenderParams, image: &VoxelImage) -> ShadingContext {
        ShadingContext::new(params, UVec2::new(1, 1), image)
    }

    #[test]
    fn test_camera_basis_orthonormal() {
        let basis = CameraBasis::look_at(Vec3::new(64.0, 16.0, 0.0), Vec3::new(64.0, 0.0, 64.0));
        assert!((basis.forward.length() - 1.0).abs() < 1e-5);
        assert!(basis.forward.dot(basis.right).abs() < 1e-5);
        assert!(basis.forward.dot(basis.up).abs() < 1e-5);
        assert!(basis.right.dot(basis.up).abs() < 1e-5);
        // Looking down +Z with +Y up puts right at +X.
        assert!((basis.right - Vec3::X).length() < 1e-5);
        assert!(basis.up.y > 0.0);
    }

    #[test]
    fn test_viewport_extent() {
        let basis = CameraBasis::look_at(Vec3::ZERO, Vec3::Z);
        let viewport = Viewport::new(Vec3::ZERO, &basis, 1.0, 90.0, UVec2::new(200, 100));
        assert!((viewport.extent.x - 2.0).abs() < 1e-5);
        assert!((viewport.extent.y - 1.0).abs() < 1e-5);
        let centre = viewport.point(Vec2::splat(0.5));
        assert!((centre - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_ray_box_hit_and_miss() {
        let min = Vec3::ZERO;
        let max = Vec3::splat(4.0);
        let d = ray_box_intersect(Vec3::new(2.0, 2.0, -3.0), Vec3::new(1e-6, 1e-6, 1.0), min, max);
        assert!((d.unwrap() - 3.0).abs() < 1e-4);
        assert!(ray_box_intersect(Vec3::new(2.0, 2.0, -3.0), Vec3::new(1e-6, 1e-6, -1.0), min, max).is_none());
        assert!(ray_box_intersect(Vec3::new(9.0, 2.0, -3.0), Vec3::new(1e-6, 1e-6, 1.0), min, max).is_none());
        // From inside the entry depth clamps to zero.
        assert_eq!(ray_box_intersect(Vec3::splat(2.0), Vec3::new(1e-6, 1e-6, 1.0), min, max), Some(0.0));
    }

    #[test]
    fn test_inside_box_is_half_open() {
        let max = Vec3::splat(4.0);
        assert!(is_inside_box(Vec3::ZERO, Vec3::ZERO, max));
        assert!(!is_inside_box(Vec3::new(4.0, 0.0, 0.0), Vec3::ZERO, max));
        assert!(!is_inside_box(Vec3::new(0.0, -0.1, 0.0), Vec3::ZERO, max));
    }

    #[test]
    fn test_face_selection_ties() {
        let y = HitFace::select(Vec3::new(0.2, -0.5, 0.1));
        assert_eq!(y.normal, Vec3::NEG_Y);
        assert_eq!((y.right, y.up), (Vec3::X, Vec3::Z));

        let x = HitFace::select(Vec3::new(0.5, 0.2, 0.1));
        assert_eq!(x.normal, Vec3::X);
        assert_eq!((x.right, x.up), (Vec3::Y, Vec3::Z));

        // Y ties with X: Y loses the strict test, X beats Z.
        let tie = HitFace::select(Vec3::new(0.5, 0.5, 0.1));
        assert_eq!(tie.normal, Vec3::X);

        // All equal falls through to Z.
        let all = HitFace::select(Vec3::splat(-0.5));
        assert_eq!(all.normal, Vec3::NEG_Z);
        assert_eq!((all.right, all.up), (Vec3::X, Vec3::Y));
    }

    #[test]
    fn test_missed_box_returns_fog_without_coverage() {
        let image = VoxelImage::from_volume(&Volume::new(4, 4, 4));
        let params = RenderParams {
            camera_position: Vec3::new(2.0, 2.0, -5.0),
            camera_target: Vec3::new(2.0, 2.0, -10.0),
            ..RenderParams::default()
        };
        let result = shade_pixel(&context(params, &image), &image, 0, 0);
        assert_eq!(result.outcome, MarchOutcome::Missed);
        assert_eq!(result.steps, 0);
        assert_eq!(result.color, Vec4::new(0.5, 0.5, 0.5, 0.0));
    }

    #[test]
    fn test_opaque_voxel_terminates_march() {
        let mut volume = Volume::new(4, 4, 8);
        volume.set(2, 2, 5, Voxel::from_rgb(255, 0, 0)).unwrap();
        let image = VoxelImage::from_volume(&volume);
        let params = params_looking_down_z(Vec3::new(2.5, 2.5, -3.0));

        let result = shade_pixel(&context(params, &image), &image, 0, 0);
        assert_eq!(result.outcome, MarchOutcome::Occluded);
        assert_eq!(result.color.w, 1.0);
        // Entry at z = 0, so the hit cell is the sixth visited.
        assert!(result.steps <= 6, "steps {}", result.steps);
        // Lit head-on from -Z, so the voxel keeps most of its red.
        assert!(result.color.x > result.color.z);
    }

    #[test]
    fn test_empty_volume_exits_opaque_with_fog_colour() {
        let image = VoxelImage::from_volume(&Volume::new(4, 4, 8));
        let params = params_looking_down_z(Vec3::new(2.5, 2.5, -3.0));
        let result = shade_pixel(&context(params, &image), &image, 0, 0);
        assert_eq!(result.outcome, MarchOutcome::Exited);
        assert_eq!(result.steps, 8);
        assert_eq!(result.color, Vec4::new(0.5, 0.5, 0.5, 1.0));
    }

    #[test]
    fn test_step_limit_forces_alpha() {
        let image = VoxelImage::from_volume(&Volume::new(4, 4, 64));
        let mut params = params_looking_down_z(Vec3::new(2.5, 2.5, -3.0));
        params.max_steps = 10;
        let result = shade_pixel(&context(params, &image), &image, 0, 0);
        assert_eq!(result.outcome, MarchOutcome::StepLimit);
        assert_eq!(result.steps, 10);
        assert_eq!(result.color.w, 1.0);
    }

    #[test]
    fn test_translucent_voxels_accumulate() {
        let mut volume = Volume::new(4, 4, 8);
        // Alpha level 2 of 7 each.
        let glass = Voxel::from_rgba(0, 0, 255, 64);
        volume.set(2, 2, 2, glass).unwrap();
        volume.set(2, 2, 4, glass).unwrap();
        let image = VoxelImage::from_volume(&volume);
        let params = params_looking_down_z(Vec3::new(2.5, 2.5, -3.0));

        let result = shade_pixel(&context(params, &image), &image, 0, 0);
        // Both layers are passed through and the ray leaves the volume.
        assert_eq!(result.outcome, MarchOutcome::Exited);
        assert_eq!(result.color.w, 1.0);
        assert_eq!(result.steps, 8);
    }

    #[test]
    fn test_camera_inside_volume_starts_at_origin() {
        let mut volume = Volume::new(4, 4, 8);
        volume.set(1, 1, 6, Voxel::from_rgb(255, 255, 255)).unwrap();
        let image = VoxelImage::from_volume(&volume);
        let params = params_looking_down_z(Vec3::new(1.5, 1.5, 0.5));
        let result = shade_pixel(&context(params, &image), &image, 0, 0);
        assert_eq!(result.outcome, MarchOutcome::Occluded);
        assert_eq!(result.steps, 7);
    }

    #[test]
    fn test_scene_offset_only_seeds_noise() {
        let mut volume = Volume::new(4, 4, 8);
        volume.set(2, 2, 5, Voxel::from_rgb(255, 0, 0)).unwrap();
        let image = VoxelImage::from_volume(&volume);
        let still = params_looking_down_z(Vec3::new(2.5, 2.5, -3.0));
        let scrolled = RenderParams {
            scene_offset: IVec3::new(5, -3, 17),
            ..still
        };

        let a = shade_pixel(&context(still, &image), &image, 0, 0);
        let b = shade_pixel(&context(scrolled, &image), &image, 0, 0);
        assert_eq!(a.steps, b.steps);
        assert_eq!(a.outcome, MarchOutcome::Occluded);
        assert_eq!(b.outcome, MarchOutcome::Occluded);
        assert_ne!(a.color, b.color);
        assert_eq!(a.color.w, b.color.w);
    }

    #[test]
    fn test_cell_behind_origin_resolves_to_fog() {
        // Starting on the low X face of an occupied cell and heading -X,
        // the cell's own box lies entirely behind the ray.
        let mut volume = Volume::new(4, 4, 4);
        volume.set(1, 1, 1, Voxel::from_rgb(0, 255, 0)).unwrap();
        let image = VoxelImage::from_volume(&volume);
        let params = params_looking_down_z(Vec3::new(1.0, 1.5, -3.0));
        let ctx = context(params, &image);

        let origin = Vec3::new(1.0, 1.5, 1.5);
        let direction = Vec3::new(-1.0, DIRECTION_EPSILON, DIRECTION_EPSILON);
        let result = march(&ctx, &image, origin, direction);
        assert_eq!(result.outcome, MarchOutcome::Fogged);
        assert_eq!(result.steps, 1);
        assert!((result.color - params.fog_color).abs().max_element() < 1e-6);
    }

    #[test]
    fn test_shading_is_deterministic() {
        let mut volume = Volume::new(8, 8, 8);
        volume.fill(Voxel::from_rgb(0, 128, 255));
        let image = VoxelImage::from_volume(&volume);
        let params = params_looking_down_z(Vec3::new(4.2, 4.7, -2.0));
        let ctx = ShadingContext::new(params, UVec2::new(16, 16), &image);
        for (x, y) in [(0, 0), (7, 9), (15, 15)] {
            assert_eq!(shade_pixel(&ctx, &image, x, y), shade_pixel(&ctx, &image, x, y));
        }
    }
}
