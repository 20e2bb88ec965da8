//! Ambient occlusion from the eight cells surrounding a hit face.
//!
//! The cells sharing an edge or corner with the face (one layer out along
//! the normal) each contribute their alpha, weighted by how close the hit
//! point lies to them across the face. The strongest contribution wins.

use glam::{IVec3, Vec3};

use crate::kernel::HitFace;
use crate::layout::VoxelImage;

/// Scale applied to the strongest weighted occluder.
pub const AO_STRENGTH: f32 = 0.5;

/// Occlusion in [0, 0.5] for a hit at `hit` on `face` of `cell`.
pub fn ambient_occlusion(image: &VoxelImage, cell: IVec3, face: &HitFace, hit: Vec3) -> f32 {
    let fraction = hit - hit.floor();
    let along_right = fraction.dot(face.right);
    let along_up = fraction.dot(face.up);

    let outside = cell + face.normal.as_ivec3();
    let right = face.right.as_ivec3();
    let up = face.up.as_ivec3();
    let alpha = |offset: IVec3| alpha_of(image, outside + offset);

    let samples = [
        alpha(up) * along_up,
        alpha(-up) * (1.0 - along_up),
        alpha(right) * along_right,
        alpha(-right) * (1.0 - along_right),
        alpha(up + right) * along_up.min(along_right),
        alpha(up - right) * along_up.min(1.0 - along_right),
        alpha(-up + right) * (1.0 - along_up).min(along_right),
        alpha(-up - right) * (1.0 - along_up).min(1.0 - along_right),
    ];
    let occlusion = samples.into_iter().fold(0.0f32, f32::max);

    (occlusion * AO_STRENGTH).clamp(0.0, 1.0)
}

fn alpha_of(image: &VoxelImage, cell: IVec3) -> f32 {
    raymarch_core::decode_voxel(image.fetch(cell)).alpha
}

#[cfg(test)]
mod tests {
    use super::*;
    use raymarch_core::{Voxel, Volume};

    fn top_face() -> HitFace {
        HitFace::select(Vec3::new(0.0, 0.5, 0.0))
    }

    #[test]
    fn test_open_surface_has_no_occlusion() {
        let mut volume = Volume::new(3, 3, 3);
        volume.set(1, 1, 1, Voxel::from_rgb(255, 0, 0)).unwrap();
        let image = VoxelImage::from_volume(&volume);
        let ao = ambient_occlusion(&image, IVec3::ONE, &top_face(), Vec3::new(1.5, 2.0, 1.5));
        assert_eq!(ao, 0.0);
    }

    #[test]
    fn test_neighbour_above_edge_occludes() {
        let mut volume = Volume::new(3, 3, 3);
        let solid = Voxel::from_rgb(255, 0, 0);
        volume.set(1, 1, 1, solid).unwrap();
        // Cell above the hit face, one step along +X (the face's right axis).
        volume.set(2, 2, 1, solid).unwrap();
        let image = VoxelImage::from_volume(&volume);

        let near = ambient_occlusion(&image, IVec3::ONE, &top_face(), Vec3::new(1.9, 2.0, 1.5));
        let far = ambient_occlusion(&image, IVec3::ONE, &top_face(), Vec3::new(1.1, 2.0, 1.5));
        assert!((near - 0.45).abs() < 1e-4, "near {near}");
        assert!((far - 0.05).abs() < 1e-4, "far {far}");
    }

    #[test]
    fn test_x_face_samples_along_y_and_z() {
        let mut volume = Volume::new(3, 3, 3);
        let solid = Voxel::from_rgb(255, 0, 0);
        volume.set(1, 1, 1, solid).unwrap();
        // Beyond the +X face, one step along +Y.
        volume.set(2, 2, 1, solid).unwrap();
        let image = VoxelImage::from_volume(&volume);
        let face = HitFace::select(Vec3::new(0.5, 0.1, 0.0));
        assert_eq!((face.right, face.up), (Vec3::Y, Vec3::Z));

        let near = ambient_occlusion(&image, IVec3::ONE, &face, Vec3::new(2.0, 1.9, 1.5));
        let far = ambient_occlusion(&image, IVec3::ONE, &face, Vec3::new(2.0, 1.1, 1.5));
        assert!((near - 0.45).abs() < 1e-4, "near {near}");
        assert!((far - 0.05).abs() < 1e-4, "far {far}");

        // Moving along Z towards the occluder's row does not change the Y weight.
        let along_z = ambient_occlusion(&image, IVec3::ONE, &face, Vec3::new(2.0, 1.9, 1.9));
        assert!((along_z - 0.45).abs() < 1e-4, "along z {along_z}");
    }

    #[test]
    fn test_z_face_samples_along_x_and_y() {
        let mut volume = Volume::new(3, 3, 3);
        let solid = Voxel::from_rgb(255, 0, 0);
        volume.set(1, 1, 1, solid).unwrap();
        // In front of the -Z face, one step along +Y.
        volume.set(1, 2, 0, solid).unwrap();
        let image = VoxelImage::from_volume(&volume);
        let face = HitFace::select(Vec3::new(0.1, 0.0, -0.5));
        assert_eq!(face.normal, Vec3::NEG_Z);
        assert_eq!((face.right, face.up), (Vec3::X, Vec3::Y));

        let near = ambient_occlusion(&image, IVec3::ONE, &face, Vec3::new(1.5, 1.8, 1.0));
        let far = ambient_occlusion(&image, IVec3::ONE, &face, Vec3::new(1.5, 1.2, 1.0));
        assert!((near - 0.4).abs() < 1e-4, "near {near}");
        assert!((far - 0.1).abs() < 1e-4, "far {far}");

        // An occluder behind the face plays no part.
        volume.set(1, 2, 2, solid).unwrap();
        let image = VoxelImage::from_volume(&volume);
        let behind = ambient_occlusion(&image, IVec3::ONE, &face, Vec3::new(1.5, 1.2, 1.0));
        assert!((behind - 0.1).abs() < 1e-4, "behind {behind}");
    }

    #[test]
    fn test_translucent_occluder_scales_with_alpha() {
        let mut volume = Volume::new(3, 3, 3);
        volume.set(1, 1, 1, Voxel::from_rgb(255, 0, 0)).unwrap();
        // Alpha level 1 of 7.
        volume.set(1, 2, 2, Voxel::from_rgba(0, 0, 255, 32)).unwrap();
        let image = VoxelImage::from_volume(&volume);
        let ao = ambient_occlusion(&image, IVec3::ONE, &top_face(), Vec3::new(1.5, 2.0, 2.0 - 1e-3));
        assert!(ao > 0.0 && ao <= 0.5 / 7.0 + 1e-4, "ao {ao}");
    }

    #[test]
    fn test_bounded_by_half() {
        let mut volume = Volume::new(3, 3, 3);
        volume.fill(Voxel::from_rgb(255, 255, 255));
        let image = VoxelImage::from_volume(&volume);
        let ao = ambient_occlusion(&image, IVec3::new(1, 0, 1), &top_face(), Vec3::new(1.99, 1.0, 1.99));
        assert!(ao <= AO_STRENGTH);
        assert!(ao > 0.49);
    }
}
