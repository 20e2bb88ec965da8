//! Generators for the standard volumes used to build scenes.
//! All return a freshly allocated volume of the requested size.

use glam::UVec3;
use rand::Rng;
use raymarch_core::{Voxel, Volume};

use crate::error::ShapeError;

/// Every cell set to `voxel`.
pub fn solid(size: UVec3, voxel: Voxel) -> Volume {
    let mut volume = Volume::with_size(size);
    volume.fill(voxel);
    volume
}

/// Ellipsoid touching the volume boundary at its extremes.
///
/// Cell `(i, j, k)` is set when `Σ ((i - r) / r)² < 1` with half-extents
/// `r = size / 2` on each axis.
pub fn ellipsoid(size: UVec3, voxel: Voxel) -> Volume {
    let mut volume = Volume::with_size(size);
    let radius = size.as_dvec3() / 2.0;

    for x in 0..size.x {
        let px = square((x as f64 - radius.x) / radius.x);
        for y in 0..size.y {
            let py = square((y as f64 - radius.y) / radius.y);
            for z in 0..size.z {
                let pz = square((z as f64 - radius.z) / radius.z);
                if px + py + pz < 1.0 {
                    volume[UVec3::new(x, y, z)] = voxel;
                }
            }
        }
    }

    volume
}

/// Each cell independently set with probability `density`.
///
/// The random source is injected so callers can seed it.
pub fn random_sponge(
    size: UVec3,
    density: f64,
    voxel: Voxel,
    rng: &mut impl Rng,
) -> Result<Volume, ShapeError> {
    if !(0.0..=1.0).contains(&density) {
        return Err(ShapeError::DensityOutOfRange(density));
    }

    let mut volume = Volume::with_size(size);
    for x in 0..size.x {
        for y in 0..size.y {
            for z in 0..size.z {
                if rng.gen::<f64>() < density {
                    volume[UVec3::new(x, y, z)] = voxel;
                }
            }
        }
    }

    Ok(volume)
}

/// Vertical column with a solid base plate and cap.
///
/// Layers `y = 0` and `y = size.y - 1` are fully set; interior layers keep
/// the cells where `((i - rx) / rx)² + ((k - rz) / rz)² < radius`.
pub fn column(size: UVec3, radius: f64, voxel: Voxel) -> Result<Volume, ShapeError> {
    if !(radius > 0.0 && radius < 1.0) {
        return Err(ShapeError::RadiusOutOfRange(radius));
    }

    let mut volume = Volume::with_size(size);
    let rx = size.x as f64 / 2.0;
    let rz = size.z as f64 / 2.0;

    for x in 0..size.x {
        let px = square((x as f64 - rx) / rx);
        for y in 0..size.y {
            let plate = y == 0 || y == size.y - 1;
            for z in 0..size.z {
                let pz = square((z as f64 - rz) / rz);
                if plate || px + pz < radius {
                    volume[UVec3::new(x, y, z)] = voxel;
                }
            }
        }
    }

    Ok(volume)
}

#[inline]
fn square(value: f64) -> f64 {
    value * value
}
