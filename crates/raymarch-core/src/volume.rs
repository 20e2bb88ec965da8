use std::ops::{Index, IndexMut};

use glam::{IVec3, UVec3};

use crate::error::VolumeError;
use crate::types::{CellCoord, Voxel};

/// Dense 3D grid of voxels with fixed extents.
///
/// Storage is X fastest, then Y, then Z:
/// `index = x + size.x * (y + size.y * z)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    size: UVec3,
    data: Vec<Voxel>,
}

impl Volume {
    /// Allocate an all-empty volume of exactly `x * y * z` voxels.
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self::with_size(UVec3::new(x, y, z))
    }

    pub fn with_size(size: UVec3) -> Self {
        let len = size.x as usize * size.y as usize * size.z as usize;
        Self {
            size,
            data: vec![Voxel::EMPTY; len],
        }
    }

    pub fn size(&self) -> UVec3 {
        self.size
    }

    pub fn size_x(&self) -> u32 {
        self.size.x
    }

    pub fn size_y(&self) -> u32 {
        self.size.y
    }

    pub fn size_z(&self) -> u32 {
        self.size.z
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether `(x, y, z)` lies inside the volume.
    #[inline]
    pub fn contains(&self, x: u32, y: u32, z: u32) -> bool {
        x < self.size.x && y < self.size.y && z < self.size.z
    }

    /// Signed variant of `contains`, for coordinates that may be negative.
    #[inline]
    pub fn contains_signed(&self, cell: IVec3) -> bool {
        cell.cmpge(IVec3::ZERO).all() && cell.as_uvec3().cmplt(self.size).all()
    }

    #[inline]
    fn linear_index(&self, x: u32, y: u32, z: u32) -> usize {
        x as usize + self.size.x as usize * (y as usize + self.size.y as usize * z as usize)
    }

    fn check(&self, x: u32, y: u32, z: u32) -> Result<usize, VolumeError> {
        if self.contains(x, y, z) {
            Ok(self.linear_index(x, y, z))
        } else {
            Err(VolumeError::OutOfBounds {
                x,
                y,
                z,
                size: self.size,
            })
        }
    }

    /// Checked read.
    pub fn get(&self, x: u32, y: u32, z: u32) -> Result<Voxel, VolumeError> {
        let idx = self.check(x, y, z)?;
        Ok(self.data[idx])
    }

    /// Checked write.
    pub fn set(&mut self, x: u32, y: u32, z: u32, voxel: Voxel) -> Result<(), VolumeError> {
        let idx = self.check(x, y, z)?;
        self.data[idx] = voxel;
        Ok(())
    }

    /// Reset every cell to the empty voxel.
    pub fn clear(&mut self) {
        self.fill(Voxel::EMPTY);
    }

    /// Set every cell to `voxel`.
    pub fn fill(&mut self, voxel: Voxel) {
        self.data.fill(voxel);
    }

    /// Copy `source` into this volume with its origin at `offset`.
    ///
    /// Cells landing at a negative coordinate are skipped; once an axis
    /// reaches this volume's extent the rest of that axis is dropped, so the
    /// copy is the half-open box intersection. Every copied cell overwrites
    /// the destination, empty source voxels included.
    pub fn insert(&mut self, offset: IVec3, source: &Volume) {
        let dest = self.size.as_i64vec3();
        let offset = offset.as_i64vec3();

        for sz in 0..source.size.z {
            let dz = offset.z + sz as i64;
            if dz < 0 {
                continue;
            }
            if dz >= dest.z {
                break;
            }
            for sy in 0..source.size.y {
                let dy = offset.y + sy as i64;
                if dy < 0 {
                    continue;
                }
                if dy >= dest.y {
                    break;
                }
                for sx in 0..source.size.x {
                    let dx = offset.x + sx as i64;
                    if dx < 0 {
                        continue;
                    }
                    if dx >= dest.x {
                        break;
                    }
                    let to = self.linear_index(dx as u32, dy as u32, dz as u32);
                    self.data[to] = source.data[source.linear_index(sx, sy, sz)];
                }
            }
        }
    }

    /// All voxels in storage order.
    pub fn voxels(&self) -> &[Voxel] {
        &self.data
    }

    /// Storage viewed as raw packed u32 words.
    pub fn as_words(&self) -> &[u32] {
        bytemuck::cast_slice(&self.data)
    }

    /// Iterate `(cell, voxel)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Voxel)> + '_ {
        let (sx, sy) = (self.size.x as usize, self.size.y as usize);
        self.data.iter().enumerate().map(move |(i, &voxel)| {
            let x = i % sx;
            let y = (i / sx) % sy;
            let z = i / (sx * sy);
            (UVec3::new(x as u32, y as u32, z as u32), voxel)
        })
    }

    /// Number of non-empty voxels.
    pub fn occupied_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_empty()).count()
    }
}

impl Index<CellCoord> for Volume {
    type Output = Voxel;

    /// Panics when `cell` is outside the volume.
    fn index(&self, cell: CellCoord) -> &Voxel {
        assert!(
            self.contains(cell.x, cell.y, cell.z),
            "voxel {cell} is outside volume of size {}",
            self.size
        );
        &self.data[self.linear_index(cell.x, cell.y, cell.z)]
    }
}

impl IndexMut<CellCoord> for Volume {
    fn index_mut(&mut self, cell: CellCoord) -> &mut Voxel {
        assert!(
            self.contains(cell.x, cell.y, cell.z),
            "voxel {cell} is outside volume of size {}",
            self.size
        );
        let idx = self.linear_index(cell.x, cell.y, cell.z);
        &mut self.data[idx]
    }
}
