//! Volume-to-image packing consumed by the kernel.
//!
//! The volume is laid out as a 2D image `size.x` wide and `size.y * size.z`
//! tall; voxel `(x, y, z)` lands at pixel `(x, y + size.y * z)`. Every texel
//! is one packed voxel word, read back as an integer.

use glam::{IVec3, UVec2, UVec3};
use raymarch_core::{Voxel, Volume};

#[derive(Debug, Clone, Default)]
pub struct VoxelImage {
    size: UVec3,
    texels: Vec<u32>,
}

impl VoxelImage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pack `volume` into a new image.
    pub fn from_volume(volume: &Volume) -> Self {
        let mut image = Self::new();
        image.upload(volume);
        image
    }

    /// Repack from `volume`, reusing the texel allocation.
    pub fn upload(&mut self, volume: &Volume) {
        self.size = volume.size();
        self.texels.clear();
        self.texels.extend_from_slice(volume.as_words());
    }

    /// Volume extents the image was packed from.
    pub fn volume_size(&self) -> UVec3 {
        self.size
    }

    /// Image dimensions in texels.
    pub fn dimensions(&self) -> UVec2 {
        UVec2::new(self.size.x, self.size.y * self.size.z)
    }

    pub fn texels(&self) -> &[u32] {
        &self.texels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    /// Image pixel holding voxel `cell`.
    #[inline]
    pub fn pixel_of(&self, cell: UVec3) -> UVec2 {
        UVec2::new(cell.x, cell.y + self.size.y * cell.z)
    }

    /// Raw texel at image pixel `(px, py)`.
    #[inline]
    pub fn texel(&self, px: u32, py: u32) -> u32 {
        self.texels[px as usize + self.size.x as usize * py as usize]
    }

    #[inline]
    pub fn contains(&self, cell: IVec3) -> bool {
        cell.cmpge(IVec3::ZERO).all() && cell.as_uvec3().cmplt(self.size).all()
    }

    /// Voxel at `cell`; cells outside the volume read as empty.
    #[inline]
    pub fn fetch(&self, cell: IVec3) -> Voxel {
        if !self.contains(cell) {
            return Voxel::EMPTY;
        }
        let pixel = self.pixel_of(cell.as_uvec3());
        Voxel(self.texel(pixel.x, pixel.y))
    }
}
