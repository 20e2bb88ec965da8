use glam::{IVec3, UVec3};

use crate::constants::{
    ALPHA_MASK, ALPHA_SHIFT, COLOR_LIGHT_BASELINE, COLOR_SATURATION, HUE_MASK, HUE_SHIFT,
};

/// Offset of a placement or of the scrolled scene window, in voxels.
pub type WorldCoord = IVec3;

/// Coordinate of a cell inside a volume.
pub type CellCoord = UVec3;

/// Packed voxel: eleven bitfields in one u32 (layout in `constants`).
///
/// Alpha 0 means empty: such a voxel never contributes to shading,
/// occlusion or blending whatever its other fields hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(transparent)]
pub struct Voxel(pub u32);

impl Voxel {
    /// The canonical empty voxel (all fields zero).
    pub const EMPTY: Voxel = Voxel(0);

    pub fn empty() -> Self {
        Self::EMPTY
    }

    /// Build a voxel from an RGBA colour. Alpha keeps the top 3 bits of `a`,
    /// hue comes from `rgb_to_hue`, saturation is maxed and light sits at
    /// the colour baseline. Material fields stay zero.
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        crate::math::pack_voxel(VoxelFields {
            saturation: COLOR_SATURATION,
            alpha: a >> 5,
            hue: crate::math::rgb_to_hue(r, g, b),
            light: COLOR_LIGHT_BASELINE,
            ..VoxelFields::default()
        })
    }

    /// Opaque colour shorthand.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba(r, g, b, u8::MAX)
    }

    /// Raw 3-bit alpha level (0..=7).
    #[inline]
    pub fn alpha_level(self) -> u8 {
        ((self.0 >> ALPHA_SHIFT) & ALPHA_MASK) as u8
    }

    /// Raw 4-bit hue value (0..=15).
    #[inline]
    pub fn hue_value(self) -> u8 {
        ((self.0 >> HUE_SHIFT) & HUE_MASK) as u8
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.alpha_level() == 0
    }

    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }
}

/// Material phase stored in the 2-bit state field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum MaterialState {
    #[default]
    Gas = 0,
    Liquid = 1,
    Solid = 2,
    Plasma = 3,
}

impl MaterialState {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            0 => MaterialState::Gas,
            1 => MaterialState::Liquid,
            2 => MaterialState::Solid,
            _ => MaterialState::Plasma,
        }
    }
}

/// Unpacked raw field values of a voxel, each within its bit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoxelFields {
    /// 2 bits.
    pub saturation: u8,
    /// 3 bits. 0 = empty.
    pub alpha: u8,
    /// 3 bits, RGB tint flags from nearby light (bit 2 = red).
    pub tint: u8,
    /// 4 bits. 0..=3 greyscale level, 4..=15 hue bucket.
    pub hue: u8,
    /// 4 bits, accumulated local light.
    pub light: u8,
    /// 2 bits, see `MaterialState`.
    pub state: u8,
    /// 3 bits.
    pub temperature: u8,
    /// 3 bits: outward, N, W, E, S, up, down, inward.
    pub direction: u8,
    /// 2 bits.
    pub density: u8,
    /// 3 bits.
    pub strength: u8,
    /// 3 bits.
    pub fill_level: u8,
}
