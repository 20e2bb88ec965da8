//! Single source of truth for shared constants.
//! Bit layout of the packed voxel, low bits first:
//!
//! ```text
//! [0:1]   saturation   [2:4]   alpha        [5:7]   tint
//! [8:11]  hue          [12:15] light        [16:17] state
//! [18:20] temperature  [21:23] direction    [24:25] density
//! [26:28] strength     [29:31] fill level
//! ```

/// Bytes per packed voxel.
pub const VOXEL_BYTES: u32 = 4;

pub const SATURATION_SHIFT: u32 = 0;
pub const SATURATION_MASK: u32 = 0x3;

pub const ALPHA_SHIFT: u32 = 2;
pub const ALPHA_MASK: u32 = 0x7;

pub const TINT_SHIFT: u32 = 5;
pub const TINT_MASK: u32 = 0x7;

pub const HUE_SHIFT: u32 = 8;
pub const HUE_MASK: u32 = 0xF;

pub const LIGHT_SHIFT: u32 = 12;
pub const LIGHT_MASK: u32 = 0xF;

pub const STATE_SHIFT: u32 = 16;
pub const STATE_MASK: u32 = 0x3;

pub const TEMPERATURE_SHIFT: u32 = 18;
pub const TEMPERATURE_MASK: u32 = 0x7;

pub const DIRECTION_SHIFT: u32 = 21;
pub const DIRECTION_MASK: u32 = 0x7;

pub const DENSITY_SHIFT: u32 = 24;
pub const DENSITY_MASK: u32 = 0x3;

pub const STRENGTH_SHIFT: u32 = 26;
pub const STRENGTH_MASK: u32 = 0x7;

pub const FILL_LEVEL_SHIFT: u32 = 29;
pub const FILL_LEVEL_MASK: u32 = 0x7;

/// Hue values below this select a greyscale level instead of a hue bucket.
pub const HUE_GREYSCALE_LEVELS: u8 = 4;

/// Number of chromatic hue buckets (hue values 4..=15 cover 11 steps plus wrap).
pub const HUE_BUCKETS: f32 = 11.0;

/// Channel step between greyscale levels: floor(max / 85) gives 0..=3.
pub const GREYSCALE_STEP: u8 = 85;

/// Light level given to voxels built from a colour (8 of 15).
pub const COLOR_LIGHT_BASELINE: u8 = 0b1000;

/// Saturation level given to voxels built from a colour.
pub const COLOR_SATURATION: u8 = 3;

/// Per-pixel march iteration cap.
pub const MAX_MARCH_STEPS: u32 = 2048;

/// Velocity magnitude applied by a pressed directional command.
pub const DEFAULT_MOVE_SPEED: f32 = 10.0;

/// Time units for one full light revolution.
pub const DEFAULT_LIGHT_PERIOD: f32 = 60.0;

/// Default render window extents (X, Y, Z).
pub const DEFAULT_SCENE_SIZE: [u32; 3] = [128, 32, 128];
