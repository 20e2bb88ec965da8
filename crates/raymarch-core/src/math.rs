use glam::{Vec3, Vec4};

use crate::constants::*;
use crate::types::{MaterialState, Voxel, VoxelFields};

/// Pack voxel fields into the single-u32 representation.
///
/// Every field must fit its bit width; overflow is a debug assertion.
pub fn pack_voxel(fields: VoxelFields) -> Voxel {
    #[inline]
    fn put(value: u8, mask: u32, shift: u32) -> u32 {
        debug_assert!(
            value as u32 <= mask,
            "field value {value} overflows mask {mask:#x}"
        );
        (value as u32 & mask) << shift
    }

    Voxel(
        put(fields.saturation, SATURATION_MASK, SATURATION_SHIFT)
            | put(fields.alpha, ALPHA_MASK, ALPHA_SHIFT)
            | put(fields.tint, TINT_MASK, TINT_SHIFT)
            | put(fields.hue, HUE_MASK, HUE_SHIFT)
            | put(fields.light, LIGHT_MASK, LIGHT_SHIFT)
            | put(fields.state, STATE_MASK, STATE_SHIFT)
            | put(fields.temperature, TEMPERATURE_MASK, TEMPERATURE_SHIFT)
            | put(fields.direction, DIRECTION_MASK, DIRECTION_SHIFT)
            | put(fields.density, DENSITY_MASK, DENSITY_SHIFT)
            | put(fields.strength, STRENGTH_MASK, STRENGTH_SHIFT)
            | put(fields.fill_level, FILL_LEVEL_MASK, FILL_LEVEL_SHIFT),
    )
}

/// Unpack every field from the single-u32 representation.
pub fn unpack_voxel(voxel: Voxel) -> VoxelFields {
    let get = |mask: u32, shift: u32| ((voxel.0 >> shift) & mask) as u8;
    VoxelFields {
        saturation: get(SATURATION_MASK, SATURATION_SHIFT),
        alpha: get(ALPHA_MASK, ALPHA_SHIFT),
        tint: get(TINT_MASK, TINT_SHIFT),
        hue: get(HUE_MASK, HUE_SHIFT),
        light: get(LIGHT_MASK, LIGHT_SHIFT),
        state: get(STATE_MASK, STATE_SHIFT),
        temperature: get(TEMPERATURE_MASK, TEMPERATURE_SHIFT),
        direction: get(DIRECTION_MASK, DIRECTION_SHIFT),
        density: get(DENSITY_MASK, DENSITY_SHIFT),
        strength: get(STRENGTH_MASK, STRENGTH_SHIFT),
        fill_level: get(FILL_LEVEL_MASK, FILL_LEVEL_SHIFT),
    }
}

/// Map an RGB colour to the 4-bit hue value.
///
/// Achromatic colours return a greyscale level `max / 85` (0..=3).
/// Otherwise the hexagonal hue in [0, 1) is scaled by 11, rounded and
/// offset by 4 (4..=15). The shader side inverts this with `(v - 4) / 11`,
/// so the rounding here must not change.
pub fn rgb_to_hue(r: u8, g: u8, b: u8) -> u8 {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return max / GREYSCALE_STEP;
    }

    let (r, g, b) = (r as f32, g as f32, b as f32);
    let span = max as f32 - min as f32;
    let max = max as f32;

    // Later channels win when two share the maximum.
    let ratio = if max == b {
        ((r - g) / span + 4.0) / 6.0
    } else if max == g {
        ((b - r) / span + 2.0) / 6.0
    } else {
        ((g - b) / span + if g < b { 6.0 } else { 0.0 }) / 6.0
    };

    (ratio * HUE_BUCKETS).round() as u8 + HUE_GREYSCALE_LEVELS
}

/// HSL to RGB using the hexagonal hue ramp.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    let ramp = (Vec3::splat(hue * 6.0) + Vec3::new(0.0, 4.0, 2.0))
        .rem_euclid(Vec3::splat(6.0));
    let rgb = ((ramp - Vec3::splat(3.0)).abs() - Vec3::ONE).clamp(Vec3::ZERO, Vec3::ONE);
    Vec3::splat(lightness)
        + saturation * (rgb - Vec3::splat(0.5)) * (1.0 - (2.0 * lightness - 1.0).abs())
}

/// Normalised view of a voxel, as consumed by shading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedVoxel {
    pub saturation: f32,
    pub alpha: f32,
    /// Red, green, blue tint flags.
    pub tint: [bool; 3],
    /// Hue in [0, 1]; meaningful only when `greyscale_enabled` is false.
    pub hue: f32,
    /// True when the hue field selects a greyscale level.
    pub greyscale_enabled: bool,
    /// Greyscale level in [0, 1].
    pub greyscale: f32,
    pub light: f32,
    pub state: MaterialState,
    pub temperature: f32,
    pub direction: u8,
    pub density: f32,
    pub strength: f32,
    pub fill_level: f32,
}

impl DecodedVoxel {
    /// Shading colour: `greyscale * light` on the greyscale path, HSL otherwise.
    pub fn color(&self) -> Vec3 {
        if self.greyscale_enabled {
            Vec3::splat(self.greyscale * self.light)
        } else {
            hsl_to_rgb(self.hue, self.saturation, self.light)
        }
    }

    pub fn rgba(&self) -> Vec4 {
        self.color().extend(self.alpha)
    }
}

/// Decode every field into its normalised float value.
pub fn decode_voxel(voxel: Voxel) -> DecodedVoxel {
    let f = unpack_voxel(voxel);
    let greyscale_enabled = f.hue < HUE_GREYSCALE_LEVELS;
    let hue = if greyscale_enabled {
        0.0
    } else {
        (f.hue - HUE_GREYSCALE_LEVELS) as f32 / HUE_BUCKETS
    };

    DecodedVoxel {
        saturation: f.saturation as f32 / SATURATION_MASK as f32,
        alpha: f.alpha as f32 / ALPHA_MASK as f32,
        tint: [f.tint & 0x4 != 0, f.tint & 0x2 != 0, f.tint & 0x1 != 0],
        hue,
        greyscale_enabled,
        greyscale: f.hue as f32 / (HUE_GREYSCALE_LEVELS - 1) as f32,
        light: f.light as f32 / LIGHT_MASK as f32,
        state: MaterialState::from_bits(f.state),
        temperature: f.temperature as f32 / TEMPERATURE_MASK as f32,
        direction: f.direction,
        density: f.density as f32 / DENSITY_MASK as f32,
        strength: f.strength as f32 / STRENGTH_MASK as f32,
        fill_level: f.fill_level as f32 / FILL_LEVEL_MASK as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference hexagonal hue in [0, 1).
    fn reference_hue(r: u8, g: u8, b: u8) -> f32 {
        let (r, g, b) = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let d = max - min;
        let h = if max == r {
            ((g - b) / d).rem_euclid(6.0)
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        h / 6.0
    }

    #[test]
    fn test_pack_unpack_roundtrip() {
        let fields = VoxelFields {
            saturation: 2,
            alpha: 5,
            tint: 0b101,
            hue: 11,
            light: 13,
            state: 3,
            temperature: 6,
            direction: 7,
            density: 1,
            strength: 4,
            fill_level: 7,
        };
        assert_eq!(unpack_voxel(pack_voxel(fields)), fields);
    }

    #[test]
    fn test_pack_field_positions() {
        let v = pack_voxel(VoxelFields {
            alpha: 7,
            ..Default::default()
        });
        assert_eq!(v.0, 0b111 << 2);
        let v = pack_voxel(VoxelFields {
            fill_level: 7,
            ..Default::default()
        });
        assert_eq!(v.0, 0b111 << 29);
    }

    #[test]
    fn test_from_rgba_fields() {
        let f = unpack_voxel(Voxel::from_rgba(255, 0, 0, 255));
        assert_eq!(f.saturation, 3);
        assert_eq!(f.alpha, 7);
        assert_eq!(f.hue, 4);
        assert_eq!(f.light, 8);
        assert_eq!(f.tint, 0);
        assert_eq!(f.state, 0);
        assert_eq!(f.temperature, 0);
        assert_eq!(f.direction, 0);
        assert_eq!(f.density, 0);
        assert_eq!(f.strength, 0);
        assert_eq!(f.fill_level, 0);
    }

    #[test]
    fn test_primary_hues() {
        assert_eq!(rgb_to_hue(255, 0, 0), 4);
        // 1/3 * 11 = 3.67 -> 4
        assert_eq!(rgb_to_hue(0, 255, 0), 8);
        // 2/3 * 11 = 7.33 -> 7
        assert_eq!(rgb_to_hue(0, 0, 255), 11);
        // 1/6 * 11 = 1.83 -> 2
        assert_eq!(rgb_to_hue(255, 255, 0), 6);
        // 5/6 * 11 = 9.17 -> 9
        assert_eq!(rgb_to_hue(255, 0, 255), 13);
    }

    #[test]
    fn test_achromatic_mapping() {
        for v in 0..=255u8 {
            let hue = rgb_to_hue(v, v, v);
            assert_eq!(hue, v / 85);
            assert!(hue <= 3);
            let decoded = decode_voxel(Voxel::from_rgba(v, v, v, 255));
            assert!(decoded.greyscale_enabled, "grey {v} must decode as greyscale");
        }
    }

    #[test]
    fn test_alpha_roundtrip_within_one_step() {
        for a in 0..=255u8 {
            let decoded = decode_voxel(Voxel::from_rgba(200, 40, 90, a));
            let expected = a as f32 / 255.0;
            assert!(
                (decoded.alpha - expected).abs() <= 1.0 / 7.0 + 1e-6,
                "alpha {a}: decoded {} expected {expected}",
                decoded.alpha
            );
        }
    }

    #[test]
    fn test_hue_roundtrip_sector() {
        let steps = [0u8, 37, 64, 128, 191, 255];
        for &r in &steps {
            for &g in &steps {
                for &b in &steps {
                    if r == g && g == b {
                        continue;
                    }
                    let decoded = decode_voxel(Voxel::from_rgb(r, g, b));
                    assert!(!decoded.greyscale_enabled);
                    let expected = reference_hue(r, g, b);
                    // Distance on the hue circle.
                    let diff = (decoded.hue - expected).abs();
                    let diff = diff.min(1.0 - diff);
                    assert!(
                        diff <= 0.5 / HUE_BUCKETS + 1e-4,
                        "({r},{g},{b}): decoded {} expected {expected}",
                        decoded.hue
                    );
                }
            }
        }
    }

    #[test]
    fn test_hue_bucket_centres_exact() {
        // Every stored hue value decodes to exactly its bucket centre k / 11.
        for k in 0..=11u8 {
            let v = pack_voxel(VoxelFields {
                hue: k + HUE_GREYSCALE_LEVELS,
                alpha: 7,
                ..Default::default()
            });
            assert_eq!(decode_voxel(v).hue, k as f32 / HUE_BUCKETS);
        }
        assert_eq!(decode_voxel(Voxel::from_rgb(255, 0, 0)).hue, 0.0);
        assert_eq!(Voxel::from_rgb(255, 0, 0).hue_value(), 4);
    }

    #[test]
    fn test_hsl_primaries() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((red - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
        let green = hsl_to_rgb(1.0 / 3.0, 1.0, 0.5);
        assert!((green - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
        let blue = hsl_to_rgb(2.0 / 3.0, 1.0, 0.5);
        assert!((blue - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
        let grey = hsl_to_rgb(0.25, 0.0, 0.4);
        assert!((grey - Vec3::splat(0.4)).length() < 1e-5);
    }

    #[test]
    fn test_greyscale_color_uses_light() {
        let white = decode_voxel(Voxel::from_rgb(255, 255, 255));
        assert_eq!(white.greyscale, 1.0);
        let expected = 8.0 / 15.0;
        assert!((white.color() - Vec3::splat(expected)).length() < 1e-6);
        let black = decode_voxel(Voxel::from_rgb(0, 0, 0));
        assert_eq!(black.color(), Vec3::ZERO);
    }

    #[test]
    fn test_decode_tint_and_state() {
        let v = pack_voxel(VoxelFields {
            tint: 0b110,
            state: 2,
            alpha: 1,
            ..Default::default()
        });
        let d = decode_voxel(v);
        assert_eq!(d.tint, [true, true, false]);
        assert_eq!(d.state, MaterialState::Solid);
    }

    #[test]
    fn test_empty_decodes_to_zero_alpha() {
        let d = decode_voxel(Voxel::EMPTY);
        assert_eq!(d.alpha, 0.0);
        assert!(d.greyscale_enabled);
    }
}
