//! Fast approximate anti-aliasing over a shaded frame.
//!
//! Luma is estimated from the four diagonal neighbours; the gradient picks
//! an edge direction, and the pixel is resampled along it with a two-tap or
//! four-tap blend depending on whether the wider blend stays within the
//! local luma range. Pixels with zero alpha pass through untouched.

use glam::{Vec2, Vec3, Vec4};
use rayon::prelude::*;

use crate::error::RenderError;
use crate::frame::FrameBuffer;

pub const FXAA_REDUCE_MIN: f32 = 1.0 / 128.0;
pub const FXAA_REDUCE_MUL: f32 = 1.0 / 8.0;
pub const FXAA_SPAN_MAX: f32 = 8.0;

pub const LUMA_WEIGHTS: Vec3 = Vec3::new(0.299, 0.587, 0.114);

#[inline]
fn luma(rgb: Vec3) -> f32 {
    rgb.dot(LUMA_WEIGHTS)
}

/// Texel read with clamp-to-edge addressing and channels saturated to
/// [0, 1], as from an 8-bit colour target.
#[inline]
fn texel(frame: &FrameBuffer, x: i64, y: i64) -> Vec3 {
    frame.get_clamped(x, y).truncate().clamp(Vec3::ZERO, Vec3::ONE)
}

/// Nearest-texel sample at a position in pixel units.
#[inline]
fn sample(frame: &FrameBuffer, position: Vec2) -> Vec3 {
    let position = position.floor();
    texel(frame, position.x as i64, position.y as i64)
}

/// Filter one pixel.
pub fn filter_pixel(frame: &FrameBuffer, x: u32, y: u32) -> Vec4 {
    let rgba = frame.get(x, y);
    if rgba.w == 0.0 {
        return rgba;
    }

    let (xi, yi) = (x as i64, y as i64);
    let diagonal = |dx: i64, dy: i64| luma(texel(frame, xi + dx, yi + dy));
    let center = luma(texel(frame, xi, yi));
    let north_west = diagonal(-1, -1);
    let north_east = diagonal(1, -1);
    let south_west = diagonal(-1, 1);
    let south_east = diagonal(1, 1);

    let luma_min = center.min(north_west.min(north_east).min(south_west.min(south_east)));
    let luma_max = center.max(north_west.max(north_east).max(south_west.max(south_east)));

    let gradient = Vec2::new(
        -((north_west + north_east) - (south_west + south_east)),
        (north_west + south_west) - (north_east + south_east),
    );
    let reduce = ((north_west + north_east + south_west + south_east) * (0.25 * FXAA_REDUCE_MUL))
        .max(FXAA_REDUCE_MIN);
    let inverse_min = 1.0 / (gradient.x.abs().min(gradient.y.abs()) + reduce);
    let span = (gradient * inverse_min).clamp(Vec2::splat(-FXAA_SPAN_MAX), Vec2::splat(FXAA_SPAN_MAX));

    let centre = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
    let two_tap = 0.5
        * (sample(frame, centre + span * (1.0 / 3.0 - 0.5))
            + sample(frame, centre + span * (2.0 / 3.0 - 0.5)));
    let four_tap = two_tap * 0.5
        + 0.25 * (sample(frame, centre + span * -0.5) + sample(frame, centre + span * 0.5));

    let four_tap_luma = luma(four_tap);
    if four_tap_luma < luma_min || four_tap_luma > luma_max {
        two_tap.extend(1.0)
    } else {
        four_tap.extend(1.0)
    }
}

/// Filter `input` into `output`, one row per task.
pub fn apply(input: &FrameBuffer, output: &mut FrameBuffer) -> Result<(), RenderError> {
    if input.resolution() != output.resolution() {
        return Err(RenderError::FrameSizeMismatch {
            expected: input.pixels().len(),
            actual: output.pixels().len(),
        });
    }

    let width = input.width() as usize;
    output
        .pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, pixels)| {
            for (x, pixel) in pixels.iter_mut().enumerate() {
                *pixel = filter_pixel(input, x as u32, row as u32);
            }
        });
    Ok(())
}
