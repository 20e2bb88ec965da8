use glam::{UVec2, Vec4};

use crate::error::RenderError;

/// Linear RGBA float image. Row 0 is the bottom row.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidResolution { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![Vec4::ZERO; width as usize * height as usize],
        })
    }

    /// Wrap existing pixels, which must number `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Vec4>) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidResolution { width, height });
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(RenderError::FrameSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn resolution(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    pub fn pixels(&self) -> &[Vec4] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Vec4] {
        &mut self.pixels
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Vec4 {
        self.pixels[x as usize + self.width as usize * y as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Vec4) {
        let idx = x as usize + self.width as usize * y as usize;
        self.pixels[idx] = color;
    }

    /// Read with coordinates clamped to the nearest edge texel.
    #[inline]
    pub fn get_clamped(&self, x: i64, y: i64) -> Vec4 {
        let x = x.clamp(0, self.width as i64 - 1) as u32;
        let y = y.clamp(0, self.height as i64 - 1) as u32;
        self.get(x, y)
    }

    pub fn fill(&mut self, color: Vec4) {
        self.pixels.fill(color);
    }

    /// Reallocate for a new resolution; contents are cleared.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    /// 8-bit RGBA, rows ordered top to bottom.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let width = self.width as usize;
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for row in self.pixels.chunks_exact(width).rev() {
            for pixel in row {
                let c = (pixel.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
                bytes.extend_from_slice(&[c.x as u8, c.y as u8, c.z as u8, c.w as u8]);
            }
        }
        bytes
    }
}
