use glam::{UVec2, Vec4};
use rayon::prelude::*;
use raymarch_core::{RenderParams, Volume};

use crate::error::RenderError;
use crate::frame::FrameBuffer;
use crate::fxaa;
use crate::kernel::{shade_pixel, MarchOutcome, MarchResult, ShadingContext};
use crate::layout::VoxelImage;

/// Counters gathered while shading one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub pixels: u64,
    pub total_steps: u64,
    pub max_steps: u32,
    pub missed: u64,
    pub occluded: u64,
    pub exited: u64,
    pub step_limited: u64,
    pub fogged: u64,
}

impl FrameStats {
    pub fn record(&mut self, result: &MarchResult) {
        self.pixels += 1;
        self.total_steps += result.steps as u64;
        self.max_steps = self.max_steps.max(result.steps);
        match result.outcome {
            MarchOutcome::Missed => self.missed += 1,
            MarchOutcome::Occluded => self.occluded += 1,
            MarchOutcome::Exited => self.exited += 1,
            MarchOutcome::StepLimit => self.step_limited += 1,
            MarchOutcome::Fogged => self.fogged += 1,
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            pixels: self.pixels + other.pixels,
            total_steps: self.total_steps + other.total_steps,
            max_steps: self.max_steps.max(other.max_steps),
            missed: self.missed + other.missed,
            occluded: self.occluded + other.occluded,
            exited: self.exited + other.exited,
            step_limited: self.step_limited + other.step_limited,
            fogged: self.fogged + other.fogged,
        }
    }

    pub fn mean_steps(&self) -> f64 {
        if self.pixels == 0 {
            0.0
        } else {
            self.total_steps as f64 / self.pixels as f64
        }
    }
}

/// Single public struct owning the packed voxel image and the frame
/// buffers for one output resolution.
///
/// `render` takes the scene by shared reference: the volume cannot change
/// while its pixels are being shaded.
pub struct Renderer {
    resolution: UVec2,
    image: VoxelImage,
    raw: FrameBuffer,
    filtered: FrameBuffer,
    fxaa_enabled: bool,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let raw = FrameBuffer::new(width, height)?;
        let filtered = FrameBuffer::new(width, height)?;
        log::info!(
            "Renderer created: {}x{}, {} shading threads",
            width,
            height,
            rayon::current_num_threads()
        );
        Ok(Self {
            resolution: UVec2::new(width, height),
            image: VoxelImage::new(),
            raw,
            filtered,
            fxaa_enabled: true,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.raw.resize(width, height)?;
        self.filtered.resize(width, height)?;
        self.resolution = UVec2::new(width, height);
        log::info!("Renderer resized to {}x{}", width, height);
        Ok(())
    }

    pub fn resolution(&self) -> UVec2 {
        self.resolution
    }

    pub fn set_fxaa_enabled(&mut self, enabled: bool) {
        self.fxaa_enabled = enabled;
    }

    pub fn fxaa_enabled(&self) -> bool {
        self.fxaa_enabled
    }

    /// Pack `scene`, shade every pixel in parallel, then post-filter.
    pub fn render(&mut self, scene: &Volume, params: &RenderParams) -> Result<FrameStats, RenderError> {
        self.image.upload(scene);
        let ctx = ShadingContext::new(*params, self.resolution, &self.image);
        let image = &self.image;
        let width = self.resolution.x as usize;

        let stats = self
            .raw
            .pixels_mut()
            .par_chunks_mut(width)
            .enumerate()
            .map(|(row, pixels)| {
                let mut stats = FrameStats::default();
                for (x, pixel) in pixels.iter_mut().enumerate() {
                    let result = shade_pixel(&ctx, image, x as u32, row as u32);
                    stats.record(&result);
                    // Saturated, as an 8-bit colour target would store it.
                    *pixel = result.color.clamp(Vec4::ZERO, Vec4::ONE);
                }
                stats
            })
            .reduce(FrameStats::default, FrameStats::merge);

        if self.fxaa_enabled {
            fxaa::apply(&self.raw, &mut self.filtered)?;
        }

        log::debug!(
            "Frame shaded: {} px, mean {:.1} steps, max {}, {} occluded, {} missed",
            stats.pixels,
            stats.mean_steps(),
            stats.max_steps,
            stats.occluded,
            stats.missed
        );
        Ok(stats)
    }

    /// Final frame: filtered when FXAA is on, otherwise the raw kernel output.
    pub fn frame(&self) -> &FrameBuffer {
        if self.fxaa_enabled {
            &self.filtered
        } else {
            &self.raw
        }
    }

    /// Kernel output before post-filtering.
    pub fn raw_frame(&self) -> &FrameBuffer {
        &self.raw
    }

    /// Packed voxel image from the last `render`.
    pub fn voxel_image(&self) -> &VoxelImage {
        &self.image
    }
}
