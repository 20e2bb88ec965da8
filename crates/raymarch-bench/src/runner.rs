use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use raymarch_core::Settings;
use raymarch_render::{FrameStats, Renderer};
use raymarch_world::{CommandState, SceneState};

use crate::error::BenchError;
use crate::scenes::{demo_map, SceneConfig};

/// Summary of one series of wall-clock samples, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl TimingSeries {
    /// Summarise `samples`; an empty slice gives all zeros.
    pub fn from_samples(samples: &[f64]) -> Self {
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let (Some(&min_ms), Some(&max_ms)) = (sorted.first(), sorted.last()) else {
            return Self::default();
        };

        let n = sorted.len();
        let middle = n / 2;
        let median_ms = if n % 2 == 1 {
            sorted[middle]
        } else {
            0.5 * (sorted[middle - 1] + sorted[middle])
        };

        Self {
            mean_ms: sorted.iter().sum::<f64>() / n as f64,
            median_ms,
            p95_ms: nearest_rank(&sorted, 0.95),
            p99_ms: nearest_rank(&sorted, 0.99),
            min_ms,
            max_ms,
        }
    }
}

/// Nearest-rank percentile of a non-empty ascending slice.
fn nearest_rank(sorted: &[f64], quantile: f64) -> f64 {
    let rank = (quantile * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub placements: usize,
    /// Non-empty voxels in the composed window after the last update.
    pub scene_voxels: usize,
    pub frame_count: u32,
    pub width: u32,
    pub height: u32,
    pub mean_march_steps: f64,
    pub update: TimingSeries,
    pub timings: TimingSeries,
}

/// Drives update-then-render frames over the demo map on the CPU.
pub struct BenchmarkRunner {
    settings: Settings,
    frame_count: u32,
    width: u32,
    height: u32,
    seed: u64,
    /// Fixed time step; `None` feeds the measured frame time back in.
    fixed_dt: Option<f32>,
    fxaa: bool,
}

impl BenchmarkRunner {
    pub fn new(settings: Settings, frame_count: u32, width: u32, height: u32) -> Self {
        Self {
            settings,
            frame_count,
            width,
            height,
            seed: 0,
            fixed_dt: Some(1.0 / 60.0),
            fxaa: true,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_fixed_dt(mut self, dt: Option<f32>) -> Self {
        self.fixed_dt = dt;
        self
    }

    pub fn with_fxaa(mut self, enabled: bool) -> Self {
        self.fxaa = enabled;
        self
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, config: &SceneConfig) -> Result<BenchmarkResult, BenchError> {
        log::info!(
            "Running scene '{}' ({} frames at {}x{})...",
            config.name,
            self.frame_count,
            self.width,
            self.height
        );

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut state = SceneState::new(&self.settings);
        state.set_map(demo_map(&mut rng)?);
        for &command in config.held {
            state.input(command, CommandState::Press);
        }

        let mut renderer = Renderer::new(self.width, self.height)?;
        renderer.set_fxaa_enabled(self.fxaa);

        let mut update_times = Vec::with_capacity(self.frame_count as usize);
        let mut frame_times = Vec::with_capacity(self.frame_count as usize);
        let mut stats = FrameStats::default();
        let mut dt = self.fixed_dt.unwrap_or(0.0);

        for _ in 0..self.frame_count {
            let frame_start = Instant::now();

            // The scene is fully composed before any pixel reads it.
            state.update(dt);
            let update_elapsed = frame_start.elapsed();

            let params = state.render_params();
            stats = stats.merge(renderer.render(state.scene(), &params)?);

            let elapsed = frame_start.elapsed();
            update_times.push(update_elapsed.as_secs_f64() * 1000.0);
            frame_times.push(elapsed.as_secs_f64() * 1000.0);
            if self.fixed_dt.is_none() {
                dt = elapsed.as_secs_f32();
            }
        }

        let timings = TimingSeries::from_samples(&frame_times);
        log::info!(
            "  Done: mean={:.2}ms ({:.1} fps), p95={:.2}ms, p99={:.2}ms",
            timings.mean_ms,
            fps(timings.mean_ms),
            timings.p95_ms,
            timings.p99_ms
        );

        Ok(BenchmarkResult {
            scene_name: config.name.to_string(),
            placements: state.map().len(),
            scene_voxels: state.scene().occupied_count(),
            frame_count: self.frame_count,
            width: self.width,
            height: self.height,
            mean_march_steps: stats.mean_steps(),
            update: TimingSeries::from_samples(&update_times),
            timings,
        })
    }
}

/// Frames per second for a mean frame time.
pub fn fps(mean_ms: f64) -> f64 {
    if mean_ms > 0.0 {
        1000.0 / mean_ms
    } else {
        0.0
    }
}
