use std::io::Write;
use std::path::Path;

use crate::error::BenchError;
use crate::runner::{fps, BenchmarkResult};

/// A complete baseline containing results from all scenes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub label: String,
    pub results: Vec<BenchmarkResult>,
}

/// Load a baseline from a JSON file. Returns `Ok(None)` if the file doesn't
/// exist.
pub fn load_baseline(path: &Path) -> Result<Option<Baseline>, BenchError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(BenchError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Write `baseline` as pretty JSON, creating parent directories.
pub fn save_baseline(path: &Path, baseline: &Baseline) -> Result<(), BenchError> {
    let io_error = |source: std::io::Error| BenchError::Io {
        path: path.to_path_buf(),
        source,
    };
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir).map_err(io_error)?,
        _ => {}
    }
    let file = std::fs::File::create(path).map_err(io_error)?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, baseline)?;
    writer.flush().map_err(io_error)
}

/// A scene whose mean frame time grew past the allowed threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Regression {
    pub scene_name: String,
    pub baseline_ms: f64,
    pub current_ms: f64,
}

impl Regression {
    /// Slowdown relative to the baseline, in percent.
    pub fn slowdown_pct(&self) -> f64 {
        (self.current_ms / self.baseline_ms - 1.0) * 100.0
    }
}

/// Scenes present in both runs whose mean frame time is more than
/// `threshold_pct` percent slower than the baseline. Scenes missing from
/// the baseline, or with a zero baseline time, are not judged.
pub fn compare(current: &[BenchmarkResult], baseline: &Baseline, threshold_pct: f64) -> Vec<Regression> {
    current
        .iter()
        .filter_map(|result| {
            let base = baseline.results.iter().find(|b| b.scene_name == result.scene_name)?;
            (base.timings.mean_ms > 0.0).then(|| Regression {
                scene_name: result.scene_name.clone(),
                baseline_ms: base.timings.mean_ms,
                current_ms: result.timings.mean_ms,
            })
        })
        .filter(|r| r.slowdown_pct() > threshold_pct)
        .collect()
}

/// Format results as a markdown summary table.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Resolution | Voxels | Steps/px | FPS | Update (ms) | Mean (ms) | Median (ms) | P95 (ms) | P99 (ms) | Min (ms) | Max (ms) |\n");
    out.push_str("|-------|------------|--------|----------|-----|-------------|-----------|-------------|----------|----------|----------|----------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {}x{} | {} | {:.1} | {:.1} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |\n",
            r.scene_name,
            r.width,
            r.height,
            r.scene_voxels,
            r.mean_march_steps,
            fps(r.timings.mean_ms),
            r.update.mean_ms,
            r.timings.mean_ms,
            r.timings.median_ms,
            r.timings.p95_ms,
            r.timings.p99_ms,
            r.timings.min_ms,
            r.timings.max_ms,
        ));
    }

    out
}

/// Human-readable verdict for `compare`'s output.
pub fn format_comparison(regressions: &[Regression], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!("No regressions: every scene within {threshold_pct:.0}% of baseline.\n");
    }
    let mut out = format!("{} scene(s) slower than baseline by more than {threshold_pct:.0}%:\n", regressions.len());
    for r in regressions {
        out.push_str(&format!(
            "  - {}: {:.2} ms -> {:.2} ms (+{:.1}%)\n",
            r.scene_name,
            r.baseline_ms,
            r.current_ms,
            r.slowdown_pct()
        ));
    }
    out
}
