use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use raymarch_bench::report;
use raymarch_bench::runner::BenchmarkRunner;
use raymarch_bench::scenes;
use raymarch_bench::BenchError;
use raymarch_core::settings::load_settings_from_str;
use raymarch_core::Settings;

struct Options {
    config_path: Option<PathBuf>,
    baseline_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    regression_threshold: f64,
    frame_count: u32,
    width: u32,
    height: u32,
    seed: u64,
    fixed_dt: Option<f32>,
    fxaa: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args();
    if let Err(e) = run(&options) {
        log::error!("{e}");
        process::exit(1);
    }
}

fn run(options: &Options) -> Result<(), BenchError> {
    let settings = match &options.config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| BenchError::Io {
                path: path.clone(),
                source,
            })?;
            load_settings_from_str(&text)?
        }
        None => Settings::default(),
    };

    let runner = BenchmarkRunner::new(settings, options.frame_count, options.width, options.height)
        .with_seed(options.seed)
        .with_fixed_dt(options.fixed_dt)
        .with_fxaa(options.fxaa);

    let mut results = Vec::new();
    for config in &scenes::standard_scenes() {
        results.push(runner.run_scene(config)?);
    }

    println!("\n## Benchmark Results\n");
    println!("{}", report::format_markdown(&results));

    if let Some(path) = &options.output_path {
        let baseline = report::Baseline {
            label: format!("render-bench-{}", process::id()),
            results: results.clone(),
        };
        report::save_baseline(path, &baseline)?;
        log::info!("Saved baseline to {}", path.display());
    }

    if let Some(path) = &options.baseline_path {
        match report::load_baseline(path)? {
            Some(baseline) => {
                let regressions =
                    report::compare(&results, &baseline, options.regression_threshold);
                println!(
                    "{}",
                    report::format_comparison(&regressions, options.regression_threshold)
                );
                if !regressions.is_empty() {
                    eprintln!(
                        "ERROR: {} regressions detected, exiting with code 1",
                        regressions.len()
                    );
                    process::exit(1);
                }
            }
            None => log::warn!("Baseline file not found: {}", path.display()),
        }
    }

    log::info!("Benchmark complete.");
    Ok(())
}

fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let mut options = Options {
        config_path: None,
        baseline_path: None,
        output_path: None,
        regression_threshold: 10.0,
        frame_count: 60,
        width: 640,
        height: 480,
        seed: 0,
        fixed_dt: Some(1.0 / 60.0),
        fxaa: true,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let mut value = || {
            i += 1;
            match args.get(i) {
                Some(v) => v.clone(),
                None => {
                    eprintln!("Missing value for {flag}");
                    process::exit(1);
                }
            }
        };
        match flag {
            "--config" => options.config_path = Some(PathBuf::from(value())),
            "--baseline" => options.baseline_path = Some(PathBuf::from(value())),
            "--output" => options.output_path = Some(PathBuf::from(value())),
            "--regression-threshold" => {
                options.regression_threshold = parse_value(flag, &value());
            }
            "--frames" => options.frame_count = parse_value(flag, &value()),
            "--width" => options.width = parse_value(flag, &value()),
            "--height" => options.height = parse_value(flag, &value()),
            "--seed" => options.seed = parse_value(flag, &value()),
            "--dt" => {
                let v = value();
                options.fixed_dt = if v == "measured" {
                    None
                } else {
                    Some(parse_value(flag, &v))
                };
            }
            "--no-fxaa" => options.fxaa = false,
            "--help" | "-h" => {
                eprintln!("Usage: render-bench [OPTIONS]");
                eprintln!("  --config <path>                RON settings file (default: built-in)");
                eprintln!("  --frames <n>                   Frames per scene (default: 60)");
                eprintln!("  --width <px> --height <px>     Output resolution (default: 640x480)");
                eprintln!("  --seed <n>                     Seed for the demo map (default: 0)");
                eprintln!("  --dt <secs|measured>           Time step per update (default: 1/60)");
                eprintln!("  --no-fxaa                      Skip the post filter");
                eprintln!("  --baseline <path>              Load baseline JSON for comparison");
                eprintln!("  --output <path>                Save current results as JSON baseline");
                eprintln!(
                    "  --regression-threshold <pct>   Regression threshold percentage (default: 10)"
                );
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    options
}

fn parse_value<T: FromStr>(flag: &str, value: &str) -> T {
    match value.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Invalid value for {flag}: {value}");
            process::exit(1);
        }
    }
}
