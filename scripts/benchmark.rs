// scripts/benchmark.rs
use gbm_risk::math_utils::Timer;
use gbm_risk::mc::engine::{run_batch, run_simulation};
use gbm_risk::params::SimulationParameters;
use gbm_risk::rng::seed_rng_from_u64;
use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};

const SEED: u64 = 42;
const REPEATS: usize = 5;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    rustc_flags: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    mode: &'static str,
    paths: usize,
    days: usize,
    best_ms: f64,
    mean_ms: f64,
    cells_per_sec: f64,
}

fn time_repeated<F: FnMut()>(mut f: F) -> (f64, f64) {
    let mut samples = Vec::with_capacity(REPEATS);
    for _ in 0..REPEATS {
        let timer = Timer::start();
        f();
        samples.push(timer.elapsed_ms());
    }
    let best = samples.iter().cloned().fold(f64::INFINITY, f64::min);
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    (best, mean)
}

fn run_single_benchmarks() -> Vec<BenchmarkResult> {
    let mut results = Vec::new();
    for &paths in &[100usize, 1_000, 10_000] {
        for &days in &[1usize, 30, 252, 365] {
            println!("Single run: {} paths x {} days", paths, days);
            let params = SimulationParameters::new(100.0, 20.0, days, paths);
            let (best_ms, mean_ms) = time_repeated(|| {
                let mut rng = seed_rng_from_u64(SEED);
                if let Err(e) = run_simulation(&params, &mut rng) {
                    eprintln!("  failed: {}", e);
                }
            });
            results.push(BenchmarkResult {
                mode: "single",
                paths,
                days,
                best_ms,
                mean_ms,
                cells_per_sec: (paths * (days + 1)) as f64 / (best_ms / 1000.0),
            });
        }
    }
    results
}

fn run_batch_benchmarks() -> Vec<BenchmarkResult> {
    let mut results = Vec::new();
    for &batch_size in &[4usize, 16] {
        println!("Batch run: {} requests of 10000 paths x 252 days", batch_size);
        let requests = vec![SimulationParameters::new(100.0, 20.0, 252, 10_000); batch_size];
        let (best_ms, mean_ms) = time_repeated(|| {
            let failures = run_batch(&requests, SEED).iter().filter(|r| r.is_err()).count();
            if failures > 0 {
                eprintln!("  {} requests failed", failures);
            }
        });
        results.push(BenchmarkResult {
            mode: if batch_size == 4 { "batch4" } else { "batch16" },
            paths: 10_000 * batch_size,
            days: 252,
            best_ms,
            mean_ms,
            cells_per_sec: (10_000 * batch_size * 253) as f64 / (best_ms / 1000.0),
        });
    }
    results
}

fn write_results_to_csv(
    results: &[BenchmarkResult],
    system_info: &SystemInfo,
    filename: &str,
) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    writeln!(file, "# OS: {}", system_info.os)?;
    writeln!(file, "# RUSTFLAGS: {}", system_info.rustc_flags)?;
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads)?;
    writeln!(file, "mode,paths,days,best_ms,mean_ms,cells_per_sec")?;
    for r in results {
        writeln!(
            file,
            "{},{},{},{:.3},{:.3},{:.0}",
            r.mode, r.paths, r.days, r.best_ms, r.mean_ms, r.cells_per_sec
        )?;
    }
    file.flush()
}

fn main() {
    println!("gbm-risk Engine Benchmark");
    println!("=========================\n");

    let system_info = SystemInfo::gather();
    println!("OS: {}", system_info.os);
    println!("RUSTFLAGS: {}", system_info.rustc_flags);
    println!("Rayon Threads: {}\n", system_info.rayon_threads);

    let mut all_results = run_single_benchmarks();
    all_results.extend(run_batch_benchmarks());

    println!("\n{:=<72}", "");
    println!(
        "{:<8} {:>8} {:>6} {:>12} {:>12} {:>18}",
        "Mode", "Paths", "Days", "Best (ms)", "Mean (ms)", "Cells/sec"
    );
    println!("{:-<72}", "");
    for r in &all_results {
        println!(
            "{:<8} {:>8} {:>6} {:>12.3} {:>12.3} {:>18.0}",
            r.mode, r.paths, r.days, r.best_ms, r.mean_ms, r.cells_per_sec
        );
    }
    println!("{:=<72}", "");

    let filename = "bench/engine_benchmark.csv";
    if let Err(e) = fs::create_dir_all("bench")
        .and_then(|_| write_results_to_csv(&all_results, &system_info, filename))
    {
        eprintln!("Could not write {}: {}", filename, e);
        std::process::exit(1);
    }
    println!("\nResults saved to: {}", filename);
}
