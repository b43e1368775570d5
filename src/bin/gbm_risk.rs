//! gbm-risk CLI - run one price projection from the command line
//!
//! Parameters come from flags or a JSON request file; the JSON response is
//! printed to stdout (or written to `--output`). Logs go to stderr and are
//! filtered with `RUST_LOG`.

use clap::Parser;
use gbm_risk::analytics::lognormal::parametric_var_95;
use gbm_risk::api::{self, SimulationRequest, SimulationResponse};
use gbm_risk::math_utils::Timer;
use gbm_risk::output;
use gbm_risk::params::SimulationParameters;
use gbm_risk::rng::seed_rng_from_u64;
use gbm_risk::RiskError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Risk(#[from] RiskError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type Result<T> = std::result::Result<T, CliError>;

/// Monte Carlo price projection and 95% VaR under GBM
#[derive(Parser)]
#[command(name = "gbm-risk")]
#[command(author, version, about, long_about = None, allow_negative_numbers = true)]
struct Cli {
    /// JSON request file; overrides the individual parameter flags
    #[arg(short, long)]
    request: Option<PathBuf>,

    /// Initial asset price
    #[arg(long, default_value_t = 100.0)]
    price: f64,

    /// Annual volatility in percent
    #[arg(long, default_value_t = 20.0)]
    volatility: f64,

    /// Horizon in trading days
    #[arg(long, default_value_t = 30)]
    days: i64,

    /// Number of simulated paths
    #[arg(long, default_value_t = 1000)]
    paths: i64,

    /// Seed for a reproducible run; entropy-seeded when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the JSON response here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also export day bands (`<prefix>_bands.csv`) and terminal prices (`<prefix>_terminal.csv`)
    #[arg(long)]
    csv: Option<String>,

    /// Drop the full path matrix from the JSON output
    #[arg(long)]
    summary_only: bool,
}

fn io_err(path: &str) -> impl FnOnce(std::io::Error) -> CliError {
    let path = path.to_string();
    move |source| CliError::Io { path, source }
}

fn load_request(cli: &Cli) -> Result<SimulationRequest> {
    match &cli.request {
        Some(path) => {
            let shown = path.display().to_string();
            let text = std::fs::read_to_string(path).map_err(io_err(&shown))?;
            info!("Loaded request from {}", shown);
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(SimulationRequest {
            initial_price: cli.price,
            annual_volatility_pct: cli.volatility,
            horizon_days: cli.days,
            path_count: cli.paths,
        }),
    }
}

fn export_csv(prefix: &str, params: &SimulationParameters, response: &SimulationResponse) -> Result<()> {
    let bands = format!("{}_bands.csv", prefix);
    output::write_bands_file(&bands, &response.result).map_err(io_err(&bands))?;

    let terminal_path = format!("{}_terminal.csv", prefix);
    let terminal: Vec<f64> = response
        .simulations
        .iter()
        .filter_map(|row| row.last().copied())
        .collect();
    output::write_terminal_file(&terminal_path, &terminal, params.initial_price)
        .map_err(io_err(&terminal_path))?;

    info!("CSV written to {} and {}", bands, terminal_path);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let request = load_request(&cli)?;
    let params = request.into_parameters()?;

    let mut rng = match cli.seed {
        Some(seed) => seed_rng_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let timer = Timer::start();
    let mut response = api::handle_request(&request, &mut rng)?;
    info!("Simulation took {:.2} ms", timer.elapsed_ms());

    let (closed_form_amount, closed_form_pct) = parametric_var_95(&params)?;
    info!(
        "VaR 95%: Monte Carlo {:.4} ({:.3}%), closed form {:.4} ({:.3}%)",
        response.result.var_95_amount, response.result.var_95_pct, closed_form_amount, closed_form_pct
    );

    if let Some(prefix) = &cli.csv {
        export_csv(prefix, &params, &response)?;
    }

    if cli.summary_only {
        response.simulations.clear();
    }

    let json = serde_json::to_string_pretty(&response)?;
    match &cli.output {
        Some(path) => {
            let shown = path.display().to_string();
            std::fs::write(path, json).map_err(io_err(&shown))?;
            info!("Response written to {}", shown);
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {}", err);
        std::process::exit(match &err {
            CliError::Risk(e) if e.status_code() < 500 => 2,
            _ => 1,
        });
    }
}
