// src/mc/engine.rs
use crate::error::RiskResult;
use crate::mc::simulator::{self, PathMatrix};
use crate::mc::statistics::{self, SimulationResult};
use crate::params::SimulationParameters;
use crate::rng::RngFactory;
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info, info_span};

/// Path matrix together with its aggregate statistics
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub paths: PathMatrix,
    pub result: SimulationResult,
}

/// Validate, simulate and aggregate one projection request.
///
/// The computation is atomic: either a complete [`SimulationRun`] is returned
/// or an error, never partial output.
///
/// # Errors
///
/// - `InvalidParameter` if any field is out of range (nothing is simulated)
/// - `ComputationFailure` if aggregation cannot complete
pub fn run_simulation<R: Rng + ?Sized>(
    params: &SimulationParameters,
    rng: &mut R,
) -> RiskResult<SimulationRun> {
    params.validate()?;

    let span = info_span!(
        "simulation",
        initial_price = params.initial_price,
        volatility_pct = params.annual_volatility_pct,
        days = params.horizon_days,
        paths = params.path_count
    );
    let _guard = span.enter();

    let paths = simulator::simulate(params, rng);
    debug!(rows = paths.nrows(), cols = paths.ncols(), "paths generated");

    let result = statistics::aggregate(&paths, params.initial_price)?;
    info!(
        terminal_mean = result.terminal_mean,
        var_95_amount = result.var_95_amount,
        var_95_pct = result.var_95_pct,
        "simulation complete"
    );

    Ok(SimulationRun { paths, result })
}

/// Run independent requests in parallel.
///
/// Request `i` gets its own `StdRng` derived from `base_seed` and `i`, so the
/// output is identical regardless of thread count and matches running
/// [`run_simulation`] sequentially with the same per-request generators.
/// Results keep input order.
pub fn run_batch(
    requests: &[SimulationParameters],
    base_seed: u64,
) -> Vec<RiskResult<SimulationRun>> {
    let factory = RngFactory::new(base_seed);
    debug!(requests = requests.len(), base_seed, "running batch");

    requests
        .par_iter()
        .enumerate()
        .map(|(i, params)| {
            let mut rng = factory.create_std_rng(i as u64);
            run_simulation(params, &mut rng)
        })
        .collect()
}
