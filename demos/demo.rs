// demos/demo.rs
use gbm_risk::analytics::lognormal::{parametric_var_95, LognormalTerminal};
use gbm_risk::api::handle_json;
use gbm_risk::math_utils::Timer;
use gbm_risk::mc::engine::run_simulation;
use gbm_risk::params::SimulationParameters;
use gbm_risk::rng::seed_rng_from_u64;

fn main() {
    println!("gbm-risk demo");
    println!("=============\n");

    let scenarios = [
        SimulationParameters::new(100.0, 20.0, 30, 1_000),
        SimulationParameters::new(100.0, 60.0, 90, 5_000),
        SimulationParameters::new(250.0, 0.0, 1, 100),
    ];

    for params in &scenarios {
        println!(
            "S0 = {:.2}, vol = {:.1}%, {} days, {} paths",
            params.initial_price, params.annual_volatility_pct, params.horizon_days, params.path_count
        );

        let timer = Timer::start();
        let mut rng = seed_rng_from_u64(42);
        let run = match run_simulation(params, &mut rng) {
            Ok(run) => run,
            Err(e) => {
                println!("  failed: {}\n", e);
                continue;
            }
        };
        let r = &run.result;
        let law = LognormalTerminal::from_params(params);

        println!("  Elapsed:           {:.2} ms", timer.elapsed_ms());
        println!(
            "  Terminal mean:     {:.4} (closed form {:.4})",
            r.terminal_mean,
            law.expected_price()
        );
        println!("  Terminal range:    [{:.4}, {:.4}]", r.terminal_min, r.terminal_max);
        let last = r.mean_path.len() - 1;
        println!(
            "  Final 5-95 band:   [{:.4}, {:.4}]",
            r.percentile_5_path[last], r.percentile_95_path[last]
        );
        match parametric_var_95(params) {
            Ok((amount, pct)) => println!(
                "  VaR 95%:           {:.4} ({:.3}%), closed form {:.4} ({:.3}%)",
                r.var_95_amount, r.var_95_pct, amount, pct
            ),
            Err(e) => println!(
                "  VaR 95%:           {:.4} ({:.3}%), closed form unavailable: {}",
                r.var_95_amount, r.var_95_pct, e
            ),
        }
        println!(
            "  P(loss):           {:.2}%\n",
            law.probability_below(params.initial_price) * 100.0
        );
    }

    println!("Rejected requests");
    println!("-----------------");
    let bodies = [
        r#"{"initial_price":0,"annual_volatility_pct":20,"horizon_days":30,"path_count":1000}"#,
        r#"{"initial_price":100,"annual_volatility_pct":250,"horizon_days":30,"path_count":1000}"#,
        r#"{"initial_price":100,"annual_volatility_pct":20,"horizon_days":400,"path_count":1000}"#,
        r#"{"initial_price":100,"annual_volatility_pct":20,"horizon_days":30,"path_count":50}"#,
    ];
    let mut rng = seed_rng_from_u64(1);
    for body in &bodies {
        let (status, json) = handle_json(body, &mut rng);
        println!("  {} {}", status, json);
    }
}
