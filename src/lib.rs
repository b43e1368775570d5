//! # gbm-risk: Monte Carlo Price Projection and Value-at-Risk
//!
//! Projects future price paths of a single asset under Geometric Brownian
//! Motion and summarises them into percentile bands, terminal statistics and
//! a 95% Value-at-Risk.
//!
//! ## Components
//!
//! - **Normal variates** ([`rng`]): Box-Muller over a caller-owned uniform source
//! - **Path simulator** ([`mc::simulator`]): day-by-day GBM random walk
//! - **Statistics aggregator** ([`mc::statistics`]): mean path, nearest-rank
//!   percentile bands, terminal extremes, VaR
//! - **Boundary** ([`api`]): JSON request/response handling with validation
//!
//! ## Quick Start
//!
//! ```rust
//! use gbm_risk::mc::engine::run_simulation;
//! use gbm_risk::params::SimulationParameters;
//! use gbm_risk::rng::seed_rng_from_u64;
//!
//! let params = SimulationParameters {
//!     initial_price: 100.0,
//!     annual_volatility_pct: 20.0,
//!     horizon_days: 30,
//!     path_count: 1_000,
//! };
//!
//! let mut rng = seed_rng_from_u64(42);
//! let run = run_simulation(&params, &mut rng).expect("Valid parameters");
//! println!(
//!     "VaR 95%: {:.2} ({:.2}%)",
//!     run.result.var_95_amount, run.result.var_95_pct
//! );
//! ```
//!
//! ## Model
//!
//! Each day every path is advanced with
//! ```text
//! S_t = S_{t-1} * exp((μ - σ_d²/2)·dt + σ_d·√dt·Z)
//! ```
//! with zero drift, `σ_d = vol% / 100 / √252` and `dt = 1/252`.

pub mod analytics;
pub mod api;
pub mod error;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod output;
pub mod params;
pub mod rng;

pub use error::{RiskError, RiskResult};
pub use mc::engine::{run_simulation, SimulationRun};
pub use mc::statistics::SimulationResult;
pub use params::SimulationParameters;
