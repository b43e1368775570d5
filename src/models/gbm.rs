// src/models/gbm.rs
use crate::params::SimulationParameters;

/// Trading days per year used for daily scaling
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Daily-stepped Geometric Brownian Motion
///
/// Volatility is converted to a daily figure and the step also scales by
/// `√dt` with `dt = 1/252`, so each step applies
/// ```text
/// S_{t+1} = S_t * exp((μ - σ_d²/2)·dt + σ_d·√dt·Z)
/// ```
/// with `σ_d = (vol% / 100) / √252` and `μ = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gbm {
    pub s0: f64,
    pub mu: f64,
    pub sigma_daily: f64,
    pub dt: f64,
}

impl Gbm {
    pub fn new(s0: f64, mu: f64, sigma_daily: f64, dt: f64) -> Self {
        Gbm {
            s0,
            mu,
            sigma_daily,
            dt,
        }
    }

    /// Zero-drift daily model for a projection request
    pub fn from_params(params: &SimulationParameters) -> Self {
        Gbm::new(
            params.initial_price,
            0.0,
            daily_volatility(params.annual_volatility_pct),
            1.0 / TRADING_DAYS_PER_YEAR,
        )
    }

    /// Deterministic part of the log step
    pub fn log_drift(&self) -> f64 {
        (self.mu - 0.5 * self.sigma_daily * self.sigma_daily) * self.dt
    }

    /// Coefficient applied to the normal draw in the log step
    pub fn log_diffusion(&self) -> f64 {
        self.sigma_daily * self.dt.sqrt()
    }

    pub fn exact_step(&self, s_t: f64, normal_draw: f64) -> f64 {
        s_t * (self.log_drift() + self.log_diffusion() * normal_draw).exp()
    }
}

/// `(annual_volatility_pct / 100) / √252`
pub fn daily_volatility(annual_volatility_pct: f64) -> f64 {
    annual_volatility_pct / 100.0 / TRADING_DAYS_PER_YEAR.sqrt()
}
