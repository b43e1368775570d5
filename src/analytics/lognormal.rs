// src/analytics/lognormal.rs
//! Closed-form terminal distribution of the daily GBM used by the simulator
//!
//! # Mathematical Foundation
//!
//! Each step adds an independent normal increment to the log price, so after
//! `T` days
//! ```text
//! ln(S_T / S_0) ~ N(m, s²)
//! m = T * (μ - σ_d²/2) * dt
//! s = σ_d * √(dt * T)
//! ```
//! The Monte Carlo statistics converge to these values, which makes them a
//! cross-check for the engine rather than a replacement.

use crate::error::{RiskError, RiskResult};
use crate::math_utils::norm_cdf;
use crate::mc::statistics::LOWER_QUANTILE;
use crate::models::gbm::Gbm;
use crate::params::SimulationParameters;
use statrs::distribution::{ContinuousCDF, Normal};

/// Lognormal law of the terminal price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LognormalTerminal {
    pub s0: f64,
    pub log_mean: f64,
    pub log_std: f64,
}

impl LognormalTerminal {
    pub fn from_params(params: &SimulationParameters) -> Self {
        let model = Gbm::from_params(params);
        let days = params.horizon_days as f64;
        LognormalTerminal {
            s0: params.initial_price,
            log_mean: model.log_drift() * days,
            log_std: model.log_diffusion() * days.sqrt(),
        }
    }

    /// E\[S_T\] = S_0 * exp(m + s²/2)
    pub fn expected_price(&self) -> f64 {
        self.s0 * (self.log_mean + 0.5 * self.log_std * self.log_std).exp()
    }

    /// Quantile of the simple return `S_T / S_0 - 1`
    pub fn return_quantile(&self, p: f64) -> RiskResult<f64> {
        if !(p > 0.0 && p < 1.0) {
            return Err(RiskError::InvalidParameter {
                parameter: "quantile".to_string(),
                value: p,
                constraint: "must be in the open interval (0, 1)".to_string(),
            });
        }
        if self.log_std == 0.0 {
            return Ok(self.log_mean.exp() - 1.0);
        }
        let normal = Normal::new(self.log_mean, self.log_std)
            .map_err(|e| RiskError::computation(format!("terminal log-return law: {}", e)))?;
        Ok(normal.inverse_cdf(p).exp() - 1.0)
    }

    /// P(S_T < level)
    pub fn probability_below(&self, level: f64) -> f64 {
        if level <= 0.0 {
            return 0.0;
        }
        let x = (level / self.s0).ln() - self.log_mean;
        if self.log_std == 0.0 {
            return if x > 0.0 { 1.0 } else { 0.0 };
        }
        norm_cdf(x / self.log_std)
    }
}

/// Closed-form 95% VaR as `(amount, signed percent)`, same conventions as the
/// Monte Carlo figure.
pub fn parametric_var_95(params: &SimulationParameters) -> RiskResult<(f64, f64)> {
    let q = LognormalTerminal::from_params(params).return_quantile(LOWER_QUANTILE)?;
    Ok((params.initial_price * q.abs(), q * 100.0))
}
