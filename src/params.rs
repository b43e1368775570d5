// src/params.rs
//! Simulation inputs and their accepted ranges.

use crate::error::{validation::*, RiskResult};
use serde::{Deserialize, Serialize};

pub const MIN_VOLATILITY_PCT: f64 = 0.0;
pub const MAX_VOLATILITY_PCT: f64 = 200.0;
pub const MIN_HORIZON_DAYS: usize = 1;
pub const MAX_HORIZON_DAYS: usize = 365;
pub const MIN_PATH_COUNT: usize = 100;
pub const MAX_PATH_COUNT: usize = 10_000;

/// Inputs for one projection run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Spot price at day 0
    pub initial_price: f64,
    /// Annualised volatility in percentage points (20.0 means 20%)
    pub annual_volatility_pct: f64,
    /// Number of trading days to project
    pub horizon_days: usize,
    /// Number of simulated paths
    pub path_count: usize,
}

impl SimulationParameters {
    pub fn new(
        initial_price: f64,
        annual_volatility_pct: f64,
        horizon_days: usize,
        path_count: usize,
    ) -> Self {
        Self {
            initial_price,
            annual_volatility_pct,
            horizon_days,
            path_count,
        }
    }

    /// Validate every field against its accepted range.
    ///
    /// Fields are checked in declaration order; the first violation is returned.
    pub fn validate(&self) -> RiskResult<()> {
        validate_finite("initial_price", self.initial_price)?;
        validate_positive("initial_price", self.initial_price)?;
        validate_finite("annual_volatility_pct", self.annual_volatility_pct)?;
        validate_range(
            "annual_volatility_pct",
            self.annual_volatility_pct,
            MIN_VOLATILITY_PCT,
            MAX_VOLATILITY_PCT,
        )?;
        validate_count_range(
            "horizon_days",
            self.horizon_days,
            MIN_HORIZON_DAYS,
            MAX_HORIZON_DAYS,
        )?;
        validate_count_range("path_count", self.path_count, MIN_PATH_COUNT, MAX_PATH_COUNT)?;
        Ok(())
    }

    /// Number of day columns in the path matrix (day 0 included)
    pub fn day_columns(&self) -> usize {
        self.horizon_days + 1
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters {
            initial_price: 100.0,
            annual_volatility_pct: 20.0,
            horizon_days: 30,
            path_count: 1_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RiskError;

    fn rejected_field(params: SimulationParameters) -> String {
        match params.validate() {
            Err(RiskError::InvalidParameter { parameter, .. }) => parameter,
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_default_is_valid() {
        assert!(SimulationParameters::default().validate().is_ok());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(SimulationParameters::new(0.01, 0.0, 1, 100).validate().is_ok());
        assert!(SimulationParameters::new(1e6, 200.0, 365, 10_000)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_each_field_has_its_own_rejection() {
        let base = SimulationParameters::default();

        assert_eq!(
            rejected_field(SimulationParameters { initial_price: 0.0, ..base }),
            "initial_price"
        );
        assert_eq!(
            rejected_field(SimulationParameters { annual_volatility_pct: 250.0, ..base }),
            "annual_volatility_pct"
        );
        assert_eq!(
            rejected_field(SimulationParameters { annual_volatility_pct: -0.5, ..base }),
            "annual_volatility_pct"
        );
        assert_eq!(
            rejected_field(SimulationParameters { horizon_days: 0, ..base }),
            "horizon_days"
        );
        assert_eq!(
            rejected_field(SimulationParameters { horizon_days: 366, ..base }),
            "horizon_days"
        );
        assert_eq!(
            rejected_field(SimulationParameters { path_count: 99, ..base }),
            "path_count"
        );
        assert_eq!(
            rejected_field(SimulationParameters { path_count: 10_001, ..base }),
            "path_count"
        );
    }

    #[test]
    fn test_non_finite_price_rejected() {
        let params = SimulationParameters {
            initial_price: f64::INFINITY,
            ..Default::default()
        };
        assert_eq!(rejected_field(params), "initial_price");
    }

    #[test]
    fn test_first_violation_wins() {
        let params = SimulationParameters::new(-1.0, 500.0, 0, 1);
        assert_eq!(rejected_field(params), "initial_price");
    }
}
