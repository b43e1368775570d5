// src/mc/statistics.rs
//! Reduction of a path matrix into bands, terminal statistics and VaR.
//!
//! Percentiles use 0-indexed nearest rank without interpolation:
//! ```text
//! p-th percentile = sorted[floor(n * p)]
//! ```
//! For `n < 20` the 5% rank is 0, so the minimum is reported as the cutoff.

use crate::error::{RiskError, RiskResult};
use crate::mc::simulator::PathMatrix;
use ndarray::{ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

pub const LOWER_QUANTILE: f64 = 0.05;
pub const UPPER_QUANTILE: f64 = 0.95;

/// Aggregate statistics of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub mean_path: Vec<f64>,
    pub percentile_5_path: Vec<f64>,
    pub percentile_95_path: Vec<f64>,
    pub terminal_mean: f64,
    pub terminal_min: f64,
    pub terminal_max: f64,
    /// Loss at the 5% return quantile in currency units, always ≥ 0
    pub var_95_amount: f64,
    /// 5% return quantile in percent of the initial price, sign preserved
    pub var_95_pct: f64,
}

/// Index of the nearest-rank quantile in a sorted sample of size `n`.
pub fn nearest_rank_index(n: usize, quantile: f64) -> usize {
    let rank = (n as f64 * quantile).floor() as usize;
    rank.min(n.saturating_sub(1))
}

/// Sort a sample ascending and pick the nearest-rank quantile.
///
/// Returns `None` for an empty sample.
pub fn nearest_rank(values: &mut [f64], quantile: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    Some(values[nearest_rank_index(values.len(), quantile)])
}

/// Lower and upper band values for one day column
fn day_band(column: ArrayView1<f64>) -> (f64, f64) {
    let mut sorted = column.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    (
        sorted[nearest_rank_index(n, LOWER_QUANTILE)],
        sorted[nearest_rank_index(n, UPPER_QUANTILE)],
    )
}

/// VaR at 95% from terminal prices: `(amount, signed percent)`
pub fn value_at_risk_95(terminal: &[f64], initial_price: f64) -> Option<(f64, f64)> {
    let mut returns: Vec<f64> = terminal
        .iter()
        .map(|&price| (price - initial_price) / initial_price)
        .collect();
    let cutoff = nearest_rank(&mut returns, LOWER_QUANTILE)?;
    Some((initial_price * cutoff.abs(), cutoff * 100.0))
}

/// Reduce a path matrix into a [`SimulationResult`].
///
/// # Errors
///
/// `ComputationFailure` when the matrix has no paths or no day columns, or
/// when `initial_price` is not a positive finite number.
pub fn aggregate(matrix: &PathMatrix, initial_price: f64) -> RiskResult<SimulationResult> {
    let (paths, days) = matrix.dim();
    if paths == 0 || days == 0 {
        return Err(RiskError::computation(format!(
            "cannot aggregate an empty path matrix ({} x {})",
            paths, days
        )));
    }
    if !(initial_price.is_finite() && initial_price > 0.0) {
        return Err(RiskError::computation(format!(
            "initial price {} is not a positive finite number",
            initial_price
        )));
    }

    // Incremental mean: exact on a constant column, and the last entry equals
    // `terminal_mean`.
    let mean_path: Vec<f64> = matrix
        .axis_iter(Axis(1))
        .map(|column| Statistics::mean(column.iter()))
        .collect();

    let (percentile_5_path, percentile_95_path): (Vec<f64>, Vec<f64>) =
        matrix.axis_iter(Axis(1)).map(day_band).unzip();

    let terminal = matrix.column(days - 1).to_vec();
    let terminal_mean = Statistics::mean(terminal.iter());
    let terminal_min = Statistics::min(terminal.iter());
    let terminal_max = Statistics::max(terminal.iter());

    let (var_95_amount, var_95_pct) = value_at_risk_95(&terminal, initial_price)
        .ok_or_else(|| RiskError::computation("no terminal prices"))?;

    if !(terminal_mean.is_finite() && var_95_amount.is_finite()) {
        return Err(RiskError::computation(
            "non-finite terminal statistics (price overflow)",
        ));
    }

    Ok(SimulationResult {
        mean_path,
        percentile_5_path,
        percentile_95_path,
        terminal_mean,
        terminal_min,
        terminal_max,
        var_95_amount,
        var_95_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    #[test]
    fn test_nearest_rank_index() {
        assert_eq!(nearest_rank_index(100, LOWER_QUANTILE), 5);
        assert_eq!(nearest_rank_index(100, UPPER_QUANTILE), 95);
        assert_eq!(nearest_rank_index(1000, LOWER_QUANTILE), 50);
        assert_eq!(nearest_rank_index(1000, UPPER_QUANTILE), 950);
        assert_eq!(nearest_rank_index(10_000, UPPER_QUANTILE), 9_500);
        // Small samples collapse to the minimum.
        assert_eq!(nearest_rank_index(19, LOWER_QUANTILE), 0);
        assert_eq!(nearest_rank_index(1, UPPER_QUANTILE), 0);
        assert_eq!(nearest_rank_index(0, UPPER_QUANTILE), 0);
    }

    #[test]
    fn test_nearest_rank_sorts_input() {
        let mut values: Vec<f64> = (0..100).rev().map(f64::from).collect();
        assert_eq!(nearest_rank(&mut values, LOWER_QUANTILE), Some(5.0));
        assert_eq!(values[0], 0.0);
        assert_eq!(nearest_rank(&mut [], LOWER_QUANTILE), None);
    }

    #[test]
    fn test_aggregate_small_matrix() {
        // Four paths, three days: ranks are floor(4*0.05)=0 and floor(4*0.95)=3.
        let matrix = array![
            [100.0, 110.0, 120.0],
            [100.0, 90.0, 80.0],
            [100.0, 105.0, 100.0],
            [100.0, 95.0, 104.0],
        ];
        let result = aggregate(&matrix, 100.0).expect("valid matrix");

        assert_eq!(result.mean_path, vec![100.0, 100.0, 101.0]);
        assert_eq!(result.mean_path[2], result.terminal_mean);
        assert_eq!(result.percentile_5_path, vec![100.0, 90.0, 80.0]);
        assert_eq!(result.percentile_95_path, vec![100.0, 110.0, 120.0]);
        assert_eq!(result.terminal_min, 80.0);
        assert_eq!(result.terminal_max, 120.0);
        assert_relative_eq!(result.terminal_mean, 101.0, epsilon = 1e-12);
        assert_relative_eq!(result.var_95_pct, -20.0, epsilon = 1e-12);
        assert_relative_eq!(result.var_95_amount, 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_var_amount_is_magnitude_when_all_paths_gain() {
        let matrix = array![[50.0, 55.0], [50.0, 60.0], [50.0, 52.0]];
        let result = aggregate(&matrix, 50.0).expect("valid matrix");

        assert!(result.var_95_pct > 0.0);
        assert_relative_eq!(result.var_95_pct, 4.0, epsilon = 1e-12);
        assert_relative_eq!(result.var_95_amount, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_var_picks_fifth_rank_of_hundred() {
        // Terminal prices 1..=100 around an initial price of 100.
        let mut matrix = Array2::from_elem((100, 2), 100.0);
        for i in 0..100 {
            matrix[[i, 1]] = (100 - i) as f64;
        }
        let (amount, pct) = value_at_risk_95(&matrix.column(1).to_vec(), 100.0).unwrap();

        // sorted[5] = 6.0 -> return -0.94
        assert_relative_eq!(pct, -94.0, epsilon = 1e-9);
        assert_relative_eq!(amount, 94.0, epsilon = 1e-9);
    }

    #[test]
    fn test_constant_columns_keep_exact_mean() {
        for &price in &[0.1, 0.37, 1.1, 123.45] {
            for &n in &[100usize, 1_000, 10_000] {
                let matrix = Array2::from_elem((n, 3), price);
                let result = aggregate(&matrix, price).expect("valid matrix");

                assert!(result.mean_path.iter().all(|&m| m == price), "price {} n {}", price, n);
                assert_eq!(result.terminal_mean, price);
                assert_eq!(result.var_95_amount, 0.0);
            }
        }
    }

    #[test]
    fn test_aggregate_rejects_empty_and_bad_price() {
        let empty = Array2::<f64>::zeros((0, 3));
        assert!(matches!(
            aggregate(&empty, 100.0),
            Err(RiskError::ComputationFailure { .. })
        ));

        let no_days = Array2::<f64>::zeros((3, 0));
        assert!(aggregate(&no_days, 100.0).is_err());

        let matrix = array![[1.0, 2.0]];
        assert!(aggregate(&matrix, 0.0).is_err());
        assert!(aggregate(&matrix, f64::NAN).is_err());
    }
}
