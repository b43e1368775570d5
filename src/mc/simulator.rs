// src/mc/simulator.rs
//! Path generation under daily-stepped GBM.

use crate::models::gbm::Gbm;
use crate::params::SimulationParameters;
use crate::rng;
use ndarray::{Array2, ArrayView1, Axis, Zip};
use rand::Rng;

/// Simulated prices, one row per path and one column per day (day 0 first)
pub type PathMatrix = Array2<f64>;

/// Simulate `path_count` price paths over `horizon_days` days.
///
/// # Generation order
///
/// Paths advance column by column: for each day one batch of `path_count`
/// normal draws is taken from `rng` and applied to every path before the next
/// day starts. Seeded fixtures depend on this order.
///
/// Bounds are not enforced here. `horizon_days = 0` yields a single column of
/// `initial_price`.
pub fn simulate<R: Rng + ?Sized>(params: &SimulationParameters, rng: &mut R) -> PathMatrix {
    let model = Gbm::from_params(params);
    let n = params.path_count;
    let mut matrix = PathMatrix::from_elem((n, params.day_columns()), model.s0);
    let mut draws = vec![0.0; n];

    for t in 1..=params.horizon_days {
        rng::fill_normals(rng, &mut draws);

        let (done, mut rest) = matrix.view_mut().split_at(Axis(1), t);
        Zip::from(rest.column_mut(0))
            .and(done.column(t - 1))
            .and(ArrayView1::from(&draws[..]))
            .for_each(|next, &prev, &z| *next = model.exact_step(prev, z));
    }

    matrix
}

/// Flatten a path matrix into row vectors for the JSON boundary.
pub fn to_rows(matrix: &PathMatrix) -> Vec<Vec<f64>> {
    matrix.outer_iter().map(|row| row.to_vec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::gbm::daily_volatility;
    use crate::rng::seed_rng_from_u64;

    #[test]
    fn test_shape_and_first_column() {
        let params = SimulationParameters::new(42.0, 25.0, 12, 150);
        let matrix = simulate(&params, &mut seed_rng_from_u64(1));

        assert_eq!(matrix.dim(), (150, 13));
        assert!(matrix.column(0).iter().all(|&p| p == 42.0));
        assert!(matrix.iter().all(|&p| p.is_finite() && p > 0.0));
    }

    #[test]
    fn test_zero_horizon_is_single_column() {
        let params = SimulationParameters::new(10.0, 50.0, 0, 5);
        let matrix = simulate(&params, &mut seed_rng_from_u64(1));

        assert_eq!(matrix.dim(), (5, 1));
        assert!(matrix.iter().all(|&p| p == 10.0));
    }

    #[test]
    fn test_zero_paths_does_not_panic() {
        let params = SimulationParameters::new(10.0, 50.0, 3, 0);
        let matrix = simulate(&params, &mut seed_rng_from_u64(1));
        assert_eq!(matrix.dim(), (0, 4));
    }

    #[test]
    fn test_draws_are_consumed_day_by_day() {
        // Replaying the generator manually, one batch per day, must rebuild the matrix.
        let params = SimulationParameters::new(100.0, 30.0, 4, 3);
        let matrix = simulate(&params, &mut seed_rng_from_u64(5));

        let mut replay = seed_rng_from_u64(5);
        let sd = daily_volatility(30.0);
        let dt = 1.0 / 252.0;
        let mut prices = vec![100.0; 3];
        for t in 1..=4 {
            let z = rng::generate(&mut replay, 3);
            for i in 0..3 {
                prices[i] *= ((0.0 - 0.5 * sd * sd) * dt + sd * dt.sqrt() * z[i]).exp();
                assert_eq!(matrix[[i, t]], prices[i]);
            }
        }
    }

    #[test]
    fn test_to_rows() {
        let params = SimulationParameters::new(1.0, 10.0, 2, 4);
        let matrix = simulate(&params, &mut seed_rng_from_u64(9));
        let rows = to_rows(&matrix);

        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.len() == 3));
        assert_eq!(rows[2][1], matrix[[2, 1]]);
    }
}
