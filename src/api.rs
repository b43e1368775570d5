// src/api.rs
//! Request/response boundary for the projection engine.
//!
//! Mirrors a JSON `POST` handler: a request body is parsed and validated,
//! the engine runs, and either the full response or an `{"error": ...}` body
//! is produced with a status code (400 for caller mistakes, 500 otherwise).

use crate::error::{RiskError, RiskResult};
use crate::mc::engine;
use crate::mc::simulator;
use crate::mc::statistics::SimulationResult;
use crate::params::SimulationParameters;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Wire form of a projection request.
///
/// Counts are signed so that negative values reach validation and get a
/// field-specific message instead of a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub initial_price: f64,
    pub annual_volatility_pct: f64,
    pub horizon_days: i64,
    pub path_count: i64,
}

impl SimulationRequest {
    /// Build engine parameters, checked by [`SimulationParameters::validate`].
    ///
    /// A negative count is rejected under its own field name, reporting the
    /// value the caller sent.
    pub fn into_parameters(&self) -> RiskResult<SimulationParameters> {
        let params = SimulationParameters::new(
            self.initial_price,
            self.annual_volatility_pct,
            count_field(self.horizon_days),
            count_field(self.path_count),
        );
        params.validate().map_err(|err| self.with_sent_value(err))?;
        Ok(params)
    }

    fn with_sent_value(&self, err: RiskError) -> RiskError {
        match err {
            RiskError::InvalidParameter {
                parameter,
                value,
                constraint,
            } => {
                let value = match parameter.as_str() {
                    "horizon_days" => self.horizon_days as f64,
                    "path_count" => self.path_count as f64,
                    _ => value,
                };
                RiskError::InvalidParameter {
                    parameter,
                    value,
                    constraint,
                }
            }
            other => other,
        }
    }
}

impl From<SimulationParameters> for SimulationRequest {
    fn from(params: SimulationParameters) -> Self {
        SimulationRequest {
            initial_price: params.initial_price,
            annual_volatility_pct: params.annual_volatility_pct,
            horizon_days: params.horizon_days as i64,
            path_count: params.path_count as i64,
        }
    }
}

/// Signed wire count to `usize`; negatives become 0, which every count range rejects.
fn count_field(value: i64) -> usize {
    usize::try_from(value).unwrap_or(if value < 0 { 0 } else { usize::MAX })
}

/// Wire form of a completed projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    /// Every simulated path, one row per path
    pub simulations: Vec<Vec<f64>>,
    #[serde(flatten)]
    pub result: SimulationResult,
}

/// Error payload returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&RiskError> for ErrorBody {
    fn from(err: &RiskError) -> Self {
        ErrorBody {
            error: err.public_message(),
        }
    }
}

/// Validate a request and run the engine.
pub fn handle_request<R: Rng + ?Sized>(
    request: &SimulationRequest,
    rng: &mut R,
) -> RiskResult<SimulationResponse> {
    let params = request.into_parameters()?;
    let run = engine::run_simulation(&params, rng)?;
    Ok(SimulationResponse {
        simulations: simulator::to_rows(&run.paths),
        result: run.result,
    })
}

/// JSON in, `(status, JSON)` out.
pub fn handle_json<R: Rng + ?Sized>(body: &str, rng: &mut R) -> (u16, String) {
    let outcome = serde_json::from_str::<SimulationRequest>(body)
        .map_err(|e| RiskError::MalformedRequest {
            reason: e.to_string(),
        })
        .and_then(|request| handle_request(&request, rng))
        .and_then(|response| {
            serde_json::to_string(&response)
                .map_err(|e| RiskError::computation(format!("response encoding: {}", e)))
        });

    match outcome {
        Ok(json) => (200, json),
        Err(err) => {
            let status = err.status_code();
            if status >= 500 {
                error!(%err, "simulation request failed");
            } else {
                warn!(%err, "simulation request rejected");
            }
            let body = serde_json::to_string(&ErrorBody::from(&err))
                .unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string());
            (status, body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seed_rng_from_u64;

    fn request(price: f64, vol: f64, days: i64, paths: i64) -> SimulationRequest {
        SimulationRequest {
            initial_price: price,
            annual_volatility_pct: vol,
            horizon_days: days,
            path_count: paths,
        }
    }

    fn rejected_field(req: SimulationRequest) -> String {
        match req.into_parameters() {
            Err(RiskError::InvalidParameter { parameter, .. }) => parameter,
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_counts_get_field_messages() {
        assert_eq!(rejected_field(request(100.0, 20.0, -3, 1000)), "horizon_days");
        assert_eq!(rejected_field(request(100.0, 20.0, 30, -1)), "path_count");
    }

    #[test]
    fn test_negative_count_reports_sent_value() {
        match request(100.0, 20.0, -3, 1000).into_parameters() {
            Err(RiskError::InvalidParameter {
                parameter,
                value,
                constraint,
            }) => {
                assert_eq!(parameter, "horizon_days");
                assert_eq!(value, -3.0);
                assert_eq!(constraint, "must be between 1 and 365");
            }
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_request_and_parameters_agree_on_rejections() {
        let cases = [
            (f64::NAN, 20.0, 30, 1000),
            (-1.0, 20.0, 30, 1000),
            (100.0, f64::INFINITY, 30, 1000),
            (100.0, 200.5, 30, 1000),
            (100.0, 20.0, 0, 1000),
            (100.0, 20.0, 366, 1000),
            (100.0, 20.0, 30, 99),
            (100.0, 20.0, 30, 10_001),
        ];
        for (price, vol, days, paths) in cases {
            let from_request = request(price, vol, days, paths).into_parameters().unwrap_err();
            let from_params = SimulationParameters::new(price, vol, days as usize, paths as usize)
                .validate()
                .unwrap_err();
            assert_eq!(from_request.to_string(), from_params.to_string());
        }
    }

    #[test]
    fn test_validation_order() {
        assert_eq!(rejected_field(request(0.0, 500.0, -3, -1)), "initial_price");
        assert_eq!(rejected_field(request(1.0, 500.0, -3, -1)), "annual_volatility_pct");
        assert_eq!(rejected_field(request(1.0, 5.0, 400, -1)), "horizon_days");
    }

    #[test]
    fn test_handle_request_shape() {
        let mut rng = seed_rng_from_u64(8);
        let response = handle_request(&request(100.0, 20.0, 5, 100), &mut rng).unwrap();
        assert_eq!(response.simulations.len(), 100);
        assert!(response.simulations.iter().all(|row| row.len() == 6));
        assert_eq!(response.result.mean_path.len(), 6);
    }

    #[test]
    fn test_handle_json_success_has_flat_fields() {
        let mut rng = seed_rng_from_u64(8);
        let body = r#"{"initial_price":100,"annual_volatility_pct":20,"horizon_days":3,"path_count":100}"#;
        let (status, json) = handle_json(body, &mut rng);
        assert_eq!(status, 200);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for key in [
            "simulations",
            "mean_path",
            "percentile_5_path",
            "percentile_95_path",
            "terminal_mean",
            "terminal_min",
            "terminal_max",
            "var_95_amount",
            "var_95_pct",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_handle_json_rejections() {
        let mut rng = seed_rng_from_u64(8);

        let (status, json) = handle_json("{not json", &mut rng);
        assert_eq!(status, 400);
        assert!(json.contains("Malformed request"));

        let body = r#"{"initial_price":100,"annual_volatility_pct":20,"horizon_days":30,"path_count":5}"#;
        let (status, json) = handle_json(body, &mut rng);
        assert_eq!(status, 400);
        let err: ErrorBody = serde_json::from_str(&json).unwrap();
        assert!(err.error.contains("path_count"));
        assert!(err.error.contains("between 100 and 10000"));
    }

    #[test]
    fn test_request_roundtrips_parameters() {
        let params = SimulationParameters::default();
        let req = SimulationRequest::from(params);
        assert_eq!(req.into_parameters().unwrap(), params);
    }
}
