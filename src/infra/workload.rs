//! Synthetic request stream.
//!
//! Inter-arrival gaps follow a shifted Pareto law scaled by the dynamism,
//! masses a log-normal law whose median is `mass / disparity`. Every draw
//! comes from the caller's generator, so a seed fixes the whole stream.

use rand::distr::Uniform;
use rand::rngs::StdRng;
use rand_distr::{Distribution, LogNormal, Pareto};
use serde::{Deserialize, Serialize};

use crate::core::{Request, SimulationError};
use crate::util::SimTime;

/// Shape of the inter-arrival Pareto law.
const GAP_SHAPE: f64 = 4.0;
/// Gap multiplier applied on top of the dynamism.
const GAP_SCALE: f64 = 3.0;

/// Workload generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadParams {
    /// Scales the inter-arrival gaps.
    pub dynamism: f64,
    /// Reference mass of a request.
    pub mass: f64,
    /// Spread of the mass distribution, at least 1.
    pub disparity: f64,
    /// Lower bound of the data volume, inclusive.
    pub data_min: f64,
    /// Upper bound of the data volume, exclusive.
    pub data_max: f64,
}

impl Default for WorkloadParams {
    fn default() -> Self {
        Self {
            dynamism: 500.0,
            mass: 1700.0,
            disparity: 3.8,
            data_min: 10.0,
            data_max: 500.0,
        }
    }
}

impl WorkloadParams {
    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.dynamism.is_finite() && self.dynamism > 0.0) {
            return Err("dynamism must be greater than 0".into());
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err("mass must be greater than 0".into());
        }
        if !(self.disparity.is_finite() && self.disparity >= 1.0) {
            return Err("disparity must be at least 1".into());
        }
        if !(self.data_min.is_finite() && self.data_max.is_finite()) {
            return Err("data bounds must be finite".into());
        }
        if !(0.0 <= self.data_min && self.data_min < self.data_max) {
            return Err("data bounds must satisfy 0 <= data_min < data_max".into());
        }
        Ok(())
    }
}

/// Draws requests from [`WorkloadParams`].
#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    dynamism: f64,
    gap: Pareto<f64>,
    mass: LogNormal<f64>,
    data: Uniform<f64>,
}

impl WorkloadGenerator {
    /// Build the distributions.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidWorkload`] if the parameters are out of range.
    pub fn new(params: &WorkloadParams) -> Result<Self, SimulationError> {
        params.validate().map_err(SimulationError::InvalidWorkload)?;
        let invalid = |e: &dyn std::fmt::Display| SimulationError::InvalidWorkload(e.to_string());

        let mu = (params.mass / params.disparity).ln();
        let sigma = (2.0 * params.disparity.ln()).sqrt();
        Ok(Self {
            dynamism: params.dynamism,
            gap: Pareto::new(1.0, GAP_SHAPE).map_err(|e| invalid(&e))?,
            mass: LogNormal::new(mu, sigma).map_err(|e| invalid(&e))?,
            data: Uniform::new(params.data_min, params.data_max).map_err(|e| invalid(&e))?,
        })
    }

    /// Draw the request following one submitted at `previous`.
    ///
    /// The request is named `job{index}` and accepts one to `server_count`
    /// servers with identity speed factors.
    pub fn next_request(
        &self,
        rng: &mut StdRng,
        previous: SimTime,
        index: usize,
        server_count: usize,
    ) -> Request {
        let gap = (self.gap.sample(rng) - 1.0) * GAP_SCALE * self.dynamism;
        let mass = self.mass.sample(rng);
        let data = self.data.sample(rng);
        Request::new(format!("job{index}"), previous + gap, mass)
            .with_data(data)
            .with_server_range(1, server_count.max(1))
    }

    /// Draw `job_count` requests in submission order, the first one
    /// submitted one gap after time 0.
    pub fn generate(&self, rng: &mut StdRng, job_count: usize, server_count: usize) -> Vec<Request> {
        let mut requests: Vec<Request> = Vec::with_capacity(job_count);
        let mut previous = 0.0;
        for index in 0..job_count {
            let request = self.next_request(rng, previous, index, server_count);
            previous = request.submission_time;
            requests.push(request);
        }
        tracing::debug!("generated {} requests up to time {}", requests.len(), previous);
        requests
    }
}
