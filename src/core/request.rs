//! Job requests and the speed-factor functions they carry.

use serde::{Deserialize, Serialize};

use crate::util::{JobId, SimTime};

/// Speed multiplier as a function of a scalar input.
///
/// Used as the malleability factor (input: server count, output ≥ 1) and as
/// the frequency factor (input: frequency). Factors are plain data so
/// requests stay serializable and runs stay replayable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpeedFactor {
    /// `a * x + b`
    Linear {
        /// Slope.
        a: f64,
        /// Offset.
        b: f64,
    },
    /// `a * x² + b * x + c`
    Quadratic {
        /// Quadratic coefficient.
        a: f64,
        /// Linear coefficient.
        b: f64,
        /// Offset.
        c: f64,
    },
}

impl SpeedFactor {
    /// `x ↦ x`: linear speedup in server count, proportional speed in frequency.
    #[must_use]
    pub const fn identity() -> Self {
        Self::Linear { a: 1.0, b: 0.0 }
    }

    /// `x ↦ value` regardless of input.
    #[must_use]
    pub const fn constant(value: f64) -> Self {
        Self::Linear { a: 0.0, b: value }
    }

    /// Evaluate the factor at `x`.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        match *self {
            Self::Linear { a, b } => a.mul_add(x, b),
            Self::Quadratic { a, b, c } => a.mul_add(x * x, b.mul_add(x, c)),
        }
    }
}

impl Default for SpeedFactor {
    fn default() -> Self {
        Self::identity()
    }
}

/// An immutable submission produced by the workload source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Unique request id; reused by every job executing this request.
    pub id: JobId,
    /// Simulated time at which the request becomes visible to the scheduler.
    pub submission_time: SimTime,
    /// Amount of data moved by a reconfiguration.
    pub data: f64,
    /// Work needed on one server at reference frequency.
    pub mass: f64,
    /// Lower bound on the number of servers.
    pub min_server_count: usize,
    /// Upper bound on the number of servers.
    pub max_server_count: usize,
    /// Speedup as a function of server count.
    pub malleability_factor: SpeedFactor,
    /// Speedup as a function of frequency.
    pub frequency_factor: SpeedFactor,
}

impl Request {
    /// Create a single-server request with no reconfiguration data and
    /// identity factors.
    pub fn new(id: impl Into<JobId>, submission_time: SimTime, mass: f64) -> Self {
        Self {
            id: id.into(),
            submission_time,
            data: 0.0,
            mass,
            min_server_count: 1,
            max_server_count: 1,
            malleability_factor: SpeedFactor::identity(),
            frequency_factor: SpeedFactor::identity(),
        }
    }

    /// Set the reconfiguration payload size.
    #[must_use]
    pub fn with_data(mut self, data: f64) -> Self {
        self.data = data;
        self
    }

    /// Set the accepted server-count range.
    #[must_use]
    pub fn with_server_range(mut self, min: usize, max: usize) -> Self {
        self.min_server_count = min;
        self.max_server_count = max;
        self
    }

    /// Set both speed factors.
    #[must_use]
    pub fn with_factors(mut self, malleability: SpeedFactor, frequency: SpeedFactor) -> Self {
        self.malleability_factor = malleability;
        self.frequency_factor = frequency;
        self
    }

    /// Returns true if the request can run on `n` servers.
    #[must_use]
    pub const fn accepts_server_count(&self, n: usize) -> bool {
        self.min_server_count <= n && n <= self.max_server_count
    }

    /// Check that the request can ever be placed on a pool of `server_count` servers.
    pub fn validate(&self, server_count: usize) -> Result<(), String> {
        if !(self.submission_time.is_finite() && self.submission_time >= 0.0) {
            return Err(format!(
                "{}: submission time {} must be non-negative",
                self.id, self.submission_time
            ));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(format!("{}: mass {} must be positive", self.id, self.mass));
        }
        if !(self.data.is_finite() && self.data >= 0.0) {
            return Err(format!("{}: data {} must be non-negative", self.id, self.data));
        }
        if self.min_server_count == 0 || self.min_server_count > self.max_server_count {
            return Err(format!(
                "{}: server range [{}, {}] is empty",
                self.id, self.min_server_count, self.max_server_count
            ));
        }
        if self.min_server_count > server_count {
            return Err(format!(
                "{}: needs {} servers, pool has {}",
                self.id, self.min_server_count, server_count
            ));
        }
        Ok(())
    }
}
