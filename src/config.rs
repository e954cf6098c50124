//! Circuit Configuration
//!
//! The physical error rate is validated once and then threaded unchanged through every noise-emitting builder.
//!

use super::error::*;
use serde::{Deserialize, Serialize};

/// uniform physical error rate used by every noise channel of a circuit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "f64", into = "f64")]
pub struct UniformNoise {
    p: f64,
}

impl UniformNoise {
    pub fn new(p: f64) -> CircuitResult<Self> {
        if !(0. ..=1.).contains(&p) {
            // NaN also lands here
            return Err(CircuitError::InvalidProbability(p));
        }
        Ok(Self { p })
    }

    pub fn noiseless() -> Self {
        Self { p: 0. }
    }

    pub fn p(&self) -> f64 {
        self.p
    }
}

impl TryFrom<f64> for UniformNoise {
    type Error = CircuitError;
    fn try_from(p: f64) -> CircuitResult<Self> {
        Self::new(p)
    }
}

impl From<UniformNoise> for f64 {
    fn from(noise: UniformNoise) -> f64 {
        noise.p
    }
}

pub fn default_rounds() -> usize {
    3
}

/// parameters of one memory experiment circuit, e.g. `{"distance":5,"rounds":10,"p":0.001}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CircuitConfig {
    pub distance: usize,
    /// total rounds of stabilizer measurement; fewer than 2 still emits the initialization and the final round
    #[serde(default = "default_rounds")]
    pub rounds: usize,
    /// physical error rate
    pub p: UniformNoise,
}

impl CircuitConfig {
    pub fn new(distance: usize, rounds: usize, p: f64) -> CircuitResult<Self> {
        Ok(Self {
            distance,
            rounds,
            p: UniformNoise::new(p)?,
        })
    }

    pub fn from_json(config: &str) -> CircuitResult<Self> {
        Ok(serde_json::from_str(config)?)
    }
}
