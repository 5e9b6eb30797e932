//! PPO hyperparameters and their search ranges.
use serde::{Deserialize, Serialize};

/// Hyperparameters of PPO searched by a [`Study`](super::Study).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PpoParams {
    /// Number of environment steps per rollout.
    pub n_steps: usize,

    /// Discount factor.
    pub gamma: f64,

    /// Learning rate of the optimizer.
    pub learning_rate: f64,

    /// Clipping parameter of the surrogate objective.
    pub clip_range: f64,

    /// Bias-variance trade-off factor of generalized advantage estimation.
    pub gae_lambda: f64,
}

impl PpoParams {
    /// Rounds `n_steps` down to a multiple of `multiple`, e.g. the minibatch size.
    ///
    /// `n_steps` never drops below `multiple`.
    pub fn align_n_steps(mut self, multiple: usize) -> Self {
        if multiple > 0 {
            self.n_steps = (self.n_steps / multiple).max(1) * multiple;
        }
        self
    }
}

/// An inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    /// Lower bound.
    pub low: usize,

    /// Upper bound.
    pub high: usize,
}

/// A float range, sampled uniformly or uniformly in log scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    /// Lower bound.
    pub low: f64,

    /// Upper bound.
    pub high: f64,

    /// Sample in log scale.
    pub log: bool,
}

impl FloatRange {
    /// Uniform range.
    pub fn uniform(low: f64, high: f64) -> Self {
        Self {
            low,
            high,
            log: false,
        }
    }

    /// Log-uniform range.
    pub fn log_uniform(low: f64, high: f64) -> Self {
        Self {
            low,
            high,
            log: true,
        }
    }

    /// Returns `true` if `v` is in the range.
    pub fn contains(&self, v: f64) -> bool {
        self.low <= v && v <= self.high
    }
}

/// Search space of [`PpoParams`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PpoParamSpace {
    /// Range of `n_steps`.
    pub n_steps: IntRange,

    /// Range of `gamma`.
    pub gamma: FloatRange,

    /// Range of `learning_rate`.
    pub learning_rate: FloatRange,

    /// Range of `clip_range`.
    pub clip_range: FloatRange,

    /// Range of `gae_lambda`.
    pub gae_lambda: FloatRange,
}

impl Default for PpoParamSpace {
    fn default() -> Self {
        Self {
            n_steps: IntRange {
                low: 2048,
                high: 8192,
            },
            gamma: FloatRange::log_uniform(0.8, 0.9999),
            learning_rate: FloatRange::log_uniform(1e-5, 1e-4),
            clip_range: FloatRange::uniform(0.1, 0.4),
            gae_lambda: FloatRange::uniform(0.8, 0.99),
        }
    }
}

impl PpoParamSpace {
    /// Returns `true` if every parameter lies in its range.
    pub fn contains(&self, p: &PpoParams) -> bool {
        self.n_steps.low <= p.n_steps
            && p.n_steps <= self.n_steps.high
            && self.gamma.contains(p.gamma)
            && self.learning_rate.contains(p.learning_rate)
            && self.clip_range.contains(p.clip_range)
            && self.gae_lambda.contains(p.gae_lambda)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_n_steps_to_minibatch() {
        let p = PpoParams {
            n_steps: 7500,
            gamma: 0.9,
            learning_rate: 1e-5,
            clip_range: 0.2,
            gae_lambda: 0.9,
        };
        assert_eq!(p.clone().align_n_steps(64).n_steps, 7488);
        assert_eq!(p.clone().align_n_steps(10000).n_steps, 10000);
        assert_eq!(p.align_n_steps(0).n_steps, 7500);
    }
}
