//! Strategies for suggesting hyperparameters.
use super::{FloatRange, PpoParamSpace, PpoParams, TrialRecord};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Suggests hyperparameters for the next trial.
///
/// `history` holds every finished trial of the study, so that model-based
/// strategies can condition on past results.
pub trait ParamSampler {
    /// Suggests parameters in `space`.
    fn suggest(&mut self, space: &PpoParamSpace, history: &[TrialRecord]) -> PpoParams;
}

/// Samples every parameter independently, ignoring the history.
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    /// Constructs a sampler with a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn sample_float(&mut self, range: &FloatRange) -> f64 {
        if range.low >= range.high {
            return range.low;
        }
        if range.log {
            let v = self.rng.gen_range(range.low.ln()..range.high.ln()).exp();
            // exp(ln(x)) may round just outside of the range
            v.clamp(range.low, range.high)
        } else {
            self.rng.gen_range(range.low..range.high)
        }
    }
}

impl ParamSampler for RandomSampler {
    fn suggest(&mut self, space: &PpoParamSpace, _history: &[TrialRecord]) -> PpoParams {
        let n_steps = if space.n_steps.low >= space.n_steps.high {
            space.n_steps.low
        } else {
            self.rng.gen_range(space.n_steps.low..=space.n_steps.high)
        };

        PpoParams {
            n_steps,
            gamma: self.sample_float(&space.gamma),
            learning_rate: self.sample_float(&space.learning_rate),
            clip_range: self.sample_float(&space.clip_range),
            gae_lambda: self.sample_float(&space.gae_lambda),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_stay_in_space() {
        let space = PpoParamSpace::default();
        let mut sampler = RandomSampler::new(42);
        for _ in 0..200 {
            let p = sampler.suggest(&space, &[]);
            assert!(space.contains(&p), "{:?}", p);
        }
    }

    #[test]
    fn same_seed_same_suggestions() {
        let space = PpoParamSpace::default();
        let a = RandomSampler::new(7).suggest(&space, &[]);
        let b = RandomSampler::new(7).suggest(&space, &[]);
        assert_eq!(a, b);
    }
}
