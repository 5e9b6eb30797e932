//! Default implementation of the [`Evaluator`] trait.
use super::Evaluator;
use crate::{record::Record, Env, Policy};
use anyhow::Result;
use log::debug;

/// Runs a fixed number of episodes and reports the mean return.
///
/// The evaluator owns its own environment instance, built from the given
/// configuration, so that evaluation never shares an emulator with training.
///
/// ```ignore
/// let mut evaluator = DefaultEvaluator::<Env>::new(&env_config, 0, 5)?;
/// let record = evaluator.evaluate(&mut policy)?;
/// println!("Average return: {}", record.get_scalar("Episode return")?);
/// ```
pub struct DefaultEvaluator<E: Env> {
    n_episodes: usize,
    render: bool,
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<P>(&mut self, policy: &mut P) -> Result<Record>
    where
        P: Policy<E> + ?Sized,
    {
        let mut r_total = 0f32;

        for ix in 0..self.n_episodes {
            let mut prev_obs = self.env.reset_with_index(ix)?;
            let mut r_episode = 0f32;

            loop {
                if self.render {
                    self.env.render()?;
                }
                let act = policy.sample(&prev_obs);
                let (step, _) = self.env.step(&act)?;
                r_episode += step.reward;
                if step.is_done() {
                    break;
                }
                prev_obs = step.obs;
            }

            debug!("Evaluation episode {}, return = {}", ix, r_episode);
            r_total += r_episode;
        }

        Ok(Record::from_scalar(
            "Episode return",
            r_total / self.n_episodes.max(1) as f32,
        ))
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// * `config` - Configuration for the environment
    /// * `seed` - Random seed for environment initialization
    /// * `n_episodes` - Number of episodes to run during evaluation
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            render: false,
            env: E::build(config, seed)?,
        })
    }

    /// Renders the environment at every step during evaluation.
    pub fn render(mut self, render: bool) -> Self {
        self.render = render;
        self
    }

    /// Closes the environment of the evaluator.
    pub fn close(&mut self) -> Result<()> {
        self.env.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{CountingAgent, CountingEnv, CountingEnvConfig};

    #[test]
    fn mean_episode_return() -> Result<()> {
        let config = CountingEnvConfig { episode_len: 4 };
        let mut evaluator = DefaultEvaluator::<CountingEnv>::new(&config, 0, 3)?;
        let mut agent = CountingAgent::default();
        let record = evaluator.evaluate(&mut agent)?;
        assert_eq!(record.get_scalar("Episode return")?, 4.0);
        evaluator.close()?;
        Ok(())
    }
}
