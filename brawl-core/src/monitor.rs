//! Episode statistics wrapper.
use crate::{
    record::{Record, RecordValue},
    Env, Space, Step,
};
use anyhow::Result;
use log::debug;

/// Wraps an environment and records episode statistics.
///
/// When an episode ends, the record returned with the step contains
/// `episode_return` and `episode_length`. Returns of completed episodes are
/// also kept in [`Monitor::episode_returns`].
pub struct Monitor<E: Env> {
    env: E,
    episode_return: f32,
    episode_length: usize,
    episode_returns: Vec<f32>,
}

impl<E: Env> Monitor<E> {
    /// Wraps an environment.
    pub fn new(env: E) -> Self {
        Self {
            env,
            episode_return: 0.0,
            episode_length: 0,
            episode_returns: vec![],
        }
    }

    /// Returns of completed episodes.
    pub fn episode_returns(&self) -> &[f32] {
        &self.episode_returns
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// Unwraps the environment.
    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E: Env> Env for Monitor<E> {
    type Config = E::Config;
    type Obs = E::Obs;
    type Act = E::Act;
    type Info = E::Info;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self::new(E::build(config, seed)?))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.episode_return = 0.0;
        self.episode_length = 0;
        self.env.reset()
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        self.episode_return = 0.0;
        self.episode_length = 0;
        self.env.reset_with_index(ix)
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        let (step, mut record) = self.env.step(a)?;
        self.episode_return += step.reward;
        self.episode_length += 1;

        if step.is_done() {
            debug!(
                "Episode finished, return = {}, length = {}",
                self.episode_return, self.episode_length
            );
            record.insert("episode_return", RecordValue::Scalar(self.episode_return));
            record.insert(
                "episode_length",
                RecordValue::Scalar(self.episode_length as f32),
            );
            self.episode_returns.push(self.episode_return);
        }

        Ok((step.cast(), record))
    }

    fn render(&mut self) -> Result<()> {
        self.env.render()
    }

    fn close(&mut self) -> Result<()> {
        self.env.close()
    }

    fn observation_space(&self) -> &Space {
        self.env.observation_space()
    }

    fn action_space(&self) -> &Space {
        self.env.action_space()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{CountingAct, CountingEnv, CountingEnvConfig};

    #[test]
    fn records_episode_statistics() -> Result<()> {
        let config = CountingEnvConfig { episode_len: 3 };
        let mut env = Monitor::<CountingEnv>::build(&config, 0)?;
        env.reset()?;

        let (_, record) = env.step(&CountingAct(1))?;
        assert!(record.get("episode_return").is_none());
        let _ = env.step(&CountingAct(0))?;
        let (step, record) = env.step(&CountingAct(1))?;
        assert!(step.is_done());
        assert_eq!(record.get_scalar("episode_return")?, 2.0);
        assert_eq!(record.get_scalar("episode_length")?, 3.0);

        env.reset()?;
        for _ in 0..3 {
            env.step(&CountingAct(1))?;
        }
        assert_eq!(env.episode_returns(), &[2.0, 3.0]);
        assert_eq!(env.observation_space(), env.inner().observation_space());
        Ok(())
    }
}
