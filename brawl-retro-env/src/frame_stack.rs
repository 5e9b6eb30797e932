//! Stacking consecutive observations.
use crate::FighterObs;
use anyhow::Result;
use brawl_core::{error::EnvError, record::Record, space::BoxSpace, Env, Space, Step};
use ndarray::{concatenate, Array3, Axis};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Configuration of [`FrameStack`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameStackConfig<C> {
    /// Configuration of the wrapped environment.
    pub env: C,

    /// The number of stacked observations.
    pub n_stack: usize,
}

impl<C> FrameStackConfig<C> {
    /// Stacks 4 observations of the environment built from `env`.
    pub fn new(env: C) -> Self {
        Self { env, n_stack: 4 }
    }

    /// Sets the number of stacked observations.
    pub fn n_stack(mut self, n_stack: usize) -> Self {
        self.n_stack = n_stack;
        self
    }
}

/// Stacks the last `n_stack` observations along the channel axis.
///
/// On reset, the stack is filled with zeros and the initial observation is put
/// in the last slot. An observation of shape `(h, w, c)` becomes `(h, w, c * n_stack)`,
/// the newest observation occupying the last `c` channels.
pub struct FrameStack<E: Env<Obs = FighterObs>> {
    env: E,
    n_stack: usize,
    buffer: VecDeque<Array3<i16>>,
    obs_space: Space,
}

impl<E: Env<Obs = FighterObs>> FrameStack<E> {
    /// Wraps an environment.
    pub fn new(env: E, n_stack: usize) -> Result<Self> {
        if n_stack == 0 {
            return Err(EnvError::ContractViolation("n_stack must be positive".to_string()).into());
        }
        let inner = env.observation_space().as_box().ok_or_else(|| {
            EnvError::ContractViolation("only box observation spaces can be stacked".to_string())
        })?;
        let mut shape = inner.shape.clone();
        match shape.last_mut() {
            Some(c) => *c *= n_stack,
            None => {
                return Err(EnvError::ContractViolation(
                    "observations have no channel axis".to_string(),
                )
                .into())
            }
        }
        let obs_space = BoxSpace::new(inner.low, inner.high, shape, inner.dtype).into();

        Ok(Self {
            env,
            n_stack,
            buffer: VecDeque::with_capacity(n_stack),
            obs_space,
        })
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }

    fn fill(&mut self, obs: FighterObs) {
        self.buffer.clear();
        for _ in 1..self.n_stack {
            self.buffer.push_back(Array3::zeros(obs.frames.raw_dim()));
        }
        self.buffer.push_back(obs.frames);
    }

    fn push(&mut self, obs: FighterObs) {
        if self.buffer.len() == self.n_stack {
            self.buffer.pop_front();
        }
        self.buffer.push_back(obs.frames);
    }

    fn stacked(&self) -> Result<FighterObs> {
        let views: Vec<_> = self.buffer.iter().map(|a| a.view()).collect();
        Ok(concatenate(Axis(2), &views)?.into())
    }
}

impl<E: Env<Obs = FighterObs>> Env for FrameStack<E> {
    type Config = FrameStackConfig<E::Config>;
    type Obs = FighterObs;
    type Act = E::Act;
    type Info = E::Info;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Self::new(E::build(&config.env, seed)?, config.n_stack)
    }

    fn reset(&mut self) -> Result<FighterObs> {
        let obs = self.env.reset()?;
        self.fill(obs);
        self.stacked()
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<FighterObs> {
        let obs = self.env.reset_with_index(ix)?;
        self.fill(obs);
        self.stacked()
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        let (mut step, record) = self.env.step(a)?;
        let obs = std::mem::replace(&mut step.obs, FighterObs::zeros((0, 0, 0)));
        self.push(obs);
        step.obs = self.stacked()?;
        Ok((step.cast(), record))
    }

    fn render(&mut self) -> Result<()> {
        self.env.render()
    }

    fn close(&mut self) -> Result<()> {
        self.env.close()
    }

    fn observation_space(&self) -> &Space {
        &self.obs_space
    }

    fn action_space(&self) -> &Space {
        self.env.action_space()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        util::{ScriptStep, ScriptedEmulator},
        FighterAct, FighterEnv, FighterEnvConfig, ObsMode, RawFrame,
    };

    fn stacked_env(n_stack: usize) -> Result<FrameStack<FighterEnv<ScriptedEmulator>>> {
        let script = [[255, 255, 255], [0, 0, 0], [255, 255, 255]]
            .iter()
            .enumerate()
            .map(|(i, &rgb)| ScriptStep::new(RawFrame::filled(16, 16, rgb), 0, i == 2))
            .collect();
        let emulator = ScriptedEmulator::new(RawFrame::filled(16, 16, [255, 255, 255]), script);
        let config = FighterEnvConfig::default().obs_mode(ObsMode::Frame);
        FrameStack::new(FighterEnv::new(emulator, &config)?, n_stack)
    }

    fn channel(obs: &FighterObs, c: usize) -> i16 {
        obs.frames[[40, 40, c]]
    }

    #[test]
    fn stacks_along_channels() -> Result<()> {
        let mut env = stacked_env(3)?;
        assert_eq!(env.observation_space().shape(), vec![84, 84, 3]);

        let obs = env.reset()?;
        assert_eq!(obs.frames.shape(), &[84, 84, 3]);
        assert_eq!(channel(&obs, 0), 0);
        assert_eq!(channel(&obs, 1), 0);
        assert!(channel(&obs, 2) > 250);

        let (step, _) = env.step(&FighterAct::noop())?;
        assert_eq!(channel(&step.obs, 0), 0);
        assert!(channel(&step.obs, 1) > 250);
        assert!(channel(&step.obs, 2) > 250);

        let (step, _) = env.step(&FighterAct::noop())?;
        assert!(channel(&step.obs, 0) > 250);
        assert_eq!(channel(&step.obs, 2), 0);
        Ok(())
    }

    #[test]
    fn reset_clears_the_stack() -> Result<()> {
        let mut env = stacked_env(2)?;
        env.reset()?;
        env.step(&FighterAct::noop())?;
        let obs = env.reset()?;
        assert_eq!(channel(&obs, 0), 0);
        Ok(())
    }

    #[test]
    fn rejects_empty_stack() {
        assert!(stacked_env(0).is_err());
    }
}
